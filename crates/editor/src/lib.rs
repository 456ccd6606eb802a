// Library crate: settings, storage/auth collaborators and the async session glue.
// The egui shell (app, viewport painting, panels) stays in the binary crate.

pub mod auth;
pub mod session;
pub mod settings;
pub mod storage;
