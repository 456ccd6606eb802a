// Core of the desk layout editor: everything that has no UI or I/O.
// The desktop app and the wasm bindings both drive a `Workspace` from here.

pub mod catalog;
pub mod error;
pub mod harness;
pub mod placement;
pub mod selection;
pub mod settings;
pub mod shell;
pub mod surface;
pub mod workspace;

/// Camera and ray casting used to turn pointer positions into world rays.
pub mod viewport {
    pub mod camera;
    pub mod picking;
}

pub use catalog::{Catalog, CatalogTemplate};
pub use error::EditorError;
pub use placement::{ObjectId, PlacedObject, PlacementEngine};
pub use settings::PlacementSettings;
pub use shell::{NullShell, PresentationShell, RecordingShell, ShellEvent};
pub use surface::{Bounds, Surface, SurfaceModel};
pub use viewport::camera::{OrbitCamera, ScreenPoint, ViewportRect};
pub use workspace::{KeyCommand, Workspace};
