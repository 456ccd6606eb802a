mod app;

use app::DeskApp;
use shared::LayoutRecord;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "desk_editor=info,desk_core=info".into()),
        )
        .init();

    // Parse --layout <path> argument
    let initial_layout = parse_layout_arg();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Desco: Desk Layout Editor")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "desk-editor",
        native_options,
        Box::new(move |cc| Ok(Box::new(DeskApp::new(cc, initial_layout)))),
    ) {
        tracing::error!("Failed to start application: {e}");
    }
}

fn parse_layout_arg() -> Option<LayoutRecord> {
    let args: Vec<String> = std::env::args().collect();
    let index = args.iter().position(|a| a == "--layout")?;
    let Some(path) = args.get(index + 1) else {
        tracing::error!("--layout needs a file path");
        return None;
    };

    let json = match std::fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!("Failed to read layout file {path}: {e}");
            return None;
        }
    };
    match shared::decode_str(&json) {
        Ok((desk, objects)) => {
            tracing::info!("Loaded layout from {path} ({} objects)", objects.len());
            Some(shared::encode(desk, &objects))
        }
        Err(e) => {
            tracing::error!("Failed to parse layout from {path}: {e}");
            None
        }
    }
}
