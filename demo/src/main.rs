use eframe::{run_native, NativeOptions};

use crate::plugin::ShellPlugin;

mod app;
mod fetch;
mod plugin;
mod status;

const APP_NAME: &str = "Statespace Viewer";

fn main() -> eframe::Result {
    env_logger::init();

    run_native(
        APP_NAME,
        NativeOptions::default(),
        Box::new(|cc| {
            let mut app = app::DemoApp::new(cc);
            app.initialize();
            Ok(Box::new(app))
        }),
    )
}
