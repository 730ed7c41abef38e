#[cfg(not(target_os = "windows"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use fltk::{app, dialog};
use log::{error, info, warn};

use mirror_pad::app::infrastructure::logging;
use mirror_pad::app::{AppSettings, Message, Workspace};
use mirror_pad::ui::toolkit::FltkToolkit;

fn main() {
    if let Err(e) = logging::init() {
        eprintln!("Logging disabled: {}", e);
    }
    info!("MirrorPad {} starting", env!("CARGO_PKG_VERSION"));

    let settings = AppSettings::load();
    let app = app::App::default();
    let (sender, receiver) = app::channel::<Message>();

    let toolkit = FltkToolkit::new(app, sender, &settings);
    let mut workspace = Workspace::new(toolkit, settings);

    if let Err(e) = workspace.start() {
        error!("Could not open the first window: {}", e);
        dialog::alert_default(&format!("MirrorPad could not start: {}", e));
        return;
    }

    while app.wait() {
        if let Some(msg) = receiver.recv() {
            workspace.dispatch(msg);
            if !workspace.is_running() {
                break;
            }
        }
    }

    if let Err(e) = workspace.settings().save() {
        warn!("Failed to save settings: {}", e);
    }
    info!("MirrorPad exiting");
}
