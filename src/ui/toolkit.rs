use std::path::{Path, PathBuf};

use fltk::{app, dialog};
use log::debug;

use super::editor_window::EditorWindow;
use super::file_dialogs::{native_open_dialog, native_save_dialog};
use crate::app::domain::messages::Message;
use crate::app::domain::settings::AppSettings;
use crate::app::domain::view::{FrameId, Toolkit};
use crate::app::infrastructure::platform::resolve_dark_mode;

/// The real toolkit: FLTK windows, native file choosers and message boxes.
pub struct FltkToolkit {
    app: app::App,
    sender: app::Sender<Message>,
    settings: AppSettings,
    dark_mode: bool,
}

impl FltkToolkit {
    pub fn new(app: app::App, sender: app::Sender<Message>, settings: &AppSettings) -> Self {
        Self {
            app,
            sender,
            settings: settings.clone(),
            dark_mode: resolve_dark_mode(settings.theme_mode),
        }
    }
}

impl Toolkit for FltkToolkit {
    type View = EditorWindow;

    fn create_view(&mut self, id: FrameId) -> EditorWindow {
        let window = EditorWindow::new(id, self.sender, &self.settings, self.dark_mode);
        debug!("Built window for {}", window.id());
        window
    }

    fn confirm_save(&mut self) -> bool {
        dialog::choice2_default("Save document?", "Yes", "No", "") == Some(0)
    }

    fn choose_open_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf> {
        native_open_dialog(start_dir)
    }

    fn choose_save_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf> {
        native_save_dialog(start_dir)
    }

    fn alert(&mut self, message: &str) {
        dialog::alert_default(message);
    }

    fn quit(&mut self) {
        self.app.quit();
    }
}
