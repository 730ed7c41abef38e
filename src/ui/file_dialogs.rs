use std::path::{Path, PathBuf};

use fltk::dialog::{FileDialogOptions, FileDialogType, NativeFileChooser};
use log::debug;

/// Only plain text documents are offered.
pub const TEXT_FILES_FILTER: &str = "Text Files\t*.txt";

fn run_chooser(kind: FileDialogType, title: &str, start_dir: Option<&Path>) -> Option<PathBuf> {
    let is_save = matches!(kind, FileDialogType::BrowseSaveFile);
    let mut nfc = NativeFileChooser::new(kind);
    nfc.set_title(title);
    nfc.set_filter(TEXT_FILES_FILTER);
    if is_save {
        nfc.set_option(FileDialogOptions::SaveAsConfirm);
    }
    if let Some(dir) = start_dir {
        if let Err(e) = nfc.set_directory(&dir) {
            debug!("Ignoring start directory {}: {:?}", dir.display(), e);
        }
    }
    nfc.show(); // blocks until closed
    non_empty(nfc.filename())
}

/// The chooser reports "cancelled" as an empty path.
fn non_empty(path: PathBuf) -> Option<PathBuf> {
    if path.as_os_str().is_empty() { None } else { Some(path) }
}

/// Pick an existing text file. Non-existent picks are treated as cancel.
pub fn native_open_dialog(start_dir: Option<&Path>) -> Option<PathBuf> {
    run_chooser(FileDialogType::BrowseFile, "Open text document", start_dir)
        .filter(|path| path.is_file())
}

pub fn native_save_dialog(start_dir: Option<&Path>) -> Option<PathBuf> {
    run_chooser(FileDialogType::BrowseSaveFile, "Save text file", start_dir)
}
