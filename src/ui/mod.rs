//! FLTK front end: windows, menus, dialogs and theming.

pub mod editor_window;
pub mod file_dialogs;
pub mod menu;
pub mod theme;
pub mod toolkit;
