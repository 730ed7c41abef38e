use fltk::{
    app::Sender,
    enums::Shortcut,
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::domain::messages::Message;
use crate::app::domain::view::FrameId;

/// File and Window menus for one frame. Every entry reports back with the
/// frame's id so the workspace knows which window asked.
pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, frame: FrameId) {
    let s = *sender;

    // File
    menu.add("File/New", Shortcut::Ctrl | 'n', MenuFlag::Normal, move |_| s.send(Message::FileNew(frame)));
    menu.add("File/Open...", Shortcut::Ctrl | 'o', MenuFlag::MenuDivider, move |_| s.send(Message::FileOpen(frame)));
    menu.add("File/Save", Shortcut::Ctrl | 's', MenuFlag::Normal, move |_| s.send(Message::FileSave(frame)));
    menu.add("File/Save As...", Shortcut::Ctrl | Shortcut::Shift | 's', MenuFlag::MenuDivider, move |_| s.send(Message::FileSaveAs(frame)));
    menu.add("File/Exit", Shortcut::Ctrl | 'q', MenuFlag::Normal, move |_| s.send(Message::FileExit(frame)));

    // Window
    menu.add("Window/New", Shortcut::Ctrl | Shortcut::Shift | 'n', MenuFlag::MenuDivider, move |_| s.send(Message::WindowDuplicate(frame)));
    menu.add("Window/Close", Shortcut::Ctrl | 'w', MenuFlag::Normal, move |_| s.send(Message::WindowClose(frame)));
    menu.add("Window/Close All", Shortcut::Ctrl | Shortcut::Shift | 'w', MenuFlag::Normal, move |_| s.send(Message::WindowCloseAll(frame)));
}
