use super::view::FrameId;

/// All messages that can be sent through the FLTK channel.
/// Every widget callback tags its message with the window it came from; the
/// dispatch loop in main hands them to the workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    // File
    FileNew(FrameId),
    FileOpen(FrameId),
    FileSave(FrameId),
    FileSaveAs(FrameId),
    FileExit(FrameId),

    // Window
    WindowDuplicate(FrameId),
    WindowClose(FrameId),
    WindowCloseAll(FrameId),

    // Editor
    TextChanged(FrameId),
    SelectionChanged(FrameId),
}

impl Message {
    pub fn frame(&self) -> FrameId {
        match *self {
            Message::FileNew(id)
            | Message::FileOpen(id)
            | Message::FileSave(id)
            | Message::FileSaveAs(id)
            | Message::FileExit(id)
            | Message::WindowDuplicate(id)
            | Message::WindowClose(id)
            | Message::WindowCloseAll(id)
            | Message::TextChanged(id)
            | Message::SelectionChanged(id) => id,
        }
    }
}
