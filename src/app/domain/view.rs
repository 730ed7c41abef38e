use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u64);

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "frame#{}", self.0)
    }
}

impl std::fmt::Display for GroupId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

/// Selected byte range `(start, end)` inside a frame's text.
pub type Span = (i32, i32);

/// One editor window as seen by the registry.
///
/// Setters are programmatic updates: implementations must not report them
/// back as user edits, otherwise a broadcast would echo through the group.
pub trait FrameView {
    fn text(&self) -> String;
    fn set_text(&mut self, text: &str);

    fn caret(&self) -> i32;
    fn set_caret(&mut self, pos: i32);

    fn selection(&self) -> Option<Span>;
    fn set_selection(&mut self, span: Option<Span>);

    fn title(&self) -> String;
    fn set_title(&mut self, title: &str);

    fn show(&mut self);

    /// Hide and release the window. The view is not used afterwards.
    fn close(&mut self);
}

/// Window creation and the modal dialogs the workspace needs.
pub trait Toolkit {
    type View: FrameView;

    fn create_view(&mut self, id: FrameId) -> Self::View;

    /// Blocking Yes/No "Save document?" question.
    fn confirm_save(&mut self) -> bool;

    /// Pick an existing text file to open.
    fn choose_open_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf>;

    /// Pick a destination for Save As.
    fn choose_save_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf>;

    fn alert(&mut self, message: &str);

    /// Every frame is gone; stop the event loop.
    fn quit(&mut self);
}
