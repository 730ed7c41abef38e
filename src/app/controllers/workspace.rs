use std::path::{Path, PathBuf};

use log::{debug, error, info, warn};

use crate::app::domain::messages::Message;
use crate::app::domain::registry::{Registry, UNTITLED};
use crate::app::domain::settings::AppSettings;
use crate::app::domain::view::{FrameId, FrameView, GroupId, Toolkit};
use crate::app::infrastructure::error::Result;
use crate::app::services::text_file;

/// Application state: every open window, grouped, plus the toolkit used to
/// create windows and ask the user things.
pub struct Workspace<T: Toolkit> {
    registry: Registry<T::View>,
    toolkit: T,
    settings: AppSettings,
}

impl<T: Toolkit> Workspace<T> {
    pub fn new(toolkit: T, settings: AppSettings) -> Self {
        Self {
            registry: Registry::new(),
            toolkit,
            settings,
        }
    }

    pub fn registry(&self) -> &Registry<T::View> {
        &self.registry
    }

    pub fn toolkit(&self) -> &T {
        &self.toolkit
    }

    pub fn toolkit_mut(&mut self) -> &mut T {
        &mut self.toolkit
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn is_running(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Open the first window in a fresh group.
    pub fn start(&mut self) -> Result<FrameId> {
        info!("Starting with a blank window");
        self.new_window()
    }

    /// Route a message from a window to its handler. Failures are logged;
    /// they never take the application down.
    pub fn dispatch(&mut self, msg: Message) {
        // Events can still be queued for a window that was just closed.
        let opens_window = matches!(msg, Message::FileNew(_) | Message::WindowDuplicate(_));
        if !opens_window && !self.registry.contains_frame(msg.frame()) {
            debug!("Dropping {:?}: {} is closed", msg, msg.frame());
            return;
        }
        let result = match msg {
            Message::FileNew(_) => self.new_window().map(|_| ()),
            Message::FileOpen(id) => self.open(id),
            Message::FileSave(id) => self.save(id),
            Message::FileSaveAs(id) => self.save_as(id).map(|_| ()),
            Message::FileExit(id) => self.exit(id),
            Message::WindowDuplicate(id) => self.duplicate(id).map(|_| ()),
            Message::WindowClose(id) => self.close(id),
            Message::WindowCloseAll(id) => self.close_all(id),
            Message::TextChanged(id) => self.text_changed(id),
            Message::SelectionChanged(id) => self.selection_changed(id),
        };
        if let Err(e) = result {
            warn!("{:?} failed: {}", msg, e);
        }
    }

    fn spawn_frame(&mut self, group: GroupId) -> Result<FrameId> {
        let id = self.registry.allocate_frame_id();
        let view = self.toolkit.create_view(id);
        self.registry.add_frame(id, group, view)?;
        if let Some(view) = self.registry.view_mut(id) {
            view.show();
        }
        Ok(id)
    }

    /// File/New: a blank window in a group of its own.
    pub fn new_window(&mut self) -> Result<FrameId> {
        let group = self.registry.create_group();
        self.spawn_frame(group)
    }

    pub fn text_changed(&mut self, frame: FrameId) -> Result<()> {
        self.registry.broadcast_text(frame)
    }

    pub fn selection_changed(&mut self, frame: FrameId) -> Result<()> {
        self.registry.broadcast_selection(frame)
    }

    fn remember_directory(&mut self, path: &Path) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.settings.last_open_directory = Some(parent.to_path_buf());
        }
    }

    /// Ask "Save document?" when the group has unsaved changes (or, if
    /// `file_backed_counts`, when it is bound to a file) and save on Yes.
    /// No carries on without saving.
    fn offer_save(&mut self, frame: FrameId, file_backed_counts: bool) -> Result<()> {
        let group = self.registry.group_of(frame)?;
        let dirty = self.registry.is_dirty(group);
        let has_file = self.registry.file_path(group).is_some();

        if !(dirty || (file_backed_counts && has_file)) {
            return Ok(());
        }
        if !self.toolkit.confirm_save() {
            debug!("Leaving {} unsaved", group);
            return Ok(());
        }
        if dirty {
            if has_file {
                self.save(frame)?;
            } else {
                self.save_as(frame)?;
            }
        }
        Ok(())
    }

    /// Write the frame's text to `path` and mark its group saved there.
    /// Returns `false` when the write failed; the user has been told.
    fn write_group(&mut self, frame: FrameId, path: PathBuf) -> Result<bool> {
        let group = self.registry.group_of(frame)?;
        let text = match self.registry.view(frame) {
            Some(view) => view.text(),
            None => return Ok(false),
        };
        match text_file::save_text(&path, &text) {
            Ok(()) => {
                self.registry.mark_saved(group, Some(path))?;
                Ok(true)
            }
            Err(e) => {
                error!("Error saving {}: {}", path.display(), e);
                self.toolkit
                    .alert(&format!("Error saving file {}: {}", path.display(), e));
                Ok(false)
            }
        }
    }

    /// File/Open: load a text file into this window's group.
    pub fn open(&mut self, frame: FrameId) -> Result<()> {
        self.offer_save(frame, true)?;

        let start_dir = self.settings.last_open_directory.clone();
        let Some(path) = self.toolkit.choose_open_path(start_dir.as_deref()) else {
            return Ok(());
        };
        self.remember_directory(&path);

        let text = match text_file::load_text(&path) {
            Ok(text) => text,
            Err(e) => {
                error!("Error opening {}: {}", path.display(), e);
                self.toolkit
                    .alert(&format!("Error opening file {}: {}", path.display(), e));
                return Ok(());
            }
        };

        let group = self.registry.group_of(frame)?;
        self.registry.set_loading(frame, true)?;
        if let Some(view) = self.registry.view_mut(frame) {
            view.set_text(&text);
            view.set_caret(0);
        }
        let pushed = self.registry.broadcast_text(frame);
        self.registry.set_loading(frame, false)?;
        pushed?;

        info!("Opened {} in {}", path.display(), group);
        self.registry.mark_saved(group, Some(path))
    }

    /// File/Save: rewrite the backing file if there are unsaved changes;
    /// without one, offer Save As.
    pub fn save(&mut self, frame: FrameId) -> Result<()> {
        let group = self.registry.group_of(frame)?;
        match self.registry.file_path(group).map(Path::to_path_buf) {
            Some(path) => {
                if self.registry.is_dirty(group) {
                    self.write_group(frame, path)?;
                }
            }
            None => {
                if self.toolkit.confirm_save() {
                    self.save_as(frame)?;
                }
            }
        }
        Ok(())
    }

    /// File/Save As. Returns whether the file was written.
    pub fn save_as(&mut self, frame: FrameId) -> Result<bool> {
        // Fail before the dialog if the window is already gone.
        self.registry.group_of(frame)?;

        let start_dir = self.settings.last_open_directory.clone();
        let Some(path) = self.toolkit.choose_save_path(start_dir.as_deref()) else {
            return Ok(false);
        };
        self.remember_directory(&path);
        self.write_group(frame, path)
    }

    /// Window/New: another view of the same document.
    pub fn duplicate(&mut self, frame: FrameId) -> Result<FrameId> {
        if !self.registry.contains_frame(frame) {
            return self.new_window();
        }
        let id = self.registry.allocate_frame_id();
        let view = self.toolkit.create_view(id);
        let group = self.registry.duplicate(frame, id, view)?;
        if let Some(view) = self.registry.view_mut(id) {
            view.show();
        }
        debug!("Duplicated {} into {} ({})", frame, id, group);
        Ok(id)
    }

    /// Window/Close. Only the last window of a group asks about saving.
    pub fn close(&mut self, frame: FrameId) -> Result<()> {
        let group = self.registry.group_of(frame)?;
        if self.registry.frames_in(group)?.len() == 1 {
            self.offer_save(frame, false)?;
        }
        let mut removed = self.registry.remove_frame(frame)?;
        removed.view.close();
        self.finish_if_empty();
        Ok(())
    }

    /// Window/Close All: every window of this group.
    pub fn close_all(&mut self, frame: FrameId) -> Result<()> {
        self.offer_save(frame, false)?;
        let group = self.registry.group_of(frame)?;
        for mut view in self.registry.remove_group(group)? {
            view.close();
        }
        self.finish_if_empty();
        Ok(())
    }

    /// File/Exit: every window of every group. Only this frame's group is
    /// offered a save.
    pub fn exit(&mut self, frame: FrameId) -> Result<()> {
        let own = self.registry.group_of(frame)?;
        self.offer_save(frame, false)?;
        for id in self.registry.group_ids().into_iter().filter(|id| *id != own) {
            if let Some(group) = self.registry.group(id).filter(|g| g.is_dirty()) {
                let name = group
                    .file_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| UNTITLED.to_string());
                warn!("Discarding unsaved changes in {} ({})", id, name);
            }
        }
        for mut view in self.registry.clear() {
            view.close();
        }
        self.finish_if_empty();
        Ok(())
    }

    fn finish_if_empty(&mut self) {
        if !self.registry.is_empty() {
            return;
        }
        info!("Last window closed");
        self.toolkit.quit();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::domain::view::Span;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    #[derive(Clone, Default)]
    struct FakeWindow {
        text: String,
        caret: i32,
        selection: Option<Span>,
        title: String,
        shown: bool,
        closed: bool,
    }

    /// Window handle whose state stays inspectable after the registry lets
    /// go of it.
    #[derive(Clone, Default)]
    struct FakeView(Rc<RefCell<FakeWindow>>);

    impl FrameView for FakeView {
        fn text(&self) -> String {
            self.0.borrow().text.clone()
        }
        fn set_text(&mut self, text: &str) {
            self.0.borrow_mut().text = text.to_string();
        }
        fn caret(&self) -> i32 {
            self.0.borrow().caret
        }
        fn set_caret(&mut self, pos: i32) {
            self.0.borrow_mut().caret = pos;
        }
        fn selection(&self) -> Option<Span> {
            self.0.borrow().selection
        }
        fn set_selection(&mut self, span: Option<Span>) {
            self.0.borrow_mut().selection = span;
        }
        fn title(&self) -> String {
            self.0.borrow().title.clone()
        }
        fn set_title(&mut self, title: &str) {
            self.0.borrow_mut().title = title.to_string();
        }
        fn show(&mut self) {
            self.0.borrow_mut().shown = true;
        }
        fn close(&mut self) {
            let mut w = self.0.borrow_mut();
            w.shown = false;
            w.closed = true;
        }
    }

    /// Toolkit answering dialogs from queued replies.
    #[derive(Default)]
    struct ScriptedToolkit {
        windows: Vec<(FrameId, FakeView)>,
        confirm_replies: VecDeque<bool>,
        open_replies: VecDeque<Option<PathBuf>>,
        save_replies: VecDeque<Option<PathBuf>>,
        prompts: usize,
        alerts: Vec<String>,
        quit: bool,
    }

    impl Toolkit for ScriptedToolkit {
        type View = FakeView;

        fn create_view(&mut self, id: FrameId) -> FakeView {
            let view = FakeView::default();
            self.windows.push((id, view.clone()));
            view
        }
        fn confirm_save(&mut self) -> bool {
            self.prompts += 1;
            self.confirm_replies.pop_front().unwrap_or(false)
        }
        fn choose_open_path(&mut self, _start_dir: Option<&Path>) -> Option<PathBuf> {
            self.open_replies.pop_front().flatten()
        }
        fn choose_save_path(&mut self, _start_dir: Option<&Path>) -> Option<PathBuf> {
            self.save_replies.pop_front().flatten()
        }
        fn alert(&mut self, message: &str) {
            self.alerts.push(message.to_string());
        }
        fn quit(&mut self) {
            self.quit = true;
        }
    }

    impl ScriptedToolkit {
        fn window(&self, id: FrameId) -> FakeView {
            self.windows
                .iter()
                .find(|(wid, _)| *wid == id)
                .map(|(_, v)| v.clone())
                .expect("window was never created")
        }
    }

    fn workspace() -> Workspace<ScriptedToolkit> {
        Workspace::new(ScriptedToolkit::default(), AppSettings::default())
    }

    fn type_text(ws: &mut Workspace<ScriptedToolkit>, frame: FrameId, text: &str) {
        let view = ws.toolkit().window(frame);
        {
            let mut w = view.0.borrow_mut();
            w.text.push_str(text);
            w.caret = w.text.len() as i32;
        }
        ws.dispatch(Message::TextChanged(frame));
    }

    fn state(ws: &Workspace<ScriptedToolkit>, frame: FrameId) -> FakeWindow {
        ws.toolkit().window(frame).0.borrow().clone()
    }

    #[test]
    fn test_start_opens_one_blank_window() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        assert!(ws.is_running());
        assert_eq!(ws.registry().group_count(), 1);
        let w = state(&ws, f1);
        assert!(w.shown);
        assert_eq!(w.title, "MirrorPad - Untitled");
    }

    #[test]
    fn test_type_duplicate_and_edit_scenario() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();

        type_text(&mut ws, f1, "hello");
        assert_eq!(state(&ws, f1).title, "MirrorPad - Untitled*");

        ws.dispatch(Message::WindowDuplicate(f1));
        let f2 = ws.toolkit().windows[1].0;
        {
            let w2 = state(&ws, f2);
            assert!(w2.shown);
            assert_eq!(w2.text, "hello");
            assert_eq!(w2.title, "MirrorPad - Untitled*");
        }
        let group = ws.registry().group_of(f1).unwrap();
        assert_eq!(ws.registry().group_of(f2).unwrap(), group);
        assert!(ws.registry().is_dirty(group));

        type_text(&mut ws, f2, " world");
        assert_eq!(state(&ws, f1).text, "hello world");
        assert_eq!(state(&ws, f1).caret, 11);
    }

    #[test]
    fn test_selection_mirrors_across_group() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "some text");
        let f2 = ws.duplicate(f1).unwrap();
        let f3 = ws.duplicate(f2).unwrap();

        ws.toolkit().window(f3).0.borrow_mut().selection = Some((0, 4));
        ws.dispatch(Message::SelectionChanged(f3));

        for f in [f1, f2, f3] {
            assert_eq!(state(&ws, f).selection, Some((0, 4)));
        }
    }

    #[test]
    fn test_new_window_is_independent() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        ws.dispatch(Message::FileNew(f1));
        let other = ws.toolkit().windows[1].0;

        type_text(&mut ws, f1, "only here");

        assert_eq!(ws.registry().group_count(), 2);
        assert_eq!(state(&ws, other).text, "");
        assert_eq!(state(&ws, other).title, "MirrorPad - Untitled");
    }

    #[test]
    fn test_save_as_writes_lines_and_clears_marker() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.txt");

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        let f2 = ws.duplicate(f1).unwrap();
        type_text(&mut ws, f1, "line one\nline two");

        ws.toolkit_mut().save_replies.push_back(Some(path.clone()));
        ws.dispatch(Message::FileSaveAs(f2));

        assert_eq!(fs::read_to_string(&path).unwrap(), "line one\nline two\n");
        let group = ws.registry().group_of(f1).unwrap();
        assert!(!ws.registry().is_dirty(group));
        let expected = format!("MirrorPad - {}", path.display());
        assert_eq!(state(&ws, f1).title, expected);
        assert_eq!(state(&ws, f2).title, expected);
        assert_eq!(ws.settings().last_open_directory.as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_save_as_cancelled_keeps_dirty() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "draft");

        assert!(!ws.save_as(f1).unwrap());
        let group = ws.registry().group_of(f1).unwrap();
        assert!(ws.registry().is_dirty(group));
    }

    #[test]
    fn test_save_rewrites_backing_file_only_when_dirty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "v1");
        ws.toolkit_mut().save_replies.push_back(Some(path.clone()));
        ws.save_as(f1).unwrap();

        fs::write(&path, "changed on disk\n").unwrap();
        ws.dispatch(Message::FileSave(f1));
        assert_eq!(fs::read_to_string(&path).unwrap(), "changed on disk\n");

        type_text(&mut ws, f1, "\nv2");
        ws.dispatch(Message::FileSave(f1));
        assert_eq!(fs::read_to_string(&path).unwrap(), "v1\nv2\n");
        assert_eq!(ws.toolkit().prompts, 0);
    }

    #[test]
    fn test_save_without_file_offers_save_as() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("first.txt");

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "abc");

        ws.toolkit_mut().confirm_replies.push_back(true);
        ws.toolkit_mut().save_replies.push_back(Some(path.clone()));
        ws.dispatch(Message::FileSave(f1));

        assert_eq!(ws.toolkit().prompts, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc\n");
    }

    #[test]
    fn test_failed_save_alerts_and_stays_dirty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no-such-dir").join("x.txt");

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "keep me");
        ws.toolkit_mut().save_replies.push_back(Some(path));

        assert!(!ws.save_as(f1).unwrap());
        assert_eq!(ws.toolkit().alerts.len(), 1);
        let group = ws.registry().group_of(f1).unwrap();
        assert!(ws.registry().is_dirty(group));
        assert_eq!(state(&ws, f1).title, "MirrorPad - Untitled*");
    }

    #[test]
    fn test_open_loads_into_whole_group_without_dirtying() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("in.txt");
        fs::write(&path, "alpha\nbeta").unwrap();

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        let f2 = ws.duplicate(f1).unwrap();

        ws.toolkit_mut().open_replies.push_back(Some(path.clone()));
        ws.dispatch(Message::FileOpen(f1));

        let group = ws.registry().group_of(f1).unwrap();
        assert!(!ws.registry().is_dirty(group));
        assert!(!ws.registry().is_loading(f1));
        assert_eq!(ws.registry().file_path(group), Some(path.as_path()));
        for f in [f1, f2] {
            let w = state(&ws, f);
            assert_eq!(w.text, "alpha\nbeta\n");
            assert_eq!(w.title, format!("MirrorPad - {}", path.display()));
        }
        // Clean blank window: nothing to ask about.
        assert_eq!(ws.toolkit().prompts, 0);
    }

    #[test]
    fn test_open_dirty_document_asks_first() {
        let dir = TempDir::new().unwrap();
        let saved = dir.path().join("saved.txt");
        let incoming = dir.path().join("incoming.txt");
        fs::write(&incoming, "new\n").unwrap();

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "unsaved");

        ws.toolkit_mut().confirm_replies.push_back(true);
        ws.toolkit_mut().save_replies.push_back(Some(saved.clone()));
        ws.toolkit_mut().open_replies.push_back(Some(incoming));
        ws.open(f1).unwrap();

        assert_eq!(fs::read_to_string(&saved).unwrap(), "unsaved\n");
        assert_eq!(state(&ws, f1).text, "new\n");
    }

    #[test]
    fn test_open_file_backed_document_asks_even_when_clean() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join("a.txt");
        let second = dir.path().join("b.txt");
        fs::write(&first, "a\n").unwrap();
        fs::write(&second, "b\n").unwrap();

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        ws.toolkit_mut().open_replies.push_back(Some(first.clone()));
        ws.open(f1).unwrap();

        ws.toolkit_mut().confirm_replies.push_back(true);
        ws.toolkit_mut().open_replies.push_back(Some(second));
        ws.open(f1).unwrap();

        assert_eq!(ws.toolkit().prompts, 1);
        // Clean, so Yes had nothing to write.
        assert_eq!(fs::read_to_string(&first).unwrap(), "a\n");
        assert_eq!(state(&ws, f1).text, "b\n");
    }

    #[test]
    fn test_open_missing_file_alerts() {
        let dir = TempDir::new().unwrap();
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "kept");

        ws.toolkit_mut().confirm_replies.push_back(false);
        ws.toolkit_mut().open_replies.push_back(Some(dir.path().join("gone.txt")));
        ws.open(f1).unwrap();

        assert_eq!(ws.toolkit().alerts.len(), 1);
        assert_eq!(state(&ws, f1).text, "kept");
    }

    #[test]
    fn test_close_sole_frame_removes_group() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        ws.dispatch(Message::FileNew(f1));
        let group = ws.registry().group_of(f1).unwrap();

        ws.dispatch(Message::WindowClose(f1));

        assert!(!ws.registry().contains_group(group));
        assert!(state(&ws, f1).closed);
        assert!(ws.is_running());
        assert!(!ws.toolkit().quit);
    }

    #[test]
    fn test_close_one_of_many_does_not_prompt() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "dirty");
        let f2 = ws.duplicate(f1).unwrap();

        ws.close(f2).unwrap();

        assert_eq!(ws.toolkit().prompts, 0);
        let group = ws.registry().group_of(f1).unwrap();
        assert_eq!(ws.registry().frames_in(group).unwrap(), &[f1]);
    }

    #[test]
    fn test_close_last_dirty_frame_prompts_then_discards_on_no() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "throwaway");

        ws.toolkit_mut().confirm_replies.push_back(false);
        ws.close(f1).unwrap();

        assert_eq!(ws.toolkit().prompts, 1);
        assert!(!ws.is_running());
        assert!(ws.toolkit().quit);
    }

    #[test]
    fn test_close_all_closes_whole_group() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        let f2 = ws.duplicate(f1).unwrap();
        let f3 = ws.duplicate(f1).unwrap();
        ws.dispatch(Message::FileNew(f1));
        let group = ws.registry().group_of(f1).unwrap();

        ws.dispatch(Message::WindowCloseAll(f2));

        for f in [f1, f2, f3] {
            assert!(state(&ws, f).closed);
        }
        assert!(!ws.registry().contains_group(group));
        assert_eq!(ws.registry().group_count(), 1);
        assert_eq!(ws.registry().frame_count(), 1);
    }

    #[test]
    fn test_exit_closes_everything() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        ws.duplicate(f1).unwrap();
        ws.new_window().unwrap();

        ws.dispatch(Message::FileExit(f1));

        assert_eq!(ws.registry().group_count(), 0);
        assert!(ws.toolkit().windows.iter().all(|(_, v)| v.0.borrow().closed));
        assert!(ws.toolkit().quit);
    }

    #[test]
    fn test_close_last_dirty_frame_saves_on_yes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kept.txt");

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "worth keeping");

        ws.toolkit_mut().confirm_replies.push_back(true);
        ws.toolkit_mut().save_replies.push_back(Some(path.clone()));
        ws.dispatch(Message::WindowClose(f1));

        assert_eq!(ws.toolkit().prompts, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "worth keeping\n");
        assert!(state(&ws, f1).closed);
        assert!(!ws.is_running());
    }

    #[test]
    fn test_close_all_dirty_group_saves_on_yes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("group.txt");

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        let f2 = ws.duplicate(f1).unwrap();
        let f3 = ws.duplicate(f1).unwrap();
        type_text(&mut ws, f3, "shared\ntext");

        ws.toolkit_mut().confirm_replies.push_back(true);
        ws.toolkit_mut().save_replies.push_back(Some(path.clone()));
        ws.dispatch(Message::WindowCloseAll(f2));

        assert_eq!(ws.toolkit().prompts, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "shared\ntext\n");
        for f in [f1, f2, f3] {
            assert!(state(&ws, f).closed);
        }
        assert_eq!(ws.registry().group_count(), 0);
        assert!(ws.toolkit().quit);
    }

    #[test]
    fn test_close_all_dirty_group_discards_on_no() {
        let dir = TempDir::new().unwrap();
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        ws.duplicate(f1).unwrap();
        type_text(&mut ws, f1, "gone");

        ws.toolkit_mut().confirm_replies.push_back(false);
        ws.toolkit_mut()
            .save_replies
            .push_back(Some(dir.path().join("never.txt")));
        ws.close_all(f1).unwrap();

        assert_eq!(ws.toolkit().prompts, 1);
        assert!(!dir.path().join("never.txt").exists());
        assert!(!ws.is_running());
    }

    #[test]
    fn test_exit_saves_file_backed_group_on_yes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.txt");

        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        type_text(&mut ws, f1, "draft");
        ws.toolkit_mut().save_replies.push_back(Some(path.clone()));
        ws.save_as(f1).unwrap();
        ws.duplicate(f1).unwrap();
        type_text(&mut ws, f1, " final");

        ws.toolkit_mut().confirm_replies.push_back(true);
        ws.dispatch(Message::FileExit(f1));

        assert_eq!(ws.toolkit().prompts, 1);
        assert_eq!(fs::read_to_string(&path).unwrap(), "draft final\n");
        assert!(ws.toolkit().windows.iter().all(|(_, v)| v.0.borrow().closed));
        assert!(!ws.is_running());
    }

    #[test]
    fn test_exit_only_asks_about_own_group() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        let other = ws.new_window().unwrap();
        type_text(&mut ws, f1, "mine");
        type_text(&mut ws, other, "theirs");

        ws.toolkit_mut().confirm_replies.push_back(false);
        ws.exit(f1).unwrap();

        assert_eq!(ws.toolkit().prompts, 1);
        assert_eq!(ws.registry().group_count(), 0);
        assert!(state(&ws, other).closed);
    }

    #[test]
    fn test_messages_for_closed_window_are_ignored() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        let f2 = ws.duplicate(f1).unwrap();
        ws.close(f2).unwrap();

        ws.dispatch(Message::TextChanged(f2));
        ws.dispatch(Message::SelectionChanged(f2));
        ws.dispatch(Message::WindowClose(f2));

        assert_eq!(ws.registry().frame_count(), 1);
    }

    #[test]
    fn test_duplicate_of_closed_window_opens_new_group() {
        let mut ws = workspace();
        let f1 = ws.start().unwrap();
        let f2 = ws.duplicate(f1).unwrap();
        ws.close(f2).unwrap();

        let f3 = ws.duplicate(f2).unwrap();
        assert_ne!(
            ws.registry().group_of(f3).unwrap(),
            ws.registry().group_of(f1).unwrap()
        );
    }
}
