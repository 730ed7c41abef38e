use std::cell::Cell;
use std::rc::Rc;

use fltk::{
    app::{self, Sender},
    enums::Event,
    group::{Flex, FlexType},
    menu::MenuBar,
    prelude::*,
    text::{TextBuffer, TextEditor},
    window::Window,
};

use super::menu::build_menu;
use super::theme::{apply_editor_settings, apply_theme};
use crate::app::domain::messages::Message;
use crate::app::domain::settings::AppSettings;
use crate::app::domain::view::{FrameId, FrameView, Span};
use crate::app::infrastructure::buffer::buffer_text_no_leak;

/// One editor window: menu bar on top, text editor filling the rest.
pub struct EditorWindow {
    id: FrameId,
    window: Window,
    editor: TextEditor,
    buffer: TextBuffer,
    #[cfg_attr(not(target_os = "windows"), allow(dead_code))]
    dark_mode: bool,
    /// Raised while the workspace writes into the buffer so the change is
    /// not reported back as a user edit.
    muted: Rc<Cell<bool>>,
}

impl EditorWindow {
    pub fn new(id: FrameId, sender: Sender<Message>, settings: &AppSettings, dark_mode: bool) -> Self {
        let (w, h) = (settings.window_width, settings.window_height);
        let mut window = Window::default().with_size(w, h);
        window.set_xclass("MirrorPad");

        let mut flex = Flex::new(0, 0, w, h, None);
        flex.set_type(FlexType::Column);

        let mut menu = MenuBar::new(0, 0, 0, 30, "");
        flex.fixed(&menu, 30);
        build_menu(&mut menu, &sender, id);

        let buffer = TextBuffer::default();
        let mut editor = TextEditor::new(0, 0, 0, 0, "");
        editor.set_buffer(buffer.clone());

        flex.end();
        window.resizable(&flex);
        window.end();

        apply_editor_settings(&mut editor, settings);
        apply_theme(&mut editor, &mut window, &mut menu, dark_mode);

        let muted = Rc::new(Cell::new(false));
        let mut watched = buffer.clone();
        let quiet = muted.clone();
        watched.add_modify_callback(move |_pos, inserted, deleted, _restyled, _deleted_text| {
            if (inserted > 0 || deleted > 0) && !quiet.get() {
                sender.send(Message::TextChanged(id));
            }
        });

        // Selections settle on mouse release or after shift/ctrl navigation.
        editor.handle(move |_, ev| {
            match ev {
                Event::Released | Event::KeyUp => sender.send(Message::SelectionChanged(id)),
                _ => {}
            }
            false
        });

        // Title bar close button acts like Window/Close; Escape is ignored.
        window.set_callback(move |_| {
            if app::event() == Event::Close {
                sender.send(Message::WindowClose(id));
            }
        });

        Self {
            id,
            window,
            editor,
            buffer,
            dark_mode,
            muted,
        }
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    fn quietly(&mut self, f: impl FnOnce(&mut TextBuffer)) {
        self.muted.set(true);
        f(&mut self.buffer);
        self.muted.set(false);
    }
}

impl FrameView for EditorWindow {
    fn text(&self) -> String {
        buffer_text_no_leak(&self.buffer)
    }

    fn set_text(&mut self, text: &str) {
        self.quietly(|buf| buf.set_text(text));
    }

    fn caret(&self) -> i32 {
        self.editor.insert_position()
    }

    fn set_caret(&mut self, pos: i32) {
        let pos = pos.clamp(0, self.buffer.length());
        self.editor.set_insert_position(pos);
        self.editor.show_insert_position();
    }

    fn selection(&self) -> Option<Span> {
        self.buffer.selection_position()
    }

    fn set_selection(&mut self, span: Option<Span>) {
        self.quietly(|buf| match span {
            Some((start, end)) => buf.select(start, end),
            None => buf.unselect(),
        });
        self.editor.redraw();
    }

    fn title(&self) -> String {
        self.window.label()
    }

    fn set_title(&mut self, title: &str) {
        self.window.set_label(title);
    }

    fn show(&mut self) {
        self.window.show();
        #[cfg(target_os = "windows")]
        super::theme::set_windows_titlebar_theme(&self.window, self.dark_mode);
        self.editor.take_focus().ok();
    }

    fn close(&mut self) {
        self.quietly(|buf| buf.set_text(""));
        self.window.hide();
        Window::delete(self.window.clone());
    }
}
