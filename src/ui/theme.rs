use fltk::{
    enums::{Color, Font},
    menu::MenuBar,
    prelude::*,
    text::{TextEditor, WrapMode},
    window::Window,
};

use crate::app::domain::settings::{AppSettings, FontChoice};

pub fn font_for(choice: FontChoice) -> Font {
    match choice {
        FontChoice::ScreenBold => Font::ScreenBold,
        FontChoice::Courier => Font::Courier,
        FontChoice::HelveticaMono => Font::Screen,
    }
}

/// Font, wrapping and gutter from the settings.
pub fn apply_editor_settings(editor: &mut TextEditor, settings: &AppSettings) {
    editor.set_text_font(font_for(settings.font));
    editor.set_text_size(settings.font_size as i32);
    if settings.word_wrap_enabled {
        editor.wrap_mode(WrapMode::AtBounds, 0);
    } else {
        editor.wrap_mode(WrapMode::None, 0);
    }
    editor.set_linenumber_width(if settings.line_numbers_enabled { 40 } else { 0 });
}

pub fn apply_theme(editor: &mut TextEditor, window: &mut Window, menu: &mut MenuBar, is_dark: bool) {
    if is_dark {
        editor.set_color(Color::from_rgb(30, 30, 30));
        editor.set_text_color(Color::from_rgb(220, 220, 220));
        editor.set_cursor_color(Color::from_rgb(255, 255, 255));
        editor.set_selection_color(Color::from_rgb(70, 70, 100));
        editor.set_linenumber_bgcolor(Color::from_rgb(40, 40, 40));
        editor.set_linenumber_fgcolor(Color::from_rgb(150, 150, 150));
        window.set_color(Color::from_rgb(25, 25, 25));
        menu.set_color(Color::from_rgb(35, 35, 35));
        menu.set_text_color(Color::from_rgb(220, 220, 220));
        menu.set_selection_color(Color::from_rgb(60, 60, 60));
    } else {
        editor.set_color(Color::White);
        editor.set_text_color(Color::Black);
        editor.set_cursor_color(Color::Black);
        editor.set_selection_color(Color::from_rgb(173, 216, 230));
        editor.set_linenumber_bgcolor(Color::from_rgb(240, 240, 240));
        editor.set_linenumber_fgcolor(Color::from_rgb(100, 100, 100));
        window.set_color(Color::from_rgb(240, 240, 240));
        menu.set_color(Color::from_rgb(240, 240, 240));
        menu.set_text_color(Color::Black);
        menu.set_selection_color(Color::from_rgb(200, 200, 200));
    }

    editor.redraw();
    window.redraw();
    menu.redraw();
}

/// Set Windows title bar theme (Windows 10 build 1809+)
/// Must be called AFTER window.show() to have a valid HWND
#[cfg(target_os = "windows")]
pub fn set_windows_titlebar_theme(window: &Window, is_dark: bool) {
    use std::mem::size_of;
    use std::ptr::from_ref;
    use windows::Win32::Foundation::HWND;
    use windows::Win32::Graphics::Dwm::{DWMWINDOWATTRIBUTE, DwmSetWindowAttribute};

    let on: i32 = if is_dark { 1 } else { 0 };
    // 20 on Windows 11 / 10 2004+, 19 on 10 1809-1903
    for attribute in [20, 19] {
        // SAFETY: the window has been shown, so raw_handle() is a live HWND,
        // and `on` outlives the call.
        unsafe {
            let hwnd = HWND(window.raw_handle() as *mut std::ffi::c_void);
            let _ = DwmSetWindowAttribute(
                hwnd,
                DWMWINDOWATTRIBUTE(attribute),
                from_ref(&on).cast(),
                size_of::<i32>() as u32,
            );
        }
    }
}
