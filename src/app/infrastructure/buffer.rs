/// Read text from an FLTK TextBuffer without leaking the C-allocated copy.
///
/// `TextBuffer::text()` copies FLTK's `malloc()`'d string into a `String`
/// but never frees the original, so every call leaks a full copy of the
/// buffer. Text is read on every keystroke broadcast, so go through the FFI
/// and free it ourselves.
pub fn buffer_text_no_leak(buf: &fltk::text::TextBuffer) -> String {
    unsafe extern "C" {
        fn Fl_Text_Buffer_text(buf: *mut std::ffi::c_void) -> *mut std::ffi::c_char;
        fn free(ptr: *mut std::ffi::c_void);
    }

    // SAFETY: `buf.as_ptr()` is the live FLTK buffer owned by `buf`.
    // Fl_Text_Buffer_text returns a malloc'd, NUL-terminated copy (or null),
    // which is read once and released with the matching `free`.
    unsafe {
        let ptr = Fl_Text_Buffer_text(buf.as_ptr() as *mut std::ffi::c_void);
        if ptr.is_null() {
            return String::new();
        }
        let text = std::ffi::CStr::from_ptr(ptr).to_string_lossy().into_owned();
        free(ptr as *mut std::ffi::c_void);
        text
    }
}
