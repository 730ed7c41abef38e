use log::debug;

use crate::app::domain::settings::ThemeMode;

/// Whether new windows should use the dark palette.
pub fn resolve_dark_mode(mode: ThemeMode) -> bool {
    match mode {
        ThemeMode::Light => false,
        ThemeMode::Dark => true,
        ThemeMode::SystemDefault => detect_system_dark_mode(),
    }
}

#[cfg(not(target_os = "windows"))]
fn command_stdout(program: &str, args: &[&str]) -> Option<String> {
    let output = std::process::Command::new(program).args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).to_lowercase())
}

/// Best-effort lookup of the desktop's dark-mode preference; light when
/// nothing can be detected.
pub fn detect_system_dark_mode() -> bool {
    let dark = system_prefers_dark();
    debug!("System dark mode: {}", dark);
    dark
}

#[cfg(target_os = "windows")]
fn system_prefers_dark() -> bool {
    use winreg::RegKey;
    use winreg::enums::HKEY_CURRENT_USER;

    RegKey::predef(HKEY_CURRENT_USER)
        .open_subkey("Software\\Microsoft\\Windows\\CurrentVersion\\Themes\\Personalize")
        .and_then(|key| key.get_value::<u32, _>("AppsUseLightTheme"))
        // 0 = dark, 1 = light
        .is_ok_and(|value| value == 0)
}

#[cfg(target_os = "linux")]
fn system_prefers_dark() -> bool {
    let gtk_theme = command_stdout("gsettings", &["get", "org.gnome.desktop.interface", "gtk-theme"]);
    if gtk_theme.is_some_and(|theme| theme.contains("dark")) {
        return true;
    }
    command_stdout("gsettings", &["get", "org.gnome.desktop.interface", "color-scheme"])
        .is_some_and(|scheme| scheme.contains("prefer-dark"))
}

#[cfg(target_os = "macos")]
fn system_prefers_dark() -> bool {
    command_stdout("defaults", &["read", "-g", "AppleInterfaceStyle"])
        .is_some_and(|style| style.contains("dark"))
}

#[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
fn system_prefers_dark() -> bool {
    false
}
