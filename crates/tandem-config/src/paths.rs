//! Platform-specific preset locations.
//!
//! - Linux: `~/.config/tandem/presets/`
//! - macOS: `~/Library/Application Support/tandem/presets/`
//! - Windows: `%APPDATA%\tandem\presets\`

use std::path::{Path, PathBuf};

/// Application name used for directory paths.
pub const APP_NAME: &str = "tandem";

const PRESETS_SUBDIR: &str = "presets";

/// The user's preset directory. Falls back to `./tandem/presets` when the
/// platform config directory is unknown.
pub fn user_presets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PRESETS_SUBDIR)
}

/// Resolve a preset argument to a file.
///
/// `name` may be a path to an existing file, or a preset name (with or
/// without `.toml`) looked up in [`user_presets_dir`].
pub fn find_preset(name: &str) -> Option<PathBuf> {
    find_preset_in(name, &user_presets_dir())
}

fn find_preset_in(name: &str, dir: &Path) -> Option<PathBuf> {
    let path = PathBuf::from(name);
    if path.is_file() {
        return Some(path);
    }

    let filename = if name.ends_with(".toml") {
        name.to_string()
    } else {
        format!("{name}.toml")
    };

    let candidate = dir.join(filename);
    candidate.is_file().then_some(candidate)
}

/// All `.toml` files in the user preset directory, sorted by path.
///
/// Empty if the directory is missing or unreadable.
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in_dir(&user_presets_dir())
}

fn list_presets_in_dir(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut presets: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    presets.sort();
    presets
}

/// Preset name from a file path (the file stem).
///
/// ```rust
/// use tandem_config::preset_name_from_path;
/// use std::path::Path;
///
/// assert_eq!(
///     preset_name_from_path(Path::new("/presets/room_mic.toml")),
///     Some("room_mic".to_string())
/// );
/// ```
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}
