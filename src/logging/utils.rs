//! Log file location, ANSI stripping and timestamps.
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;

/// CSI sequences (`ESC [ ... final`) and two-byte `ESC x` escapes.
#[allow(clippy::expect_used)]
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|[@-Z\\-_0-9])").expect("escape pattern is valid")
});

/// `s` without terminal escape sequences, for the log file.
pub(super) fn strip_ansi(s: &str) -> String {
    ANSI_ESCAPE.replace_all(s, "").into_owned()
}

/// `$XDG_CACHE_HOME/cubepp/<command>.log`, falling back to `~/.cache`.
///
/// Creates the directory. Returns `None` when it cannot be created.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    let cache = std::env::var_os("XDG_CACHE_HOME").map_or_else(
        || {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    );
    let dir = cache.join("cubepp");
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join(format!("{command}.log")))
}

/// Current UTC time rendered with a `chrono` format string.
pub(super) fn utc_now(pattern: &str) -> String {
    chrono::Utc::now().format(pattern).to_string()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn strip_ansi_removes_console_styling() {
        assert_eq!(strip_ansi("\x1b[1;34m==>\x1b[0m \x1b[1mUpdate CMake presets\x1b[0m"), "==> Update CMake presets");
        assert_eq!(strip_ansi("\x1b[33m!\x1b[0m marker not found"), "! marker not found");
        assert_eq!(strip_ansi("plain ${sourceDir}/build"), "plain ${sourceDir}/build");
    }

    #[test]
    fn strip_ansi_removes_cursor_sequences() {
        assert_eq!(strip_ansi("\x1b[2Kpatched"), "patched");
        assert_eq!(strip_ansi("\x1b[2;5Hpatched"), "patched");
        assert_eq!(strip_ansi("\x1b7patched\x1b8"), "patched");
    }

    #[test]
    #[allow(unsafe_code)]
    fn log_file_lives_under_xdg_cache_home() {
        let tmp = tempfile::tempdir().unwrap();
        let _lock = crate::logging::TEST_ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        // SAFETY: Protected by TEST_ENV_MUTEX.
        unsafe {
            std::env::set_var("XDG_CACHE_HOME", tmp.path());
        }
        let path = log_file_path("setup");
        // SAFETY: Protected by TEST_ENV_MUTEX.
        unsafe {
            std::env::remove_var("XDG_CACHE_HOME");
        }
        assert_eq!(path, Some(tmp.path().join("cubepp").join("setup.log")));
        assert!(tmp.path().join("cubepp").is_dir());
    }

    #[test]
    fn utc_now_follows_pattern() {
        let time = utc_now("%H:%M:%S");
        assert_eq!(time.len(), 8);
        assert_eq!(time.matches(':').count(), 2);
        assert_eq!(utc_now("%Y-%m-%d %H:%M:%S").len(), 19);
    }
}
