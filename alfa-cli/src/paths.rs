//! Where the console keeps its files.
//!
//! Follows the platform conventions of `directories`: XDG on Linux,
//! `Library/` on macOS, `AppData` on Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const LATEST_LOG: &str = "latest.log";

/// Archived logs kept next to `latest.log`.
const MAX_OLD_LOGS: usize = 25;

/// Resolved per-user directories.
#[derive(Debug, Clone)]
pub struct AppPaths {
    data: PathBuf,
    cache: PathBuf,
    config: PathBuf,
}

impl AppPaths {
    /// `None` when no home directory can be found.
    pub fn resolve() -> Option<Self> {
        let dirs = ProjectDirs::from("com", "alfa", "alfa")?;
        Some(Self {
            data: dirs.data_dir().to_path_buf(),
            cache: dirs.cache_dir().to_path_buf(),
            config: dirs.config_dir().to_path_buf(),
        })
    }

    /// `settings.json` in the config directory.
    pub fn settings_file(&self) -> PathBuf {
        self.config.join("settings.json")
    }

    /// The persisted login session.
    pub fn session_file(&self) -> PathBuf {
        self.data.join("session.json")
    }

    /// Log of the current run, in the cache directory.
    pub fn log_file(&self) -> PathBuf {
        self.cache.join(LATEST_LOG)
    }

    /// Archive the previous run's log and prune old archives. Run before
    /// opening the new log.
    pub fn rotate_logs(&self) {
        rotate_logs_in(&self.cache, MAX_OLD_LOGS);
    }
}

fn rotate_logs_in(dir: &Path, keep: usize) {
    let previous = dir.join(LATEST_LOG);
    if previous.is_file() {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        if let Err(e) = fs::rename(&previous, dir.join(format!("{}.log", stamp))) {
            eprintln!("Cannot archive {}: {}", previous.display(), e);
        }
    }
    prune_archives(dir, keep);
}

/// Delete all but the `keep` newest archived logs.
fn prune_archives(dir: &Path, keep: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut archives: Vec<(Option<std::time::SystemTime>, PathBuf)> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "log")
                && path.file_name().is_some_and(|name| name != LATEST_LOG)
        })
        .map(|path| (fs::metadata(&path).and_then(|m| m.modified()).ok(), path))
        .collect();

    // Names are timestamps, so they break mtime ties.
    archives.sort();

    let excess = archives.len().saturating_sub(keep);
    for (_, path) in archives.into_iter().take(excess) {
        let _ = fs::remove_file(path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotate_archives_latest_and_prunes() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["20240101_000000.log", "20240102_000000.log", "20240103_000000.log"] {
            fs::write(dir.path().join(name), "old").unwrap();
        }
        fs::write(dir.path().join(LATEST_LOG), "latest").unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();

        rotate_logs_in(dir.path(), 2);

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();

        assert!(!names.contains(&LATEST_LOG.to_string()));
        assert!(names.contains(&"notes.txt".to_string()));
        assert_eq!(names.iter().filter(|n| n.ends_with(".log")).count(), 2);
    }

    #[test]
    fn test_file_locations() {
        let paths = AppPaths {
            data: PathBuf::from("/data"),
            cache: PathBuf::from("/cache"),
            config: PathBuf::from("/config"),
        };
        assert_eq!(paths.settings_file(), PathBuf::from("/config/settings.json"));
        assert_eq!(paths.session_file(), PathBuf::from("/data/session.json"));
        assert_eq!(paths.log_file(), PathBuf::from("/cache/latest.log"));
    }
}
