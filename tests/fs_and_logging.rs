// tests/fs_and_logging.rs

use std::error::Error;
use std::path::Path;

use plotvisor::config::default_config_path;
use plotvisor::fs::mock::MockFileSystem;
use plotvisor::fs::{FileSystem, RealFileSystem};
use plotvisor::logging::{resolve_level, LogLevel};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn mock_fs_bumps_modification_time_on_every_write() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("a.toml", "x = 1");
    let first = fs.modified(Path::new("a.toml"))?;

    fs.add_file("a.toml", "x = 1");
    let second = fs.modified(Path::new("a.toml"))?;
    assert!(second > first);

    fs.touch("a.toml");
    assert!(fs.modified(Path::new("a.toml"))? > second);
    assert_eq!(fs.read_to_string(Path::new("a.toml"))?, "x = 1");

    fs.remove_file("a.toml");
    assert!(fs.modified(Path::new("a.toml")).is_err());
    assert!(fs.read_to_string(Path::new("a.toml")).is_err());
    Ok(())
}

#[test]
fn mock_fs_reports_configured_space_only() -> TestResult {
    let fs = MockFileSystem::new();
    fs.set_available_space("/mnt/a", 42);

    assert_eq!(fs.available_space(Path::new("/mnt/a"))?, 42);
    assert!(fs.available_space(Path::new("/mnt/b")).is_err());
    Ok(())
}

#[test]
fn real_fs_reads_and_stats_files() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cfg.toml");
    std::fs::write(&path, "fingerprint = \"x\"")?;

    let fs = RealFileSystem;
    assert_eq!(fs.read_to_string(&path)?, "fingerprint = \"x\"");
    assert!(fs.modified(&path).is_ok());
    assert!(fs.modified(&dir.path().join("missing")).is_err());
    Ok(())
}

#[cfg(unix)]
#[test]
fn real_fs_reports_free_space_for_existing_directories() -> TestResult {
    let dir = tempfile::tempdir()?;
    let fs = RealFileSystem;

    // Any value is fine; the query itself must succeed.
    fs.available_space(dir.path())?;
    assert!(fs.available_space(&dir.path().join("does/not/exist")).is_err());
    Ok(())
}

#[test]
fn log_levels_parse_case_insensitively() {
    assert_eq!("DEBUG".parse::<LogLevel>(), Ok(LogLevel::Debug));
    assert_eq!(" warning ".parse::<LogLevel>(), Ok(LogLevel::Warn));
    assert!("loud".parse::<LogLevel>().is_err());
}

#[test]
fn explicit_log_level_wins() {
    assert_eq!(resolve_level(Some(LogLevel::Trace)), tracing::Level::TRACE);
    assert_eq!(resolve_level(Some(LogLevel::Error)), tracing::Level::ERROR);
}

#[test]
fn default_config_path_is_plotvisor_toml_or_override() {
    let path = default_config_path();
    match std::env::var_os("PLOTVISOR_CONFIG") {
        Some(value) => assert_eq!(path, std::path::PathBuf::from(value)),
        None => assert_eq!(path, Path::new("plotvisor.toml")),
    }
}
