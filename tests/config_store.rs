// tests/config_store.rs

mod common;
use crate::common::builders::PlotConfigBuilder;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::SystemTime;

use tokio::time::{sleep, timeout, Duration};

use plotvisor::config::{ConfigStore, PollOutcome};
use plotvisor::fs::mock::MockFileSystem;
use plotvisor::fs::FileSystem;

type TestResult = Result<(), Box<dyn Error>>;

const PATH: &str = "/etc/plotvisor.toml";

fn mock_store(fs: &MockFileSystem) -> ConfigStore {
    ConfigStore::with_filesystem(PATH, Arc::new(fs.clone()))
}

fn config_toml(fingerprint: &str, plots: u32) -> String {
    PlotConfigBuilder::new()
        .target("/mnt/farm1")
        .temp("/mnt/nvme0")
        .plots(plots)
        .fingerprint(fingerprint)
        .to_toml()
}

#[test]
fn first_poll_loads_then_unchanged_file_is_skipped() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file(PATH, config_toml("aaa", 2));
    let store = mock_store(&fs);

    assert!(store.current().is_none());
    assert_eq!(store.poll(), PollOutcome::Loaded);

    let cfg = store.current().expect("config loaded");
    assert_eq!(cfg.fingerprint, "aaa");
    assert_eq!(cfg.number_of_plots, 2);
    assert_eq!(cfg.target_directory, vec![PathBuf::from("/mnt/farm1")]);

    assert_eq!(store.poll(), PollOutcome::Unchanged);
    assert_eq!(store.poll(), PollOutcome::Unchanged);
}

#[test]
fn changed_file_publishes_new_snapshot_and_old_holders_keep_theirs() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file(PATH, config_toml("old", 1));
    let store = mock_store(&fs);
    store.poll();

    let held = store.current().expect("first snapshot");

    fs.add_file(PATH, config_toml("new", 5));
    assert_eq!(store.poll(), PollOutcome::Loaded);

    let fresh = store.current().expect("second snapshot");
    assert_eq!(fresh.fingerprint, "new");
    assert_eq!(fresh.number_of_plots, 5);

    // The reference captured before the reload is untouched.
    assert_eq!(held.fingerprint, "old");
    assert_eq!(held.number_of_plots, 1);
    assert!(!Arc::ptr_eq(&held, &fresh));
}

#[test]
fn malformed_file_keeps_previous_snapshot_and_is_not_reparsed_until_changed() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file(PATH, config_toml("good", 3));
    let store = mock_store(&fs);
    assert_eq!(store.poll(), PollOutcome::Loaded);

    fs.add_file(PATH, "number_of_plots = [[[");
    assert_eq!(store.poll(), PollOutcome::Failed);
    assert_eq!(store.current().unwrap().fingerprint, "good");

    // Same broken file: the modification time was recorded, so no retry.
    assert_eq!(store.poll(), PollOutcome::Unchanged);

    // Fixing the file changes the modification time and gets picked up.
    fs.add_file(PATH, config_toml("fixed", 4));
    assert_eq!(store.poll(), PollOutcome::Loaded);
    assert_eq!(store.current().unwrap().fingerprint, "fixed");
}

#[test]
fn missing_file_fails_without_recording_modification_time() {
    init_tracing();

    let fs = MockFileSystem::new();
    let store = mock_store(&fs);

    assert_eq!(store.poll(), PollOutcome::Failed);
    assert_eq!(store.poll(), PollOutcome::Failed);
    assert!(store.current().is_none());

    fs.add_file(PATH, config_toml("late", 1));
    assert_eq!(store.poll(), PollOutcome::Loaded);

    fs.remove_file(PATH);
    assert_eq!(store.poll(), PollOutcome::Failed);
    assert_eq!(store.current().unwrap().fingerprint, "late");
}

#[test]
fn touching_the_file_reloads_identical_content() {
    let fs = MockFileSystem::new();
    fs.add_file(PATH, config_toml("same", 1));
    let store = mock_store(&fs);
    store.poll();
    let before = store.current().unwrap();

    fs.touch(PATH);
    assert_eq!(store.poll(), PollOutcome::Loaded);
    let after = store.current().unwrap();

    assert_eq!(*before, *after);
    assert!(!Arc::ptr_eq(&before, &after));
}

/// Readers racing a stream of reloads must only ever see whole snapshots.
#[test]
fn readers_never_observe_mixed_snapshots() {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file(PATH, config_toml("fp0", 0));
    let store = Arc::new(mock_store(&fs));
    store.poll();

    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut seen = 0usize;
                while !done.load(Ordering::Relaxed) {
                    let cfg = store.current().expect("always some snapshot");
                    assert_eq!(cfg.fingerprint, format!("fp{}", cfg.number_of_plots));
                    seen += 1;
                }
                seen
            })
        })
        .collect();

    for n in 1..=200u32 {
        fs.add_file(PATH, config_toml(&format!("fp{n}"), n));
        assert_eq!(store.poll(), PollOutcome::Loaded);
    }
    done.store(true, Ordering::Relaxed);

    for reader in readers {
        let seen = reader.join().expect("reader panicked");
        assert!(seen > 0);
    }
    assert_eq!(store.current().unwrap().number_of_plots, 200);
}

#[test]
fn real_file_is_loaded_from_disk() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("plotvisor.toml");
    let mut file = std::fs::File::create(&path)?;
    write!(file, "{}", config_toml("disk", 7))?;
    drop(file);

    let store = ConfigStore::new(&path);
    assert_eq!(store.poll(), PollOutcome::Loaded);
    assert_eq!(store.current().unwrap().number_of_plots, 7);
    assert_eq!(store.poll(), PollOutcome::Unchanged);

    Ok(())
}

#[tokio::test]
async fn poller_loads_eagerly_and_picks_up_changes() -> TestResult {
    init_tracing();

    let fs = MockFileSystem::new();
    fs.add_file(PATH, config_toml("start", 1));
    let store = Arc::new(mock_store(&fs));

    let handle = Arc::clone(&store).spawn_poller(Duration::from_millis(20));

    timeout(Duration::from_secs(5), async {
        while store.current().is_none() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;
    assert_eq!(store.current().unwrap().fingerprint, "start");

    fs.add_file(PATH, config_toml("next", 2));
    timeout(Duration::from_secs(5), async {
        while store.current().unwrap().fingerprint != "next" {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;

    handle.abort();
    Ok(())
}

/// Filesystem that records which thread performed each stat.
#[derive(Debug)]
struct ThreadRecordingFs {
    inner: MockFileSystem,
    stat_threads: std::sync::Mutex<Vec<ThreadId>>,
}

impl FileSystem for ThreadRecordingFs {
    fn read_to_string(&self, path: &Path) -> anyhow::Result<String> {
        self.inner.read_to_string(path)
    }

    fn modified(&self, path: &Path) -> anyhow::Result<SystemTime> {
        self.stat_threads
            .lock()
            .unwrap()
            .push(thread::current().id());
        self.inner.modified(path)
    }

    fn available_space(&self, path: &Path) -> anyhow::Result<u64> {
        self.inner.available_space(path)
    }
}

#[tokio::test(flavor = "current_thread")]
async fn poller_does_file_io_off_the_runtime_thread() -> TestResult {
    init_tracing();

    let mock = MockFileSystem::new();
    mock.add_file(PATH, config_toml("blocking", 1));
    let fs = Arc::new(ThreadRecordingFs {
        inner: mock,
        stat_threads: std::sync::Mutex::new(Vec::new()),
    });
    let store = Arc::new(ConfigStore::with_filesystem(PATH, fs.clone()));

    let handle = Arc::clone(&store).spawn_poller(Duration::from_millis(20));
    timeout(Duration::from_secs(5), async {
        while store.current().is_none() {
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await?;
    handle.abort();

    let runtime_thread = thread::current().id();
    let stat_threads = fs.stat_threads.lock().unwrap();
    assert!(!stat_threads.is_empty());
    assert!(stat_threads.iter().all(|id| *id != runtime_thread));
    Ok(())
}
