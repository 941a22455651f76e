#![allow(dead_code)]

use std::path::PathBuf;

pub use plotvisor_test_utils::builders;
pub use plotvisor_test_utils::rows;
pub use plotvisor_test_utils::{init_tracing, with_timeout};

/// Path of a file under `demos/`.
pub fn demo_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join(name)
}

pub const GIB: u64 = 1024 * 1024 * 1024;
