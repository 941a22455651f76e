#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use plotvisor::config::PlotConfig;
use plotvisor::fs::mock::MockFileSystem;
use plotvisor::job::{PlotJob, PlotterCommand};

/// Builder for `PlotConfig` to simplify test setup.
pub struct PlotConfigBuilder {
    config: PlotConfig,
}

impl PlotConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: PlotConfig::default(),
        }
    }

    pub fn target(mut self, dir: &str) -> Self {
        self.config.target_directory.push(PathBuf::from(dir));
        self
    }

    pub fn temp(mut self, dir: &str) -> Self {
        self.config.temp_directory.push(PathBuf::from(dir));
        self
    }

    pub fn plots(mut self, n: u32) -> Self {
        self.config.number_of_plots = n;
        self
    }

    pub fn fingerprint(mut self, fp: &str) -> Self {
        self.config.fingerprint = fp.to_string();
        self
    }

    /// Render as the TOML document the store would read.
    pub fn to_toml(&self) -> String {
        let list = |dirs: &[PathBuf]| {
            dirs.iter()
                .map(|d| format!("{:?}", d.display().to_string()))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "target_directory = [{}]\ntemp_directory = [{}]\nnumber_of_plots = {}\nfingerprint = {:?}\n",
            list(&self.config.target_directory),
            list(&self.config.temp_directory),
            self.config.number_of_plots,
            self.config.fingerprint,
        )
    }

    pub fn build(self) -> PlotConfig {
        self.config
    }
}

impl Default for PlotConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `PlotJob`.
pub struct PlotJobBuilder {
    plot_id: u64,
    plot_dir: PathBuf,
    target_dir: PathBuf,
    fingerprint: String,
    plotter: Option<PlotterCommand>,
    fs: Option<MockFileSystem>,
}

impl PlotJobBuilder {
    pub fn new(plot_id: u64) -> Self {
        Self {
            plot_id,
            plot_dir: PathBuf::from("/plots/tmp"),
            target_dir: PathBuf::from("/plots/dst"),
            fingerprint: "1234567890".to_string(),
            plotter: None,
            fs: None,
        }
    }

    pub fn plot_dir(mut self, dir: &str) -> Self {
        self.plot_dir = PathBuf::from(dir);
        self
    }

    pub fn target_dir(mut self, dir: &str) -> Self {
        self.target_dir = PathBuf::from(dir);
        self
    }

    pub fn fingerprint(mut self, fp: &str) -> Self {
        self.fingerprint = fp.to_string();
        self
    }

    /// Run `script` through `sh -c` instead of the real plotter.
    ///
    /// The per-job arguments still get appended and show up as `$0`, `$1`
    /// and `$2` inside the script.
    pub fn script(mut self, script: &str) -> Self {
        self.plotter = Some(PlotterCommand::new("sh", ["-c", script]));
        self
    }

    pub fn plotter(mut self, plotter: PlotterCommand) -> Self {
        self.plotter = Some(plotter);
        self
    }

    pub fn filesystem(mut self, fs: MockFileSystem) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn build(self) -> PlotJob {
        let mut job = PlotJob::new(self.plot_id, self.plot_dir, self.target_dir, self.fingerprint);
        if let Some(plotter) = self.plotter {
            job = job.with_plotter(plotter);
        }
        if let Some(fs) = self.fs {
            job = job.with_filesystem(Arc::new(fs));
        }
        job
    }

    pub fn build_shared(self) -> Arc<PlotJob> {
        Arc::new(self.build())
    }
}
