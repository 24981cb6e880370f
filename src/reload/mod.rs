//! Forced environment reload
//!
//! One strictly sequential run:
//! 1. check the project directory exists
//! 2. run the environment manager with the force-reload variable set
//! 3. touch the marker file
//! 4. copy the marker's timestamps onto every cache file
//!
//! The first failure aborts the rest. Timestamps already written are not
//! rolled back.

pub mod process;
pub mod timestamps;

pub use process::{ForceReload, SpawnError};
pub use timestamps::{Stamp, TimestampError};

use std::path::PathBuf;

use crate::config::ReloadConfig;

/// Outcome of a completed reload
#[derive(Debug, Clone)]
pub struct ReloadReport {
    pub marker: PathBuf,
    /// Timestamps stored on the marker and copied to every cache file
    pub stamp: Stamp,
    pub cache_files: Vec<PathBuf>,
}

/// What a reload would do, without doing it
#[derive(Debug, Clone)]
pub struct ReloadPlan {
    pub command: String,
    pub marker: PathBuf,
    pub cache_files: Vec<PathBuf>,
}

pub struct ReloadTrigger {
    config: ReloadConfig,
}

impl ReloadTrigger {
    pub fn new(config: ReloadConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReloadConfig {
        &self.config
    }

    pub fn check_project_dir(&self) -> Result<(), ReloadError> {
        if self.config.project_dir.is_dir() {
            return Ok(());
        }

        log::debug!(
            "Project directory {} not found",
            self.config.project_dir.display()
        );
        Err(ReloadError::DirectoryMissing {
            path: self.config.project_dir.clone(),
            tool: self.config.tool.clone(),
        })
    }

    /// Run the full reload sequence
    pub async fn run(&self) -> Result<ReloadReport, ReloadError> {
        self.check_project_dir()?;

        let reload = ForceReload::from_config(&self.config)?;
        reload.run().await?;

        let marker = self.config.marker_path();
        let stamp = timestamps::touch_now(&marker)?;
        log::info!("Touched {}", marker.display());

        let cache_files = timestamps::sync_cache_files(
            &self.config.cache_path(),
            &self.config.cache_suffix,
            stamp,
        )?;
        log::info!(
            "Synced {} cache file(s) in {}",
            cache_files.len(),
            self.config.cache_path().display()
        );

        Ok(ReloadReport {
            marker,
            stamp,
            cache_files,
        })
    }

    /// Describe the run without invoking the tool or touching anything
    ///
    /// The cache file list reflects the directory as it is now; the tool may
    /// create or remove cache files during a real run.
    pub fn plan(&self) -> Result<ReloadPlan, ReloadError> {
        self.check_project_dir()?;

        let reload = ForceReload::from_config(&self.config)?;
        let cache_files =
            timestamps::cache_files(&self.config.cache_path(), &self.config.cache_suffix)?;

        Ok(ReloadPlan {
            command: reload.display(),
            marker: self.config.marker_path(),
            cache_files,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReloadError {
    #[error(
        "Cannot find source directory; Did you move it?\n\
         (Looking for \"{}\")\n\
         Cannot force reload with this script - use \"{tool} reload\" manually and then try again",
        .path.display()
    )]
    DirectoryMissing { path: PathBuf, tool: String },

    #[error(transparent)]
    Spawn(#[from] SpawnError),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

impl ReloadError {
    /// Process exit code for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            ReloadError::DirectoryMissing { .. } => 1,
            ReloadError::Spawn(e) => e.exit_code(),
            ReloadError::Timestamp(_) => 1,
        }
    }
}
