//! Environment manager invocation
//!
//! Runs `<tool> exec <project-dir> <noop-command>` with the force-reload
//! variable set, so the tool rebuilds its cache as a side effect.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tokio::process::Command;

use crate::config::ReloadConfig;

/// A fully assembled forced-reload invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceReload {
    program: String,
    tool_args: Vec<String>,
    project_dir: PathBuf,
    noop: Vec<String>,
    force_variable: String,
    force_value: String,
}

impl ForceReload {
    pub fn from_config(config: &ReloadConfig) -> Result<Self, SpawnError> {
        let (program, tool_args) = parse_command(&config.tool)?;
        let noop = shlex::split(&config.noop_command)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| SpawnError::InvalidCommand(config.noop_command.clone()))?;

        Ok(Self {
            program,
            tool_args,
            project_dir: config.project_dir.clone(),
            noop,
            force_variable: config.force_variable.clone(),
            force_value: config.force_value.clone(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Shell-quoted rendering of the invocation, for logs and dry runs
    pub fn display(&self) -> String {
        let mut parts = vec![
            format!("{}={}", self.force_variable, self.force_value),
            self.program.clone(),
        ];
        parts.extend(self.tool_args.iter().cloned());
        parts.push("exec".to_string());
        parts.push(self.project_dir.display().to_string());
        parts.extend(self.noop.iter().cloned());

        shlex::try_join(parts.iter().map(String::as_str)).unwrap_or_else(|_| parts.join(" "))
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.tool_args)
            .arg("exec")
            .arg(&self.project_dir)
            .args(&self.noop)
            .env(&self.force_variable, &self.force_value);
        cmd
    }

    /// Run the tool and wait for it, inheriting stdio
    pub async fn run(&self) -> Result<(), SpawnError> {
        log::info!("Running {}", self.display());

        let status = self.command().status().await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                SpawnError::NotFound(self.program.clone())
            } else {
                SpawnError::Spawn {
                    program: self.program.clone(),
                    source: e,
                }
            }
        })?;

        if !status.success() {
            return Err(SpawnError::Failed {
                program: self.program.clone(),
                status,
            });
        }

        log::debug!("{} exec finished successfully", self.program);
        Ok(())
    }
}

/// Parse a command line into program and arguments
fn parse_command(cmd: &str) -> Result<(String, Vec<String>), SpawnError> {
    let parts = shlex::split(cmd).ok_or_else(|| SpawnError::InvalidCommand(cmd.to_string()))?;

    let Some((program, args)) = parts.split_first() else {
        return Err(SpawnError::InvalidCommand(cmd.to_string()));
    };

    Ok((program.clone(), args.to_vec()))
}

#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("{0}: command not found")]
    NotFound(String),

    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} exec failed ({status})")]
    Failed { program: String, status: ExitStatus },
}

impl SpawnError {
    /// Exit code a shell would report for this failure
    pub fn exit_code(&self) -> i32 {
        match self {
            SpawnError::NotFound(_) => 127,
            SpawnError::Failed { status, .. } => status.code().filter(|c| *c != 0).unwrap_or(1),
            SpawnError::InvalidCommand(_) | SpawnError::Spawn { .. } => 1,
        }
    }
}
