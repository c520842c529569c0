//! Remote host boundary
//!
//! The harness runs in the control process and only ever talks to the
//! benchmark host through this trait: push a file, run a command, read its
//! output. Provisioning the host itself belongs to the outer harness.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;

/// Errors from remote host operations
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("failed to launch {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("remote command exited with status {status}: {stderr}")]
    Failed { status: i32, stderr: String },
}

/// Captured output of a completed remote command.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A host the harness can push files to and run commands on.
#[async_trait]
pub trait RemoteHost: Send + Sync {
    /// Run a shell command on the host and wait for it to complete.
    async fn command(&self, cmd: &str) -> Result<CommandOutput, RemoteError>;

    /// Copy a local file onto the host.
    async fn push_file(&self, local: &Path, remote: &str) -> Result<(), RemoteError>;

    /// Install a system package on the host.
    async fn install(&self, package: &str) -> Result<(), RemoteError> {
        self.command(&format!("sudo apt-get install -y {}", package))
            .await?;
        Ok(())
    }

    /// Run a command, logging and discarding any failure. Used for cleanup
    /// steps that must never block the benchmark result.
    async fn command_ignore_failure(&self, cmd: &str) {
        if let Err(err) = self.command(cmd).await {
            tracing::warn!("ignoring failed command {:?}: {}", cmd, err);
        }
    }
}

/// Remote host reached over `ssh`/`scp`.
#[derive(Debug, Clone)]
pub struct SshHost {
    target: String,
    ssh: PathBuf,
    scp: PathBuf,
}

impl SshHost {
    /// Host addressed as `user@host` (or an ssh config alias).
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ssh: PathBuf::from("ssh"),
            scp: PathBuf::from("scp"),
        }
    }

    async fn run(&self, program: &Path, args: &[&str]) -> Result<CommandOutput, RemoteError> {
        tracing::debug!("{} {}", program.display(), args.join(" "));
        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| RemoteError::Spawn {
                command: format!("{} {}", program.display(), args.join(" ")),
                source,
            })?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        if !output.status.success() {
            return Err(RemoteError::Failed {
                status: output.status.code().unwrap_or(-1),
                stderr,
            });
        }
        Ok(CommandOutput { stdout, stderr })
    }
}

#[async_trait]
impl RemoteHost for SshHost {
    async fn command(&self, cmd: &str) -> Result<CommandOutput, RemoteError> {
        self.run(&self.ssh, &[&self.target, cmd]).await
    }

    async fn push_file(&self, local: &Path, remote: &str) -> Result<(), RemoteError> {
        let local = local.display().to_string();
        let destination = format!("{}:{}", self.target, remote);
        self.run(&self.scp, &[&local, &destination]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_ssh_binary_is_spawn_error() {
        let mut host = SshHost::new("bench@example");
        host.ssh = PathBuf::from("/nonexistent/ssh");
        let err = host.command("true").await.unwrap_err();
        assert!(matches!(err, RemoteError::Spawn { .. }));
    }
}
