// Privileged writes through the desktop's polkit agent
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::error::ElevateError;

pub const DEFAULT_ELEVATOR: &str = "pkexec";

/// Writes a value to a path on the caller's behalf with elevated rights.
#[async_trait]
pub trait Elevator: Send + Sync {
    async fn write(&self, path: &Path, value: &str) -> Result<(), ElevateError>;
}

/// Runs `<program> tee <path>` with the value on stdin.
///
/// With `pkexec` this shows the graphical authentication prompt when needed.
#[derive(Debug, Clone)]
pub struct Pkexec {
    program: String,
}

impl Default for Pkexec {
    fn default() -> Self {
        Self::new(DEFAULT_ELEVATOR)
    }
}

impl Pkexec {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl Elevator for Pkexec {
    async fn write(&self, path: &Path, value: &str) -> Result<(), ElevateError> {
        let mut child = Command::new(&self.program)
            .arg("tee")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // A timed-out write drops this future; take the child with it
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ElevateError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            match stdin.write_all(value.as_bytes()).await {
                Ok(()) => {}
                // Helper already gone; its exit status tells the story
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {
                    tracing::debug!("{} closed stdin early", self.program);
                }
                Err(e) => return Err(ElevateError::Stdin(e)),
            }
            // tee only exits once stdin is closed
            drop(stdin);
        }

        let output = child.wait_with_output().await.map_err(|source| ElevateError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ElevateError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // `env tee <path>` behaves like `pkexec tee <path>` without the prompt
    #[tokio::test]
    async fn stand_in_program_writes_through_tee() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fan_mode");
        std::fs::write(&path, "0").unwrap();

        Pkexec::new("env").write(&path, "2").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "2");
    }

    #[tokio::test]
    async fn nonzero_exit_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fn_lock");

        let err = Pkexec::new("false").write(&path, "1").await.unwrap_err();
        assert!(matches!(err, ElevateError::Exit { .. }), "{err}");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let err = Pkexec::new("lg-gram-no-such-helper")
            .write(Path::new("/nonexistent"), "1")
            .await
            .unwrap_err();
        assert!(matches!(err, ElevateError::Spawn { .. }), "{err}");
    }
}
