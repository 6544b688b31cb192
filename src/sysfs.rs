//! Read/write access to the driver's sysfs attributes.
//!
//! Writes are attempted directly first. Only a permission-denied error from
//! that attempt sends the value through the privileged [`Elevator`]; any other
//! failure is reported as-is.

use std::fmt::Display;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::dispatch::UiHandle;
use crate::elevate::Elevator;
use crate::error::ElevateError;
use crate::types::WriteOutcome;

/// Upper bound on one privileged write, authentication prompt included.
pub const PRIVILEGED_WRITE_TIMEOUT: Duration = Duration::from_secs(60);

pub fn path_exists(path: &Path) -> bool {
    path.exists()
}

/// Prefers `primary`, falls back to `alternate`, and returns `primary` when
/// neither exists so later reads and writes fail on the expected path.
pub fn resolve_path(primary: &Path, alternate: &Path) -> PathBuf {
    if path_exists(primary) {
        primary.to_path_buf()
    } else if path_exists(alternate) {
        tracing::debug!("Using alternate path {:?}", alternate);
        alternate.to_path_buf()
    } else {
        primary.to_path_buf()
    }
}

/// Current value with surrounding whitespace removed, or `None` when the
/// attribute cannot be read.
pub fn read(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(s) => Some(s.trim().to_string()),
        Err(e) => {
            tracing::warn!("Error reading {:?}: {}", path, e);
            None
        }
    }
}

pub fn driver_loaded(dir: &Path) -> bool {
    dir.is_dir()
}

fn write_direct(path: &Path, value: &str) -> io::Result<()> {
    // sysfs attributes always exist; never create a regular file in their place
    let mut f = OpenOptions::new().write(true).truncate(true).open(path)?;
    f.write_all(value.as_bytes())?;
    f.flush()
}

/// Handler run on the UI thread once a write has a result.
pub struct Completion<T> {
    ui: UiHandle<T>,
    handler: Box<dyn FnOnce(&mut T, WriteOutcome) + Send>,
}

impl<T: 'static> Completion<T> {
    pub fn new(ui: &UiHandle<T>, handler: impl FnOnce(&mut T, WriteOutcome) + Send + 'static) -> Self {
        Self {
            ui: ui.clone(),
            handler: Box::new(handler),
        }
    }

    fn deliver(self, outcome: WriteOutcome) {
        let handler = self.handler;
        self.ui.post(move |target| handler(target, outcome));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    /// Result known immediately; the completion is already queued.
    Finished(WriteOutcome),
    /// A privileged write is in flight; the completion arrives later.
    Escalated,
}

#[derive(Clone)]
pub struct Gateway {
    runtime: Handle,
    elevator: Arc<dyn Elevator>,
    timeout: Duration,
}

impl Gateway {
    pub fn new(runtime: Handle, elevator: Arc<dyn Elevator>) -> Self {
        Self {
            runtime,
            elevator,
            timeout: PRIVILEGED_WRITE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Writes `value` and reports through `completion` on the UI thread.
    ///
    /// Never blocks on the privileged helper: that step runs on the runtime.
    pub fn write<T: 'static>(&self, path: &Path, value: impl Display, completion: Completion<T>) -> WriteStatus {
        let value = value.to_string();
        let direct = write_direct(path, &value);
        self.finish(path, value, direct, completion)
    }

    /// Writes `value` and waits for the result, including any privileged
    /// helper run. Must not be called from a runtime worker thread.
    pub fn write_blocking(&self, path: &Path, value: impl Display) -> WriteOutcome {
        let value = value.to_string();
        let direct = write_direct(path, &value);
        self.finish_blocking(path, &value, direct)
    }

    fn finish<T: 'static>(
        &self,
        path: &Path,
        value: String,
        direct: io::Result<()>,
        completion: Completion<T>,
    ) -> WriteStatus {
        match direct {
            Ok(()) => {
                tracing::info!("Wrote {} to {:?}", value, path);
                let outcome = WriteOutcome::direct(true);
                completion.deliver(outcome);
                WriteStatus::Finished(outcome)
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                let elevator = self.elevator.clone();
                let timeout = self.timeout;
                let path = path.to_path_buf();
                self.runtime.spawn(async move {
                    let ok = run_privileged(elevator.as_ref(), &path, &value, timeout).await;
                    completion.deliver(WriteOutcome::privileged(ok));
                });
                WriteStatus::Escalated
            }
            Err(e) => {
                tracing::warn!("Error writing to {:?}: {}", path, e);
                let outcome = WriteOutcome::direct(false);
                completion.deliver(outcome);
                WriteStatus::Finished(outcome)
            }
        }
    }

    fn finish_blocking(&self, path: &Path, value: &str, direct: io::Result<()>) -> WriteOutcome {
        match direct {
            Ok(()) => {
                tracing::info!("Wrote {} to {:?}", value, path);
                WriteOutcome::direct(true)
            }
            Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                let ok = self
                    .runtime
                    .block_on(run_privileged(self.elevator.as_ref(), path, value, self.timeout));
                WriteOutcome::privileged(ok)
            }
            Err(e) => {
                tracing::warn!("Error writing to {:?}: {}", path, e);
                WriteOutcome::direct(false)
            }
        }
    }
}

async fn run_privileged(elevator: &dyn Elevator, path: &Path, value: &str, timeout: Duration) -> bool {
    tracing::debug!("Permission denied on {:?}, escalating", path);
    let result = match tokio::time::timeout(timeout, elevator.write(path, value)).await {
        Ok(r) => r,
        Err(_) => Err(ElevateError::Timeout(timeout)),
    };
    match result {
        Ok(()) => {
            tracing::info!("Wrote {} to {:?} with elevated rights", value, path);
            true
        }
        Err(ElevateError::Timeout(t)) => {
            tracing::warn!("Timeout writing to {:?} after {:?}", path, t);
            false
        }
        Err(e) => {
            tracing::warn!("Privileged write to {:?} failed: {}", path, e);
            false
        }
    }
}
