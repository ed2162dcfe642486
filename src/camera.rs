//! External camera command invocation.
//!
//! Capture is delegated to an external still-image tool (libcamera-still
//! by default) run synchronously; preview launches a detached process
//! that is never waited on.

use std::path::Path;
use std::process::{Child, Command, Stdio};

use crate::config::CameraConfig;

/// Errors that can occur while driving the external camera commands.
#[derive(Debug, thiserror::Error)]
pub enum CameraError {
    #[error("Camera command '{command}' not found. Install the libcamera apps or point [camera] still_command/preview_command at your capture tool.")]
    CommandNotFound { command: String },

    #[error("Failed to run '{command}': {source}")]
    SpawnFailed {
        command: String,
        source: std::io::Error,
    },

    #[error("Capture command exited with code {exit_code:?}\n{stderr}")]
    CaptureFailed {
        exit_code: Option<i32>,
        stderr: String,
    },
}

/// Handle on the configured external camera commands.
#[derive(Debug, Clone)]
pub struct Camera {
    still_command: String,
    preview_command: String,
    width: u32,
    height: u32,
    capture_timeout_ms: u32,
    preview_timeout_ms: u32,
}

impl Camera {
    pub fn from_config(config: &CameraConfig) -> Self {
        Camera {
            still_command: config.still_command.clone(),
            preview_command: config.preview_command.clone(),
            width: config.width,
            height: config.height,
            capture_timeout_ms: config.capture_timeout_ms,
            preview_timeout_ms: config.preview_timeout_ms,
        }
    }

    /// Seconds a preview window stays open, for status output.
    pub fn preview_secs(&self) -> u32 {
        self.preview_timeout_ms / 1000
    }

    /// Arguments passed to the still-capture command for a given output path.
    pub fn still_args(&self, output: &Path) -> Vec<String> {
        vec![
            "--output".to_string(),
            output.display().to_string(),
            "--timeout".to_string(),
            self.capture_timeout_ms.to_string(),
            "--width".to_string(),
            self.width.to_string(),
            "--height".to_string(),
            self.height.to_string(),
        ]
    }

    /// Capture one still image to `output`, blocking until the command
    /// exits. A non-zero exit status is reported with the command's
    /// captured stderr; the caller decides whether to keep going.
    pub fn capture(&self, output: &Path) -> Result<(), CameraError> {
        log::debug!("capturing to {}", output.display());

        let result = Command::new(&self.still_command)
            .args(self.still_args(output))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| self.spawn_error(&self.still_command, e))?;

        if result.status.success() {
            Ok(())
        } else {
            Err(CameraError::CaptureFailed {
                exit_code: result.status.code(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            })
        }
    }

    /// Launch a fixed-duration live preview and return immediately.
    ///
    /// The child is deliberately detached: nothing waits on it, and it may
    /// compete with a subsequent capture for the camera device. The
    /// command's own `--timeout` bounds its lifetime.
    pub fn spawn_preview(&self) -> Result<Child, CameraError> {
        Command::new(&self.preview_command)
            .args(["--timeout", &self.preview_timeout_ms.to_string()])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| self.spawn_error(&self.preview_command, e))
    }

    fn spawn_error(&self, command: &str, e: std::io::Error) -> CameraError {
        if e.kind() == std::io::ErrorKind::NotFound {
            CameraError::CommandNotFound {
                command: command.to_string(),
            }
        } else {
            CameraError::SpawnFailed {
                command: command.to_string(),
                source: e,
            }
        }
    }
}
