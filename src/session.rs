//! Interactive capture session: key dispatch and the main loop.
//!
//! The session owns a single piece of mutable state, the currently
//! selected subject. Keys map to four actions: capture, toggle subject,
//! preview, quit. A failed capture is reported and the loop keeps going.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::camera::{Camera, CameraError};
use crate::library::ImageLibrary;
use crate::metadata::{CaptureRecord, MetadataError, MetadataLog};
use crate::terminal;

/// How long one key poll blocks before the loop rechecks the Ctrl+C flag.
const KEY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// What a keypress asks the session to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Photograph the current subject
    Capture,
    /// Flip between the two subjects
    ToggleSubject,
    /// Launch a fixed-duration live preview
    Preview,
    /// Leave the session loop
    Quit,
    /// Anything else
    Ignore,
}

/// Map a key event to a session action.
///
/// ESC or Ctrl+C quit, SPACE captures, D toggles, P previews; every other
/// key is ignored.
pub fn action_for_key(event: &KeyEvent) -> Action {
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        return match event.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Action::Quit,
            _ => Action::Ignore,
        };
    }
    match event.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Char(' ') => Action::Capture,
        KeyCode::Char('d') | KeyCode::Char('D') => Action::ToggleSubject,
        KeyCode::Char('p') | KeyCode::Char('P') => Action::Preview,
        _ => Action::Ignore,
    }
}

/// The session's one mutable field: which of the two subjects is current.
/// Resets to the first subject every program start.
#[derive(Debug, Clone)]
pub struct SessionState {
    subjects: [String; 2],
    current: usize,
}

impl SessionState {
    pub fn new(subjects: [String; 2]) -> Self {
        SessionState {
            subjects,
            current: 0,
        }
    }

    pub fn current_subject(&self) -> &str {
        &self.subjects[self.current]
    }

    pub fn other_subject(&self) -> &str {
        &self.subjects[1 - self.current]
    }

    /// Flip to the other subject and return the new current name.
    pub fn toggle_subject(&mut self) -> &str {
        self.current = 1 - self.current;
        self.current_subject()
    }
}

/// Errors that end the session loop. Capture failures are not among them;
/// they are reported inline and the loop continues.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Camera(#[from] CameraError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Global flag for handling Ctrl+C across the session.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

/// Check if Ctrl+C has been received.
pub fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

/// Set up the Ctrl+C handler. Called once at program startup.
pub fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
    })
}

/// An interactive capture session over a camera, an image library, and
/// the metadata log.
pub struct Session {
    state: SessionState,
    camera: Camera,
    library: ImageLibrary,
    metadata: MetadataLog,
}

impl Session {
    pub fn new(
        state: SessionState,
        camera: Camera,
        library: ImageLibrary,
        metadata: MetadataLog,
    ) -> Self {
        Session {
            state,
            camera,
            library,
            metadata,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Run the key loop until ESC, Ctrl+C, or an interrupt signal.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            if ctrlc_received() {
                println!("\nInterrupted, exiting.");
                return Ok(());
            }

            let Some(key) = terminal::read_key(KEY_POLL_INTERVAL)? else {
                continue;
            };

            match action_for_key(&key) {
                Action::Quit => {
                    println!("Exiting.");
                    return Ok(());
                }
                Action::Capture => match self.try_capture() {
                    Ok(path) => println!("Saved: {}", path.display()),
                    Err(e) => eprintln!("Capture failed: {}", e),
                },
                Action::ToggleSubject => {
                    println!("Switched to: {}", self.state.toggle_subject());
                }
                Action::Preview => match self.camera.spawn_preview() {
                    Ok(child) => {
                        log::debug!("preview running, pid {}", child.id());
                        println!("Preview for {}s...", self.camera.preview_secs());
                        // Fire and forget: the child is dropped, not waited on.
                    }
                    Err(e) => eprintln!("Preview failed: {}", e),
                },
                Action::Ignore => {}
            }
        }
    }

    /// Capture the current subject: pick the next filename, run the
    /// capture command, and log the metadata row. Nothing is logged when
    /// the capture command fails.
    pub fn try_capture(&mut self) -> Result<PathBuf, SessionError> {
        let subject = self.state.current_subject().to_string();
        let (filename, path) = self.library.next_image_path(&subject)?;

        self.camera.capture(&path)?;

        let record = CaptureRecord::new(&subject, &filename, &path);
        self.metadata.append(&record)?;
        Ok(path)
    }
}
