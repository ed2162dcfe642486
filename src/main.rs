mod camera;
mod config;
mod library;
mod metadata;
mod session;
mod terminal;

use camera::Camera;
use clap::Parser;
use library::ImageLibrary;
use metadata::MetadataLog;
use session::{Session, SessionError, SessionState};
use std::path::PathBuf;

/// dogcam: Interactive dog photo capture for an attached camera
#[derive(Parser)]
#[command(name = "dogcam")]
#[command(version, about = "Interactive dog photo capture for an attached camera")]
#[command(long_about = "Photograph two dogs with an attached camera, one keypress at a \
    time. SPACE captures a still for the current dog, D switches dogs, P opens a short \
    live preview, ESC quits. Every saved photo is appended to a CSV metadata log.")]
struct Cli {
    /// Custom config file path (default: ~/.config/dogcam/config.toml)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,
}

/// Display the startup banner with the current settings and key bindings.
fn print_startup_status(session: &Session, library: &ImageLibrary, preview_secs: u32) {
    println!("dogcam v{}", env!("CARGO_PKG_VERSION"));
    println!("Saving to: {}", library.root().display());
    println!();
    println!("  [SPACE]  capture '{}'", session.state().current_subject());
    println!(
        "  [D]      switch between '{}' and '{}'",
        session.state().current_subject(),
        session.state().other_subject()
    );
    println!("  [P]      live preview ({}s)", preview_secs);
    println!("  [ESC]    quit");
    println!();
}

fn run(cfg: config::Config) -> Result<(), SessionError> {
    let library = ImageLibrary::new(&cfg.library.root);
    library.ensure_dirs(&cfg.library.subjects)?;

    let camera = Camera::from_config(&cfg.camera);
    let metadata = MetadataLog::new(library.metadata_path());
    let state = SessionState::new(cfg.library.subjects.clone());
    let mut session = Session::new(state, camera, library.clone(), metadata);

    if let Err(e) = session::setup_ctrlc_handler() {
        eprintln!("Warning: Could not set up Ctrl+C handler: {}", e);
    }

    print_startup_status(&session, &library, cfg.camera.preview_timeout_ms / 1000);
    session.run()
}

fn main() {
    let cli = Cli::parse();

    let cfg = match config::Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
