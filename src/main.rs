//! qrscan binary: wires the scan pipeline to a minimal headless presenter.
//!
//! There is no command-line surface; behavior is controlled by the config
//! file and `RUST_LOG`. Newly decoded payloads are printed as they appear,
//! Ctrl+C shuts the scanner down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::Duration;

use qrscan::camera::list_devices;
use qrscan::clipboard::{copy_payloads, SystemClipboard};
use qrscan::config::Config;
use qrscan::presenter::{channel_presenter, ScanEvent};
use qrscan::scanner::Scanner;
use qrscan::session::ScanSession;

/// Global flag for handling Ctrl+C across the application
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn ctrlc_received() -> bool {
    CTRLC_RECEIVED.load(Ordering::SeqCst)
}

fn setup_ctrlc_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(move || {
        CTRLC_RECEIVED.store(true, Ordering::SeqCst);
        eprintln!("\nReceived Ctrl+C, shutting down...");
    })
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load(None)?;
    setup_ctrlc_handler()?;

    match list_devices() {
        Ok(devices) => {
            for device in &devices {
                log::info!("Found camera: {}", device);
            }
        }
        Err(e) => log::warn!("Could not enumerate cameras: {}", e),
    }

    let mut clipboard = if config.scanner.auto_copy {
        match SystemClipboard::new() {
            Ok(clipboard) => Some(clipboard),
            Err(e) => {
                log::warn!("Clipboard unavailable, auto-copy disabled: {}", e);
                None
            }
        }
    } else {
        None
    };

    let session = Arc::new(ScanSession::new());
    let (presenter, frame_slot, events) = channel_presenter();

    let mut scanner = Scanner::start(
        config.camera_settings(),
        Arc::clone(&session),
        presenter,
        config.pacing(),
    );

    println!("Scanning for QR codes. Press Ctrl+C to stop.");

    while !ctrlc_received() {
        match events.recv_timeout(Duration::from_millis(50)) {
            Ok(ScanEvent::Records(records)) => {
                session.append(&records);
                for record in &records {
                    println!("{}", record);
                }
                if let Some(clipboard) = clipboard.as_mut() {
                    if let Err(e) = copy_payloads(&records, clipboard) {
                        log::warn!("Auto-copy failed: {}", e);
                    }
                }
            }
            Ok(ScanEvent::Error(message)) => {
                eprintln!("{}", message);
                break;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        // Drain the latest frame; a windowed presenter would render it here
        if let Some(image) = frame_slot.take() {
            log::trace!("Frame ready for display: {}x{}", image.width(), image.height());
        }
    }

    scanner.stop();
    println!("Captured {} unique code(s).", session.record_count());

    Ok(())
}
