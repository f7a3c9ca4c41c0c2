//! Scan loop lifecycle management.
//!
//! [`Scanner`] owns the background thread running the capture/detect/dedup
//! loop. The camera is opened inside that thread, so a failed open is
//! reported through the presenter rather than panicking the caller, and
//! device handles never cross threads.

mod scan_loop;

pub use scan_loop::run_scan_loop;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::camera::{CameraSettings, CameraSource};
use crate::detect::QrDecoder;
use crate::presenter::Presenter;
use crate::session::ScanSession;

/// Default pacing interval between capture iterations (~16 fps).
///
/// A fixed delay decoupled from the device frame rate; a tunable, not a
/// correctness requirement.
pub const DEFAULT_PACING: Duration = Duration::from_millis(60);

/// Handle to a running scan loop.
///
/// Cancellation is cooperative: `request_stop` raises a shared flag that the
/// loop polls at the top of each iteration and during the pacing wait. There
/// is no forced interruption mid-frame.
pub struct Scanner {
    thread: Option<JoinHandle<()>>,
    stop: Arc<AtomicBool>,
}

impl Scanner {
    /// Spawn the scan loop on a background thread.
    ///
    /// The device is opened inside the spawned thread; open failure is
    /// surfaced once via `presenter.show_error` and the thread exits.
    pub fn start<P>(
        settings: CameraSettings,
        session: Arc<ScanSession>,
        presenter: P,
        pacing: Duration,
    ) -> Self
    where
        P: Presenter + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let loop_stop = Arc::clone(&stop);

        let thread = std::thread::spawn(move || {
            run_scan_loop(
                move || CameraSource::open(settings),
                QrDecoder::new(),
                session.registry(),
                &presenter,
                &loop_stop,
                pacing,
            );
            log::debug!("Scan loop exited");
        });

        Self {
            thread: Some(thread),
            stop,
        }
    }

    /// Signal the loop to stop without waiting for it.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    /// Signal the loop to stop and wait for the thread to finish.
    pub fn stop(&mut self) {
        self.request_stop();
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    /// Check if the scan thread is still running.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Scanner {
    fn drop(&mut self) {
        self.stop();
    }
}
