//! The capture/detect/dedup loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::camera::{CameraError, FrameSource};
use crate::dedup::DedupRegistry;
use crate::detect::CodeDetector;
use crate::overlay;
use crate::presenter::Presenter;
use crate::record::DetectedCode;

/// Granularity of stop-flag polling during the pacing wait.
const STOP_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Run the scan loop until the stop flag is set.
///
/// `open` is invoked once, inside the calling thread, so device handles never
/// cross thread boundaries. If it fails the loop never starts: the error is
/// logged and surfaced through `presenter.show_error`.
///
/// Each iteration reads one frame, detects code regions, decodes each region
/// independently, filters payloads through the registry, draws every quad's
/// edges onto the frame, and publishes the annotated image plus any
/// newly-seen records. An empty frame skips straight to the pacing wait.
/// The source is released on every exit path.
pub fn run_scan_loop<S, D, P>(
    open: impl FnOnce() -> Result<S, CameraError>,
    mut detector: D,
    registry: &DedupRegistry,
    presenter: &P,
    stop: &AtomicBool,
    pacing: Duration,
) where
    S: FrameSource,
    D: CodeDetector,
    P: Presenter,
{
    let mut source = match open() {
        Ok(source) => source,
        Err(e) => {
            log::error!("Camera unavailable: {}", e);
            presenter.show_error("Failed to open camera.");
            return;
        }
    };

    while !stop.load(Ordering::Relaxed) {
        if let Some(mut frame) = source.read() {
            let quads = detector.detect_all(&frame);
            let mut fresh: Vec<DetectedCode> = Vec::new();

            for quad in &quads {
                if let Some(payload) = detector.decode(&frame, quad) {
                    // Blank payloads (empty or whitespace-only) never become
                    // records, whatever the detector hands back
                    if !payload.trim().is_empty() && registry.try_add(&payload) {
                        log::info!("New code: {}", payload);
                        fresh.push(DetectedCode::new(payload));
                    }
                }
                // Overlay drawing and decoding are independent outcomes of
                // the same detection
                overlay::draw_quad(&mut frame, quad, overlay::BORDER_COLOR);
            }

            match frame.to_rgb_image() {
                Some(image) => presenter.show_frame(image),
                None => log::warn!("Dropping corrupt frame ({}x{})", frame.width, frame.height),
            }
            if !fresh.is_empty() {
                presenter.append_records(fresh);
            }
        } else {
            log::trace!("Empty frame, skipping iteration");
        }

        if !wait_for_next_iteration(stop, pacing) {
            break;
        }
    }

    source.release();
}

/// Sleep for the pacing interval, polling the stop flag.
///
/// Returns `false` if cancellation fired during the wait.
fn wait_for_next_iteration(stop: &AtomicBool, pacing: Duration) -> bool {
    let deadline = Instant::now() + pacing;
    loop {
        if stop.load(Ordering::Relaxed) {
            return false;
        }
        let now = Instant::now();
        if now >= deadline {
            return true;
        }
        thread::sleep(STOP_POLL_INTERVAL.min(deadline - now));
    }
}
