//! Presenter boundary between the capture thread and the presentation context.
//!
//! The scan loop publishes through the [`Presenter`] trait and never waits
//! for rendering. [`ChannelPresenter`] is the designed hand-off: the latest
//! frame lands in a last-write-wins slot, while records and errors ride an
//! unbounded channel so nothing is ever dropped from the visible list.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

use image::RgbImage;

use crate::record::DetectedCode;

/// Consumer of scan loop output. Implemented by the UI layer.
///
/// All methods are fire-and-forget from the capture loop's point of view.
pub trait Presenter: Send {
    /// Replace the displayed frame with a new one.
    fn show_frame(&self, image: RgbImage);

    /// Append newly-seen records to the visible list (never replaces
    /// prior records).
    fn append_records(&self, records: Vec<DetectedCode>);

    /// Surface a fatal capture error to the user.
    fn show_error(&self, message: &str);
}

/// Non-frame events delivered to the presentation context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// A batch of newly-seen records, in detection order.
    Records(Vec<DetectedCode>),
    /// A fatal capture error; the loop has already exited.
    Error(String),
}

/// Read side of the latest-frame slot.
///
/// Frames are last-write-wins: if the presentation context falls behind, it
/// only ever sees the most recent frame.
#[derive(Clone)]
pub struct FrameSlot {
    slot: Arc<Mutex<Option<RgbImage>>>,
}

impl FrameSlot {
    /// Take the most recent frame, if a new one arrived since the last call.
    pub fn take(&self) -> Option<RgbImage> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Channel-backed [`Presenter`] for cross-thread hand-off.
pub struct ChannelPresenter {
    frame: Arc<Mutex<Option<RgbImage>>>,
    events: Sender<ScanEvent>,
}

/// Create a connected presenter, frame slot, and event receiver.
///
/// The presenter moves into the capture thread; the slot and receiver stay
/// with the presentation context.
pub fn channel_presenter() -> (ChannelPresenter, FrameSlot, Receiver<ScanEvent>) {
    let slot = Arc::new(Mutex::new(None));
    let (tx, rx) = mpsc::channel();
    let presenter = ChannelPresenter {
        frame: Arc::clone(&slot),
        events: tx,
    };
    (presenter, FrameSlot { slot }, rx)
}

impl Presenter for ChannelPresenter {
    fn show_frame(&self, image: RgbImage) {
        *self.frame.lock().unwrap_or_else(PoisonError::into_inner) = Some(image);
    }

    fn append_records(&self, records: Vec<DetectedCode>) {
        // Receiver gone means the UI is shutting down; nothing to do
        let _ = self.events.send(ScanEvent::Records(records));
    }

    fn show_error(&self, message: &str) {
        let _ = self.events.send(ScanEvent::Error(message.to_string()));
    }
}
