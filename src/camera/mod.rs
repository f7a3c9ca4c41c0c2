//! Camera capture module for webcam access and frame acquisition.
//!
//! This module provides the device-facing half of the scan pipeline:
//! - Device enumeration via [`list_devices`]
//! - On-demand frame acquisition via [`CameraSource`] (a [`FrameSource`])
//! - Configuration via [`CameraSettings`] and [`Resolution`]

mod device;
mod source;
mod types;

pub use device::{find_device, list_devices};
pub use source::{CameraSource, FrameSource};
pub use types::{CameraError, CameraInfo, CameraSettings, Frame, FrameFormat, Resolution};
