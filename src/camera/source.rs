//! Frame acquisition from a physical camera device.

use std::time::Instant;

use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    CameraFormat, CameraIndex, FrameFormat as NokhwaFrameFormat, RequestedFormat,
    RequestedFormatType,
};
use nokhwa::Camera;

use super::device::find_device;
use super::types::{CameraError, CameraSettings, Frame, FrameFormat};

/// A source of raw image frames.
///
/// `read` is called repeatedly by the scan loop; returning `None` means the
/// device produced no usable frame this time and the iteration is skipped.
/// `release` is idempotent and safe to call at any point after construction.
pub trait FrameSource {
    /// Read the next frame, or `None` if the device stalled or the frame
    /// could not be converted.
    fn read(&mut self) -> Option<Frame>;

    /// Release the underlying device. Subsequent calls are no-ops.
    fn release(&mut self);
}

/// Camera-backed [`FrameSource`] using nokhwa.
///
/// The camera stream is opened eagerly by [`CameraSource::open`]; an open
/// failure means the device is unavailable and the scan loop never starts.
pub struct CameraSource {
    camera: Camera,
    released: bool,
}

impl CameraSource {
    /// Open the camera at `settings.device_index` and start its stream.
    ///
    /// # Errors
    /// * `CameraError::DeviceNotFound` - the device index does not exist
    /// * `CameraError::PermissionDenied` - camera access denied by the OS
    /// * `CameraError::OpenFailed` - the device could not be opened
    /// * `CameraError::StreamFailed` - the stream could not be started
    pub fn open(settings: CameraSettings) -> Result<Self, CameraError> {
        let info = find_device(settings.device_index)?;
        log::debug!("Opening {}", info);

        let index = CameraIndex::Index(settings.device_index);
        let mut camera = open_camera_with_fallback(&index, &settings)?;

        if let Err(e) = camera.open_stream() {
            return Err(CameraError::StreamFailed(e.to_string()));
        }

        let res = camera.resolution();
        log::info!(
            "Camera {} streaming at {}x{} @ {} fps",
            settings.device_index,
            res.width(),
            res.height(),
            camera.frame_rate()
        );

        Ok(Self {
            camera,
            released: false,
        })
    }
}

impl FrameSource for CameraSource {
    fn read(&mut self) -> Option<Frame> {
        if self.released {
            return None;
        }

        let buffer = match self.camera.frame() {
            Ok(buf) => buf,
            Err(e) => {
                log::trace!("Frame read failed, skipping iteration: {}", e);
                return None;
            }
        };

        rgb_frame(&buffer)
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        if let Err(e) = self.camera.stop_stream() {
            log::debug!("Stopping camera stream failed: {}", e);
        }
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}

/// Try to open a camera with multiple format fallback strategies.
fn open_camera_with_fallback(
    index: &CameraIndex,
    settings: &CameraSettings,
) -> Result<Camera, CameraError> {
    // Format strategies in order of preference:
    // 1. Closest match with MJPEG (widely supported, good compression)
    // 2. Closest match with YUYV (common uncompressed fallback)
    // 3. Highest resolution available (let the camera decide format)
    let requested_resolution =
        nokhwa::utils::Resolution::new(settings.resolution.width, settings.resolution.height);
    let format_attempts: Vec<RequestedFormat> = vec![
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::MJPEG,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(CameraFormat::new(
            requested_resolution,
            NokhwaFrameFormat::YUYV,
            settings.fps,
        ))),
        RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestResolution),
    ];

    let mut last_error = None;

    for requested in format_attempts {
        match Camera::new(index.clone(), requested) {
            Ok(cam) => return Ok(cam),
            Err(e) => {
                last_error = Some(e);
                continue;
            }
        }
    }

    let e = last_error.expect("at least one format attempt was made");
    let msg = e.to_string().to_lowercase();
    if msg.contains("permission")
        || msg.contains("denied")
        || msg.contains("authorization")
        || msg.contains("access")
    {
        Err(CameraError::PermissionDenied)
    } else {
        Err(CameraError::OpenFailed(e.to_string()))
    }
}

/// Build an RGB24 [`Frame`] from a native camera buffer.
///
/// `None` means this buffer could not be decoded (a truncated MJPEG frame,
/// for example) and counts as an empty read from the detector's point of view.
fn rgb_frame(buffer: &nokhwa::Buffer) -> Option<Frame> {
    let resolution = buffer.resolution();
    let decoded = match buffer.decode_image::<RgbFormat>() {
        Ok(image) => image,
        Err(e) => {
            log::debug!("Buffer decode failed: {}", e);
            return None;
        }
    };

    Some(Frame {
        width: resolution.width(),
        height: resolution.height(),
        data: decoded.into_raw(),
        format: FrameFormat::Rgb,
        timestamp: Instant::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_invalid_device() {
        // Use a device index that is very unlikely to exist
        let settings = CameraSettings {
            device_index: 999,
            ..CameraSettings::default()
        };
        match CameraSource::open(settings) {
            Err(CameraError::DeviceNotFound(idx)) => assert_eq!(idx, 999),
            Err(CameraError::QueryFailed(_)) => {
                // Acceptable on systems without a camera backend at all
            }
            other => panic!("Expected DeviceNotFound, got {:?}", other.map(|_| ())),
        }
    }
}
