//! Discovery of cameras usable for scanning.

use nokhwa::query;
use nokhwa::utils::ApiBackend;

use super::types::{CameraError, CameraInfo};

/// Enumerate the cameras the scanner could read from.
///
/// An empty vector means no device is attached; only a failure to talk to
/// the camera backend is an error. The binary logs this list at startup so
/// a wrong `device` config value is easy to diagnose.
pub fn list_devices() -> Result<Vec<CameraInfo>, CameraError> {
    let devices = query(ApiBackend::Auto).map_err(|e| CameraError::QueryFailed(e.to_string()))?;

    Ok(devices
        .into_iter()
        .map(|d| CameraInfo {
            index: d.index().as_index().unwrap_or(0),
            name: d.human_name(),
            description: d.description().to_string(),
        })
        .collect())
}

/// Look up the device the scan session is configured to use.
///
/// # Errors
/// * `CameraError::DeviceNotFound` - no camera is attached at `index`
pub fn find_device(index: u32) -> Result<CameraInfo, CameraError> {
    list_devices()?
        .into_iter()
        .find(|d| d.index == index)
        .ok_or(CameraError::DeviceNotFound(index))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_devices_tolerates_absent_cameras() {
        // No attached camera yields an empty list, not an error
        assert!(list_devices().is_ok());
    }

    #[test]
    fn test_find_device_rejects_bogus_index() {
        match find_device(u32::MAX) {
            Err(CameraError::DeviceNotFound(idx)) => assert_eq!(idx, u32::MAX),
            Err(CameraError::QueryFailed(_)) => {
                // Acceptable on systems without a camera backend at all
            }
            other => panic!("Expected DeviceNotFound, got {:?}", other),
        }
    }
}
