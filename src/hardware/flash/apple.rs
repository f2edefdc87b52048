use std::error::Error;

use objc2::rc::Retained;
use objc2_av_foundation::{AVCaptureDevice, AVCaptureTorchMode, AVMediaTypeVideo};
use objc2_foundation::{NSError, NSString};

use super::{CameraService, CameraServiceError};

/// AVFoundation capture devices, addressed by their `uniqueID`.
#[derive(Debug, Clone)]
pub struct OsCameraService;

impl OsCameraService {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        if unsafe { AVMediaTypeVideo }.is_none() {
            return Err("AVMediaTypeVideo not available".into());
        }
        Ok(OsCameraService)
    }

    fn device(id: &str) -> Result<Retained<AVCaptureDevice>, CameraServiceError> {
        unsafe { AVCaptureDevice::deviceWithUniqueID(&NSString::from_str(id)) }
            .ok_or_else(|| CameraServiceError::Other(format!("No capture device {}", id)))
    }

    fn access_error(error: Retained<NSError>) -> CameraServiceError {
        CameraServiceError::Access(error.localizedDescription().to_string())
    }
}

impl CameraService for OsCameraService {
    #[allow(deprecated)]
    fn camera_ids(&self) -> Result<Vec<String>, CameraServiceError> {
        let media_type = unsafe { AVMediaTypeVideo }
            .ok_or_else(|| CameraServiceError::Other("AVMediaTypeVideo not available".into()))?;
        let devices = unsafe { AVCaptureDevice::devicesWithMediaType(media_type) };
        Ok(devices.iter().map(|device| unsafe { device.uniqueID() }.to_string()).collect())
    }

    fn flash_available(&self, id: &str) -> Result<bool, CameraServiceError> {
        let device = Self::device(id)?;
        Ok(unsafe { device.hasTorch() && device.isTorchModeSupported(AVCaptureTorchMode::On) })
    }

    fn set_torch_mode(&self, id: &str, on: bool) -> Result<(), CameraServiceError> {
        let device = Self::device(id)?;
        unsafe {
            device.lockForConfiguration().map_err(Self::access_error)?;
            let result = if on {
                device.setTorchModeOnWithLevel_error(1.0).map_err(Self::access_error)
            } else {
                device.setTorchMode(AVCaptureTorchMode::Off);
                Ok(())
            };
            device.unlockForConfiguration();
            result
        }
    }
}
