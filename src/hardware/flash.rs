use std::fmt::Debug;
use std::sync::Arc;

use thiserror::Error;

#[cfg(any(target_os = "ios", target_os = "macos"))]
mod apple;
#[cfg(any(target_os = "ios", target_os = "macos"))]
pub use apple::OsCameraService;

#[cfg(target_os = "android")]
mod android;
#[cfg(target_os = "android")]
pub use android::OsCameraService;

#[cfg(test)]
pub(crate) mod mock;

// Cross platform torch (flashlight) control.

// System:

// <Android>>>: CameraManager over JNI, the first camera whose characteristics report FLASH_INFO_AVAILABLE owns the torch.

// <iOS & macOS>>>: AVCaptureDevice, the first capture device with hasTorch owns the torch.

// <Linux & Windows>>>: No camera service, the controller reports no flash.

/// Error reported by a platform camera service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CameraServiceError {
    /// The platform refused access to the camera device.
    #[error("{0}")]
    Access(String),
    #[error("{0}")]
    Other(String),
}

/// Platform camera subsystem the torch controller borrows from the host.
pub trait CameraService: Send + Sync {
    fn camera_ids(&self) -> Result<Vec<String>, CameraServiceError>;

    /// Whether the device advertises a flash unit. A missing characteristic counts as `false`.
    fn flash_available(&self, id: &str) -> Result<bool, CameraServiceError>;

    fn set_torch_mode(&self, id: &str, on: bool) -> Result<(), CameraServiceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlashError {
    #[error("Device does not have flash capability")]
    NoFlashCapability,
    #[error("Camera not available")]
    CameraUnavailable,
    #[error("Camera access error: {0}")]
    CameraAccess(String),
    #[error("Flash error: {0}")]
    Generic(String),
}

impl FlashError {
    pub const CODE: &'static str = "FLASH_ERROR";

    pub fn code(&self) -> &'static str {
        Self::CODE
    }
}

impl From<CameraServiceError> for FlashError {
    fn from(error: CameraServiceError) -> Self {
        match error {
            CameraServiceError::Access(detail) => FlashError::CameraAccess(detail),
            CameraServiceError::Other(detail) => FlashError::Generic(detail),
        }
    }
}

/// Torch controller bound to the first flash capable camera.
///
/// The device scan runs once in [`TorchController::new`] and is never repeated.
/// Clones share the same camera service handle and scan result.
#[derive(Clone)]
pub struct TorchController {
    service: Option<Arc<dyn CameraService>>,
    camera_id: Option<String>,
    has_flash: bool,
}

impl TorchController {
    pub fn new(service: Option<Arc<dyn CameraService>>) -> Self {
        let mut controller = TorchController { service, camera_id: None, has_flash: false };
        controller.initialize();
        controller
    }

    /// Controller backed by the camera service of the current platform.
    pub fn platform() -> Self {
        Self::new(Self::platform_service())
    }

    #[cfg(any(target_os = "ios", target_os = "macos", target_os = "android"))]
    fn platform_service() -> Option<Arc<dyn CameraService>> {
        match OsCameraService::new() {
            Ok(service) => Some(Arc::new(service)),
            Err(e) => {
                log::warn!("Camera service unavailable: {}", e);
                None
            }
        }
    }

    #[cfg(not(any(target_os = "ios", target_os = "macos", target_os = "android")))]
    fn platform_service() -> Option<Arc<dyn CameraService>> {
        log::debug!("No camera service on this platform");
        None
    }

    fn initialize(&mut self) {
        let Some(service) = self.service.as_ref() else { return };
        match Self::find_flash_camera(service.as_ref()) {
            Ok(Some(id)) => {
                log::info!("Torch bound to camera {}", id);
                self.camera_id = Some(id);
                self.has_flash = true;
            }
            Ok(None) => log::info!("No camera with flash capability"),
            Err(e) => log::warn!("Camera scan aborted: {}", e),
        }
    }

    fn find_flash_camera(service: &dyn CameraService) -> Result<Option<String>, CameraServiceError> {
        for id in service.camera_ids()? {
            if service.flash_available(&id)? {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    /// Switches the torch and returns `"Flash ON"` or `"Flash OFF"`.
    pub fn set_torch(&self, on: bool) -> Result<&'static str, FlashError> {
        if !self.has_flash {
            return Err(FlashError::NoFlashCapability);
        }
        let (Some(service), Some(id)) = (self.service.as_ref(), self.camera_id.as_deref()) else {
            return Err(FlashError::CameraUnavailable);
        };
        service.set_torch_mode(id, on)?;
        Ok(if on { "Flash ON" } else { "Flash OFF" })
    }

    pub fn has_flash(&self) -> bool {
        self.has_flash
    }

    pub fn camera_id(&self) -> Option<&str> {
        self.camera_id.as_deref()
    }
}

impl Debug for TorchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TorchController")
            .field("service", &self.service.is_some())
            .field("camera_id", &self.camera_id)
            .field("has_flash", &self.has_flash)
            .finish()
    }
}
