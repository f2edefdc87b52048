mod flash;
mod logger;
mod strobe;

pub use flash::{CameraService, CameraServiceError, FlashError, TorchController};
#[cfg(any(target_os = "ios", target_os = "macos", target_os = "android"))]
pub use flash::OsCameraService;
pub use logger::Logger;
pub use strobe::{Strobe, DEFAULT_PERIOD as DEFAULT_STROBE_PERIOD};

#[cfg(test)]
pub(crate) use flash::mock;

use tokio::time::Duration;

/// Hardware context contains interfaces to various hardware.
/// All interfaces should be clonable or internally synchronized and safe to call from multiple places.
#[derive(Debug, Clone)]
pub struct Context {
    pub flash: TorchController,
}

impl Context {
    /// Scans the platform cameras once; every clone shares the result.
    pub(crate) fn new() -> Self {
        Self { flash: TorchController::platform() }
    }

    pub fn toggle_flash(&self, on: bool) -> Result<&'static str, FlashError> {
        self.flash.set_torch(on)
    }

    pub fn has_flash(&self) -> bool {
        self.flash.has_flash()
    }

    pub fn start_strobe(&self, period: Duration) -> Result<Strobe, FlashError> {
        Strobe::start(self.flash.clone(), period)
    }
}
