pub mod hardware;
pub use crate::hardware::{
    CameraService,
    CameraServiceError,
    FlashError,
    Logger,
    Strobe,
    TorchController,
};

pub mod bridge;
pub use bridge::{Bridge, FlashModule, NativeModule, Promise, Rejection};

pub mod config;
pub use config::BridgeConfig;

pub mod prelude {
    pub use crate::{start, Bridge, BridgeConfig, TorchBridge};
}

/// A started bridge together with the hardware it was built on.
pub struct TorchBridge {
    pub bridge: Bridge,
    pub hardware: hardware::Context,
    config: BridgeConfig,
}

impl TorchBridge {
    /// Blinks the torch at the configured period. Fails outside a tokio runtime.
    pub fn strobe(&self) -> Result<Strobe, FlashError> {
        self.hardware.start_strobe(self.config.strobe_period())
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }
}

/// Starts logging, scans the cameras once and registers `FlashModule` on a new bridge.
pub fn start(config: BridgeConfig) -> TorchBridge {
    Logger::start(config.log_level);
    let hardware = hardware::Context::new();
    log::info!("Torch bridge started, flash available: {}", hardware.has_flash());

    let mut bridge = Bridge::new();
    bridge.register(FlashModule::new(hardware.flash.clone()));
    TorchBridge { bridge, hardware, config }
}
