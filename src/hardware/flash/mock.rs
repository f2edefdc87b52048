use std::sync::Mutex;
use std::time::Duration;

use super::{CameraService, CameraServiceError};

/// Recording camera service for tests.
#[derive(Default)]
pub(crate) struct MockCamera {
    pub devices: Vec<(String, bool)>,
    pub list_error: Option<CameraServiceError>,
    pub characteristics_error: Option<CameraServiceError>,
    pub torch_error: Mutex<Option<CameraServiceError>>,
    /// Blocks every torch switch for this long, as a slow camera HAL would.
    pub torch_delay: Option<Duration>,
    pub queried: Mutex<Vec<String>>,
    pub torch_calls: Mutex<Vec<(String, bool)>>,
}

impl MockCamera {
    pub fn with_devices(devices: &[(&str, bool)]) -> Self {
        MockCamera {
            devices: devices.iter().map(|(id, flash)| (id.to_string(), *flash)).collect(),
            ..Default::default()
        }
    }

    pub fn fail_torch(&self, error: CameraServiceError) {
        *self.torch_error.lock().unwrap() = Some(error);
    }

    pub fn queried(&self) -> Vec<String> {
        self.queried.lock().unwrap().clone()
    }

    pub fn torch_calls(&self) -> Vec<(String, bool)> {
        self.torch_calls.lock().unwrap().clone()
    }

    pub fn torch_states(&self) -> Vec<bool> {
        self.torch_calls().into_iter().map(|(_, on)| on).collect()
    }
}

impl CameraService for MockCamera {
    fn camera_ids(&self) -> Result<Vec<String>, CameraServiceError> {
        match &self.list_error {
            Some(e) => Err(e.clone()),
            None => Ok(self.devices.iter().map(|(id, _)| id.clone()).collect()),
        }
    }

    fn flash_available(&self, id: &str) -> Result<bool, CameraServiceError> {
        if let Some(e) = &self.characteristics_error {
            return Err(e.clone());
        }
        self.queried.lock().unwrap().push(id.to_string());
        Ok(self.devices.iter().any(|(device, flash)| device == id && *flash))
    }

    fn set_torch_mode(&self, id: &str, on: bool) -> Result<(), CameraServiceError> {
        if let Some(delay) = self.torch_delay {
            std::thread::sleep(delay);
        }
        if let Some(e) = self.torch_error.lock().unwrap().clone() {
            return Err(e);
        }
        self.torch_calls.lock().unwrap().push((id.to_string(), on));
        Ok(())
    }
}
