use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

use super::flash::{FlashError, TorchController};

// Blinks the torch on a fixed period until stopped.
// The first tick lights the torch, every following tick flips it.
// Stopping or dropping the strobe switches the torch off if it was left lit.
// A toggle and a stop never interleave, both run under the lamp lock.

pub const DEFAULT_PERIOD: Duration = Duration::from_millis(120);

#[derive(Debug, Default)]
struct Lamp {
    lit: bool,
    stopped: bool,
}

pub struct Strobe {
    torch: TorchController,
    lamp: Arc<Mutex<Lamp>>,
    task: Option<JoinHandle<()>>,
}

impl Strobe {
    /// Spawns the blink task on the current tokio runtime.
    pub fn start(torch: TorchController, period: Duration) -> Result<Self, FlashError> {
        if !torch.has_flash() {
            return Err(FlashError::NoFlashCapability);
        }
        let runtime = Handle::try_current().map_err(|_| FlashError::Generic("no async runtime".into()))?;

        let lamp = Arc::new(Mutex::new(Lamp::default()));
        let task = runtime.spawn({
            let torch = torch.clone();
            let lamp = lamp.clone();
            async move {
                let mut ticks = interval(period);
                loop {
                    ticks.tick().await;
                    let mut state = lock(&lamp);
                    if state.stopped {
                        return;
                    }
                    let next = !state.lit;
                    match torch.set_torch(next) {
                        Ok(_) => state.lit = next,
                        Err(e) => log::warn!("Strobe toggle failed: {}", e),
                    }
                }
            }
        });

        Ok(Strobe { torch, lamp, task: Some(task) })
    }

    pub fn is_lit(&self) -> bool {
        lock(&self.lamp).lit
    }

    pub fn stop(mut self) {
        self.halt();
    }

    fn halt(&mut self) {
        let Some(task) = self.task.take() else { return };
        let mut lamp = lock(&self.lamp);
        lamp.stopped = true;
        task.abort();
        if lamp.lit {
            match self.torch.set_torch(false) {
                Ok(_) => lamp.lit = false,
                Err(e) => log::warn!("Failed to switch torch off: {}", e),
            }
        }
    }
}

impl Drop for Strobe {
    fn drop(&mut self) {
        self.halt();
    }
}

fn lock(lamp: &Mutex<Lamp>) -> MutexGuard<'_, Lamp> {
    lamp.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::flash::CameraService;
    use crate::hardware::flash::mock::MockCamera;

    fn torch(camera: &Arc<MockCamera>) -> TorchController {
        TorchController::new(Some(camera.clone() as Arc<dyn CameraService>))
    }

    #[tokio::test(start_paused = true)]
    async fn blinks_then_switches_off() {
        let camera = Arc::new(MockCamera::with_devices(&[("0", true)]));
        let strobe = Strobe::start(torch(&camera), DEFAULT_PERIOD).unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(strobe.is_lit());
        strobe.stop();

        let states = camera.torch_states();
        assert_eq!(states, vec![true, false, true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn drop_turns_torch_off() {
        let camera = Arc::new(MockCamera::with_devices(&[("0", true)]));
        let strobe = Strobe::start(torch(&camera), DEFAULT_PERIOD).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(strobe);

        assert_eq!(camera.torch_states(), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_while_dark_leaves_torch_alone() {
        let camera = Arc::new(MockCamera::with_devices(&[("0", true)]));
        let strobe = Strobe::start(torch(&camera), DEFAULT_PERIOD).unwrap();

        tokio::time::sleep(Duration::from_millis(130)).await;
        assert!(!strobe.is_lit());
        strobe.stop();

        assert_eq!(camera.torch_states(), vec![true, false]);
    }

    #[test]
    fn fails_outside_runtime() {
        let camera = Arc::new(MockCamera::with_devices(&[("0", true)]));
        let strobe = Strobe::start(torch(&camera), DEFAULT_PERIOD);

        assert!(matches!(strobe, Err(FlashError::Generic(ref detail)) if detail == "no async runtime"));
        assert!(camera.torch_calls().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn stop_during_slow_toggle_leaves_torch_off() {
        let camera = Arc::new(MockCamera {
            torch_delay: Some(std::time::Duration::from_millis(50)),
            ..MockCamera::with_devices(&[("0", true)])
        });
        let strobe = Strobe::start(torch(&camera), DEFAULT_PERIOD).unwrap();

        tokio::time::sleep(Duration::from_millis(10)).await;
        strobe.stop();
        tokio::time::sleep(Duration::from_millis(200)).await;

        let states = camera.torch_states();
        assert_ne!(states.last(), Some(&true), "torch calls after stop: {:?}", states);
        assert!(states.len() <= 2);
    }

    #[tokio::test]
    async fn requires_flash() {
        let camera = Arc::new(MockCamera::with_devices(&[("0", false)]));
        assert!(matches!(Strobe::start(torch(&camera), DEFAULT_PERIOD), Err(FlashError::NoFlashCapability)));
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_errors_keep_blinking() {
        let camera = Arc::new(MockCamera::with_devices(&[("0", true)]));
        camera.fail_torch(crate::hardware::CameraServiceError::Access("busy".into()));
        let strobe = Strobe::start(torch(&camera), DEFAULT_PERIOD).unwrap();

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(!strobe.is_lit());
        *camera.torch_error.lock().unwrap() = None;

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert!(strobe.is_lit());
        strobe.stop();
        assert_eq!(camera.torch_states(), vec![true, false]);
    }
}
