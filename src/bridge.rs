use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::hardware::{FlashError, TorchController};

// Request/response boundary between the host application and native modules.
// Every call gets a single use Promise, the module settles it exactly once with
// either a JSON value or a coded rejection.

pub const E_UNKNOWN_MODULE: &str = "E_UNKNOWN_MODULE";
pub const E_UNKNOWN_METHOD: &str = "E_UNKNOWN_METHOD";
pub const E_INVALID_ARGS: &str = "E_INVALID_ARGS";
pub const E_PROMISE_DROPPED: &str = "E_PROMISE_DROPPED";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rejection {
    pub code: String,
    pub message: String,
}

impl Rejection {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Rejection { code: code.to_string(), message: message.into() }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for Rejection {}

impl From<FlashError> for Rejection {
    fn from(error: FlashError) -> Self {
        Rejection::new(error.code(), error.to_string())
    }
}

pub type Settlement = Result<Value, Rejection>;

/// Completion handle for one bridge call.
pub struct Promise(oneshot::Sender<Settlement>);

impl Promise {
    pub fn new() -> (Self, oneshot::Receiver<Settlement>) {
        let (sender, receiver) = oneshot::channel();
        (Promise(sender), receiver)
    }

    pub fn resolve(self, value: impl Into<Value>) {
        self.settle(Ok(value.into()))
    }

    pub fn reject(self, code: &str, message: impl Into<String>) {
        self.settle(Err(Rejection::new(code, message)))
    }

    pub fn settle(self, settlement: Settlement) {
        if self.0.send(settlement).is_err() {
            log::debug!("Bridge caller went away before the promise settled");
        }
    }
}

#[async_trait]
pub trait NativeModule: Send + Sync {
    fn name(&self) -> &'static str;
    async fn invoke(&self, method: &str, args: Vec<Value>, promise: Promise);
}

#[derive(Default, Clone)]
pub struct Bridge {
    modules: HashMap<&'static str, Arc<dyn NativeModule>>,
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: impl NativeModule + 'static) {
        let name = module.name();
        if self.modules.insert(name, Arc::new(module)).is_some() {
            log::warn!("Replaced native module {}", name);
        }
    }

    pub fn modules(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.modules.keys().copied()
    }

    pub async fn call(&self, module: &str, method: &str, args: Vec<Value>) -> Settlement {
        let Some(target) = self.modules.get(module) else {
            return Err(Rejection::new(E_UNKNOWN_MODULE, format!("No native module named {}", module)));
        };

        log::trace!("{}.{}({:?})", module, method, args);
        let (promise, settled) = Promise::new();
        target.invoke(method, args, promise).await;
        settled.await.unwrap_or_else(|_| {
            Err(Rejection::new(E_PROMISE_DROPPED, format!("{}.{} never settled", module, method)))
        })
    }
}

/// Torch control exposed to the host as `FlashModule`.
#[derive(Debug, Clone)]
pub struct FlashModule {
    torch: TorchController,
}

impl FlashModule {
    pub fn new(torch: TorchController) -> Self {
        FlashModule { torch }
    }

    fn switch_flash(&self, args: &[Value], promise: Promise) {
        let Some(flash_on) = args.first().and_then(Value::as_bool) else {
            return promise.reject(E_INVALID_ARGS, "switchFlash expects a boolean flashOn");
        };
        match self.torch.set_torch(flash_on) {
            Ok(state) => promise.resolve(state),
            Err(e) => {
                log::warn!("switchFlash({}) failed: {}", flash_on, e);
                promise.settle(Err(e.into()))
            }
        }
    }
}

#[async_trait]
impl NativeModule for FlashModule {
    fn name(&self) -> &'static str {
        "FlashModule"
    }

    async fn invoke(&self, method: &str, args: Vec<Value>, promise: Promise) {
        match method {
            "switchFlash" => self.switch_flash(&args, promise),
            "hasFlashlight" => promise.resolve(self.torch.has_flash()),
            _ => promise.reject(E_UNKNOWN_METHOD, format!("FlashModule has no method {}", method)),
        }
    }
}
