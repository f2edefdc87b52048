use std::error::Error;
use std::sync::Arc;

use jni::objects::{GlobalRef, JObject, JObjectArray, JString, JValue};
use jni::sys::jobject;
use jni::{JNIEnv, JavaVM};

use super::{CameraService, CameraServiceError};

const CAMERA_ACCESS_EXCEPTION: &str = "android/hardware/camera2/CameraAccessException";

#[derive(Clone)]
pub struct OsCameraService {
    java_vm: Arc<JavaVM>,
    camera_manager: GlobalRef,
}

impl OsCameraService {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let java_vm = Arc::new(unsafe { JavaVM::from_raw(ndk_context::android_context().vm().cast())? });

        let camera_manager = {
            let mut env = java_vm.attach_current_thread()?;

            let ctx_ptr = ndk_context::android_context().context();
            if ctx_ptr.is_null() {
                return Err("Failed to get Android context".into());
            }

            let context = unsafe { JObject::from_raw(ctx_ptr as jobject) };
            let camera_service = env
                .get_static_field("android/content/Context", "CAMERA_SERVICE", "Ljava/lang/String;")?
                .l()?;

            let manager = env
                .call_method(
                    &context,
                    "getSystemService",
                    "(Ljava/lang/String;)Ljava/lang/Object;",
                    &[JValue::Object(&camera_service)],
                )?
                .l()?;

            if manager.is_null() {
                return Err("CameraManager not available".into());
            }
            env.new_global_ref(manager)?
        };

        Ok(Self { java_vm, camera_manager })
    }

    fn env(&self) -> Result<jni::AttachGuard<'_>, CameraServiceError> {
        self.java_vm
            .attach_current_thread()
            .map_err(|e| CameraServiceError::Other(e.to_string()))
    }

    /// Maps a failed JNI call to a camera service error, clearing any pending Java exception.
    fn check<T>(env: &mut JNIEnv, result: jni::errors::Result<T>) -> Result<T, CameraServiceError> {
        match result {
            Ok(value) => Ok(value),
            Err(jni::errors::Error::JavaException) => Err(Self::take_exception(env)),
            Err(e) => Err(CameraServiceError::Other(e.to_string())),
        }
    }

    fn take_exception(env: &mut JNIEnv) -> CameraServiceError {
        let exception = match env.exception_occurred() {
            Ok(exception) if !exception.is_null() => exception,
            _ => return CameraServiceError::Other("Unknown Java exception".into()),
        };
        let _ = env.exception_clear();

        let message = env
            .call_method(&exception, "getMessage", "()Ljava/lang/String;", &[])
            .and_then(|m| m.l())
            .ok()
            .filter(|m| !m.is_null())
            .and_then(|m| env.get_string(&JString::from(m)).ok().map(String::from))
            .unwrap_or_else(|| "null".to_string());
        let _ = env.exception_clear();

        match env.is_instance_of(&exception, CAMERA_ACCESS_EXCEPTION) {
            Ok(true) => CameraServiceError::Access(message),
            _ => CameraServiceError::Other(message),
        }
    }
}

impl CameraService for OsCameraService {
    fn camera_ids(&self) -> Result<Vec<String>, CameraServiceError> {
        let mut env = self.env()?;
        let result = env
            .call_method(self.camera_manager.as_obj(), "getCameraIdList", "()[Ljava/lang/String;", &[])
            .and_then(|v| v.l());
        let array = JObjectArray::from(Self::check(&mut env, result)?);

        let length = env.get_array_length(&array);
        let length = Self::check(&mut env, length)?;

        let mut ids = Vec::with_capacity(length.max(0) as usize);
        for i in 0..length {
            let element = env.get_object_array_element(&array, i);
            let element = JString::from(Self::check(&mut env, element)?);
            let id = env.get_string(&element).map(String::from);
            ids.push(Self::check(&mut env, id)?);
        }
        Ok(ids)
    }

    fn flash_available(&self, id: &str) -> Result<bool, CameraServiceError> {
        let mut env = self.env()?;
        let result = env.new_string(id).and_then(|jid| {
            env.call_method(
                self.camera_manager.as_obj(),
                "getCameraCharacteristics",
                "(Ljava/lang/String;)Landroid/hardware/camera2/CameraCharacteristics;",
                &[JValue::Object(&jid)],
            )?
            .l()
        });
        let characteristics = Self::check(&mut env, result)?;

        let result = env
            .get_static_field(
                "android/hardware/camera2/CameraCharacteristics",
                "FLASH_INFO_AVAILABLE",
                "Landroid/hardware/camera2/CameraCharacteristics$Key;",
            )
            .and_then(|key| key.l())
            .and_then(|key| {
                env.call_method(
                    &characteristics,
                    "get",
                    "(Landroid/hardware/camera2/CameraCharacteristics$Key;)Ljava/lang/Object;",
                    &[JValue::Object(&key)],
                )?
                .l()
            });
        let available = Self::check(&mut env, result)?;
        if available.is_null() {
            return Ok(false);
        }

        let result = env.call_method(&available, "booleanValue", "()Z", &[]).and_then(|v| v.z());
        Self::check(&mut env, result)
    }

    fn set_torch_mode(&self, id: &str, on: bool) -> Result<(), CameraServiceError> {
        let mut env = self.env()?;
        let result = env.new_string(id).and_then(|jid| {
            env.call_method(
                self.camera_manager.as_obj(),
                "setTorchMode",
                "(Ljava/lang/String;Z)V",
                &[JValue::Object(&jid), JValue::Bool(on as u8)],
            )
            .map(|_| ())
        });
        Self::check(&mut env, result)
    }
}
