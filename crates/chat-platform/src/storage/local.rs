//! `window.localStorage` backend.
//! Persistent across page reloads; each `setItem` replaces a value atomically.

use async_trait::async_trait;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use chat_core::ports::StoragePort;
use chat_types::{ChatError, Result};

const PROBE_KEY: &str = "__chat_storage_probe__";

pub struct LocalStorage {
    storage: Storage,
}

impl LocalStorage {
    /// Open `localStorage` and verify it accepts writes. Private browsing
    /// modes expose the object but throw on `setItem`.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| ChatError::Storage("No window object".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(js_storage_error)?
            .ok_or_else(|| ChatError::Storage("localStorage not available".to_string()))?;

        storage.set_item(PROBE_KEY, "1").map_err(js_storage_error)?;
        storage.remove_item(PROBE_KEY).map_err(js_storage_error)?;

        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for LocalStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage.get_item(key).map_err(js_storage_error)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value).map_err(js_storage_error)
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.storage.remove_item(key).map_err(js_storage_error)
    }

    fn backend_name(&self) -> &str {
        "localstorage"
    }
}

fn js_storage_error(e: JsValue) -> ChatError {
    ChatError::Storage(format!("{:?}", e))
}
