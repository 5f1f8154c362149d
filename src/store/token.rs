//! Typed persistence of the auth record and the "trust this device" flag.

// self
use crate::{
	_prelude::*,
	auth::AuthRecord,
	obs,
	store::{KeyValueStorage, StoreError},
};

/// Storage key holding the JSON [`AuthRecord`].
pub const AUTH_KEY: &str = "auth";
/// Storage key holding the JSON persist flag.
pub const PERSIST_KEY: &str = "persist";

/// JSON codec over a [`KeyValueStorage`].
///
/// Reads never fail: missing or malformed entries load as empty/`false` and are logged.
#[derive(Clone)]
pub struct TokenStore {
	storage: Arc<dyn KeyValueStorage>,
}
impl TokenStore {
	/// Wraps a storage backend.
	pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
		Self { storage }
	}

	/// Loads the stored record, or `None` when it is absent, empty, or unreadable.
	pub fn load(&self) -> Option<AuthRecord> {
		let raw = self.read_raw(AUTH_KEY)?;
		let value = match serde_json::from_str::<serde_json::Value>(&raw) {
			Ok(value) => value,
			Err(e) => {
				obs::log_storage_fallback(AUTH_KEY, &e);

				return None;
			},
		};

		match &value {
			serde_json::Value::Null => return None,
			serde_json::Value::Object(map) if map.is_empty() => return None,
			_ => (),
		}

		match serde_json::from_value::<AuthRecord>(value) {
			Ok(record) => Some(record),
			Err(e) => {
				obs::log_storage_fallback(AUTH_KEY, &e);

				None
			},
		}
	}

	/// Serializes `record` under [`AUTH_KEY`].
	pub fn save(&self, record: &AuthRecord) -> Result<(), StoreError> {
		let payload = serde_json::to_string(record)
			.map_err(|e| StoreError::Serialization { message: e.to_string() })?;

		self.storage.set_item(AUTH_KEY, payload)
	}

	/// Removes the stored record.
	pub fn clear(&self) -> Result<(), StoreError> {
		self.storage.remove_item(AUTH_KEY)
	}

	/// Loads the persist flag, defaulting to `false`.
	pub fn load_persist(&self) -> bool {
		let Some(raw) = self.read_raw(PERSIST_KEY) else {
			return false;
		};

		match serde_json::from_str::<Option<bool>>(&raw) {
			Ok(flag) => flag.unwrap_or(false),
			Err(e) => {
				obs::log_storage_fallback(PERSIST_KEY, &e);

				false
			},
		}
	}

	/// Serializes the persist flag under [`PERSIST_KEY`].
	pub fn save_persist(&self, persist: bool) -> Result<(), StoreError> {
		self.storage.set_item(PERSIST_KEY, if persist { "true" } else { "false" }.to_owned())
	}

	fn read_raw(&self, key: &str) -> Option<String> {
		match self.storage.get_item(key) {
			Ok(raw) => raw,
			Err(e) => {
				obs::log_storage_fallback(key, &e);

				None
			},
		}
	}
}
impl Debug for TokenStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("TokenStore(..)")
	}
}
