//! Durable client-side storage: key-value backends and the typed token store built on them.

pub mod file;
pub mod memory;
pub mod token;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use token::{AUTH_KEY, PERSIST_KEY, TokenStore};

// self
use crate::_prelude::*;

/// String key-value backend with the semantics of browser local storage.
///
/// Implementations must apply each call atomically: a reader never observes a partially written
/// value.
pub trait KeyValueStorage
where
	Self: Send + Sync,
{
	/// Returns the raw value stored under `key`, if any.
	fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

	/// Stores `value` under `key`, replacing any previous value.
	fn set_item(&self, key: &str, value: String) -> Result<(), StoreError>;

	/// Removes `key`; removing a missing key is not an error.
	fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

/// Error type produced by [`KeyValueStorage`] implementations and the token store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::error::Error;

	#[test]
	fn store_error_converts_into_client_error_with_source() {
		let store_error = StoreError::Backend { message: "disk full".into() };
		let client_error: Error = store_error.clone().into();

		assert!(matches!(client_error, Error::Storage(_)));
		assert!(client_error.to_string().contains("disk full"));

		let source = StdError::source(&client_error)
			.expect("Client error should expose the original store error as its source.");

		assert_eq!(source.to_string(), store_error.to_string());
	}
}
