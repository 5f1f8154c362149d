//! Thread-safe in-memory [`KeyValueStorage`] for tests and ephemeral sessions.

// self
use crate::{
	_prelude::*,
	store::{KeyValueStorage, StoreError},
};

/// Process-local storage; cloning shares the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage(Arc<RwLock<HashMap<String, String>>>);
impl MemoryStorage {
	/// Seeds the storage with raw entries.
	pub fn with_entries<I, K, V>(entries: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let map = entries.into_iter().map(|(k, v)| (k.into(), v.into())).collect();

		Self(Arc::new(RwLock::new(map)))
	}

	/// Returns a copy of the raw value under `key`.
	pub fn raw(&self, key: &str) -> Option<String> {
		self.0.read().get(key).cloned()
	}

	/// Returns the number of stored keys.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` if nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}
impl KeyValueStorage for MemoryStorage {
	fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
		Ok(self.raw(key))
	}

	fn set_item(&self, key: &str, value: String) -> Result<(), StoreError> {
		self.0.write().insert(key.to_owned(), value);

		Ok(())
	}

	fn remove_item(&self, key: &str) -> Result<(), StoreError> {
		self.0.write().remove(key);

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn clones_share_entries() {
		let storage = MemoryStorage::default();
		let alias = storage.clone();

		storage.set_item("persist", "true".into()).expect("Memory writes should succeed.");

		assert_eq!(alias.raw("persist").as_deref(), Some("true"));

		alias.remove_item("persist").expect("Memory removals should succeed.");
		alias.remove_item("persist").expect("Removing a missing key should succeed.");

		assert!(storage.is_empty());
	}
}
