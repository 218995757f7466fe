//! Durable key/value persistence for remembered logins.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;
use web_sys::Storage;

/// Minimal string key/value store.
///
/// Writes are best-effort: a store that cannot persist logs and carries on.
pub trait KeyValueStore {
	/// Stored value for `key`.
	fn get(&self, key: &str) -> Option<String>;
	/// Stores `value` under `key`, replacing any previous value.
	fn set(&self, key: &str, value: &str);
	/// Deletes `key`; missing keys are ignored.
	fn remove(&self, key: &str);
}

/// The browser's `window.localStorage`.
pub struct BrowserStorage {
	storage: Storage,
}

impl BrowserStorage {
	/// Returns `None` when there is no window or storage is disabled.
	pub fn local() -> Option<Self> {
		let storage = web_sys::window()?.local_storage().ok()??;
		Some(Self { storage })
	}
}

impl KeyValueStore for BrowserStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.storage.get_item(key).ok().flatten()
	}

	fn set(&self, key: &str, value: &str) {
		if let Err(e) = self.storage.set_item(key, value) {
			warn!("storm-graph: failed to persist {key}: {e:?}");
		}
	}

	fn remove(&self, key: &str) {
		if let Err(e) = self.storage.remove_item(key) {
			warn!("storm-graph: failed to remove {key}: {e:?}");
		}
	}
}

/// In-process store. Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
	entries: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryStorage {
	/// Empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Number of stored keys.
	pub fn len(&self) -> usize {
		self.entries.borrow().len()
	}

	/// Whether nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.entries.borrow().is_empty()
	}
}

impl KeyValueStore for MemoryStorage {
	fn get(&self, key: &str) -> Option<String> {
		self.entries.borrow().get(key).cloned()
	}

	fn set(&self, key: &str, value: &str) {
		self.entries
			.borrow_mut()
			.insert(key.to_string(), value.to_string());
	}

	fn remove(&self, key: &str) {
		self.entries.borrow_mut().remove(key);
	}
}

/// `localStorage` when available, otherwise a store that lasts for the page.
pub fn default_storage() -> Box<dyn KeyValueStore> {
	match BrowserStorage::local() {
		Some(storage) => Box::new(storage),
		None => {
			warn!("storm-graph: localStorage unavailable, logins will not be remembered");
			Box::new(MemoryStorage::new())
		}
	}
}
