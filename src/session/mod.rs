//! Login state and connection parameters.
//!
//! [`Session`] is the single source of truth for "is the user logged in, and
//! to what". Remembered logins go through a [`KeyValueStore`] so the state
//! logic never touches browser storage directly.

mod credentials;
mod storage;

use log::{info, warn};

pub use credentials::{Credentials, Scheme};
pub use storage::{BrowserStorage, KeyValueStore, MemoryStorage, default_storage};

/// Persisted keys.
pub(crate) mod keys {
	pub const USER: &str = "storm.user";
	pub const PASS: &str = "storm.pass";
	pub const HOST: &str = "storm.host";
	pub const PORT: &str = "storm.port";
	pub const SCHEME: &str = "storm.scheme";
	pub const REMEMBER: &str = "storm.remember";

	pub const ALL: [&str; 6] = [USER, PASS, HOST, PORT, SCHEME, REMEMBER];
}

/// Connection fields restored from storage. Any of them may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Remembered {
	/// Last user name.
	pub user: Option<String>,
	/// Last password.
	pub pass: Option<String>,
	/// Last host.
	pub host: Option<String>,
	/// Last port; unparsable values are dropped.
	pub port: Option<u16>,
	/// Last scheme.
	pub scheme: Option<Scheme>,
	/// Whether the box was ticked last time.
	pub remember: bool,
}

/// Authentication state backed by a persistence port.
pub struct Session {
	storage: Box<dyn KeyValueStore>,
	credentials: Option<Credentials>,
	remembered: Remembered,
	remember: bool,
	logged_in: bool,
}

impl Session {
	/// Starts logged out, reading whatever a previous "remember me" login left.
	pub fn new(storage: Box<dyn KeyValueStore>) -> Self {
		let remembered = Self::rehydrate(storage.as_ref());
		Self {
			remember: remembered.remember,
			storage,
			credentials: None,
			remembered,
			logged_in: false,
		}
	}

	fn rehydrate(storage: &dyn KeyValueStore) -> Remembered {
		let port = storage.get(keys::PORT).and_then(|p| match p.parse() {
			Ok(port) => Some(port),
			Err(e) => {
				warn!("storm-graph: ignoring stored port {p:?}: {e}");
				None
			}
		});
		let scheme = storage.get(keys::SCHEME).and_then(|s| s.parse().ok());
		Remembered {
			user: storage.get(keys::USER),
			pass: storage.get(keys::PASS),
			host: storage.get(keys::HOST),
			port,
			scheme,
			remember: storage.get(keys::REMEMBER).as_deref() == Some("true"),
		}
	}

	/// Marks the session logged in with `credentials`.
	///
	/// Does not check the credentials; the driver does that when it connects.
	/// With `remember` every field is persisted, otherwise only a marker.
	pub fn authenticate(&mut self, credentials: Credentials, remember: bool) {
		if remember {
			self.storage.set(keys::USER, &credentials.user);
			self.storage.set(keys::PASS, &credentials.pass);
			self.storage.set(keys::HOST, &credentials.host);
			self.storage.set(keys::PORT, &credentials.port.to_string());
			self.storage.set(keys::SCHEME, credentials.scheme.as_str());
			self.storage.set(keys::REMEMBER, "true");
		} else {
			self.storage.set(keys::REMEMBER, "false");
		}
		info!(
			"storm-graph: logged in as {} at {}",
			credentials.user,
			credentials.base_url()
		);
		self.credentials = Some(credentials);
		self.remember = remember;
		self.logged_in = true;
	}

	/// Forgets everything, in memory and in storage.
	pub fn logout(&mut self) {
		for key in keys::ALL {
			self.storage.remove(key);
		}
		self.credentials = None;
		self.remembered = Remembered::default();
		self.remember = false;
		self.logged_in = false;
		info!("storm-graph: logged out");
	}

	/// Whether a login succeeded since the last logout.
	pub fn is_logged_in(&self) -> bool {
		self.logged_in
	}

	/// Credentials of the current login.
	pub fn credentials(&self) -> Option<&Credentials> {
		self.credentials.as_ref()
	}

	/// Fields left by an earlier remembered login, for pre-filling the form.
	pub fn remembered(&self) -> &Remembered {
		&self.remembered
	}

	/// Whether the current login is persisted.
	pub fn remember(&self) -> bool {
		self.remember
	}
}

impl std::fmt::Debug for Session {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Session")
			.field("credentials", &self.credentials)
			.field("remember", &self.remember)
			.field("logged_in", &self.logged_in)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn creds() -> Credentials {
		Credentials {
			user: "neo4j".into(),
			pass: "secret".into(),
			host: "localhost".into(),
			port: 7474,
			scheme: Scheme::Http,
		}
	}

	#[test]
	fn starts_logged_out() {
		let session = Session::new(Box::new(MemoryStorage::new()));
		assert!(!session.is_logged_in());
		assert!(session.credentials().is_none());
	}

	#[test]
	fn remembered_login_persists_every_field() {
		let storage = MemoryStorage::new();
		let mut session = Session::new(Box::new(storage.clone()));
		session.authenticate(creds(), true);

		assert!(session.is_logged_in());
		assert_eq!(storage.get(keys::USER).as_deref(), Some("neo4j"));
		assert_eq!(storage.get(keys::PASS).as_deref(), Some("secret"));
		assert_eq!(storage.get(keys::HOST).as_deref(), Some("localhost"));
		assert_eq!(storage.get(keys::PORT).as_deref(), Some("7474"));
		assert_eq!(storage.get(keys::SCHEME).as_deref(), Some("http"));
		assert_eq!(storage.get(keys::REMEMBER).as_deref(), Some("true"));
	}

	#[test]
	fn unremembered_login_only_writes_marker() {
		let storage = MemoryStorage::new();
		let mut session = Session::new(Box::new(storage.clone()));
		session.authenticate(creds(), false);

		assert!(session.is_logged_in());
		assert_eq!(session.credentials(), Some(&creds()));
		assert_eq!(storage.len(), 1);
		assert_eq!(storage.get(keys::REMEMBER).as_deref(), Some("false"));
	}

	#[test]
	fn logout_clears_memory_and_storage() {
		let storage = MemoryStorage::new();
		let mut session = Session::new(Box::new(storage.clone()));
		session.authenticate(creds(), true);
		session.logout();

		assert!(!session.is_logged_in());
		assert!(session.credentials().is_none());
		assert!(storage.is_empty());
	}

	#[test]
	fn rehydrates_without_logging_in() {
		let storage = MemoryStorage::new();
		Session::new(Box::new(storage.clone())).authenticate(creds(), true);

		let session = Session::new(Box::new(storage));
		assert!(!session.is_logged_in());
		let remembered = session.remembered();
		assert_eq!(remembered.user.as_deref(), Some("neo4j"));
		assert_eq!(remembered.port, Some(7474));
		assert_eq!(remembered.scheme, Some(Scheme::Http));
		assert!(remembered.remember);
	}

	#[test]
	fn rehydrate_ignores_garbage_port() {
		let storage = MemoryStorage::new();
		storage.set(keys::PORT, "not-a-port");
		let session = Session::new(Box::new(storage));
		assert_eq!(session.remembered().port, None);
		assert!(!session.remembered().remember);
	}
}
