//! Process-wide auth state with write-through persistence.
//!
//! A [`Session`] is constructed once per process with [`Session::hydrate`] and shared by
//! reference (usually `Arc<Session>`) with every consumer. Each mutation holds the state's write
//! lock while it writes the [`TokenStore`] and publishes the new in-memory value, so concurrent
//! readers see either the old token or the new one and storage never lags visible state.

// self
use crate::{
	_prelude::*,
	auth::{AuthRecord, TokenSecret},
	store::TokenStore,
};

#[derive(Clone, Debug, Default)]
struct SessionState {
	auth: Option<AuthRecord>,
	persist: bool,
}

/// Shared auth state: the current [`AuthRecord`] and the persist flag.
#[derive(Debug)]
pub struct Session {
	store: TokenStore,
	state: RwLock<SessionState>,
}
impl Session {
	/// Builds the session from whatever the store currently holds.
	pub fn hydrate(store: TokenStore) -> Self {
		let state = SessionState { auth: store.load(), persist: store.load_persist() };

		Self { store, state: RwLock::new(state) }
	}

	/// Returns a copy of the current record.
	pub fn auth(&self) -> Option<AuthRecord> {
		self.state.read().auth.clone()
	}

	/// Returns the current access token, if any.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.state
			.read()
			.auth
			.as_ref()
			.filter(|record| record.has_token())
			.map(|record| record.access_token.clone())
	}

	/// Returns `true` when an access token is present.
	pub fn is_authenticated(&self) -> bool {
		self.state.read().auth.as_ref().is_some_and(AuthRecord::has_token)
	}

	/// Returns the persist ("trust this device") flag.
	pub fn persist(&self) -> bool {
		self.state.read().persist
	}

	/// Replaces the current record and writes it through to the store.
	///
	/// The in-memory record is only replaced once the store accepted the write.
	pub fn set_auth(&self, record: AuthRecord) -> Result<()> {
		let mut state = self.state.write();

		self.store.save(&record)?;
		state.auth = Some(record);

		Ok(())
	}

	/// Applies a refresh result: keeps `user`, swaps token and roles. Returns the new record.
	pub fn merge_refresh(
		&self,
		access_token: TokenSecret,
		roles: Option<Vec<String>>,
	) -> Result<AuthRecord> {
		let mut state = self.state.write();
		let record = AuthRecord::refreshed(state.auth.as_ref(), access_token, roles);

		self.store.save(&record)?;
		state.auth = Some(record.clone());

		Ok(record)
	}

	/// Sets the persist flag and writes it through to the store.
	pub fn set_persist(&self, persist: bool) -> Result<()> {
		let mut state = self.state.write();

		self.store.save_persist(persist)?;
		state.persist = persist;

		Ok(())
	}

	/// Flips the persist flag, returning the new value.
	pub fn toggle_persist(&self) -> Result<bool> {
		let mut state = self.state.write();
		let persist = !state.persist;

		self.store.save_persist(persist)?;
		state.persist = persist;

		Ok(persist)
	}

	/// Ends the session: the record is cleared in memory first, then in the store.
	///
	/// The persist flag is left untouched. A store failure is reported after memory has already
	/// been emptied.
	pub fn reset(&self) -> Result<()> {
		let mut state = self.state.write();

		state.auth = None;
		self.store.clear()?;

		Ok(())
	}
}
