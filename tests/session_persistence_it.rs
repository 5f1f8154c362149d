// std
use std::{env, fs, process};
// self
use calorie_session::{
	_preludet::*,
	auth::AuthRecord,
	session::Session,
	store::{FileStorage, TokenStore},
};

fn temp_path() -> std::path::PathBuf {
	let nanos = std::time::SystemTime::now()
		.duration_since(std::time::UNIX_EPOCH)
		.map(|d| d.as_nanos())
		.unwrap_or_default();

	env::temp_dir().join(format!("calorie_session_it_{}_{nanos}.json", process::id()))
}

fn open_session(path: &std::path::Path) -> Session {
	let storage = FileStorage::open(path).expect("Failed to open file storage.");

	Session::hydrate(TokenStore::new(Arc::new(storage)))
}

#[test]
fn session_survives_restart_and_logout_keeps_persist() {
	let path = temp_path();
	let session = open_session(&path);

	session
		.set_auth(AuthRecord::new("alice", "tok1").with_roles(["user"]))
		.expect("set_auth should write through.");
	session.set_persist(true).expect("set_persist should write through.");
	drop(session);

	let restarted = open_session(&path);

	assert_eq!(restarted.auth(), Some(AuthRecord::new("alice", "tok1").with_roles(["user"])));
	assert!(restarted.persist());

	restarted.reset().expect("reset should write through.");
	drop(restarted);

	let restarted = open_session(&path);

	assert_eq!(restarted.auth(), None);
	assert!(restarted.persist());

	fs::remove_file(&path).unwrap_or_else(|e| {
		panic!("Failed to remove temporary storage file {}: {e}", path.display())
	});
}
