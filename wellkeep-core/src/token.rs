//! token.rs - CSRF tokens and session identifiers.
//!
//! License: MIT OR APACHE 2.0

use chrono::{Duration, Utc};
use lazy_static::lazy_static;
use log::debug;
use rand::RngCore;
use regex::Regex;

use crate::config::SessionPolicy;
use crate::errors::WellkeepError;
use crate::storage::{KeyValueStore, SecureStorage};

pub const TOKEN_BYTES: usize = 32;

/// Storage keys owned by a login session.
pub const SESSION_KEYS: [&str; 3] = ["sessionId", "userToken", "csrfToken"];

lazy_static! {
    static ref SESSION_ID_RE: Regex = Regex::new(r"^[a-f0-9]{64}$").expect("session id pattern is valid");
}

/// 32 bytes from the thread-local CSPRNG, as 64 lowercase hex characters.
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

pub fn generate_session_id() -> String {
    generate_csrf_token()
}

/// Format check only: 64 lowercase hex characters.
pub fn is_valid_session_id(session_id: &str) -> bool {
    SESSION_ID_RE.is_match(session_id)
}

/// Removes every session key from `storage`.
pub fn clear_session<S: KeyValueStore>(storage: &mut SecureStorage<S>) -> Result<(), WellkeepError> {
    for key in SESSION_KEYS {
        storage.remove(key)?;
    }
    debug!("Cleared session keys.");
    Ok(())
}

/// Stores a fresh session id and CSRF token and returns the session id.
pub fn start_session<S: KeyValueStore>(storage: &mut SecureStorage<S>) -> Result<String, WellkeepError> {
    let session_id = generate_session_id();
    storage.set("sessionId", &session_id)?;
    storage.set("csrfToken", &generate_csrf_token())?;
    debug!("Started a new session.");
    Ok(session_id)
}

/// The stored session id, if a session was started within the policy's timeout.
pub fn current_session<S: KeyValueStore>(
    storage: &mut SecureStorage<S>,
    policy: &SessionPolicy,
) -> Result<Option<String>, WellkeepError> {
    current_session_at(storage, policy, Utc::now().timestamp_millis())
}

/// Like [`current_session`], evaluated at `now` (epoch milliseconds).
///
/// A timed-out session has all of its keys removed.
pub fn current_session_at<S: KeyValueStore>(
    storage: &mut SecureStorage<S>,
    policy: &SessionPolicy,
    now: i64,
) -> Result<Option<String>, WellkeepError> {
    if storage.inner().get("sessionId")?.is_none() {
        return Ok(None);
    }

    let timeout = i64::try_from(policy.timeout_ms)
        .ok()
        .and_then(Duration::try_milliseconds)
        .unwrap_or(Duration::MAX);
    let session_id = storage
        .get_within::<String>("sessionId", timeout, now)?
        .filter(|id| is_valid_session_id(id));

    if session_id.is_none() {
        debug!("Session timed out or is malformed; clearing it.");
        clear_session(storage)?;
    }
    Ok(session_id)
}
