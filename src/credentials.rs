//! # Ephemeral credentials for internal bus access.
//!
//! When the operator restricts bus access to a user map, platform services
//! still need to authenticate. [`provision`] generates a throwaway
//! username/password pair, adds it to the operator's map before the bus is
//! constructed, and the supervisor injects the pair into every service's
//! configuration.
//!
//! ## Rules
//! - Generated at most once per process run, and only when the operator's
//!   user map is non-empty.
//! - Both strings are 0–14 characters drawn from the 52-letter alphabet;
//!   zero-length output is valid and callers must tolerate it.
//! - The pair never leaves the process and dies with it.

use std::collections::HashMap;

use rand::Rng;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const MAX_LEN: usize = 14;

/// Internal bus username/password pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    /// Generated username, inserted into the operator user map.
    pub username: String,
    /// Generated password.
    pub password: String,
}

/// Provisions internal credentials against the given user map.
///
/// Returns `None` and leaves the map untouched when it is empty: with no
/// authorized users configured, the bus accepts anonymous connections and no
/// internal entry is needed. Otherwise generates a fresh pair, inserts
/// `username -> password` into the map, and returns the pair.
///
/// A generated username that happens to match an operator-chosen one
/// overwrites that entry. The 52^0..=52^14 name space makes this unlikely
/// enough that no collision guard is applied.
pub fn provision(users: &mut HashMap<String, String>) -> Option<Credentials> {
    if users.is_empty() {
        return None;
    }

    let credentials = Credentials {
        username: random_name(),
        password: random_name(),
    };
    users.insert(
        credentials.username.clone(),
        credentials.password.clone(),
    );
    Some(credentials)
}

/// Random string of length 0..=14 over the 52-letter alphabet.
fn random_name() -> String {
    let mut rng = rand::rng();
    let len = rng.random_range(0..=MAX_LEN);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}
