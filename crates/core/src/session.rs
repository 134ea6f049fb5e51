//! A session is the server side conversation identified by an opaque token.
//! The server opens one on the first chat message; the client only keeps the
//! token it was handed.
use crate::{
    error::StorageError,
    storage::{KeyValueStore, StoreRead},
};

pub const SESSION_TOKEN_KEY: &str = "askmysite_session";

/// Reads the stored session token. An empty token counts as no session.
pub fn read_session_token(store: &dyn KeyValueStore) -> StoreRead<String> {
    match store.get(SESSION_TOKEN_KEY) {
        Ok(Some(token)) if !token.is_empty() => StoreRead::Present(token),
        Ok(_) => StoreRead::Absent,
        Err(e) => StoreRead::Failed(e.to_string()),
    }
}

pub fn write_session_token(store: &dyn KeyValueStore, token: &str) -> Result<(), StorageError> {
    store.set(SESSION_TOKEN_KEY, token)
}

pub fn remove_session_token(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(SESSION_TOKEN_KEY)
}
