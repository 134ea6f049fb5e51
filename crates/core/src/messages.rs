//! Conversation history persistence. The caller owns the list and always
//! writes full snapshots.
use crate::{
    error::StorageError,
    model::Message,
    storage::{KeyValueStore, StoreRead, read_json, write_json},
};

pub const MESSAGES_KEY: &str = "askmysite_messages";

pub fn read_messages(store: &dyn KeyValueStore) -> StoreRead<Vec<Message>> {
    read_json(store, MESSAGES_KEY)
}

pub fn write_messages(store: &dyn KeyValueStore, messages: &[Message]) -> Result<(), StorageError> {
    write_json(store, MESSAGES_KEY, messages)
}

pub fn remove_messages(store: &dyn KeyValueStore) -> Result<(), StorageError> {
    store.remove(MESSAGES_KEY)
}
