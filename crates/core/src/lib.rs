mod assets;
#[cfg(test)]
mod test_utils;

pub mod cache;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod messages;
pub mod model;
pub mod session;
pub mod storage;

pub use crate::assets::get_data_dir;
pub use crate::client::{AskMySiteClient, ClientBuilder, DEFAULT_API_BASE_URL};
pub use crate::error::{ClientError, StorageError};
pub use crate::storage::{FileStore, KeyValueStore, MemoryStore, StoreRead};
