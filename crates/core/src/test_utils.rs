//! Test utilities for askmysite-core
//!
//! Shared fixtures so unit tests across modules build the same configs and
//! conversations.

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::Builder;

use crate::model::{ChatbotConfig, Message, Role, WidgetPosition};

/// Serializes tests that modify the process environment.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Creates a temporary config file with the given content.
/// Uses tempfile::Builder to ensure unique directories for parallel tests.
///
/// # Panics
/// Panics if temp directory creation or file writing fails.
pub fn create_temp_config(content: &str) -> PathBuf {
    let temp_dir = Builder::new()
        .prefix("askmysite-test")
        .rand_bytes(8)
        .tempdir()
        .unwrap();
    let config_path = temp_dir.path().join("askmysite.yml");
    File::create(&config_path)
        .unwrap()
        .write_all(content.as_bytes())
        .unwrap();
    // Keep the temp directory alive by leaking it (this is just for tests)
    let _ = Box::leak(Box::new(temp_dir));
    config_path
}

pub fn sample_config() -> ChatbotConfig {
    ChatbotConfig {
        chatbot_name: "Ada".to_string(),
        welcome_message: "Hi! How can I help?".to_string(),
        business_profile: "A neighbourhood bakery.".to_string(),
        assistant_profile: None,
        primary_color: "#ff6600".to_string(),
        position: WidgetPosition::BottomRight,
        site_name: "Bakery".to_string(),
        site_url: "https://bakery.test".to_string(),
        avatar_url: None,
    }
}

pub fn sample_messages() -> Vec<Message> {
    vec![
        Message {
            id: "m1".to_string(),
            role: Role::User,
            content: "Do you sell rye bread?".to_string(),
            created_at: "2026-01-01T10:00:00.000Z".to_string(),
        },
        Message {
            id: "m2".to_string(),
            role: Role::Assistant,
            content: "Yes, every morning.".to_string(),
            created_at: "2026-01-01T10:00:02.000Z".to_string(),
        },
    ]
}
