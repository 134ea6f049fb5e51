use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Corner of the page where the chat widget is anchored.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum WidgetPosition {
    #[default]
    BottomRight,
    BottomLeft,
    TopRight,
    TopLeft,
}

impl WidgetPosition {
    pub fn as_str(&self) -> &'static str {
        match &self {
            WidgetPosition::BottomRight => "bottom-right",
            WidgetPosition::BottomLeft => "bottom-left",
            WidgetPosition::TopRight => "top-right",
            WidgetPosition::TopLeft => "top-left",
        }
    }
}

impl From<WidgetPosition> for String {
    fn from(val: WidgetPosition) -> Self {
        val.as_str().into()
    }
}

/// Widget presentation settings served by the AskMySite backend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatbotConfig {
    pub chatbot_name: String,
    pub welcome_message: String,
    pub business_profile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_profile: Option<String>,
    pub primary_color: String,
    pub position: WidgetPosition,
    pub site_name: String,
    pub site_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ChatbotConfig {
    /// Returns a copy with the host supplied overrides applied.
    pub fn with_overrides(&self, overrides: &WidgetOverrides) -> ChatbotConfig {
        ChatbotConfig {
            position: overrides.position.unwrap_or(self.position),
            primary_color: overrides
                .primary_color
                .clone()
                .unwrap_or_else(|| self.primary_color.clone()),
            ..self.clone()
        }
    }
}

/// Presentation settings a host may force regardless of the remote config.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Default)]
pub struct WidgetOverrides {
    #[serde(default)]
    pub position: Option<WidgetPosition>,
    #[serde(default, alias = "primaryColor")]
    pub primary_color: Option<String>,
}

/// Cache envelope persisted under the config key.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CachedConfig {
    pub data: ChatbotConfig,
    /// Fetch time in milliseconds since the unix epoch.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match &self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single conversation entry.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub role: Role,
    pub content: String,
    pub created_at: String,
}

impl Message {
    /// Creates a user message with a fresh id, timestamped now.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: Role::User,
            content: content.into(),
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A successful reply from the chat endpoint.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub success: bool,
    pub message: Message,
    /// Only sent when the server opens (or rotates) a session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
}

// Wire shapes. Fields the server may omit are optional here and validated by
// the client before they are handed out.
#[derive(Debug, Deserialize)]
pub(crate) struct ConfigResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub config: Option<ChatbotConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawChatResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub session_token: Option<String>,
}
