//! The AskMySite client: remote widget config, chat relay and the locally
//! persisted session state.
use std::{fmt, sync::Arc};

use serde::de::DeserializeOwned;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument, warn};
use url::Url;

use crate::{
    cache::{read_cached_config, write_cached_config},
    clock::{Clock, SystemClock},
    error::ClientError,
    messages::{read_messages, remove_messages, write_messages},
    model::{ChatRequest, ChatResponse, ChatbotConfig, ConfigResponse, Message, RawChatResponse},
    session::{read_session_token, remove_session_token, write_session_token},
    storage::{KeyValueStore, MemoryStore, StoreRead},
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.askmysite.com";
pub const SESSION_TOKEN_HEADER: &str = "X-Session-Token";

const CONFIG_PATH: &str = "/api/chatbot/config";
const CHAT_PATH: &str = "/api/chatbot/chat";

/// Client for the AskMySite chatbot API.
///
/// Only the API key and base URL live in the client. Cache, session token and
/// history are read from the store on every call, so clients sharing a store
/// see each other's writes.
pub struct AskMySiteClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    // Held from session token read to token write in send_message.
    send_lock: Mutex<()>,
}

impl fmt::Debug for AskMySiteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AskMySiteClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AskMySiteClient`].
pub struct ClientBuilder {
    api_key: String,
    base_url: Option<String>,
    store: Option<Arc<dyn KeyValueStore>>,
    clock: Option<Arc<dyn Clock>>,
    http: Option<reqwest::Client>,
}

impl ClientBuilder {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn build(self) -> Result<AskMySiteClient, ClientError> {
        if self.api_key.trim().is_empty() {
            return Err(ClientError::InvalidConfig(
                "API key must not be empty".to_string(),
            ));
        }

        let base_url = self
            .base_url
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        Url::parse(&base_url).map_err(|e| {
            ClientError::InvalidConfig(format!("Invalid base URL '{base_url}': {e}"))
        })?;

        Ok(AskMySiteClient {
            api_key: self.api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: self.http.unwrap_or_default(),
            store: self.store.unwrap_or_else(|| Arc::new(MemoryStore::new())),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            send_lock: Mutex::new(()),
        })
    }
}

impl AskMySiteClient {
    /// Creates a client using the system clock. `base_url` defaults to
    /// [`DEFAULT_API_BASE_URL`].
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        store: Arc<dyn KeyValueStore>,
    ) -> Result<Self, ClientError> {
        let mut builder = Self::builder(api_key).store(store);
        if let Some(url) = base_url {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    pub fn builder(api_key: impl Into<String>) -> ClientBuilder {
        ClientBuilder {
            api_key: api_key.into(),
            base_url: None,
            store: None,
            clock: None,
            http: None,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // ---------------------------------------------------------------------
    // Widget config
    // ---------------------------------------------------------------------

    /// Returns the widget config, from the local cache when it is younger
    /// than 24h and from the API otherwise.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_config(&self) -> Result<ChatbotConfig, ClientError> {
        let now = self.clock.now_millis();
        match read_cached_config(self.store.as_ref(), now) {
            StoreRead::Present(config) => {
                debug!("Using cached chatbot config");
                return Ok(config);
            }
            StoreRead::Absent => debug!("No valid cached config, fetching from API"),
            StoreRead::Failed(reason) => warn!(%reason, "Error reading cached config"),
        }

        let config = self.request_config().await.inspect_err(|e| {
            error!(error = %e, "Error fetching chatbot config");
        })?;

        if let Err(e) = write_cached_config(self.store.as_ref(), &config, self.clock.now_millis()) {
            warn!(error = %e, "Error caching config");
        }
        Ok(config)
    }

    async fn request_config(&self) -> Result<ChatbotConfig, ClientError> {
        let response = self
            .http
            .get(self.endpoint(CONFIG_PATH))
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        let body: ConfigResponse = read_body(response, "fetch config").await?;
        match body {
            ConfigResponse {
                success: true,
                config: Some(config),
            } => Ok(config),
            _ => Err(ClientError::Protocol(
                "Failed to fetch chatbot configuration".to_string(),
            )),
        }
    }

    // ---------------------------------------------------------------------
    // Session token
    // ---------------------------------------------------------------------

    /// Returns the current session token. Storage faults read as no session.
    pub fn get_session_token(&self) -> Option<String> {
        self.session_token_status().into_option()
    }

    pub fn session_token_status(&self) -> StoreRead<String> {
        let read = read_session_token(self.store.as_ref());
        if let StoreRead::Failed(reason) = &read {
            warn!(%reason, "Error reading session token");
        }
        read
    }

    fn set_session_token(&self, token: &str) {
        if let Err(e) = write_session_token(self.store.as_ref(), token) {
            warn!(error = %e, "Error saving session token");
        }
    }

    // ---------------------------------------------------------------------
    // Message history
    // ---------------------------------------------------------------------

    /// Returns the persisted conversation, or an empty list if there is none
    /// or it cannot be read.
    pub fn get_stored_messages(&self) -> Vec<Message> {
        self.stored_messages_status()
            .into_option()
            .unwrap_or_default()
    }

    pub fn stored_messages_status(&self) -> StoreRead<Vec<Message>> {
        let read = read_messages(self.store.as_ref());
        if let StoreRead::Failed(reason) = &read {
            warn!(%reason, "Error reading stored messages");
        }
        read
    }

    /// Replaces the persisted conversation with `messages`.
    pub fn save_messages(&self, messages: &[Message]) {
        if let Err(e) = write_messages(self.store.as_ref(), messages) {
            warn!(error = %e, "Error saving messages");
        }
    }

    pub fn clear_messages(&self) {
        if let Err(e) = remove_messages(self.store.as_ref()) {
            warn!(error = %e, "Error clearing messages");
        }
    }

    // ---------------------------------------------------------------------
    // Chat
    // ---------------------------------------------------------------------

    /// Sends a chat message. The server opens a session when no token is
    /// held; any token it returns replaces the stored one.
    ///
    /// The returned assistant message is not added to the stored history.
    #[instrument(skip(self, request), fields(base_url = %self.base_url))]
    pub async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let _guard = self.send_lock.lock().await;

        let response = self.post_chat(request).await.inspect_err(|e| {
            error!(error = %e, "Error sending message");
        })?;

        if let Some(token) = response.session_token.as_deref().filter(|t| !t.is_empty()) {
            debug!("Storing session token from chat response");
            self.set_session_token(token);
        }
        Ok(response)
    }

    async fn post_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ClientError> {
        let mut builder = self
            .http
            .post(self.endpoint(CHAT_PATH))
            .bearer_auth(&self.api_key)
            .json(request);

        match self.get_session_token() {
            Some(token) => builder = builder.header(SESSION_TOKEN_HEADER, token),
            None => debug!("No session token, server will open a new session"),
        }

        let response = builder.send().await?;
        let body: RawChatResponse = read_body(response, "send message").await?;
        match body {
            RawChatResponse {
                success: true,
                message: Some(message),
                session_token,
            } => Ok(ChatResponse {
                success: true,
                message,
                session_token,
            }),
            _ => Err(ClientError::Protocol(
                "Failed to get chat response".to_string(),
            )),
        }
    }

    // ---------------------------------------------------------------------
    // Utility
    // ---------------------------------------------------------------------

    /// Forgets the session token and the conversation. The config cache is
    /// kept.
    pub fn clear_session(&self) {
        if let Err(e) = remove_session_token(self.store.as_ref()) {
            warn!(error = %e, "Error clearing session token");
        }
        if let Err(e) = remove_messages(self.store.as_ref()) {
            warn!(error = %e, "Error clearing messages");
        }
    }
}

/// Rejects non-2xx responses, then decodes the JSON body.
async fn read_body<T: DeserializeOwned>(
    response: reqwest::Response,
    action: &'static str,
) -> Result<T, ClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Transport {
            action,
            status: status.as_u16(),
            status_text: status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string(),
        });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| {
        ClientError::Protocol(format!("Failed to {action}: malformed response body: {e}"))
    })
}
