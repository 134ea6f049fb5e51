use std::io::Write;

use anyhow::{Context, Result};
use askmysite_core::{
    AskMySiteClient,
    model::{ChatRequest, Message, WidgetOverrides},
};
use tracing::debug;

use crate::ux::{TextKind, format_config, format_message, style_text};

pub async fn show_config<W: Write>(
    client: &AskMySiteClient,
    overrides: &WidgetOverrides,
    out: &mut W,
) -> Result<()> {
    let config = client
        .fetch_config()
        .await
        .context("Failed to fetch chatbot configuration")?
        .with_overrides(overrides);
    writeln!(out, "{}", format_config(&config))?;
    Ok(())
}

/// Sends `text` and appends both sides of the exchange to the stored history.
/// Nothing is stored when the request fails.
pub async fn chat<W: Write>(client: &AskMySiteClient, text: &str, out: &mut W) -> Result<()> {
    let text = text.trim();
    anyhow::ensure!(!text.is_empty(), "Message must not be empty");

    let mut messages = client.get_stored_messages();
    let user_message = Message::user(text);

    let response = client
        .send_message(&ChatRequest::new(text))
        .await
        .context("Failed to send message")?;

    messages.push(user_message);
    messages.push(response.message.clone());
    client.save_messages(&messages);
    debug!(count = messages.len(), "Saved conversation");

    writeln!(out, "{}", format_message(&response.message))?;
    Ok(())
}

pub fn history<W: Write>(client: &AskMySiteClient, out: &mut W) -> Result<()> {
    let messages = client.get_stored_messages();
    if messages.is_empty() {
        writeln!(out, "{}", style_text("No messages yet.", TextKind::Footer))?;
    }
    for message in &messages {
        writeln!(out, "{}", format_message(message))?;
    }
    Ok(())
}

pub fn session<W: Write>(client: &AskMySiteClient, out: &mut W) -> Result<()> {
    match client.get_session_token() {
        Some(token) => writeln!(out, "{token}")?,
        None => writeln!(out, "{}", style_text("No session.", TextKind::Footer))?,
    }
    Ok(())
}

pub fn clear<W: Write>(client: &AskMySiteClient, all: bool, out: &mut W) -> Result<()> {
    if all {
        client.clear_session();
        writeln!(out, "{}", style_text("Session cleared.", TextKind::Footer))?;
    } else {
        client.clear_messages();
        writeln!(out, "{}", style_text("Messages cleared.", TextKind::Footer))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use askmysite_core::{KeyValueStore, MemoryStore, model::WidgetPosition};
    use serde_json::json;
    use std::sync::Arc;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn output(buf: Vec<u8>) -> String {
        console::strip_ansi_codes(&String::from_utf8(buf).unwrap()).to_string()
    }

    async fn client_for(server: &MockServer) -> (AskMySiteClient, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let client = AskMySiteClient::builder("key")
            .base_url(server.uri())
            .store(store.clone())
            .build()
            .unwrap();
        (client, store)
    }

    fn chat_reply(token: Option<&str>) -> serde_json::Value {
        let mut body = json!({
            "success": true,
            "message": {
                "id": "a1",
                "role": "assistant",
                "content": "Fresh every morning.",
                "createdAt": "2026-01-01T10:00:02.000Z"
            }
        });
        if let Some(token) = token {
            body["sessionToken"] = json!(token);
        }
        body
    }

    #[tokio::test]
    async fn test_chat_appends_both_messages() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chatbot/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(Some("abc"))))
            .mount(&server)
            .await;
        let (client, _store) = client_for(&server).await;

        let mut buf = Vec::new();
        chat(&client, "  bread?  ", &mut buf).await.unwrap();
        chat(&client, "rye?", &mut buf).await.unwrap();

        let messages = client.get_stored_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].content, "bread?");
        assert_eq!(messages[1].id, "a1");
        assert_eq!(messages[2].content, "rye?");
        assert_eq!(client.get_session_token().as_deref(), Some("abc"));
        assert!(output(buf).contains("assistant: Fresh every morning."));
    }

    #[tokio::test]
    async fn test_chat_failure_stores_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chatbot/chat"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;
        let (client, _store) = client_for(&server).await;

        let err = chat(&client, "hi", &mut Vec::new()).await.unwrap_err();

        assert!(format!("{err:#}").contains("Service Unavailable"));
        assert!(client.get_stored_messages().is_empty());
    }

    #[tokio::test]
    async fn test_chat_rejects_empty_message() {
        let server = MockServer::start().await;
        let (client, _store) = client_for(&server).await;

        let err = chat(&client, "   ", &mut Vec::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "Message must not be empty");
    }

    #[tokio::test]
    async fn test_show_config_applies_overrides() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/chatbot/config"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "config": {
                    "chatbotName": "Ada",
                    "welcomeMessage": "Hi",
                    "businessProfile": "Bakery",
                    "primaryColor": "#ff6600",
                    "position": "bottom-right",
                    "siteName": "Bakery",
                    "siteUrl": "https://bakery.test"
                }
            })))
            .mount(&server)
            .await;
        let (client, _store) = client_for(&server).await;
        let overrides = WidgetOverrides {
            position: Some(WidgetPosition::TopLeft),
            primary_color: None,
        };

        let mut buf = Vec::new();
        show_config(&client, &overrides, &mut buf).await.unwrap();

        let text = output(buf);
        assert!(text.contains("Chatbot:   Ada"));
        assert!(text.contains("Position:  top-left"));
        assert!(text.contains("Color:     #ff6600"));
    }

    #[tokio::test]
    async fn test_history_session_and_clear() {
        let server = MockServer::start().await;
        let (client, store) = client_for(&server).await;

        let mut buf = Vec::new();
        history(&client, &mut buf).unwrap();
        session(&client, &mut buf).unwrap();
        assert_eq!(output(buf), "No messages yet.\nNo session.\n");

        client.save_messages(&[Message::user("hi")]);
        store.set("askmysite_session", "abc").unwrap();

        let mut buf = Vec::new();
        history(&client, &mut buf).unwrap();
        session(&client, &mut buf).unwrap();
        assert_eq!(output(buf), "user: hi\nabc\n");

        clear(&client, false, &mut Vec::new()).unwrap();
        assert!(client.get_stored_messages().is_empty());
        assert_eq!(client.get_session_token().as_deref(), Some("abc"));

        clear(&client, true, &mut Vec::new()).unwrap();
        assert_eq!(client.get_session_token(), None);
    }
}
