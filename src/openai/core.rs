use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Failures from the OpenAI compatible API, split by where they
/// happen so the caller can decide what to surface.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The request never produced a usable response (connection,
    /// timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The API answered with a non-success status, e.g. 401 for a bad
    /// key or 429 when rate limited.
    #[error("API returned {status}: {message}")]
    Api { status: u16, message: String },
    /// The API answered 2xx but the body is missing the reply text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Requests the next chat completion and returns the reply text.
pub async fn completion(
    messages: &[Message],
    api_hostname: &str,
    api_key: &str,
    model: &str,
    max_tokens: u32,
) -> Result<String, ChatError> {
    let payload = json!({
        "model": model,
        "messages": messages,
        "max_tokens": max_tokens,
    });
    let url = format!("{}/v1/chat/completions", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .post(url)
        .bearer_auth(api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 10))
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ChatError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let body: Value = response.json().await?;
    let content = body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| ChatError::MalformedResponse(body.to_string()))?;

    Ok(content.to_string())
}

/// A lightweight authenticated call used purely to check that an API
/// key works. The listing itself is discarded.
pub async fn list_models(api_hostname: &str, api_key: &str) -> Result<(), ChatError> {
    let url = format!("{}/v1/models", api_hostname.trim_end_matches("/"));
    let response = reqwest::Client::new()
        .get(url)
        .bearer_auth(api_key)
        .timeout(Duration::from_secs(30))
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(ChatError::Api {
            status: status.as_u16(),
            message,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::System).unwrap(), r#""system""#);
        assert_eq!(
            serde_json::to_string(&Role::Assistant).unwrap(),
            r#""assistant""#
        );
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), r#""user""#);
    }

    #[test]
    fn test_role_deserialization() {
        let json = r#""system""#;
        assert_eq!(serde_json::from_str::<Role>(json).unwrap(), Role::System);

        let json = r#""assistant""#;
        assert_eq!(serde_json::from_str::<Role>(json).unwrap(), Role::Assistant);

        let json = r#""user""#;
        assert_eq!(serde_json::from_str::<Role>(json).unwrap(), Role::User);
    }

    #[test]
    fn test_message_new() {
        let msg = Message::new(Role::User, "Hello world");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"user","content":"Hello world"}"#
        );

        let msg = Message::new(Role::Assistant, "I can help!");
        assert_eq!(
            serde_json::to_string(&msg).unwrap(),
            r#"{"role":"assistant","content":"I can help!"}"#
        );
    }

    #[tokio::test]
    async fn test_completion_basic() {
        let mut server = mockito::Server::new_async().await;

        let response_body = r#"{
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "created": 1694268190,
            "model": "gpt-3.5-turbo",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": "Hello!"
                },
                "finish_reason": "stop"
            }]
        }"#;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(response_body)
            .create();

        let messages = vec![Message::new(Role::User, "Hi")];
        let result = completion(
            &messages,
            server.url().as_str(),
            "test-key",
            "gpt-3.5-turbo",
            500,
        )
        .await;

        mock.assert();
        assert_eq!(result.unwrap(), "Hello!");
    }

    #[tokio::test]
    async fn test_completion_api_error() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
            .create();

        let messages = vec![Message::new(Role::User, "Hi")];
        let result = completion(
            &messages,
            server.url().as_str(),
            "sk-bad",
            "gpt-3.5-turbo",
            500,
        )
        .await;

        mock.assert();
        match result {
            Err(ChatError::Api { status, message }) => {
                assert_eq!(status, 401);
                assert!(message.contains("Incorrect API key"));
            }
            other => panic!("Expected Api error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_completion_malformed_response() {
        let mut server = mockito::Server::new_async().await;

        // 2xx but no choices in the body
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": "chatcmpl-123"}"#)
            .create();

        let messages = vec![Message::new(Role::User, "Hi")];
        let result = completion(
            &messages,
            server.url().as_str(),
            "test-key",
            "gpt-3.5-turbo",
            500,
        )
        .await;

        mock.assert();
        assert!(matches!(result, Err(ChatError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_list_models_ok() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/v1/models")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"object": "list", "data": []}"#)
            .create();

        let result = list_models(server.url().as_str(), "test-key").await;

        mock.assert();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_list_models_unauthorized() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/v1/models")
            .with_status(401)
            .with_body(r#"{"error": {"message": "Incorrect API key provided"}}"#)
            .create();

        let result = list_models(server.url().as_str(), "sk-bad").await;

        mock.assert();
        assert!(matches!(result, Err(ChatError::Api { status: 401, .. })));
    }
}
