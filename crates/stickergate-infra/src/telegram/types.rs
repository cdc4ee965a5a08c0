//! Bot API wire types.
//!
//! Request payloads for the methods the client calls, and the response
//! envelope every method answers with. Result payloads deserialize
//! directly into the domain types from `stickergate-types`.

use serde::{Deserialize, Serialize};

/// The envelope every Bot API method answers with.
#[derive(Debug, Deserialize)]
pub(super) struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default = "Option::default")]
    pub result: Option<T>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Payload for methods that take no parameters (`getMe`).
#[derive(Debug, Serialize)]
pub(super) struct Empty {}

#[derive(Debug, Serialize)]
pub(super) struct SendMessageRequest<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to_message_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct SendStickerRequest<'a> {
    pub chat_id: i64,
    pub sticker: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct MemberRef {
    pub chat_id: i64,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct RestrictRequest {
    pub chat_id: i64,
    pub user_id: i64,
    pub permissions: ChatPermissions,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatPermissions {
    pub can_send_messages: bool,
}

#[derive(Debug, Serialize)]
pub(super) struct ChatRef {
    pub chat_id: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct GetUpdatesRequest {
    pub offset: i64,
    pub limit: i64,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[cfg(test)]
mod tests {
    use super::*;
    use stickergate_types::chat::{Message, User};

    #[test]
    fn test_ok_response_parses_result() {
        let json = r#"{"ok": true, "result": {"id": 1000, "first_name": "Gatekeeper", "username": "gatekeeper_bot", "is_bot": true}}"#;
        let resp: ApiResponse<User> = serde_json::from_str(json).unwrap();
        assert!(resp.ok);
        assert_eq!(resp.result.unwrap().username.as_deref(), Some("gatekeeper_bot"));
    }

    #[test]
    fn test_error_response_parses_description() {
        let json = r#"{"ok": false, "error_code": 403, "description": "Forbidden: bot was kicked"}"#;
        let resp: ApiResponse<Message> = serde_json::from_str(json).unwrap();
        assert!(!resp.ok);
        assert!(resp.result.is_none());
        assert_eq!(resp.error_code, Some(403));
        assert_eq!(resp.description.as_deref(), Some("Forbidden: bot was kicked"));
    }

    #[test]
    fn test_reply_field_omitted_when_absent() {
        let req = SendMessageRequest {
            chat_id: -1,
            text: "hi",
            parse_mode: "HTML",
            reply_to_message_id: None,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("reply_to_message_id"));

        let req = SendMessageRequest {
            reply_to_message_id: Some(44),
            ..req
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains(r#""reply_to_message_id":44"#));
    }
}
