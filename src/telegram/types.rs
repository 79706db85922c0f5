//! Bot API wire types
//!
//! Only the fields the bot reads or writes are modelled; serde ignores the
//! rest.

use crate::inline::InlineArticle;
use crate::keyboard::{Action, InlineButton, Keyboard};
use crate::runtime::Incoming;
use crate::state_machine::{ChatId, ChatKind, Reply, Sender, UserId};
use serde::{Deserialize, Serialize};

// ============================================================================
// Envelope
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<u16>,
    pub description: Option<String>,
    pub parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
pub struct ResponseParameters {
    pub retry_after: Option<u64>,
}

// ============================================================================
// Inbound
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
    pub callback_query: Option<CallbackQuery>,
    pub inline_query: Option<InlineQuery>,
    pub my_chat_member: Option<ChatMemberUpdated>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        match &self.last_name {
            Some(last) => format!("{} {last}", self.first_name),
            None => self.first_name.clone(),
        }
    }

    pub fn to_sender(&self) -> Sender {
        Sender {
            id: UserId(self.id),
            username: self.username.clone(),
            full_name: self.full_name(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Option<String>,
}

impl Chat {
    fn chat_kind(&self) -> ChatKind {
        if self.kind == "private" {
            ChatKind::Private
        } else {
            ChatKind::Group
        }
    }

    fn is_group(&self) -> bool {
        matches!(self.kind.as_str(), "group" | "supergroup")
    }
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub from: Option<User>,
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    pub message: Option<Message>,
    pub data: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct InlineQuery {
    pub id: String,
    pub from: User,
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatMemberUpdated {
    pub chat: Chat,
    pub old_chat_member: ChatMember,
    pub new_chat_member: ChatMember,
}

#[derive(Debug, Deserialize)]
pub struct ChatMember {
    pub status: String,
}

impl ChatMember {
    fn is_present(&self) -> bool {
        matches!(
            self.status.as_str(),
            "creator" | "administrator" | "member" | "restricted"
        )
    }
}

impl Update {
    /// Translate into a transport-neutral event; `None` for updates the bot
    /// does not act on (anonymous senders, other membership changes)
    pub fn into_incoming(self) -> Option<Incoming> {
        if let Some(message) = self.message {
            let sender = message.from?;
            return Some(Incoming::Message {
                chat: ChatId(message.chat.id),
                chat_kind: message.chat.chat_kind(),
                sender: sender.to_sender(),
                text: message.text,
            });
        }

        if let Some(query) = self.callback_query {
            let chat = query
                .message
                .as_ref()
                .map_or(ChatId(query.from.id), |m| ChatId(m.chat.id));
            return Some(Incoming::Button {
                action: query.data.as_deref().and_then(Action::decode),
                callback_id: query.id,
                chat,
                sender: query.from.to_sender(),
            });
        }

        if let Some(query) = self.inline_query {
            return Some(Incoming::InlineQuery {
                query_id: query.id,
                sender: query.from.to_sender(),
                query: query.query,
            });
        }

        if let Some(update) = self.my_chat_member {
            let joined = !update.old_chat_member.is_present() && update.new_chat_member.is_present();
            if joined && update.chat.is_group() {
                return Some(Incoming::AddedToGroup {
                    chat: ChatId(update.chat.id),
                    title: update.chat.title,
                });
            }
        }

        None
    }
}

// ============================================================================
// Outbound
// ============================================================================

#[derive(Debug, Serialize)]
pub struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

pub const ALLOWED_UPDATES: &[&str] = &["message", "callback_query", "inline_query", "my_chat_member"];

#[derive(Debug, Serialize)]
pub struct DeleteWebhook {
    pub drop_pending_updates: bool,
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: i64,
    pub text: &'a str,
    pub parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
}

impl<'a> SendMessage<'a> {
    pub fn new(chat: ChatId, reply: &'a Reply) -> Self {
        Self {
            chat_id: chat.0,
            text: &reply.text,
            parse_mode: "HTML",
            reply_markup: reply.keyboard.as_ref().map(ReplyMarkup::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Reply(ReplyKeyboardMarkup),
    Inline(InlineKeyboardMarkup),
}

#[derive(Debug, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_field_placeholder: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct KeyboardButton {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

impl From<&InlineButton> for InlineKeyboardButton {
    fn from(button: &InlineButton) -> Self {
        Self {
            text: button.label.clone(),
            callback_data: button.action.encode(),
        }
    }
}

impl From<&Keyboard> for ReplyMarkup {
    fn from(keyboard: &Keyboard) -> Self {
        match keyboard {
            Keyboard::Reply { rows, placeholder } => ReplyMarkup::Reply(ReplyKeyboardMarkup {
                keyboard: rows
                    .iter()
                    .map(|row| {
                        row.iter()
                            .map(|label| KeyboardButton {
                                text: label.clone(),
                            })
                            .collect()
                    })
                    .collect(),
                resize_keyboard: true,
                input_field_placeholder: placeholder.clone(),
            }),
            Keyboard::Inline { rows } => ReplyMarkup::Inline(InlineKeyboardMarkup {
                inline_keyboard: rows
                    .iter()
                    .map(|row| row.iter().map(InlineKeyboardButton::from).collect())
                    .collect(),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerCallbackQuery<'a> {
    pub callback_query_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct AnswerInlineQuery<'a> {
    pub inline_query_id: &'a str,
    pub results: Vec<InlineQueryResultArticle<'a>>,
    pub cache_time: u32,
    pub is_personal: bool,
}

#[derive(Debug, Serialize)]
pub struct InlineQueryResultArticle<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'a str,
    pub title: &'a str,
    pub description: &'a str,
    pub input_message_content: InputTextMessageContent<'a>,
}

#[derive(Debug, Serialize)]
pub struct InputTextMessageContent<'a> {
    pub message_text: &'a str,
    pub parse_mode: &'static str,
}

impl<'a> AnswerInlineQuery<'a> {
    pub fn single(query_id: &'a str, article: &'a InlineArticle) -> Self {
        Self {
            inline_query_id: query_id,
            results: vec![InlineQueryResultArticle {
                kind: "article",
                id: &article.id,
                title: &article.title,
                description: &article.description,
                input_message_content: InputTextMessageContent {
                    message_text: &article.message_text,
                    parse_mode: "HTML",
                },
            }],
            cache_time: 1,
            is_personal: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SetMyCommands {
    pub commands: Vec<BotCommand>,
    pub scope: BotCommandScope,
}

#[derive(Debug, Serialize)]
pub struct BotCommand {
    pub command: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BotCommandScope {
    AllPrivateChats,
    AllGroupChats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Option<Incoming> {
        serde_json::from_value::<Update>(value).unwrap().into_incoming()
    }

    #[test]
    fn test_private_text_message() {
        let incoming = parse(json!({
            "update_id": 10,
            "message": {
                "message_id": 1,
                "from": {"id": 42, "is_bot": false, "first_name": "Ann", "last_name": "Lee", "username": "ann"},
                "chat": {"id": 42, "type": "private", "first_name": "Ann"},
                "date": 1_700_000_000,
                "text": "/calc"
            }
        }));
        let Some(Incoming::Message { chat, chat_kind, sender, text }) = incoming else {
            panic!("expected message, got {incoming:?}");
        };
        assert_eq!(chat, ChatId(42));
        assert_eq!(chat_kind, ChatKind::Private);
        assert_eq!(sender.full_name, "Ann Lee");
        assert_eq!(sender.username.as_deref(), Some("ann"));
        assert_eq!(text.as_deref(), Some("/calc"));
    }

    #[test]
    fn test_non_text_message_has_no_text() {
        let incoming = parse(json!({
            "update_id": 11,
            "message": {
                "message_id": 2,
                "from": {"id": 42, "first_name": "Ann"},
                "chat": {"id": 42, "type": "private"},
                "sticker": {"file_id": "x"}
            }
        }));
        let Some(Incoming::Message { chat, chat_kind, text, .. }) = incoming else {
            panic!("expected message, got {incoming:?}");
        };
        assert_eq!(chat, ChatId(42));
        assert_eq!(chat_kind, ChatKind::Private);
        assert_eq!(text, None);
    }

    #[test]
    fn test_supergroup_message_is_group_kind() {
        let incoming = parse(json!({
            "update_id": 12,
            "message": {
                "message_id": 3,
                "from": {"id": 42, "first_name": "Ann"},
                "chat": {"id": -100_123, "type": "supergroup", "title": "Squad"},
                "text": "hi"
            }
        }));
        assert!(matches!(
            incoming,
            Some(Incoming::Message { chat_kind: ChatKind::Group, .. })
        ));
    }

    #[test]
    fn test_callback_query_decodes_action() {
        let incoming = parse(json!({
            "update_id": 13,
            "callback_query": {
                "id": "cb-1",
                "from": {"id": 1, "first_name": "Admin"},
                "message": {"message_id": 5, "chat": {"id": 1, "type": "private"}},
                "chat_instance": "x",
                "data": "{\"kind\":\"reply_to\",\"user_id\":42}"
            }
        }));
        let Some(Incoming::Button { callback_id, chat, action, .. }) = incoming else {
            panic!("expected button, got {incoming:?}");
        };
        assert_eq!(callback_id, "cb-1");
        assert_eq!(chat, ChatId(1));
        assert_eq!(action, Some(Action::ReplyTo { user_id: UserId(42) }));
    }

    #[test]
    fn test_callback_query_with_foreign_payload() {
        let incoming = parse(json!({
            "update_id": 14,
            "callback_query": {
                "id": "cb-2",
                "from": {"id": 7, "first_name": "Bob"},
                "data": "reply_to_42"
            }
        }));
        let Some(Incoming::Button { chat, action, .. }) = incoming else {
            panic!("expected button, got {incoming:?}");
        };
        assert_eq!(chat, ChatId(7));
        assert_eq!(action, None);
    }

    #[test]
    fn test_inline_query() {
        let incoming = parse(json!({
            "update_id": 15,
            "inline_query": {
                "id": "iq-1",
                "from": {"id": 42, "first_name": "Ann"},
                "query": "100 55 60",
                "offset": ""
            }
        }));
        assert!(matches!(
            incoming,
            Some(Incoming::InlineQuery { ref query_id, ref query, .. })
                if query_id == "iq-1" && query == "100 55 60"
        ));
    }

    #[test]
    fn test_added_to_group() {
        let update = |old: &str, new: &str, kind: &str| {
            json!({
                "update_id": 16,
                "my_chat_member": {
                    "chat": {"id": -5, "type": kind, "title": "Squad"},
                    "from": {"id": 42, "first_name": "Ann"},
                    "date": 0,
                    "old_chat_member": {"status": old, "user": {"id": 99, "is_bot": true, "first_name": "Bot"}},
                    "new_chat_member": {"status": new, "user": {"id": 99, "is_bot": true, "first_name": "Bot"}}
                }
            })
        };

        assert!(matches!(
            parse(update("left", "member", "group")),
            Some(Incoming::AddedToGroup { chat: ChatId(-5), .. })
        ));
        assert!(parse(update("member", "left", "group")).is_none());
        assert!(parse(update("member", "administrator", "supergroup")).is_none());
        assert!(parse(update("kicked", "member", "private")).is_none());
    }

    #[test]
    fn test_send_message_with_inline_keyboard() {
        let reply = Reply::with_keyboard("hi", Keyboard::reply_to(UserId(42)));
        let value = serde_json::to_value(SendMessage::new(ChatId(1), &reply)).unwrap();
        assert_eq!(value["chat_id"], 1);
        assert_eq!(value["parse_mode"], "HTML");
        let button = &value["reply_markup"]["inline_keyboard"][0][0];
        assert_eq!(button["callback_data"], "{\"kind\":\"reply_to\",\"user_id\":42}");
    }

    #[test]
    fn test_send_message_with_reply_keyboard() {
        let reply = Reply::with_keyboard("hi", Keyboard::cancel_calculation());
        let value = serde_json::to_value(SendMessage::new(ChatId(1), &reply)).unwrap();
        let markup = &value["reply_markup"];
        assert_eq!(markup["resize_keyboard"], true);
        assert!(markup["keyboard"][0][0]["text"].is_string());

        let plain = Reply::new("hi");
        let value = serde_json::to_value(SendMessage::new(ChatId(1), &plain)).unwrap();
        assert!(value.get("reply_markup").is_none());
    }

    #[test]
    fn test_callback_data_fits_limit() {
        let action = Action::ReplyTo {
            user_id: UserId(i64::MIN),
        };
        assert!(action.encode().len() <= 64);
    }

    #[test]
    fn test_error_envelope() {
        let response: ApiResponse<bool> = serde_json::from_value(json!({
            "ok": false,
            "error_code": 429,
            "description": "Too Many Requests: retry after 3",
            "parameters": {"retry_after": 3}
        }))
        .unwrap();
        assert!(!response.ok);
        assert_eq!(response.error_code, Some(429));
        assert_eq!(response.parameters.and_then(|p| p.retry_after), Some(3));
    }

    #[test]
    fn test_command_scope_serialization() {
        let value = serde_json::to_value(BotCommandScope::AllPrivateChats).unwrap();
        assert_eq!(value, json!({"type": "all_private_chats"}));
    }
}
