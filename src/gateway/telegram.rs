//! Telegram Bot API Gateway
//!
//! Implements [`Gateway`] on top of the Telegram Bot API using plain JSON
//! requests over HTTPS. Joins are read from `message.new_chat_members`,
//! button presses from `callback_query`, both via `getUpdates` long polling.
//!
//! API failures are classified so the consent core can tell a missing admin
//! right (operator must fix the group) from a message that is already gone.

use super::traits::*;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Request timeout for everything except long polling
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Update kinds the bot subscribes to
const ALLOWED_UPDATES: [&str; 2] = ["message", "callback_query"];

/// The bot account behind a token (from `getMe`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotIdentity {
    pub id: MemberId,
    pub username: Option<String>,
}

/// Production gateway talking to the Telegram Bot API
#[derive(Clone)]
pub struct TelegramGateway {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    /// `<api_url>/bot<token>`
    endpoint: String,
    poll_timeout: Duration,
    /// Next update id to request
    offset: AtomicI64,
}

impl TelegramGateway {
    /// Create a gateway for the given bot token
    pub fn new(token: &str, api_url: &str, poll_timeout: Duration) -> GatewayResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GatewayError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http, token, api_url, poll_timeout))
    }

    fn with_client(
        http: reqwest::Client,
        token: &str,
        api_url: &str,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                endpoint: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
                poll_timeout,
                offset: AtomicI64::new(0),
            }),
        }
    }

    /// Look up the bot account behind the token
    pub async fn get_me(&self) -> GatewayResult<BotIdentity> {
        let user: TgUser = self.call("getMe", &json!({}), REQUEST_TIMEOUT).await?;
        Ok(BotIdentity {
            id: MemberId(user.id),
            username: user.username,
        })
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        params: &Value,
        timeout: Duration,
    ) -> GatewayResult<R> {
        let url = format!("{}/{}", self.inner.endpoint, method);
        let response = self
            .inner
            .http
            .post(&url)
            .json(params)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| GatewayError::Network(format!("{}: {}", method, e.without_url())))?;

        let status = response.status();
        let body: ApiResponse<R> = response.json().await.map_err(|e| {
            let message = format!("{} (HTTP {}): {}", method, status, e);
            // Proxies answer overload and outages with non-JSON pages
            if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                GatewayError::Network(message)
            } else {
                GatewayError::InvalidResponse(message)
            }
        })?;

        if body.ok {
            return body.result.ok_or_else(|| {
                GatewayError::InvalidResponse(format!("{}: ok response without result", method))
            });
        }

        let code = body.error_code.unwrap_or_else(|| i64::from(status.as_u16()));
        let description = body
            .description
            .unwrap_or_else(|| "no description".to_string());
        let retry_after = body.parameters.and_then(|p| p.retry_after);
        Err(classify_api_error(code, description, retry_after))
    }

    async fn ban(
        &self,
        group: GroupId,
        member: MemberId,
        until: Option<i64>,
    ) -> GatewayResult<()> {
        let mut params = json!({
            "chat_id": group.0,
            "user_id": member.0,
            "revoke_messages": false,
        });
        if let Some(until) = until {
            params["until_date"] = json!(until);
        }
        let _: bool = self.call("banChatMember", &params, REQUEST_TIMEOUT).await?;
        Ok(())
    }
}

#[async_trait]
impl Gateway for TelegramGateway {
    async fn next_events(&self) -> GatewayResult<Vec<GatewayEvent>> {
        let offset = self.inner.offset.load(Ordering::SeqCst);
        let params = json!({
            "offset": offset,
            "timeout": self.inner.poll_timeout.as_secs(),
            "allowed_updates": ALLOWED_UPDATES,
        });
        let updates: Vec<Update> = self
            .call(
                "getUpdates",
                &params,
                self.inner.poll_timeout + REQUEST_TIMEOUT,
            )
            .await?;

        if let Some(last) = updates.iter().map(|u| u.update_id).max() {
            self.inner.offset.store(last + 1, Ordering::SeqCst);
        }

        Ok(updates.into_iter().flat_map(Update::into_events).collect())
    }

    async fn restrict_member(
        &self,
        group: GroupId,
        member: MemberId,
        permissions: PermissionSet,
    ) -> GatewayResult<()> {
        let params = json!({
            "chat_id": group.0,
            "user_id": member.0,
            "permissions": chat_permissions(permissions),
            "use_independent_chat_permissions": true,
        });
        let _: bool = self
            .call("restrictChatMember", &params, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }

    async fn post_message(
        &self,
        group: GroupId,
        text: &str,
        buttons: Option<&[Button]>,
    ) -> GatewayResult<MessageId> {
        let mut params = json!({
            "chat_id": group.0,
            "text": text,
            "disable_web_page_preview": true,
        });
        if let Some(buttons) = buttons {
            params["reply_markup"] = inline_keyboard(buttons);
        }
        let sent: SentMessage = self.call("sendMessage", &params, REQUEST_TIMEOUT).await?;
        Ok(MessageId(sent.message_id))
    }

    async fn edit_message(
        &self,
        group: GroupId,
        message: MessageId,
        text: &str,
    ) -> GatewayResult<()> {
        let params = json!({
            "chat_id": group.0,
            "message_id": message.0,
            "text": text,
        });
        // Returns the edited Message; only success matters here
        let _: Value = self.call("editMessageText", &params, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    async fn delete_message(&self, group: GroupId, message: MessageId) -> GatewayResult<()> {
        let params = json!({
            "chat_id": group.0,
            "message_id": message.0,
        });
        let _: bool = self.call("deleteMessage", &params, REQUEST_TIMEOUT).await?;
        Ok(())
    }

    async fn remove_member(
        &self,
        group: GroupId,
        member: MemberId,
        removal: Removal,
    ) -> GatewayResult<()> {
        match removal {
            Removal::Reversible => {
                self.ban(group, member, None).await?;
                let params = json!({
                    "chat_id": group.0,
                    "user_id": member.0,
                    "only_if_banned": true,
                });
                let _: bool = self
                    .call("unbanChatMember", &params, REQUEST_TIMEOUT)
                    .await?;
                Ok(())
            }
            Removal::Cooldown(cooldown) => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default();
                let until = (now + cooldown).as_secs() as i64;
                self.ban(group, member, Some(until)).await
            }
        }
    }

    async fn acknowledge_button(
        &self,
        callback: &CallbackId,
        notice: Option<&str>,
    ) -> GatewayResult<()> {
        let mut params = json!({ "callback_query_id": callback.0 });
        if let Some(notice) = notice {
            params["text"] = json!(notice);
            params["show_alert"] = json!(true);
        }
        let _: bool = self
            .call("answerCallbackQuery", &params, REQUEST_TIMEOUT)
            .await?;
        Ok(())
    }
}

/// Map a Bot API error to a gateway error class
pub(crate) fn classify_api_error(
    code: i64,
    description: String,
    retry_after: Option<u64>,
) -> GatewayError {
    let lower = description.to_lowercase();

    if let Some(secs) = retry_after {
        GatewayError::RateLimited {
            retry_after: Duration::from_secs(secs),
            description,
        }
    } else if code == 403
        || lower.contains("not enough rights")
        || lower.contains("chat_admin_required")
        || lower.contains("need administrator rights")
    {
        GatewayError::PermissionDenied(description)
    } else if lower.contains("not found") {
        GatewayError::NotFound(description)
    } else if code == 429 || code >= 500 {
        GatewayError::Network(description)
    } else {
        GatewayError::Api { code, description }
    }
}

fn chat_permissions(permissions: PermissionSet) -> Value {
    let allow = permissions == PermissionSet::FullAccess;
    json!({
        "can_send_messages": allow,
        "can_send_audios": allow,
        "can_send_documents": allow,
        "can_send_photos": allow,
        "can_send_videos": allow,
        "can_send_video_notes": allow,
        "can_send_voice_notes": allow,
        "can_send_polls": allow,
        "can_send_other_messages": allow,
        "can_add_web_page_previews": allow,
        "can_change_info": allow,
        "can_invite_users": allow,
        "can_pin_messages": allow,
        "can_manage_topics": allow,
    })
}

fn inline_keyboard(buttons: &[Button]) -> Value {
    let row: Vec<Value> = buttons
        .iter()
        .map(|b| json!({ "text": b.label, "callback_data": b.payload }))
        .collect();
    json!({ "inline_keyboard": [row] })
}

#[derive(Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<i64>,
    parameters: Option<ResponseParameters>,
}

#[derive(Deserialize)]
struct ResponseParameters {
    retry_after: Option<u64>,
}

#[derive(Deserialize)]
struct SentMessage {
    message_id: i64,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<TgMessage>,
    callback_query: Option<TgCallbackQuery>,
}

#[derive(Debug, Deserialize)]
struct TgMessage {
    chat: TgChat,
    #[serde(default)]
    new_chat_members: Vec<TgUser>,
}

#[derive(Debug, Deserialize)]
struct TgChat {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct TgUser {
    id: i64,
    #[serde(default)]
    is_bot: bool,
    #[serde(default)]
    first_name: String,
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TgCallbackQuery {
    id: String,
    from: TgUser,
    data: Option<String>,
}

impl Update {
    fn into_events(self) -> Vec<GatewayEvent> {
        let mut events = Vec::new();

        if let Some(message) = self.message {
            let group_id = GroupId(message.chat.id);
            events.extend(message.new_chat_members.into_iter().map(|user| {
                GatewayEvent::MemberJoined {
                    group_id,
                    member: Member {
                        id: MemberId(user.id),
                        first_name: user.first_name,
                        is_bot: user.is_bot,
                    },
                }
            }));
        }

        if let Some(query) = self.callback_query {
            events.push(GatewayEvent::ButtonPressed(ButtonPress {
                callback_id: CallbackId(query.id),
                actor_id: MemberId(query.from.id),
                payload: query.data.unwrap_or_default(),
            }));
        }

        if events.is_empty() {
            debug!(update_id = self.update_id, "Ignoring update without join or button");
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Canned HTTP answer from the local Bot API stand-in
    struct Reply {
        status: u16,
        content_type: &'static str,
        body: String,
    }

    fn ok(result: Value) -> Reply {
        Reply {
            status: 200,
            content_type: "application/json",
            body: json!({ "ok": true, "result": result }).to_string(),
        }
    }

    type Requests = Arc<Mutex<Vec<(String, Value)>>>;

    /// Serve `reply` on a local port and record every `(method, params)` call
    async fn local_bot_api<F>(reply: F) -> (TelegramGateway, Requests)
    where
        F: Fn(&str, &Value) -> Reply + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));
        let reply = Arc::new(reply);

        let recorded = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut stream, _)) = listener.accept().await else {
                    return;
                };
                let (method, params) = read_request(&mut stream).await;
                recorded
                    .lock()
                    .unwrap()
                    .push((method.clone(), params.clone()));

                let answer = reply(&method, &params);
                let response = format!(
                    "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    answer.status,
                    answer.content_type,
                    answer.body.len(),
                    answer.body
                );
                stream.write_all(response.as_bytes()).await.unwrap();
                let _ = stream.shutdown().await;
            }
        });

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let gateway = TelegramGateway::with_client(
            http,
            "123:abc",
            &format!("http://{}", addr),
            Duration::ZERO,
        );
        (gateway, requests)
    }

    /// Read one request; returns the Bot API method and JSON params
    async fn read_request(stream: &mut tokio::net::TcpStream) -> (String, Value) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];

        let header_end = loop {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
        let content_length = head
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = stream.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..n]);
        }

        let path = head.split_whitespace().nth(1).unwrap_or_default();
        let method = path.rsplit('/').next().unwrap_or_default().to_string();
        let body = &buf[header_end..header_end + content_length];
        let params = serde_json::from_slice(body).unwrap_or(Value::Null);
        (method, params)
    }

    fn methods(requests: &Requests) -> Vec<String> {
        requests
            .lock()
            .unwrap()
            .iter()
            .map(|(method, _)| method.clone())
            .collect()
    }

    fn parse_updates(raw: &str) -> Vec<GatewayEvent> {
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        response
            .result
            .unwrap()
            .into_iter()
            .flat_map(Update::into_events)
            .collect()
    }

    #[test]
    fn test_join_update_becomes_member_joined() {
        let events = parse_updates(
            r#"{"ok":true,"result":[{"update_id":10,"message":{"message_id":5,
            "chat":{"id":-1001,"type":"supergroup"},
            "new_chat_members":[{"id":42,"is_bot":false,"first_name":"Alice"},
                                {"id":7,"is_bot":true,"first_name":"Helper","username":"helper_bot"}]}}]}"#,
        );

        assert_eq!(
            events,
            vec![
                GatewayEvent::MemberJoined {
                    group_id: GroupId(-1001),
                    member: Member {
                        id: MemberId(42),
                        first_name: "Alice".to_string(),
                        is_bot: false,
                    },
                },
                GatewayEvent::MemberJoined {
                    group_id: GroupId(-1001),
                    member: Member {
                        id: MemberId(7),
                        first_name: "Helper".to_string(),
                        is_bot: true,
                    },
                },
            ]
        );
    }

    #[test]
    fn test_callback_update_becomes_button_press() {
        let events = parse_updates(
            r#"{"ok":true,"result":[{"update_id":11,"callback_query":{"id":"cb-1",
            "from":{"id":42,"is_bot":false,"first_name":"Alice"},
            "chat_instance":"x","data":"consent:yes:-1001:42"}}]}"#,
        );

        assert_eq!(
            events,
            vec![GatewayEvent::ButtonPressed(ButtonPress {
                callback_id: CallbackId("cb-1".to_string()),
                actor_id: MemberId(42),
                payload: "consent:yes:-1001:42".to_string(),
            })]
        );
    }

    #[test]
    fn test_plain_message_yields_no_events() {
        let events = parse_updates(
            r#"{"ok":true,"result":[{"update_id":12,"message":{"message_id":6,
            "chat":{"id":-1001,"type":"supergroup"},"text":"hello"}}]}"#,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn test_classify_permission_errors() {
        let denied = [
            (400, "Bad Request: not enough rights to restrict/unrestrict chat member"),
            (403, "Forbidden: bot was kicked from the supergroup chat"),
            (400, "Bad Request: CHAT_ADMIN_REQUIRED"),
        ];

        for (code, description) in denied {
            assert!(
                matches!(
                    classify_api_error(code, description.to_string(), None),
                    GatewayError::PermissionDenied(_)
                ),
                "{} should be a permission error",
                description
            );
        }
    }

    #[test]
    fn test_classify_cleanup_and_transient_errors() {
        let not_found = "Bad Request: message to delete not found".to_string();
        assert!(matches!(
            classify_api_error(400, not_found, None),
            GatewayError::NotFound(_)
        ));

        let limited = classify_api_error(429, "Too Many Requests".to_string(), Some(3));
        assert!(limited.is_transient());
        assert_eq!(limited.retry_after(), Some(Duration::from_secs(3)));

        assert!(classify_api_error(502, "Bad Gateway".to_string(), None).is_transient());
        assert!(matches!(
            classify_api_error(400, "Bad Request: message is not modified".to_string(), None),
            GatewayError::Api { code: 400, .. }
        ));
    }

    #[test]
    fn test_permission_sets_map_to_chat_permissions() {
        let read_only = chat_permissions(PermissionSet::ReadOnly);
        let full = chat_permissions(PermissionSet::FullAccess);

        assert_eq!(read_only["can_send_messages"], json!(false));
        assert_eq!(read_only["can_send_photos"], json!(false));
        assert_eq!(full["can_send_messages"], json!(true));
        assert_eq!(full["can_send_other_messages"], json!(true));

        // Omitted fields count as false, so every field must be present
        for field in [
            "can_change_info",
            "can_invite_users",
            "can_pin_messages",
            "can_manage_topics",
        ] {
            assert_eq!(full[field], json!(true), "{}", field);
            assert_eq!(read_only[field], json!(false), "{}", field);
        }
    }

    #[test]
    fn test_inline_keyboard_is_single_row() {
        let keyboard = inline_keyboard(&[
            Button {
                label: "Yes".to_string(),
                payload: "consent:yes:-1:2".to_string(),
            },
            Button {
                label: "No".to_string(),
                payload: "consent:no:-1:2".to_string(),
            },
        ]);

        let rows = keyboard["inline_keyboard"].as_array().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1]["callback_data"], json!("consent:no:-1:2"));
    }

    #[test]
    fn test_endpoint_strips_trailing_slash() {
        let gateway =
            TelegramGateway::new("123:abc", "https://api.telegram.org/", Duration::from_secs(30))
                .unwrap();
        assert_eq!(gateway.inner.endpoint, "https://api.telegram.org/bot123:abc");
    }

    #[tokio::test]
    async fn test_reversible_removal_bans_then_unbans() {
        let (gateway, requests) = local_bot_api(|_, _| ok(json!(true))).await;

        gateway
            .remove_member(GroupId(-1001), MemberId(42), Removal::Reversible)
            .await
            .unwrap();

        assert_eq!(methods(&requests), vec!["banChatMember", "unbanChatMember"]);
        let requests = requests.lock().unwrap();
        let (_, ban) = &requests[0];
        assert_eq!(ban["chat_id"], json!(-1001));
        assert_eq!(ban["user_id"], json!(42));
        assert!(ban.get("until_date").is_none());
        let (_, unban) = &requests[1];
        assert_eq!(unban["user_id"], json!(42));
        assert_eq!(unban["only_if_banned"], json!(true));
    }

    #[tokio::test]
    async fn test_cooldown_removal_bans_until_deadline() {
        let (gateway, requests) = local_bot_api(|_, _| ok(json!(true))).await;
        let now = || {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_secs() as i64
        };

        let before = now();
        gateway
            .remove_member(
                GroupId(-1001),
                MemberId(42),
                Removal::Cooldown(Duration::from_secs(600)),
            )
            .await
            .unwrap();
        let after = now();

        assert_eq!(methods(&requests), vec!["banChatMember"]);
        let until = requests.lock().unwrap()[0].1["until_date"]
            .as_i64()
            .unwrap();
        assert!((before + 600..=after + 600).contains(&until));
    }

    #[tokio::test]
    async fn test_get_updates_advances_offset() {
        let (gateway, requests) = local_bot_api(|_, params| {
            if params["offset"] == json!(0) {
                ok(json!([
                    {"update_id": 9, "message": {"message_id": 1, "chat": {"id": -1001},
                        "new_chat_members": [{"id": 42, "is_bot": false, "first_name": "Alice"}]}},
                    {"update_id": 7, "message": {"message_id": 2, "chat": {"id": -1001},
                        "text": "hi"}}
                ]))
            } else {
                ok(json!([]))
            }
        })
        .await;

        let first = gateway.next_events().await.unwrap();
        let second = gateway.next_events().await.unwrap();

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].1["offset"], json!(0));
        assert_eq!(requests[1].1["offset"], json!(10));
        assert_eq!(
            requests[0].1["allowed_updates"],
            json!(["message", "callback_query"])
        );
    }

    #[tokio::test]
    async fn test_html_bad_gateway_is_transient() {
        let (gateway, _) = local_bot_api(|_, _| Reply {
            status: 502,
            content_type: "text/html",
            body: "<html><body>502 Bad Gateway</body></html>".to_string(),
        })
        .await;

        let err = gateway
            .restrict_member(GroupId(-1001), MemberId(42), PermissionSet::FullAccess)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Network(_)), "got {:?}", err);
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_garbled_success_is_invalid_response() {
        let (gateway, _) = local_bot_api(|_, _| Reply {
            status: 200,
            content_type: "text/plain",
            body: "hello".to_string(),
        })
        .await;

        let err = gateway
            .delete_message(GroupId(-1001), MessageId(5))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::InvalidResponse(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_rate_limit_carries_retry_after() {
        let (gateway, _) = local_bot_api(|_, _| Reply {
            status: 429,
            content_type: "application/json",
            body: json!({
                "ok": false,
                "error_code": 429,
                "description": "Too Many Requests: retry after 17",
                "parameters": { "retry_after": 17 }
            })
            .to_string(),
        })
        .await;

        let err = gateway
            .restrict_member(GroupId(-1001), MemberId(42), PermissionSet::FullAccess)
            .await
            .unwrap_err();

        assert_eq!(err.retry_after(), Some(Duration::from_secs(17)));
    }

    #[tokio::test]
    async fn test_missing_rights_is_permission_error() {
        let (gateway, requests) = local_bot_api(|_, _| Reply {
            status: 400,
            content_type: "application/json",
            body: json!({
                "ok": false,
                "error_code": 400,
                "description": "Bad Request: not enough rights to restrict/unrestrict chat member"
            })
            .to_string(),
        })
        .await;

        let err = gateway
            .restrict_member(GroupId(-1001), MemberId(42), PermissionSet::ReadOnly)
            .await
            .unwrap_err();

        assert!(err.is_permission());
        let requests = requests.lock().unwrap();
        assert_eq!(requests[0].0, "restrictChatMember");
        assert_eq!(requests[0].1["permissions"]["can_send_messages"], json!(false));
        assert_eq!(requests[0].1["use_independent_chat_permissions"], json!(true));
    }
}
