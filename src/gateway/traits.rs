//! Messaging Gateway Trait Abstractions
//!
//! The consent core never talks to a chat platform directly. Everything it
//! needs (mute, post, delete, ban, button acknowledgement, inbound events)
//! goes through [`Gateway`], which lets `MockGateway` stand in for the real
//! platform in tests.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Chat/group identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub i64);

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub i64);

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a message posted in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub i64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque identifier of a button press, needed to acknowledge it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackId(pub String);

/// A member as delivered by a join event.
///
/// The display name is only used to render the prompt and is never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub is_bot: bool,
}

/// Named permission sets. Passed by value, never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionSet {
    /// Can read, cannot send anything
    ReadOnly,
    /// Regular member permissions restored
    FullAccess,
}

/// How a member is removed from a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Removed and immediately allowed to rejoin
    Reversible,
    /// Banned until the cooldown elapses, then the platform lifts the ban
    Cooldown(Duration),
}

/// Inline button attached to a posted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

/// Button press delivered by the platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonPress {
    pub callback_id: CallbackId,
    /// User who pressed the button
    pub actor_id: MemberId,
    /// Raw button data, parsed by the consent core
    pub payload: String,
}

/// Inbound events consumed by the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    MemberJoined { group_id: GroupId, member: Member },
    ButtonPressed(ButtonPress),
}

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limited, retry after {}s: {description}", .retry_after.as_secs())]
    RateLimited {
        retry_after: Duration,
        description: String,
    },

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("API error {code}: {description}")]
    Api { code: i64, description: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// Transient failures worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GatewayError::Network(_) | GatewayError::RateLimited { .. }
        )
    }

    /// Server-requested wait before the next attempt
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            GatewayError::RateLimited { retry_after, .. } => Some(*retry_after),
            _ => None,
        }
    }

    /// The bot lacks rights in the group; an operator has to intervene
    pub fn is_permission(&self) -> bool {
        matches!(self, GatewayError::PermissionDenied(_))
    }
}

/// Messaging platform abstraction.
///
/// Implementations are cheap to clone (shared state behind an `Arc`) because
/// the consent core hands clones to spawned tasks.
#[async_trait]
pub trait Gateway: Clone + Send + Sync + 'static {
    /// Receive pending inbound events (may block until some arrive)
    async fn next_events(&self) -> GatewayResult<Vec<GatewayEvent>>;

    /// Apply a permission set to a member. Re-applying the same set succeeds.
    async fn restrict_member(
        &self,
        group: GroupId,
        member: MemberId,
        permissions: PermissionSet,
    ) -> GatewayResult<()>;

    /// Post a message, optionally with a row of inline buttons
    async fn post_message(
        &self,
        group: GroupId,
        text: &str,
        buttons: Option<&[Button]>,
    ) -> GatewayResult<MessageId>;

    /// Replace the text of a posted message (drops its buttons)
    async fn edit_message(&self, group: GroupId, message: MessageId, text: &str)
        -> GatewayResult<()>;

    /// Delete a posted message
    async fn delete_message(&self, group: GroupId, message: MessageId) -> GatewayResult<()>;

    /// Remove a member from a group
    async fn remove_member(
        &self,
        group: GroupId,
        member: MemberId,
        removal: Removal,
    ) -> GatewayResult<()>;

    /// Acknowledge a button press, optionally showing a notice to the presser
    async fn acknowledge_button(
        &self,
        callback: &CallbackId,
        notice: Option<&str>,
    ) -> GatewayResult<()>;
}
