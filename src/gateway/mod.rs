//! Messaging Gateway Module
//!
//! The chat platform as seen by the consent core:
//! - `traits`: the [`Gateway`] contract and shared identifier types
//! - `mock`: in-memory gateway that records calls (tests)
//! - `telegram`: Telegram Bot API adapter (production)
//! - `retry`: backoff for enforcement calls

pub mod mock;
pub mod retry;
pub mod telegram;
pub mod traits;

pub use mock::MockGateway;
pub use telegram::TelegramGateway;
pub use traits::{
    Button, ButtonPress, CallbackId, Gateway, GatewayError, GatewayEvent, GatewayResult,
    GroupId, Member, MemberId, MessageId, PermissionSet, Removal,
};
