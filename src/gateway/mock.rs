//! Mock Gateway for Testing
//!
//! Records every outbound call and lets tests inject failures and inbound
//! events without a real chat platform.

use super::traits::*;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Outbound call recorded by [`MockGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Restrict {
        group: GroupId,
        member: MemberId,
        permissions: PermissionSet,
    },
    Post {
        group: GroupId,
        message: MessageId,
        text: String,
        buttons: Vec<Button>,
    },
    Edit {
        group: GroupId,
        message: MessageId,
        text: String,
    },
    Delete {
        group: GroupId,
        message: MessageId,
    },
    Remove {
        group: GroupId,
        member: MemberId,
        removal: Removal,
    },
    Acknowledge {
        callback: CallbackId,
        notice: Option<String>,
    },
}

/// Which outbound operation a failure applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    Fetch,
    Restrict,
    Post,
    Edit,
    Delete,
    Remove,
}

#[derive(Default)]
struct MockState {
    calls: Vec<GatewayCall>,
    incoming: Vec<GatewayEvent>,
    failures: Vec<FailOn>,
    next_message_id: i64,
}

/// Mock gateway for testing
#[derive(Clone, Default)]
pub struct MockGateway {
    state: Arc<Mutex<MockState>>,
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an inbound event for the next `next_events` call
    pub fn push_event(&self, event: GatewayEvent) {
        self.state.lock().unwrap().incoming.push(event);
    }

    /// Make every subsequent call of the given kind fail
    pub fn fail_on(&self, op: FailOn) {
        self.state.lock().unwrap().failures.push(op);
    }

    /// All recorded calls, in order
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Recorded restrict calls
    pub fn restricts(&self) -> Vec<(MemberId, PermissionSet)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Restrict {
                    member,
                    permissions,
                    ..
                } => Some((member, permissions)),
                _ => None,
            })
            .collect()
    }

    /// Recorded removals
    pub fn removals(&self) -> Vec<(MemberId, Removal)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Remove {
                    member, removal, ..
                } => Some((member, removal)),
                _ => None,
            })
            .collect()
    }

    /// Recorded posts as (message id, text, buttons)
    pub fn posts(&self) -> Vec<(MessageId, String, Vec<Button>)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Post {
                    message,
                    text,
                    buttons,
                    ..
                } => Some((message, text, buttons)),
                _ => None,
            })
            .collect()
    }

    /// Recorded deletions
    pub fn deleted(&self) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Delete { message, .. } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Recorded acknowledgement notices, `None` for silent acknowledgements
    pub fn acknowledgements(&self) -> Vec<Option<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                GatewayCall::Acknowledge { notice, .. } => Some(notice),
                _ => None,
            })
            .collect()
    }

    /// Clear recorded calls (injected failures are kept)
    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn check(&self, op: FailOn) -> GatewayResult<()> {
        if self.state.lock().unwrap().failures.contains(&op) {
            return Err(match op {
                FailOn::Restrict | FailOn::Remove => {
                    GatewayError::PermissionDenied("not enough rights".to_string())
                }
                FailOn::Delete | FailOn::Edit => {
                    GatewayError::NotFound("message not found".to_string())
                }
                FailOn::Fetch | FailOn::Post => {
                    GatewayError::Network("connection reset".to_string())
                }
            });
        }
        Ok(())
    }

    fn record(&self, call: GatewayCall) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn next_events(&self) -> GatewayResult<Vec<GatewayEvent>> {
        self.check(FailOn::Fetch)?;
        let mut state = self.state.lock().unwrap();
        Ok(state.incoming.drain(..).collect())
    }

    async fn restrict_member(
        &self,
        group: GroupId,
        member: MemberId,
        permissions: PermissionSet,
    ) -> GatewayResult<()> {
        self.check(FailOn::Restrict)?;
        self.record(GatewayCall::Restrict {
            group,
            member,
            permissions,
        });
        Ok(())
    }

    async fn post_message(
        &self,
        group: GroupId,
        text: &str,
        buttons: Option<&[Button]>,
    ) -> GatewayResult<MessageId> {
        self.check(FailOn::Post)?;
        let mut state = self.state.lock().unwrap();
        state.next_message_id += 1;
        let message = MessageId(state.next_message_id);
        state.calls.push(GatewayCall::Post {
            group,
            message,
            text: text.to_string(),
            buttons: buttons.map(<[Button]>::to_vec).unwrap_or_default(),
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        group: GroupId,
        message: MessageId,
        text: &str,
    ) -> GatewayResult<()> {
        self.check(FailOn::Edit)?;
        self.record(GatewayCall::Edit {
            group,
            message,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_message(&self, group: GroupId, message: MessageId) -> GatewayResult<()> {
        self.check(FailOn::Delete)?;
        self.record(GatewayCall::Delete { group, message });
        Ok(())
    }

    async fn remove_member(
        &self,
        group: GroupId,
        member: MemberId,
        removal: Removal,
    ) -> GatewayResult<()> {
        self.check(FailOn::Remove)?;
        self.record(GatewayCall::Remove {
            group,
            member,
            removal,
        });
        Ok(())
    }

    async fn acknowledge_button(
        &self,
        callback: &CallbackId,
        notice: Option<&str>,
    ) -> GatewayResult<()> {
        self.record(GatewayCall::Acknowledge {
            callback: callback.clone(),
            notice: notice.map(str::to_string),
        });
        Ok(())
    }
}
