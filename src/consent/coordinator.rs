//! Consent Coordinator
//!
//! Drives each member through mute → prompt → {accept, decline, expire}.
//!
//! Correctness rests on one property: the registry removal is atomic, so
//! exactly one of the three terminal transitions observes the entry and
//! performs side effects. The others see `None` and do nothing. Timer
//! cancellation is only an optimization on top of that.

use super::action::{Choice, ConsentAction};
use super::registry::{PendingEntry, PendingKey, PendingRegistry, Resolution};
use super::text::{
    msg_consent_prompt, LABEL_ACCEPT, LABEL_DECLINE, MSG_ACCEPTED, MSG_DECLINED, MSG_EXPIRED,
    MSG_NOT_FOR_YOU,
};
use super::timer::{TimerId, TimerService, TokioTimerService};
use crate::gateway::retry::{gateway_retry_policy, retry_with_backoff};
use crate::gateway::traits::*;
use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Default decision window
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Default lifetime of transient confirmations
pub const DEFAULT_NOTICE_TTL: Duration = Duration::from_secs(5);

/// Runtime settings for the consent flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentSettings {
    /// Decision window before the member is removed
    pub timeout: Duration,
    pub policy_url: String,
    /// Consent version tag shown in the prompt
    pub version: String,
    /// How members are removed when the window elapses
    pub expiry_removal: Removal,
    /// Delay before transient confirmations delete themselves
    pub notice_ttl: Duration,
}

impl Default for ConsentSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            policy_url: "https://example.com/privacy".to_string(),
            version: "1.0".to_string(),
            expiry_removal: Removal::Reversible,
            notice_ttl: DEFAULT_NOTICE_TTL,
        }
    }
}

/// Join aborted before any pending state was created
#[derive(Debug, thiserror::Error)]
pub enum ConsentError {
    #[error("Failed to mute member {member} in group {group}: {source}")]
    Restrict {
        group: GroupId,
        member: MemberId,
        #[source]
        source: GatewayError,
    },

    #[error("Failed to post consent prompt for member {member} in group {group}: {source}")]
    Prompt {
        group: GroupId,
        member: MemberId,
        #[source]
        source: GatewayError,
    },
}

impl ConsentError {
    /// The bot lacks admin rights in the group
    pub fn is_permission(&self) -> bool {
        match self {
            ConsentError::Restrict { source, .. } | ConsentError::Prompt { source, .. } => {
                source.is_permission()
            }
        }
    }
}

/// Result of a join event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    /// Member muted and prompted, timer running
    Pending,
    /// Bot accounts are not gated
    IgnoredBot,
}

/// Result of a button press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonOutcome {
    Accepted,
    Declined,
    /// Decision already made or window already elapsed
    Stale,
    /// Pressed by someone other than the prompted member
    NotForYou,
    /// Unparseable button data
    Malformed,
}

/// Result of a timer firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireOutcome {
    Expired,
    /// The member already decided
    Stale,
}

/// Owns the pending registry and expiry timers and runs all transitions
pub struct ConsentCoordinator<G: Gateway, T: TimerService = TokioTimerService> {
    gateway: G,
    timers: T,
    registry: PendingRegistry,
    settings: ConsentSettings,
}

impl<G: Gateway> ConsentCoordinator<G, TokioTimerService> {
    /// Coordinator with tokio-backed timers
    pub fn with_tokio_timers(gateway: G, settings: ConsentSettings) -> Arc<Self> {
        Self::new(gateway, TokioTimerService::new(), settings)
    }
}

impl<G: Gateway, T: TimerService> ConsentCoordinator<G, T> {
    pub fn new(gateway: G, timers: T, settings: ConsentSettings) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            timers,
            registry: PendingRegistry::new(),
            settings,
        })
    }

    pub fn registry(&self) -> &PendingRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &ConsentSettings {
        &self.settings
    }

    /// Dispatch one inbound event. Join failures are reported to the operator
    /// through the log; nothing else is surfaced.
    pub async fn handle_event(self: &Arc<Self>, event: GatewayEvent) {
        match event {
            GatewayEvent::MemberJoined { group_id, member } => {
                if let Err(e) = self.on_member_joined(group_id, member).await {
                    if e.is_permission() {
                        error!(
                            group = %group_id,
                            "{} (grant the bot the right to restrict members and delete messages)",
                            e
                        );
                    } else {
                        error!(group = %group_id, "{}", e);
                    }
                }
            }
            GatewayEvent::ButtonPressed(press) => {
                let outcome = self.on_button_pressed(press).await;
                debug!(?outcome, "Button press handled");
            }
        }
    }

    /// Join: mute, post the prompt, start the expiry timer.
    ///
    /// Any failure aborts before a registry entry exists.
    pub async fn on_member_joined(
        self: &Arc<Self>,
        group_id: GroupId,
        member: Member,
    ) -> Result<JoinOutcome, ConsentError> {
        if member.is_bot {
            debug!(group = %group_id, "Ignoring bot account join");
            return Ok(JoinOutcome::IgnoredBot);
        }

        let key = PendingKey::new(group_id, member.id);

        self.gateway
            .restrict_member(group_id, member.id, PermissionSet::ReadOnly)
            .await
            .map_err(|source| ConsentError::Restrict {
                group: group_id,
                member: member.id,
                source,
            })?;

        let text = msg_consent_prompt(
            &member.first_name,
            &self.settings.policy_url,
            &self.settings.version,
            self.settings.timeout,
        );
        let buttons = consent_buttons(key);
        let prompt = self
            .gateway
            .post_message(group_id, &text, Some(&buttons[..]))
            .await
            .map_err(|source| ConsentError::Prompt {
                group: group_id,
                member: member.id,
                source,
            })?;

        // Weak: dropping the coordinator discards pending state, timers included
        let coordinator = Arc::downgrade(self);
        let timer = self.timers.schedule(
            self.settings.timeout,
            Box::new(move |timer_id| {
                async move {
                    if let Some(coordinator) = coordinator.upgrade() {
                        coordinator.on_timer_fired(key, timer_id).await;
                    }
                }
                .boxed()
            }),
        );

        if let Some(previous) = self.registry.insert(PendingEntry::new(key, prompt, timer)) {
            warn!(group = %group_id, "Duplicate join, replacing pending consent prompt");
            self.discard_message(group_id, previous.prompt_message_id).await;
        }

        info!(
            group = %group_id,
            pending = self.registry.len(),
            "New member muted pending consent"
        );
        Ok(JoinOutcome::Pending)
    }

    /// Accept or decline, pressed by the prompted member
    pub async fn on_button_pressed(&self, press: ButtonPress) -> ButtonOutcome {
        let action: ConsentAction = match press.payload.parse() {
            Ok(action) => action,
            Err(e) => {
                debug!("Rejecting button payload: {}", e);
                self.acknowledge(&press, None).await;
                return ButtonOutcome::Malformed;
            }
        };

        if press.actor_id != action.member_id {
            self.acknowledge(&press, Some(MSG_NOT_FOR_YOU)).await;
            return ButtonOutcome::NotForYou;
        }

        let key = action.key();
        let Some(entry) = self.registry.remove(&key) else {
            debug!(group = %key.group_id, "Button press for a resolved member");
            self.acknowledge(&press, None).await;
            return ButtonOutcome::Stale;
        };
        self.timers.cancel(&entry.timer);
        self.acknowledge(&press, None).await;

        match action.choice {
            Choice::Accept => {
                let entry = entry.resolve(Resolution::Accepted);
                self.restore_member(key).await;
                self.finish(&entry, MSG_ACCEPTED).await;
                ButtonOutcome::Accepted
            }
            Choice::Decline => {
                let entry = entry.resolve(Resolution::Declined);
                self.remove_member(key, Removal::Reversible).await;
                self.finish(&entry, MSG_DECLINED).await;
                ButtonOutcome::Declined
            }
        }
    }

    /// Expiry: remove the member unless they already decided
    pub async fn on_timer_fired(&self, key: PendingKey, timer: TimerId) -> ExpireOutcome {
        let Some(entry) = self.registry.remove_if_timer(&key, timer) else {
            debug!(group = %key.group_id, "Timer fired for a resolved member");
            return ExpireOutcome::Stale;
        };

        let entry = entry.resolve(Resolution::Expired);
        self.remove_member(key, self.settings.expiry_removal).await;
        self.finish(&entry, MSG_EXPIRED).await;
        ExpireOutcome::Expired
    }

    async fn restore_member(&self, key: PendingKey) {
        let gateway = self.gateway.clone();
        let result = retry_with_backoff(
            move || {
                let gateway = gateway.clone();
                async move {
                    gateway
                        .restrict_member(key.group_id, key.member_id, PermissionSet::FullAccess)
                        .await
                }
            },
            gateway_retry_policy,
        )
        .await;

        if let Err(e) = result {
            error!(
                group = %key.group_id,
                "Failed to restore permissions after consent, member stays muted: {}",
                e
            );
        }
    }

    async fn remove_member(&self, key: PendingKey, removal: Removal) {
        let gateway = self.gateway.clone();
        let result = retry_with_backoff(
            move || {
                let gateway = gateway.clone();
                async move {
                    gateway
                        .remove_member(key.group_id, key.member_id, removal)
                        .await
                }
            },
            gateway_retry_policy,
        )
        .await;

        if let Err(e) = result {
            error!(group = %key.group_id, "Failed to remove member: {}", e);
        }
    }

    /// Retire the prompt and post the outcome as a transient notice
    async fn finish(&self, entry: &PendingEntry, outcome: &str) {
        debug!(group = %entry.group_id, state = ?entry.state, "Consent resolved");

        let group = entry.group_id;
        let prompt = entry.prompt_message_id;
        if let Err(e) = self.gateway.delete_message(group, prompt).await {
            debug!(group = %group, "Prompt delete failed ({}), editing instead", e);
            if let Err(e) = self.gateway.edit_message(group, prompt, outcome).await {
                debug!(group = %group, "Prompt edit failed: {}", e);
            }
        }

        self.post_transient(group, outcome).await;
    }

    /// Post a notice that deletes itself after `notice_ttl`
    async fn post_transient(&self, group: GroupId, text: &str) {
        let message = match self.gateway.post_message(group, text, None).await {
            Ok(message) => message,
            Err(e) => {
                debug!(group = %group, "Transient notice not posted: {}", e);
                return;
            }
        };

        let gateway = self.gateway.clone();
        let ttl = self.settings.notice_ttl;
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;
            if let Err(e) = gateway.delete_message(group, message).await {
                debug!(group = %group, "Transient notice delete failed: {}", e);
            }
        });
    }

    async fn discard_message(&self, group: GroupId, message: MessageId) {
        if let Err(e) = self.gateway.delete_message(group, message).await {
            debug!(group = %group, "Message delete failed: {}", e);
        }
    }

    async fn acknowledge(&self, press: &ButtonPress, notice: Option<&str>) {
        if let Err(e) = self
            .gateway
            .acknowledge_button(&press.callback_id, notice)
            .await
        {
            debug!("Button acknowledgement failed: {}", e);
        }
    }
}

/// Accept/decline buttons bound to one pending member
pub fn consent_buttons(key: PendingKey) -> [Button; 2] {
    [
        Button {
            label: LABEL_ACCEPT.to_string(),
            payload: ConsentAction::new(Choice::Accept, key).to_string(),
        },
        Button {
            label: LABEL_DECLINE.to_string(),
            payload: ConsentAction::new(Choice::Decline, key).to_string(),
        },
    ]
}
