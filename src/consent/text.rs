// ============================================================================
// Consent Message Templates
// ============================================================================
//
// PRIVACY: messages never echo member identifiers, and nothing here is
// written anywhere but the chat itself.

use std::time::Duration;

/// Accept button label
pub const LABEL_ACCEPT: &str = "✅ I Consent";

/// Decline button label
pub const LABEL_DECLINE: &str = "❌ No";

/// Shown (as an alert) to anyone pressing a button on someone else's prompt
pub const MSG_NOT_FOR_YOU: &str = "This consent request is not for you.";

/// Transient confirmation after accepting
pub const MSG_ACCEPTED: &str = "Thanks! Your consent is confirmed. Welcome 👋";

/// Transient confirmation after declining
pub const MSG_DECLINED: &str =
    "Understood. You have been removed from the group and can rejoin at any time.";

/// Transient notice after the window elapsed
pub const MSG_EXPIRED: &str =
    "A new member was removed for not responding to the consent request in time.";

/// Consent prompt shown to a newly joined member
///
/// # Arguments
/// * `first_name` - Member's display name (rendered only, never stored)
/// * `policy_url` - Privacy policy link
/// * `version` - Consent version tag
/// * `timeout` - Decision window
pub fn msg_consent_prompt(
    first_name: &str,
    policy_url: &str,
    version: &str,
    timeout: Duration,
) -> String {
    let greeting = if first_name.trim().is_empty() {
        "Welcome!".to_string()
    } else {
        format!("Welcome, {}!", first_name.trim())
    };

    format!(
        "{greeting}\n\n\
         To take part in this group, please confirm your consent to the processing of your personal data.\n\n\
         We only process what the platform naturally provides during this action (your account identity) to decide on access.\n\
         We do NOT store any logs of your decision.\n\n\
         📄 Privacy Policy: {policy_url}\n\n\
         By pressing {LABEL_ACCEPT}, you agree to this (v{version}).\n\
         Without an answer within {window} you will be removed from the group.",
        window = humantime::format_duration(timeout),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_policy_and_version() {
        let text = msg_consent_prompt(
            "Alice",
            "https://example.org/privacy",
            "2.1",
            Duration::from_secs(300),
        );

        assert!(text.starts_with("Welcome, Alice!"));
        assert!(text.contains("📄 Privacy Policy: https://example.org/privacy"));
        assert!(text.contains("(v2.1)"));
        assert!(text.contains("within 5m"));
        assert!(text.contains(LABEL_ACCEPT));
    }

    #[test]
    fn test_prompt_without_name() {
        let text = msg_consent_prompt("  ", "https://example.org", "1.0", Duration::from_secs(60));
        assert!(text.starts_with("Welcome!\n"));
    }
}
