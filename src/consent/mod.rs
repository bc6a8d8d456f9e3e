//! Consent Gate Module
//!
//! Pending-member consent state machine:
//! - `registry`: who is still awaiting a decision (RAM only)
//! - `timer`: per-member expiry timers
//! - `coordinator`: join / accept / decline / expire transitions
//! - `action`: button payload encoding
//! - `text`: prompt and notice templates
//!
//! NOTHING here is persisted. A restart forgets every pending member.

pub mod action;
pub mod coordinator;
pub mod registry;
pub mod text;
pub mod timer;

pub use action::{Choice, ConsentAction, PayloadError};
pub use coordinator::{
    ButtonOutcome, ConsentCoordinator, ConsentError, ConsentSettings, ExpireOutcome, JoinOutcome,
};
pub use registry::{EntryState, PendingEntry, PendingKey, PendingRegistry, Resolution};
pub use timer::{TimerCallback, TimerHandle, TimerId, TimerService, TokioTimerService};
