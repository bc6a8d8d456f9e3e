//! consent-gate - Consent Gate Bot for Group Chats
//!
//! Mutes every new group member until they explicitly accept the group's
//! data-processing terms. Accepting unmutes them, declining removes them
//! (they may rejoin), and silence removes them once the window elapses.
//!
//! Key principles:
//! - NO persistence (pending decisions live in RAM only)
//! - NO decision logs
//! - Exactly one terminal action per pending member

pub mod bot;
pub mod consent;
pub mod gateway;

pub use bot::ConsentBot;
pub use consent::{ConsentCoordinator, ConsentSettings};
pub use gateway::{Gateway, MockGateway, TelegramGateway};
