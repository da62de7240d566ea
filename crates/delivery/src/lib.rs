//! Call-sheet delivery orchestration.
//!
//! [`DeliveryOrchestrator`] walks a recipient list strictly sequentially,
//! dispatching each recipient over their chosen channel (SMS or email),
//! recording per-recipient outcomes, and publishing progress events so a UI
//! can show "currently sending to" and a monotonic sent/total fraction.
//! Partial failure is the batch's normal terminal state, not an error.

pub mod orchestrator;

pub use orchestrator::{DeliveryError, DeliveryOrchestrator};
