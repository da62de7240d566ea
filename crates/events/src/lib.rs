//! Production Runner event bus.
//!
//! Cross-component refresh signalling (schedule regenerated, budget edited,
//! call sheet delivered) goes through a typed in-process bus instead of a
//! process-wide notification broadcast. Components that care about an event
//! hold a subscription; nothing else is implicitly coupled.
//!
//! - [`EventBus`] — in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`ProductionEvent`] — the canonical domain event envelope.

pub mod bus;

pub use bus::{EventBus, ProductionEvent};
