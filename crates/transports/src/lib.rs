//! Network transports for the Production Runner core.
//!
//! Narrow clients around the third-party services the application depends
//! on: SMS (Twilio-style REST), email (SMTP), weather forecast, and
//! geocoding. Each client is a plain constructed object passed to whatever
//! component needs it, never a process-wide singleton, and the SMS/email
//! clients sit behind object-safe traits so the delivery orchestrator can be
//! tested against fakes.
//!
//! Failures surface as [`TransportError`] values with human-readable
//! messages; callers attach them to the failed unit of work (one recipient,
//! one fetch) and continue.

pub mod email;
pub mod error;
pub mod geocode;
pub mod sms;
pub mod weather;

pub use email::{EmailConfig, EmailTransport, SmtpEmailTransport};
pub use error::TransportError;
pub use geocode::{Coordinate, GeocodeClient};
pub use sms::{SmsClient, SmsConfig, SmsDeliveryStatus, SmsTransport};
pub use weather::{WeatherClient, WeatherReport};
