//! Call-sheet delivery domain model and recipient status state machine.
//!
//! This module lives in `core` (zero internal deps) so the orchestrator and
//! any report/UI layer share one definition of recipient state. The
//! orchestrator in `prodrunner-delivery` drives the transitions; nothing
//! here performs I/O.

use serde::{Deserialize, Serialize};

use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Delivery method
// ---------------------------------------------------------------------------

/// Channel a recipient has chosen for call-sheet delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Email,
    Sms,
}

// ---------------------------------------------------------------------------
// Recipient status state machine
// ---------------------------------------------------------------------------

/// Per-recipient delivery status.
///
/// `Sent` is terminal for email (no confirmation channel exists); SMS
/// recipients may advance through `Delivered`/`Viewed`/`Confirmed` as the
/// provider reports receipts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientStatus {
    Pending,
    Sending,
    Sent,
    Delivered,
    Viewed,
    Confirmed,
    Failed,
}

impl RecipientStatus {
    /// Returns the set of valid target statuses reachable from `self`.
    ///
    /// `Confirmed` is fully terminal. `Failed` can re-enter `Sending` via
    /// the resend-failed operation.
    pub fn valid_transitions(self) -> &'static [RecipientStatus] {
        use RecipientStatus::*;
        match self {
            Pending => &[Sending],
            Sending => &[Sent, Failed],
            Sent => &[Delivered, Failed],
            Delivered => &[Viewed],
            Viewed => &[Confirmed],
            Confirmed => &[],
            Failed => &[Sending],
        }
    }

    /// Check whether a transition from `self` to `to` is valid.
    pub fn can_transition(self, to: RecipientStatus) -> bool {
        self.valid_transitions().contains(&to)
    }

    /// The recipient was dispatched successfully and never regressed.
    pub fn is_terminal_success(self) -> bool {
        matches!(
            self,
            Self::Sent | Self::Delivered | Self::Viewed | Self::Confirmed
        )
    }

    /// Display label for the delivery progress list.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Sending => "Sending",
            Self::Sent => "Sent",
            Self::Delivered => "Delivered",
            Self::Viewed => "Viewed",
            Self::Confirmed => "Confirmed",
            Self::Failed => "Failed",
        }
    }
}

// ---------------------------------------------------------------------------
// Recipient / delivery records
// ---------------------------------------------------------------------------

/// One cast or crew member on a delivery list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryRecipient {
    pub id: EntityId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub method: DeliveryMethod,
    pub status: RecipientStatus,
    /// Provider message id, set on successful SMS dispatch and used for
    /// receipt polling.
    pub provider_message_id: Option<String>,
    /// Human-readable failure message for the retry UI.
    pub error: Option<String>,
    pub sent_at: Option<Timestamp>,
    pub delivered_at: Option<Timestamp>,
    pub viewed_at: Option<Timestamp>,
    pub confirmed_at: Option<Timestamp>,
}

impl DeliveryRecipient {
    /// Create a pending recipient for the given channel.
    pub fn new(name: impl Into<String>, method: DeliveryMethod) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            name: name.into(),
            email: None,
            phone: None,
            method,
            status: RecipientStatus::Pending,
            provider_message_id: None,
            error: None,
            sent_at: None,
            delivered_at: None,
            viewed_at: None,
            confirmed_at: None,
        }
    }

    /// The contact field required by the chosen channel, if present.
    pub fn contact_for_method(&self) -> Option<&str> {
        match self.method {
            DeliveryMethod::Email => self.email.as_deref(),
            DeliveryMethod::Sms => self.phone.as_deref(),
        }
    }
}

/// One "send" action for a call sheet. A retry produces an updated copy with
/// only previously-failed recipients re-attempted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallSheetDelivery {
    pub id: EntityId,
    pub call_sheet_id: EntityId,
    pub recipients: Vec<DeliveryRecipient>,
    pub sent_at: Timestamp,
}

impl CallSheetDelivery {
    pub fn new(call_sheet_id: EntityId, recipients: Vec<DeliveryRecipient>) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            call_sheet_id,
            recipients,
            sent_at: chrono::Utc::now(),
        }
    }

    pub fn sent_count(&self) -> usize {
        self.recipients
            .iter()
            .filter(|r| r.status.is_terminal_success())
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.recipients
            .iter()
            .filter(|r| r.status == RecipientStatus::Failed)
            .count()
    }

    /// Every recipient has reached a terminal-success or failed state.
    pub fn is_complete(&self) -> bool {
        self.recipients.iter().all(|r| {
            r.status.is_terminal_success() || r.status == RecipientStatus::Failed
        })
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A rendered call-sheet document, produced by the (external) renderer and
/// opaque to this core.
#[derive(Debug, Clone)]
pub struct CallSheetDocument {
    pub call_sheet_id: EntityId,
    /// Subject line / SMS lead-in, e.g. `"Call Sheet — Day 4"`.
    pub title: String,
    /// Plain-text body.
    pub body: String,
    /// Publicly fetchable URL for SMS/MMS media.
    pub media_url: Option<String>,
    /// Attachment for email delivery.
    pub attachment: Option<DocumentAttachment>,
}

/// Binary attachment (typically the rendered PDF).
#[derive(Debug, Clone)]
pub struct DocumentAttachment {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a recipient list before any send attempt.
///
/// Returns an empty `Vec` if valid; otherwise a list of human-readable
/// problems (empty list, recipients missing the contact field their chosen
/// channel requires). Missing contact fields are also tolerated at send time
/// (the recipient simply fails), so callers may treat these as warnings.
pub fn validate_recipients(recipients: &[DeliveryRecipient]) -> Vec<String> {
    let mut errors = Vec::new();

    if recipients.is_empty() {
        errors.push("Recipient list must not be empty".to_string());
    }

    for recipient in recipients {
        if recipient.contact_for_method().is_none() {
            let field = match recipient.method {
                DeliveryMethod::Email => "email address",
                DeliveryMethod::Sms => "phone number",
            };
            errors.push(format!("{}: no {field} on file", recipient.name));
        }
    }

    errors
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use RecipientStatus::*;

    // -- state machine --

    #[test]
    fn pending_to_sending() {
        assert!(Pending.can_transition(Sending));
    }

    #[test]
    fn sending_to_sent() {
        assert!(Sending.can_transition(Sent));
    }

    #[test]
    fn sending_to_failed() {
        assert!(Sending.can_transition(Failed));
    }

    #[test]
    fn sent_to_delivered() {
        assert!(Sent.can_transition(Delivered));
    }

    #[test]
    fn delivered_to_viewed() {
        assert!(Delivered.can_transition(Viewed));
    }

    #[test]
    fn viewed_to_confirmed() {
        assert!(Viewed.can_transition(Confirmed));
    }

    #[test]
    fn failed_can_reenter_sending() {
        assert!(Failed.can_transition(Sending));
    }

    #[test]
    fn confirmed_is_terminal() {
        assert!(Confirmed.valid_transitions().is_empty());
    }

    #[test]
    fn pending_cannot_jump_to_sent() {
        assert!(!Pending.can_transition(Sent));
    }

    #[test]
    fn sent_cannot_regress_to_pending() {
        assert!(!Sent.can_transition(Pending));
    }

    #[test]
    fn terminal_success_classification() {
        assert!(Sent.is_terminal_success());
        assert!(Confirmed.is_terminal_success());
        assert!(!Pending.is_terminal_success());
        assert!(!Failed.is_terminal_success());
    }

    // -- recipients --

    fn email_recipient(name: &str) -> DeliveryRecipient {
        let mut r = DeliveryRecipient::new(name, DeliveryMethod::Email);
        r.email = Some(format!("{}@example.com", name.to_lowercase()));
        r
    }

    fn sms_recipient(name: &str) -> DeliveryRecipient {
        let mut r = DeliveryRecipient::new(name, DeliveryMethod::Sms);
        r.phone = Some("+15551234567".to_string());
        r
    }

    #[test]
    fn contact_for_method_picks_channel_field() {
        let r = email_recipient("Avery");
        assert_eq!(r.contact_for_method(), Some("avery@example.com"));

        let mut r = sms_recipient("Blake");
        r.email = Some("blake@example.com".to_string());
        assert_eq!(r.contact_for_method(), Some("+15551234567"));
    }

    // -- validation --

    #[test]
    fn empty_recipient_list_rejected() {
        let errors = validate_recipients(&[]);
        assert!(errors.iter().any(|e| e.contains("must not be empty")));
    }

    #[test]
    fn missing_phone_for_sms_reported() {
        let r = DeliveryRecipient::new("Avery", DeliveryMethod::Sms);
        let errors = validate_recipients(&[r]);
        assert!(errors.iter().any(|e| e.contains("phone number")));
    }

    #[test]
    fn missing_email_reported() {
        let r = DeliveryRecipient::new("Blake", DeliveryMethod::Email);
        let errors = validate_recipients(&[r]);
        assert!(errors.iter().any(|e| e.contains("email address")));
    }

    #[test]
    fn valid_list_passes() {
        let errors = validate_recipients(&[email_recipient("Avery"), sms_recipient("Blake")]);
        assert!(errors.is_empty());
    }

    // -- delivery aggregates --

    #[test]
    fn delivery_counts_and_completion() {
        let mut a = email_recipient("Avery");
        a.status = Sent;
        let mut b = sms_recipient("Blake");
        b.status = Failed;
        let mut c = sms_recipient("Casey");
        c.status = Delivered;

        let delivery = CallSheetDelivery::new(uuid::Uuid::new_v4(), vec![a, b, c]);
        assert_eq!(delivery.sent_count(), 2);
        assert_eq!(delivery.failed_count(), 1);
        assert!(delivery.is_complete());
    }

    #[test]
    fn pending_recipient_means_incomplete() {
        let delivery =
            CallSheetDelivery::new(uuid::Uuid::new_v4(), vec![email_recipient("Avery")]);
        assert!(!delivery.is_complete());
    }
}
