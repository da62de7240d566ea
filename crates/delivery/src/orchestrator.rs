//! Sequential call-sheet delivery loop.
//!
//! Recipients are processed one at a time, in the order supplied, each
//! `await`ed to completion before the next begins, so the progress indicator
//! stays linear and third-party rate limits are respected. None of the
//! transport calls expose cancellation; an in-flight send cannot be aborted.

use std::sync::Arc;

use prodrunner_core::call_sheet::{
    CallSheetDelivery, CallSheetDocument, DeliveryMethod, DeliveryRecipient, RecipientStatus,
};
use prodrunner_events::{EventBus, ProductionEvent};
use prodrunner_transports::{EmailTransport, SmsDeliveryStatus, SmsTransport};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for batch-level delivery failures.
///
/// Per-recipient problems never surface here — they are recorded on the
/// recipient and the loop continues.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// The recipient list was empty; nothing to send.
    #[error("Recipient list is empty")]
    NoRecipients,
}

// ---------------------------------------------------------------------------
// DeliveryOrchestrator
// ---------------------------------------------------------------------------

/// Drives call-sheet sends over injected transports.
pub struct DeliveryOrchestrator {
    sms: Arc<dyn SmsTransport>,
    email: Arc<dyn EmailTransport>,
    events: Arc<EventBus>,
}

impl DeliveryOrchestrator {
    pub fn new(
        sms: Arc<dyn SmsTransport>,
        email: Arc<dyn EmailTransport>,
        events: Arc<EventBus>,
    ) -> Self {
        Self { sms, email, events }
    }

    /// Send a call sheet to every recipient, strictly sequentially.
    ///
    /// Rejects an empty recipient list before any network attempt. A
    /// per-recipient failure (missing contact field, transport error) is
    /// recorded as [`RecipientStatus::Failed`] and the loop continues; the
    /// returned delivery models partial failure as a normal outcome.
    pub async fn send_call_sheet(
        &self,
        doc: &CallSheetDocument,
        recipients: Vec<DeliveryRecipient>,
    ) -> Result<CallSheetDelivery, DeliveryError> {
        if recipients.is_empty() {
            return Err(DeliveryError::NoRecipients);
        }

        let mut delivery = CallSheetDelivery::new(doc.call_sheet_id, recipients);
        let total = delivery.recipients.len();

        for position in 0..total {
            self.publish_progress(&delivery, position, total);
            self.dispatch(doc, &mut delivery.recipients[position]).await;
        }

        self.publish_complete(&delivery);
        Ok(delivery)
    }

    /// Re-attempt exactly the recipients currently in `Failed` status.
    ///
    /// Everyone else keeps their prior status and timestamps verbatim.
    /// Returns an updated copy; the input delivery is untouched.
    pub async fn resend_failed(
        &self,
        delivery: &CallSheetDelivery,
        doc: &CallSheetDocument,
    ) -> CallSheetDelivery {
        let mut updated = delivery.clone();
        let total = updated.recipients.len();

        for position in 0..total {
            if updated.recipients[position].status != RecipientStatus::Failed {
                continue;
            }
            self.publish_progress(&updated, position, total);
            self.dispatch(doc, &mut updated.recipients[position]).await;
        }

        self.publish_complete(&updated);
        updated
    }

    /// Poll the SMS provider for receipt updates.
    ///
    /// Only SMS recipients that were successfully dispatched (they hold a
    /// provider message id) are polled; email has no confirmation channel
    /// and is skipped. A poll error is logged and that recipient keeps its
    /// previous status.
    pub async fn refresh_delivery_status(
        &self,
        delivery: &CallSheetDelivery,
    ) -> CallSheetDelivery {
        let mut updated = delivery.clone();

        for recipient in &mut updated.recipients {
            if recipient.method != DeliveryMethod::Sms {
                continue;
            }
            let pollable = matches!(
                recipient.status,
                RecipientStatus::Sending
                    | RecipientStatus::Sent
                    | RecipientStatus::Delivered
                    | RecipientStatus::Viewed
            );
            let Some(message_id) = recipient.provider_message_id.clone() else {
                continue;
            };
            if !pollable {
                continue;
            }

            match self.sms.message_status(&message_id).await {
                Ok(status) => apply_provider_status(recipient, status),
                Err(e) => {
                    tracing::warn!(
                        recipient = %recipient.name,
                        message_id = %message_id,
                        error = %e,
                        "Status poll failed, keeping previous status"
                    );
                }
            }
        }

        updated
    }

    // -- internals -----------------------------------------------------------

    /// Dispatch one recipient over their chosen channel and record the
    /// outcome on the recipient itself.
    async fn dispatch(&self, doc: &CallSheetDocument, recipient: &mut DeliveryRecipient) {
        recipient.status = RecipientStatus::Sending;
        recipient.error = None;

        let outcome = match recipient.method {
            DeliveryMethod::Email => match recipient.email.clone() {
                None => Err("no email address on file".to_string()),
                Some(address) => self
                    .email
                    .send_document(&address, &doc.title, &doc.body, doc.attachment.as_ref())
                    .await
                    .map(|()| None)
                    .map_err(|e| e.to_string()),
            },
            DeliveryMethod::Sms => match recipient.phone.clone() {
                None => Err("no phone number on file".to_string()),
                Some(phone) => self
                    .sms
                    .send_message(&phone, &doc.body, doc.media_url.as_deref())
                    .await
                    .map(Some)
                    .map_err(|e| e.to_string()),
            },
        };

        match outcome {
            Ok(message_id) => {
                recipient.status = RecipientStatus::Sent;
                recipient.provider_message_id = message_id;
                recipient.sent_at = Some(chrono::Utc::now());
                tracing::info!(recipient = %recipient.name, "Call sheet dispatched");
            }
            Err(message) => {
                recipient.status = RecipientStatus::Failed;
                recipient.error = Some(message.clone());
                tracing::warn!(
                    recipient = %recipient.name,
                    error = %message,
                    "Call sheet dispatch failed, continuing with remaining recipients"
                );
            }
        }
    }

    fn publish_progress(&self, delivery: &CallSheetDelivery, position: usize, total: usize) {
        let recipient = &delivery.recipients[position];
        self.events.publish(
            ProductionEvent::new("callsheet.delivery.progress")
                .with_source("call_sheet", delivery.call_sheet_id)
                .with_payload(serde_json::json!({
                    "recipient": recipient.name,
                    "position": position + 1,
                    "total": total,
                })),
        );
    }

    fn publish_complete(&self, delivery: &CallSheetDelivery) {
        self.events.publish(
            ProductionEvent::new("callsheet.delivery.complete")
                .with_source("call_sheet", delivery.call_sheet_id)
                .with_payload(serde_json::json!({
                    "sent": delivery.sent_count(),
                    "failed": delivery.failed_count(),
                })),
        );
    }
}

/// Fold a provider-reported status into the recipient's local state,
/// stamping receipt timestamps the first time each stage is observed.
fn apply_provider_status(recipient: &mut DeliveryRecipient, status: SmsDeliveryStatus) {
    let now = chrono::Utc::now();
    match status {
        SmsDeliveryStatus::Delivered => {
            if recipient.status.can_transition(RecipientStatus::Delivered) {
                recipient.status = RecipientStatus::Delivered;
            }
            recipient.delivered_at.get_or_insert(now);
        }
        SmsDeliveryStatus::Read => {
            if recipient.delivered_at.is_none() {
                recipient.delivered_at = Some(now);
            }
            recipient.status = RecipientStatus::Viewed;
            recipient.viewed_at.get_or_insert(now);
        }
        SmsDeliveryStatus::Undelivered | SmsDeliveryStatus::Failed => {
            recipient.status = RecipientStatus::Failed;
            recipient.error = Some("provider reported delivery failure".to_string());
        }
        SmsDeliveryStatus::Sent => {
            if recipient.status == RecipientStatus::Sending {
                recipient.status = RecipientStatus::Sent;
            }
        }
        SmsDeliveryStatus::Queued | SmsDeliveryStatus::Sending | SmsDeliveryStatus::Unknown => {}
    }
}
