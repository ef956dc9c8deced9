use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use super::listings::domain::{ListingId, VisibilityStatus};
use super::providers::UserId;

/// Record of a moderator override on a listing's visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    pub actor: UserId,
    pub subject: ListingId,
    pub previous_status: VisibilityStatus,
    pub new_status: VisibilityStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Destination for moderation audit events. Emission is fire-and-forget:
/// implementations must not block or fail the caller's response.
pub trait AuditSink: Send + Sync {
    fn record(&self, event: AuditEvent);
}

/// Sink that writes audit events to the tracing pipeline.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        info!(
            actor = %event.actor.0,
            listing = %event.subject.0,
            previous = event.previous_status.label(),
            new = event.new_status.label(),
            at = %event.occurred_at.to_rfc3339(),
            "moderation action"
        );
    }
}
