use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::info;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::model::audit::{AuditAction, AuditLogEntry};
use crate::store::Store;

#[derive(
    Debug,
    Copy,
    Clone,
    Eq,
    PartialEq,
    Serialize,
    Deserialize,
    ToSchema,
    strum_macros::Display,
)]
pub enum EventKind {
    #[serde(rename = "leave:submitted")]
    #[strum(serialize = "leave:submitted")]
    LeaveSubmitted,
    #[serde(rename = "leave:approved")]
    #[strum(serialize = "leave:approved")]
    LeaveApproved,
    #[serde(rename = "leave:rejected")]
    #[strum(serialize = "leave:rejected")]
    LeaveRejected,
    #[serde(rename = "leave:cancelled")]
    #[strum(serialize = "leave:cancelled")]
    LeaveCancelled,
    #[serde(rename = "leave:expired")]
    #[strum(serialize = "leave:expired")]
    LeaveExpired,
    #[serde(rename = "claim:submitted")]
    #[strum(serialize = "claim:submitted")]
    ClaimSubmitted,
    #[serde(rename = "claim:manager_approved")]
    #[strum(serialize = "claim:manager_approved")]
    ClaimManagerApproved,
    #[serde(rename = "claim:approved")]
    #[strum(serialize = "claim:approved")]
    ClaimApproved,
    #[serde(rename = "claim:rejected")]
    #[strum(serialize = "claim:rejected")]
    ClaimRejected,
    #[serde(rename = "claim:cancelled")]
    #[strum(serialize = "claim:cancelled")]
    ClaimCancelled,
}

impl EventKind {
    fn audit_action(&self) -> AuditAction {
        match self {
            EventKind::LeaveSubmitted | EventKind::ClaimSubmitted => AuditAction::Create,
            _ => AuditAction::Update,
        }
    }
}

/// One event per successful state transition, carrying enough context for a
/// user-facing message. Consumed externally (socket push, email).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DomainEvent {
    pub id: String,
    pub kind: EventKind,
    /// Employee the transition is about, not the actor who triggered it.
    pub employee_id: u64,
    pub actor_id: u64,
    pub target_model: String,
    pub target_id: u64,
    pub message: String,
    #[schema(value_type = String, format = "date-time")]
    pub at: DateTime<Utc>,
}

/// Fan-out side of every state transition: broadcast channel for the push
/// collaborator plus an append to the audit trail. Slow or absent
/// subscribers never block the write path.
pub struct EventBus {
    tx: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.tx.subscribe()
    }

    pub fn emit(
        &self,
        store: &Store,
        kind: EventKind,
        employee_id: u64,
        actor_id: u64,
        target_model: &str,
        target_id: u64,
        message: String,
    ) -> DomainEvent {
        let event = DomainEvent {
            id: Uuid::new_v4().to_string(),
            kind,
            employee_id,
            actor_id,
            target_model: target_model.to_string(),
            target_id,
            message,
            at: Utc::now(),
        };

        store.append_audit(AuditLogEntry {
            id: 0,
            actor_id,
            action: kind.audit_action(),
            target_model: target_model.to_string(),
            target_id: Some(target_id),
            timestamp: event.at,
            ip_address: None,
            correlation_id: event.id.clone(),
        });

        info!(kind = %event.kind, employee_id, target_id, "{}", event.message);

        // No receivers is fine; the audit append above already happened.
        let _ = self.tx.send(event.clone());
        event
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_appends_audit_and_reaches_subscribers() {
        let store = Store::new();
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        let event = bus.emit(
            &store,
            EventKind::LeaveApproved,
            1000,
            7,
            "LeaveRequest",
            42,
            "leave request 42 approved".into(),
        );
        assert_eq!(event.kind.to_string(), "leave:approved");

        let received = rx.try_recv().unwrap();
        assert_eq!(received.id, event.id);
        assert_eq!(received.employee_id, 1000);

        let (entries, total) = store.list_audit(1, 10);
        assert_eq!(total, 1);
        assert_eq!(entries[0].correlation_id, event.id);
        assert_eq!(entries[0].actor_id, 7);
    }

    #[test]
    fn emit_without_subscribers_does_not_fail() {
        let store = Store::new();
        let bus = EventBus::new(4);
        bus.emit(
            &store,
            EventKind::ClaimSubmitted,
            1,
            1,
            "ReimbursementClaim",
            5,
            "claim 5 submitted".into(),
        );
        let (_, total) = store.list_audit(1, 10);
        assert_eq!(total, 1);
    }
}
