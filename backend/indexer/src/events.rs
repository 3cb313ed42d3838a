//! Canonical event types emitted by the crowdfund contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfund contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// The contract was bound to its token (`init` topic).
    Initialized,
    /// A new project was registered (`created` topic).
    ProjectCreated,
    /// A donor contributed to a project (`donated` topic).
    Donated,
    /// The beneficiary withdrew everything raised (`withdrawn` topic).
    Withdrawn,
    /// A donor reclaimed their contribution (`refunded` topic).
    Refunded,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "init" => Self::Initialized,
            "created" => Self::ProjectCreated,
            "donated" => Self::Donated,
            "withdrawn" => Self::Withdrawn,
            "refunded" => Self::Refunded,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::ProjectCreated => "project_created",
            Self::Donated => "donated",
            Self::Withdrawn => "withdrawn",
            Self::Refunded => "refunded",
            Self::Unknown => "unknown",
        }
    }

    /// Inverse of [`EventKind::as_str`], used when reading rows back.
    pub fn from_stored(s: &str) -> Self {
        match s {
            "initialized" => Self::Initialized,
            "project_created" => Self::ProjectCreated,
            "donated" => Self::Donated,
            "withdrawn" => Self::Withdrawn,
            "refunded" => Self::Refunded,
            _ => Self::Unknown,
        }
    }
}

/// A fully decoded crowdfund event, ready to be stored in the database.
///
/// Amounts are kept as decimal strings: the contract uses `i128`, which
/// SQLite cannot hold natively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdfundEvent {
    /// RPC event id, or a synthetic key when the RPC omits it. Unique per event.
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    /// Creator, donor or beneficiary depending on the event.
    pub actor: Option<String>,
    /// Only set on `project_created`.
    pub beneficiary: Option<String>,
    /// Goal on `project_created`, moved amount otherwise.
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub beneficiary: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}

impl EventRecord {
    pub fn kind(&self) -> EventKind {
        EventKind::from_stored(&self.event_type)
    }
}
