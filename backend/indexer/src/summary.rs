//! Off-chain view of a project, rebuilt from its indexed events.
//!
//! The fold applies the same bookkeeping the contract does: a donation adds
//! to the donor and to `raised`, a refund removes the donor's amount, and a
//! withdrawal flags the project without changing `raised`. Donations after a
//! withdrawal still count towards `raised` (they are stranded on-chain).

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::{IndexerError, Result};
use crate::events::{EventKind, EventRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub project_id: String,
    /// `None` when the creation event has not been indexed yet.
    pub funding_goal: Option<i128>,
    pub beneficiary: Option<String>,
    pub creator: Option<String>,
    pub raised: i128,
    pub withdrawn: bool,
    pub goal_reached: bool,
    /// Net live contribution per donor; fully refunded donors are dropped.
    pub donors: BTreeMap<String, i128>,
    pub event_count: usize,
}

/// Fold `events` (already ordered by ledger) into a [`ProjectSummary`].
pub fn summarize(project_id: &str, events: &[EventRecord]) -> Result<ProjectSummary> {
    let mut summary = ProjectSummary {
        project_id: project_id.to_string(),
        event_count: events.len(),
        ..ProjectSummary::default()
    };

    for record in events {
        match record.kind() {
            EventKind::ProjectCreated => {
                summary.funding_goal = Some(parse_amount(record)?);
                summary.beneficiary = record.beneficiary.clone();
                summary.creator = record.actor.clone();
            }
            EventKind::Donated => {
                let amount = parse_amount(record)?;
                let entry = summary.donors.entry(donor_of(record)?).or_insert(0);
                *entry = apply(record, *entry, amount, i128::checked_add)?;
                summary.raised = apply(record, summary.raised, amount, i128::checked_add)?;
            }
            EventKind::Refunded => {
                let amount = parse_amount(record)?;
                let donor = donor_of(record)?;
                if let Some(left) = summary.donors.get_mut(&donor) {
                    *left = apply(record, *left, amount, i128::checked_sub)?;
                    if *left <= 0 {
                        summary.donors.remove(&donor);
                    }
                }
                summary.raised = apply(record, summary.raised, amount, i128::checked_sub)?;
            }
            EventKind::Withdrawn => summary.withdrawn = true,
            EventKind::Initialized | EventKind::Unknown => {}
        }
    }

    summary.goal_reached = summary
        .funding_goal
        .is_some_and(|goal| summary.raised >= goal);
    Ok(summary)
}

fn apply(
    record: &EventRecord,
    total: i128,
    amount: i128,
    op: fn(i128, i128) -> Option<i128>,
) -> Result<i128> {
    op(total, amount).ok_or_else(|| {
        IndexerError::EventParse(format!("event {} overflows the running total", record.event_id))
    })
}

fn parse_amount(record: &EventRecord) -> Result<i128> {
    let raw = record.amount.as_deref().ok_or_else(|| {
        IndexerError::EventParse(format!("event {} has no amount", record.event_id))
    })?;
    raw.parse().map_err(|_| {
        IndexerError::EventParse(format!("event {} has bad amount {raw:?}", record.event_id))
    })
}

fn donor_of(record: &EventRecord) -> Result<String> {
    record
        .actor
        .clone()
        .ok_or_else(|| IndexerError::EventParse(format!("event {} has no donor", record.event_id)))
}
