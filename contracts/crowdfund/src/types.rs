//! # Types
//!
//! Shared data structures used across all modules of the crowdfund ledger.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Project` is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`]: written once at creation; never mutated.
//! - [`ProjectState`]: written on every donation, withdrawal and refund.
//!
//! The public API exposes the reconstructed [`Project`] struct for convenience.
//!
//! ### Settlement as a two-state machine
//!
//! The `withdrawn` flag is the whole project state machine:
//!
//! ```text
//! Open ──withdraw──► Withdrawn (terminal)
//!  ▲  │
//!  └──┘ donate / refund
//! ```
//!
//! Refunds never move a project out of `Open`; they only shrink `raised` and
//! zero the refunding donor's contribution.

use soroban_sdk::{contracttype, Address};

/// Immutable project configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub funding_goal: i128,
    pub beneficiary: Address,
    pub creator: Address,
}

/// Mutable project state, updated on donations and settlement.
///
/// Kept small so that frequent writes (donations) are cheap.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub raised: i128,
    pub withdrawn: bool,
}

/// Full on-chain representation of a funding project.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Unique identifier (auto-incremented from 0).
    pub id: u64,
    /// Amount `raised` must reach before the beneficiary may withdraw.
    pub funding_goal: i128,
    /// Address that receives the raised funds on withdrawal.
    pub beneficiary: Address,
    /// Address that created the project. Carries no settlement rights.
    pub creator: Address,
    /// Sum of all live donor contributions.
    pub raised: i128,
    /// Set once the beneficiary has withdrawn; never cleared.
    pub withdrawn: bool,
}

impl Project {
    pub(crate) fn from_parts(config: ProjectConfig, state: ProjectState) -> Self {
        Project {
            id: config.id,
            funding_goal: config.funding_goal,
            beneficiary: config.beneficiary,
            creator: config.creator,
            raised: state.raised,
            withdrawn: state.withdrawn,
        }
    }
}
