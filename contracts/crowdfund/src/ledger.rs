//! # Donation ledger
//!
//! Per-project, per-donor bookkeeping. Every mutation here keeps
//! `ProjectState::raised` equal to the sum of the project's live
//! contributions.
//!
//! Callers are responsible for pairing these writes with the matching asset
//! movement; the ledger itself never touches the token.

use soroban_sdk::{Address, Env};

use crate::storage;
use crate::Error;

/// Add `amount` to `donor`'s contribution and to the project's `raised`.
pub fn record_donation(
    env: &Env,
    project_id: u64,
    donor: &Address,
    amount: i128,
) -> Result<(), Error> {
    let mut state = storage::load_project_state(env, project_id)?;

    let contributed = storage::get_contribution(env, project_id, donor)
        .checked_add(amount)
        .ok_or(Error::Overflow)?;
    state.raised = state.raised.checked_add(amount).ok_or(Error::Overflow)?;

    storage::set_contribution(env, project_id, donor, contributed);
    storage::save_project_state(env, project_id, &state);
    Ok(())
}

/// Current live contribution of `donor` to `project_id`.
pub fn donor_contribution(env: &Env, project_id: u64, donor: &Address) -> i128 {
    storage::get_contribution(env, project_id, donor)
}

/// Zero `donor`'s contribution and return what it was.
///
/// Does not touch `raised`; the refund path adjusts it alongside the payout.
/// Calling it again before a new donation returns zero and writes nothing.
pub fn clear_donor_contribution(env: &Env, project_id: u64, donor: &Address) -> i128 {
    let previous = storage::get_contribution(env, project_id, donor);
    if previous != 0 {
        storage::remove_contribution(env, project_id, donor);
    }
    previous
}
