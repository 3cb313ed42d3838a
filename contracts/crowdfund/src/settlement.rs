//! # Settlement
//!
//! Decides whether a donation, withdrawal or refund is legal right now and
//! performs the ledger mutation together with the token movement.
//!
//! Every path writes its own state *before* calling the token contract, so
//! the token (or anything it calls) only ever observes settled state. A
//! rejected transfer surfaces as [`Error::TransferFailed`]; returning `Err`
//! from the entry point rolls back every write made during the invocation.

use soroban_sdk::{token, Address, Env};

use crate::ledger;
use crate::storage;
use crate::types::{ProjectConfig, ProjectState};
use crate::Error;

// ── Legality checks ──────────────────────────────────────────────────

/// Withdrawal requires the beneficiary, a reached goal, and no prior withdrawal.
pub fn check_withdraw(
    config: &ProjectConfig,
    state: &ProjectState,
    caller: &Address,
) -> Result<(), Error> {
    if *caller != config.beneficiary {
        return Err(Error::Unauthorized);
    }
    if state.raised < config.funding_goal {
        return Err(Error::GoalNotReached);
    }
    if state.withdrawn {
        return Err(Error::AlreadyWithdrawn);
    }
    Ok(())
}

/// Refund is open to anyone while the goal is unmet and nothing was withdrawn.
pub fn check_refund(config: &ProjectConfig, state: &ProjectState) -> Result<(), Error> {
    if state.raised >= config.funding_goal || state.withdrawn {
        return Err(Error::RefundNotAllowed);
    }
    Ok(())
}

// ── Operations ───────────────────────────────────────────────────────

/// Pull `amount` from `donor` into custody and record it.
pub fn donate(env: &Env, project_id: u64, donor: &Address, amount: i128) -> Result<(), Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount);
    }
    let token = storage::get_token(env)?;
    if !storage::has_project(env, project_id) {
        return Err(Error::ProjectNotFound);
    }

    // Withdrawn projects still accept donations; those funds stay stranded.
    pull_from(env, &token, donor, amount)?;
    ledger::record_donation(env, project_id, donor, amount)?;
    Ok(())
}

/// Release everything raised to the beneficiary. Returns the amount paid.
pub fn withdraw(env: &Env, project_id: u64, caller: &Address) -> Result<i128, Error> {
    let token = storage::get_token(env)?;
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    check_withdraw(&config, &state, caller)?;

    let amount = state.raised;
    state.withdrawn = true;
    storage::save_project_state(env, project_id, &state);

    pay_out(env, &token, &config.beneficiary, amount)?;
    Ok(amount)
}

/// Return `donor`'s full contribution. Returns the amount paid, possibly zero.
pub fn refund(env: &Env, project_id: u64, donor: &Address) -> Result<i128, Error> {
    let token = storage::get_token(env)?;
    let (config, mut state) = storage::load_project_pair(env, project_id)?;
    check_refund(&config, &state)?;

    let amount = ledger::clear_donor_contribution(env, project_id, donor);
    if amount == 0 {
        return Ok(0);
    }
    state.raised = state.raised.checked_sub(amount).ok_or(Error::Overflow)?;
    storage::save_project_state(env, project_id, &state);

    pay_out(env, &token, donor, amount)?;
    Ok(amount)
}

// ── Token movement ───────────────────────────────────────────────────

/// `transfer_from` with the contract as spender; needs a prior `approve`.
fn pull_from(env: &Env, token: &Address, from: &Address, amount: i128) -> Result<(), Error> {
    let client = token::Client::new(env, token);
    let this = env.current_contract_address();
    match client.try_transfer_from(&this, from, &this, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

fn pay_out(env: &Env, token: &Address, to: &Address, amount: i128) -> Result<(), Error> {
    let client = token::Client::new(env, token);
    match client.try_transfer(&env.current_contract_address(), to, &amount) {
        Ok(Ok(())) => Ok(()),
        _ => Err(Error::TransferFailed),
    }
}

#[cfg(test)]
mod tests {
    use soroban_sdk::{testutils::Address as _, Address, Env};

    use super::*;

    fn project(env: &Env, goal: i128) -> (ProjectConfig, Address) {
        let beneficiary = Address::generate(env);
        let config = ProjectConfig {
            id: 0,
            funding_goal: goal,
            beneficiary: beneficiary.clone(),
            creator: Address::generate(env),
        };
        (config, beneficiary)
    }

    fn state(raised: i128, withdrawn: bool) -> ProjectState {
        ProjectState { raised, withdrawn }
    }

    #[test]
    fn withdraw_allowed_once_goal_reached() {
        let env = Env::default();
        let (config, beneficiary) = project(&env, 1_000);
        assert_eq!(check_withdraw(&config, &state(1_000, false), &beneficiary), Ok(()));
        assert_eq!(check_withdraw(&config, &state(1_550, false), &beneficiary), Ok(()));
    }

    #[test]
    fn withdraw_checks_caller_before_goal() {
        let env = Env::default();
        let (config, _) = project(&env, 1_000);
        let stranger = Address::generate(&env);
        assert_eq!(
            check_withdraw(&config, &state(0, false), &stranger),
            Err(Error::Unauthorized)
        );
        assert_eq!(
            check_withdraw(&config, &state(5_000, true), &stranger),
            Err(Error::Unauthorized)
        );
    }

    #[test]
    fn withdraw_rejected_below_goal_and_after_withdrawal() {
        let env = Env::default();
        let (config, beneficiary) = project(&env, 1_000);
        assert_eq!(
            check_withdraw(&config, &state(999, false), &beneficiary),
            Err(Error::GoalNotReached)
        );
        assert_eq!(
            check_withdraw(&config, &state(1_000, true), &beneficiary),
            Err(Error::AlreadyWithdrawn)
        );
    }

    #[test]
    fn refund_is_the_complement_of_goal_reached() {
        let env = Env::default();
        let (config, _) = project(&env, 20);
        assert_eq!(check_refund(&config, &state(0, false)), Ok(()));
        assert_eq!(check_refund(&config, &state(19, false)), Ok(()));
        assert_eq!(check_refund(&config, &state(20, false)), Err(Error::RefundNotAllowed));
        assert_eq!(check_refund(&config, &state(10, true)), Err(Error::RefundNotAllowed));
    }
}
