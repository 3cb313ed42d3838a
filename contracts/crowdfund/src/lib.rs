//! # Crowdfund Contract
//!
//! An all-or-nothing crowdfunding ledger over a single Stellar token.
//! It exposes the single Soroban contract `Crowdfund` whose entry points cover
//! the full project lifecycle:
//!
//! | Phase        | Entry Point(s)                                   |
//! |--------------|--------------------------------------------------|
//! | Bootstrap    | [`Crowdfund::init`]                              |
//! | Registration | [`Crowdfund::create_project`]                    |
//! | Funding      | [`Crowdfund::donate`]                            |
//! | Settlement   | [`Crowdfund::withdraw`], [`Crowdfund::refund`]   |
//! | Queries      | `get_project`, `get_contribution`, `project_count`, `token` |
//!
//! ## Architecture
//!
//! Settlement rules live in [`settlement`], per-donor bookkeeping in
//! [`ledger`], and storage access in [`storage`]. This file contains
//! **only** the public entry points, authorization and event emissions.
//!
//! Soroban runs one invocation at a time and an invocation that returns
//! `Err` leaves no trace, so every entry point is all-or-nothing.

#![no_std]

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env};

pub mod events;
mod ledger;
mod settlement;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_events;

pub use types::Project;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    ProjectNotFound    = 1,
    InvalidAmount      = 2,
    Unauthorized       = 3,
    GoalNotReached     = 4,
    AlreadyWithdrawn   = 5,
    RefundNotAllowed   = 6,
    TransferFailed     = 7,
    AlreadyInitialized = 8,
    NotInitialized     = 9,
    Overflow           = 10,
}

#[contract]
pub struct Crowdfund;

#[contractimpl]
impl Crowdfund {
    // ─────────────────────────────────────────────────────────
    // Initialisation
    // ─────────────────────────────────────────────────────────

    /// Bind the contract to the token it escrows.
    ///
    /// Must be called exactly once immediately after deployment.
    /// Subsequent calls fail with `Error::AlreadyInitialized`.
    pub fn init(env: Env, admin: Address, token: Address) -> Result<(), Error> {
        admin.require_auth();
        if storage::has_token(&env) {
            return Err(Error::AlreadyInitialized);
        }
        storage::set_token(&env, &token);
        events::emit_initialized(&env, admin, token);
        Ok(())
    }

    /// Address of the tracked token contract.
    pub fn token(env: Env) -> Result<Address, Error> {
        storage::get_token(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────

    /// Register a new funding project and return its ID.
    ///
    /// - `creator` must authorize the call; it gets no settlement rights.
    /// - `funding_goal` must be positive.
    /// - `beneficiary` is the only address that may later withdraw.
    pub fn create_project(
        env: Env,
        creator: Address,
        funding_goal: i128,
        beneficiary: Address,
    ) -> Result<u64, Error> {
        creator.require_auth();
        storage::get_token(&env)?;

        if funding_goal <= 0 {
            return Err(Error::InvalidAmount);
        }

        let id = storage::get_and_increment_project_id(&env)?;
        let project = Project {
            id,
            funding_goal,
            beneficiary: beneficiary.clone(),
            creator: creator.clone(),
            raised: 0,
            withdrawn: false,
        };
        storage::save_project(&env, &project);

        events::emit_project_created(&env, id, funding_goal, beneficiary, creator);
        Ok(id)
    }

    /// Retrieve a project by its ID.
    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        storage::load_project(&env, project_id)
    }

    /// Live contribution of `donor` to `project_id`; zero if none.
    pub fn get_contribution(env: Env, project_id: u64, donor: Address) -> i128 {
        ledger::donor_contribution(&env, project_id, &donor)
    }

    /// Number of projects created so far (also the next ID to be assigned).
    pub fn project_count(env: Env) -> u64 {
        storage::project_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Funding & settlement
    // ─────────────────────────────────────────────────────────

    /// Donate `amount` to a project.
    ///
    /// `donor` must have approved this contract for at least `amount` on the
    /// token; the pull uses `transfer_from` with the contract as spender.
    pub fn donate(env: Env, project_id: u64, donor: Address, amount: i128) -> Result<(), Error> {
        donor.require_auth();
        settlement::donate(&env, project_id, &donor, amount)?;
        events::emit_donated(&env, project_id, donor, amount);
        Ok(())
    }

    /// Release everything raised to the beneficiary.
    ///
    /// Only the beneficiary may call, only once, and only after the goal was
    /// reached. Returns the amount transferred.
    pub fn withdraw(env: Env, project_id: u64, caller: Address) -> Result<i128, Error> {
        caller.require_auth();
        let amount = settlement::withdraw(&env, project_id, &caller)?;
        events::emit_withdrawn(&env, project_id, caller, amount);
        Ok(amount)
    }

    /// Return the caller's whole contribution while the goal is unmet.
    ///
    /// A donor with nothing to reclaim gets `0` back and no event is emitted.
    pub fn refund(env: Env, project_id: u64, donor: Address) -> Result<i128, Error> {
        donor.require_auth();
        let amount = settlement::refund(&env, project_id, &donor)?;
        if amount > 0 {
            events::emit_refunded(&env, project_id, donor, amount);
        }
        Ok(amount)
    }
}
