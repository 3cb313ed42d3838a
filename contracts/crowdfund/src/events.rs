//! # Events
//!
//! Every event is published as `(topic_symbol, project_id)` topics with a
//! `#[contracttype]` struct as data, so indexers can filter by project
//! without decoding the payload.
//!
//! | Topic       | Data             |
//! |-------------|------------------|
//! | `init`      | [`Initialized`]  |
//! | `created`   | [`ProjectCreated`] |
//! | `donated`   | [`Donated`]      |
//! | `withdrawn` | [`Withdrawn`]    |
//! | `refunded`  | [`Refunded`]     |
//!
//! `init` carries no project id and is published with a single topic.

use soroban_sdk::{contracttype, symbol_short, Address, Env};

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Initialized {
    pub admin: Address,
    pub token: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub funding_goal: i128,
    pub beneficiary: Address,
    pub creator: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Donated {
    pub project_id: u64,
    pub donor: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Withdrawn {
    pub project_id: u64,
    pub beneficiary: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Refunded {
    pub project_id: u64,
    pub donor: Address,
    pub amount: i128,
}

pub fn emit_initialized(env: &Env, admin: Address, token: Address) {
    env.events()
        .publish((symbol_short!("init"),), Initialized { admin, token });
}

pub fn emit_project_created(
    env: &Env,
    project_id: u64,
    funding_goal: i128,
    beneficiary: Address,
    creator: Address,
) {
    let data = ProjectCreated {
        project_id,
        funding_goal,
        beneficiary,
        creator,
    };
    env.events()
        .publish((symbol_short!("created"), project_id), data);
}

pub fn emit_donated(env: &Env, project_id: u64, donor: Address, amount: i128) {
    let data = Donated {
        project_id,
        donor,
        amount,
    };
    env.events()
        .publish((symbol_short!("donated"), project_id), data);
}

pub fn emit_withdrawn(env: &Env, project_id: u64, beneficiary: Address, amount: i128) {
    let data = Withdrawn {
        project_id,
        beneficiary,
        amount,
    };
    env.events()
        .publish((symbol_short!("withdrawn"), project_id), data);
}

pub fn emit_refunded(env: &Env, project_id: u64, donor: Address, amount: i128) {
    let data = Refunded {
        project_id,
        donor,
        amount,
    };
    env.events()
        .publish((symbol_short!("refunded"), project_id), data);
}
