extern crate std;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, TryIntoVal,
};

use crate::events::{Donated, Initialized, ProjectCreated, Refunded, Withdrawn};
use crate::{Crowdfund, CrowdfundClient};

fn setup() -> (Env, CrowdfundClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register(Crowdfund, ());
    let client = CrowdfundClient::new(&env, &contract_id);
    let token_admin = Address::generate(&env);
    let token = env.register_stellar_asset_contract_v2(token_admin).address();
    (env, client, token)
}

fn setup_with_init() -> (Env, CrowdfundClient<'static>, token::Client<'static>) {
    let (env, client, token) = setup();
    client.init(&Address::generate(&env), &token);
    let token = token::Client::new(&env, &token);
    (env, client, token)
}

fn donor_with_funds(env: &Env, client: &CrowdfundClient, token: &token::Client, amount: i128) -> Address {
    let donor = Address::generate(env);
    token::StellarAssetClient::new(env, &token.address).mint(&donor, &amount);
    token.approve(&donor, &client.address, &amount, &(env.ledger().sequence() + 1_000));
    donor
}

#[test]
fn test_initialized_event() {
    let (env, client, token) = setup();
    let admin = Address::generate(&env);

    client.init(&admin, &token);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![&env, symbol_short!("init").into_val(&env)];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Initialized = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(event_data, Initialized { admin, token });
}

#[test]
fn test_project_created_event() {
    let (env, client, _token) = setup_with_init();
    let creator = Address::generate(&env);
    let beneficiary = Address::generate(&env);
    let funding_goal = 5000i128;

    let project_id = client.create_project(&creator, &funding_goal, &beneficiary);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("created"), project_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        project_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: ProjectCreated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectCreated {
            project_id,
            funding_goal,
            beneficiary,
            creator,
        }
    );
}

#[test]
fn test_donated_event() {
    let (env, client, token) = setup_with_init();
    let project_id = client.create_project(&Address::generate(&env), &10_000, &Address::generate(&env));
    let amount = 1000i128;
    let donor = donor_with_funds(&env, &client, &token, amount);

    client.donate(&project_id, &donor, &amount);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    // Topic: (symbol_short!("donated"), project_id)
    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("donated").into_val(&env),
        project_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Donated = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Donated {
            project_id,
            donor,
            amount,
        }
    );
}

#[test]
fn test_withdrawn_event() {
    let (env, client, token) = setup_with_init();
    let beneficiary = Address::generate(&env);
    let project_id = client.create_project(&Address::generate(&env), &1_000, &beneficiary);
    let donor = donor_with_funds(&env, &client, &token, 1_200);
    client.donate(&project_id, &donor, &1_200);

    client.withdraw(&project_id, &beneficiary);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("withdrawn").into_val(&env),
        project_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Withdrawn = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Withdrawn {
            project_id,
            beneficiary,
            amount: 1_200,
        }
    );
}

#[test]
fn test_refunded_event() {
    let (env, client, token) = setup_with_init();
    let project_id = client.create_project(&Address::generate(&env), &1_000, &Address::generate(&env));
    let donor = donor_with_funds(&env, &client, &token, 300);
    client.donate(&project_id, &donor, &300);

    client.refund(&project_id, &donor);

    let all_events = env.events().all();
    let last_event = all_events.last().expect("No events found");

    assert_eq!(last_event.0, client.address);
    let expected_topics = vec![
        &env,
        symbol_short!("refunded").into_val(&env),
        project_id.into_val(&env),
    ];
    assert_eq!(last_event.1, expected_topics);

    let event_data: Refunded = last_event.2.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Refunded {
            project_id,
            donor,
            amount: 300,
        }
    );
}
