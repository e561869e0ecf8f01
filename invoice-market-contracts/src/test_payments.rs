/// Settlement tests: native-asset and fungible-token payment, token
/// matching, and the split between engine and ledger rejections.
use super::*;
use soroban_sdk::{testutils::Address as _, token, Address, Env, String};

const INVOICE_AMOUNT: u128 = 5_000_000;
const STARTING_BALANCE: i128 = 10_000_000;

fn setup(env: &Env) -> InvoiceMarketContractClient<'static> {
    let contract_id = env.register(InvoiceMarketContract, ());
    InvoiceMarketContractClient::new(env, &contract_id)
}

/// Register a Stellar Asset Contract and mint the payer a starting balance.
fn register_funded_asset(env: &Env, payer: &Address) -> Address {
    let token_admin = Address::generate(env);
    let asset = env
        .register_stellar_asset_contract_v2(token_admin.clone())
        .address();
    token::StellarAssetClient::new(env, &asset).mint(payer, &STARTING_BALANCE);
    asset
}

fn approved_invoice(
    env: &Env,
    market: &InvoiceMarketContractClient,
    freelancer: &Address,
    client: &Address,
    token_ref: &Option<TokenRef>,
) -> u64 {
    let invoice_id = market.create_invoice(
        freelancer,
        client,
        &None,
        &INVOICE_AMOUNT,
        token_ref,
        &700u128,
        &String::from_str(env, "API integration"),
    );
    market.send_invoice(freelancer, &invoice_id);
    market.approve_invoice(client, &invoice_id);
    invoice_id
}

#[test]
fn test_pay_native_moves_funds() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let freelancer = Address::generate(&env);
    let client = Address::generate(&env);
    let admin = Address::generate(&env);
    let native = register_funded_asset(&env, &client);
    market.initialize(&admin, &native);

    let invoice_id = approved_invoice(&env, &market, &freelancer, &client, &None);
    market.pay_invoice(&client, &invoice_id, &None);

    let balances = token::Client::new(&env, &native);
    assert_eq!(
        balances.balance(&client),
        STARTING_BALANCE - INVOICE_AMOUNT as i128
    );
    assert_eq!(balances.balance(&freelancer), INVOICE_AMOUNT as i128);
    assert_eq!(market.get_invoice(&invoice_id).status, InvoiceStatus::Paid);
}

#[test]
fn test_pay_with_fungible_token() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let freelancer = Address::generate(&env);
    let client = Address::generate(&env);
    let asset = register_funded_asset(&env, &client);
    let token_ref = Some(TokenRef {
        contract: asset.clone(),
        name: String::from_str(&env, "usdc-token"),
    });

    // Token invoices settle without any native-asset configuration.
    let invoice_id = approved_invoice(&env, &market, &freelancer, &client, &token_ref);
    market.pay_invoice(&client, &invoice_id, &token_ref);

    let balances = token::Client::new(&env, &asset);
    assert_eq!(balances.balance(&freelancer), INVOICE_AMOUNT as i128);
    assert_eq!(market.get_invoice(&invoice_id).status, InvoiceStatus::Paid);
}

#[test]
fn test_pay_token_on_native_invoice_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let freelancer = Address::generate(&env);
    let client = Address::generate(&env);
    let admin = Address::generate(&env);
    let native = register_funded_asset(&env, &client);
    market.initialize(&admin, &native);

    let invoice_id = approved_invoice(&env, &market, &freelancer, &client, &None);
    let wrong = Some(TokenRef {
        contract: Address::generate(&env),
        name: String::from_str(&env, "usdc-token"),
    });

    let result = market.try_pay_invoice(&client, &invoice_id, &wrong);
    assert!(result.is_err());
    let err = result.unwrap_err().unwrap();
    assert_eq!(err, InvoiceMarketError::TokenMismatch);
    assert_eq!(err.kind(), ErrorKind::TokenMismatch);
    assert_eq!(
        market.get_invoice(&invoice_id).status,
        InvoiceStatus::Approved
    );
}

#[test]
fn test_pay_native_on_token_invoice_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let freelancer = Address::generate(&env);
    let client = Address::generate(&env);
    let asset = register_funded_asset(&env, &client);
    let token_ref = Some(TokenRef {
        contract: asset,
        name: String::from_str(&env, "usdc-token"),
    });

    let invoice_id = approved_invoice(&env, &market, &freelancer, &client, &token_ref);
    let result = market.try_pay_invoice(&client, &invoice_id, &None);
    assert_eq!(result.unwrap_err().unwrap(), InvoiceMarketError::TokenMismatch);
}

#[test]
fn test_pay_with_differing_token_name_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let freelancer = Address::generate(&env);
    let client = Address::generate(&env);
    let asset = register_funded_asset(&env, &client);

    let configured = Some(TokenRef {
        contract: asset.clone(),
        name: String::from_str(&env, "usdc-token"),
    });
    let invoice_id = approved_invoice(&env, &market, &freelancer, &client, &configured);

    // Same contract, different registered name: still a mismatch.
    let renamed = Some(TokenRef {
        contract: asset,
        name: String::from_str(&env, "usdc-token-v2"),
    });
    let result = market.try_pay_invoice(&client, &invoice_id, &renamed);
    assert_eq!(result.unwrap_err().unwrap(), InvoiceMarketError::TokenMismatch);
}

#[test]
fn test_pay_requires_client() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let freelancer = Address::generate(&env);
    let client = Address::generate(&env);
    let admin = Address::generate(&env);
    let native = register_funded_asset(&env, &client);
    market.initialize(&admin, &native);

    let invoice_id = approved_invoice(&env, &market, &freelancer, &client, &None);
    let result = market.try_pay_invoice(&freelancer, &invoice_id, &None);
    assert!(result.is_err());
    let err = result.unwrap_err().unwrap();
    assert_eq!(err, InvoiceMarketError::NotClient);
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
}

#[test]
fn test_pay_unapproved_invoice_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let freelancer = Address::generate(&env);
    let client = Address::generate(&env);
    let admin = Address::generate(&env);
    let native = register_funded_asset(&env, &client);
    market.initialize(&admin, &native);

    let invoice_id = market.create_invoice(
        &freelancer,
        &client,
        &None,
        &INVOICE_AMOUNT,
        &None,
        &700u128,
        &String::from_str(&env, "API integration"),
    );
    market.send_invoice(&freelancer, &invoice_id);

    let result = market.try_pay_invoice(&client, &invoice_id, &None);
    assert_eq!(
        result.unwrap_err().unwrap(),
        InvoiceMarketError::InvalidTransition
    );

    let balances = token::Client::new(&env, &native);
    assert_eq!(balances.balance(&client), STARTING_BALANCE);
}

#[test]
fn test_pay_native_before_initialize_is_ledger_error() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let freelancer = Address::generate(&env);
    let client = Address::generate(&env);
    let invoice_id = approved_invoice(&env, &market, &freelancer, &client, &None);

    // The engine accepts this pay; the ledger side cannot settle it.
    let result = market.try_pay_invoice(&client, &invoice_id, &None);
    assert!(result.is_err());
    let err = result.unwrap_err().unwrap();
    assert_eq!(err, InvoiceMarketError::NotInitialized);
    assert_eq!(err.kind(), ErrorKind::Ledger);
    assert_eq!(
        market.get_invoice(&invoice_id).status,
        InvoiceStatus::Approved
    );
}

#[test]
fn test_initialize_twice_rejected() {
    let env = Env::default();
    env.mock_all_auths();
    let market = setup(&env);

    let admin = Address::generate(&env);
    let native = Address::generate(&env);
    market.initialize(&admin, &native);
    assert!(market.is_initialized());
    assert_eq!(market.get_native_token(), native);
    assert_eq!(market.get_current_admin(), Some(admin.clone()));

    let result = market.try_initialize(&admin, &native);
    assert_eq!(
        result.unwrap_err().unwrap(),
        InvoiceMarketError::AlreadyInitialized
    );
}
