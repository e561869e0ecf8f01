//! Settlement of accepted `pay` transitions.

use soroban_sdk::{token, Env};

use crate::errors::InvoiceMarketError;
use crate::init::ProtocolConfig;
use crate::invoice::{Invoice, TokenRef};

/// Resolve the token contract settling `invoice` and move the invoiced
/// amount from the client to the freelancer.
///
/// The engine has already matched `token_impl` against the invoice's
/// configured token; this step only selects the transfer asset. Balance and
/// allowance sufficiency are the token contract's own concern, and a failed
/// transfer aborts the whole invocation before any status change persists.
pub fn settle(
    env: &Env,
    invoice: &Invoice,
    token_impl: Option<&TokenRef>,
) -> Result<(), InvoiceMarketError> {
    let asset = match token_impl {
        Some(token_ref) => token_ref.contract.clone(),
        None => ProtocolConfig::native_token(env)?,
    };
    let amount = i128::try_from(invoice.amount).map_err(|_| InvoiceMarketError::InvalidAmount)?;
    token::Client::new(env, &asset).transfer(&invoice.client, &invoice.freelancer, &amount);
    Ok(())
}
