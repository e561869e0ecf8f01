//! Pure decision core for the invoice lifecycle.
//!
//! `evaluate` takes an invoice snapshot, a requested action, and the acting
//! identity, and returns either the resulting transition or a typed
//! rejection. It performs no storage access and no I/O, so the same rules run
//! identically on-chain and as a pre-flight check in consuming clients. The
//! entry points in `lib.rs` persist a transition only after `evaluate`
//! accepts it.
//!
//! State set: `Draft` (initial) -> `Sent` -> `Approved` -> `Paid` (terminal),
//! with `Disputed` re-enterable from `Sent` or `Approved` and resolvable only
//! through `Approve`. Re-submitting an already-applied operation is rejected
//! as `InvalidTransition`, never treated as a no-op success.

use soroban_sdk::{contracttype, Address, String};

use crate::errors::InvoiceMarketError;
use crate::invoice::{Invoice, InvoiceStatus, TokenRef};

/// Longest accepted invoice memo, in bytes.
pub const MAX_MEMO_LENGTH: u32 = 500;
/// Longest accepted dispute reason, in bytes.
pub const MAX_REASON_LENGTH: u32 = 500;

/// A requested lifecycle operation together with its operation-specific
/// arguments.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LifecycleAction {
    Send,
    Approve,
    Dispute(String),
    Pay(Option<TokenRef>),
}

/// Event emitted when the paired transition is applied.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LifecycleEvent {
    Created,
    Sent,
    Approved,
    Disputed,
    Paid,
}

/// Accepted outcome of `evaluate`: the successor status, the event to emit,
/// and the post-transition value of `dispute_reason`.
///
/// `dispute_reason` is `Some` exactly when `next_status` is `Disputed`, so
/// applying a transition cannot break the reason/status invariant. In
/// particular, approving a disputed invoice clears the stored reason.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub next_status: InvoiceStatus,
    pub event: LifecycleEvent,
    pub dispute_reason: Option<String>,
}

/// Validate the fields of a not-yet-created invoice.
///
/// Amounts and due dates are unsigned, so negative values cannot be
/// expressed; the amount must still fit the token interface's `i128` so a
/// later `pay` can settle it. The client must be a party distinct from the
/// freelancer.
pub fn validate_create(
    freelancer: &Address,
    client: &Address,
    amount: u128,
    memo: &String,
) -> Result<(), InvoiceMarketError> {
    if amount > i128::MAX as u128 {
        return Err(InvoiceMarketError::InvalidAmount);
    }
    if memo.len() > MAX_MEMO_LENGTH {
        return Err(InvoiceMarketError::InvalidMemo);
    }
    if client == freelancer {
        return Err(InvoiceMarketError::InvalidParty);
    }
    Ok(())
}

/// Decide whether `actor` may apply `action` to `invoice` in its current
/// state, and what the invoice becomes if so.
pub fn evaluate(
    invoice: &Invoice,
    action: &LifecycleAction,
    actor: &Address,
) -> Result<Transition, InvoiceMarketError> {
    match action {
        LifecycleAction::Send => evaluate_send(invoice, actor),
        LifecycleAction::Approve => evaluate_approve(invoice, actor),
        LifecycleAction::Dispute(reason) => evaluate_dispute(invoice, actor, reason),
        LifecycleAction::Pay(token_impl) => evaluate_pay(invoice, actor, token_impl.as_ref()),
    }
}

fn evaluate_send(invoice: &Invoice, actor: &Address) -> Result<Transition, InvoiceMarketError> {
    if *actor != invoice.freelancer {
        return Err(InvoiceMarketError::NotFreelancer);
    }
    if invoice.status != InvoiceStatus::Draft {
        return Err(InvoiceMarketError::InvalidTransition);
    }
    Ok(Transition {
        next_status: InvoiceStatus::Sent,
        event: LifecycleEvent::Sent,
        dispute_reason: None,
    })
}

fn evaluate_approve(invoice: &Invoice, actor: &Address) -> Result<Transition, InvoiceMarketError> {
    // Strict boss gate: with a boss configured the client cannot approve.
    if actor != invoice.approver() {
        return Err(InvoiceMarketError::NotApprover);
    }
    match invoice.status {
        InvoiceStatus::Sent | InvoiceStatus::Disputed => Ok(Transition {
            next_status: InvoiceStatus::Approved,
            event: LifecycleEvent::Approved,
            dispute_reason: None,
        }),
        _ => Err(InvoiceMarketError::InvalidTransition),
    }
}

fn evaluate_dispute(
    invoice: &Invoice,
    actor: &Address,
    reason: &String,
) -> Result<Transition, InvoiceMarketError> {
    if reason.len() == 0 || reason.len() > MAX_REASON_LENGTH {
        return Err(InvoiceMarketError::InvalidDisputeReason);
    }
    if !invoice.is_disputant(actor) {
        return Err(InvoiceMarketError::Unauthorized);
    }
    match invoice.status {
        InvoiceStatus::Sent | InvoiceStatus::Approved => Ok(Transition {
            next_status: InvoiceStatus::Disputed,
            event: LifecycleEvent::Disputed,
            dispute_reason: Some(reason.clone()),
        }),
        _ => Err(InvoiceMarketError::InvalidTransition),
    }
}

fn evaluate_pay(
    invoice: &Invoice,
    actor: &Address,
    token_impl: Option<&TokenRef>,
) -> Result<Transition, InvoiceMarketError> {
    if *actor != invoice.client {
        return Err(InvoiceMarketError::NotClient);
    }
    if token_impl != invoice.token.as_ref() {
        return Err(InvoiceMarketError::TokenMismatch);
    }
    if invoice.status != InvoiceStatus::Approved {
        return Err(InvoiceMarketError::InvalidTransition);
    }
    Ok(Transition {
        next_status: InvoiceStatus::Paid,
        event: LifecycleEvent::Paid,
        dispute_reason: None,
    })
}
