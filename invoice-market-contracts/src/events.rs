use soroban_sdk::{symbol_short, Address, Env, String};

use crate::invoice::Invoice;

pub fn emit_invoice_created(env: &Env, invoice: &Invoice) {
    env.events().publish(
        (symbol_short!("created"),),
        (
            invoice.id,
            invoice.freelancer.clone(),
            invoice.client.clone(),
            invoice.amount,
            invoice.due_date,
            invoice.created_at,
        ),
    );
}

pub fn emit_invoice_sent(env: &Env, invoice: &Invoice) {
    env.events().publish(
        (symbol_short!("sent"),),
        (invoice.id, invoice.freelancer.clone(), invoice.updated_at),
    );
}

/// Emitted both for a first approval and for a dispute resolved by approval.
pub fn emit_invoice_approved(env: &Env, invoice: &Invoice, approver: &Address) {
    env.events().publish(
        (symbol_short!("approved"),),
        (invoice.id, approver.clone(), invoice.updated_at),
    );
}

pub fn emit_invoice_disputed(env: &Env, invoice: &Invoice, disputant: &Address, reason: &String) {
    env.events().publish(
        (symbol_short!("disputed"),),
        (
            invoice.id,
            disputant.clone(),
            reason.clone(),
            invoice.updated_at,
        ),
    );
}

pub fn emit_invoice_paid(env: &Env, invoice: &Invoice) {
    env.events().publish(
        (symbol_short!("paid"),),
        (
            invoice.id,
            invoice.client.clone(),
            invoice.freelancer.clone(),
            invoice.amount,
            invoice.updated_at,
        ),
    );
}
