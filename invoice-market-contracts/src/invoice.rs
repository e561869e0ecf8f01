//! Core data types and storage for invoice records.
//!
//! An invoice is owned by the freelancer that created it; the client (and the
//! optional boss) gain rights over it as it moves through the lifecycle.
//! Records live in persistent storage keyed by id, with secondary indexes by
//! freelancer, by client, and by status bucket.

use soroban_sdk::{contracttype, symbol_short, Address, Env, String, Symbol, Vec};

use crate::errors::InvoiceMarketError;
use crate::lifecycle::Transition;

/// Invoice status enumeration representing the lifecycle of an invoice
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Approved,
    Disputed,
    Paid,
}

/// Reference to a fungible-token contract: the token contract address plus
/// its registered name. An invoice with no token reference settles in the
/// native asset configured at initialization.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TokenRef {
    pub contract: Address,
    pub name: String,
}

/// Core invoice data structure
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Invoice {
    pub id: u64,                        // Sequential identifier, assigned at creation
    pub freelancer: Address,            // Creator and payee
    pub client: Address,                // Payer
    pub boss: Option<Address>,          // Optional second approver gating payment
    pub amount: u128,                   // Invoiced amount in smallest units
    pub token: Option<TokenRef>,        // Payment token; None = native asset
    pub due_date: u128,                 // Ledger height after which the invoice is overdue
    pub memo: String,                   // Free-text description
    pub status: InvoiceStatus,          // Current lifecycle state
    pub dispute_reason: Option<String>, // Some exactly while status == Disputed
    pub created_at: u64,                // Creation timestamp
    pub updated_at: u64,                // Timestamp of the last transition
}

impl Invoice {
    /// Create a new invoice in `Draft`. Field validation happens in
    /// `lifecycle::validate_create` before the id is allocated.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        env: &Env,
        id: u64,
        freelancer: Address,
        client: Address,
        boss: Option<Address>,
        amount: u128,
        token: Option<TokenRef>,
        due_date: u128,
        memo: String,
    ) -> Self {
        let created_at = env.ledger().timestamp();
        Self {
            id,
            freelancer,
            client,
            boss,
            amount,
            token,
            due_date,
            memo,
            status: InvoiceStatus::Draft,
            dispute_reason: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// The identity whose approval moves this invoice to `Approved`:
    /// the boss when one is configured, otherwise the client.
    pub fn approver(&self) -> &Address {
        self.boss.as_ref().unwrap_or(&self.client)
    }

    /// Whether `actor` may raise a dispute (client or boss).
    pub fn is_disputant(&self, actor: &Address) -> bool {
        *actor == self.client || self.boss.as_ref() == Some(actor)
    }

    /// `Paid` is terminal: no operation succeeds past it.
    pub fn is_terminal(&self) -> bool {
        self.status == InvoiceStatus::Paid
    }

    /// Informational only: never consulted by the transition logic.
    pub fn is_overdue(&self, ledger_height: u128) -> bool {
        self.status != InvoiceStatus::Paid && ledger_height > self.due_date
    }

    /// Apply an accepted transition, stamping `updated_at`.
    ///
    /// The transition carries the post-state `dispute_reason`, so the
    /// reason-iff-Disputed invariant holds after every application.
    pub fn apply(&mut self, env: &Env, transition: &Transition) {
        self.status = transition.next_status.clone();
        self.dispute_reason = transition.dispute_reason.clone();
        self.updated_at = env.ledger().timestamp();
    }
}

/// Storage access for invoice records and their secondary indexes.
pub struct InvoiceStorage;

impl InvoiceStorage {
    fn invoice_key(invoice_id: u64) -> (Symbol, u64) {
        (symbol_short!("invoice"), invoice_id)
    }

    fn freelancer_key(freelancer: &Address) -> (Symbol, Address) {
        (symbol_short!("inv_frl"), freelancer.clone())
    }

    fn client_key(client: &Address) -> (Symbol, Address) {
        (symbol_short!("inv_cli"), client.clone())
    }

    fn status_key(status: &InvoiceStatus) -> (Symbol, Symbol) {
        let status_symbol = match status {
            InvoiceStatus::Draft => symbol_short!("draft"),
            InvoiceStatus::Sent => symbol_short!("sent"),
            InvoiceStatus::Approved => symbol_short!("approved"),
            InvoiceStatus::Disputed => symbol_short!("disputed"),
            InvoiceStatus::Paid => symbol_short!("paid"),
        };
        (symbol_short!("inv_stat"), status_symbol)
    }

    /// Allocate the next sequential invoice id.
    pub fn next_invoice_id(env: &Env) -> u64 {
        let key = symbol_short!("inv_next");
        let next: u64 = env.storage().instance().get(&key).unwrap_or(0);
        env.storage().instance().set(&key, &(next + 1));
        next
    }

    /// Store a newly created invoice and register it in all indexes.
    pub fn store_invoice(env: &Env, invoice: &Invoice) {
        env.storage()
            .persistent()
            .set(&Self::invoice_key(invoice.id), invoice);
        Self::push_party_index(env, Self::freelancer_key(&invoice.freelancer), invoice.id);
        Self::push_party_index(env, Self::client_key(&invoice.client), invoice.id);
        Self::push_status_index(env, Self::status_key(&invoice.status), invoice.id);
    }

    /// Get an invoice by id.
    pub fn get_invoice(env: &Env, invoice_id: u64) -> Result<Invoice, InvoiceMarketError> {
        env.storage()
            .persistent()
            .get(&Self::invoice_key(invoice_id))
            .ok_or(InvoiceMarketError::InvoiceNotFound)
    }

    /// Persist a transitioned invoice, moving it between status buckets.
    pub fn update_invoice(env: &Env, old_status: &InvoiceStatus, invoice: &Invoice) {
        env.storage()
            .persistent()
            .set(&Self::invoice_key(invoice.id), invoice);
        if *old_status != invoice.status {
            Self::remove_status_index(env, Self::status_key(old_status), invoice.id);
            Self::push_status_index(env, Self::status_key(&invoice.status), invoice.id);
        }
    }

    /// Get all invoice ids created by a freelancer.
    pub fn get_freelancer_invoices(env: &Env, freelancer: &Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&Self::freelancer_key(freelancer))
            .unwrap_or_else(|| Vec::new(env))
    }

    /// Get all invoice ids payable by a client.
    pub fn get_client_invoices(env: &Env, client: &Address) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&Self::client_key(client))
            .unwrap_or_else(|| Vec::new(env))
    }

    /// Get all invoice ids in a status bucket.
    pub fn get_status_invoices(env: &Env, status: &InvoiceStatus) -> Vec<u64> {
        env.storage()
            .persistent()
            .get(&Self::status_key(status))
            .unwrap_or_else(|| Vec::new(env))
    }

    /// Total number of invoices ever created.
    pub fn total_invoice_count(env: &Env) -> u64 {
        env.storage()
            .instance()
            .get(&symbol_short!("inv_next"))
            .unwrap_or(0)
    }

    fn push_party_index(env: &Env, key: (Symbol, Address), invoice_id: u64) {
        let mut ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&key)
            .unwrap_or_else(|| Vec::new(env));
        ids.push_back(invoice_id);
        env.storage().persistent().set(&key, &ids);
    }

    fn push_status_index(env: &Env, key: (Symbol, Symbol), invoice_id: u64) {
        let mut ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&key)
            .unwrap_or_else(|| Vec::new(env));
        ids.push_back(invoice_id);
        env.storage().persistent().set(&key, &ids);
    }

    fn remove_status_index(env: &Env, key: (Symbol, Symbol), invoice_id: u64) {
        let ids: Vec<u64> = env
            .storage()
            .persistent()
            .get(&key)
            .unwrap_or_else(|| Vec::new(env));
        let mut remaining = Vec::new(env);
        for id in ids.iter() {
            if id != invoice_id {
                remaining.push_back(id);
            }
        }
        env.storage().persistent().set(&key, &remaining);
    }
}
