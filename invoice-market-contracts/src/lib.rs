#![no_std]
use soroban_sdk::{contract, contractimpl, Address, Env, String, Vec};

mod errors;
mod events;
mod init;
pub mod invoice;
pub mod lifecycle;
mod payments;

#[cfg(test)]
mod test_payments;

pub use errors::{ErrorKind, InvoiceMarketError};
pub use invoice::{Invoice, InvoiceStatus, TokenRef};
pub use lifecycle::{LifecycleAction, LifecycleEvent, Transition};

use events::{
    emit_invoice_approved, emit_invoice_created, emit_invoice_disputed, emit_invoice_paid,
    emit_invoice_sent,
};
use init::ProtocolConfig;
use invoice::InvoiceStorage;

#[contract]
pub struct InvoiceMarketContract;

/// Maximum number of records returned by paginated query endpoints.
pub(crate) const MAX_QUERY_LIMIT: u32 = 100;

#[inline]
fn cap_query_limit(limit: u32) -> u32 {
    limit.min(MAX_QUERY_LIMIT)
}

#[contractimpl]
impl InvoiceMarketContract {
    // ============================================================================
    // Configuration
    // ============================================================================

    /// Initialize the protocol with the asset that settles native-currency
    /// invoices (one-time setup).
    ///
    /// # Errors
    /// * `AlreadyInitialized` if called a second time
    pub fn initialize(
        env: Env,
        admin: Address,
        native_token: Address,
    ) -> Result<(), InvoiceMarketError> {
        admin.require_auth();
        ProtocolConfig::initialize(&env, &admin, &native_token)
    }

    /// Check whether the protocol has been initialized
    pub fn is_initialized(env: Env) -> bool {
        ProtocolConfig::is_initialized(&env)
    }

    /// Get the configured native settlement asset
    pub fn get_native_token(env: Env) -> Result<Address, InvoiceMarketError> {
        ProtocolConfig::native_token(&env)
    }

    /// Get the current admin address
    pub fn get_current_admin(env: Env) -> Option<Address> {
        ProtocolConfig::admin(&env)
    }

    // ============================================================================
    // Invoice Lifecycle Functions
    // ============================================================================

    /// Create a new invoice owned by `freelancer`, in `Draft`.
    ///
    /// # Arguments
    /// * `freelancer` - Creator and payee (must authorize the call)
    /// * `client` - The payer; must differ from the freelancer
    /// * `boss` - Optional second approver gating payment
    /// * `amount` - Invoiced amount in smallest units; zero is legal
    /// * `token` - Payment token reference, or `None` for the native asset
    /// * `due_date` - Ledger height after which the invoice counts as
    ///   overdue; informational only
    /// * `memo` - Free-text description, at most 500 bytes
    ///
    /// # Returns
    /// * `Ok(u64)` - The new invoice id
    ///
    /// # Errors
    /// * `InvalidParty` if `client == freelancer`
    /// * `InvalidAmount` if the amount cannot be settled over the token interface
    /// * `InvalidMemo` if the memo is over-length
    #[allow(clippy::too_many_arguments)]
    pub fn create_invoice(
        env: Env,
        freelancer: Address,
        client: Address,
        boss: Option<Address>,
        amount: u128,
        token: Option<TokenRef>,
        due_date: u128,
        memo: String,
    ) -> Result<u64, InvoiceMarketError> {
        freelancer.require_auth();
        lifecycle::validate_create(&freelancer, &client, amount, &memo)?;

        let id = InvoiceStorage::next_invoice_id(&env);
        let invoice = Invoice::new(
            &env, id, freelancer, client, boss, amount, token, due_date, memo,
        );
        InvoiceStorage::store_invoice(&env, &invoice);
        emit_invoice_created(&env, &invoice);

        Ok(id)
    }

    /// Move a `Draft` invoice to `Sent` (freelancer only).
    ///
    /// # Errors
    /// * `NotFreelancer` if `actor` is not the invoice's freelancer
    /// * `InvalidTransition` if the invoice is not in `Draft`
    pub fn send_invoice(env: Env, actor: Address, invoice_id: u64) -> Result<(), InvoiceMarketError> {
        actor.require_auth();
        let mut invoice = InvoiceStorage::get_invoice(&env, invoice_id)?;
        let transition = lifecycle::evaluate(&invoice, &LifecycleAction::Send, &actor)?;

        let old_status = invoice.status.clone();
        invoice.apply(&env, &transition);
        InvoiceStorage::update_invoice(&env, &old_status, &invoice);
        emit_invoice_sent(&env, &invoice);
        Ok(())
    }

    /// Approve a `Sent` or `Disputed` invoice.
    ///
    /// When a boss is configured, only the boss may approve; otherwise the
    /// client approves. Approving a `Disputed` invoice resolves the dispute
    /// and clears the stored reason.
    ///
    /// # Errors
    /// * `NotApprover` if `actor` is not the gating approver
    /// * `InvalidTransition` if the invoice is in any other state
    pub fn approve_invoice(
        env: Env,
        actor: Address,
        invoice_id: u64,
    ) -> Result<(), InvoiceMarketError> {
        actor.require_auth();
        let mut invoice = InvoiceStorage::get_invoice(&env, invoice_id)?;
        let transition = lifecycle::evaluate(&invoice, &LifecycleAction::Approve, &actor)?;

        let old_status = invoice.status.clone();
        invoice.apply(&env, &transition);
        InvoiceStorage::update_invoice(&env, &old_status, &invoice);
        emit_invoice_approved(&env, &invoice, &actor);
        Ok(())
    }

    /// Dispute a `Sent` or `Approved` invoice (client or boss).
    ///
    /// # Errors
    /// * `InvalidDisputeReason` if the reason is empty or over-length
    /// * `Unauthorized` if `actor` is neither client nor boss
    /// * `InvalidTransition` if the invoice is in any other state
    pub fn dispute_invoice(
        env: Env,
        actor: Address,
        invoice_id: u64,
        reason: String,
    ) -> Result<(), InvoiceMarketError> {
        actor.require_auth();
        let mut invoice = InvoiceStorage::get_invoice(&env, invoice_id)?;
        let transition =
            lifecycle::evaluate(&invoice, &LifecycleAction::Dispute(reason.clone()), &actor)?;

        let old_status = invoice.status.clone();
        invoice.apply(&env, &transition);
        InvoiceStorage::update_invoice(&env, &old_status, &invoice);
        emit_invoice_disputed(&env, &invoice, &actor, &reason);
        Ok(())
    }

    /// Settle an `Approved` invoice (client only).
    ///
    /// `token_impl` must match the token reference fixed at creation; `None`
    /// settles in the configured native asset. The transfer runs before the
    /// status change is persisted, so a `Paid` record implies a completed
    /// transfer.
    ///
    /// # Errors
    /// * `NotClient` if `actor` is not the invoice's client
    /// * `TokenMismatch` if `token_impl` differs from the invoice's token
    /// * `InvalidTransition` if the invoice is not in `Approved`
    /// * `NotInitialized` if a native-asset invoice is paid before `initialize`
    pub fn pay_invoice(
        env: Env,
        actor: Address,
        invoice_id: u64,
        token_impl: Option<TokenRef>,
    ) -> Result<(), InvoiceMarketError> {
        actor.require_auth();
        let mut invoice = InvoiceStorage::get_invoice(&env, invoice_id)?;
        let transition =
            lifecycle::evaluate(&invoice, &LifecycleAction::Pay(token_impl.clone()), &actor)?;

        payments::settle(&env, &invoice, token_impl.as_ref())?;

        let old_status = invoice.status.clone();
        invoice.apply(&env, &transition);
        InvoiceStorage::update_invoice(&env, &old_status, &invoice);
        emit_invoice_paid(&env, &invoice);
        Ok(())
    }

    // ============================================================================
    // Read-only Functions
    // ============================================================================

    /// Get an invoice by id
    pub fn get_invoice(env: Env, invoice_id: u64) -> Result<Invoice, InvoiceMarketError> {
        InvoiceStorage::get_invoice(&env, invoice_id)
    }

    /// Pre-flight a lifecycle action without mutating anything.
    ///
    /// Returns the transition the matching mutating entry point would apply
    /// for the same `(invoice, action, actor)`, or its rejection. Consumers
    /// should re-read the invoice after any submission; this result reflects
    /// the current snapshot only.
    pub fn preview_transition(
        env: Env,
        invoice_id: u64,
        action: LifecycleAction,
        actor: Address,
    ) -> Result<Transition, InvoiceMarketError> {
        let invoice = InvoiceStorage::get_invoice(&env, invoice_id)?;
        lifecycle::evaluate(&invoice, &action, &actor)
    }

    /// Get all invoice ids created by a freelancer
    pub fn get_invoices_by_freelancer(env: Env, freelancer: Address) -> Vec<u64> {
        InvoiceStorage::get_freelancer_invoices(&env, &freelancer)
    }

    /// Get all invoice ids payable by a client
    pub fn get_invoices_by_client(env: Env, client: Address) -> Vec<u64> {
        InvoiceStorage::get_client_invoices(&env, &client)
    }

    /// Return a paginated slice of the ids in a status bucket.
    pub fn get_invoices_by_status(
        env: Env,
        status: InvoiceStatus,
        offset: u32,
        limit: u32,
    ) -> Vec<u64> {
        let ids = InvoiceStorage::get_status_invoices(&env, &status);
        let mut page = Vec::new(&env);
        let end = offset.saturating_add(cap_query_limit(limit)).min(ids.len());
        for index in offset..end {
            if let Some(id) = ids.get(index) {
                page.push_back(id);
            }
        }
        page
    }

    /// Return the number of invoices currently in a status bucket.
    pub fn get_invoice_count_by_status(env: Env, status: InvoiceStatus) -> u32 {
        InvoiceStorage::get_status_invoices(&env, &status).len()
    }

    /// Total number of invoices ever created
    pub fn get_total_invoice_count(env: Env) -> u64 {
        InvoiceStorage::total_invoice_count(&env)
    }

    /// Whether the current ledger height has passed the invoice's due date.
    /// Informational only; never gates a transition.
    pub fn is_invoice_overdue(env: Env, invoice_id: u64) -> Result<bool, InvoiceMarketError> {
        let invoice = InvoiceStorage::get_invoice(&env, invoice_id)?;
        Ok(invoice.is_overdue(env.ledger().sequence() as u128))
    }
}
