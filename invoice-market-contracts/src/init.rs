//! One-time protocol configuration.
//!
//! The only configured values are the admin address and the Stellar Asset
//! Contract that settles invoices carrying no token reference.

use soroban_sdk::{symbol_short, Address, Env};

use crate::errors::InvoiceMarketError;

pub struct ProtocolConfig;

impl ProtocolConfig {
    pub fn initialize(
        env: &Env,
        admin: &Address,
        native_token: &Address,
    ) -> Result<(), InvoiceMarketError> {
        if Self::is_initialized(env) {
            return Err(InvoiceMarketError::AlreadyInitialized);
        }
        env.storage().instance().set(&symbol_short!("admin"), admin);
        env.storage()
            .instance()
            .set(&symbol_short!("native"), native_token);
        Ok(())
    }

    pub fn is_initialized(env: &Env) -> bool {
        env.storage().instance().has(&symbol_short!("native"))
    }

    /// The asset settling `None`-token invoices.
    pub fn native_token(env: &Env) -> Result<Address, InvoiceMarketError> {
        env.storage()
            .instance()
            .get(&symbol_short!("native"))
            .ok_or(InvoiceMarketError::NotInitialized)
    }

    pub fn admin(env: &Env) -> Option<Address> {
        env.storage().instance().get(&symbol_short!("admin"))
    }
}
