use soroban_sdk::contracterror;

/// Custom error types for the invoice market contract
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum InvoiceMarketError {
    // Invoice errors (1000-1099)
    InvoiceNotFound = 1000,

    // Authorization errors (1100-1199)
    Unauthorized = 1100,
    NotFreelancer = 1101,
    NotApprover = 1102,
    NotClient = 1103,

    // Validation errors (1200-1299)
    InvalidAmount = 1200,
    InvalidMemo = 1201,
    InvalidDisputeReason = 1202,
    InvalidParty = 1203,

    // Configuration errors (1300-1399)
    NotInitialized = 1300,
    AlreadyInitialized = 1301,

    // Lifecycle errors (1400-1499)
    InvalidTransition = 1400,
    TokenMismatch = 1401,
}

/// Rejection categories surfaced to consuming clients.
///
/// Engine rejections map onto the first five kinds. `Ledger` covers
/// conditions raised by the ledger side itself (missing records,
/// configuration), so a caller can distinguish "your request was invalid"
/// from "the ledger could not serve it".
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    InvalidInput,
    InvalidParty,
    Unauthorized,
    InvalidTransition,
    TokenMismatch,
    Ledger,
}

impl InvoiceMarketError {
    pub fn kind(self) -> ErrorKind {
        match self {
            Self::Unauthorized | Self::NotFreelancer | Self::NotApprover | Self::NotClient => {
                ErrorKind::Unauthorized
            }
            Self::InvalidAmount | Self::InvalidMemo | Self::InvalidDisputeReason => {
                ErrorKind::InvalidInput
            }
            Self::InvalidParty => ErrorKind::InvalidParty,
            Self::InvalidTransition => ErrorKind::InvalidTransition,
            Self::TokenMismatch => ErrorKind::TokenMismatch,
            Self::InvoiceNotFound | Self::NotInitialized | Self::AlreadyInitialized => {
                ErrorKind::Ledger
            }
        }
    }

    /// Human-readable description surfaced verbatim by consuming clients.
    pub fn message(self) -> &'static str {
        match self {
            Self::InvoiceNotFound => "invoice not found",
            Self::Unauthorized => "actor is neither the client nor the boss of this invoice",
            Self::NotFreelancer => "only the invoice's freelancer may send it",
            Self::NotApprover => "only the gating approver may approve this invoice",
            Self::NotClient => "only the invoice's client may pay it",
            Self::InvalidAmount => "amount cannot be settled over the token interface",
            Self::InvalidMemo => "memo exceeds the maximum length",
            Self::InvalidDisputeReason => {
                "dispute reason must be non-empty and within the maximum length"
            }
            Self::InvalidParty => "client must differ from the freelancer",
            Self::NotInitialized => "protocol has not been initialized",
            Self::AlreadyInitialized => "protocol is already initialized",
            Self::InvalidTransition => "operation is not defined for the invoice's current state",
            Self::TokenMismatch => "payment token does not match the invoice's configured token",
        }
    }
}
