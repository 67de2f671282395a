//! Balance normalization.
//!
//! Turns externally computed settlement data into a per-user, per-currency
//! net-position view. The debt-matching itself runs on the remote service.

pub mod error;
pub mod normalize;
pub mod service;
pub mod types;

pub use error::{BalanceError, NormalizeError, SourceError};
pub use normalize::{Normalized, normalize_balances, normalize_pairs};
pub use service::{BalanceService, SettlementSource, resolve_view};
pub use types::{BalanceSheet, BalanceSource, BalanceView, NetBalance, SettlementPair};
