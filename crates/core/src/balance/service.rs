//! Balance service: net position of one user from remote settlement data.
//!
//! The balances map is authoritative. When it cannot be read or does not
//! match its schema, the net position is folded from settlement pairs
//! instead. The fallback is logged but not reported as an error; only the
//! loss of both sources is.

use std::future::Future;

use fairshare_shared::config::BalanceConfig;
use fairshare_shared::types::{GroupId, UserId};
use serde_json::Value;
use tracing::{error, instrument, warn};

use super::error::{BalanceError, SourceError};
use super::normalize::{Normalized, normalize_balances, normalize_pairs};
use super::types::{BalanceSheet, BalanceSource, BalanceView, NetBalance, SettlementPair};

/// Remote settlement data for a group, in whatever shape the service sends.
pub trait SettlementSource: Send + Sync {
    /// Fetch the settlement pairs of a group.
    fn fetch_pairs(&self, group_id: GroupId)
    -> impl Future<Output = Result<Value, SourceError>> + Send;

    /// Fetch the per-currency, per-user balances of a group.
    fn fetch_balances(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = Result<Value, SourceError>> + Send;
}

/// Balance service producing display-ready balance views.
pub struct BalanceService<S> {
    source: S,
    config: BalanceConfig,
}

impl<S: SettlementSource> BalanceService<S> {
    /// Create a balance service over a settlement source.
    pub fn new(source: S, config: BalanceConfig) -> Self {
        Self { source, config }
    }

    /// Load the balance view of `user_id` in `group_id`.
    ///
    /// Both sources are read concurrently.
    ///
    /// # Errors
    ///
    /// Returns `SourcesUnavailable` only when neither source can be used.
    #[instrument(skip_all, fields(group_id = %group_id, user_id = %user_id))]
    pub async fn balance_view(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<BalanceView, BalanceError> {
        let (pairs, balances) = tokio::join!(
            self.source.fetch_pairs(group_id),
            self.source.fetch_balances(group_id)
        );

        let pairs = pairs
            .map_err(|e| e.to_string())
            .and_then(|raw| normalize_pairs(&raw).map_err(|e| e.to_string()));
        let sheet = balances
            .map_err(|e| e.to_string())
            .and_then(|raw| normalize_balances(&raw).map_err(|e| e.to_string()));

        resolve_view(user_id, pairs, sheet, self.config.restrict_pairs_to_user)
    }
}

/// Combine already-read sources into a balance view.
///
/// `pairs` and `sheet` carry the failure message of their source on error.
/// Dropped-entry counts are summed over the sources the view is built from.
///
/// # Errors
///
/// Returns `SourcesUnavailable` when both sources failed.
pub fn resolve_view(
    user_id: UserId,
    pairs: Result<Normalized<Vec<SettlementPair>>, String>,
    sheet: Result<Normalized<BalanceSheet>, String>,
    restrict_pairs_to_user: bool,
) -> Result<BalanceView, BalanceError> {
    let (net, source, pairs, dropped_entries) = match (sheet, pairs) {
        (Ok(sheet), pairs) => {
            let pairs = pairs.unwrap_or_else(|reason| {
                warn!(%reason, "Settlement pairs unavailable, showing balances only");
                Normalized {
                    value: Vec::new(),
                    dropped: 0,
                }
            });
            (
                sheet.value.net_for(user_id),
                BalanceSource::Balances,
                pairs.value,
                sheet.dropped + pairs.dropped,
            )
        }
        (Err(reason), Ok(pairs)) => {
            warn!(%reason, "Balances unavailable, folding settlement pairs");
            (
                NetBalance::from_pairs(user_id, &pairs.value),
                BalanceSource::Pairs,
                pairs.value,
                pairs.dropped,
            )
        }
        (Err(balances), Err(pairs)) => {
            error!(%balances, %pairs, "No settlement data available");
            return Err(BalanceError::SourcesUnavailable { balances, pairs });
        }
    };

    let pairs = if restrict_pairs_to_user {
        pairs.into_iter().filter(|p| p.involves(user_id)).collect()
    } else {
        pairs
    };

    if dropped_entries > 0 {
        warn!(dropped_entries, "Settlement data contained unreadable entries");
    }

    Ok(BalanceView {
        user_id,
        net,
        pairs,
        source,
        dropped_entries,
    })
}
