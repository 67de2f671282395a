//! File-backed settlement source.

use std::path::PathBuf;

use fairshare_core::balance::{SettlementSource, SourceError};
use fairshare_shared::types::GroupId;
use serde_json::Value;
use tracing::debug;

/// Reads settlement payloads from JSON files exported from the remote service.
///
/// A missing path behaves like an unreachable endpoint.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    pub pairs: Option<PathBuf>,
    pub balances: Option<PathBuf>,
}

impl FileSource {
    async fn read(path: Option<&PathBuf>, what: &str) -> Result<Value, SourceError> {
        let path = path.ok_or_else(|| SourceError::new(format!("no {what} file given")))?;
        debug!(path = %path.display(), what, "Reading settlement data");

        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| SourceError::new(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| SourceError::new(format!("{}: {e}", path.display())))
    }
}

impl SettlementSource for FileSource {
    async fn fetch_pairs(&self, _group_id: GroupId) -> Result<Value, SourceError> {
        Self::read(self.pairs.as_ref(), "pairs").await
    }

    async fn fetch_balances(&self, _group_id: GroupId) -> Result<Value, SourceError> {
        Self::read(self.balances.as_ref(), "balances").await
    }
}
