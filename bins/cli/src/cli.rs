//! Command-line interface.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use tracing::info;

use fairshare_core::balance::{BalanceError, BalanceService};
use fairshare_core::split::{SplitError, SplitRequest, SplitService};
use fairshare_shared::{AppConfig, AppError};
use fairshare_shared::types::{GroupId, UserId};

use crate::source::FileSource;

/// Exit code for a request that was read but rejected.
const REJECTED: u8 = 2;

/// Exit code for a failure outside the caller's control.
const FAILED: u8 = 1;

/// Fairshare - fair-share expense splitting and balances.
#[derive(Parser)]
#[command(name = "fairshare")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Allocate a transaction split and print the request payload.
    Split {
        /// JSON split request file, or `-` for stdin
        #[arg(short, long, default_value = "-")]
        input: PathBuf,
    },
    /// Show a user's net balance from exported settlement data.
    Balance {
        /// User whose balance to show
        #[arg(short, long)]
        user: i64,

        /// Group the settlement data belongs to
        #[arg(short, long, default_value_t = 0)]
        group: i64,

        /// JSON file with settlement pairs
        #[arg(long)]
        pairs: Option<PathBuf>,

        /// JSON file with the per-currency balances map
        #[arg(long)]
        balances: Option<PathBuf>,
    },
}

/// Machine-readable failure printed instead of a result.
#[derive(Debug, Serialize)]
struct Failure {
    error: &'static str,
    reason: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    delta: Option<String>,
    #[serde(skip)]
    user_facing: bool,
}

impl Failure {
    fn new(app: &AppError, reason: &'static str, message: String) -> Self {
        Self {
            error: app.error_code(),
            reason,
            message,
            delta: None,
            user_facing: app.is_user_facing(),
        }
    }
}

impl From<SplitError> for Failure {
    fn from(err: SplitError) -> Self {
        let reason = err.reason();
        let message = err.to_string();
        let delta = match &err {
            SplitError::CustomSumMismatch { delta, .. } => Some(delta.to_string()),
            _ => None,
        };
        Self {
            delta,
            ..Self::new(&AppError::from(err), reason, message)
        }
    }
}

impl From<BalanceError> for Failure {
    fn from(err: BalanceError) -> Self {
        let reason = err.reason();
        let message = err.to_string();
        Self::new(&AppError::from(err), reason, message)
    }
}

/// JSON document to print, and the process exit status.
#[derive(Debug)]
pub struct Outcome {
    pub body: Value,
    pub status: u8,
}

impl Outcome {
    fn accepted(body: Value) -> Self {
        Self { body, status: 0 }
    }

    fn failed(failure: impl Into<Failure>) -> anyhow::Result<Self> {
        let failure = failure.into();
        Ok(Self {
            body: serde_json::to_value(&failure)?,
            status: if failure.user_facing {
                REJECTED
            } else {
                FAILED
            },
        })
    }
}

/// Run the CLI.
pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<ExitCode> {
    let outcome = match cli.command {
        Commands::Split { input } => {
            let text = read_input(&input).await?;
            split_command(&text, config)?
        }
        Commands::Balance {
            user,
            group,
            pairs,
            balances,
        } => {
            let source = FileSource { pairs, balances };
            balance_command(source, GroupId::new(group), UserId::new(user), config).await?
        }
    };

    println!("{}", serde_json::to_string_pretty(&outcome.body)?);
    Ok(ExitCode::from(outcome.status))
}

/// Execute the split command on a JSON request.
pub fn split_command(input: &str, config: &AppConfig) -> anyhow::Result<Outcome> {
    let request: SplitRequest =
        serde_json::from_str(input).context("Split request is not valid JSON")?;
    let service = SplitService::new(config.allocation.clone());

    match service.build_payload(&request) {
        Ok(payload) => {
            info!(
                mode = %payload.mode,
                currency = %payload.currency,
                participants = payload.allocations.len(),
                "Split payload built"
            );
            Ok(Outcome::accepted(serde_json::to_value(&payload)?))
        }
        Err(err) => {
            info!(reason = err.reason(), "Split rejected");
            Outcome::failed(err)
        }
    }
}

/// Execute the balance command against a settlement source.
pub async fn balance_command(
    source: FileSource,
    group_id: GroupId,
    user_id: UserId,
    config: &AppConfig,
) -> anyhow::Result<Outcome> {
    let service = BalanceService::new(source, config.balance.clone());

    match service.balance_view(group_id, user_id).await {
        Ok(view) => Ok(Outcome::accepted(serde_json::to_value(&view)?)),
        Err(err) => Outcome::failed(err),
    }
}

async fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read split request from stdin")?;
        return Ok(text);
    }

    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_split_args() {
        let cli = Cli::try_parse_from(["fairshare", "split", "--input", "req.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Split { ref input } if input == Path::new("req.json")
        ));

        let cli = Cli::try_parse_from(["fairshare", "split"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Split { ref input } if input == Path::new("-")
        ));
    }

    #[test]
    fn test_parse_balance_args() {
        let cli = Cli::try_parse_from([
            "fairshare", "balance", "--user", "2", "--pairs", "pairs.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Balance {
                user,
                group,
                pairs,
                balances,
            } => {
                assert_eq!(user, 2);
                assert_eq!(group, 0);
                assert_eq!(pairs, Some(PathBuf::from("pairs.json")));
                assert!(balances.is_none());
            }
            Commands::Split { .. } => panic!("expected balance command"),
        }
    }

    #[test]
    fn test_balance_requires_user() {
        assert!(Cli::try_parse_from(["fairshare", "balance"]).is_err());
    }

    #[test]
    fn test_split_command_equal() {
        let input = r#"{
            "total": "100.00",
            "currency": { "code": "usd", "symbol": "$", "decimals": 2 },
            "selection": {
                "mode": "equal",
                "participants": [
                    { "user_id": 1, "display_name": "Ana" },
                    { "user_id": 2, "display_name": "Ben" },
                    { "user_id": 3, "display_name": "Cy" }
                ]
            }
        }"#;
        let outcome = split_command(input, &AppConfig::default()).unwrap();
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.body["currency"], "USD");
        assert_eq!(outcome.body["total_minor"], 10_000);
        assert_eq!(outcome.body["allocations"][0]["amount_minor"], 3334);
        assert_eq!(outcome.body["allocations"][0]["amount"], "33.34");
        assert_eq!(outcome.body["allocations"][2]["amount_minor"], 3333);
    }

    #[test]
    fn test_split_command_custom_mismatch() {
        let input = r#"{
            "total": "100.00",
            "currency": { "code": "USD", "decimals": 2 },
            "selection": {
                "mode": "custom",
                "participants": [
                    { "user_id": 1, "custom_amount": "50.00" },
                    { "user_id": 2, "custom_amount": "48.00" }
                ]
            }
        }"#;
        let outcome = split_command(input, &AppConfig::default()).unwrap();
        assert_eq!(outcome.status, REJECTED);
        assert_eq!(outcome.body["error"], "VALIDATION_ERROR");
        assert_eq!(outcome.body["reason"], "custom_sum_mismatch");
        assert_eq!(outcome.body["delta"], "-2.00");
        assert_eq!(outcome.body["message"], "Custom amounts are short by 2.00");
    }

    #[test]
    fn test_split_command_rejects_selection() {
        let input = r#"{
            "total": "10",
            "currency": { "code": "EUR", "decimals": 2 },
            "selection": { "mode": "equal", "participants": [] }
        }"#;
        let outcome = split_command(input, &AppConfig::default()).unwrap();
        assert_eq!(outcome.status, REJECTED);
        assert_eq!(outcome.body["reason"], "no_participants");
        assert!(outcome.body.get("delta").is_none());
    }

    #[test]
    fn test_split_command_invalid_currency() {
        let input = r#"{
            "total": "10",
            "currency": { "code": "", "decimals": 2 },
            "selection": { "mode": "equal", "participants": [{ "user_id": 1 }] }
        }"#;
        assert!(split_command(input, &AppConfig::default()).is_err());
    }

    #[test]
    fn test_split_command_invalid_json() {
        assert!(split_command("{", &AppConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_balance_command_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"from": 1, "to": 2, "amount": 30, "currency": "usd"}]"#)
            .unwrap();
        let source = FileSource {
            pairs: Some(file.path().to_path_buf()),
            balances: None,
        };

        let outcome = balance_command(
            source,
            GroupId::new(7),
            UserId::new(2),
            &AppConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.body["source"], "pairs");
        assert_eq!(outcome.body["dropped_entries"], 0);
        assert_eq!(outcome.body["net"]["USD"], "30");
    }

    #[tokio::test]
    async fn test_balance_command_no_sources() {
        let outcome = balance_command(
            FileSource::default(),
            GroupId::new(7),
            UserId::new(2),
            &AppConfig::default(),
        )
        .await
        .unwrap();
        assert_eq!(outcome.status, FAILED);
        assert_eq!(outcome.body["error"], "EXTERNAL_SERVICE_ERROR");
        assert_eq!(outcome.body["reason"], "sources_unavailable");
    }
}
