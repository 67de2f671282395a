//! Split domain types.
//!
//! A [`SplitSelection`] is what the editing surface hands over at submit time.
//! The pipeline only ever borrows it and returns fresh allocations.

use fairshare_shared::types::{Currency, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a transaction amount is split among participants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Everyone pays the same share.
    #[default]
    Equal,
    /// Proportional to integer share counts.
    Shares,
    /// Each participant's amount is entered directly.
    Custom,
}

impl SplitMode {
    /// Wire tag of the mode.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Shares => "shares",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Display for SplitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A group member taking part in a split.
///
/// `shares` is only read in [`SplitMode::Shares`] and `custom_amount` only in
/// [`SplitMode::Custom`]. Both are kept so switching modes does not lose input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    /// Member id, unique within a selection.
    pub user_id: UserId,
    /// Name shown in the roster.
    #[serde(default)]
    pub display_name: String,
    /// Opaque avatar reference owned by the roster service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_ref: Option<String>,
    /// Share count for weighted splits.
    #[serde(default = "default_shares")]
    pub shares: u32,
    /// Directly entered amount in major units.
    #[serde(default)]
    pub custom_amount: Decimal,
}

fn default_shares() -> u32 {
    1
}

impl Participant {
    /// Creates a participant with one share and no custom amount.
    #[must_use]
    pub fn new(user_id: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            display_name: display_name.into(),
            avatar_ref: None,
            shares: 1,
            custom_amount: Decimal::ZERO,
        }
    }

    /// Sets the share count.
    #[must_use]
    pub fn with_shares(mut self, shares: u32) -> Self {
        self.shares = shares;
        self
    }

    /// Sets the custom amount in major units.
    #[must_use]
    pub fn with_custom_amount(mut self, amount: Decimal) -> Self {
        self.custom_amount = amount;
        self
    }

    /// Sets the avatar reference.
    #[must_use]
    pub fn with_avatar(mut self, avatar_ref: impl Into<String>) -> Self {
        self.avatar_ref = Some(avatar_ref.into());
        self
    }
}

/// Mode plus participants, as collected by the editing surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitSelection {
    /// Split mode.
    pub mode: SplitMode,
    /// Participants in roster order.
    #[serde(default)]
    pub participants: Vec<Participant>,
}

impl SplitSelection {
    /// Creates a selection.
    #[must_use]
    pub fn new(mode: SplitMode, participants: Vec<Participant>) -> Self {
        Self { mode, participants }
    }

    /// Returns true if nobody is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

/// Transaction context plus selection: everything needed to allocate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRequest {
    /// Transaction total in major units.
    pub total: Decimal,
    /// Transaction currency.
    pub currency: Currency,
    /// Who pays what share.
    pub selection: SplitSelection,
}

/// One participant's share of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerPersonAllocation {
    /// Participant.
    pub user_id: UserId,
    /// Share in minor units.
    pub amount_minor: i64,
}

/// A single line of the outgoing transaction payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    /// Participant.
    pub user_id: UserId,
    /// Share in minor units.
    pub amount_minor: i64,
    /// Share in major units, for display.
    pub amount: Decimal,
    /// Original share count, present in shares mode only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shares: Option<u32>,
}

/// Split section of a transaction create/update request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitPayload {
    /// Split mode tag.
    pub mode: SplitMode,
    /// Currency code.
    pub currency: String,
    /// Total in minor units.
    pub total_minor: i64,
    /// Total in major units.
    pub total: Decimal,
    /// Per-participant lines in selection order.
    pub allocations: Vec<AllocationLine>,
}

impl SplitPayload {
    /// Sum of all allocation lines in minor units.
    #[must_use]
    pub fn allocated_minor(&self) -> i128 {
        self.allocations
            .iter()
            .map(|line| i128::from(line.amount_minor))
            .sum()
    }
}
