//! Spending buckets and budgeting methodologies

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse classification of a transaction for percentage budgeting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpendingBucket {
    Needs,
    Wants,
    Savings,
}

impl SpendingBucket {
    /// All buckets in display order
    pub fn all() -> &'static [Self] {
        &[Self::Needs, Self::Wants, Self::Savings]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Needs => "needs",
            Self::Wants => "wants",
            Self::Savings => "savings",
        }
    }
}

impl fmt::Display for SpendingBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SpendingBucket {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "needs" | "need" => Ok(Self::Needs),
            "wants" | "want" => Ok(Self::Wants),
            "savings" | "saving" => Ok(Self::Savings),
            other => Err(format!("Unknown bucket: {}", other)),
        }
    }
}

/// How a period's budget is planned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Methodology {
    /// Every unit of income is given a job
    #[default]
    ZeroBased,
    /// Fixed envelopes per category
    Envelope,
    /// Spending tracked against needs/wants/savings percentages
    Percentage,
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBased => write!(f, "zero-based"),
            Self::Envelope => write!(f, "envelope"),
            Self::Percentage => write!(f, "percentage"),
        }
    }
}

impl FromStr for Methodology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "zerobased" => Ok(Self::ZeroBased),
            "envelope" => Ok(Self::Envelope),
            "percentage" => Ok(Self::Percentage),
            other => Err(format!("Unknown methodology: {}", other)),
        }
    }
}
