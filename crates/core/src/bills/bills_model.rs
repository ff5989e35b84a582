//! Domain vocabulary for tracked utility bills.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// The kind of utility a bill belongs to.
///
/// Doubles as the grouping category when status-change notifications are
/// consolidated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillKind {
    Water,
    Gas,
    Energy,
    Internet,
}

impl BillKind {
    /// Human-readable label, used as the notification grouping category.
    pub fn label(&self) -> &'static str {
        match self {
            BillKind::Water => "Water",
            BillKind::Gas => "Gas",
            BillKind::Energy => "Energy",
            BillKind::Internet => "Internet",
        }
    }
}

impl fmt::Display for BillKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BillKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" => Ok(BillKind::Water),
            "gas" => Ok(BillKind::Gas),
            "energy" => Ok(BillKind::Energy),
            "internet" => Ok(BillKind::Internet),
            other => Err(Error::Validation(format!("Unknown bill kind: {}", other))),
        }
    }
}

/// Payment status of a bill.
///
/// Also the kind under which status-change notifications are batched: a
/// pending batch accumulates changes of one status at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Paid,
    Unpaid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Paid => "paid",
            BillStatus::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bill_kind_parse_round_trip() {
        for kind in [
            BillKind::Water,
            BillKind::Gas,
            BillKind::Energy,
            BillKind::Internet,
        ] {
            let parsed: BillKind = kind.label().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_bill_kind_parse_is_case_insensitive() {
        assert_eq!("WATER".parse::<BillKind>().unwrap(), BillKind::Water);
        assert_eq!("  gas ".parse::<BillKind>().unwrap(), BillKind::Gas);
    }

    #[test]
    fn test_unknown_bill_kind_is_rejected() {
        let result = "electricity bill".parse::<BillKind>();
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_bill_status_serialization() {
        let json = serde_json::to_string(&BillStatus::Unpaid).unwrap();
        assert_eq!(json, "\"unpaid\"");

        let status: BillStatus = serde_json::from_str("\"paid\"").unwrap();
        assert_eq!(status, BillStatus::Paid);
    }
}
