//! Transaction types and the per-commodity contract constants

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction kinds found in the activity and positions sections
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TxType {
    #[serde(rename = "PUT")]
    Put,
    #[serde(rename = "CALL")]
    Call,
    #[serde(rename = "FUTURES")]
    Futures,
    #[serde(rename = "FEES")]
    Fees,
    #[serde(rename = "TRANSFER")]
    Transfer,
    #[serde(rename = "CANCEL")]
    Cancel,
}

impl TxType {
    pub fn label(&self) -> &'static str {
        match self {
            TxType::Put => "PUT",
            TxType::Call => "CALL",
            TxType::Futures => "FUTURES",
            TxType::Fees => "FEES",
            TxType::Transfer => "TRANSFER",
            TxType::Cancel => "CANCEL",
        }
    }

    /// Options carry a strike price in their description
    pub fn is_option(&self) -> bool {
        matches!(self, TxType::Put | TxType::Call)
    }
}

impl fmt::Display for TxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Underlying commodity of a contract, or cash for ACH transfers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Commodity {
    #[serde(rename = "CORN")]
    Corn,
    #[serde(rename = "SOYBEANS")]
    Soybeans,
    #[serde(rename = "LIVE CATTLE")]
    LiveCattle,
    #[serde(rename = "CASH")]
    Cash,
}

impl Commodity {
    pub fn label(&self) -> &'static str {
        match self {
            Commodity::Corn => "CORN",
            Commodity::Soybeans => "SOYBEANS",
            Commodity::LiveCattle => "LIVE CATTLE",
            Commodity::Cash => "CASH",
        }
    }

    /// Units in one contract: bushels for grains, hundredweight for cattle.
    /// Fees are counted per contract, so they always get 1.
    pub fn units_per_contract(&self, tx_type: TxType) -> u32 {
        if tx_type == TxType::Fees {
            return 1;
        }
        match self {
            Commodity::Cash => 1,
            Commodity::LiveCattle => 400,
            Commodity::Corn | Commodity::Soybeans => 5000,
        }
    }

    /// Divisor turning the statement's integer strike into a price per unit.
    /// Grain strikes are printed in cents, cattle strikes in tenths.
    pub fn strike_divisor(&self) -> Option<f64> {
        match self {
            Commodity::Corn | Commodity::Soybeans => Some(100.0),
            Commodity::LiveCattle => Some(10.0),
            Commodity::Cash => None,
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
