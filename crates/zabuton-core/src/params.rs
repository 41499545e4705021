//! per-network chain parameters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetType {
    #[default]
    Mainnet,
    Testnet3,
}

impl NetType {
    /// blocks before a purchased ticket can be selected to vote
    pub fn ticket_maturity(&self) -> u32 {
        match self {
            NetType::Mainnet => 256,
            NetType::Testnet3 => 16,
        }
    }

    /// blocks a mature ticket stays live before it expires
    pub fn ticket_expiry(&self) -> u32 {
        match self {
            NetType::Mainnet => 40_960,
            NetType::Testnet3 => 6_144,
        }
    }

    /// height at which the ticket price algorithm of DCP0001 took effect
    pub fn dcp0001_activation_height(&self) -> u32 {
        match self {
            NetType::Mainnet => 149_248,
            NetType::Testnet3 => 323_328,
        }
    }

    /// two character address prefix
    pub fn address_prefix(&self) -> &'static str {
        match self {
            NetType::Mainnet => "Ds",
            NetType::Testnet3 => "Ts",
        }
    }

    pub fn voting_dashboard_url(&self) -> &'static str {
        match self {
            NetType::Mainnet => "https://voting.decred.org",
            NetType::Testnet3 => "https://voting.decred.org/testnet",
        }
    }

    /// human label shown on the start screen
    pub fn display_name(&self) -> &'static str {
        match self {
            NetType::Mainnet => "Mainnet",
            NetType::Testnet3 => "Testnet",
        }
    }
}

impl fmt::Display for NetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetType::Mainnet => write!(f, "mainnet"),
            NetType::Testnet3 => write!(f, "testnet3"),
        }
    }
}

impl FromStr for NetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(NetType::Mainnet),
            "testnet" | "testnet3" => Ok(NetType::Testnet3),
            other => Err(format!("unknown network: {}", other)),
        }
    }
}

/// atoms per coin
pub const ATOMS_PER_COIN: i64 = 100_000_000;

/// amount in atoms with coin formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Amount(pub i64);

impl Amount {
    pub fn from_coins(coins: f64) -> Self {
        Amount((coins * ATOMS_PER_COIN as f64).round() as i64)
    }

    pub fn to_coins(self) -> f64 {
        self.0 as f64 / ATOMS_PER_COIN as f64
    }
}

impl fmt::Display for Amount {
    /// trailing zeros trimmed, always suffixed with the unit
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let whole = abs / ATOMS_PER_COIN as u64;
        let frac = abs % ATOMS_PER_COIN as u64;
        if frac == 0 {
            return write!(f, "{}{} DCR", sign, whole);
        }
        let frac = format!("{:08}", frac);
        write!(f, "{}{}.{} DCR", sign, whole, frac.trim_end_matches('0'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount(0).to_string(), "0 DCR");
        assert_eq!(Amount(150_000_000).to_string(), "1.5 DCR");
        assert_eq!(Amount(-1).to_string(), "-0.00000001 DCR");
        assert_eq!(Amount::from_coins(12.25).0, 1_225_000_000);
    }

    #[test]
    fn test_net_from_str() {
        assert_eq!("testnet".parse::<NetType>().unwrap(), NetType::Testnet3);
        assert_eq!("MAINNET".parse::<NetType>().unwrap(), NetType::Mainnet);
        assert!("simnet".parse::<NetType>().is_err());
    }
}
