//! ticket bookkeeping and the automatic ticket buyer settings

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::params::Amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Unmined,
    Immature,
    Live,
    Voted,
    Revoked,
    Expired,
}

impl TicketStatus {
    /// tickets whose value is still locked in staking
    pub fn is_locked(&self) -> bool {
        matches!(
            self,
            TicketStatus::Unmined | TicketStatus::Immature | TicketStatus::Live | TicketStatus::Expired
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TicketStatus::Unmined => "Unmined",
            TicketStatus::Immature => "Immature",
            TicketStatus::Live => "Live",
            TicketStatus::Voted => "Voted",
            TicketStatus::Revoked => "Revoked",
            TicketStatus::Expired => "Expired",
        };
        f.write_str(s)
    }
}

/// ticket counts across all open wallets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StakingOverview {
    pub all: u32,
    pub unmined: u32,
    pub immature: u32,
    pub live: u32,
    pub voted: u32,
    pub revoked: u32,
    pub expired: u32,
}

impl StakingOverview {
    pub fn record(&mut self, status: TicketStatus) {
        self.all += 1;
        match status {
            TicketStatus::Unmined => self.unmined += 1,
            TicketStatus::Immature => self.immature += 1,
            TicketStatus::Live => self.live += 1,
            TicketStatus::Voted => self.voted += 1,
            TicketStatus::Revoked => self.revoked += 1,
            TicketStatus::Expired => self.expired += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketPrice {
    pub price: Amount,
    pub height: u32,
}

/// settings for automatic ticket purchase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketBuyerConfig {
    pub vsp_host: String,
    pub purchase_account: u32,
    pub balance_to_maintain: Amount,
}

impl Default for TicketBuyerConfig {
    fn default() -> Self {
        Self {
            vsp_host: String::new(),
            purchase_account: 0,
            balance_to_maintain: Amount(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_counts() {
        let mut overview = StakingOverview::default();
        for status in [TicketStatus::Live, TicketStatus::Live, TicketStatus::Voted, TicketStatus::Unmined] {
            overview.record(status);
        }
        assert_eq!(overview.all, 4);
        assert_eq!(overview.live, 2);
        assert_eq!(overview.voted, 1);
        assert_eq!(overview.unmined, 1);
        assert_eq!(overview.expired, 0);
    }

    #[test]
    fn test_locked_statuses() {
        assert!(TicketStatus::Live.is_locked());
        assert!(!TicketStatus::Voted.is_locked());
        assert!(!TicketStatus::Revoked.is_locked());
    }
}
