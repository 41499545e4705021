//! wallet transaction records and list filtering

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::params::{Amount, NetType};
use crate::staking::TicketStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxType {
    Regular,
    Mixed,
    Ticket,
    Vote,
    Revocation,
}

impl TxType {
    pub fn is_staking(&self) -> bool {
        matches!(self, TxType::Ticket | TxType::Vote | TxType::Revocation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Sent,
    Received,
    Transferred,
}

/// a wallet transaction
///
/// unmined transactions carry `block_height == -1`. for votes and
/// revocations `ticket_hash` names the ticket they spend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub hash: String,
    pub wallet_id: u32,
    pub tx_type: TxType,
    pub direction: Direction,
    pub amount: Amount,
    pub fee: Amount,
    pub block_height: i32,
    pub timestamp: i64,
    pub address: Option<String>,
    pub ticket_hash: Option<String>,
}

impl Transaction {
    /// build a record, hash is derived from the content plus a nonce
    pub fn new(
        wallet_id: u32,
        tx_type: TxType,
        direction: Direction,
        amount: Amount,
        fee: Amount,
        timestamp: i64,
        nonce: u64,
    ) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(wallet_id.to_le_bytes());
        hasher.update([tx_type as u8, direction as u8]);
        hasher.update(amount.0.to_le_bytes());
        hasher.update(timestamp.to_le_bytes());
        hasher.update(nonce.to_le_bytes());

        Self {
            hash: hex::encode(hasher.finalize()),
            wallet_id,
            tx_type,
            direction,
            amount,
            fee,
            block_height: -1,
            timestamp,
            address: None,
            ticket_hash: None,
        }
    }

    pub fn mined_at(mut self, height: i32) -> Self {
        self.block_height = height;
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn spending_ticket(mut self, ticket_hash: impl Into<String>) -> Self {
        self.ticket_hash = Some(ticket_hash.into());
        self
    }

    pub fn is_mined(&self) -> bool {
        self.block_height >= 0
    }

    pub fn confirmations(&self, best_height: u32) -> u32 {
        if !self.is_mined() {
            return 0;
        }
        (best_height as i64 - self.block_height as i64 + 1).max(0) as u32
    }

    /// effect on the wallet's total balance
    pub fn balance_delta(&self) -> i64 {
        match (self.tx_type, self.direction) {
            (TxType::Regular, Direction::Received) => self.amount.0,
            (TxType::Regular, Direction::Sent) => -(self.amount.0 + self.fee.0),
            (TxType::Vote, _) => self.amount.0,
            _ => -self.fee.0,
        }
    }

    /// status of a ticket given who spent it and the chain tip
    pub fn ticket_status(&self, spender: Option<TxType>, best_height: u32, net: NetType) -> Option<TicketStatus> {
        if self.tx_type != TxType::Ticket {
            return None;
        }
        let status = match spender {
            Some(TxType::Vote) => TicketStatus::Voted,
            Some(TxType::Revocation) => TicketStatus::Revoked,
            _ if !self.is_mined() => TicketStatus::Unmined,
            _ => {
                let age = self.confirmations(best_height);
                if age <= net.ticket_maturity() {
                    TicketStatus::Immature
                } else if age <= net.ticket_maturity() + net.ticket_expiry() {
                    TicketStatus::Live
                } else {
                    TicketStatus::Expired
                }
            }
        };
        Some(status)
    }
}

/// list filters understood by `MultiWallet::get_transactions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TxFilter {
    #[default]
    All,
    Sent,
    Received,
    Transferred,
    Mixed,
    Staking,
    Unmined,
    Immature,
    Live,
    Voted,
    Revoked,
    Expired,
}

impl TxFilter {
    /// `status` is only consulted for tickets
    pub fn matches(&self, tx: &Transaction, status: Option<TicketStatus>) -> bool {
        let regular = tx.tx_type == TxType::Regular;
        match self {
            TxFilter::All => true,
            TxFilter::Sent => regular && tx.direction == Direction::Sent,
            TxFilter::Received => regular && tx.direction == Direction::Received,
            TxFilter::Transferred => regular && tx.direction == Direction::Transferred,
            TxFilter::Mixed => tx.tx_type == TxType::Mixed,
            TxFilter::Staking => tx.tx_type.is_staking(),
            TxFilter::Unmined => status == Some(TicketStatus::Unmined),
            TxFilter::Immature => status == Some(TicketStatus::Immature),
            TxFilter::Live => status == Some(TicketStatus::Live),
            TxFilter::Voted => status == Some(TicketStatus::Voted),
            TxFilter::Revoked => status == Some(TicketStatus::Revoked),
            TxFilter::Expired => status == Some(TicketStatus::Expired),
        }
    }
}

/// order by timestamp, unmined transactions count as newest
pub fn sort_transactions(txs: &mut [Transaction], newest_first: bool) {
    txs.sort_by(|a, b| {
        let key = |t: &Transaction| (!t.is_mined(), t.timestamp, t.hash.clone());
        key(a).cmp(&key(b))
    });
    if newest_first {
        txs.reverse();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(tx_type: TxType, direction: Direction, amount: i64, ts: i64) -> Transaction {
        Transaction::new(1, tx_type, direction, Amount(amount), Amount(100), ts, ts as u64)
    }

    #[test]
    fn test_filters() {
        let sent = tx(TxType::Regular, Direction::Sent, 5, 1);
        let mixed = tx(TxType::Mixed, Direction::Transferred, 5, 2);
        let vote = tx(TxType::Vote, Direction::Received, 5, 3);

        assert!(TxFilter::All.matches(&sent, None));
        assert!(TxFilter::Sent.matches(&sent, None));
        assert!(!TxFilter::Received.matches(&sent, None));
        assert!(TxFilter::Mixed.matches(&mixed, None));
        assert!(!TxFilter::Transferred.matches(&mixed, None));
        assert!(TxFilter::Staking.matches(&vote, None));
        assert!(!TxFilter::Staking.matches(&sent, None));
    }

    #[test]
    fn test_ticket_status_lifecycle() {
        let net = NetType::Testnet3;
        let ticket = tx(TxType::Ticket, Direction::Transferred, 10, 1);
        assert_eq!(ticket.ticket_status(None, 100, net), Some(TicketStatus::Unmined));

        let ticket = ticket.mined_at(100);
        assert_eq!(ticket.ticket_status(None, 100, net), Some(TicketStatus::Immature));
        assert_eq!(ticket.ticket_status(None, 100 + 16, net), Some(TicketStatus::Live));
        assert_eq!(ticket.ticket_status(None, 100 + 16 + 6144, net), Some(TicketStatus::Expired));
        assert_eq!(ticket.ticket_status(Some(TxType::Vote), 200, net), Some(TicketStatus::Voted));
        assert_eq!(ticket.ticket_status(Some(TxType::Revocation), 200, net), Some(TicketStatus::Revoked));

        let regular = tx(TxType::Regular, Direction::Sent, 1, 1);
        assert_eq!(regular.ticket_status(None, 100, net), None);
    }

    #[test]
    fn test_sort_order() {
        let mut txs = vec![
            tx(TxType::Regular, Direction::Received, 1, 20).mined_at(5),
            tx(TxType::Regular, Direction::Received, 1, 10).mined_at(4),
            tx(TxType::Regular, Direction::Received, 1, 5),
        ];
        sort_transactions(&mut txs, true);
        assert_eq!(txs[0].block_height, -1);
        assert_eq!(txs[1].timestamp, 20);

        sort_transactions(&mut txs, false);
        assert_eq!(txs[0].timestamp, 10);
        assert!(!txs[2].is_mined());
    }

    #[test]
    fn test_balance_delta() {
        assert_eq!(tx(TxType::Regular, Direction::Received, 500, 1).balance_delta(), 500);
        assert_eq!(tx(TxType::Regular, Direction::Sent, 500, 1).balance_delta(), -600);
        assert_eq!(tx(TxType::Ticket, Direction::Transferred, 500, 1).balance_delta(), -100);
    }
}
