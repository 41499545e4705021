//! sample chain state and history for running the gui without a network

use tracing::info;

use crate::params::Amount;
use crate::tx::{Direction, Transaction, TxType};
use crate::{MultiWallet, Result};

/// passphrase protecting the demo wallets
pub const DEMO_PASSPHRASE: &str = "zabuton-demo";

const BLOCK_TIME: i64 = 300;

/// create two wallets with history of every kind; no-op when wallets exist
pub fn populate(mw: &MultiWallet) -> Result<bool> {
    if mw.loaded_wallets_count() > 0 {
        return Ok(false);
    }

    let net = mw.net_type();
    let best = net.dcp0001_activation_height() + 2 * net.ticket_expiry();
    let tip_time = 1_650_000_000i64;
    let time_at = |height: u32| tip_time - (best - height) as i64 * BLOCK_TIME;

    mw.set_best_block(best, tip_time)?;
    mw.set_ticket_price(Amount::from_coins(152.4))?;
    mw.set_connected(true);

    let main = mw.create_new_wallet("mywallet", DEMO_PASSPHRASE)?;
    let savings = mw.create_new_wallet("savings", DEMO_PASSPHRASE)?;

    let main_addr = main.receive_address().unwrap_or_default().to_string();
    let savings_addr = savings.receive_address().unwrap_or_default().to_string();

    let mut count = 0;
    let mut push = |wallet_id: u32, tx_type: TxType, dir: Direction, coins: f64, height: Option<u32>, spends: Option<&str>| -> Result<String> {
        let ts = height.map(time_at).unwrap_or(tip_time + 30);
        let mut tx = Transaction::new(wallet_id, tx_type, dir, Amount::from_coins(coins), Amount(2_530), ts, mw.next_nonce());
        if let Some(h) = height {
            tx = tx.mined_at(h as i32);
        }
        if let Some(ticket) = spends {
            tx = tx.spending_ticket(ticket);
        }
        if tx_type == TxType::Regular && dir == Direction::Received {
            let addr = if wallet_id == main.id { &main_addr } else { &savings_addr };
            tx = tx.with_address(addr.clone());
        }
        let hash = tx.hash.clone();
        mw.record_transaction(tx)?;
        count += 1;
        Ok(hash)
    };

    // regular flow
    push(main.id, TxType::Regular, Direction::Received, 1_250.0, Some(best - 9_000), None)?;
    push(main.id, TxType::Regular, Direction::Sent, 12.5, Some(best - 4_000), None)?;
    push(main.id, TxType::Regular, Direction::Transferred, 100.0, Some(best - 3_000), None)?;
    push(main.id, TxType::Mixed, Direction::Transferred, 50.0, Some(best - 2_000), None)?;
    push(main.id, TxType::Regular, Direction::Received, 3.75, None, None)?;
    push(savings.id, TxType::Regular, Direction::Received, 420.0, Some(best - 7_000), None)?;

    // tickets in each state
    let voted = push(main.id, TxType::Ticket, Direction::Transferred, 140.0, Some(best - 8_000), None)?;
    let revoked = push(main.id, TxType::Ticket, Direction::Transferred, 141.0, Some(best - 7_500), None)?;
    push(main.id, TxType::Ticket, Direction::Transferred, 138.0, Some(best - 50_000), None)?;
    push(main.id, TxType::Ticket, Direction::Transferred, 150.0, Some(best - 1_000), None)?;
    push(main.id, TxType::Ticket, Direction::Transferred, 152.4, Some(best - 2), None)?;
    push(savings.id, TxType::Ticket, Direction::Transferred, 152.4, None, None)?;

    push(main.id, TxType::Vote, Direction::Received, 0.98, Some(best - 6_000), Some(&voted))?;
    push(main.id, TxType::Revocation, Direction::Transferred, 0.0, Some(best - 500), Some(&revoked))?;

    info!("demo data ready: {} transactions, passphrase {:?}", count, DEMO_PASSPHRASE);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::NetType;
    use crate::staking::TicketStatus;
    use crate::tx::TxFilter;
    use tempfile::tempdir;

    #[test]
    fn test_populate_covers_every_status() {
        let dir = tempdir().unwrap();
        let mw = MultiWallet::open(dir.path(), NetType::Mainnet).unwrap();
        assert!(populate(&mw).unwrap());
        assert!(!populate(&mw).unwrap());

        let overview = mw.staking_overview().unwrap();
        assert_eq!(overview.voted, 1);
        assert_eq!(overview.revoked, 1);
        assert_eq!(overview.live, 1);
        assert_eq!(overview.immature, 1);
        assert_eq!(overview.unmined, 1);
        assert_eq!(overview.expired, 1);

        let tickets = mw.tickets(TxFilter::Live).unwrap();
        assert!(tickets.iter().all(|(_, s)| *s == TicketStatus::Live));
        assert!(mw.ticket_price().is_ok());
        assert_eq!(mw.count_transactions(1, TxFilter::Mixed).unwrap(), 1);
        assert!(mw.balance(1).unwrap().spendable.0 > 0);
    }
}
