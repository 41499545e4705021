//! the multi-wallet store: every operation the gui performs on wallets

use ed25519_dalek::{Signature, Signer, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::broadcast;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::config::{self, ConfigStore};
use crate::consensus::{self, Agenda};
use crate::crypto;
use crate::params::{Amount, NetType};
use crate::proposals::ProposalStore;
use crate::seed::{self, SeedPhrase};
use crate::staking::{StakingOverview, TicketBuyerConfig, TicketPrice, TicketStatus};
use crate::tx::{self, Direction, Transaction, TxFilter, TxType};
use crate::wallet::{self, Wallet, WalletRecord, ADDRESS_BATCH};
use crate::{Error, Result};

const STARTUP_PASSPHRASE_KEY: &[u8] = b"startup_passphrase";
const STARTUP_CHECK: &[u8] = b"zabuton startup check";
const NEXT_WALLET_ID_KEY: &[u8] = b"next_wallet_id";
const BEST_BLOCK_KEY: &[u8] = b"best_block";
const TICKET_PRICE_KEY: &[u8] = b"ticket_price";
const MESSAGE_PREFIX: &[u8] = b"zabuton signed message:\n";

/// signature bytes handed out by `sign_message`: pubkey || ed25519 signature
pub const SIGNATURE_LEN: usize = 32 + 64;

const DEFAULT_TICKET_PRICE: Amount = Amount(100 * crate::params::ATOMS_PER_COIN);
const TICKET_FEE: Amount = Amount(2_980);
const NOTIFICATION_CAPACITY: usize = 64;

/// chain events pushed to subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    NewTransaction { wallet_id: u32, hash: String },
    BlockConnected { height: u32 },
    TicketBuyerStopped { wallet_id: u32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockInfo {
    pub height: u32,
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    pub total: Amount,
    pub spendable: Amount,
    pub locked_by_tickets: Amount,
}

pub struct MultiWallet {
    db: Db,
    net: NetType,
    wallets: Tree,
    txs: Tree,
    votes: Tree,
    meta: Tree,
    config: ConfigStore,
    proposals: ProposalStore,
    opened: AtomicBool,
    connected: AtomicBool,
    ticket_buyers: Mutex<HashSet<u32>>,
    /// held across the name check and insert of a new wallet
    creating: Mutex<()>,
    tx_nonce: AtomicU64,
    events: broadcast::Sender<Notification>,
}

impl MultiWallet {
    pub fn open(path: impl AsRef<Path>, net: NetType) -> Result<Self> {
        let path = path.as_ref().join(net.to_string());
        info!("opening {} wallets at {}", net, path.display());
        let db = sled::open(&path)?;

        let (events, _) = broadcast::channel(NOTIFICATION_CAPACITY);
        Ok(Self {
            wallets: db.open_tree("wallets")?,
            txs: db.open_tree("transactions")?,
            votes: db.open_tree("votes")?,
            meta: db.open_tree("meta")?,
            config: ConfigStore::new(db.open_tree("config")?),
            proposals: ProposalStore::new(db.open_tree("proposals")?),
            db,
            net,
            opened: AtomicBool::new(false),
            connected: AtomicBool::new(false),
            ticket_buyers: Mutex::new(HashSet::new()),
            creating: Mutex::new(()),
            tx_nonce: AtomicU64::new(now()),
            events,
        })
    }

    pub fn net_type(&self) -> NetType {
        self.net
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    pub fn proposals(&self) -> &ProposalStore {
        &self.proposals
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.events.subscribe()
    }

    fn notify(&self, n: Notification) {
        // no receivers is fine
        let _ = self.events.send(n);
    }

    /// wallets present on disk, open or not
    pub fn loaded_wallets_count(&self) -> usize {
        self.wallets.len()
    }

    pub fn wallets_open(&self) -> bool {
        self.opened.load(Ordering::SeqCst)
    }

    // === startup security ===

    pub fn is_startup_security_set(&self) -> bool {
        self.meta.contains_key(STARTUP_PASSPHRASE_KEY).unwrap_or(false)
    }

    pub fn set_startup_passphrase(&self, passphrase: &str) -> Result<()> {
        if self.is_startup_security_set() {
            return Err(Error::StartupPassphraseAlreadySet);
        }
        self.write_startup_passphrase(passphrase)
    }

    pub fn verify_startup_passphrase(&self, passphrase: &str) -> Result<()> {
        let stored = self
            .meta
            .get(STARTUP_PASSPHRASE_KEY)?
            .ok_or(Error::StartupPassphraseNotSet)?;
        crypto::decrypt(passphrase, &stored)?;
        Ok(())
    }

    pub fn change_startup_passphrase(&self, old: &str, new: &str) -> Result<()> {
        self.verify_startup_passphrase(old)?;
        self.write_startup_passphrase(new)
    }

    pub fn remove_startup_passphrase(&self, passphrase: &str) -> Result<()> {
        self.verify_startup_passphrase(passphrase)?;
        self.meta.remove(STARTUP_PASSPHRASE_KEY)?;
        self.meta.flush()?;
        info!("startup passphrase removed");
        Ok(())
    }

    fn write_startup_passphrase(&self, passphrase: &str) -> Result<()> {
        let sealed = crypto::encrypt(passphrase, STARTUP_CHECK)?;
        self.meta.insert(STARTUP_PASSPHRASE_KEY, sealed)?;
        self.meta.flush()?;
        Ok(())
    }

    /// unlock the wallets, the passphrase is only checked when startup security is on
    pub fn open_wallets(&self, startup_passphrase: Option<&str>) -> Result<()> {
        if self.is_startup_security_set() {
            let passphrase = startup_passphrase.ok_or(Error::InvalidPassphrase)?;
            self.verify_startup_passphrase(passphrase)?;
        }
        self.opened.store(true, Ordering::SeqCst);
        info!("opened {} wallets", self.loaded_wallets_count());
        Ok(())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.wallets_open() {
            Ok(())
        } else {
            Err(Error::WalletsNotOpen)
        }
    }

    // === wallet lifecycle ===

    pub fn create_new_wallet(&self, name: &str, passphrase: &str) -> Result<Wallet> {
        let seed = seed::generate_seed()?;
        let encrypted_seed = crypto::encrypt(passphrase, seed.as_str().as_bytes())?;
        self.save_new_wallet(name, &seed, passphrase, Some(encrypted_seed))
    }

    /// restored seeds are considered backed up already
    pub fn restore_wallet(&self, name: &str, seed: &str, passphrase: &str) -> Result<Wallet> {
        let seed = SeedPhrase::parse(seed)?;
        self.save_new_wallet(name, &seed, passphrase, None)
    }

    fn save_new_wallet(
        &self,
        name: &str,
        seed: &SeedPhrase,
        passphrase: &str,
        encrypted_seed: Option<Vec<u8>>,
    ) -> Result<Wallet> {
        if self.name_taken(name)? {
            return Err(Error::DuplicateWalletName(name.to_string()));
        }

        let master = Zeroizing::new(seed.to_seed()?);
        let mut addresses = Vec::with_capacity(ADDRESS_BATCH as usize);
        for index in 0..ADDRESS_BATCH {
            let key = crypto::derive_signing_key(&master[..], index)?;
            addresses.push(wallet::address_for(&key.verifying_key(), self.net));
        }
        let encrypted_master = crypto::encrypt(passphrase, &master[..])?;

        let _guard = self.creating.lock().unwrap_or_else(|e| e.into_inner());
        // another create may have taken the name while the keys were derived
        if self.name_taken(name)? {
            return Err(Error::DuplicateWalletName(name.to_string()));
        }
        let record = WalletRecord {
            id: self.next_wallet_id()?,
            name: name.to_string(),
            created_at: now() as i64,
            encrypted_seed,
            encrypted_master,
            addresses,
            ticket_buyer: None,
        };
        self.put_record(&record)?;
        self.opened.store(true, Ordering::SeqCst);

        info!("created wallet {} ({})", record.id, record.name);
        Ok(record.to_wallet())
    }

    fn name_taken(&self, name: &str) -> Result<bool> {
        Ok(self.records()?.iter().any(|r| r.name == name))
    }

    /// ids start at 1 and are never reused
    fn next_wallet_id(&self) -> Result<u32> {
        let stored = |bytes: Option<&[u8]>| bytes.and_then(|b| bincode::deserialize::<u32>(b).ok()).unwrap_or(1);
        let previous = self
            .meta
            .fetch_and_update(NEXT_WALLET_ID_KEY, |old| Some((stored(old) + 1).to_le_bytes().to_vec()))?;
        Ok(stored(previous.as_deref()))
    }

    fn put_record(&self, record: &WalletRecord) -> Result<()> {
        self.wallets.insert(record.id.to_be_bytes(), bincode::serialize(record)?)?;
        self.wallets.flush()?;
        Ok(())
    }

    fn record(&self, id: u32) -> Result<WalletRecord> {
        let bytes = self.wallets.get(id.to_be_bytes())?.ok_or(Error::WalletNotFound(id))?;
        Ok(bincode::deserialize(&bytes)?)
    }

    fn records(&self) -> Result<Vec<WalletRecord>> {
        let mut out = Vec::new();
        for entry in self.wallets.iter() {
            let (_, value) = entry?;
            out.push(bincode::deserialize(&value)?);
        }
        Ok(out)
    }

    /// open wallets ordered by id, empty until `open_wallets` succeeds
    pub fn sorted_wallet_list(&self) -> Vec<Wallet> {
        if !self.wallets_open() {
            return Vec::new();
        }
        match self.records() {
            // big-endian keys iterate in id order
            Ok(records) => records.iter().map(WalletRecord::to_wallet).collect(),
            Err(e) => {
                warn!("failed to list wallets: {}", e);
                Vec::new()
            }
        }
    }

    pub fn wallet(&self, id: u32) -> Result<Wallet> {
        self.ensure_open()?;
        Ok(self.record(id)?.to_wallet())
    }

    fn unlock_master(&self, record: &WalletRecord, passphrase: &str) -> Result<Zeroizing<Vec<u8>>> {
        crypto::decrypt(passphrase, &record.encrypted_master)
    }

    // === seed backup ===

    /// the not-yet-verified seed, for display during backup
    pub fn wallet_seed(&self, id: u32, passphrase: &str) -> Result<SeedPhrase> {
        self.ensure_open()?;
        let record = self.record(id)?;
        let sealed = record.encrypted_seed.ok_or(Error::SeedAlreadyBackedUp(id))?;
        let plain = crypto::decrypt(passphrase, &sealed)?;
        let phrase = std::str::from_utf8(&plain).map_err(|e| Error::InvalidSeed(e.to_string()))?;
        SeedPhrase::parse(phrase)
    }

    /// on success the stored seed is deleted and the wallet counts as backed up
    pub fn verify_seed_for_wallet(&self, id: u32, phrase: &str, passphrase: &str) -> Result<()> {
        self.ensure_open()?;
        let mut record = self.record(id)?;
        let sealed = record.encrypted_seed.as_ref().ok_or(Error::SeedAlreadyBackedUp(id))?;
        let plain = crypto::decrypt(passphrase, sealed)?;

        let expected = std::str::from_utf8(&plain).map_err(|e| Error::InvalidSeed(e.to_string()))?;
        let given = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
        if given != expected {
            return Err(Error::Invalid);
        }

        record.encrypted_seed = None;
        self.put_record(&record)?;
        info!("seed for wallet {} verified", id);
        Ok(())
    }

    // === addresses and messages ===

    pub fn is_address_valid(&self, address: &str) -> bool {
        wallet::is_valid_address(address, self.net)
    }

    pub fn have_address(&self, id: u32, address: &str) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.record(id)?.address_index(address).is_some())
    }

    pub fn sign_message(&self, id: u32, passphrase: &str, address: &str, message: &str) -> Result<Vec<u8>> {
        self.ensure_open()?;
        if message.is_empty() {
            return Err(Error::EmptyMessage);
        }
        if !self.is_address_valid(address) {
            return Err(Error::InvalidAddress);
        }
        let record = self.record(id)?;
        let index = record.address_index(address).ok_or(Error::AddressNotOwned)?;

        let master = self.unlock_master(&record, passphrase)?;
        let key = crypto::derive_signing_key(&master, index)?;
        let signature = key.sign(&signed_payload(message));

        let mut out = Vec::with_capacity(SIGNATURE_LEN);
        out.extend_from_slice(key.verifying_key().as_bytes());
        out.extend_from_slice(&signature.to_bytes());
        Ok(out)
    }

    pub fn verify_message(&self, address: &str, message: &str, signature: &[u8]) -> Result<bool> {
        if !self.is_address_valid(address) {
            return Err(Error::InvalidAddress);
        }
        if signature.len() != SIGNATURE_LEN {
            return Err(Error::InvalidSignature);
        }
        let mut pk = [0u8; 32];
        pk.copy_from_slice(&signature[..32]);
        let key = VerifyingKey::from_bytes(&pk).map_err(|_| Error::InvalidSignature)?;
        if wallet::address_for(&key, self.net) != address {
            return Ok(false);
        }
        let sig = Signature::from_slice(&signature[32..]).map_err(|_| Error::InvalidSignature)?;
        Ok(key.verify(&signed_payload(message), &sig).is_ok())
    }

    // === chain state ===

    pub fn best_block(&self) -> BlockInfo {
        match self.meta.get(BEST_BLOCK_KEY) {
            Ok(Some(bytes)) => bincode::deserialize(&bytes).unwrap_or_default(),
            _ => BlockInfo::default(),
        }
    }

    pub fn set_best_block(&self, height: u32, timestamp: i64) -> Result<()> {
        let block = BlockInfo { height, timestamp };
        self.meta.insert(BEST_BLOCK_KEY, bincode::serialize(&block)?)?;
        self.notify(Notification::BlockConnected { height });
        Ok(())
    }

    pub fn is_connected_to_network(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    // === transactions ===

    /// store a transaction and tell subscribers about it
    pub fn record_transaction(&self, tx: Transaction) -> Result<()> {
        self.record(tx.wallet_id)?;
        let key = tx_key(tx.wallet_id, &tx.hash);
        self.txs.insert(key, bincode::serialize(&tx)?)?;
        self.notify(Notification::NewTransaction {
            wallet_id: tx.wallet_id,
            hash: tx.hash,
        });
        Ok(())
    }

    fn wallet_transactions(&self, id: u32) -> Result<Vec<Transaction>> {
        let mut out = Vec::new();
        for entry in self.txs.scan_prefix(id.to_be_bytes()) {
            let (_, value) = entry?;
            out.push(bincode::deserialize(&value)?);
        }
        Ok(out)
    }

    /// map of ticket hash to the type of the transaction that spent it
    fn spenders(txs: &[Transaction]) -> HashMap<String, TxType> {
        txs.iter()
            .filter_map(|t| t.ticket_hash.clone().map(|h| (h, t.tx_type)))
            .collect()
    }

    fn status_of(&self, tx: &Transaction, spenders: &HashMap<String, TxType>, best: u32) -> Option<TicketStatus> {
        tx.ticket_status(spenders.get(&tx.hash).copied(), best, self.net)
    }

    pub fn get_transaction(&self, id: u32, hash: &str) -> Result<Option<Transaction>> {
        self.ensure_open()?;
        match self.txs.get(tx_key(id, hash))? {
            Some(bytes) => Ok(Some(bincode::deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// ticket status of a stored ticket, None for other transaction types
    pub fn ticket_status(&self, tx: &Transaction) -> Result<Option<TicketStatus>> {
        let txs = self.wallet_transactions(tx.wallet_id)?;
        Ok(self.status_of(tx, &Self::spenders(&txs), self.best_block().height))
    }

    /// a page of transactions, `limit == 0` means no limit
    pub fn get_transactions(
        &self,
        id: u32,
        offset: usize,
        limit: usize,
        filter: TxFilter,
        newest_first: bool,
    ) -> Result<Vec<Transaction>> {
        self.ensure_open()?;
        self.record(id)?;
        let mut txs = self.filtered(id, filter)?;
        tx::sort_transactions(&mut txs, newest_first);

        let page = txs.into_iter().skip(offset);
        Ok(if limit == 0 { page.collect() } else { page.take(limit).collect() })
    }

    pub fn count_transactions(&self, id: u32, filter: TxFilter) -> Result<usize> {
        self.ensure_open()?;
        self.record(id)?;
        Ok(self.filtered(id, filter)?.len())
    }

    fn filtered(&self, id: u32, filter: TxFilter) -> Result<Vec<Transaction>> {
        let all = self.wallet_transactions(id)?;
        let spenders = Self::spenders(&all);
        let best = self.best_block().height;
        Ok(all
            .iter()
            .filter(|t| filter.matches(t, self.status_of(t, &spenders, best)))
            .cloned()
            .collect())
    }

    pub fn balance(&self, id: u32) -> Result<Balance> {
        self.ensure_open()?;
        self.record(id)?;
        let txs = self.wallet_transactions(id)?;
        let spenders = Self::spenders(&txs);
        let best = self.best_block().height;
        let spend_unconfirmed = self.config.read_bool(config::SPEND_UNCONFIRMED, false);

        let mut total = 0i64;
        let mut locked = 0i64;
        let mut unconfirmed = 0i64;
        for tx in &txs {
            total += tx.balance_delta();
            if let Some(status) = self.status_of(tx, &spenders, best) {
                if status.is_locked() {
                    locked += tx.amount.0;
                }
            }
            if !tx.is_mined() && tx.direction == Direction::Received {
                unconfirmed += tx.amount.0;
            }
        }

        let mut spendable = total - locked;
        if !spend_unconfirmed {
            spendable -= unconfirmed;
        }
        Ok(Balance {
            total: Amount(total),
            spendable: Amount(spendable.max(0)),
            locked_by_tickets: Amount(locked),
        })
    }

    // === staking ===

    pub fn ticket_price(&self) -> Result<TicketPrice> {
        let best = self.best_block().height;
        let activation = self.net.dcp0001_activation_height();
        if best < activation {
            return Err(Error::TicketPriceUnavailable {
                best_height: best,
                activation_height: activation,
            });
        }
        let price = match self.meta.get(TICKET_PRICE_KEY)? {
            Some(bytes) => bincode::deserialize(&bytes)?,
            None => DEFAULT_TICKET_PRICE,
        };
        Ok(TicketPrice { price, height: best })
    }

    pub fn set_ticket_price(&self, price: Amount) -> Result<()> {
        self.meta.insert(TICKET_PRICE_KEY, bincode::serialize(&price)?)?;
        Ok(())
    }

    fn all_tickets(&self) -> Result<Vec<(Transaction, TicketStatus)>> {
        self.ensure_open()?;
        let best = self.best_block().height;
        let mut out = Vec::new();
        for record in self.records()? {
            let txs = self.wallet_transactions(record.id)?;
            let spenders = Self::spenders(&txs);
            for tx in &txs {
                if let Some(status) = self.status_of(tx, &spenders, best) {
                    out.push((tx.clone(), status));
                }
            }
        }
        Ok(out)
    }

    pub fn total_staking_rewards(&self) -> Result<Amount> {
        self.ensure_open()?;
        let mut total = 0;
        for record in self.records()? {
            total += self
                .wallet_transactions(record.id)?
                .iter()
                .filter(|t| t.tx_type == TxType::Vote)
                .map(|t| t.amount.0)
                .sum::<i64>();
        }
        Ok(Amount(total))
    }

    pub fn staking_overview(&self) -> Result<StakingOverview> {
        let mut overview = StakingOverview::default();
        for (_, status) in self.all_tickets()? {
            overview.record(status);
        }
        Ok(overview)
    }

    /// unmined, immature and live tickets across wallets, newest first
    pub fn live_tickets(&self) -> Result<Vec<Transaction>> {
        let mut tickets: Vec<Transaction> = self
            .all_tickets()?
            .into_iter()
            .filter(|(_, s)| matches!(s, TicketStatus::Unmined | TicketStatus::Immature | TicketStatus::Live))
            .map(|(t, _)| t)
            .collect();
        tx::sort_transactions(&mut tickets, true);
        Ok(tickets)
    }

    /// tickets across wallets matching a ticket filter, newest first
    pub fn tickets(&self, filter: TxFilter) -> Result<Vec<(Transaction, TicketStatus)>> {
        let mut tickets: Vec<_> = self
            .all_tickets()?
            .into_iter()
            .filter(|(t, s)| filter.matches(t, Some(*s)))
            .collect();
        tickets.sort_by(|(a, _), (b, _)| (!b.is_mined(), b.timestamp).cmp(&(!a.is_mined(), a.timestamp)));
        Ok(tickets)
    }

    pub fn purchase_tickets(&self, id: u32, count: u32, passphrase: &str) -> Result<Vec<String>> {
        self.ensure_open()?;
        if count == 0 {
            return Err(Error::InvalidTicketCount);
        }
        if !self.is_connected_to_network() {
            return Err(Error::NotConnected);
        }
        let record = self.record(id)?;
        self.unlock_master(&record, passphrase)?;

        let price = self.ticket_price()?.price;
        let need = price
            .0
            .checked_add(TICKET_FEE.0)
            .and_then(|each| each.checked_mul(i64::from(count)))
            .ok_or(Error::InvalidTicketCount)?;
        let have = self.balance(id)?.spendable.0;
        if have < need {
            return Err(Error::InsufficientBalance { have, need });
        }

        let mut hashes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let ticket = Transaction::new(
                id,
                TxType::Ticket,
                Direction::Transferred,
                price,
                TICKET_FEE,
                now() as i64,
                self.tx_nonce.fetch_add(1, Ordering::SeqCst),
            );
            hashes.push(ticket.hash.clone());
            self.record_transaction(ticket)?;
        }
        info!("purchased {} tickets for wallet {}", count, id);
        Ok(hashes)
    }

    // === ticket buyer ===

    fn buyers(&self) -> MutexGuard<'_, HashSet<u32>> {
        self.ticket_buyers.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_ticket_buyer_config(&self, id: u32, config: TicketBuyerConfig) -> Result<()> {
        self.ensure_open()?;
        if self.is_auto_tickets_purchase_active(id) {
            return Err(Error::TicketBuyerRunning(id));
        }
        let mut record = self.record(id)?;
        record.ticket_buyer = Some(config);
        self.put_record(&record)
    }

    pub fn ticket_buyer_config(&self, id: u32) -> Result<Option<TicketBuyerConfig>> {
        self.ensure_open()?;
        Ok(self.record(id)?.ticket_buyer)
    }

    pub fn ticket_buyer_config_is_set(&self, id: u32) -> bool {
        matches!(self.ticket_buyer_config(id), Ok(Some(_)))
    }

    pub fn start_ticket_buyer(&self, id: u32, passphrase: &str) -> Result<()> {
        self.ensure_open()?;
        let record = self.record(id)?;
        if record.ticket_buyer.is_none() {
            return Err(Error::TicketBuyerNotConfigured(id));
        }
        if !self.is_connected_to_network() {
            return Err(Error::NotConnected);
        }
        self.unlock_master(&record, passphrase)?;
        self.buyers().insert(id);
        info!("ticket buyer started for wallet {}", id);
        Ok(())
    }

    pub fn stop_auto_tickets_purchase(&self, id: u32) {
        if self.buyers().remove(&id) {
            info!("ticket buyer stopped for wallet {}", id);
            self.notify(Notification::TicketBuyerStopped { wallet_id: id });
        }
    }

    pub fn is_auto_tickets_purchase_active(&self, id: u32) -> bool {
        self.buyers().contains(&id)
    }

    // === consensus ===

    pub fn all_vote_agendas(&self, id: u32, newest_first: bool) -> Result<Vec<Agenda>> {
        self.ensure_open()?;
        self.record(id)?;
        let mut agendas = consensus::builtin_agendas();
        for agenda in agendas.iter_mut() {
            if let Some(choice) = self.votes.get(vote_key(id, &agenda.agenda_id))? {
                agenda.voting_preference = String::from_utf8_lossy(&choice).into_owned();
            }
        }
        agendas.sort_by(|a, b| (a.start_time, &a.agenda_id).cmp(&(b.start_time, &b.agenda_id)));
        if newest_first {
            agendas.reverse();
        }
        Ok(agendas)
    }

    pub fn set_vote_choice(&self, id: u32, agenda_id: &str, choice: &str, passphrase: &str) -> Result<()> {
        self.ensure_open()?;
        let agenda = consensus::builtin_agendas()
            .into_iter()
            .find(|a| a.agenda_id == agenda_id)
            .ok_or_else(|| Error::UnknownAgenda(agenda_id.to_string()))?;
        if !agenda.has_choice(choice) {
            return Err(Error::InvalidVoteChoice {
                agenda: agenda_id.to_string(),
                choice: choice.to_string(),
            });
        }
        let record = self.record(id)?;
        self.unlock_master(&record, passphrase)?;

        self.votes.insert(vote_key(id, agenda_id), choice.as_bytes())?;
        self.votes.flush()?;
        info!("wallet {} votes {} on {}", id, choice, agenda_id);
        Ok(())
    }

    /// flush all trees, called on shutdown
    pub fn shutdown(&self) {
        for id in self.buyers().drain() {
            info!("ticket buyer stopped for wallet {}", id);
        }
        if let Err(e) = self.db.flush() {
            warn!("flush on shutdown failed: {}", e);
        }
    }

    pub(crate) fn next_nonce(&self) -> u64 {
        self.tx_nonce.fetch_add(1, Ordering::SeqCst)
    }
}

fn tx_key(wallet_id: u32, hash: &str) -> Vec<u8> {
    let mut key = wallet_id.to_be_bytes().to_vec();
    key.extend_from_slice(hash.as_bytes());
    key
}

fn vote_key(wallet_id: u32, agenda_id: &str) -> Vec<u8> {
    let mut key = wallet_id.to_be_bytes().to_vec();
    key.extend_from_slice(agenda_id.as_bytes());
    key
}

fn signed_payload(message: &str) -> Vec<u8> {
    let mut payload = MESSAGE_PREFIX.to_vec();
    payload.extend_from_slice(message.as_bytes());
    payload
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
