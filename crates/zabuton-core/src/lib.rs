//! # zabuton-core
//!
//! wallet engine behind the zabuton desktop wallet.
//!
//! ## layout
//!
//! ```text
//!   bip39 mnemonic ──► 64-byte seed ──hkdf──► ed25519 key per address index
//!         │                 │
//!         │ argon2id +      │ argon2id +
//!         │ chacha20poly1305│ chacha20poly1305
//!         ▼                 ▼
//!   backup seed        master secret        (sled tree "wallets")
//!   (dropped once
//!    verified)
//! ```
//!
//! everything else (transactions, tickets, agenda votes, preferences, the
//! proposal cache) lives in sibling sled trees of the same database, one
//! database per network.
//!
//! ## usage
//!
//! ```rust,ignore
//! use zabuton_core::{MultiWallet, NetType, TxFilter};
//!
//! let mw = MultiWallet::open(data_dir, NetType::Mainnet)?;
//! let wallet = mw.create_new_wallet("mywallet", "passphrase")?;
//! let seed = mw.wallet_seed(wallet.id, "passphrase")?;
//! mw.verify_seed_for_wallet(wallet.id, seed.as_str(), "passphrase")?;
//! let recent = mw.get_transactions(wallet.id, 0, 20, TxFilter::All, true)?;
//! ```

pub mod config;
pub mod consensus;
pub mod crypto;
pub mod demo;
pub mod error;
pub mod multiwallet;
pub mod params;
pub mod proposals;
pub mod seed;
pub mod staking;
pub mod tx;
pub mod wallet;

pub use config::ConfigStore;
pub use consensus::{Agenda, AgendaChoice, AgendaStatus};
pub use error::{Error, Result};
pub use multiwallet::{Balance, BlockInfo, MultiWallet, Notification, SIGNATURE_LEN};
pub use params::{Amount, NetType};
pub use proposals::Proposal;
pub use seed::{wordlist, CandidateSet, SeedPhrase, SeedQuiz};
pub use staking::{StakingOverview, TicketBuyerConfig, TicketPrice, TicketStatus};
pub use tx::{Direction, Transaction, TxFilter, TxType};
pub use wallet::Wallet;
