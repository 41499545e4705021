//! error types for the wallet engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// seed phrase (or other user supplied value) does not match what the wallet holds
    #[error("invalid")]
    Invalid,

    #[error("invalid passphrase")]
    InvalidPassphrase,

    #[error("wallet {0} not found")]
    WalletNotFound(u32),

    #[error("wallets are not open")]
    WalletsNotOpen,

    #[error("wallet name already in use: {0}")]
    DuplicateWalletName(String),

    #[error("seed for wallet {0} has already been backed up")]
    SeedAlreadyBackedUp(u32),

    #[error("invalid seed phrase: {0}")]
    InvalidSeed(String),

    #[error("word {position} ({word:?}) is not in the wordlist")]
    WordNotInWordlist { position: usize, word: String },

    #[error("wordlist has {have} distinct words, need at least {need}")]
    WordlistTooSmall { have: usize, need: usize },

    // === startup security ===
    #[error("startup passphrase is not set")]
    StartupPassphraseNotSet,

    #[error("startup passphrase is already set")]
    StartupPassphraseAlreadySet,

    // === addresses & signing ===
    #[error("invalid address")]
    InvalidAddress,

    #[error("address not owned by wallet")]
    AddressNotOwned,

    #[error("message is empty")]
    EmptyMessage,

    #[error("invalid signature")]
    InvalidSignature,

    // === staking ===
    #[error("ticket price unavailable below height {activation_height} (best block {best_height})")]
    TicketPriceUnavailable { best_height: u32, activation_height: u32 },

    #[error("not connected to the network")]
    NotConnected,

    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: i64, need: i64 },

    #[error("ticket buyer is not configured for wallet {0}")]
    TicketBuyerNotConfigured(u32),

    #[error("ticket buyer is running for wallet {0}")]
    TicketBuyerRunning(u32),

    #[error("invalid ticket count")]
    InvalidTicketCount,

    // === consensus ===
    #[error("unknown agenda: {0}")]
    UnknownAgenda(String),

    #[error("invalid vote choice {choice:?} for agenda {agenda}")]
    InvalidVoteChoice { agenda: String, choice: String },

    // === plumbing ===
    #[error("key derivation failed")]
    KeyDerivationFailed,

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<sled::Error> for Error {
    fn from(e: sled::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl Error {
    /// true for failures the user fixes by retyping a passphrase
    pub fn is_invalid_passphrase(&self) -> bool {
        matches!(self, Error::InvalidPassphrase)
    }
}
