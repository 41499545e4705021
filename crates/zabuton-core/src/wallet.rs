//! persisted wallet records and address encoding

use ed25519_dalek::VerifyingKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::params::NetType;
use crate::staking::TicketBuyerConfig;

/// receive addresses derived when a wallet is created
pub const ADDRESS_BATCH: u32 = 5;

const ADDRESS_HASH_LEN: usize = 20;

/// what gets written to the `wallets` tree
#[derive(Clone, Serialize, Deserialize)]
pub(crate) struct WalletRecord {
    pub id: u32,
    pub name: String,
    pub created_at: i64,
    /// encrypted mnemonic kept until the user verifies their backup
    pub encrypted_seed: Option<Vec<u8>>,
    /// encrypted 64-byte bip39 seed used for key derivation
    pub encrypted_master: Vec<u8>,
    pub addresses: Vec<String>,
    pub ticket_buyer: Option<TicketBuyerConfig>,
}

impl WalletRecord {
    pub fn to_wallet(&self) -> Wallet {
        Wallet {
            id: self.id,
            name: self.name.clone(),
            created_at: self.created_at,
            addresses: self.addresses.clone(),
            seed_backed_up: self.encrypted_seed.is_none(),
        }
    }

    pub fn address_index(&self, address: &str) -> Option<u32> {
        self.addresses.iter().position(|a| a == address).map(|i| i as u32)
    }
}

/// public view of a wallet, carries no secrets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub id: u32,
    pub name: String,
    pub created_at: i64,
    pub addresses: Vec<String>,
    pub seed_backed_up: bool,
}

impl Wallet {
    pub fn receive_address(&self) -> Option<&str> {
        self.addresses.first().map(String::as_str)
    }
}

/// `<prefix><hex(sha256(pubkey)[..20])>`
pub fn address_for(key: &VerifyingKey, net: NetType) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{}{}", net.address_prefix(), hex::encode(&digest[..ADDRESS_HASH_LEN]))
}

pub fn is_valid_address(address: &str, net: NetType) -> bool {
    let Some(body) = address.strip_prefix(net.address_prefix()) else {
        return false;
    };
    body.len() == ADDRESS_HASH_LEN * 2
        && body.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::SigningKey;

    #[test]
    fn test_address_roundtrip() {
        let key = SigningKey::from_bytes(&[3u8; 32]).verifying_key();
        let addr = address_for(&key, NetType::Mainnet);

        assert!(addr.starts_with("Ds"));
        assert_eq!(addr.len(), 42);
        assert!(is_valid_address(&addr, NetType::Mainnet));
        assert!(!is_valid_address(&addr, NetType::Testnet3));
    }

    #[test]
    fn test_invalid_addresses() {
        assert!(!is_valid_address("", NetType::Mainnet));
        assert!(!is_valid_address("Ds", NetType::Mainnet));
        assert!(!is_valid_address("Dsxyz", NetType::Mainnet));
        let upper = format!("Ds{}", "AB".repeat(20));
        assert!(!is_valid_address(&upper, NetType::Mainnet));
    }
}
