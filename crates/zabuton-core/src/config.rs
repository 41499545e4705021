//! user preferences persisted next to the wallets

use sled::Tree;
use tracing::debug;

use crate::Result;

pub const DARK_MODE: &str = "dark_mode";
pub const SPEND_UNCONFIRMED: &str = "spend_unconfirmed";
pub const BEEP_NEW_BLOCKS: &str = "beep_new_blocks";
pub const FETCH_PROPOSALS: &str = "fetch_proposals";
pub const PROPOSAL_NOTIFICATION: &str = "proposal_notification";
pub const TRANSACTION_NOTIFICATION: &str = "transaction_notification";
pub const LANGUAGE: &str = "app_language";
pub const CURRENCY_CONVERSION: &str = "currency_conversion_option";
pub const SPV_PERSISTENT_PEER: &str = "spv_peer_addresses";
pub const USER_AGENT: &str = "user_agent";

/// key-value preference store
///
/// values are stored as utf-8 strings, bools as "true"/"false". reads of a
/// missing key fall back to the caller's default (or "" for strings).
#[derive(Clone)]
pub struct ConfigStore {
    tree: Tree,
}

impl ConfigStore {
    pub(crate) fn new(tree: Tree) -> Self {
        Self { tree }
    }

    pub fn save_bool(&self, key: &str, value: bool) -> Result<()> {
        self.save_string(key, if value { "true" } else { "false" })
    }

    pub fn read_bool(&self, key: &str, default: bool) -> bool {
        match self.get(key).as_deref() {
            Some("true") => true,
            Some("false") => false,
            _ => default,
        }
    }

    pub fn save_string(&self, key: &str, value: &str) -> Result<()> {
        debug!("config {} updated", key);
        self.tree.insert(key.as_bytes(), value.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    pub fn read_string(&self, key: &str) -> String {
        self.get(key).unwrap_or_default()
    }

    /// true if the key was ever written and not deleted
    pub fn is_set(&self, key: &str) -> bool {
        self.tree.contains_key(key.as_bytes()).unwrap_or(false)
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        self.tree.remove(key.as_bytes())?;
        self.tree.flush()?;
        Ok(())
    }

    fn get(&self, key: &str) -> Option<String> {
        match self.tree.get(key.as_bytes()) {
            Ok(Some(bytes)) => String::from_utf8(bytes.to_vec()).ok(),
            _ => None,
        }
    }
}
