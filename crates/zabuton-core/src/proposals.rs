//! governance proposal cache
//!
//! proposals come from a bundled snapshot rather than a remote server; the
//! sync lifecycle (start, stop, clear) is what the gui drives.

use serde::{Deserialize, Serialize};
use sled::Tree;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub token: String,
    pub name: String,
    pub author: String,
    pub status: String,
}

const SNAPSHOT: &[(&str, &str, &str, &str)] = &[
    ("a8f2b1c", "Decred Integration with Lightning Wallets", "lnsupport", "approved"),
    ("4b7e0d2", "Marketing Budget 2022", "marketing", "approved"),
    ("9c1d3f5", "Bug Bounty Program Renewal", "security", "active"),
    ("e2a6c47", "Treasury Expenditure Policy Review", "treasury", "rejected"),
];

pub struct ProposalStore {
    tree: Tree,
    syncing: AtomicBool,
    stop_requested: AtomicBool,
}

impl ProposalStore {
    pub(crate) fn new(tree: Tree) -> Self {
        Self {
            tree,
            syncing: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
        }
    }

    /// fetch proposals into the local cache, returns how many were stored
    pub fn sync(&self) -> Result<usize> {
        if self.syncing.swap(true, Ordering::SeqCst) {
            return Ok(0);
        }
        self.stop_requested.store(false, Ordering::SeqCst);
        info!("syncing proposals");

        let mut stored = 0;
        for (token, name, author, status) in SNAPSHOT {
            if self.stop_requested.load(Ordering::SeqCst) {
                info!("proposal sync stopped after {} proposals", stored);
                break;
            }
            let proposal = Proposal {
                token: token.to_string(),
                name: name.to_string(),
                author: author.to_string(),
                status: status.to_string(),
            };
            let bytes = match serde_json::to_vec(&proposal) {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.syncing.store(false, Ordering::SeqCst);
                    return Err(e.into());
                }
            };
            if let Err(e) = self.tree.insert(token.as_bytes(), bytes) {
                self.syncing.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
            stored += 1;
        }

        self.syncing.store(false, Ordering::SeqCst);
        Ok(stored)
    }

    pub fn is_syncing(&self) -> bool {
        self.syncing.load(Ordering::SeqCst)
    }

    pub fn stop_sync(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    pub fn clear_saved_proposals(&self) -> Result<()> {
        self.tree.clear()?;
        self.tree.flush()?;
        Ok(())
    }

    pub fn count(&self) -> usize {
        self.tree.len()
    }

    pub fn all(&self) -> Result<Vec<Proposal>> {
        let mut out = Vec::new();
        for entry in self.tree.iter() {
            let (_, value) = entry?;
            out.push(serde_json::from_slice(&value)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_sync_and_clear() {
        let dir = tempdir().unwrap();
        let db = sled::open(dir.path()).unwrap();
        let store = ProposalStore::new(db.open_tree("proposals").unwrap());

        assert_eq!(store.count(), 0);
        assert_eq!(store.sync().unwrap(), SNAPSHOT.len());
        assert!(!store.is_syncing());
        assert_eq!(store.count(), SNAPSHOT.len());
        assert_eq!(store.all().unwrap().len(), SNAPSHOT.len());

        store.clear_saved_proposals().unwrap();
        assert_eq!(store.count(), 0);
    }
}
