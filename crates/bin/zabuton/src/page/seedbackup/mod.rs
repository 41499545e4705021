//! two step seed backup: reveal the words, then prove they were written down

pub mod save_seed;
pub mod success;
pub mod verify_seed;

use crate::values::STR_CANCEL;
use crate::widgets::InfoModal;

/// shown when backing out of either step
pub(crate) fn exit_prompt() -> InfoModal {
    InfoModal::new("Exit?", "Are you sure you want to exit the seed backup process?")
        .negative(STR_CANCEL)
        .positive("Exit")
}
