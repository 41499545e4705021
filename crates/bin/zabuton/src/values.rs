//! user facing strings, preference choices and layout constants

pub const APP_NAME: &str = "zabuton";

pub const DEFAULT_WALLET_NAME: &str = "mywallet";
pub const MIN_PASSWORD_LEN: usize = 6;

/// dropdowns in the same group close each other
pub const TX_DROPDOWN_GROUP: u32 = 1;
pub const CONSENSUS_DROPDOWN_GROUP: u32 = 2;
pub const TICKET_DROPDOWN_GROUP: u32 = 3;

pub const TOAST_SECONDS: f32 = 3.0;
pub const MAX_CONTENT_WIDTH: f32 = 640.0;

pub const STR_CANCEL: &str = "Cancel";
pub const STR_CONFIRM: &str = "Confirm";
pub const STR_GOT_IT: &str = "Got it";
pub const STR_REMOVE: &str = "Remove";
pub const STR_SAVE: &str = "Save";
pub const STR_NOT_CONNECTED: &str = "Not connected to Decred network";
pub const STR_INVALID_PASSWORD: &str = "Invalid password";
pub const STR_NO_TRANSACTIONS: &str = "No transactions yet";
pub const STR_NO_TICKETS: &str = "No tickets yet";

pub const STR_SETTINGS: &str = "Settings";
pub const STR_GENERAL: &str = "General";
pub const STR_SECURITY: &str = "Security";
pub const STR_NOTIFICATIONS: &str = "Notifications";
pub const STR_CONNECTION: &str = "Connection";
pub const STR_DARK_MODE: &str = "Dark mode";
pub const STR_UNCONFIRMED_FUNDS: &str = "Spend unconfirmed funds";
pub const STR_GOVERNANCE: &str = "Governance";
pub const STR_CURRENCY_CONVERSION: &str = "Currency conversion";
pub const STR_LANGUAGE: &str = "Language";
pub const STR_STARTUP_PASSWORD: &str = "Startup password";
pub const STR_CHANGE_STARTUP_PASSWORD: &str = "Change startup password";
pub const STR_CREATE_STARTUP_PASSWORD: &str = "Create a startup password";
pub const STR_CONFIRM_REMOVE_STARTUP_PASS: &str = "Confirm to turn off startup password";
pub const STR_BEEP_FOR_NEW_BLOCKS: &str = "Beep for new blocks";
pub const STR_TX_NOTIFICATION: &str = "Transaction notification";
pub const STR_PROPOSAL_NOTIFICATION: &str = "Proposal notification";
pub const STR_CONNECT_TO_SPECIFIC_PEER: &str = "Connect to specific peer";
pub const STR_CHANGE_SPECIFIC_PEER: &str = "Change specific peer";
pub const STR_CUSTOM_USER_AGENT: &str = "Custom user agent";
pub const STR_CHANGE_USER_AGENT: &str = "Change user agent";

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_EXCHANGE_VALUE: &str = "none";

/// (stored key, label)
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("zh", "Chinese"),
    ("fr", "French"),
    ("es", "Spanish"),
];

pub const EXCHANGE_CURRENCIES: &[(&str, &str)] = &[
    ("none", "None"),
    ("usd_bittrex", "USD (Bittrex)"),
];

/// label for a stored preference key, falls back to the key itself
pub fn preference_label<'a>(options: &'a [(&'a str, &'a str)], key: &'a str) -> &'a str {
    options
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_label() {
        assert_eq!(preference_label(LANGUAGES, "fr"), "French");
        assert_eq!(preference_label(EXCHANGE_CURRENCIES, "none"), "None");
        assert_eq!(preference_label(LANGUAGES, "xx"), "xx");
    }
}
