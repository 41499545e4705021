pub mod restore;
pub mod sign_message;
