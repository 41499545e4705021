pub mod details;
pub mod transactions;
