pub mod modals;
pub mod overview;
pub mod ticket_list;
