pub mod export;
pub mod tickets;
