pub mod config;
pub mod organizations;
pub mod tickets;
