pub mod organization;
pub mod ticket;
pub mod user;
