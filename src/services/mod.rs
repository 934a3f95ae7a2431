pub mod helpdesk;

#[cfg(test)]
pub mod fake;

pub use helpdesk::HelpdeskService;
