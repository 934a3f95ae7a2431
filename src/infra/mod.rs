pub mod spreadsheet;
pub mod zendesk;
