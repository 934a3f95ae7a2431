use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("helpdesk error: {0}")]
    Helpdesk(String),
    #[error("helpdesk responded with {status}: {body}")]
    HelpdeskStatus { status: u16, body: String },
    #[error("spreadsheet error: {0}")]
    Spreadsheet(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::Spreadsheet(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
