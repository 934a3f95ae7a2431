use std::io;

use tracing::{error, info};

use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::spreadsheet::AccountWriter;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub organizations_written: usize,
    pub pages_fetched: usize,
    /// Set when a page request failed and pagination stopped early.
    pub halted: Option<String>,
}

/// Walks every organization page and writes one row per usable organization.
///
/// A failed page request stops pagination but keeps the rows already written;
/// write failures are returned as errors.
pub async fn export_organizations<W: io::Write>(
    ctx: &AppContext,
    writer: &mut AccountWriter<W>,
) -> AppResult<ExportSummary> {
    let mut summary = ExportSummary::default();
    let mut next_page: Option<String> = None;

    loop {
        let page_number = summary.pages_fetched + 1;
        info!(page = page_number, "fetching organizations page");

        let page = match ctx.helpdesk.organizations_page(next_page.as_deref()).await {
            Ok(page) => page,
            Err(err) => {
                error!(page = page_number, %err, "organization request failed; halting export");
                summary.halted = Some(err.to_string());
                break;
            }
        };
        summary.pages_fetched = page_number;

        if page.organizations.is_empty() {
            info!(page = page_number, "no organizations found on this page");
            break;
        }

        for row in page.organizations.iter().filter_map(|org| org.to_account_row()) {
            writer.write(&row)?;
            summary.organizations_written += 1;
        }
        writer.flush()?;

        match page.next_page() {
            Some(url) => next_page = Some(url.to_string()),
            None => break,
        }
    }

    writer.flush()?;
    Ok(summary)
}
