use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::spreadsheet::open_ticket_rows;
use crate::infra::zendesk::ZendeskClient;
use crate::workflow::tickets::{BatchReport, RowOutcome, TicketBatchSettings, create_tickets};

const DEFAULT_INPUT: &str = "csv_create_tickets.csv";

#[derive(Args, Debug, Clone)]
pub struct TicketsArgs {
    #[command(subcommand)]
    pub command: TicketsCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TicketsCommand {
    /// Create one ticket per row of an account/subject/description CSV.
    Create {
        /// CSV with account_code, organization_id, subject, description columns.
        #[arg(short, long, default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// Product tag selecting the custom fields; overrides the configured product.
        #[arg(short, long)]
        product: Option<String>,
        /// Make the first comment visible to the requester.
        #[arg(long)]
        public: bool,
    },
    /// List the product tags that have custom fields configured.
    Products,
}

pub async fn run(config: AppConfig, command: TicketsCommand) -> AppResult<()> {
    match command {
        TicketsCommand::Create {
            input,
            product,
            public,
        } => run_create(config, input, product, public).await,
        TicketsCommand::Products => {
            for product in config.products.products() {
                let marker = if product == config.product { " (selected)" } else { "" };
                println!("{product}{marker}");
            }
            Ok(())
        }
    }
}

async fn run_create(
    config: AppConfig,
    input: PathBuf,
    product: Option<String>,
    public: bool,
) -> AppResult<()> {
    let cookie = config.require_cookie()?;
    let csrf_token = config.require_csrf_token()?;
    let settings = TicketBatchSettings {
        product: product.unwrap_or_else(|| config.product.clone()),
        submitter_id: config.require_submitter_id()?,
        public_comment: public || config.public_comment,
    };

    let rows = open_ticket_rows(&input)?;
    let helpdesk = Arc::new(ZendeskClient::new(&config.domain, cookie, Some(csrf_token)));
    let ctx = AppContext::new(config, helpdesk);

    let report = create_tickets(&ctx, &settings, rows).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &BatchReport) {
    println!();
    println!("--- Ticket creation complete ---");
    for row in &report.rows {
        match &row.outcome {
            RowOutcome::Created { url, .. } => {
                println!("Row {} (org {}): created {url}", row.row, row.organization_id)
            }
            RowOutcome::Skipped { reason } => {
                println!("Row {} (org {}): skipped, {reason}", row.row, row.organization_id)
            }
            RowOutcome::Rejected { status, body } => {
                println!(
                    "Row {} (org {}): rejected with status {status}",
                    row.row, row.organization_id
                );
                println!("{body}");
            }
        }
    }
    println!(
        "Created {}, skipped {}, rejected {}.",
        report.created(),
        report.skipped(),
        report.rejected()
    );
}
