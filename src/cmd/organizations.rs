use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use tracing::info;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::error::AppResult;
use crate::infra::spreadsheet::AccountWriter;
use crate::infra::zendesk::ZendeskClient;
use crate::workflow::export::{ExportSummary, export_organizations};

const DEFAULT_OUTPUT: &str = "zendesk_organizations_list.csv";

#[derive(Args, Debug, Clone)]
pub struct OrganizationsArgs {
    #[command(subcommand)]
    pub command: OrganizationsCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum OrganizationsCommand {
    /// Export every organization to a CSV of account code, id and name.
    Export {
        /// File to create or overwrite.
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

pub async fn run(config: AppConfig, command: OrganizationsCommand) -> AppResult<()> {
    match command {
        OrganizationsCommand::Export { output } => run_export(config, output).await,
    }
}

async fn run_export(config: AppConfig, output: PathBuf) -> AppResult<()> {
    let cookie = config.require_cookie()?;
    let helpdesk = Arc::new(ZendeskClient::new(&config.domain, cookie, None));

    info!(domain = %config.domain, "starting organization export");
    let mut writer = AccountWriter::create(&output)?;
    let ctx = AppContext::new(config, helpdesk);
    let summary = export_organizations(&ctx, &mut writer).await?;
    writer.into_inner()?;

    print_summary(&summary, &output);
    Ok(())
}

fn print_summary(summary: &ExportSummary, output: &std::path::Path) {
    println!();
    println!("--- Export complete ---");
    if let Some(reason) = &summary.halted {
        println!("Stopped early after {} page(s): {reason}", summary.pages_fetched);
    }
    println!(
        "Processed {} organizations across {} page(s).",
        summary.organizations_written, summary.pages_fetched
    );
    println!("Data saved to '{}'", output.display());
}
