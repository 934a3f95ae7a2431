use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::config::{AppConfig, StoredConfig, config_file_path};
use crate::error::AppResult;

#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Run the interactive configuration wizard.
    Init,
    /// Show the effective configuration (secrets masked).
    Show,
}

pub fn run(command: ConfigCommand, config_path: Option<&Path>) -> AppResult<()> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => config_file_path()?,
    };
    match command {
        ConfigCommand::Init => run_init(path),
        ConfigCommand::Show => run_show(path),
    }
}

fn run_init(path: PathBuf) -> AppResult<()> {
    let mut cfg = StoredConfig::load_from(&path)?;

    println!("Configuring zd-ops.");
    println!("Press Enter to keep the current value, '-' to clear it.");
    println!("The session cookie and CSRF token grant agent access; protect this file.");
    println!();

    apply_prompt(
        "Zendesk domain (e.g., company.zendesk.com)",
        &mut cfg.domain,
        false,
    )?;
    apply_prompt("Session cookie", &mut cfg.cookie, true)?;
    apply_prompt("CSRF token", &mut cfg.csrf_token, true)?;
    apply_prompt("Submitter (agent) user id", &mut cfg.submitter_id, false)?;
    apply_prompt("Default product tag", &mut cfg.product, false)?;
    apply_prompt(
        "Internal email domain excluded from requesters",
        &mut cfg.internal_email_domain,
        false,
    )?;

    cfg.save_to(&path)?;

    println!("\nConfiguration saved to {}", path.display());
    Ok(())
}

fn run_show(path: PathBuf) -> AppResult<()> {
    let stored = StoredConfig::load_from(&path)?;
    let effective = AppConfig::load(Some(path.as_path()))?;

    println!("Configuration file: {}", path.display());
    println!("Domain: {}", effective.domain);
    println!("Session cookie: {}", mask_secret(&effective.cookie));
    println!("CSRF token: {}", mask_secret(&effective.csrf_token));
    println!("Submitter id: {}", display_value(&effective.submitter_id));
    println!("Product: {}", effective.product);
    println!("Brand id: {}", effective.brand_id);
    println!("Ticket form id: {}", effective.ticket_form_id);
    println!("Public first comment: {}", effective.public_comment);
    println!("Internal email domain: {}", effective.internal_email_domain);
    let source = if stored.products.is_some() {
        "config file"
    } else {
        "built-in"
    };
    println!(
        "Products ({source}): {}",
        effective.products.products().collect::<Vec<_>>().join(", ")
    );

    Ok(())
}

fn apply_prompt(field: &str, target: &mut Option<String>, secret: bool) -> AppResult<()> {
    match prompt(field, target.as_deref(), secret)? {
        PromptAction::Keep => {}
        PromptAction::Clear => *target = None,
        PromptAction::Set(value) => *target = Some(value),
    }
    Ok(())
}

fn prompt(field: &str, current: Option<&str>, secret: bool) -> AppResult<PromptAction> {
    let mut stdout = io::stdout();

    match (current, secret) {
        (Some(_), true) => write!(stdout, "{field} [****] (Enter to keep, '-' to clear): ")?,
        (Some(value), false) => {
            write!(stdout, "{field} [{value}] (Enter to keep, '-' to clear): ")?
        }
        (None, _) => write!(stdout, "{field} (Enter to skip): ")?,
    }
    stdout.flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(PromptAction::parse(&input))
}

fn display_value(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .unwrap_or_else(|| "<not set>".to_string())
}

fn mask_secret(value: &Option<String>) -> String {
    match value {
        Some(token) if token.chars().count() > 6 => {
            let chars: Vec<char> = token.chars().collect();
            let prefix: String = chars[..3].iter().collect();
            let suffix: String = chars[chars.len() - 3..].iter().collect();
            format!("{prefix}***{suffix}")
        }
        Some(token) if !token.is_empty() => "***".to_string(),
        _ => "<not set>".to_string(),
    }
}

#[derive(Debug, PartialEq, Eq)]
enum PromptAction {
    Keep,
    Clear,
    Set(String),
}

impl PromptAction {
    fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            PromptAction::Keep
        } else if trimmed == "-" {
            PromptAction::Clear
        } else {
            PromptAction::Set(trimmed.to_string())
        }
    }
}
