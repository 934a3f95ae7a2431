use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::ticket::ProductFieldTable;
use crate::error::{AppError, AppResult};

const APP_DIR_NAME: &str = "zd-ops";
const CONFIG_FILE_NAME: &str = "config.toml";

pub const DEFAULT_DOMAIN: &str = "liferay-support.zendesk.com";
pub const DEFAULT_PRODUCT: &str = "prd_liferay_dxp_7_1";
pub const DEFAULT_BRAND_ID: u64 = 360000598252;
pub const DEFAULT_TICKET_FORM_ID: u64 = 360000077272;
pub const DEFAULT_INTERNAL_EMAIL_DOMAIN: &str = "liferay.com";

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to locate the user configuration directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}

/// The configuration file as stored on disk. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cookie: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket_form_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_comment: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub internal_email_domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<ProductFieldTable>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        Self::load_from(&config_file_path()?)
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).map_err(|err| match err {
                AppError::Configuration(msg) => {
                    AppError::Configuration(format!("{}: {msg}", path.display()))
                }
                other => other,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn parse(contents: &str) -> AppResult<Self> {
        toml::from_str(contents)
            .map_err(|err| AppError::Configuration(format!("invalid config file: {err}")))
    }

    pub fn save_to(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = toml::to_string_pretty(self)
            .map_err(|err| AppError::Configuration(format!("failed to write config: {err}")))?;
        fs::write(path, data)?;
        Ok(())
    }

    fn apply_env(&mut self) {
        let overrides = [
            ("ZD_DOMAIN", &mut self.domain),
            ("ZD_COOKIE", &mut self.cookie),
            ("ZD_CSRF_TOKEN", &mut self.csrf_token),
            ("ZD_SUBMITTER_ID", &mut self.submitter_id),
            ("ZD_PRODUCT", &mut self.product),
        ];
        for (key, target) in overrides {
            if let Ok(value) = env::var(key) {
                *target = Some(value);
            }
        }
    }
}

/// Effective settings for one run: stored file, then environment overrides.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub domain: String,
    pub cookie: Option<String>,
    pub csrf_token: Option<String>,
    pub submitter_id: Option<String>,
    pub product: String,
    pub brand_id: u64,
    pub ticket_form_id: u64,
    pub public_comment: bool,
    pub internal_email_domain: String,
    pub products: ProductFieldTable,
}

impl AppConfig {
    pub fn load(config_path: Option<&Path>) -> AppResult<Self> {
        let mut stored = match config_path {
            Some(path) => StoredConfig::load_from(path)?,
            None => StoredConfig::load()?,
        };
        stored.apply_env();
        Ok(Self::from_stored(stored))
    }

    pub fn from_stored(stored: StoredConfig) -> Self {
        Self {
            domain: stored
                .domain
                .filter(|domain| !domain.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DOMAIN.to_string()),
            cookie: stored.cookie,
            csrf_token: stored.csrf_token,
            submitter_id: stored.submitter_id,
            product: stored
                .product
                .filter(|product| !product.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRODUCT.to_string()),
            brand_id: stored.brand_id.unwrap_or(DEFAULT_BRAND_ID),
            ticket_form_id: stored.ticket_form_id.unwrap_or(DEFAULT_TICKET_FORM_ID),
            public_comment: stored.public_comment.unwrap_or(false),
            internal_email_domain: stored
                .internal_email_domain
                .unwrap_or_else(|| DEFAULT_INTERNAL_EMAIL_DOMAIN.to_string()),
            products: stored.products.unwrap_or_default(),
        }
    }

    pub fn require_cookie(&self) -> AppResult<&str> {
        require_credential("cookie", self.cookie.as_deref())
    }

    pub fn require_csrf_token(&self) -> AppResult<&str> {
        require_credential("csrf_token", self.csrf_token.as_deref())
    }

    pub fn require_submitter_id(&self) -> AppResult<u64> {
        let raw = require_credential("submitter_id", self.submitter_id.as_deref())?;
        raw.trim().parse::<u64>().map_err(|_| {
            AppError::Configuration(format!("submitter_id '{raw}' is not a numeric user id"))
        })
    }
}

fn require_credential<'a>(name: &str, value: Option<&'a str>) -> AppResult<&'a str> {
    match value.map(str::trim) {
        None | Some("") => Err(AppError::Configuration(format!(
            "{name} is not configured; run `zd-ops config init` or set it in the environment"
        ))),
        Some(value) if is_placeholder(value) => Err(AppError::Configuration(format!(
            "{name} still holds the placeholder '{value}'; replace it with a real value"
        ))),
        Some(value) => Ok(value),
    }
}

fn is_placeholder(value: &str) -> bool {
    value.contains('<') || value.contains('>')
}
