use serde::Deserialize;
use serde_json::{Map, Value};

const ACCOUNT_CODE_FIELD: &str = "account_code";
const MISSING_ACCOUNT_CODE: &str = "N/A";

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: Option<u64>,
    pub name: Option<String>,
    #[serde(default)]
    pub organization_fields: Option<Map<String, Value>>,
}

impl Organization {
    pub fn account_code(&self) -> String {
        match self
            .organization_fields
            .as_ref()
            .and_then(|fields| fields.get(ACCOUNT_CODE_FIELD))
        {
            None | Some(Value::Null) => MISSING_ACCOUNT_CODE.to_string(),
            Some(Value::String(code)) => code.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Rows are only produced for organizations carrying both an id and a name.
    pub fn to_account_row(&self) -> Option<AccountRow> {
        let id = self.id.filter(|id| *id != 0)?;
        let name = self.name.as_deref().filter(|name| !name.is_empty())?;
        Some(AccountRow {
            account_code: self.account_code(),
            id,
            name: name.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrganizationPage {
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
    #[serde(default)]
    pub links: Option<PageLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub has_more: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageLinks {
    pub next: Option<String>,
}

impl OrganizationPage {
    pub fn next_page(&self) -> Option<&str> {
        let has_more = self.meta.as_ref().is_some_and(|meta| meta.has_more);
        if !has_more {
            return None;
        }
        self.links.as_ref().and_then(|links| links.next.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRow {
    pub account_code: String,
    pub id: u64,
    pub name: String,
}
