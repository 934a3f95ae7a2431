use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Ticket field holding the product tag.
const PRODUCT_FIELD_ID: u64 = 360006076471;
const LXC_SERVICES_FIELD_ID: u64 = 360021499771;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomField {
    pub id: u64,
    pub value: String,
}

impl CustomField {
    pub fn new(id: u64, value: &str) -> Self {
        Self {
            id,
            value: value.to_string(),
        }
    }
}

/// Custom fields to set on a ticket, keyed by product tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductFieldTable(BTreeMap<String, Vec<CustomField>>);

impl Default for ProductFieldTable {
    fn default() -> Self {
        let mut table = BTreeMap::new();
        table.insert(
            "prd_lxc_sm".to_string(),
            vec![
                CustomField::new(PRODUCT_FIELD_ID, "prd_lxc_sm"),
                CustomField::new(LXC_SERVICES_FIELD_ID, "lxc_sm_services"),
            ],
        );
        for tag in [
            "prd_liferay_dxp_7_4",
            "prd_liferay_dxp_7_3",
            "prd_liferay_dxp_7_2",
            "prd_liferay_dxp_7_1",
        ] {
            table.insert(tag.to_string(), vec![CustomField::new(PRODUCT_FIELD_ID, tag)]);
        }
        Self(table)
    }
}

impl ProductFieldTable {
    pub fn fields_for(&self, product: &str) -> AppResult<&[CustomField]> {
        self.0
            .get(product)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                AppError::Configuration(format!(
                    "product '{product}' has no custom fields configured; known products: {}",
                    self.products().collect::<Vec<_>>().join(", ")
                ))
            })
    }

    pub fn products(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// One line of the ticket input spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketRequestRow {
    pub account_code: String,
    pub organization_id: u64,
    pub subject: String,
    pub description: String,
}

/// Identifiers shared by every ticket in a batch.
#[derive(Debug, Clone)]
pub struct TicketTemplate {
    pub brand_id: u64,
    pub ticket_form_id: u64,
    pub submitter_id: u64,
    pub public_comment: bool,
    pub custom_fields: Vec<CustomField>,
}

impl TicketTemplate {
    pub fn build(&self, row: &TicketRequestRow, requester_id: u64) -> NewTicket {
        NewTicket {
            ticket: NewTicketFields {
                brand_id: self.brand_id,
                status: "new",
                submitter_id: self.submitter_id,
                requester_id,
                organization_id: row.organization_id,
                subject: row.subject.clone(),
                comment: TicketComment {
                    html_body: row.description.clone(),
                    public: self.public_comment,
                },
                ticket_form_id: self.ticket_form_id,
                custom_fields: self.custom_fields.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTicket {
    pub ticket: NewTicketFields,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTicketFields {
    pub brand_id: u64,
    pub status: &'static str,
    pub submitter_id: u64,
    pub requester_id: u64,
    pub organization_id: u64,
    pub subject: String,
    pub comment: TicketComment,
    pub ticket_form_id: u64,
    pub custom_fields: Vec<CustomField>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TicketComment {
    pub html_body: String,
    pub public: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketSubmission {
    Created { id: u64 },
    Rejected { status: u16, body: String },
}

pub fn agent_ticket_url(domain: &str, ticket_id: u64) -> String {
    format!(
        "https://{}/agent/tickets/{ticket_id}",
        domain.trim_end_matches('/')
    )
}
