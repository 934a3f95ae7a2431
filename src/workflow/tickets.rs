use tracing::{error, info, warn};

use crate::context::AppContext;
use crate::domain::ticket::{TicketRequestRow, TicketSubmission, TicketTemplate, agent_ticket_url};
use crate::domain::user::RequesterFilter;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone)]
pub struct TicketBatchSettings {
    pub product: String,
    pub submitter_id: u64,
    pub public_comment: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Created { ticket_id: u64, url: String },
    Skipped { reason: String },
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowReport {
    pub row: usize,
    pub organization_id: u64,
    pub outcome: RowOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    pub rows: Vec<RowReport>,
}

impl BatchReport {
    pub fn created(&self) -> usize {
        self.count(|outcome| matches!(outcome, RowOutcome::Created { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, RowOutcome::Skipped { .. }))
    }

    pub fn rejected(&self) -> usize {
        self.count(|outcome| matches!(outcome, RowOutcome::Rejected { .. }))
    }

    fn count(&self, predicate: impl Fn(&RowOutcome) -> bool) -> usize {
        self.rows.iter().filter(|row| predicate(&row.outcome)).count()
    }
}

/// Opens one ticket per row on behalf of the first eligible end-user of the
/// row's organization.
///
/// Rows without a usable requester and tickets refused by the helpdesk are
/// reported and skipped. Transport failures and malformed rows abort the
/// batch; rows before them have already been submitted.
pub async fn create_tickets<I>(
    ctx: &AppContext,
    settings: &TicketBatchSettings,
    rows: I,
) -> AppResult<BatchReport>
where
    I: IntoIterator<Item = AppResult<TicketRequestRow>>,
{
    let custom_fields = ctx.config.products.fields_for(&settings.product)?;
    let template = TicketTemplate {
        brand_id: ctx.config.brand_id,
        ticket_form_id: ctx.config.ticket_form_id,
        submitter_id: settings.submitter_id,
        public_comment: settings.public_comment,
        custom_fields: custom_fields.to_vec(),
    };
    let filter = RequesterFilter::new(&ctx.config.internal_email_domain);

    let mut report = BatchReport::default();
    for (index, row) in rows.into_iter().enumerate() {
        let row = row?;
        let row_number = index + 1;
        info!(
            row = row_number,
            organization_id = row.organization_id,
            account_code = %row.account_code,
            "processing row"
        );
        let outcome = process_row(ctx, &template, &filter, &row, &settings.product).await?;
        report.rows.push(RowReport {
            row: row_number,
            organization_id: row.organization_id,
            outcome,
        });
    }

    Ok(report)
}

async fn process_row(
    ctx: &AppContext,
    template: &TicketTemplate,
    filter: &RequesterFilter,
    row: &TicketRequestRow,
    product: &str,
) -> AppResult<RowOutcome> {
    let users = match ctx.helpdesk.organization_users(row.organization_id).await {
        Ok(users) => users,
        Err(AppError::HelpdeskStatus { status, body }) => {
            warn!(
                organization_id = row.organization_id,
                status,
                %body,
                "could not list organization users; skipping row"
            );
            return Ok(RowOutcome::Skipped {
                reason: format!("user listing failed with status {status}"),
            });
        }
        Err(err) => return Err(err),
    };

    let Some(requester) = filter.select(&users) else {
        warn!(
            organization_id = row.organization_id,
            "no valid end-user found; skipping ticket creation"
        );
        return Ok(RowOutcome::Skipped {
            reason: "no valid end-user requester".to_string(),
        });
    };
    info!(
        requester_id = requester.id,
        email = requester.email.as_deref().unwrap_or_default(),
        product,
        "creating ticket"
    );

    let ticket = template.build(row, requester.id);
    match ctx.helpdesk.create_ticket(&ticket).await? {
        TicketSubmission::Created { id } => {
            let url = agent_ticket_url(&ctx.config.domain, id);
            info!(ticket_id = id, %url, "ticket created");
            Ok(RowOutcome::Created { ticket_id: id, url })
        }
        TicketSubmission::Rejected { status, body } => {
            error!(
                organization_id = row.organization_id,
                status,
                %body,
                "ticket creation rejected"
            );
            Ok(RowOutcome::Rejected { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::{AppConfig, StoredConfig};
    use crate::domain::user::User;
    use crate::services::fake::FakeHelpdesk;

    fn context(helpdesk: Arc<FakeHelpdesk>) -> AppContext {
        let config = AppConfig::from_stored(StoredConfig {
            domain: Some("acme.zendesk.com".to_string()),
            ..StoredConfig::default()
        });
        AppContext::new(config, helpdesk)
    }

    fn settings(product: &str) -> TicketBatchSettings {
        TicketBatchSettings {
            product: product.to_string(),
            submitter_id: 500,
            public_comment: false,
        }
    }

    fn row(organization_id: u64) -> TicketRequestRow {
        TicketRequestRow {
            account_code: format!("ACC{organization_id}"),
            organization_id,
            subject: "Quarterly check".to_string(),
            description: "<p>Body</p>".to_string(),
        }
    }

    fn ok_rows<const N: usize>(rows: [TicketRequestRow; N]) -> Vec<AppResult<TicketRequestRow>> {
        rows.into_iter().map(Ok).collect()
    }

    fn user(id: u64, email: &str, role: &str) -> User {
        User {
            id,
            email: Some(email.to_string()),
            role: Some(role.to_string()),
        }
    }

    #[tokio::test]
    async fn picks_customer_over_noreply_and_reports_link() {
        let helpdesk = Arc::new(
            FakeHelpdesk::new()
                .with_users(
                    10,
                    vec![
                        user(1, "noreply@x.com", "end-user"),
                        user(2, "jane@customer.com", "end-user"),
                    ],
                )
                .with_submission(TicketSubmission::Created { id: 4321 }),
        );
        let ctx = context(helpdesk.clone());

        let report = create_tickets(&ctx, &settings("prd_liferay_dxp_7_4"), ok_rows([row(10)]))
            .await
            .unwrap();

        assert_eq!(
            report.rows[0].outcome,
            RowOutcome::Created {
                ticket_id: 4321,
                url: "https://acme.zendesk.com/agent/tickets/4321".to_string(),
            }
        );
        let created = helpdesk.created.lock().unwrap();
        let ticket = &created[0].ticket;
        assert_eq!(ticket.requester_id, 2);
        assert_eq!(ticket.submitter_id, 500);
        assert_eq!(ticket.organization_id, 10);
        assert!(!ticket.comment.public);
        assert_eq!(ticket.custom_fields[0].value, "prd_liferay_dxp_7_4");
    }

    #[tokio::test]
    async fn row_without_end_user_is_skipped_and_batch_continues() {
        let helpdesk = Arc::new(
            FakeHelpdesk::new()
                .with_users(10, vec![user(1, "agent@customer.com", "agent")])
                .with_users(11, vec![user(2, "bob@customer.com", "end-user")]),
        );
        let ctx = context(helpdesk.clone());

        let report = create_tickets(&ctx, &settings("prd_lxc_sm"), ok_rows([row(10), row(11)]))
            .await
            .unwrap();

        assert!(matches!(report.rows[0].outcome, RowOutcome::Skipped { .. }));
        assert!(matches!(report.rows[1].outcome, RowOutcome::Created { .. }));
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.created(), 1);
        assert_eq!(
            helpdesk.calls(),
            vec![
                "GET organizations/10/users".to_string(),
                "GET organizations/11/users".to_string(),
                "POST tickets org=11 requester=2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn refused_user_listing_skips_row() {
        let helpdesk = Arc::new(
            FakeHelpdesk::new()
                .with_refused_users(10, 403)
                .with_users(11, vec![user(2, "bob@customer.com", "end-user")]),
        );
        let ctx = context(helpdesk);

        let report = create_tickets(&ctx, &settings("prd_lxc_sm"), ok_rows([row(10), row(11)]))
            .await
            .unwrap();

        assert!(matches!(
            &report.rows[0].outcome,
            RowOutcome::Skipped { reason } if reason.contains("403")
        ));
        assert_eq!(report.created(), 1);
    }

    #[tokio::test]
    async fn unknown_product_sends_no_request() {
        let helpdesk = Arc::new(
            FakeHelpdesk::new().with_users(10, vec![user(2, "jane@customer.com", "end-user")]),
        );
        let ctx = context(helpdesk.clone());

        let err = create_tickets(&ctx, &settings("prd_unknown"), ok_rows([row(10)]))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Configuration(msg) if msg.contains("prd_unknown")));
        assert!(helpdesk.calls().is_empty());
    }

    #[tokio::test]
    async fn rejected_ticket_surfaces_body_without_link() {
        let helpdesk = Arc::new(
            FakeHelpdesk::new()
                .with_users(10, vec![user(2, "jane@customer.com", "end-user")])
                .with_submission(TicketSubmission::Rejected {
                    status: 422,
                    body: r#"{"error":"RecordInvalid"}"#.to_string(),
                }),
        );
        let ctx = context(helpdesk);

        let report = create_tickets(&ctx, &settings("prd_lxc_sm"), ok_rows([row(10)]))
            .await
            .unwrap();

        assert_eq!(
            report.rows[0].outcome,
            RowOutcome::Rejected {
                status: 422,
                body: r#"{"error":"RecordInvalid"}"#.to_string(),
            }
        );
        assert_eq!(report.created(), 0);
        assert_eq!(report.rejected(), 1);
    }

    #[tokio::test]
    async fn malformed_row_aborts_after_earlier_rows_are_submitted() {
        let helpdesk = Arc::new(
            FakeHelpdesk::new()
                .with_users(10, vec![user(1, "jane@customer.com", "end-user")])
                .with_users(11, vec![user(2, "bob@customer.com", "end-user")]),
        );
        let ctx = context(helpdesk.clone());
        let rows = vec![
            Ok(row(10)),
            Err(AppError::Spreadsheet(
                "row 2: organization_id 'oops' is not an integer".to_string(),
            )),
            Ok(row(11)),
        ];

        let err = create_tickets(&ctx, &settings("prd_lxc_sm"), rows)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Spreadsheet(msg) if msg.contains("row 2")));
        assert_eq!(
            helpdesk.calls(),
            vec![
                "GET organizations/10/users".to_string(),
                "POST tickets org=10 requester=1".to_string(),
            ]
        );
    }
}
