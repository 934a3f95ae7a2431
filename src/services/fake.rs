use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::organization::OrganizationPage;
use crate::domain::ticket::{NewTicket, TicketSubmission};
use crate::domain::user::User;
use crate::error::{AppError, AppResult};
use crate::services::HelpdeskService;

/// In-memory helpdesk that replays canned responses and records every call.
#[derive(Default)]
pub struct FakeHelpdesk {
    pages: Mutex<VecDeque<AppResult<OrganizationPage>>>,
    users: HashMap<u64, Vec<User>>,
    refused_orgs: HashMap<u64, u16>,
    submissions: Mutex<VecDeque<TicketSubmission>>,
    calls: Mutex<Vec<String>>,
    pub created: Mutex<Vec<NewTicket>>,
}

impl FakeHelpdesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: AppResult<OrganizationPage>) -> Self {
        self.pages.lock().unwrap().push_back(page);
        self
    }

    pub fn with_users(mut self, organization_id: u64, users: Vec<User>) -> Self {
        self.users.insert(organization_id, users);
        self
    }

    pub fn with_refused_users(mut self, organization_id: u64, status: u16) -> Self {
        self.refused_orgs.insert(organization_id, status);
        self
    }

    pub fn with_submission(self, submission: TicketSubmission) -> Self {
        self.submissions.lock().unwrap().push_back(submission);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl HelpdeskService for FakeHelpdesk {
    async fn organizations_page(&self, next: Option<&str>) -> AppResult<OrganizationPage> {
        self.record(format!("GET organizations {}", next.unwrap_or("<first>")));
        self.pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AppError::Helpdesk("no more canned pages".to_string())))
    }

    async fn organization_users(&self, organization_id: u64) -> AppResult<Vec<User>> {
        self.record(format!("GET organizations/{organization_id}/users"));
        if let Some(status) = self.refused_orgs.get(&organization_id) {
            return Err(AppError::HelpdeskStatus {
                status: *status,
                body: "refused".to_string(),
            });
        }
        Ok(self.users.get(&organization_id).cloned().unwrap_or_default())
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> AppResult<TicketSubmission> {
        self.record(format!(
            "POST tickets org={} requester={}",
            ticket.ticket.organization_id, ticket.ticket.requester_id
        ));
        self.created.lock().unwrap().push(ticket.clone());
        Ok(self
            .submissions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(TicketSubmission::Created { id: 1 }))
    }
}
