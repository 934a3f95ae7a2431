use async_trait::async_trait;

use crate::domain::organization::OrganizationPage;
use crate::domain::ticket::{NewTicket, TicketSubmission};
use crate::domain::user::User;
use crate::error::AppResult;

#[async_trait]
pub trait HelpdeskService: Send + Sync {
    /// Fetches the organization page at `next`, or the first page when `None`.
    async fn organizations_page(&self, next: Option<&str>) -> AppResult<OrganizationPage>;

    /// Lists the users of an organization in the order the helpdesk returns them.
    async fn organization_users(&self, organization_id: u64) -> AppResult<Vec<User>>;

    async fn create_ticket(&self, ticket: &NewTicket) -> AppResult<TicketSubmission>;
}
