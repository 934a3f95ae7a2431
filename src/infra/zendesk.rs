use async_trait::async_trait;
use reqwest::{
    Client, RequestBuilder, Response, StatusCode,
    header::{ACCEPT, CONTENT_TYPE, COOKIE},
};
use serde::Deserialize;
use tracing::debug;

use crate::domain::organization::OrganizationPage;
use crate::domain::ticket::{NewTicket, TicketSubmission};
use crate::domain::user::{User, UserListing};
use crate::error::{AppError, AppResult};
use crate::services::HelpdeskService;

const CSRF_HEADER: &str = "X-Csrf-Token";
const ORGANIZATION_PAGE_SIZE: u32 = 100;

/// Zendesk REST client authenticated with an agent's browser session.
pub struct ZendeskClient {
    http: Client,
    base_url: String,
    cookie: String,
    csrf_token: Option<String>,
}

impl ZendeskClient {
    pub fn new(domain: &str, cookie: &str, csrf_token: Option<&str>) -> Self {
        let domain = domain.trim().trim_end_matches('/');
        Self::with_base_url(&format!("https://{domain}"), cookie, csrf_token)
    }

    /// Targets an explicit scheme and host instead of `https://{domain}`.
    pub fn with_base_url(base_url: &str, cookie: &str, csrf_token: Option<&str>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie: cookie.to_string(),
            csrf_token: csrf_token.map(str::to_string),
        }
    }

    fn url_prefix(&self) -> &str {
        &self.base_url
    }

    fn organizations_endpoint(&self) -> String {
        format!(
            "{}/api/v2/organizations.json?page[size]={ORGANIZATION_PAGE_SIZE}",
            self.url_prefix()
        )
    }

    fn organization_users_endpoint(&self, organization_id: u64) -> String {
        format!(
            "{}/api/v2/organizations/{organization_id}/users.json",
            self.url_prefix()
        )
    }

    fn tickets_endpoint(&self) -> String {
        format!("{}/api/v2/tickets.json", self.url_prefix())
    }

    fn get(&self, url: &str) -> RequestBuilder {
        debug!(%url, "GET");
        self.http
            .get(url)
            .header(COOKIE, &self.cookie)
            .header(ACCEPT, "application/json")
    }

    fn post(&self, url: &str) -> AppResult<RequestBuilder> {
        let csrf_token = self.csrf_token.as_deref().ok_or_else(|| {
            AppError::Configuration("CSRF token not configured".to_string())
        })?;
        debug!(%url, "POST");
        Ok(self
            .http
            .post(url)
            .header(COOKIE, &self.cookie)
            .header(CSRF_HEADER, csrf_token)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json"))
    }

    async fn send(request: RequestBuilder) -> AppResult<Response> {
        request
            .send()
            .await
            .map_err(|err| AppError::Helpdesk(format!("failed to call Zendesk: {err}")))
    }

    async fn read_body(response: Response) -> String {
        response
            .text()
            .await
            .unwrap_or_else(|_| "<unable to read response>".to_string())
    }

    async fn ensure_success(response: Response) -> AppResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        Err(AppError::HelpdeskStatus {
            status: status.as_u16(),
            body: Self::read_body(response).await,
        })
    }
}

#[async_trait]
impl HelpdeskService for ZendeskClient {
    async fn organizations_page(&self, next: Option<&str>) -> AppResult<OrganizationPage> {
        let url = next
            .map(str::to_string)
            .unwrap_or_else(|| self.organizations_endpoint());
        let response = Self::ensure_success(Self::send(self.get(&url)).await?).await?;
        response.json().await.map_err(|err| {
            AppError::Helpdesk(format!("failed to parse organizations page: {err}"))
        })
    }

    async fn organization_users(&self, organization_id: u64) -> AppResult<Vec<User>> {
        let url = self.organization_users_endpoint(organization_id);
        let response = Self::ensure_success(Self::send(self.get(&url)).await?).await?;
        let listing: UserListing = response.json().await.map_err(|err| {
            AppError::Helpdesk(format!(
                "failed to parse users of organization {organization_id}: {err}"
            ))
        })?;
        Ok(listing.users)
    }

    async fn create_ticket(&self, ticket: &NewTicket) -> AppResult<TicketSubmission> {
        let request = self.post(&self.tickets_endpoint())?.json(ticket);
        let response = Self::send(request).await?;

        let status = response.status();
        debug!(status = status.as_u16(), "ticket creation responded");
        if status != StatusCode::CREATED {
            return Ok(TicketSubmission::Rejected {
                status: status.as_u16(),
                body: Self::read_body(response).await,
            });
        }

        let payload: CreateTicketResponse = response.json().await.map_err(|err| {
            AppError::Helpdesk(format!("failed to parse ticket creation response: {err}"))
        })?;
        Ok(TicketSubmission::Created {
            id: payload.ticket.id,
        })
    }
}

#[derive(Deserialize)]
struct CreateTicketResponse {
    ticket: CreatedTicket,
}

#[derive(Deserialize)]
struct CreatedTicket {
    id: u64,
}
