use serde::Deserialize;

const END_USER_ROLE: &str = "end-user";
const EXCLUDED_EMAIL_MARKERS: [&str; 3] = ["noreply", "no-reply", "broken"];

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListing {
    #[serde(default)]
    pub users: Vec<User>,
}

/// Decides which organization members may act as a ticket requester.
///
/// Matching is a case-insensitive substring check on the email, so a real
/// customer address containing one of the markers is rejected as well.
#[derive(Debug, Clone)]
pub struct RequesterFilter {
    internal_domain: String,
}

impl RequesterFilter {
    pub fn new(internal_domain: &str) -> Self {
        Self {
            internal_domain: internal_domain.trim().to_lowercase(),
        }
    }

    pub fn is_eligible(&self, user: &User) -> bool {
        if user.role.as_deref() != Some(END_USER_ROLE) {
            return false;
        }
        let email = user.email.as_deref().unwrap_or_default().to_lowercase();
        let excluded = EXCLUDED_EMAIL_MARKERS
            .iter()
            .any(|marker| email.contains(marker));
        let internal = !self.internal_domain.is_empty() && email.contains(&self.internal_domain);
        !excluded && !internal
    }

    pub fn select<'a>(&self, users: &'a [User]) -> Option<&'a User> {
        users.iter().find(|user| self.is_eligible(user))
    }
}
