//! Remote data gateway: the backend's JSON endpoints behind one trait.

use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, COOKIE},
    Client, RequestBuilder,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Hobby, HobbyId, MeetingId, OneOnOne, Page, User, UserId, UserRef},
    error::Rejection,
    protocol::{
        Acknowledgement, AckResponse, AddHobbyResponse, AggregateUserResponse,
        CurrentUserResponse, OneOnOnesResponse, PopularHobbiesResponse, UserHobbiesResponse,
    },
};
use tracing::debug;
use url::Url;

use crate::error::{GatewayError, GatewayResult};

/// Backend-computed summaries shown next to the hobby list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregate {
    MostCommonUser,
    MostCommonUserNeverMet,
}

impl Aggregate {
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::MostCommonUser => "most_common_user",
            Self::MostCommonUserNeverMet => "most_common_user_never_met",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Self::MostCommonUser => "Most common user: ",
            Self::MostCommonUserNeverMet => "Most common user never met: ",
        }
    }
}

#[async_trait]
pub trait HobbyGateway: Send + Sync {
    async fn current_user(&self) -> GatewayResult<User>;
    async fn aggregate_user(&self, aggregate: Aggregate) -> GatewayResult<UserRef>;
    async fn user_hobbies(&self, user_id: UserId) -> GatewayResult<Vec<Hobby>>;
    async fn add_hobby(&self, name: &str) -> GatewayResult<HobbyId>;
    async fn remove_hobby(&self, hobby_id: HobbyId) -> GatewayResult<()>;
    async fn popular_hobbies(&self, page: u32) -> GatewayResult<Page>;
    async fn user_one_on_ones(&self, user_id: UserId) -> GatewayResult<Vec<OneOnOne>>;
    async fn cancel_one_on_one(&self, meeting_id: MeetingId) -> GatewayResult<()>;
    async fn logout(&self) -> GatewayResult<()>;
}

pub struct HttpGateway {
    http: Client,
    base_url: Url,
}

impl HttpGateway {
    pub fn new(server_url: &str) -> GatewayResult<Self> {
        Self::with_session_cookie(server_url, None)
    }

    /// Authentication happens outside this client; an existing session cookie
    /// can be replayed on every request.
    pub fn with_session_cookie(server_url: &str, cookie: Option<&str>) -> GatewayResult<Self> {
        let base_url = Url::parse(server_url)
            .map_err(|e| GatewayError::InvalidUrl(format!("{server_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(format!(
                "{server_url}: not a base url"
            )));
        }

        let mut headers = HeaderMap::new();
        if let Some(cookie) = cookie {
            let value = HeaderValue::from_str(cookie)
                .map_err(|e| GatewayError::InvalidUrl(format!("session cookie: {e}")))?;
            headers.insert(COOKIE, value);
        }

        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|source| GatewayError::Transport {
                endpoint: "client",
                source,
            })?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Each segment is percent-encoded on its own, so names containing `/`
    /// or `?` stay a single path segment.
    fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| GatewayError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn call<T>(&self, endpoint: &'static str, request: RequestBuilder) -> GatewayResult<T>
    where
        T: DeserializeOwned + Acknowledgement,
    {
        debug!(endpoint, "gateway request");
        let response = request
            .send()
            .await
            .map_err(|source| GatewayError::Transport { endpoint, source })?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|source| GatewayError::Transport { endpoint, source })?;

        // A JSON failure envelope wins over the status code.
        let parsed: T = match serde_json::from_slice(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(GatewayError::Status { endpoint, status })
            }
            Err(err) => {
                return Err(GatewayError::Decode {
                    endpoint,
                    reason: err.to_string(),
                })
            }
        };

        if !parsed.accepted() {
            return Err(Rejection::new(endpoint, parsed.message().map(str::to_owned)).into());
        }
        debug!(endpoint, %status, "gateway response accepted");
        Ok(parsed)
    }
}

fn missing_field(endpoint: &'static str, field: &str) -> GatewayError {
    GatewayError::Decode {
        endpoint,
        reason: format!("successful response without `{field}`"),
    }
}

#[async_trait]
impl HobbyGateway for HttpGateway {
    async fn current_user(&self) -> GatewayResult<User> {
        const ENDPOINT: &str = "get_current_user";
        let url = self.endpoint(&[ENDPOINT])?;
        let response: CurrentUserResponse = self.call(ENDPOINT, self.http.get(url)).await?;
        response.user.ok_or_else(|| missing_field(ENDPOINT, "user"))
    }

    async fn aggregate_user(&self, aggregate: Aggregate) -> GatewayResult<UserRef> {
        let endpoint = aggregate.endpoint();
        let url = self.endpoint(&[endpoint])?;
        let response: AggregateUserResponse = self.call(endpoint, self.http.get(url)).await?;
        response.user.ok_or_else(|| missing_field(endpoint, "user"))
    }

    async fn user_hobbies(&self, user_id: UserId) -> GatewayResult<Vec<Hobby>> {
        const ENDPOINT: &str = "get_user_hobbies";
        let url = self.endpoint(&[ENDPOINT, &user_id.to_string()])?;
        let response: UserHobbiesResponse = self.call(ENDPOINT, self.http.get(url)).await?;
        Ok(response.hobbies)
    }

    async fn add_hobby(&self, name: &str) -> GatewayResult<HobbyId> {
        const ENDPOINT: &str = "add_hobby";
        let url = self.endpoint(&[ENDPOINT, name])?;
        let response: AddHobbyResponse = self.call(ENDPOINT, self.http.post(url)).await?;
        response
            .hobby_id
            .ok_or_else(|| missing_field(ENDPOINT, "hobby_id"))
    }

    async fn remove_hobby(&self, hobby_id: HobbyId) -> GatewayResult<()> {
        const ENDPOINT: &str = "remove_hobby";
        let url = self.endpoint(&[ENDPOINT, &hobby_id.to_string()])?;
        let _: AckResponse = self.call(ENDPOINT, self.http.delete(url)).await?;
        Ok(())
    }

    async fn popular_hobbies(&self, page: u32) -> GatewayResult<Page> {
        const ENDPOINT: &str = "popular_hobbies";
        let url = self.endpoint(&[ENDPOINT, &page.to_string()])?;
        let response: PopularHobbiesResponse = self.call(ENDPOINT, self.http.get(url)).await?;
        Ok(Page {
            page_number: page,
            items: response.hobbies,
            start_index: response.start,
            total_pages: response.total_pages,
        })
    }

    async fn user_one_on_ones(&self, user_id: UserId) -> GatewayResult<Vec<OneOnOne>> {
        const ENDPOINT: &str = "get_user_one_on_ones";
        let url = self.endpoint(&[ENDPOINT, &user_id.to_string()])?;
        let response: OneOnOnesResponse = self.call(ENDPOINT, self.http.get(url)).await?;
        Ok(response.one_on_ones)
    }

    async fn cancel_one_on_one(&self, meeting_id: MeetingId) -> GatewayResult<()> {
        const ENDPOINT: &str = "cancel_one_on_one";
        let url = self.endpoint(&[ENDPOINT, &meeting_id.to_string()])?;
        let _: AckResponse = self.call(ENDPOINT, self.http.delete(url)).await?;
        Ok(())
    }

    async fn logout(&self) -> GatewayResult<()> {
        const ENDPOINT: &str = "logout";
        let url = self.endpoint(&[ENDPOINT])?;
        // Answers with a redirect to an HTML page; only the status matters.
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| GatewayError::Transport {
                endpoint: ENDPOINT,
                source,
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Status {
                endpoint: ENDPOINT,
                status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod tests;
