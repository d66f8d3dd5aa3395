use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    error::ApiError,
    protocol::{
        CreateMemberRequest, DeleteMembersRequest, Member, MemberCounts, UpdatePositionRequest,
        UserProfile,
    },
};
use tracing::debug;
use url::Url;

pub mod board;
pub mod error;
pub mod notify;
pub mod selection;
pub mod session;
pub mod store;
pub mod summary;
pub mod view;

pub use board::{BoardSnapshot, MembersBoard, WorkflowOutcome};
pub use error::{ClientError, ValidationError};
pub use notify::{NotificationKind, Notifier, Prompter};
pub use selection::SelectionTracker;
pub use session::{SessionLifetime, Workflow};
pub use store::{Record, ResourceList};
pub use summary::{DashboardCounts, DashboardSummary, SummaryTile};

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait]
pub trait MembersApi: Send + Sync {
    async fn list_members(&self) -> Result<Vec<Member>, ClientError>;
    async fn create_member(&self, request: &CreateMemberRequest) -> Result<Member, ClientError>;
    /// Returns the full member list as it stands after the update.
    async fn update_position(
        &self,
        request: &UpdatePositionRequest,
    ) -> Result<Vec<Member>, ClientError>;
    async fn delete_members(&self, request: &DeleteMembersRequest) -> Result<(), ClientError>;
    async fn committee_count(&self) -> Result<u64, ClientError>;
    async fn member_counts(&self) -> Result<MemberCounts, ClientError>;
}

#[derive(Clone)]
pub struct DashboardClient {
    http: Client,
    api_url: String,
    token: String,
}

impl DashboardClient {
    pub fn new(api_url: &str, token: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(api_url, token, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        api_url: &str,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let api_url = normalize_api_url(api_url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_url,
            token: token.into(),
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        self.get_json("profile").await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let res = self.request(Method::GET, path).send().await?;
        read_json(res, StatusCode::OK).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "forum api request");
        self.http
            .request(method, format!("{}/{}", self.api_url, path))
            .bearer_auth(&self.token)
    }
}

#[async_trait]
impl MembersApi for DashboardClient {
    async fn list_members(&self) -> Result<Vec<Member>, ClientError> {
        self.get_json("members")
            .await
            .map_err(|err| ClientError::fetch("members", err))
    }

    async fn create_member(&self, request: &CreateMemberRequest) -> Result<Member, ClientError> {
        let res = self
            .request(Method::POST, "members")
            .json(request)
            .send()
            .await?;
        if res.status() == StatusCode::CONFLICT {
            return Err(ClientError::Conflict);
        }
        read_json(res, StatusCode::CREATED).await
    }

    async fn update_position(
        &self,
        request: &UpdatePositionRequest,
    ) -> Result<Vec<Member>, ClientError> {
        let res = self
            .request(Method::PUT, "members")
            .json(request)
            .send()
            .await?;
        read_json(res, StatusCode::CREATED).await
    }

    async fn delete_members(&self, request: &DeleteMembersRequest) -> Result<(), ClientError> {
        let res = self
            .request(Method::DELETE, "members")
            .json(request)
            .send()
            .await?;
        expect_status(res, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    async fn committee_count(&self) -> Result<u64, ClientError> {
        self.get_json("committees/count")
            .await
            .map_err(|err| ClientError::fetch("committee count", err))
    }

    async fn member_counts(&self) -> Result<MemberCounts, ClientError> {
        self.get_json("members/count")
            .await
            .map_err(|err| ClientError::fetch("member counts", err))
    }
}

pub fn normalize_api_url(raw: &str) -> Result<String, ClientError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let parsed = Url::parse(trimmed).map_err(|_| ClientError::InvalidUrl(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(ClientError::InvalidUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}

async fn expect_status(res: Response, expected: StatusCode) -> Result<Response, ClientError> {
    let status = res.status();
    if status == expected {
        return Ok(res);
    }
    let api_error = res.json::<ApiError>().await.ok();
    Err(ClientError::Remote { status, api_error })
}

async fn read_json<T: DeserializeOwned>(
    res: Response,
    expected: StatusCode,
) -> Result<T, ClientError> {
    let res = expect_status(res, expected).await?;
    Ok(res.json::<T>().await?)
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
