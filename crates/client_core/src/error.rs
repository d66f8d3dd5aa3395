use reqwest::StatusCode;
use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to load {resource}: {source}")]
    Fetch {
        resource: &'static str,
        #[source]
        source: Box<ClientError>,
    },
    #[error("member already belongs to the forum")]
    Conflict,
    #[error("unexpected server response {status}")]
    Remote {
        status: StatusCode,
        api_error: Option<ApiError>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid api url '{0}'")]
    InvalidUrl(String),
}

impl ClientError {
    pub(crate) fn fetch(resource: &'static str, source: ClientError) -> Self {
        Self::Fetch {
            resource,
            source: Box::new(source),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Conflict => Some(StatusCode::CONFLICT),
            Self::Remote { status, .. } => Some(*status),
            Self::Transport(err) => err.status(),
            Self::Fetch { source, .. } => source.status(),
            Self::InvalidUrl(_) => None,
        }
    }
}

/// Client-side precondition failures; no remote call is made when one occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("exactly one member must be selected")]
    SelectExactlyOne,
    #[error("at least one member must be selected")]
    SelectAtLeastOne,
    #[error("position must not be empty")]
    EmptyPosition,
    #[error("name and affiliation are both required")]
    NameAndAffiliationRequired,
}
