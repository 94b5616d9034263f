use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

/// A create/update/delete call against the remote API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    CreatePost,
    UpdatePost,
    DeletePost,
    DeleteComment,
}

impl Mutation {
    /// The only status the backend uses to report success for this call.
    pub fn success_status(self) -> StatusCode {
        match self {
            Self::CreatePost => StatusCode::CREATED,
            Self::UpdatePost | Self::DeletePost => StatusCode::NO_CONTENT,
            Self::DeleteComment => StatusCode::OK,
        }
    }

    /// Short operation name, also used as the transport error context.
    pub fn label(self) -> &'static str {
        match self {
            Self::CreatePost => "create post",
            Self::UpdatePost => "update post",
            Self::DeletePost => "delete post",
            Self::DeleteComment => "delete comment",
        }
    }

    pub fn success_message(self) -> &'static str {
        match self {
            Self::CreatePost => "The post has been created",
            Self::UpdatePost => "The post has been updated",
            Self::DeletePost => "The post has been deleted",
            Self::DeleteComment => "The comment has been deleted",
        }
    }

    pub fn failure_message(self) -> &'static str {
        match self {
            Self::CreatePost => "The post has not been created",
            Self::UpdatePost => "The post has not been updated",
            Self::DeletePost => "The post has not been deleted",
            Self::DeleteComment => "The comment has not been deleted",
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("login rejected with status {status}")]
    Auth { status: StatusCode },
    #[error("{mutation} failed with status {status}")]
    Mutation {
        mutation: Mutation,
        status: StatusCode,
    },
    #[error("fetching {resource} failed with status {status}")]
    Fetch {
        resource: &'static str,
        status: StatusCode,
    },
    #[error("{context}: {source}")]
    Transport {
        context: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("no credential in session")]
    MissingCredential,
    #[error("{url:?} cannot be used as an API base URL")]
    InvalidBaseUrl { url: String },
    #[error("{id:?} is not a usable resource id")]
    InvalidId { id: String },
}

impl ClientError {
    pub(crate) fn transport(context: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Transport { context, source }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
