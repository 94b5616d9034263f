use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{CommentId, PostId},
    protocol::{Comment, LoginRequest, LoginResponse, Post, PostDraft},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    error::{ClientError, ClientResult, Mutation},
    session::Credential,
};

/// Request/response operations against the blog backend.
///
/// Success is decided by status-code equality alone; response bodies of
/// failed calls are never inspected.
#[async_trait]
pub trait BlogApi: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> ClientResult<Credential>;
    async fn list_posts(&self, credential: &Credential) -> ClientResult<Vec<Post>>;
    async fn get_post(&self, post_id: &PostId) -> ClientResult<Post>;
    async fn create_post(&self, credential: &Credential, draft: &PostDraft) -> ClientResult<()>;
    async fn update_post(
        &self,
        credential: &Credential,
        post_id: &PostId,
        draft: &PostDraft,
    ) -> ClientResult<()>;
    async fn delete_post(&self, credential: &Credential, post_id: &PostId) -> ClientResult<()>;
    async fn list_comments(&self, post_id: &PostId) -> ClientResult<Vec<Comment>>;
    async fn delete_comment(
        &self,
        credential: &Credential,
        comment_id: &CommentId,
    ) -> ClientResult<()>;
}

pub struct HttpBlogApi {
    http: Client,
    base_url: Url,
}

impl HttpBlogApi {
    /// Accepts any absolute http(s) URL; a path prefix such as `/api` is kept.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        let invalid = || ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
        };
        let parsed = Url::parse(base_url).map_err(|_| invalid())?;
        if parsed.cannot_be_a_base() {
            return Err(invalid());
        }
        Ok(Self {
            http: Client::new(),
            base_url: parsed,
        })
    }

    /// Appends `segments` to the base path. Each segment is percent-encoded
    /// on its own, so `/`, `?` and `#` inside an id stay inside that segment.
    fn endpoint(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidBaseUrl {
                    url: self.base_url.to_string(),
                })?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Endpoint whose path embeds a resource id.
    fn id_endpoint(&self, before: &str, id: &str, after: &[&str]) -> ClientResult<Url> {
        // Dot segments are dropped by path normalization and would address
        // a different resource.
        if id.is_empty() || id == "." || id == ".." {
            warn!(id, "refusing to build a path from an unusable id");
            return Err(ClientError::InvalidId { id: id.to_string() });
        }
        let mut segments = vec![before, id];
        segments.extend_from_slice(after);
        self.endpoint(&segments)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        resource: &'static str,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let res = request
            .send()
            .await
            .map_err(ClientError::transport(resource))?;
        if res.status() != StatusCode::OK {
            warn!(resource, status = %res.status(), "fetch rejected");
            return Err(ClientError::Fetch {
                resource,
                status: res.status(),
            });
        }
        res.json().await.map_err(ClientError::transport(resource))
    }

    async fn mutate(&self, mutation: Mutation, request: RequestBuilder) -> ClientResult<()> {
        let res: Response = request
            .send()
            .await
            .map_err(ClientError::transport(mutation.label()))?;
        let status = res.status();
        if status != mutation.success_status() {
            warn!(%mutation, %status, "mutation rejected");
            return Err(ClientError::Mutation { mutation, status });
        }
        info!(%mutation, "mutation accepted");
        Ok(())
    }
}

#[async_trait]
impl BlogApi for HttpBlogApi {
    async fn login(&self, username: &str, password: &str) -> ClientResult<Credential> {
        let res = self
            .http
            .post(self.endpoint(&["auth", "login"])?)
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(ClientError::transport("login"))?;

        let status = res.status();
        if status != StatusCode::OK {
            warn!(username, %status, "login rejected");
            return Err(ClientError::Auth { status });
        }

        let body: LoginResponse = res.json().await.map_err(ClientError::transport("login"))?;
        let credential = Credential::new(body.token).ok_or(ClientError::Auth { status })?;
        info!(username, "login succeeded");
        Ok(credential)
    }

    async fn list_posts(&self, credential: &Credential) -> ClientResult<Vec<Post>> {
        let posts: Vec<Post> = self
            .fetch_json(
                "posts",
                self.http
                    .get(self.endpoint(&["post"])?)
                    .bearer_auth(credential.expose()),
            )
            .await?;
        debug!(count = posts.len(), "fetched posts");
        Ok(posts)
    }

    async fn get_post(&self, post_id: &PostId) -> ClientResult<Post> {
        self.fetch_json(
            "post",
            self.http.get(self.id_endpoint("post", post_id.as_str(), &[])?),
        )
        .await
    }

    async fn create_post(&self, credential: &Credential, draft: &PostDraft) -> ClientResult<()> {
        self.mutate(
            Mutation::CreatePost,
            self.http
                .post(self.endpoint(&["post"])?)
                .bearer_auth(credential.expose())
                .json(draft),
        )
        .await
    }

    async fn update_post(
        &self,
        credential: &Credential,
        post_id: &PostId,
        draft: &PostDraft,
    ) -> ClientResult<()> {
        self.mutate(
            Mutation::UpdatePost,
            self.http
                .put(self.id_endpoint("post", post_id.as_str(), &[""])?)
                .bearer_auth(credential.expose())
                .json(draft),
        )
        .await
    }

    async fn delete_post(&self, credential: &Credential, post_id: &PostId) -> ClientResult<()> {
        self.mutate(
            Mutation::DeletePost,
            self.http
                .delete(self.id_endpoint("post", post_id.as_str(), &[""])?)
                .bearer_auth(credential.expose()),
        )
        .await
    }

    async fn list_comments(&self, post_id: &PostId) -> ClientResult<Vec<Comment>> {
        let comments: Vec<Comment> = self
            .fetch_json(
                "comments",
                self.http
                    .get(self.id_endpoint("post", post_id.as_str(), &["comments"])?),
            )
            .await?;
        debug!(post_id = %post_id, count = comments.len(), "fetched comments");
        Ok(comments)
    }

    async fn delete_comment(
        &self,
        credential: &Credential,
        comment_id: &CommentId,
    ) -> ClientResult<()> {
        self.mutate(
            Mutation::DeleteComment,
            self.http
                .delete(self.id_endpoint("comment", comment_id.as_str(), &[""])?)
                .bearer_auth(credential.expose()),
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
