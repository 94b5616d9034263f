//! Test doubles for the blog backend: an in-memory [`BlogApi`] with call
//! counters, and an axum server speaking the real HTTP contract.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    routing,
    Json, Router,
};
use chrono::{DateTime, Utc};
use shared::{
    domain::{CommentId, PostId},
    protocol::{Comment, LoginRequest, LoginResponse, Post, PostDraft},
};
use tokio::net::TcpListener;

use crate::{
    api::BlogApi,
    error::{ClientError, ClientResult, Mutation},
    session::Credential,
};

pub(crate) const USERNAME: &str = "admin";
pub(crate) const PASSWORD: &str = "hunter2";
pub(crate) const TOKEN: &str = "token-admin";

pub(crate) fn timestamp() -> DateTime<Utc> {
    "2023-07-02T10:00:00Z".parse().expect("timestamp")
}

pub(crate) fn post(id: &str, title: &str) -> Post {
    Post {
        id: PostId::new(id),
        title: title.to_string(),
        content: format!("Body of {title}, long enough to be cut in a preview"),
        published: true,
        author: USERNAME.to_string(),
        timestamp: timestamp(),
    }
}

pub(crate) fn comment(id: &str, post_id: &str) -> Comment {
    Comment {
        id: CommentId::new(id),
        post_id: PostId::new(post_id),
        name: "Reader".to_string(),
        email: "reader@example.com".to_string(),
        comment: format!("comment {id}"),
        timestamp: timestamp(),
    }
}

pub(crate) fn credential() -> Credential {
    Credential::new(TOKEN).expect("token")
}

#[derive(Default)]
struct FakeState {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    next_id: u32,
    calls: HashMap<&'static str, usize>,
    failing: HashSet<&'static str>,
}

/// In-memory backend. Operation names used by `calls`/`fail` match the
/// trait method names.
#[derive(Default)]
pub(crate) struct FakeBlogApi {
    state: Mutex<FakeState>,
}

impl FakeBlogApi {
    pub(crate) fn with_posts(posts: Vec<Post>) -> Arc<Self> {
        let api = Self::default();
        api.state.lock().expect("fake state").posts = posts;
        Arc::new(api)
    }

    pub(crate) fn add_comments(&self, comments: Vec<Comment>) {
        self.state.lock().expect("fake state").comments.extend(comments);
    }

    pub(crate) fn fail(&self, operation: &'static str) {
        self.state
            .lock()
            .expect("fake state")
            .failing
            .insert(operation);
    }

    pub(crate) fn calls(&self, operation: &'static str) -> usize {
        self.state
            .lock()
            .expect("fake state")
            .calls
            .get(operation)
            .copied()
            .unwrap_or(0)
    }

    pub(crate) fn total_calls(&self) -> usize {
        self.state.lock().expect("fake state").calls.values().sum()
    }

    pub(crate) fn post_titles(&self) -> Vec<String> {
        self.state
            .lock()
            .expect("fake state")
            .posts
            .iter()
            .map(|post| post.title.clone())
            .collect()
    }

    fn record(&self, operation: &'static str) -> bool {
        let mut state = self.state.lock().expect("fake state");
        *state.calls.entry(operation).or_default() += 1;
        !state.failing.contains(operation)
    }

    fn check(credential: &Credential) -> bool {
        credential.expose() == TOKEN
    }
}

#[async_trait]
impl BlogApi for FakeBlogApi {
    async fn login(&self, username: &str, password: &str) -> ClientResult<Credential> {
        if !self.record("login") || username != USERNAME || password != PASSWORD {
            return Err(ClientError::Auth {
                status: StatusCode::UNAUTHORIZED,
            });
        }
        Ok(credential())
    }

    async fn list_posts(&self, credential: &Credential) -> ClientResult<Vec<Post>> {
        if !self.record("list_posts") || !Self::check(credential) {
            return Err(ClientError::Fetch {
                resource: "posts",
                status: StatusCode::UNAUTHORIZED,
            });
        }
        Ok(self.state.lock().expect("fake state").posts.clone())
    }

    async fn get_post(&self, post_id: &PostId) -> ClientResult<Post> {
        let ok = self.record("get_post");
        let state = self.state.lock().expect("fake state");
        state
            .posts
            .iter()
            .find(|post| ok && &post.id == post_id)
            .cloned()
            .ok_or(ClientError::Fetch {
                resource: "post",
                status: StatusCode::NOT_FOUND,
            })
    }

    async fn create_post(&self, credential: &Credential, draft: &PostDraft) -> ClientResult<()> {
        if !self.record("create_post") || !Self::check(credential) {
            return Err(ClientError::Mutation {
                mutation: Mutation::CreatePost,
                status: StatusCode::BAD_REQUEST,
            });
        }
        let mut state = self.state.lock().expect("fake state");
        state.next_id += 1;
        let id = format!("new-{}", state.next_id);
        state.posts.push(Post {
            id: PostId::new(id),
            title: draft.title.clone(),
            content: draft.content.clone(),
            published: draft.published,
            author: USERNAME.to_string(),
            timestamp: timestamp(),
        });
        Ok(())
    }

    async fn update_post(
        &self,
        credential: &Credential,
        post_id: &PostId,
        draft: &PostDraft,
    ) -> ClientResult<()> {
        let rejected = ClientError::Mutation {
            mutation: Mutation::UpdatePost,
            status: StatusCode::NOT_FOUND,
        };
        if !self.record("update_post") || !Self::check(credential) {
            return Err(rejected);
        }
        let mut state = self.state.lock().expect("fake state");
        let post = state
            .posts
            .iter_mut()
            .find(|post| &post.id == post_id)
            .ok_or(rejected)?;
        post.title = draft.title.clone();
        post.content = draft.content.clone();
        post.published = draft.published;
        Ok(())
    }

    async fn delete_post(&self, credential: &Credential, post_id: &PostId) -> ClientResult<()> {
        if !self.record("delete_post") || !Self::check(credential) {
            return Err(ClientError::Mutation {
                mutation: Mutation::DeletePost,
                status: StatusCode::FORBIDDEN,
            });
        }
        self.state
            .lock()
            .expect("fake state")
            .posts
            .retain(|post| &post.id != post_id);
        Ok(())
    }

    async fn list_comments(&self, post_id: &PostId) -> ClientResult<Vec<Comment>> {
        if !self.record("list_comments") {
            return Err(ClientError::Fetch {
                resource: "comments",
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(self
            .state
            .lock()
            .expect("fake state")
            .comments
            .iter()
            .filter(|comment| &comment.post_id == post_id)
            .cloned()
            .collect())
    }

    async fn delete_comment(
        &self,
        credential: &Credential,
        comment_id: &CommentId,
    ) -> ClientResult<()> {
        if !self.record("delete_comment") || !Self::check(credential) {
            return Err(ClientError::Mutation {
                mutation: Mutation::DeleteComment,
                status: StatusCode::FORBIDDEN,
            });
        }
        self.state
            .lock()
            .expect("fake state")
            .comments
            .retain(|comment| &comment.id != comment_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct MockData {
    pub(crate) posts: Vec<Post>,
    pub(crate) comments: Vec<Comment>,
    pub(crate) last_created: Option<PostDraft>,
}

pub(crate) type SharedMockData = Arc<tokio::sync::Mutex<MockData>>;

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

async fn handle_login(Json(body): Json<LoginRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    if body.username == USERNAME && body.password == PASSWORD {
        Ok(Json(LoginResponse {
            token: TOKEN.to_string(),
        }))
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn handle_list_posts(
    State(data): State<SharedMockData>,
    headers: HeaderMap,
) -> Result<Json<Vec<Post>>, StatusCode> {
    if !authorized(&headers) {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(Json(data.lock().await.posts.clone()))
}

async fn handle_get_post(
    State(data): State<SharedMockData>,
    Path(id): Path<String>,
) -> Result<Json<Post>, StatusCode> {
    data.lock()
        .await
        .posts
        .iter()
        .find(|post| post.id.as_str() == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn handle_create_post(
    State(data): State<SharedMockData>,
    headers: HeaderMap,
    Json(draft): Json<PostDraft>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut data = data.lock().await;
    let id = format!("created-{}", data.posts.len() + 1);
    data.posts.push(Post {
        id: PostId::new(id),
        title: draft.title.clone(),
        content: draft.content.clone(),
        published: draft.published,
        author: USERNAME.to_string(),
        timestamp: timestamp(),
    });
    data.last_created = Some(draft);
    StatusCode::CREATED
}

async fn handle_update_post(
    State(data): State<SharedMockData>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(draft): Json<PostDraft>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut data = data.lock().await;
    match data.posts.iter_mut().find(|post| post.id.as_str() == id) {
        Some(post) => {
            post.title = draft.title;
            post.content = draft.content;
            post.published = draft.published;
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn handle_delete_post(
    State(data): State<SharedMockData>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut data = data.lock().await;
    let before = data.posts.len();
    data.posts.retain(|post| post.id.as_str() != id);
    if data.posts.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::NO_CONTENT
    }
}

async fn handle_list_comments(
    State(data): State<SharedMockData>,
    Path(id): Path<String>,
) -> Json<Vec<Comment>> {
    Json(
        data.lock()
            .await
            .comments
            .iter()
            .filter(|comment| comment.post_id.as_str() == id)
            .cloned()
            .collect(),
    )
}

async fn handle_delete_comment(
    State(data): State<SharedMockData>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    let mut data = data.lock().await;
    let before = data.comments.len();
    data.comments.retain(|comment| comment.id.as_str() != id);
    if data.comments.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::OK
    }
}

/// Starts a blog backend on an ephemeral port and returns its base URL.
pub(crate) async fn spawn_blog_server(data: MockData) -> (String, SharedMockData) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let data: SharedMockData = Arc::new(tokio::sync::Mutex::new(data));
    let app = Router::new()
        .route("/auth/login", routing::post(handle_login))
        .route(
            "/post",
            routing::get(handle_list_posts).post(handle_create_post),
        )
        .route("/post/:id", routing::get(handle_get_post))
        .route(
            "/post/:id/",
            routing::put(handle_update_post).delete(handle_delete_post),
        )
        .route("/post/:id/comments", routing::get(handle_list_comments))
        .route("/comment/:id/", routing::delete(handle_delete_comment))
        .with_state(Arc::clone(&data));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), data)
}
