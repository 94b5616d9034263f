use std::{fmt, time::Duration};

use shared::domain::PostId;
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::debug;

pub const LOGIN_PATH: &str = "/";
pub const POSTS_PATH: &str = "/posts";
pub const CREATE_POST_PATH: &str = "/posts/create-post";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Posts,
    CreatePost,
    EditPost(PostId),
}

impl Route {
    /// Maps a path to a route. Unknown paths resolve to the login route.
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Login,
            POSTS_PATH => Self::Posts,
            CREATE_POST_PATH => Self::CreatePost,
            _ => match trimmed.strip_prefix("/posts/") {
                Some(id) if !id.is_empty() && !id.contains('/') => {
                    Self::EditPost(PostId::new(id))
                }
                _ => Self::Login,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => LOGIN_PATH.to_string(),
            Self::Posts => POSTS_PATH.to_string(),
            Self::CreatePost => CREATE_POST_PATH.to_string(),
            Self::EditPost(id) => format!("{POSTS_PATH}/{id}"),
        }
    }

    pub fn requires_credential(&self) -> bool {
        !matches!(self, Self::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Sending half of the router's navigation queue, handed to controllers.
#[derive(Clone)]
pub struct Navigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queues `route` for the router right away.
    pub fn redirect(&self, route: Route) {
        debug!(%route, "redirecting");
        let _ = self.tx.send(route);
    }

    /// Queues `route` once `delay` has elapsed. Dropping the returned handle
    /// before then cancels the navigation.
    pub fn schedule(&self, route: Route, delay: Duration) -> ScheduledNavigation {
        debug!(%route, ?delay, "scheduling navigation");
        let tx = self.tx.clone();
        let target = route.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(target);
        });
        ScheduledNavigation { route, handle }
    }
}

/// Pending delayed navigation owned by the view that requested it.
pub struct ScheduledNavigation {
    route: Route,
    handle: JoinHandle<()>,
}

impl ScheduledNavigation {
    pub fn route(&self) -> &Route {
        &self.route
    }
}

impl Drop for ScheduledNavigation {
    fn drop(&mut self) {
        if !self.handle.is_finished() {
            debug!(route = %self.route, "cancelling scheduled navigation");
        }
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Login);
        assert_eq!(Route::parse(""), Route::Login);
        assert_eq!(Route::parse("/posts"), Route::Posts);
        assert_eq!(Route::parse("/posts/"), Route::Posts);
        assert_eq!(Route::parse("/posts/create-post"), Route::CreatePost);
        assert_eq!(
            Route::parse("/posts/64a1"),
            Route::EditPost(PostId::new("64a1"))
        );
    }

    #[test]
    fn unknown_paths_fall_back_to_login() {
        assert_eq!(Route::parse("/nope"), Route::Login);
        assert_eq!(Route::parse("/posts/a/b"), Route::Login);
    }

    #[test]
    fn only_login_is_public() {
        assert!(!Route::Login.requires_credential());
        assert!(Route::Posts.requires_credential());
        assert!(Route::CreatePost.requires_credential());
        assert!(Route::EditPost(PostId::new("1")).requires_credential());
    }

    #[test]
    fn path_round_trips_through_parse() {
        let route = Route::EditPost(PostId::new("abc"));
        assert_eq!(Route::parse(&route.path()), route);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduled_navigation_fires_after_delay() {
        let (navigator, mut rx) = Navigator::channel();
        let _pending = navigator.schedule(Route::Posts, Duration::from_millis(1500));

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.recv().await, Some(Route::Posts));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_navigation() {
        let (navigator, mut rx) = Navigator::channel();
        let pending = navigator.schedule(Route::Posts, Duration::from_millis(1000));
        drop(pending);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }
}
