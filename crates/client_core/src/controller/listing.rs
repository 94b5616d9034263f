use shared::{domain::PostId, protocol::Post};
use tracing::warn;

use super::{
    state::{Notification, ViewPhase},
    ViewContext,
};
use crate::{error::Mutation, navigation::Route, slot::SlotList};

pub const POSTS_LOAD_FAILED: &str = "The posts could not be loaded";

/// The post listing. Holds a read-only cache that is replaced wholesale by
/// every fetch.
pub struct PostListController {
    ctx: ViewContext,
    posts: SlotList<Post>,
    phase: ViewPhase,
    pub notification: Notification,
}

impl PostListController {
    pub fn new(ctx: ViewContext) -> Self {
        let posts = SlotList::pending(ctx.settings.post_placeholders);
        Self {
            ctx,
            posts,
            phase: ViewPhase::Loading,
            notification: Notification::default(),
        }
    }

    pub fn posts(&self) -> &SlotList<Post> {
        &self.posts
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    /// Re-queries the backend. A failed read keeps whatever the list showed
    /// before (placeholders on first load).
    pub async fn refresh(&mut self) {
        let Some(credential) = self.ctx.credential_or_redirect() else {
            return;
        };
        match self.ctx.api.list_posts(&credential).await {
            Ok(posts) => {
                self.posts.resolve(posts);
                self.phase = ViewPhase::Ready;
            }
            Err(err) => {
                warn!("failed to load posts: {err}");
                self.phase = ViewPhase::Failed;
                self.notification.error(POSTS_LOAD_FAILED);
            }
        }
    }

    pub async fn delete_post(&mut self, post_id: &PostId) {
        self.notification.dismiss();
        let Some(credential) = self.ctx.credential_or_redirect() else {
            return;
        };
        match self.ctx.api.delete_post(&credential, post_id).await {
            Ok(()) => {
                self.notification
                    .mutation_outcome(Mutation::DeletePost, true);
                self.refresh().await;
            }
            Err(err) => {
                warn!(post_id = %post_id, "delete failed: {err}");
                self.notification
                    .mutation_outcome(Mutation::DeletePost, false);
            }
        }
    }

    pub fn edit_post(&self, post_id: &PostId) {
        self.ctx.navigator.redirect(Route::EditPost(post_id.clone()));
    }

    pub fn create_post(&self) {
        self.ctx.navigator.redirect(Route::CreatePost);
    }
}
