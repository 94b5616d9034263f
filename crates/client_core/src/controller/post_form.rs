use shared::{
    domain::{CommentId, PostId},
    protocol::{Comment, Post, PostDraft},
};
use tracing::warn;

use super::{
    state::{Notification, ViewPhase},
    ViewContext,
};
use crate::{
    error::{ClientResult, Mutation},
    navigation::{Route, ScheduledNavigation},
    slot::SlotList,
};

pub const POST_LOAD_FAILED: &str = "The post could not be loaded";
pub const COMMENTS_LOAD_FAILED: &str = "The comments could not be loaded";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(PostId),
}

/// Create/edit form for one post, plus the comment list in edit mode.
pub struct PostFormController {
    ctx: ViewContext,
    mode: FormMode,
    pub title: String,
    pub content: String,
    pub published: bool,
    post: Option<Post>,
    comments: SlotList<Comment>,
    phase: ViewPhase,
    submitting: bool,
    pub notification: Notification,
    pending_navigation: Option<ScheduledNavigation>,
}

impl PostFormController {
    pub fn new(ctx: ViewContext, mode: FormMode) -> Self {
        let (phase, comments) = match mode {
            FormMode::Create => (ViewPhase::Idle, SlotList::pending(0)),
            FormMode::Edit(_) => (
                ViewPhase::Loading,
                SlotList::pending(ctx.settings.comment_placeholders),
            ),
        };
        Self {
            ctx,
            mode,
            title: String::new(),
            content: String::new(),
            published: false,
            post: None,
            comments,
            phase,
            submitting: false,
            notification: Notification::default(),
            pending_navigation: None,
        }
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn post(&self) -> Option<&Post> {
        self.post.as_ref()
    }

    pub fn comments(&self) -> &SlotList<Comment> {
        &self.comments
    }

    /// True while a submit is in flight or a post-create redirect is pending.
    pub fn is_submitting(&self) -> bool {
        self.submitting || self.pending_navigation.is_some()
    }

    pub fn pending_navigation(&self) -> Option<&ScheduledNavigation> {
        self.pending_navigation.as_ref()
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add New Blog Post",
            FormMode::Edit(_) => "Update Blog Post",
        }
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Create",
            FormMode::Edit(_) => "Update",
        }
    }

    pub fn published_label(&self) -> &'static str {
        if self.published {
            "Publish"
        } else {
            "Not publish"
        }
    }

    pub fn toggle_published(&mut self) {
        self.published = !self.published;
    }

    pub fn draft(&self) -> PostDraft {
        PostDraft {
            title: self.title.clone(),
            content: self.content.clone(),
            published: self.published,
        }
    }

    /// Loads the edited post and its comments. A post that cannot be fetched
    /// leaves the form failed with an error banner.
    pub async fn load(&mut self) {
        let FormMode::Edit(post_id) = self.mode.clone() else {
            return;
        };
        if self.ctx.credential_or_redirect().is_none() {
            return;
        }
        if let Err(err) = self.reload_post(&post_id).await {
            warn!(post_id = %post_id, "failed to load post: {err}");
            self.phase = ViewPhase::Failed;
            self.notification.error(POST_LOAD_FAILED);
            self.comments.resolve(Vec::new());
            return;
        }
        self.reload_comments(&post_id).await;
    }

    pub async fn submit(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.notification.dismiss();
        let Some(credential) = self.ctx.credential_or_redirect() else {
            return;
        };
        let draft = self.draft();

        self.submitting = true;
        match self.mode.clone() {
            FormMode::Edit(post_id) => {
                let result = self
                    .ctx
                    .api
                    .update_post(&credential, &post_id, &draft)
                    .await;
                match result {
                    Ok(()) => {
                        self.notification
                            .mutation_outcome(Mutation::UpdatePost, true);
                        // The update stands; the form keeps what was submitted.
                        if let Err(err) = self.reload_post(&post_id).await {
                            warn!(post_id = %post_id, "updated post could not be re-fetched: {err}");
                        }
                    }
                    Err(err) => {
                        warn!(post_id = %post_id, "update failed: {err}");
                        self.notification
                            .mutation_outcome(Mutation::UpdatePost, false);
                    }
                }
            }
            FormMode::Create => match self.ctx.api.create_post(&credential, &draft).await {
                Ok(()) => {
                    self.notification
                        .mutation_outcome(Mutation::CreatePost, true);
                    self.pending_navigation = Some(
                        self.ctx
                            .navigator
                            .schedule(Route::Posts, self.ctx.settings.create_redirect_delay),
                    );
                }
                Err(err) => {
                    warn!("create failed: {err}");
                    self.notification
                        .mutation_outcome(Mutation::CreatePost, false);
                }
            },
        }
        self.submitting = false;
    }

    pub async fn delete_comment(&mut self, comment_id: &CommentId) {
        let FormMode::Edit(post_id) = self.mode.clone() else {
            return;
        };
        self.notification.dismiss();
        let Some(credential) = self.ctx.credential_or_redirect() else {
            return;
        };
        match self.ctx.api.delete_comment(&credential, comment_id).await {
            Ok(()) => {
                self.notification
                    .mutation_outcome(Mutation::DeleteComment, true);
                self.reload_comments(&post_id).await;
            }
            Err(err) => {
                warn!(comment_id = %comment_id, "comment delete failed: {err}");
                self.notification
                    .mutation_outcome(Mutation::DeleteComment, false);
            }
        }
    }

    async fn reload_post(&mut self, post_id: &PostId) -> ClientResult<()> {
        let post = self.ctx.api.get_post(post_id).await?;
        self.title = post.title.clone();
        self.content = post.content.clone();
        self.published = post.published;
        self.post = Some(post);
        self.phase = ViewPhase::Ready;
        Ok(())
    }

    async fn reload_comments(&mut self, post_id: &PostId) {
        match self.ctx.api.list_comments(post_id).await {
            Ok(comments) => {
                self.comments.resolve(comments);
                self.phase = ViewPhase::Ready;
            }
            Err(err) => {
                warn!(post_id = %post_id, "failed to load comments: {err}");
                self.phase = ViewPhase::Failed;
                self.notification.error(COMMENTS_LOAD_FAILED);
            }
        }
    }
}
