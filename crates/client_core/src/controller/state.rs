//! View phases and the transient notification banner shared by all controllers.

use std::time::Duration;

use tokio::time::Instant;

use crate::error::Mutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPhase {
    /// Nothing requested yet (forms before their first submit).
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

impl ViewPhase {
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }

    pub fn has_error(self) -> bool {
        self == Self::Failed
    }

    pub fn has_data(self) -> bool {
        self == Self::Ready
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notification {
    pub visible: bool,
    pub message: String,
    pub is_error: bool,
    shown_at: Option<Instant>,
}

impl Notification {
    pub fn success(&mut self, message: impl Into<String>) {
        self.show(message.into(), false);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.show(message.into(), true);
    }

    pub fn mutation_outcome(&mut self, mutation: Mutation, succeeded: bool) {
        if succeeded {
            self.success(mutation.success_message());
        } else {
            self.error(mutation.failure_message());
        }
    }

    pub fn dismiss(&mut self) {
        self.visible = false;
        self.shown_at = None;
    }

    /// Hides the banner once it has been on screen for `ttl`.
    pub fn hide_if_expired(&mut self, ttl: Duration) {
        if let Some(shown_at) = self.shown_at {
            if shown_at.elapsed() >= ttl {
                self.dismiss();
            }
        }
    }

    fn show(&mut self, message: String, is_error: bool) {
        self.visible = true;
        self.message = message;
        self.is_error = is_error;
        self.shown_at = Some(Instant::now());
    }
}
