//! Controller layer: per-view state machines that call the resource client
//! and refresh themselves from its responses.

use std::sync::Arc;

use tracing::warn;

use crate::{
    api::BlogApi,
    config::ClientSettings,
    navigation::{Navigator, Route},
    session::{Credential, SessionStore},
};

pub mod listing;
pub mod login;
pub mod post_form;
pub mod state;

pub use listing::PostListController;
pub use login::LoginController;
pub use post_form::{FormMode, PostFormController};
pub use state::{Notification, ViewPhase};

/// Everything a controller needs from the application root.
#[derive(Clone)]
pub struct ViewContext {
    pub api: Arc<dyn BlogApi>,
    pub session: SessionStore,
    pub navigator: Navigator,
    pub settings: ClientSettings,
}

impl ViewContext {
    /// Current credential, or a redirect to the login route when there is none.
    fn credential_or_redirect(&self) -> Option<Credential> {
        match self.session.require_credential() {
            Ok(credential) => Some(credential),
            Err(err) => {
                warn!(%err, "protected view used without a credential; redirecting to login");
                self.navigator.redirect(Route::Login);
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/controller_tests.rs"]
mod tests;
