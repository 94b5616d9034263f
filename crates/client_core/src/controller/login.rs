use tracing::{info, warn};

use super::{state::ViewPhase, ViewContext};
use crate::navigation::{Route, ScheduledNavigation};

pub const INVALID_LOGIN_HELP: &str = "Username or password incorrect";
pub const UNREACHABLE_HELP: &str = "Server unreachable; check the API URL and retry";

pub struct LoginController {
    ctx: ViewContext,
    pub username: String,
    pub password: String,
    phase: ViewPhase,
    fields_invalid: bool,
    helper_text: Option<&'static str>,
    pending_navigation: Option<ScheduledNavigation>,
}

impl LoginController {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            username: String::new(),
            password: String::new(),
            phase: ViewPhase::Idle,
            fields_invalid: false,
            helper_text: None,
            pending_navigation: None,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    /// Both inputs are flagged after the backend rejects the pair.
    pub fn fields_invalid(&self) -> bool {
        self.fields_invalid
    }

    pub fn helper_text(&self) -> Option<&'static str> {
        self.helper_text
    }

    pub fn pending_navigation(&self) -> Option<&ScheduledNavigation> {
        self.pending_navigation.as_ref()
    }

    /// Exchanges the typed credentials for a token. On success the token is
    /// stored in the session and the listing opens after the login delay.
    pub async fn submit(&mut self) {
        if self.phase.is_loading() {
            return;
        }
        self.phase = ViewPhase::Loading;
        self.fields_invalid = false;
        self.helper_text = None;

        match self.ctx.api.login(&self.username, &self.password).await {
            Ok(credential) => {
                self.ctx.session.set_credential(Some(credential));
                self.phase = ViewPhase::Ready;
                info!(username = %self.username, "signed in");
                self.pending_navigation = Some(
                    self.ctx
                        .navigator
                        .schedule(Route::Posts, self.ctx.settings.login_redirect_delay),
                );
            }
            Err(err) => {
                warn!(username = %self.username, "sign-in failed: {err}");
                self.phase = ViewPhase::Failed;
                if err.is_auth() {
                    self.fields_invalid = true;
                    self.helper_text = Some(INVALID_LOGIN_HELP);
                } else {
                    self.helper_text = Some(UNREACHABLE_HELP);
                }
            }
        }
    }
}
