use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    api::BlogApi,
    config::ClientSettings,
    controller::{
        FormMode, LoginController, Notification, PostFormController, PostListController,
        ViewContext,
    },
    navigation::{Navigator, Route},
    session::SessionStore,
};

pub enum ActiveView {
    Login(LoginController),
    Posts(PostListController),
    Form(PostFormController),
}

impl ActiveView {
    pub fn notification_mut(&mut self) -> Option<&mut Notification> {
        match self {
            Self::Login(_) => None,
            Self::Posts(view) => Some(&mut view.notification),
            Self::Form(view) => Some(&mut view.notification),
        }
    }

    async fn load(&mut self) {
        match self {
            Self::Login(_) => {}
            Self::Posts(view) => view.refresh().await,
            Self::Form(view) => view.load().await,
        }
    }
}

/// Maps routes to controllers and owns the navigation queue that
/// controllers post redirects and delayed navigations to.
pub struct Router {
    ctx: ViewContext,
    queue: mpsc::UnboundedReceiver<Route>,
    route: Route,
    view: ActiveView,
}

impl Router {
    pub fn new(api: Arc<dyn BlogApi>, session: SessionStore, settings: ClientSettings) -> Self {
        let (navigator, queue) = Navigator::channel();
        let ctx = ViewContext {
            api,
            session,
            navigator,
            settings,
        };
        let view = ActiveView::Login(LoginController::new(ctx.clone()));
        Self {
            ctx,
            queue,
            route: Route::Login,
            view,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.ctx.session
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.ctx.settings
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn view(&self) -> &ActiveView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ActiveView {
        &mut self.view
    }

    /// Applies the credential gate: protected routes resolve to login while
    /// the session is empty.
    pub fn resolve(&self, route: Route) -> Route {
        if route.requires_credential() && !self.ctx.session.is_authenticated() {
            info!(requested = %route, "no credential; redirecting to login");
            return Route::Login;
        }
        route
    }

    pub async fn navigate(&mut self, path: &str) -> &Route {
        self.open(Route::parse(path)).await
    }

    /// Tears down the current view (cancelling any navigation it scheduled),
    /// mounts the controller for `route` and runs its initial load.
    pub async fn open(&mut self, route: Route) -> &Route {
        let route = self.resolve(route);
        debug!(%route, "opening route");

        let ctx = self.ctx.clone();
        self.view = match &route {
            Route::Login => ActiveView::Login(LoginController::new(ctx)),
            Route::Posts => ActiveView::Posts(PostListController::new(ctx)),
            Route::CreatePost => ActiveView::Form(PostFormController::new(ctx, FormMode::Create)),
            Route::EditPost(post_id) => ActiveView::Form(PostFormController::new(
                ctx,
                FormMode::Edit(post_id.clone()),
            )),
        };
        self.route = route;
        self.view.load().await;
        &self.route
    }

    /// Opens every navigation already queued, returning how many ran.
    pub async fn process_queued(&mut self) -> usize {
        let mut opened = 0;
        while let Ok(route) = self.queue.try_recv() {
            self.open(route).await;
            opened += 1;
        }
        opened
    }

    /// Waits for the next redirect or delayed navigation to be queued.
    pub async fn next_navigation(&mut self) -> Option<Route> {
        self.queue.recv().await
    }
}

#[cfg(test)]
#[path = "tests/router_tests.rs"]
mod tests;
