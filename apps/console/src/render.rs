//! Text rendering of the active view.

use std::fmt::Write as _;

use client_core::{
    controller::{LoginController, Notification, PostFormController, PostListController},
    ActiveView, Router, Slot,
};

const EXCERPT_CHARS: usize = 25;
const SKELETON: &str = "░░░░░░░░░░░░░░░░░░░░";

pub fn render(router: &mut Router) -> String {
    let ttl = router.settings().notification_ttl;
    if let Some(notification) = router.view_mut().notification_mut() {
        notification.hide_if_expired(ttl);
    }

    let mut out = String::new();
    let _ = writeln!(out, "\n--- {} ---", router.route());
    match router.view() {
        ActiveView::Login(view) => render_login(&mut out, view),
        ActiveView::Posts(view) => render_listing(&mut out, view),
        ActiveView::Form(view) => render_form(&mut out, view),
    }
    out
}

fn render_notification(out: &mut String, notification: &Notification) {
    if notification.visible {
        let tag = if notification.is_error { "error" } else { "ok" };
        let _ = writeln!(out, "[{tag}] {}", notification.message);
    }
}

fn render_login(out: &mut String, view: &LoginController) {
    let invalid = if view.fields_invalid() { " (!)" } else { "" };
    let _ = writeln!(out, "Log in");
    let _ = writeln!(out, "  Username{invalid}: {}", view.username);
    let _ = writeln!(
        out,
        "  Password{invalid}: {}",
        "*".repeat(view.password.chars().count())
    );
    if let Some(help) = view.helper_text() {
        let _ = writeln!(out, "  {help}");
    }
    if view.phase().is_loading() {
        let _ = writeln!(out, "  signing in...");
    } else if view.phase().has_data() {
        let _ = writeln!(out, "  signed in; opening posts...");
    }
}

fn render_listing(out: &mut String, view: &PostListController) {
    render_notification(out, &view.notification);
    let _ = writeln!(out, "All Blog Posts");
    let _ = writeln!(out, "  [new] Create a Post");
    if view.posts().is_empty() && !view.phase().is_loading() {
        let _ = writeln!(out, "  (no posts)");
    }
    for slot in view.posts().slots() {
        match slot {
            Slot::Pending => {
                let _ = writeln!(out, "  {SKELETON}");
            }
            Slot::Ready(post) => {
                let _ = writeln!(
                    out,
                    "  [{}] {}: {}...",
                    post.id,
                    post.title,
                    post.excerpt(EXCERPT_CHARS)
                );
            }
        }
    }
}

fn render_form(out: &mut String, view: &PostFormController) {
    render_notification(out, &view.notification);
    let _ = writeln!(out, "{}", view.heading());
    if view.phase().is_loading() {
        let _ = writeln!(out, "  loading...");
        return;
    }
    let _ = writeln!(out, "  Title: {}", view.title);
    let _ = writeln!(out, "  Body:  {}", view.content);
    let _ = writeln!(out, "  [{}]", view.published_label());
    let _ = writeln!(out, "  [submit] {}", view.submit_label());

    if view.post().is_none() {
        return;
    }
    let _ = writeln!(out, "Comments");
    if view.comments().is_empty() {
        let _ = writeln!(out, "  (no comments)");
    }
    for slot in view.comments().slots() {
        match slot {
            Slot::Pending => {
                let _ = writeln!(out, "  {SKELETON}");
            }
            Slot::Ready(comment) => {
                let _ = writeln!(
                    out,
                    "  [{}] {} <{}>: {}",
                    comment.id, comment.name, comment.email, comment.comment
                );
            }
        }
    }
}
