//! Routes console commands to the router and the active controller.

use client_core::{ActiveView, Route, Router};

use crate::commands::{ConsoleCommand, HELP};

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The command did nothing; show this line to the user.
    Hint(&'static str),
    Quit,
}

pub async fn dispatch(router: &mut Router, command: ConsoleCommand) -> Outcome {
    let command_name = command_name(&command);
    tracing::debug!(command = command_name, route = %router.route(), "dispatching console command");

    match command {
        ConsoleCommand::Open(path) => {
            router.navigate(&path).await;
        }
        ConsoleCommand::Login { username, password } => {
            if !matches!(router.view(), ActiveView::Login(_)) {
                router.open(Route::Login).await;
            }
            if let ActiveView::Login(view) = router.view_mut() {
                view.username = username;
                view.password = password;
                view.submit().await;
            }
        }
        ConsoleCommand::New => match router.view() {
            ActiveView::Posts(view) => view.create_post(),
            _ => {
                router.open(Route::CreatePost).await;
            }
        },
        ConsoleCommand::Edit(post_id) => match router.view() {
            ActiveView::Posts(view) => view.edit_post(&post_id),
            _ => {
                router.open(Route::EditPost(post_id)).await;
            }
        },
        ConsoleCommand::Delete(post_id) => match router.view_mut() {
            ActiveView::Posts(view) => view.delete_post(&post_id).await,
            _ => return Outcome::Hint("'delete' is only available on /posts"),
        },
        ConsoleCommand::Refresh => {
            let route = router.route().clone();
            router.open(route).await;
        }
        ConsoleCommand::Title(title) => match router.view_mut() {
            ActiveView::Form(view) => view.title = title,
            _ => return Outcome::Hint("'title' is only available on a post form"),
        },
        ConsoleCommand::Content(content) => match router.view_mut() {
            ActiveView::Form(view) => view.content = content,
            _ => return Outcome::Hint("'content' is only available on a post form"),
        },
        ConsoleCommand::TogglePublished => match router.view_mut() {
            ActiveView::Form(view) => view.toggle_published(),
            _ => return Outcome::Hint("'publish' is only available on a post form"),
        },
        ConsoleCommand::Submit => match router.view_mut() {
            ActiveView::Form(view) => view.submit().await,
            _ => return Outcome::Hint("'submit' is only available on a post form"),
        },
        ConsoleCommand::DeleteComment(comment_id) => match router.view_mut() {
            ActiveView::Form(view) if view.post().is_some() => {
                view.delete_comment(&comment_id).await
            }
            _ => return Outcome::Hint("'delete-comment' is only available when editing a post"),
        },
        ConsoleCommand::Help => return Outcome::Hint(HELP),
        ConsoleCommand::Quit => return Outcome::Quit,
    }

    router.process_queued().await;
    Outcome::Continue
}

fn command_name(command: &ConsoleCommand) -> &'static str {
    match command {
        ConsoleCommand::Open(_) => "open",
        ConsoleCommand::Login { .. } => "login",
        ConsoleCommand::New => "new",
        ConsoleCommand::Edit(_) => "edit",
        ConsoleCommand::Delete(_) => "delete",
        ConsoleCommand::Refresh => "refresh",
        ConsoleCommand::Title(_) => "title",
        ConsoleCommand::Content(_) => "content",
        ConsoleCommand::TogglePublished => "publish",
        ConsoleCommand::Submit => "submit",
        ConsoleCommand::DeleteComment(_) => "delete_comment",
        ConsoleCommand::Help => "help",
        ConsoleCommand::Quit => "quit",
    }
}
