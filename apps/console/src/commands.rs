//! Typed console commands parsed from stdin lines.

use shared::domain::{CommentId, PostId};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  open <path>              open /, /posts, /posts/create-post or /posts/<id>
  login <user> <password>  sign in from the login view
  new                      open the create form
  edit <post-id>           open the edit form for a post
  delete <post-id>         delete a post from the listing
  refresh                  re-fetch the current view
  title <text>             set the form title
  content <text>           set the form body
  publish                  toggle the form's published flag
  submit                   create or update the post
  delete-comment <id>      delete a comment on the edited post
  help                     show this text
  quit                     exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Open(String),
    Login { username: String, password: String },
    New,
    Edit(PostId),
    Delete(PostId),
    Refresh,
    Title(String),
    Content(String),
    TogglePublished,
    Submit,
    DeleteComment(CommentId),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("unknown command '{0}'; type 'help'")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

pub fn parse(line: &str) -> Result<ConsoleCommand, ParseError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "" => return Err(ParseError::Empty),
        "open" => ConsoleCommand::Open(required(rest, "open <path>")?.to_string()),
        "login" => {
            let mut parts = rest.split_whitespace();
            match (parts.next(), parts.next(), parts.next()) {
                (Some(username), Some(password), None) => ConsoleCommand::Login {
                    username: username.to_string(),
                    password: password.to_string(),
                },
                _ => return Err(ParseError::Usage("login <user> <password>")),
            }
        }
        "new" => ConsoleCommand::New,
        "edit" => ConsoleCommand::Edit(PostId::new(required(rest, "edit <post-id>")?)),
        "delete" => ConsoleCommand::Delete(PostId::new(required(rest, "delete <post-id>")?)),
        "refresh" => ConsoleCommand::Refresh,
        "title" => ConsoleCommand::Title(rest.to_string()),
        "content" => ConsoleCommand::Content(rest.to_string()),
        "publish" => ConsoleCommand::TogglePublished,
        "submit" => ConsoleCommand::Submit,
        "delete-comment" => ConsoleCommand::DeleteComment(CommentId::new(required(
            rest,
            "delete-comment <comment-id>",
        )?)),
        "help" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(command)
}

fn required<'a>(arg: &'a str, usage: &'static str) -> Result<&'a str, ParseError> {
    if arg.is_empty() {
        Err(ParseError::Usage(usage))
    } else {
        Ok(arg)
    }
}
