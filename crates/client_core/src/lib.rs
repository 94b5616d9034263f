//! Session and data-synchronization layer of the blog admin client.
//!
//! Controllers never patch their cached collections: every successful
//! mutation is followed by a re-fetch from the backend.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
pub mod navigation;
pub mod router;
pub mod session;
pub mod slot;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{BlogApi, HttpBlogApi};
pub use config::{load_settings, ClientSettings};
pub use error::{ClientError, ClientResult, Mutation};
pub use navigation::{Navigator, Route, ScheduledNavigation};
pub use router::{ActiveView, Router};
pub use session::{Credential, SessionStore};
pub use slot::{Slot, SlotList};
