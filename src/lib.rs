//! Client core for the moodlog journaling service.
//!
//! The session lifecycle lives in [`auth`]: a [`SessionManager`] restores,
//! adopts, and drops the session token and publishes the result, and
//! [`AuthenticatedFetch`] stamps that token on every backend call.
//! [`domain::navigation`] turns session state into the screen stack to show,
//! and [`screens`] holds one headless controller per screen.
//!
//! [`SessionManager`]: auth::SessionManager
//! [`AuthenticatedFetch`]: auth::AuthenticatedFetch

pub mod adapters;
pub mod auth;
pub mod cli;
pub mod client;
pub mod config;
pub mod diary;
pub mod domain;
pub mod error;
pub mod models;
pub mod screens;
pub mod traits;

pub use client::MoodlogClient;
pub use config::ClientConfig;
pub use error::{MoodlogError, MoodlogResult};
