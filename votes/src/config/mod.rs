//! Configuration module for the votes application.
//! Defines and manages application-wide settings and dependencies.
mod dependencies;

pub use dependencies::{DATABASE_URL_ENV, Dependencies};
