//! Database access layer
//!
//! Provides database queries for users, swipes, matches, and settings.

pub mod matches;
pub mod seed;
pub mod settings;
pub mod swipes;
pub mod users;
