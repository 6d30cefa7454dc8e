//! # NetWith Common Library
//!
//! Shared code for the NetWith services including:
//! - Canonical profile types and the profile normalizer
//! - Event types (NetWithEvent enum) and the in-process event bus
//! - Database models and schema initialization
//! - Configuration loading
//! - Error types

pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod normalize;
pub mod profile;

pub use error::{Error, Result};
pub use profile::{ExperienceEntry, LookingFor, Profile, RawProfileRecord};
