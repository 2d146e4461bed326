//! # Realtime Core
//!
//! Core modules shared by the positions gateway and view.

mod error;
mod provider;

pub use crate::error::*;
pub use crate::provider::*;
