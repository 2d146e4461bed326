//! # Position Gateway
//!
//! Relays the upstream vehicle positions API through a single same-origin
//! endpoint so the API key never reaches the browser.

mod error;
mod handler;
mod upstream;

pub use realtime::{Config, ErrorBody, HttpRequest};

pub use self::error::*;
pub use self::handler::*;
pub use self::upstream::*;

/// Provider entry point implemented by the host application.
pub trait Provider: HttpRequest {}

impl<T: HttpRequest> Provider for T {}
