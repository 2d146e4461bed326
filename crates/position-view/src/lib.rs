//! # Position View
//!
//! Turns raw position records into a filtered, sorted, display-ready table
//! plus an average speed summary.
//!
//! Every step is a pure function of the record collection and the current
//! filter and sort settings, so it can be recomputed on each query. The
//! [`Dashboard`] ties those steps to the fetch cycle.

mod dashboard;
mod display;
mod filter;
mod position;
mod sort;
mod source;
mod summary;
mod table;

pub mod timestamp;

pub use realtime::{Error, HttpRequest};

pub use self::dashboard::*;
pub use self::display::*;
pub use self::filter::*;
pub use self::position::*;
pub use self::sort::*;
pub use self::source::*;
pub use self::summary::*;
pub use self::table::*;
