//! Shared, dependency-minimized core types used across Javelin.
//!
//! Everything here is a plain value type: text coordinates, dotted-name
//! helpers, the cooperative cancellation token and the recognized
//! configuration options. Higher layers (`javelin-syntax`, `javelin-vfs`,
//! `javelin-ide`) build on these without pulling in any IO.

pub mod cancel;
pub mod config;
pub mod name;
pub mod text;

pub use cancel::{CancelToken, Cancelled};
pub use config::AnalysisConfig;
pub use name::{last_name, matches_partial_name, most_name, Name};
pub use text::{LineIndex, Position, Range, TextRange};
