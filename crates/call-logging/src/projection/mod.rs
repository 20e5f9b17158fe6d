//! Selective rendering of structured values.
//!
//! Dotted field paths (`"user.profile.name"`, `"items.0.secret"`) are folded
//! into a [`PathTree`], which then drives one of two projections over a
//! `serde_json::Value`:
//!
//! - [`project`]: keep only the fields the tree reaches
//! - [`exclude`]: drop the fields named by the tree's leaves
//!
//! [`format_for_log`] combines both with the rendering rules used in log
//! lines.
//!
//! # Example
//!
//! ```rust
//! use call_logging::{FieldFilter, format_for_log};
//! use serde_json::json;
//!
//! let user = json!({"name": "Alice", "password": "hunter2"});
//! let filter = FieldFilter::exclude(["password"]);
//! assert_eq!(format_for_log(Some(&user), Some(&filter)), r#"{"name":"Alice"}"#);
//! ```

mod engine;
mod format;
mod tree;

pub use engine::{exclude, project};
pub use format::{FieldFilter, format_for_log, resolve_path};
pub use tree::{PathNode, PathTree};
