//! Call wrapping: entry, return and error lines around a callable.
//!
//! ```text
//!  caller ──► Interceptor::call ──► original(logger, args)
//!               │  HIT <KIND> id (route) WITH a=1
//!               │                     │
//!               │  ◄──────── Ok(v) ───┤
//!               │  RETURNED <KIND> id WITH <v per ReturnFormat>
//!               │  ◄──────── Err(e) ──┘
//!               │  ERROR WHILE <KIND> id: e
//! ```
//!
//! Metadata ([`LoggedMetadata`]) says what to render; a [`CallSite`] says
//! what is being called; a [`LoggedClass`] ties the members of one owner to
//! a single lazily created logger.

mod args;
mod class;
mod metadata;
mod returns;
mod site;
mod wrap;

pub use args::{CallArgs, to_log_value};
pub use class::{LoggedClass, MemberKind};
pub use metadata::{LoggedMetadata, LoggedOptions, LoggedParam, MetadataRegistry, MethodKey};
pub use returns::{ReturnField, ReturnFormat, ReturnFormatter, ReturnPredicate, ReturnRule};
pub use site::CallSite;
pub use wrap::{Interceptor, LoggedFn, wrap};
