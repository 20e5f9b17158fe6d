//! Scoped loggers and correlation across call chains.
//!
//! A [`ScopedLogger`] tags every line with the chain's correlation id and
//! the path of scope labels leading to the current call. Chains start at a
//! root (a fresh id, a request's id, or an id received from another
//! process) and grow one label per nested call.
//!
//! ```text
//! RequestScope (id a1b2c3d4e5f6)
//!   ├── AuthGuard                       [a1b2c3d4e5f6] AuthGuard: ...
//!   └── UserController::/users[GET]     [a1b2c3d4e5f6] UserController::/users[GET]: ...
//!         └── UserService.list          [a1b2c3d4e5f6] UserController::/users[GET] -> UserService.list: ...
//! ```

mod request;
mod scoped;

pub use request::{InvocationContext, RequestScope, ScopeSource};
pub use scoped::{ActiveLogger, ScopeRecord, ScopedLogger};
