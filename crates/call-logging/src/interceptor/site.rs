//! Call sites and the lines logged around them.

use std::fmt::Write as _;

use crate::types::{CallKind, ScopeLabel};

/// Identifies what is being wrapped.
///
/// | constructor        | identity         | route            | scope label            |
/// |--------------------|------------------|------------------|------------------------|
/// | `function("f")`    | `f`              |                  | `f`                    |
/// | `method("S", "m")` | `S.m`            |                  | `S.m`                  |
/// | `endpoint(...)`    | `C.m`            | `GET /users/:id` | `C::/users/:id[GET]`   |
/// | `handler(k, "G")`  | `G`              | from the request | `G`                    |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite {
    kind: CallKind,
    identity: String,
    route: Option<String>,
    label: ScopeLabel,
}

impl CallSite {
    /// Creates a site whose scope label is its identity.
    pub fn new(kind: CallKind, identity: impl Into<String>) -> Self {
        let identity = identity.into();
        Self {
            kind,
            label: ScopeLabel::Single(identity.clone()),
            identity,
            route: None,
        }
    }

    /// A free function.
    pub fn function(name: impl Into<String>) -> Self {
        Self::new(CallKind::Function, name)
    }

    /// A method of `owner`.
    pub fn method(owner: &str, member: &str) -> Self {
        Self::new(CallKind::Function, format!("{owner}.{member}"))
    }

    /// A route handler of `owner` serving `http_method path`.
    pub fn endpoint(owner: &str, member: &str, http_method: &str, path: &str) -> Self {
        let http_method = http_method.to_ascii_uppercase();
        Self::new(CallKind::Endpoint, format!("{owner}.{member}"))
            .with_route(format!("{http_method} {path}"))
            .with_label(format!("{owner}::{path}[{http_method}]"))
    }

    /// A guard, interceptor, middleware or exception filter named `owner`.
    pub fn handler(kind: CallKind, owner: impl Into<String>) -> Self {
        Self::new(kind, owner)
    }

    /// Sets the route rendered after the identity.
    pub fn with_route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    /// Sets the label this site appends to a scope path.
    pub fn with_label(mut self, label: impl Into<ScopeLabel>) -> Self {
        self.label = label.into();
        self
    }

    /// Returns the kind.
    pub fn kind(&self) -> CallKind {
        self.kind
    }

    /// Returns the identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Returns the site's own route.
    pub fn route(&self) -> Option<&str> {
        self.route.as_deref()
    }

    /// Returns the scope label.
    pub fn label(&self) -> &ScopeLabel {
        &self.label
    }

    fn head(&self, out: &mut String, route: Option<&str>) {
        let _ = write!(out, "{} {}", self.kind, self.identity);
        if let Some(route) = route {
            let _ = write!(out, " ({route})");
        }
    }

    /// `HIT <KIND> <identity> [(<route>)] [WITH <params>]`
    pub(crate) fn hit_line(&self, route: Option<&str>, params: Option<&str>) -> String {
        let mut line = String::from("HIT ");
        self.head(&mut line, route);
        with_clause(&mut line, params);
        line
    }

    /// `RETURNED <KIND> <identity> [(<route>)] [WITH <value>]`
    pub(crate) fn returned_line(&self, route: Option<&str>, value: Option<&str>) -> String {
        let mut line = String::from("RETURNED ");
        self.head(&mut line, route);
        with_clause(&mut line, value);
        line
    }

    /// `ERROR WHILE <KIND> <identity> [(<route>)]: <error>`
    pub(crate) fn error_line(&self, route: Option<&str>, error: &str) -> String {
        let mut line = String::from("ERROR WHILE ");
        self.head(&mut line, route);
        let _ = write!(line, ": {error}");
        line
    }
}

fn with_clause(line: &mut String, clause: Option<&str>) {
    if let Some(clause) = clause {
        let _ = write!(line, " WITH {clause}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_lines() {
        let site = CallSite::function("add");
        assert_eq!(site.hit_line(None, Some("a=5, b=x")), "HIT FUNCTION add WITH a=5, b=x");
        assert_eq!(site.returned_line(None, None), "RETURNED FUNCTION add");
        assert_eq!(site.error_line(None, "boom"), "ERROR WHILE FUNCTION add: boom");
    }

    #[test]
    fn test_endpoint_site() {
        let site = CallSite::endpoint("UserController", "find", "get", "/users/:id");
        assert_eq!(site.identity(), "UserController.find");
        assert_eq!(site.route(), Some("GET /users/:id"));
        assert_eq!(site.label().to_string(), "UserController::/users/:id[GET]");
        assert_eq!(
            site.hit_line(site.route(), Some("id=1")),
            "HIT ENDPOINT UserController.find (GET /users/:id) WITH id=1"
        );
    }

    #[test]
    fn test_handler_site() {
        let site = CallSite::handler(CallKind::ExceptionFilter, "HttpFilter");
        assert_eq!(
            site.error_line(Some("POST /x"), "bad"),
            "ERROR WHILE EXCEPTION FILTER HttpFilter (POST /x): bad"
        );
    }
}
