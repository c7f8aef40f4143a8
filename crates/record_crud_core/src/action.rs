use std::fmt;
use std::str::FromStr;

use crate::error::CrudError;

/// Canonical operation a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Unconditional write; overwrites an existing record with the same key.
    Create,
    /// Write only when no record exists under the key.
    Insert,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Insert => "insert",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    pub fn from_method(method: &str) -> Result<Self, CrudError> {
        match method.trim().to_ascii_uppercase().as_str() {
            "POST" => Ok(Self::Create),
            "GET" => Ok(Self::Read),
            "PUT" | "PATCH" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(CrudError::UnsupportedAction(format!(
                "Unsupported HTTP method '{method}'"
            ))),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = CrudError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "create" | "upsert" => Ok(Self::Create),
            "insert" | "create_if_absent" => Ok(Self::Insert),
            "get" | "read" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            _ => Err(CrudError::UnsupportedAction(format!(
                "Unsupported action '{raw}' (expected create, upsert, insert, get, read, update, or delete)"
            ))),
        }
    }
}

/// Resolves the operation for a request.
///
/// A non-blank explicit action always wins over the HTTP method. Anything that maps to
/// no operation is rejected rather than treated as a no-op.
pub fn resolve_action(explicit: Option<&str>, method: Option<&str>) -> Result<Action, CrudError> {
    if let Some(raw) = explicit.filter(|raw| !raw.trim().is_empty()) {
        return raw.parse();
    }

    match method {
        Some(method) => Action::from_method(method),
        None => Err(CrudError::UnsupportedAction(
            "Request carries neither an action nor an HTTP method".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_action_is_case_insensitive_and_beats_method() {
        assert_eq!(resolve_action(Some("GeT"), Some("POST")), Ok(Action::Read));
        assert_eq!(resolve_action(Some("DELETE"), Some("GET")), Ok(Action::Delete));
    }

    #[test]
    fn blank_explicit_action_falls_back_to_method() {
        assert_eq!(resolve_action(Some(" "), Some("PUT")), Ok(Action::Update));
    }

    #[test]
    fn methods_map_to_actions() {
        assert_eq!(resolve_action(None, Some("POST")), Ok(Action::Create));
        assert_eq!(resolve_action(None, Some("get")), Ok(Action::Read));
        assert_eq!(resolve_action(None, Some("PUT")), Ok(Action::Update));
        assert_eq!(resolve_action(None, Some("PATCH")), Ok(Action::Update));
        assert_eq!(resolve_action(None, Some("DELETE")), Ok(Action::Delete));
    }

    #[test]
    fn create_and_insert_are_distinct() {
        assert_eq!("upsert".parse::<Action>(), Ok(Action::Create));
        assert_eq!("create_if_absent".parse::<Action>(), Ok(Action::Insert));
        assert_ne!(Action::Create, Action::Insert);
    }

    #[test]
    fn unknown_action_fails_closed() {
        let error = resolve_action(Some("archive"), Some("GET")).expect_err("should reject");
        assert!(matches!(error, CrudError::UnsupportedAction(_)));
        assert!(error.to_string().contains("archive"));
    }

    #[test]
    fn unroutable_method_fails_closed() {
        assert!(matches!(
            resolve_action(None, Some("OPTIONS")),
            Err(CrudError::UnsupportedAction(_))
        ));
        assert!(matches!(
            resolve_action(None, None),
            Err(CrudError::UnsupportedAction(_))
        ));
    }
}
