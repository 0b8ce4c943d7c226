//! Feature scopes: conditional-compilation blocks shared by every module.

use crate::{Error, Result};

/// Marker closing a feature block.
pub const CLOSE_MARKER: &str = "#endif\n";

/// Marker opening a feature block for `guard`.
pub fn open_marker(guard: &str) -> String {
    format!("#ifdef {}\n", guard)
}

/// Stack of open feature guards.
///
/// A single stack serves all modules, which is what keeps their guard
/// nesting identical.
#[derive(Debug, Clone, Default)]
pub struct FeatureScope {
    guards: Vec<String>,
}

impl FeatureScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, guard: impl Into<String>) {
        self.guards.push(guard.into());
    }

    pub fn pop(&mut self) -> Result<String> {
        self.guards
            .pop()
            .ok_or_else(|| Box::new(Error::EmptyFeatureScope))
    }

    /// Innermost open guard.
    pub fn current(&self) -> Option<&str> {
        self.guards.last().map(String::as_str)
    }

    pub fn depth(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Fail if any guard is still open at a file boundary.
    pub fn ensure_empty(&self, stage: &'static str) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Box::new(Error::UnbalancedFeatures {
                stage,
                open: self.guards.clone(),
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_nesting() {
        let mut scope = FeatureScope::new();
        scope.push("VK_VERSION_1_0");
        scope.push("VK_KHR_surface");

        assert_eq!(scope.depth(), 2);
        assert_eq!(scope.current(), Some("VK_KHR_surface"));
        assert_eq!(scope.pop().unwrap(), "VK_KHR_surface");
        assert_eq!(scope.pop().unwrap(), "VK_VERSION_1_0");
        assert!(scope.is_empty());
    }

    #[test]
    fn test_pop_empty_fails() {
        let mut scope = FeatureScope::new();
        assert!(matches!(*scope.pop().unwrap_err(), Error::EmptyFeatureScope));
    }

    #[test]
    fn test_ensure_empty_reports_open_guards() {
        let mut scope = FeatureScope::new();
        scope.ensure_empty("end_file").unwrap();

        scope.push("X");
        let err = scope.ensure_empty("end_file").unwrap_err();
        assert_eq!(err.to_string(), "end_file reached with open features: X");
    }

    #[test]
    fn test_markers() {
        assert_eq!(open_marker("VK_VERSION_1_1"), "#ifdef VK_VERSION_1_1\n");
        assert_eq!(CLOSE_MARKER, "#endif\n");
    }
}
