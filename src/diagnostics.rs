//! Diagnostics
//!
//! Non-fatal findings collected during assembly. Anything that must stop the
//! build is a [`SchemaError`](crate::error::SchemaError) instead.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Codes
// =============================================================================

/// Diagnostic code for categorizing findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// Two interfaces on one object declare the same field with different types
    InterfaceFieldConflict,
    /// Interface that no object implements
    UnimplementedInterface,
    /// Type not reachable from the query root
    UnreachableType,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InterfaceFieldConflict => "W001",
            Self::UnimplementedInterface => "W002",
            Self::UnreachableType => "I001",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::InterfaceFieldConflict | Self::UnimplementedInterface => Severity::Warning,
            Self::UnreachableType => Severity::Info,
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Severity
// =============================================================================

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

// =============================================================================
// Diagnostic Item
// =============================================================================

/// A single diagnostic item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticItem {
    /// Type the finding is about
    pub type_name: String,
    pub code: DiagnosticCode,
    pub message: String,
    /// Additional context (related types, field types)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<String>,
}

impl DiagnosticItem {
    pub fn new(type_name: impl Into<String>, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            code,
            message: message.into(),
            context: Vec::new(),
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn severity(&self) -> Severity {
        self.code.severity()
    }
}

impl fmt::Display for DiagnosticItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({})",
            self.code,
            self.code.severity(),
            self.message,
            self.type_name
        )?;

        for ctx in &self.context {
            write!(f, "\n  - {}", ctx)?;
        }

        Ok(())
    }
}

// =============================================================================
// Diagnostics Collection
// =============================================================================

/// Collection of diagnostics from assembly
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostics {
    items: Vec<DiagnosticItem>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: DiagnosticItem) {
        self.items.push(item);
    }

    /// Two interfaces disagree on a field's type for one implementing object
    pub fn interface_field_conflict(
        &mut self,
        object: &str,
        field: &str,
        first: (&str, &str),
        second: (&str, &str),
    ) {
        self.push(
            DiagnosticItem::new(
                object,
                DiagnosticCode::InterfaceFieldConflict,
                format!(
                    "Interfaces '{}' and '{}' declare field '{}' with different types",
                    first.0, second.0, field
                ),
            )
            .with_context(format!("{}.{}: {}", first.0, field, first.1))
            .with_context(format!("{}.{}: {}", second.0, field, second.1)),
        );
    }

    pub fn unimplemented_interface(&mut self, interface: &str) {
        self.push(DiagnosticItem::new(
            interface,
            DiagnosticCode::UnimplementedInterface,
            format!("Interface '{}' has no implementing object types", interface),
        ));
    }

    pub fn unreachable_type(&mut self, type_name: &str, root: &str) {
        self.push(DiagnosticItem::new(
            type_name,
            DiagnosticCode::UnreachableType,
            format!("Type '{}' is not reachable from root '{}'", type_name, root),
        ));
    }

    /// Items at or above `severity`
    pub fn at_least(&self, severity: Severity) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(move |i| i.severity() >= severity)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &DiagnosticItem> {
        self.items.iter().filter(|i| i.severity() == Severity::Warning)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings().next().is_some()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn all(&self) -> &[DiagnosticItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn merge(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    /// Format all diagnostics for display
    pub fn format_all(&self) -> String {
        let mut output = String::new();

        for item in &self.items {
            output.push_str(&format!("{}\n", item));
        }

        if !self.is_empty() {
            output.push_str(&format!(
                "\n{} warning(s), {} note(s)\n",
                self.warning_count(),
                self.len() - self.warning_count()
            ));
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_all())
    }
}

impl IntoIterator for Diagnostics {
    type Item = DiagnosticItem;
    type IntoIter = std::vec::IntoIter<DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a DiagnosticItem;
    type IntoIter = std::slice::Iter<'a, DiagnosticItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_severity() {
        assert_eq!(DiagnosticCode::InterfaceFieldConflict.severity(), Severity::Warning);
        assert_eq!(DiagnosticCode::UnreachableType.severity(), Severity::Info);
    }

    #[test]
    fn test_diagnostics_collection() {
        let mut diags = Diagnostics::new();
        diags.unimplemented_interface("Node");
        diags.unreachable_type("Orphan", "Query");

        assert_eq!(diags.len(), 2);
        assert_eq!(diags.warning_count(), 1);
        assert_eq!(diags.at_least(Severity::Info).count(), 2);
        assert!(diags.has_warnings());
    }

    #[test]
    fn test_conflict_formatting() {
        let mut diags = Diagnostics::new();
        diags.interface_field_conflict("Post", "id", ("Node", "ID!"), ("Legacy", "Int!"));

        let text = diags.to_string();
        assert!(text.contains("[W001] warning"));
        assert!(text.contains("Node.id: ID!"));
        assert!(text.contains("Legacy.id: Int!"));
        assert!(text.contains("1 warning(s), 0 note(s)"));
    }
}
