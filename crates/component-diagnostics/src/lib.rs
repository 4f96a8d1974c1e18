//! Diagnostics for component definition files.
//!
//! Resolution itself never fails: a render function without a template or a
//! destructured name without a member are valid inputs. This crate reports
//! those situations, and input trees that resolution assumes never occur,
//! as diagnostics:
//! - Component naming conventions
//! - Duplicate member names
//! - Missing templates and ignored returns
//! - Duplicate and over-nested destructured bindings
//! - Props bindings without a matching member

pub mod component;
pub mod template;

use component_ir::{BaseFunction, Component};
use smol_str::SmolStr;
use std::fmt;

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic message.
    pub message: String,
    /// The name the diagnostic is about, if any.
    pub subject: Option<SmolStr>,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic code.
    pub code: DiagnosticCode,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>, code: DiagnosticCode) -> Self {
        Self::new(message, Severity::Error, code)
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>, code: DiagnosticCode) -> Self {
        Self::new(message, Severity::Warning, code)
    }

    /// Create a new hint diagnostic.
    pub fn hint(message: impl Into<String>, code: DiagnosticCode) -> Self {
        Self::new(message, Severity::Hint, code)
    }

    fn new(message: impl Into<String>, severity: Severity, code: DiagnosticCode) -> Self {
        Self {
            message: message.into(),
            subject: None,
            severity,
            code,
        }
    }

    /// Attach the name this diagnostic is about.
    pub fn with_subject(mut self, subject: impl Into<SmolStr>) -> Self {
        self.subject = Some(subject.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity.as_str(), self.code.as_str(), self.message)
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The input violates an assumption of template resolution.
    Error,
    /// Resolution succeeds but likely not as intended.
    Warning,
    /// A hint for improvement.
    Hint,
}

impl Severity {
    /// Get the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Hint => "hint",
        }
    }
}

/// Diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // Component diagnostics
    /// Invalid component name.
    InvalidComponentName,
    /// Two members share an external name.
    DuplicateMember,

    // Render function diagnostics
    /// The function has nothing to render.
    MissingTemplate,
    /// A return after the first one, which is never used.
    IgnoredReturn,
    /// A name bound twice by one parameter pattern.
    DuplicateBinding,
    /// A binding pattern nested deeper than resolution supports.
    PatternTooDeep,
    /// A destructured props name with no matching member.
    UnknownProp,
    /// A local declaration hiding a global.
    ShadowedGlobal,
}

impl DiagnosticCode {
    /// Get the code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidComponentName => "invalid-component-name",
            Self::DuplicateMember => "duplicate-member",
            Self::MissingTemplate => "missing-template",
            Self::IgnoredReturn => "ignored-return",
            Self::DuplicateBinding => "duplicate-binding",
            Self::PatternTooDeep => "pattern-too-deep",
            Self::UnknownProp => "unknown-prop",
            Self::ShadowedGlobal => "shadowed-global",
        }
    }
}

/// Options for diagnostics.
#[derive(Debug, Clone)]
pub struct DiagnosticOptions {
    /// Report destructured props that match no member.
    pub check_unknown_props: bool,
    /// Report render functions without a template.
    pub check_missing_template: bool,
    /// Deepest binding pattern accepted.
    pub max_pattern_depth: usize,
    /// Names of compilation-wide globals.
    pub globals: Vec<SmolStr>,
}

impl Default for DiagnosticOptions {
    fn default() -> Self {
        Self {
            check_unknown_props: true,
            check_missing_template: true,
            max_pattern_depth: component_ir::binding::MAX_PATTERN_DEPTH,
            globals: Vec::new(),
        }
    }
}

/// Run diagnostics on a component declaration.
pub fn diagnose_component(component: &Component, options: &DiagnosticOptions) -> Vec<Diagnostic> {
    component::check_component(component, options)
}

/// Run diagnostics on a render function, optionally typed against
/// `component`.
pub fn diagnose_render_function(
    function: &BaseFunction,
    component: Option<&Component>,
    options: &DiagnosticOptions,
) -> Vec<Diagnostic> {
    template::check_render_function(function, component, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use component_ir::{Block, Expression, Property, Statement};

    #[test]
    fn test_diagnose_valid_component() {
        let component = Component::new("Button")
            .with_member(Property::prop("text"))
            .with_member(Property::slot("children"));
        assert!(diagnose_component(&component, &DiagnosticOptions::default()).is_empty());
    }

    #[test]
    fn test_diagnose_valid_render_function() {
        let function = BaseFunction::declaration(
            "view",
            Vec::new(),
            Block::new(vec![Statement::Return(Some(Expression::ident("markup")))]),
        );
        let diagnostics = diagnose_render_function(&function, None, &DiagnosticOptions::default());
        assert!(diagnostics.iter().all(|d| d.severity != Severity::Error));
    }

    #[test]
    fn test_display() {
        let diagnostic =
            Diagnostic::warning("only the first return is used", DiagnosticCode::IgnoredReturn)
                .with_subject("view");
        insta::assert_snapshot!(diagnostic.to_string(), @"warning[ignored-return]: only the first return is used");
    }
}
