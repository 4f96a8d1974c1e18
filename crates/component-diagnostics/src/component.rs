//! Component-level diagnostics.

use crate::{Diagnostic, DiagnosticCode, DiagnosticOptions};
use component_ir::Component;
use rustc_hash::FxHashSet;

/// Check a component declaration for issues.
pub fn check_component(component: &Component, _options: &DiagnosticOptions) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    diagnostics.extend(check_component_name(component.name.as_str()));
    diagnostics.extend(check_duplicate_members(component));

    diagnostics
}

/// Members are looked up by external name; a second member under the same
/// name can never be reached.
fn check_duplicate_members(component: &Component) -> Vec<Diagnostic> {
    let mut seen = FxHashSet::default();
    component
        .members
        .iter()
        .filter(|member| !seen.insert(member.external_name.as_str()))
        .map(|member| {
            Diagnostic::error(
                format!(
                    "Component '{}' declares '{}' more than once",
                    component.name, member.external_name
                ),
                DiagnosticCode::DuplicateMember,
            )
            .with_subject(member.external_name.name.clone())
        })
        .collect()
}

/// Check if a component name follows conventions.
pub fn check_component_name(name: &str) -> Option<Diagnostic> {
    let Some(first_char) = name.chars().next() else {
        return Some(Diagnostic::warning(
            "Component name should not be empty",
            DiagnosticCode::InvalidComponentName,
        ));
    };

    // JSX treats lowercase tags as intrinsic elements.
    if !first_char.is_uppercase() {
        return Some(
            Diagnostic::warning(
                format!("Component name '{}' should be in PascalCase", name),
                DiagnosticCode::InvalidComponentName,
            )
            .with_subject(name),
        );
    }

    if is_reserved_name(name) {
        return Some(
            Diagnostic::error(
                format!(
                    "'{}' is a reserved name and cannot be used as a component name",
                    name
                ),
                DiagnosticCode::InvalidComponentName,
            )
            .with_subject(name),
        );
    }

    None
}

/// Names the generated code declares for every component.
fn is_reserved_name(name: &str) -> bool {
    matches!(
        name,
        "Component" | "Fragment" | "Slot" | "Template" | "Event" | "OneWay" | "TwoWay"
    )
}
