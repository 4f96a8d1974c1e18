//! Render function diagnostics.

use crate::{Diagnostic, DiagnosticCode, DiagnosticOptions};
use component_ir::{
    BaseFunction, BindingName, BindingPattern, Component, FunctionBody, Identifier, Statement,
};
use rustc_hash::FxHashSet;

/// Key of the props object inside a destructured component parameter.
const PROPS: &str = "props";

/// Check a render function for issues.
pub fn check_render_function(
    function: &BaseFunction,
    component: Option<&Component>,
    options: &DiagnosticOptions,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if let FunctionBody::Block(block) = function.body() {
        check_returns(function, &block.statements, options, &mut diagnostics);
        check_shadowed_globals(&block.statements, options, &mut diagnostics);
    }

    for parameter in function.parameters() {
        if let BindingName::Pattern(pattern) = &parameter.name {
            check_pattern(pattern, options, &mut diagnostics);
        }
    }

    if let (Some(component), Some(parameter)) = (component, function.first_parameter()) {
        if options.check_unknown_props {
            if let Some(props) = parameter.name.as_pattern().and_then(props_pattern) {
                check_props(props, component, &mut diagnostics);
            }
        }
    }

    diagnostics
}

/// Only the first `return` is rendered.
fn check_returns(
    function: &BaseFunction,
    statements: &[Statement],
    options: &DiagnosticOptions,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let mut returns = statements.iter().filter_map(|statement| match statement {
        Statement::Return(value) => Some(value),
        _ => None,
    });
    let name = function.name().map(Identifier::as_str).unwrap_or("<anonymous>");

    match returns.next() {
        Some(Some(_)) => {}
        Some(None) | None if options.check_missing_template => {
            diagnostics.push(
                Diagnostic::hint(
                    format!("Function '{}' does not return a template", name),
                    DiagnosticCode::MissingTemplate,
                )
                .with_subject(name),
            );
        }
        Some(None) | None => {}
    }

    for _ in returns {
        diagnostics.push(
            Diagnostic::warning(
                format!("Only the first return of '{}' is rendered", name),
                DiagnosticCode::IgnoredReturn,
            )
            .with_subject(name),
        );
    }
}

fn check_shadowed_globals(
    statements: &[Statement],
    options: &DiagnosticOptions,
    diagnostics: &mut Vec<Diagnostic>,
) {
    if options.globals.is_empty() {
        return;
    }
    for statement in statements {
        let Statement::Variable(variable) = statement else {
            continue;
        };
        for name in variable.declaration_list.bound_names() {
            if options.globals.contains(&name) {
                diagnostics.push(
                    Diagnostic::hint(
                        format!("Local '{}' hides a global of the same name", name),
                        DiagnosticCode::ShadowedGlobal,
                    )
                    .with_subject(name),
                );
            }
        }
    }
}

/// Resolution maps every bound name once and walks nesting recursively.
fn check_pattern(
    pattern: &BindingPattern,
    options: &DiagnosticOptions,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let depth = pattern.depth();
    if depth > options.max_pattern_depth {
        diagnostics.push(Diagnostic::error(
            format!(
                "Binding pattern is nested {} levels deep; at most {} are supported",
                depth, options.max_pattern_depth
            ),
            DiagnosticCode::PatternTooDeep,
        ));
    }

    let mut seen = FxHashSet::default();
    for name in pattern.bound_names() {
        if !seen.insert(name.clone()) {
            diagnostics.push(
                Diagnostic::error(
                    format!("'{}' is bound more than once", name),
                    DiagnosticCode::DuplicateBinding,
                )
                .with_subject(name),
            );
        }
    }
}

fn props_pattern(pattern: &BindingPattern) -> Option<&BindingPattern> {
    pattern
        .elements
        .iter()
        .find(|element| element.property_name.as_ref().map(Identifier::as_str) == Some(PROPS))
        .and_then(|element| element.name.as_pattern())
}

fn check_props(props: &BindingPattern, component: &Component, diagnostics: &mut Vec<Diagnostic>) {
    for element in props.elements.iter().filter(|element| !element.dot_dot_dot) {
        let Some(key) = element.key() else {
            continue;
        };
        if component.member(key.as_str()).is_none() {
            diagnostics.push(
                Diagnostic::hint(
                    format!("'{}' is not a member of component '{}'", key, component.name),
                    DiagnosticCode::UnknownProp,
                )
                .with_subject(key.name.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use component_ir::{
        BindingElement, Block, Expression, Parameter, Property, TypeExpression, VariableStatement,
    };
    use pretty_assertions::assert_eq;

    fn codes(diagnostics: &[Diagnostic]) -> Vec<DiagnosticCode> {
        diagnostics.iter().map(|d| d.code).collect()
    }

    fn view(parameters: Vec<Parameter>, statements: Vec<Statement>) -> BaseFunction {
        BaseFunction::declaration("view", parameters, Block::new(statements))
    }

    fn destructured(elements: Vec<BindingElement>) -> Parameter {
        Parameter::new(BindingName::Pattern(BindingPattern::object(elements)))
            .with_type(TypeExpression::reference("Widget"))
    }

    fn ret() -> Statement {
        Statement::Return(Some(Expression::ident("markup")))
    }

    #[test]
    fn test_missing_template() {
        let options = DiagnosticOptions::default();
        let diagnostics = check_render_function(&view(Vec::new(), Vec::new()), None, &options);
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::MissingTemplate]);
        assert_eq!(diagnostics[0].severity, Severity::Hint);

        let bare = view(Vec::new(), vec![Statement::Return(None)]);
        assert_eq!(
            codes(&check_render_function(&bare, None, &options)),
            vec![DiagnosticCode::MissingTemplate]
        );

        let quiet = DiagnosticOptions {
            check_missing_template: false,
            ..DiagnosticOptions::default()
        };
        assert!(check_render_function(&bare, None, &quiet).is_empty());
    }

    #[test]
    fn test_ignored_returns() {
        let function = view(Vec::new(), vec![ret(), ret(), ret()]);
        let diagnostics = check_render_function(&function, None, &DiagnosticOptions::default());
        assert_eq!(
            codes(&diagnostics),
            vec![DiagnosticCode::IgnoredReturn, DiagnosticCode::IgnoredReturn]
        );
    }

    #[test]
    fn test_duplicate_binding() {
        let function = view(
            vec![destructured(vec![
                BindingElement::new("text"),
                BindingElement::aliased("label", "text"),
            ])],
            vec![ret()],
        );
        let diagnostics = check_render_function(&function, None, &DiagnosticOptions::default());
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::DuplicateBinding]);
        assert_eq!(diagnostics[0].subject.as_deref(), Some("text"));
    }

    #[test]
    fn test_pattern_too_deep() {
        let mut pattern = BindingPattern::object(vec![BindingElement::new("leaf")]);
        for level in 0..4 {
            pattern = BindingPattern::object(vec![BindingElement::nested(
                format!("level{}", level),
                pattern,
            )]);
        }
        let function = view(vec![Parameter::new(BindingName::Pattern(pattern))], vec![ret()]);
        let options = DiagnosticOptions {
            max_pattern_depth: 3,
            ..DiagnosticOptions::default()
        };
        let diagnostics = check_render_function(&function, None, &options);
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::PatternTooDeep]);
        insta::assert_snapshot!(
            diagnostics[0].to_string(),
            @"error[pattern-too-deep]: Binding pattern is nested 5 levels deep; at most 3 are supported"
        );
    }

    #[test]
    fn test_unknown_props() {
        let component = Component::new("Widget")
            .with_member(Property::prop("text"))
            .with_member(Property::slot("defaultContent").with_external_name("content"));
        let function = view(
            vec![destructured(vec![BindingElement::nested(
                PROPS,
                BindingPattern::object(vec![
                    BindingElement::new("text"),
                    BindingElement::aliased("content", "body"),
                    BindingElement::new("missing"),
                    BindingElement::rest("rest"),
                ]),
            )])],
            vec![ret()],
        );
        let diagnostics =
            check_render_function(&function, Some(&component), &DiagnosticOptions::default());
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::UnknownProp]);
        assert_eq!(diagnostics[0].subject.as_deref(), Some("missing"));
    }

    #[test]
    fn test_shadowed_global() {
        let function = view(
            Vec::new(),
            vec![
                Statement::Variable(VariableStatement::constant(
                    BindingName::ident("theme"),
                    Expression::string("dark"),
                )),
                ret(),
            ],
        );
        let options = DiagnosticOptions {
            globals: vec!["theme".into()],
            ..DiagnosticOptions::default()
        };
        let diagnostics = check_render_function(&function, None, &options);
        assert_eq!(codes(&diagnostics), vec![DiagnosticCode::ShadowedGlobal]);
        assert!(check_render_function(&function, None, &DiagnosticOptions::default()).is_empty());
    }
}
