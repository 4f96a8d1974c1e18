//! Template resolution.
//!
//! Resolving a render function finds the expression it returns and binds
//! every name that expression may use: the component instance, locals
//! declared in the function body, compilation-wide globals and names
//! destructured from the component parameter.

use crate::bindings::component_parameter;
use crate::helpers::{THIS, VIEW, VIEW_MODEL};
use component_ir::{
    merge_variables, BaseFunction, BindingName, Component, Expression, FunctionBody, JsxExpression,
    Statement, ToStringOptions, VariableExpressions,
};
use smol_str::SmolStr;
use tracing::{debug, trace};

/// Resolve the template returned by `function`.
///
/// When `options` is given it is updated in place with the component
/// context and the variable map the template must be rendered with.
/// `preserve_context` keeps a context chosen by the caller. Returns `None`
/// when the function has nothing to render; `options` is then untouched.
pub fn resolve_template(
    function: &BaseFunction,
    options: Option<&mut ToStringOptions>,
    preserve_context: bool,
    globals: Option<&VariableExpressions>,
) -> Option<JsxExpression> {
    let Some(terminal) = terminal_expression(function.body()) else {
        trace!(function = ?function.name().map(|n| n.as_str()), "no template");
        return None;
    };

    if let Some(options) = options {
        propagate_context(function, options, preserve_context, globals);
    }

    Some(JsxExpression::from_expression(terminal))
}

/// The expression a body renders: the value of the first `return` in a
/// block, or the body expression itself.
///
/// Later returns are ignored even when the first one is conditional.
pub fn terminal_expression(body: &FunctionBody) -> Option<&Expression> {
    match body {
        FunctionBody::Expression(expression) => Some(expression.as_ref()),
        FunctionBody::Block(block) => block
            .statements
            .iter()
            .find(|statement| statement.is_return())
            .and_then(|statement| match statement {
                Statement::Return(value) => value.as_ref(),
                _ => None,
            }),
    }
}

fn propagate_context(
    function: &BaseFunction,
    options: &mut ToStringOptions,
    preserve_context: bool,
    globals: Option<&VariableExpressions>,
) {
    let parameter = component_parameter(function, options).map(|p| p.name.clone());

    // Context selection.
    match &parameter {
        Some(BindingName::Identifier(identifier)) if !preserve_context => {
            options.component_context = identifier.name.clone();
        }
        Some(BindingName::Pattern(_)) if !preserve_context || options.component_context.is_empty() => {
            options.component_context = SmolStr::new(THIS);
        }
        _ => {}
    }
    trace!(context = %options.component_context, "selected component context");

    // Locals override globals, which override variables already present.
    let mut variables = std::mem::take(&mut options.variables);
    if let Some(globals) = globals {
        merge_variables(&mut variables, globals.clone());
    }
    if let FunctionBody::Block(block) = function.body() {
        for statement in &block.statements {
            if let Statement::Variable(variable) = statement {
                merge_variables(&mut variables, variable.declaration_list.variable_expressions());
            }
        }
    }

    // Destructured parameter bindings are the most specific of all.
    if let Some(BindingName::Pattern(pattern)) = &parameter {
        let base = Expression::simple(options.component_context.as_str());
        merge_variables(&mut variables, pattern.variable_expressions(Some(&base)));
        options.component_context = SmolStr::default();
    }

    debug!(
        function = ?function.name().map(|n| n.as_str()),
        variables = variables.len(),
        context = %options.component_context,
        "resolved template context"
    );
    options.variables = variables;
}

/// The view function of `component` among `functions`: the one named by the
/// component's `view`, or a function named `view` when none is declared.
pub fn find_view_function<'a>(
    component: &Component,
    functions: &'a [BaseFunction],
) -> Option<&'a BaseFunction> {
    let name = component.view.as_ref().map_or(VIEW, |view| view.as_str());
    find_function(functions, name)
}

/// The view-model function of `component` among `functions`.
pub fn find_view_model_function<'a>(
    component: &Component,
    functions: &'a [BaseFunction],
) -> Option<&'a BaseFunction> {
    let name = component
        .view_model
        .as_ref()
        .map_or(VIEW_MODEL, |view_model| view_model.as_str());
    find_function(functions, name)
}

fn find_function<'a>(functions: &'a [BaseFunction], name: &str) -> Option<&'a BaseFunction> {
    functions
        .iter()
        .find(|function| function.name().map(|n| n.as_str()) == Some(name))
}
