//! Rendering options threaded through stringification.

use crate::ast::Expression;
use crate::component::Property;
use crate::function::Parameter;
use indexmap::IndexMap;
use smol_str::SmolStr;

/// Name to resolving-expression map. Keys are unique; the last writer wins.
pub type VariableExpressions = IndexMap<SmolStr, Expression>;

/// Merge `overrides` on top of `base`: entries of `overrides` win.
pub fn merge_variables(base: &mut VariableExpressions, overrides: VariableExpressions) {
    for (name, expression) in overrides {
        base.insert(name, expression);
    }
}

/// Per-call configuration for stringifying a resolved template.
///
/// Created fresh for every template extraction and never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ToStringOptions {
    /// Name that prefixes member accesses. Empty means locals are already
    /// resolved through `variables` and no prefix applies.
    pub component_context: SmolStr,
    /// Replacement for `component_context` in the emitted text.
    pub new_component_context: Option<SmolStr>,
    /// Variables visible to the template.
    pub variables: VariableExpressions,
    /// Members visible to the template.
    pub members: Vec<Property>,
    /// Rewritten copy of the render function's first parameter.
    pub component_parameter: Option<ComponentParameter>,
}

/// A render function's first parameter with its props bindings rewritten.
///
/// The rewrite depends only on the parameter and the component it is typed
/// as, so it applies to any function whose first parameter equals `source`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComponentParameter {
    /// The parameter as declared.
    pub source: Parameter,
    /// The copy emitted in its place.
    pub rewritten: Parameter,
}

impl ComponentParameter {
    /// The rewritten copy, if `parameter` is the one it was made from.
    pub fn rewrite_of(&self, parameter: &Parameter) -> Option<&Parameter> {
        (self.source == *parameter).then_some(&self.rewritten)
    }
}

impl ToStringOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options prefixing member access with `context`.
    pub fn with_context(context: impl Into<SmolStr>) -> Self {
        Self {
            component_context: context.into(),
            ..Self::default()
        }
    }

    /// The context text emitted in front of member accesses.
    pub fn effective_context(&self) -> &str {
        self.new_component_context
            .as_deref()
            .unwrap_or(&self.component_context)
    }

    /// Whether `name` refers to the component instance.
    pub fn is_component_context(&self, name: &str) -> bool {
        !self.component_context.is_empty()
            && self.component_context == name
            && !self.variables.contains_key(name)
    }

    /// Look up a visible member by its external name.
    pub fn member(&self, external_name: &str) -> Option<&Property> {
        self.members
            .iter()
            .find(|member| member.external_name.as_str() == external_name)
    }

    pub fn variable(&self, name: &str) -> Option<&Expression> {
        self.variables.get(name)
    }

    /// A copy of these options with `name` unbound.
    pub fn without_variable(&self, name: &str) -> Self {
        let mut options = self.clone();
        options.variables.shift_remove(name);
        options
    }

    /// A copy of these options with every name in `names` unbound.
    pub fn without_variables<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut options = self.clone();
        for name in names {
            options.variables.shift_remove(name);
        }
        options
    }
}
