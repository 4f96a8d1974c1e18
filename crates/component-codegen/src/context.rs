//! Per-file generator context.

use component_ir::{Component, Expression, VariableExpressions};
use indexmap::IndexMap;
use smol_str::SmolStr;

/// Components and globals known while compiling one file.
///
/// Populated before any render function is resolved and only read afterwards;
/// every resolution borrows it immutably.
#[derive(Debug, Clone, Default)]
pub struct GeneratorContext {
    /// Registered components, keyed by name.
    pub components: IndexMap<SmolStr, Component>,
    /// Compilation-wide variables visible to every template.
    pub globals: VariableExpressions,
}

impl GeneratorContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a component under its declared name. A later registration
    /// under the same name replaces the earlier one.
    pub fn register_component(&mut self, component: Component) {
        self.components.insert(component.name.name.clone(), component);
    }

    /// Register a global variable.
    pub fn register_global(&mut self, name: impl Into<SmolStr>, expression: Expression) {
        self.globals.insert(name.into(), expression);
    }

    /// Look up a component by type name.
    pub fn component(&self, name: &str) -> Option<&Component> {
        self.components.get(name)
    }

    pub fn global(&self, name: &str) -> Option<&Expression> {
        self.globals.get(name)
    }

    /// Globals, or `None` when there are none to merge.
    pub fn globals(&self) -> Option<&VariableExpressions> {
        (!self.globals.is_empty()).then_some(&self.globals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use component_ir::Property;

    #[test]
    fn test_register_and_lookup() {
        let mut ctx = GeneratorContext::new();
        assert!(ctx.globals().is_none());

        ctx.register_component(Component::new("Button").with_member(Property::prop("text")));
        ctx.register_global("CONSTANT", Expression::string("value"));

        assert!(ctx.component("Button").is_some());
        assert!(ctx.component("Missing").is_none());
        assert_eq!(ctx.global("CONSTANT"), Some(&Expression::string("value")));
        assert_eq!(ctx.globals().map(|g| g.len()), Some(1));
    }

    #[test]
    fn test_reregistration_replaces() {
        let mut ctx = GeneratorContext::new();
        ctx.register_component(Component::new("Button"));
        ctx.register_component(Component::new("Button").with_member(Property::prop("type")));
        assert_eq!(ctx.components.len(), 1);
        assert_eq!(ctx.component("Button").map(|c| c.members.len()), Some(1));
    }
}
