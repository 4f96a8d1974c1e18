//! Component metadata: the members a component declares.

use crate::ast::{Expression, Identifier};
use crate::function::Decorator;
use crate::types::TypeExpression;
use smol_str::SmolStr;

/// Scope prefix of members that live on the component's props object.
pub const PROPS_SCOPE: &str = "props.";

/// What a member represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MemberKind {
    /// One-way bound prop.
    OneWay,
    /// Two-way bound prop.
    TwoWay,
    /// Externally supplied content injected at a fixed position.
    Slot,
    /// Externally supplied, overridable rendering logic.
    Template,
    /// Event callback prop.
    Event,
    /// Method of the view model.
    Method,
    /// State private to the view model.
    Internal,
}

impl MemberKind {
    fn default_scope(&self) -> &'static str {
        match self {
            Self::OneWay | Self::TwoWay | Self::Slot | Self::Template | Self::Event => PROPS_SCOPE,
            Self::Method | Self::Internal => "",
        }
    }
}

/// A member of a component.
///
/// `name` is the internal default name; `external_name` is the name callers
/// use. `scope` is the prefix placed after the component instance when the
/// member is accessed; `None` means the member is a plain local binding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub name: SmolStr,
    pub external_name: Identifier,
    pub scope: Option<SmolStr>,
    pub kind: MemberKind,
    pub type_annotation: Option<TypeExpression>,
    pub initializer: Option<Expression>,
    pub decorators: Vec<Decorator>,
}

impl Property {
    pub fn new(kind: MemberKind, name: impl Into<SmolStr>) -> Self {
        let name = name.into();
        Self {
            external_name: Identifier::new(name.clone()),
            name,
            scope: Some(kind.default_scope().into()),
            kind,
            type_annotation: None,
            initializer: None,
            decorators: Vec::new(),
        }
    }

    pub fn prop(name: impl Into<SmolStr>) -> Self {
        Self::new(MemberKind::OneWay, name)
    }

    pub fn slot(name: impl Into<SmolStr>) -> Self {
        Self::new(MemberKind::Slot, name)
    }

    pub fn template(name: impl Into<SmolStr>) -> Self {
        Self::new(MemberKind::Template, name)
    }

    pub fn internal(name: impl Into<SmolStr>) -> Self {
        Self::new(MemberKind::Internal, name)
    }

    pub fn with_external_name(mut self, external_name: impl Into<SmolStr>) -> Self {
        self.external_name = Identifier::new(external_name);
        self
    }

    pub fn is_slot(&self) -> bool {
        self.kind == MemberKind::Slot
    }

    pub fn is_template(&self) -> bool {
        self.kind == MemberKind::Template
    }

    pub fn is_internal(&self) -> bool {
        matches!(self.kind, MemberKind::Internal | MemberKind::Method)
    }

    /// Whether callers use the internal name.
    pub fn has_default_name(&self) -> bool {
        self.external_name.as_str() == self.name
    }

    /// Drop the instance prefix: the member is now reached as a local binding.
    pub fn clear_scope(&mut self) {
        self.scope = None;
    }

    /// Render an access to this member from `component_context`.
    pub fn getter(&self, component_context: &str) -> String {
        match &self.scope {
            None => self.external_name.to_string(),
            Some(scope) if component_context.is_empty() => format!("{}{}", scope, self.name),
            Some(scope) => format!("{}.{}{}", component_context, scope, self.name),
        }
    }
}

/// A compiled component declaration.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Component {
    pub name: Identifier,
    pub members: Vec<Property>,
    /// Name of the view (template) function, from `@Component({ view })`.
    pub view: Option<Identifier>,
    /// Name of the view-model function, from `@Component({ viewModel })`.
    pub view_model: Option<Identifier>,
    pub decorators: Vec<Decorator>,
}

impl Component {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: Identifier::new(name),
            members: Vec::new(),
            view: None,
            view_model: None,
            decorators: Vec::new(),
        }
    }

    pub fn with_member(mut self, member: Property) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_view(mut self, view: impl Into<SmolStr>) -> Self {
        self.view = Some(Identifier::new(view));
        self
    }

    pub fn with_view_model(mut self, view_model: impl Into<SmolStr>) -> Self {
        self.view_model = Some(Identifier::new(view_model));
        self
    }

    /// Find a member by the name callers use.
    pub fn member(&self, external_name: &str) -> Option<&Property> {
        self.members
            .iter()
            .find(|member| member.external_name.as_str() == external_name)
    }

    pub fn slots(&self) -> impl Iterator<Item = &Property> {
        self.members.iter().filter(|member| member.is_slot())
    }

    pub fn templates(&self) -> impl Iterator<Item = &Property> {
        self.members.iter().filter(|member| member.is_template())
    }
}
