//! Slot and template member binding.
//!
//! A render function typed against a registered component may destructure
//! the component's props under caller-chosen names:
//!
//! ```text
//! function view({ props: { content: renderedContent } }: Widget) { ... }
//! ```
//!
//! Before the template is resolved, the component's slot and template
//! members are cloned and rewritten so that each destructured name reads
//! from the right underlying field and is emitted without an instance
//! prefix. The shared component registry is only ever read.

use crate::context::GeneratorContext;
use crate::helpers::PROPS;
use component_ir::{
    BaseFunction, BindingElement, BindingName, BindingPattern, ComponentParameter, Identifier,
    Parameter, Property, ToStringOptions,
};
use smol_str::SmolStr;
use tracing::{debug, trace};

/// Build the rendering options for `function` from the component its first
/// parameter is typed as.
///
/// Returns `None` when the function has no parameters or the parameter type
/// is not a registered component.
pub fn compute_render_options(
    function: &BaseFunction,
    ctx: &GeneratorContext,
) -> Option<ToStringOptions> {
    let source = function.first_parameter()?;
    let component = ctx.component(source.type_name()?)?;

    let mut members = binding_members(component.members.iter());
    let mut parameter = source.clone();

    let context: SmolStr = match &mut parameter.name {
        BindingName::Identifier(identifier) => identifier.name.clone(),
        BindingName::Pattern(pattern) => {
            if let Some(props) = props_pattern_mut(pattern) {
                for element in &mut props.elements {
                    bind_element(element, &mut members);
                }
            }
            SmolStr::default()
        }
    };

    debug!(
        component = %component.name,
        members = members.len(),
        context = %context,
        "computed render options"
    );

    Some(ToStringOptions {
        component_context: context.clone(),
        new_component_context: Some(context),
        members,
        component_parameter: Some(ComponentParameter {
            source: source.clone(),
            rewritten: parameter,
        }),
        ..ToStringOptions::default()
    })
}

/// Members that need rebinding: every template, and every slot whose
/// external name differs from its default name.
///
/// The result is an owned copy; rewriting it never touches the registry.
pub fn binding_members<'a>(members: impl Iterator<Item = &'a Property>) -> Vec<Property> {
    members
        .filter(|member| member.is_template() || (member.is_slot() && !member.has_default_name()))
        .cloned()
        .collect()
}

/// The pattern destructured from `props` inside a component parameter.
fn props_pattern_mut(pattern: &mut BindingPattern) -> Option<&mut BindingPattern> {
    pattern
        .elements
        .iter_mut()
        .find(|element| element.property_name.as_ref().map(Identifier::as_str) == Some(PROPS))
        .and_then(|element| match &mut element.name {
            BindingName::Pattern(props) => Some(props),
            BindingName::Identifier(_) => None,
        })
}

/// Rebind one destructured props element against the matching member.
///
/// A slot keeps its external name and the element is redirected to the
/// slot's default field. A template keeps its field and takes the local
/// name as its external name. Elements without a member are left alone.
fn bind_element(element: &mut BindingElement, members: &mut [Property]) {
    if element.dot_dot_dot {
        return;
    }
    let Some(key) = element.key().cloned() else {
        return;
    };
    let Some(member) = members
        .iter_mut()
        .find(|member| member.external_name == key)
    else {
        trace!(name = %key, "destructured name is not a component member");
        return;
    };

    member.clear_scope();
    if member.is_slot() {
        trace!(slot = %member.name, external = %key, "redirecting slot binding");
        element.property_name = Some(Identifier::new(member.name.clone()));
    } else if element.property_name.is_some() {
        if let Some(local) = element.name.as_identifier() {
            trace!(template = %member.name, local = %local, "renaming template member");
            member.external_name = local.clone();
        }
    }
}

/// The rewritten copy `options` holds for `function`'s first parameter.
///
/// Options computed for a function with a different first parameter carry
/// no rewrite for this one.
pub fn rewritten_parameter<'a>(
    function: &BaseFunction,
    options: &'a ToStringOptions,
) -> Option<&'a Parameter> {
    let first = function.first_parameter()?;
    options.component_parameter.as_ref()?.rewrite_of(first)
}

/// The parameter a render function should be emitted with: its rewritten
/// copy, or the function's own first parameter.
pub fn component_parameter<'a>(
    function: &'a BaseFunction,
    options: &'a ToStringOptions,
) -> Option<&'a Parameter> {
    rewritten_parameter(function, options).or_else(|| function.first_parameter())
}
