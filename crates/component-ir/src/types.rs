//! Type annotations.

use crate::ast::{display_via_render, Dependencies, Identifier, Node};
use crate::options::ToStringOptions;
use smol_str::SmolStr;

/// A property signature inside a type literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertySignature {
    pub name: Identifier,
    pub optional: bool,
    pub type_annotation: Option<TypeExpression>,
}

/// A type annotation as written in the source.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeExpression {
    /// `Name` or `Name<Args>`
    Reference {
        name: Identifier,
        type_arguments: Vec<TypeExpression>,
    },
    /// `T[]`
    Array(Box<TypeExpression>),
    /// `A | B`
    Union(Vec<TypeExpression>),
    /// `{ a?: string }`
    Literal(Vec<PropertySignature>),
    /// Any other type, kept as text.
    Simple(SmolStr),
}

impl TypeExpression {
    pub fn reference(name: impl Into<SmolStr>) -> Self {
        Self::Reference {
            name: Identifier::new(name),
            type_arguments: Vec::new(),
        }
    }

    pub fn simple(text: impl Into<SmolStr>) -> Self {
        Self::Simple(text.into())
    }

    /// The name a component registry is keyed by, when this annotation
    /// names a type.
    pub fn type_name(&self) -> Option<&str> {
        match self {
            Self::Reference { name, .. } => Some(name.as_str()),
            Self::Simple(text) => Some(text.trim()),
            _ => None,
        }
    }
}

impl Node for TypeExpression {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        match self {
            Self::Reference {
                name,
                type_arguments,
            } => {
                if type_arguments.is_empty() {
                    name.to_string()
                } else {
                    let arguments: Vec<String> =
                        type_arguments.iter().map(|t| t.render(options)).collect();
                    format!("{}<{}>", name, arguments.join(", "))
                }
            }
            Self::Array(element) => match element.as_ref() {
                Self::Union(_) => format!("({})[]", element.render(options)),
                _ => format!("{}[]", element.render(options)),
            },
            Self::Union(types) => types
                .iter()
                .map(|t| t.render(options))
                .collect::<Vec<_>>()
                .join(" | "),
            Self::Literal(members) if members.is_empty() => "{}".to_string(),
            Self::Literal(members) => {
                let members: Vec<String> = members
                    .iter()
                    .map(|member| {
                        let optional = if member.optional { "?" } else { "" };
                        match &member.type_annotation {
                            Some(t) => format!("{}{}: {}", member.name, optional, t.render(options)),
                            None => format!("{}{}", member.name, optional),
                        }
                    })
                    .collect();
                format!("{{ {} }}", members.join("; "))
            }
            Self::Simple(text) => text.to_string(),
        }
    }

    fn dependencies(&self) -> Dependencies {
        Dependencies::new()
    }
}

display_via_render!(TypeExpression);
