//! JSX-shaped template nodes.

use crate::ast::{
    display_via_render, is_identifier_name, quote, Dependencies, Expression, Identifier, Node,
};
use crate::options::ToStringOptions;
use smol_str::SmolStr;

/// The value of a JSX attribute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JsxAttributeValue {
    /// `name="text"`
    String(String),
    /// `name={expression}`
    Expression(Expression),
}

/// An attribute on an opening element.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JsxAttribute {
    Attribute {
        name: Identifier,
        value: Option<JsxAttributeValue>,
    },
    /// `{...expression}`
    Spread(Expression),
}

impl JsxAttribute {
    pub fn expression(name: impl Into<SmolStr>, value: Expression) -> Self {
        Self::Attribute {
            name: Identifier::new(name),
            value: Some(JsxAttributeValue::Expression(value)),
        }
    }

    pub fn string(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self::Attribute {
            name: Identifier::new(name),
            value: Some(JsxAttributeValue::String(value.into())),
        }
    }
}

/// `<tag attributes>` shared by elements and self-closing elements.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JsxOpeningElement {
    pub tag: Expression,
    pub attributes: Vec<JsxAttribute>,
}

impl JsxOpeningElement {
    pub fn new(tag: impl Into<SmolStr>) -> Self {
        Self {
            tag: Expression::ident(tag),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: JsxAttribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Intrinsic tags (`div`, `span`) are emitted verbatim and never
    /// resolved against the variable map.
    pub fn is_intrinsic(&self) -> bool {
        matches!(&self.tag, Expression::Identifier(tag)
            if tag.as_str().starts_with(|c: char| c.is_ascii_lowercase()))
    }

    fn resolve_tag(&self, options: Option<&ToStringOptions>) -> ResolvedTag {
        if self.is_intrinsic() {
            ResolvedTag::Name(self.tag.to_string())
        } else {
            ResolvedTag::resolve(&self.tag, options)
        }
    }

    /// `<tag attributes>children</tag>`, or `<tag attributes />` without
    /// children. A tag that does not resolve to a component name is emitted
    /// as an expression container instead.
    fn render_element(&self, children: Option<&str>, options: Option<&ToStringOptions>) -> String {
        let tag = self.resolve_tag(options);
        let markup = tag.markup(&self.render_attributes(options), children);
        match tag {
            ResolvedTag::Name(_) => markup,
            ResolvedTag::Choice { .. } | ResolvedTag::Hoisted { .. } => format!("{{{}}}", markup),
        }
    }

    fn render_attributes(&self, options: Option<&ToStringOptions>) -> String {
        let mut out = String::new();
        for attribute in &self.attributes {
            out.push(' ');
            match attribute {
                JsxAttribute::Attribute { name, value } => {
                    out.push_str(name.as_str());
                    match value {
                        Some(JsxAttributeValue::String(text)) => {
                            out.push('=');
                            out.push_str(&quote(text));
                        }
                        Some(JsxAttributeValue::Expression(expression)) => {
                            out.push_str("={");
                            out.push_str(&expression.render(options));
                            out.push('}');
                        }
                        None => {}
                    }
                }
                JsxAttribute::Spread(expression) => {
                    out.push_str("{...");
                    out.push_str(&expression.render(options));
                    out.push('}');
                }
            }
        }
        out
    }

    fn dependencies(&self) -> Dependencies {
        let mut deps = if self.is_intrinsic() {
            Dependencies::new()
        } else {
            self.tag.dependencies()
        };
        for attribute in &self.attributes {
            match attribute {
                JsxAttribute::Attribute {
                    value: Some(JsxAttributeValue::Expression(expression)),
                    ..
                }
                | JsxAttribute::Spread(expression) => deps.extend(expression.dependencies()),
                JsxAttribute::Attribute { .. } => {}
            }
        }
        deps
    }
}

/// A component tag after variable substitution.
#[derive(Debug, Clone, PartialEq)]
enum ResolvedTag {
    /// Usable as a tag in place.
    Name(String),
    /// A conditional choosing between two components.
    Choice {
        condition: String,
        when_true: Box<ResolvedTag>,
        when_false: Box<ResolvedTag>,
    },
    /// Any other value, bound to a local before it is used as a tag.
    Hoisted { name: SmolStr, value: String },
}

impl ResolvedTag {
    fn resolve(tag: &Expression, options: Option<&ToStringOptions>) -> Self {
        let rendered = tag.render(options);
        if is_component_tag(&rendered) {
            return Self::Name(rendered);
        }

        let identifier = tag.as_identifier();
        let name = identifier.map_or_else(|| SmolStr::new("Tag"), |identifier| identifier.name.clone());
        let substitution = options.zip(identifier).and_then(|(options, identifier)| {
            let value = options.variable(identifier.as_str())?;
            Some((value, options.without_variable(identifier.as_str())))
        });
        let Some((value, inner)) = substitution else {
            return Self::Hoisted {
                name,
                value: rendered,
            };
        };

        match unparenthesized(value) {
            Expression::Conditional(c) => Self::Choice {
                condition: c.condition.render(Some(&inner)),
                when_true: Box::new(Self::resolve(&c.when_true, Some(&inner))),
                when_false: Box::new(Self::resolve(&c.when_false, Some(&inner))),
            },
            other => Self::Hoisted {
                name,
                value: other.render(Some(&inner)),
            },
        }
    }

    /// The element as JSX when the tag is a name, or as a JS expression
    /// producing it otherwise.
    fn markup(&self, attributes: &str, children: Option<&str>) -> String {
        match self {
            Self::Name(tag) => match children {
                Some(children) => format!("<{}{}>{}</{}>", tag, attributes, children, tag),
                None => format!("<{}{} />", tag, attributes),
            },
            Self::Choice {
                condition,
                when_true,
                when_false,
            } => format!(
                "{} ? {} : {}",
                condition,
                when_true.markup(attributes, children),
                when_false.markup(attributes, children)
            ),
            Self::Hoisted { name, value } => format!(
                "(() => {{ const {} = {}; return {}; }})()",
                name,
                value,
                Self::Name(name.to_string()).markup(attributes, children)
            ),
        }
    }
}

/// JSX reads a bare lowercase name as an intrinsic element, so a component
/// tag is either a member chain or a name starting with anything else.
fn is_component_tag(text: &str) -> bool {
    text.split('.').all(is_identifier_name)
        && (text.contains('.') || !text.starts_with(|c: char| c.is_ascii_lowercase()))
}

fn unparenthesized(expression: &Expression) -> &Expression {
    match expression {
        Expression::Paren(inner) => unparenthesized(inner),
        other => other,
    }
}

/// `<tag>children</tag>`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JsxElement {
    pub opening: JsxOpeningElement,
    pub children: Vec<JsxChild>,
}

/// A child of an element or fragment.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JsxChild {
    Text(String),
    Jsx(JsxExpression),
}

impl JsxChild {
    /// `{expression}`
    pub fn expression(expression: Expression) -> Self {
        Self::Jsx(JsxExpression::Container(Some(expression)))
    }
}

/// A JSX template tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JsxExpression {
    Element(JsxElement),
    SelfClosing(JsxOpeningElement),
    Fragment(Vec<JsxChild>),
    /// `{expression}`; `{}` when empty.
    Container(Option<Expression>),
}

impl JsxExpression {
    pub fn element(opening: JsxOpeningElement, children: Vec<JsxChild>) -> Self {
        Self::Element(JsxElement { opening, children })
    }

    /// Convert a terminal expression into a JSX tree: markup passes through,
    /// parentheses unwrap, anything else becomes an expression container.
    pub fn from_expression(expression: &Expression) -> Self {
        match expression {
            Expression::Jsx(jsx) => jsx.as_ref().clone(),
            Expression::Paren(inner) => Self::from_expression(inner),
            other => Self::Container(Some(other.clone())),
        }
    }
}

fn render_children(children: &[JsxChild], options: Option<&ToStringOptions>) -> String {
    children
        .iter()
        .map(|child| match child {
            JsxChild::Text(text) => text.clone(),
            JsxChild::Jsx(jsx) => jsx.render(options),
        })
        .collect()
}

fn children_dependencies(children: &[JsxChild]) -> Dependencies {
    children
        .iter()
        .flat_map(|child| match child {
            JsxChild::Text(_) => Dependencies::new(),
            JsxChild::Jsx(jsx) => jsx.dependencies(),
        })
        .collect()
}

impl Node for JsxExpression {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        match self {
            Self::Element(element) => {
                let children = render_children(&element.children, options);
                element.opening.render_element(Some(&children), options)
            }
            Self::SelfClosing(opening) => opening.render_element(None, options),
            Self::Fragment(children) => format!("<>{}</>", render_children(children, options)),
            Self::Container(Some(expression)) => format!("{{{}}}", expression.render(options)),
            Self::Container(None) => "{}".to_string(),
        }
    }

    fn dependencies(&self) -> Dependencies {
        match self {
            Self::Element(element) => {
                let mut deps = element.opening.dependencies();
                deps.extend(children_dependencies(&element.children));
                deps
            }
            Self::SelfClosing(opening) => opening.dependencies(),
            Self::Fragment(children) => children_dependencies(children),
            Self::Container(Some(expression)) => expression.dependencies(),
            Self::Container(None) => Dependencies::new(),
        }
    }
}

display_via_render!(JsxExpression);
