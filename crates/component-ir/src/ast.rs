//! Expression nodes of the component IR.
//!
//! Every node can stringify itself against a set of [`ToStringOptions`] and
//! report the free identifiers it references. Stringification without
//! options (`Display`) reproduces the source form of the node.

use crate::binding::BindingPattern;
use crate::function::BaseFunction;
use crate::jsx::JsxExpression;
use crate::options::ToStringOptions;
use crate::types::TypeExpression;
use indexmap::IndexSet;
use smol_str::SmolStr;
use std::fmt;

/// Free identifiers referenced by a node, in first-occurrence order.
pub type Dependencies = IndexSet<SmolStr>;

/// Shared capability of every IR node.
pub trait Node {
    /// Stringify the node. Without options the node renders its source form.
    fn render(&self, options: Option<&ToStringOptions>) -> String;

    /// Identifiers the node references that it does not bind itself.
    fn dependencies(&self) -> Dependencies;
}

/// Implements `Display` as option-less rendering.
macro_rules! display_via_render {
    ($($ty:ty),* $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    f.write_str(&$crate::ast::Node::render(self, None))
                }
            }
        )*
    };
}
pub(crate) use display_via_render;

/// A name atom. Two identifiers are equal when their names are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Identifier {
    pub name: SmolStr,
}

impl Identifier {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self { name: name.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// An opaque, already rendered text fragment.
///
/// Simple expressions are never rewritten: they carry no identifiers and
/// render verbatim regardless of options.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SimpleExpression {
    pub text: String,
}

impl SimpleExpression {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// `object.name` or `object?.name`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyAccess {
    pub expression: Box<Expression>,
    pub name: Identifier,
    pub question_dot: bool,
}

/// `object[argument]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementAccess {
    pub expression: Box<Expression>,
    pub argument: Box<Expression>,
}

/// `callee(arguments)`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Call {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

/// `left operator right`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binary {
    pub left: Box<Expression>,
    pub operator: SmolStr,
    pub right: Box<Expression>,
}

/// A prefix unary operator such as `!`, `-` or `typeof`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Prefix {
    pub operator: SmolStr,
    pub operand: Box<Expression>,
}

/// `condition ? when_true : when_false`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Conditional {
    pub condition: Box<Expression>,
    pub when_true: Box<Expression>,
    pub when_false: Box<Expression>,
}

/// A member of an object literal.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectProperty {
    /// `key: value`
    KeyValue { key: SmolStr, value: Expression },
    /// `name`
    Shorthand(Identifier),
    /// `...expression`
    Spread(Expression),
}

/// A polymorphic expression node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expression {
    Identifier(Identifier),
    Simple(SimpleExpression),
    StringLiteral(String),
    NumericLiteral(SmolStr),
    PropertyAccess(PropertyAccess),
    ElementAccess(ElementAccess),
    Call(Call),
    Binary(Binary),
    Prefix(Prefix),
    Conditional(Conditional),
    Paren(Box<Expression>),
    ObjectLiteral(Vec<ObjectProperty>),
    ArrayLiteral(Vec<Expression>),
    Pattern(BindingPattern),
    Type(TypeExpression),
    Jsx(Box<JsxExpression>),
    Function(Box<BaseFunction>),
}

impl Expression {
    pub fn ident(name: impl Into<SmolStr>) -> Self {
        Self::Identifier(Identifier::new(name))
    }

    pub fn simple(text: impl Into<String>) -> Self {
        Self::Simple(SimpleExpression::new(text))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::StringLiteral(value.into())
    }

    pub fn number(value: impl Into<SmolStr>) -> Self {
        Self::NumericLiteral(value.into())
    }

    pub fn property(expression: Expression, name: impl Into<SmolStr>) -> Self {
        Self::PropertyAccess(PropertyAccess {
            expression: Box::new(expression),
            name: Identifier::new(name),
            question_dot: false,
        })
    }

    pub fn element(expression: Expression, argument: Expression) -> Self {
        Self::ElementAccess(ElementAccess {
            expression: Box::new(expression),
            argument: Box::new(argument),
        })
    }

    pub fn call(callee: Expression, arguments: Vec<Expression>) -> Self {
        Self::Call(Call {
            callee: Box::new(callee),
            arguments,
        })
    }

    pub fn binary(left: Expression, operator: impl Into<SmolStr>, right: Expression) -> Self {
        Self::Binary(Binary {
            left: Box::new(left),
            operator: operator.into(),
            right: Box::new(right),
        })
    }

    pub fn prefix(operator: impl Into<SmolStr>, operand: Expression) -> Self {
        Self::Prefix(Prefix {
            operator: operator.into(),
            operand: Box::new(operand),
        })
    }

    pub fn conditional(condition: Expression, when_true: Expression, when_false: Expression) -> Self {
        Self::Conditional(Conditional {
            condition: Box::new(condition),
            when_true: Box::new(when_true),
            when_false: Box::new(when_false),
        })
    }

    pub fn paren(expression: Expression) -> Self {
        Self::Paren(Box::new(expression))
    }

    pub fn jsx(expression: JsxExpression) -> Self {
        Self::Jsx(Box::new(expression))
    }

    pub fn function(function: BaseFunction) -> Self {
        Self::Function(Box::new(function))
    }

    /// The identifier, if this expression is a bare identifier.
    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }

    /// Whether the expression is (or wraps) JSX markup.
    pub fn is_jsx(&self) -> bool {
        match self {
            Self::Jsx(_) => true,
            Self::Paren(inner) => inner.is_jsx(),
            Self::Conditional(c) => c.when_true.is_jsx() || c.when_false.is_jsx(),
            _ => false,
        }
    }

    /// Whether the expression can be spliced into a larger expression
    /// without parentheses.
    pub fn is_primary(&self) -> bool {
        !matches!(
            self,
            Self::Binary(_)
                | Self::Prefix(_)
                | Self::Conditional(_)
                | Self::Function(_)
                | Self::Pattern(_)
                | Self::Type(_)
        )
    }
}

impl Node for Expression {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        match self {
            Self::Identifier(identifier) => render_identifier(identifier, options),
            Self::Simple(simple) => simple.text.clone(),
            Self::StringLiteral(value) => quote(value),
            Self::NumericLiteral(value) => value.to_string(),
            Self::PropertyAccess(access) => access.render(options),
            Self::ElementAccess(access) => format!(
                "{}[{}]",
                render_operand(&access.expression, options),
                access.argument.render(options)
            ),
            Self::Call(call) => format!(
                "{}({})",
                render_operand(&call.callee, options),
                render_list(&call.arguments, options)
            ),
            Self::Binary(binary) => format!(
                "{} {} {}",
                binary.left.render(options),
                binary.operator,
                binary.right.render(options)
            ),
            Self::Prefix(prefix) => {
                let operand = prefix.operand.render(options);
                if prefix.operator.ends_with(|c: char| c.is_ascii_alphabetic()) {
                    format!("{} {}", prefix.operator, operand)
                } else {
                    format!("{}{}", prefix.operator, operand)
                }
            }
            Self::Conditional(c) => format!(
                "{} ? {} : {}",
                c.condition.render(options),
                c.when_true.render(options),
                c.when_false.render(options)
            ),
            Self::Paren(inner) => format!("({})", inner.render(options)),
            Self::ObjectLiteral(properties) => render_object(properties, options),
            Self::ArrayLiteral(elements) => format!("[{}]", render_list(elements, options)),
            Self::Pattern(pattern) => pattern.render(options),
            Self::Type(type_expression) => type_expression.render(options),
            Self::Jsx(jsx) => jsx.render(options),
            Self::Function(function) => function.render(options),
        }
    }

    fn dependencies(&self) -> Dependencies {
        match self {
            Self::Identifier(identifier) => Dependencies::from([identifier.name.clone()]),
            Self::Simple(_) | Self::StringLiteral(_) | Self::NumericLiteral(_) | Self::Type(_) => {
                Dependencies::new()
            }
            Self::PropertyAccess(access) => access.expression.dependencies(),
            Self::ElementAccess(access) => {
                let mut deps = access.expression.dependencies();
                deps.extend(access.argument.dependencies());
                deps
            }
            Self::Call(call) => {
                let mut deps = call.callee.dependencies();
                deps.extend(call.arguments.iter().flat_map(|e| e.dependencies()));
                deps
            }
            Self::Binary(binary) => {
                let mut deps = binary.left.dependencies();
                deps.extend(binary.right.dependencies());
                deps
            }
            Self::Prefix(prefix) => prefix.operand.dependencies(),
            Self::Conditional(c) => {
                let mut deps = c.condition.dependencies();
                deps.extend(c.when_true.dependencies());
                deps.extend(c.when_false.dependencies());
                deps
            }
            Self::Paren(inner) => inner.dependencies(),
            Self::ObjectLiteral(properties) => properties
                .iter()
                .flat_map(|property| match property {
                    ObjectProperty::KeyValue { value, .. } => value.dependencies(),
                    ObjectProperty::Shorthand(identifier) => {
                        Dependencies::from([identifier.name.clone()])
                    }
                    ObjectProperty::Spread(expression) => expression.dependencies(),
                })
                .collect(),
            Self::ArrayLiteral(elements) => elements.iter().flat_map(|e| e.dependencies()).collect(),
            Self::Pattern(pattern) => pattern.dependencies(),
            Self::Jsx(jsx) => jsx.dependencies(),
            Self::Function(function) => function.dependencies(),
        }
    }
}

impl PropertyAccess {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        if let (Some(options), Expression::Identifier(object)) = (options, self.expression.as_ref()) {
            if options.is_component_context(object.as_str()) {
                return render_member_access(self.name.as_str(), options);
            }
        }
        let dot = if self.question_dot { "?." } else { "." };
        format!("{}{}{}", render_operand(&self.expression, options), dot, self.name)
    }
}

/// Render the object of an access or the callee of a call.
fn render_operand(expression: &Expression, options: Option<&ToStringOptions>) -> String {
    let text = expression.render(options);
    if expression.is_primary() {
        text
    } else {
        format!("({})", text)
    }
}

/// Render `context.name`, resolving `name` against the visible members.
fn render_member_access(name: &str, options: &ToStringOptions) -> String {
    let context = options.effective_context();
    match options.member(name) {
        Some(member) => member.getter(context),
        None if context.is_empty() => name.to_string(),
        None => format!("{}.{}", context, name),
    }
}

fn render_identifier(identifier: &Identifier, options: Option<&ToStringOptions>) -> String {
    let Some(options) = options else {
        return identifier.to_string();
    };
    let name = identifier.as_str();

    if let Some(value) = options.variable(name) {
        if value.as_identifier() == Some(identifier) {
            return identifier.to_string();
        }
        // The replacement is rendered without its own binding so that
        // substitution strictly shrinks the map and always terminates.
        let inner = options.without_variable(name);
        let text = value.render(Some(&inner));
        return if value.is_primary() {
            text
        } else {
            format!("({})", text)
        };
    }

    if options.is_component_context(name) {
        if let Some(context) = options.new_component_context.as_deref() {
            if !context.is_empty() {
                return context.to_string();
            }
        }
    }

    identifier.to_string()
}

fn render_object(properties: &[ObjectProperty], options: Option<&ToStringOptions>) -> String {
    if properties.is_empty() {
        return "{}".to_string();
    }
    let parts: Vec<String> = properties
        .iter()
        .map(|property| match property {
            ObjectProperty::KeyValue { key, value } => {
                format!("{}: {}", key, value.render(options))
            }
            ObjectProperty::Shorthand(identifier) => {
                let value = render_identifier(identifier, options);
                if value == identifier.as_str() {
                    value
                } else {
                    format!("{}: {}", identifier, value)
                }
            }
            ObjectProperty::Spread(expression) => format!("...{}", expression.render(options)),
        })
        .collect();
    format!("{{ {} }}", parts.join(", "))
}

pub(crate) fn render_list(expressions: &[Expression], options: Option<&ToStringOptions>) -> String {
    expressions
        .iter()
        .map(|expression| expression.render(options))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Quote a string as a double-quoted JS string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Whether `name` can be used after a `.` in a property access.
pub fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

display_via_render!(Expression);
