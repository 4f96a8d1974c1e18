//! Functions, parameters and decorators.

use crate::ast::{display_via_render, Dependencies, Expression, Identifier, Node};
use crate::binding::BindingName;
use crate::options::ToStringOptions;
use crate::statements::{Block, Statement};
use crate::types::TypeExpression;
use smol_str::SmolStr;

/// `@expression`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decorator {
    pub expression: Expression,
}

impl Decorator {
    pub fn new(expression: Expression) -> Self {
        Self { expression }
    }

    /// The decorator's name: `Slot` for both `@Slot` and `@Slot()`.
    pub fn name(&self) -> Option<&str> {
        match &self.expression {
            Expression::Identifier(identifier) => Some(identifier.as_str()),
            Expression::Call(call) => call.callee.as_identifier().map(Identifier::as_str),
            _ => None,
        }
    }
}

impl Node for Decorator {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        format!("@{}", self.expression.render(options))
    }

    fn dependencies(&self) -> Dependencies {
        self.expression.dependencies()
    }
}

/// A function parameter. Owned by its function.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub decorators: Vec<Decorator>,
    pub modifiers: Vec<SmolStr>,
    pub dot_dot_dot: bool,
    pub name: BindingName,
    pub question_token: bool,
    pub type_annotation: Option<TypeExpression>,
    pub initializer: Option<Expression>,
}

impl Parameter {
    pub fn new(name: BindingName) -> Self {
        Self {
            decorators: Vec::new(),
            modifiers: Vec::new(),
            dot_dot_dot: false,
            name,
            question_token: false,
            type_annotation: None,
            initializer: None,
        }
    }

    pub fn with_type(mut self, type_annotation: TypeExpression) -> Self {
        self.type_annotation = Some(type_annotation);
        self
    }

    /// The registry key of the parameter's declared type.
    pub fn type_name(&self) -> Option<&str> {
        self.type_annotation.as_ref().and_then(TypeExpression::type_name)
    }

    /// `name?: Type`, with `any` standing in for a missing annotation.
    pub fn type_declaration(&self) -> String {
        let type_text = self
            .type_annotation
            .as_ref()
            .map(|t| t.to_string())
            .unwrap_or_else(|| "any".to_string());
        let question = if self.question_token { "?" } else { "" };
        format!("{}{}: {}", self.name, question, type_text)
    }
}

impl Node for Parameter {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        let mut out = String::new();
        for decorator in &self.decorators {
            out.push_str(&decorator.render(options));
            out.push(' ');
        }
        for modifier in &self.modifiers {
            out.push_str(modifier);
            out.push(' ');
        }
        if self.dot_dot_dot {
            out.push_str("...");
        }
        out.push_str(&self.name.render(options));
        if self.question_token {
            out.push('?');
        }
        if let Some(t) = &self.type_annotation {
            out.push_str(": ");
            out.push_str(&t.render(options));
        }
        if let Some(initializer) = &self.initializer {
            out.push_str(" = ");
            out.push_str(&initializer.render(options));
        }
        out
    }

    fn dependencies(&self) -> Dependencies {
        let mut deps = self.name.dependencies();
        if let Some(initializer) = &self.initializer {
            deps.extend(initializer.dependencies());
        }
        deps
    }
}

/// A function body: a statement block or a single expression.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FunctionBody {
    Block(Block),
    Expression(Box<Expression>),
}

impl FunctionBody {
    pub fn expression(expression: Expression) -> Self {
        Self::Expression(Box::new(expression))
    }

    fn render(&self, options: Option<&ToStringOptions>) -> String {
        match self {
            Self::Block(block) => block.render(options),
            Self::Expression(expression) => match expression.as_ref() {
                Expression::ObjectLiteral(_) => format!("({})", expression.render(options)),
                _ => expression.render(options),
            },
        }
    }
}

/// State shared by every function form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionParts {
    pub modifiers: Vec<SmolStr>,
    pub type_parameters: Vec<SmolStr>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeExpression>,
    pub body: FunctionBody,
}

impl FunctionParts {
    pub fn new(parameters: Vec<Parameter>, body: FunctionBody) -> Self {
        Self {
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            parameters,
            return_type: None,
            body,
        }
    }

    fn render_signature(&self, options: Option<&ToStringOptions>) -> String {
        let mut out = String::new();
        if !self.type_parameters.is_empty() {
            out.push('<');
            out.push_str(&self.type_parameters.join(", "));
            out.push('>');
        }
        let parameters: Vec<String> = self.parameters.iter().map(|p| p.render(options)).collect();
        out.push('(');
        out.push_str(&parameters.join(", "));
        out.push(')');
        if let Some(t) = &self.return_type {
            out.push_str(": ");
            out.push_str(&t.render(options));
        }
        out
    }

    fn modifiers_prefix(&self) -> String {
        self.modifiers.iter().map(|m| format!("{} ", m)).collect()
    }
}

/// `function name(parameters) { ... }`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub decorators: Vec<Decorator>,
    pub asterisk_token: bool,
    pub name: Option<Identifier>,
    pub parts: FunctionParts,
}

/// `(parameters) => body`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArrowFunction {
    pub parts: FunctionParts,
}

/// Either function form.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BaseFunction {
    Function(Function),
    Arrow(ArrowFunction),
}

impl BaseFunction {
    /// A named function declaration.
    pub fn declaration(name: impl Into<SmolStr>, parameters: Vec<Parameter>, body: Block) -> Self {
        Self::Function(Function {
            decorators: Vec::new(),
            asterisk_token: false,
            name: Some(Identifier::new(name)),
            parts: FunctionParts::new(parameters, FunctionBody::Block(body)),
        })
    }

    pub fn arrow(parameters: Vec<Parameter>, body: FunctionBody) -> Self {
        Self::Arrow(ArrowFunction {
            parts: FunctionParts::new(parameters, body),
        })
    }

    pub fn parts(&self) -> &FunctionParts {
        match self {
            Self::Function(function) => &function.parts,
            Self::Arrow(arrow) => &arrow.parts,
        }
    }

    pub fn parts_mut(&mut self) -> &mut FunctionParts {
        match self {
            Self::Function(function) => &mut function.parts,
            Self::Arrow(arrow) => &mut arrow.parts,
        }
    }

    pub fn name(&self) -> Option<&Identifier> {
        match self {
            Self::Function(function) => function.name.as_ref(),
            Self::Arrow(_) => None,
        }
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parts().parameters
    }

    pub fn first_parameter(&self) -> Option<&Parameter> {
        self.parts().parameters.first()
    }

    pub fn body(&self) -> &FunctionBody {
        &self.parts().body
    }

    /// Whether the function produces JSX markup.
    pub fn is_jsx(&self) -> bool {
        match self.body() {
            FunctionBody::Expression(expression) => expression.is_jsx(),
            FunctionBody::Block(block) => block.statements.iter().any(|statement| {
                matches!(statement, Statement::Return(Some(expression)) if expression.is_jsx())
            }),
        }
    }

    /// Names bound by the parameters and the top-level body declarations.
    pub fn bound_names(&self) -> Vec<SmolStr> {
        let mut names: Vec<SmolStr> = self
            .parameters()
            .iter()
            .flat_map(|parameter| parameter.name.bound_names())
            .collect();
        if let FunctionBody::Block(block) = self.body() {
            names.extend(block.declared_names());
        }
        names
    }

    /// Render with `options`, treating names bound by this function as
    /// shadowing any outer variable of the same name.
    fn render_body(&self, options: Option<&ToStringOptions>) -> (String, String) {
        let parts = self.parts();
        match options {
            Some(options) => {
                let names = self.bound_names();
                let inner = options.without_variables(names.iter().map(SmolStr::as_str));
                (parts.render_signature(Some(&inner)), parts.body.render(Some(&inner)))
            }
            None => (parts.render_signature(None), parts.body.render(None)),
        }
    }
}

impl Node for BaseFunction {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        let (signature, body) = self.render_body(options);
        match self {
            Self::Function(function) => {
                let mut out = String::new();
                for decorator in &function.decorators {
                    out.push_str(&decorator.render(options));
                    out.push('\n');
                }
                out.push_str(&function.parts.modifiers_prefix());
                out.push_str("function");
                if function.asterisk_token {
                    out.push('*');
                }
                if let Some(name) = &function.name {
                    out.push(' ');
                    out.push_str(name.as_str());
                }
                out.push_str(&signature);
                out.push(' ');
                out.push_str(&body);
                out
            }
            Self::Arrow(arrow) => {
                format!("{}{} => {}", arrow.parts.modifiers_prefix(), signature, body)
            }
        }
    }

    fn dependencies(&self) -> Dependencies {
        let parts = self.parts();
        let mut deps: Dependencies = parts
            .parameters
            .iter()
            .flat_map(|parameter| parameter.dependencies())
            .collect();
        deps.extend(match &parts.body {
            FunctionBody::Block(block) => block.dependencies(),
            FunctionBody::Expression(expression) => expression.dependencies(),
        });
        for name in self.bound_names() {
            deps.shift_remove(&name);
        }
        deps
    }
}

display_via_render!(Decorator, Parameter, BaseFunction);
