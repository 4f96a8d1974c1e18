//! Statements that may appear in a function body.

use crate::ast::{display_via_render, Dependencies, Expression, Node};
use crate::binding::BindingName;
use crate::options::{merge_variables, ToStringOptions, VariableExpressions};
use crate::types::TypeExpression;
use smol_str::SmolStr;

/// `const`, `let` or `var`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariableKind {
    #[default]
    Const,
    Let,
    Var,
}

impl VariableKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Let => "let",
            Self::Var => "var",
        }
    }
}

/// `name: Type = initializer`
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDeclaration {
    pub name: BindingName,
    pub type_annotation: Option<TypeExpression>,
    pub initializer: Option<Expression>,
}

impl VariableDeclaration {
    pub fn new(name: BindingName, initializer: Option<Expression>) -> Self {
        Self {
            name,
            type_annotation: None,
            initializer,
        }
    }

    /// Identifier declarations map to their initializer; patterns are
    /// flattened with the initializer as their base.
    pub fn variable_expressions(&self) -> VariableExpressions {
        self.name.variable_expressions(self.initializer.as_ref())
    }
}

/// `const a = 1, b = 2`
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDeclarationList {
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclaration>,
}

impl VariableDeclarationList {
    pub fn variable_expressions(&self) -> VariableExpressions {
        let mut variables = VariableExpressions::new();
        for declaration in &self.declarations {
            merge_variables(&mut variables, declaration.variable_expressions());
        }
        variables
    }

    pub fn bound_names(&self) -> Vec<SmolStr> {
        self.declarations
            .iter()
            .flat_map(|declaration| declaration.name.bound_names())
            .collect()
    }
}

impl Node for VariableDeclarationList {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        let declarations: Vec<String> = self
            .declarations
            .iter()
            .map(|declaration| {
                let mut out = declaration.name.render(options);
                if let Some(t) = &declaration.type_annotation {
                    out.push_str(": ");
                    out.push_str(&t.render(options));
                }
                if let Some(initializer) = &declaration.initializer {
                    out.push_str(" = ");
                    out.push_str(&initializer.render(options));
                }
                out
            })
            .collect();
        format!("{} {}", self.kind.as_str(), declarations.join(", "))
    }

    fn dependencies(&self) -> Dependencies {
        let mut deps = Dependencies::new();
        for declaration in &self.declarations {
            deps.extend(declaration.name.dependencies());
            if let Some(initializer) = &declaration.initializer {
                deps.extend(initializer.dependencies());
            }
        }
        deps
    }
}

/// A variable statement with its modifiers (`export const ...`).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableStatement {
    pub modifiers: Vec<SmolStr>,
    pub declaration_list: VariableDeclarationList,
}

impl VariableStatement {
    /// `const name = initializer`
    pub fn constant(name: BindingName, initializer: Expression) -> Self {
        Self {
            modifiers: Vec::new(),
            declaration_list: VariableDeclarationList {
                kind: VariableKind::Const,
                declarations: vec![VariableDeclaration::new(name, Some(initializer))],
            },
        }
    }
}

/// `{ statements }`
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block {
    pub statements: Vec<Statement>,
}

impl Block {
    pub fn new(statements: Vec<Statement>) -> Self {
        Self { statements }
    }

    /// Names declared directly in this block.
    pub fn declared_names(&self) -> Vec<SmolStr> {
        self.statements
            .iter()
            .filter_map(|statement| match statement {
                Statement::Variable(variable) => Some(variable.declaration_list.bound_names()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

impl Node for Block {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        if self.statements.is_empty() {
            return "{}".to_string();
        }
        let mut out = String::from("{\n");
        for statement in &self.statements {
            out.push_str(&statement.render(options));
            out.push('\n');
        }
        out.push('}');
        out
    }

    fn dependencies(&self) -> Dependencies {
        let mut deps: Dependencies = self.statements.iter().flat_map(|s| s.dependencies()).collect();
        for name in self.declared_names() {
            deps.shift_remove(&name);
        }
        deps
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Statement {
    Return(Option<Expression>),
    Variable(VariableStatement),
    Expression(Expression),
    Block(Block),
}

impl Statement {
    pub fn is_return(&self) -> bool {
        matches!(self, Self::Return(_))
    }
}

impl Node for Statement {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        match self {
            Self::Return(Some(expression)) => format!("return {};", expression.render(options)),
            Self::Return(None) => "return;".to_string(),
            Self::Variable(variable) => {
                let mut out = String::new();
                for modifier in &variable.modifiers {
                    out.push_str(modifier);
                    out.push(' ');
                }
                out.push_str(&variable.declaration_list.render(options));
                out.push(';');
                out
            }
            Self::Expression(expression) => format!("{};", expression.render(options)),
            Self::Block(block) => block.render(options),
        }
    }

    fn dependencies(&self) -> Dependencies {
        match self {
            Self::Return(Some(expression)) | Self::Expression(expression) => {
                expression.dependencies()
            }
            Self::Return(None) => Dependencies::new(),
            Self::Variable(variable) => variable.declaration_list.dependencies(),
            Self::Block(block) => block.dependencies(),
        }
    }
}

display_via_render!(VariableDeclarationList, Block, Statement);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{BindingElement, BindingPattern};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_declaration_list_variables() {
        let list = VariableDeclarationList {
            kind: VariableKind::Const,
            declarations: vec![
                VariableDeclaration::new(BindingName::ident("count"), Some(Expression::number("1"))),
                VariableDeclaration::new(
                    BindingName::Pattern(BindingPattern::object(vec![BindingElement::new("width")])),
                    Some(Expression::ident("size")),
                ),
                VariableDeclaration::new(BindingName::ident("pending"), None),
            ],
        };
        let variables = list.variable_expressions();
        assert_eq!(variables["count"], Expression::number("1"));
        assert_eq!(
            variables["width"],
            Expression::property(Expression::ident("size"), "width")
        );
        assert_eq!(variables["pending"], Expression::ident("pending"));
        assert_eq!(list.to_string(), "const count = 1, { width } = size, pending");
    }

    #[test]
    fn test_block_dependencies_exclude_locals() {
        let block = Block::new(vec![
            Statement::Variable(VariableStatement::constant(
                BindingName::ident("label"),
                Expression::property(Expression::ident("props"), "text"),
            )),
            Statement::Return(Some(Expression::ident("label"))),
        ]);
        let deps: Vec<_> = block.dependencies().into_iter().collect();
        assert_eq!(deps, vec!["props"]);
        assert_eq!(block.to_string(), "{\nconst label = props.text;\nreturn label;\n}");
    }
}
