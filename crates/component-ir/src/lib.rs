//! Component template IR.
//!
//! This crate models the parsed contents of a component definition file:
//! expressions, statements, destructuring patterns, functions and the
//! component metadata that render functions are resolved against. Every
//! node stringifies itself against [`ToStringOptions`], which is how the
//! resolved variable map and component context reach the emitted text.

pub mod ast;
pub mod binding;
pub mod component;
pub mod function;
pub mod jsx;
pub mod options;
pub mod statements;
pub mod types;

pub use ast::*;
pub use binding::{BindingElement, BindingName, BindingPattern, BindingPatternKind};
pub use component::{Component, MemberKind, Property};
pub use function::{ArrowFunction, BaseFunction, Decorator, Function, FunctionBody, FunctionParts, Parameter};
pub use jsx::{JsxAttribute, JsxAttributeValue, JsxChild, JsxElement, JsxExpression, JsxOpeningElement};
pub use options::{merge_variables, ComponentParameter, ToStringOptions, VariableExpressions};
pub use statements::{
    Block, Statement, VariableDeclaration, VariableDeclarationList, VariableKind, VariableStatement,
};
pub use types::{PropertySignature, TypeExpression};
