//! Destructuring patterns and the variable maps they produce.

use crate::ast::{display_via_render, is_identifier_name, Dependencies, Expression, Identifier, Node};
use crate::options::{ToStringOptions, VariableExpressions};
use smol_str::SmolStr;

/// Nesting beyond this depth is treated as malformed input.
pub const MAX_PATTERN_DEPTH: usize = 256;

/// Object (`{ a }`) or array (`[a]`) destructuring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindingPatternKind {
    #[default]
    Object,
    Array,
}

/// The target of a binding: a plain name or a nested pattern.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BindingName {
    Identifier(Identifier),
    Pattern(BindingPattern),
}

impl BindingName {
    pub fn ident(name: impl Into<SmolStr>) -> Self {
        Self::Identifier(Identifier::new(name))
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            Self::Identifier(identifier) => Some(identifier),
            Self::Pattern(_) => None,
        }
    }

    pub fn as_pattern(&self) -> Option<&BindingPattern> {
        match self {
            Self::Pattern(pattern) => Some(pattern),
            Self::Identifier(_) => None,
        }
    }

    /// Every local name this binding introduces, in source order.
    pub fn bound_names(&self) -> Vec<SmolStr> {
        match self {
            Self::Identifier(identifier) => vec![identifier.name.clone()],
            Self::Pattern(pattern) => pattern.bound_names(),
        }
    }

    /// Map each bound name to the expression it reads from `base`.
    pub fn variable_expressions(&self, base: Option<&Expression>) -> VariableExpressions {
        match self {
            Self::Identifier(identifier) => {
                let value = base
                    .cloned()
                    .unwrap_or_else(|| Expression::Identifier(identifier.clone()));
                VariableExpressions::from([(identifier.name.clone(), value)])
            }
            Self::Pattern(pattern) => pattern.variable_expressions(base),
        }
    }
}

impl Node for BindingName {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        match self {
            Self::Identifier(identifier) => identifier.to_string(),
            Self::Pattern(pattern) => pattern.render(options),
        }
    }

    fn dependencies(&self) -> Dependencies {
        match self {
            Self::Identifier(_) => Dependencies::new(),
            Self::Pattern(pattern) => pattern.dependencies(),
        }
    }
}

/// One element of a binding pattern: `propertyName: name = initializer`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BindingElement {
    pub dot_dot_dot: bool,
    pub property_name: Option<Identifier>,
    pub name: BindingName,
    pub initializer: Option<Expression>,
}

impl BindingElement {
    /// `name`
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            dot_dot_dot: false,
            property_name: None,
            name: BindingName::ident(name),
            initializer: None,
        }
    }

    /// `property_name: name`
    pub fn aliased(property_name: impl Into<SmolStr>, name: impl Into<SmolStr>) -> Self {
        Self {
            property_name: Some(Identifier::new(property_name)),
            ..Self::new(name)
        }
    }

    /// `property_name: { ... }`
    pub fn nested(property_name: impl Into<SmolStr>, pattern: BindingPattern) -> Self {
        Self {
            dot_dot_dot: false,
            property_name: Some(Identifier::new(property_name)),
            name: BindingName::Pattern(pattern),
            initializer: None,
        }
    }

    /// `...name`
    pub fn rest(name: impl Into<SmolStr>) -> Self {
        Self {
            dot_dot_dot: true,
            ..Self::new(name)
        }
    }

    pub fn with_initializer(mut self, initializer: Expression) -> Self {
        self.initializer = Some(initializer);
        self
    }

    /// The source key read by this element: the property name, or the
    /// bound identifier for shorthand elements.
    pub fn key(&self) -> Option<&Identifier> {
        self.property_name
            .as_ref()
            .or_else(|| self.name.as_identifier())
    }

    /// `access`, or `access` falling back to the default initializer.
    fn read(&self, access: Expression) -> Expression {
        match &self.initializer {
            Some(initializer) => Expression::conditional(
                Expression::binary(access.clone(), "!==", Expression::ident("undefined")),
                access,
                initializer.clone(),
            ),
            None => access,
        }
    }
}

impl Node for BindingElement {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        let mut out = String::new();
        if self.dot_dot_dot {
            out.push_str("...");
        }
        if let Some(property_name) = &self.property_name {
            out.push_str(property_name.as_str());
            out.push_str(": ");
        }
        out.push_str(&self.name.render(options));
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

/// An ordered destructuring pattern.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BindingPattern {
    pub kind: BindingPatternKind,
    pub elements: Vec<BindingElement>,
}

impl BindingPattern {
    pub fn object(elements: Vec<BindingElement>) -> Self {
        Self {
            kind: BindingPatternKind::Object,
            elements,
        }
    }

    pub fn array(elements: Vec<BindingElement>) -> Self {
        Self {
            kind: BindingPatternKind::Array,
            elements,
        }
    }

    /// The element reading the property `key`.
    pub fn element(&self, key: &str) -> Option<&BindingElement> {
        self.elements
            .iter()
            .find(|e| e.key().is_some_and(|k| k.as_str() == key))
    }

    pub fn bound_names(&self) -> Vec<SmolStr> {
        self.elements
            .iter()
            .flat_map(|element| element.name.bound_names())
            .collect()
    }

    /// Deepest level of pattern nesting, counting this pattern as 1.
    pub fn depth(&self) -> usize {
        1 + self
            .elements
            .iter()
            .filter_map(|element| element.name.as_pattern())
            .map(BindingPattern::depth)
            .max()
            .unwrap_or(0)
    }

    /// Flatten the pattern into `bound name -> expression`.
    ///
    /// Each bound name maps to `base` accessed along the element's property
    /// path, so `{ a, b: { c } }` over `X` yields `a -> X.a` and
    /// `c -> X.b.c`. Without a base every bound name maps to itself.
    pub fn variable_expressions(&self, base: Option<&Expression>) -> VariableExpressions {
        let mut variables = VariableExpressions::new();
        self.collect_variables(base, 0, &mut variables);
        variables
    }

    fn collect_variables(
        &self,
        base: Option<&Expression>,
        depth: usize,
        variables: &mut VariableExpressions,
    ) {
        debug_assert!(depth < MAX_PATTERN_DEPTH, "binding pattern nested too deeply");

        for (index, element) in self.elements.iter().enumerate() {
            let access = match base {
                // The rest object is not reconstructed.
                Some(_) if element.dot_dot_dot => continue,
                Some(base) => match self.access(base, index, element) {
                    Some(access) => Some(element.read(access)),
                    None => continue,
                },
                None => None,
            };

            match &element.name {
                BindingName::Identifier(identifier) => {
                    let value = access.unwrap_or_else(|| Expression::Identifier(identifier.clone()));
                    variables.insert(identifier.name.clone(), value);
                }
                BindingName::Pattern(pattern) => {
                    // A defaulted base is a conditional; nested reads apply to all of it.
                    let access = access.map(|access| match access {
                        Expression::Conditional(_) => Expression::paren(access),
                        access => access,
                    });
                    pattern.collect_variables(access.as_ref(), depth + 1, variables);
                }
            }
        }
    }

    fn access(&self, base: &Expression, index: usize, element: &BindingElement) -> Option<Expression> {
        match self.kind {
            BindingPatternKind::Array => Some(Expression::element(
                base.clone(),
                Expression::number(index.to_string()),
            )),
            BindingPatternKind::Object => {
                let key = element.key()?;
                if is_identifier_name(key.as_str()) {
                    Some(Expression::property(base.clone(), key.name.clone()))
                } else {
                    Some(Expression::element(base.clone(), Expression::string(key.as_str())))
                }
            }
        }
    }
}

impl Node for BindingPattern {
    fn render(&self, options: Option<&ToStringOptions>) -> String {
        let elements: Vec<String> = self.elements.iter().map(|e| e.render(options)).collect();
        match self.kind {
            BindingPatternKind::Object if elements.is_empty() => "{}".to_string(),
            BindingPatternKind::Object => format!("{{ {} }}", elements.join(", ")),
            BindingPatternKind::Array => format!("[{}]", elements.join(", ")),
        }
    }

    fn dependencies(&self) -> Dependencies {
        self.elements.iter().flat_map(|e| e.dependencies()).collect()
    }
}

display_via_render!(BindingName, BindingElement, BindingPattern);

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rendered(variables: &VariableExpressions) -> Vec<(String, String)> {
        variables
            .iter()
            .map(|(name, expression)| (name.to_string(), expression.to_string()))
            .collect()
    }

    #[test]
    fn test_flatten_nested_object_pattern() {
        let pattern = BindingPattern::object(vec![
            BindingElement::new("a"),
            BindingElement::nested("b", BindingPattern::object(vec![BindingElement::new("c")])),
        ]);
        let variables = pattern.variable_expressions(Some(&Expression::ident("X")));

        assert_eq!(variables["a"], Expression::property(Expression::ident("X"), "a"));
        assert_eq!(
            variables["c"],
            Expression::property(Expression::property(Expression::ident("X"), "b"), "c")
        );
        assert_eq!(variables.len(), 2);
    }

    #[test]
    fn test_without_base_maps_names_to_themselves() {
        let pattern = BindingPattern::object(vec![
            BindingElement::aliased("value", "current"),
            BindingElement::nested("nested", BindingPattern::array(vec![BindingElement::new("first")])),
            BindingElement::rest("others"),
        ]);
        let variables = pattern.variable_expressions(None);
        assert_eq!(
            rendered(&variables),
            vec![
                ("current".into(), "current".into()),
                ("first".into(), "first".into()),
                ("others".into(), "others".into()),
            ]
        );
    }

    #[test]
    fn test_array_pattern_and_rest() {
        let pattern = BindingPattern::array(vec![
            BindingElement::new("head"),
            BindingElement::new("second"),
            BindingElement::rest("tail"),
        ]);
        let variables = pattern.variable_expressions(Some(&Expression::ident("list")));
        assert_eq!(
            rendered(&variables),
            vec![
                ("head".into(), "list[0]".into()),
                ("second".into(), "list[1]".into()),
            ]
        );
    }

    #[test]
    fn test_default_initializer_and_quoted_key() {
        let pattern = BindingPattern::object(vec![
            BindingElement::new("size").with_initializer(Expression::number("10")),
            BindingElement::aliased("data-id", "id"),
        ]);
        let variables = pattern.variable_expressions(Some(&Expression::simple("this")));
        assert_eq!(
            rendered(&variables),
            vec![
                ("size".into(), "this.size !== undefined ? this.size : 10".into()),
                ("id".into(), r#"this["data-id"]"#.into()),
            ]
        );
    }

    #[test]
    fn test_defaulted_nested_object_reads_from_the_fallback() {
        let pattern = BindingPattern::object(vec![BindingElement::nested(
            "b",
            BindingPattern::object(vec![BindingElement::new("c")]),
        )
        .with_initializer(Expression::ObjectLiteral(Vec::new()))]);
        let variables = pattern.variable_expressions(Some(&Expression::ident("X")));

        let defaulted = Expression::conditional(
            Expression::binary(
                Expression::property(Expression::ident("X"), "b"),
                "!==",
                Expression::ident("undefined"),
            ),
            Expression::property(Expression::ident("X"), "b"),
            Expression::ObjectLiteral(Vec::new()),
        );
        assert_eq!(variables["c"], Expression::property(Expression::paren(defaulted), "c"));
        assert_eq!(variables["c"].to_string(), "(X.b !== undefined ? X.b : {}).c");
    }

    #[test]
    fn test_defaulted_nested_array_reads_from_the_fallback() {
        let pattern = BindingPattern::object(vec![BindingElement::nested(
            "list",
            BindingPattern::array(vec![BindingElement::new("first"), BindingElement::new("second")]),
        )
        .with_initializer(Expression::ArrayLiteral(Vec::new()))]);
        let variables = pattern.variable_expressions(Some(&Expression::simple("this")));
        assert_eq!(
            rendered(&variables),
            vec![
                (
                    "first".into(),
                    "(this.list !== undefined ? this.list : [])[0]".into()
                ),
                (
                    "second".into(),
                    "(this.list !== undefined ? this.list : [])[1]".into()
                ),
            ]
        );
    }

    #[test]
    fn test_render_and_bound_names() {
        let pattern = BindingPattern::object(vec![BindingElement::nested(
            "props",
            BindingPattern::object(vec![
                BindingElement::aliased("content", "renderedContent"),
                BindingElement::new("visible").with_initializer(Expression::simple("true")),
            ]),
        )]);
        assert_eq!(
            pattern.to_string(),
            "{ props: { content: renderedContent, visible = true } }"
        );
        assert_eq!(pattern.bound_names(), vec!["renderedContent", "visible"]);
        assert_eq!(pattern.depth(), 2);
        assert!(pattern.element("props").is_some());
    }
}
