//! Render-function resolution for component code generation.
//!
//! This crate turns the render functions of a component definition file into
//! resolved templates: JSX trees plus the [`ToStringOptions`] that bind every
//! free name in them to component state, props, slots, templates and local
//! declarations. Target generators consume the result through the
//! [`TargetGenerator`] trait and stringify it for their framework.

pub mod bindings;
pub mod config;
pub mod context;
pub mod helpers;
pub mod template;

use component_ir::{BaseFunction, Dependencies, Identifier, JsxExpression, Node, ToStringOptions};
use rayon::prelude::*;
use tracing::debug;

pub use bindings::{binding_members, compute_render_options, rewritten_parameter};
pub use config::{ConfigError, GeneratorOptions, Platform};
pub use context::GeneratorContext;
pub use template::{find_view_function, find_view_model_function, resolve_template};

/// A per-framework rendering strategy.
///
/// Resolution is shared by every target; a generator only decides how the
/// resolved tree is post-processed and stringified.
pub trait TargetGenerator: Send + Sync {
    /// The framework this generator emits.
    fn platform(&self) -> Platform;

    /// Transform a resolved template before it is rendered.
    fn process_template_expression(&self, template: Option<JsxExpression>) -> Option<JsxExpression> {
        template
    }

    /// Stringify a resolved template.
    fn render_template(&self, template: &JsxExpression, options: Option<&ToStringOptions>) -> String {
        template.render(options)
    }
}

/// The default generator: no post-processing, plain JSX output.
#[derive(Debug, Clone, Default)]
pub struct BaseGenerator {
    /// Generator configuration.
    pub options: GeneratorOptions,
}

impl BaseGenerator {
    /// Create a generator with the given options.
    pub fn new(options: GeneratorOptions) -> Self {
        Self {
            options: options.normalized(),
        }
    }
}

impl TargetGenerator for BaseGenerator {
    fn platform(&self) -> Platform {
        self.options.platform
    }
}

/// Resolve, post-process and render the template of `function`.
///
/// Returns an empty string when the function has nothing to render.
pub fn get_template<G: TargetGenerator + ?Sized>(
    generator: &G,
    function: &BaseFunction,
    ctx: &GeneratorContext,
    mut options: Option<&mut ToStringOptions>,
    preserve_context: bool,
) -> String {
    let template = resolve_template(function, options.as_deref_mut(), preserve_context, ctx.globals());
    generator
        .process_template_expression(template)
        .map(|template| generator.render_template(&template, options.as_deref()))
        .unwrap_or_default()
}

/// Render a whole function, body resolved against the component its first
/// parameter is typed as.
///
/// Without a matching component the caller's `options` are used unchanged.
pub fn render_function(
    function: &BaseFunction,
    ctx: &GeneratorContext,
    options: Option<&ToStringOptions>,
) -> String {
    let computed = compute_render_options(function, ctx);
    let Some(options) = computed.as_ref().or(options) else {
        return function.to_string();
    };

    match rewritten_parameter(function, options) {
        Some(parameter) => {
            let mut function = function.clone();
            if let Some(first) = function.parts_mut().parameters.first_mut() {
                *first = parameter.clone();
            }
            function.render(Some(options))
        }
        None => function.render(Some(options)),
    }
}

/// A resolved render function.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateOutput {
    /// Name of the render function, if it has one.
    pub name: Option<Identifier>,
    /// The rendered template; empty when there is nothing to render.
    pub template: String,
    /// The options the template was rendered with.
    pub options: ToStringOptions,
    /// Free names the function depends on.
    pub dependencies: Dependencies,
}

impl TemplateOutput {
    /// Whether the function produced a template.
    pub fn has_template(&self) -> bool {
        !self.template.is_empty()
    }
}

/// Resolve every render function of one file.
///
/// Functions are resolved in parallel. Each resolution owns its options and
/// member copies; only `ctx` is shared.
pub fn compile_render_functions<G: TargetGenerator + ?Sized>(
    generator: &G,
    ctx: &GeneratorContext,
    functions: &[BaseFunction],
) -> Vec<TemplateOutput> {
    debug!(
        platform = %generator.platform(),
        functions = functions.len(),
        components = ctx.components.len(),
        "compiling render functions"
    );

    functions
        .par_iter()
        .map(|function| {
            let mut options = compute_render_options(function, ctx).unwrap_or_default();
            let template = get_template(generator, function, ctx, Some(&mut options), false);
            TemplateOutput {
                name: function.name().cloned(),
                template,
                options,
                dependencies: function.dependencies(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::PROPS;
    use component_ir::{
        BindingElement, BindingName, BindingPattern, Block, Component, Expression, FunctionBody,
        JsxAttribute, JsxChild, JsxOpeningElement, Parameter, Property, Statement, TypeExpression,
        VariableExpressions, VariableStatement,
    };
    use pretty_assertions::assert_eq;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn widget() -> Component {
        Component::new("Widget")
            .with_member(Property::prop("text"))
            .with_member(Property::slot("defaultContent").with_external_name("content"))
            .with_member(Property::template("itemTemplate"))
            .with_view("view")
    }

    fn context() -> GeneratorContext {
        let mut ctx = GeneratorContext::new();
        ctx.register_component(widget());
        ctx
    }

    /// `function name({ props: { ... } }: Widget) { return <div>child</div>; }`
    fn props_view(name: &str, props: Vec<BindingElement>, child: JsxChild) -> BaseFunction {
        BaseFunction::declaration(
            name,
            vec![Parameter::new(BindingName::Pattern(BindingPattern::object(vec![
                BindingElement::nested(PROPS, BindingPattern::object(props)),
            ])))
            .with_type(TypeExpression::reference("Widget"))],
            Block::new(vec![Statement::Return(Some(Expression::jsx(JsxExpression::element(
                JsxOpeningElement::new("div"),
                vec![child],
            ))))]),
        )
    }

    fn content_view() -> BaseFunction {
        props_view(
            "contentView",
            vec![BindingElement::aliased("content", "renderedContent")],
            JsxChild::expression(Expression::ident("renderedContent")),
        )
    }

    fn template_view() -> BaseFunction {
        props_view(
            "templateView",
            vec![BindingElement::aliased("itemTemplate", "ItemTemplate")],
            JsxChild::Jsx(JsxExpression::SelfClosing(
                JsxOpeningElement::new("ItemTemplate")
                    .with_attribute(JsxAttribute::expression("text", Expression::ident("text"))),
            )),
        )
    }

    #[test]
    fn test_slot_alias_resolves_to_default_field() {
        init_tracing();
        let ctx = context();
        let function = content_view();

        let mut options = compute_render_options(&function, &ctx).unwrap();
        let template = get_template(&BaseGenerator::default(), &function, &ctx, Some(&mut options), false);

        let slot = options.member("content").unwrap();
        assert_eq!(slot.external_name.as_str(), "content");
        assert_eq!(slot.scope, None);
        assert_eq!(
            options.variables["renderedContent"].to_string(),
            "this.props.defaultContent"
        );
        insta::assert_snapshot!(template, @"<div>{this.props.defaultContent}</div>");
    }

    #[test]
    fn test_template_alias_renames_member_only() {
        let ctx = context();
        let function = template_view();

        let mut options = compute_render_options(&function, &ctx).unwrap();
        let template = get_template(&BaseGenerator::default(), &function, &ctx, Some(&mut options), false);

        let member = options.member("ItemTemplate").unwrap();
        assert_eq!(member.name, "itemTemplate");
        assert_eq!(
            options.variables["ItemTemplate"].to_string(),
            "this.props.itemTemplate"
        );
        insta::assert_snapshot!(template, @"<div><this.props.itemTemplate text={text} /></div>");
    }

    #[test]
    fn test_defaulted_template_renders_both_candidates() {
        let ctx = context();
        let function = props_view(
            "templateView",
            vec![BindingElement::aliased("itemTemplate", "ItemTemplate")
                .with_initializer(Expression::ident("Fallback"))],
            JsxChild::Jsx(JsxExpression::SelfClosing(
                JsxOpeningElement::new("ItemTemplate")
                    .with_attribute(JsxAttribute::expression("text", Expression::ident("text"))),
            )),
        );

        let mut options = compute_render_options(&function, &ctx).unwrap();
        let template = get_template(&BaseGenerator::default(), &function, &ctx, Some(&mut options), false);

        insta::assert_snapshot!(
            template,
            @"<div>{this.props.itemTemplate !== undefined ? <this.props.itemTemplate text={text} /> : <Fallback text={text} />}</div>"
        );
    }

    #[test]
    fn test_member_isolation_between_render_functions() {
        let ctx = context();
        let content = content_view();
        let template = template_view();

        let content_options = compute_render_options(&content, &ctx).unwrap();
        let template_options = compute_render_options(&template, &ctx).unwrap();

        assert_eq!(content_options.member("content").unwrap().scope, None);
        assert!(content_options.member("itemTemplate").unwrap().scope.is_some());
        assert!(content_options.member("ItemTemplate").is_none());

        assert_eq!(template_options.member("ItemTemplate").unwrap().scope, None);
        assert!(template_options.member("content").unwrap().scope.is_some());

        assert_eq!(ctx.component("Widget"), Some(&widget()));
    }

    #[test]
    fn test_parallel_resolution_is_isolated() {
        init_tracing();
        let ctx = context();
        let functions: Vec<BaseFunction> = (0..32)
            .map(|i| if i % 2 == 0 { content_view() } else { template_view() })
            .collect();

        let outputs = compile_render_functions(&BaseGenerator::default(), &ctx, &functions);

        assert_eq!(outputs.len(), functions.len());
        for (i, output) in outputs.iter().enumerate() {
            assert!(output.has_template());
            if i % 2 == 0 {
                assert_eq!(output.template, "<div>{this.props.defaultContent}</div>");
                assert!(output.options.member("ItemTemplate").is_none());
            } else {
                assert_eq!(output.options.member("content").unwrap().scope.as_deref(), Some("props."));
            }
        }
        assert_eq!(ctx.component("Widget"), Some(&widget()));
    }

    #[test]
    fn test_no_template_is_empty_every_time() {
        let ctx = context();
        let function = BaseFunction::declaration("view", Vec::new(), Block::default());
        let generator = BaseGenerator::default();

        for _ in 0..3 {
            assert_eq!(get_template(&generator, &function, &ctx, None, false), "");
            let mut options = ToStringOptions::with_context("this");
            assert_eq!(get_template(&generator, &function, &ctx, Some(&mut options), true), "");
            assert_eq!(options, ToStringOptions::with_context("this"));
        }

        let outputs = compile_render_functions(&generator, &ctx, std::slice::from_ref(&function));
        assert!(!outputs[0].has_template());
    }

    #[test]
    fn test_local_shadows_global() {
        let mut ctx = context();
        ctx.register_global("caption", Expression::string("global"));
        ctx.register_global("version", Expression::string("1.0"));

        let function = BaseFunction::declaration(
            "view",
            vec![Parameter::new(BindingName::ident("viewModel"))],
            Block::new(vec![
                Statement::Variable(VariableStatement::constant(
                    BindingName::ident("caption"),
                    Expression::property(Expression::ident("viewModel"), "text"),
                )),
                Statement::Return(Some(Expression::binary(
                    Expression::ident("caption"),
                    "+",
                    Expression::ident("version"),
                ))),
            ]),
        );

        let mut options = ToStringOptions::new();
        let template = get_template(&BaseGenerator::default(), &function, &ctx, Some(&mut options), false);

        assert_eq!(
            options.variables["caption"],
            Expression::property(Expression::ident("viewModel"), "text")
        );
        insta::assert_snapshot!(template, @r#"{viewModel.text + "1.0"}"#);
    }

    #[test]
    fn test_post_processing_hook() {
        struct Wrapping;

        impl TargetGenerator for Wrapping {
            fn platform(&self) -> Platform {
                Platform::Preact
            }

            fn process_template_expression(
                &self,
                template: Option<JsxExpression>,
            ) -> Option<JsxExpression> {
                template.map(|template| {
                    JsxExpression::Fragment(vec![JsxChild::Jsx(template)])
                })
            }
        }

        let ctx = context();
        let function = content_view();
        let mut options = compute_render_options(&function, &ctx).unwrap();
        let template = get_template(&Wrapping, &function, &ctx, Some(&mut options), false);
        insta::assert_snapshot!(template, @"<><div>{this.props.defaultContent}</div></>");

        let generator: &dyn TargetGenerator = &Wrapping;
        assert_eq!(generator.platform(), Platform::Preact);
    }

    #[test]
    fn test_render_function_uses_rewritten_parameter() {
        let ctx = context();
        let rendered = render_function(&content_view(), &ctx, None);
        assert!(rendered.starts_with(
            "function contentView({ props: { defaultContent: renderedContent } }: Widget)"
        ));

        let arrow = BaseFunction::arrow(
            vec![Parameter::new(BindingName::ident("model"))],
            FunctionBody::expression(Expression::property(Expression::ident("model"), "text")),
        );
        assert_eq!(render_function(&arrow, &ctx, None), "(model) => model.text");
    }

    #[test]
    fn test_render_function_keeps_parameter_of_unrelated_function() {
        let ctx = context();
        let options = compute_render_options(&content_view(), &ctx).unwrap();

        let other = props_view(
            "otherView",
            vec![BindingElement::new("text")],
            JsxChild::expression(Expression::ident("text")),
        );
        let rendered = render_function(&other, &GeneratorContext::new(), Some(&options));
        assert!(rendered.starts_with("function otherView({ props: { text } }: Widget)"));
    }

    #[test]
    fn test_view_lookup_feeds_resolution() {
        let ctx = context();
        let functions = vec![
            props_view(
                "view",
                vec![BindingElement::new("text")],
                JsxChild::expression(Expression::ident("text")),
            ),
            content_view(),
        ];
        let component = ctx.component("Widget").unwrap();
        let view = find_view_function(component, &functions).unwrap();

        let mut options = compute_render_options(view, &ctx).unwrap();
        let template = get_template(&BaseGenerator::default(), view, &ctx, Some(&mut options), false);
        assert_eq!(template, "<div>{this.props.text}</div>");
    }

    #[test]
    fn test_globals_reach_resolution() {
        let mut ctx = GeneratorContext::new();
        ctx.register_global("ICON", Expression::string("icon.svg"));
        let function = BaseFunction::arrow(Vec::new(), FunctionBody::expression(Expression::ident("ICON")));

        let mut options = ToStringOptions::new();
        let template = get_template(&BaseGenerator::default(), &function, &ctx, Some(&mut options), false);
        assert_eq!(template, r#"{"icon.svg"}"#);

        let mut variables = VariableExpressions::new();
        variables.insert("ICON".into(), Expression::string("icon.svg"));
        assert_eq!(options.variables, variables);
    }
}
