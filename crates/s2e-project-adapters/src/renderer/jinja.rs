//! Jinja renderer over the templates in a [`TemplateLibrary`].
//!
//! Templates are written in the Jinja dialect s2e-env uses: `trim_blocks`
//! and `lstrip_blocks` are on, so a block tag alone on its line leaves no
//! blank line behind. Printing an undefined variable is an error; inside
//! `if` it is false.

use std::collections::BTreeMap;

use minijinja::{Environment, ErrorKind, UndefinedBehavior, Value};
use s2e_project_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::{ContextValue, DomainError, RenderContext},
    error::{ProjectError, ProjectResult},
};
use tracing::{debug, instrument};

use crate::template_store::TemplateLibrary;

/// Renders named templates from a [`TemplateLibrary`] with minijinja.
#[derive(Clone)]
pub struct JinjaRenderer {
    library: TemplateLibrary,
}

impl JinjaRenderer {
    pub fn new(library: TemplateLibrary) -> Self {
        Self { library }
    }

    /// Create a renderer over the built-in templates.
    pub fn with_builtin() -> ProjectResult<Self> {
        Ok(Self::new(TemplateLibrary::with_builtin()?))
    }

    /// Environment loading from the library. Built per render, so templates
    /// inserted after construction are picked up.
    fn environment(&self) -> Environment<'static> {
        let mut env = base_environment();
        let library = self.library.clone();
        env.set_loader(move |name| {
            library
                .lookup(name)
                .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
        });
        env
    }
}

impl TemplateRenderer for JinjaRenderer {
    #[instrument(skip(self, context))]
    fn render(&self, template: &str, context: &RenderContext) -> ProjectResult<String> {
        let env = self.environment();
        let compiled = env.get_template(template).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => ApplicationError::TemplateNotFound {
                name: template.to_string(),
            }
            .into(),
            ErrorKind::SyntaxError => syntax_error(template, &e),
            _ => rendering_failed(template, &e),
        })?;

        debug!(variables = context.keys().count(), "Rendering template");
        compiled
            .render(to_value(context))
            .map_err(|e| rendering_failed(template, &e))
    }
}

fn base_environment<'source>() -> Environment<'source> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_undefined_behavior(UndefinedBehavior::SemiStrict);
    env
}

/// Compile `source` without rendering it.
pub(crate) fn check_syntax(name: &str, source: &str) -> ProjectResult<()> {
    base_environment()
        .template_from_named_str(name, source)
        .map(|_| ())
        .map_err(|e| syntax_error(name, &e))
}

fn to_value(context: &RenderContext) -> Value {
    let variables: BTreeMap<&str, Value> = context
        .keys()
        .filter_map(|key| {
            let value = match context.get(key)? {
                ContextValue::Text(text) => Value::from(text.as_str()),
                ContextValue::Flag(flag) => Value::from(*flag),
            };
            Some((key, value))
        })
        .collect();
    Value::from_serialize(&variables)
}

fn syntax_error(template: &str, err: &minijinja::Error) -> ProjectError {
    DomainError::TemplateSyntax {
        template: template.to_string(),
        reason: err.to_string(),
    }
    .into()
}

fn rendering_failed(template: &str, err: &minijinja::Error) -> ProjectError {
    ApplicationError::RenderingFailed {
        template: template.to_string(),
        reason: err.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer(templates: &[(&str, &str)]) -> JinjaRenderer {
        let library = TemplateLibrary::new();
        for (name, source) in templates {
            library.insert(*name, *source).unwrap();
        }
        JinjaRenderer::new(library)
    }

    fn context() -> RenderContext {
        RenderContext::new()
            .with_text("target", "CADET_00001")
            .with_text("project_dir", "/env/projects/CADET_00001")
            .with_flag("use_seeds", true)
            .with_flag("debug", false)
    }

    fn assert_rendering_failed(err: ProjectError, expected: &str) {
        assert!(
            matches!(
                err,
                ProjectError::Application(ApplicationError::RenderingFailed { ref template, .. })
                    if template == expected
            ),
            "{err:?}"
        );
    }

    #[test]
    fn substitutes_text_and_flags() {
        let out = renderer(&[("a", "{{ target }} seeds={{use_seeds}}\n")])
            .render("a", &context())
            .unwrap();
        assert_eq!(out, "CADET_00001 seeds=true\n");
    }

    #[test]
    fn block_lines_leave_no_blank_lines() {
        let r = renderer(&[(
            "a",
            "start\n{% if use_seeds %}\nseeds\n{% else %}\nnone\n{% endif %}\n  {% if not debug %}\nquiet\n  {% endif %}\nend\n",
        )]);
        assert_eq!(r.render("a", &context()).unwrap(), "start\nseeds\nquiet\nend\n");

        let ctx = RenderContext::new().with_flag("use_seeds", false);
        assert_eq!(r.render("a", &ctx).unwrap(), "start\nnone\nquiet\nend\n");
    }

    #[test]
    fn undefined_variable_is_false_in_conditionals() {
        let r = renderer(&[("a", "{% if missing %}yes{% else %}no{% endif %}")]);
        assert_eq!(r.render("a", &RenderContext::new()).unwrap(), "no");
    }

    #[test]
    fn undefined_variable_is_an_error_in_substitution() {
        let err = renderer(&[("a", "{{ missing }}")])
            .render("a", &RenderContext::new())
            .unwrap_err();
        assert_rendering_failed(err, "a");
    }

    #[test]
    fn includes_by_variable_and_literal() {
        let r = renderer(&[
            ("main", "head\n{% include layer %}\n{% include \"tail\" %}\n"),
            ("cgc.lua", "layer for {{ target }}\n"),
            ("tail", "tail\n"),
        ]);
        let ctx = context().with_text("layer", "cgc.lua");
        assert_eq!(
            r.render("main", &ctx).unwrap(),
            "head\nlayer for CADET_00001\ntail\n"
        );
    }

    #[test]
    fn templates_inserted_later_are_visible() {
        let library = TemplateLibrary::new();
        let r = JinjaRenderer::new(library.clone());
        library.insert("late", "{{ target }}").unwrap();
        assert_eq!(r.render("late", &context()).unwrap(), "CADET_00001");
    }

    #[test]
    fn unknown_template_is_an_error() {
        let err = renderer(&[]).render("nope", &context()).unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Application(ApplicationError::TemplateNotFound { ref name }) if name == "nope"
        ));

        let err = renderer(&[("a", "{% include \"nope\" %}")])
            .render("a", &context())
            .unwrap_err();
        assert_rendering_failed(err, "a");
    }

    #[test]
    fn include_cycle_is_an_error() {
        let r = renderer(&[("a", "{% include \"b\" %}"), ("b", "{% include \"a\" %}")]);
        assert_rendering_failed(r.render("a", &context()).unwrap_err(), "a");
    }

    #[test]
    fn flag_cannot_name_an_include() {
        let err = renderer(&[("a", "{% include use_seeds %}")])
            .render("a", &context())
            .unwrap_err();
        assert_rendering_failed(err, "a");
    }

    #[test]
    fn common_jinja_constructs_are_supported() {
        let r = renderer(&[
            ("ws", "[ {%- if use_seeds -%} seeds {%- endif -%} ]"),
            ("filter", "{{ target | lower }} {{ missing | default(\"none\") }}"),
            ("loop", "{% for part in [\"seeds\", \"recipes\"] %}{{ part }};{% endfor %}"),
        ]);
        assert_eq!(r.render("ws", &context()).unwrap(), "[seeds]");
        assert_eq!(r.render("filter", &context()).unwrap(), "cadet_00001 none");
        assert_eq!(r.render("loop", &context()).unwrap(), "seeds;recipes;");
    }

    #[test]
    fn check_syntax_reports_template_name() {
        let err = check_syntax("broken.lua", "{% if x %}").unwrap_err();
        assert!(matches!(
            err,
            ProjectError::Domain(DomainError::TemplateSyntax { ref template, .. })
                if template == "broken.lua"
        ));
    }
}
