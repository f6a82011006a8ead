//! minijinja-backed template environment.

use std::path::Path;

use minijinja::value::Kwargs;
use minijinja::{Environment, ErrorKind, context};
use serde_json::{Map, Value};

use crate::{RenderError, TemplateRenderer};

/// Template environment with the `load` directive helper registered.
pub struct TemplateEnv {
    env: Environment<'static>,
}

impl TemplateEnv {
    /// Load templates from files under `dir`.
    ///
    /// Identifiers are paths relative to `dir`; paths escaping it are never
    /// resolved.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let mut env = base_environment();
        env.set_loader(minijinja::path_loader(dir.as_ref().to_path_buf()));
        Self { env }
    }

    /// Build an environment from in-memory `(name, source)` pairs.
    pub fn from_sources<N, S>(sources: impl IntoIterator<Item = (N, S)>) -> Result<Self, RenderError>
    where
        N: Into<String>,
        S: Into<String>,
    {
        let mut env = base_environment();
        for (name, source) in sources {
            let name = name.into();
            env.add_template_owned(name.clone(), source.into())
                .map_err(|source| RenderError::Template {
                    template: name,
                    source,
                })?;
        }
        Ok(Self { env })
    }

    /// Whether a template with this identifier can be loaded.
    pub fn has_template(&self, name: &str) -> bool {
        self.env.get_template(name).is_ok()
    }
}

impl TemplateRenderer for TemplateEnv {
    fn render(&self, template: &str, args: &Map<String, Value>) -> Result<String, RenderError> {
        let to_error = |source: minijinja::Error| {
            if source.kind() == ErrorKind::TemplateNotFound {
                RenderError::NotFound(template.to_owned())
            } else {
                RenderError::Template {
                    template: template.to_owned(),
                    source,
                }
            }
        };

        let compiled = self.env.get_template(template).map_err(to_error)?;
        let html = compiled
            .render(context! { args => minijinja::Value::from_serialize(args) })
            .map_err(to_error)?;

        tracing::debug!(template, bytes = html.len(), "Rendered template");
        Ok(html)
    }
}

fn base_environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.add_filter("load", load);
    env.add_function("load", load);
    env
}

/// `load(kind, **data)`: directive string for the client router.
fn load(kind: &str, kwargs: Kwargs) -> Result<String, minijinja::Error> {
    let mut data = Map::new();
    for key in kwargs.args() {
        let value: minijinja::Value = kwargs.get(key)?;
        let value = serde_json::to_value(&value).map_err(|e| {
            minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("load: `{key}` is not JSON-serializable"),
            )
            .with_source(e)
        })?;
        data.insert(key.to_owned(), value);
    }

    sw_directive::directive(kind, &data)
        .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, format!("load: {e}")))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("args must be an object"),
        }
    }

    #[test]
    fn test_render_with_args() {
        let env = TemplateEnv::from_sources([("hello.txt", "Hello {{ args.name }}!")]).unwrap();

        let html = env.render("hello.txt", &args(json!({"name": "Ada"}))).unwrap();

        assert_eq!(html, "Hello Ada!");
    }

    #[test]
    fn test_render_html_escapes_args() {
        let env = TemplateEnv::from_sources([("p.html", "<p>{{ args.text }}</p>")]).unwrap();

        let html = env
            .render("p.html", &args(json!({"text": "<b>bold</b>"})))
            .unwrap();

        assert!(html.starts_with("<p>"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn test_render_missing_template() {
        let env = TemplateEnv::from_sources(Vec::<(String, String)>::new()).unwrap();

        let err = env.render("missing.html", &Map::new()).unwrap_err();

        assert!(matches!(err, RenderError::NotFound(ref name) if name == "missing.html"));
    }

    #[test]
    fn test_syntax_error_reported_at_build() {
        let result = TemplateEnv::from_sources([("broken.html", "{{ args.name ")]);

        assert!(matches!(result, Err(RenderError::Template { .. })));
    }

    #[test]
    fn test_load_filter() {
        let env = TemplateEnv::from_sources([(
            "nav.txt",
            "{{ 'page'|load(template='about.html', title='About') }}",
        )])
        .unwrap();

        let out = env.render("nav.txt", &Map::new()).unwrap();

        assert_eq!(
            out,
            r#"loadPage({"request": "page", "template": "about.html", "title": "About", "args": {}, "reloadRequired": []})"#
        );
    }

    #[test]
    fn test_load_function_section() {
        let env = TemplateEnv::from_sources([(
            "side.txt",
            "{{ load('section', template='news.html', title='News', args={'n': 3}, reload=['customJS'], target_id='side') }}",
        )])
        .unwrap();

        let out = env.render("side.txt", &Map::new()).unwrap();

        assert!(out.starts_with(r#"loadPage({"request": "section""#));
        assert!(out.contains(r#""args": {"n": 3}"#));
        assert!(out.contains(r#""reloadRequired": ["customJS"]"#));
        assert!(out.ends_with(r#", "side")"#));
    }

    #[test]
    fn test_load_error_uses_template_args() {
        let env =
            TemplateEnv::from_sources([("err.txt", "{{ 'error'|load(error=args.reason) }}")])
                .unwrap();

        let out = env
            .render("err.txt", &args(json!({"reason": "boom"})))
            .unwrap();

        assert!(out.contains(r#""error": "boom""#));
        assert!(out.contains(r#""error.html""#));
    }

    #[test]
    fn test_load_in_html_attribute_is_escaped() {
        let env = TemplateEnv::from_sources([(
            "link.html",
            r#"<a onclick="{{ 'page'|load(template='a.html', title='A') }}">A</a>"#,
        )])
        .unwrap();

        let out = env.render("link.html", &Map::new()).unwrap();

        assert!(out.contains("loadPage("));
        assert!(!out.contains(r#"{"request""#));
    }

    #[test]
    fn test_load_with_missing_field_fails_render() {
        let env = TemplateEnv::from_sources([("bad.txt", "{{ 'page'|load(title='No template') }}")])
            .unwrap();

        let err = env.render("bad.txt", &Map::new()).unwrap_err();

        assert!(matches!(err, RenderError::Template { .. }));
    }

    #[test]
    fn test_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>{{ args.title }}</h1>").unwrap();

        let env = TemplateEnv::from_dir(dir.path());

        assert!(env.has_template("index.html"));
        assert!(!env.has_template("other.html"));
        assert!(!env.has_template("../index.html"));
        assert_eq!(
            env.render("index.html", &args(json!({"title": "Hi"}))).unwrap(),
            "<h1>Hi</h1>"
        );
    }
}
