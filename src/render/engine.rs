//! Default template engine backed by minijinja.

use minijinja::Environment;

use crate::render::{RenderError, RenderProperties, Renderer};

/// Renders templates with minijinja.
///
/// Besides the properties, templates can call `now_unix()` and `now()`. Both
/// have one-second granularity, which the rendered-output cache TTL must stay
/// below.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_function("now_unix", now_unix);
        env.add_function("now", now_rfc3339);

        Self { env }
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TemplateEngine {
    fn render(&self, template: &str, props: &RenderProperties) -> Result<String, RenderError> {
        Ok(self.env.render_str(template, props)?)
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_tokens() {
        let engine = TemplateEngine::new();
        let mut props = RenderProperties::new(404, "Not Found", "page is gone");
        props.host = Some("example.com".into());

        let out = engine
            .render("{{ code }}|{{message}}|{{ description }}|{{ host }}|{{ request_id }}", &props)
            .unwrap();
        assert_eq!(out, "404|Not Found|page is gone|example.com|");
    }

    #[test]
    fn test_render_conditionals() {
        let engine = TemplateEngine::new();
        let mut props = RenderProperties::new(500, "Internal Server Error", "");

        let tpl = "{% if show_details %}details{% else %}plain{% endif %}";
        assert_eq!(engine.render(tpl, &props).unwrap(), "plain");

        props.show_request_details = true;
        assert_eq!(engine.render(tpl, &props).unwrap(), "details");
    }

    #[test]
    fn test_now_unix_is_current() {
        let engine = TemplateEngine::new();
        let before = chrono::Utc::now().timestamp();
        let out = engine.render("{{ now_unix() }}", &RenderProperties::default()).unwrap();
        let rendered: i64 = out.parse().unwrap();
        assert!(rendered >= before && rendered <= before + 2);
    }

    #[test]
    fn test_syntax_error_is_reported() {
        let engine = TemplateEngine::new();
        let err = engine
            .render("{{ message ", &RenderProperties::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::Template(_)));
        assert!(!err.to_string().is_empty());
    }
}
