//! Template renderer and rendering functionality for g8gen.
//! Compiles transcoded template text against a filter registry and executes it
//! with a field map. Used for file contents and for relative path strings alike.
use log::trace;

use crate::error::{Error, Result};
use crate::fields::FieldMap;
use crate::filters::{Filter, FilterRegistry};
use crate::transcoder::{transcode, CanonicalTemplate, Segment};

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders template bytes with the given fields.
    ///
    /// # Arguments
    /// * `template` - Raw template text, placeholders in either dialect
    /// * `fields` - Field values for placeholder resolution
    ///
    /// # Returns
    /// * `Result<Vec<u8>>` - Rendered bytes; nothing is produced on error
    fn render(&self, template: &[u8], fields: &FieldMap) -> Result<Vec<u8>>;

    /// Renders a string template, such as a relative path.
    fn render_str(&self, template: &str, fields: &FieldMap) -> Result<String> {
        let rendered = self.render(template.as_bytes(), fields)?;
        String::from_utf8(rendered).map_err(|e| Error::InvalidPath {
            path: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }
}

/// A directive with its filters already resolved.
#[derive(Debug, Clone)]
struct Directive {
    field: String,
    pipeline: Vec<Filter>,
}

#[derive(Debug, Clone)]
enum Part {
    Literal(Vec<u8>),
    Directive(Directive),
}

/// Executable form of a template. Every filter it uses is known to exist.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    parts: Vec<Part>,
}

/// Native placeholder engine.
#[derive(Debug, Clone, Default)]
pub struct TemplateEngine {
    filters: FilterRegistry,
}

impl TemplateEngine {
    /// Creates an engine with the built-in filters.
    pub fn new() -> Self {
        Self { filters: FilterRegistry::new() }
    }

    pub fn with_filters(filters: FilterRegistry) -> Self {
        Self { filters }
    }

    /// Resolves every filter name of a transcoded template.
    ///
    /// # Errors
    /// * `Error::UnknownFilter` for the first filter name the registry lacks
    pub fn compile(&self, template: CanonicalTemplate) -> Result<CompiledTemplate> {
        let parts = template
            .into_segments()
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(bytes) => Ok(Part::Literal(bytes)),
                Segment::Placeholder(expr) => {
                    let pipeline = expr
                        .filters
                        .iter()
                        .map(|name| self.filters.lookup(name))
                        .collect::<Result<Vec<_>>>()?;
                    Ok(Part::Directive(Directive { field: expr.field, pipeline }))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CompiledTemplate { parts })
    }

    /// Runs a compiled template. Filter output is written as-is and never scanned again.
    ///
    /// # Errors
    /// * `Error::UnresolvedField` if a referenced field has no value
    pub fn execute(&self, template: &CompiledTemplate, fields: &FieldMap) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        for part in &template.parts {
            match part {
                Part::Literal(bytes) => output.extend_from_slice(bytes),
                Part::Directive(directive) => {
                    let value = fields.get(&directive.field).ok_or_else(|| {
                        Error::UnresolvedField { field: directive.field.clone() }
                    })?;
                    let value = directive
                        .pipeline
                        .iter()
                        .fold(value.to_string(), |acc, filter| filter(&acc));
                    trace!("Resolved '{}' to '{}'", directive.field, value);
                    output.extend_from_slice(value.as_bytes());
                }
            }
        }
        Ok(output)
    }
}

impl TemplateRenderer for TemplateEngine {
    /// Transcodes, compiles and executes in one go.
    ///
    /// # Errors
    /// * `Error::Syntax` for malformed placeholders
    /// * `Error::UnknownFilter` for filters missing from the registry
    /// * `Error::UnresolvedField` for fields missing from `fields`
    fn render(&self, template: &[u8], fields: &FieldMap) -> Result<Vec<u8>> {
        let canonical = transcode(template)?;
        if !canonical.has_placeholders() {
            return Ok(canonical.to_bytes());
        }
        let compiled = self.compile(canonical)?;
        self.execute(&compiled, fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_render_both_dialects() {
        let engine = TemplateEngine::new();
        let result = engine
            .render_str(
                r#"hello $name;format="lower"$; HELLO $name__upper$"#,
                &fields(&[("name", "WoRlD")]),
            )
            .unwrap();
        assert_eq!(result, "hello world; HELLO WORLD");
    }

    #[test]
    fn test_pipeline_runs_left_to_right() {
        let engine = TemplateEngine::new();
        let fields = fields(&[("name", "hello world")]);
        assert_eq!(engine.render_str("$name__Camel__upper$", &fields).unwrap(), "HELLOWORLD");
        assert_eq!(engine.render_str("$name__upper__camel$", &fields).unwrap(), "hELLOWORLD");
    }

    #[test]
    fn test_text_without_placeholders_is_returned_unchanged() {
        let engine = TemplateEngine::new();
        let text = "plain $ text with \\ backslashes";
        assert_eq!(engine.render_str(text, &FieldMap::new()).unwrap(), text);
    }

    #[test]
    fn test_unresolved_field_fails() {
        let engine = TemplateEngine::new();
        let result = engine.render_str("hi $missing$", &fields(&[("name", "x")]));
        assert!(matches!(result, Err(Error::UnresolvedField { field }) if field == "missing"));
    }

    #[test]
    fn test_unknown_filter_fails_before_execution() {
        let engine = TemplateEngine::new();
        let canonical = transcode(b"$name__shout$").unwrap();
        let result = engine.compile(canonical);
        assert!(matches!(result, Err(Error::UnknownFilter { name }) if name == "shout"));
    }

    #[test]
    fn test_filter_output_is_not_rescanned() {
        let engine = TemplateEngine::new();
        let fields = fields(&[("a", "$b$"), ("b", "nope")]);
        assert_eq!(engine.render_str("$a$", &fields).unwrap(), "$b$");
    }

    #[test]
    fn test_compiled_template_can_be_reused() {
        let engine = TemplateEngine::new();
        let compiled = engine.compile(transcode(b"$x$-$y__upper$-$x$").unwrap()).unwrap();
        let first = engine.execute(&compiled, &fields(&[("x", "1"), ("y", "a")])).unwrap();
        let second = engine.execute(&compiled, &fields(&[("x", "2"), ("y", "b")])).unwrap();
        assert_eq!(first, b"1-A-1");
        assert_eq!(second, b"2-B-2");
    }

    #[test]
    fn test_custom_registry() {
        let mut registry = FilterRegistry::new();
        registry.register("reverse", |v| v.chars().rev().collect());
        let engine = TemplateEngine::with_filters(registry);
        let result = engine.render_str("$name__reverse$", &fields(&[("name", "abc")])).unwrap();
        assert_eq!(result, "cba");
    }
}
