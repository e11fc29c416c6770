//! User input and interaction handling.
//! Collects field values from preloaded answers, terminal prompts or template defaults.

use std::io::Read;

use dialoguer::Input;
use indexmap::IndexMap;
use log::debug;

use crate::config::TemplateConfig;
use crate::constants::{DESCRIPTION_FIELD, VERBATIM_FIELD};
use crate::error::{Error, Result};
use crate::fields::FieldMap;

/// Asks the user for field values.
pub trait Prompter {
    /// Returns the answer for `key`; an empty answer means "keep the default".
    fn ask(&self, key: &str, default: &str) -> Result<String>;
}

/// Terminal prompts via dialoguer.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for DialoguerPrompter {
    fn ask(&self, key: &str, default: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(key)
            .default(default.to_string())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| Error::PromptError(e.to_string()))
    }
}

/// System fields are carried over from the defaults and never asked for.
fn is_system_field(key: &str) -> bool {
    key == DESCRIPTION_FIELD || key == VERBATIM_FIELD
}

/// Builds the field map for a run.
///
/// For each key in declaration order: a preloaded answer wins; otherwise the user is asked
/// unless `no_inputs` is set; a blank answer falls back to the template default.
/// Preloaded answers for keys the template does not declare are added at the end.
pub fn collect_fields(
    prompt: &dyn Prompter,
    config: &TemplateConfig,
    preloaded: &IndexMap<String, String>,
    no_inputs: bool,
) -> Result<FieldMap> {
    let mut fields = FieldMap::new();

    for (key, default) in &config.defaults {
        let value = if let Some(answer) = preloaded.get(key) {
            debug!("Using preloaded answer for '{}'", key);
            answer.clone()
        } else if no_inputs || is_system_field(key) {
            default.clone()
        } else {
            let answer = prompt.ask(key, default)?;
            if answer.trim().is_empty() {
                default.clone()
            } else {
                answer
            }
        };
        fields.insert(key.clone(), value);
    }

    for (key, answer) in preloaded {
        if !fields.contains_key(key) {
            fields.insert(key.clone(), answer.clone());
        }
    }

    Ok(fields)
}

/// Reads preloaded answers: a JSON object whose values are strings, numbers or booleans.
/// Empty input means no answers.
pub fn load_answers<R: Read>(mut reader: R) -> Result<IndexMap<String, String>> {
    let mut buffer = String::new();
    reader.read_to_string(&mut buffer)?;
    parse_answers(&buffer)
}

pub fn parse_answers(input: &str) -> Result<IndexMap<String, String>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(IndexMap::new());
    }

    let raw: IndexMap<String, serde_json::Value> =
        serde_json::from_str(input).map_err(|e| Error::AnswersError(e.to_string()))?;

    raw.into_iter()
        .map(|(key, value)| {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(Error::AnswersError(format!(
                        "value of '{key}' must be a string, got {other}"
                    )))
                }
            };
            Ok((key, value))
        })
        .collect()
}
