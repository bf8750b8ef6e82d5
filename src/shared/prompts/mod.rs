//! Prompt template management module.
//!
//! Templates are stored in `templates/prompts/` and use Jinja2 syntax. They
//! are loaded once at first use and never mutated afterwards.

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::Value;
use std::collections::HashMap;

/// Render the e-book generation system prompt.
pub fn render_ebook_system_prompt() -> Result<String, TemplateError> {
    render_template("ebooks/system.jinja", &HashMap::new())
}

/// Render the e-book generation user prompt.
///
/// # Arguments
/// * `topic` - The topic the caller asked for
/// * `json_schema` - JSON schema string for the expected draft shape
pub fn render_ebook_user_prompt(
    topic: &str,
    json_schema: &str,
) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("topic", Value::from(topic));
    ctx.insert("json_schema", Value::from(json_schema));

    render_template("ebooks/user.jinja", &ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ebook_user_prompt_embeds_topic_and_schema() {
        let prompt =
            render_ebook_user_prompt("finding a family doctor", r#"{"type":"object"}"#).unwrap();

        assert!(prompt.contains("finding a family doctor"));
        assert!(prompt.contains(r#"{"type":"object"}"#));
    }

    #[test]
    fn ebook_system_prompt_renders() {
        let prompt = render_ebook_system_prompt().unwrap();
        assert!(prompt.contains("content writer"));
    }
}
