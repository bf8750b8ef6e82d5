use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// Trait for structured payloads extracted from free-form model output.
///
/// The schema string is embedded into generation prompts so the model knows
/// the exact shape to produce; parsing back goes through
/// [`super::parser::parse_llm_json`].
pub trait LlmExtract: DeserializeOwned + JsonSchema {
    /// Generate JSON schema string for use in LLM prompts
    fn json_schema_string() -> String {
        let mut gen = SchemaGenerator::default();
        let schema = gen.root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }
}
