/*!
 * Content generation pipeline.
 *
 * - `settings`: explicit generator configuration and retry policy
 * - `parser`: JSON extraction and schema validation of model output
 * - `orchestrator`: the `ContentGenerator` tying transcripts, prompts and
 *   providers together
 */

pub mod orchestrator;
pub mod parser;
pub mod settings;

pub use orchestrator::{ContentGenerator, GenerationStats};
pub use parser::{extract_json, parse_content};
pub use settings::{GeneratorSettings, RetryPolicy};
