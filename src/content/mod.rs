/*!
 * Generated content: schemas, format instructions and prompt building.
 */

pub mod instructions;
pub mod prompts;
pub mod schema;

pub use instructions::{format_instructions, json_schema};
pub use prompts::{build_prompt, PromptMessage, PromptPayload, PromptTemplate};
pub use schema::{
    ContentKind, ContentSchema, FieldDescriptor, FieldType, FlashcardItem, GeneratedFlashcards,
    GeneratedQuiz, GenerationResult, QuizQuestion, SchemaDescriptor, SchemaViolation,
    StructuredContent,
};
