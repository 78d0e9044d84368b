/*!
 * Structured output contracts for generated learning content.
 *
 * Each content type is a plain value object that is validated right after it
 * is deserialized from model output. A `SchemaDescriptor` describes the same
 * shape in a machine-readable form so format instructions can be derived
 * from it without touching the model-calling code.
 */

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of questions in a generated quiz
pub const QUIZ_QUESTION_COUNT: usize = 3;

/// Number of answer options per quiz question
pub const QUIZ_OPTION_COUNT: usize = 4;

/// Number of cards in a generated flashcard set
pub const FLASHCARD_COUNT: usize = 5;

/// The kinds of content the pipeline can generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Quiz,
    Flashcards,
}

impl ContentKind {
    /// All content kinds, in generation order
    pub const ALL: [ContentKind; 2] = [ContentKind::Quiz, ContentKind::Flashcards];

    /// Schema descriptor for this kind
    pub fn descriptor(&self) -> SchemaDescriptor {
        match self {
            Self::Quiz => GeneratedQuiz::descriptor(),
            Self::Flashcards => GeneratedFlashcards::descriptor(),
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiz => write!(f, "quiz"),
            Self::Flashcards => write!(f, "flashcards"),
        }
    }
}

impl std::str::FromStr for ContentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "quiz" => Ok(Self::Quiz),
            "flashcards" | "flashcard" => Ok(Self::Flashcards),
            _ => Err(anyhow::anyhow!("Invalid content kind: {}", s)),
        }
    }
}

/// A constraint broken by otherwise well-formed content
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaViolation {
    #[error("field `{field}` must contain exactly {expected} item(s), found {actual}")]
    WrongCount {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("field `{field}` is {value}, which is not a valid index into {len} option(s)")]
    IndexOutOfRange {
        field: String,
        value: u32,
        len: usize,
    },

    #[error("field `{field}` must not be empty")]
    EmptyField { field: String },
}

fn require_count(field: &str, expected: usize, actual: usize) -> Result<(), SchemaViolation> {
    if expected == actual {
        Ok(())
    } else {
        Err(SchemaViolation::WrongCount {
            field: field.to_string(),
            expected,
            actual,
        })
    }
}

fn require_text(field: impl Into<String>, value: &str) -> Result<(), SchemaViolation> {
    if value.trim().is_empty() {
        Err(SchemaViolation::EmptyField {
            field: field.into(),
        })
    } else {
        Ok(())
    }
}

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// The question text
    pub question: String,

    /// Exactly four possible answers
    pub options: Vec<String>,

    /// 0-based index of the correct option
    pub correct: u32,

    /// Brief explanation of the correct answer
    #[serde(alias = "explaination")]
    pub explanation: String,
}

impl QuizQuestion {
    fn validate(&self, position: usize) -> Result<(), SchemaViolation> {
        require_text(format!("quiz[{}].question", position), &self.question)?;
        require_count(
            &format!("quiz[{}].options", position),
            QUIZ_OPTION_COUNT,
            self.options.len(),
        )?;
        if self.correct as usize >= self.options.len() {
            return Err(SchemaViolation::IndexOutOfRange {
                field: format!("quiz[{}].correct", position),
                value: self.correct,
                len: self.options.len(),
            });
        }
        for (index, option) in self.options.iter().enumerate() {
            require_text(format!("quiz[{}].options[{}]", position, index), option)?;
        }
        require_text(format!("quiz[{}].explanation", position), &self.explanation)
    }

    /// The text of the correct option
    pub fn correct_option(&self) -> Option<&str> {
        self.options.get(self.correct as usize).map(String::as_str)
    }
}

/// The quiz structure the model must output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuiz {
    /// The title of the video
    pub video_title: String,

    /// Exactly three questions
    pub quiz: Vec<QuizQuestion>,
}

/// A single flashcard (front: concept, back: definition)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardItem {
    pub front: String,
    pub back: String,
}

/// The flashcard structure the model must output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFlashcards {
    /// The title of the video
    pub video_title: String,

    /// Exactly five flashcards
    pub flashcards: Vec<FlashcardItem>,
}

/// Shared behavior of every structured content type.
pub trait ContentSchema: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// The content kind this type represents
    const KIND: ContentKind;

    /// Machine-readable description of the expected shape
    fn descriptor() -> SchemaDescriptor;

    /// Check the invariants serde cannot express (cardinality, index bounds)
    fn validate(&self) -> Result<(), SchemaViolation>;

    /// Title of the video the content was generated for
    fn video_title(&self) -> &str;
}

impl ContentSchema for GeneratedQuiz {
    const KIND: ContentKind = ContentKind::Quiz;

    fn descriptor() -> SchemaDescriptor {
        SchemaDescriptor::new(
            ContentKind::Quiz,
            "GeneratedQuiz",
            "The final quiz structure the AI must output.",
            vec![
                FieldDescriptor::new(
                    "video_title",
                    "The title of the YouTube video.",
                    FieldType::String,
                ),
                FieldDescriptor::new(
                    "quiz",
                    "A list of 3 high-quality, knowledge-based quiz questions.",
                    FieldType::Array {
                        len: QUIZ_QUESTION_COUNT,
                        items: Box::new(FieldType::Object(vec![
                            FieldDescriptor::new(
                                "question",
                                "The question text.",
                                FieldType::String,
                            ),
                            FieldDescriptor::new(
                                "options",
                                "List of 4 possible answers.",
                                FieldType::Array {
                                    len: QUIZ_OPTION_COUNT,
                                    items: Box::new(FieldType::String),
                                },
                            ),
                            FieldDescriptor::new(
                                "correct",
                                "The 0-based index of the correct option (0, 1, 2, or 3).",
                                FieldType::Integer {
                                    min: 0,
                                    max: QUIZ_OPTION_COUNT as i64 - 1,
                                },
                            ),
                            FieldDescriptor::new(
                                "explanation",
                                "A brief explanation of the correct answer.",
                                FieldType::String,
                            ),
                        ])),
                    },
                ),
            ],
        )
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        require_text("video_title", &self.video_title)?;
        require_count("quiz", QUIZ_QUESTION_COUNT, self.quiz.len())?;
        for (position, question) in self.quiz.iter().enumerate() {
            question.validate(position)?;
        }
        Ok(())
    }

    fn video_title(&self) -> &str {
        &self.video_title
    }
}

impl ContentSchema for GeneratedFlashcards {
    const KIND: ContentKind = ContentKind::Flashcards;

    fn descriptor() -> SchemaDescriptor {
        SchemaDescriptor::new(
            ContentKind::Flashcards,
            "GeneratedFlashcards",
            "The final flashcard structure the AI must output.",
            vec![
                FieldDescriptor::new(
                    "video_title",
                    "The title of the YouTube video.",
                    FieldType::String,
                ),
                FieldDescriptor::new(
                    "flashcards",
                    "A list of 5 key-concept flashcards.",
                    FieldType::Array {
                        len: FLASHCARD_COUNT,
                        items: Box::new(FieldType::Object(vec![
                            FieldDescriptor::new(
                                "front",
                                "Question on key concept or term from the video.",
                                FieldType::String,
                            ),
                            FieldDescriptor::new(
                                "back",
                                "The definition or explanation of the concept.",
                                FieldType::String,
                            ),
                        ])),
                    },
                ),
            ],
        )
    }

    fn validate(&self) -> Result<(), SchemaViolation> {
        require_text("video_title", &self.video_title)?;
        require_count("flashcards", FLASHCARD_COUNT, self.flashcards.len())?;
        for (position, card) in self.flashcards.iter().enumerate() {
            require_text(format!("flashcards[{}].front", position), &card.front)?;
            require_text(format!("flashcards[{}].back", position), &card.back)?;
        }
        Ok(())
    }

    fn video_title(&self) -> &str {
        &self.video_title
    }
}

/// Structured content of either kind, as returned by kind-erased generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum StructuredContent {
    Quiz(GeneratedQuiz),
    Flashcards(GeneratedFlashcards),
}

impl StructuredContent {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Quiz(_) => ContentKind::Quiz,
            Self::Flashcards(_) => ContentKind::Flashcards,
        }
    }

    pub fn video_title(&self) -> &str {
        match self {
            Self::Quiz(quiz) => &quiz.video_title,
            Self::Flashcards(cards) => &cards.video_title,
        }
    }

    pub fn into_quiz(self) -> Option<GeneratedQuiz> {
        match self {
            Self::Quiz(quiz) => Some(quiz),
            Self::Flashcards(_) => None,
        }
    }

    pub fn into_flashcards(self) -> Option<GeneratedFlashcards> {
        match self {
            Self::Flashcards(cards) => Some(cards),
            Self::Quiz(_) => None,
        }
    }
}

impl From<GeneratedQuiz> for StructuredContent {
    fn from(quiz: GeneratedQuiz) -> Self {
        Self::Quiz(quiz)
    }
}

impl From<GeneratedFlashcards> for StructuredContent {
    fn from(cards: GeneratedFlashcards) -> Self {
        Self::Flashcards(cards)
    }
}

/// The quiz and flashcards generated for one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub quiz: GeneratedQuiz,
    pub flashcards: GeneratedFlashcards,
}

impl GenerationResult {
    pub fn into_parts(self) -> (GeneratedQuiz, GeneratedFlashcards) {
        (self.quiz, self.flashcards)
    }
}

/// Type of a single schema field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Integer { min: i64, max: i64 },
    Array { items: Box<FieldType>, len: usize },
    Object(Vec<FieldDescriptor>),
}

impl FieldType {
    /// Short human-readable type name used in format instructions
    pub fn type_name(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Integer { min, max } => format!("integer in [{}, {}]", min, max),
            Self::Array { items, len } => format!("array of exactly {} {}", len, items.type_name()),
            Self::Object(_) => "object".to_string(),
        }
    }
}

/// A named field within a schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub field_type: FieldType,
}

impl FieldDescriptor {
    pub fn new(name: &'static str, description: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            description,
            field_type,
        }
    }
}

/// Machine-readable description of a content schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDescriptor {
    /// The content kind this schema describes
    pub kind: ContentKind,
    pub name: &'static str,
    pub description: &'static str,
    pub fields: Vec<FieldDescriptor>,
}

impl SchemaDescriptor {
    pub fn new(
        kind: ContentKind,
        name: &'static str,
        description: &'static str,
        fields: Vec<FieldDescriptor>,
    ) -> Self {
        Self {
            kind,
            name,
            description,
            fields,
        }
    }
}
