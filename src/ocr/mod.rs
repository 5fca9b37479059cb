pub mod engine;
pub mod parser;
pub mod prompt;

pub use engine::{EngineError, MockVisionEngine, OpenAiVisionEngine, VisionEngine};
pub use parser::{parse, OcrDraft, OcrParseError, ParseOptions};
pub use prompt::PromptLanguage;
