pub mod language;
pub mod lookup;
pub mod preprocess;
pub mod prompt;

pub use language::{LanguageProcessor, ValidationError};
pub use lookup::{LookupError, LookupRequest, LookupResult, LookupService};
pub use prompt::{LearningStyle, Personalization, PromptBuilder, PromptError};
