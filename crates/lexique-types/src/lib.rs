pub mod level;
pub mod types;

pub use level::{CefrLevel, DifficultyLevel, Familiarity};
pub use types::{EXAMPLE_COUNT, Examples, MetadataUpdate, NewWord, Word, WordFilter};
