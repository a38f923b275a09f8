pub mod processor;
pub mod translator;

pub use processor::FrenchProcessor;
pub use translator::GeminiTranslator;
