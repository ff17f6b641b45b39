pub mod catcher;
pub mod generate;
pub mod generated_sentences;
pub mod root;
pub mod taggings;
pub mod tags;
pub mod templates;
pub mod vocabulary;
