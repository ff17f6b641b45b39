pub mod generated_sentence;
pub mod sentence_template;
pub mod tag;
pub mod tag_vocab_mapping;
pub mod tagging;
pub mod template_slot;
pub mod vocabulary;

pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|text| !text.is_empty())
}
