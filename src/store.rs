use crate::models::generated_sentence::{GeneratedSentence, NewGeneratedSentence, SlotFilling};
use crate::models::sentence_template::SentenceTemplate;
use crate::models::tag::Tag;
use crate::models::tag_vocab_mapping::TagVocabMapping;
use crate::models::template_slot::TemplateSlot;
use crate::models::vocabulary::{Vocabulary, VocabularyCriteria};
use diesel::result::Error;
use diesel::SqliteConnection;

pub trait GenerationStore {
    fn tag_exists(&mut self, tag_id: i32) -> Result<bool, Error>;

    fn active_templates_for_tag(&mut self, tag_id: i32) -> Result<Vec<SentenceTemplate>, Error>;

    fn slots_for_template(&mut self, template_id: i32) -> Result<Vec<TemplateSlot>, Error>;

    fn mappings_for_tag(&mut self, tag_id: i32) -> Result<Vec<TagVocabMapping>, Error>;

    fn matching_vocabulary(&mut self, criteria: &VocabularyCriteria) -> Result<Vec<Vocabulary>, Error>;

    /// Persists the sentence and all of its slot fillings, or nothing.
    fn record_generation(
        &mut self,
        sentence: &NewGeneratedSentence,
        fillings: &[SlotFilling],
    ) -> Result<i32, Error>;
}

impl GenerationStore for SqliteConnection {
    fn tag_exists(&mut self, tag_id: i32) -> Result<bool, Error> {
        Ok(Tag::find(self, tag_id)?.is_some())
    }

    fn active_templates_for_tag(&mut self, tag_id: i32) -> Result<Vec<SentenceTemplate>, Error> {
        SentenceTemplate::active_for_tag(self, tag_id)
    }

    fn slots_for_template(&mut self, template_id: i32) -> Result<Vec<TemplateSlot>, Error> {
        TemplateSlot::for_template(self, template_id)
    }

    fn mappings_for_tag(&mut self, tag_id: i32) -> Result<Vec<TagVocabMapping>, Error> {
        TagVocabMapping::for_tag(self, tag_id)
    }

    fn matching_vocabulary(&mut self, criteria: &VocabularyCriteria) -> Result<Vec<Vocabulary>, Error> {
        Vocabulary::matching(self, criteria)
    }

    fn record_generation(
        &mut self,
        sentence: &NewGeneratedSentence,
        fillings: &[SlotFilling],
    ) -> Result<i32, Error> {
        GeneratedSentence::record(self, sentence, fillings)
    }
}
