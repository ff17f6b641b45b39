use crate::composer::{compose, Token};
use crate::levels::{Difficulty, DisplayField, JlptLevel, PolitenessLevel};
use crate::models::generated_sentence::{NewGeneratedSentence, SlotFilling};
use crate::models::sentence_template::SentenceTemplate;
use crate::models::tag_vocab_mapping::TagVocabMapping;
use crate::models::template_slot::TemplateSlot;
use crate::models::vocabulary::{Vocabulary, VocabularyCriteria};
use crate::store::GenerationStore;
use rand::seq::SliceRandom;
use rand::Rng;
use rocket::serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VocabularyFilters {
    pub difficulty: Option<Difficulty>,
    pub jlpt_level: Option<JlptLevel>,
    pub politeness_level: Option<PolitenessLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationRequest {
    pub tag_id: i32,
    pub filters: VocabularyFilters,
    pub display_field: DisplayField,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Tag {0} does not exist.")]
    UnknownTag(i32),
    #[error("No active templates mapped to this tag yet.")]
    NoEligibleTemplate,
    #[error("Selected template has no slots defined.")]
    EmptyTemplate,
    #[error("No vocabulary found for slot \"{0}\" (check topic/subtopic and filters).")]
    NoVocabularyForSlot(String),
    #[error("store failure: {0}")]
    Store(#[from] diesel::result::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlot {
    pub slot_name: String,
    pub vocabulary: Vocabulary,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SentenceMetadata {
    pub difficulty: Option<String>,
    pub jlpt_level: Option<String>,
    pub politeness_level: Option<String>,
}

#[derive(Serialize, Debug, PartialEq)]
pub struct Generation {
    pub id: i32,
    #[serde(rename = "templateId")]
    pub template_id: i32,
    #[serde(rename = "japaneseSentence")]
    pub japanese_sentence: String,
    #[serde(rename = "englishSentence")]
    pub english_sentence: Option<String>,
    pub politeness_level: Option<String>,
    pub jlpt_level: Option<String>,
    pub difficulty: Option<String>,
    pub source_tag_id: i32,
    pub tokens: Vec<Token>,
}

fn select_template<S, R>(
    store: &mut S,
    rng: &mut R,
    tag_id: i32,
) -> Result<SentenceTemplate, GenerationError>
where
    S: GenerationStore + ?Sized,
    R: Rng + ?Sized,
{
    store
        .active_templates_for_tag(tag_id)?
        .choose(rng)
        .cloned()
        .ok_or(GenerationError::NoEligibleTemplate)
}

pub fn criteria_for(
    slot: &TemplateSlot,
    filters: &VocabularyFilters,
    mappings: &[TagVocabMapping],
) -> VocabularyCriteria {
    VocabularyCriteria {
        part_of_speech: slot.required_part_of_speech().to_string(),
        difficulty: filters.difficulty.map(|level| level.as_str().to_string()),
        jlpt_level: filters.jlpt_level.map(|level| level.as_str().to_string()),
        politeness_level: filters.politeness_level.map(|level| level.as_str().to_string()),
        topics: mappings.to_vec(),
    }
}

fn resolve_slots<S, R>(
    store: &mut S,
    rng: &mut R,
    slots: &[TemplateSlot],
    filters: &VocabularyFilters,
    mappings: &[TagVocabMapping],
) -> Result<Vec<ResolvedSlot>, GenerationError>
where
    S: GenerationStore + ?Sized,
    R: Rng + ?Sized,
{
    slots
        .iter()
        .map(|slot| -> Result<ResolvedSlot, GenerationError> {
            let candidates = store.matching_vocabulary(&criteria_for(slot, filters, mappings))?;
            let vocabulary = candidates
                .choose(rng)
                .cloned()
                .ok_or_else(|| GenerationError::NoVocabularyForSlot(slot.slot_name.clone()))?;

            Ok(ResolvedSlot {
                slot_name: slot.slot_name.clone(),
                vocabulary,
            })
        })
        .collect()
}

fn first_present<'a, F>(resolved: &'a [ResolvedSlot], field: F) -> Option<String>
where
    F: Fn(&'a Vocabulary) -> &'a Option<String>,
{
    resolved
        .iter()
        .filter_map(|slot| field(&slot.vocabulary).as_deref())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

/// Caller-supplied levels win. Otherwise difficulty is the highest any word
/// has, and JLPT level and politeness come from the first word carrying one.
pub fn aggregate_metadata(filters: &VocabularyFilters, resolved: &[ResolvedSlot]) -> SentenceMetadata {
    let difficulty = match filters.difficulty {
        Some(difficulty) => Some(difficulty.as_str().to_string()),
        None => Difficulty::BY_PRIORITY
            .iter()
            .find(|level| {
                resolved
                    .iter()
                    .any(|slot| slot.vocabulary.difficulty.as_deref() == Some(level.as_str()))
            })
            .map(|level| level.as_str().to_string()),
    };

    SentenceMetadata {
        difficulty,
        jlpt_level: filters
            .jlpt_level
            .map(|level| level.as_str().to_string())
            .or_else(|| first_present(resolved, |vocabulary| &vocabulary.jlpt_level)),
        politeness_level: filters
            .politeness_level
            .map(|level| level.as_str().to_string())
            .or_else(|| first_present(resolved, |vocabulary| &vocabulary.politeness_level)),
    }
}

/// Nothing is written unless every step succeeds.
pub fn generate<S, R>(
    store: &mut S,
    rng: &mut R,
    request: &GenerationRequest,
) -> Result<Generation, GenerationError>
where
    S: GenerationStore + ?Sized,
    R: Rng + ?Sized,
{
    let tag_id = request.tag_id;
    if !store.tag_exists(tag_id)? {
        return Err(GenerationError::UnknownTag(tag_id));
    }

    let template = select_template(store, rng, tag_id)?;
    let slots = store.slots_for_template(template.id)?;
    if slots.is_empty() {
        return Err(GenerationError::EmptyTemplate);
    }

    let mappings = store.mappings_for_tag(tag_id)?;
    let resolved = resolve_slots(store, rng, &slots, &request.filters, &mappings)?;

    let composition = compose(
        &template.template_pattern,
        resolved.iter().map(|slot| {
            (
                slot.slot_name.as_str(),
                slot.vocabulary.display_form(request.display_field),
            )
        }),
    );
    let metadata = aggregate_metadata(&request.filters, &resolved);

    let fillings = resolved
        .iter()
        .map(|slot| SlotFilling {
            slot_name: slot.slot_name.clone(),
            vocabulary_id: slot.vocabulary.id,
        })
        .collect::<Vec<SlotFilling>>();
    let id = store.record_generation(
        &NewGeneratedSentence {
            template_id: Some(template.id),
            japanese_sentence: Some(composition.sentence.clone()),
            english_sentence: None,
            politeness_level: metadata.politeness_level.clone(),
            jlpt_level: metadata.jlpt_level.clone(),
            difficulty: metadata.difficulty.clone(),
            source_tag_id: Some(tag_id),
            is_favorite: false,
        },
        &fillings,
    )?;

    tracing::info!(
        sentence_id = id,
        tag_id,
        template_id = template.id,
        slots = fillings.len(),
        "generated sentence"
    );

    Ok(Generation {
        id,
        template_id: template.id,
        japanese_sentence: composition.sentence,
        english_sentence: None,
        politeness_level: metadata.politeness_level,
        jlpt_level: metadata.jlpt_level,
        difficulty: metadata.difficulty,
        source_tag_id: tag_id,
        tokens: composition.tokens,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use diesel::result::Error;
    use rand::rngs::mock::StepRng;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn timestamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn template(id: i32, pattern: &str, is_active: bool) -> SentenceTemplate {
        SentenceTemplate {
            id,
            template_pattern: pattern.to_string(),
            description: None,
            is_active,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn slot(id: i32, template_id: i32, slot_name: &str, part_of_speech: Option<&str>) -> TemplateSlot {
        TemplateSlot {
            id,
            template_id,
            slot_name: slot_name.to_string(),
            grammatical_role: None,
            part_of_speech: part_of_speech.map(str::to_string),
            is_required: true,
            order_index: id,
            notes: None,
        }
    }

    fn mapping(id: i32, tag_id: i32, topic: &str, subtopic: Option<&str>) -> TagVocabMapping {
        TagVocabMapping {
            id,
            tag_id,
            vocab_topic: topic.to_string(),
            vocab_subtopic: subtopic.map(str::to_string),
        }
    }

    fn word(id: i32, furigana: &str, topic: &str) -> Vocabulary {
        Vocabulary {
            id,
            kanji: None,
            furigana: Some(furigana.to_string()),
            romaji: None,
            meaning: None,
            part_of_speech: Some("noun".to_string()),
            topic: Some(topic.to_string()),
            subtopic: None,
            politeness_level: None,
            jlpt_level: None,
            difficulty: None,
            notes: None,
            created_at: timestamp(),
            updated_at: timestamp(),
        }
    }

    fn resolved(slot_name: &str, vocabulary: Vocabulary) -> ResolvedSlot {
        ResolvedSlot {
            slot_name: slot_name.to_string(),
            vocabulary,
        }
    }

    #[derive(Default)]
    struct MemoryStore {
        tags: Vec<i32>,
        templates: Vec<SentenceTemplate>,
        taggings: Vec<(i32, i32)>,
        slots: Vec<TemplateSlot>,
        mappings: Vec<TagVocabMapping>,
        vocabulary: Vec<Vocabulary>,
        recorded: Vec<(NewGeneratedSentence, Vec<SlotFilling>)>,
    }

    fn same(value: &Option<String>, expected: &Option<String>) -> bool {
        expected.is_none() || value == expected
    }

    impl GenerationStore for MemoryStore {
        fn tag_exists(&mut self, tag_id: i32) -> Result<bool, Error> {
            Ok(self.tags.contains(&tag_id))
        }

        fn active_templates_for_tag(&mut self, tag_id: i32) -> Result<Vec<SentenceTemplate>, Error> {
            Ok(self
                .templates
                .iter()
                .filter(|template| template.is_active)
                .filter(|template| self.taggings.contains(&(tag_id, template.id)))
                .cloned()
                .collect())
        }

        fn slots_for_template(&mut self, template_id: i32) -> Result<Vec<TemplateSlot>, Error> {
            let mut slots = self
                .slots
                .iter()
                .filter(|slot| slot.template_id == template_id)
                .cloned()
                .collect::<Vec<_>>();
            slots.sort_by_key(|slot| (slot.order_index, slot.id));
            Ok(slots)
        }

        fn mappings_for_tag(&mut self, tag_id: i32) -> Result<Vec<TagVocabMapping>, Error> {
            Ok(self
                .mappings
                .iter()
                .filter(|mapping| mapping.tag_id == tag_id)
                .cloned()
                .collect())
        }

        fn matching_vocabulary(&mut self, criteria: &VocabularyCriteria) -> Result<Vec<Vocabulary>, Error> {
            Ok(self
                .vocabulary
                .iter()
                .filter(|word| word.part_of_speech.as_deref() == Some(criteria.part_of_speech.as_str()))
                .filter(|word| same(&word.difficulty, &criteria.difficulty))
                .filter(|word| same(&word.jlpt_level, &criteria.jlpt_level))
                .filter(|word| same(&word.politeness_level, &criteria.politeness_level))
                .filter(|word| {
                    criteria.topics.is_empty()
                        || criteria.topics.iter().any(|mapping| {
                            word.topic.as_deref() == Some(mapping.vocab_topic.as_str())
                                && same(&word.subtopic, &mapping.vocab_subtopic)
                        })
                })
                .cloned()
                .collect())
        }

        fn record_generation(
            &mut self,
            sentence: &NewGeneratedSentence,
            fillings: &[SlotFilling],
        ) -> Result<i32, Error> {
            self.recorded.push((sentence.clone(), fillings.to_vec()));
            Ok(self.recorded.len() as i32)
        }
    }

    fn eating_store() -> MemoryStore {
        MemoryStore {
            tags: vec![1, 7],
            templates: vec![template(10, "{subject} は {object} を 食べます", true)],
            taggings: vec![(1, 10)],
            slots: vec![slot(2, 10, "object", None), slot(1, 10, "subject", Some("noun"))],
            mappings: vec![mapping(1, 1, "food", None)],
            vocabulary: vec![word(1, "わたし", "food"), word(2, "すし", "travel")],
            ..MemoryStore::default()
        }
    }

    fn request(tag_id: i32) -> GenerationRequest {
        GenerationRequest {
            tag_id,
            filters: VocabularyFilters::default(),
            display_field: DisplayField::Furigana,
        }
    }

    #[test]
    fn generates_and_records_a_sentence() {
        let mut store = eating_store();

        let generation = generate(&mut store, &mut StepRng::new(0, 0), &request(1))
            .expect("generation should succeed");

        assert_eq!(generation.template_id, 10);
        assert_eq!(generation.japanese_sentence, "わたし は わたし を 食べます");
        assert_eq!(generation.source_tag_id, 1);
        assert_eq!(generation.english_sentence, None);
        assert_eq!(generation.tokens.len(), 5);

        let (sentence, fillings) = &store.recorded[0];
        assert_eq!(sentence.japanese_sentence.as_deref(), Some("わたし は わたし を 食べます"));
        assert!(!sentence.is_favorite);
        assert_eq!(
            fillings,
            &vec![
                SlotFilling { slot_name: "subject".to_string(), vocabulary_id: 1 },
                SlotFilling { slot_name: "object".to_string(), vocabulary_id: 1 },
            ]
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let mut store = eating_store();

        let result = generate(&mut store, &mut StepRng::new(0, 0), &request(99));

        assert!(matches!(result, Err(GenerationError::UnknownTag(99))));
        assert!(store.recorded.is_empty());
    }

    #[test]
    fn tag_without_templates_has_no_eligible_template() {
        let mut store = eating_store();

        let error = generate(&mut store, &mut StepRng::new(0, 0), &request(7))
            .expect_err("tag 7 has no templates");

        assert!(matches!(error, GenerationError::NoEligibleTemplate));
        assert_eq!(error.to_string(), "No active templates mapped to this tag yet.");
    }

    #[test]
    fn inactive_templates_are_not_eligible() {
        let mut store = eating_store();
        store.templates[0].is_active = false;

        let result = generate(&mut store, &mut StepRng::new(0, 0), &request(1));

        assert!(matches!(result, Err(GenerationError::NoEligibleTemplate)));
    }

    #[test]
    fn template_without_slots_is_empty() {
        let mut store = eating_store();
        store.slots.clear();

        let result = generate(&mut store, &mut StepRng::new(0, 0), &request(1));

        assert!(matches!(result, Err(GenerationError::EmptyTemplate)));
        assert!(store.recorded.is_empty());
    }

    #[test]
    fn missing_vocabulary_names_the_slot_and_writes_nothing() {
        let mut store = eating_store();
        store.slots = vec![slot(1, 10, "subject", None), slot(2, 10, "object", Some("verb"))];

        let error = generate(&mut store, &mut StepRng::new(0, 0), &request(1))
            .expect_err("no verbs exist");

        assert!(matches!(&error, GenerationError::NoVocabularyForSlot(name) if name == "object"));
        assert!(error.to_string().contains("\"object\""));
        assert!(store.recorded.is_empty());
    }

    #[test]
    fn topic_mappings_form_an_or_group() {
        let mut store = eating_store();
        store.mappings = vec![mapping(1, 1, "food", None), mapping(2, 1, "travel", Some("trains"))];
        store.vocabulary = vec![word(1, "でんしゃ", "travel"), word(2, "ひこうき", "travel"), word(3, "すし", "food")];
        store.vocabulary[0].subtopic = Some("trains".to_string());
        store.vocabulary[1].subtopic = Some("planes".to_string());

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..40 {
            let generation = generate(&mut store, &mut rng, &request(1)).expect("should generate");
            assert!(!generation.japanese_sentence.contains("ひこうき"));
        }
        for (_, fillings) in &store.recorded {
            assert!(fillings.iter().all(|filling| filling.vocabulary_id != 2));
        }
    }

    #[test]
    fn without_mappings_any_topic_is_allowed() {
        let mut store = eating_store();
        store.mappings.clear();
        store.vocabulary = vec![word(5, "きっぷ", "travel")];

        let generation = generate(&mut store, &mut StepRng::new(0, 0), &request(1))
            .expect("should generate");

        assert_eq!(generation.japanese_sentence, "きっぷ は きっぷ を 食べます");
    }

    #[test]
    fn caller_filters_constrain_every_slot() {
        let mut store = eating_store();
        store.vocabulary = vec![word(1, "やさしい", "food"), word(2, "むずかしい", "food")];
        store.vocabulary[1].difficulty = Some("Advanced".to_string());
        let mut request = request(1);
        request.filters.difficulty = Some(Difficulty::Advanced);

        let generation = generate(&mut store, &mut StepRng::new(0, 0), &request)
            .expect("should generate");

        assert_eq!(generation.japanese_sentence, "むずかしい は むずかしい を 食べます");
        assert_eq!(generation.difficulty.as_deref(), Some("Advanced"));
    }

    #[test]
    fn criteria_default_to_nouns() {
        let filters = VocabularyFilters {
            jlpt_level: Some(JlptLevel::N4),
            politeness_level: Some(PolitenessLevel::Polite),
            ..VocabularyFilters::default()
        };

        let criteria = criteria_for(&slot(1, 1, "x", Some("")), &filters, &[]);

        assert_eq!(criteria.part_of_speech, "noun");
        assert_eq!(criteria.difficulty, None);
        assert_eq!(criteria.jlpt_level.as_deref(), Some("N4"));
        assert_eq!(criteria.politeness_level.as_deref(), Some("polite"));
        assert!(criteria.topics.is_empty());
    }

    #[test]
    fn difficulty_is_the_highest_word_difficulty() {
        let mut easy = word(1, "a", "food");
        easy.difficulty = Some("Beginner".to_string());
        let mut medium = word(2, "b", "food");
        medium.difficulty = Some("Intermediate".to_string());

        let metadata = aggregate_metadata(
            &VocabularyFilters::default(),
            &[resolved("a", easy.clone()), resolved("b", medium)],
        );
        assert_eq!(metadata.difficulty.as_deref(), Some("Intermediate"));

        let metadata = aggregate_metadata(&VocabularyFilters::default(), &[resolved("a", easy)]);
        assert_eq!(metadata.difficulty.as_deref(), Some("Beginner"));

        let metadata = aggregate_metadata(&VocabularyFilters::default(), &[resolved("a", word(3, "c", "food"))]);
        assert_eq!(metadata.difficulty, None);
    }

    #[test]
    fn levels_come_from_the_first_word_carrying_one() {
        let first = word(1, "a", "food");
        let mut second = word(2, "b", "food");
        second.jlpt_level = Some("N3".to_string());
        second.politeness_level = Some("plain".to_string());
        let mut third = word(3, "c", "food");
        third.jlpt_level = Some("N1".to_string());
        third.politeness_level = Some("honorific".to_string());

        let slots = [resolved("a", first), resolved("b", second), resolved("c", third)];
        let metadata = aggregate_metadata(&VocabularyFilters::default(), &slots);

        assert_eq!(metadata.jlpt_level.as_deref(), Some("N3"));
        assert_eq!(metadata.politeness_level.as_deref(), Some("plain"));

        let filters = VocabularyFilters {
            difficulty: Some(Difficulty::Beginner),
            jlpt_level: Some(JlptLevel::N5),
            politeness_level: Some(PolitenessLevel::Polite),
        };
        let metadata = aggregate_metadata(&filters, &slots);

        assert_eq!(
            metadata,
            SentenceMetadata {
                difficulty: Some("Beginner".to_string()),
                jlpt_level: Some("N5".to_string()),
                politeness_level: Some("polite".to_string()),
            }
        );
    }

    #[test]
    fn generation_serializes_with_mixed_key_styles() {
        let generation = Generation {
            id: 3,
            template_id: 10,
            japanese_sentence: "すし".to_string(),
            english_sentence: None,
            politeness_level: None,
            jlpt_level: Some("N5".to_string()),
            difficulty: None,
            source_tag_id: 1,
            tokens: vec![Token { display: "すし".to_string() }],
        };

        let json = serde_json::to_value(&generation).expect("should serialize");

        assert_eq!(json["templateId"], 10);
        assert_eq!(json["japaneseSentence"], "すし");
        assert!(json["englishSentence"].is_null());
        assert_eq!(json["jlpt_level"], "N5");
        assert_eq!(json["source_tag_id"], 1);
        assert_eq!(json["tokens"][0]["display"], "すし");
    }
}
