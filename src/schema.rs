diesel::table! {
    generated_sentence_vocabulary (id) {
        id -> Integer,
        generated_sentence_id -> Integer,
        vocabulary_id -> Integer,
        slot_name -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    generated_sentences (id) {
        id -> Integer,
        template_id -> Nullable<Integer>,
        japanese_sentence -> Text,
        english_sentence -> Nullable<Text>,
        politeness_level -> Nullable<Text>,
        jlpt_level -> Nullable<Text>,
        difficulty -> Nullable<Text>,
        source_tag_id -> Nullable<Integer>,
        is_favorite -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    sentence_templates (id) {
        id -> Integer,
        template_pattern -> Text,
        description -> Nullable<Text>,
        is_active -> Bool,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    tag_vocab_mapping (id) {
        id -> Integer,
        tag_id -> Integer,
        vocab_topic -> Text,
        vocab_subtopic -> Nullable<Text>,
    }
}

diesel::table! {
    taggings (id) {
        id -> Integer,
        tag_id -> Integer,
        target_type -> Text,
        target_id -> Integer,
        created_at -> Timestamp,
    }
}

diesel::table! {
    tags (id) {
        id -> Integer,
        name -> Text,
        #[sql_name = "type"]
        tag_type -> Nullable<Text>,
        parent_tag_id -> Nullable<Integer>,
        description -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    template_slots (id) {
        id -> Integer,
        template_id -> Integer,
        slot_name -> Text,
        grammatical_role -> Nullable<Text>,
        part_of_speech -> Nullable<Text>,
        is_required -> Bool,
        order_index -> Integer,
        notes -> Nullable<Text>,
    }
}

diesel::table! {
    vocabulary (id) {
        id -> Integer,
        kanji -> Nullable<Text>,
        furigana -> Nullable<Text>,
        romaji -> Nullable<Text>,
        meaning -> Nullable<Text>,
        part_of_speech -> Nullable<Text>,
        topic -> Nullable<Text>,
        subtopic -> Nullable<Text>,
        politeness_level -> Nullable<Text>,
        jlpt_level -> Nullable<Text>,
        difficulty -> Nullable<Text>,
        notes -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::joinable!(generated_sentence_vocabulary -> generated_sentences (generated_sentence_id));
diesel::joinable!(generated_sentence_vocabulary -> vocabulary (vocabulary_id));
diesel::joinable!(generated_sentences -> sentence_templates (template_id));
diesel::joinable!(generated_sentences -> tags (source_tag_id));
diesel::joinable!(tag_vocab_mapping -> tags (tag_id));
diesel::joinable!(taggings -> tags (tag_id));
diesel::joinable!(template_slots -> sentence_templates (template_id));

diesel::allow_tables_to_appear_in_same_query!(
    generated_sentence_vocabulary,
    generated_sentences,
    sentence_templates,
    tag_vocab_mapping,
    taggings,
    tags,
    template_slots,
    vocabulary,
);
