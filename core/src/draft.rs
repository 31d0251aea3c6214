//! In-memory drafts edited by the form components.
//!
//! # Design
//! A draft is owned by exactly one component for as long as that component
//! lives. Nothing here touches the network; every operation is synchronous
//! and only changes the draft it is called on.
//!
//! Child collections are `ItemList`s. Each list keeps its own `next_id`
//! counter, so an identifier is handed out once and never reused, even
//! after the item carrying it is removed. Removing an item never renumbers
//! its siblings.
//!
//! Every mutation bumps `revision`, which hosts can compare to decide
//! whether a re-render is needed.

use crate::error::{DraftError, ValidationError};
use crate::types::{AnswerOption, BusinessSpec, Feature, Question, Requirement, SaveTest, TestRecord};

/// Anything stored in an `ItemList`.
pub trait Identified {
    fn id(&self) -> u32;
}

impl Identified for Feature {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Identified for AnswerOption {
    fn id(&self) -> u32 {
        self.id
    }
}

impl Identified for QuestionDraft {
    fn id(&self) -> u32 {
        self.id
    }
}

/// Ordered child collection with a per-list identifier sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemList<T> {
    items: Vec<T>,
    next_id: u32,
}

impl<T> Default for ItemList<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Identified> ItemList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt items loaded from elsewhere. The sequence continues after the
    /// largest identifier present; a list already holding `u32::MAX` has no
    /// room left and is rejected.
    pub fn from_items(items: Vec<T>) -> Result<Self, DraftError> {
        let next_id = match items.iter().map(Identified::id).max() {
            Some(max) => max.checked_add(1).ok_or(DraftError::IdsExhausted)?,
            None => 1,
        };
        Ok(Self { items, next_id })
    }

    /// Append the item built by `make` from a freshly allocated identifier.
    pub fn push_with(&mut self, make: impl FnOnce(u32) -> T) -> Result<u32, DraftError> {
        let id = self.next_id;
        self.next_id = id.checked_add(1).ok_or(DraftError::IdsExhausted)?;
        self.items.push(make(id));
        Ok(id)
    }

    /// Drop the item carrying `id`. Siblings keep their identifiers.
    pub fn remove(&mut self, id: u32) -> Option<T> {
        let position = self.items.iter().position(|item| item.id() == id)?;
        Some(self.items.remove(position))
    }

    pub fn remove_at(&mut self, index: usize) -> Result<T, DraftError> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Replace the item at `index` with the value `patch` builds from it.
    pub fn update(&mut self, index: usize, patch: impl FnOnce(&T) -> T) -> Result<(), DraftError> {
        self.check_index(index)?;
        let replacement = patch(&self.items[index]);
        self.items[index] = replacement;
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut T, DraftError> {
        self.check_index(index)?;
        Ok(&mut self.items[index])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// The identifier the next `push_with` will hand out.
    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    fn check_index(&self, index: usize) -> Result<(), DraftError> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(DraftError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }
}

/// Scalar fields shared by every draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Description,
}

/// Where a draft's initial state comes from; resolved once at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftSource<Id> {
    New,
    Existing(Id),
}

fn require_scalars(name: &str, description: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    if description.trim().is_empty() {
        return Err(ValidationError::MissingDescription);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Business specification
// ---------------------------------------------------------------------------

/// Shallow merge applied to a `Feature`; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessSpecDraft {
    name: String,
    description: String,
    features: ItemList<Feature>,
    revision: u64,
}

impl BusinessSpecDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn features(&self) -> &ItemList<Feature> {
        &self.features
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Name => self.name = value.into(),
            Field::Description => self.description = value.into(),
        }
        self.revision += 1;
    }

    pub fn add_feature(&mut self, title: impl Into<String>) -> Result<u32, DraftError> {
        let title = title.into();
        let id = self.features.push_with(|id| Feature {
            id,
            title,
            description: String::new(),
        })?;
        self.revision += 1;
        Ok(id)
    }

    /// Returns whether a feature with `id` existed.
    pub fn remove_feature(&mut self, id: u32) -> bool {
        let removed = self.features.remove(id).is_some();
        if removed {
            self.revision += 1;
        }
        removed
    }

    pub fn update_feature(&mut self, index: usize, patch: FeaturePatch) -> Result<(), DraftError> {
        self.features.update(index, |feature| Feature {
            id: feature.id,
            title: patch.title.unwrap_or_else(|| feature.title.clone()),
            description: patch.description.unwrap_or_else(|| feature.description.clone()),
        })?;
        self.revision += 1;
        Ok(())
    }

    /// Submission gate: name, description and at least one feature.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_scalars(&self.name, &self.description)?;
        if self.features.is_empty() {
            return Err(ValidationError::NoFeatures);
        }
        Ok(())
    }

    pub fn to_record(&self, id: String) -> BusinessSpec {
        BusinessSpec {
            id,
            name: self.name.clone(),
            description: self.description.clone(),
            features: self.features.as_slice().to_vec(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests (question/option editor)
// ---------------------------------------------------------------------------

/// A question being edited, with its own option sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionDraft {
    pub id: u32,
    pub text: String,
    pub options: ItemList<AnswerOption>,
}

impl QuestionDraft {
    fn from_question(question: Question) -> Result<Self, DraftError> {
        Ok(Self {
            id: question.id,
            text: question.text,
            options: ItemList::from_items(question.options)?,
        })
    }

    fn to_question(&self) -> Question {
        Question {
            id: self.id,
            text: self.text.clone(),
            options: self.options.as_slice().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionPatch {
    pub text: Option<String>,
}

/// Identifier of a test that has not been persisted yet.
pub const UNSAVED_TEST_ID: i64 = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestDraft {
    id: i64,
    name: String,
    description: String,
    questions: ItemList<QuestionDraft>,
    current_question: usize,
    revision: u64,
}

impl Default for TestDraft {
    fn default() -> Self {
        Self::blank()
    }
}

impl TestDraft {
    pub fn blank() -> Self {
        Self {
            id: UNSAVED_TEST_ID,
            name: String::new(),
            description: String::new(),
            questions: ItemList::new(),
            current_question: 0,
            revision: 0,
        }
    }

    pub fn from_record(record: TestRecord) -> Result<Self, DraftError> {
        let questions = record
            .questions
            .into_iter()
            .map(QuestionDraft::from_question)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            id: record.id,
            name: record.name,
            description: record.description,
            questions: ItemList::from_items(questions)?,
            current_question: 0,
            revision: 0,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn questions(&self) -> &ItemList<QuestionDraft> {
        &self.questions
    }

    /// Index of the question the "remove" action applies to.
    pub fn current_question(&self) -> usize {
        self.current_question
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        match field {
            Field::Name => self.name = value.into(),
            Field::Description => self.description = value.into(),
        }
        self.revision += 1;
    }

    /// Append an empty question and make it current.
    pub fn add_question(&mut self) -> Result<u32, DraftError> {
        let id = self.questions.push_with(|id| QuestionDraft {
            id,
            text: String::new(),
            options: ItemList::new(),
        })?;
        self.current_question = self.questions.len() - 1;
        self.revision += 1;
        Ok(id)
    }

    pub fn update_question(&mut self, index: usize, patch: QuestionPatch) -> Result<(), DraftError> {
        self.questions.update(index, |question| QuestionDraft {
            id: question.id,
            text: patch.text.unwrap_or_else(|| question.text.clone()),
            options: question.options.clone(),
        })?;
        self.revision += 1;
        Ok(())
    }

    pub fn update_question_text(&mut self, index: usize, text: impl Into<String>) -> Result<(), DraftError> {
        self.update_question(
            index,
            QuestionPatch {
                text: Some(text.into()),
            },
        )
    }

    /// Remove the question at `index`; the cursor steps back by one.
    pub fn remove_question(&mut self, index: usize) -> Result<(), DraftError> {
        self.questions.remove_at(index)?;
        self.current_question = self.current_question.saturating_sub(1);
        self.revision += 1;
        Ok(())
    }

    /// Append an empty option to the question at `question_index`.
    pub fn add_option(&mut self, question_index: usize) -> Result<u32, DraftError> {
        let question = self.questions.get_mut(question_index)?;
        let id = question.options.push_with(|id| AnswerOption {
            id,
            value: String::new(),
        })?;
        self.revision += 1;
        Ok(id)
    }

    pub fn update_option(
        &mut self,
        question_index: usize,
        option_index: usize,
        value: impl Into<String>,
    ) -> Result<(), DraftError> {
        let value = value.into();
        let question = self.questions.get_mut(question_index)?;
        question.options.update(option_index, |option| AnswerOption {
            id: option.id,
            value,
        })?;
        self.revision += 1;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_scalars(&self.name, &self.description)?;
        if self.questions.is_empty() {
            return Err(ValidationError::NoQuestions);
        }
        Ok(())
    }

    pub fn to_payload(&self) -> SaveTest {
        SaveTest {
            name: self.name.clone(),
            description: self.description.clone(),
            questions: self.questions.iter().map(QuestionDraft::to_question).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Requirements
// ---------------------------------------------------------------------------

/// Requirements loaded from the server plus the pending "new requirement" input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementList {
    items: Vec<Requirement>,
    new_name: String,
    revision: u64,
}

impl RequirementList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Requirement] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Requirement> {
        self.items.iter().find(|r| r.id == id)
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn new_name(&self) -> &str {
        &self.new_name
    }

    pub fn set_new_name(&mut self, name: impl Into<String>) {
        self.new_name = name.into();
        self.revision += 1;
    }

    /// The pending name, if it is not blank.
    pub fn validated_new_name(&self) -> Result<&str, ValidationError> {
        if self.new_name.trim().is_empty() {
            Err(ValidationError::BlankRequirementName)
        } else {
            Ok(&self.new_name)
        }
    }

    pub fn replace(&mut self, items: Vec<Requirement>) {
        self.items = items;
        self.revision += 1;
    }

    /// Append an accepted requirement and clear the pending input.
    pub fn push(&mut self, requirement: Requirement) {
        self.items.push(requirement);
        self.new_name.clear();
        self.revision += 1;
    }

    /// Flip the completion flag; returns the new value.
    pub fn toggle(&mut self, id: &str) -> Option<bool> {
        let requirement = self.items.iter_mut().find(|r| r.id == id)?;
        requirement.is_completed = !requirement.is_completed;
        let value = requirement.is_completed;
        self.revision += 1;
        Some(value)
    }

    pub fn update_description(&mut self, index: usize, text: impl Into<String>) -> Result<(), DraftError> {
        let len = self.items.len();
        let requirement = self
            .items
            .get_mut(index)
            .ok_or(DraftError::IndexOutOfRange { index, len })?;
        requirement.description = text.into();
        self.revision += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(id: u32) -> Feature {
        Feature {
            id,
            title: format!("F{id}"),
            description: String::new(),
        }
    }

    #[test]
    fn adds_keep_call_order_and_text() {
        let mut draft = BusinessSpecDraft::new();
        draft.add_feature("A").unwrap();
        draft.add_feature("B").unwrap();
        let titles: Vec<&str> = draft.features().iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
        assert_eq!(draft.features().len(), 2);
    }

    #[test]
    fn remove_does_not_renumber_siblings() {
        let mut list = ItemList::from_items(vec![feature(1), feature(2), feature(3)]).unwrap();
        assert!(list.remove(2).is_some());
        let ids: Vec<u32> = list.iter().map(|f| f.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn identifiers_are_never_reused_after_removal() {
        let mut draft = BusinessSpecDraft::new();
        draft.add_feature("A").unwrap();
        let b = draft.add_feature("B").unwrap();
        assert!(draft.remove_feature(b));
        let c = draft.add_feature("C").unwrap();
        assert_eq!(c, 3);
        let ids: Vec<u32> = draft.features().iter().map(|f| f.id).collect();
        assert_eq!(ids, [1, 3]);
    }

    #[test]
    fn loaded_lists_continue_after_the_largest_id() {
        let list = ItemList::from_items(vec![feature(4), feature(2)]).unwrap();
        assert_eq!(list.next_id(), 5);
    }

    #[test]
    fn loading_the_largest_id_is_rejected() {
        let err = ItemList::from_items(vec![feature(1), feature(u32::MAX)]).unwrap_err();
        assert_eq!(err, DraftError::IdsExhausted);
    }

    #[test]
    fn exhausted_sequence_refuses_to_push() {
        let mut list = ItemList::from_items(vec![feature(u32::MAX - 2)]).unwrap();
        assert_eq!(list.push_with(feature).unwrap(), u32::MAX - 1);
        assert_eq!(list.push_with(feature), Err(DraftError::IdsExhausted));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn record_with_an_exhausted_option_sequence_is_rejected() {
        let record = TestRecord {
            id: 5,
            name: "Quiz".to_string(),
            description: String::new(),
            questions: vec![Question {
                id: 1,
                text: "Q".to_string(),
                options: vec![AnswerOption {
                    id: u32::MAX,
                    value: "4".to_string(),
                }],
            }],
        };
        assert_eq!(TestDraft::from_record(record), Err(DraftError::IdsExhausted));
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let mut draft = BusinessSpecDraft::new();
        draft.add_feature("A").unwrap();
        let before = draft.revision();
        assert!(!draft.remove_feature(99));
        assert_eq!(draft.revision(), before);
        assert_eq!(draft.features().len(), 1);
    }

    #[test]
    fn update_feature_merges_shallowly() {
        let mut draft = BusinessSpecDraft::new();
        draft.add_feature("A").unwrap();
        draft
            .update_feature(
                0,
                FeaturePatch {
                    description: Some("details".to_string()),
                    ..FeaturePatch::default()
                },
            )
            .unwrap();
        let f = draft.features().get(0).unwrap();
        assert_eq!(f.title, "A");
        assert_eq!(f.description, "details");
    }

    #[test]
    fn update_out_of_range_is_rejected() {
        let mut draft = BusinessSpecDraft::new();
        let err = draft.update_feature(0, FeaturePatch::default()).unwrap_err();
        assert_eq!(err, DraftError::IndexOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn set_field_twice_yields_same_state() {
        let mut once = BusinessSpecDraft::new();
        once.set_field(Field::Name, "Acme");
        let mut twice = once.clone();
        twice.set_field(Field::Name, "Acme");
        assert_eq!(once.name(), twice.name());
        assert_eq!(once.features(), twice.features());
    }

    #[test]
    fn business_spec_validation_order() {
        let mut draft = BusinessSpecDraft::new();
        assert_eq!(draft.validate(), Err(ValidationError::MissingName));
        draft.set_field(Field::Name, "Acme");
        assert_eq!(draft.validate(), Err(ValidationError::MissingDescription));
        draft.set_field(Field::Description, "desc");
        assert_eq!(draft.validate(), Err(ValidationError::NoFeatures));
        draft.add_feature("F1").unwrap();
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn whitespace_name_counts_as_missing() {
        let mut draft = BusinessSpecDraft::new();
        draft.set_field(Field::Name, "   ");
        assert_eq!(draft.validate(), Err(ValidationError::MissingName));
    }

    #[test]
    fn options_are_scoped_to_their_question() {
        let mut draft = TestDraft::blank();
        draft.add_question().unwrap();
        draft.add_question().unwrap();
        assert_eq!(draft.add_option(0).unwrap(), 1);
        assert_eq!(draft.add_option(0).unwrap(), 2);
        assert_eq!(draft.add_option(1).unwrap(), 1);
        draft.update_option(0, 1, "second").unwrap();

        let payload = draft.to_payload();
        assert_eq!(payload.questions[0].options[1].value, "second");
        assert_eq!(payload.questions[0].options[0].value, "");
        assert_eq!(payload.questions[1].options.len(), 1);
    }

    #[test]
    fn add_option_to_missing_question_fails() {
        let mut draft = TestDraft::blank();
        assert!(draft.add_option(3).is_err());
        assert!(draft.update_option(0, 0, "x").is_err());
    }

    #[test]
    fn question_cursor_follows_add_and_remove() {
        let mut draft = TestDraft::blank();
        draft.add_question().unwrap();
        draft.add_question().unwrap();
        draft.add_question().unwrap();
        assert_eq!(draft.current_question(), 2);
        draft.remove_question(2).unwrap();
        assert_eq!(draft.current_question(), 1);
        draft.remove_question(0).unwrap();
        draft.remove_question(0).unwrap();
        assert_eq!(draft.current_question(), 0);
        assert!(draft.questions().is_empty());
    }

    #[test]
    fn test_draft_from_record_keeps_ids_and_continues_sequence() {
        let record = TestRecord {
            id: 7,
            name: "Quiz".to_string(),
            description: "d".to_string(),
            questions: vec![Question {
                id: 3,
                text: "Q".to_string(),
                options: vec![AnswerOption {
                    id: 2,
                    value: "a".to_string(),
                }],
            }],
        };
        let mut draft = TestDraft::from_record(record).unwrap();
        assert_eq!(draft.id(), 7);
        assert_eq!(draft.add_question().unwrap(), 4);
        assert_eq!(draft.add_option(0).unwrap(), 3);
    }

    #[test]
    fn test_validation_requires_questions() {
        let mut draft = TestDraft::blank();
        draft.set_field(Field::Name, "Quiz");
        draft.set_field(Field::Description, "d");
        assert_eq!(draft.validate(), Err(ValidationError::NoQuestions));
        draft.add_question().unwrap();
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn double_toggle_restores_flag() {
        let mut list = RequirementList::new();
        list.replace(vec![Requirement {
            id: "r1".to_string(),
            name: "Login".to_string(),
            description: String::new(),
            is_completed: false,
        }]);
        assert_eq!(list.toggle("r1"), Some(true));
        assert_eq!(list.toggle("r1"), Some(false));
        assert_eq!(list.toggle("missing"), None);
    }

    #[test]
    fn blank_requirement_name_is_rejected() {
        let mut list = RequirementList::new();
        list.set_new_name("  ");
        assert_eq!(list.validated_new_name(), Err(ValidationError::BlankRequirementName));
        list.set_new_name("Login");
        assert_eq!(list.validated_new_name(), Ok("Login"));
    }

    #[test]
    fn revision_moves_on_every_mutation() {
        let mut draft = TestDraft::blank();
        let start = draft.revision();
        draft.add_question().unwrap();
        draft.update_question_text(0, "Q").unwrap();
        assert_eq!(draft.revision(), start + 2);
    }
}
