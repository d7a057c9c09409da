//! Change detection between two snapshots of the same question.

use crate::answer_option::AnswerOption;
use crate::question::Question;

/// Structured diff between an old and a new snapshot of one question.
///
/// Option lists keep the order of the snapshot they were drawn from:
/// `added` and `modified` follow the new snapshot, `removed` the old one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeFacts {
    pub prompt_changed: bool,
    pub added: Vec<AnswerOption>,
    pub removed: Vec<AnswerOption>,
    pub modified: Vec<AnswerOption>,
}

impl ChangeFacts {
    pub fn is_empty(&self) -> bool {
        !self.prompt_changed
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.modified.is_empty()
    }
}

/// Compare two versions of the same question.
///
/// Both snapshots must share an id; comparing different questions is
/// outside the contract.
pub fn detect_changes(old: &Question, new: &Question) -> ChangeFacts {
    debug_assert_eq!(old.id, new.id, "detect_changes called across questions");

    let old_ids = old.answer_option_ids();
    let new_ids = new.answer_option_ids();

    let added = new
        .answer_options
        .iter()
        .filter(|a| !old_ids.contains(a.id.as_str()))
        .cloned()
        .collect();

    let removed = old
        .answer_options
        .iter()
        .filter(|a| !new_ids.contains(a.id.as_str()))
        .cloned()
        .collect();

    let modified = new
        .answer_options
        .iter()
        .filter(|a| {
            old.answer_option(&a.id)
                .is_some_and(|previous| previous.differs_from(a))
        })
        .cloned()
        .collect();

    ChangeFacts {
        prompt_changed: old.prompt != new.prompt,
        added,
        removed,
        modified,
    }
}
