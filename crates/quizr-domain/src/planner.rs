//! Maps change facts to the ordered list of storage actions.

use crate::action::QuestionAction;
use crate::changes::ChangeFacts;
use crate::question::Question;

/// One planning rule: when `applies` holds, `build` contributes an action.
struct ActionRule {
    applies: fn(&ChangeFacts) -> bool,
    build: fn(&Question, &ChangeFacts) -> QuestionAction,
}

/// Rules in application order. Every rule is evaluated; none short-circuits
/// the others.
const UPDATE_RULES: [ActionRule; 4] = [
    ActionRule {
        applies: |facts| facts.prompt_changed,
        build: |question, _| QuestionAction::UpdateQuestion {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
        },
    },
    ActionRule {
        applies: |facts| !facts.added.is_empty(),
        build: |question, facts| QuestionAction::InsertAnswerOptions {
            question_id: question.id.clone(),
            answer_options: facts.added.clone(),
        },
    },
    ActionRule {
        applies: |facts| !facts.removed.is_empty(),
        build: |question, facts| QuestionAction::RemoveAnswerOptions {
            question_id: question.id.clone(),
            answer_options: facts.removed.clone(),
        },
    },
    ActionRule {
        applies: |facts| !facts.modified.is_empty(),
        build: |question, facts| QuestionAction::UpdateAnswerOptions {
            question_id: question.id.clone(),
            answer_options: facts.modified.clone(),
        },
    },
];

/// Plan the actions that bring storage in line with `new`.
///
/// Returns an empty list when nothing changed.
pub fn plan_update_actions(new: &Question, facts: &ChangeFacts) -> Vec<QuestionAction> {
    UPDATE_RULES
        .iter()
        .filter(|rule| (rule.applies)(facts))
        .map(|rule| (rule.build)(new, facts))
        .collect()
}
