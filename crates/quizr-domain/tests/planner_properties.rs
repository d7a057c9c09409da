//! Properties of change detection and action planning that must hold for
//! every pair of snapshots of one question.

use proptest::prelude::*;
use quizr_domain::{
    detect_changes, handle, plan_update_actions, AnswerOption, Question, QuestionAction,
    QuestionCommand,
};
use std::collections::HashSet;

const QUESTION_ID: &str = "q1";

/// Options with ids `<prefix>0`, `<prefix>1`, ... so ids are unique within
/// one list.
fn answer_options(prefix: &'static str) -> impl Strategy<Value = Vec<AnswerOption>> {
    prop::collection::vec(("[a-z ]{0,12}", any::<bool>()), 0..8).prop_map(move |rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (answer, correct))| {
                AnswerOption::new(format!("{}{}", prefix, i), answer, correct)
            })
            .collect()
    })
}

fn question() -> impl Strategy<Value = Question> {
    ("[A-Za-z ?]{0,24}", answer_options("o")).prop_map(|(prompt, answer_options)| Question {
        id: QUESTION_ID.to_string(),
        prompt,
        answer_options,
    })
}

/// An old snapshot and an edited new one. The new snapshot reuses a random
/// subset of the old ids (with possibly different content) and adds options
/// under fresh ids, so additions, removals and modifications mix freely.
fn snapshot_pair() -> impl Strategy<Value = (Question, Question)> {
    (
        question(),
        question(),
        prop::collection::vec(any::<bool>(), 8),
        answer_options("n"),
    )
        .prop_map(|(old, mut new, keep, fresh)| {
            let mut keep = keep.into_iter();
            new.answer_options
                .retain(|_| keep.next().unwrap_or(true));
            new.answer_options.extend(fresh);
            (old, new)
        })
}

fn kind_rank(action: &QuestionAction) -> usize {
    match action {
        QuestionAction::UpdateQuestion { .. } => 0,
        QuestionAction::InsertAnswerOptions { .. } => 1,
        QuestionAction::RemoveAnswerOptions { .. } => 2,
        QuestionAction::UpdateAnswerOptions { .. } => 3,
        QuestionAction::InsertQuestion { .. } => usize::MAX,
    }
}

fn ids(options: &[AnswerOption]) -> HashSet<&str> {
    options.iter().map(|a| a.id.as_str()).collect()
}

proptest! {
    #[test]
    fn prop_unchanged_question_plans_nothing(q in question()) {
        let facts = detect_changes(&q, &q);
        prop_assert!(facts.is_empty());
        prop_assert!(plan_update_actions(&q, &facts).is_empty());
    }

    #[test]
    fn prop_update_actions_are_unique_and_ordered((old, new) in snapshot_pair()) {
        let actions = plan_update_actions(&new, &detect_changes(&old, &new));
        let ranks: Vec<_> = actions.iter().map(kind_rank).collect();

        prop_assert!(actions.len() <= 4);
        prop_assert!(
            ranks.windows(2).all(|pair| pair[0] < pair[1]),
            "actions out of order: {:?}",
            actions.iter().map(QuestionAction::kind).collect::<Vec<_>>()
        );
    }

    #[test]
    fn prop_change_sets_are_disjoint((old, new) in snapshot_pair()) {
        let facts = detect_changes(&old, &new);
        let added = ids(&facts.added);
        let removed = ids(&facts.removed);
        let modified = ids(&facts.modified);

        prop_assert!(added.is_disjoint(&removed));
        prop_assert!(added.is_disjoint(&modified));
        prop_assert!(removed.is_disjoint(&modified));
    }

    #[test]
    fn prop_plan_matches_detected_changes((old, new) in snapshot_pair()) {
        let facts = detect_changes(&old, &new);
        let actions = plan_update_actions(&new, &facts);

        let expected = usize::from(facts.prompt_changed)
            + usize::from(!facts.added.is_empty())
            + usize::from(!facts.removed.is_empty())
            + usize::from(!facts.modified.is_empty());
        prop_assert_eq!(actions.len(), expected);
    }

    #[test]
    fn prop_create_always_yields_two_actions(q in question()) {
        let actions = handle(QuestionCommand::Create(q.clone()), None).unwrap();

        prop_assert_eq!(
            actions,
            vec![
                QuestionAction::insert_question(&q),
                QuestionAction::InsertAnswerOptions {
                    question_id: q.id.clone(),
                    answer_options: q.answer_options.clone(),
                },
            ]
        );
    }
}
