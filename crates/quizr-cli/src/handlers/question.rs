use crate::cli::{QuestionAction, QuestionCreateArgs, QuestionUpdateArgs};
use crate::context::CliContext;
use crate::output;
use quizr_core::QuizError;
use quizr_domain::{AnswerOptionDraft, Question, QuestionDraft};

pub async fn handle(ctx: &CliContext, action: QuestionAction) -> anyhow::Result<()> {
    match action {
        QuestionAction::Create(args) => {
            let command = create_draft(args).into_create_command();
            let id = command.question().id.clone();
            let actions = ctx.service.execute(command).await?;
            let question = ctx.service.get_question(&id).await?;
            output::output_success(serde_json::json!({
                "question": question,
                "actions": actions,
            }))?;
        }
        QuestionAction::List => {
            let questions = ctx.service.list_questions().await?;
            output::output_list(questions)?;
        }
        QuestionAction::Get { id } => {
            let question = ctx.service.get_question(&id).await?;
            output::output_success(&question)?;
        }
        QuestionAction::Update(args) => {
            let id = args.id.clone();
            let current = ctx.service.get_question(&id).await?;
            let draft = update_draft(&current, args)?;
            let actions = ctx.service.execute(draft.into_update_command(id.clone())).await?;
            let question = ctx.service.get_question(&id).await?;
            output::output_success(serde_json::json!({
                "question": question,
                "actions": actions,
            }))?;
        }
    }
    Ok(())
}

fn create_draft(args: QuestionCreateArgs) -> QuestionDraft {
    let correct = args
        .correct_options
        .into_iter()
        .map(|answer| AnswerOptionDraft::new(answer, true));
    let incorrect = args
        .options
        .into_iter()
        .map(|answer| AnswerOptionDraft::new(answer, false));

    QuestionDraft {
        prompt: args.prompt,
        answer_options: correct.chain(incorrect).collect(),
    }
}

/// Turn the stored question plus the requested edits into the full desired
/// snapshot. Edits that name an option the question does not have are
/// rejected before anything is planned.
fn update_draft(current: &Question, args: QuestionUpdateArgs) -> Result<QuestionDraft, QuizError> {
    let mut draft = QuestionDraft::from(current);

    if let Some(prompt) = args.prompt {
        draft.prompt = prompt;
    }

    for (option_id, answer) in args.set_answers {
        option_mut(&mut draft, current, &option_id)?.answer = answer;
    }
    for option_id in &args.mark_correct {
        option_mut(&mut draft, current, option_id)?.correct = true;
    }
    for option_id in &args.mark_incorrect {
        option_mut(&mut draft, current, option_id)?.correct = false;
    }
    for option_id in &args.remove_options {
        option_mut(&mut draft, current, option_id)?;
        draft
            .answer_options
            .retain(|option| option.id.as_deref() != Some(option_id.as_str()));
    }

    draft.answer_options.extend(
        args.add_correct_options
            .into_iter()
            .map(|answer| AnswerOptionDraft::new(answer, true)),
    );
    draft.answer_options.extend(
        args.add_options
            .into_iter()
            .map(|answer| AnswerOptionDraft::new(answer, false)),
    );

    Ok(draft)
}

fn option_mut<'a>(
    draft: &'a mut QuestionDraft,
    current: &Question,
    option_id: &str,
) -> Result<&'a mut AnswerOptionDraft, QuizError> {
    draft
        .answer_options
        .iter_mut()
        .find(|option| option.id.as_deref() == Some(option_id))
        .ok_or_else(|| {
            QuizError::Validation(format!(
                "question {} has no answer option {}",
                current.id, option_id
            ))
        })
}
