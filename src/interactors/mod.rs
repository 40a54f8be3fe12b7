pub mod answer;
pub mod question;
pub mod search;
pub mod tag;
pub mod user;

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, bail, Error, Result};

use crate::entities::{
    Answer, AnswerView, AuthorSummary, Question, QuestionView, TagSummary, User, UserId,
    VoteKind, VoteTransition, Votes,
};
use crate::repositories::{
    AnswerRepository, InteractionQuery, InteractionRepository, QuestionRepository,
    RepositoryError, TagRepository, TextMatch, UserRepository,
};
use crate::revalidate::Revalidator;

/// Every repository an interactor may touch.
#[derive(Clone)]
pub struct Repositories {
    pub user_repository: Arc<dyn UserRepository + Sync + Send>,
    pub question_repository: Arc<dyn QuestionRepository + Sync + Send>,
    pub answer_repository: Arc<dyn AnswerRepository + Sync + Send>,
    pub tag_repository: Arc<dyn TagRepository + Sync + Send>,
    pub interaction_repository: Arc<dyn InteractionRepository + Sync + Send>,
}

pub type SharedRevalidator = Arc<dyn Revalidator + Sync + Send>;

fn user_err_fmt(e: RepositoryError) -> Error {
    match e {
        RepositoryError::NotFound => anyhow!("cannot find user. not registered?"),
        e => anyhow!("repository error: {}", e),
    }
}

fn question_err_fmt(e: RepositoryError) -> Error {
    match e {
        RepositoryError::NotFound => anyhow!("cannot find question."),
        RepositoryError::Conflict => anyhow!("question was voted concurrently. try again."),
        e => anyhow!("repository error: {}", e),
    }
}

fn answer_err_fmt(e: RepositoryError) -> Error {
    match e {
        RepositoryError::NotFound => anyhow!("cannot find answer."),
        RepositoryError::Conflict => anyhow!("answer was voted concurrently. try again."),
        e => anyhow!("repository error: {}", e),
    }
}

fn tag_err_fmt(e: RepositoryError) -> Error {
    match e {
        RepositoryError::NotFound => anyhow!("cannot find tag."),
        e => anyhow!("repository error: {}", e),
    }
}

fn interaction_err_fmt(e: RepositoryError) -> Error { anyhow!("repository error: {}", e) }

/// Blank search text means no search.
fn text_match(search: Option<String>) -> Result<Option<TextMatch>> {
    match search.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => Ok(Some(TextMatch::contains(s)?)),
    }
}

fn non_empty(field: &str, s: &str) -> Result<()> {
    if s.trim().is_empty() {
        bail!("{} must not be empty.", field);
    }

    Ok(())
}

/// Author summary of `id`, or `None` when the author is gone.
async fn author_of(repos: &Repositories, id: UserId) -> Result<Option<AuthorSummary>> {
    match repos.user_repository.find(id).await {
        Ok(u) => Ok(Some(AuthorSummary::from(&u))),
        Err(RepositoryError::NotFound) => Ok(None),
        Err(e) => Err(user_err_fmt(e)),
    }
}

async fn populate_question(repos: &Repositories, question: Question) -> Result<QuestionView> {
    let author = author_of(repos, question.author).await?;
    let tags = repos
        .tag_repository
        .finds_by_ids(&question.tags)
        .await
        .map_err(tag_err_fmt)?
        .iter()
        .map(TagSummary::from)
        .collect();

    Ok(QuestionView {
        question,
        author,
        tags,
    })
}

async fn populate_questions(
    repos: &Repositories,
    questions: Vec<Question>,
) -> Result<Vec<QuestionView>> {
    let mut views = Vec::with_capacity(questions.len());
    for q in questions {
        views.push(populate_question(repos, q).await?);
    }

    Ok(views)
}

async fn populate_answers(repos: &Repositories, answers: Vec<Answer>) -> Result<Vec<AnswerView>> {
    let mut authors: HashMap<UserId, Option<AuthorSummary>> = HashMap::new();
    let mut views = Vec::with_capacity(answers.len());

    for answer in answers {
        let author = match authors.get(&answer.author) {
            Some(a) => a.clone(),
            None => {
                let a = author_of(repos, answer.author).await?;
                authors.insert(answer.author, a.clone());
                a
            },
        };

        views.push(AnswerView { answer, author });
    }

    Ok(views)
}

/// Removes what hangs off an already deleted question.
async fn cascade_question(repos: &Repositories, question: &Question) -> Result<()> {
    let answers = repos
        .answer_repository
        .delete_by_question(question.id)
        .await
        .map_err(answer_err_fmt)?;

    let interactions = repos
        .interaction_repository
        .delete_many(InteractionQuery {
            question: Some(question.id),
            answers: Some(answers.clone()),
            ..Default::default()
        })
        .await
        .map_err(interaction_err_fmt)?;

    let tags = repos
        .tag_repository
        .delete_question_all(question.id)
        .await
        .map_err(tag_err_fmt)?;

    let saved = repos
        .user_repository
        .delete_saved_all(question.id)
        .await
        .map_err(user_err_fmt)?;

    tracing::debug!(
        question = %question.id,
        answers = answers.len(),
        interactions,
        tags,
        saved,
        "question cascade done"
    );

    Ok(())
}

/// Removes what hangs off an already deleted answer.
async fn cascade_answer(repos: &Repositories, answer: &Answer) -> Result<()> {
    match repos
        .question_repository
        .delete_answer(answer.question, answer.id)
        .await
    {
        Ok(_) | Err(RepositoryError::NotFound) => (),
        Err(e) => return Err(question_err_fmt(e)),
    }

    let interactions = repos
        .interaction_repository
        .delete_many(InteractionQuery {
            answers: Some(vec![answer.id]),
            ..Default::default()
        })
        .await
        .map_err(interaction_err_fmt)?;

    tracing::debug!(answer = %answer.id, interactions, "answer cascade done");

    Ok(())
}

/// Resolves a vote call of `voter` against the current `votes`.
fn resolve_vote(votes: &Votes, voter: UserId, kind: VoteKind) -> VoteTransition {
    VoteTransition::resolve(votes.state_of(voter), kind)
}

async fn apply_reputation(
    repos: &Repositories,
    voter: UserId,
    author: UserId,
    transition: VoteTransition,
) -> Result<()> {
    let VoteTransition {
        voter_delta,
        author_delta,
        ..
    } = transition;

    if voter_delta != 0 {
        repos
            .user_repository
            .inc_reputation(voter, voter_delta)
            .await
            .map_err(user_err_fmt)?;
    }

    if author_delta != 0 {
        match repos
            .user_repository
            .inc_reputation(author, author_delta)
            .await
        {
            Ok(()) => (),
            Err(RepositoryError::NotFound) => tracing::warn!(%author, "voted author is gone"),
            Err(e) => return Err(user_err_fmt(e)),
        }
    }

    Ok(())
}

async fn find_by_clerk_id(repos: &Repositories, clerk_id: &str) -> Result<User> {
    repos
        .user_repository
        .find_by_clerk_id(clerk_id)
        .await
        .map_err(user_err_fmt)
}

async fn expect_user(repos: &Repositories, id: UserId) -> Result<()> {
    if !repos
        .user_repository
        .is_exists(id)
        .await
        .map_err(user_err_fmt)?
    {
        bail!("cannot find user. not registered?");
    }

    Ok(())
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use super::Repositories;
    use crate::entities::{Answer, Interaction, Question, Tag, User, UserId};
    use crate::handlers::Handler;
    use crate::repositories::mock::InMemoryRepository;
    use crate::revalidate::RecordingRevalidator;
    use crate::usecases::{question, user};

    pub fn repositories() -> Repositories {
        Repositories {
            user_repository: Arc::new(InMemoryRepository::<User>::new()),
            question_repository: Arc::new(InMemoryRepository::<Question>::new()),
            answer_repository: Arc::new(InMemoryRepository::<Answer>::new()),
            tag_repository: Arc::new(InMemoryRepository::<Tag>::new()),
            interaction_repository: Arc::new(InMemoryRepository::<Interaction>::new()),
        }
    }

    pub fn handler() -> (Handler, Repositories, Arc<RecordingRevalidator>) {
        let repos = repositories();
        let revalidator = Arc::new(RecordingRevalidator::new());
        let handler = Handler::new(repos.clone(), revalidator.clone());

        (handler, repos, revalidator)
    }

    pub async fn register(h: &Handler, clerk_id: &str) -> User {
        h.user
            .register
            .handle(user::register::Input {
                clerk_id: clerk_id.to_string(),
                name: format!("{} name", clerk_id),
                username: clerk_id.to_string(),
                email: format!("{}@example.com", clerk_id),
                picture: String::new(),
            })
            .await
            .unwrap()
            .user
    }

    pub async fn ask(h: &Handler, author: UserId, title: &str, tags: &[&str]) -> Question {
        h.question
            .ask
            .handle(question::ask::Input {
                title: title.to_string(),
                content: format!("<p>{}</p>", title),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                author,
                path: "/".to_string(),
            })
            .await
            .unwrap()
            .question
    }

    pub async fn reputation(repos: &Repositories, id: UserId) -> i64 {
        repos.user_repository.find(id).await.unwrap().reputation
    }
}
