use std::sync::Arc;

use crate::entities::{Answer, Interaction, Question, Tag, User};
use crate::handlers::Handler;
use crate::interactors::{Repositories, SharedRevalidator};
use crate::repositories::mock::InMemoryRepository;
use crate::repositories::mongo::{
    MongoAnswerRepository, MongoInteractionRepository, MongoQuestionRepository,
    MongoTagRepository, MongoUserRepository,
};
use crate::revalidate::TracingRevalidator;

pub fn in_memory() -> Handler { in_memory_with(Arc::new(TracingRevalidator)) }

pub fn in_memory_with(revalidator: SharedRevalidator) -> Handler {
    let repos = Repositories {
        user_repository: Arc::new(InMemoryRepository::<User>::new()),
        question_repository: Arc::new(InMemoryRepository::<Question>::new()),
        answer_repository: Arc::new(InMemoryRepository::<Answer>::new()),
        tag_repository: Arc::new(InMemoryRepository::<Tag>::new()),
        interaction_repository: Arc::new(InMemoryRepository::<Interaction>::new()),
    };

    Handler::new(repos, revalidator)
}

pub async fn mongo(uri_str: impl AsRef<str>, db_name: impl AsRef<str>) -> ::anyhow::Result<Handler> {
    mongo_with(uri_str, db_name, Arc::new(TracingRevalidator)).await
}

pub async fn mongo_with(
    uri_str: impl AsRef<str>,
    db_name: impl AsRef<str>,
    revalidator: SharedRevalidator,
) -> ::anyhow::Result<Handler> {
    let c = ::mongodb::Client::with_uri_str(uri_str).await?;
    let db = c.database(db_name.as_ref());

    let repos = Repositories {
        user_repository: Arc::new(MongoUserRepository::new_with(&db).await?),
        question_repository: Arc::new(MongoQuestionRepository::new_with(&db).await?),
        answer_repository: Arc::new(MongoAnswerRepository::new_with(&db).await?),
        tag_repository: Arc::new(MongoTagRepository::new_with(&db).await?),
        interaction_repository: Arc::new(MongoInteractionRepository::new_with(&db).await?),
    };

    tracing::info!(db = db_name.as_ref(), "connected to mongodb");

    Ok(Handler::new(repos, revalidator))
}
