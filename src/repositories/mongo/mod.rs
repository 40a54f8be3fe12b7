use core::convert::TryInto;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::{doc, Document};
use mongodb::options::{FindOneAndUpdateOptions, ReturnDocument};
use mongodb::{Collection, Database};
use tracing::Instrument;

use super::{
    AnswerOrder, AnswerQuery, AnswerRepository, AuthorStats, InteractionQuery,
    InteractionRepository, Paging, QuestionMutation, QuestionOrder, QuestionQuery,
    QuestionRepository, RepositoryError, Result, TagOrder, TagPopularity, TagQuery,
    TagRepository, TextMatch, UserMutation, UserOrder, UserQuery, UserRepository, VoteChange,
};
use crate::entities::{
    Answer, AnswerId, Interaction, Question, QuestionId, Tag, TagId, User, UserId,
};
use crate::utils::LetChain;

mod converters;
mod helpers;
mod models;
mod type_convert;

use converters::{convert_404_or, convert_regex_err, convert_repo_err, try_unique_check};
use helpers::{
    aggregate, apply_vote, count, expect_exists, get_many, get_one, initialize_coll, modify_set,
    pull_all, update_returning, ModifyOpTy,
};
use models::{
    MongoAnswerModel, MongoInteractionModel, MongoQuestionModel, MongoTagModel,
    MongoTagPopularityModel, MongoUserModel,
};
use type_convert::regex_doc;

fn convert_all<M, E>(models: Vec<M>) -> Result<Vec<E>>
where M: TryInto<E, Error = RepositoryError> {
    models.into_iter().map(TryInto::try_into).collect()
}

pub struct MongoUserRepository {
    coll: Collection<MongoUserModel>,
}

impl MongoUserRepository {
    pub async fn new_with(db: &Database) -> ::anyhow::Result<Self> {
        initialize_coll("user", &["id", "clerk_id"], db).await?;

        Ok(Self {
            coll: db.collection("user"),
        })
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, item: User) -> Result<bool> {
        let model: MongoUserModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn is_exists(&self, id: UserId) -> Result<bool> {
        Ok(count(&self.coll, doc! { "id": id.to_string() }).await? > 0)
    }

    async fn find(&self, id: UserId) -> Result<User> {
        get_one(&self.coll, doc! { "id": id.to_string() })
            .await?
            .try_into()
    }

    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<User> {
        get_one(&self.coll, doc! { "clerk_id": clerk_id })
            .await?
            .try_into()
    }

    async fn finds(&self, query: UserQuery, order: UserOrder, paging: Paging) -> Result<Vec<User>> {
        get_many(&self.coll, query.into(), Some(order.into()), paging)
            .await?
            .let_(convert_all)
    }

    async fn count(&self, query: UserQuery) -> Result<u64> { count(&self.coll, query.into()).await }

    async fn update(&self, id: UserId, mutation: UserMutation) -> Result<User> {
        let mutation_doc: Document = mutation.into();

        if mutation_doc.is_empty() {
            return self.find(id).await;
        }

        update_returning(&self.coll, id.to_string(), doc! { "$set": mutation_doc })
            .await?
            .try_into()
    }

    async fn inc_reputation(&self, id: UserId, delta: i64) -> Result<()> {
        let res = self
            .coll
            .update_one(
                doc! { "id": id.to_string() },
                doc! { "$inc": { "reputation": delta } },
                None,
            )
            .instrument(tracing::trace_span!("update_one"))
            .await
            .let_(convert_repo_err)?;

        match res.matched_count {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    async fn is_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool> {
        let filter = doc! { "id": id.to_string(), "saved": question_id.to_string() };

        if count(&self.coll, filter).await? > 0 {
            return Ok(true);
        }

        expect_exists(&self.coll, id.to_string()).await?;
        Ok(false)
    }

    async fn insert_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool> {
        modify_set(
            "saved",
            &self.coll,
            id.to_string(),
            question_id.to_string(),
            ModifyOpTy::Push,
        )
        .await
    }

    async fn delete_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool> {
        modify_set(
            "saved",
            &self.coll,
            id.to_string(),
            question_id.to_string(),
            ModifyOpTy::Pull,
        )
        .await
    }

    async fn delete_saved_all(&self, question_id: QuestionId) -> Result<u64> {
        pull_all("saved", &self.coll, question_id.to_string()).await
    }

    async fn delete(&self, id: UserId) -> Result<User> {
        self.coll
            .find_one_and_delete(doc! { "id": id.to_string() }, None)
            .instrument(tracing::trace_span!("find_one_and_delete"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }
}

pub struct MongoQuestionRepository {
    coll: Collection<MongoQuestionModel>,
}

impl MongoQuestionRepository {
    pub async fn new_with(db: &Database) -> ::anyhow::Result<Self> {
        initialize_coll("question", &["id"], db).await?;

        Ok(Self {
            coll: db.collection("question"),
        })
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn insert(&self, item: Question) -> Result<bool> {
        let model: MongoQuestionModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn is_exists(&self, id: QuestionId) -> Result<bool> {
        Ok(count(&self.coll, doc! { "id": id.to_string() }).await? > 0)
    }

    async fn find(&self, id: QuestionId) -> Result<Question> {
        get_one(&self.coll, doc! { "id": id.to_string() })
            .await?
            .try_into()
    }

    async fn finds(
        &self,
        query: QuestionQuery,
        order: QuestionOrder,
        paging: Paging,
    ) -> Result<Vec<Question>> {
        get_many(&self.coll, query.into(), Some(order.into()), paging)
            .await?
            .let_(convert_all)
    }

    async fn count(&self, query: QuestionQuery) -> Result<u64> {
        count(&self.coll, query.into()).await
    }

    async fn stats_by_author(&self, author: UserId) -> Result<AuthorStats> {
        let pipeline = vec![
            doc! { "$match": { "author": author.to_string() } },
            doc! {
                "$group": {
                    "_id": null,
                    "count": { "$sum": 1 },
                    "upvotes": { "$sum": "$upvotes_size" },
                    "views": { "$sum": "$views" }
                }
            },
        ];

        let mut stats: Vec<AuthorStats> = aggregate(&self.coll, pipeline).await?;

        Ok(stats.pop().unwrap_or_default())
    }

    async fn update(&self, id: QuestionId, mutation: QuestionMutation) -> Result<Question> {
        let mutation_doc: Document = mutation.into();

        if mutation_doc.is_empty() {
            return self.find(id).await;
        }

        update_returning(&self.coll, id.to_string(), doc! { "$set": mutation_doc })
            .await?
            .try_into()
    }

    async fn inc_views(&self, id: QuestionId) -> Result<Question> {
        update_returning(&self.coll, id.to_string(), doc! { "$inc": { "views": 1_i64 } })
            .await?
            .try_into()
    }

    async fn insert_tags(&self, id: QuestionId, tags: Vec<TagId>) -> Result<()> {
        let tags = tags.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        let res = self
            .coll
            .update_one(
                doc! { "id": id.to_string() },
                doc! { "$push": { "tags": { "$each": tags } } },
                None,
            )
            .instrument(tracing::trace_span!("update_one"))
            .await
            .let_(convert_repo_err)?;

        match res.matched_count {
            0 => Err(RepositoryError::NotFound),
            _ => Ok(()),
        }
    }

    async fn insert_answer(&self, id: QuestionId, answer_id: AnswerId) -> Result<bool> {
        modify_set(
            "answers",
            &self.coll,
            id.to_string(),
            answer_id.to_string(),
            ModifyOpTy::Push,
        )
        .await
    }

    async fn delete_answer(&self, id: QuestionId, answer_id: AnswerId) -> Result<bool> {
        modify_set(
            "answers",
            &self.coll,
            id.to_string(),
            answer_id.to_string(),
            ModifyOpTy::Pull,
        )
        .await
    }

    async fn vote(&self, id: QuestionId, user: UserId, change: VoteChange) -> Result<Question> {
        apply_vote(&self.coll, id.to_string(), user.to_string(), change).await?;

        self.find(id).await
    }

    async fn delete(&self, id: QuestionId) -> Result<Question> {
        self.coll
            .find_one_and_delete(doc! { "id": id.to_string() }, None)
            .instrument(tracing::trace_span!("find_one_and_delete"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }
}

pub struct MongoAnswerRepository {
    coll: Collection<MongoAnswerModel>,
}

impl MongoAnswerRepository {
    pub async fn new_with(db: &Database) -> ::anyhow::Result<Self> {
        initialize_coll("answer", &["id"], db).await?;

        Ok(Self {
            coll: db.collection("answer"),
        })
    }
}

#[async_trait]
impl AnswerRepository for MongoAnswerRepository {
    async fn insert(&self, item: Answer) -> Result<bool> {
        let model: MongoAnswerModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn find(&self, id: AnswerId) -> Result<Answer> {
        get_one(&self.coll, doc! { "id": id.to_string() })
            .await?
            .try_into()
    }

    async fn finds(
        &self,
        query: AnswerQuery,
        order: AnswerOrder,
        paging: Paging,
    ) -> Result<Vec<Answer>> {
        get_many(&self.coll, query.into(), Some(order.into()), paging)
            .await?
            .let_(convert_all)
    }

    async fn count(&self, query: AnswerQuery) -> Result<u64> {
        count(&self.coll, query.into()).await
    }

    async fn stats_by_author(&self, author: UserId) -> Result<AuthorStats> {
        let pipeline = vec![
            doc! { "$match": { "author": author.to_string() } },
            doc! {
                "$group": {
                    "_id": null,
                    "count": { "$sum": 1 },
                    "upvotes": { "$sum": "$upvotes_size" },
                    "views": { "$sum": 0 }
                }
            },
        ];

        let mut stats: Vec<AuthorStats> = aggregate(&self.coll, pipeline).await?;

        Ok(stats.pop().unwrap_or_default())
    }

    async fn vote(&self, id: AnswerId, user: UserId, change: VoteChange) -> Result<Answer> {
        apply_vote(&self.coll, id.to_string(), user.to_string(), change).await?;

        self.find(id).await
    }

    async fn delete(&self, id: AnswerId) -> Result<Answer> {
        self.coll
            .find_one_and_delete(doc! { "id": id.to_string() }, None)
            .instrument(tracing::trace_span!("find_one_and_delete"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }

    async fn delete_by_question(&self, question: QuestionId) -> Result<Vec<AnswerId>> {
        let filter = doc! { "question": question.to_string() };

        let ids = get_many(&self.coll, filter.clone(), None, Paging::all())
            .await?
            .let_(convert_all::<_, Answer>)?
            .into_iter()
            .map(|a| a.id)
            .collect();

        self.coll
            .delete_many(filter, None)
            .instrument(tracing::trace_span!("delete_many"))
            .await
            .let_(convert_repo_err)?;

        Ok(ids)
    }
}

pub struct MongoTagRepository {
    coll: Collection<MongoTagModel>,
}

impl MongoTagRepository {
    pub async fn new_with(db: &Database) -> ::anyhow::Result<Self> {
        initialize_coll("tag", &["id"], db).await?;

        Ok(Self {
            coll: db.collection("tag"),
        })
    }
}

#[async_trait]
impl TagRepository for MongoTagRepository {
    async fn upsert_question(&self, name: &str, question: QuestionId) -> Result<Tag> {
        let name_match = TextMatch::exact(name).let_(convert_regex_err)?;

        let mut opts = FindOneAndUpdateOptions::default();
        opts.upsert = Some(true);
        opts.return_document = Some(ReturnDocument::After);

        self.coll
            .find_one_and_update(
                doc! { "name": regex_doc(&name_match) },
                doc! {
                    "$setOnInsert": {
                        "id": TagId::new().to_string(),
                        "name": name,
                        "description": "",
                        "created_at": ::mongodb::bson::DateTime::from_chrono(Utc::now())
                    },
                    "$push": { "questions": question.to_string() },
                    "$inc": { "questions_size": 1_i64 }
                },
                opts,
            )
            .instrument(tracing::trace_span!("find_one_and_update"))
            .await
            .let_(convert_repo_err)?
            .let_(convert_404_or)?
            .try_into()
    }

    async fn find(&self, id: TagId) -> Result<Tag> {
        get_one(&self.coll, doc! { "id": id.to_string() })
            .await?
            .try_into()
    }

    async fn finds_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>> {
        let id_strs = ids.iter().map(|t| t.to_string()).collect::<Vec<_>>();

        let mut tags: Vec<Tag> = get_many(
            &self.coll,
            doc! { "id": { "$in": id_strs } },
            None,
            Paging::all(),
        )
        .await?
        .let_(convert_all)?;

        // keep the caller's order
        tags.sort_by_key(|t| ids.iter().position(|id| *id == t.id));
        Ok(tags)
    }

    async fn finds(&self, query: TagQuery, order: TagOrder, paging: Paging) -> Result<Vec<Tag>> {
        get_many(&self.coll, query.into(), Some(order.into()), paging)
            .await?
            .let_(convert_all)
    }

    async fn count(&self, query: TagQuery) -> Result<u64> { count(&self.coll, query.into()).await }

    async fn popular(&self, limit: u64) -> Result<Vec<TagPopularity>> {
        let pipeline = vec![
            doc! {
                "$project": {
                    "_id": 0,
                    "id": 1,
                    "name": 1,
                    "number_of_questions": { "$size": "$questions" }
                }
            },
            doc! { "$sort": { "number_of_questions": -1 } },
            doc! { "$limit": limit as i64 },
        ];

        aggregate::<_, MongoTagPopularityModel>(&self.coll, pipeline)
            .await?
            .let_(convert_all)
    }

    async fn delete_question_all(&self, question: QuestionId) -> Result<u64> {
        pull_all("questions", &self.coll, question.to_string()).await
    }
}

pub struct MongoInteractionRepository {
    coll: Collection<MongoInteractionModel>,
}

impl MongoInteractionRepository {
    pub async fn new_with(db: &Database) -> ::anyhow::Result<Self> {
        initialize_coll("interaction", &["id"], db).await?;

        Ok(Self {
            coll: db.collection("interaction"),
        })
    }
}

#[async_trait]
impl InteractionRepository for MongoInteractionRepository {
    async fn insert(&self, item: Interaction) -> Result<bool> {
        let model: MongoInteractionModel = item.into();

        self.coll
            .insert_one(model, None)
            .instrument(tracing::trace_span!("insert_one"))
            .await
            .let_(try_unique_check)
    }

    async fn finds(&self, query: InteractionQuery) -> Result<Vec<Interaction>> {
        get_many(
            &self.coll,
            query.into(),
            Some(doc! { "created_at": 1 }),
            Paging::all(),
        )
        .await?
        .let_(convert_all)
    }

    async fn is_exists(&self, query: InteractionQuery) -> Result<bool> {
        Ok(count(&self.coll, query.into()).await? > 0)
    }

    async fn delete_many(&self, query: InteractionQuery) -> Result<u64> {
        let res = self
            .coll
            .delete_many(query.into(), None)
            .instrument(tracing::trace_span!("delete_many"))
            .await
            .let_(convert_repo_err)?;

        Ok(res.deleted_count)
    }
}
