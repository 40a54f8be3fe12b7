use futures::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::Result as MongoResult;
use mongodb::options::{FindOneAndUpdateOptions, FindOptions, ReturnDocument};
use mongodb::{Collection, Database};
use tracing::Instrument;

use super::converters::{convert_404_or, convert_repo_err, to_bool};
use super::{Paging, RepositoryError, Result as RepoResult, VoteChange};
use crate::utils::LetChain;

/// Creates a unique index for each of `unique_keys`.
pub async fn initialize_coll(
    coll_name: impl Into<Bson>,
    unique_keys: &[&str],
    db: &Database,
) -> MongoResult<()> {
    let indexes = unique_keys
        .iter()
        .map(|key| {
            doc! {
                "name": format!("unique_{}", key),
                "key": { *key: 1 },
                "unique": true
            }
        })
        .collect::<Vec<_>>();

    db.run_command(
        doc! {
            "createIndexes": coll_name.into(),
            "indexes": indexes,
        },
        None,
    )
    .instrument(tracing::trace_span!("run_command"))
    .await?;

    Ok(())
}

pub async fn get_one<T>(coll: &Collection<T>, filter: Document) -> RepoResult<T>
where T: Sync + Send + Unpin + ::serde::de::DeserializeOwned {
    coll.find_one(filter, None)
        .instrument(tracing::trace_span!("find_one"))
        .await
        .let_(convert_repo_err)?
        .let_(convert_404_or)
}

pub async fn get_many<T>(
    coll: &Collection<T>,
    filter: Document,
    sort: Option<Document>,
    paging: Paging,
) -> RepoResult<Vec<T>>
where
    T: Sync + Send + Unpin + ::serde::de::DeserializeOwned,
{
    // mongodb reads `limit(0)` as no limit
    if paging.limit == Some(0) {
        return Ok(vec![]);
    }

    let mut opts = FindOptions::default();
    opts.sort = sort;
    opts.skip = Some(paging.skip).filter(|n| *n > 0);
    opts.limit = paging.limit.map(|n| n as i64);

    coll.find(filter, opts)
        .instrument(tracing::trace_span!("find"))
        .await
        .let_(convert_repo_err)?
        .try_collect::<Vec<_>>()
        .await
        .let_(convert_repo_err)
}

pub async fn count<T>(coll: &Collection<T>, filter: Document) -> RepoResult<u64>
where T: Sync + Send {
    coll.count_documents(filter, None)
        .instrument(tracing::trace_span!("count_documents"))
        .await
        .let_(convert_repo_err)
}

/// Runs an aggregation and decodes every resulting document.
pub async fn aggregate<T, R>(coll: &Collection<T>, pipeline: Vec<Document>) -> RepoResult<Vec<R>>
where
    T: Sync + Send,
    R: ::serde::de::DeserializeOwned,
{
    coll.aggregate(pipeline, None)
        .instrument(tracing::trace_span!("aggregate"))
        .await
        .let_(convert_repo_err)?
        .try_collect::<Vec<_>>()
        .await
        .let_(convert_repo_err)?
        .into_iter()
        .map(|d| ::mongodb::bson::from_document(d).let_(convert_repo_err))
        .collect()
}

pub async fn update_returning<T>(
    coll: &Collection<T>,
    id: impl Into<Bson>,
    update: Document,
) -> RepoResult<T>
where
    T: Sync + Send + Unpin + ::serde::de::DeserializeOwned,
{
    let mut opts = FindOneAndUpdateOptions::default();
    opts.return_document = Some(ReturnDocument::After);

    coll.find_one_and_update(doc! { "id": id.into() }, update, opts)
        .instrument(tracing::trace_span!("find_one_and_update"))
        .await
        .let_(convert_repo_err)?
        .let_(convert_404_or)
}

pub async fn expect_exists<T>(coll: &Collection<T>, id: impl Into<Bson>) -> RepoResult<()>
where T: Sync + Send {
    match count(coll, doc! { "id": id.into() }).await? {
        0 => Err(RepositoryError::NotFound),
        _ => Ok(()),
    }
}

#[derive(Clone, Copy)]
pub enum ModifyOpTy {
    Push,
    Pull,
}

/// Adds or removes `target` in the array field `name`, keeping `{name}_size`
/// in step with it. Returns whether the array changed.
pub async fn modify_set<T>(
    name: impl AsRef<str>,
    coll: &Collection<T>,
    id: impl Into<Bson>,
    target: impl Into<Bson>,
    ty: ModifyOpTy,
) -> RepoResult<bool>
where
    T: Sync + Send,
{
    let name = name.as_ref();
    let inc_name = format!("{}_size", name);
    let id = id.into();
    let target = target.into();

    let (filter, update) = match ty {
        ModifyOpTy::Push => (
            doc! { "id": id.clone(), name: { "$ne": target.clone() } },
            doc! {
                "$push": { name: target },
                "$inc": { inc_name: 1_i64 }
            },
        ),
        ModifyOpTy::Pull => (
            doc! { "id": id.clone(), name: target.clone() },
            doc! {
                "$pull": { name: target },
                "$inc": { inc_name: -1_i64 }
            },
        ),
    };

    let res = coll
        .update_one(filter, update, None)
        .instrument(tracing::trace_span!("update_one"))
        .await
        .let_(convert_repo_err)?;

    if res.modified_count.let_(to_bool) {
        return Ok(true);
    }

    expect_exists(coll, id).await?;
    Ok(false)
}

/// Pulls `target` out of the array field `name` of every document holding it.
pub async fn pull_all<T>(
    name: impl AsRef<str>,
    coll: &Collection<T>,
    target: impl Into<Bson>,
) -> RepoResult<u64>
where
    T: Sync + Send,
{
    let name = name.as_ref();
    let inc_name = format!("{}_size", name);
    let target = target.into();

    let res = coll
        .update_many(
            doc! { name: target.clone() },
            doc! {
                "$pull": { name: target },
                "$inc": { inc_name: -1_i64 }
            },
            None,
        )
        .instrument(tracing::trace_span!("update_many"))
        .await
        .let_(convert_repo_err)?;

    Ok(res.modified_count)
}

/// Moves `user` between the vote arrays in one conditional update.
///
/// The update only matches while the stored state of `user` is still
/// `change.from`; a document that exists but does not match is a conflict.
pub async fn apply_vote<T>(
    coll: &Collection<T>,
    id: impl Into<Bson>,
    user: impl Into<Bson>,
    VoteChange { from, to }: VoteChange,
) -> RepoResult<()>
where
    T: Sync + Send,
{
    let id = id.into();
    let user = user.into();

    let mut filter = doc! { "id": id.clone() };
    match from {
        Some(kind) => {
            filter.insert(kind.field(), user.clone());
        },
        None => {
            filter.insert("upvotes", doc! { "$ne": user.clone() });
            filter.insert("downvotes", doc! { "$ne": user.clone() });
        },
    }

    let mut inc = doc! {};
    let mut update = doc! {};
    if let Some(kind) = from {
        update.insert("$pull", doc! { kind.field(): user.clone() });
        inc.insert(format!("{}_size", kind.field()), -1_i64);
    }
    if let Some(kind) = to {
        update.insert("$push", doc! { kind.field(): user.clone() });
        inc.insert(format!("{}_size", kind.field()), 1_i64);
    }
    if inc.is_empty() {
        return expect_exists(coll, id).await;
    }
    update.insert("$inc", inc);

    let res = coll
        .update_one(filter, update, None)
        .instrument(tracing::trace_span!("update_one"))
        .await
        .let_(convert_repo_err)?;

    if res.matched_count.let_(to_bool) {
        return Ok(());
    }

    expect_exists(coll, id).await?;
    Err(RepositoryError::Conflict)
}
