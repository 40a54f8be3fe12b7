use std::collections::HashSet;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use crate::entities::{
    Answer, AnswerId, Interaction, InteractionAction, Question, QuestionId, Tag, TagId, User,
    UserId, VoteKind,
};

pub mod mock;
pub mod mongo;

type Result<T> = ::std::result::Result<T, RepositoryError>;

#[async_trait]
pub trait UserRepository {
    async fn insert(&self, item: User) -> Result<bool>;
    async fn is_exists(&self, id: UserId) -> Result<bool>;

    async fn find(&self, id: UserId) -> Result<User>;
    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<User>;
    async fn finds(&self, query: UserQuery, order: UserOrder, paging: Paging)
        -> Result<Vec<User>>;
    async fn count(&self, query: UserQuery) -> Result<u64>;

    async fn update(&self, id: UserId, mutation: UserMutation) -> Result<User>;
    async fn inc_reputation(&self, id: UserId, delta: i64) -> Result<()>;

    async fn is_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool>;
    async fn insert_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool>;
    async fn delete_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool>;
    /// Pulls `question_id` out of every user's saved set.
    async fn delete_saved_all(&self, question_id: QuestionId) -> Result<u64>;

    async fn delete(&self, id: UserId) -> Result<User>;
}

#[async_trait]
pub trait QuestionRepository {
    async fn insert(&self, item: Question) -> Result<bool>;
    async fn is_exists(&self, id: QuestionId) -> Result<bool>;

    async fn find(&self, id: QuestionId) -> Result<Question>;
    async fn finds(
        &self,
        query: QuestionQuery,
        order: QuestionOrder,
        paging: Paging,
    ) -> Result<Vec<Question>>;
    async fn count(&self, query: QuestionQuery) -> Result<u64>;
    async fn stats_by_author(&self, author: UserId) -> Result<AuthorStats>;

    async fn update(&self, id: QuestionId, mutation: QuestionMutation) -> Result<Question>;
    async fn inc_views(&self, id: QuestionId) -> Result<Question>;
    async fn insert_tags(&self, id: QuestionId, tags: Vec<TagId>) -> Result<()>;

    async fn insert_answer(&self, id: QuestionId, answer_id: AnswerId) -> Result<bool>;
    async fn delete_answer(&self, id: QuestionId, answer_id: AnswerId) -> Result<bool>;

    async fn vote(&self, id: QuestionId, user: UserId, change: VoteChange) -> Result<Question>;

    async fn delete(&self, id: QuestionId) -> Result<Question>;
}

#[async_trait]
pub trait AnswerRepository {
    async fn insert(&self, item: Answer) -> Result<bool>;

    async fn find(&self, id: AnswerId) -> Result<Answer>;
    async fn finds(
        &self,
        query: AnswerQuery,
        order: AnswerOrder,
        paging: Paging,
    ) -> Result<Vec<Answer>>;
    async fn count(&self, query: AnswerQuery) -> Result<u64>;
    async fn stats_by_author(&self, author: UserId) -> Result<AuthorStats>;

    async fn vote(&self, id: AnswerId, user: UserId, change: VoteChange) -> Result<Answer>;

    async fn delete(&self, id: AnswerId) -> Result<Answer>;
    /// Deletes every answer of `question` and returns their ids.
    async fn delete_by_question(&self, question: QuestionId) -> Result<Vec<AnswerId>>;
}

#[async_trait]
pub trait TagRepository {
    /// Finds the tag named `name` ignoring case, creating it when missing, and
    /// appends `question` to its question list.
    async fn upsert_question(&self, name: &str, question: QuestionId) -> Result<Tag>;

    async fn find(&self, id: TagId) -> Result<Tag>;
    async fn finds_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>>;
    async fn finds(&self, query: TagQuery, order: TagOrder, paging: Paging) -> Result<Vec<Tag>>;
    async fn count(&self, query: TagQuery) -> Result<u64>;
    async fn popular(&self, limit: u64) -> Result<Vec<TagPopularity>>;

    /// Pulls `question` out of every tag's question list.
    async fn delete_question_all(&self, question: QuestionId) -> Result<u64>;
}

#[async_trait]
pub trait InteractionRepository {
    async fn insert(&self, item: Interaction) -> Result<bool>;

    async fn finds(&self, query: InteractionQuery) -> Result<Vec<Interaction>>;
    async fn is_exists(&self, query: InteractionQuery) -> Result<bool>;

    async fn delete_many(&self, query: InteractionQuery) -> Result<u64>;
}

/// Case-insensitive text matcher.
///
/// Keeps the pattern source so the same match can be handed to the database
/// as `$regex` with `$options: "i"`.
#[derive(Debug, Clone)]
pub struct TextMatch {
    pattern: String,
    regex: Regex,
}

impl TextMatch {
    /// Matches `text` anywhere, treating it literally.
    pub fn contains(text: impl AsRef<str>) -> ::std::result::Result<Self, regex::Error> {
        Self::from_pattern(regex::escape(text.as_ref()))
    }

    /// Matches exactly `text`.
    pub fn exact(text: impl AsRef<str>) -> ::std::result::Result<Self, regex::Error> {
        Self::from_pattern(format!("^{}$", regex::escape(text.as_ref())))
    }

    fn from_pattern(pattern: String) -> ::std::result::Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;

        Ok(Self { pattern, regex })
    }

    pub fn pattern(&self) -> &str { &self.pattern }

    pub fn is_match(&self, text: &str) -> bool { self.regex.is_match(text) }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub skip: u64,
    pub limit: Option<u64>,
}

impl Paging {
    pub fn all() -> Self {
        Self {
            skip: 0,
            limit: None,
        }
    }

    pub fn first(limit: u64) -> Self {
        Self {
            skip: 0,
            limit: Some(limit),
        }
    }

    /// `page` is 1-based; page 0 is treated as page 1.
    pub fn page(page: u32, page_size: u32) -> ::std::result::Result<Self, PagingError> {
        if page_size == 0 {
            return Err(PagingError::ZeroPageSize);
        }

        Ok(Self {
            skip: page.saturating_sub(1) as u64 * page_size as u64,
            limit: Some(page_size as u64),
        })
    }

    pub fn apply<T>(&self, items: impl Iterator<Item = T>) -> Vec<T> {
        let items = items.skip(self.skip as usize);

        match self.limit {
            Some(n) => items.take(n as usize).collect(),
            None => items.collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum UserSearch {
    Name(TextMatch),
    NameOrUsername(TextMatch),
}

#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub search: Option<UserSearch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOrder {
    JoinedDesc,
    JoinedAsc,
    ReputationDesc,
}

#[derive(Debug, Clone, Default)]
pub struct UserMutation {
    pub name: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub picture: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio_website: Option<String>,
}

#[derive(Debug, Clone)]
pub enum QuestionSearch {
    Title(TextMatch),
    TitleOrContent(TextMatch),
}

#[derive(Debug, Clone, Default)]
pub struct QuestionQuery {
    pub search: Option<QuestionSearch>,
    pub ids: Option<HashSet<QuestionId>>,
    pub author: Option<UserId>,
    pub exclude_author: Option<UserId>,
    /// Matches questions having any of these tags.
    pub tags: Option<HashSet<TagId>>,
    pub unanswered: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrder {
    CreatedDesc,
    CreatedAsc,
    ViewsDesc,
    UpvotesDesc,
    AnswersDesc,
    ViewsThenUpvotesDesc,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionMutation {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AnswerQuery {
    pub content: Option<TextMatch>,
    pub question: Option<QuestionId>,
    pub author: Option<UserId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOrder {
    CreatedDesc,
    CreatedAsc,
    UpvotesDesc,
    UpvotesAsc,
}

#[derive(Debug, Clone, Default)]
pub struct TagQuery {
    pub name: Option<TextMatch>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrder {
    QuestionsDesc,
    CreatedDesc,
    CreatedAsc,
    NameAsc,
}

#[derive(Debug, Clone, Default)]
pub struct InteractionQuery {
    pub user: Option<UserId>,
    pub action: Option<InteractionAction>,
    /// Matches interactions referencing this question or any of `answers`.
    pub question: Option<QuestionId>,
    pub answers: Option<Vec<AnswerId>>,
}

/// Vote state change on one item; applied only when the stored state of the
/// user is still `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteChange {
    pub from: Option<VoteKind>,
    pub to: Option<VoteKind>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
pub struct AuthorStats {
    pub count: u64,
    pub upvotes: u64,
    pub views: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TagPopularity {
    pub id: TagId,
    pub name: String,
    pub number_of_questions: u64,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PagingError {
    #[error("page size must be at least 1.")]
    ZeroPageSize,
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("cannot find object.")]
    NotFound,
    #[error("expected unique object, found non-unique objects (matched: {matched})")]
    NoUnique { matched: u32 },
    #[error("object was changed concurrently.")]
    Conflict,
    #[error("internal error: {0}")]
    Internal(anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_match_ignores_case_and_escapes() {
        let m = TextMatch::contains("java").unwrap();
        assert!(m.is_match("Learning Java fast"));
        assert!(!m.is_match("Kotlin"));

        let m = TextMatch::contains("c++").unwrap();
        assert_eq!(m.pattern(), r"c\+\+");
        assert!(m.is_match("Modern C++"));
        assert!(!m.is_match("ccc"));
    }

    #[test]
    fn exact_match_anchors() {
        let m = TextMatch::exact("rust").unwrap();
        assert!(m.is_match("RUST"));
        assert!(!m.is_match("rustacean"));
    }

    #[test]
    fn paging_skips_whole_pages() {
        assert_eq!(Paging::page(1, 20).unwrap().skip, 0);
        assert_eq!(Paging::page(3, 10).unwrap().skip, 20);
        assert_eq!(Paging::page(0, 10).unwrap().skip, 0);

        let items = Paging::page(2, 3).unwrap().apply(1..=8);
        assert_eq!(items, vec![4, 5, 6]);
    }

    #[test]
    fn paging_rejects_empty_pages() {
        assert_eq!(Paging::page(1, 0), Err(PagingError::ZeroPageSize));
        assert_eq!(Paging::page(3, 0), Err(PagingError::ZeroPageSize));
    }
}
