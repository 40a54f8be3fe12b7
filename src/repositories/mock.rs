use std::cmp::Ordering;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{
    AnswerOrder, AnswerQuery, AnswerRepository, AuthorStats, InteractionQuery,
    InteractionRepository, Paging, QuestionMutation, QuestionOrder, QuestionQuery,
    QuestionRepository, QuestionSearch, RepositoryError, Result, TagOrder, TagPopularity,
    TagQuery, TagRepository, UserMutation, UserOrder, UserQuery, UserRepository, UserSearch,
    VoteChange,
};
use crate::entities::{
    Answer, AnswerId, Interaction, Question, QuestionId, Tag, TagId, User, UserId,
};

mod helpers;

use helpers::{find_mut, find_ref, remove_one, sum_stats};

pub struct InMemoryRepository<T>(Mutex<Vec<T>>);

impl<T> InMemoryRepository<T> {
    pub fn new() -> Self { Self(Mutex::new(vec![])) }
}
impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self { Self::new() }
}

fn user_matches(u: &User, UserQuery { search }: &UserQuery) -> bool {
    match search {
        None => true,
        Some(UserSearch::Name(m)) => m.is_match(&u.name),
        Some(UserSearch::NameOrUsername(m)) => m.is_match(&u.name) || m.is_match(&u.username),
    }
}

fn user_order(order: UserOrder) -> impl Fn(&User, &User) -> Ordering {
    move |a: &User, b: &User| match order {
        UserOrder::JoinedDesc => b.joined_at.cmp(&a.joined_at),
        UserOrder::JoinedAsc => a.joined_at.cmp(&b.joined_at),
        UserOrder::ReputationDesc => b.reputation.cmp(&a.reputation),
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn insert(&self, item: User) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard
            .iter()
            .any(|u| u.id == item.id || u.clerk_id == item.clerk_id)
        {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn is_exists(&self, id: UserId) -> Result<bool> {
        let guard = self.0.lock().await;

        match find_ref(&guard, |u| u.id == id) {
            Ok(_) => Ok(true),
            Err(RepositoryError::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn find(&self, id: UserId) -> Result<User> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |u| u.id == id)?.clone())
    }

    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<User> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |u| u.clerk_id == clerk_id)?.clone())
    }

    async fn finds(&self, query: UserQuery, order: UserOrder, paging: Paging) -> Result<Vec<User>> {
        let mut users = self
            .0
            .lock()
            .await
            .iter()
            .filter(|u| user_matches(u, &query))
            .cloned()
            .collect::<Vec<_>>();

        users.sort_by(user_order(order));

        Ok(paging.apply(users.into_iter()))
    }

    async fn count(&self, query: UserQuery) -> Result<u64> {
        let guard = self.0.lock().await;

        Ok(guard.iter().filter(|u| user_matches(u, &query)).count() as u64)
    }

    async fn update(&self, id: UserId, mutation: UserMutation) -> Result<User> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |u| u.id == id)?;

        let UserMutation {
            name,
            username,
            email,
            picture,
            bio,
            location,
            portfolio_website,
        } = mutation;
        if let Some(val) = name {
            item.name = val;
        }
        if let Some(val) = username {
            item.username = val;
        }
        if let Some(val) = email {
            item.email = val;
        }
        if let Some(val) = picture {
            item.picture = val;
        }
        if let Some(val) = bio {
            item.bio = Some(val);
        }
        if let Some(val) = location {
            item.location = Some(val);
        }
        if let Some(val) = portfolio_website {
            item.portfolio_website = Some(val);
        }

        Ok(item.clone())
    }

    async fn inc_reputation(&self, id: UserId, delta: i64) -> Result<()> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |u| u.id == id)?;

        item.reputation += delta;
        Ok(())
    }

    async fn is_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |u| u.id == id)?.saved.contains(&question_id))
    }

    async fn insert_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool> {
        let mut guard = self.0.lock().await;

        Ok(find_mut(&mut guard, |u| u.id == id)?.saved.insert(question_id))
    }

    async fn delete_saved(&self, id: UserId, question_id: QuestionId) -> Result<bool> {
        let mut guard = self.0.lock().await;

        Ok(find_mut(&mut guard, |u| u.id == id)?.saved.remove(&question_id))
    }

    async fn delete_saved_all(&self, question_id: QuestionId) -> Result<u64> {
        let mut guard = self.0.lock().await;

        Ok(guard
            .iter_mut()
            .map(|u| u.saved.remove(&question_id))
            .filter(|&removed| removed)
            .count() as u64)
    }

    async fn delete(&self, id: UserId) -> Result<User> {
        let mut guard = self.0.lock().await;

        remove_one(&mut guard, |u| u.id == id)
    }
}

fn question_matches(q: &Question, query: &QuestionQuery) -> bool {
    let QuestionQuery {
        search,
        ids,
        author,
        exclude_author,
        tags,
        unanswered,
    } = query;

    let searched = match search {
        None => true,
        Some(QuestionSearch::Title(m)) => m.is_match(&q.title),
        Some(QuestionSearch::TitleOrContent(m)) => m.is_match(&q.title) || m.is_match(&q.content),
    };

    searched
        && ids.as_ref().map(|s| s.contains(&q.id)).unwrap_or(true)
        && author.map(|a| q.author == a).unwrap_or(true)
        && exclude_author.map(|a| q.author != a).unwrap_or(true)
        && tags
            .as_ref()
            .map(|s| q.tags.iter().any(|t| s.contains(t)))
            .unwrap_or(true)
        && (!unanswered || q.answers.is_empty())
}

fn question_order(order: QuestionOrder) -> impl Fn(&Question, &Question) -> Ordering {
    move |a: &Question, b: &Question| match order {
        QuestionOrder::CreatedDesc => b.created_at.cmp(&a.created_at),
        QuestionOrder::CreatedAsc => a.created_at.cmp(&b.created_at),
        QuestionOrder::ViewsDesc => b.views.cmp(&a.views),
        QuestionOrder::UpvotesDesc => b.votes.upvotes.len().cmp(&a.votes.upvotes.len()),
        QuestionOrder::AnswersDesc => b.answers.len().cmp(&a.answers.len()),
        QuestionOrder::ViewsThenUpvotesDesc => (b.views, b.votes.upvotes.len())
            .cmp(&(a.views, a.votes.upvotes.len())),
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository<Question> {
    async fn insert(&self, item: Question) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard.iter().any(|q| q.id == item.id) {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn is_exists(&self, id: QuestionId) -> Result<bool> {
        let guard = self.0.lock().await;

        Ok(guard.iter().any(|q| q.id == id))
    }

    async fn find(&self, id: QuestionId) -> Result<Question> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |q| q.id == id)?.clone())
    }

    async fn finds(
        &self,
        query: QuestionQuery,
        order: QuestionOrder,
        paging: Paging,
    ) -> Result<Vec<Question>> {
        let mut questions = self
            .0
            .lock()
            .await
            .iter()
            .filter(|q| question_matches(q, &query))
            .cloned()
            .collect::<Vec<_>>();

        questions.sort_by(question_order(order));

        Ok(paging.apply(questions.into_iter()))
    }

    async fn count(&self, query: QuestionQuery) -> Result<u64> {
        let guard = self.0.lock().await;

        Ok(guard.iter().filter(|q| question_matches(q, &query)).count() as u64)
    }

    async fn stats_by_author(&self, author: UserId) -> Result<AuthorStats> {
        let guard = self.0.lock().await;

        Ok(sum_stats(
            guard
                .iter()
                .filter(|q| q.author == author)
                .map(|q| (q.votes.upvotes.len(), q.views)),
        ))
    }

    async fn update(&self, id: QuestionId, mutation: QuestionMutation) -> Result<Question> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |q| q.id == id)?;

        let QuestionMutation { title, content } = mutation;
        if let Some(val) = title {
            item.title = val;
        }
        if let Some(val) = content {
            item.content = val;
        }

        Ok(item.clone())
    }

    async fn inc_views(&self, id: QuestionId) -> Result<Question> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |q| q.id == id)?;

        item.views += 1;
        Ok(item.clone())
    }

    async fn insert_tags(&self, id: QuestionId, mut tags: Vec<TagId>) -> Result<()> {
        let mut guard = self.0.lock().await;

        find_mut(&mut guard, |q| q.id == id)?.tags.append(&mut tags);
        Ok(())
    }

    async fn insert_answer(&self, id: QuestionId, answer_id: AnswerId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |q| q.id == id)?;

        if item.answers.contains(&answer_id) {
            return Ok(false);
        }

        item.answers.push(answer_id);
        Ok(true)
    }

    async fn delete_answer(&self, id: QuestionId, answer_id: AnswerId) -> Result<bool> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |q| q.id == id)?;

        let before = item.answers.len();
        item.answers.retain(|a| *a != answer_id);
        Ok(before != item.answers.len())
    }

    async fn vote(
        &self,
        id: QuestionId,
        user: UserId,
        VoteChange { from, to }: VoteChange,
    ) -> Result<Question> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |q| q.id == id)?;

        if !item.votes.transit(user, from, to) {
            return Err(RepositoryError::Conflict);
        }

        Ok(item.clone())
    }

    async fn delete(&self, id: QuestionId) -> Result<Question> {
        let mut guard = self.0.lock().await;

        remove_one(&mut guard, |q| q.id == id)
    }
}

fn answer_matches(a: &Answer, query: &AnswerQuery) -> bool {
    let AnswerQuery {
        content,
        question,
        author,
    } = query;

    content.as_ref().map(|m| m.is_match(&a.content)).unwrap_or(true)
        && question.map(|q| a.question == q).unwrap_or(true)
        && author.map(|u| a.author == u).unwrap_or(true)
}

fn answer_order(order: AnswerOrder) -> impl Fn(&Answer, &Answer) -> Ordering {
    move |a: &Answer, b: &Answer| match order {
        AnswerOrder::CreatedDesc => b.created_at.cmp(&a.created_at),
        AnswerOrder::CreatedAsc => a.created_at.cmp(&b.created_at),
        AnswerOrder::UpvotesDesc => b.votes.upvotes.len().cmp(&a.votes.upvotes.len()),
        AnswerOrder::UpvotesAsc => a.votes.upvotes.len().cmp(&b.votes.upvotes.len()),
    }
}

#[async_trait]
impl AnswerRepository for InMemoryRepository<Answer> {
    async fn insert(&self, item: Answer) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard.iter().any(|a| a.id == item.id) {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn find(&self, id: AnswerId) -> Result<Answer> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |a| a.id == id)?.clone())
    }

    async fn finds(
        &self,
        query: AnswerQuery,
        order: AnswerOrder,
        paging: Paging,
    ) -> Result<Vec<Answer>> {
        let mut answers = self
            .0
            .lock()
            .await
            .iter()
            .filter(|a| answer_matches(a, &query))
            .cloned()
            .collect::<Vec<_>>();

        answers.sort_by(answer_order(order));

        Ok(paging.apply(answers.into_iter()))
    }

    async fn count(&self, query: AnswerQuery) -> Result<u64> {
        let guard = self.0.lock().await;

        Ok(guard.iter().filter(|a| answer_matches(a, &query)).count() as u64)
    }

    async fn stats_by_author(&self, author: UserId) -> Result<AuthorStats> {
        let guard = self.0.lock().await;

        Ok(sum_stats(
            guard
                .iter()
                .filter(|a| a.author == author)
                .map(|a| (a.votes.upvotes.len(), 0)),
        ))
    }

    async fn vote(
        &self,
        id: AnswerId,
        user: UserId,
        VoteChange { from, to }: VoteChange,
    ) -> Result<Answer> {
        let mut guard = self.0.lock().await;
        let item = find_mut(&mut guard, |a| a.id == id)?;

        if !item.votes.transit(user, from, to) {
            return Err(RepositoryError::Conflict);
        }

        Ok(item.clone())
    }

    async fn delete(&self, id: AnswerId) -> Result<Answer> {
        let mut guard = self.0.lock().await;

        remove_one(&mut guard, |a| a.id == id)
    }

    async fn delete_by_question(&self, question: QuestionId) -> Result<Vec<AnswerId>> {
        let mut guard = self.0.lock().await;

        let removed = guard
            .iter()
            .filter(|a| a.question == question)
            .map(|a| a.id)
            .collect::<Vec<_>>();
        guard.retain(|a| a.question != question);

        Ok(removed)
    }
}

fn tag_matches(t: &Tag, TagQuery { name }: &TagQuery) -> bool {
    name.as_ref().map(|m| m.is_match(&t.name)).unwrap_or(true)
}

fn tag_order(order: TagOrder) -> impl Fn(&Tag, &Tag) -> Ordering {
    move |a: &Tag, b: &Tag| match order {
        TagOrder::QuestionsDesc => b.questions.len().cmp(&a.questions.len()),
        TagOrder::CreatedDesc => b.created_at.cmp(&a.created_at),
        TagOrder::CreatedAsc => a.created_at.cmp(&b.created_at),
        TagOrder::NameAsc => a.name.cmp(&b.name),
    }
}

#[async_trait]
impl TagRepository for InMemoryRepository<Tag> {
    async fn upsert_question(&self, name: &str, question: QuestionId) -> Result<Tag> {
        let mut guard = self.0.lock().await;
        let lowered = name.to_lowercase();

        match find_mut(&mut guard, |t| t.name.to_lowercase() == lowered) {
            Ok(tag) => {
                if !tag.questions.contains(&question) {
                    tag.questions.push(question);
                }
                return Ok(tag.clone());
            },
            Err(RepositoryError::NotFound) => (),
            Err(e) => return Err(e),
        }

        let tag = Tag {
            id: TagId::new(),
            name: name.to_string(),
            description: String::new(),
            questions: vec![question],
            created_at: chrono::Utc::now(),
        };
        guard.push(tag.clone());

        Ok(tag)
    }

    async fn find(&self, id: TagId) -> Result<Tag> {
        let guard = self.0.lock().await;

        Ok(find_ref(&guard, |t| t.id == id)?.clone())
    }

    async fn finds_by_ids(&self, ids: &[TagId]) -> Result<Vec<Tag>> {
        let guard = self.0.lock().await;

        Ok(ids
            .iter()
            .filter_map(|id| guard.iter().find(|t| t.id == *id))
            .cloned()
            .collect())
    }

    async fn finds(&self, query: TagQuery, order: TagOrder, paging: Paging) -> Result<Vec<Tag>> {
        let mut tags = self
            .0
            .lock()
            .await
            .iter()
            .filter(|t| tag_matches(t, &query))
            .cloned()
            .collect::<Vec<_>>();

        tags.sort_by(tag_order(order));

        Ok(paging.apply(tags.into_iter()))
    }

    async fn count(&self, query: TagQuery) -> Result<u64> {
        let guard = self.0.lock().await;

        Ok(guard.iter().filter(|t| tag_matches(t, &query)).count() as u64)
    }

    async fn popular(&self, limit: u64) -> Result<Vec<TagPopularity>> {
        let mut tags = self.0.lock().await.clone();

        tags.sort_by(tag_order(TagOrder::QuestionsDesc));

        Ok(Paging::first(limit).apply(tags.into_iter().map(|t| TagPopularity {
            id: t.id,
            number_of_questions: t.questions.len() as u64,
            name: t.name,
        })))
    }

    async fn delete_question_all(&self, question: QuestionId) -> Result<u64> {
        let mut guard = self.0.lock().await;

        Ok(guard
            .iter_mut()
            .filter(|t| t.questions.contains(&question))
            .map(|t| t.questions.retain(|q| *q != question))
            .count() as u64)
    }
}

fn interaction_matches(i: &Interaction, query: &InteractionQuery) -> bool {
    let InteractionQuery {
        user,
        action,
        question,
        answers,
    } = query;

    let referenced = match (question, answers) {
        (None, None) => true,
        (q, a) =>
            q.map(|q| i.question == Some(q)).unwrap_or(false)
                || a.as_ref()
                    .zip(i.answer)
                    .map(|(a, id)| a.contains(&id))
                    .unwrap_or(false),
    };

    referenced
        && user.map(|u| i.user == u).unwrap_or(true)
        && action.map(|a| i.action == a).unwrap_or(true)
}

#[async_trait]
impl InteractionRepository for InMemoryRepository<Interaction> {
    async fn insert(&self, item: Interaction) -> Result<bool> {
        let mut guard = self.0.lock().await;

        if guard.iter().any(|i| i.id == item.id) {
            return Ok(false);
        }

        guard.push(item);
        Ok(true)
    }

    async fn finds(&self, query: InteractionQuery) -> Result<Vec<Interaction>> {
        let guard = self.0.lock().await;

        Ok(guard
            .iter()
            .filter(|i| interaction_matches(i, &query))
            .cloned()
            .collect())
    }

    async fn is_exists(&self, query: InteractionQuery) -> Result<bool> {
        let guard = self.0.lock().await;

        Ok(guard.iter().any(|i| interaction_matches(i, &query)))
    }

    async fn delete_many(&self, query: InteractionQuery) -> Result<u64> {
        let mut guard = self.0.lock().await;

        let before = guard.len();
        guard.retain(|i| !interaction_matches(i, &query));
        Ok((before - guard.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{Duration, Utc};

    use super::*;
    use crate::entities::{InteractionAction, InteractionId, VoteKind, Votes};
    use crate::repositories::TextMatch;

    fn question(title: &str, views: u64, age_days: i64) -> Question {
        Question {
            id: QuestionId::new(),
            title: title.to_string(),
            content: String::new(),
            author: UserId::new(),
            tags: vec![],
            votes: Votes::default(),
            views,
            answers: vec![],
            created_at: Utc::now() - Duration::days(age_days),
        }
    }

    #[tokio::test]
    async fn tag_upsert_ignores_case() {
        let repo = InMemoryRepository::<Tag>::new();
        let (q1, q2) = (QuestionId::new(), QuestionId::new());

        let a = repo.upsert_question("Java", q1).await.unwrap();
        let b = repo.upsert_question("java", q2).await.unwrap();

        assert_eq!(a.id, b.id);
        assert_eq!(b.name, "Java");
        assert_eq!(b.questions, vec![q1, q2]);
        assert_eq!(repo.count(TagQuery::default()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn tag_search_matches_any_case() {
        let repo = InMemoryRepository::<Tag>::new();
        repo.upsert_question("Java", QuestionId::new()).await.unwrap();
        repo.upsert_question("rust", QuestionId::new()).await.unwrap();

        let query = TagQuery {
            name: Some(TextMatch::contains("java").unwrap()),
        };
        let tags = repo
            .finds(query, TagOrder::NameAsc, Paging::all())
            .await
            .unwrap();

        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].name, "Java");
    }

    #[tokio::test]
    async fn questions_sorted_and_paged() {
        let repo = InMemoryRepository::<Question>::new();
        for (i, title) in ["a", "b", "c", "d"].iter().enumerate() {
            repo.insert(question(title, i as u64, i as i64)).await.unwrap();
        }

        let newest = repo
            .finds(QuestionQuery::default(), QuestionOrder::CreatedDesc, Paging::page(1, 3).unwrap())
            .await
            .unwrap();
        assert_eq!(
            newest.iter().map(|q| q.title.as_str()).collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );

        let frequent = repo
            .finds(QuestionQuery::default(), QuestionOrder::ViewsDesc, Paging::page(2, 3).unwrap())
            .await
            .unwrap();
        assert_eq!(frequent.len(), 1);
        assert_eq!(frequent[0].title, "a");
    }

    #[tokio::test]
    async fn stale_vote_is_conflict() {
        let repo = InMemoryRepository::<Question>::new();
        let q = question("q", 0, 0);
        let id = q.id;
        repo.insert(q).await.unwrap();

        let user = UserId::new();
        let up = VoteChange {
            from: None,
            to: Some(VoteKind::Up),
        };
        repo.vote(id, user, up).await.unwrap();

        match repo.vote(id, user, up).await {
            Err(RepositoryError::Conflict) => (),
            r => panic!("expected conflict, got {:?}", r.map(|q| q.votes)),
        }
    }

    #[tokio::test]
    async fn interactions_deleted_by_question_or_answer() {
        let repo = InMemoryRepository::<Interaction>::new();
        let (question, answer, other) = (QuestionId::new(), AnswerId::new(), QuestionId::new());
        let user = UserId::new();

        let mk = |question: Option<QuestionId>, answer: Option<AnswerId>| Interaction {
            id: InteractionId::new(),
            user,
            action: InteractionAction::View,
            question,
            answer,
            tags: vec![],
            created_at: Utc::now(),
        };
        repo.insert(mk(Some(question), None)).await.unwrap();
        repo.insert(mk(None, Some(answer))).await.unwrap();
        repo.insert(mk(Some(other), None)).await.unwrap();

        let deleted = repo
            .delete_many(InteractionQuery {
                question: Some(question),
                answers: Some(vec![answer]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(deleted, 2);
        let left = repo.finds(InteractionQuery::default()).await.unwrap();
        assert_eq!(
            left.iter().map(|i| i.question).collect::<HashSet<_>>(),
            HashSet::from([Some(other)])
        );
    }
}
