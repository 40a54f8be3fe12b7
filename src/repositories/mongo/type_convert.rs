use core::str::FromStr;

use mongodb::bson::{doc, Bson, Document};

use super::models::{
    MongoAnswerModel, MongoInteractionModel, MongoQuestionModel, MongoTagModel,
    MongoTagPopularityModel, MongoUserModel,
};
use crate::repositories::{
    AnswerOrder, AnswerQuery, InteractionQuery, QuestionMutation, QuestionOrder, QuestionQuery,
    QuestionSearch, RepositoryError, Result as RepoResult, TagOrder, TagPopularity, TagQuery,
    TextMatch, UserMutation, UserOrder, UserQuery, UserSearch,
};
use crate::entities::{Answer, Interaction, Question, Tag, User, Votes};

fn parse_id<T>(s: &str) -> RepoResult<T>
where T: FromStr<Err = ::uuid::Error> {
    s.parse()
        .map_err(|e| RepositoryError::Internal(anyhow::anyhow!("invalid id `{}`: {}", s, e)))
}

fn parse_ids<T, C>(v: Vec<String>) -> RepoResult<C>
where
    T: FromStr<Err = ::uuid::Error>,
    C: FromIterator<T>,
{
    v.iter().map(|s| parse_id::<T>(s)).collect()
}

fn to_strings<T: ToString>(items: impl IntoIterator<Item = T>) -> Vec<String> {
    items.into_iter().map(|i| i.to_string()).collect()
}

pub fn regex_doc(m: &TextMatch) -> Document { doc! { "$regex": m.pattern(), "$options": "i" } }

/// Joins clauses with `$and`; no clause matches everything.
fn and_all(mut clauses: Vec<Document>) -> Document {
    match clauses.len() {
        0 => doc! {},
        1 => clauses.remove(0),
        _ => doc! { "$and": clauses },
    }
}

impl From<UserQuery> for Document {
    fn from(UserQuery { search }: UserQuery) -> Self {
        match search {
            None => doc! {},
            Some(UserSearch::Name(m)) => doc! { "name": regex_doc(&m) },
            Some(UserSearch::NameOrUsername(m)) => doc! {
                "$or": [
                    { "name": regex_doc(&m) },
                    { "username": regex_doc(&m) }
                ]
            },
        }
    }
}

impl From<UserOrder> for Document {
    fn from(order: UserOrder) -> Self {
        match order {
            UserOrder::JoinedDesc => doc! { "joined_at": -1 },
            UserOrder::JoinedAsc => doc! { "joined_at": 1 },
            UserOrder::ReputationDesc => doc! { "reputation": -1 },
        }
    }
}

impl From<UserMutation> for Document {
    fn from(
        UserMutation {
            name,
            username,
            email,
            picture,
            bio,
            location,
            portfolio_website,
        }: UserMutation,
    ) -> Self {
        let mut mutation = doc! {};

        let fields = [
            ("name", name),
            ("username", username),
            ("email", email),
            ("picture", picture),
            ("bio", bio),
            ("location", location),
            ("portfolio_website", portfolio_website),
        ];
        for (key, val) in fields {
            if let Some(val) = val {
                mutation.insert(key, val);
            }
        }

        mutation
    }
}

impl From<QuestionQuery> for Document {
    fn from(
        QuestionQuery {
            search,
            ids,
            author,
            exclude_author,
            tags,
            unanswered,
        }: QuestionQuery,
    ) -> Self {
        let mut clauses = vec![];

        match search {
            None => (),
            Some(QuestionSearch::Title(m)) => clauses.push(doc! { "title": regex_doc(&m) }),
            Some(QuestionSearch::TitleOrContent(m)) => clauses.push(doc! {
                "$or": [
                    { "title": regex_doc(&m) },
                    { "content": regex_doc(&m) }
                ]
            }),
        }

        if let Some(set) = ids {
            clauses.push(doc! { "id": { "$in": to_strings(set) } });
        }

        if let Some(id) = author {
            clauses.push(doc! { "author": id.to_string() });
        }

        if let Some(id) = exclude_author {
            clauses.push(doc! { "author": { "$ne": id.to_string() } });
        }

        if let Some(set) = tags {
            clauses.push(doc! { "tags": { "$in": to_strings(set) } });
        }

        if unanswered {
            clauses.push(doc! { "answers_size": 0_i64 });
        }

        and_all(clauses)
    }
}

impl From<QuestionOrder> for Document {
    fn from(order: QuestionOrder) -> Self {
        match order {
            QuestionOrder::CreatedDesc => doc! { "created_at": -1 },
            QuestionOrder::CreatedAsc => doc! { "created_at": 1 },
            QuestionOrder::ViewsDesc => doc! { "views": -1 },
            QuestionOrder::UpvotesDesc => doc! { "upvotes_size": -1 },
            QuestionOrder::AnswersDesc => doc! { "answers_size": -1 },
            QuestionOrder::ViewsThenUpvotesDesc => doc! { "views": -1, "upvotes_size": -1 },
        }
    }
}

impl From<QuestionMutation> for Document {
    fn from(QuestionMutation { title, content }: QuestionMutation) -> Self {
        let mut mutation = doc! {};

        if let Some(val) = title {
            mutation.insert("title", val);
        }

        if let Some(val) = content {
            mutation.insert("content", val);
        }

        mutation
    }
}

impl From<AnswerQuery> for Document {
    fn from(
        AnswerQuery {
            content,
            question,
            author,
        }: AnswerQuery,
    ) -> Self {
        let mut clauses = vec![];

        if let Some(m) = content {
            clauses.push(doc! { "content": regex_doc(&m) });
        }

        if let Some(id) = question {
            clauses.push(doc! { "question": id.to_string() });
        }

        if let Some(id) = author {
            clauses.push(doc! { "author": id.to_string() });
        }

        and_all(clauses)
    }
}

impl From<AnswerOrder> for Document {
    fn from(order: AnswerOrder) -> Self {
        match order {
            AnswerOrder::CreatedDesc => doc! { "created_at": -1 },
            AnswerOrder::CreatedAsc => doc! { "created_at": 1 },
            AnswerOrder::UpvotesDesc => doc! { "upvotes_size": -1 },
            AnswerOrder::UpvotesAsc => doc! { "upvotes_size": 1 },
        }
    }
}

impl From<TagQuery> for Document {
    fn from(TagQuery { name }: TagQuery) -> Self {
        match name {
            Some(m) => doc! { "name": regex_doc(&m) },
            None => doc! {},
        }
    }
}

impl From<TagOrder> for Document {
    fn from(order: TagOrder) -> Self {
        match order {
            TagOrder::QuestionsDesc => doc! { "questions_size": -1 },
            TagOrder::CreatedDesc => doc! { "created_at": -1 },
            TagOrder::CreatedAsc => doc! { "created_at": 1 },
            TagOrder::NameAsc => doc! { "name": 1 },
        }
    }
}

impl From<InteractionQuery> for Document {
    fn from(
        InteractionQuery {
            user,
            action,
            question,
            answers,
        }: InteractionQuery,
    ) -> Self {
        let mut clauses = vec![];

        if let Some(id) = user {
            clauses.push(doc! { "user": id.to_string() });
        }

        if let Some(a) = action {
            clauses.push(doc! { "action": a.as_str() });
        }

        let mut refs: Vec<Bson> = vec![];
        if let Some(id) = question {
            refs.push(doc! { "question": id.to_string() }.into());
        }
        if let Some(ids) = answers {
            refs.push(doc! { "answer": { "$in": to_strings(ids) } }.into());
        }
        if !refs.is_empty() {
            clauses.push(doc! { "$or": refs });
        }

        and_all(clauses)
    }
}

impl From<User> for MongoUserModel {
    fn from(
        User {
            id,
            clerk_id,
            name,
            username,
            email,
            picture,
            bio,
            location,
            portfolio_website,
            reputation,
            saved,
            joined_at,
        }: User,
    ) -> Self {
        MongoUserModel {
            id: id.to_string(),
            clerk_id,
            name,
            username,
            email,
            picture,
            bio,
            location,
            portfolio_website,
            reputation,
            saved_size: saved.len() as i64,
            saved: to_strings(saved),
            joined_at,
        }
    }
}
impl TryFrom<MongoUserModel> for User {
    type Error = RepositoryError;

    fn try_from(
        MongoUserModel {
            id,
            clerk_id,
            name,
            username,
            email,
            picture,
            bio,
            location,
            portfolio_website,
            reputation,
            saved,
            saved_size: _,
            joined_at,
        }: MongoUserModel,
    ) -> RepoResult<Self> {
        Ok(User {
            id: parse_id(&id)?,
            clerk_id,
            name,
            username,
            email,
            picture,
            bio,
            location,
            portfolio_website,
            reputation,
            saved: parse_ids(saved)?,
            joined_at,
        })
    }
}

impl From<Question> for MongoQuestionModel {
    fn from(
        Question {
            id,
            title,
            content,
            author,
            tags,
            votes: Votes { upvotes, downvotes },
            views,
            answers,
            created_at,
        }: Question,
    ) -> Self {
        MongoQuestionModel {
            id: id.to_string(),
            title,
            content,
            author: author.to_string(),
            tags: to_strings(tags),
            upvotes_size: upvotes.len() as i64,
            upvotes: to_strings(upvotes),
            downvotes_size: downvotes.len() as i64,
            downvotes: to_strings(downvotes),
            views: views as i64,
            answers_size: answers.len() as i64,
            answers: to_strings(answers),
            created_at,
        }
    }
}
impl TryFrom<MongoQuestionModel> for Question {
    type Error = RepositoryError;

    fn try_from(
        MongoQuestionModel {
            id,
            title,
            content,
            author,
            tags,
            upvotes,
            downvotes,
            views,
            answers,
            created_at,
            ..
        }: MongoQuestionModel,
    ) -> RepoResult<Self> {
        Ok(Question {
            id: parse_id(&id)?,
            title,
            content,
            author: parse_id(&author)?,
            tags: parse_ids(tags)?,
            votes: Votes {
                upvotes: parse_ids(upvotes)?,
                downvotes: parse_ids(downvotes)?,
            },
            views: views.max(0) as u64,
            answers: parse_ids(answers)?,
            created_at,
        })
    }
}

impl From<Answer> for MongoAnswerModel {
    fn from(
        Answer {
            id,
            content,
            author,
            question,
            votes: Votes { upvotes, downvotes },
            created_at,
        }: Answer,
    ) -> Self {
        MongoAnswerModel {
            id: id.to_string(),
            content,
            author: author.to_string(),
            question: question.to_string(),
            upvotes_size: upvotes.len() as i64,
            upvotes: to_strings(upvotes),
            downvotes_size: downvotes.len() as i64,
            downvotes: to_strings(downvotes),
            created_at,
        }
    }
}
impl TryFrom<MongoAnswerModel> for Answer {
    type Error = RepositoryError;

    fn try_from(
        MongoAnswerModel {
            id,
            content,
            author,
            question,
            upvotes,
            downvotes,
            created_at,
            ..
        }: MongoAnswerModel,
    ) -> RepoResult<Self> {
        Ok(Answer {
            id: parse_id(&id)?,
            content,
            author: parse_id(&author)?,
            question: parse_id(&question)?,
            votes: Votes {
                upvotes: parse_ids(upvotes)?,
                downvotes: parse_ids(downvotes)?,
            },
            created_at,
        })
    }
}

impl TryFrom<MongoTagModel> for Tag {
    type Error = RepositoryError;

    fn try_from(
        MongoTagModel {
            id,
            name,
            description,
            questions,
            created_at,
            ..
        }: MongoTagModel,
    ) -> RepoResult<Self> {
        Ok(Tag {
            id: parse_id(&id)?,
            name,
            description,
            questions: parse_ids(questions)?,
            created_at,
        })
    }
}

impl TryFrom<MongoTagPopularityModel> for TagPopularity {
    type Error = RepositoryError;

    fn try_from(
        MongoTagPopularityModel {
            id,
            name,
            number_of_questions,
        }: MongoTagPopularityModel,
    ) -> RepoResult<Self> {
        Ok(TagPopularity {
            id: parse_id(&id)?,
            name,
            number_of_questions: number_of_questions.max(0) as u64,
        })
    }
}

impl From<Interaction> for MongoInteractionModel {
    fn from(
        Interaction {
            id,
            user,
            action,
            question,
            answer,
            tags,
            created_at,
        }: Interaction,
    ) -> Self {
        MongoInteractionModel {
            id: id.to_string(),
            user: user.to_string(),
            action,
            question: question.map(|q| q.to_string()),
            answer: answer.map(|a| a.to_string()),
            tags: to_strings(tags),
            created_at,
        }
    }
}
impl TryFrom<MongoInteractionModel> for Interaction {
    type Error = RepositoryError;

    fn try_from(
        MongoInteractionModel {
            id,
            user,
            action,
            question,
            answer,
            tags,
            created_at,
        }: MongoInteractionModel,
    ) -> RepoResult<Self> {
        Ok(Interaction {
            id: parse_id(&id)?,
            user: parse_id(&user)?,
            action,
            question: question.as_deref().map(parse_id).transpose()?,
            answer: answer.as_deref().map(parse_id).transpose()?,
            tags: parse_ids(tags)?,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{QuestionId, TagId, UserId};

    #[test]
    fn question_query_joins_clauses() {
        let author = UserId::new();
        let tag = TagId::new();
        let query = QuestionQuery {
            exclude_author: Some(author),
            tags: Some([tag].into_iter().collect()),
            ..Default::default()
        };

        let d: Document = query.into();
        assert_eq!(
            d,
            doc! {
                "$and": [
                    { "author": { "$ne": author.to_string() } },
                    { "tags": { "$in": [tag.to_string()] } }
                ]
            }
        );
    }

    #[test]
    fn empty_query_matches_everything() {
        let d: Document = QuestionQuery::default().into();
        assert!(d.is_empty());
    }

    #[test]
    fn search_uses_case_insensitive_option() {
        let d: Document = TagQuery {
            name: Some(TextMatch::contains("java").unwrap()),
        }
        .into();

        assert_eq!(
            d,
            doc! { "name": { "$regex": "java", "$options": "i" } }
        );
    }

    #[test]
    fn interaction_query_matches_question_or_answers() {
        let question = QuestionId::new();
        let d: Document = InteractionQuery {
            question: Some(question),
            answers: Some(vec![]),
            ..Default::default()
        }
        .into();

        assert_eq!(
            d,
            doc! {
                "$or": [
                    { "question": question.to_string() },
                    { "answer": { "$in": Vec::<String>::new() } }
                ]
            }
        );
    }
}
