use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};

use crate::entities::InteractionAction;

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoUserModel {
    pub id: String,
    pub clerk_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub picture: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio_website: Option<String>,
    pub reputation: i64,
    pub saved: Vec<String>,
    pub saved_size: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub joined_at: DateTime<Utc>,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoQuestionModel {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
    pub tags: Vec<String>,
    pub upvotes: Vec<String>,
    pub upvotes_size: i64,
    pub downvotes: Vec<String>,
    pub downvotes_size: i64,
    pub views: i64,
    pub answers: Vec<String>,
    pub answers_size: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoAnswerModel {
    pub id: String,
    pub content: String,
    pub author: String,
    pub question: String,
    pub upvotes: Vec<String>,
    pub upvotes_size: i64,
    pub downvotes: Vec<String>,
    pub downvotes_size: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoTagModel {
    pub id: String,
    pub name: String,
    pub description: String,
    pub questions: Vec<String>,
    pub questions_size: i64,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, ::serde::Serialize, ::serde::Deserialize)]
pub struct MongoInteractionModel {
    pub id: String,
    pub user: String,
    pub action: InteractionAction,
    pub question: Option<String>,
    pub answer: Option<String>,
    pub tags: Vec<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, ::serde::Deserialize)]
pub struct MongoTagPopularityModel {
    pub id: String,
    pub name: String,
    pub number_of_questions: i64,
}
