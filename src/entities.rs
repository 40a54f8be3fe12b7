use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id {
    ($($n:ident),* $(,)?) => {$(
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $n(pub Uuid);

        impl $n {
            pub fn new() -> Self { Self(Uuid::new_v4()) }
        }

        impl From<Uuid> for $n {
            fn from(id: Uuid) -> Self { Self(id) }
        }

        impl ::core::str::FromStr for $n {
            type Err = ::uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> { s.parse().map(Self) }
        }

        impl ::core::fmt::Display for $n {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                self.0.fmt(f)
            }
        }
    )*};
}

id!(UserId, QuestionId, AnswerId, TagId, InteractionId);

pub type Date = DateTime<Utc>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub clerk_id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub picture: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio_website: Option<String>,
    pub reputation: i64,
    pub saved: HashSet<QuestionId>,
    pub joined_at: Date,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub title: String,
    pub content: String,
    pub author: UserId,
    pub tags: Vec<TagId>,
    pub votes: Votes,
    pub views: u64,
    pub answers: Vec<AnswerId>,
    pub created_at: Date,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub id: AnswerId,
    pub content: String,
    pub author: UserId,
    pub question: QuestionId,
    pub votes: Votes,
    pub created_at: Date,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub description: String,
    pub questions: Vec<QuestionId>,
    pub created_at: Date,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: InteractionId,
    pub user: UserId,
    pub action: InteractionAction,
    pub question: Option<QuestionId>,
    pub answer: Option<AnswerId>,
    pub tags: Vec<TagId>,
    pub created_at: Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionAction {
    AskQuestion,
    Answer,
    View,
}

impl InteractionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionAction::AskQuestion => "ask_question",
            InteractionAction::Answer => "answer",
            InteractionAction::View => "view",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteKind {
    Up,
    Down,
}

impl VoteKind {
    pub fn field(&self) -> &'static str {
        match self {
            VoteKind::Up => "upvotes",
            VoteKind::Down => "downvotes",
        }
    }
}

/// Upvote and downvote sets of a votable item.
///
/// A user is in at most one of the two sets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Votes {
    pub upvotes: HashSet<UserId>,
    pub downvotes: HashSet<UserId>,
}

impl Votes {
    pub fn state_of(&self, user: UserId) -> Option<VoteKind> {
        if self.upvotes.contains(&user) {
            Some(VoteKind::Up)
        } else if self.downvotes.contains(&user) {
            Some(VoteKind::Down)
        } else {
            None
        }
    }

    pub fn set_of(&mut self, kind: VoteKind) -> &mut HashSet<UserId> {
        match kind {
            VoteKind::Up => &mut self.upvotes,
            VoteKind::Down => &mut self.downvotes,
        }
    }

    /// Moves `user` from the `from` set to the `to` set. Returns `false` when
    /// the stored state is not `from`.
    pub fn transit(
        &mut self,
        user: UserId,
        from: Option<VoteKind>,
        to: Option<VoteKind>,
    ) -> bool {
        if self.state_of(user) != from {
            return false;
        }

        if let Some(kind) = from {
            self.set_of(kind).remove(&user);
        }
        if let Some(kind) = to {
            self.set_of(kind).insert(user);
        }

        true
    }
}

/// Result of a vote call: the state before and after and the reputation
/// changes it causes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub from: Option<VoteKind>,
    pub to: Option<VoteKind>,
    pub voter_delta: i64,
    pub author_delta: i64,
}

pub const ASK_QUESTION_REPUTATION: i64 = 5;
pub const POST_ANSWER_REPUTATION: i64 = 10;
pub const VOTER_REPUTATION: i64 = 2;
pub const VOTED_AUTHOR_REPUTATION: i64 = 10;

fn worth(state: Option<VoteKind>) -> (i64, i64) {
    match state {
        Some(VoteKind::Up) => (VOTER_REPUTATION, VOTED_AUTHOR_REPUTATION),
        Some(VoteKind::Down) => (-VOTER_REPUTATION, -VOTED_AUTHOR_REPUTATION),
        None => (0, 0),
    }
}

impl VoteTransition {
    /// Voting in the direction already held toggles the vote off; any other
    /// call replaces the held vote.
    pub fn resolve(from: Option<VoteKind>, requested: VoteKind) -> Self {
        let to = match from {
            Some(held) if held == requested => None,
            _ => Some(requested),
        };

        let (voter_old, author_old) = worth(from);
        let (voter_new, author_new) = worth(to);

        Self {
            from,
            to,
            voter_delta: voter_new - voter_old,
            author_delta: author_new - author_old,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub id: UserId,
    pub clerk_id: String,
    pub name: String,
    pub picture: String,
}

impl From<&User> for AuthorSummary {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            clerk_id: u.clerk_id.clone(),
            name: u.name.clone(),
            picture: u.picture.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagSummary {
    pub id: TagId,
    pub name: String,
}

impl From<&Tag> for TagSummary {
    fn from(t: &Tag) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
        }
    }
}

/// A question with its author and tags expanded.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    pub question: Question,
    pub author: Option<AuthorSummary>,
    pub tags: Vec<TagSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    pub answer: Answer,
    pub author: Option<AuthorSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_upvote() {
        let t = VoteTransition::resolve(None, VoteKind::Up);
        assert_eq!(t.to, Some(VoteKind::Up));
        assert_eq!((t.voter_delta, t.author_delta), (2, 10));
    }

    #[test]
    fn repeated_upvote_toggles_off() {
        let t = VoteTransition::resolve(Some(VoteKind::Up), VoteKind::Up);
        assert_eq!(t.to, None);
        assert_eq!((t.voter_delta, t.author_delta), (-2, -10));
    }

    #[test]
    fn switching_direction_reverses_old_vote() {
        let t = VoteTransition::resolve(Some(VoteKind::Down), VoteKind::Up);
        assert_eq!(t.to, Some(VoteKind::Up));
        assert_eq!((t.voter_delta, t.author_delta), (4, 20));

        let t = VoteTransition::resolve(Some(VoteKind::Up), VoteKind::Down);
        assert_eq!(t.to, Some(VoteKind::Down));
        assert_eq!((t.voter_delta, t.author_delta), (-4, -20));
    }

    #[test]
    fn votes_never_hold_user_twice() {
        let user = UserId::new();
        let mut votes = Votes::default();

        assert!(votes.transit(user, None, Some(VoteKind::Up)));
        assert!(votes.transit(user, Some(VoteKind::Up), Some(VoteKind::Down)));
        assert!(!votes.upvotes.contains(&user));
        assert!(votes.downvotes.contains(&user));

        // stale `from` is refused
        assert!(!votes.transit(user, None, Some(VoteKind::Up)));
        assert_eq!(votes.state_of(user), Some(VoteKind::Down));
    }
}
