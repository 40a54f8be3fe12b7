use crate::entities::{AnswerId, QuestionId, TagId, UserId, VoteKind};
use crate::usecases::answer::AnswerSort;
use crate::usecases::question::{QuestionFilter, SavedFilter};
use crate::usecases::tag::TagSort;
use crate::usecases::user::{ProfileMutation, UserFilter};

pub mod parser;

use parser::*;

/// this is devflow, a Q&A community backend.
#[derive(Debug, Clone, ::clap::Parser)]
#[clap(author, version)]
pub struct App {
    /// keep everything in memory (lost on exit).
    #[clap(long)]
    pub in_memory: bool,

    /// mongodb connection string.
    #[clap(long, env = "DEVFLOW_MONGODB_URI")]
    pub mongodb_uri: Option<String>,

    /// mongodb database name.
    #[clap(long, env = "DEVFLOW_DATABASE", default_value = "devflow")]
    pub database: String,

    #[clap(subcommand)]
    pub cmd: RootMod,
}

/// one line of a script.
#[derive(Debug, Clone, ::clap::Parser)]
#[clap(no_binary_name = true)]
pub struct ScriptLine {
    #[clap(subcommand)]
    pub cmd: RootMod,
}

#[derive(Debug, Clone, ::clap::Subcommand)]
pub enum RootMod {
    /// about user.
    #[clap(short_flag = 'U')]
    User {
        #[clap(subcommand)]
        cmd: UserMod,
    },

    /// about question.
    #[clap(short_flag = 'Q')]
    Question {
        #[clap(subcommand)]
        cmd: QuestionMod,
    },

    /// about answer.
    #[clap(short_flag = 'A')]
    Answer {
        #[clap(subcommand)]
        cmd: AnswerMod,
    },

    /// about tag.
    #[clap(short_flag = 'T')]
    Tag {
        #[clap(subcommand)]
        cmd: TagMod,
    },

    /// search questions, users, answers and tags.
    #[clap(short_flag = 'S')]
    Search(SearchCmd),

    /// read commands from stdin, one per line.
    Script,
}

#[derive(Debug, Clone, ::clap::Subcommand)]
pub enum UserMod {
    #[clap(short_flag = 'c')]
    Register(UserRegisterCmd),

    #[clap(short_flag = 'g')]
    Get(UserGetCmd),

    #[clap(short_flag = 'i')]
    Info(UserInfoCmd),

    #[clap(short_flag = 'q')]
    Gets(UserGetsCmd),

    #[clap(short_flag = 'e')]
    Edit(UserEditCmd),

    #[clap(short_flag = 'd')]
    Unregister(UserUnregisterCmd),

    Questions(UserQuestionsCmd),

    Answers(UserAnswersCmd),
}

#[derive(Debug, Clone, ::clap::Subcommand)]
pub enum QuestionMod {
    #[clap(short_flag = 'q')]
    Gets(QuestionGetsCmd),

    #[clap(short_flag = 'g')]
    Get(QuestionGetCmd),

    #[clap(short_flag = 'c')]
    Ask(QuestionAskCmd),

    #[clap(short_flag = 'e')]
    Edit(QuestionEditCmd),

    #[clap(short_flag = 'd')]
    Delete(QuestionDeleteCmd),

    #[clap(short_flag = 'v')]
    Vote(QuestionVoteCmd),

    View(QuestionViewCmd),

    /// top questions by views, then upvotes.
    Hot,

    Recommended(QuestionRecommendedCmd),

    #[clap(short_flag = 's')]
    Save(QuestionSaveCmd),

    Saved(QuestionSavedCmd),
}

#[derive(Debug, Clone, ::clap::Subcommand)]
pub enum AnswerMod {
    #[clap(short_flag = 'c')]
    Post(AnswerPostCmd),

    #[clap(short_flag = 'q')]
    Gets(AnswerGetsCmd),

    #[clap(short_flag = 'v')]
    Vote(AnswerVoteCmd),

    #[clap(short_flag = 'd')]
    Delete(AnswerDeleteCmd),
}

#[derive(Debug, Clone, ::clap::Subcommand)]
pub enum TagMod {
    #[clap(short_flag = 'q')]
    Gets(TagGetsCmd),

    Questions(TagQuestionsCmd),

    /// top tags by number of questions.
    Popular,

    TopInteracted(TagTopInteractedCmd),
}

// --- user ---

/// register user from identity provider data.
#[derive(Debug, Clone, ::clap::Args)]
pub struct UserRegisterCmd {
    /// str
    #[clap(name = "CLERK_ID")]
    pub clerk_id: String,

    #[clap(long)]
    pub name: String,

    #[clap(long)]
    pub username: String,

    #[clap(long)]
    pub email: String,

    #[clap(long, default_value = "")]
    pub picture: String,
}

/// get user with identity provider id.
#[derive(Debug, Clone, ::clap::Args)]
pub struct UserGetCmd {
    /// str
    #[clap(name = "CLERK_ID")]
    pub clerk_id: String,
}

/// show profile with totals and badges.
#[derive(Debug, Clone, ::clap::Args)]
pub struct UserInfoCmd {
    /// str
    #[clap(name = "CLERK_ID")]
    pub clerk_id: String,
}

/// get users.
#[derive(Debug, Clone, ::clap::Args)]
pub struct UserGetsCmd {
    /// matches name or username.
    #[clap(long)]
    pub search: Option<String>,

    /// new_users | old_users | top_contributors
    #[clap(long, default_value = "new_users")]
    pub filter: UserFilter,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "20", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

/// edit user profile.
#[derive(Debug, Clone, ::clap::Args)]
pub struct UserEditCmd {
    /// str
    #[clap(name = "CLERK_ID")]
    pub clerk_id: String,

    /// json
    ///
    /// schema: {
    ///   name?: str,
    ///   username?: str,
    ///   picture?: str,
    ///   bio?: str,
    ///   location?: str,
    ///   portfolio_website?: str,
    /// }
    #[clap(name = "MUTATION", default_value = "{}", parse(try_from_str = parse_profile_mutation))]
    pub mutation: ProfileMutation,

    #[clap(long, default_value = "/profile/edit")]
    pub path: String,
}

/// unregister user and delete everything they posted.
#[derive(Debug, Clone, ::clap::Args)]
pub struct UserUnregisterCmd {
    /// str
    #[clap(name = "CLERK_ID")]
    pub clerk_id: String,

    #[clap(long, default_value = "/")]
    pub path: String,
}

/// get questions asked by user.
#[derive(Debug, Clone, ::clap::Args)]
pub struct UserQuestionsCmd {
    /// uuid
    #[clap(name = "USER_ID")]
    pub user_id: UserId,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "10", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

/// get answers posted by user.
#[derive(Debug, Clone, ::clap::Args)]
pub struct UserAnswersCmd {
    /// uuid
    #[clap(name = "USER_ID")]
    pub user_id: UserId,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "10", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

// --- question ---

/// get questions.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionGetsCmd {
    /// matches title or content.
    #[clap(long)]
    pub search: Option<String>,

    /// newest | frequent | unanswered
    #[clap(long, default_value = "newest")]
    pub filter: QuestionFilter,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "20", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

/// get question with id.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionGetCmd {
    /// uuid
    #[clap(name = "QUESTION_ID")]
    pub question_id: QuestionId,
}

/// ask question.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionAskCmd {
    /// uuid
    #[clap(short, long)]
    pub author: UserId,

    /// str
    #[clap(long)]
    pub title: String,

    /// str (html)
    #[clap(short, long)]
    pub content: String,

    /// str, repeatable.
    #[clap(short, long = "tag")]
    pub tags: Vec<String>,

    #[clap(long, default_value = "/")]
    pub path: String,
}

/// edit question title and content.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionEditCmd {
    /// uuid
    #[clap(name = "QUESTION_ID")]
    pub question_id: QuestionId,

    /// str
    #[clap(long)]
    pub title: String,

    /// str (html)
    #[clap(short, long)]
    pub content: String,

    #[clap(long, default_value = "/")]
    pub path: String,
}

/// delete question with its answers.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionDeleteCmd {
    /// uuid
    #[clap(name = "QUESTION_ID")]
    pub question_id: QuestionId,

    #[clap(long, default_value = "/")]
    pub path: String,
}

/// vote on question; voting the same way twice takes the vote back.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionVoteCmd {
    /// uuid
    #[clap(name = "QUESTION_ID")]
    pub question_id: QuestionId,

    /// up | down
    #[clap(name = "KIND", parse(try_from_str = parse_vote_kind))]
    pub kind: VoteKind,

    /// uuid
    #[clap(short, long)]
    pub user: UserId,

    #[clap(long, default_value = "/")]
    pub path: String,
}

/// count a view of question.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionViewCmd {
    /// uuid
    #[clap(name = "QUESTION_ID")]
    pub question_id: QuestionId,

    /// uuid
    #[clap(long)]
    pub viewer: Option<UserId>,
}

/// questions sharing tags with user's interactions.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionRecommendedCmd {
    /// str
    #[clap(name = "CLERK_ID")]
    pub clerk_id: String,

    #[clap(long)]
    pub search: Option<String>,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "20", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

/// save question, or unsave if already saved.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionSaveCmd {
    /// uuid
    #[clap(name = "QUESTION_ID")]
    pub question_id: QuestionId,

    /// uuid
    #[clap(short, long)]
    pub user: UserId,

    #[clap(long, default_value = "/")]
    pub path: String,
}

/// get user's saved questions.
#[derive(Debug, Clone, ::clap::Args)]
pub struct QuestionSavedCmd {
    /// str
    #[clap(name = "CLERK_ID")]
    pub clerk_id: String,

    /// matches title.
    #[clap(long)]
    pub search: Option<String>,

    /// most_recent | oldest | most_voted | most_viewed | most_answered
    #[clap(long, default_value = "most_recent")]
    pub filter: SavedFilter,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "20", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

// --- answer ---

/// answer question.
#[derive(Debug, Clone, ::clap::Args)]
pub struct AnswerPostCmd {
    /// uuid
    #[clap(name = "QUESTION_ID")]
    pub question_id: QuestionId,

    /// uuid
    #[clap(short, long)]
    pub author: UserId,

    /// str (html)
    #[clap(short, long)]
    pub content: String,

    #[clap(long, default_value = "/")]
    pub path: String,
}

/// get answers of question.
#[derive(Debug, Clone, ::clap::Args)]
pub struct AnswerGetsCmd {
    /// uuid
    #[clap(name = "QUESTION_ID")]
    pub question_id: QuestionId,

    /// highest_upvotes | lowest_upvotes | recent | old
    #[clap(long, default_value = "recent")]
    pub sort: AnswerSort,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "10", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

/// vote on answer; voting the same way twice takes the vote back.
#[derive(Debug, Clone, ::clap::Args)]
pub struct AnswerVoteCmd {
    /// uuid
    #[clap(name = "ANSWER_ID")]
    pub answer_id: AnswerId,

    /// up | down
    #[clap(name = "KIND", parse(try_from_str = parse_vote_kind))]
    pub kind: VoteKind,

    /// uuid
    #[clap(short, long)]
    pub user: UserId,

    #[clap(long, default_value = "/")]
    pub path: String,
}

/// delete answer.
#[derive(Debug, Clone, ::clap::Args)]
pub struct AnswerDeleteCmd {
    /// uuid
    #[clap(name = "ANSWER_ID")]
    pub answer_id: AnswerId,

    #[clap(long, default_value = "/")]
    pub path: String,
}

// --- tag ---

/// get tags.
#[derive(Debug, Clone, ::clap::Args)]
pub struct TagGetsCmd {
    /// matches name.
    #[clap(long)]
    pub search: Option<String>,

    /// popular | recent | name | old
    #[clap(long, default_value = "popular")]
    pub sort: TagSort,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "20", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

/// get questions of tag.
#[derive(Debug, Clone, ::clap::Args)]
pub struct TagQuestionsCmd {
    /// uuid
    #[clap(name = "TAG_ID")]
    pub tag_id: TagId,

    /// matches question title.
    #[clap(long)]
    pub search: Option<String>,

    /// u32 (1 =< n)
    #[clap(long, default_value = "1", parse(try_from_str = parse_nonzero_num))]
    pub page: u32,

    /// u32 (1 =< n)
    #[clap(long, default_value = "10", parse(try_from_str = parse_nonzero_num))]
    pub page_size: u32,
}

/// tags user interacted with most.
#[derive(Debug, Clone, ::clap::Args)]
pub struct TagTopInteractedCmd {
    /// uuid
    #[clap(name = "USER_ID")]
    pub user_id: UserId,

    #[clap(long, default_value = "3")]
    pub limit: usize,
}

// --- search ---

/// search everything, or one type with `--type`.
#[derive(Debug, Clone, ::clap::Args)]
pub struct SearchCmd {
    /// str
    #[clap(name = "QUERY")]
    pub query: String,

    /// question | answer | user | tag
    #[clap(long = "type")]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[test]
    fn parse_ask() {
        let id = UserId::new();
        let App { cmd, in_memory, .. } = App::try_parse_from(vec![
            "devflow".to_string(),
            "--in-memory".to_string(),
            "question".to_string(),
            "ask".to_string(),
            "--author".to_string(),
            id.to_string(),
            "--title".to_string(),
            "Why?".to_string(),
            "-c".to_string(),
            "<p>because</p>".to_string(),
            "-t".to_string(),
            "rust".to_string(),
            "-t".to_string(),
            "tokio".to_string(),
        ])
        .unwrap();

        assert!(in_memory);
        match cmd {
            RootMod::Question {
                cmd: QuestionMod::Ask(QuestionAskCmd { author, tags, .. }),
            } => {
                assert_eq!(author, id);
                assert_eq!(tags, vec!["rust", "tokio"]);
            },
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn script_line_has_no_binary_name() {
        let words = shell_words::split(r#"user register alice --name "Alice A" --username alice --email a@example.com"#)
            .unwrap();
        let ScriptLine { cmd } = ScriptLine::try_parse_from(words).unwrap();

        match cmd {
            RootMod::User {
                cmd: UserMod::Register(UserRegisterCmd { clerk_id, name, .. }),
            } => {
                assert_eq!(clerk_id, "alice");
                assert_eq!(name, "Alice A");
            },
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_filter_and_zero_page() {
        assert!(ScriptLine::try_parse_from(vec!["question", "gets", "--filter", "hottest"]).is_err());
        assert!(ScriptLine::try_parse_from(vec!["question", "gets", "--page", "0"]).is_err());
    }
}
