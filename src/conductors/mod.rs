use anyhow::{bail, Result};
use clap::Parser;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::cmds::*;
use crate::handlers::Handler;
use crate::usecases::{answer, question, search, tag, user};
use crate::utils::LetChain;

pub struct Conductor {
    pub handler: Handler,
}

macro_rules! call {
    ($u:expr, $( $m:ident )::+ { $( $f:ident $( : $v:expr )? ),* $(,)? }) => {{
        $u.handle($( $m )::+::Input { $( $f $( : $v )? ),* })
            .await?
            .let_(|o| serde_json::to_value(o))?
    }};
}

impl Conductor {
    /// Runs one command and returns its output as json.
    #[tracing::instrument(skip(self))]
    pub async fn conduct(&self, cmd: RootMod) -> Result<Value> {
        let h = &self.handler;

        let v = match cmd {
            RootMod::User { cmd } => match cmd {
                UserMod::Register(UserRegisterCmd {
                    clerk_id,
                    name,
                    username,
                    email,
                    picture,
                }) => call!(h.user.register, user::register {
                    clerk_id,
                    name,
                    username,
                    email,
                    picture,
                }),

                UserMod::Get(UserGetCmd { clerk_id }) => {
                    call!(h.user.get, user::get { clerk_id })
                },

                UserMod::Info(UserInfoCmd { clerk_id }) => {
                    call!(h.user.info, user::info { clerk_id })
                },

                UserMod::Gets(UserGetsCmd {
                    search,
                    filter,
                    page,
                    page_size,
                }) => call!(h.user.gets, user::gets {
                    search,
                    filter,
                    page,
                    page_size,
                }),

                UserMod::Edit(UserEditCmd {
                    clerk_id,
                    mutation,
                    path,
                }) => call!(h.user.edit, user::edit {
                    clerk_id,
                    mutation,
                    path,
                }),

                UserMod::Unregister(UserUnregisterCmd { clerk_id, path }) => {
                    call!(h.user.unregister, user::unregister { clerk_id, path })
                },

                UserMod::Questions(UserQuestionsCmd {
                    user_id,
                    page,
                    page_size,
                }) => call!(h.user.questions, user::questions {
                    user_id,
                    page,
                    page_size,
                }),

                UserMod::Answers(UserAnswersCmd {
                    user_id,
                    page,
                    page_size,
                }) => call!(h.user.answers, user::answers {
                    user_id,
                    page,
                    page_size,
                }),
            },

            RootMod::Question { cmd } => match cmd {
                QuestionMod::Gets(QuestionGetsCmd {
                    search,
                    filter,
                    page,
                    page_size,
                }) => call!(h.question.gets, question::gets {
                    search,
                    filter,
                    page,
                    page_size,
                }),

                QuestionMod::Get(QuestionGetCmd { question_id }) => {
                    call!(h.question.get, question::get { question_id })
                },

                QuestionMod::Ask(QuestionAskCmd {
                    author,
                    title,
                    content,
                    tags,
                    path,
                }) => call!(h.question.ask, question::ask {
                    title,
                    content,
                    tags,
                    author,
                    path,
                }),

                QuestionMod::Edit(QuestionEditCmd {
                    question_id,
                    title,
                    content,
                    path,
                }) => call!(h.question.edit, question::edit {
                    question_id,
                    title,
                    content,
                    path,
                }),

                QuestionMod::Delete(QuestionDeleteCmd { question_id, path }) => {
                    call!(h.question.delete, question::delete { question_id, path })
                },

                QuestionMod::Vote(QuestionVoteCmd {
                    question_id,
                    kind,
                    user,
                    path,
                }) => call!(h.question.vote, question::vote {
                    question_id,
                    user_id: user,
                    kind,
                    path,
                }),

                QuestionMod::View(QuestionViewCmd {
                    question_id,
                    viewer,
                }) => call!(h.question.view, question::view {
                    question_id,
                    viewer,
                }),

                QuestionMod::Hot => call!(h.question.hot, question::hot {}),

                QuestionMod::Recommended(QuestionRecommendedCmd {
                    clerk_id,
                    search,
                    page,
                    page_size,
                }) => call!(h.question.recommended, question::recommended {
                    clerk_id,
                    search,
                    page,
                    page_size,
                }),

                QuestionMod::Save(QuestionSaveCmd {
                    question_id,
                    user,
                    path,
                }) => call!(h.question.save, question::save {
                    user_id: user,
                    question_id,
                    path,
                }),

                QuestionMod::Saved(QuestionSavedCmd {
                    clerk_id,
                    search,
                    filter,
                    page,
                    page_size,
                }) => call!(h.question.saved, question::saved {
                    clerk_id,
                    search,
                    filter,
                    page,
                    page_size,
                }),
            },

            RootMod::Answer { cmd } => match cmd {
                AnswerMod::Post(AnswerPostCmd {
                    question_id,
                    author,
                    content,
                    path,
                }) => call!(h.answer.post, answer::post {
                    content,
                    author,
                    question_id,
                    path,
                }),

                AnswerMod::Gets(AnswerGetsCmd {
                    question_id,
                    sort,
                    page,
                    page_size,
                }) => call!(h.answer.gets, answer::gets {
                    question_id,
                    sort,
                    page,
                    page_size,
                }),

                AnswerMod::Vote(AnswerVoteCmd {
                    answer_id,
                    kind,
                    user,
                    path,
                }) => call!(h.answer.vote, answer::vote {
                    answer_id,
                    user_id: user,
                    kind,
                    path,
                }),

                AnswerMod::Delete(AnswerDeleteCmd { answer_id, path }) => {
                    call!(h.answer.delete, answer::delete { answer_id, path })
                },
            },

            RootMod::Tag { cmd } => match cmd {
                TagMod::Gets(TagGetsCmd {
                    search,
                    sort,
                    page,
                    page_size,
                }) => call!(h.tag.gets, tag::gets {
                    search,
                    sort,
                    page,
                    page_size,
                }),

                TagMod::Questions(TagQuestionsCmd {
                    tag_id,
                    search,
                    page,
                    page_size,
                }) => call!(h.tag.questions, tag::questions {
                    tag_id,
                    search,
                    page,
                    page_size,
                }),

                TagMod::Popular => call!(h.tag.popular, tag::popular {}),

                TagMod::TopInteracted(TagTopInteractedCmd { user_id, limit }) => {
                    call!(h.tag.top_interacted, tag::top_interacted { user_id, limit })
                },
            },

            RootMod::Search(SearchCmd { query, kind }) => {
                call!(h.search.global, search::global { query, kind })
            },

            RootMod::Script => bail!("scripts cannot be nested."),
        };

        Ok(v)
    }

    /// Runs each line of `input` as a command and writes one json line per
    /// command to `output`. Failed lines report `{"error": ..}` and the run
    /// goes on.
    pub async fn run_script<R, W>(&self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        let mut line_no = 0_usize;

        while let Some(line) = lines.next_line().await? {
            line_no += 1;

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let res = match self.parse_line(line) {
                Ok(cmd) => self.conduct(cmd).await,
                Err(e) => Err(e),
            };

            let v = match res {
                Ok(v) => v,
                Err(e) => {
                    tracing::warn!(line_no, "{}", e);
                    json!({ "line": line_no, "error": e.to_string() })
                },
            };

            output.write_all(format!("{}\n", v).as_bytes()).await?;
        }

        output.flush().await?;
        Ok(())
    }

    fn parse_line(&self, line: &str) -> Result<RootMod> {
        let words = shell_words::split(line)?;
        let ScriptLine { cmd } = ScriptLine::try_parse_from(words)?;

        Ok(cmd)
    }
}
