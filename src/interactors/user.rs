use std::collections::HashSet;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;

use super::*;
use crate::badges::{self, BadgeCategory};
use crate::entities::User;
use crate::repositories::{
    AnswerOrder, AnswerQuery, Paging, QuestionOrder, QuestionQuery, UserMutation, UserOrder,
    UserQuery, UserSearch,
};
use crate::usecases::user::{
    answers, edit, get, gets, info, questions, register, unregister, ProfileMutation, UserFilter,
};
use crate::utils::{has_next, AlsoChain, LetChain};

pub struct UserRegisterInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl register::Usecase for UserRegisterInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: register::Input) -> Result<register::Output> {
        tracing::trace!("input - {:?}", data);

        let register::Input {
            clerk_id,
            name,
            username,
            email,
            picture,
        } = data;

        non_empty("clerk_id", &clerk_id)?;

        let new_user = User {
            id: UserId::new(),
            clerk_id,
            name,
            username,
            email,
            picture,
            bio: None,
            location: None,
            portfolio_website: None,
            reputation: 0,
            saved: HashSet::new(),
            joined_at: Utc::now(),
        };

        let can_insert = self
            .repos
            .user_repository
            .insert(new_user.clone())
            .await
            .map_err(user_err_fmt)?;

        if !can_insert {
            bail!("already registered.");
        }

        register::Output { user: new_user }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct UserGetInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl get::Usecase for UserGetInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: get::Input) -> Result<get::Output> {
        tracing::trace!("input - {:?}", data);

        let get::Input { clerk_id } = data;

        find_by_clerk_id(&self.repos, &clerk_id)
            .await?
            .let_(|user| get::Output { user })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct UserInfoInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl info::Usecase for UserInfoInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: info::Input) -> Result<info::Output> {
        tracing::trace!("input - {:?}", data);

        let info::Input { clerk_id } = data;

        let user = find_by_clerk_id(&self.repos, &clerk_id).await?;

        let asked = self
            .repos
            .question_repository
            .stats_by_author(user.id)
            .await
            .map_err(question_err_fmt)?;
        let answered = self
            .repos
            .answer_repository
            .stats_by_author(user.id)
            .await
            .map_err(answer_err_fmt)?;

        let badges = badges::assign(&[
            (BadgeCategory::QuestionCount, asked.count),
            (BadgeCategory::AnswerCount, answered.count),
            (BadgeCategory::QuestionUpvotes, asked.upvotes),
            (BadgeCategory::AnswerUpvotes, answered.upvotes),
            (BadgeCategory::TotalViews, asked.views),
        ]);

        info::Output {
            reputation: user.reputation,
            user,
            total_questions: asked.count,
            total_answers: answered.count,
            badges,
        }
        .also_(|o| tracing::trace!("output - {:?}", o))
        .let_(Ok)
    }
}

pub struct UserGetsInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl gets::Usecase for UserGetsInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: gets::Input) -> Result<gets::Output> {
        tracing::trace!("input - {:?}", data);

        let gets::Input {
            search,
            filter,
            page,
            page_size,
        } = data;

        let query = UserQuery {
            search: text_match(search)?.map(UserSearch::NameOrUsername),
        };
        let order = match filter {
            UserFilter::NewUsers => UserOrder::JoinedDesc,
            UserFilter::OldUsers => UserOrder::JoinedAsc,
            UserFilter::TopContributors => UserOrder::ReputationDesc,
        };
        let paging = Paging::page(page, page_size)?;

        let total = self
            .repos
            .user_repository
            .count(query.clone())
            .await
            .map_err(user_err_fmt)?;

        self.repos
            .user_repository
            .finds(query, order, paging)
            .await
            .map_err(user_err_fmt)?
            .let_(|users| gets::Output {
                is_next: has_next(total, paging.skip, users.len()),
                users,
            })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

impl From<ProfileMutation> for UserMutation {
    fn from(m: ProfileMutation) -> Self {
        let ProfileMutation {
            name,
            username,
            picture,
            bio,
            location,
            portfolio_website,
        } = m;

        UserMutation {
            name,
            username,
            email: None,
            picture,
            bio,
            location,
            portfolio_website,
        }
    }
}

pub struct UserEditInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl edit::Usecase for UserEditInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: edit::Input) -> Result<edit::Output> {
        tracing::trace!("input - {:?}", data);

        let edit::Input {
            clerk_id,
            mutation,
            path,
        } = data;

        let user = find_by_clerk_id(&self.repos, &clerk_id).await?;

        let user = self
            .repos
            .user_repository
            .update(user.id, mutation.into())
            .await
            .map_err(user_err_fmt)?;

        self.revalidator.revalidate(&path).await;

        edit::Output { user }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct UserUnregisterInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl unregister::Usecase for UserUnregisterInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: unregister::Input) -> Result<unregister::Output> {
        tracing::trace!("input - {:?}", data);

        let unregister::Input { clerk_id, path } = data;

        let user = find_by_clerk_id(&self.repos, &clerk_id).await?;

        let own_questions = self
            .repos
            .question_repository
            .finds(
                QuestionQuery {
                    author: Some(user.id),
                    ..Default::default()
                },
                QuestionOrder::CreatedAsc,
                Paging::all(),
            )
            .await
            .map_err(question_err_fmt)?;

        for q in own_questions {
            match self.repos.question_repository.delete(q.id).await {
                Ok(q) => cascade_question(&self.repos, &q).await?,
                Err(RepositoryError::NotFound) => continue,
                Err(e) => return Err(question_err_fmt(e)),
            }
        }

        let own_answers = self
            .repos
            .answer_repository
            .finds(
                AnswerQuery {
                    author: Some(user.id),
                    ..Default::default()
                },
                AnswerOrder::CreatedAsc,
                Paging::all(),
            )
            .await
            .map_err(answer_err_fmt)?;

        for a in own_answers {
            match self.repos.answer_repository.delete(a.id).await {
                Ok(a) => cascade_answer(&self.repos, &a).await?,
                Err(RepositoryError::NotFound) => continue,
                Err(e) => return Err(answer_err_fmt(e)),
            }
        }

        self.repos
            .interaction_repository
            .delete_many(InteractionQuery {
                user: Some(user.id),
                ..Default::default()
            })
            .await
            .map_err(interaction_err_fmt)?;

        let user = self
            .repos
            .user_repository
            .delete(user.id)
            .await
            .map_err(user_err_fmt)?;

        self.revalidator.revalidate(&path).await;

        unregister::Output { user }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct UserQuestionsInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl questions::Usecase for UserQuestionsInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: questions::Input) -> Result<questions::Output> {
        tracing::trace!("input - {:?}", data);

        let questions::Input {
            user_id,
            page,
            page_size,
        } = data;

        let query = QuestionQuery {
            author: Some(user_id),
            ..Default::default()
        };
        let paging = Paging::page(page, page_size)?;

        let total = self
            .repos
            .question_repository
            .count(query.clone())
            .await
            .map_err(question_err_fmt)?;

        let found = self
            .repos
            .question_repository
            .finds(query, QuestionOrder::CreatedDesc, paging)
            .await
            .map_err(question_err_fmt)?;
        let is_next = has_next(total, paging.skip, found.len());

        populate_questions(&self.repos, found)
            .await?
            .let_(|questions| questions::Output {
                questions,
                total,
                is_next,
            })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct UserAnswersInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl answers::Usecase for UserAnswersInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: answers::Input) -> Result<answers::Output> {
        tracing::trace!("input - {:?}", data);

        let answers::Input {
            user_id,
            page,
            page_size,
        } = data;

        let query = AnswerQuery {
            author: Some(user_id),
            ..Default::default()
        };
        let paging = Paging::page(page, page_size)?;

        let total = self
            .repos
            .answer_repository
            .count(query.clone())
            .await
            .map_err(answer_err_fmt)?;

        let found = self
            .repos
            .answer_repository
            .finds(query, AnswerOrder::UpvotesDesc, paging)
            .await
            .map_err(answer_err_fmt)?;
        let is_next = has_next(total, paging.skip, found.len());

        populate_answers(&self.repos, found)
            .await?
            .let_(|answers| answers::Output {
                answers,
                total,
                is_next,
            })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ask, handler, register};
    use super::*;
    use crate::badges::BadgeCounts;
    use crate::usecases::answer::post;

    #[tokio::test]
    async fn register_twice_fails() {
        let (h, _, _) = handler();
        register(&h, "alice").await;

        let res = h
            .user
            .register
            .handle(register::Input {
                clerk_id: "alice".to_string(),
                name: "Other".to_string(),
                username: "other".to_string(),
                email: "other@example.com".to_string(),
                picture: String::new(),
            })
            .await;

        assert!(res.is_err());
    }

    #[tokio::test]
    async fn edit_changes_profile_only() {
        let (h, _, revalidator) = handler();
        register(&h, "alice").await;

        let out = h
            .user
            .edit
            .handle(edit::Input {
                clerk_id: "alice".to_string(),
                mutation: ProfileMutation {
                    bio: Some("rustacean".to_string()),
                    location: Some("Tokyo".to_string()),
                    ..Default::default()
                },
                path: "/profile/alice".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(out.user.bio.as_deref(), Some("rustacean"));
        assert_eq!(out.user.location.as_deref(), Some("Tokyo"));
        assert_eq!(out.user.email, "alice@example.com");
        assert_eq!(revalidator.paths(), vec!["/profile/alice"]);
    }

    #[tokio::test]
    async fn info_counts_activity() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;

        let q = ask(&h, alice.id, "Q", &[]).await;
        h.answer
            .post
            .handle(post::Input {
                content: "A".to_string(),
                author: bob.id,
                question_id: q.id,
                path: "/".to_string(),
            })
            .await
            .unwrap();

        let out = h
            .user
            .info
            .handle(info::Input {
                clerk_id: "alice".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(out.total_questions, 1);
        assert_eq!(out.total_answers, 0);
        assert_eq!(out.reputation, 5);
        assert_eq!(out.badges, BadgeCounts::default());
    }

    #[tokio::test]
    async fn unregister_cascades_content() {
        let (h, repos, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;

        let own = ask(&h, alice.id, "Alice asks", &["rust"]).await;
        let other = ask(&h, bob.id, "Bob asks", &["rust"]).await;

        let answer = h
            .answer
            .post
            .handle(post::Input {
                content: "Alice answers".to_string(),
                author: alice.id,
                question_id: other.id,
                path: "/".to_string(),
            })
            .await
            .unwrap()
            .answer;

        h.user
            .unregister
            .handle(unregister::Input {
                clerk_id: "alice".to_string(),
                path: "/".to_string(),
            })
            .await
            .unwrap();

        assert!(repos.user_repository.find(alice.id).await.is_err());
        assert!(repos.question_repository.find(own.id).await.is_err());
        assert!(repos.answer_repository.find(answer.id).await.is_err());

        let other = repos.question_repository.find(other.id).await.unwrap();
        assert!(other.answers.is_empty());

        assert!(!repos
            .interaction_repository
            .is_exists(InteractionQuery {
                user: Some(alice.id),
                ..Default::default()
            })
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn users_listed_by_reputation() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        register(&h, "bob").await;

        ask(&h, alice.id, "Q", &[]).await;

        let out = h
            .user
            .gets
            .handle(gets::Input {
                search: None,
                filter: UserFilter::TopContributors,
                page: 1,
                page_size: 1,
            })
            .await
            .unwrap();

        assert_eq!(out.users[0].clerk_id, "alice");
        assert!(out.is_next);
    }

    #[tokio::test]
    async fn user_questions_and_answers_are_paged() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;

        for i in 0..3 {
            ask(&h, alice.id, &format!("Q{}", i), &[]).await;
        }

        let out = h
            .user
            .questions
            .handle(questions::Input {
                user_id: alice.id,
                page: 1,
                page_size: 2,
            })
            .await
            .unwrap();
        assert_eq!(out.total, 3);
        assert_eq!(out.questions.len(), 2);
        assert!(out.is_next);

        let out = h
            .user
            .answers
            .handle(answers::Input {
                user_id: alice.id,
                page: 1,
                page_size: 10,
            })
            .await
            .unwrap();
        assert_eq!(out.total, 0);
        assert!(!out.is_next);
    }
}
