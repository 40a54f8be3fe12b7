use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;

use super::*;
use crate::entities::{
    Answer, AnswerId, Interaction, InteractionAction, InteractionId, POST_ANSWER_REPUTATION,
};
use crate::repositories::{AnswerOrder, AnswerQuery, Paging, VoteChange};
use crate::usecases::answer::{delete, gets, post, vote, AnswerSort};
use crate::utils::{has_next, AlsoChain, LetChain};

pub struct AnswerPostInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl post::Usecase for AnswerPostInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: post::Input) -> Result<post::Output> {
        tracing::trace!("input - {:?}", data);

        let post::Input {
            content,
            author,
            question_id,
            path,
        } = data;

        non_empty("content", &content)?;
        expect_user(&self.repos, author).await?;

        let question = self
            .repos
            .question_repository
            .find(question_id)
            .await
            .map_err(question_err_fmt)?;

        let answer = Answer {
            id: AnswerId::new(),
            content,
            author,
            question: question_id,
            votes: Default::default(),
            created_at: Utc::now(),
        };

        if !self
            .repos
            .answer_repository
            .insert(answer.clone())
            .await
            .map_err(answer_err_fmt)?
        {
            bail!("answer id is already taken.");
        }

        self.repos
            .question_repository
            .insert_answer(question_id, answer.id)
            .await
            .map_err(question_err_fmt)?;

        self.repos
            .interaction_repository
            .insert(Interaction {
                id: InteractionId::new(),
                user: author,
                action: InteractionAction::Answer,
                question: Some(question_id),
                answer: Some(answer.id),
                tags: question.tags,
                created_at: Utc::now(),
            })
            .await
            .map_err(interaction_err_fmt)?;

        self.repos
            .user_repository
            .inc_reputation(author, POST_ANSWER_REPUTATION)
            .await
            .map_err(user_err_fmt)?;

        self.revalidator.revalidate(&path).await;

        post::Output { answer }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct AnswerGetsInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl gets::Usecase for AnswerGetsInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: gets::Input) -> Result<gets::Output> {
        tracing::trace!("input - {:?}", data);

        let gets::Input {
            question_id,
            sort,
            page,
            page_size,
        } = data;

        let query = AnswerQuery {
            question: Some(question_id),
            ..Default::default()
        };
        let order = match sort {
            AnswerSort::HighestUpvotes => AnswerOrder::UpvotesDesc,
            AnswerSort::LowestUpvotes => AnswerOrder::UpvotesAsc,
            AnswerSort::Recent => AnswerOrder::CreatedDesc,
            AnswerSort::Old => AnswerOrder::CreatedAsc,
        };
        let paging = Paging::page(page, page_size)?;

        let total = self
            .repos
            .answer_repository
            .count(query.clone())
            .await
            .map_err(answer_err_fmt)?;

        let answers = self
            .repos
            .answer_repository
            .finds(query, order, paging)
            .await
            .map_err(answer_err_fmt)?;
        let is_next = has_next(total, paging.skip, answers.len());

        populate_answers(&self.repos, answers)
            .await?
            .let_(|answers| gets::Output {
                answers,
                total,
                is_next,
            })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct AnswerVoteInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl vote::Usecase for AnswerVoteInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: vote::Input) -> Result<vote::Output> {
        tracing::trace!("input - {:?}", data);

        let vote::Input {
            answer_id,
            user_id,
            kind,
            path,
        } = data;

        expect_user(&self.repos, user_id).await?;

        let current = self
            .repos
            .answer_repository
            .find(answer_id)
            .await
            .map_err(answer_err_fmt)?;
        let transition = resolve_vote(&current.votes, user_id, kind);

        let answer = self
            .repos
            .answer_repository
            .vote(answer_id, user_id, VoteChange {
                from: transition.from,
                to: transition.to,
            })
            .await
            .map_err(answer_err_fmt)?;

        apply_reputation(&self.repos, user_id, answer.author, transition).await?;

        self.revalidator.revalidate(&path).await;

        vote::Output {
            answer,
            state: transition.to,
        }
        .also_(|o| tracing::trace!("output - {:?}", o))
        .let_(Ok)
    }
}

pub struct AnswerDeleteInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl delete::Usecase for AnswerDeleteInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: delete::Input) -> Result<delete::Output> {
        tracing::trace!("input - {:?}", data);

        let delete::Input { answer_id, path } = data;

        let answer = self
            .repos
            .answer_repository
            .delete(answer_id)
            .await
            .map_err(answer_err_fmt)?;

        cascade_answer(&self.repos, &answer).await?;

        self.revalidator.revalidate(&path).await;

        delete::Output { answer }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ask, handler, register, reputation};
    use super::*;
    use crate::entities::{UserId, VoteKind};
    use crate::handlers::Handler;
    use crate::repositories::InteractionQuery;

    async fn post_answer(h: &Handler, author: UserId, q: crate::entities::QuestionId) -> Answer {
        h.answer
            .post
            .handle(post::Input {
                content: "<p>use Arc</p>".to_string(),
                author,
                question_id: q,
                path: format!("/question/{}", q),
            })
            .await
            .unwrap()
            .answer
    }

    #[tokio::test]
    async fn posting_rewards_and_deleting_cleans_up() {
        let (h, repos, revalidator) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let q = ask(&h, alice.id, "Sharing state?", &["rust"]).await;

        let a = post_answer(&h, bob.id, q.id).await;
        assert_eq!(reputation(&repos, bob.id).await, 10);

        let stored = repos.question_repository.find(q.id).await.unwrap();
        assert_eq!(stored.answers, vec![a.id]);

        h.answer
            .delete
            .handle(delete::Input {
                answer_id: a.id,
                path: "/".to_string(),
            })
            .await
            .unwrap();

        let stored = repos.question_repository.find(q.id).await.unwrap();
        assert!(stored.answers.is_empty());
        assert!(!repos
            .interaction_repository
            .is_exists(InteractionQuery {
                answers: Some(vec![a.id]),
                ..Default::default()
            })
            .await
            .unwrap());

        assert_eq!(
            revalidator.paths().last().map(String::as_str),
            Some("/")
        );
    }

    #[tokio::test]
    async fn answer_votes_follow_question_rules() {
        let (h, repos, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let q = ask(&h, alice.id, "Pinning?", &[]).await;
        let a = post_answer(&h, bob.id, q.id).await;

        let vote = |kind| vote::Input {
            answer_id: a.id,
            user_id: alice.id,
            kind,
            path: "/".to_string(),
        };

        let out = h.answer.vote.handle(vote(VoteKind::Down)).await.unwrap();
        assert_eq!(out.state, Some(VoteKind::Down));
        assert_eq!(reputation(&repos, alice.id).await, 5 - 2);
        assert_eq!(reputation(&repos, bob.id).await, 10 - 10);

        let out = h.answer.vote.handle(vote(VoteKind::Up)).await.unwrap();
        assert_eq!(out.state, Some(VoteKind::Up));
        assert!(out.answer.votes.upvotes.contains(&alice.id));
        assert!(out.answer.votes.downvotes.is_empty());
        assert_eq!(reputation(&repos, alice.id).await, 5 + 2);
        assert_eq!(reputation(&repos, bob.id).await, 10 + 10);
    }

    #[tokio::test]
    async fn answers_listed_by_upvotes() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let q = ask(&h, alice.id, "Errors?", &[]).await;

        let _low = post_answer(&h, bob.id, q.id).await;
        let high = post_answer(&h, bob.id, q.id).await;

        h.answer
            .vote
            .handle(vote::Input {
                answer_id: high.id,
                user_id: alice.id,
                kind: VoteKind::Up,
                path: "/".to_string(),
            })
            .await
            .unwrap();

        let out = h
            .answer
            .gets
            .handle(gets::Input {
                question_id: q.id,
                sort: AnswerSort::HighestUpvotes,
                page: 1,
                page_size: 1,
            })
            .await
            .unwrap();

        assert_eq!(out.total, 2);
        assert!(out.is_next);
        assert_eq!(out.answers[0].answer.id, high.id);
        assert_eq!(
            out.answers[0].author.as_ref().map(|a| a.clerk_id.as_str()),
            Some("bob")
        );
    }

    #[tokio::test]
    async fn posting_to_missing_question_fails() {
        let (h, _, _) = handler();
        let bob = register(&h, "bob").await;

        let res = h
            .answer
            .post
            .handle(post::Input {
                content: "hello".to_string(),
                author: bob.id,
                question_id: crate::entities::QuestionId::new(),
                path: "/".to_string(),
            })
            .await;

        assert!(res.is_err());
    }
}
