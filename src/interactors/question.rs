use std::collections::HashSet;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;

use super::*;
use crate::entities::{
    Interaction, InteractionAction, InteractionId, Question, QuestionId, TagId, Votes,
    ASK_QUESTION_REPUTATION,
};
use crate::repositories::{
    InteractionQuery, Paging, QuestionMutation, QuestionOrder, QuestionQuery, QuestionSearch,
    VoteChange,
};
use crate::usecases::question::{
    ask, delete, edit, get, gets, hot, recommended, save, saved, vote, view, QuestionFilter,
    SavedFilter,
};
use crate::utils::{has_next, AlsoChain, LetChain};

const HOT_QUESTIONS: u64 = 5;

pub struct QuestionGetsInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl gets::Usecase for QuestionGetsInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: gets::Input) -> Result<gets::Output> {
        tracing::trace!("input - {:?}", data);

        let gets::Input {
            search,
            filter,
            page,
            page_size,
        } = data;

        let query = QuestionQuery {
            search: text_match(search)?.map(QuestionSearch::TitleOrContent),
            unanswered: filter == QuestionFilter::Unanswered,
            ..Default::default()
        };
        let order = match filter {
            QuestionFilter::Newest | QuestionFilter::Unanswered => QuestionOrder::CreatedDesc,
            QuestionFilter::Frequent => QuestionOrder::ViewsDesc,
        };
        let paging = Paging::page(page, page_size)?;

        let total = self
            .repos
            .question_repository
            .count(query.clone())
            .await
            .map_err(question_err_fmt)?;

        let questions = self
            .repos
            .question_repository
            .finds(query, order, paging)
            .await
            .map_err(question_err_fmt)?;
        let is_next = has_next(total, paging.skip, questions.len());

        populate_questions(&self.repos, questions)
            .await?
            .let_(|questions| gets::Output { questions, is_next })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct QuestionGetInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl get::Usecase for QuestionGetInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: get::Input) -> Result<get::Output> {
        tracing::trace!("input - {:?}", data);

        let get::Input { question_id } = data;

        let question = self
            .repos
            .question_repository
            .find(question_id)
            .await
            .map_err(question_err_fmt)?;

        populate_question(&self.repos, question)
            .await?
            .let_(|question| get::Output { question })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

/// Keeps the first spelling of each name, comparing without case.
fn dedup_tag_names(names: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();

    names
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty() && seen.insert(n.to_lowercase()))
        .collect()
}

pub struct QuestionAskInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl ask::Usecase for QuestionAskInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: ask::Input) -> Result<ask::Output> {
        tracing::trace!("input - {:?}", data);

        let ask::Input {
            title,
            content,
            tags,
            author,
            path,
        } = data;

        non_empty("title", &title)?;
        expect_user(&self.repos, author).await?;

        let question = Question {
            id: QuestionId::new(),
            title,
            content,
            author,
            tags: vec![],
            votes: Votes::default(),
            views: 0,
            answers: vec![],
            created_at: Utc::now(),
        };
        let question_id = question.id;

        if !self
            .repos
            .question_repository
            .insert(question)
            .await
            .map_err(question_err_fmt)?
        {
            bail!("question id is already taken.");
        }

        let mut tag_ids: Vec<TagId> = vec![];
        for name in dedup_tag_names(tags) {
            let tag = self
                .repos
                .tag_repository
                .upsert_question(&name, question_id)
                .await
                .map_err(tag_err_fmt)?;

            if !tag_ids.contains(&tag.id) {
                tag_ids.push(tag.id);
            }
        }

        self.repos
            .question_repository
            .insert_tags(question_id, tag_ids.clone())
            .await
            .map_err(question_err_fmt)?;

        self.repos
            .interaction_repository
            .insert(Interaction {
                id: InteractionId::new(),
                user: author,
                action: InteractionAction::AskQuestion,
                question: Some(question_id),
                answer: None,
                tags: tag_ids,
                created_at: Utc::now(),
            })
            .await
            .map_err(interaction_err_fmt)?;

        self.repos
            .user_repository
            .inc_reputation(author, ASK_QUESTION_REPUTATION)
            .await
            .map_err(user_err_fmt)?;

        self.revalidator.revalidate(&path).await;

        self.repos
            .question_repository
            .find(question_id)
            .await
            .map_err(question_err_fmt)?
            .let_(|question| ask::Output { question })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct QuestionEditInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl edit::Usecase for QuestionEditInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: edit::Input) -> Result<edit::Output> {
        tracing::trace!("input - {:?}", data);

        let edit::Input {
            question_id,
            title,
            content,
            path,
        } = data;

        non_empty("title", &title)?;

        let question = self
            .repos
            .question_repository
            .update(question_id, QuestionMutation {
                title: Some(title),
                content: Some(content),
            })
            .await
            .map_err(question_err_fmt)?;

        self.revalidator.revalidate(&path).await;

        edit::Output { question }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct QuestionDeleteInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl delete::Usecase for QuestionDeleteInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: delete::Input) -> Result<delete::Output> {
        tracing::trace!("input - {:?}", data);

        let delete::Input { question_id, path } = data;

        let question = self
            .repos
            .question_repository
            .delete(question_id)
            .await
            .map_err(question_err_fmt)?;

        cascade_question(&self.repos, &question).await?;

        self.revalidator.revalidate(&path).await;

        delete::Output { question }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct QuestionVoteInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl vote::Usecase for QuestionVoteInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: vote::Input) -> Result<vote::Output> {
        tracing::trace!("input - {:?}", data);

        let vote::Input {
            question_id,
            user_id,
            kind,
            path,
        } = data;

        expect_user(&self.repos, user_id).await?;

        let current = self
            .repos
            .question_repository
            .find(question_id)
            .await
            .map_err(question_err_fmt)?;
        let transition = resolve_vote(&current.votes, user_id, kind);

        let question = self
            .repos
            .question_repository
            .vote(question_id, user_id, VoteChange {
                from: transition.from,
                to: transition.to,
            })
            .await
            .map_err(question_err_fmt)?;

        apply_reputation(&self.repos, user_id, question.author, transition).await?;

        self.revalidator.revalidate(&path).await;

        vote::Output {
            question,
            state: transition.to,
        }
        .also_(|o| tracing::trace!("output - {:?}", o))
        .let_(Ok)
    }
}

pub struct QuestionViewInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl view::Usecase for QuestionViewInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: view::Input) -> Result<view::Output> {
        tracing::trace!("input - {:?}", data);

        let view::Input {
            question_id,
            viewer,
        } = data;

        let question = self
            .repos
            .question_repository
            .inc_views(question_id)
            .await
            .map_err(question_err_fmt)?;

        if let Some(viewer) = viewer {
            let query = InteractionQuery {
                user: Some(viewer),
                action: Some(InteractionAction::View),
                question: Some(question_id),
                ..Default::default()
            };

            let viewed = self
                .repos
                .interaction_repository
                .is_exists(query)
                .await
                .map_err(interaction_err_fmt)?;

            if !viewed {
                self.repos
                    .interaction_repository
                    .insert(Interaction {
                        id: InteractionId::new(),
                        user: viewer,
                        action: InteractionAction::View,
                        question: Some(question_id),
                        answer: None,
                        tags: question.tags.clone(),
                        created_at: Utc::now(),
                    })
                    .await
                    .map_err(interaction_err_fmt)?;
            }
        }

        view::Output { question }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct QuestionHotInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl hot::Usecase for QuestionHotInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: hot::Input) -> Result<hot::Output> {
        tracing::trace!("input - {:?}", data);

        self.repos
            .question_repository
            .finds(
                QuestionQuery::default(),
                QuestionOrder::ViewsThenUpvotesDesc,
                Paging::first(HOT_QUESTIONS),
            )
            .await
            .map_err(question_err_fmt)?
            .let_(|questions| hot::Output { questions })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct QuestionRecommendedInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl recommended::Usecase for QuestionRecommendedInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: recommended::Input) -> Result<recommended::Output> {
        tracing::trace!("input - {:?}", data);

        let recommended::Input {
            clerk_id,
            search,
            page,
            page_size,
        } = data;

        let user = find_by_clerk_id(&self.repos, &clerk_id).await?;

        let tags = self
            .repos
            .interaction_repository
            .finds(InteractionQuery {
                user: Some(user.id),
                ..Default::default()
            })
            .await
            .map_err(interaction_err_fmt)?
            .into_iter()
            .flat_map(|i| i.tags)
            .collect::<HashSet<TagId>>();

        if tags.is_empty() {
            return recommended::Output {
                questions: vec![],
                is_next: false,
            }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok);
        }

        let query = QuestionQuery {
            search: text_match(search)?.map(QuestionSearch::TitleOrContent),
            exclude_author: Some(user.id),
            tags: Some(tags),
            ..Default::default()
        };
        let paging = Paging::page(page, page_size)?;

        let total = self
            .repos
            .question_repository
            .count(query.clone())
            .await
            .map_err(question_err_fmt)?;

        let questions = self
            .repos
            .question_repository
            .finds(query, QuestionOrder::CreatedDesc, paging)
            .await
            .map_err(question_err_fmt)?;
        let is_next = has_next(total, paging.skip, questions.len());

        populate_questions(&self.repos, questions)
            .await?
            .let_(|questions| recommended::Output { questions, is_next })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct QuestionSaveInteractor {
    pub repos: Repositories,
    pub revalidator: SharedRevalidator,
}
#[async_trait]
impl save::Usecase for QuestionSaveInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: save::Input) -> Result<save::Output> {
        tracing::trace!("input - {:?}", data);

        let save::Input {
            user_id,
            question_id,
            path,
        } = data;

        if !self
            .repos
            .question_repository
            .is_exists(question_id)
            .await
            .map_err(question_err_fmt)?
        {
            bail!("cannot find question.");
        }

        let was_saved = self
            .repos
            .user_repository
            .is_saved(user_id, question_id)
            .await
            .map_err(user_err_fmt)?;

        let changed = match was_saved {
            true => self
                .repos
                .user_repository
                .delete_saved(user_id, question_id)
                .await
                .map_err(user_err_fmt)?,
            false => self
                .repos
                .user_repository
                .insert_saved(user_id, question_id)
                .await
                .map_err(user_err_fmt)?,
        };

        if !changed {
            tracing::warn!(%user_id, %question_id, "saved set changed concurrently");
        }

        self.revalidator.revalidate(&path).await;

        save::Output { saved: !was_saved }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct QuestionSavedInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl saved::Usecase for QuestionSavedInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: saved::Input) -> Result<saved::Output> {
        tracing::trace!("input - {:?}", data);

        let saved::Input {
            clerk_id,
            search,
            filter,
            page,
            page_size,
        } = data;

        let user = find_by_clerk_id(&self.repos, &clerk_id).await?;

        let query = QuestionQuery {
            search: text_match(search)?.map(QuestionSearch::Title),
            ids: Some(user.saved),
            ..Default::default()
        };
        let order = match filter {
            SavedFilter::MostRecent => QuestionOrder::CreatedDesc,
            SavedFilter::Oldest => QuestionOrder::CreatedAsc,
            SavedFilter::MostVoted => QuestionOrder::UpvotesDesc,
            SavedFilter::MostViewed => QuestionOrder::ViewsDesc,
            SavedFilter::MostAnswered => QuestionOrder::AnswersDesc,
        };
        let paging = Paging::page(page, page_size)?;

        let total = self
            .repos
            .question_repository
            .count(query.clone())
            .await
            .map_err(question_err_fmt)?;

        let questions = self
            .repos
            .question_repository
            .finds(query, order, paging)
            .await
            .map_err(question_err_fmt)?;
        let is_next = has_next(total, paging.skip, questions.len());

        populate_questions(&self.repos, questions)
            .await?
            .let_(|questions| saved::Output { questions, is_next })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ask, handler, register, reputation};
    use super::*;
    use crate::entities::VoteKind;
    use crate::repositories::TagQuery;

    #[test]
    fn tag_names_dedup_ignoring_case() {
        let names = vec!["Java", "java", " rust ", "", "JAVA"]
            .into_iter()
            .map(String::from)
            .collect();

        assert_eq!(dedup_tag_names(names), vec!["Java", "rust"]);
    }

    #[tokio::test]
    async fn asking_creates_tags_once_and_rewards_author() {
        let (h, repos, revalidator) = handler();
        let alice = register(&h, "alice").await;

        let q = ask(&h, alice.id, "How to borrow?", &["Java", "java", "rust"]).await;
        assert_eq!(q.tags.len(), 2);

        let q2 = ask(&h, alice.id, "Another one", &["JAVA"]).await;
        assert_eq!(q2.tags, vec![q.tags[0]]);

        let tags = repos
            .tag_repository
            .count(TagQuery::default())
            .await
            .unwrap();
        assert_eq!(tags, 2);

        assert_eq!(reputation(&repos, alice.id).await, 10);
        assert_eq!(revalidator.paths(), vec!["/", "/"]);

        let interactions = repos
            .interaction_repository
            .finds(InteractionQuery {
                user: Some(alice.id),
                action: Some(InteractionAction::AskQuestion),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(interactions.len(), 2);
        assert_eq!(interactions[0].tags, q.tags);
    }

    #[tokio::test]
    async fn asking_with_empty_title_fails() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;

        let res = h
            .question
            .ask
            .handle(ask::Input {
                title: "  ".to_string(),
                content: String::new(),
                tags: vec![],
                author: alice.id,
                path: "/".to_string(),
            })
            .await;

        assert!(res.is_err());
    }

    async fn vote_q(h: &crate::handlers::Handler, q: QuestionId, u: UserId, kind: VoteKind) {
        h.question
            .vote
            .handle(vote::Input {
                question_id: q,
                user_id: u,
                kind,
                path: "/question".to_string(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn upvote_toggles_with_exact_reputation() {
        let (h, repos, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let q = ask(&h, alice.id, "Lifetimes?", &["rust"]).await;

        vote_q(&h, q.id, bob.id, VoteKind::Up).await;
        assert_eq!(reputation(&repos, bob.id).await, 2);
        assert_eq!(reputation(&repos, alice.id).await, 15);

        vote_q(&h, q.id, bob.id, VoteKind::Up).await;
        assert_eq!(reputation(&repos, bob.id).await, 0);
        assert_eq!(reputation(&repos, alice.id).await, 5);

        let q = repos.question_repository.find(q.id).await.unwrap();
        assert!(q.votes.upvotes.is_empty());
        assert!(q.votes.downvotes.is_empty());
    }

    #[tokio::test]
    async fn switching_vote_direction_keeps_votes_exclusive() {
        let (h, repos, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let q = ask(&h, alice.id, "Traits?", &[]).await;

        vote_q(&h, q.id, bob.id, VoteKind::Down).await;
        assert_eq!(reputation(&repos, bob.id).await, -2);
        assert_eq!(reputation(&repos, alice.id).await, -5);

        vote_q(&h, q.id, bob.id, VoteKind::Up).await;
        assert_eq!(reputation(&repos, bob.id).await, 2);
        assert_eq!(reputation(&repos, alice.id).await, 15);

        let q = repos.question_repository.find(q.id).await.unwrap();
        assert!(q.votes.upvotes.contains(&bob.id));
        assert!(!q.votes.downvotes.contains(&bob.id));
    }

    #[tokio::test]
    async fn deleting_question_cascades() {
        let (h, repos, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let q = ask(&h, alice.id, "Async?", &["tokio"]).await;

        let answer = h
            .answer
            .post
            .handle(crate::usecases::answer::post::Input {
                content: "Use tokio.".to_string(),
                author: bob.id,
                question_id: q.id,
                path: "/".to_string(),
            })
            .await
            .unwrap()
            .answer;

        h.question
            .save
            .handle(save::Input {
                user_id: bob.id,
                question_id: q.id,
                path: "/".to_string(),
            })
            .await
            .unwrap();

        h.question
            .delete
            .handle(delete::Input {
                question_id: q.id,
                path: "/".to_string(),
            })
            .await
            .unwrap();

        assert!(repos.answer_repository.find(answer.id).await.is_err());
        assert!(!repos
            .interaction_repository
            .is_exists(InteractionQuery {
                question: Some(q.id),
                answers: Some(vec![answer.id]),
                ..Default::default()
            })
            .await
            .unwrap());
        assert!(repos
            .tag_repository
            .find(q.tags[0])
            .await
            .unwrap()
            .questions
            .is_empty());
        assert!(repos
            .user_repository
            .find(bob.id)
            .await
            .unwrap()
            .saved
            .is_empty());
    }

    #[tokio::test]
    async fn viewing_records_one_interaction_per_viewer() {
        let (h, repos, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let q = ask(&h, alice.id, "Views?", &["rust"]).await;

        for _ in 0..3 {
            h.question
                .view
                .handle(view::Input {
                    question_id: q.id,
                    viewer: Some(bob.id),
                })
                .await
                .unwrap();
        }

        let q = repos.question_repository.find(q.id).await.unwrap();
        assert_eq!(q.views, 3);

        let views = repos
            .interaction_repository
            .finds(InteractionQuery {
                user: Some(bob.id),
                action: Some(InteractionAction::View),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(views.len(), 1);
    }

    #[tokio::test]
    async fn recommends_by_interacted_tags_excluding_own() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;

        ask(&h, alice.id, "Own rust question", &["rust"]).await;
        let other = ask(&h, bob.id, "Bob on rust", &["Rust"]).await;
        ask(&h, bob.id, "Bob on go", &["go"]).await;

        let out = h
            .question
            .recommended
            .handle(recommended::Input {
                clerk_id: "alice".to_string(),
                search: None,
                page: 1,
                page_size: 20,
            })
            .await
            .unwrap();

        let ids = out
            .questions
            .iter()
            .map(|v| v.question.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec![other.id]);
        assert!(!out.is_next);
    }

    async fn toggle_save(h: &crate::handlers::Handler, u: UserId, q: QuestionId) -> bool {
        h.question
            .save
            .handle(save::Input {
                user_id: u,
                question_id: q,
                path: "/".to_string(),
            })
            .await
            .unwrap()
            .saved
    }

    #[tokio::test]
    async fn save_toggles_and_lists_saved() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        let q = ask(&h, alice.id, "Save me", &[]).await;

        assert!(toggle_save(&h, alice.id, q.id).await);

        let listed = h
            .question
            .saved
            .handle(saved::Input {
                clerk_id: "alice".to_string(),
                search: Some("save".to_string()),
                filter: SavedFilter::MostRecent,
                page: 1,
                page_size: 20,
            })
            .await
            .unwrap();
        assert_eq!(listed.questions.len(), 1);

        assert!(!toggle_save(&h, alice.id, q.id).await);
    }

    #[tokio::test]
    async fn listing_pages_and_filters() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        for i in 0..3 {
            ask(&h, alice.id, &format!("Question {}", i), &[]).await;
        }

        let first = h
            .question
            .gets
            .handle(gets::Input {
                search: None,
                filter: QuestionFilter::Newest,
                page: 1,
                page_size: 2,
            })
            .await
            .unwrap();
        assert_eq!(first.questions.len(), 2);
        assert!(first.is_next);

        let second = h
            .question
            .gets
            .handle(gets::Input {
                search: None,
                filter: QuestionFilter::Newest,
                page: 2,
                page_size: 2,
            })
            .await
            .unwrap();
        assert_eq!(second.questions.len(), 1);
        assert!(!second.is_next);
        assert!(first
            .questions
            .iter()
            .all(|v| v.question.id != second.questions[0].question.id));

        let unanswered = h
            .question
            .gets
            .handle(gets::Input {
                search: Some("question 1".to_string()),
                filter: QuestionFilter::Unanswered,
                page: 1,
                page_size: 20,
            })
            .await
            .unwrap();
        assert_eq!(unanswered.questions.len(), 1);
    }

    #[tokio::test]
    async fn rejects_empty_pages() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        ask(&h, alice.id, "Anything?", &[]).await;

        let res = h
            .question
            .gets
            .handle(gets::Input {
                search: None,
                filter: QuestionFilter::Newest,
                page: 1,
                page_size: 0,
            })
            .await;

        assert!(res.is_err());
    }

    async fn view_n(h: &crate::handlers::Handler, q: QuestionId, n: usize) {
        for _ in 0..n {
            h.question
                .view
                .handle(view::Input {
                    question_id: q,
                    viewer: None,
                })
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn hot_orders_by_views_then_upvotes() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let carol = register(&h, "carol").await;

        let mut qs = vec![];
        for i in 0..7 {
            qs.push(ask(&h, alice.id, &format!("Q{}", i), &[]).await.id);
        }

        view_n(&h, qs[0], 1).await;
        view_n(&h, qs[1], 3).await;
        view_n(&h, qs[2], 3).await;
        vote_q(&h, qs[2], bob.id, VoteKind::Up).await;
        view_n(&h, qs[3], 2).await;
        vote_q(&h, qs[4], bob.id, VoteKind::Up).await;
        vote_q(&h, qs[4], carol.id, VoteKind::Up).await;

        let hot = h.question.hot.handle(hot::Input {}).await.unwrap();
        let ids = hot.questions.iter().map(|q| q.id).collect::<Vec<_>>();

        assert_eq!(ids, vec![qs[2], qs[1], qs[3], qs[0], qs[4]]);
    }

    #[tokio::test]
    async fn deleting_question_removes_every_answer() {
        let (h, repos, _) = handler();
        let alice = register(&h, "alice").await;
        let bob = register(&h, "bob").await;
        let carol = register(&h, "carol").await;
        let q = ask(&h, alice.id, "Pinning?", &["async"]).await;

        let mut answers = vec![];
        for (author, content) in [(bob.id, "Use Box::pin."), (carol.id, "Use pin-project.")] {
            let a = h
                .answer
                .post
                .handle(crate::usecases::answer::post::Input {
                    content: content.to_string(),
                    author,
                    question_id: q.id,
                    path: "/".to_string(),
                })
                .await
                .unwrap()
                .answer;
            answers.push(a.id);
        }

        h.question
            .delete
            .handle(delete::Input {
                question_id: q.id,
                path: "/".to_string(),
            })
            .await
            .unwrap();

        for id in &answers {
            assert!(repos.answer_repository.find(*id).await.is_err());
        }
        assert_eq!(
            repos
                .answer_repository
                .count(crate::repositories::AnswerQuery {
                    question: Some(q.id),
                    ..Default::default()
                })
                .await
                .unwrap(),
            0
        );

        for user in [bob.id, carol.id] {
            let left = repos
                .interaction_repository
                .finds(InteractionQuery {
                    user: Some(user),
                    action: Some(InteractionAction::Answer),
                    ..Default::default()
                })
                .await
                .unwrap();
            assert!(left.is_empty());
        }
        assert!(!repos
            .interaction_repository
            .is_exists(InteractionQuery {
                question: Some(q.id),
                answers: Some(answers),
                ..Default::default()
            })
            .await
            .unwrap());
    }
}
