use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

use super::*;
use crate::entities::TagId;
use crate::repositories::{
    InteractionQuery, Paging, QuestionOrder, QuestionQuery, QuestionSearch, TagOrder, TagQuery,
};
use crate::usecases::tag::{gets, popular, questions, top_interacted, TagSort};
use crate::utils::{has_next, AlsoChain, LetChain};

const POPULAR_TAGS: u64 = 5;

pub struct TagGetsInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl gets::Usecase for TagGetsInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: gets::Input) -> Result<gets::Output> {
        tracing::trace!("input - {:?}", data);

        let gets::Input {
            search,
            sort,
            page,
            page_size,
        } = data;

        let query = TagQuery {
            name: text_match(search)?,
        };
        let order = match sort {
            TagSort::Popular => TagOrder::QuestionsDesc,
            TagSort::Recent => TagOrder::CreatedDesc,
            TagSort::Name => TagOrder::NameAsc,
            TagSort::Old => TagOrder::CreatedAsc,
        };
        let paging = Paging::page(page, page_size)?;

        let total = self
            .repos
            .tag_repository
            .count(query.clone())
            .await
            .map_err(tag_err_fmt)?;

        self.repos
            .tag_repository
            .finds(query, order, paging)
            .await
            .map_err(tag_err_fmt)?
            .let_(|tags| gets::Output {
                is_next: has_next(total, paging.skip, tags.len()),
                tags,
            })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct TagQuestionsInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl questions::Usecase for TagQuestionsInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: questions::Input) -> Result<questions::Output> {
        tracing::trace!("input - {:?}", data);

        let questions::Input {
            tag_id,
            search,
            page,
            page_size,
        } = data;

        let tag = self
            .repos
            .tag_repository
            .find(tag_id)
            .await
            .map_err(tag_err_fmt)?;

        let query = QuestionQuery {
            search: text_match(search)?.map(QuestionSearch::Title),
            ids: Some(tag.questions.iter().copied().collect()),
            ..Default::default()
        };

        // one extra item tells whether a next page exists
        let Paging { skip, .. } = Paging::page(page, page_size)?;
        let peek = Paging {
            skip,
            limit: Some(page_size as u64 + 1),
        };

        let mut questions = self
            .repos
            .question_repository
            .finds(query, QuestionOrder::CreatedDesc, peek)
            .await
            .map_err(question_err_fmt)?;

        let is_next = questions.len() > page_size as usize;
        questions.truncate(page_size as usize);

        populate_questions(&self.repos, questions)
            .await?
            .let_(|questions| questions::Output {
                tag_name: tag.name,
                questions,
                is_next,
            })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct TagPopularInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl popular::Usecase for TagPopularInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: popular::Input) -> Result<popular::Output> {
        tracing::trace!("input - {:?}", data);

        self.repos
            .tag_repository
            .popular(POPULAR_TAGS)
            .await
            .map_err(tag_err_fmt)?
            .let_(|tags| popular::Output { tags })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

pub struct TagTopInteractedInteractor {
    pub repos: Repositories,
}
#[async_trait]
impl top_interacted::Usecase for TagTopInteractedInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: top_interacted::Input) -> Result<top_interacted::Output> {
        tracing::trace!("input - {:?}", data);

        let top_interacted::Input { user_id, limit } = data;

        expect_user(&self.repos, user_id).await?;

        let interactions = self
            .repos
            .interaction_repository
            .finds(InteractionQuery {
                user: Some(user_id),
                ..Default::default()
            })
            .await
            .map_err(interaction_err_fmt)?;

        // (count, first seen) per tag
        let mut counts: HashMap<TagId, (usize, usize)> = HashMap::new();
        for (seen, tag) in interactions.iter().flat_map(|i| i.tags.iter()).enumerate() {
            counts.entry(*tag).or_insert((0, seen)).0 += 1;
        }

        let mut ranked = counts.into_iter().collect::<Vec<_>>();
        ranked.sort_by(|(_, (ca, sa)), (_, (cb, sb))| cb.cmp(ca).then(sa.cmp(sb)));

        let ids = ranked
            .into_iter()
            .take(limit)
            .map(|(id, _)| id)
            .collect::<Vec<_>>();

        self.repos
            .tag_repository
            .finds_by_ids(&ids)
            .await
            .map_err(tag_err_fmt)?
            .iter()
            .map(TagSummary::from)
            .collect::<Vec<_>>()
            .let_(|tags| top_interacted::Output { tags })
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ask, handler, register};
    use super::*;

    #[tokio::test]
    async fn tag_questions_peek_next_page() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;

        let mut tag = None;
        for i in 0..3 {
            let q = ask(&h, alice.id, &format!("Borrowing {}", i), &["rust"]).await;
            tag = q.tags.first().copied();
        }
        let tag_id = tag.unwrap();

        let first = h
            .tag
            .questions
            .handle(questions::Input {
                tag_id,
                search: None,
                page: 1,
                page_size: 2,
            })
            .await
            .unwrap();
        assert_eq!(first.tag_name, "rust");
        assert_eq!(first.questions.len(), 2);
        assert!(first.is_next);

        let second = h
            .tag
            .questions
            .handle(questions::Input {
                tag_id,
                search: None,
                page: 2,
                page_size: 2,
            })
            .await
            .unwrap();
        assert_eq!(second.questions.len(), 1);
        assert!(!second.is_next);

        let empty = h
            .tag
            .questions
            .handle(questions::Input {
                tag_id,
                search: None,
                page: 1,
                page_size: 0,
            })
            .await;
        assert!(empty.is_err());
    }

    #[tokio::test]
    async fn popular_and_listed_tags() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;

        ask(&h, alice.id, "One", &["rust", "tokio"]).await;
        ask(&h, alice.id, "Two", &["Rust"]).await;
        ask(&h, alice.id, "Three", &["serde"]).await;

        let popular = h.tag.popular.handle(popular::Input {}).await.unwrap();
        assert_eq!(popular.tags.len(), 3);
        assert_eq!(popular.tags[0].name, "rust");
        assert_eq!(popular.tags[0].number_of_questions, 2);

        let by_name = h
            .tag
            .gets
            .handle(gets::Input {
                search: None,
                sort: TagSort::Name,
                page: 1,
                page_size: 2,
            })
            .await
            .unwrap();
        let names = by_name.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["rust", "serde"]);
        assert!(by_name.is_next);

        let searched = h
            .tag
            .gets
            .handle(gets::Input {
                search: Some("TOK".to_string()),
                sort: TagSort::Popular,
                page: 1,
                page_size: 20,
            })
            .await
            .unwrap();
        assert_eq!(searched.tags.len(), 1);
    }

    #[tokio::test]
    async fn top_interacted_ranks_by_frequency() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;

        ask(&h, alice.id, "A", &["go", "rust"]).await;
        ask(&h, alice.id, "B", &["rust"]).await;
        ask(&h, alice.id, "C", &["rust", "wasm"]).await;
        ask(&h, alice.id, "D", &["wasm"]).await;

        let out = h
            .tag
            .top_interacted
            .handle(top_interacted::Input {
                user_id: alice.id,
                limit: 2,
            })
            .await
            .unwrap();

        let names = out.tags.iter().map(|t| t.name.as_str()).collect::<Vec<_>>();
        assert_eq!(names, vec!["rust", "wasm"]);
    }
}
