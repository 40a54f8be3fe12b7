use anyhow::Result;
use async_trait::async_trait;
use smallvec::SmallVec;

use super::*;
use crate::repositories::{
    AnswerOrder, AnswerQuery, Paging, QuestionOrder, QuestionQuery, QuestionSearch, TagOrder,
    TagQuery, UserOrder, UserQuery, UserSearch,
};
use crate::usecases::search::{global, SearchHit, SearchKind};
use crate::utils::{AlsoChain, LetChain};

const HITS_PER_KIND: u64 = 2;
const HITS_OF_ONE_KIND: u64 = 8;

pub struct SearchGlobalInteractor {
    pub repos: Repositories,
}

impl SearchGlobalInteractor {
    async fn search_kind(
        &self,
        kind: SearchKind,
        m: &TextMatch,
        query: &str,
        limit: u64,
    ) -> Result<Vec<SearchHit>> {
        let paging = Paging::first(limit);

        let hits = match kind {
            SearchKind::Question => self
                .repos
                .question_repository
                .finds(
                    QuestionQuery {
                        search: Some(QuestionSearch::Title(m.clone())),
                        ..Default::default()
                    },
                    QuestionOrder::CreatedDesc,
                    paging,
                )
                .await
                .map_err(question_err_fmt)?
                .into_iter()
                .map(|q| SearchHit {
                    title: q.title,
                    kind,
                    id: q.id.to_string(),
                })
                .collect(),
            SearchKind::User => self
                .repos
                .user_repository
                .finds(
                    UserQuery {
                        search: Some(UserSearch::Name(m.clone())),
                    },
                    UserOrder::JoinedDesc,
                    paging,
                )
                .await
                .map_err(user_err_fmt)?
                .into_iter()
                .map(|u| SearchHit {
                    title: u.name,
                    kind,
                    id: u.clerk_id,
                })
                .collect(),
            SearchKind::Answer => self
                .repos
                .answer_repository
                .finds(
                    AnswerQuery {
                        content: Some(m.clone()),
                        ..Default::default()
                    },
                    AnswerOrder::CreatedDesc,
                    paging,
                )
                .await
                .map_err(answer_err_fmt)?
                .into_iter()
                .map(|a| SearchHit {
                    title: format!("Answers containing {}", query),
                    kind,
                    id: a.question.to_string(),
                })
                .collect(),
            SearchKind::Tag => self
                .repos
                .tag_repository
                .finds(
                    TagQuery {
                        name: Some(m.clone()),
                    },
                    TagOrder::QuestionsDesc,
                    paging,
                )
                .await
                .map_err(tag_err_fmt)?
                .into_iter()
                .map(|t| SearchHit {
                    title: t.name,
                    kind,
                    id: t.id.to_string(),
                })
                .collect(),
        };

        Ok(hits)
    }
}

#[async_trait]
impl global::Usecase for SearchGlobalInteractor {
    #[tracing::instrument(skip(self))]
    async fn handle(&self, data: global::Input) -> Result<global::Output> {
        tracing::trace!("input - {:?}", data);

        let global::Input { query, kind } = data;

        let m = TextMatch::contains(query.trim())?;

        // unknown types fall back to searching everything
        let kind = kind.and_then(|k| k.trim().to_lowercase().parse::<SearchKind>().ok());
        let plan: SmallVec<[(SearchKind, u64); 4]> = match kind {
            Some(k) => smallvec::smallvec![(k, HITS_OF_ONE_KIND)],
            None => SearchKind::ALL
                .iter()
                .map(|k| (*k, HITS_PER_KIND))
                .collect(),
        };

        let mut hits = SmallVec::new();
        for (k, limit) in plan {
            hits.extend(self.search_kind(k, &m, &query, limit).await?);
        }

        global::Output { hits }
            .also_(|o| tracing::trace!("output - {:?}", o))
            .let_(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{ask, handler, register};
    use super::*;
    use crate::usecases::answer::post;

    #[tokio::test]
    async fn global_search_caps_each_kind() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        let java = register(&h, "java fan").await;

        let mut last = None;
        for i in 0..4 {
            last = Some(ask(&h, alice.id, &format!("Java question {}", i), &["java"]).await);
        }
        let q = last.unwrap();

        h.answer
            .post
            .handle(post::Input {
                content: "Try java streams".to_string(),
                author: java.id,
                question_id: q.id,
                path: "/".to_string(),
            })
            .await
            .unwrap();

        let all = h
            .search
            .global
            .handle(global::Input {
                query: "java".to_string(),
                kind: None,
            })
            .await
            .unwrap();

        let kinds = all.hits.iter().map(|h| h.kind).collect::<Vec<_>>();
        assert_eq!(kinds, vec![
            SearchKind::Question,
            SearchKind::Question,
            SearchKind::User,
            SearchKind::Answer,
            SearchKind::Tag,
        ]);

        let user = &all.hits[2];
        assert_eq!(user.id, "java fan");
        let answer = &all.hits[3];
        assert_eq!(answer.title, "Answers containing java");
        assert_eq!(answer.id, q.id.to_string());

        let questions = h
            .search
            .global
            .handle(global::Input {
                query: "JAVA".to_string(),
                kind: Some("question".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(questions.hits.len(), 4);

        let fallback = h
            .search
            .global
            .handle(global::Input {
                query: "java".to_string(),
                kind: Some("video".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(fallback.hits.len(), all.hits.len());
    }

    #[tokio::test]
    async fn one_kind_is_capped_at_eight() {
        let (h, _, _) = handler();
        let alice = register(&h, "alice").await;
        for i in 0..11 {
            ask(&h, alice.id, &format!("Tokio runtime {}", i), &["tokio"]).await;
        }

        let hits = h
            .search
            .global
            .handle(global::Input {
                query: "tokio".to_string(),
                kind: Some("Question".to_string()),
            })
            .await
            .unwrap()
            .hits;

        assert_eq!(hits.len(), 8);
        assert!(hits.iter().all(|h| h.kind == SearchKind::Question));
    }
}
