use std::sync::Arc;

use crate::interactors::answer::{
    AnswerDeleteInteractor, AnswerGetsInteractor, AnswerPostInteractor, AnswerVoteInteractor,
};
use crate::interactors::question::{
    QuestionAskInteractor, QuestionDeleteInteractor, QuestionEditInteractor,
    QuestionGetInteractor, QuestionGetsInteractor, QuestionHotInteractor,
    QuestionRecommendedInteractor, QuestionSaveInteractor, QuestionSavedInteractor,
    QuestionViewInteractor, QuestionVoteInteractor,
};
use crate::interactors::search::SearchGlobalInteractor;
use crate::interactors::tag::{
    TagGetsInteractor, TagPopularInteractor, TagQuestionsInteractor, TagTopInteractedInteractor,
};
use crate::interactors::user::{
    UserAnswersInteractor, UserEditInteractor, UserGetInteractor, UserGetsInteractor,
    UserInfoInteractor, UserQuestionsInteractor, UserRegisterInteractor,
    UserUnregisterInteractor,
};
use crate::interactors::{Repositories, SharedRevalidator};
use crate::usecases::{answer, question, search, tag, user};

pub struct QuestionHandler {
    pub gets: Arc<dyn question::gets::Usecase + Sync + Send>,
    pub get: Arc<dyn question::get::Usecase + Sync + Send>,
    pub ask: Arc<dyn question::ask::Usecase + Sync + Send>,
    pub edit: Arc<dyn question::edit::Usecase + Sync + Send>,
    pub delete: Arc<dyn question::delete::Usecase + Sync + Send>,
    pub vote: Arc<dyn question::vote::Usecase + Sync + Send>,
    pub view: Arc<dyn question::view::Usecase + Sync + Send>,
    pub hot: Arc<dyn question::hot::Usecase + Sync + Send>,
    pub recommended: Arc<dyn question::recommended::Usecase + Sync + Send>,
    pub save: Arc<dyn question::save::Usecase + Sync + Send>,
    pub saved: Arc<dyn question::saved::Usecase + Sync + Send>,
}

pub struct AnswerHandler {
    pub post: Arc<dyn answer::post::Usecase + Sync + Send>,
    pub gets: Arc<dyn answer::gets::Usecase + Sync + Send>,
    pub vote: Arc<dyn answer::vote::Usecase + Sync + Send>,
    pub delete: Arc<dyn answer::delete::Usecase + Sync + Send>,
}

pub struct TagHandler {
    pub gets: Arc<dyn tag::gets::Usecase + Sync + Send>,
    pub questions: Arc<dyn tag::questions::Usecase + Sync + Send>,
    pub popular: Arc<dyn tag::popular::Usecase + Sync + Send>,
    pub top_interacted: Arc<dyn tag::top_interacted::Usecase + Sync + Send>,
}

pub struct UserHandler {
    pub register: Arc<dyn user::register::Usecase + Sync + Send>,
    pub get: Arc<dyn user::get::Usecase + Sync + Send>,
    pub info: Arc<dyn user::info::Usecase + Sync + Send>,
    pub gets: Arc<dyn user::gets::Usecase + Sync + Send>,
    pub edit: Arc<dyn user::edit::Usecase + Sync + Send>,
    pub unregister: Arc<dyn user::unregister::Usecase + Sync + Send>,
    pub questions: Arc<dyn user::questions::Usecase + Sync + Send>,
    pub answers: Arc<dyn user::answers::Usecase + Sync + Send>,
}

pub struct SearchHandler {
    pub global: Arc<dyn search::global::Usecase + Sync + Send>,
}

/// Every action, wired to one set of repositories.
pub struct Handler {
    pub question: QuestionHandler,
    pub answer: AnswerHandler,
    pub tag: TagHandler,
    pub user: UserHandler,
    pub search: SearchHandler,
}

impl Handler {
    pub fn new(repos: Repositories, revalidator: SharedRevalidator) -> Self {
        let r = || repos.clone();
        let v = || revalidator.clone();

        let question = QuestionHandler {
            gets: Arc::new(QuestionGetsInteractor { repos: r() }),
            get: Arc::new(QuestionGetInteractor { repos: r() }),
            ask: Arc::new(QuestionAskInteractor {
                repos: r(),
                revalidator: v(),
            }),
            edit: Arc::new(QuestionEditInteractor {
                repos: r(),
                revalidator: v(),
            }),
            delete: Arc::new(QuestionDeleteInteractor {
                repos: r(),
                revalidator: v(),
            }),
            vote: Arc::new(QuestionVoteInteractor {
                repos: r(),
                revalidator: v(),
            }),
            view: Arc::new(QuestionViewInteractor { repos: r() }),
            hot: Arc::new(QuestionHotInteractor { repos: r() }),
            recommended: Arc::new(QuestionRecommendedInteractor { repos: r() }),
            save: Arc::new(QuestionSaveInteractor {
                repos: r(),
                revalidator: v(),
            }),
            saved: Arc::new(QuestionSavedInteractor { repos: r() }),
        };

        let answer = AnswerHandler {
            post: Arc::new(AnswerPostInteractor {
                repos: r(),
                revalidator: v(),
            }),
            gets: Arc::new(AnswerGetsInteractor { repos: r() }),
            vote: Arc::new(AnswerVoteInteractor {
                repos: r(),
                revalidator: v(),
            }),
            delete: Arc::new(AnswerDeleteInteractor {
                repos: r(),
                revalidator: v(),
            }),
        };

        let tag = TagHandler {
            gets: Arc::new(TagGetsInteractor { repos: r() }),
            questions: Arc::new(TagQuestionsInteractor { repos: r() }),
            popular: Arc::new(TagPopularInteractor { repos: r() }),
            top_interacted: Arc::new(TagTopInteractedInteractor { repos: r() }),
        };

        let user = UserHandler {
            register: Arc::new(UserRegisterInteractor { repos: r() }),
            get: Arc::new(UserGetInteractor { repos: r() }),
            info: Arc::new(UserInfoInteractor { repos: r() }),
            gets: Arc::new(UserGetsInteractor { repos: r() }),
            edit: Arc::new(UserEditInteractor {
                repos: r(),
                revalidator: v(),
            }),
            unregister: Arc::new(UserUnregisterInteractor {
                repos: r(),
                revalidator: v(),
            }),
            questions: Arc::new(UserQuestionsInteractor { repos: r() }),
            answers: Arc::new(UserAnswersInteractor { repos: r() }),
        };

        let search = SearchHandler {
            global: Arc::new(SearchGlobalInteractor { repos: r() }),
        };

        Self {
            question,
            answer,
            tag,
            user,
            search,
        }
    }
}
