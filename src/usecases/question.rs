usecase! {
    gets : {
        pub search: Option<String>,
        pub filter: super::QuestionFilter,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub questions: Vec<entities::QuestionView>,
        pub is_next: bool,
    }
}

usecase! {
    get : {
        pub question_id: entities::QuestionId,
    } => {
        pub question: entities::QuestionView,
    }
}

usecase! {
    ask : {
        pub title: String,
        pub content: String,
        pub tags: Vec<String>,
        pub author: entities::UserId,
        pub path: String,
    } => {
        pub question: entities::Question,
    }
}

usecase! {
    edit : {
        pub question_id: entities::QuestionId,
        pub title: String,
        pub content: String,
        pub path: String,
    } => {
        pub question: entities::Question,
    }
}

usecase! {
    delete : {
        pub question_id: entities::QuestionId,
        pub path: String,
    } => {
        pub question: entities::Question,
    }
}

usecase! {
    vote : {
        pub question_id: entities::QuestionId,
        pub user_id: entities::UserId,
        pub kind: entities::VoteKind,
        pub path: String,
    } => {
        pub question: entities::Question,
        pub state: Option<entities::VoteKind>,
    }
}

usecase! {
    view : {
        pub question_id: entities::QuestionId,
        pub viewer: Option<entities::UserId>,
    } => {
        pub question: entities::Question,
    }
}

usecase! {
    hot : {} => {
        pub questions: Vec<entities::Question>,
    }
}

usecase! {
    recommended : {
        pub clerk_id: String,
        pub search: Option<String>,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub questions: Vec<entities::QuestionView>,
        pub is_next: bool,
    }
}

usecase! {
    save : {
        pub user_id: entities::UserId,
        pub question_id: entities::QuestionId,
        pub path: String,
    } => {
        pub saved: bool,
    }
}

usecase! {
    saved : {
        pub clerk_id: String,
        pub search: Option<String>,
        pub filter: super::SavedFilter,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub questions: Vec<entities::QuestionView>,
        pub is_next: bool,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QuestionFilter {
    #[default]
    Newest,
    Frequent,
    Unanswered,
}

option_names!(QuestionFilter {
    Newest => "newest",
    Frequent => "frequent",
    Unanswered => "unanswered",
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SavedFilter {
    #[default]
    MostRecent,
    Oldest,
    MostVoted,
    MostViewed,
    MostAnswered,
}

option_names!(SavedFilter {
    MostRecent => "most_recent",
    Oldest => "oldest",
    MostVoted => "most_voted",
    MostViewed => "most_viewed",
    MostAnswered => "most_answered",
});
