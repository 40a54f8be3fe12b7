usecase! {
    post : {
        pub content: String,
        pub author: entities::UserId,
        pub question_id: entities::QuestionId,
        pub path: String,
    } => {
        pub answer: entities::Answer,
    }
}

usecase! {
    gets : {
        pub question_id: entities::QuestionId,
        pub sort: super::AnswerSort,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub answers: Vec<entities::AnswerView>,
        pub total: u64,
        pub is_next: bool,
    }
}

usecase! {
    vote : {
        pub answer_id: entities::AnswerId,
        pub user_id: entities::UserId,
        pub kind: entities::VoteKind,
        pub path: String,
    } => {
        pub answer: entities::Answer,
        pub state: Option<entities::VoteKind>,
    }
}

usecase! {
    delete : {
        pub answer_id: entities::AnswerId,
        pub path: String,
    } => {
        pub answer: entities::Answer,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnswerSort {
    HighestUpvotes,
    LowestUpvotes,
    #[default]
    Recent,
    Old,
}

option_names!(AnswerSort {
    HighestUpvotes => "highest_upvotes",
    LowestUpvotes => "lowest_upvotes",
    Recent => "recent",
    Old => "old",
});
