usecase! {
    gets : {
        pub search: Option<String>,
        pub sort: super::TagSort,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub tags: Vec<entities::Tag>,
        pub is_next: bool,
    }
}

usecase! {
    questions : {
        pub tag_id: entities::TagId,
        pub search: Option<String>,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub tag_name: String,
        pub questions: Vec<entities::QuestionView>,
        pub is_next: bool,
    }
}

usecase! {
    popular : {} => {
        pub tags: Vec<crate::repositories::TagPopularity>,
    }
}

usecase! {
    top_interacted : {
        pub user_id: entities::UserId,
        pub limit: usize,
    } => {
        pub tags: Vec<entities::TagSummary>,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TagSort {
    #[default]
    Popular,
    Recent,
    Name,
    Old,
}

option_names!(TagSort {
    Popular => "popular",
    Recent => "recent",
    Name => "name",
    Old => "old",
});
