usecase! {
    register : {
        pub clerk_id: String,
        pub name: String,
        pub username: String,
        pub email: String,
        pub picture: String,
    } => {
        pub user: entities::User,
    }
}

usecase! {
    get : {
        pub clerk_id: String,
    } => {
        pub user: entities::User,
    }
}

usecase! {
    info : {
        pub clerk_id: String,
    } => {
        pub user: entities::User,
        pub total_questions: u64,
        pub total_answers: u64,
        pub badges: crate::badges::BadgeCounts,
        pub reputation: i64,
    }
}

usecase! {
    gets : {
        pub search: Option<String>,
        pub filter: super::UserFilter,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub users: Vec<entities::User>,
        pub is_next: bool,
    }
}

usecase! {
    edit : {
        pub clerk_id: String,
        pub mutation: super::ProfileMutation,
        pub path: String,
    } => {
        pub user: entities::User,
    }
}

usecase! {
    unregister : {
        pub clerk_id: String,
        pub path: String,
    } => {
        pub user: entities::User,
    }
}

usecase! {
    questions : {
        pub user_id: entities::UserId,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub questions: Vec<entities::QuestionView>,
        pub total: u64,
        pub is_next: bool,
    }
}

usecase! {
    answers : {
        pub user_id: entities::UserId,
        pub page: u32,
        pub page_size: u32,
    } => {
        pub answers: Vec<entities::AnswerView>,
        pub total: u64,
        pub is_next: bool,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserFilter {
    #[default]
    NewUsers,
    OldUsers,
    TopContributors,
}

option_names!(UserFilter {
    NewUsers => "new_users",
    OldUsers => "old_users",
    TopContributors => "top_contributors",
});

/// Profile fields a user may change; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, ::serde::Deserialize)]
pub struct ProfileMutation {
    pub name: Option<String>,
    pub username: Option<String>,
    pub picture: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub portfolio_website: Option<String>,
}
