usecase! {
    global : {
        pub query: String,
        pub kind: Option<String>,
    } => {
        pub hits: ::smallvec::SmallVec<[super::SearchHit; 8]>,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ::serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Question,
    User,
    Answer,
    Tag,
}

impl SearchKind {
    /// Order of a search over every collection.
    pub const ALL: [SearchKind; 4] = [
        SearchKind::Question,
        SearchKind::User,
        SearchKind::Answer,
        SearchKind::Tag,
    ];
}

option_names!(SearchKind {
    Question => "question",
    User => "user",
    Answer => "answer",
    Tag => "tag",
});

#[derive(Debug, Clone, PartialEq, Eq, ::serde::Serialize)]
pub struct SearchHit {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SearchKind,
    pub id: String,
}
