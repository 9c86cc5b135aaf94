use time::OffsetDateTime;
use typed_builder::TypedBuilder;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub content: String,
    pub tracking_cookie: String,
    pub posted_by: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Clone, TypedBuilder)]
pub struct NewPost {
    #[builder(setter(into))]
    pub content: String,
    #[builder(setter(into))]
    pub tracking_cookie: String,
    #[builder(setter(into))]
    pub posted_by: String,
}
