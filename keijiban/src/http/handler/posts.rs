use crate::{
    consts::{ADMIN_USERNAME, BAD_REQUEST_MESSAGE, POSTS_PATH},
    http::{
        extractor::ClientInfo,
        form::{CreatePostForm, DeletePostForm},
    },
    template,
};
use ashiato::{Subject, TrackingId};
use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use bytes::Bytes;
use http::{Method, StatusCode};
use keijiban_error::{bail, ErrorType, Result, ResultExt};
use keijiban_post::{ArcPostStore, NewPost, Post};
use keijiban_token::{AnyTokenStore, TokenStore};
use serde::{Deserialize, Serialize};
use time::{macros::offset, OffsetDateTime};

#[derive(Deserialize)]
pub struct PostsQuery {
    /// Any value selects the delete path
    delete: Option<String>,
}

#[derive(Serialize)]
struct PostView {
    id: i64,
    content: String,
    posted_by: String,
    tracking_cookie: String,
    formatted_created_at: String,
    show_author: bool,
    deletable: bool,
}

impl PostView {
    fn new(post: Post, viewer: &str) -> Self {
        let is_admin = viewer == ADMIN_USERNAME;

        Self {
            id: post.id,
            content: normalise_content(&post.content),
            formatted_created_at: format_created_at(post.created_at),
            show_author: is_admin,
            deletable: is_admin || post.posted_by == viewer,
            posted_by: post.posted_by,
            tracking_cookie: post.tracking_cookie,
        }
    }
}

/// Form bodies are stored with `+` still standing in for spaces
fn normalise_content(content: &str) -> String {
    content.replace('+', " ")
}

fn format_created_at(created_at: OffsetDateTime) -> String {
    let local = created_at.to_offset(offset!(+9));

    format!(
        "{:04}年{:02}月{:02}日 {:02}時{:02}分{:02}秒",
        local.year(),
        u8::from(local.month()),
        local.day(),
        local.hour(),
        local.minute(),
        local.second(),
    )
}

/// Renders the listing and rotates the subject's one-time token
///
/// `HEAD` is routed here as well, it must not rotate the token of a page that is already open.
/// The same goes for requests aimed at the delete path.
#[instrument(skip_all, fields(%subject))]
pub async fn get(
    State(posts): State<ArcPostStore>,
    State(tokens): State<AnyTokenStore>,
    method: Method,
    Query(query): Query<PostsQuery>,
    subject: Subject,
    tracking_id: TrackingId,
    client: ClientInfo,
) -> Result<Response> {
    if method != Method::GET || query.delete.is_some() {
        debug!(%method, "refusing to render listing");
        return Ok(unsupported().await.into_response());
    }

    let posts: Vec<PostView> = posts
        .all_newest_first()
        .await?
        .into_iter()
        .map(|post| PostView::new(post, subject.as_str()))
        .collect();
    let one_time_token = tokens.issue(subject.as_str()).await?;

    let page = template::render(
        "posts.html",
        minijinja::context! {
            user => subject.as_str(),
            posts => posts,
            one_time_token => one_time_token.as_str(),
        },
    )?;

    info!(
        user = %subject,
        %tracking_id,
        remote_address = ?client.remote_address,
        user_agent = ?client.user_agent,
        "viewed posts"
    );

    Ok(Html(page).into_response())
}

pub async fn post(
    State(posts): State<ArcPostStore>,
    State(tokens): State<AnyTokenStore>,
    Query(query): Query<PostsQuery>,
    subject: Subject,
    tracking_id: TrackingId,
    client: ClientInfo,
    body: Bytes,
) -> Result<Response> {
    if query.delete.is_some() {
        delete(&posts, &subject, &client, &body).await
    } else {
        create(&posts, &tokens, &subject, &tracking_id, &body).await
    }
}

#[instrument(skip_all, fields(%subject))]
async fn create(
    posts: &ArcPostStore,
    tokens: &AnyTokenStore,
    subject: &Subject,
    tracking_id: &TrackingId,
    body: &[u8],
) -> Result<Response> {
    let form = CreatePostForm::decode(body)
        .with_error_type(ErrorType::BadRequest(Some(BAD_REQUEST_MESSAGE.into())))?;

    if !tokens
        .consume(subject.as_str(), &form.one_time_token)
        .await?
    {
        bail!(
            type = ErrorType::BadRequest(Some(BAD_REQUEST_MESSAGE.into())),
            "one-time token mismatch"
        );
    }

    let post = posts
        .create(
            NewPost::builder()
                .content(form.content)
                .tracking_cookie(tracking_id.as_str())
                .posted_by(subject.as_str())
                .build(),
        )
        .await?;

    info!(user = %subject, post_id = post.id, "created post");

    Ok(Redirect::to(POSTS_PATH).into_response())
}

/// Permission failures are not reported, the client gets the same redirect either way
#[instrument(skip_all, fields(%subject))]
async fn delete(
    posts: &ArcPostStore,
    subject: &Subject,
    client: &ClientInfo,
    body: &[u8],
) -> Result<Response> {
    let redirect = Redirect::to(POSTS_PATH).into_response();

    let Ok(form) = DeletePostForm::decode(body) else {
        debug!("undecodable delete form");
        return Ok(redirect);
    };
    let Ok(id) = form.id.parse::<i64>() else {
        debug!(id = %form.id, "malformed post id");
        return Ok(redirect);
    };
    let Some(post) = posts.find(id).await? else {
        debug!(id, "post not found");
        return Ok(redirect);
    };

    if post.posted_by == subject.as_str() || subject.as_str() == ADMIN_USERNAME {
        if posts.delete(id).await? {
            info!(
                user = %subject,
                post_id = id,
                remote_address = ?client.remote_address,
                user_agent = ?client.user_agent,
                "deleted post"
            );
        }
    } else {
        debug!(id, "not permitted to delete post");
    }

    Ok(redirect)
}

pub async fn unsupported() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, BAD_REQUEST_MESSAGE)
}
