use argon2::{password_hash::SaltString, Algorithm, Argon2, Params, PasswordHasher, Version};
use axum::{body::Body, Router};
use headers::{Authorization, HeaderMapExt};
use http::{header, Method, Request, Response, StatusCode};
use http_body_util::BodyExt;
use keijiban::state::Zustand;
use keijiban_config::Configuration;
use keijiban_post::Post;
use tower::ServiceExt;

const PASSWORD: &str = "hunter2";

fn cheap_hash(password: &str) -> String {
    let params = Params::new(8, 1, 1, None).unwrap();
    let salt = SaltString::generate(rand::thread_rng());

    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

struct Board {
    router: Router,
    state: Zustand,
}

impl Board {
    async fn new() -> Self {
        let users = ["alice", "bob", "admin"]
            .iter()
            .map(|name| {
                format!(
                    r#"{{ username = "{name}", password-hash = "{}" }}"#,
                    cheap_hash(PASSWORD)
                )
            })
            .collect::<Vec<_>>()
            .join(", ");

        let config = Configuration::parse(&format!(
            r#"
                [auth]
                users = [{users}]

                [server]
                port = 0
                request-timeout-secs = 30

                [tracking]
                secret = "5a69bb55532235125986a0df24aca759"
            "#
        ))
        .unwrap();

        let state = keijiban::initialise_state(&config).await.unwrap();
        let router = keijiban::http::create_router(state.clone(), &config.server);

        Self { router, state }
    }

    async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, user: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::get("/posts");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, format!("tracking_id={cookie}"));
        }

        self.send(authenticated(builder.body(Body::empty()).unwrap(), user))
            .await
    }

    async fn post(&self, user: &str, uri: &str, body: String) -> Response<Body> {
        let request = Request::post(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))
            .unwrap();

        self.send(authenticated(request, user)).await
    }

    /// Render the board and hand back the one-time token embedded in it
    async fn token_for(&self, user: &str) -> String {
        let response = self.get(user, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        embedded_token(&body_text(response).await)
    }

    async fn create(&self, user: &str, content: &str) -> Response<Body> {
        let token = self.token_for(user).await;
        self.post(user, "/posts", format!("content={content}&oneTimeToken={token}"))
            .await
    }

    async fn posts(&self) -> Vec<Post> {
        self.state.posts.all_newest_first().await.unwrap()
    }
}

fn authenticated(mut request: Request<Body>, user: &str) -> Request<Body> {
    request
        .headers_mut()
        .typed_insert(Authorization::basic(user, PASSWORD));
    request
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn embedded_token(html: &str) -> String {
    const MARKER: &str = r#"name="oneTimeToken" value=""#;

    let start = html.find(MARKER).expect("no token in page") + MARKER.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].to_string()
}

fn tracking_cookie(response: &Response<Body>) -> Option<cookie::Cookie<'static>> {
    let header = response.headers().get(header::SET_COOKIE)?.to_str().unwrap();
    let cookie = cookie::Cookie::parse_encoded(header.to_string()).unwrap();
    assert_eq!(cookie.name(), "tracking_id");
    Some(cookie)
}

fn assert_redirect(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/posts");
}

#[tokio::test]
async fn first_visit_sets_signed_cookie() {
    let board = Board::new().await;
    let response = board.get("alice", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let cookie = tracking_cookie(&response).expect("no tracking cookie");
    let (original_id, signature) = cookie.value().split_once('_').unwrap();
    assert!(!original_id.is_empty());
    assert!(original_id.bytes().all(|byte| byte.is_ascii_digit()));
    assert_eq!(signature.len(), 40);
    assert!(signature
        .bytes()
        .all(|byte| byte.is_ascii_digit() || (b'a'..=b'f').contains(&byte)));

    let remaining = cookie.expires_datetime().unwrap() - time::OffsetDateTime::now_utc();
    assert!(remaining > time::Duration::hours(23));
    assert!(remaining <= time::Duration::hours(24));

    let token = embedded_token(&body_text(response).await);
    assert_eq!(token.len(), 16);
}

#[tokio::test]
async fn valid_cookie_is_not_reissued() {
    let board = Board::new().await;
    let first = board.get("alice", None).await;
    let cookie = tracking_cookie(&first).unwrap();

    let second = board.get("alice", Some(cookie.value())).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert!(second.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn cookie_of_another_user_is_reissued() {
    let board = Board::new().await;
    let alice = tracking_cookie(&board.get("alice", None).await).unwrap();

    let response = board.get("bob", Some(alice.value())).await;
    let bob = tracking_cookie(&response).expect("cookie was not replaced");
    assert_ne!(bob.value(), alice.value());
}

#[tokio::test]
async fn create_then_replay() {
    let board = Board::new().await;

    let first = board.get("alice", None).await;
    let cookie = tracking_cookie(&first).unwrap();
    let token = embedded_token(&body_text(first).await);

    let body = format!("content=hello&oneTimeToken={token}");
    let mut request = Request::post("/posts")
        .header(header::COOKIE, format!("tracking_id={}", cookie.value()))
        .body(Body::from(body.clone()))
        .unwrap();
    request = authenticated(request, "alice");
    assert_redirect(&board.send(request).await);

    let posts = board.posts().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "hello");
    assert_eq!(posts[0].posted_by, "alice");
    assert_eq!(posts[0].tracking_cookie, cookie.value());

    let replay = board.post("alice", "/posts", body).await;
    assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
    assert_eq!(board.posts().await.len(), 1);
}

#[tokio::test]
async fn stale_page_is_rejected() {
    let board = Board::new().await;
    let stale = board.token_for("alice").await;
    let fresh = board.token_for("alice").await;

    let response = board
        .post("alice", "/posts", format!("content=old&oneTimeToken={stale}"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = board
        .post("alice", "/posts", format!("content=new&oneTimeToken={fresh}"))
        .await;
    assert_redirect(&response);

    let posts = board.posts().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "new");
}

#[tokio::test]
async fn token_belongs_to_its_subject() {
    let board = Board::new().await;
    let token = board.token_for("alice").await;

    let response = board
        .post("bob", "/posts", format!("content=forged&oneTimeToken={token}"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(board.posts().await.is_empty());
}

#[tokio::test]
async fn missing_token_is_rejected() {
    let board = Board::new().await;
    board.token_for("alice").await;

    let response = board.post("alice", "/posts", "content=hello".into()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "未対応のリクエストです。");
    assert!(board.posts().await.is_empty());
}

#[tokio::test]
async fn content_is_rendered_with_spaces_and_escaped() {
    let board = Board::new().await;
    assert_redirect(&board.create("alice", "hello+%3Cb%3Eworld%3C%2Fb%3E").await);

    let html = body_text(board.get("alice", None).await).await;
    assert!(html.contains("hello &lt;b&gt;world"));
    assert!(!html.contains("<b>world"));
}

#[tokio::test]
async fn listing_is_newest_first() {
    let board = Board::new().await;
    assert_redirect(&board.create("alice", "first").await);
    assert_redirect(&board.create("bob", "second").await);

    let html = body_text(board.get("alice", None).await).await;
    let second = html.find("second").unwrap();
    let first = html.find("first").unwrap();
    assert!(second < first);
}

#[tokio::test]
async fn only_admin_sees_authors() {
    let board = Board::new().await;
    assert_redirect(&board.create("alice", "hello").await);

    let as_bob = body_text(board.get("bob", None).await).await;
    assert!(!as_bob.contains("投稿者: alice"));

    let as_admin = body_text(board.get("admin", None).await).await;
    assert!(as_admin.contains("投稿者: alice"));
}

#[tokio::test]
async fn others_cannot_delete() {
    let board = Board::new().await;
    assert_redirect(&board.create("alice", "hello").await);
    let id = board.posts().await[0].id;

    let response = board
        .post("bob", "/posts?delete=1", format!("id={id}"))
        .await;
    assert_redirect(&response);
    assert_eq!(board.posts().await.len(), 1);
}

#[tokio::test]
async fn author_deletes_own_post() {
    let board = Board::new().await;
    assert_redirect(&board.create("alice", "hello").await);
    let id = board.posts().await[0].id;

    let response = board
        .post("alice", "/posts?delete=1", format!("id={id}"))
        .await;
    assert_redirect(&response);
    assert!(board.posts().await.is_empty());
}

#[tokio::test]
async fn admin_deletes_any_post() {
    let board = Board::new().await;
    assert_redirect(&board.create("alice", "hello").await);
    assert_redirect(&board.create("bob", "world").await);
    let id = board.posts().await[1].id;

    let response = board
        .post("admin", "/posts?delete=1", format!("id={id}"))
        .await;
    assert_redirect(&response);

    let posts = board.posts().await;
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].posted_by, "bob");
}

#[tokio::test]
async fn malformed_delete_is_absorbed() {
    let board = Board::new().await;
    assert_redirect(&board.create("alice", "hello").await);

    for body in ["", "id=", "id=abc", "id=9999"] {
        let response = board.post("admin", "/posts?delete=1", body.into()).await;
        assert_redirect(&response);
    }

    assert_eq!(board.posts().await.len(), 1);
}

#[tokio::test]
async fn unsupported_method() {
    let board = Board::new().await;
    let request = Request::builder()
        .method(Method::PUT)
        .uri("/posts")
        .body(Body::empty())
        .unwrap();

    let response = board.send(authenticated(request, "alice")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(tracking_cookie(&response).is_some());
    assert_eq!(body_text(response).await, "未対応のリクエストです。");
}

#[tokio::test]
async fn head_keeps_open_page_valid() {
    let board = Board::new().await;
    let token = board.token_for("alice").await;

    let request = Request::head("/posts").body(Body::empty()).unwrap();
    let response = board.send(authenticated(request, "alice")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = board
        .post("alice", "/posts", format!("content=hello&oneTimeToken={token}"))
        .await;
    assert_redirect(&response);
    assert_eq!(board.posts().await.len(), 1);
}

#[tokio::test]
async fn listing_is_not_served_on_delete_path() {
    let board = Board::new().await;
    let token = board.token_for("alice").await;

    let request = Request::get("/posts?delete=1").body(Body::empty()).unwrap();
    let response = board.send(authenticated(request, "alice")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "未対応のリクエストです。");

    let response = board
        .post("alice", "/posts", format!("content=hello&oneTimeToken={token}"))
        .await;
    assert_redirect(&response);
}

#[tokio::test]
async fn credentials_are_required() {
    let board = Board::new().await;
    let response = board
        .send(Request::get("/posts").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let board = Board::new().await;
    let mut request = Request::get("/posts").body(Body::empty()).unwrap();
    request
        .headers_mut()
        .typed_insert(Authorization::basic("alice", "wrong"));

    let response = board.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_challenges_again() {
    let board = Board::new().await;
    let response = board
        .send(Request::get("/logout").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().contains_key(header::WWW_AUTHENTICATE));
    assert_eq!(body_text(response).await, "ログアウトしました");
}

#[tokio::test]
async fn unknown_path() {
    let board = Board::new().await;
    let response = board
        .send(Request::get("/nowhere").body(Body::empty()).unwrap())
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(response).await, "ページがみつかりません");
}
