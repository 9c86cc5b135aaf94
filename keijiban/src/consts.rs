pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Subject allowed to delete every post
pub const ADMIN_USERNAME: &str = "admin";

pub const POSTS_PATH: &str = "/posts";

pub const AUTH_REALM: &str = r#"Basic realm="Enter username and password.""#;

pub const BAD_REQUEST_MESSAGE: &str = "未対応のリクエストです。";
pub const LOGOUT_MESSAGE: &str = "ログアウトしました";
pub const NOT_FOUND_MESSAGE: &str = "ページがみつかりません";
