//! Decoding of the board's form bodies
//!
//! The body is percent-decoded *as a whole* and only then split on `&` and `=`.
//! An encoded `&` or `=` inside a value therefore still acts as a separator after decoding,
//! and `+` is left alone (it is turned into a space when the post is rendered).
//! Fields are looked up by name, missing fields decode to an empty string.

use percent_encoding::percent_decode;
use std::str::Utf8Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form body is not valid UTF-8 after decoding")]
    InvalidUtf8(#[from] Utf8Error),
}

struct DecodedBody(String);

impl DecodedBody {
    fn decode(body: &[u8]) -> Result<Self, FormError> {
        let decoded = percent_decode(body).decode_utf8()?;
        Ok(Self(decoded.into_owned()))
    }

    fn field(&self, name: &str) -> String {
        self.0
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find_map(|(key, value)| (key == name).then_some(value))
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct CreatePostForm {
    pub content: String,
    pub one_time_token: String,
}

impl CreatePostForm {
    pub fn decode(body: &[u8]) -> Result<Self, FormError> {
        let body = DecodedBody::decode(body)?;

        Ok(Self {
            content: body.field("content"),
            one_time_token: body.field("oneTimeToken"),
        })
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct DeletePostForm {
    pub id: String,
}

impl DeletePostForm {
    pub fn decode(body: &[u8]) -> Result<Self, FormError> {
        let body = DecodedBody::decode(body)?;

        Ok(Self {
            id: body.field("id"),
        })
    }
}
