use crate::errors::ServiceError;
use axum::response::{IntoResponse, Redirect, Response};
use serde::{de, Deserialize, Deserializer};
use std::{fmt, str::FromStr};

pub const ID_NOT_PROVIDED: &str = "Id not provided";
pub const ID_MISMATCH: &str = "Id mismatch";

/// Treats a blank form or query value as absent.
///
/// HTML forms submit untouched inputs as `field=`; this keeps those from
/// failing `FromStr` for typed fields.
pub fn empty_string_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let opt = Option::<String>::deserialize(de)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => FromStr::from_str(s).map_err(de::Error::custom).map(Some),
    }
}

/// 303 to the given path.
pub fn redirect_to(path: &str) -> Response {
    Redirect::to(path).into_response()
}

/// 303 to the error page carrying `message`.
pub fn redirect_to_error(message: &str) -> Response {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("/error?message={}", encoded)).into_response()
}

/// Sends user-facing service failures to the error page; everything else is
/// rendered by `ServiceError`'s own response.
pub fn error_page_or_response(err: ServiceError) -> Response {
    if err.is_user_facing() {
        tracing::warn!(error = %err, "redirecting to error page");
        redirect_to_error(&err.to_string())
    } else {
        err.into_response()
    }
}
