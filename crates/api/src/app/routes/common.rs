use axum::extract::Path;
use serde::de::DeserializeOwned;

use marketplace_core::UserId;

use crate::app::errors::ApiError;

/// Value of an optional single path segment (`/list` vs `/list/{perPage}`).
pub fn segment(path: &Option<Path<String>>) -> Option<&str> {
    path.as_ref().map(|Path(s)| s.as_str())
}

pub fn parse_user_id(raw: &str) -> Result<UserId, ApiError> {
    Ok(raw.parse::<UserId>()?)
}

/// Decode a JSON body. Handlers call this after authorization, so a denied
/// caller gets 403 whatever the body holds.
pub fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|e| ApiError::Validation(format!("invalid request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Body {
        role: u8,
    }

    #[test]
    fn parse_body_maps_errors_to_validation() {
        assert_eq!(parse_body::<Body>(br#"{"role":1}"#).unwrap(), Body { role: 1 });
        assert!(matches!(parse_body::<Body>(b""), Err(ApiError::Validation(_))));
        assert!(matches!(parse_body::<Body>(br#"{"role":"x"}"#), Err(ApiError::Validation(_))));
    }

    #[test]
    fn user_ids_must_be_numeric() {
        assert_eq!(parse_user_id("42").unwrap(), UserId::new(42));
        assert!(matches!(parse_user_id("me"), Err(ApiError::Validation(_))));
    }
}
