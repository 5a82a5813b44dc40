use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use uuid::Uuid;

static USER_ID_HEADER: &str = "x-user-id";

/// Identity of the requesting user, read from the `X-User-Id` header.
#[derive(Debug, Clone, Copy)]
pub struct CallerId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or((StatusCode::BAD_REQUEST, "missing X-User-Id header"))?;
        let id = value
            .parse::<Uuid>()
            .map_err(|_| (StatusCode::BAD_REQUEST, "invalid X-User-Id header"))?;
        Ok(CallerId(id))
    }
}
