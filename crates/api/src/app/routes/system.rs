use axum::{Extension, Json, http::StatusCode};

use crate::app::dto::WhoAmI;
use crate::context::{PrincipalContext, RequestId};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    Extension(ctx): Extension<PrincipalContext>,
    request_id: Option<Extension<RequestId>>,
) -> Json<WhoAmI> {
    let principal = ctx.principal();
    Json(WhoAmI {
        id: principal.id(),
        name: ctx.name().to_string(),
        role: principal.role_tier(),
        scopes: principal.granted_scopes().iter().map(|s| s.to_string()).collect(),
        expires_at: ctx.expires_at(),
        request_id: request_id.map(|Extension(RequestId(id))| id),
    })
}
