use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::Path,
    http::StatusCode,
    routing::{get, post},
};

use marketplace_auth::Scope;
use marketplace_core::CategoryId;
use marketplace_products::{Category, NewSubCategory};

use crate::app::errors::ApiError;
use crate::app::routes::common::parse_body;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/base", get(base_categories))
        .route("/sub", post(create_sub_category))
        .route("/sub/ids", get(sub_category_ids))
        .route("/sub/list", get(sub_categories))
        .route("/sub/:slug", get(show_sub_category))
}

pub async fn base_categories(Extension(services): Extension<Arc<AppServices>>) -> Json<Vec<Category>> {
    Json(services.base_categories())
}

pub async fn sub_category_ids(Extension(services): Extension<Arc<AppServices>>) -> Json<Vec<CategoryId>> {
    Json(services.sub_categories().into_iter().map(|c| c.id).collect())
}

pub async fn sub_categories(Extension(services): Extension<Arc<AppServices>>) -> Json<Vec<Category>> {
    Json(services.sub_categories())
}

pub async fn show_sub_category(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
) -> Result<Json<Category>, ApiError> {
    Ok(Json(services.sub_category(&slug)?))
}

/// Gated by the `create-sub` scope alone; role plays no part.
pub async fn create_sub_category(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    body: Bytes,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    authz::require_scope(&services.policy, &ctx, Scope::CREATE_SUB.as_str())?;

    let input: NewSubCategory = parse_body(&body)?;
    let category = services.create_sub_category(input)?;
    Ok((StatusCode::CREATED, Json(category)))
}
