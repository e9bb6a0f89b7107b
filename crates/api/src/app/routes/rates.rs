//! Product ratings, mounted under `/product/{slug}/rates`.

use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Path, Query},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use marketplace_auth::{Action, ResourceContext};
use marketplace_core::{Page, paginate};
use marketplace_products::{NewRate, Rate, RatePatch};

use crate::app::dto::ListQuery;
use crate::app::errors::ApiError;
use crate::app::routes::common::parse_body;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    // GET reads the trailing segment as perPage, POST as the rate id.
    Router::new()
        .route("/:slug/rates", get(list_rates).post(create_rate))
        .route("/:slug/rates/:segment", get(list_rates).post(update_rate))
}

#[derive(Debug, Deserialize)]
pub struct RatesPath {
    pub slug: String,
    #[serde(default)]
    pub segment: Option<String>,
}

pub async fn list_rates(
    Extension(services): Extension<Arc<AppServices>>,
    Path(path): Path<RatesPath>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Rate>>, ApiError> {
    let product = services.product(&path.slug)?;
    let rates = services.rates_for(product.id);
    Ok(Json(paginate(rates, query.page_request(path.segment.as_deref()))))
}

pub async fn create_rate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, Json<Rate>), ApiError> {
    let product = services.product(&slug)?;
    let author = ctx.principal().id();
    authz::require(&services.policy, &ctx, Action::Create, &ResourceContext::rate(author, 0))?;

    let input: NewRate = parse_body(&body)?;
    let rate = services.create_rate(&product, author, input)?;
    Ok((StatusCode::CREATED, Json(rate)))
}

/// Only the author may edit a rating.
pub async fn update_rate(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path((slug, rate_id)): Path<(String, String)>,
    body: Bytes,
) -> Result<Json<Rate>, ApiError> {
    let product = services.product(&slug)?;
    let rate = services.rate(&product, &rate_id)?;
    authz::require(
        &services.policy,
        &ctx,
        Action::Update,
        &ResourceContext::rate(rate.user_id, rate.id.get()),
    )?;

    let patch: RatePatch = parse_body(&body)?;
    Ok(Json(services.patch_rate(&rate, patch)?))
}
