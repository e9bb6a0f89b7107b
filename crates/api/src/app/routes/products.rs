use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};
use serde::Deserialize;

use marketplace_auth::{Action, ResourceContext};
use marketplace_core::{Page, ProductId, paginate};
use marketplace_products::{NewProduct, Product, ProductFilter, ProductPatch};

use crate::app::dto::{CollectedProduct, ListQuery, ProductWithRates};
use crate::app::errors::ApiError;
use crate::app::routes::common::{parse_body, segment};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product))
        .route("/ids", get(product_ids))
        .route("/ids/:per_page", get(product_ids))
        .route("/list", get(list_products))
        .route("/list/:per_page", get(list_products))
        .route("/find", get(find_products))
        .route("/find/:per_page", get(find_products))
        .route("/sub/:slug", get(products_in_sub))
        .route("/sub/:slug/:per_page", get(products_in_sub))
        .route("/collect/:ids", get(collect_products))
        .route("/filter/sub/:slug/brands/:value", get(filter_by_brands))
        .route("/filter/sub/:slug/brands/:value/:per_page", get(filter_by_brands))
        .route("/filter/sub/:slug/condition/:value", get(filter_by_condition))
        .route("/filter/sub/:slug/condition/:value/:per_page", get(filter_by_condition))
        .route("/filter/sub/:slug/price/:value", get(filter_by_price))
        .route("/filter/sub/:slug/price/:value/:per_page", get(filter_by_price))
        .route("/:slug", get(show_product))
        .route("/:slug/patch", post(patch_product))
        .route("/:slug/delete", post(delete_product))
}

#[derive(Debug, Deserialize)]
pub struct SubPath {
    pub slug: String,
    #[serde(default)]
    pub per_page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FilterPath {
    pub slug: String,
    pub value: String,
    #[serde(default)]
    pub per_page: Option<String>,
}

pub async fn product_ids(
    Extension(services): Extension<Arc<AppServices>>,
    per_page: Option<Path<String>>,
    Query(query): Query<ListQuery>,
) -> Json<Page<ProductId>> {
    let page = paginate(services.products(), query.page_request(segment(&per_page)));
    Json(page.map(|p| p.id))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    per_page: Option<Path<String>>,
    Query(query): Query<ListQuery>,
) -> Json<Page<Product>> {
    Json(paginate(services.products(), query.page_request(segment(&per_page))))
}

/// Case-insensitive search on slug or name (`?q=`).
pub async fn find_products(
    Extension(services): Extension<Arc<AppServices>>,
    per_page: Option<Path<String>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Product>>, ApiError> {
    let found = services.search(query.q.as_deref().unwrap_or_default())?;
    Ok(Json(paginate(found, query.page_request(segment(&per_page)))))
}

pub async fn products_in_sub(
    Extension(services): Extension<Arc<AppServices>>,
    Path(path): Path<SubPath>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Product>>, ApiError> {
    let sub = services.sub_category(&path.slug)?;
    let products = services.products_in(sub.id, None);
    Ok(Json(paginate(products, query.page_request(path.per_page.as_deref()))))
}

pub async fn collect_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(ids): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CollectedProduct>>, ApiError> {
    Ok(Json(services.collect(&ids, query.wants_rates())?))
}

pub async fn filter_by_brands(
    Extension(services): Extension<Arc<AppServices>>,
    Path(path): Path<FilterPath>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Product>>, ApiError> {
    filtered(&services, &path, &query, ProductFilter::brands(&path.value)?)
}

pub async fn filter_by_condition(
    Extension(services): Extension<Arc<AppServices>>,
    Path(path): Path<FilterPath>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Product>>, ApiError> {
    filtered(&services, &path, &query, ProductFilter::condition(&path.value)?)
}

pub async fn filter_by_price(
    Extension(services): Extension<Arc<AppServices>>,
    Path(path): Path<FilterPath>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Product>>, ApiError> {
    filtered(&services, &path, &query, ProductFilter::price(&path.value)?)
}

fn filtered(
    services: &AppServices,
    path: &FilterPath,
    query: &ListQuery,
    filter: ProductFilter,
) -> Result<Json<Page<Product>>, ApiError> {
    let sub = services.sub_category(&path.slug)?;
    let products = services.products_in(sub.id, Some(&filter));
    Ok(Json(paginate(products, query.page_request(path.per_page.as_deref()))))
}

pub async fn show_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
) -> Result<Json<ProductWithRates>, ApiError> {
    let product = services.product(&slug)?;
    Ok(Json(services.with_rates(product)))
}

/// Any authenticated caller may list a product; they become its owner.
pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    body: Bytes,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let owner = ctx.principal().id();
    authz::require(&services.policy, &ctx, Action::Create, &ResourceContext::product(owner, 0))?;

    let input: NewProduct = parse_body(&body)?;
    let product = services.create_product(owner, input)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn patch_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(slug): Path<String>,
    body: Bytes,
) -> Result<Json<Product>, ApiError> {
    let product = services.product(&slug)?;
    let resource = ResourceContext::product(product.user_id, product.id.get());
    authz::require(&services.policy, &ctx, Action::Update, &resource)?;

    let patch: ProductPatch = parse_body(&body)?;
    Ok(Json(services.patch_product(&product, patch)?))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(slug): Path<String>,
) -> Result<StatusCode, ApiError> {
    let product = services.product(&slug)?;
    let resource = ResourceContext::product(product.user_id, product.id.get());
    authz::require(&services.policy, &ctx, Action::Delete, &resource)?;

    services.delete_product(&product)?;
    Ok(StatusCode::NO_CONTENT)
}
