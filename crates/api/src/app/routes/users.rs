use std::sync::Arc;

use axum::{
    Extension, Json, Router,
    body::Bytes,
    extract::{Path, Query},
    http::StatusCode,
    routing::{get, post},
};

use marketplace_auth::{Action, ResourceContext, ResourceKind, User};
use marketplace_core::{Page, UserId, paginate};
use marketplace_products::Product;
use marketplace_sales::Order;

use crate::app::dto::{ListQuery, Profile, RolePatchRequest};
use crate::app::errors::ApiError;
use crate::app::routes::common::{parse_body, parse_user_id, segment};
use crate::app::services::AppServices;
use crate::authz;
use crate::context::PrincipalContext;

pub fn router() -> Router {
    Router::new()
        .route("/list", get(list_users))
        .route("/list/:per_page", get(list_users))
        .route("/ids", get(user_ids))
        .route("/ids/:per_page", get(user_ids))
        .route("/profile", get(profile))
        .route("/profile/:id", get(profile))
        .route("/orders", get(orders))
        .route("/orders/:id", get(orders))
        .route("/products", get(products))
        .route("/products/:id", get(products))
        .route("/:id/role/patch", post(patch_role))
}

fn require_list(services: &AppServices, ctx: &PrincipalContext) -> Result<(), ApiError> {
    let resource = ResourceContext::new(ResourceKind::User, ctx.principal().id(), 0);
    authz::require(&services.policy, ctx, Action::ViewList, &resource)?;
    Ok(())
}

/// Resolve the optional `{id}` segment, defaulting to the caller. Unknown users are a 404.
fn target_user(services: &AppServices, ctx: &PrincipalContext, id: &Option<Path<String>>) -> Result<User, ApiError> {
    let id = match segment(id) {
        Some(raw) => parse_user_id(raw)?,
        None => ctx.principal().id(),
    };
    services.user(id)
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    per_page: Option<Path<String>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<User>>, ApiError> {
    require_list(&services, &ctx)?;
    Ok(Json(paginate(services.users(), query.page_request(segment(&per_page)))))
}

pub async fn user_ids(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    per_page: Option<Path<String>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<UserId>>, ApiError> {
    require_list(&services, &ctx)?;
    let page = paginate(services.users(), query.page_request(segment(&per_page)));
    Ok(Json(page.map(|u| u.id)))
}

pub async fn profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    id: Option<Path<String>>,
) -> Result<Json<Profile>, ApiError> {
    let user = target_user(&services, &ctx, &id)?;
    authz::require(&services.policy, &ctx, Action::ViewOwn, &ResourceContext::user(user.id))?;
    Ok(Json(services.profile(ctx.principal(), user)))
}

/// Orders placed by the target user, newest first.
pub async fn orders(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    id: Option<Path<String>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Order>>, ApiError> {
    let user = target_user(&services, &ctx, &id)?;
    authz::require(&services.policy, &ctx, Action::ViewOwn, &ResourceContext::order(user.id, 0))?;
    Ok(Json(paginate(services.orders_of(user.id), query.page_request(None))))
}

/// Listings are public to any authenticated caller.
pub async fn products(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    id: Option<Path<String>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Page<Product>>, ApiError> {
    let user = target_user(&services, &ctx, &id)?;
    Ok(Json(paginate(services.products_of(user.id), query.page_request(None))))
}

pub async fn patch_role(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ctx): Extension<PrincipalContext>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let target = services.user(parse_user_id(&id)?)?;
    authz::require(&services.policy, &ctx, Action::PatchRole, &ResourceContext::user(target.id))?;

    let request: RolePatchRequest = parse_body(&body)?;
    services.patch_role(ctx.principal(), target.id, request.role)?;
    Ok(StatusCode::NO_CONTENT)
}
