use std::collections::BTreeSet;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::model::{Faq, FaqCreate};

use super::extract::{AdminUser, JsonBody};
use super::{AppState, LIST_LIMIT};

#[derive(Debug, Default, Deserialize)]
pub(super) struct FaqFilter {
    #[serde(default)]
    category: Option<String>,
}

pub(super) async fn list_faqs(State(state): State<AppState>, Query(filter): Query<FaqFilter>) -> AppResult<Json<Vec<Faq>>> {
    let category = filter.category.filter(|c| !c.is_empty());
    let mut faqs = state.store.0.lock().find::<Faq>(|f| {
        f.is_active && category.as_deref().map_or(true, |c| f.category == c)
    })?;
    // stable sort keeps id order among equal `order` values
    faqs.sort_by_key(|f| f.order);
    faqs.truncate(LIST_LIMIT);
    Ok(Json(faqs))
}

/// Distinct categories of active FAQs, sorted.
pub(super) async fn faq_categories(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let faqs = state.store.0.lock().find::<Faq>(|f| f.is_active)?;
    let categories: BTreeSet<String> = faqs.into_iter().map(|f| f.category).collect();
    Ok(Json(categories.into_iter().collect()))
}

pub(super) async fn create_faq(
    State(state): State<AppState>,
    _admin: AdminUser,
    JsonBody(body): JsonBody<FaqCreate>,
) -> AppResult<Json<Faq>> {
    let faq = body.into_faq();
    state.store.0.lock().insert(&faq)?;
    Ok(Json(faq))
}
