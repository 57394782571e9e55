use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use super::{AppState, PageParams};
use crate::api::errors::ApiResult;
use crate::api::extract::ApiQuery;
use crate::api::models::SportItem;
use crate::database;

pub async fn get_sports(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<PageParams>,
) -> ApiResult<Vec<SportItem>> {
    let conn = state.connection()?;
    let sports = database::sports::list(&conn, state.page(&params))?;
    Ok(Json(sports.into_iter().map(SportItem::from).collect()))
}
