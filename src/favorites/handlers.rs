use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{error, info, instrument, Span};

use super::dto::{FavoriteEntry, StoredFavorite};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", post(add_favorite))
        .route("/favorites/:user_id", get(list_favorites))
        .route("/favorites/:user_id/:recipe_id", delete(remove_favorite))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<StoredFavorite>>, (StatusCode, String)> {
    let rows = state
        .favorites
        .list_by_user(&user_id)
        .await
        .map_err(internal)?;
    Ok(Json(rows))
}

/// 201 for a new bookmark, 200 with the existing row for a duplicate.
/// Any malformed body, including a missing `userId` or `recipeId`, is a 400.
#[instrument(skip_all, fields(user_id, recipe_id))]
pub async fn add_favorite(
    State(state): State<AppState>,
    payload: Result<Json<FavoriteEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<StoredFavorite>), (StatusCode, String)> {
    let Json(body) = payload.map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?;
    let span = Span::current();
    span.record("user_id", body.user_id.as_str());
    span.record("recipe_id", body.recipe_id);

    if body.user_id.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "userId is required".into()));
    }
    if body.recipe_id <= 0 {
        return Err((StatusCode::BAD_REQUEST, "recipeId must be positive".into()));
    }

    let (row, created) = state.favorites.insert(body).await.map_err(internal)?;
    if created {
        info!("favorite added");
        Ok((StatusCode::CREATED, Json(row)))
    } else {
        Ok((StatusCode::OK, Json(row)))
    }
}

/// Always 204; removing something that is not there is not an error.
#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((user_id, recipe_id)): Path<(String, i64)>,
) -> Result<StatusCode, (StatusCode, String)> {
    let removed = state
        .favorites
        .delete(&user_id, recipe_id)
        .await
        .map_err(internal)?;
    info!(removed, "favorite removed");
    Ok(StatusCode::NO_CONTENT)
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "favorites repository failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error".into())
}
