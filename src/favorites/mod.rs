pub mod coordinator;
pub mod dto;
pub mod handlers;
pub mod repo;
pub mod store;

use axum::Router;

use crate::state::AppState;

pub use coordinator::{FavoriteFlag, FavoritesCoordinator};
pub use dto::{FavoriteEntry, StoredFavorite};
pub use store::{FavoritesStore, HttpFavoritesStore};

pub fn router() -> Router<AppState> {
    handlers::routes()
}
