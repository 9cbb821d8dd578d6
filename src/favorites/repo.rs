use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::RwLock;

use super::dto::{FavoriteEntry, StoredFavorite};

/// Persistence for the favorites store. `(user_id, recipe_id)` is unique.
#[async_trait]
pub trait FavoritesRepo: Send + Sync {
    /// Newest first.
    async fn list_by_user(&self, user_id: &str) -> anyhow::Result<Vec<StoredFavorite>>;

    /// Returns the stored row and whether it was newly created. A duplicate
    /// returns the existing row untouched.
    async fn insert(&self, entry: FavoriteEntry) -> anyhow::Result<(StoredFavorite, bool)>;

    /// Returns whether a row was removed.
    async fn delete(&self, user_id: &str, recipe_id: i64) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgFavoritesRepo {
    db: PgPool,
}

impl PgFavoritesRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    async fn find(&self, user_id: &str, recipe_id: i64) -> anyhow::Result<Option<StoredFavorite>> {
        let row = sqlx::query_as::<_, StoredFavorite>(
            r#"
            SELECT id, user_id, recipe_id, title, image, cook_time, servings, created_at
              FROM favorites
             WHERE user_id = $1 AND recipe_id = $2
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(&self.db)
        .await
        .context("find favorite")?;
        Ok(row)
    }
}

#[async_trait]
impl FavoritesRepo for PgFavoritesRepo {
    async fn list_by_user(&self, user_id: &str) -> anyhow::Result<Vec<StoredFavorite>> {
        let rows = sqlx::query_as::<_, StoredFavorite>(
            r#"
            SELECT id, user_id, recipe_id, title, image, cook_time, servings, created_at
              FROM favorites
             WHERE user_id = $1
             ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list favorites by user")?;
        Ok(rows)
    }

    async fn insert(&self, entry: FavoriteEntry) -> anyhow::Result<(StoredFavorite, bool)> {
        let (user_id, recipe_id) = (entry.user_id.clone(), entry.recipe_id);
        let fresh = StoredFavorite::new(entry);
        let inserted = sqlx::query_as::<_, StoredFavorite>(
            r#"
            INSERT INTO favorites (id, user_id, recipe_id, title, image, cook_time, servings, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, recipe_id) DO NOTHING
            RETURNING id, user_id, recipe_id, title, image, cook_time, servings, created_at
            "#,
        )
        .bind(fresh.id)
        .bind(&fresh.user_id)
        .bind(fresh.recipe_id)
        .bind(&fresh.title)
        .bind(&fresh.image)
        .bind(&fresh.cook_time)
        .bind(&fresh.servings)
        .bind(fresh.created_at)
        .fetch_optional(&self.db)
        .await
        .context("insert favorite")?;

        if let Some(row) = inserted {
            return Ok((row, true));
        }
        let existing = self
            .find(&user_id, recipe_id)
            .await?
            .with_context(|| format!("favorite {user_id}/{recipe_id} vanished after conflict"))?;
        Ok((existing, false))
    }

    async fn delete(&self, user_id: &str, recipe_id: i64) -> anyhow::Result<bool> {
        let done = sqlx::query(r#"DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2"#)
            .bind(user_id)
            .bind(recipe_id)
            .execute(&self.db)
            .await
            .context("delete favorite")?;
        Ok(done.rows_affected() > 0)
    }
}

/// Process-local repository for running without Postgres and for tests.
#[derive(Default)]
pub struct MemoryFavoritesRepo {
    rows: RwLock<Vec<StoredFavorite>>,
}

impl MemoryFavoritesRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FavoritesRepo for MemoryFavoritesRepo {
    async fn list_by_user(&self, user_id: &str) -> anyhow::Result<Vec<StoredFavorite>> {
        let rows = self.rows.read().await;
        // Rows are appended in creation order.
        Ok(rows
            .iter()
            .rev()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, entry: FavoriteEntry) -> anyhow::Result<(StoredFavorite, bool)> {
        let mut rows = self.rows.write().await;
        if let Some(existing) = rows
            .iter()
            .find(|r| r.user_id == entry.user_id && r.recipe_id == entry.recipe_id)
        {
            return Ok((existing.clone(), false));
        }
        let row = StoredFavorite::new(entry);
        rows.push(row.clone());
        Ok((row, true))
    }

    async fn delete(&self, user_id: &str, recipe_id: i64) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|r| !(r.user_id == user_id && r.recipe_id == recipe_id));
        Ok(rows.len() != before)
    }
}

#[cfg(test)]
mod repo_tests {
    use super::*;

    fn entry(user: &str, recipe_id: i64, title: &str) -> FavoriteEntry {
        FavoriteEntry {
            user_id: user.into(),
            recipe_id,
            title: title.into(),
            image: String::new(),
            cook_time: "30 minutes".into(),
            servings: "4".into(),
        }
    }

    #[tokio::test]
    async fn insert_is_unique_per_user_and_recipe() {
        let repo = MemoryFavoritesRepo::new();
        let (first, created) = repo.insert(entry("u1", 1, "Kumpir")).await.unwrap();
        assert!(created);
        let (again, created) = repo.insert(entry("u1", 1, "Renamed")).await.unwrap();
        assert!(!created);
        assert_eq!(again, first);
        let (_, created) = repo.insert(entry("u2", 1, "Kumpir")).await.unwrap();
        assert!(created);
        assert_eq!(repo.list_by_user("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_is_newest_first_and_scoped_to_user() {
        let repo = MemoryFavoritesRepo::new();
        repo.insert(entry("u1", 1, "Wontons")).await.unwrap();
        repo.insert(entry("u1", 2, "Ratatouille")).await.unwrap();
        repo.insert(entry("u2", 3, "Mince Pies")).await.unwrap();
        let titles: Vec<String> = repo
            .list_by_user("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Ratatouille", "Wontons"]);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_went() {
        let repo = MemoryFavoritesRepo::new();
        repo.insert(entry("u1", 1, "Wontons")).await.unwrap();
        assert!(repo.delete("u1", 1).await.unwrap());
        assert!(!repo.delete("u1", 1).await.unwrap());
        assert!(repo.list_by_user("u1").await.unwrap().is_empty());
    }
}
