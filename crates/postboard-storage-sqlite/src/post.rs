use async_trait::async_trait;
use chrono::{NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool};

use postboard_core::{
    NewPost, Post, PostChanges, PostPage, PostStore, PostboardError, PostboardResult,
};

#[derive(Clone)]
pub struct SqlitePostStore {
    pool: SqlitePool,
}

const POST_SELECT: &str = "SELECT id, title, content, image, created_at, updated_at FROM posts";

fn db_err(e: sqlx::Error) -> PostboardError {
    PostboardError::Persistence(e.to_string())
}

/// Parse a SQLite datetime text string into a chrono DateTime<Utc>.
///
/// Timestamps are written by `strftime('%Y-%m-%dT%H:%M:%fZ', 'now')`, which
/// yields strings like `2025-01-01T00:00:00.000Z`.
fn parse_datetime(s: &str) -> PostboardResult<chrono::DateTime<Utc>> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    // CURRENT_TIMESTAMP format, for rows written by hand.
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(PostboardError::Persistence(format!(
        "failed to parse datetime: {s}"
    )))
}

fn row_to_post(row: &sqlx::sqlite::SqliteRow) -> PostboardResult<Post> {
    let created_at: String = row.try_get("created_at").map_err(db_err)?;
    let updated_at: String = row.try_get("updated_at").map_err(db_err)?;
    Ok(Post {
        id: row.try_get("id").map_err(db_err)?,
        title: row.try_get("title").map_err(db_err)?,
        content: row.try_get("content").map_err(db_err)?,
        image: row.try_get("image").map_err(db_err)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

impl SqlitePostStore {
    pub async fn connect(url: &str) -> PostboardResult<Self> {
        let pool = SqlitePool::connect(url).await.map_err(db_err)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| PostboardError::Persistence(e.to_string()))?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl PostStore for SqlitePostStore {
    async fn list_posts(&self, page: u32, per_page: u32) -> PostboardResult<PostPage> {
        let page = page.max(1);
        let offset = (page as i64 - 1) * per_page as i64;

        let total: i64 = sqlx::query("SELECT COUNT(*) AS total FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?
            .try_get("total")
            .map_err(db_err)?;

        let sql = format!("{POST_SELECT} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?");
        let rows = sqlx::query(&sql)
            .bind(per_page as i64)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let items = rows.iter().map(row_to_post).collect::<PostboardResult<Vec<_>>>()?;

        Ok(PostPage {
            items,
            total: total as u64,
            page,
            per_page,
        })
    }

    async fn create_post(&self, input: &NewPost) -> PostboardResult<Post> {
        let result = sqlx::query("INSERT INTO posts (title, content, image) VALUES (?, ?, ?)")
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.image)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, "inserted post");
        self.get_post(id).await?.ok_or_else(|| {
            PostboardError::Persistence(format!("post {id} vanished after insert"))
        })
    }

    async fn get_post(&self, id: i64) -> PostboardResult<Option<Post>> {
        let sql = format!("{POST_SELECT} WHERE id = ?");
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(ref r) => Ok(Some(row_to_post(r)?)),
            None => Ok(None),
        }
    }

    async fn update_post(&self, id: i64, changes: &PostChanges) -> PostboardResult<Post> {
        let result = sqlx::query(
            "UPDATE posts SET title = ?, content = ?, image = COALESCE(?, image), \
             updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now') WHERE id = ?",
        )
        .bind(&changes.title)
        .bind(&changes.content)
        .bind(changes.image.as_deref())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(PostboardError::post_not_found());
        }

        self.get_post(id)
            .await?
            .ok_or_else(PostboardError::post_not_found)
    }

    async fn delete_post(&self, id: i64) -> PostboardResult<()> {
        let result = sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(PostboardError::post_not_found());
        }
        Ok(())
    }
}
