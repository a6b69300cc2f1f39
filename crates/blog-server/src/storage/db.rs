//! SQLite database layer (embedded, single file)

use super::{PostRecord, PostStore, Result, StorageError, UserStore};
use async_trait::async_trait;
use blog_types::{Post, User};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::Arc;

const MAX_CONNECTIONS: u32 = 5;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// Open (creating if absent) the database file and ensure both tables exist.
    pub async fn open(database_path: impl AsRef<Path>) -> Result<Self> {
        let database_path = database_path.as_ref();
        tracing::info!("Opening SQLite database at: {}", database_path.display());

        // Relative paths like "database.sqlite" have an empty parent
        let parent = database_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        tokio::fs::create_dir_all(parent).await?;

        let test_file = parent.join(".write_test");
        match tokio::fs::write(&test_file, b"test").await {
            Ok(_) => {
                let _ = tokio::fs::remove_file(&test_file).await;
            }
            Err(e) => {
                tracing::error!(
                    "Database directory is not writable: {}: {}",
                    parent.display(),
                    e
                );
                return Err(StorageError::Io(e));
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_with(options)
            .await?;

        Self::create_tables(&pool).await?;
        tracing::info!("Tables ready");

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn create_tables(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT UNIQUE,
                password TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                content TEXT,
                author TEXT,
                category TEXT,
                image TEXT,
                date TEXT
            )
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Close the pool, waiting for in-flight statements to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

#[async_trait]
impl UserStore for Database {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, email, password FROM users WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_user(&self, email: &str, password: &str) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (email, password) VALUES (?1, ?2)
            "#,
        )
        .bind(email)
        .bind(password)
        .execute(&*self.pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StorageError::Duplicate(email.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl PostStore for Database {
    async fn insert_post(&self, post: &PostRecord) -> Result<i64> {
        let done = sqlx::query(
            r#"
            INSERT INTO posts (title, content, author, category, image, date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&post.title)
        .bind(&post.content)
        .bind(&post.author)
        .bind(&post.category)
        .bind(&post.image)
        .bind(&post.date)
        .execute(&*self.pool)
        .await?;

        Ok(done.last_insert_rowid())
    }

    async fn list_posts_desc(&self) -> Result<Vec<Post>> {
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT id, title, content, author, category, image, date
            FROM posts ORDER BY id DESC
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn delete_post(&self, id: i64) -> Result<u64> {
        let done = sqlx::query(
            r#"
            DELETE FROM posts WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(done.rows_affected())
    }
}

// Columns are nullable in the schema, so rows written by other tools may hold NULLs
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: Option<String>,
    password: Option<String>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            email: r.email.unwrap_or_default(),
            password: r.password.unwrap_or_default(),
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: Option<String>,
    content: Option<String>,
    author: Option<String>,
    category: Option<String>,
    image: Option<String>,
    date: Option<String>,
}

impl From<PostRow> for Post {
    fn from(r: PostRow) -> Self {
        Post {
            id: r.id,
            title: r.title.unwrap_or_default(),
            content: r.content.unwrap_or_default(),
            author: r.author.unwrap_or_default(),
            category: r.category.unwrap_or_default(),
            image: r.image,
            date: r.date.unwrap_or_default(),
        }
    }
}
