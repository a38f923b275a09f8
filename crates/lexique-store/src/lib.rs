use chrono::Utc;
use lexique_config::database::DatabaseConfig;
use lexique_types::{MetadataUpdate, NewWord, Word, WordFilter};
use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, query, query_as, query_scalar};

use crate::row::{COLUMNS, WordRow};

mod row;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Could not encode examples: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Word {id} is corrupt: {reason}")]
    Corrupt { id: i64, reason: String },
}

/// SQLite-backed vocabulary table
#[derive(Clone)]
pub struct WordStore {
    pool: SqlitePool,
}

/// Case-insensitive identity used for upserts
fn lookup_key(original_word: &str) -> String {
    original_word.trim().to_lowercase()
}

impl WordStore {
    /// Open (creating if needed) the configured database and run migrations
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config.url.as_str();

        if !url.contains(":memory:") && !Sqlite::database_exists(url).await.unwrap_or(false) {
            tracing::info!("Creating database {}", url);
            Sqlite::create_database(url).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .connect(url)
            .await?;

        Self::migrate(pool).await
    }

    /// Private database that lives as long as the store
    pub async fn connect_in_memory() -> Result<Self, StoreError> {
        // One connection that never recycles, or the data goes with it
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::migrate(pool).await
    }

    async fn migrate(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::migrate!().run(&pool).await?;
        Ok(Self { pool })
    }

    /// Insert a word, or refresh the content of the one with the same lookup key.
    /// A refresh keeps id, familiarity and created_at.
    pub async fn upsert(&self, word: &NewWord) -> Result<Word, StoreError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO words (lookup_key, original_word, french_word, english_translation, \
                french_explanation, english_examples, french_examples, difficulty_level, \
                cefr_level, part_of_speech, familiarity, prompt_used, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'New', ?, ?, ?) \
             ON CONFLICT(lookup_key) DO UPDATE SET \
                original_word = excluded.original_word, \
                french_word = excluded.french_word, \
                english_translation = excluded.english_translation, \
                french_explanation = excluded.french_explanation, \
                english_examples = excluded.english_examples, \
                french_examples = excluded.french_examples, \
                difficulty_level = excluded.difficulty_level, \
                cefr_level = excluded.cefr_level, \
                part_of_speech = excluded.part_of_speech, \
                prompt_used = excluded.prompt_used, \
                updated_at = excluded.updated_at \
             RETURNING {COLUMNS}"
        );

        let row: WordRow = query_as(&sql)
            .bind(lookup_key(&word.original_word))
            .bind(word.original_word.trim())
            .bind(&word.french_word)
            .bind(&word.english_translation)
            .bind(&word.french_explanation)
            .bind(serde_json::to_string(&word.english_examples)?)
            .bind(serde_json::to_string(&word.french_examples)?)
            .bind(word.difficulty_level.as_str())
            .bind(word.cefr_level.map(|level| level.as_str()))
            .bind(word.part_of_speech.as_deref())
            .bind(&word.prompt_used)
            .bind(now)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!(id = row.id, word = %row.original_word, "Saved word");
        row.try_into()
    }

    pub async fn get(&self, id: i64) -> Result<Option<Word>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM words WHERE id = ?");
        let row: Option<WordRow> = query_as(&sql).bind(id).fetch_optional(&self.pool).await?;
        row.map(Word::try_from).transpose()
    }

    /// Newest first, narrowed by the filter's equality conditions
    pub async fn list(&self, filter: WordFilter) -> Result<Vec<Word>, StoreError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM words"));
        let mut clause = " WHERE ";

        if let Some(difficulty) = filter.difficulty_level {
            builder
                .push(clause)
                .push("difficulty_level = ")
                .push_bind(difficulty.as_str());
            clause = " AND ";
        }
        if let Some(familiarity) = filter.familiarity {
            builder
                .push(clause)
                .push("familiarity = ")
                .push_bind(familiarity.as_str());
        }
        builder.push(" ORDER BY created_at DESC, id DESC");

        let rows: Vec<WordRow> = builder.build_query_as().fetch_all(&self.pool).await?;
        rows.into_iter().map(Word::try_from).collect()
    }

    /// Change difficulty and familiarity. `None` when the id is unknown.
    pub async fn update_metadata(
        &self,
        id: i64,
        update: MetadataUpdate,
    ) -> Result<Option<Word>, StoreError> {
        let sql = format!(
            "UPDATE words SET difficulty_level = ?, familiarity = ?, updated_at = ? \
             WHERE id = ? RETURNING {COLUMNS}"
        );
        let row: Option<WordRow> = query_as(&sql)
            .bind(update.difficulty_level.as_str())
            .bind(update.familiarity.as_str())
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Word::try_from).transpose()
    }

    /// Attempt to remove a word, returns true if the word was removed
    pub async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = query("DELETE FROM words WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        Ok(query_scalar("SELECT COUNT(*) FROM words")
            .fetch_one(&self.pool)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use lexique_types::{CefrLevel, DifficultyLevel, Examples, Familiarity};

    use super::*;

    fn new_word(original: &str) -> NewWord {
        NewWord {
            original_word: original.to_string(),
            french_word: original.to_lowercase(),
            english_translation: format!("{original} in English"),
            french_explanation: String::new(),
            english_examples: Examples::from_vec(vec!["One.".into(), "Two.".into(), "Three.".into()]),
            french_examples: Examples::from_vec(vec!["Un.".into()]),
            difficulty_level: DifficultyLevel::Beginner,
            cefr_level: Some(CefrLevel::A1),
            part_of_speech: Some("noun".to_string()),
            prompt_used: format!("Define {original}"),
        }
    }

    #[tokio::test]
    async fn upsert_and_get() {
        let store = WordStore::connect_in_memory().await.unwrap();
        let saved = store.upsert(&new_word("Chat")).await.unwrap();

        assert_eq!(saved.familiarity, Familiarity::New);
        assert_eq!(saved.french_examples.as_slice(), ["Un.", "", ""]);
        assert_eq!(saved.cefr_level, Some(CefrLevel::A1));

        let fetched = store.get(saved.id).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
        assert!(store.get(saved.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn resave_keeps_identity_and_progress() {
        let store = WordStore::connect_in_memory().await.unwrap();
        let first = store.upsert(&new_word("chat")).await.unwrap();
        store
            .update_metadata(
                first.id,
                MetadataUpdate {
                    difficulty_level: DifficultyLevel::Beginner,
                    familiarity: Familiarity::Learning,
                },
            )
            .await
            .unwrap();

        let mut again = new_word(" CHAT ");
        again.english_translation = "cat".to_string();
        again.difficulty_level = DifficultyLevel::Advanced;
        let second = store.upsert(&again).await.unwrap();

        assert_eq!(second.id, first.id);
        assert_eq!(second.original_word, "CHAT");
        assert_eq!(second.english_translation, "cat");
        assert_eq!(second.difficulty_level, DifficultyLevel::Advanced);
        assert_eq!(second.familiarity, Familiarity::Learning);
        assert_eq!(second.created_at, first.created_at);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn delete_existing_and_unknown() {
        let store = WordStore::connect_in_memory().await.unwrap();
        let keep = store.upsert(&new_word("chien")).await.unwrap();
        let gone = store.upsert(&new_word("chat")).await.unwrap();

        assert!(store.delete(gone.id).await.unwrap());
        assert!(store.get(gone.id).await.unwrap().is_none());
        assert!(store.get(keep.id).await.unwrap().is_some());

        assert!(!store.delete(gone.id).await.unwrap());
        assert!(!store.delete(9999).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_filters_newest_first() {
        let store = WordStore::connect_in_memory().await.unwrap();
        let mut ids = Vec::new();
        for word in ["un", "deux", "trois", "quatre"] {
            ids.push(store.upsert(&new_word(word)).await.unwrap().id);
        }

        let mastered = MetadataUpdate {
            difficulty_level: DifficultyLevel::Intermediate,
            familiarity: Familiarity::Mastered,
        };
        store.update_metadata(ids[0], mastered).await.unwrap();
        store.update_metadata(ids[2], mastered).await.unwrap();

        let listed: Vec<i64> = store
            .list(WordFilter::familiarity(Familiarity::Mastered))
            .await
            .unwrap()
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(listed, vec![ids[2], ids[0]]);

        let all: Vec<i64> = store
            .list(WordFilter::default())
            .await
            .unwrap()
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(all, ids.iter().rev().copied().collect::<Vec<_>>());

        let both = WordFilter {
            difficulty_level: Some(DifficultyLevel::Beginner),
            familiarity: Some(Familiarity::Mastered),
        };
        assert!(store.list(both).await.unwrap().is_empty());
        assert_eq!(
            store
                .list(WordFilter::difficulty(DifficultyLevel::Beginner))
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn update_unknown_id_is_none() {
        let store = WordStore::connect_in_memory().await.unwrap();
        let update = MetadataUpdate {
            difficulty_level: DifficultyLevel::Advanced,
            familiarity: Familiarity::Familiar,
        };
        assert!(store.update_metadata(42, update).await.unwrap().is_none());
    }
}
