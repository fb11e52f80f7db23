use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{totals_from_entries, Itinerary, ItineraryEntry};
use crate::store::ItineraryStore;

const SELECT_ITINERARY: &str =
    "SELECT id, user_id, title, created_at, entries FROM itineraries";

/// Store backed by the itineraries table
///
/// Entries live in a JSONB column; totals are re-derived from them on
/// every read instead of trusting the denormalized columns.
pub struct PgItineraryStore {
    pool: PgPool,
}

impl PgItineraryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ItineraryRow {
    id: Uuid,
    user_id: String,
    title: String,
    created_at: DateTime<Utc>,
    entries: serde_json::Value,
}

impl TryFrom<ItineraryRow> for Itinerary {
    type Error = AppError;

    fn try_from(row: ItineraryRow) -> Result<Self, Self::Error> {
        let entries: Vec<ItineraryEntry> = serde_json::from_value(row.entries).map_err(|e| {
            AppError::Internal(format!(
                "itinerary '{}' has malformed entries: {}",
                row.id, e
            ))
        })?;
        let totals = totals_from_entries(&entries);

        Ok(Itinerary {
            id: row.id,
            user_id: row.user_id,
            title: row.title,
            created_at: row.created_at,
            entries,
            total_days: totals.days,
            total_cost: totals.cost,
        })
    }
}

#[async_trait]
impl ItineraryStore for PgItineraryStore {
    async fn create(&self, itinerary: Itinerary) -> AppResult<Itinerary> {
        let entries = serde_json::to_value(&itinerary.entries)
            .map_err(|e| AppError::Internal(format!("entry serialization failed: {}", e)))?;

        sqlx::query(
            "INSERT INTO itineraries (id, user_id, title, created_at, entries, total_days, total_cost) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(itinerary.id)
        .bind(&itinerary.user_id)
        .bind(&itinerary.title)
        .bind(itinerary.created_at)
        .bind(entries)
        .bind(itinerary.total_days as i32)
        .bind(itinerary.total_cost)
        .execute(&self.pool)
        .await?;

        Ok(itinerary)
    }

    async fn list_by_user(&self, user_id: &str) -> AppResult<Vec<Itinerary>> {
        let sql = format!(
            "{} WHERE user_id = $1 ORDER BY created_at DESC",
            SELECT_ITINERARY
        );
        let rows = sqlx::query_as::<_, ItineraryRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Itinerary::try_from).collect()
    }

    async fn get(&self, id: Uuid, requesting_user_id: &str) -> AppResult<Itinerary> {
        let sql = format!("{} WHERE id = $1 AND user_id = $2", SELECT_ITINERARY);
        let row = sqlx::query_as::<_, ItineraryRow>(&sql)
            .bind(id)
            .bind(requesting_user_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Itinerary::try_from(row),
            None => Err(AppError::NotFound(format!("itinerary '{}' not found", id))),
        }
    }

    async fn delete(&self, id: Uuid, requesting_user_id: &str) -> AppResult<()> {
        // Ownership check and delete under one transaction so the
        // Forbidden path cannot race a concurrent owner delete
        let mut tx = self.pool.begin().await?;

        let owner: Option<String> =
            sqlx::query_scalar("SELECT user_id FROM itineraries WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let owner =
            owner.ok_or_else(|| AppError::NotFound(format!("itinerary '{}' not found", id)))?;
        if owner != requesting_user_id {
            return Err(AppError::Forbidden(
                "itinerary belongs to another user".to_string(),
            ));
        }

        sqlx::query("DELETE FROM itineraries WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        Ok(())
    }
}
