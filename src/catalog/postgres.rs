use async_trait::async_trait;
use sqlx::PgPool;

use crate::catalog::{CatalogAccessor, DestinationFilter};
use crate::error::{AppError, AppResult};
use crate::models::{Category, Destination, GeoPoint, Season};

const SELECT_DESTINATION: &str = "SELECT id, name, location, category, difficulty, \
     avg_cost_per_day, duration_days, best_season, altitude_m, latitude, longitude, \
     popularity, permit_required, description, activities FROM destinations";

/// Catalog backed by the destinations table
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Raw row shape; enum columns arrive as text and are parsed on the
/// way out so a bad value surfaces as an internal error, not a panic
#[derive(Debug, sqlx::FromRow)]
struct DestinationRow {
    id: String,
    name: String,
    location: String,
    category: String,
    difficulty: i16,
    avg_cost_per_day: f64,
    duration_days: i32,
    best_season: String,
    altitude_m: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    popularity: f64,
    permit_required: bool,
    description: String,
    activities: Vec<String>,
}

impl TryFrom<DestinationRow> for Destination {
    type Error = AppError;

    fn try_from(row: DestinationRow) -> Result<Self, Self::Error> {
        let category = Category::from_token(&row.category).ok_or_else(|| {
            AppError::Internal(format!(
                "destination '{}' has unknown category '{}'",
                row.id, row.category
            ))
        })?;
        let best_season = Season::from_token(&row.best_season).ok_or_else(|| {
            AppError::Internal(format!(
                "destination '{}' has unknown season '{}'",
                row.id, row.best_season
            ))
        })?;

        let coordinates = match (row.latitude, row.longitude) {
            (Some(lat), Some(lon)) => Some(GeoPoint { lat, lon }),
            _ => None,
        };

        Ok(Destination {
            id: row.id,
            name: row.name,
            location: row.location,
            category,
            difficulty: row.difficulty as u8,
            avg_cost_per_day: row.avg_cost_per_day,
            duration_days: row.duration_days as u32,
            best_season,
            altitude_m: row.altitude_m,
            coordinates,
            popularity: row.popularity,
            permit_required: row.permit_required,
            description: row.description,
            activities: row.activities,
        })
    }
}

#[async_trait]
impl CatalogAccessor for PgCatalog {
    async fn list(&self, filter: &DestinationFilter) -> AppResult<Vec<Destination>> {
        // Clause list and bind order must stay in sync; the running
        // index numbers the placeholders
        let mut clauses: Vec<String> = Vec::new();
        let mut next_param = 1usize;

        if filter.category.is_some() {
            clauses.push(format!("category = ${}", next_param));
            next_param += 1;
        }
        if filter.difficulty.is_some() {
            clauses.push(format!("difficulty = ${}", next_param));
            next_param += 1;
        }
        if filter.min_cost.is_some() {
            clauses.push(format!("avg_cost_per_day >= ${}", next_param));
            next_param += 1;
        }
        if filter.max_cost.is_some() {
            clauses.push(format!("avg_cost_per_day <= ${}", next_param));
            next_param += 1;
        }
        if filter.season.is_some() {
            clauses.push(format!("best_season = ${}", next_param));
            next_param += 1;
        }
        if filter.search.is_some() {
            clauses.push(format!(
                "(name ILIKE ${n} OR description ILIKE ${n} OR location ILIKE ${n})",
                n = next_param
            ));
            next_param += 1;
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let limit_sql = if filter.limit.is_some() {
            let sql = format!(" LIMIT ${}", next_param);
            next_param += 1;
            sql
        } else {
            String::new()
        };
        let offset_sql = format!(" OFFSET ${}", next_param);

        let sql = format!(
            "{}{} ORDER BY id{}{}",
            SELECT_DESTINATION, where_sql, limit_sql, offset_sql
        );

        let mut query = sqlx::query_as::<_, DestinationRow>(&sql);
        if let Some(category) = filter.category {
            query = query.bind(category.as_str());
        }
        if let Some(difficulty) = filter.difficulty {
            query = query.bind(difficulty as i16);
        }
        if let Some(min_cost) = filter.min_cost {
            query = query.bind(min_cost);
        }
        if let Some(max_cost) = filter.max_cost {
            query = query.bind(max_cost);
        }
        if let Some(season) = filter.season {
            query = query.bind(season.as_str());
        }
        if let Some(search) = &filter.search {
            query = query.bind(format!("%{}%", search));
        }
        if let Some(limit) = filter.limit {
            query = query.bind(limit as i64);
        }
        query = query.bind(filter.skip as i64);

        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(Destination::try_from).collect()
    }

    async fn get(&self, id: &str) -> AppResult<Destination> {
        let sql = format!("{} WHERE id = $1", SELECT_DESTINATION);
        let row = sqlx::query_as::<_, DestinationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Destination::try_from(row),
            None => Err(AppError::NotFound(format!(
                "destination '{}' not found",
                id
            ))),
        }
    }

    async fn count(&self) -> AppResult<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM destinations")
            .fetch_one(&self.pool)
            .await?;
        Ok(total as u64)
    }

    async fn top_by_popularity(&self, limit: usize) -> AppResult<Vec<Destination>> {
        let sql = format!(
            "{} ORDER BY popularity DESC, id ASC LIMIT $1",
            SELECT_DESTINATION
        );
        let rows = sqlx::query_as::<_, DestinationRow>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(Destination::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_row() -> DestinationRow {
        DestinationRow {
            id: "upper-mustang".to_string(),
            name: "Upper Mustang Trek".to_string(),
            location: "Mustang".to_string(),
            category: "trekking".to_string(),
            difficulty: 4,
            avg_cost_per_day: 55.0,
            duration_days: 12,
            best_season: "autumn".to_string(),
            altitude_m: Some(3840.0),
            latitude: Some(29.18),
            longitude: Some(83.96),
            popularity: 72.0,
            permit_required: true,
            description: "Restricted-area trek through the old kingdom of Lo".to_string(),
            activities: vec!["trekking".to_string(), "monastery visits".to_string()],
        }
    }

    #[test]
    fn test_row_converts_to_destination() {
        let destination = Destination::try_from(create_test_row()).unwrap();

        assert_eq!(destination.id, "upper-mustang");
        assert_eq!(destination.category, Category::Trekking);
        assert_eq!(destination.best_season, Season::Autumn);
        assert_eq!(destination.difficulty, 4);
        assert_eq!(destination.duration_days, 12);
        let coordinates = destination.coordinates.unwrap();
        assert_eq!(coordinates.lat, 29.18);
        assert_eq!(coordinates.lon, 83.96);
    }

    #[test]
    fn test_row_with_legacy_season_alias() {
        let mut row = create_test_row();
        row.best_season = "all".to_string();

        let destination = Destination::try_from(row).unwrap();
        assert_eq!(destination.best_season, Season::Any);
    }

    #[test]
    fn test_row_with_unknown_category_is_internal_error() {
        let mut row = create_test_row();
        row.category = "spelunking".to_string();

        let err = Destination::try_from(row).unwrap_err();
        assert!(matches!(err, AppError::Internal(msg) if msg.contains("spelunking")));
    }

    #[test]
    fn test_partial_coordinates_drop_to_none() {
        let mut row = create_test_row();
        row.longitude = None;

        let destination = Destination::try_from(row).unwrap();
        assert!(destination.coordinates.is_none());
    }
}
