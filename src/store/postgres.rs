use std::collections::HashSet;

use async_trait::async_trait;
use geo_types::Geometry;
use geozero::wkb;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    Acquire, Executor, Pool, Postgres, QueryBuilder, Row,
};

use super::{CategoryStore, FavoriteStore, GeoIndexStore};
use crate::{
    entities::{
        Category, Coordinates, Favorite, FavoriteAdded, FavoriteEntry, FavoriteId, Place, PlaceId,
        PlaceSummary, SearchResult, UserId,
    },
    error::Error,
    search::{Clause, PageWindow, SearchFilter},
};

type Database = Postgres;

const SRID: i32 = 4326;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: Pool<Database>,
}

impl PgStore {
    #[tracing::instrument(name = "PgStore::new", skip(db_uri))]
    pub async fn new(db_uri: &str, max_connections: u32) -> Result<Self, Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(db_uri)
            .await?;

        Ok(Self { pool })
    }

    /// Creates the tables and indexes if they are missing. Never drops data.
    #[tracing::instrument(name = "PgStore::ensure_schema", skip(self))]
    pub async fn ensure_schema(&self) -> Result<(), Error> {
        self.pool
            .execute("CREATE EXTENSION IF NOT EXISTS postgis")
            .await?;

        self.pool
            .execute("CREATE TABLE IF NOT EXISTS categories (id BIGSERIAL PRIMARY KEY, name VARCHAR NOT NULL, slug VARCHAR NOT NULL UNIQUE)")
            .await?;

        self.pool
            .execute("CREATE TABLE IF NOT EXISTS places (id BIGSERIAL PRIMARY KEY, name VARCHAR NOT NULL, category_id BIGINT NOT NULL REFERENCES categories(id), location geometry(Point, 4326) NOT NULL, created_at TIMESTAMPTZ NOT NULL DEFAULT now(), updated_at TIMESTAMPTZ NOT NULL DEFAULT now())")
            .await?;
        self.pool
            .execute("CREATE INDEX IF NOT EXISTS places_location_idx ON places USING GIST (location)")
            .await?;
        self.pool
            .execute("CREATE INDEX IF NOT EXISTS places_category_id_idx ON places (category_id)")
            .await?;

        self.pool
            .execute("CREATE TABLE IF NOT EXISTS favorites (id BIGSERIAL PRIMARY KEY, user_id BIGINT NOT NULL, place_id BIGINT NOT NULL REFERENCES places(id) ON DELETE CASCADE, created_at TIMESTAMPTZ NOT NULL DEFAULT now(), CONSTRAINT favorites_user_place_key UNIQUE (user_id, place_id))")
            .await?;

        Ok(())
    }
}

/// Escapes LIKE wildcards so the keyword matches as a plain substring.
fn like_pattern(keyword: &str) -> String {
    let mut escaped = String::with_capacity(keyword.len() + 2);
    escaped.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

fn push_center(builder: &mut QueryBuilder<'_, Database>, center: Coordinates) {
    let center: Geometry<f64> = center.into();

    builder
        .push("ST_SetSRID(")
        .push_bind(wkb::Encode(center))
        .push(", ")
        .push_bind(SRID)
        .push(")");
}

fn push_filter(builder: &mut QueryBuilder<'_, Database>, filter: &SearchFilter) {
    builder.push(" WHERE ");

    for (i, clause) in filter.clauses().iter().enumerate() {
        if i > 0 {
            builder.push(" AND ");
        }

        match clause {
            Clause::WithinRadius {
                center,
                radius_meters,
                bounds,
            } => {
                if let Some(bounds) = bounds {
                    builder
                        .push("p.location && ST_MakeEnvelope(")
                        .push_bind(bounds.min_lng)
                        .push(", ")
                        .push_bind(bounds.min_lat)
                        .push(", ")
                        .push_bind(bounds.max_lng)
                        .push(", ")
                        .push_bind(bounds.max_lat)
                        .push(", ")
                        .push_bind(SRID)
                        .push(") AND ");
                }

                builder.push("ST_DistanceSphere(p.location, ");
                push_center(builder, *center);
                builder.push(") <= ").push_bind(*radius_meters);
            }
            Clause::CategoryEquals(category_id) => {
                builder.push("p.category_id = ").push_bind(*category_id);
            }
            Clause::NameContains(keyword) => {
                builder
                    .push("p.name ILIKE ")
                    .push_bind(like_pattern(keyword));
            }
        }
    }
}

/// `FROM .. WHERE ..` selecting the candidate set. Count and fetch both
/// open with it, so their binds are numbered the same way.
fn push_candidates(builder: &mut QueryBuilder<'_, Database>, filter: &SearchFilter) {
    builder.push(" FROM places p JOIN categories c ON c.id = p.category_id");
    push_filter(builder, filter);
}

fn count_query(filter: &SearchFilter) -> QueryBuilder<'static, Database> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) AS total");
    push_candidates(&mut builder, filter);
    builder
}

fn fetch_query(filter: &SearchFilter, window: PageWindow) -> QueryBuilder<'static, Database> {
    let mut builder = QueryBuilder::new(
        "WITH candidates AS (SELECT p.id, p.name, p.category_id, p.location, c.name AS category_name",
    );
    push_candidates(&mut builder, filter);
    builder.push(
        ") SELECT id, name, category_id, ST_Y(location) AS lat, ST_X(location) AS lng, category_name, ST_DistanceSphere(location, ",
    );
    push_center(&mut builder, filter.center());
    builder
        .push(") AS distance FROM candidates ORDER BY distance ASC, id ASC LIMIT ")
        .push_bind(window.limit)
        .push(" OFFSET ")
        .push_bind(window.offset);
    builder
}

fn favorite_from_row(row: &PgRow) -> Result<Favorite, Error> {
    Ok(Favorite {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        place_id: row.try_get("place_id")?,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl GeoIndexStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn count_places(&self, filter: &SearchFilter) -> Result<u64, Error> {
        let mut builder = count_query(filter);

        let total: i64 = builder
            .build()
            .fetch_one(&self.pool)
            .await?
            .try_get("total")?;

        Ok(total.max(0) as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_places(
        &self,
        filter: &SearchFilter,
        window: PageWindow,
    ) -> Result<Vec<SearchResult>, Error> {
        let mut builder = fetch_query(filter, window);

        let rows = builder.build().fetch_all(&self.pool).await?;

        let mut results = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            results.push(SearchResult {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                category_id: row.try_get("category_id")?,
                location: Coordinates::new(row.try_get("lat")?, row.try_get("lng")?),
                distance_meters: row.try_get("distance")?,
                category_name: row.try_get("category_name")?,
                is_favorited: None,
            });
        }

        tracing::debug!(rows = results.len(), "fetched places");

        Ok(results)
    }

    #[tracing::instrument(skip(self))]
    async fn favorited_place_ids(
        &self,
        user_id: UserId,
        place_ids: &[PlaceId],
    ) -> Result<HashSet<PlaceId>, Error> {
        if place_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(
                    "SELECT place_id FROM favorites WHERE user_id = $1 AND place_id = ANY($2)",
                )
                .bind(user_id)
                .bind(place_ids.to_vec()),
            )
            .await?;

        let mut favorited = HashSet::with_capacity(rows.len());

        for row in rows.iter() {
            favorited.insert(row.try_get("place_id")?);
        }

        Ok(favorited)
    }
}

#[async_trait]
impl FavoriteStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn add_favorite(
        &self,
        user_id: UserId,
        place_id: PlaceId,
    ) -> Result<Option<FavoriteAdded>, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        // lock the place so it cannot vanish between the check and the insert
        let maybe_place = tx
            .fetch_optional(sqlx::query("SELECT id FROM places WHERE id = $1 FOR SHARE").bind(place_id))
            .await?;

        if maybe_place.is_none() {
            return Ok(None);
        }

        let maybe_created = tx
            .fetch_optional(
                sqlx::query(
                    "INSERT INTO favorites (user_id, place_id) VALUES ($1, $2) ON CONFLICT (user_id, place_id) DO NOTHING RETURNING id, user_id, place_id, created_at",
                )
                .bind(user_id)
                .bind(place_id),
            )
            .await?;

        let added = match maybe_created {
            Some(row) => FavoriteAdded::Created(favorite_from_row(&row)?),
            None => {
                let row = tx
                    .fetch_one(
                        sqlx::query(
                            "SELECT id, user_id, place_id, created_at FROM favorites WHERE user_id = $1 AND place_id = $2",
                        )
                        .bind(user_id)
                        .bind(place_id),
                    )
                    .await?;

                FavoriteAdded::Existing(favorite_from_row(&row)?)
            }
        };

        tx.commit().await?;

        Ok(Some(added))
    }

    #[tracing::instrument(skip(self))]
    async fn remove_favorite(
        &self,
        user_id: UserId,
        favorite_id: FavoriteId,
    ) -> Result<bool, Error> {
        let mut conn = self.pool.acquire().await?;

        let result = conn
            .execute(
                sqlx::query("DELETE FROM favorites WHERE id = $1 AND user_id = $2")
                    .bind(favorite_id)
                    .bind(user_id),
            )
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self))]
    async fn favorite_exists(&self, user_id: UserId, place_id: PlaceId) -> Result<bool, Error> {
        let mut conn = self.pool.acquire().await?;

        let favorited: bool = conn
            .fetch_one(
                sqlx::query(
                    "SELECT EXISTS (SELECT 1 FROM favorites WHERE user_id = $1 AND place_id = $2) AS favorited",
                )
                .bind(user_id)
                .bind(place_id),
            )
            .await?
            .try_get("favorited")?;

        Ok(favorited)
    }

    #[tracing::instrument(skip(self))]
    async fn count_favorites(&self, user_id: UserId) -> Result<u64, Error> {
        let mut conn = self.pool.acquire().await?;

        let total: i64 = conn
            .fetch_one(
                sqlx::query("SELECT COUNT(*) AS total FROM favorites WHERE user_id = $1")
                    .bind(user_id),
            )
            .await?
            .try_get("total")?;

        Ok(total.max(0) as u64)
    }

    #[tracing::instrument(skip(self))]
    async fn list_favorites(
        &self,
        user_id: UserId,
        window: PageWindow,
    ) -> Result<Vec<FavoriteEntry>, Error> {
        let query = "
            SELECT
                f.id,
                f.place_id,
                f.created_at,
                p.name,
                p.category_id,
                ST_Y(p.location) AS lat,
                ST_X(p.location) AS lng,
                p.created_at AS place_created_at,
                p.updated_at AS place_updated_at,
                c.name AS category_name
            FROM
                favorites f
                JOIN places p ON p.id = f.place_id
                JOIN categories c ON c.id = p.category_id
            WHERE
                f.user_id = $1
            ORDER BY
                f.created_at DESC,
                f.id DESC
            LIMIT $2 OFFSET $3
        ";

        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(
                sqlx::query(query)
                    .bind(user_id)
                    .bind(window.limit)
                    .bind(window.offset),
            )
            .await?;

        let mut entries = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            let place_id: PlaceId = row.try_get("place_id")?;

            entries.push(FavoriteEntry {
                id: row.try_get("id")?,
                place_id,
                place: PlaceSummary {
                    place: Place {
                        id: place_id,
                        name: row.try_get("name")?,
                        category_id: row.try_get("category_id")?,
                        location: Coordinates::new(row.try_get("lat")?, row.try_get("lng")?),
                        created_at: row.try_get("place_created_at")?,
                        updated_at: row.try_get("place_updated_at")?,
                    },
                    category_name: row.try_get("category_name")?,
                },
                created_at: row.try_get("created_at")?,
            });
        }

        Ok(entries)
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    #[tracing::instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>, Error> {
        let mut conn = self.pool.acquire().await?;

        let rows = conn
            .fetch_all(sqlx::query(
                "SELECT id, name, slug FROM categories ORDER BY name ASC",
            ))
            .await?;

        let mut categories = Vec::with_capacity(rows.len());

        for row in rows.iter() {
            categories.push(Category {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                slug: row.try_get("slug")?,
            });
        }

        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchFilterBuilder;
    use assert_matches::assert_matches;

    const NYC: Coordinates = Coordinates {
        lat: 40.7128,
        lng: -74.0060,
    };

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Coffee"), "%Coffee%");
        assert_eq!(like_pattern("100%_pure"), "%100\\%\\_pure%");
        assert_eq!(like_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn count_query_renders_clauses_in_order() {
        let filter = SearchFilterBuilder::new(NYC, 5_000.0)
            .category(Some(3))
            .keyword(Some("coffee"))
            .build();

        let builder = count_query(&filter);

        assert_eq!(
            builder.sql(),
            "SELECT COUNT(*) AS total FROM places p JOIN categories c ON c.id = p.category_id \
             WHERE p.location && ST_MakeEnvelope($1, $2, $3, $4, $5) \
             AND ST_DistanceSphere(p.location, ST_SetSRID($6, $7)) <= $8 \
             AND p.category_id = $9 AND p.name ILIKE $10"
        );
    }

    #[test]
    fn fetch_query_shares_the_count_predicate() {
        let filter = SearchFilterBuilder::new(NYC, 5_000.0)
            .category(Some(3))
            .keyword(Some("coffee"))
            .build();
        let window = PageWindow {
            limit: 2,
            offset: 6,
        };

        let count = count_query(&filter);
        let fetch = fetch_query(&filter, window);

        let candidates = &count.sql()[count.sql().find(" FROM places p").unwrap()..];
        assert!(fetch.sql().starts_with(&format!(
            "WITH candidates AS (SELECT p.id, p.name, p.category_id, p.location, \
             c.name AS category_name{}) SELECT ",
            candidates
        )));
        assert!(fetch.sql().ends_with(
            "ST_DistanceSphere(location, ST_SetSRID($11, $12)) AS distance \
             FROM candidates ORDER BY distance ASC, id ASC LIMIT $13 OFFSET $14"
        ));
    }

    #[test]
    fn envelope_is_omitted_without_bounds() {
        let filter = SearchFilterBuilder::new(Coordinates::new(0.0, 179.99), 5_000.0).build();
        assert_matches!(
            filter.clauses()[0],
            Clause::WithinRadius { bounds: None, .. }
        );

        let builder = count_query(&filter);

        assert!(!builder.sql().contains("ST_MakeEnvelope"));
        assert!(builder
            .sql()
            .ends_with("WHERE ST_DistanceSphere(p.location, ST_SetSRID($1, $2)) <= $3"));
    }

    #[test]
    #[ignore = "requires a PostGIS database at DATABASE_URL"]
    fn ensure_schema_against_live_database() {
        use tokio_test::block_on;

        let db_uri = std::env::var("DATABASE_URL").unwrap();
        let store = block_on(PgStore::new(&db_uri, 5)).unwrap();

        block_on(store.ensure_schema()).unwrap();
        block_on(store.list_categories()).unwrap();
    }
}
