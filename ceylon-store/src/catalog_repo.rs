use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use ceylon_catalog::{CatalogFilter, CatalogItem, CatalogKind};
use ceylon_core::{CatalogRepository, RepoResult, RepositoryError};

use crate::database::{corrupt, db_error};

const ITEM_COLUMNS: &str =
    "id, kind, name, category, price, available, description, city, image, details, created_at, updated_at";

pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CatalogRow {
    id: Uuid,
    kind: String,
    name: String,
    category: String,
    price: f64,
    available: bool,
    description: String,
    city: Option<String>,
    image: Option<String>,
    details: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<CatalogRow> for CatalogItem {
    type Error = RepositoryError;

    fn try_from(row: CatalogRow) -> Result<Self, Self::Error> {
        let kind = row.kind.parse::<CatalogKind>().map_err(|_| corrupt("kind", &row.kind))?;
        Ok(CatalogItem {
            id: row.id,
            kind,
            name: row.name,
            category: row.category,
            price: row.price,
            available: row.available,
            description: row.description,
            city: row.city,
            image: row.image,
            details: row.details,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Appends the optional list filters as bound predicates.
fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &CatalogFilter) {
    if let Some(name) = filter.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
        query.push(" AND name ILIKE ").push_bind(format!("%{}%", escape_like(name)));
    }
    if let Some(category) = &filter.category {
        query.push(" AND category = ").push_bind(category.clone());
    }
    if let Some(city) = &filter.city {
        query.push(" AND LOWER(city) = LOWER(").push_bind(city.clone()).push(")");
    }
    if let Some(max_price) = filter.max_price {
        query.push(" AND price <= ").push_bind(max_price);
    }
    if let Some(available) = filter.available {
        query.push(" AND available = ").push_bind(available);
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn create_item(&self, item: &CatalogItem) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO catalog_items (id, kind, name, category, price, available, description, city, image, details, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(item.id)
        .bind(item.kind.as_str())
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price)
        .bind(item.available)
        .bind(&item.description)
        .bind(&item.city)
        .bind(&item.image)
        .bind(&item.details)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn get_item(&self, kind: CatalogKind, id: Uuid) -> RepoResult<Option<CatalogItem>> {
        let row: Option<CatalogRow> =
            sqlx::query_as(&format!("SELECT {ITEM_COLUMNS} FROM catalog_items WHERE id = $1 AND kind = $2"))
                .bind(id)
                .bind(kind.as_str())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error)?;

        row.map(CatalogItem::try_from).transpose()
    }

    async fn list_items(&self, kind: CatalogKind, filter: &CatalogFilter) -> RepoResult<Vec<CatalogItem>> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {ITEM_COLUMNS} FROM catalog_items WHERE kind = "));
        query.push_bind(kind.as_str());
        push_filter(&mut query, filter);
        query.push(" ORDER BY name");

        let rows: Vec<CatalogRow> = query
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.into_iter().map(CatalogItem::try_from).collect()
    }

    async fn update_item(&self, item: &CatalogItem) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE catalog_items
            SET name = $3, category = $4, price = $5, available = $6, description = $7,
                city = $8, image = $9, details = $10, updated_at = $11
            WHERE id = $1 AND kind = $2
            "#,
        )
        .bind(item.id)
        .bind(item.kind.as_str())
        .bind(&item.name)
        .bind(&item.category)
        .bind(item.price)
        .bind(item.available)
        .bind(&item.description)
        .bind(&item.city)
        .bind(&item.image)
        .bind(&item.details)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_item(&self, kind: CatalogKind, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM catalog_items WHERE id = $1 AND kind = $2")
            .bind(id)
            .bind(kind.as_str())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> RepoResult<u64> {
        let result = sqlx::query("DELETE FROM catalog_items")
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        Ok(result.rows_affected())
    }
}
