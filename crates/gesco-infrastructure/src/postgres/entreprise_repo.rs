use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use gesco_core::domain::{Entreprise, EntrepriseCreate};
use gesco_core::error::DomainError;
use gesco_core::messages;
use gesco_core::repositories::{EntrepriseRepository, PageFilter};

use crate::database::Tx;
use crate::postgres::{db_err, map_db_err};

const COLUMNS: &str = "id, code, raison_sociale, niu, pays, devise_principale, \
     is_active, created_at, updated_at, deleted_at";

pub struct PgEntrepriseRepository {
    tx: Tx,
}

impl PgEntrepriseRepository {
    pub fn new(tx: Tx) -> Self {
        Self { tx }
    }
}

#[derive(Debug, FromRow)]
struct EntrepriseRow {
    id: i64,
    code: String,
    raison_sociale: String,
    niu: Option<String>,
    pays: String,
    devise_principale: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<EntrepriseRow> for Entreprise {
    fn from(row: EntrepriseRow) -> Self {
        Entreprise {
            id: row.id,
            code: row.code,
            raison_sociale: row.raison_sociale,
            niu: row.niu,
            pays: row.pays,
            devise_principale: row.devise_principale,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[async_trait]
impl EntrepriseRepository for PgEntrepriseRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Entreprise>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<EntrepriseRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM entreprises WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_all(&self, filter: &PageFilter) -> Result<Vec<Entreprise>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let rows: Vec<EntrepriseRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM entreprises \
             WHERE deleted_at IS NULL \
               AND (NOT $1 OR is_active) \
               AND ($2::text IS NULL OR code ILIKE '%' || $2 || '%' \
                    OR raison_sociale ILIKE '%' || $2 || '%') \
             ORDER BY code \
             OFFSET $3 LIMIT $4"
        ))
        .bind(filter.actif_only)
        .bind(filter.search.as_deref())
        .bind(filter.skip)
        .bind(filter.limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists_by_code(
        &self,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DomainError> {
        let mut conn = self.tx.conn().await?;
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM entreprises \
             WHERE code = $1 AND deleted_at IS NULL \
               AND ($2::bigint IS NULL OR id <> $2) \
             LIMIT 1",
        )
        .bind(code)
        .bind(exclude_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(found.is_some())
    }

    async fn insert(&self, data: &EntrepriseCreate) -> Result<Entreprise, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: EntrepriseRow = sqlx::query_as(&format!(
            "INSERT INTO entreprises (code, raison_sociale, niu, pays, devise_principale) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(&data.code)
        .bind(&data.raison_sociale)
        .bind(&data.niu)
        .bind(&data.pays)
        .bind(&data.devise_principale)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_db_err(e, messages::ENTREPRISE_CODE_EXISTS))?;
        Ok(row.into())
    }

    async fn update(&self, entreprise: &Entreprise) -> Result<Entreprise, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: EntrepriseRow = sqlx::query_as(&format!(
            "UPDATE entreprises SET \
             raison_sociale = $2, niu = $3, is_active = $4, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(entreprise.id)
        .bind(&entreprise.raison_sociale)
        .bind(&entreprise.niu)
        .bind(entreprise.is_active)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), DomainError> {
        let mut conn = self.tx.conn().await?;
        sqlx::query(
            "UPDATE entreprises SET deleted_at = NOW(), is_active = FALSE \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
