use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use gesco_core::domain::{Tiers, TiersCreate};
use gesco_core::error::DomainError;
use gesco_core::messages;
use gesco_core::repositories::{PageFilter, TiersRepository};

use crate::database::Tx;
use crate::postgres::{db_err, map_db_err};

const COLUMNS: &str = "id, entreprise_id, code, raison_sociale, niu, ville, telephone, \
     email, is_active, created_at, updated_at, deleted_at";

pub struct PgTiersRepository {
    tx: Tx,
}

impl PgTiersRepository {
    pub fn new(tx: Tx) -> Self {
        Self { tx }
    }
}

#[derive(Debug, FromRow)]
struct TiersRow {
    id: i64,
    entreprise_id: i64,
    code: String,
    raison_sociale: String,
    niu: Option<String>,
    ville: Option<String>,
    telephone: Option<String>,
    email: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<TiersRow> for Tiers {
    fn from(row: TiersRow) -> Self {
        Tiers {
            id: row.id,
            entreprise_id: row.entreprise_id,
            code: row.code,
            raison_sociale: row.raison_sociale,
            niu: row.niu,
            ville: row.ville,
            telephone: row.telephone,
            email: row.email,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[async_trait]
impl TiersRepository for PgTiersRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Tiers>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<TiersRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM tiers WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_entreprise(
        &self,
        entreprise_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Tiers>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let rows: Vec<TiersRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM tiers \
             WHERE entreprise_id = $1 AND deleted_at IS NULL \
               AND (NOT $2 OR is_active) \
               AND ($3::text IS NULL OR code ILIKE '%' || $3 || '%' \
                    OR raison_sociale ILIKE '%' || $3 || '%') \
             ORDER BY code \
             OFFSET $4 LIMIT $5"
        ))
        .bind(entreprise_id)
        .bind(filter.actif_only)
        .bind(filter.search.as_deref())
        .bind(filter.skip)
        .bind(filter.limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn exists_by_entreprise_and_code(
        &self,
        entreprise_id: i64,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DomainError> {
        let mut conn = self.tx.conn().await?;
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM tiers \
             WHERE entreprise_id = $1 AND code = $2 AND deleted_at IS NULL \
               AND ($3::bigint IS NULL OR id <> $3) \
             LIMIT 1",
        )
        .bind(entreprise_id)
        .bind(code)
        .bind(exclude_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(found.is_some())
    }

    async fn insert(&self, entreprise_id: i64, data: &TiersCreate) -> Result<Tiers, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: TiersRow = sqlx::query_as(&format!(
            "INSERT INTO tiers (entreprise_id, code, raison_sociale, niu, ville, telephone, email) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        ))
        .bind(entreprise_id)
        .bind(&data.code)
        .bind(&data.raison_sociale)
        .bind(&data.niu)
        .bind(&data.ville)
        .bind(&data.telephone)
        .bind(&data.email)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_db_err(e, messages::TIERS_CODE_EXISTS))?;
        Ok(row.into())
    }

    async fn update(&self, tiers: &Tiers) -> Result<Tiers, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: TiersRow = sqlx::query_as(&format!(
            "UPDATE tiers SET \
             raison_sociale = $2, niu = $3, ville = $4, telephone = $5, \
             email = $6, is_active = $7, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(tiers.id)
        .bind(&tiers.raison_sociale)
        .bind(&tiers.niu)
        .bind(&tiers.ville)
        .bind(&tiers.telephone)
        .bind(&tiers.email)
        .bind(tiers.is_active)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), DomainError> {
        let mut conn = self.tx.conn().await?;
        sqlx::query(
            "UPDATE tiers SET deleted_at = NOW(), is_active = FALSE \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
