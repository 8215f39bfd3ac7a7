use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use gesco_core::domain::{Licence, LicenceType, NewLicence};
use gesco_core::error::DomainError;
use gesco_core::messages;
use gesco_core::repositories::{LicenceFilter, LicenceRepository};

use crate::database::Tx;
use crate::postgres::{db_err, map_db_err};

const COLUMNS: &str = "id, entreprise_id, licence_key, licence_type, starts_on, ends_on, \
     is_enabled, extensions_used, activated_at, created_at, updated_at";

pub struct PgLicenceRepository {
    tx: Tx,
}

impl PgLicenceRepository {
    pub fn new(tx: Tx) -> Self {
        Self { tx }
    }
}

#[derive(Debug, FromRow)]
struct LicenceRow {
    id: i64,
    entreprise_id: i64,
    licence_key: String,
    licence_type: String,
    starts_on: NaiveDate,
    ends_on: NaiveDate,
    is_enabled: bool,
    extensions_used: i32,
    activated_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<LicenceRow> for Licence {
    fn from(row: LicenceRow) -> Self {
        Licence {
            id: row.id,
            entreprise_id: row.entreprise_id,
            licence_key: row.licence_key,
            licence_type: LicenceType::parse(&row.licence_type).unwrap_or_default(),
            starts_on: row.starts_on,
            ends_on: row.ends_on,
            is_enabled: row.is_enabled,
            extensions_used: row.extensions_used,
            activated_at: row.activated_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl LicenceRepository for PgLicenceRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Licence>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<LicenceRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM licences WHERE id = $1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_valid_for_entreprise(
        &self,
        entreprise_id: i64,
        today: NaiveDate,
    ) -> Result<Option<Licence>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<LicenceRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM licences \
             WHERE entreprise_id = $1 AND is_enabled AND ends_on >= $2 \
             ORDER BY ends_on DESC \
             LIMIT 1"
        ))
        .bind(entreprise_id)
        .bind(today)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_latest_for_entreprise(
        &self,
        entreprise_id: i64,
    ) -> Result<Option<Licence>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<LicenceRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM licences \
             WHERE entreprise_id = $1 \
             ORDER BY ends_on DESC \
             LIMIT 1"
        ))
        .bind(entreprise_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_all(&self, filter: &LicenceFilter) -> Result<Vec<Licence>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let rows: Vec<LicenceRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM licences \
             WHERE ($1::bigint IS NULL OR entreprise_id = $1) \
               AND (NOT $2 OR is_enabled) \
               AND ($3::date IS NULL OR (is_enabled AND ends_on >= $3)) \
             ORDER BY ends_on DESC \
             OFFSET $4 LIMIT $5"
        ))
        .bind(filter.entreprise_id)
        .bind(filter.actif_only)
        .bind(filter.valide_on)
        .bind(filter.skip)
        .bind(filter.limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_entreprise_and_key(
        &self,
        entreprise_id: i64,
        key: &str,
    ) -> Result<Option<Licence>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<LicenceRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM licences WHERE entreprise_id = $1 AND licence_key = $2"
        ))
        .bind(entreprise_id)
        .bind(key)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn insert(&self, licence: &NewLicence) -> Result<Licence, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: LicenceRow = sqlx::query_as(&format!(
            "INSERT INTO licences (entreprise_id, licence_key, licence_type, starts_on, ends_on) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(licence.entreprise_id)
        .bind(&licence.licence_key)
        .bind(licence.licence_type.as_str())
        .bind(licence.starts_on)
        .bind(licence.ends_on)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_db_err(e, messages::LICENCE_CLE_EXISTS))?;
        Ok(row.into())
    }

    async fn update(&self, licence: &Licence) -> Result<Licence, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: LicenceRow = sqlx::query_as(&format!(
            "UPDATE licences SET \
             ends_on = $2, is_enabled = $3, extensions_used = $4, \
             activated_at = $5, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(licence.id)
        .bind(licence.ends_on)
        .bind(licence.is_enabled)
        .bind(licence.extensions_used)
        .bind(licence.activated_at)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }
}
