use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use gesco_core::domain::{Contact, ContactCreate};
use gesco_core::error::DomainError;
use gesco_core::repositories::ContactRepository;

use crate::database::Tx;
use crate::postgres::db_err;

const COLUMNS: &str = "id, tiers_id, nom, fonction, telephone, email, created_at, updated_at";

pub struct PgContactRepository {
    tx: Tx,
}

impl PgContactRepository {
    pub fn new(tx: Tx) -> Self {
        Self { tx }
    }
}

#[derive(Debug, FromRow)]
struct ContactRow {
    id: i64,
    tiers_id: i64,
    nom: String,
    fonction: Option<String>,
    telephone: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContactRow> for Contact {
    fn from(row: ContactRow) -> Self {
        Contact {
            id: row.id,
            tiers_id: row.tiers_id,
            nom: row.nom,
            fonction: row.fonction,
            telephone: row.telephone,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl ContactRepository for PgContactRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Contact>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<ContactRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM contacts WHERE id = $1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_tiers(&self, tiers_id: i64) -> Result<Vec<Contact>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let rows: Vec<ContactRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM contacts WHERE tiers_id = $1 ORDER BY nom"
        ))
        .bind(tiers_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, tiers_id: i64, data: &ContactCreate) -> Result<Contact, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: ContactRow = sqlx::query_as(&format!(
            "INSERT INTO contacts (tiers_id, nom, fonction, telephone, email) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(tiers_id)
        .bind(&data.nom)
        .bind(&data.fonction)
        .bind(&data.telephone)
        .bind(&data.email)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn delete(&self, id: i64) -> Result<bool, DomainError> {
        let mut conn = self.tx.conn().await?;
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
