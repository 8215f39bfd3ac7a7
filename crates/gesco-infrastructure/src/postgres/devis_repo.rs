use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use gesco_core::domain::{Devis, NewDevis};
use gesco_core::error::DomainError;
use gesco_core::messages;
use gesco_core::repositories::DevisRepository;

use crate::database::Tx;
use crate::postgres::{db_err, map_db_err};

const COLUMNS: &str = "id, entreprise_id, tiers_id, numero, date_devis, montant_ht, \
     montant_ttc, statut, created_at, updated_at";

pub struct PgDevisRepository {
    tx: Tx,
}

impl PgDevisRepository {
    pub fn new(tx: Tx) -> Self {
        Self { tx }
    }
}

#[derive(Debug, FromRow)]
struct DevisRow {
    id: i64,
    entreprise_id: i64,
    tiers_id: i64,
    numero: String,
    date_devis: NaiveDate,
    montant_ht: i64,
    montant_ttc: i64,
    statut: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<DevisRow> for Devis {
    fn from(row: DevisRow) -> Self {
        Devis {
            id: row.id,
            entreprise_id: row.entreprise_id,
            tiers_id: row.tiers_id,
            numero: row.numero,
            date_devis: row.date_devis,
            montant_ht: row.montant_ht,
            montant_ttc: row.montant_ttc,
            statut: row.statut,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl DevisRepository for PgDevisRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Devis>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<DevisRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM devis WHERE id = $1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_entreprise(
        &self,
        entreprise_id: i64,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Devis>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let rows: Vec<DevisRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM devis \
             WHERE entreprise_id = $1 \
             ORDER BY date_devis DESC, numero DESC \
             OFFSET $2 LIMIT $3"
        ))
        .bind(entreprise_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, devis: &NewDevis) -> Result<Devis, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: DevisRow = sqlx::query_as(&format!(
            "INSERT INTO devis \
             (entreprise_id, tiers_id, numero, date_devis, montant_ht, montant_ttc, statut) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        ))
        .bind(devis.entreprise_id)
        .bind(devis.tiers_id)
        .bind(&devis.numero)
        .bind(devis.date_devis)
        .bind(devis.montant_ht)
        .bind(devis.montant_ttc)
        .bind(&devis.statut)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_db_err(e, messages::DEVIS_NUMERO_EXISTS))?;
        Ok(row.into())
    }
}
