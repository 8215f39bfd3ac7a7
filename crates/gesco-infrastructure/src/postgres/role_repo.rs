use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use gesco_core::domain::{Role, RoleCreate};
use gesco_core::error::DomainError;
use gesco_core::messages;
use gesco_core::repositories::RoleRepository;

use crate::database::Tx;
use crate::postgres::{db_err, map_db_err};

const COLUMNS: &str = "id, entreprise_id, code, libelle, created_at, updated_at";

pub struct PgRoleRepository {
    tx: Tx,
}

impl PgRoleRepository {
    pub fn new(tx: Tx) -> Self {
        Self { tx }
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    id: i64,
    entreprise_id: Option<i64>,
    code: String,
    libelle: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: row.id,
            entreprise_id: row.entreprise_id,
            code: row.code,
            libelle: row.libelle,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Role>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<RoleRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM roles WHERE id = $1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_all(
        &self,
        entreprise_id: Option<i64>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<Role>, DomainError> {
        let mut conn = self.tx.conn().await?;
        // entreprise_id donné : rôles de l'entreprise + rôles système.
        let rows: Vec<RoleRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM roles \
             WHERE ($1::bigint IS NULL OR entreprise_id = $1 OR entreprise_id IS NULL) \
             ORDER BY code \
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

    async fn exists_by_entreprise_and_code(
        &self,
        entreprise_id: Option<i64>,
        code: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, DomainError> {
        let mut conn = self.tx.conn().await?;
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM roles \
             WHERE entreprise_id IS NOT DISTINCT FROM $1 AND code = $2 \
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

    async fn insert(&self, data: &RoleCreate) -> Result<Role, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: RoleRow = sqlx::query_as(&format!(
            "INSERT INTO roles (entreprise_id, code, libelle) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(data.entreprise_id)
        .bind(&data.code)
        .bind(&data.libelle)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_db_err(e, messages::ROLE_CODE_EXISTS))?;
        Ok(row.into())
    }

    async fn update(&self, role: &Role) -> Result<Role, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: RoleRow = sqlx::query_as(&format!(
            "UPDATE roles SET code = $2, libelle = $3, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(role.id)
        .bind(&role.code)
        .bind(&role.libelle)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_db_err(e, messages::ROLE_CODE_EXISTS))?;
        Ok(row.into())
    }
}
