use async_trait::async_trait;
use sqlx::FromRow;

use gesco_core::domain::{PermAction, Permission};
use gesco_core::error::DomainError;
use gesco_core::messages;
use gesco_core::repositories::PermissionRepository;

use crate::database::Tx;
use crate::postgres::{db_err, map_db_err};

pub struct PgPermissionRepository {
    tx: Tx,
}

impl PgPermissionRepository {
    pub fn new(tx: Tx) -> Self {
        Self { tx }
    }
}

#[derive(Debug, FromRow)]
struct PermissionRow {
    id: i64,
    module: String,
    action: String,
    libelle: String,
}

impl From<PermissionRow> for Permission {
    fn from(row: PermissionRow) -> Self {
        Permission {
            id: row.id,
            module: row.module,
            action: PermAction::parse(&row.action).unwrap_or_default(),
            libelle: row.libelle,
        }
    }
}

#[async_trait]
impl PermissionRepository for PgPermissionRepository {
    async fn find_all(&self) -> Result<Vec<Permission>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let rows: Vec<PermissionRow> = sqlx::query_as(
            "SELECT id, module, action, libelle FROM permissions ORDER BY module, action",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Permission>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<PermissionRow> =
            sqlx::query_as("SELECT id, module, action, libelle FROM permissions WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_permissions_by_role_id(
        &self,
        role_id: i64,
    ) -> Result<Vec<(String, PermAction)>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let rows: Vec<(String, String)> = sqlx::query_as(
            "SELECT p.module, p.action \
             FROM permissions p \
             JOIN permissions_roles pr ON pr.permission_id = p.id \
             WHERE pr.role_id = $1",
        )
        .bind(role_id)
        .fetch_all(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(rows
            .into_iter()
            .map(|(module, action)| (module, PermAction::parse(&action).unwrap_or_default()))
            .collect())
    }

    async fn grant_to_role(&self, role_id: i64, permission_id: i64) -> Result<(), DomainError> {
        let mut conn = self.tx.conn().await?;
        sqlx::query("INSERT INTO permissions_roles (role_id, permission_id) VALUES ($1, $2)")
            .bind(role_id)
            .bind(permission_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_db_err(e, messages::PERMISSION_ROLE_ALREADY))?;
        Ok(())
    }

    async fn revoke_from_role(
        &self,
        role_id: i64,
        permission_id: i64,
    ) -> Result<bool, DomainError> {
        let mut conn = self.tx.conn().await?;
        let result =
            sqlx::query("DELETE FROM permissions_roles WHERE role_id = $1 AND permission_id = $2")
                .bind(role_id)
                .bind(permission_id)
                .execute(&mut *conn)
                .await
                .map_err(db_err)?;
        Ok(result.rows_affected() > 0)
    }
}
