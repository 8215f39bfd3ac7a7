use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use gesco_core::domain::{NewUtilisateur, Utilisateur};
use gesco_core::error::DomainError;
use gesco_core::messages;
use gesco_core::repositories::{PageFilter, UtilisateurRepository};

use crate::database::Tx;
use crate::postgres::{db_err, map_db_err};

const COLUMNS: &str = "id, entreprise_id, role_id, login, email, nom, prenom, \
     password_hash, is_active, last_login_at, created_at, updated_at, deleted_at";

pub struct PgUtilisateurRepository {
    tx: Tx,
}

impl PgUtilisateurRepository {
    pub fn new(tx: Tx) -> Self {
        Self { tx }
    }
}

#[derive(Debug, FromRow)]
struct UtilisateurRow {
    id: i64,
    entreprise_id: i64,
    role_id: i64,
    login: String,
    email: Option<String>,
    nom: Option<String>,
    prenom: Option<String>,
    password_hash: String,
    is_active: bool,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<UtilisateurRow> for Utilisateur {
    fn from(row: UtilisateurRow) -> Self {
        Utilisateur {
            id: row.id,
            entreprise_id: row.entreprise_id,
            role_id: row.role_id,
            login: row.login,
            email: row.email,
            nom: row.nom,
            prenom: row.prenom,
            password_hash: row.password_hash,
            is_active: row.is_active,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[async_trait]
impl UtilisateurRepository for PgUtilisateurRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Utilisateur>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<UtilisateurRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM utilisateurs WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_entreprise_and_login(
        &self,
        entreprise_id: i64,
        login_or_email: &str,
    ) -> Result<Option<Utilisateur>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: Option<UtilisateurRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM utilisateurs \
             WHERE entreprise_id = $1 \
               AND (login = $2 OR LOWER(email) = LOWER($2)) \
               AND deleted_at IS NULL"
        ))
        .bind(entreprise_id)
        .bind(login_or_email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.map(Into::into))
    }

    async fn find_by_entreprise(
        &self,
        entreprise_id: i64,
        filter: &PageFilter,
    ) -> Result<Vec<Utilisateur>, DomainError> {
        let mut conn = self.tx.conn().await?;
        let rows: Vec<UtilisateurRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM utilisateurs \
             WHERE entreprise_id = $1 AND deleted_at IS NULL \
               AND (NOT $2 OR is_active) \
               AND ($3::text IS NULL OR login ILIKE '%' || $3 || '%' \
                    OR nom ILIKE '%' || $3 || '%' OR prenom ILIKE '%' || $3 || '%') \
             ORDER BY login \
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

    async fn insert(&self, user: &NewUtilisateur) -> Result<Utilisateur, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: UtilisateurRow = sqlx::query_as(&format!(
            "INSERT INTO utilisateurs \
             (entreprise_id, role_id, login, email, nom, prenom, password_hash, is_active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        ))
        .bind(user.entreprise_id)
        .bind(user.role_id)
        .bind(&user.login)
        .bind(&user.email)
        .bind(&user.nom)
        .bind(&user.prenom)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| map_db_err(e, messages::UTILISATEUR_LOGIN_EXISTS))?;
        Ok(row.into())
    }

    async fn update(&self, user: &Utilisateur) -> Result<Utilisateur, DomainError> {
        let mut conn = self.tx.conn().await?;
        let row: UtilisateurRow = sqlx::query_as(&format!(
            "UPDATE utilisateurs SET \
             role_id = $2, email = $3, nom = $4, prenom = $5, \
             password_hash = $6, is_active = $7, updated_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {COLUMNS}"
        ))
        .bind(user.id)
        .bind(user.role_id)
        .bind(&user.email)
        .bind(&user.nom)
        .bind(&user.prenom)
        .bind(&user.password_hash)
        .bind(user.is_active)
        .fetch_one(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(row.into())
    }

    async fn record_login(&self, id: i64) -> Result<(), DomainError> {
        let mut conn = self.tx.conn().await?;
        sqlx::query("UPDATE utilisateurs SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn soft_delete(&self, id: i64) -> Result<(), DomainError> {
        let mut conn = self.tx.conn().await?;
        sqlx::query(
            "UPDATE utilisateurs SET deleted_at = NOW(), is_active = FALSE \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(db_err)?;
        Ok(())
    }
}
