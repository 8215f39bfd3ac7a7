//! Transaction de requête
//!
//! Une transaction par requête HTTP : ouverte à l'entrée, commitée sur
//! succès, rollbackée sur toute erreur, par la couche HTTP uniquement. Les
//! repositories empruntent la connexion via [`Tx::conn`] ; aucun d'eux ne
//! commit. Le handle se clone librement à l'intérieur d'une même requête et
//! n'est jamais partagé entre requêtes.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::{Mutex, OwnedMutexGuard};

use gesco_core::error::DomainError;

type TxSlot = Option<Transaction<'static, Postgres>>;

#[derive(Clone)]
pub struct Tx {
    slot: Arc<Mutex<TxSlot>>,
}

impl Tx {
    pub async fn begin(pool: &PgPool) -> Result<Self, sqlx::Error> {
        let tx = pool.begin().await?;
        Ok(Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        })
    }

    /// Emprunte la connexion de la transaction. Erreur interne si la
    /// transaction est déjà terminée (un handler ne doit jamais survivre à
    /// sa requête).
    pub async fn conn(&self) -> Result<TxConn, DomainError> {
        let guard = self.slot.clone().lock_owned().await;
        if guard.is_none() {
            return Err(DomainError::Internal(
                "transaction already completed".to_string(),
            ));
        }
        Ok(TxConn { guard })
    }

    /// Commit, au plus une fois. No-op si déjà terminée.
    pub async fn commit(&self) -> Result<(), sqlx::Error> {
        match self.slot.lock().await.take() {
            Some(tx) => tx.commit().await,
            None => Ok(()),
        }
    }

    /// Rollback, au plus une fois. No-op si déjà terminée.
    pub async fn rollback(&self) -> Result<(), sqlx::Error> {
        match self.slot.lock().await.take() {
            Some(tx) => tx.rollback().await,
            None => Ok(()),
        }
    }
}

/// Garde exclusive sur la connexion de la transaction, déréférençable en
/// `&mut PgConnection` pour les exécuteurs sqlx.
pub struct TxConn {
    guard: OwnedMutexGuard<TxSlot>,
}

impl Deref for TxConn {
    type Target = PgConnection;

    fn deref(&self) -> &Self::Target {
        // Invariant : construit uniquement sur un slot occupé, et la garde
        // exclut tout commit/rollback concurrent.
        self.guard.as_deref().expect("transaction slot is occupied")
    }
}

impl DerefMut for TxConn {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.guard
            .as_deref_mut()
            .expect("transaction slot is occupied")
    }
}
