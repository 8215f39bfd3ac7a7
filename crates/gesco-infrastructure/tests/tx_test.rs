//! Portée transactionnelle : une écriture rollbackée disparaît, une écriture
//! commitée est visible depuis une connexion fraîche.

use sqlx::PgPool;

use gesco_core::domain::EntrepriseCreate;
use gesco_core::repositories::EntrepriseRepository;
use gesco_infrastructure::database::Tx;
use gesco_infrastructure::postgres::PgEntrepriseRepository;

fn entreprise(code: &str) -> EntrepriseCreate {
    EntrepriseCreate {
        code: code.to_string(),
        raison_sociale: "Société Test SARL".to_string(),
        niu: None,
        pays: "CMR".to_string(),
        devise_principale: "XAF".to_string(),
    }
}

async fn count_by_code(pool: &PgPool, code: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM entreprises WHERE code = $1")
        .bind(code)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[sqlx::test(migrations = "../../migrations")]
async fn rollback_discards_writes(pool: PgPool) {
    let tx = Tx::begin(&pool).await.unwrap();
    let repo = PgEntrepriseRepository::new(tx.clone());
    let created = repo.insert(&entreprise("ROLLBACK")).await.unwrap();
    assert!(created.id > 0);

    tx.rollback().await.unwrap();
    assert_eq!(count_by_code(&pool, "ROLLBACK").await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn commit_persists_writes(pool: PgPool) {
    let tx = Tx::begin(&pool).await.unwrap();
    let repo = PgEntrepriseRepository::new(tx.clone());
    repo.insert(&entreprise("COMMIT")).await.unwrap();

    // Invisible tant que la transaction est ouverte (lecture hors tx).
    assert_eq!(count_by_code(&pool, "COMMIT").await, 0);

    tx.commit().await.unwrap();
    assert_eq!(count_by_code(&pool, "COMMIT").await, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn writes_share_one_transaction(pool: PgPool) {
    let tx = Tx::begin(&pool).await.unwrap();
    let repo = PgEntrepriseRepository::new(tx.clone());
    let created = repo.insert(&entreprise("SHARED")).await.unwrap();

    // Le flush naturel rend la ligne visible dans la même transaction.
    let reread = repo.find_by_id(created.id).await.unwrap();
    assert!(reread.is_some());

    tx.rollback().await.unwrap();
    assert_eq!(count_by_code(&pool, "SHARED").await, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn completed_transaction_refuses_further_work(pool: PgPool) {
    let tx = Tx::begin(&pool).await.unwrap();
    tx.commit().await.unwrap();

    // Double terminaison : no-op.
    tx.commit().await.unwrap();
    tx.rollback().await.unwrap();

    let repo = PgEntrepriseRepository::new(tx);
    assert!(repo.find_by_id(1).await.is_err());
}

#[sqlx::test(migrations = "../../migrations")]
async fn soft_deleted_rows_stay_hidden(pool: PgPool) {
    let tx = Tx::begin(&pool).await.unwrap();
    let repo = PgEntrepriseRepository::new(tx.clone());
    let created = repo.insert(&entreprise("TOMBSTONE")).await.unwrap();
    repo.soft_delete(created.id).await.unwrap();

    assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    tx.commit().await.unwrap();

    // La ligne existe toujours physiquement (référencable par l'historique).
    assert_eq!(count_by_code(&pool, "TOMBSTONE").await, 1);
}
