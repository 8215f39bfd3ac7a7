//! Tests bout-en-bout de la colonne d'autorisation : login, refresh,
//! isolation multi-tenant, portes permission et licence, enveloppe d'erreur.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use gesco_api::routes;
use gesco_api::state::AppState;
use gesco_security::jwt::TokenKind;
use gesco_security::password::PasswordService;
use gesco_shared::config::Settings;

fn test_settings() -> Settings {
    Settings {
        app_name: "Gesco".into(),
        app_env: "test".into(),
        host: "127.0.0.1".into(),
        port: 0,
        api_v1_prefix: "/api/v1".into(),
        database_url: String::new(),
        database_pool_size: 5,
        database_max_overflow: 10,
        secret_key: "test-secret-key-of-sufficient-length".into(),
        algorithm: "HS256".into(),
        access_token_expire_minutes: 60,
        refresh_token_expire_days: 7,
        bcrypt_rounds: 4,
        rate_limit_per_minute: 0,
        permissions_default_open: true,
        cors_origins: "*".into(),
        cors_allow_credentials: false,
        log_level: "INFO".into(),
        log_format: "text".into(),
        log_file: None,
    }
}

async fn seed(pool: &PgPool) {
    let hash = PasswordService::new(4).hash("gesco@1234").unwrap();
    sqlx::query(
        "INSERT INTO entreprises (id, code, raison_sociale) \
         VALUES (1, 'E1', 'Entreprise Un'), (2, 'E2', 'Entreprise Deux')",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO roles (id, entreprise_id, code, libelle) \
         VALUES (1, 1, 'ADMIN', 'Administrateur'), (2, 1, 'LECTEUR', 'Lecteur')",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO permissions (id, module, action, libelle) \
         VALUES (1, 'parametrage', 'read', 'Lecture paramétrage')",
    )
    .execute(pool)
    .await
    .unwrap();
    sqlx::query("INSERT INTO permissions_roles (role_id, permission_id) VALUES (2, 1)")
        .execute(pool)
        .await
        .unwrap();
    sqlx::query(
        "INSERT INTO utilisateurs (id, entreprise_id, role_id, login, email, password_hash, is_active) \
         VALUES (1, 1, 1, 'admin', 'admin@e1.cm', $1, TRUE), \
                (2, 1, 1, 'inactif', NULL, $1, FALSE), \
                (3, 1, 2, 'lecteur', NULL, $1, TRUE)",
    )
    .bind(&hash)
    .execute(pool)
    .await
    .unwrap();
    sqlx::query(
        "INSERT INTO tiers (id, entreprise_id, code, raison_sociale) \
         VALUES (1, 1, 'T1', 'Tiers E1'), (2, 2, 'T2', 'Tiers E2')",
    )
    .execute(pool)
    .await
    .unwrap();
    for seq in [
        "entreprises_id_seq",
        "roles_id_seq",
        "permissions_id_seq",
        "utilisateurs_id_seq",
        "tiers_id_seq",
    ] {
        sqlx::query(&format!("SELECT setval('{seq}', 100)"))
            .execute(pool)
            .await
            .unwrap();
    }
}

async fn setup(pool: PgPool) -> (Router, AppState) {
    seed(&pool).await;
    let state = AppState::new(pool, test_settings()).unwrap();
    (routes::app(state.clone()), state)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap()
}

fn post_json_with_token(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_token(state: &AppState) -> String {
    state.jwt.mint_access(1, 1).unwrap()
}

#[sqlx::test(migrations = "../../migrations")]
async fn login_success(pool: PgPool) {
    let (app, _) = setup(pool).await;
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"entreprise_id": 1, "login": "admin", "password": "gesco@1234"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn login_accepts_email_as_identifier(pool: PgPool) {
    let (app, _) = setup(pool).await;
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"entreprise_id": 1, "login": "admin@e1.cm", "password": "gesco@1234"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn login_wrong_password(pool: PgPool) {
    let (app, _) = setup(pool).await;
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"entreprise_id": 1, "login": "admin", "password": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Identifiants incorrects.");
}

#[sqlx::test(migrations = "../../migrations")]
async fn login_unknown_user_same_shape_as_wrong_password(pool: PgPool) {
    let (app, _) = setup(pool).await;
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"entreprise_id": 1, "login": "ghost", "password": "gesco@1234"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Identifiants incorrects.");
}

#[sqlx::test(migrations = "../../migrations")]
async fn login_inactive_user(pool: PgPool) {
    let (app, _) = setup(pool).await;
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"entreprise_id": 1, "login": "inactif", "password": "gesco@1234"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["detail"], "Compte utilisateur désactivé.");
    // Même forme que les autres 401 : uniquement detail et code.
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../migrations")]
async fn protected_read_without_token(pool: PgPool) {
    let (app, _) = setup(pool).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/parametrage/entreprises")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn cross_tenant_read_is_forbidden(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let token = admin_token(&state);
    let response = app
        .oneshot(get_with_token("/api/v1/parametrage/entreprises/2", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN_ENTREPRISE");
}

#[sqlx::test(migrations = "../../migrations")]
async fn explicit_mismatched_entreprise_filter_is_forbidden(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let token = admin_token(&state);
    let response = app
        .oneshot(get_with_token(
            "/api/v1/partenaires/tiers?entreprise_id=2",
            &token,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN_ENTREPRISE");
}

#[sqlx::test(migrations = "../../migrations")]
async fn tiers_list_defaults_to_principal_entreprise(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let token = admin_token(&state);
    let response = app
        .oneshot(get_with_token("/api/v1/partenaires/tiers", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let items = body.as_array().unwrap();
    assert!(!items.is_empty());
    for item in items {
        assert_eq!(item["entreprise_id"], 1);
    }
}

#[sqlx::test(migrations = "../../migrations")]
async fn refresh_rotates_tokens(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let login = app
        .clone()
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"entreprise_id": 1, "login": "admin", "password": "gesco@1234"}),
        ))
        .await
        .unwrap();
    let tokens = body_json(login).await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    let response = app
        .oneshot(post_json(
            "/api/v1/auth/refresh",
            json!({"refresh_token": refresh_token}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let new_access = body["access_token"].as_str().unwrap();
    let claims = state.jwt.verify(new_access, TokenKind::Access).unwrap();
    assert_eq!(claims.subject_id().unwrap(), 1);
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn refresh_refuses_access_token(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let access = admin_token(&state);
    let response = app
        .oneshot(post_json(
            "/api/v1/auth/refresh",
            json!({"refresh_token": access}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn expired_access_token_is_rejected(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let expired = state
        .jwt
        .mint(1, 1, TokenKind::Access, chrono::Duration::seconds(-1))
        .unwrap();
    let response = app
        .oneshot(get_with_token("/api/v1/parametrage/entreprises", &expired))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn raw_token_without_bearer_prefix_is_accepted(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let token = admin_token(&state);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/parametrage/entreprises")
                .header(header::AUTHORIZATION, token)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn explicit_grants_deny_unlisted_action(pool: PgPool) {
    let (app, state) = setup(pool).await;
    // lecteur : rôle 2, seul grant (parametrage, read).
    let token = state.jwt.mint_access(3, 1).unwrap();

    let read = app
        .clone()
        .oneshot(get_with_token("/api/v1/parametrage/entreprises", &token))
        .await
        .unwrap();
    assert_eq!(read.status(), StatusCode::OK);

    let write = app
        .oneshot(post_json_with_token(
            "/api/v1/parametrage/roles",
            &token,
            json!({"entreprise_id": 1, "code": "VENDEUR", "libelle": "Vendeur"}),
        ))
        .await
        .unwrap();
    assert_eq!(write.status(), StatusCode::FORBIDDEN);
    let body = body_json(write).await;
    assert_eq!(body["code"], "FORBIDDEN_PERMISSION");
}

#[sqlx::test(migrations = "../../migrations")]
async fn devis_write_requires_valid_licence(pool: PgPool) {
    let (app, state) = setup(pool.clone()).await;
    let token = admin_token(&state);
    let payload = json!({
        "tiers_id": 1,
        "numero": "DV-2026-001",
        "date_devis": "2026-08-06",
        "montant_ht": 100_000,
        "montant_ttc": 119_250
    });

    // Sans licence : 403, et rien n'est écrit.
    let refused = app
        .clone()
        .oneshot(post_json_with_token(
            "/api/v1/commercial/devis",
            &token,
            payload.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(refused.status(), StatusCode::FORBIDDEN);
    let body = body_json(refused).await;
    assert_eq!(body["code"], "FORBIDDEN_LICENCE");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM devis")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);

    // Avec licence valide : création acceptée.
    sqlx::query(
        "INSERT INTO licences (entreprise_id, licence_key, licence_type, starts_on, ends_on) \
         VALUES (1, 'GESCO-PREMIUM', 'premium', '2026-01-01', '2099-01-01')",
    )
    .execute(&pool)
    .await
    .unwrap();
    let accepted = app
        .oneshot(post_json_with_token(
            "/api/v1/commercial/devis",
            &token,
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::CREATED);
    let body = body_json(accepted).await;
    assert_eq!(body["numero"], "DV-2026-001");
    assert_eq!(body["statut"], "brouillon");
}

#[sqlx::test(migrations = "../../migrations")]
async fn licence_reads_pass_without_licence(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let token = admin_token(&state);
    let response = app
        .oneshot(get_with_token("/api/v1/commercial/devis", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../migrations")]
async fn duplicate_role_code_is_a_conflict(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let token = admin_token(&state);
    let payload = json!({"entreprise_id": 1, "code": "CAISSIER", "libelle": "Caissier"});

    let first = app
        .clone()
        .oneshot(post_json_with_token(
            "/api/v1/parametrage/roles",
            &token,
            payload.clone(),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .oneshot(post_json_with_token(
            "/api/v1/parametrage/roles",
            &token,
            payload,
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = body_json(second).await;
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../migrations")]
async fn soft_deleted_user_cannot_authenticate(pool: PgPool) {
    let (app, state) = setup(pool.clone()).await;
    let token = admin_token(&state);
    sqlx::query("UPDATE utilisateurs SET deleted_at = NOW() WHERE id = 1")
        .execute(&pool)
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_with_token("/api/v1/parametrage/entreprises", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let login = app
        .oneshot(post_json(
            "/api/v1/auth/login",
            json!({"entreprise_id": 1, "login": "admin", "password": "gesco@1234"}),
        ))
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../migrations")]
async fn health_needs_no_authentication(pool: PgPool) {
    let (app, _) = setup(pool).await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "gesco");
}

#[sqlx::test(migrations = "../../migrations")]
async fn nested_contact_is_tenant_checked_through_its_tiers(pool: PgPool) {
    let (app, state) = setup(pool).await;
    let token = admin_token(&state);
    // Tiers 2 appartient à l'entreprise 2 : refus via la résolution
    // transitive, pas de fuite d'information au-delà du 403.
    let response = app
        .oneshot(get_with_token("/api/v1/partenaires/tiers/2/contacts", &token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "FORBIDDEN_ENTREPRISE");
}
