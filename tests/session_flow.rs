use barbershop::{
    api::{ApiClient, ApiConfig},
    router::{Router, RouterError},
    session::{ErrorKind, SessionStore, UserType},
    storage::{keys, FileStorage, MemoryStorage, Storage},
};
use secrecy::SecretString;
use serde_json::json;
use std::{net::TcpListener, path::PathBuf, sync::Arc};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn can_bind_localhost() -> bool {
    TcpListener::bind("127.0.0.1:0").is_ok()
}

struct TempDir(PathBuf);

impl TempDir {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("barbershop-flow-{}", uuid::Uuid::new_v4())))
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// A fresh process: new client, new tab storage, durable storage from `dir`.
fn open(base_url: &str, dir: &TempDir) -> Result<SessionStore, Box<dyn std::error::Error>> {
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::in_dir(&dir.0));
    let api = ApiClient::new(ApiConfig::new(base_url), storage.clone())?;
    Ok(SessionStore::restore(
        Arc::new(api),
        storage,
        Arc::new(MemoryStorage::new()),
    ))
}

fn password(value: &str) -> SecretString {
    SecretString::from(value.to_string())
}

#[tokio::test]
async fn login_survives_restart_and_drives_navigation() -> TestResult {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    let user = json!({
        "id": 7,
        "username": "carla",
        "email": "carla@example.com",
        "first_name": "Carla",
        "last_name": "Souza",
        "user_type": "admin"
    });
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"token": "tok-7", "user": user.clone()})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/logout/"))
        .and(header("Authorization", "Token tok-7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let base_url = format!("{}/api", server.uri());
    let dir = TempDir::new();

    let first = open(&base_url, &dir)?;
    let router = Router::new(first.subscribe());
    assert_eq!(router.navigate("/admin/barbers")?.path(), "/login");

    first.login("carla", &password("pw")).await?;
    assert_eq!(router.navigate("/admin/barbers")?.path(), "/admin/barbers");
    assert_eq!(router.navigate("/login")?.path(), "/dashboard");
    drop(first);

    // Reload from disk: same token, same user, authenticated.
    let second = open(&base_url, &dir)?;
    let session = second.session();
    assert!(session.is_authenticated());
    assert_eq!(session.token(), Some("tok-7"));
    assert_eq!(session.role(), Some(UserType::Admin));
    assert_eq!(
        session.user().map(|user| serde_json::to_value(user)).transpose()?,
        Some(user)
    );

    let router = Router::new(second.subscribe());
    assert_eq!(router.navigate("/")?.path(), "/dashboard");
    assert_eq!(router.navigate("/appointments/new")?.path(), "/dashboard");
    assert_eq!(
        router.navigate("/missing"),
        Err(RouterError::NotFound("/missing".to_string()))
    );

    second.logout().await;
    assert_eq!(router.navigate("/dashboard")?.path(), "/login");

    let third = open(&base_url, &dir)?;
    assert!(!third.is_authenticated());
    let storage = FileStorage::in_dir(&dir.0);
    assert_eq!(storage.get_item(keys::TOKEN)?, None);
    assert_eq!(storage.get_item(keys::USER)?, None);
    Ok(())
}

#[tokio::test]
async fn failed_login_keeps_previous_session() -> TestResult {
    if !can_bind_localhost() {
        eprintln!("Skipping test: cannot bind localhost");
        return Ok(());
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let dir = TempDir::new();
    let storage = FileStorage::in_dir(&dir.0);
    storage.set_item(keys::TOKEN, "old")?;
    storage.set_item(
        keys::USER,
        &json!({"username": "dino", "user_type": "barber"}).to_string(),
    )?;

    let store = open(&format!("{}/api", server.uri()), &dir)?;
    let err = store
        .login("dino", &password("pw"))
        .await
        .err()
        .ok_or("login should fail")?;
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(err.message(), "Server error. Please try again later.");

    assert_eq!(store.session().token(), Some("old"));
    let router = Router::new(store.subscribe());
    assert_eq!(router.navigate("/barber-profile")?.path(), "/barber-profile");
    Ok(())
}

#[tokio::test]
async fn corrupt_storage_file_starts_anonymous() -> TestResult {
    let dir = TempDir::new();
    std::fs::create_dir_all(&dir.0)?;
    std::fs::write(dir.0.join(barbershop::storage::STORAGE_FILE), "{broken")?;

    let store = open("http://127.0.0.1:9/api", &dir)?;
    assert!(!store.is_authenticated());

    let router = Router::new(store.subscribe());
    assert_eq!(router.navigate("/register")?.path(), "/register");
    Ok(())
}
