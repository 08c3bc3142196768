use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use migration::MigratorTrait;
use server::{startup, AppState};
use service::repo::memory::InMemoryStore;

const USER: &str = "6a2995b1-9967-473c-ab26-2710f6e66fd5";

struct TestApp {
    base_url: String,
    store: Arc<InMemoryStore>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn serve(state: AppState) -> anyhow::Result<String> {
    let app = startup::app(state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(format!("http://{}:{}", addr.ip(), addr.port()))
}

async fn start_server() -> anyhow::Result<TestApp> {
    let store = Arc::new(InMemoryStore::default());
    let state = AppState::new(store.clone(), store.clone());
    let base_url = serve(state).await?;
    Ok(TestApp { base_url, store })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

async fn create_sub(c: &reqwest::Client, app: &TestApp, body: Value) -> anyhow::Result<Value> {
    let res = c.post(app.url("/api/subs")).json(&body).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    Ok(res.json::<Value>().await?)
}

#[tokio::test]
async fn e2e_ping() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/api/ping")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "pong");
    Ok(())
}

#[tokio::test]
async fn e2e_openapi_document_is_served() -> anyhow::Result<()> {
    let app = start_server().await?;
    let res = client().get(app.url("/api-docs/openapi.json")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert!(body["paths"]["/api/subs/sum"].is_object());
    Ok(())
}

#[tokio::test]
async fn e2e_service_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let res = c.post(app.url("/api/services")).json(&json!({"name": "Netflix"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["name"], "Netflix");
    let id = created["id"].as_i64().unwrap_or_default();
    assert!(id > 0);

    let res = c.post(app.url("/api/services")).json(&json!({"name": "Netflix"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = c.post(app.url("/api/services")).json(&json!({"name": ""})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let list = c.get(app.url("/api/services")).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(list.len(), 1);

    let res = c.delete(app.url(&format!("/api/services/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["message"], "Service deleted successfully");

    let res = c.delete(app.url(&format!("/api/services/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    assert!(res.json::<Value>().await?["error"].is_string());

    let res = c.delete(app.url("/api/services/abc")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_create_subscription_provisions_service() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let body = create_sub(&c, &app, json!({
        "service_name": "Yandex Plus",
        "price": 400,
        "user_id": USER,
        "start_date": "07-2025"
    })).await?;

    assert_eq!(body["price"], 400);
    assert_eq!(body["user_id"], USER);
    assert_eq!(body["start_date"], "2025-07-01T00:00:00Z");
    assert!(body["end_date"].is_null());
    assert_eq!(body["service"]["name"], "Yandex Plus");
    assert_eq!(body["service_id"], body["service"]["id"]);
    assert_eq!(app.store.service_count().await, 1);

    // a second subscription reuses the existing service
    create_sub(&c, &app, json!({
        "service_name": "Yandex Plus",
        "price": 100,
        "user_id": USER,
        "start_date": "08-2025",
        "end_date": "09-2025"
    })).await?;
    assert_eq!(app.store.service_count().await, 1);
    assert_eq!(app.store.subscription_count().await, 2);
    Ok(())
}

#[tokio::test]
async fn e2e_create_subscription_rejects_bad_input() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let reversed = json!({
        "service_name": "Netflix",
        "price": 500,
        "user_id": USER,
        "start_date": "06-2025",
        "end_date": "01-2025"
    });
    let res = c.post(app.url("/api/subs")).json(&reversed).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["error"], "end date must be after start date");
    assert_eq!(app.store.service_count().await, 0, "rejected create must not provision a service");

    let bad_month = json!({"service_name": "Netflix", "price": 500, "user_id": USER, "start_date": "2025-01"});
    let res = c.post(app.url("/api/subs")).json(&bad_month).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let negative = json!({"service_name": "Netflix", "price": -1, "user_id": USER, "start_date": "01-2025"});
    let res = c.post(app.url("/api/subs")).json(&negative).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c
        .post(app.url("/api/subs"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    assert!(res.json::<Value>().await?["error"].is_string());

    assert_eq!(app.store.subscription_count().await, 0);
    Ok(())
}

#[tokio::test]
async fn e2e_subscription_read_update_delete() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let created = create_sub(&c, &app, json!({
        "service_name": "Spotify",
        "price": 300,
        "user_id": USER,
        "start_date": "01-2025"
    })).await?;
    let id = created["id"].as_i64().unwrap_or_default();

    let res = c.get(app.url(&format!("/api/subs/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["service"]["name"], "Spotify");

    let list = c.get(app.url("/api/subs")).send().await?.json::<Vec<Value>>().await?;
    assert_eq!(list.len(), 1);

    let res = c
        .put(app.url(&format!("/api/subs/{id}")))
        .json(&json!({"price": 350, "end_date": "12-2025"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let updated = res.json::<Value>().await?;
    assert_eq!(updated["price"], 350);
    assert_eq!(updated["end_date"], "2025-12-01T00:00:00Z");
    assert_eq!(updated["start_date"], "2025-01-01T00:00:00Z");

    let res = c
        .put(app.url(&format!("/api/subs/{id}")))
        .json(&json!({"end_date": "12-2024"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = c.put(app.url("/api/subs/9999")).json(&json!({"price": 1})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.delete(app.url(&format!("/api/subs/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["message"], "Subscription deleted successfully");

    let res = c.get(app.url(&format!("/api/subs/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = c.delete(app.url(&format!("/api/subs/{id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);

    let res = c.get(app.url("/api/subs/not-a-number")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_sum_by_filters() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();
    let other = Uuid::new_v4().to_string();

    for (name, price, user, start, end) in [
        ("Netflix", 500, USER, "01-2025", Some("06-2025")),
        ("Spotify", 300, USER, "03-2025", None),
        ("Netflix", 700, other.as_str(), "02-2025", Some("04-2025")),
    ] {
        let mut body = json!({"service_name": name, "price": price, "user_id": user, "start_date": start});
        if let Some(end) = end {
            body["end_date"] = json!(end);
        }
        create_sub(&c, &app, body).await?;
    }

    let sum = |query: &'static str| {
        let c = c.clone();
        let url = app.url(&format!("/api/subs/sum{query}"));
        async move { c.get(url).send().await }
    };

    let res = sum("").await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["sum"], 1500);

    let res = sum("?user_id=6a2995b1-9967-473c-ab26-2710f6e66fd5").await?;
    assert_eq!(res.json::<Value>().await?["sum"], 800);

    let res = sum("?service_name=Netflix").await?;
    assert_eq!(res.json::<Value>().await?["sum"], 1200);

    let res = sum("?start_date=02-2025&end_date=12-2025").await?;
    assert_eq!(res.json::<Value>().await?["sum"], 1000);

    let res = sum("?service_name=Nothing").await?;
    assert_eq!(res.json::<Value>().await?["sum"], 0);

    let res = sum("?start_date=06-2025&end_date=01-2025").await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = sum("?start_date=June").await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    let res = sum("?user_id=not-a-uuid").await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_service_delete_cascades_to_subscriptions() -> anyhow::Result<()> {
    let app = start_server().await?;
    let c = client();

    let created = create_sub(&c, &app, json!({
        "service_name": "Kinopoisk",
        "price": 250,
        "user_id": USER,
        "start_date": "05-2025"
    })).await?;
    let service_id = created["service_id"].as_i64().unwrap_or_default();
    let sub_id = created["id"].as_i64().unwrap_or_default();

    let res = c.delete(app.url(&format!("/api/services/{service_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = c.get(app.url(&format!("/api/subs/{sub_id}"))).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_against_postgres() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let Ok(mut cfg) = configs::DatabaseConfig::from_env() else { return Ok(()) };
    cfg.connect_attempts = 1;
    cfg.connect_timeout_secs = 2;
    cfg.acquire_timeout_secs = 2;
    if cfg.validate().is_err() { return Ok(()); }
    let db = match models::db::connect_with_retry(&cfg).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("database unavailable, skipping: {e}");
            return Ok(());
        }
    };
    migration::Migrator::up(&db, None).await?;

    let base_url = serve(AppState::with_database(db)).await?;
    let c = client();
    let name = format!("e2e_{}", Uuid::new_v4());
    let user = Uuid::new_v4();

    for (price, start) in [(120, "01-2025"), (80, "02-2025")] {
        let res = c
            .post(format!("{base_url}/api/subs"))
            .json(&json!({"service_name": name, "price": price, "user_id": user, "start_date": start}))
            .send()
            .await?;
        assert_eq!(res.status(), HttpStatusCode::CREATED);
    }

    let res = c
        .get(format!("{base_url}/api/subs/sum"))
        .query(&[("user_id", user.to_string()), ("service_name", name.clone())])
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?["sum"], 200);

    let services = c.get(format!("{base_url}/api/services")).send().await?.json::<Vec<Value>>().await?;
    let id = services
        .iter()
        .find(|s| s["name"] == name.as_str())
        .and_then(|s| s["id"].as_i64())
        .unwrap_or_default();
    let res = c.delete(format!("{base_url}/api/services/{id}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}
