use std::net::SocketAddr;

use configs::{AppConfig, DatabaseConfig};
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

struct TestApp {
    base_url: String,
}

/// Full stack over an in-memory SQLite store on an ephemeral port.
async fn start_server() -> anyhow::Result<TestApp> {
    let cfg = AppConfig {
        database: DatabaseConfig { url: "sqlite::memory:".into(), ..Default::default() },
        ..Default::default()
    };
    let app = server::startup::build_app(&cfg).await?;

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = server::startup::serve(listener, app, std::future::pending()).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn unique_email() -> String {
    format!("e2e_{}@example.com", Uuid::new_v4())
}

#[tokio::test]
async fn e2e_probes() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();

    let res = client.get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["status"], "OK");

    let body: Value = client.get(format!("{}/db-status", app.base_url)).send().await?.json().await?;
    assert_eq!(body["database"], "Connected");
    assert_eq!(body["provider"], "SeaORM");

    let res = client.get(format!("{}/metrics", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn e2e_customer_lifecycle() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let customers = format!("{}/api/customers", app.base_url);
    let email = unique_email();

    // create
    let res = client
        .post(&customers)
        .json(&json!({"email": email, "first_name": "Ada", "dob": "1815-12-10"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "active");
    assert_eq!(body["data"]["dob"], "1815-12-10");
    assert!(body["data"]["date_joined"].is_string());
    let id = body["data"]["customer_id"].as_i64().expect("customer_id");

    // duplicate email hits the business check
    let res = client.post(&customers).json(&json!({"email": email})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);
    let body: Value = res.json().await?;
    assert!(body["error"].as_str().unwrap_or_default().contains("already exists"));

    // list
    let body: Value = client.get(&customers).send().await?.json().await?;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["customer_id"], id);

    // partial update clears a nullable column and keeps the rest
    let res = client
        .put(format!("{customers}/{id}"))
        .json(&json!({"last_name": "Lovelace", "dob": null}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["last_name"], "Lovelace");
    assert_eq!(body["data"]["first_name"], "Ada");
    assert!(body["data"]["dob"].is_null());

    let res = client.put(format!("{customers}/{id}")).json(&json!({})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // delete twice
    let res = client.delete(format!("{customers}/{id}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = client.delete(format!("{customers}/{id}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let res = client.get(format!("{customers}/{id}")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn e2e_update_email_to_taken_conflicts() -> anyhow::Result<()> {
    let app = start_server().await?;
    let client = reqwest::Client::new();
    let customers = format!("{}/api/customers", app.base_url);

    let a = unique_email();
    client.post(&customers).json(&json!({"email": a})).send().await?;
    let body: Value = client.post(&customers).json(&json!({"email": unique_email()})).send().await?.json().await?;
    let b_id = body["data"]["customer_id"].as_i64().expect("customer_id");

    let res = client.put(format!("{customers}/{b_id}")).json(&json!({"email": a})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    let res = client.get(format!("{customers}/not-a-number")).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}
