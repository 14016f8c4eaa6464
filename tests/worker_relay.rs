//! Worker behavior against a mock deployer.

use std::net::SocketAddr;
use std::time::Duration;

use contract_relay::config::{TimeoutConfig, WorkerConfig};
use contract_relay::http::HttpServer;
use contract_relay::worker::{self, WorkerState};
use serde_json::json;

mod common;

const DEPLOYER_KEY: &str = "worker-injected-key";

async fn spawn_worker(bind: SocketAddr, deployer: SocketAddr) {
    let config = WorkerConfig {
        bind_address: bind.to_string(),
        deployer_url: format!("http://{}", deployer),
        deployer_api_key: DEPLOYER_KEY.to_string(),
        forward_timeout_secs: 2,
    };
    let state = WorkerState::new(config);
    let server = HttpServer::new("worker", worker::router(state), &TimeoutConfig::default());
    let listener = tokio::net::TcpListener::bind(bind).await.unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_missing_contract_code_is_rejected_without_forwarding() {
    let deployer_addr: SocketAddr = "127.0.0.1:29201".parse().unwrap();
    let worker_addr: SocketAddr = "127.0.0.1:29202".parse().unwrap();
    let seen = common::start_json_backend(deployer_addr, 200, r#"{"success":true}"#).await;
    spawn_worker(worker_addr, deployer_addr).await;

    let res = client()
        .post(format!("http://{}/send-deploy", worker_addr))
        .json(&json!({"contractCode": ""}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Missing contractCode parameter");
    assert!(seen.lock().unwrap().is_empty(), "deployer must not be called");
}

#[tokio::test]
async fn test_deployer_envelope_is_relayed_with_injected_key() {
    let deployer_addr: SocketAddr = "127.0.0.1:29211".parse().unwrap();
    let worker_addr: SocketAddr = "127.0.0.1:29212".parse().unwrap();
    let seen = common::start_json_backend(
        deployer_addr,
        200,
        r#"{"success":true,"contractAddress":"0x5FbDB2315678afecb367f032d93F642f64180aa3"}"#,
    )
    .await;
    spawn_worker(worker_addr, deployer_addr).await;

    let res = client()
        .post(format!("http://{}/send-deploy", worker_addr))
        .json(&json!({"contractCode": "contract A {}", "contractName": "A"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["contractAddress"],
        "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        "the deployed address must survive this hop"
    );

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = requests[0].to_ascii_lowercase();
    assert!(request.contains("post /deploy"));
    assert!(
        request.contains(&format!("x-api-key: {}", DEPLOYER_KEY)),
        "worker must inject its own key"
    );
    assert!(request.contains("contractname"), "contractName must be forwarded");
}

#[tokio::test]
async fn test_deployer_failure_is_relayed_with_context() {
    let deployer_addr: SocketAddr = "127.0.0.1:29221".parse().unwrap();
    let worker_addr: SocketAddr = "127.0.0.1:29222".parse().unwrap();
    common::start_json_backend(
        deployer_addr,
        403,
        r#"{"success":false,"error":"Forbidden: Invalid API Key"}"#,
    )
    .await;
    spawn_worker(worker_addr, deployer_addr).await;

    let res = client()
        .post(format!("http://{}/send-deploy", worker_addr))
        .json(&json!({"contractCode": "contract A {}"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 403, "downstream status is relayed");
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "deployer: Forbidden: Invalid API Key");
}

#[tokio::test]
async fn test_unreachable_deployer_yields_500() {
    let deployer_addr: SocketAddr = "127.0.0.1:29231".parse().unwrap();
    let worker_addr: SocketAddr = "127.0.0.1:29232".parse().unwrap();
    spawn_worker(worker_addr, deployer_addr).await;

    let res = client()
        .post(format!("http://{}/send-deploy", worker_addr))
        .json(&json!({"contractCode": "contract A {}"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to send deploy request"));
}

#[tokio::test]
async fn test_health_probe() {
    let deployer_addr: SocketAddr = "127.0.0.1:29241".parse().unwrap();
    let worker_addr: SocketAddr = "127.0.0.1:29242".parse().unwrap();
    spawn_worker(worker_addr, deployer_addr).await;

    let res = client()
        .get(format!("http://{}/", worker_addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert!(res.text().await.unwrap().contains("up and running"));
}
