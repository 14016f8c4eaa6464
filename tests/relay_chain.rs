//! Full chain: real gateway and worker, mock deployer.

use std::net::SocketAddr;
use std::time::Duration;

use contract_relay::config::{GatewayConfig, TimeoutConfig, WorkerConfig};
use contract_relay::gateway::{self, GatewayState};
use contract_relay::http::HttpServer;
use contract_relay::worker::{self, WorkerState};
use serde_json::json;

mod common;

const CALLER_KEY: &str = "caller-key";
const DEPLOYER_KEY: &str = "deployer-key";

async fn spawn_chain(gateway_addr: SocketAddr, worker_addr: SocketAddr, deployer_addr: SocketAddr) {
    let worker_config = WorkerConfig {
        bind_address: worker_addr.to_string(),
        deployer_url: format!("http://{}", deployer_addr),
        deployer_api_key: DEPLOYER_KEY.to_string(),
        forward_timeout_secs: 5,
    };
    let worker_server = HttpServer::new(
        "worker",
        worker::router(WorkerState::new(worker_config)),
        &TimeoutConfig::default(),
    );
    let worker_listener = tokio::net::TcpListener::bind(worker_addr).await.unwrap();
    tokio::spawn(async move {
        let _ = worker_server.run(worker_listener).await;
    });

    let gateway_config = GatewayConfig {
        bind_address: gateway_addr.to_string(),
        api_key: CALLER_KEY.to_string(),
        worker_url: format!("http://{}", worker_addr),
        forward_timeout_secs: 5,
    };
    let gateway_server = HttpServer::new(
        "gateway",
        gateway::router(GatewayState::new(gateway_config)),
        &TimeoutConfig::default(),
    );
    let gateway_listener = tokio::net::TcpListener::bind(gateway_addr).await.unwrap();
    tokio::spawn(async move {
        let _ = gateway_server.run(gateway_listener).await;
    });

    tokio::time::sleep(Duration::from_millis(150)).await;
}

fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

#[tokio::test]
async fn test_contract_address_survives_the_whole_chain() {
    let deployer_addr: SocketAddr = "127.0.0.1:29401".parse().unwrap();
    let worker_addr: SocketAddr = "127.0.0.1:29402".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:29403".parse().unwrap();

    let seen = common::start_json_backend(
        deployer_addr,
        200,
        r#"{"success":true,"contractAddress":"0x5FbDB2315678afecb367f032d93F642f64180aa3"}"#,
    )
    .await;
    spawn_chain(gateway_addr, worker_addr, deployer_addr).await;

    let res = client()
        .post(format!("http://{}/deploy", gateway_addr))
        .header("x-api-key", CALLER_KEY)
        .json(&json!({"contractCode": "contract A { uint256 public n; }"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["contractAddress"],
        "0x5FbDB2315678afecb367f032d93F642f64180aa3",
        "the address must survive deployer → worker → gateway"
    );

    // The deployer hop saw the worker's key, not the caller's.
    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = requests[0].to_ascii_lowercase();
    assert!(request.contains(&format!("x-api-key: {}", DEPLOYER_KEY)));
    assert!(!request.contains(CALLER_KEY));
}

#[tokio::test]
async fn test_deployer_failure_detail_reaches_the_caller() {
    let deployer_addr: SocketAddr = "127.0.0.1:29411".parse().unwrap();
    let worker_addr: SocketAddr = "127.0.0.1:29412".parse().unwrap();
    let gateway_addr: SocketAddr = "127.0.0.1:29413".parse().unwrap();

    common::start_json_backend(
        deployer_addr,
        400,
        r#"{"success":false,"error":"Compilation failed","errors":[{"severity":"error","message":"expected ';'"}]}"#,
    )
    .await;
    spawn_chain(gateway_addr, worker_addr, deployer_addr).await;

    let res = client()
        .post(format!("http://{}/deploy", gateway_addr))
        .header("x-api-key", CALLER_KEY)
        .json(&json!({"contractCode": "contract A {"}))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 400);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"], "worker: deployer: Compilation failed",
        "each hop adds context, none discards detail"
    );
    assert_eq!(body["errors"][0]["message"], "expected ';'");
}
