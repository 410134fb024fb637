//! End-to-end facade tests against a mock signing proxy.

use serde_json::json;

use secret_box_client::blockchain::{BlockchainError, ComputeClient, SigningProxyClient, Wallet};
use secret_box_client::config::{ContractConfig, NetworkConfig};
use secret_box_client::contract::{AllInfoResponse, AmIRichestResponse, QueryResult, SecretBox};
use secret_box_client::permit::Permission;

mod common;

const ALICE: &str = "secret15428vq2uzwhm3taey9sr9x5vm6tk78ewm3pkn9";
const ALICE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const CONTRACT: &str = "secret1box0000000000000000000000000000000000";

fn network(addr: std::net::SocketAddr) -> NetworkConfig {
    NetworkConfig {
        url: format!("http://{}", addr),
        chain_id: "secretdev-1".to_string(),
        rpc_timeout_secs: 5,
        ..NetworkConfig::default()
    }
}

fn secret_box() -> SecretBox {
    SecretBox::new(
        ContractConfig {
            code_id: 1,
            code_hash: "c0ffee".to_string(),
            address: CONTRACT.to_string(),
            gas_limit: 1_000_000,
        },
        "secretdev-1",
    )
}

fn tx_ok() -> String {
    json!({ "txhash": "9F86D081", "code": 0, "raw_log": "", "gas_used": 41000, "gas_wanted": 1000000 })
        .to_string()
}

#[tokio::test]
async fn test_submit_net_worth_reaches_proxy() {
    let (addr, recorder) = common::start_mock_proxy(|_| (200, tx_ok())).await;
    let client = SigningProxyClient::new(network(addr), ALICE).unwrap();

    let tx = secret_box().submit_net_worth(&client, "2500").await.unwrap();
    assert_eq!(tx.txhash, "9F86D081");
    assert_eq!(tx.gas_used, 41000);

    let requests = recorder.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/proxy/v1/execute");
    assert_eq!(
        requests[0].body,
        Some(json!({
            "sender": ALICE,
            "contract_address": CONTRACT,
            "code_hash": "c0ffee",
            "msg": { "submit_net_worth": { "networth": "2500" } },
            "gas_limit": 1000000
        }))
    );
}

#[tokio::test]
async fn test_rejected_transaction_is_an_error() {
    let (addr, recorder) = common::start_mock_proxy(|_| {
        (200, json!({ "txhash": "AA", "code": 11, "raw_log": "out of gas" }).to_string())
    })
    .await;
    let client = SigningProxyClient::new(network(addr), ALICE).unwrap();

    let err = secret_box().set_viewing_key(&client, "vk").await.unwrap_err();
    match err {
        BlockchainError::Rejected { code, log } => {
            assert_eq!(code, 11);
            assert_eq!(log, "out of gas");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(recorder.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_viewing_key_queries() {
    let (addr, recorder) = common::start_mock_proxy(|req| {
        let query = &req.body.as_ref().unwrap()["query"];
        if query["all_info"]["key"] == "right" {
            (200, json!({ "AllInfo": { "richest": true, "networth": "2500" } }).to_string())
        } else {
            (200, json!("Wrong viewing key for this address or viewing key not set").to_string())
        }
    })
    .await;
    let client = SigningProxyClient::new(network(addr), ALICE).unwrap();
    let sb = secret_box();

    let ok = sb.query_all_info(&client, ALICE, "right").await.unwrap();
    assert_eq!(ok, QueryResult::Answer(AllInfoResponse { richest: true, networth: 2500 }));

    let denied = sb.query_all_info(&client, ALICE, "wrong").await.unwrap();
    assert!(denied.is_error());

    let requests = recorder.lock().unwrap();
    assert_eq!(requests[0].path, "/proxy/v1/query");
    assert_eq!(
        requests[0].body,
        Some(json!({
            "contract_address": CONTRACT,
            "code_hash": "c0ffee",
            "query": { "all_info": { "addr": ALICE, "key": "right" } }
        }))
    );
}

#[tokio::test]
async fn test_permit_flow() {
    let (addr, recorder) =
        common::start_mock_proxy(|_| (200, json!({ "richest": false }).to_string())).await;
    let client = SigningProxyClient::new(network(addr), "").unwrap();
    let wallet = Wallet::from_private_key(ALICE_KEY).unwrap();
    assert_eq!(wallet.address(), ALICE);
    let sb = secret_box();

    let permit = sb
        .generate_permit(&wallet, "richest-only", &[Permission::AmIRichest])
        .await
        .unwrap();
    assert!(permit.allows_contract(CONTRACT));

    let result = sb.query_am_i_richest_with_permit(&client, &permit).await.unwrap();
    assert_eq!(result.into_result(), Ok(AmIRichestResponse { richest: false }));

    let requests = recorder.lock().unwrap();
    let body = requests[0].body.as_ref().unwrap();
    assert_eq!(body["query"]["with_permit"]["query"], json!({ "am_i_richest": {} }));
    assert_eq!(
        body["query"]["with_permit"]["permit"],
        serde_json::to_value(&permit).unwrap()
    );
    assert!(body["query"]["with_permit"].get("addr").is_none());
}

#[tokio::test]
async fn test_proxy_error_status() {
    let (addr, _) = common::start_mock_proxy(|_| (502, json!({ "error": "upstream" }).to_string())).await;
    let client = SigningProxyClient::new(network(addr), ALICE).unwrap();

    let err = secret_box().query_am_i_richest(&client, ALICE, "vk").await.unwrap_err();
    match err {
        BlockchainError::Rpc(msg) => assert!(msg.contains("502")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_proxy_timeout() {
    let addr = common::start_silent_proxy().await;
    let mut config = network(addr);
    config.rpc_timeout_secs = 1;
    let client = SigningProxyClient::new(config, ALICE).unwrap();

    let err = secret_box().submit_net_worth(&client, "1").await.unwrap_err();
    assert!(matches!(err, BlockchainError::Timeout(1)));
}

#[tokio::test]
async fn test_chain_id_verification() {
    let (addr, recorder) = common::start_mock_proxy(|_| {
        (200, json!({ "default_node_info": { "network": "pulsar-3", "version": "0.38" } }).to_string())
    })
    .await;
    let client = SigningProxyClient::new(network(addr), ALICE).unwrap();

    assert!(client.is_healthy().await);
    let err = client.verify_chain_id().await.unwrap_err();
    assert!(matches!(
        err,
        BlockchainError::ChainMismatch { ref expected, ref actual }
            if expected == "secretdev-1" && actual == "pulsar-3"
    ));

    let requests = recorder.lock().unwrap();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].path, "/cosmos/base/tendermint/v1beta1/node_info");
}

#[tokio::test]
async fn test_concurrent_queries_share_one_client() {
    let (addr, recorder) =
        common::start_mock_proxy(|_| (200, json!({ "richest": true }).to_string())).await;
    let client = SigningProxyClient::new(network(addr), ALICE).unwrap();
    let sb = secret_box();

    let mut handles = Vec::new();
    for i in 0..8 {
        let client = client.clone();
        let sb = sb.clone();
        handles.push(tokio::spawn(async move {
            sb.query_am_i_richest(&client, ALICE, &format!("vk-{}", i)).await
        }));
    }
    for handle in handles {
        assert!(!handle.await.unwrap().unwrap().is_error());
    }

    assert_eq!(recorder.lock().unwrap().len(), 8);
    assert_eq!(client.sender(), ALICE);
}
