// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use alloy::primitives::Address;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{BalanceResponse, SubmitTransactionRequest, SubmitTransactionResponse},
    state::AppState,
    storage::{StoredTransaction, TxStatus},
};

pub mod balance;
pub mod health;
pub mod transactions;

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/balance/{address}", get(balance::get_balance))
        .route("/transaction/send", post(transactions::send_transaction))
        .route("/transaction/{hash}", get(transactions::get_transaction))
        .route("/transactions/", get(transactions::list_transactions))
        .route("/health/live", get(health::liveness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Parse a 0x-prefixed (or bare) 20-byte hex address.
pub(crate) fn parse_address(raw: &str) -> Option<Address> {
    raw.trim().parse().ok()
}

#[derive(OpenApi)]
#[openapi(
    paths(
        balance::get_balance,
        transactions::send_transaction,
        transactions::list_transactions,
        transactions::get_transaction,
        health::liveness
    ),
    components(
        schemas(
            BalanceResponse,
            SubmitTransactionRequest,
            SubmitTransactionResponse,
            StoredTransaction,
            TxStatus,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Balance", description = "FIL and iFIL balances"),
        (name = "Transactions", description = "FIL transfers and transfer history"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use std::{sync::Arc, time::Duration};

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::blockchain::{
        testing::{FakeLedger, DEV_ADDRESS, DEV_KEY},
        LedgerError,
    };
    use crate::storage::{TransactionRepository, TxDatabase};

    const RECEIVER: &str = "0xFFEEDDCcBbAA0000000000000000000000000000";

    fn app_with(ledger: FakeLedger) -> (Router, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let db = TxDatabase::open(&dir.path().join("txs.redb")).unwrap();
        let store = Arc::new(TransactionRepository::new(Arc::new(db)));
        let state = AppState::new(Arc::new(ledger), store, Duration::from_secs(5));
        (router(state), dir)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn transfer(amount: &str) -> Value {
        json!({
            "private_key_hex": DEV_KEY,
            "receiver": RECEIVER,
            "amount": amount,
        })
    }

    #[tokio::test]
    async fn liveness_is_ok() {
        let (app, _dir) = app_with(FakeLedger::new());
        let (status, body) = send(&app, get("/health/live")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn zero_balance_renders_as_zero() {
        let (app, _dir) = app_with(FakeLedger::new());
        let (status, body) = send(&app, get(&format!("/balance/{RECEIVER}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"fil": "0", "ifil": "0"}));
    }

    #[tokio::test]
    async fn balance_rejects_malformed_address() {
        let (app, _dir) = app_with(FakeLedger::new());
        let (status, body) = send(&app, get("/balance/0x1234")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid address"}));
    }

    #[tokio::test]
    async fn balance_ledger_failure_is_500() {
        let ledger = FakeLedger::failing(|| LedgerError::Connection("refused".into()));
        let (app, _dir) = app_with(ledger);
        let (status, body) = send(&app, get(&format!("/balance/{RECEIVER}"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("refused"));
    }

    #[tokio::test]
    async fn send_records_and_lists_transfer() {
        let (app, _dir) = app_with(FakeLedger::new());

        let (status, body) = send(
            &app,
            post_json("/transaction/send", transfer("1000000000000000000")),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let hash = body["hash"].as_str().unwrap().to_string();
        assert!(hash.starts_with("0x"));

        let (status, body) = send(
            &app,
            get(&format!("/transactions/?sender={DEV_ADDRESS}")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["hash"], hash);
        assert_eq!(records[0]["sender"], DEV_ADDRESS.to_lowercase());
        assert_eq!(records[0]["receiver"], RECEIVER.to_lowercase());
        assert_eq!(records[0]["amount"], "1000000000000000000");
        assert_eq!(records[0]["status"], "pending");

        let (status, body) = send(&app, get(&format!("/transaction/{hash}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "pending");

        let (_, body) = send(&app, get("/transactions/?sender=&offset=1")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn send_rejects_bad_input() {
        let (app, _dir) = app_with(FakeLedger::new());

        let (status, body) = send(&app, post_json("/transaction/send", transfer("0"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"error": "invalid tx amount: must be positive value"})
        );

        for amount in ["abc", "1_000", "_"] {
            let (status, body) =
                send(&app, post_json("/transaction/send", transfer(amount))).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "amount {amount:?}");
            assert_eq!(
                body,
                json!({"error": "invalid tx amount: must be positive value"})
            );
        }

        let mut bad_key = transfer("1");
        bad_key["private_key_hex"] = json!("0x1234");
        let (status, body) = send(&app, post_json("/transaction/send", bad_key)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid private key"}));

        let mut bad_receiver = transfer("1");
        bad_receiver["receiver"] = json!("nope");
        let (status, body) = send(&app, post_json("/transaction/send", bad_receiver)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid receiver address"}));

        let (status, body) = send(&app, post_json("/transaction/send", json!({"amount": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid request format"}));
    }

    #[tokio::test]
    async fn send_broadcast_failure_is_500() {
        let ledger = FakeLedger::failing(|| LedgerError::Broadcast("rejected".into()));
        let (app, _dir) = app_with(ledger);
        let (status, _) = send(&app, post_json("/transaction/send", transfer("1"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (_, body) = send(&app, get("/transactions/")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn list_rejects_malformed_filters() {
        let (app, _dir) = app_with(FakeLedger::new());

        let (status, body) = send(&app, get("/transactions/?sender=bogus")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid sender address"}));

        let (status, body) = send(&app, get("/transactions/?receiver=0xzz")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "invalid receiver address"}));

        for uri in [
            "/transactions/?offset=-1",
            "/transactions/?offset=",
            "/transactions/?offset=x",
        ] {
            let (status, body) = send(&app, get(uri)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body, json!({"error": "invalid query parameters"}));
        }
    }

    #[tokio::test]
    async fn transaction_lookup_errors() {
        let (app, _dir) = app_with(FakeLedger::new());

        let (status, _) = send(&app, get("/transaction/not-a-hash")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = format!("0x{}", "11".repeat(32));
        let (status, body) = send(&app, get(&format!("/transaction/{unknown}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "transaction not found"}));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (app, _dir) = app_with(FakeLedger::new());
        let (status, body) = send(&app, get("/api-doc/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/transaction/send"].is_object());
    }
}
