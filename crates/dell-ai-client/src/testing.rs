//! In-process stand-in for the Hub, used by transport and facade tests.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

pub const TOKEN: &str = "test-token";

pub fn model_json() -> Value {
    json!({
        "repoName": "org/model",
        "description": "Test model",
        "license": "apache-2.0",
        "creatorType": "organization",
        "size": 8000000000u64,
        "hasSystemPrompt": true,
        "isMultimodal": false,
        "status": "active",
        "configsDeploy": {
            "sku-a": [
                {
                    "num_gpus": 4,
                    "max_input_tokens": 2048,
                    "max_total_tokens": 4096,
                    "max_batch_prefill_tokens": 4096,
                    "quantization": "awq"
                },
                { "num_gpus": 8, "max_input_tokens": 8192, "max_total_tokens": 16384 },
                { "num_gpus": 4, "max_input_tokens": 1024 }
            ],
            "sku-b": [ { "num_gpus": 1, "max_input_tokens": 1024 } ]
        }
    })
}

pub fn platform_json() -> Value {
    json!({
        "id": "sku-a",
        "name": "Platform A",
        "disabled": false,
        "server": "PowerEdge XE9680",
        "vendor": "Dell",
        "gputype": "NVIDIA H100",
        "gpuram": "80GB",
        "gpuinterconnect": "NVLink",
        "productName": "PowerEdge XE9680",
        "totalgpucount": 8,
        "interonnect_east_west": "NVLink",
        "interconnect_north_south": "PCIe"
    })
}

pub fn app_json() -> Value {
    json!({
        "id": "openwebui",
        "name": "OpenWebUI",
        "license": "MIT",
        "description": "Chat frontend",
        "docs": "https://docs.openwebui.com",
        "tags": ["chat"],
        "recommendedModels": ["org/model"],
        "components": [
            {
                "name": "main",
                "required": true,
                "description": "Web UI",
                "config": [
                    {
                        "name": "Model",
                        "description": "Model to serve",
                        "type": "string",
                        "required": true,
                        "helmPath": "main.config.modelId"
                    },
                    {
                        "name": "Storage",
                        "description": "PVC size",
                        "type": "string",
                        "required": true,
                        "default": "2Gi",
                        "helmPath": "main.storageSize"
                    },
                    {
                        "name": "Replicas",
                        "description": "",
                        "type": "number",
                        "required": false,
                        "helmPath": "main.replicas"
                    }
                ],
                "secrets": []
            },
            {
                "name": "pipelines",
                "required": false,
                "description": "Optional pipelines server",
                "config": [
                    {
                        "name": "URL",
                        "description": "",
                        "type": "string",
                        "required": true,
                        "helmPath": "pipelines.url"
                    }
                ],
                "secrets": []
            }
        ]
    })
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        == Some(TOKEN)
}

fn guarded(headers: &HeaderMap, found: Option<Value>) -> Response {
    if !authorized(headers) {
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    match found {
        Some(v) => Json(v).into_response(),
        None => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

/// Serve the fake Hub on an ephemeral port and return its base URL.
pub async fn spawn_hub() -> String {
    let app = Router::new()
        .route(
            "/models",
            get(|h: HeaderMap| async move {
                guarded(&h, Some(json!({ "models": ["org/model", "org/other"] })))
            }),
        )
        .route(
            "/models/:org/:name",
            get(|h: HeaderMap, Path((org, name)): Path<(String, String)>| async move {
                let found = (org == "org" && name == "model").then(model_json);
                guarded(&h, found)
            }),
        )
        .route(
            "/platforms",
            get(|h: HeaderMap| async move {
                guarded(&h, Some(json!({ "platforms": ["sku-a", "sku-b"] })))
            }),
        )
        .route(
            "/platforms/:sku",
            get(|h: HeaderMap, Path(sku): Path<String>| async move {
                guarded(&h, (sku == "sku-a").then(platform_json))
            }),
        )
        .route(
            "/apps",
            get(|h: HeaderMap| async move { guarded(&h, Some(json!({ "apps": ["openwebui"] }))) }),
        )
        .route(
            "/apps/:id",
            get(|h: HeaderMap, Path(id): Path<String>| async move {
                guarded(&h, (id == "openwebui").then(app_json))
            }),
        )
        .route(
            "/whoami",
            get(|h: HeaderMap| async move { guarded(&h, Some(json!({ "name": "test-user" }))) }),
        )
        .route(
            "/broken",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
        )
        .route("/garbage", get(|| async { "this is not json" }))
        .route(
            "/forbidden",
            get(|| async { (StatusCode::FORBIDDEN, "Forbidden") }),
        )
        .route(
            "/echo",
            get(
                |h: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    guarded(&h, Some(json!({ "query": q })))
                },
            )
            .post(
                |h: HeaderMap,
                 Query(q): Query<HashMap<String, String>>,
                 Json(body): Json<Value>| async move {
                    guarded(&h, Some(json!({ "query": q, "body": body })))
                },
            ),
        )
        .route("/public/ping", get(|| async { Json(json!({ "ok": true })) }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}
