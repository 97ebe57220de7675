//! Shared helpers for integration tests against a mock iteration service

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// JSON body the mock service returns for `page`
#[allow(dead_code)]
pub fn iteration_body(page: u32) -> Value {
    json!({
        "id": page,
        "prompt": format!("Prompt {}", page),
        "tokens": {"in": 1000 + page, "out": 200 + page},
        "text": format!("Output of iteration {}", page),
        "cost": 0.0125,
        "total_runtime_seconds": 4.0
    })
}

/// Mount `/iterations/meta` and `/iteration/1..=total_pages` on `server`
#[allow(dead_code)]
pub async fn mount_collection(server: &MockServer, total_pages: u32) {
    Mock::given(method("GET"))
        .and(path("/iterations/meta"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "total_pages": total_pages })),
        )
        .mount(server)
        .await;

    for page in 1..=total_pages {
        Mock::given(method("GET"))
            .and(path(format!("/iteration/{}", page)))
            .respond_with(ResponseTemplate::new(200).set_body_json(iteration_body(page)))
            .mount(server)
            .await;
    }
}
