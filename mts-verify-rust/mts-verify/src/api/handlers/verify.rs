use actix_web::web::{Data, Json};
use actix_web::{get, post, HttpResponse, Responder};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::app::verification_service::{VerificationRequest, VerificationRunner};
use crate::domain::error::VerifyError;
use crate::infrastructure::config::VerifyConfig;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyBody {
    pub contract_address: Option<String>,
    #[serde(default)]
    pub constructor_args: Option<Vec<Value>>,
}

/// Strings pass through; numbers and booleans use their JSON text.
fn constructor_arg(value: &Value) -> Result<String, VerifyError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(VerifyError::validation(format!(
            "constructorArgs must be strings or numbers, got {other}"
        ))),
    }
}

impl VerifyBody {
    pub fn into_request(self) -> Result<VerificationRequest, VerifyError> {
        let address = self.contract_address.unwrap_or_default();
        let args = self
            .constructor_args
            .unwrap_or_default()
            .iter()
            .map(constructor_arg)
            .collect::<Result<Vec<_>, _>>()?;
        VerificationRequest::new(&address, args)
    }
}

#[post("/verify")]
pub async fn verify(
    body: Json<VerifyBody>,
    runner: Data<Arc<dyn VerificationRunner>>,
) -> Result<HttpResponse, VerifyError> {
    let request = body.into_inner().into_request()?;
    tracing::info!(
        contract = %request.contract_address,
        args = ?request.constructor_args,
        "Verifying contract"
    );

    match runner.verify(&request).await {
        Ok(output) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "message": "Contract verified successfully",
            "output": output.stdout,
        }))),
        Err(e) => {
            tracing::error!(contract = %request.contract_address, error = %e, "Verification error");
            Err(e)
        }
    }
}

#[get("/health")]
pub async fn health(config: Data<VerifyConfig>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "network": config.network,
        "message": "MTS verification server is running"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::app::verification_service::VerificationOutput;

    const ADDRESS: &str = "0x715513b13Aa8118827167Dc5B51E3d6DE492417E";

    /// Records requests and answers with a canned result.
    struct FakeRunner {
        result: Result<VerificationOutput, VerifyError>,
        seen: Mutex<Vec<VerificationRequest>>,
    }

    impl FakeRunner {
        fn answering(result: Result<VerificationOutput, VerifyError>) -> Arc<Self> {
            Arc::new(Self { result, seen: Mutex::new(Vec::new()) })
        }
    }

    #[async_trait]
    impl VerificationRunner for FakeRunner {
        async fn verify(&self, request: &VerificationRequest) -> Result<VerificationOutput, VerifyError> {
            self.seen.lock().unwrap().push(request.clone());
            self.result.clone()
        }
    }

    async fn call(runner: Arc<FakeRunner>, body: Value) -> (u16, Value) {
        let dyn_runner: Arc<dyn VerificationRunner> = runner;
        let app = test::init_service(
            App::new()
                .app_data(Data::new(dyn_runner))
                .app_data(Data::new(VerifyConfig::default()))
                .configure(crate::api::configure),
        )
        .await;
        let req = test::TestRequest::post().uri("/verify").set_json(body).to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status().as_u16();
        (status, test::read_body_json(resp).await)
    }

    fn verified() -> Result<VerificationOutput, VerifyError> {
        Ok(VerificationOutput { stdout: "Successfully verified contract".into(), stderr: String::new() })
    }

    #[actix_web::test]
    async fn test_missing_address_is_400() {
        let runner = FakeRunner::answering(verified());
        let (status, body) = call(runner.clone(), json!({ "constructorArgs": ["a"] })).await;
        assert_eq!(status, 400);
        assert_eq!(body, json!({ "error": "contractAddress is required" }));
        assert!(runner.seen.lock().unwrap().is_empty());

        let (status, _) = call(runner.clone(), json!({ "contractAddress": "" })).await;
        assert_eq!(status, 400);
    }

    #[actix_web::test]
    async fn test_malformed_address_is_400() {
        let runner = FakeRunner::answering(verified());
        let (status, body) = call(runner.clone(), json!({ "contractAddress": "0xnothex" })).await;
        assert_eq!(status, 400);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid contractAddress format"));
        assert!(runner.seen.lock().unwrap().is_empty());
    }

    #[actix_web::test]
    async fn test_success_returns_output() {
        let runner = FakeRunner::answering(verified());
        let (status, body) = call(
            runner.clone(),
            json!({ "contractAddress": ADDRESS, "constructorArgs": ["Moon", "MOON", 18, "1000000"] }),
        )
        .await;
        assert_eq!(status, 200);
        assert_eq!(
            body,
            json!({
                "success": true,
                "message": "Contract verified successfully",
                "output": "Successfully verified contract"
            })
        );
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].constructor_args, vec!["Moon", "MOON", "18", "1000000"]);
    }

    #[actix_web::test]
    async fn test_tool_failure_is_500_with_details() {
        let runner = FakeRunner::answering(Err(VerifyError::verification(
            "Command failed: npx hardhat verify",
            Some("Contract source code already verified".into()),
        )));
        let (status, body) = call(runner, json!({ "contractAddress": ADDRESS })).await;
        assert_eq!(status, 500);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Command failed: npx hardhat verify");
        assert_eq!(body["details"], "Contract source code already verified");
    }

    #[actix_web::test]
    async fn test_nested_constructor_args_rejected() {
        let runner = FakeRunner::answering(verified());
        let (status, _) = call(runner, json!({ "contractAddress": ADDRESS, "constructorArgs": [[1, 2]] })).await;
        assert_eq!(status, 400);
    }

    #[actix_web::test]
    async fn test_health() {
        let app = test::init_service(
            App::new().app_data(Data::new(VerifyConfig::default())).service(health),
        )
        .await;
        let req = test::TestRequest::get().uri("/health").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["network"], "inj_testnet");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }
}
