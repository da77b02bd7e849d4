#![allow(dead_code)]

use actix_web::dev::ServiceResponse;
use actix_web::test::{self, TestRequest};
use actix_web::{web, App};
use dossier_api::helpers::database::open_in_memory;
use dossier_api::sessions::ChoiceSessions;
use dossier_api::storage::SqliteProjectStore;
use dossier_api::DbConnection;
use dossier_engine::{DossierEngine, GenerationConfig, Generator, ModuleCatalog};
use dossier_llm_sdk::client::LlmClient;
use dossier_llm_sdk::error::LlmError;
use dossier_llm_sdk::types::{CompletionRequest, CompletionResponse, ContentBlock, Role, Usage};
use std::sync::{Arc, Mutex};

pub const OWNER: &str = "user-1";
pub const INTRUDER: &str = "user-2";

pub struct TestApp<S> {
    pub db_conn: DbConnection,
    pub mock_llm_client: Arc<MockLlmClient>,
    pub app: S,
}

pub struct MockLlmClient {
    pub responses: Arc<Mutex<Vec<CompletionResponse>>>,
    pub call_count: Arc<Mutex<usize>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        MockLlmClient {
            responses: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn push_response(&self, response: CompletionResponse) {
        let mut responses = self.responses.lock().unwrap();
        responses.push(response);
    }

    pub fn push_json(&self, value: serde_json::Value) {
        self.push_response(text_response(&value.to_string()));
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn text_response(text: &str) -> CompletionResponse {
    CompletionResponse {
        content: vec![ContentBlock::Text {
            text: text.to_string(),
        }],
        role: Role::Assistant,
        usage: Usage {
            input_tokens: 10,
            output_tokens: 20,
        },
        stop_reason: Some("stop".to_string()),
    }
}

#[async_trait::async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let mut call_count = self.call_count.lock().unwrap();
        *call_count += 1;
        drop(call_count);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(text_response("Le service souhaite moderniser son organisation."))
        } else {
            Ok(responses.remove(0))
        }
    }

    fn provider_name(&self) -> &str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

/// Engine over the given database and the built-in catalog. Without
/// `configured` the completion capability is left unset.
pub fn build_engine(
    db_conn: DbConnection,
    mock_llm_client: &Arc<MockLlmClient>,
    configured: bool,
) -> DossierEngine {
    let generator = if configured {
        Generator::new(
            Some(mock_llm_client.clone() as Arc<dyn LlmClient>),
            GenerationConfig::default(),
        )
    } else {
        Generator::unconfigured()
    };

    DossierEngine::new(
        Arc::new(SqliteProjectStore::new(db_conn)),
        Arc::new(ModuleCatalog::builtin()),
        generator,
    )
}

/// App backed by a migrated in-memory database.
pub async fn setup_test_app_full(
    configured: bool,
    sessions: ChoiceSessions,
) -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
    >,
> {
    let db_conn = open_in_memory()?;
    let mock_llm_client = Arc::new(MockLlmClient::new());
    let engine = build_engine(db_conn.clone(), &mock_llm_client, configured);

    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(engine))
            .app_data(web::Data::new(sessions))
            .configure(dossier_api::handlers::configure),
    )
    .await;

    Ok(TestApp {
        db_conn,
        mock_llm_client,
        app,
    })
}

pub async fn setup_test_app_with(
    configured: bool,
) -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
    >,
> {
    setup_test_app_full(configured, ChoiceSessions::new()).await
}

pub async fn setup_test_app() -> anyhow::Result<
    TestApp<
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
    >,
> {
    setup_test_app_with(true).await
}

pub fn get(uri: &str, user: &str) -> actix_http::Request {
    TestRequest::get()
        .uri(uri)
        .insert_header(("x-user-id", user))
        .to_request()
}

pub fn post(uri: &str, user: &str, body: serde_json::Value) -> actix_http::Request {
    TestRequest::post()
        .uri(uri)
        .insert_header(("x-user-id", user))
        .set_json(body)
        .to_request()
}

pub fn put(uri: &str, user: &str, body: serde_json::Value) -> actix_http::Request {
    TestRequest::put()
        .uri(uri)
        .insert_header(("x-user-id", user))
        .set_json(body)
        .to_request()
}

/// Sends the request and returns the status with the JSON body.
pub async fn call<S>(app: &S, req: actix_http::Request) -> (u16, serde_json::Value)
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body = test::read_body(resp).await;
    let value = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}

/// Creates the demand used across the API tests and returns its id.
pub async fn create_project<S>(app: &S) -> String
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
{
    let (status, body) = call(
        app,
        post(
            "/projects",
            OWNER,
            serde_json::json!({
                "title": "Portail usagers",
                "needType": "logiciel",
                "department": "Direction du numérique",
                "urgency": "haute",
                "context": "Les demandes arrivent par courrier."
            }),
        ),
    )
    .await;
    assert_eq!(status, 201, "{}", body);
    body["id"].as_str().unwrap().to_string()
}
