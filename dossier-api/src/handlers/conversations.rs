use crate::helpers::caller::caller_id;
use crate::helpers::errors::{respond, respond_created};
use crate::models::{
    ApplySuggestionRequest, InitConversationRequest, ModeRequest, SuggestionResponse,
    TextRequest,
};
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use dossier_engine::DossierEngine;

type ConversationPath = web::Path<(String, String, String)>;

/// Starts (or restarts) the conversation for one question. The body is
/// optional and defaults to guided mode.
#[post("/projects/{id}/modules/{module}/questions/{question}/conversation")]
pub async fn init_conversation(
    req: HttpRequest,
    path: ConversationPath,
    body: Option<web::Json<InitConversationRequest>>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    let mode = body.map(|b| b.into_inner().mode).unwrap_or_default();
    respond_created(
        engine
            .init_conversation(&project_id, &caller, &module_id, &question_id, mode)
            .await,
    )
}

#[get("/projects/{id}/modules/{module}/questions/{question}/conversation")]
pub async fn get_conversation(
    req: HttpRequest,
    path: ConversationPath,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    respond(
        engine
            .get_conversation(&project_id, &caller, &module_id, &question_id)
            .await,
    )
}

#[post("/projects/{id}/modules/{module}/questions/{question}/conversation/respond")]
pub async fn process_response(
    req: HttpRequest,
    path: ConversationPath,
    body: web::Json<TextRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    respond(
        engine
            .process_response(&project_id, &caller, &module_id, &question_id, &body.text)
            .await,
    )
}

#[post("/projects/{id}/modules/{module}/questions/{question}/conversation/complete")]
pub async fn complete_conversation(
    req: HttpRequest,
    path: ConversationPath,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    respond(
        engine
            .complete_conversation(&project_id, &caller, &module_id, &question_id)
            .await,
    )
}

#[post("/projects/{id}/modules/{module}/questions/{question}/conversation/apply-suggestion")]
pub async fn apply_suggestion(
    req: HttpRequest,
    path: ConversationPath,
    body: web::Json<ApplySuggestionRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    respond(
        engine
            .apply_suggestion(
                &project_id,
                &caller,
                &module_id,
                &question_id,
                &body.suggestion_id,
                &body.preview_text,
            )
            .await,
    )
}

#[post("/projects/{id}/modules/{module}/questions/{question}/conversation/save")]
pub async fn save_to_section(
    req: HttpRequest,
    path: ConversationPath,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    respond(
        engine
            .save_to_section(&project_id, &caller, &module_id, &question_id)
            .await,
    )
}

#[put("/projects/{id}/modules/{module}/questions/{question}/conversation/mode")]
pub async fn switch_mode(
    req: HttpRequest,
    path: ConversationPath,
    body: web::Json<ModeRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    respond(
        engine
            .switch_mode(&project_id, &caller, &module_id, &question_id, body.mode)
            .await,
    )
}

#[post("/projects/{id}/modules/{module}/questions/{question}/conversation/analyze")]
pub async fn analyze_text(
    req: HttpRequest,
    path: ConversationPath,
    body: web::Json<TextRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    respond(
        engine
            .analyze_text(&project_id, &caller, &module_id, &question_id, &body.text)
            .await,
    )
}

#[post("/projects/{id}/modules/{module}/questions/{question}/conversation/suggest")]
pub async fn generate_suggestion(
    req: HttpRequest,
    path: ConversationPath,
    body: web::Json<TextRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    respond(
        engine
            .generate_suggestion(&project_id, &caller, &module_id, &question_id, &body.text)
            .await
            .map(|suggestion| SuggestionResponse { suggestion }),
    )
}
