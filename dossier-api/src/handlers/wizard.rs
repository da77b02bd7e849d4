use crate::helpers::caller::caller_id;
use crate::helpers::errors::respond;
use crate::models::{
    GeneratedContentResponse, NavigateRequest, PromptResponse, SaveAnswerRequest,
    ValidateModuleRequest,
};
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use dossier_engine::DossierEngine;

#[post("/projects/{id}/wizard/init")]
pub async fn init_wizard(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    respond(engine.init_wizard(&path.into_inner(), &caller).await)
}

#[get("/projects/{id}/wizard")]
pub async fn get_wizard_state(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    respond(engine.get_wizard_state(&path.into_inner(), &caller).await)
}

#[post("/projects/{id}/wizard/navigate")]
pub async fn navigate(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<NavigateRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    respond(
        engine
            .navigate(
                &path.into_inner(),
                &caller,
                body.module_index,
                body.question_index,
            )
            .await,
    )
}

#[get("/projects/{id}/modules/{module}/questions")]
pub async fn get_effective_questions(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id) = path.into_inner();
    respond(
        engine
            .get_effective_questions(&project_id, &caller, &module_id)
            .await,
    )
}

#[get("/projects/{id}/modules/{module}/answers")]
pub async fn get_answers(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id) = path.into_inner();
    respond(engine.get_answers(&project_id, &caller, &module_id).await)
}

/// Stores one answer and returns the module progress after the write.
#[put("/projects/{id}/modules/{module}/answers/{question}")]
pub async fn save_answer(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    body: web::Json<SaveAnswerRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    let body = body.into_inner();
    respond(
        engine
            .save_answer(
                &project_id,
                &caller,
                &module_id,
                &question_id,
                &body.question_label,
                body.value,
            )
            .await,
    )
}

#[get("/projects/{id}/answers/flat")]
pub async fn get_all_answers_flat(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    respond(engine.get_all_answers_flat(&path.into_inner(), &caller).await)
}

#[get("/projects/{id}/modules/{module}/progress")]
pub async fn get_module_progress(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id) = path.into_inner();
    respond(
        engine
            .get_module_progress(&project_id, &caller, &module_id)
            .await,
    )
}

#[get("/projects/{id}/progress")]
pub async fn get_overall_progress(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    respond(engine.get_overall_progress(&path.into_inner(), &caller).await)
}

#[get("/projects/{id}/modules/{module}/prompt")]
pub async fn assemble_prompt(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id) = path.into_inner();
    respond(
        engine
            .assemble_prompt(&project_id, &caller, &module_id)
            .await
            .map(|prompt| PromptResponse { prompt }),
    )
}

#[post("/projects/{id}/modules/{module}/generate")]
pub async fn generate_module_content(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id) = path.into_inner();
    respond(
        engine
            .generate_module_content(&project_id, &caller, &module_id)
            .await
            .map(|content| GeneratedContentResponse { content }),
    )
}

#[post("/projects/{id}/modules/{module}/validate")]
pub async fn validate_module(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    body: web::Json<ValidateModuleRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id) = path.into_inner();
    respond(
        engine
            .validate_module(&project_id, &caller, &module_id, &body.content)
            .await,
    )
}
