use crate::helpers::caller::caller_id;
use crate::helpers::errors::{error_response, respond, respond_created};
use crate::models::{StartChoicesRequest, TextRequest};
use crate::sessions::ChoiceSessions;
use actix_web::{post, put, web, HttpRequest, HttpResponse};
use dossier_engine::{DossierEngine, EngineError};

#[post("/projects/{id}/modules/{module}/questions/{question}/choices")]
pub async fn start_choices(
    req: HttpRequest,
    path: web::Path<(String, String, String)>,
    body: Option<web::Json<StartChoicesRequest>>,
    engine: web::Data<DossierEngine>,
    sessions: web::Data<ChoiceSessions>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (project_id, module_id, question_id) = path.into_inner();
    let label = body.map(|b| b.into_inner().question_label).unwrap_or_default();

    let result = async {
        let session = engine
            .start_choices(&project_id, &caller, &module_id, &question_id, &label)
            .await?;
        sessions.insert(&caller, session.clone())?;
        Ok::<_, EngineError>(session)
    }
    .await;
    respond_created(result)
}

#[post("/choices/{session}/generate")]
pub async fn generate_choices(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<DossierEngine>,
    sessions: web::Data<ChoiceSessions>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (mut session, reservation) = match sessions.reserve(&path.into_inner(), &caller) {
        Ok(reserved) => reserved,
        Err(e) => return error_response(&e),
    };

    let result = async {
        let fresh = engine.generate_choices(&caller, &mut session).await?;
        reservation.commit(session)?;
        Ok::<_, EngineError>(fresh)
    }
    .await;
    respond(result)
}

#[post("/choices/{session}/more")]
pub async fn generate_more_choices(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<DossierEngine>,
    sessions: web::Data<ChoiceSessions>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (mut session, reservation) = match sessions.reserve(&path.into_inner(), &caller) {
        Ok(reserved) => reserved,
        Err(e) => return error_response(&e),
    };

    let result = async {
        let fresh = engine.generate_more_choices(&caller, &mut session).await?;
        reservation.commit(session)?;
        Ok::<_, EngineError>(fresh)
    }
    .await;
    respond(result)
}

#[post("/choices/{session}/toggle/{choice}")]
pub async fn toggle_choice(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    engine: web::Data<DossierEngine>,
    sessions: web::Data<ChoiceSessions>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (session_id, choice_id) = path.into_inner();

    let result = sessions.checkout(&session_id, &caller).and_then(|mut session| {
        let choice = engine.toggle_choice(&mut session, &choice_id)?;
        sessions.store(session)?;
        Ok(choice)
    });
    respond(result)
}

#[post("/choices/{session}/free-input")]
pub async fn add_free_input(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<TextRequest>,
    engine: web::Data<DossierEngine>,
    sessions: web::Data<ChoiceSessions>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    let result = sessions
        .checkout(&path.into_inner(), &caller)
        .and_then(|mut session| {
            let choice = engine.add_free_input_as_choice(&mut session, &body.text)?;
            sessions.store(session)?;
            Ok(choice)
        });
    respond(result)
}

/// Replaces the free text; returns the whole session.
#[put("/choices/{session}/free-text")]
pub async fn set_free_text(
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<TextRequest>,
    engine: web::Data<DossierEngine>,
    sessions: web::Data<ChoiceSessions>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    let result = sessions
        .checkout(&path.into_inner(), &caller)
        .and_then(|mut session| {
            engine.set_free_text(&mut session, &body.text);
            sessions.store(session)
        });
    respond(result)
}

/// Writes the synthesized answer to the module section. The session is
/// discarded on success only; while the request runs, other writes to it
/// are refused with 409.
#[post("/choices/{session}/synthesize")]
pub async fn synthesize(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<DossierEngine>,
    sessions: web::Data<ChoiceSessions>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    let (session, _reservation) = match sessions.reserve(&path.into_inner(), &caller) {
        Ok(reserved) => reserved,
        Err(e) => return error_response(&e),
    };

    let result = async {
        let section = engine.generate_answer_from_choices(&caller, &session).await?;
        sessions.remove(&session.id)?;
        Ok::<_, EngineError>(section)
    }
    .await;
    respond(result)
}
