use crate::helpers::caller::caller_id;
use crate::helpers::errors::{respond, respond_created};
use crate::models::CreateProjectRequest;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use dossier_engine::DossierEngine;
use dossier_types::Project;

/// Seeds a project record; the owner is the caller.
#[post("/projects")]
pub async fn create_project(
    req: HttpRequest,
    body: web::Json<CreateProjectRequest>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };

    let body = body.into_inner();
    let mut project = Project::new(caller.as_str(), body.title.trim());
    project.need_type = body.need_type;
    project.department = body.department;
    project.urgency = body.urgency;
    project.context = body.context;
    project.objectives = body.objectives;
    project.constraints = body.constraints;

    respond_created(engine.create_project(project).await)
}

#[get("/projects/{id}")]
pub async fn get_project(
    req: HttpRequest,
    path: web::Path<String>,
    engine: web::Data<DossierEngine>,
) -> HttpResponse {
    let caller = match caller_id(&req) {
        Ok(caller) => caller,
        Err(resp) => return resp,
    };
    respond(engine.get_project(&path.into_inner(), &caller).await)
}
