mod common;

use actix_web::test::{self, TestRequest};
use common::{call, create_project, get, post, put, setup_test_app, setup_test_app_with, INTRUDER, OWNER};
use serde_json::json;

#[actix_rt::test]
async fn test_wizard_answers_and_progress() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;
    let id = create_project(app).await;

    let (status, state) = call(app, post(&format!("/projects/{}/wizard/init", id), OWNER, json!({}))).await;
    assert_eq!(status, 200);
    assert_eq!(state["currentModule"], 0);
    assert_eq!(state["modules"]["contexte"]["status"], "pending");

    let (_, project) = call(app, get(&format!("/projects/{}", id), OWNER)).await;
    let sections = project["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 5);
    assert_eq!(sections[0]["content"], "Les demandes arrivent par courrier.");

    let (_, questions) = call(
        app,
        get(&format!("/projects/{}/modules/solution/questions", id), OWNER),
    )
    .await;
    assert_eq!(questions.as_array().unwrap().len(), 2);

    let (status, progress) = call(
        app,
        put(
            &format!("/projects/{}/modules/solution/answers/need_type", id),
            OWNER,
            json!({"questionLabel": "Type de besoin", "value": "logiciel"}),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(progress["answered"], 1);
    assert_eq!(progress["total"], 5);
    assert_eq!(progress["progress"], 20);
    assert_eq!(progress["status"], "in_progress");

    let (_, questions) = call(
        app,
        get(&format!("/projects/{}/modules/solution/questions", id), OWNER),
    )
    .await;
    let ids: Vec<&str> = questions
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        ids,
        vec!["need_type", "description_besoin", "nb_utilisateurs", "hebergement", "interfaces"]
    );

    call(
        app,
        put(
            &format!("/projects/{}/modules/contexte/answers/difficultes", id),
            OWNER,
            json!({"questionLabel": "Difficultés", "value": ["delais", "erreurs"]}),
        ),
    )
    .await;

    let (_, flat) = call(app, get(&format!("/projects/{}/answers/flat", id), OWNER)).await;
    assert_eq!(flat["need_type"]["stringValue"], "logiciel");
    assert_eq!(flat["difficultes"]["stringValue"], "delais, erreurs");

    let (_, answers) = call(
        app,
        get(&format!("/projects/{}/modules/contexte/answers", id), OWNER),
    )
    .await;
    assert_eq!(answers.as_array().unwrap().len(), 1);

    let (_, overall) = call(app, get(&format!("/projects/{}/progress", id), OWNER)).await;
    assert_eq!(overall["modules"].as_array().unwrap().len(), 5);
    assert!(overall["progress"].as_u64().unwrap() > 0);

    let (_, module) = call(
        app,
        get(&format!("/projects/{}/modules/contexte/progress", id), OWNER),
    )
    .await;
    assert_eq!(module["answered"], 1);
    assert_eq!(module["total"], 3);

    let (status, state) = call(
        app,
        post(
            &format!("/projects/{}/wizard/navigate", id),
            OWNER,
            json!({"moduleIndex": 2, "questionIndex": 1}),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(state["currentModule"], 2);
    assert_eq!(state["currentQuestion"], 1);

    let (_, state) = call(app, get(&format!("/projects/{}/wizard", id), OWNER)).await;
    assert_eq!(state["currentModule"], 2);

    Ok(())
}

#[actix_rt::test]
async fn test_prompt_generate_and_validate() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;
    let id = create_project(app).await;

    call(
        app,
        put(
            &format!("/projects/{}/modules/contexte/answers/service_demandeur", id),
            OWNER,
            json!({"questionLabel": "Service", "value": "Service accueil"}),
        ),
    )
    .await;

    let (status, body) = call(
        app,
        get(&format!("/projects/{}/modules/contexte/prompt", id), OWNER),
    )
    .await;
    assert_eq!(status, 200);
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("Service demandeur : Service accueil"));
    assert!(prompt.contains("Direction du numérique"));
    assert!(!prompt.contains("{conditional_answers}"));
    assert_eq!(test_app.mock_llm_client.get_call_count(), 0);

    let (status, body) = call(
        app,
        post(&format!("/projects/{}/modules/contexte/generate", id), OWNER, json!({})),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["content"], "Le service souhaite moderniser son organisation.");
    assert_eq!(test_app.mock_llm_client.get_call_count(), 1);

    let (status, section) = call(
        app,
        post(
            &format!("/projects/{}/modules/contexte/validate", id),
            OWNER,
            json!({"content": "Contexte validé."}),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(section["content"], "Contexte validé.");
    assert!(section["validatedAt"].is_string());

    let (_, project) = call(app, get(&format!("/projects/{}", id), OWNER)).await;
    assert_eq!(project["context"], "Contexte validé.");
    assert_eq!(project["wizardState"]["modules"]["contexte"]["status"], "completed");

    let (status, _) = call(
        app,
        post(
            &format!("/projects/{}/modules/contexte/validate", id),
            OWNER,
            json!({"content": "   "}),
        ),
    )
    .await;
    assert_eq!(status, 400);

    Ok(())
}

#[actix_rt::test]
async fn test_caller_identity_and_ownership() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;
    let id = create_project(app).await;

    let req = TestRequest::get().uri(&format!("/projects/{}", id)).to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let (status, body) = call(app, get(&format!("/projects/{}", id), INTRUDER)).await;
    assert_eq!(status, 403);
    assert!(body["error"].as_str().unwrap().starts_with("Forbidden"));

    let (status, _) = call(
        app,
        put(
            &format!("/projects/{}/modules/contexte/answers/service_demandeur", id),
            INTRUDER,
            json!({"questionLabel": "Service", "value": "Intrus"}),
        ),
    )
    .await;
    assert_eq!(status, 403);

    let (status, _) = call(app, get("/projects/unknown", OWNER)).await;
    assert_eq!(status, 404);

    let (status, _) = call(
        app,
        get(&format!("/projects/{}/modules/inconnu/questions", id), OWNER),
    )
    .await;
    assert_eq!(status, 404);

    let (status, _) = call(app, post("/projects", OWNER, json!({"title": "  "}))).await;
    assert_eq!(status, 400);

    Ok(())
}

#[actix_rt::test]
async fn test_generation_requires_configured_llm() -> anyhow::Result<()> {
    let test_app = setup_test_app_with(false).await?;
    let app = &test_app.app;
    let id = create_project(app).await;

    let (status, body) = call(
        app,
        post(&format!("/projects/{}/modules/contexte/generate", id), OWNER, json!({})),
    )
    .await;
    assert_eq!(status, 412);
    assert!(body["error"].is_string());

    let (status, _) = call(
        app,
        get(&format!("/projects/{}/modules/contexte/prompt", id), OWNER),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(test_app.mock_llm_client.get_call_count(), 0);

    Ok(())
}
