mod common;

use common::{call, create_project, get, post, put, setup_test_app, INTRUDER, OWNER};
use serde_json::json;

#[actix_rt::test]
async fn test_choices_synthesized_into_section() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;
    let mock = &test_app.mock_llm_client;
    let id = create_project(app).await;

    let (status, session) = call(
        app,
        post(
            &format!("/projects/{}/modules/objectifs/questions/benefices/choices", id),
            OWNER,
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, 201, "{}", session);
    let session_id = session["id"].as_str().unwrap().to_string();
    assert!(!session["questionLabel"].as_str().unwrap().is_empty());
    assert_eq!(session["maxGenerations"], 3);

    mock.push_json(json!({
        "choices": ["Gain de temps", "Moins d'erreurs", "gain de temps", " "]
    }));
    let (status, choices) = call(
        app,
        post(&format!("/choices/{}/generate", session_id), OWNER, json!({})),
    )
    .await;
    assert_eq!(status, 200);
    let choices = choices.as_array().unwrap().clone();
    assert_eq!(choices.len(), 2);

    let first_id = choices[0]["id"].as_str().unwrap();
    let (status, toggled) = call(
        app,
        post(
            &format!("/choices/{}/toggle/{}", session_id, first_id),
            OWNER,
            json!({}),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(toggled["selected"], true);

    let (status, _) = call(
        app,
        post(&format!("/choices/{}/toggle/unknown", session_id), OWNER, json!({})),
    )
    .await;
    assert_eq!(status, 404);

    let (status, added) = call(
        app,
        post(
            &format!("/choices/{}/free-input", session_id),
            OWNER,
            json!({"text": "Meilleur suivi des dossiers"}),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(added["source"], "user");
    assert_eq!(added["selected"], true);

    let (status, session) = call(
        app,
        put(
            &format!("/choices/{}/free-text", session_id),
            OWNER,
            json!({"text": "Priorité au service accueil."}),
        ),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(session["freeText"], "Priorité au service accueil.");
    assert_eq!(session["choices"].as_array().unwrap().len(), 3);

    mock.push_json(json!({"choices": ["Gain de temps", "Traçabilité"]}));
    let (status, more) = call(
        app,
        post(&format!("/choices/{}/more", session_id), OWNER, json!({})),
    )
    .await;
    assert_eq!(status, 200);
    let more = more.as_array().unwrap();
    assert_eq!(more.len(), 1);
    assert_eq!(more[0]["label"], "Traçabilité");

    mock.push_json(json!({
        "text": "Le projet vise un gain de temps et un meilleur suivi des dossiers."
    }));
    let (status, section) = call(
        app,
        post(&format!("/choices/{}/synthesize", session_id), OWNER, json!({})),
    )
    .await;
    assert_eq!(status, 200, "{}", section);
    assert_eq!(
        section["content"],
        "Le projet vise un gain de temps et un meilleur suivi des dossiers."
    );

    let (_, project) = call(app, get(&format!("/projects/{}", id), OWNER)).await;
    assert_eq!(
        project["objectives"],
        "Le projet vise un gain de temps et un meilleur suivi des dossiers."
    );

    let (status, _) = call(
        app,
        post(&format!("/choices/{}/generate", session_id), OWNER, json!({})),
    )
    .await;
    assert_eq!(status, 404);

    Ok(())
}

#[actix_rt::test]
async fn test_choice_session_rules() -> anyhow::Result<()> {
    let test_app = setup_test_app().await?;
    let app = &test_app.app;
    let mock = &test_app.mock_llm_client;
    let id = create_project(app).await;

    let (_, session) = call(
        app,
        post(
            &format!("/projects/{}/modules/objectifs/questions/benefices/choices", id),
            OWNER,
            json!({"questionLabel": "Quels bénéfices attendez-vous ?"}),
        ),
    )
    .await;
    let session_id = session["id"].as_str().unwrap().to_string();
    assert_eq!(session["questionLabel"], "Quels bénéfices attendez-vous ?");

    let (status, _) = call(
        app,
        post(&format!("/choices/{}/generate", session_id), INTRUDER, json!({})),
    )
    .await;
    assert_eq!(status, 403);

    let (status, _) = call(
        app,
        post(&format!("/choices/{}/synthesize", session_id), OWNER, json!({})),
    )
    .await;
    assert_eq!(status, 400);

    let (status, _) = call(
        app,
        post(
            &format!("/choices/{}/free-input", session_id),
            OWNER,
            json!({"text": "  "}),
        ),
    )
    .await;
    assert_eq!(status, 400);

    mock.push_json(json!({"choices": ["A"]}));
    call(app, post(&format!("/choices/{}/generate", session_id), OWNER, json!({}))).await;
    mock.push_json(json!({"choices": ["B"]}));
    call(app, post(&format!("/choices/{}/more", session_id), OWNER, json!({}))).await;
    mock.push_json(json!({"choices": ["C"]}));
    let (status, _) = call(app, post(&format!("/choices/{}/more", session_id), OWNER, json!({}))).await;
    assert_eq!(status, 200);

    let calls = mock.get_call_count();
    let (status, body) = call(app, post(&format!("/choices/{}/more", session_id), OWNER, json!({}))).await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("No more generations"));
    assert_eq!(mock.get_call_count(), calls);

    let (status, _) = call(app, post("/choices/unknown/generate", OWNER, json!({}))).await;
    assert_eq!(status, 404);

    Ok(())
}
