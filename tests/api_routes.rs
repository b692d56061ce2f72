use career_copilot::core::ConfigManager;
use career_copilot::{build_rocket, CareerCopilot};
use mockito::{Matcher, Server, ServerGuard};
use rocket::http::{ContentType, Status};
use rocket::local::asynchronous::Client;
use serde_json::{json, Value};

const RESUME: &str = "Backend engineer with eight years of experience in Rust, tokio, SQLite and Kubernetes. Skills: distributed systems, observability, API design.";

fn config_for(server: &ServerGuard) -> ConfigManager {
    let mut config = ConfigManager::default();
    config.llm.base_url = server.url();
    config.llm.timeout_seconds = 5;
    config.providers.timeout_seconds = 5;
    config.providers.linkedin.timeout_seconds = 5;
    config.providers.linkedin.base_url = server.url();
    config.providers.remoteok.base_url = server.url();
    config.providers.themuse.base_url = server.url();
    config
}

async fn client_for(server: &ServerGuard) -> Client {
    let copilot = CareerCopilot::new(config_for(server)).expect("copilot");
    Client::tracked(build_rocket(copilot))
        .await
        .expect("valid rocket instance")
}

async fn post_json(client: &Client, path: &str, body: Value) -> (Status, Value) {
    let response = client
        .post(path)
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch()
        .await;
    let status = response.status();
    let json = response.into_json::<Value>().await.unwrap_or(Value::Null);
    (status, json)
}

async fn mock_remoteok(server: &mut ServerGuard) -> mockito::Mock {
    server
        .mock("GET", "/api")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"legal": "terms"},
                {"id": "7", "position": "Rust Engineer", "company": "Oxide", "description": "Rust and tokio services"},
                {"id": "8", "position": "Rust Developer", "company": "Fly.io", "description": "Rust runtime"}
            ])
            .to_string(),
        )
        .create_async()
        .await
}

async fn mock_anthropic(server: &mut ServerGuard, status: usize, text: &str) -> mockito::Mock {
    server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-test")
        .match_header("anthropic-version", "2023-06-01")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(json!({"content": [{"type": "text", "text": text}]}).to_string())
        .create_async()
        .await
}

#[rocket::async_test]
async fn test_health_reports_sources_with_cors() {
    let server = Server::new_async().await;
    let client = client_for(&server).await;

    let response = client.get("/health").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );

    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"], json!(["linkedin", "remoteok", "themuse"]));
    assert_eq!(body["aiConfigured"], false);
}

#[rocket::async_test]
async fn test_preflight_is_accepted_anywhere() {
    let server = Server::new_async().await;
    let client = client_for(&server).await;

    let response = client.options("/api/career/chat").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Methods"),
        Some("GET, POST, OPTIONS")
    );
}

#[rocket::async_test]
async fn test_error_envelopes() {
    let server = Server::new_async().await;
    let client = client_for(&server).await;

    let (status, body) = post_json(&client, "/api/career/chat", json!({"message": "   "})).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["type"], "error");
    assert_eq!(body["success"], false);
    assert_eq!(body["errorCode"], "EMPTY_MESSAGE");
    assert!(!body["suggestions"].as_array().unwrap().is_empty());

    let response = client
        .post("/api/career/chat")
        .header(ContentType::JSON)
        .body("{not json")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["errorCode"], "BAD_REQUEST");

    let response = client.get("/api/nowhere").dispatch().await;
    assert_eq!(response.status(), Status::NotFound);
    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["errorCode"], "NOT_FOUND");

    let (status, body) =
        post_json(&client, "/api/career/linkedin-post", json!({"content": ""})).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["errorCode"], "MISSING_CONTENT");
}

#[rocket::async_test]
async fn test_templates_without_api_key() {
    let server = Server::new_async().await;
    let client = client_for(&server).await;

    let (status, body) = post_json(
        &client,
        "/api/career/cover-letter",
        json!({"jobTitle": "Data Engineer", "companyName": "Stripe"}),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["toolUsed"], "cover_letter_template");
    assert_eq!(body["template"], true);
    assert!(body["coverLetter"]
        .as_str()
        .unwrap()
        .contains("Data Engineer position at Stripe"));
    assert_eq!(body["analysis"]["tone"], "professional");

    let (status, body) = post_json(
        &client,
        "/api/career/linkedin-post",
        json!({"content": "our open source launch", "includeHashtags": false}),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["toolUsed"], "linkedin_post_template");
    assert_eq!(body["analysis"]["hashtagCount"], 0);

    let (status, body) =
        post_json(&client, "/api/career/chat", json!({"message": "hello there"})).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["toolUsed"], "general_help");
}

#[rocket::async_test]
async fn test_cover_letter_with_api_key() {
    let mut server = Server::new_async().await;
    let anthropic = mock_anthropic(
        &mut server,
        200,
        "Dear Hiring Manager,\n\nI build reliable systems.\n\nBest regards,\nSam",
    )
    .await;
    let client = client_for(&server).await;

    let (status, body) = post_json(
        &client,
        "/api/career/cover-letter",
        json!({
            "message": "Write a cover letter for Software Engineer at Google",
            "resume": RESUME,
            "apiKey": "sk-test"
        }),
    )
    .await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["toolUsed"], "draft_cover_letter");
    assert_eq!(body["template"], false);
    assert_eq!(body["analysis"]["company"], "Google");
    assert_eq!(body["analysis"]["model"], "claude-3-haiku-20240307");
    assert!(body["coverLetter"]
        .as_str()
        .unwrap()
        .starts_with("Dear Hiring Manager,"));
    anthropic.assert_async().await;

    // with a key, a company that cannot be found is a client error
    let (status, body) = post_json(
        &client,
        "/api/career/cover-letter",
        json!({"jobTitle": "Engineer", "apiKey": "sk-test"}),
    )
    .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["errorCode"], "MISSING_COMPANY");
}

#[rocket::async_test]
async fn test_llm_failure_degrades_to_template() {
    let mut server = Server::new_async().await;
    let _anthropic = mock_anthropic(&mut server, 529, "overloaded").await;
    let client = client_for(&server).await;

    let (status, body) = post_json(
        &client,
        "/api/career/chat",
        json!({
            "message": "Draft a cover letter for Product Manager at Notion",
            "apiKey": "sk-test"
        }),
    )
    .await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["toolUsed"], "cover_letter_template_fallback");
    assert!(body["response"].as_str().unwrap().contains("529"));
}

#[rocket::async_test]
async fn test_job_search_endpoint() {
    let mut server = Server::new_async().await;
    let _remoteok = mock_remoteok(&mut server).await;
    let _muse = server
        .mock("GET", "/api/public/jobs")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let client = client_for(&server).await;

    let response = client
        .get("/api/linkedin/jobs?keywords=rust&limit=5&includeLinkedIn=false")
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let body = response.into_json::<Value>().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["jobs"].as_array().unwrap().len(), 2);
    assert_eq!(body["metadata"]["linkedinJobs"], 0);
    assert_eq!(body["metadata"]["failures"][0]["source"], "themuse");
    assert!(body["response"]
        .as_str()
        .unwrap()
        .contains("**Rust Engineer** at Oxide"));
}

#[rocket::async_test]
async fn test_chat_job_search_then_scoring() {
    let mut server = Server::new_async().await;
    let _remoteok = mock_remoteok(&mut server).await;
    let _linkedin = server
        .mock("GET", "/jobs/search")
        .match_query(Matcher::Any)
        .with_status(403)
        .create_async()
        .await;
    let client = client_for(&server).await;

    let (status, first) = post_json(
        &client,
        "/api/career/chat",
        json!({"message": "Find remote rust jobs"}),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(first["toolUsed"], "fetch_jobs");
    let jobs = first["data"]["jobs"].as_array().unwrap().clone();
    assert!(jobs.iter().any(|j| j["company"] == "Oxide"));

    let (status, second) = post_json(
        &client,
        "/api/career/chat",
        json!({
            "message": format!("Please score my resume: {}", RESUME),
            "conversationHistory": [
                {"type": "user", "content": "Find remote rust jobs"},
                {"type": "assistant", "content": first["response"], "data": first["data"]}
            ]
        }),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(second["toolUsed"], "score_jobs_against_resume");
    assert_eq!(second["data"]["serviceUsed"], "keyword-fallback");
    assert_eq!(
        second["data"]["scores"].as_array().unwrap().len(),
        jobs.len()
    );
}

#[rocket::async_test]
async fn test_score_endpoint() {
    let server = Server::new_async().await;
    let client = client_for(&server).await;

    let (status, body) = post_json(
        &client,
        "/api/career/score",
        json!({
            "resume": {"content": RESUME, "skills": ["Rust", "Kubernetes"]},
            "jobs": [
                {"id": "a", "title": "Rust Engineer", "company": "Oxide", "description": "Rust, tokio and Kubernetes"},
                {"title": "Pastry Chef", "company": "Bakery", "description": "Croissants"}
            ]
        }),
    )
    .await;

    assert_eq!(status, Status::Ok);
    assert_eq!(body["toolUsed"], "score_jobs_against_resume");
    assert_eq!(body["serviceUsed"], "keyword-fallback");
    assert_eq!(body["jobsScored"], 2);
    let scores = body["scores"].as_array().unwrap();
    assert_eq!(scores.len(), 2);
    for score in scores {
        let overall = score["overallScore"].as_u64().unwrap();
        assert!(overall <= 100);
    }

    let (status, body) = post_json(
        &client,
        "/api/career/score",
        json!({"resume": "  ", "jobs": [{"title": "Rust Engineer"}]}),
    )
    .await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["errorCode"], "MISSING_RESUME");
}

#[rocket::async_test]
async fn test_anthropic_relay() {
    let mut server = Server::new_async().await;
    let anthropic = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "sk-test")
        .match_body(Matcher::PartialJson(json!({
            "max_tokens": 300,
            "messages": [{"role": "user", "content": "Summarize my week"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"content": [{"type": "text", "text": "A productive week."}]}).to_string())
        .create_async()
        .await;
    let client = client_for(&server).await;

    let (status, body) = post_json(
        &client,
        "/api/anthropic",
        json!({"prompt": "Summarize my week", "max_tokens": 300, "apiKey": "sk-test"}),
    )
    .await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["content"][0]["type"], "text");
    assert_eq!(body["content"][0]["text"], "A productive week.");
    assert_eq!(body["model"], "claude-3-haiku-20240307");
    anthropic.assert_async().await;

    // no key in the body and none configured on the server
    let (status, body) =
        post_json(&client, "/api/anthropic", json!({"prompt": "Summarize my week"})).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["errorCode"], "MISSING_API_KEY");

    let (status, body) =
        post_json(&client, "/api/anthropic", json!({"prompt": " ", "apiKey": "sk-test"})).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["errorCode"], "MISSING_PROMPT");
}

#[rocket::async_test]
async fn test_anthropic_relay_reports_upstream_failure() {
    let mut server = Server::new_async().await;
    let _anthropic = mock_anthropic(&mut server, 529, "overloaded").await;
    let client = client_for(&server).await;

    let (status, body) = post_json(
        &client,
        "/api/anthropic",
        json!({"prompt": "Hello", "apiKey": "sk-test"}),
    )
    .await;
    assert_eq!(status, Status::BadGateway);
    assert_eq!(body["success"], false);
    assert_eq!(body["errorCode"], "UPSTREAM_ERROR");
    assert!(!body.to_string().contains("sk-test"));
}

#[rocket::async_test]
async fn test_linkedin_summary() {
    let mut server = Server::new_async().await;
    let anthropic = mock_anthropic(
        &mut server,
        200,
        "Jane writes about production Rust and hiring.",
    )
    .await;
    let client = client_for(&server).await;

    let profile = json!({
        "username": "jane-doe",
        "headline": "Staff Engineer",
        "posts": [
            {"content": "Async rust in production #Rust", "likes": 30, "comments": 4, "shares": 2},
            {"content": "We are hiring #Rust #Hiring", "likes": 10}
        ],
        "include_metrics": true,
        "max_posts": 10
    });

    let (status, body) = post_json(&client, "/api/linkedin/summary", profile.clone()).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["success"], true);
    assert_eq!(body["dataSource"], "template");
    assert_eq!(body["toolUsed"], "profile_summary_template");
    assert_eq!(body["engagementMetrics"]["totalPosts"], 2);
    assert_eq!(body["engagementMetrics"]["avgEngagement"], 23.0);
    assert_eq!(body["engagementMetrics"]["topTopics"], json!(["Rust", "Hiring"]));
    assert!(body["summary"].as_str().unwrap().contains("## jane-doe"));

    let mut with_key = profile;
    with_key["apiKey"] = json!("sk-test");
    let (status, body) = post_json(&client, "/api/linkedin/summary", with_key).await;
    assert_eq!(status, Status::Ok);
    assert_eq!(body["dataSource"], "claude_ai_analysis");
    assert_eq!(body["template"], false);
    assert_eq!(body["summary"], "Jane writes about production Rust and hiring.");
    assert_eq!(body["model"], "claude-3-haiku-20240307");
    anthropic.assert_async().await;

    let (status, body) =
        post_json(&client, "/api/linkedin/summary", json!({"username": ""})).await;
    assert_eq!(status, Status::BadRequest);
    assert_eq!(body["errorCode"], "MISSING_USERNAME");
}
