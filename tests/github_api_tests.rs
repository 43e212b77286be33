//! GitHub client tests against a local mock of the REST API.

use assert_cmd::cargo::cargo_bin_cmd;
use axum::Router;
use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use predicates::prelude::*;
use prcontext::config::{GithubSettings, Settings};
use prcontext::context::full_review_context;
use prcontext::github::{CiSummary, GitHubClient};
use prcontext::repo::RepoSlug;
use serde_json::{Value, json};

const TOKEN: &str = "test-token";
const HEAD_SHA: &str = "0123456789abcdef0123456789abcdef01234567";

const RSPEC_JOB_LOG: &str = "\
2024-05-01T10:00:00Z Failures:
  1) Cart totals the items
# ./spec/cart_spec.rb:17
     Failure/Error: expect(cart.total).to eq(30)
       expected: 30
            got: 25
Finished in 0.4 seconds
";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

async fn pull_request(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    axum::Json(json!({
        "number": 7,
        "title": "Fix cart totals",
        "body": "Fixes SHOP-42 and relates to OPS-7",
        "state": "open",
        "draft": false,
        "head": { "ref": "fix-cart", "sha": HEAD_SHA },
        "base": { "ref": "main", "sha": "fedcba9876543210" },
        "user": { "login": "octocat" },
        "created_at": "2024-05-01T09:00:00Z",
        "updated_at": "2024-05-01T09:30:00Z",
        "mergeable_state": "clean",
        "html_url": "https://github.com/acme/widgets/pull/7"
    }))
    .into_response()
}

async fn issue_comments() -> axum::Json<Value> {
    axum::Json(json!([
        { "user": null, "body": "Also touches SHOP-42", "created_at": "2024-05-01T09:10:00Z" }
    ]))
}

async fn review_comments() -> axum::Json<Value> {
    axum::Json(json!([
        {
            "user": { "login": "reviewer" },
            "body": "Use checked_add here",
            "path": "src/cart.rs",
            "line": 12,
            "created_at": "2024-05-01T09:20:00Z"
        }
    ]))
}

async fn reviews() -> axum::Json<Value> {
    axum::Json(json!([
        {
            "user": { "login": "reviewer" },
            "state": "CHANGES_REQUESTED",
            "body": null,
            "submitted_at": "2024-05-01T09:25:00Z"
        }
    ]))
}

async fn commits() -> axum::Json<Value> {
    axum::Json(json!([
        {
            "sha": HEAD_SHA,
            "commit": { "message": "BILL-9 fix rounding", "author": { "name": "Octo Cat" } }
        }
    ]))
}

fn run(id: u64, name: &str, conclusion: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "completed",
        "conclusion": conclusion,
        "html_url": format!("https://github.com/acme/widgets/actions/runs/{}", id),
        "created_at": "2024-05-01T09:31:00Z",
        "updated_at": "2024-05-01T09:40:00Z",
        "head_branch": "fix-cart"
    })
}

async fn workflow_runs() -> axum::Json<Value> {
    axum::Json(json!({
        "total_count": 2,
        "workflow_runs": [run(900, "Lint", "success"), run(901, "Tests", "failure")]
    }))
}

async fn run_jobs(Path(run_id): Path<u64>) -> Response {
    if run_id != 901 {
        return StatusCode::NOT_FOUND.into_response();
    }
    axum::Json(json!({
        "total_count": 3,
        "jobs": [
            {
                "id": 501,
                "name": "rspec (3.3)",
                "status": "completed",
                "conclusion": "failure",
                "started_at": "2024-05-01T09:32:00Z",
                "completed_at": "2024-05-01T09:39:00Z",
                "html_url": "https://github.com/acme/widgets/actions/runs/901/job/501",
                "steps": [
                    { "name": "Checkout", "conclusion": "success", "number": 1 },
                    { "name": "Run specs", "conclusion": "failure", "number": 2 }
                ]
            },
            {
                "id": 502,
                "name": "jest",
                "status": "completed",
                "conclusion": "cancelled",
                "started_at": null,
                "completed_at": null,
                "html_url": null
            },
            {
                "id": 503,
                "name": "build",
                "status": "completed",
                "conclusion": "success",
                "started_at": "2024-05-01T09:32:00Z",
                "completed_at": "2024-05-01T09:35:00Z",
                "html_url": "https://github.com/acme/widgets/actions/runs/901/job/503",
                "steps": []
            }
        ]
    }))
    .into_response()
}

async fn job_logs(Path(job_id): Path<u64>) -> Response {
    match job_id {
        501 => RSPEC_JOB_LOG.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

fn router() -> Router {
    Router::new()
        .route("/repos/acme/widgets/pulls/7", get(pull_request))
        .route("/repos/acme/widgets/issues/7/comments", get(issue_comments))
        .route("/repos/acme/widgets/pulls/7/comments", get(review_comments))
        .route("/repos/acme/widgets/pulls/7/reviews", get(reviews))
        .route("/repos/acme/widgets/pulls/7/commits", get(commits))
        .route("/repos/acme/widgets/actions/runs", get(workflow_runs))
        .route("/repos/acme/widgets/actions/runs/{run_id}/jobs", get(run_jobs))
        .route("/repos/acme/widgets/actions/jobs/{job_id}/logs", get(job_logs))
}

/// Serve the mock API on an ephemeral port and return its base URL.
async fn spawn_mock_api() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router()).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client_for(api_url: &str, token: &str) -> GitHubClient {
    let settings = GithubSettings {
        api_url: api_url.to_string(),
        ..GithubSettings::default()
    };
    GitHubClient::new(token, &settings).unwrap()
}

fn slug() -> RepoSlug {
    RepoSlug::new("acme", "widgets")
}

#[tokio::test]
async fn test_pr_details_summarizes_everything() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, TOKEN);

    let details = client.pr_details(&slug(), 7).await.unwrap();

    assert_eq!(details.pr.title, "Fix cart totals");
    assert_eq!(details.pr.head, "fix-cart");
    assert_eq!(details.pr.base, "main");
    assert_eq!(details.pr.user, "octocat");
    assert_eq!(details.comments.len(), 1);
    assert_eq!(details.comments[0].user, "ghost");
    assert_eq!(details.review_comments[0].path, "src/cart.rs");
    assert_eq!(details.review_comments[0].line, Some(12));
    assert_eq!(details.reviews[0].state, "CHANGES_REQUESTED");
    assert_eq!(details.commits[0].sha, "0123456");
    assert_eq!(details.commits[0].author.as_deref(), Some("Octo Cat"));
}

#[tokio::test]
async fn test_bad_token_surfaces_status() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, "wrong");

    let err = client.pr_details(&slug(), 7).await.unwrap_err();
    assert!(err.to_string().contains("401"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_ci_summary_prefers_tests_workflow() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, TOKEN);

    let summary = client.ci_summary(&slug(), 7, "Tests", 10).await.unwrap();

    let CiSummary::Report {
        tests_run,
        failed_jobs,
        all_runs,
    } = summary
    else {
        panic!("expected a CI report");
    };
    assert_eq!(tests_run.run.id, 901);
    assert_eq!(tests_run.failed_job_count, 2);
    assert_eq!(all_runs.len(), 2);
    assert_eq!(failed_jobs[0].name, "rspec (3.3)");
    assert_eq!(failed_jobs[0].steps.len(), 1);
    assert_eq!(failed_jobs[0].steps[0].name, "Run specs");
    assert_eq!(failed_jobs[1].conclusion.as_deref(), Some("cancelled"));
}

#[tokio::test]
async fn test_ci_summary_falls_back_to_first_run() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, TOKEN);

    let summary = client.ci_summary(&slug(), 7, "Deploy", 10).await.unwrap();

    let CiSummary::Report {
        tests_run,
        failed_jobs,
        ..
    } = summary
    else {
        panic!("expected a CI report");
    };
    assert_eq!(tests_run.run.id, 900);
    assert_eq!(tests_run.failed_job_count, 0);
    assert!(failed_jobs.is_empty());
}

#[tokio::test]
async fn test_failing_jobs_skips_successful_jobs() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, TOKEN);

    let jobs = client.failing_jobs(&slug(), 901).await.unwrap();
    let ids: Vec<u64> = jobs.iter().map(|j| j.id).collect();
    assert_eq!(ids, vec![501, 502]);
}

#[tokio::test]
async fn test_job_logs_returns_raw_text() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, TOKEN);

    let raw = client.job_logs(&slug(), 501).await.unwrap();
    assert!(raw.contains("Cart totals the items"));
}

#[tokio::test]
async fn test_job_logs_not_found_is_an_error() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, TOKEN);

    let err = client.job_logs(&slug(), 502).await.unwrap_err();
    assert!(err.to_string().contains("404"), "unexpected error: {}", err);
}

#[tokio::test]
async fn test_full_review_context_with_logs() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, TOKEN);

    let context = full_review_context(&client, &slug(), 7, true, &Settings::default())
        .await
        .unwrap();

    assert!(context.tickets.starts_with("Tickets Found (3):"));
    assert!(context.tickets.contains("- SHOP-42"));
    assert!(context.tickets.contains("- BILL-9"));
    assert_eq!(context.ci.failed_jobs().len(), 2);

    let logs = context.failing_job_logs.unwrap();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].job_id, 501);
    let compressed = logs[0].logs.as_deref().unwrap();
    assert!(compressed.starts_with("RSpec Failures (1):"));
    assert!(compressed.contains("1. Cart totals the items"));
    assert!(compressed.contains("File: spec/cart_spec.rb:17"));
    assert!(compressed.contains("Error: expected: 30 got: 25"));

    // The cancelled job's log is missing; its sibling is unaffected
    assert!(logs[1].logs.is_none());
    assert!(
        logs[1]
            .error
            .as_deref()
            .unwrap()
            .starts_with("Failed to fetch job logs:")
    );
}

#[tokio::test]
async fn test_full_review_context_without_logs() {
    let api = spawn_mock_api().await;
    let client = client_for(&api, TOKEN);

    let context = full_review_context(&client, &slug(), 7, false, &Settings::default())
        .await
        .unwrap();
    assert!(context.failing_job_logs.is_none());

    let value = serde_json::to_value(&context).unwrap();
    assert_eq!(value["pr"]["number"], 7);
    assert_eq!(value["ci"]["tests_run"]["id"], 901);
    assert!(value.get("failing_job_logs").is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cli_logs_command_against_mock() {
    let api = spawn_mock_api().await;

    let output = tokio::task::spawn_blocking(move || {
        cargo_bin_cmd!("prcontext")
            .args(["--owner", "acme", "--repo", "widgets"])
            .args(["logs", "501", "--job-name", "rspec (3.3)"])
            .env("PRCONTEXT_API_URL", &api)
            .env("GITHUB_TOKEN", TOKEN)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(predicate::str::contains("RSpec Failures (1):").eval(&stdout));
    assert!(predicate::str::contains("File: spec/cart_spec.rb:17").eval(&stdout));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_cli_tickets_command_against_mock() {
    let api = spawn_mock_api().await;

    let output = tokio::task::spawn_blocking(move || {
        cargo_bin_cmd!("prcontext")
            .args(["--owner", "acme", "--repo", "widgets", "tickets", "7"])
            .env("PRCONTEXT_API_URL", &api)
            .env("GITHUB_TOKEN", TOKEN)
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(predicate::str::contains("Tickets Found (3):").eval(&stdout));
    assert!(predicate::str::contains("- OPS-7").eval(&stdout));
}
