use axum::body::Body;
use axum::http::{Request, StatusCode};
use gameshelf::api::{self, AppState};
use gameshelf::config::{Config, Environment};
use gameshelf::db::init_db;
use gameshelf::urlcheck::{MockUrlChecker, UrlChecker};
use gameshelf::Repository;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

const PASSWORD: &str = "hunter2";
const BOUNDARY: &str = "X-BOUNDARY";

struct TestApp {
    app: axum::Router,
    repo: Arc<Repository>,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");
    let repo = Arc::new(Repository::new(pool));

    let config = Config {
        port: 0,
        database_path: db_path,
        admin_password: PASSWORD.to_string(),
        environment: Environment::Development,
        rate_limit_max_requests: 1000,
        rate_limit_window_ms: 60_000,
        rate_limit_block_ms: 300_000,
    };

    let url_checker: Arc<dyn UrlChecker> = Arc::new(MockUrlChecker::new());
    let state = AppState::new(repo.clone(), config, url_checker);

    TestApp {
        app: api::create_router(state),
        repo,
        _temp: temp_dir,
    }
}

async fn login(app: axum::Router) -> String {
    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(format!("{{\"password\":\"{}\"}}", PASSWORD)))
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

fn multipart_body(file_name: &str, content_type: &str, data: &str) -> Vec<u8> {
    format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\
         \r\n\
         {data}\r\n\
         --{boundary}--\r\n",
        boundary = BOUNDARY,
    )
    .into_bytes()
}

fn import_request(cookie: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/games/import")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header("cookie", cookie)
        .body(Body::from(body))
        .unwrap()
}

async fn send(app: axum::Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_template_download_headers() {
    let test_app = setup_test_app().await;

    let req = Request::builder()
        .method("GET")
        .uri("/api/games/import")
        .body(Body::empty())
        .unwrap();
    let resp = test_app.app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "text/csv");
    assert_eq!(
        resp.headers().get("content-disposition").unwrap(),
        "attachment; filename=\"games_template.csv\""
    );

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.starts_with("name,description,game_url"));
}

#[tokio::test]
async fn test_import_requires_session() {
    let test_app = setup_test_app().await;

    let csv = "name,description,game_url,thumbnail_url,category,namespace,size_width,size_height,rating,platform\n\
               Snake,,https://example.com/snake,,,,,,,\n";
    let req = import_request("", multipart_body("games.csv", "text/csv", csv));
    let (status, _json) = send(test_app.app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_import_mixed_rows_reports_per_row_errors() {
    let test_app = setup_test_app().await;
    let cookie = login(test_app.app.clone()).await;

    let csv = "name,description,game_url,thumbnail_url,category,namespace,size_width,size_height,rating,platform\n\
               Snake,Classic,https://example.com/snake,,Puzzle,,640,480,4.2,Web\n\
               ,,https://example.com/orphan,,,,,,,\n\
               Pinball,,https://example.com/pinball,,,,,,,\n";
    let req = import_request(&cookie, multipart_body("games.csv", "text/csv", csv));
    let (status, json) = send(test_app.app.clone(), req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        json["message"],
        "Import completed: 2 successful, 1 failed"
    );
    assert_eq!(json["results"]["success"], 2);
    assert_eq!(json["results"]["failed"], 1);
    let errors = json["results"]["errors"].as_array().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().starts_with("Row 3:"));

    // imported rows are queryable afterwards
    let snake = test_app
        .repo
        .get_game_by_slug("snake")
        .await
        .unwrap()
        .expect("snake missing");
    assert_eq!(snake.category_name.as_deref(), Some("Puzzle"));
    assert_eq!(snake.size_width, 640);
}

#[tokio::test]
async fn test_import_rejects_non_csv_upload() {
    let test_app = setup_test_app().await;
    let cookie = login(test_app.app.clone()).await;

    let req = import_request(
        &cookie,
        multipart_body("games.json", "application/json", "{}"),
    );
    let (status, json) = send(test_app.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "please upload a CSV file");
}

#[tokio::test]
async fn test_import_without_file_field() {
    let test_app = setup_test_app().await;
    let cookie = login(test_app.app.clone()).await;

    let body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"notes\"\r\n\
         \r\n\
         hello\r\n\
         --{boundary}--\r\n",
        boundary = BOUNDARY,
    )
    .into_bytes();
    let req = import_request(&cookie, body);
    let (status, json) = send(test_app.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "no file provided");
}
