//! In-process stand-in for the content service

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
};
use serde_json::{Value, json};
use webnovel_client::{
    ApiClient, ClientConfig,
    storage::{MemoryStorage, SharedStorage},
    store::AuthStore,
};

pub const TOKEN: &str = "jwt-token";
pub const PASSWORD: &str = "hunter2";
pub const EPUB_BYTES: &[u8] = b"PK\x03\x04mimetypeapplication/epub+zip";

#[derive(Default)]
pub struct ServerState {
    pub novels: Vec<Value>,
    pub chapter_count: u32,
    pub settings: Value,
    pub hits: HashMap<&'static str, usize>,
    pub failures: HashMap<&'static str, usize>,
    pub queries: HashMap<&'static str, HashMap<String, String>>,
    pub bodies: HashMap<&'static str, Value>,
}

pub type Shared = Arc<Mutex<ServerState>>;

pub struct FakeService {
    pub state: Shared,
    pub base_url: String,
}

impl FakeService {
    pub fn hits(&self, route: &str) -> usize {
        self.state.lock().unwrap().hits.get(route).copied().unwrap_or(0)
    }

    pub fn fail(&self, route: &'static str, times: usize) {
        self.state.lock().unwrap().failures.insert(route, times);
    }

    pub fn query(&self, route: &str) -> HashMap<String, String> {
        self.state
            .lock()
            .unwrap()
            .queries
            .get(route)
            .cloned()
            .unwrap_or_default()
    }

    pub fn body(&self, route: &str) -> Option<Value> {
        self.state.lock().unwrap().bodies.get(route).cloned()
    }

    pub fn config(&self) -> ClientConfig {
        ClientConfig::ephemeral(&self.base_url)
    }

    pub fn client(&self) -> (ApiClient, AuthStore, SharedStorage) {
        self.client_with(self.config())
    }

    pub fn client_with(&self, config: ClientConfig) -> (ApiClient, AuthStore, SharedStorage) {
        let storage = MemoryStorage::shared();
        let auth = AuthStore::new(storage.clone());
        let api = ApiClient::new(&config, auth.clone()).unwrap();
        (api, auth, storage)
    }
}

pub fn novel_json(id: &str, title: &str, kind: &str) -> Value {
    json!({
        "_id": id,
        "title": title,
        "author": "Guiltythree",
        "source_url": format!("https://novelbin.me/novel-book/{id}"),
        "source_name": "novelbin",
        "tags": ["Fantasy"],
        "status": "Ongoing",
        "type": kind,
        "chapters": [
            {"title": "Chapter 1", "chapter_number": 1, "url": "https://novelbin.me/1", "read": false, "downloaded": false},
            {"title": "Chapter 2", "chapter_number": 2, "url": "https://novelbin.me/2", "read": false, "downloaded": false}
        ],
        "added_at": "2024-04-18T10:12:34.123000",
        "last_updated_api": "2024-04-18T10:12:34.123000"
    })
}

pub fn user_json() -> Value {
    json!({
        "_id": "u1",
        "username": "reader",
        "email": "reader@example.com",
        "role": "user",
        "is_active": true,
        "preferences": {}
    })
}

fn chapter_json(n: u32) -> Value {
    json!({
        "title": format!("Chapter {n}"),
        "chapter_number": n,
        "chapter_title": null,
        "url": format!("https://novelbin.me/chapter-{n}"),
        "read": false,
        "downloaded": false
    })
}

pub async fn spawn() -> FakeService {
    let state: Shared = Arc::new(Mutex::new(ServerState {
        novels: vec![
            novel_json("n1", "Shadow Slave", "novel"),
            novel_json("m1", "Solo Leveling", "manhwa"),
        ],
        chapter_count: 120,
        settings: json!({"theme": "dark", "language": "es", "reader": {"fontSize": 18}}),
        ..Default::default()
    }));

    let app = Router::new()
        .route("/api/v1/novels", get(list_novels).post(create_novel))
        .route(
            "/api/v1/novels/{id}",
            get(get_novel).patch(update_novel).delete(delete_novel),
        )
        .route("/api/v1/novels/{id}/chapters", get(list_chapters))
        .route("/api/v1/novels/{id}/chapters/fetch", post(fetch_chapters))
        .route("/api/v1/novels/{id}/chapters/download", post(download_chapters))
        .route("/api/v1/novels/{id}/chapters/{n}", get(get_chapter))
        .route("/api/v1/novels/{id}/download", get(download_novel))
        .route("/api/v1/novels/{id}/reading-progress", patch(reading_progress))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/logout", post(logout))
        .route("/api/v1/auth/user", get(current_user))
        .route("/api/v1/settings", get(get_settings).put(put_settings))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    FakeService {
        state,
        base_url: format!("http://{addr}/api/v1"),
    }
}

/// A base URL nothing listens on
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1")
}

/// Counts the hit and answers 503 while failures are queued for `route`
fn hit(state: &Shared, route: &'static str) -> Option<Response> {
    let mut state = state.lock().unwrap();
    *state.hits.entry(route).or_default() += 1;
    match state.failures.get_mut(route) {
        Some(remaining) if *remaining > 0 => {
            *remaining -= 1;
            Some(
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    Json(json!({"detail": "upstream unavailable"})),
                )
                    .into_response(),
            )
        }
        _ => None,
    }
}

fn detail(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == format!("Bearer {TOKEN}"))
}

fn epub_response(disposition: Option<String>) -> Response {
    let mut res = (
        [(header::CONTENT_TYPE, "application/epub+zip")],
        EPUB_BYTES.to_vec(),
    )
        .into_response();
    if let Some(disposition) = disposition {
        if let Ok(value) = disposition.parse() {
            res.headers_mut().insert(header::CONTENT_DISPOSITION, value);
        }
    }
    res
}

fn find_novel(state: &ServerState, id: &str) -> Option<Value> {
    state.novels.iter().find(|n| n["_id"] == id).cloned()
}

async fn list_novels(
    State(state): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(res) = hit(&state, "list_novels") {
        return res;
    }
    let mut state = state.lock().unwrap();
    state.queries.insert("list_novels", query);
    Json(state.novels.clone()).into_response()
}

async fn create_novel(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(res) = hit(&state, "create_novel") {
        return res;
    }
    let mut state = state.lock().unwrap();
    if state
        .novels
        .iter()
        .any(|n| n["source_url"] == body["source_url"])
    {
        return detail(StatusCode::CONFLICT, "Novel with this source URL already exists");
    }

    let id = format!("n{}", state.novels.len() + 1);
    let mut novel = novel_json(&id, body["title"].as_str().unwrap_or("Scraped"), "novel");
    novel["source_url"] = body["source_url"].clone();
    novel["source_name"] = body["source_name"].clone();
    state.bodies.insert("create_novel", body);
    state.novels.push(novel.clone());
    (StatusCode::CREATED, Json(novel)).into_response()
}

async fn get_novel(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if let Some(res) = hit(&state, "get_novel") {
        return res;
    }
    match find_novel(&state.lock().unwrap(), &id) {
        Some(novel) => Json(novel).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Novel not found"),
    }
}

async fn update_novel(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(res) = hit(&state, "update_novel") {
        return res;
    }
    let mut state = state.lock().unwrap();
    state.bodies.insert("update_novel", body.clone());
    let Some(novel) = state.novels.iter_mut().find(|n| n["_id"] == id.as_str()) else {
        return detail(StatusCode::NOT_FOUND, "Novel not found");
    };
    if let (Some(novel), Some(update)) = (novel.as_object_mut(), body.as_object()) {
        for (key, value) in update {
            novel.insert(key.clone(), value.clone());
        }
    }
    Json(novel.clone()).into_response()
}

async fn delete_novel(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if let Some(res) = hit(&state, "delete_novel") {
        return res;
    }
    let mut state = state.lock().unwrap();
    let before = state.novels.len();
    state.novels.retain(|n| n["_id"] != id.as_str());
    if state.novels.len() == before {
        return detail(StatusCode::NOT_FOUND, "Novel not found");
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn list_chapters(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(res) = hit(&state, "list_chapters") {
        return res;
    }
    let mut state = state.lock().unwrap();
    if find_novel(&state, &id).is_none() {
        return detail(StatusCode::NOT_FOUND, "Novel not found");
    }

    let page: u32 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let page_size: u32 = query
        .get("page_size")
        .and_then(|p| p.parse().ok())
        .unwrap_or(50);
    let desc = query.get("sort_order").map(String::as_str) != Some("asc");
    state.queries.insert("list_chapters", query);

    let total = state.chapter_count;
    let mut numbers: Vec<u32> = (1..=total).collect();
    if desc {
        numbers.reverse();
    }
    let chapters: Vec<Value> = numbers
        .into_iter()
        .skip(((page - 1) * page_size) as usize)
        .take(page_size as usize)
        .map(chapter_json)
        .collect();

    Json(json!({
        "chapters": chapters,
        "total": total,
        "page": page,
        "page_size": page_size,
        "total_pages": total.div_ceil(page_size),
    }))
    .into_response()
}

async fn fetch_chapters(State(state): State<Shared>, Path(_id): Path<String>) -> Response {
    if let Some(res) = hit(&state, "fetch_chapters") {
        return res;
    }
    let total = state.lock().unwrap().chapter_count;
    let chapters: Vec<Value> = (1..=total).map(chapter_json).collect();
    Json(json!({ "chapters": chapters })).into_response()
}

async fn get_chapter(
    State(state): State<Shared>,
    Path((id, n)): Path<(String, u32)>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(res) = hit(&state, "get_chapter") {
        return res;
    }
    let format = query.get("format").cloned().unwrap_or_default();
    state.lock().unwrap().queries.insert("get_chapter", query);

    if format == "epub" {
        return epub_response(None);
    }
    if id == "m1" {
        return Json(json!({
            "type": "manhwa",
            "images": [
                {"url": format!("https://cdn.example.com/{n}/1.jpg"), "alt": "1", "width": null, "height": null},
                {"url": format!("https://cdn.example.com/{n}/2.jpg"), "alt": "2", "width": 800, "height": 1200}
            ]
        }))
        .into_response();
    }
    Json(json!({
        "title": "Shadow Slave",
        "chapter_number": n,
        "chapter_title": format!("Chapter {n}"),
        "content": "<p>Sunny woke up.</p>"
    }))
    .into_response()
}

async fn download_chapters(
    State(state): State<Shared>,
    Path(_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(res) = hit(&state, "download_chapters") {
        return res;
    }
    let mut state = state.lock().unwrap();
    state.queries.insert("download_chapters", query);
    state.bodies.insert("download_chapters", body);
    epub_response(Some(r#"attachment; filename="chapters_1-3.epub""#.to_string()))
}

async fn download_novel(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(res) = hit(&state, "download_novel") {
        return res;
    }
    let mut state = state.lock().unwrap();
    let Some(novel) = find_novel(&state, &id) else {
        return detail(StatusCode::NOT_FOUND, "Novel not found");
    };
    state.queries.insert("download_novel", query);
    let title = novel["title"].as_str().unwrap_or("novel").to_string();
    epub_response(Some(format!(r#"attachment; filename="{title}.epub""#)))
}

async fn reading_progress(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(res) = hit(&state, "reading_progress") {
        return res;
    }
    let mut state = state.lock().unwrap();
    let Some(mut novel) = find_novel(&state, &id) else {
        return detail(StatusCode::NOT_FOUND, "Novel not found");
    };
    let current: f64 = query
        .get("current_chapter")
        .and_then(|c| c.parse().ok())
        .unwrap_or(0.0);
    novel["reading_progress"] = json!(current / state.chapter_count as f64 * 100.0);
    state.queries.insert("reading_progress", query);
    Json(novel).into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(res) = hit(&state, "login") {
        return res;
    }
    state.lock().unwrap().bodies.insert("login", body.clone());
    if body["password"] != PASSWORD {
        return detail(StatusCode::BAD_REQUEST, "Incorrect email or password");
    }
    Json(json!({ "user": user_json(), "token": TOKEN })).into_response()
}

async fn register(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if let Some(res) = hit(&state, "register") {
        return res;
    }
    let mut user = user_json();
    user["username"] = body["username"].clone();
    user["email"] = body["email"].clone();
    Json(json!({ "user": user, "access_token": TOKEN })).into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(res) = hit(&state, "logout") {
        return res;
    }
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    Json(json!({ "message": "Logged out" })).into_response()
}

async fn current_user(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(res) = hit(&state, "current_user") {
        return res;
    }
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }
    Json(user_json()).into_response()
}

async fn get_settings(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if let Some(res) = hit(&state, "get_settings") {
        return res;
    }
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    let settings = state.lock().unwrap().settings.clone();
    Json(json!({ "settings": settings })).into_response()
}

async fn put_settings(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(res) = hit(&state, "put_settings") {
        return res;
    }
    if !authorized(&headers) {
        return detail(StatusCode::UNAUTHORIZED, "Not authenticated");
    }
    state.lock().unwrap().bodies.insert("put_settings", body);
    Json(json!({ "message": "Settings updated" })).into_response()
}
