//! Local stand-in for JSONPlaceholder and the API-key service.
//!
//! The stub answers the routes the catalogue touches with the same status
//! codes and payload shapes as the public services, including the quirks
//! the scenarios depend on (malformed JSON yields `500`, any object body is
//! accepted with `201`). Secondary routes live under `/api`.

use std::net::TcpListener;

use actix_web::dev::ServerHandle;
use actix_web::middleware::DefaultHeaders;
use actix_web::web::{self, Bytes};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer};
use api_suite::SuiteSettings;
use api_suite::config::{API_KEY, API_KEY_HEADER, VALID_EMAIL};
use serde::Deserialize;
use serde_json::{Value, json};

const CREATED_USER_ID: u64 = 11;
const CREATED_POST_ID: u64 = 101;
const MALFORMED_JSON_BODY: &str = "SyntaxError: Unexpected token i in JSON at position 1";

/// Running stub server.
pub struct StubServer {
    base_url: String,
    handle: ServerHandle,
}

impl StubServer {
    /// Root URL standing in for the primary service.
    pub fn primary_url(&self) -> String {
        self.base_url.clone()
    }

    /// Root URL standing in for the secondary service.
    pub fn secondary_url(&self) -> String {
        format!("{}/api", self.base_url)
    }

    /// Settings pointing both targets at the stub, secondary enabled.
    pub fn settings(&self) -> SuiteSettings {
        SuiteSettings {
            primary_base_url: Some(self.primary_url()),
            secondary_base_url: Some(self.secondary_url()),
            secondary_enabled: true,
            ..SuiteSettings::builtin()
        }
    }

    /// Stop the server and wait for in-flight requests.
    pub async fn stop(self) {
        self.handle.stop(true).await;
    }
}

/// Bind the stub to an ephemeral local port and start serving.
///
/// Must be called from within an actix system, e.g. `#[actix_web::test]`.
pub fn spawn_stub() -> std::io::Result<StubServer> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    let server = HttpServer::new(|| {
        App::new()
            .wrap(
                DefaultHeaders::new()
                    .add(("Server", "cloudflare"))
                    .add(("X-Powered-By", "Express"))
                    .add(("Cache-Control", "max-age=43200")),
            )
            .service(
                web::scope("/api")
                    .route("/users", web::get().to(secondary_users))
                    .route("/login", web::post().to(secondary_login)),
            )
            .route("/users", web::get().to(list_users))
            .route("/users", web::post().to(create_user))
            .route("/users/{id}", web::get().to(get_user))
            .route("/users/{id}", web::put().to(replace_user))
            .route("/users/{id}", web::patch().to(patch_user))
            .route("/users/{id}", web::delete().to(delete_user))
            .route("/users/{id}/posts", web::get().to(user_posts))
            .route("/posts", web::get().to(list_posts))
            .route("/posts", web::post().to(create_post))
            .default_service(web::to(not_found))
    })
    .disable_signals()
    .workers(1)
    .listen(listener)?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);

    Ok(StubServer {
        base_url: format!("http://{addr}"),
        handle,
    })
}

#[derive(Debug, Deserialize)]
struct PostFilter {
    #[serde(rename = "userId")]
    user_id: Option<u64>,
}

fn users() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "name": "Leanne Graham",
            "username": "Bret",
            "email": "Sincere@april.biz",
            "address": { "street": "Kulas Light", "city": "Gwenborough", "zipcode": "92998-3874" },
            "phone": "1-770-736-8031 x56442",
            "website": "hildegard.org",
            "company": { "name": "Romaguera-Crona", "catchPhrase": "Multi-layered client-server neural-net", "bs": "harness real-time e-markets" }
        }),
        json!({
            "id": 2,
            "name": "Ervin Howell",
            "username": "Antonette",
            "email": "Shanna@melissa.tv",
            "phone": "010-692-6593 x09125",
            "website": "anastasia.net"
        }),
        json!({
            "id": 3,
            "name": "Clementine Bauch",
            "username": "Samantha",
            "email": "Nathan@yesenia.net",
            "phone": "1-463-123-4447",
            "website": "ramiro.info"
        }),
        json!({
            "id": 4,
            "name": "Patricia Lebsack",
            "username": "Karianne",
            "email": "Julianne.OConner@kory.org",
            "phone": "493-170-9623 x156",
            "website": "kale.biz"
        }),
        json!({
            "id": 5,
            "name": "Chelsey Dietrich",
            "username": "Kamren",
            "email": "Lucio_Hettinger@annie.ca",
            "phone": "(254)954-1289",
            "website": "demarco.info"
        }),
    ]
}

fn posts() -> Vec<Value> {
    vec![
        json!({
            "userId": 1,
            "id": 1,
            "title": "sunt aut facere repellat provident occaecati",
            "body": "quia et suscipit suscipit recusandae consequuntur expedita"
        }),
        json!({
            "userId": 1,
            "id": 2,
            "title": "qui est esse",
            "body": "est rerum tempore vitae sequi sint nihil reprehenderit"
        }),
        json!({
            "userId": 2,
            "id": 11,
            "title": "et ea vero quia laudantium autem",
            "body": "delectus reiciendis molestiae occaecati non minima eveniet"
        }),
    ]
}

fn find_user(raw_id: &str) -> Option<Value> {
    let id: u64 = raw_id.parse().ok()?;
    users().into_iter().find(|user| user["id"] == id)
}

fn posts_by(user_id: u64) -> Vec<Value> {
    posts()
        .into_iter()
        .filter(|post| post["userId"] == user_id)
        .collect()
}

fn malformed_json() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type("text/html; charset=utf-8")
        .body(MALFORMED_JSON_BODY)
}

/// Parse `body` and stamp `id` onto it, mimicking the echo endpoints.
fn echo_with_id(body: &Bytes, id: Value) -> Result<Value, HttpResponse> {
    let parsed: Value = serde_json::from_slice(body).map_err(|_| malformed_json())?;
    let mut record = match parsed {
        Value::Object(fields) => fields,
        _ => serde_json::Map::new(),
    };
    record.insert("id".to_owned(), id);
    Ok(Value::Object(record))
}

async fn list_users() -> HttpResponse {
    HttpResponse::Ok().json(users())
}

async fn get_user(path: web::Path<String>) -> HttpResponse {
    find_user(&path.into_inner()).map_or_else(not_found_json, |user| HttpResponse::Ok().json(user))
}

async fn create_user(body: Bytes) -> HttpResponse {
    match echo_with_id(&body, json!(CREATED_USER_ID)) {
        Ok(record) => HttpResponse::Created().json(record),
        Err(response) => response,
    }
}

async fn replace_user(path: web::Path<String>, body: Bytes) -> HttpResponse {
    let raw_id = path.into_inner();
    let id = raw_id
        .parse::<u64>()
        .map_or_else(|_| json!(raw_id), |numeric| json!(numeric));
    match echo_with_id(&body, id) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(response) => response,
    }
}

async fn patch_user(path: web::Path<String>, body: Bytes) -> HttpResponse {
    let Some(Value::Object(mut user)) = find_user(&path.into_inner()) else {
        return not_found_json();
    };
    match serde_json::from_slice::<Value>(&body) {
        Ok(Value::Object(changes)) => {
            user.extend(changes);
            HttpResponse::Ok().json(user)
        }
        Ok(_) => HttpResponse::Ok().json(user),
        Err(_) => malformed_json(),
    }
}

async fn delete_user() -> HttpResponse {
    HttpResponse::Ok().json(json!({}))
}

async fn user_posts(path: web::Path<String>) -> HttpResponse {
    let posts = path.into_inner().parse::<u64>().map(posts_by).unwrap_or_default();
    HttpResponse::Ok().json(posts)
}

async fn list_posts(filter: web::Query<PostFilter>) -> HttpResponse {
    let posts = match filter.into_inner().user_id {
        Some(user_id) => posts_by(user_id),
        None => posts(),
    };
    HttpResponse::Ok().json(posts)
}

async fn create_post(body: Bytes) -> HttpResponse {
    match echo_with_id(&body, json!(CREATED_POST_ID)) {
        Ok(record) => HttpResponse::Created().json(record),
        Err(response) => response,
    }
}

fn has_api_key(request: &HttpRequest) -> bool {
    request
        .headers()
        .get(API_KEY_HEADER)
        .is_some_and(|value| value.as_bytes() == API_KEY.as_bytes())
}

fn missing_api_key() -> HttpResponse {
    HttpResponse::Forbidden().json(json!({ "error": "Missing API key" }))
}

async fn secondary_users(request: HttpRequest) -> HttpResponse {
    if !has_api_key(&request) {
        return missing_api_key();
    }
    HttpResponse::Ok().json(json!({
        "page": 1,
        "per_page": 6,
        "data": [
            { "id": 1, "email": "george.bluth@reqres.in", "first_name": "George" },
            { "id": 4, "email": VALID_EMAIL, "first_name": "Eve" }
        ]
    }))
}

async fn secondary_login(request: HttpRequest, body: Bytes) -> HttpResponse {
    if !has_api_key(&request) {
        return missing_api_key();
    }
    let Ok(login) = serde_json::from_slice::<Value>(&body) else {
        return HttpResponse::BadRequest().json(json!({ "error": "Invalid JSON" }));
    };
    let known = login["email"] == VALID_EMAIL;
    let has_password = login["password"].as_str().is_some_and(|password| !password.is_empty());
    if known && has_password {
        HttpResponse::Ok().json(json!({ "token": "QpwL5tke4Pnpja7X4" }))
    } else {
        HttpResponse::BadRequest().json(json!({ "error": "user not found" }))
    }
}

fn not_found_json() -> HttpResponse {
    HttpResponse::NotFound().json(json!({}))
}

async fn not_found() -> HttpResponse {
    not_found_json()
}
