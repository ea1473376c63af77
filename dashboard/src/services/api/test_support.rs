//! In-process mock of the bookstore gateway for client tests.
//!
//! Mirrors the gateway contract: bearer-token auth on everything except
//! `/login` and `/health`, `{"error": ...}` bodies on failure, 403 for
//! admin-only routes, 404 for unknown books.

use axum::extract::{Path, State};
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use parking_lot::Mutex;
use shared::{
    Book, ErrorResponse, LoginRequest, LoginResponse, OrderHistory, OrderRequest, OrderResponse,
    ProfileUpdate, Role, User,
};
use std::collections::HashMap;
use std::sync::Arc;

type Rejection = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, Rejection>;
type Shared = Arc<Mutex<Inner>>;

fn reject(status: StatusCode, message: &str) -> Rejection {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

#[derive(Default)]
struct Inner {
    accounts: Vec<(User, String)>,
    sessions: HashMap<String, String>,
    books: Vec<Book>,
    orders: Vec<OrderHistory>,
    seen_authorization: Vec<Option<String>>,
    unhealthy: bool,
    health_requires_auth: bool,
    issued: u64,
}

fn account(username: &str, role: Role) -> User {
    User {
        username: username.to_string(),
        email: format!("{}@bookstore.local", username),
        full_name: username.to_uppercase(),
        role,
        created_at: "2024-01-01T00:00:00Z".to_string(),
    }
}

/// A running mock gateway bound to an ephemeral local port.
#[derive(Clone)]
pub(crate) struct MockGateway {
    pub url: String,
    state: Shared,
}

impl MockGateway {
    pub async fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(Inner {
            accounts: vec![
                (account("admin", Role::Admin), "password".to_string()),
                (account("alice", Role::User), "password".to_string()),
            ],
            books: vec![
                Book {
                    id: "1".to_string(),
                    title: "1984".to_string(),
                    author: "George Orwell".to_string(),
                },
                Book {
                    id: "2".to_string(),
                    title: "Pride and Prejudice".to_string(),
                    author: "Jane Austen".to_string(),
                },
            ],
            ..Inner::default()
        }));

        let app = Router::new()
            .route("/health", get(health))
            .route("/login", post(login))
            .route("/profile", get(get_profile).put(update_profile))
            .route("/users", get(list_users))
            .route("/books", get(list_books).post(create_book))
            .route("/books/stats", get(book_stats))
            .route("/books/{id}", get(get_book).delete(delete_book))
            .route("/order", post(place_order))
            .route("/orders", get(own_orders))
            .route("/orders/all", get(all_orders))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock gateway");
        let addr = listener.local_addr().expect("mock gateway address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    /// `Authorization` header of every request, in order.
    pub fn seen_authorization(&self) -> Vec<Option<String>> {
        self.state.lock().seen_authorization.clone()
    }

    /// Invalidate every issued token, as if the signing key rotated.
    pub fn revoke_all_sessions(&self) {
        self.state.lock().sessions.clear();
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.state.lock().unhealthy = !healthy;
    }

    /// Answer `/health` with 401, as a gateway behind an auth proxy would.
    pub fn require_auth_on_health(&self) {
        self.state.lock().health_requires_auth = true;
    }

    pub fn clear_books(&self) {
        self.state.lock().books.clear();
    }
}

fn authorization(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn authenticate(state: &Shared, headers: &HeaderMap) -> Result<User, Rejection> {
    let header = authorization(headers);

    let mut inner = state.lock();
    inner.seen_authorization.push(header.clone());

    let token = header
        .as_deref()
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Authorization header required"))?;

    let username = inner
        .sessions
        .get(token)
        .cloned()
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid token"))?;

    inner
        .accounts
        .iter()
        .find(|(user, _)| user.username == username)
        .map(|(user, _)| user.clone())
        .ok_or_else(|| reject(StatusCode::UNAUTHORIZED, "Invalid token"))
}

fn require_admin(user: &User) -> Result<(), Rejection> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(reject(StatusCode::FORBIDDEN, "Admin access required"))
    }
}

async fn health(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<serde_json::Value> {
    let mut inner = state.lock();
    inner.seen_authorization.push(authorization(&headers));

    if inner.health_requires_auth {
        return Err(reject(StatusCode::UNAUTHORIZED, "Authorization header required"));
    }
    if inner.unhealthy {
        return Err(reject(StatusCode::SERVICE_UNAVAILABLE, "Service unavailable"));
    }
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(credentials): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let mut inner = state.lock();
    inner.seen_authorization.push(authorization(&headers));

    let valid = inner
        .accounts
        .iter()
        .any(|(user, password)| user.username == credentials.username && *password == credentials.password);
    if !valid {
        return Err(reject(StatusCode::UNAUTHORIZED, "Invalid credentials"));
    }

    inner.issued += 1;
    let token = format!("token-{}-{}", inner.issued, credentials.username);
    inner.sessions.insert(token.clone(), credentials.username);
    Ok(Json(LoginResponse { token }))
}

async fn get_profile(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<User> {
    authenticate(&state, &headers).map(Json)
}

async fn update_profile(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(update): Json<ProfileUpdate>,
) -> ApiResult<User> {
    let user = authenticate(&state, &headers)?;
    let mut inner = state.lock();
    let (stored, _) = inner
        .accounts
        .iter_mut()
        .find(|(u, _)| u.username == user.username)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "User not found"))?;
    stored.email = update.email;
    stored.full_name = update.full_name;
    Ok(Json(stored.clone()))
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Vec<User>> {
    let user = authenticate(&state, &headers)?;
    require_admin(&user)?;
    let users = state.lock().accounts.iter().map(|(u, _)| u.clone()).collect();
    Ok(Json(users))
}

async fn list_books(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Vec<Book>> {
    authenticate(&state, &headers)?;
    Ok(Json(state.lock().books.clone()))
}

async fn create_book(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(book): Json<Book>,
) -> Result<(StatusCode, Json<Book>), Rejection> {
    authenticate(&state, &headers)?;
    if book.title.trim().is_empty() {
        return Err(reject(StatusCode::UNPROCESSABLE_ENTITY, "title is required"));
    }
    let mut inner = state.lock();
    if inner.books.iter().any(|b| b.id == book.id) {
        return Err(reject(StatusCode::CONFLICT, "Book already exists"));
    }
    inner.books.push(book.clone());
    Ok((StatusCode::CREATED, Json(book)))
}

async fn get_book(State(state): State<Shared>, headers: HeaderMap, Path(id): Path<String>) -> ApiResult<Book> {
    authenticate(&state, &headers)?;
    state
        .lock()
        .books
        .iter()
        .find(|b| b.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Book not found"))
}

async fn delete_book(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Rejection> {
    authenticate(&state, &headers)?;
    let mut inner = state.lock();
    let before = inner.books.len();
    inner.books.retain(|b| b.id != id);
    if inner.books.len() == before {
        Err(reject(StatusCode::NOT_FOUND, "Book not found"))
    } else {
        Ok(StatusCode::NO_CONTENT)
    }
}

async fn book_stats(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<serde_json::Value> {
    authenticate(&state, &headers)?;
    let inner = state.lock();

    let mut counts: Vec<(String, u64)> = Vec::new();
    for book in &inner.books {
        match counts.iter_mut().find(|(author, _)| *author == book.author) {
            Some((_, count)) => *count += 1,
            None => counts.push((book.author.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));

    // the book service encodes an empty author list as null
    let top_authors = if counts.is_empty() {
        serde_json::Value::Null
    } else {
        counts
            .into_iter()
            .map(|(author, count)| serde_json::json!({ "author": author, "count": count }))
            .collect()
    };

    Ok(Json(serde_json::json!({
        "total_books": inner.books.len(),
        "top_authors": top_authors,
        "last_updated": Utc::now(),
    })))
}

async fn place_order(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(order): Json<OrderRequest>,
) -> ApiResult<OrderResponse> {
    let user = authenticate(&state, &headers)?;
    let mut inner = state.lock();
    let book = inner
        .books
        .iter()
        .find(|b| b.id == order.book_id)
        .cloned()
        .ok_or_else(|| reject(StatusCode::NOT_FOUND, "Book not found"))?;

    let id = format!("order-{}", inner.orders.len() + 1);
    inner.orders.push(OrderHistory {
        id,
        book_id: book.id,
        book_title: book.title,
        book_author: book.author,
        order_date: Utc::now(),
        status: "pending".to_string(),
        username: user.username,
    });

    Ok(Json(OrderResponse {
        message: "Order placed successfully".to_string(),
    }))
}

async fn own_orders(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Vec<OrderHistory>> {
    let user = authenticate(&state, &headers)?;
    let orders = state
        .lock()
        .orders
        .iter()
        .filter(|o| o.username == user.username)
        .cloned()
        .collect();
    Ok(Json(orders))
}

async fn all_orders(State(state): State<Shared>, headers: HeaderMap) -> ApiResult<Vec<OrderHistory>> {
    let user = authenticate(&state, &headers)?;
    require_admin(&user)?;
    Ok(Json(state.lock().orders.clone()))
}
