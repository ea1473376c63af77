//! # Book Endpoints
//!
//! Catalog listing, lookup, creation, deletion and statistics.
//!
//! No local cache: after a create or delete the caller re-fetches the list.

use super::client::ApiClient;
use crate::core::error::ApiError;
use reqwest::Method;
use shared::{Book, BookStats};

/// Get the whole catalog.
#[tracing::instrument(skip(client))]
pub async fn get_books(client: &ApiClient) -> Result<Vec<Book>, ApiError> {
    let start = std::time::Instant::now();
    let books: Vec<Book> = client.send_json(client.request(Method::GET, &["books"])).await?;

    tracing::debug!(
        count = books.len(),
        duration_ms = start.elapsed().as_millis(),
        "Books fetched successfully"
    );
    Ok(books)
}

/// Get one book by id.
pub async fn get_book(client: &ApiClient, id: &str) -> Result<Book, ApiError> {
    client.send_json(client.request(Method::GET, &["books", id])).await
}

/// Create a book. The id is supplied by the caller (see [`Book::new`]).
#[tracing::instrument(skip(client, book), fields(book_id = %book.id))]
pub async fn create_book(client: &ApiClient, book: Book) -> Result<Book, ApiError> {
    let request = client.request(Method::POST, &["books"]).json(&book);
    let created: Book = client.send_json(request).await?;
    tracing::info!(title = %created.title, "Book created");
    Ok(created)
}

/// Delete a book. A second delete of the same id fails with `NotFound`.
#[tracing::instrument(skip(client))]
pub async fn delete_book(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.send(client.request(Method::DELETE, &["books", id])).await?;
    tracing::info!("Book deleted");
    Ok(())
}

/// Catalog aggregate (total and top authors).
pub async fn get_book_stats(client: &ApiClient) -> Result<BookStats, ApiError> {
    client.send_json(client.request(Method::GET, &["books", "stats"])).await
}
