//! # Order Endpoints
//!
//! `/orders` and `/orders/all` are different endpoints. The client does not
//! decide which one a user may call; the gateway answers 403 when a regular
//! account asks for every order.

use super::client::ApiClient;
use crate::core::error::ApiError;
use reqwest::Method;
use shared::{OrderHistory, OrderRequest, OrderResponse};

/// Place an order for one book.
#[tracing::instrument(skip(client, order), fields(book_id = %order.book_id))]
pub async fn place_order(client: &ApiClient, order: OrderRequest) -> Result<OrderResponse, ApiError> {
    let request = client.request(Method::POST, &["order"]).json(&order);
    let response: OrderResponse = client.send_json(request).await?;
    tracing::info!(message = %response.message, "Order placed");
    Ok(response)
}

/// Orders placed by the signed-in user.
pub async fn get_order_history(client: &ApiClient) -> Result<Vec<OrderHistory>, ApiError> {
    client.send_json(client.request(Method::GET, &["orders"])).await
}

/// Orders of every user (admin only).
pub async fn get_all_orders(client: &ApiClient) -> Result<Vec<OrderHistory>, ApiError> {
    let orders: Vec<OrderHistory> = client.send_json(client.request(Method::GET, &["orders", "all"])).await?;
    tracing::debug!(count = orders.len(), "All orders fetched");
    Ok(orders)
}
