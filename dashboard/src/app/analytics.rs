//! # Analytics Loader
//!
//! Data behind the analytics screen: profile, catalog statistics, orders
//! and (for admins) the user list, plus the order aggregates derived from
//! them.
//!
//! The profile is fetched first because it decides which order endpoint is
//! allowed. The remaining three requests run concurrently; the first
//! failure fails the whole load.

use crate::core::error::ApiError;
use crate::core::service::ApiService;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use shared::{BookStats, OrderHistory, User};

/// Window counted as "recent" in [`OrderStats`].
pub const RECENT_WINDOW_DAYS: i64 = 7;

pub const DEFAULT_TOP_BOOKS: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsData {
    pub profile: User,
    pub book_stats: BookStats,
    pub orders: Vec<OrderHistory>,
    /// Empty for non-admins
    pub users: Vec<User>,
}

impl AnalyticsData {
    pub fn order_stats(&self, now: DateTime<Utc>) -> OrderStats {
        OrderStats::from_orders(&self.orders, now)
    }

    pub fn top_books(&self) -> Vec<TopBook> {
        top_books(&self.orders, DEFAULT_TOP_BOOKS)
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct OrderStats {
    pub total: usize,
    pub completed: usize,
    pub recent: usize,
}

impl OrderStats {
    pub fn from_orders(orders: &[OrderHistory], now: DateTime<Utc>) -> Self {
        let window = Duration::days(RECENT_WINDOW_DAYS);
        Self {
            total: orders.len(),
            completed: orders.iter().filter(|o| o.is_completed()).count(),
            recent: orders
                .iter()
                .filter(|o| lib_utils::is_within(o.order_date, window, now))
                .count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TopBook {
    pub book_id: String,
    pub title: String,
    pub author: String,
    pub orders: usize,
}

/// Most ordered books, highest count first. Ties keep first-seen order.
pub fn top_books(orders: &[OrderHistory], limit: usize) -> Vec<TopBook> {
    let mut ranked: Vec<TopBook> = Vec::new();
    for order in orders {
        match ranked.iter_mut().find(|b| b.book_id == order.book_id) {
            Some(book) => book.orders += 1,
            None => ranked.push(TopBook {
                book_id: order.book_id.clone(),
                title: order.book_title.clone(),
                author: order.book_author.clone(),
                orders: 1,
            }),
        }
    }

    // stable sort keeps first-seen order among equal counts
    ranked.sort_by(|a, b| b.orders.cmp(&a.orders));
    ranked.truncate(limit);
    ranked
}

/// Load everything the analytics screen shows.
#[tracing::instrument(skip(api))]
pub async fn load_analytics(api: &dyn ApiService) -> Result<AnalyticsData, ApiError> {
    let profile = api.get_profile().await?;
    let admin = profile.is_admin();

    let orders = async {
        if admin {
            api.get_all_orders().await
        } else {
            api.get_order_history().await
        }
    };
    let users = async {
        if admin {
            api.get_all_users().await
        } else {
            Ok(Vec::new())
        }
    };

    let (book_stats, orders, users) = tokio::try_join!(api.get_book_stats(), orders, users)?;

    tracing::debug!(
        username = %profile.username,
        admin,
        orders = orders.len(),
        users = users.len(),
        "Analytics loaded"
    );

    Ok(AnalyticsData {
        profile,
        book_stats,
        orders,
        users,
    })
}
