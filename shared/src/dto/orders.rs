use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order placement request (`POST /order`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderRequest {
    pub book_id: String,
}

/// Order placement acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderResponse {
    pub message: String,
}

/// One placed order, status is owned by the order service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderHistory {
    pub id: String,
    pub book_id: String,
    pub book_title: String,
    pub book_author: String,
    pub order_date: DateTime<Utc>,
    pub status: String,
    pub username: String,
}

impl OrderHistory {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}
