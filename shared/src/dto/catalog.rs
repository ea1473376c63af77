use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// A catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
}

impl Book {
    /// Build a new book with an id derived from the current millisecond timestamp.
    ///
    /// The catalog service does not assign ids, so the client supplies one
    /// when creating a book.
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            id: Utc::now().timestamp_millis().to_string(),
            title: title.into(),
            author: author.into(),
        }
    }
}

/// Number of books by one author
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorCount {
    pub author: String,
    pub count: u64,
}

/// Catalog aggregate returned by `GET /books/stats`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookStats {
    pub total_books: u64,
    /// The book service sends `null` for an empty catalog
    #[serde(default, deserialize_with = "null_as_empty")]
    pub top_authors: Vec<AuthorCount>,
    pub last_updated: DateTime<Utc>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_new_generates_numeric_id() {
        let book = Book::new("Dune", "Frank Herbert");
        assert!(!book.id.is_empty());
        assert!(book.id.parse::<i64>().is_ok());
        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, "Frank Herbert");
    }

    #[test]
    fn test_book_stats_null_top_authors() {
        let json = r#"{
            "total_books": 0,
            "top_authors": null,
            "last_updated": "2024-05-01T12:30:00.123456789+02:00"
        }"#;

        let stats: BookStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.total_books, 0);
        assert!(stats.top_authors.is_empty());
        assert_eq!(stats.last_updated.to_rfc3339(), "2024-05-01T10:30:00.123456789+00:00");
    }

    #[test]
    fn test_book_stats_with_authors() {
        let json = r#"{
            "total_books": 3,
            "top_authors": [{"author": "Orwell", "count": 2}, {"author": "Austen", "count": 1}],
            "last_updated": "2024-05-01T10:30:00Z"
        }"#;

        let stats: BookStats = serde_json::from_str(json).unwrap();
        assert_eq!(stats.top_authors.len(), 2);
        assert_eq!(stats.top_authors[0], AuthorCount { author: "Orwell".into(), count: 2 });
    }
}
