//! Backend response shapes.
//!
//! Field names follow the backend's camelCase JSON. Optional fields are
//! optional because the backend omits nulls inconsistently.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use elmis_core::{AccountId, AnnouncementId, BookId, EmployeeId, RentalId, RentalStatus, ReviewId};

/// Paged list envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    /// Zero-based page index.
    #[serde(default)]
    pub number: u32,
    #[serde(default)]
    pub size: u32,
}

/// Book category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default)]
    pub available_quantity: Option<i32>,
    #[serde(default)]
    pub avg_rating: Option<f64>,
    #[serde(default)]
    pub total_reviews: Option<i32>,
    #[serde(default)]
    pub category: Option<Category>,
}

/// A staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl Employee {
    /// First and last name joined.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A book lent to a member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: RentalId,
    pub book_id: BookId,
    pub user_id: AccountId,
    #[serde(default)]
    pub rental_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub due_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub return_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub status: RentalStatus,
}

/// A member's review of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub book_id: BookId,
    pub user_id: AccountId,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// A notice shown to staff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    pub id: AnnouncementId,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

/// Counts from `/api/reports/rental-summary`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalSummary {
    #[serde(default)]
    pub total_books: u64,
    #[serde(default)]
    pub rented_books: u64,
    #[serde(default)]
    pub overdue_books: u64,
}

/// Catalog filters accepted by `GET /api/books`.
///
/// The backend matches each present field as a case-insensitive substring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSearch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
}

impl BookSearch {
    /// Build a search, dropping blank fields.
    #[must_use]
    pub fn new(title: &str, author: &str) -> Self {
        let present = |v: &str| Some(v.trim().to_string()).filter(|v| !v.is_empty());
        Self {
            title: present(title),
            author: present(author),
        }
    }

    /// Returns `true` if no filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none()
    }

    /// Present filters as query pairs.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [("title", &self.title), ("author", &self.author)]
            .into_iter()
            .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
            .collect()
    }
}

/// Body of announcement create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnouncementInput {
    pub title: String,
    pub content: String,
}

/// Body of employee create and update calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}
