//! HTTP client for the REST backend.

use reqwest::{Client, Method, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};
use url::Url;

use elmis_core::{AnnouncementId, EmployeeId, RentalId};

use super::error::BackendError;
use super::types::{
    Announcement, AnnouncementInput, Book, BookSearch, Employee, EmployeeInput, Page, Rental,
    RentalSummary, Review,
};
use crate::config::BackendConfig;

/// Page size requested from list endpoints.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Client for the backend's JSON endpoints.
#[derive(Clone)]
pub struct BackendClient {
    client: Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl BackendClient {
    /// Create a client from configuration.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.clone(),
            token: config.token.clone(),
        }
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// One page of the book catalog, narrowed by `search`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn books(&self, page: u32, search: &BookSearch) -> Result<Page<Book>, BackendError> {
        self.get_page("/api/books", page, &search.pairs()).await
    }

    /// One page of reviews.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn reviews(&self, page: u32) -> Result<Page<Review>, BackendError> {
        self.get_page("/api/reviews", page, &[]).await
    }

    /// One page of rentals.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn rentals(&self, page: u32) -> Result<Page<Rental>, BackendError> {
        self.get_page("/api/rentals", page, &[]).await
    }

    /// Mark a rental returned.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn return_rental(&self, id: RentalId) -> Result<Rental, BackendError> {
        let path = format!("/api/rentals/return/{id}");
        let response = self.send(&path, self.request(Method::PUT, &path)?).await?;
        decode(response).await
    }

    /// Mark a rental overdue.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn mark_rental_overdue(&self, id: RentalId) -> Result<Rental, BackendError> {
        let path = format!("/api/rentals/overdue/{id}");
        let response = self.send(&path, self.request(Method::PUT, &path)?).await?;
        decode(response).await
    }

    /// Delete a rental.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    pub async fn delete_rental(&self, id: RentalId) -> Result<(), BackendError> {
        self.delete(&format!("/api/rentals/{id}")).await
    }

    /// One page of announcements.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn announcements(&self, page: u32) -> Result<Page<Announcement>, BackendError> {
        self.get_page("/api/announcements", page, &[]).await
    }

    /// A single announcement.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` with 404 if it does not exist.
    pub async fn announcement(&self, id: AnnouncementId) -> Result<Announcement, BackendError> {
        self.get_json(&format!("/api/announcements/{id}"), &[]).await
    }

    /// Post a new announcement.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn create_announcement(
        &self,
        input: &AnnouncementInput,
    ) -> Result<Announcement, BackendError> {
        self.send_json(Method::POST, "/api/announcements", input).await
    }

    /// Replace an announcement's title and content.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn update_announcement(
        &self,
        id: AnnouncementId,
        input: &AnnouncementInput,
    ) -> Result<Announcement, BackendError> {
        self.send_json(Method::PUT, &format!("/api/announcements/{id}"), input)
            .await
    }

    /// Delete an announcement.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    pub async fn delete_announcement(&self, id: AnnouncementId) -> Result<(), BackendError> {
        self.delete(&format!("/api/announcements/{id}")).await
    }

    /// All employees (the endpoint is not paged).
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn employees(&self) -> Result<Vec<Employee>, BackendError> {
        self.get_json("/api/employees", &[]).await
    }

    /// A single employee.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Status` with 404 if they do not exist.
    pub async fn employee(&self, id: EmployeeId) -> Result<Employee, BackendError> {
        self.get_json(&format!("/api/employees/{id}"), &[]).await
    }

    /// Add an employee.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn create_employee(&self, input: &EmployeeInput) -> Result<Employee, BackendError> {
        self.send_json(Method::POST, "/api/employees", input).await
    }

    /// Replace an employee's details.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn update_employee(
        &self,
        id: EmployeeId,
        input: &EmployeeInput,
    ) -> Result<Employee, BackendError> {
        self.send_json(Method::PUT, &format!("/api/employees/{id}"), input)
            .await
    }

    /// Remove an employee.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails.
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), BackendError> {
        self.delete(&format!("/api/employees/{id}")).await
    }

    /// Catalog-wide rental counts.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the request fails or the response is malformed.
    pub async fn rental_summary(&self) -> Result<RentalSummary, BackendError> {
        self.get_json("/api/reports/rental-summary", &[]).await
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        filters: &[(&str, &str)],
    ) -> Result<Page<T>, BackendError> {
        let page = page.to_string();
        let size = DEFAULT_PAGE_SIZE.to_string();
        let mut query = vec![("page", page.as_str()), ("size", size.as_str())];
        query.extend_from_slice(filters);
        self.get_json(path, &query).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, BackendError> {
        let request = self.request(Method::GET, path)?.query(query);
        decode(self.send(path, request).await?).await
    }

    async fn send_json<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, BackendError> {
        let request = self.request(method, path)?.json(body);
        decode(self.send(path, request).await?).await
    }

    async fn delete(&self, path: &str) -> Result<(), BackendError> {
        self.send(path, self.request(Method::DELETE, path)?).await?;
        Ok(())
    }

    /// Start a request to `path` with the bearer token attached.
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let url = self.base_url.join(path)?;
        let request = self.client.request(method, url);
        Ok(match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        })
    }

    #[instrument(skip(self, request), fields(base_url = %self.base_url))]
    async fn send(&self, path: &str, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        debug!(status = status.as_u16(), "Backend request succeeded");
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let config = BackendConfig {
            base_url: Url::parse("http://localhost:8080").unwrap_or_else(|_| unreachable!()),
            token: Some(SecretString::from("tok_live_123")),
        };
        let debug = format!("{:?}", BackendClient::new(&config));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("tok_live_123"));
    }
}
