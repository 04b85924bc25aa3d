//! Employees page and editor (admin only).

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::instrument;

use elmis_core::{Email, EmployeeId};

use crate::backend::BackendError;
use crate::backend::types::{Employee, EmployeeInput};
use crate::components::{PageChrome, format};
use crate::filters;
use crate::middleware::{OptionalSession, RequireAdmin, RequireSession};
use crate::navigation::AppRoute;
use crate::state::AppState;

use super::errors;

/// Build the employees router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/employees", get(index).post(create))
        .route("/employees/new", get(new_employee))
        .route("/employees/{id}", post(update))
        .route("/employees/{id}/edit", get(edit))
        .route("/employees/{id}/delete", post(delete))
}

/// Employee row view for templates.
#[derive(Debug, Clone)]
pub struct EmployeeRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub joined: String,
}

impl From<&Employee> for EmployeeRow {
    fn from(employee: &Employee) -> Self {
        Self {
            id: employee.id.to_string(),
            name: employee.full_name(),
            email: employee.email.clone(),
            phone: format::text(employee.phone_number.as_deref()),
            joined: format::date(employee.created_at),
        }
    }
}

/// Employees page template.
#[derive(Template, WebTemplate)]
#[template(path = "employees/index.html")]
pub struct EmployeesTemplate {
    pub chrome: PageChrome,
    pub employees: Vec<EmployeeRow>,
    pub error: Option<String>,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "employees/form.html")]
pub struct EmployeeFormTemplate {
    pub chrome: PageChrome,
    pub heading: &'static str,
    pub action: String,
    pub form: EmployeeForm,
    pub error: Option<String>,
}

/// Employee form data.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmployeeForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
}

impl EmployeeForm {
    /// Trimmed input with a checked email, or a message for the user.
    fn validate(&self) -> Result<EmployeeInput, String> {
        let first_name = self.first_name.trim();
        let last_name = self.last_name.trim();
        if first_name.is_empty() || last_name.is_empty() {
            return Err("First and last name are required.".to_string());
        }
        let email = Email::parse(&self.email).map_err(|e| format!("Invalid email: {e}."))?;
        let phone = self.phone_number.trim();

        Ok(EmployeeInput {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.into_inner(),
            phone_number: (!phone.is_empty()).then(|| phone.to_string()),
        })
    }
}

impl From<Employee> for EmployeeForm {
    fn from(employee: Employee) -> Self {
        Self {
            first_name: employee.first_name,
            last_name: employee.last_name,
            email: employee.email,
            phone_number: employee.phone_number.unwrap_or_default(),
        }
    }
}

/// Staff directory.
///
/// GET /employees
#[instrument(skip(auth, state))]
pub async fn index(auth: RequireSession, State(state): State<AppState>) -> EmployeesTemplate {
    render(&auth, &state, None).await
}

/// Blank employee form.
///
/// GET /employees/new
pub async fn new_employee(RequireAdmin(auth): RequireAdmin) -> EmployeeFormTemplate {
    EmployeeFormTemplate {
        chrome: PageChrome::new(&auth.session, auth.route),
        heading: "New employee",
        action: AppRoute::Employees.path().to_string(),
        form: EmployeeForm::default(),
        error: None,
    }
}

/// Add an employee.
///
/// POST /employees
#[instrument(skip(auth, state, form))]
pub async fn create(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<EmployeeForm>,
) -> Response {
    let action = AppRoute::Employees.path().to_string();
    let input = match form.validate() {
        Ok(input) => input,
        Err(message) => return form_page(&auth, "New employee", action, form, message),
    };

    match state.backend().create_employee(&input).await {
        Ok(employee) => {
            tracing::info!(id = %employee.id, "Employee created");
            Redirect::to(AppRoute::Employees.path()).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create employee: {e}");
            form_page(&auth, "New employee", action, form, e.change_failed_message())
        }
    }
}

/// Edit form, pre-filled from the backend.
///
/// GET /employees/{id}/edit
#[instrument(skip(auth, state))]
pub async fn edit(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
) -> Response {
    match state.backend().employee(id).await {
        Ok(employee) => EmployeeFormTemplate {
            chrome: PageChrome::new(&auth.session, auth.route),
            heading: "Edit employee",
            action: format!("/employees/{id}"),
            form: employee.into(),
            error: None,
        }
        .into_response(),
        Err(BackendError::Status { status: 404, .. }) => {
            errors::not_found(OptionalSession(auth.session)).await
        }
        Err(e) => {
            tracing::error!(%id, "Failed to fetch employee: {e}");
            let page = render(&auth, &state, Some(e.change_failed_message())).await;
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

/// Save an edited employee.
///
/// POST /employees/{id}
#[instrument(skip(auth, state, form))]
pub async fn update(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
    Form(form): Form<EmployeeForm>,
) -> Response {
    let action = format!("/employees/{id}");
    let input = match form.validate() {
        Ok(input) => input,
        Err(message) => return form_page(&auth, "Edit employee", action, form, message),
    };

    match state.backend().update_employee(id, &input).await {
        Ok(_) => {
            tracing::info!(%id, "Employee updated");
            Redirect::to(AppRoute::Employees.path()).into_response()
        }
        Err(e) => {
            tracing::error!(%id, "Failed to update employee: {e}");
            form_page(&auth, "Edit employee", action, form, e.change_failed_message())
        }
    }
}

/// Remove an employee.
///
/// POST /employees/{id}/delete
#[instrument(skip(auth, state))]
pub async fn delete(
    RequireAdmin(auth): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<EmployeeId>,
) -> Response {
    match state.backend().delete_employee(id).await {
        Ok(()) => {
            tracing::info!(%id, "Employee deleted");
            Redirect::to(AppRoute::Employees.path()).into_response()
        }
        Err(e) => {
            tracing::error!(%id, "Failed to delete employee: {e}");
            let message = format!("Employee #{id} could not be deleted.");
            let page = render(&auth, &state, Some(message)).await;
            (StatusCode::BAD_GATEWAY, page).into_response()
        }
    }
}

fn form_page(
    auth: &RequireSession,
    heading: &'static str,
    action: String,
    form: EmployeeForm,
    error: String,
) -> Response {
    let page = EmployeeFormTemplate {
        chrome: PageChrome::new(&auth.session, auth.route),
        heading,
        action,
        form,
        error: Some(error),
    };
    (StatusCode::UNPROCESSABLE_ENTITY, page).into_response()
}

async fn render(
    auth: &RequireSession,
    state: &AppState,
    notice: Option<String>,
) -> EmployeesTemplate {
    let chrome = PageChrome::new(&auth.session, auth.route);

    match state.backend().employees().await {
        Ok(employees) => EmployeesTemplate {
            chrome,
            employees: employees.iter().map(EmployeeRow::from).collect(),
            error: notice,
        },
        Err(e) => {
            tracing::error!("Failed to fetch employees: {e}");
            EmployeesTemplate {
                chrome,
                employees: vec![],
                error: Some("Employees could not be loaded from the library backend.".to_string()),
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(email: &str, phone: &str) -> EmployeeForm {
        EmployeeForm {
            first_name: " Grace ".to_string(),
            last_name: "Hopper".to_string(),
            email: email.to_string(),
            phone_number: phone.to_string(),
        }
    }

    #[test]
    fn test_validate_builds_input() {
        let input = form(" grace@elmis.test ", "  ").validate().unwrap();
        assert_eq!(input.first_name, "Grace");
        assert_eq!(input.email, "grace@elmis.test");
        assert_eq!(input.phone_number, None);

        let input = form("grace@elmis.test", "555-0101").validate().unwrap();
        assert_eq!(input.phone_number.as_deref(), Some("555-0101"));
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let message = form("not-an-email", "").validate().unwrap_err();
        assert!(message.starts_with("Invalid email"));
    }

    #[test]
    fn test_validate_requires_names() {
        let mut blank = form("grace@elmis.test", "");
        blank.last_name = "  ".to_string();
        assert!(blank.validate().is_err());
    }
}
