use crate::{
    entities::{department, seller},
    errors::{field_errors, FieldError, ServiceError},
    handlers::common::{
        empty_string_as_none, error_page_or_response, redirect_to, redirect_to_error, ID_MISMATCH,
        ID_NOT_PROVIDED,
    },
    services::{sellers::ID_NOT_FOUND, SellerDraft, SellerWithDepartment},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Form,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

const SELLERS_INDEX: &str = "/sellers";
const MIN_SALARY: Decimal = dec!(100.00);
const MAX_SALARY: Decimal = dec!(50000.00);

/// Seller create/edit form as submitted by the browser.
///
/// Every input is kept as raw text so a malformed value is reported as a
/// field error and echoed back, instead of rejecting the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Bob Brown",
    "email": "bob@gmail.com",
    "birth_date": "1998-04-21",
    "base_salary": "1000.00",
    "department_id": "1"
}))]
pub struct SellerForm {
    /// Hidden on edit
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom = "validate_integer")]
    pub id: Option<String>,
    /// Hidden on edit; the version the form was rendered from
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom = "validate_integer")]
    pub version: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(
        required,
        length(min = 3, max = 60, message = "Name size should be between 3 and 60")
    )]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(required, email(message = "Enter a valid email"))]
    pub email: Option<String>,
    /// `yyyy-MM-dd`
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(required, custom = "validate_birth_date")]
    pub birth_date: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(required, custom = "validate_base_salary")]
    pub base_salary: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(required, custom = "validate_department_id")]
    pub department_id: Option<String>,
}

fn validate_integer(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<i32>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("integer"))
}

fn validate_department_id(value: &str) -> Result<(), ValidationError> {
    validate_integer(value).map_err(|mut err| {
        err.message = Some("Select a department from the list".into());
        err
    })
}

impl SellerForm {
    /// Validates the form and converts it to service input.
    pub fn into_draft(self) -> Result<SellerDraft, Vec<FieldError>> {
        self.validate().map_err(|e| field_errors(&e))?;
        self.parse()
            .ok_or_else(|| vec![FieldError::new("form", "Form could not be read")])
    }

    /// The hidden id, when present and numeric.
    pub fn id(&self) -> Option<i32> {
        parse_id(self.id.as_deref()?)
    }

    /// The hidden version, when present and numeric.
    pub fn version(&self) -> Option<i32> {
        self.version.as_deref()?.parse().ok()
    }

    fn parse(self) -> Option<SellerDraft> {
        Some(SellerDraft {
            name: self.name?,
            email: self.email?,
            birth_date: NaiveDate::parse_from_str(self.birth_date.as_deref()?, "%Y-%m-%d").ok()?,
            base_salary: Decimal::from_str(self.base_salary.as_deref()?).ok()?,
            department_id: self.department_id.as_deref()?.parse().ok()?,
        })
    }
}

impl From<seller::Model> for SellerForm {
    fn from(model: seller::Model) -> Self {
        Self {
            id: Some(model.id.to_string()),
            version: Some(model.version.to_string()),
            name: Some(model.name),
            email: Some(model.email),
            birth_date: Some(model.birth_date.format("%Y-%m-%d").to_string()),
            base_salary: Some(format!("{:.2}", model.base_salary)),
            department_id: Some(model.department_id.to_string()),
        }
    }
}

/// Numeric path or hidden-field id; anything else counts as not provided.
pub fn parse_id(raw: &str) -> Option<i32> {
    raw.trim().parse().ok()
}

/// Everything the create/edit form needs to render.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SellerFormView {
    pub seller: SellerForm,
    #[serde(default)]
    pub errors: Vec<FieldError>,
    pub departments: Vec<department::Model>,
}

async fn form_view(
    state: &AppState,
    seller: SellerForm,
    errors: Vec<FieldError>,
) -> Result<SellerFormView, ServiceError> {
    let departments = state.department_service().list_all().await?;
    Ok(SellerFormView {
        seller,
        errors,
        departments,
    })
}

async fn rerender_form(state: &AppState, seller: SellerForm, errors: Vec<FieldError>) -> Response {
    let messages = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect();
    match form_view(state, seller, errors).await {
        Ok(view) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ApiResponse::invalid(view, messages)),
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}

/// Loads the seller or picks the error-page redirect for a missing/unknown id.
async fn seller_or_redirect(state: &AppState, raw_id: &str) -> Result<SellerWithDepartment, Response> {
    let Some(id) = parse_id(raw_id) else {
        return Err(redirect_to_error(ID_NOT_PROVIDED));
    };
    match state.seller_service().find_by_id(id).await {
        Ok(Some(found)) => Ok(found),
        Ok(None) => Err(redirect_to_error(ID_NOT_FOUND)),
        Err(err) => Err(err.into_response()),
    }
}

#[utoipa::path(
    get,
    path = "/sellers",
    responses(
        (status = 200, description = "Sellers listed", body = ApiResponse<Vec<seller::Model>>),
        (status = 500, description = "Store failure", body = crate::errors::ErrorResponse)
    ),
    tag = "sellers"
)]
pub async fn list_sellers(State(state): State<AppState>) -> ApiResult<Vec<seller::Model>> {
    let sellers = state.seller_service().list_all().await?;
    Ok(Json(ApiResponse::success(sellers)))
}

#[utoipa::path(
    get,
    path = "/sellers/create",
    responses(
        (status = 200, description = "Empty form with departments", body = ApiResponse<SellerFormView>)
    ),
    tag = "sellers"
)]
pub async fn create_form(State(state): State<AppState>) -> ApiResult<SellerFormView> {
    let view = form_view(&state, SellerForm::default(), Vec::new()).await?;
    Ok(Json(ApiResponse::success(view)))
}

#[utoipa::path(
    post,
    path = "/sellers/create",
    request_body(content = SellerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to /sellers"),
        (status = 422, description = "Form re-rendered with errors", body = ApiResponse<SellerFormView>)
    ),
    tag = "sellers"
)]
pub async fn create_seller(State(state): State<AppState>, Form(form): Form<SellerForm>) -> Response {
    let draft = match form.clone().into_draft() {
        Ok(draft) => draft,
        Err(errors) => return rerender_form(&state, form, errors).await,
    };

    match state.seller_service().insert(draft).await {
        Ok(_) => redirect_to(SELLERS_INDEX),
        Err(err) => error_page_or_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/sellers/{id}",
    params(("id" = String, Path, description = "Seller id")),
    responses(
        (status = 200, description = "Seller with department", body = ApiResponse<SellerWithDepartment>),
        (status = 303, description = "Missing or unknown id, redirect to /error")
    ),
    tag = "sellers"
)]
pub async fn seller_details(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    match seller_or_redirect(&state, &raw_id).await {
        Ok(found) => Json(ApiResponse::success(found)).into_response(),
        Err(response) => response,
    }
}

#[utoipa::path(
    get,
    path = "/sellers/{id}/edit",
    params(("id" = String, Path, description = "Seller id")),
    responses(
        (status = 200, description = "Prefilled form with departments", body = ApiResponse<SellerFormView>),
        (status = 303, description = "Missing or unknown id, redirect to /error")
    ),
    tag = "sellers"
)]
pub async fn edit_form(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let found = match seller_or_redirect(&state, &raw_id).await {
        Ok(found) => found,
        Err(response) => return response,
    };
    match form_view(&state, SellerForm::from(found.seller), Vec::new()).await {
        Ok(view) => Json(ApiResponse::success(view)).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/sellers/{id}/edit",
    params(("id" = String, Path, description = "Seller id")),
    request_body(content = SellerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, or redirect to /error on mismatch, missing id or conflict"),
        (status = 422, description = "Form re-rendered with errors", body = ApiResponse<SellerFormView>)
    ),
    tag = "sellers"
)]
pub async fn edit_seller(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(form): Form<SellerForm>,
) -> Response {
    let draft = match form.clone().into_draft() {
        Ok(draft) => draft,
        Err(errors) => return rerender_form(&state, form, errors).await,
    };
    let Some(id) = parse_id(&raw_id) else {
        return redirect_to_error(ID_NOT_PROVIDED);
    };
    if form.id() != Some(id) {
        return redirect_to_error(ID_MISMATCH);
    }

    match state.seller_service().update(id, draft, form.version()).await {
        Ok(_) => redirect_to(SELLERS_INDEX),
        Err(err) => error_page_or_response(err),
    }
}

#[utoipa::path(
    get,
    path = "/sellers/{id}/delete",
    params(("id" = String, Path, description = "Seller id")),
    responses(
        (status = 200, description = "Seller to confirm deletion", body = ApiResponse<SellerWithDepartment>),
        (status = 303, description = "Missing or unknown id, redirect to /error")
    ),
    tag = "sellers"
)]
pub async fn delete_confirm(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    seller_details(State(state), Path(raw_id)).await
}

#[utoipa::path(
    post,
    path = "/sellers/{id}/delete",
    params(("id" = String, Path, description = "Seller id")),
    responses(
        (status = 303, description = "Deleted, or redirect to /error when the seller has sales")
    ),
    tag = "sellers"
)]
pub async fn delete_seller(State(state): State<AppState>, Path(raw_id): Path<String>) -> Response {
    let Some(id) = parse_id(&raw_id) else {
        return redirect_to_error(ID_NOT_PROVIDED);
    };
    match state.seller_service().remove(id).await {
        Ok(()) => redirect_to(SELLERS_INDEX),
        Err(err) => error_page_or_response(err),
    }
}
