use crate::{entities::department, ApiResponse, ApiResult, AppState};
use axum::{extract::State, response::Json};

#[utoipa::path(
    get,
    path = "/departments",
    responses(
        (status = 200, description = "Departments by name", body = ApiResponse<Vec<department::Model>>),
        (status = 500, description = "Store failure", body = crate::errors::ErrorResponse)
    ),
    tag = "departments"
)]
pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<department::Model>> {
    let departments = state.department_service().list_all().await?;
    Ok(Json(ApiResponse::success(departments)))
}
