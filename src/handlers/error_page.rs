use crate::{tracing::current_request_id, ApiResponse, ApiResult};
use axum::{extract::Query, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ErrorPageQuery {
    /// Message chosen by the redirecting controller
    pub message: Option<String>,
}

/// What the error page shows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorView {
    #[schema(example = "Id not found")]
    pub message: Option<String>,
    /// Correlation id of the request that rendered the page
    #[schema(example = "0b5f9c1e-3c1a-4f7e-9a55-0c7f1b3f2d10")]
    pub request_id: Option<String>,
}

#[utoipa::path(
    get,
    path = "/error",
    params(ErrorPageQuery),
    responses(
        (status = 200, description = "Error message with request id", body = ApiResponse<ErrorView>)
    ),
    tag = "errors"
)]
pub async fn error_page(Query(query): Query<ErrorPageQuery>) -> ApiResult<ErrorView> {
    let view = ErrorView {
        message: query.message,
        request_id: current_request_id().map(|rid| rid.as_str().to_string()),
    };
    Ok(Json(ApiResponse::success(view)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracing::{scope_request_id, RequestId};

    #[tokio::test]
    async fn error_view_carries_message_and_request_id() {
        let Json(body) = scope_request_id(RequestId::new("req-err"), async {
            error_page(Query(ErrorPageQuery {
                message: Some("Id mismatch".into()),
            }))
            .await
        })
        .await
        .unwrap();

        let view = body.data.unwrap();
        assert_eq!(view.message.as_deref(), Some("Id mismatch"));
        assert_eq!(view.request_id.as_deref(), Some("req-err"));
    }
}
