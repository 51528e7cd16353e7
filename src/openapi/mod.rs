use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sales Web API",
        version = "0.1.0",
        description = r#"
# Sales Web

Sellers, departments and sales-record search.

## Forms

Seller create/edit/delete are form posts (`application/x-www-form-urlencoded`).
Success answers `303 See Other` to `/sellers`. Invalid input answers `422`
with the submitted values, the field errors and the department list. Missing,
unknown or mismatched ids and blocked deletes redirect to `/error?message=...`.

## Search

`minDate` and `maxDate` are inclusive `yyyy-MM-dd` bounds. A blank or missing
`minDate` defaults to January 1st of the current year, `maxDate` to today.

## Errors

Failures that are not redirected use one body shape:

```json
{
  "error": "Internal Server Error",
  "message": "Database error",
  "request_id": "0b5f9c1e-3c1a-4f7e-9a55-0c7f1b3f2d10",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    tags(
        (name = "sellers", description = "Seller list, details and forms"),
        (name = "sales-records", description = "Sales search by date window"),
        (name = "departments", description = "Department reference data"),
        (name = "errors", description = "Error page"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        // Sellers
        crate::handlers::sellers::list_sellers,
        crate::handlers::sellers::create_form,
        crate::handlers::sellers::create_seller,
        crate::handlers::sellers::seller_details,
        crate::handlers::sellers::edit_form,
        crate::handlers::sellers::edit_seller,
        crate::handlers::sellers::delete_confirm,
        crate::handlers::sellers::delete_seller,

        // Sales records
        crate::handlers::sales_records::search_index,
        crate::handlers::sales_records::simple_search,
        crate::handlers::sales_records::grouping_search,

        // Departments, error page, health
        crate::handlers::departments::list_departments,
        crate::handlers::error_page::error_page,
        crate::health::health_check,
    ),
    components(
        schemas(
            crate::entities::department::Model,
            crate::entities::seller::Model,
            crate::entities::sales_record::Model,
            crate::entities::SaleStatus,
            crate::services::SellerWithDepartment,
            crate::services::SalesRecordView,
            crate::services::DepartmentGroup,
            crate::services::DateRange,
            crate::handlers::sellers::SellerForm,
            crate::handlers::sellers::SellerFormView,
            crate::handlers::sales_records::SearchWindow,
            crate::handlers::error_page::ErrorView,
            crate::health::HealthInfo,

            // Error types
            crate::errors::ErrorResponse,
            crate::errors::FieldError
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDocV1::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/sellers",
            "/sellers/create",
            "/sellers/{id}",
            "/sellers/{id}/edit",
            "/sellers/{id}/delete",
            "/sales-records",
            "/sales-records/simple-search",
            "/sales-records/grouping-search",
            "/departments",
            "/error",
            "/health",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }
    }

    #[test]
    fn document_serializes() {
        let json = ApiDocV1::openapi().to_json().expect("openapi json");
        assert!(json.contains("Sales Web API"));
    }
}
