use crate::{
    handlers::common::empty_string_as_none,
    services::{DateRange, DepartmentGroup, SalesRecordView},
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Search window as typed into the search form. Blank or unreadable means
/// "use default".
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Inclusive lower bound, `yyyy-MM-dd`
    #[serde(rename = "minDate", default, deserialize_with = "empty_string_as_none")]
    #[param(example = "2018-09-01")]
    pub min_date: Option<String>,
    /// Inclusive upper bound, `yyyy-MM-dd`
    #[serde(rename = "maxDate", default, deserialize_with = "empty_string_as_none")]
    #[param(example = "2018-09-30")]
    pub max_date: Option<String>,
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?, "%Y-%m-%d").ok()
}

/// January 1st of the current year through today.
pub fn default_search_range<Tz: TimeZone>(now: DateTime<Tz>) -> (NaiveDate, NaiveDate) {
    let today = now.date_naive();
    let start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
    (start, today)
}

impl SearchQuery {
    /// Fills absent bounds from [`default_search_range`].
    pub fn effective_range<Tz: TimeZone>(&self, now: DateTime<Tz>) -> DateRange {
        let (default_min, default_max) = default_search_range(now);
        DateRange::new(
            Some(parse_date(self.min_date.as_deref()).unwrap_or(default_min)),
            Some(parse_date(self.max_date.as_deref()).unwrap_or(default_max)),
        )
    }
}

/// The bounds a search actually ran with, `yyyy-MM-dd`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SearchWindow {
    #[serde(rename = "minDate")]
    #[schema(example = "2018-09-01")]
    pub min_date: String,
    #[serde(rename = "maxDate")]
    #[schema(example = "2018-09-30")]
    pub max_date: String,
}

impl From<DateRange> for SearchWindow {
    fn from(range: DateRange) -> Self {
        let fmt = |d: Option<NaiveDate>| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        Self {
            min_date: fmt(range.min),
            max_date: fmt(range.max),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SimpleSearchView {
    #[serde(flatten)]
    pub window: SearchWindow,
    pub records: Vec<SalesRecordView>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GroupingSearchView {
    #[serde(flatten)]
    pub window: SearchWindow,
    pub groups: Vec<DepartmentGroup>,
}

#[utoipa::path(
    get,
    path = "/sales-records",
    responses(
        (status = 200, description = "Default search window", body = ApiResponse<SearchWindow>)
    ),
    tag = "sales-records"
)]
pub async fn search_index() -> ApiResult<SearchWindow> {
    let window = SearchQuery::default().effective_range(Utc::now());
    Ok(Json(ApiResponse::success(window.into())))
}

#[utoipa::path(
    get,
    path = "/sales-records/simple-search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Records in the window, newest first", body = ApiResponse<SimpleSearchView>),
        (status = 500, description = "Store failure", body = crate::errors::ErrorResponse)
    ),
    tag = "sales-records"
)]
pub async fn simple_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<SimpleSearchView> {
    let range = query.effective_range(Utc::now());
    let records = state.sales_record_service().find_by_date(range).await?;
    Ok(Json(ApiResponse::success(SimpleSearchView {
        window: range.into(),
        records,
    })))
}

#[utoipa::path(
    get,
    path = "/sales-records/grouping-search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Records in the window grouped by department", body = ApiResponse<GroupingSearchView>),
        (status = 500, description = "Store failure", body = crate::errors::ErrorResponse)
    ),
    tag = "sales-records"
)]
pub async fn grouping_search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<GroupingSearchView> {
    let range = query.effective_range(Utc::now());
    let groups = state
        .sales_record_service()
        .find_by_date_grouped(range)
        .await?;
    Ok(Json(ApiResponse::success(GroupingSearchView {
        window: range.into(),
        groups,
    })))
}
