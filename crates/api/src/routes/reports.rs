//! Admin reporting endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::Deserialize;

use nabta_core::ProductId;

use crate::db::ReportRepository;
use crate::db::reports::{
    MonthlySummary, ProductReport, ProfitLossReport, TopCustomer, TopProduct,
};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// `GET /api/reports/monthly?year=&month=`
pub async fn monthly(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthlySummary>> {
    let (start, end) = month_bounds(query)?;
    let summary = ReportRepository::new(state.pool())
        .monthly_summary(start, end)
        .await?;
    Ok(Json(summary))
}

/// `GET /api/reports/top-products`
pub async fn top_products(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<TopProduct>>> {
    let products = ReportRepository::new(state.pool()).top_products().await?;
    Ok(Json(products))
}

/// `GET /api/reports/top-customers`
pub async fn top_customers(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<TopCustomer>>> {
    let customers = ReportRepository::new(state.pool()).top_customers().await?;
    Ok(Json(customers))
}

/// `GET /api/reports/profit-loss?year=&month=`
pub async fn profit_loss(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ProfitLossReport>> {
    let (start, end) = month_bounds(query)?;
    let report = ReportRepository::new(state.pool())
        .profit_loss(start, end)
        .await?;
    Ok(Json(report))
}

/// `GET /api/reports/products/{id}?from=&to=`
pub async fn product(
    RequireAdmin(_): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<ProductReport>> {
    let report = ReportRepository::new(state.pool())
        .product_report(id, range.from, range.to)
        .await?;
    Ok(Json(report))
}

/// `[start, end)` bounds for the requested month, defaulting to the
/// current one.
fn month_bounds(query: MonthQuery) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let now = Utc::now();
    let year = query.year.unwrap_or_else(|| now.year());
    let month = query.month.unwrap_or_else(|| now.month());

    if !(1..=12).contains(&month) {
        return Err(AppError::BadRequest("month must be 1-12".to_string()));
    }

    let start = Utc
        .with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::BadRequest("invalid year/month".to_string()))?;

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = Utc
        .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| AppError::BadRequest("invalid year/month".to_string()))?;

    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_bounds_mid_year() {
        let (start, end) = month_bounds(MonthQuery {
            year: Some(2026),
            month: Some(3),
        })
        .expect("valid");
        assert_eq!(start.to_rfc3339(), "2026-03-01T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2026-04-01T00:00:00+00:00");
    }

    #[test]
    fn test_month_bounds_december_rolls_over() {
        let (start, end) = month_bounds(MonthQuery {
            year: Some(2025),
            month: Some(12),
        })
        .expect("valid");
        assert_eq!(start.year(), 2025);
        assert_eq!(end.year(), 2026);
        assert_eq!(end.month(), 1);
    }

    #[test]
    fn test_month_bounds_rejects_bad_month() {
        assert!(
            month_bounds(MonthQuery {
                year: Some(2026),
                month: Some(13),
            })
            .is_err()
        );
    }
}
