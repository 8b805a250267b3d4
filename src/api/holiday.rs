use crate::{
    config::Config,
    error::AppError,
    leave::calendar::{HolidayCalendar, business_days},
    model::holiday::PublicHoliday,
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct RangeQuery {
    #[schema(example = "2026-03-18")]
    pub start_date: NaiveDate,
    #[schema(example = "2026-03-24")]
    pub end_date: NaiveDate,
}

#[derive(Serialize, ToSchema)]
pub struct BusinessDaysResponse {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// days other than Friday and Saturday
    pub business_days: u32,
    /// business days that are not public holidays
    pub working_days: u32,
    /// count a submission over this range is charged
    pub charged_days: u32,
    pub public_holidays_in_range: Vec<PublicHoliday>,
}

/// Public holiday table
#[utoipa::path(
    get,
    path = "/api/holidays",
    responses(
        (status = 200, description = "Public holidays ordered by date", body = [PublicHoliday]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn list_holidays(calendar: web::Data<HolidayCalendar>) -> HttpResponse {
    HttpResponse::Ok().json(calendar.holidays())
}

/// Count business days in an inclusive range
#[utoipa::path(
    get,
    path = "/api/calendar/business-days",
    params(RangeQuery),
    responses(
        (status = 200, description = "Day counts for the range", body = BusinessDaysResponse),
        (status = 400, description = "start_date after end_date", body = Object, example = json!({
            "message": "start_date cannot be after end_date"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Calendar"
)]
pub async fn count_business_days(
    calendar: web::Data<HolidayCalendar>,
    config: web::Data<Config>,
    query: web::Query<RangeQuery>,
) -> Result<HttpResponse, AppError> {
    let RangeQuery {
        start_date,
        end_date,
    } = query.into_inner();
    if start_date > end_date {
        return Err(AppError::InvalidRange);
    }

    Ok(HttpResponse::Ok().json(BusinessDaysResponse {
        start_date,
        end_date,
        business_days: business_days(start_date, end_date),
        working_days: calendar.working_days(start_date, end_date),
        charged_days: calendar.chargeable_days(
            start_date,
            end_date,
            config.exclude_public_holidays,
        ),
        public_holidays_in_range: calendar.holidays_between(start_date, end_date),
    }))
}
