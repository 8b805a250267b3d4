use crate::api::admin::{AuditQuery, ImportRequest, ImportResponse};
use crate::api::employee::{ProfileResponse, UpdateSettings};
use crate::api::history::{ChangeRequest, HistoryResponse};
use crate::api::holiday::{BusinessDaysResponse, RangeQuery};
use crate::api::leave_request::{
    BalanceResponse, CreateLeave, LeaveFilter, LeaveListResponse, LeavePreviewResponse,
    SubmitLeaveResponse,
};
use crate::leave::balance::{LeaveBalance, LeaveSummary, MonthTotal};
use crate::leave::team::{TeamMemberBalance, TeamOverview, UpcomingLeave};
use crate::model::audit::{AuditAction, AuditRecord};
use crate::model::employee::Employee;
use crate::model::holiday::{HolidayKind, PublicHoliday};
use crate::model::leave_history::{ConfirmationStatus, LeaveHistory, LeaveHistoryRecord};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::notification::EmailNotification;
use crate::model::role::Role;
use crate::models::{LoginReqDto, RefreshReqDto, TokenPair};
use utoipa::Modify;
use utoipa::OpenApi;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Planner API",
        version = "1.0.0",
        description = r#"
## Leave Planner

Employees plan annual, sick and emergency leave against their yearly balance.

### 🔹 Key Features
- **Leave Requests**
  - Business-day counting (Friday/Saturday weekend), offset days, overlap checks
  - Preview with the manager notification before submitting
  - Manager/HR approval and rejection
- **Balances**
  - Entitlement + carry-over minus pending and approved days
  - Team balances and upcoming leave for managers
- **Previous-Year History**
  - Confirm the recorded history or request a correction
- **HR Administration**
  - CSV/JSON roster import and an append-only audit log

### 🔐 Security
Sign in with employee ID and date of birth at `/auth/login`.
All `/api` endpoints need a **JWT Bearer** access token.
"#,
    ),
    paths(
        crate::auth::handlers::login,
        crate::auth::handlers::refresh_token,
        crate::auth::handlers::logout,

        crate::api::employee::get_me,
        crate::api::employee::update_settings,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::preview_leave,
        crate::api::leave_request::get_balance,
        crate::api::leave_request::get_summary,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::history::get_history,
        crate::api::history::confirm_history,
        crate::api::history::request_change,

        crate::api::team::get_team,
        crate::api::notification::list_notifications,

        crate::api::holiday::list_holidays,
        crate::api::holiday::count_business_days,

        crate::api::admin::import_employees,
        crate::api::admin::audit_log
    ),
    components(
        schemas(
            LoginReqDto,
            RefreshReqDto,
            TokenPair,
            Role,
            Employee,
            ProfileResponse,
            UpdateSettings,
            LeaveType,
            LeaveStatus,
            LeaveRequest,
            CreateLeave,
            LeaveFilter,
            LeaveListResponse,
            SubmitLeaveResponse,
            LeavePreviewResponse,
            BalanceResponse,
            LeaveBalance,
            LeaveSummary,
            MonthTotal,
            TeamOverview,
            TeamMemberBalance,
            UpcomingLeave,
            LeaveHistory,
            LeaveHistoryRecord,
            ConfirmationStatus,
            HistoryResponse,
            ChangeRequest,
            EmailNotification,
            HolidayKind,
            PublicHoliday,
            RangeQuery,
            BusinessDaysResponse,
            ImportRequest,
            ImportResponse,
            AuditQuery,
            AuditAction,
            AuditRecord
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Sign-in and token rotation"),
        (name = "Employee", description = "Own profile and settings"),
        (name = "Leave", description = "Leave requests, balances and notifications"),
        (name = "History", description = "Previous-year leave confirmation"),
        (name = "Team", description = "Manager team view"),
        (name = "Calendar", description = "Business days and public holidays"),
        (name = "Admin", description = "HR roster import and audit log"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
