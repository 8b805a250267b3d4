use chrono::{Duration, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use crate::leave::balance::{LeaveBalance, reconcile};
use crate::model::employee::Employee;
use crate::model::leave_request::{LeaveRequest, LeaveStatus};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamMemberBalance {
    pub employee_id: String,
    pub name: String,
    pub department: String,
    #[schema(nullable = true)]
    pub position: Option<String>,
    pub balance: LeaveBalance,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpcomingLeave {
    pub request_id: String,
    pub employee_id: String,
    pub employee_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub business_days: u32,
    pub status: LeaveStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamOverview {
    pub team_size: usize,
    pub window_days: u32,
    pub members: Vec<TeamMemberBalance>,
    pub upcoming: Vec<UpcomingLeave>,
}

/// Employees naming `manager` as their manager, never the manager itself.
pub fn team_members<'a>(manager: &Employee, employees: &'a [Employee]) -> Vec<&'a Employee> {
    let Some(email) = manager.email.as_deref().filter(|e| !e.trim().is_empty()) else {
        return Vec::new();
    };
    employees
        .iter()
        .filter(|e| e.id != manager.id && e.reports_to(email))
        .collect()
}

/// Balances of the manager's team plus their non-rejected leave starting
/// within `window_days` of `today`.
pub fn team_overview(
    manager: &Employee,
    employees: &[Employee],
    requests: &[LeaveRequest],
    today: NaiveDate,
    window_days: u32,
) -> TeamOverview {
    let members = team_members(manager, employees);
    let horizon = today + Duration::days(i64::from(window_days));

    let balances = members
        .iter()
        .map(|emp| {
            let own: Vec<LeaveRequest> = requests
                .iter()
                .filter(|r| r.employee_id == emp.id)
                .cloned()
                .collect();
            TeamMemberBalance {
                employee_id: emp.employee_id.clone(),
                name: emp.name.clone(),
                department: emp.department.clone(),
                position: emp.position.clone(),
                balance: reconcile(&emp.entitlement(), &own),
            }
        })
        .collect();

    let mut upcoming: Vec<UpcomingLeave> = requests
        .iter()
        .filter(|r| r.is_active() && r.start_date >= today && r.start_date <= horizon)
        .filter_map(|r| {
            let emp = members.iter().find(|e| e.id == r.employee_id)?;
            Some(UpcomingLeave {
                request_id: r.id.clone(),
                employee_id: emp.employee_id.clone(),
                employee_name: emp.name.clone(),
                start_date: r.start_date,
                end_date: r.end_date,
                business_days: r.business_days,
                status: r.status,
            })
        })
        .collect();
    upcoming.sort_by_key(|u| u.start_date);

    TeamOverview {
        team_size: members.len(),
        window_days,
        members: balances,
        upcoming,
    }
}
