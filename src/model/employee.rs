use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::leave::balance::Entitlement;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(
    example = json!({
        "id": "BAYN00004",
        "employee_id": "BAYN00004",
        "name": "Imelda Marcelo",
        "email": "imelda.marcelo@company.ae",
        "department": "Sales",
        "entity": "Company LLC",
        "position": "Administrative Assistant",
        "location": "Head Office",
        "joining_date": "2023-04-01",
        "annual_leave_entitlement": 22.0,
        "opening_balance": 3.0,
        "offset_balance": 5.0,
        "manager_email": "director@company.ae",
        "is_manager": false
    })
)]
pub struct Employee {
    /// internal record id, owner key for requests and history
    pub id: String,

    /// login id, matched case-insensitively
    #[schema(example = "BAYN00004")]
    pub employee_id: String,

    pub name: String,

    #[schema(nullable = true)]
    pub email: Option<String>,

    pub department: String,

    #[schema(nullable = true)]
    pub entity: Option<String>,

    #[schema(nullable = true)]
    pub position: Option<String>,

    pub location: String,

    #[schema(example = "2023-04-01", nullable = true)]
    pub joining_date: Option<NaiveDate>,

    #[schema(example = 22.0)]
    pub annual_leave_entitlement: f64,

    /// carry-over from the previous year
    #[schema(example = 3.0)]
    pub opening_balance: f64,

    #[schema(example = 5.0)]
    pub offset_balance: f64,

    #[schema(nullable = true)]
    pub manager_email: Option<String>,

    pub is_manager: bool,

    /// argon2 hash of the normalized DOB; employees without one cannot log in
    #[serde(skip)]
    pub credential: Option<String>,
}

impl Employee {
    pub fn entitlement(&self) -> Entitlement {
        Entitlement {
            annual: self.annual_leave_entitlement,
            carry_over: self.opening_balance,
            offset: self.offset_balance,
        }
    }

    /// True when `email` names this employee as its manager.
    pub fn reports_to(&self, email: &str) -> bool {
        self.manager_email
            .as_deref()
            .is_some_and(|m| m.trim().eq_ignore_ascii_case(email.trim()))
    }
}
