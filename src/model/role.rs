use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    HrAdmin = 1,
    Manager = 2,
    Employee = 3,
}

impl Role {
    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Role::HrAdmin),
            2 => Some(Role::Manager),
            3 => Some(Role::Employee),
            _ => None,
        }
    }

    pub fn id(self) -> u8 {
        self as u8
    }
}
