use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailNotification {
    #[schema(example = "manager@company.ae")]
    pub to: String,
    pub subject: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
    pub request_id: String,
    pub employee_id: String,
}
