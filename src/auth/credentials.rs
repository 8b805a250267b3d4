use tracing::debug;

use crate::{
    auth::password::verify_password, config::Config, error::AppError, model::employee::Employee,
    model::role::Role, store::Store,
};

/// Trimmed and uppercased; login ids match case-insensitively.
pub fn normalize_employee_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Digits only, e.g. "10-12-1988" becomes "10121988".
pub fn normalize_dob(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Normalized DOB if it has the 8 digits of DDMMYYYY.
pub fn valid_dob(raw: &str) -> Option<String> {
    let dob = normalize_dob(raw);
    (dob.len() == 8).then_some(dob)
}

/// Resolves the employee owning this id + DOB pair. Unknown ids and wrong
/// dates of birth are indistinguishable to the caller.
pub fn authenticate(store: &Store, employee_id: &str, dob: &str) -> Result<Employee, AppError> {
    let employee_id = normalize_employee_id(employee_id);
    if employee_id.is_empty() {
        return Err(AppError::MissingEmployeeId);
    }
    let dob = valid_dob(dob).ok_or(AppError::InvalidDobFormat)?;

    let Some(employee) = store.employee_by_login(&employee_id) else {
        debug!("Unknown employee id");
        return Err(AppError::InvalidCredentials);
    };

    let Some(hash) = employee.credential.as_deref() else {
        debug!("Employee has no credential on record");
        return Err(AppError::InvalidCredentials);
    };

    verify_password(&dob, hash).map_err(|e| {
        debug!(error = %e, "Date of birth mismatch");
        AppError::InvalidCredentials
    })?;

    Ok(employee)
}

pub fn role_for(employee: &Employee, config: &Config) -> Role {
    if config.is_hr_admin(&employee.employee_id) {
        Role::HrAdmin
    } else if employee.is_manager {
        Role::Manager
    } else {
        Role::Employee
    }
}
