use chrono::NaiveDate;

use crate::error::AppError;
use crate::leave::balance::LeaveBalance;
use crate::model::leave_request::LeaveRequest;

/// Inclusive on both ends: ranges sharing a single day overlap.
pub fn ranges_overlap(a: (NaiveDate, NaiveDate), b: (NaiveDate, NaiveDate)) -> bool {
    a.0 <= b.1 && b.0 <= a.1
}

/// True if `[start, end]` intersects any request that still holds its days.
pub fn has_overlap(start: NaiveDate, end: NaiveDate, existing: &[LeaveRequest]) -> bool {
    existing
        .iter()
        .filter(|r| r.is_active())
        .any(|r| ranges_overlap((start, end), (r.start_date, r.end_date)))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySplit {
    pub business_days: u32,
    pub offset_days: u32,
    pub regular_days: u32,
}

/// Checks a prospective request against the owner's balance and existing
/// requests. `business_days` is the already-counted length of the range.
pub fn validate_submission(
    start: NaiveDate,
    end: NaiveDate,
    business_days: u32,
    offset_days: u32,
    balance: &LeaveBalance,
    existing: &[LeaveRequest],
) -> Result<DaySplit, AppError> {
    if start > end {
        return Err(AppError::InvalidRange);
    }
    if business_days == 0 {
        return Err(AppError::EmptyRange);
    }

    if offset_days > 0 {
        if f64::from(offset_days) > balance.remaining_offset {
            return Err(AppError::InsufficientOffset {
                available: balance.remaining_offset.max(0.0),
            });
        }
        if offset_days > business_days {
            return Err(AppError::OffsetExceedsTotal {
                total: business_days,
            });
        }
    }

    let regular_days = business_days - offset_days;
    if f64::from(regular_days) > balance.remaining {
        return Err(AppError::InsufficientBalance {
            remaining: balance.remaining,
        });
    }

    if has_overlap(start, end, existing) {
        return Err(AppError::Overlap);
    }

    Ok(DaySplit {
        business_days,
        offset_days,
        regular_days,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::leave::balance::{Entitlement, reconcile};
    use crate::model::leave_request::{LeaveStatus, LeaveType};
    use chrono::Utc;

    fn d(m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, day).unwrap()
    }

    fn existing(start: NaiveDate, end: NaiveDate, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: "LR-existing".into(),
            employee_id: "E1".into(),
            start_date: start,
            end_date: end,
            leave_type: LeaveType::Annual,
            status,
            business_days: 3,
            offset_days: 0,
            notes: None,
            submitted_at: Utc::now(),
        }
    }

    fn balance(annual: f64, offset: f64) -> LeaveBalance {
        reconcile(
            &Entitlement {
                annual,
                carry_over: 0.0,
                offset,
            },
            &[],
        )
    }

    #[test]
    fn touching_boundaries_overlap() {
        assert!(ranges_overlap((d(3, 2), d(3, 4)), (d(3, 4), d(3, 5))));
        assert!(ranges_overlap((d(3, 4), d(3, 5)), (d(3, 2), d(3, 4))));
    }

    #[test]
    fn containment_and_intersection_overlap() {
        assert!(ranges_overlap((d(3, 1), d(3, 31)), (d(3, 10), d(3, 12))));
        assert!(ranges_overlap((d(3, 10), d(3, 12)), (d(3, 1), d(3, 31))));
        assert!(ranges_overlap((d(3, 1), d(3, 10)), (d(3, 5), d(3, 15))));
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap((d(3, 2), d(3, 4)), (d(3, 5), d(3, 8))));
        assert!(!ranges_overlap((d(3, 5), d(3, 8)), (d(3, 2), d(3, 4))));
    }

    #[test]
    fn rejected_requests_do_not_block() {
        let reqs = vec![existing(d(3, 2), d(3, 4), LeaveStatus::Rejected)];
        assert!(!has_overlap(d(3, 3), d(3, 3), &reqs));
        let reqs = vec![existing(d(3, 2), d(3, 4), LeaveStatus::Approved)];
        assert!(has_overlap(d(3, 3), d(3, 3), &reqs));
    }

    #[test]
    fn accepts_request_within_balance() {
        let split = validate_submission(d(3, 2), d(3, 4), 3, 1, &balance(10.0, 2.0), &[]).unwrap();
        assert_eq!(
            split,
            DaySplit {
                business_days: 3,
                offset_days: 1,
                regular_days: 2
            }
        );
    }

    #[test]
    fn rejects_reversed_and_empty_ranges() {
        let b = balance(10.0, 0.0);
        assert!(matches!(
            validate_submission(d(3, 4), d(3, 2), 0, 0, &b, &[]),
            Err(AppError::InvalidRange)
        ));
        assert!(matches!(
            validate_submission(d(3, 6), d(3, 7), 0, 0, &b, &[]),
            Err(AppError::EmptyRange)
        ));
    }

    #[test]
    fn offset_days_are_bounded_by_pool_and_request() {
        assert!(matches!(
            validate_submission(d(3, 2), d(3, 4), 3, 3, &balance(10.0, 2.0), &[]),
            Err(AppError::InsufficientOffset { available }) if available == 2.0
        ));
        assert!(matches!(
            validate_submission(d(3, 2), d(3, 4), 3, 4, &balance(10.0, 9.0), &[]),
            Err(AppError::OffsetExceedsTotal { total: 3 })
        ));
    }

    #[test]
    fn regular_days_must_fit_remaining_balance() {
        assert!(matches!(
            validate_submission(d(3, 2), d(3, 4), 3, 0, &balance(2.0, 0.0), &[]),
            Err(AppError::InsufficientBalance { remaining }) if remaining == 2.0
        ));
        // the offset split brings it within reach
        assert!(validate_submission(d(3, 2), d(3, 4), 3, 1, &balance(2.0, 1.0), &[]).is_ok());
    }

    #[test]
    fn overlap_is_checked_last() {
        let reqs = vec![existing(d(3, 4), d(3, 5), LeaveStatus::Pending)];
        assert!(matches!(
            validate_submission(d(3, 2), d(3, 4), 3, 0, &balance(10.0, 0.0), &reqs),
            Err(AppError::Overlap)
        ));
        assert!(matches!(
            validate_submission(d(3, 2), d(3, 4), 3, 0, &balance(1.0, 0.0), &reqs),
            Err(AppError::InsufficientBalance { .. })
        ));
    }
}
