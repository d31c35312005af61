//! Item status lifecycle rules.
//!
//! The transition table is the single authority on how an item moves
//! through its lifecycle: `lost → found → returned`, with `returned`
//! terminal. Everything here is a total, side-effect-free function over
//! the three-element status domain; persistence and permission checks
//! belong to the callers.

use std::str::FromStr;

use thiserror::Error;

use crate::models::ItemStatus;

/// All recognized item statuses, in lifecycle order.
pub const VALID_STATUSES: [ItemStatus; 3] =
    [ItemStatus::Lost, ItemStatus::Found, ItemStatus::Returned];

/// A status transition rejected by [`validate_status_transition`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Requested status is not one of lost/found/returned.
    #[error("Invalid status value: {0}")]
    InvalidStatusValue(String),

    /// Requested status equals the current status. Status changes must
    /// represent real progress, so no-op transitions are rejected.
    #[error("Item is already in '{0}' status")]
    NoOpTransition(ItemStatus),

    /// Requested status is not reachable from the current status.
    #[error("Cannot change status from '{from}' to '{to}'")]
    IllegalTransition { from: ItemStatus, to: ItemStatus },
}

/// Whether `value` names a recognized item status.
pub fn is_valid_status(value: &str) -> bool {
    ItemStatus::from_str(value).is_ok()
}

/// Statuses reachable in one step from `current`.
///
/// Empty for the terminal `returned` status.
pub fn allowed_next_statuses(current: ItemStatus) -> &'static [ItemStatus] {
    match current {
        ItemStatus::Lost => &[ItemStatus::Found],
        ItemStatus::Found => &[ItemStatus::Returned],
        ItemStatus::Returned => &[],
    }
}

/// Whether the table permits moving from `from` to `to` in one step.
///
/// Pure reachability: the no-op check is layered on top by
/// [`validate_status_transition`].
pub fn can_transition(from: ItemStatus, to: ItemStatus) -> bool {
    allowed_next_statuses(from).contains(&to)
}

/// Validate a requested status change against the lifecycle rules.
///
/// Rejection order: no-op transitions first, then anything the table
/// does not reach. A terminal (`returned`) item rejects every target.
pub fn validate_status_transition(
    current: ItemStatus,
    requested: ItemStatus,
) -> Result<(), TransitionError> {
    if current == requested {
        return Err(TransitionError::NoOpTransition(current));
    }
    if !can_transition(current, requested) {
        return Err(TransitionError::IllegalTransition {
            from: current,
            to: requested,
        });
    }
    Ok(())
}

/// Validate a raw status string from a client against the lifecycle rules.
///
/// Unparseable values surface as [`TransitionError::InvalidStatusValue`]
/// before the table is consulted.
pub fn validate_status_transition_str(
    current: ItemStatus,
    requested: &str,
) -> Result<ItemStatus, TransitionError> {
    let target = ItemStatus::from_str(requested)
        .map_err(|_| TransitionError::InvalidStatusValue(requested.to_string()))?;
    validate_status_transition(current, target)?;
    Ok(target)
}

/// Human-readable description of a status, for the status-info endpoint.
pub fn status_description(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Lost => "Item is reported as lost and needs to be found",
        ItemStatus::Found => "Item has been found and is waiting to be returned",
        ItemStatus::Returned => "Item has been successfully returned to owner",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_status() {
        assert!(is_valid_status("lost"));
        assert!(is_valid_status("found"));
        assert!(is_valid_status("returned"));
        assert!(!is_valid_status("stolen"));
        assert!(!is_valid_status(""));
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(can_transition(ItemStatus::Lost, ItemStatus::Found));
        assert!(can_transition(ItemStatus::Found, ItemStatus::Returned));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!can_transition(ItemStatus::Found, ItemStatus::Lost));
        assert!(!can_transition(ItemStatus::Returned, ItemStatus::Found));
        assert!(!can_transition(ItemStatus::Returned, ItemStatus::Lost));
    }

    #[test]
    fn test_no_skipping_states() {
        assert!(!can_transition(ItemStatus::Lost, ItemStatus::Returned));
    }

    #[test]
    fn test_returned_is_terminal() {
        assert!(allowed_next_statuses(ItemStatus::Returned).is_empty());
        for target in VALID_STATUSES {
            assert!(validate_status_transition(ItemStatus::Returned, target).is_err());
        }
    }

    #[test]
    fn test_no_op_transition_rejected_for_all_statuses() {
        for status in VALID_STATUSES {
            assert_eq!(
                validate_status_transition(status, status),
                Err(TransitionError::NoOpTransition(status))
            );
        }
    }

    #[test]
    fn test_validate_accepts_legal_step() {
        assert!(validate_status_transition(ItemStatus::Lost, ItemStatus::Found).is_ok());
        assert!(validate_status_transition(ItemStatus::Found, ItemStatus::Returned).is_ok());
    }

    #[test]
    fn test_validate_rejects_illegal_step() {
        assert_eq!(
            validate_status_transition(ItemStatus::Lost, ItemStatus::Returned),
            Err(TransitionError::IllegalTransition {
                from: ItemStatus::Lost,
                to: ItemStatus::Returned,
            })
        );
    }

    #[test]
    fn test_validate_str_unrecognized_value() {
        let err = validate_status_transition_str(ItemStatus::Lost, "misplaced").unwrap_err();
        assert_eq!(
            err,
            TransitionError::InvalidStatusValue("misplaced".to_string())
        );
    }

    #[test]
    fn test_validate_str_legal_step() {
        let target = validate_status_transition_str(ItemStatus::Lost, "found").unwrap();
        assert_eq!(target, ItemStatus::Found);
    }

    #[test]
    fn test_transition_error_display() {
        let err = TransitionError::IllegalTransition {
            from: ItemStatus::Found,
            to: ItemStatus::Lost,
        };
        assert_eq!(err.to_string(), "Cannot change status from 'found' to 'lost'");

        let err = TransitionError::NoOpTransition(ItemStatus::Found);
        assert_eq!(err.to_string(), "Item is already in 'found' status");
    }
}
