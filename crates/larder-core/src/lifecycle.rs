//! Order lifecycle engine.
//!
//! The sole authority on whether an order may move from its current
//! status under a requested action, and what it moves to:
//!
//! ```text
//! submit           DRAFT               -> PENDING
//! confirm          PENDING             -> CONFIRMED
//! cancel           PENDING, CONFIRMED  -> CANCELLED
//! start-preparing  CONFIRMED           -> PREPARING
//! mark-ready       PREPARING           -> READY
//! complete         READY               -> COMPLETED
//! ```
//!
//! Any other pair is rejected. The engine has no side effects;
//! persisting the result (with an optimistic status check) is the
//! caller's job.

use thiserror::Error;

use crate::error::LarderError;
use crate::models::order::{OrderAction, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("cannot {action} an order in status {status}")]
    InvalidTransition {
        status: OrderStatus,
        action: OrderAction,
    },
}

impl From<TransitionError> for LarderError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::InvalidTransition { status, action } => {
                LarderError::InvalidTransition { status, action }
            }
        }
    }
}

/// Compute the status that `action` leads to from `current`.
///
/// Repeating an already-applied action fails: a second `confirm` on a
/// `CONFIRMED` order is an `InvalidTransition`, not a no-op.
pub fn apply_transition(
    current: OrderStatus,
    action: OrderAction,
) -> Result<OrderStatus, TransitionError> {
    use OrderAction as A;
    use OrderStatus as S;

    match (current, action) {
        (S::Draft, A::Submit) => Ok(S::Pending),
        (S::Pending, A::Confirm) => Ok(S::Confirmed),
        (S::Pending | S::Confirmed, A::Cancel) => Ok(S::Cancelled),
        (S::Confirmed, A::StartPreparing) => Ok(S::Preparing),
        (S::Preparing, A::MarkReady) => Ok(S::Ready),
        (S::Ready, A::Complete) => Ok(S::Completed),
        (status, action) => Err(TransitionError::InvalidTransition { status, action }),
    }
}

/// Actions accepted from `status`, in declaration order.
pub fn allowed_actions(status: OrderStatus) -> Vec<OrderAction> {
    OrderAction::ALL
        .into_iter()
        .filter(|action| apply_transition(status, *action).is_ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use OrderAction as A;
    use OrderStatus as S;

    const TABLE: [(S, A, S); 7] = [
        (S::Draft, A::Submit, S::Pending),
        (S::Pending, A::Confirm, S::Confirmed),
        (S::Pending, A::Cancel, S::Cancelled),
        (S::Confirmed, A::Cancel, S::Cancelled),
        (S::Confirmed, A::StartPreparing, S::Preparing),
        (S::Preparing, A::MarkReady, S::Ready),
        (S::Ready, A::Complete, S::Completed),
    ];

    fn expected(status: S, action: A) -> Option<S> {
        TABLE
            .iter()
            .find(|(from, act, _)| *from == status && *act == action)
            .map(|(_, _, to)| *to)
    }

    #[test]
    fn every_pair_matches_the_table() {
        for status in S::ALL {
            for action in A::ALL {
                let result = apply_transition(status, action);
                match expected(status, action) {
                    Some(next) => assert_eq!(result, Ok(next), "{status} + {action}"),
                    None => assert_eq!(
                        result,
                        Err(TransitionError::InvalidTransition { status, action }),
                        "{status} + {action} should be rejected"
                    ),
                }
            }
        }
    }

    #[test]
    fn terminal_states_reject_everything() {
        for status in [S::Completed, S::Cancelled] {
            assert!(allowed_actions(status).is_empty());
            for action in A::ALL {
                assert!(apply_transition(status, action).is_err());
            }
        }
    }

    #[test]
    fn repeated_action_is_not_idempotent() {
        let confirmed = apply_transition(S::Pending, A::Confirm).unwrap();
        assert_eq!(
            apply_transition(confirmed, A::Confirm),
            Err(TransitionError::InvalidTransition {
                status: S::Confirmed,
                action: A::Confirm,
            })
        );
    }

    #[test]
    fn out_of_order_action_is_rejected() {
        assert!(apply_transition(S::Pending, A::Complete).is_err());
        assert!(apply_transition(S::Draft, A::Confirm).is_err());
        assert!(apply_transition(S::Draft, A::Cancel).is_err());
    }

    #[test]
    fn happy_path_reaches_completed() {
        let path = [A::Submit, A::Confirm, A::StartPreparing, A::MarkReady, A::Complete];
        let end = path
            .into_iter()
            .try_fold(S::Draft, apply_transition)
            .unwrap();
        assert_eq!(end, S::Completed);
    }

    #[test]
    fn allowed_actions_lists_valid_moves() {
        assert_eq!(allowed_actions(S::Draft), vec![A::Submit]);
        assert_eq!(allowed_actions(S::Pending), vec![A::Confirm, A::Cancel]);
        assert_eq!(allowed_actions(S::Confirmed), vec![A::Cancel, A::StartPreparing]);
    }

    #[test]
    fn converts_into_core_error() {
        let err: LarderError = apply_transition(S::Ready, A::Submit).unwrap_err().into();
        assert!(matches!(
            err,
            LarderError::InvalidTransition {
                status: S::Ready,
                action: A::Submit
            }
        ));
    }
}
