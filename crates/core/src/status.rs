//! Ticket and inventory-document status lifecycles.
//!
//! Statuses are stored as text columns; the string constants here must
//! match the values written by the repositories and the CHECK constraints
//! in the migrations. Transition rules live next to the enums so the
//! handlers can validate a requested change before touching the database.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Ticket status constants
// ---------------------------------------------------------------------------

/// Ticket created, waiting for a technician.
pub const TICKET_PENDING: &str = "pending";
/// Work has started.
pub const TICKET_IN_EXECUTION: &str = "in_execution";
/// Work completed and signed off.
pub const TICKET_FINALIZED: &str = "finalized";
/// Ticket abandoned before completion.
pub const TICKET_CANCELLED: &str = "cancelled";

/// All valid ticket statuses.
pub const VALID_TICKET_STATUSES: &[&str] = &[
    TICKET_PENDING,
    TICKET_IN_EXECUTION,
    TICKET_FINALIZED,
    TICKET_CANCELLED,
];

// ---------------------------------------------------------------------------
// Inventory document status constants
// ---------------------------------------------------------------------------

/// Count document open for item entry.
pub const DOC_DRAFT: &str = "draft";
/// Count applied to stock; immutable afterwards.
pub const DOC_CLOSED: &str = "closed";
/// Count discarded without touching stock.
pub const DOC_CANCELLED: &str = "cancelled";

/// All valid inventory document statuses.
pub const VALID_DOC_STATUSES: &[&str] = &[DOC_DRAFT, DOC_CLOSED, DOC_CANCELLED];

// ---------------------------------------------------------------------------
// Ticket priority constants
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "low";
pub const PRIORITY_MEDIUM: &str = "medium";
pub const PRIORITY_HIGH: &str = "high";
pub const PRIORITY_CRITICAL: &str = "critical";

/// All valid ticket priorities.
pub const VALID_PRIORITIES: &[&str] = &[
    PRIORITY_LOW,
    PRIORITY_MEDIUM,
    PRIORITY_HIGH,
    PRIORITY_CRITICAL,
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Ticket lifecycle status with string conversion.
///
/// Lifecycle: `Pending -> InExecution -> Finalized`, with `Cancelled`
/// reachable from `Pending` and `InExecution`. `Finalized` and
/// `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    Pending,
    InExecution,
    Finalized,
    Cancelled,
}

impl TicketStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => TICKET_PENDING,
            Self::InExecution => TICKET_IN_EXECUTION,
            Self::Finalized => TICKET_FINALIZED,
            Self::Cancelled => TICKET_CANCELLED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            TICKET_PENDING => Ok(Self::Pending),
            TICKET_IN_EXECUTION => Ok(Self::InExecution),
            TICKET_FINALIZED => Ok(Self::Finalized),
            TICKET_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown ticket status: '{other}'. Valid statuses: {}",
                VALID_TICKET_STATUSES.join(", ")
            ))),
        }
    }

    /// Whether a ticket in this status still counts as open work.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::InExecution)
    }

    /// Whether the transition `self -> to` is allowed.
    pub fn can_transition_to(&self, to: TicketStatus) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::InExecution)
                | (Self::Pending, Self::Cancelled)
                | (Self::InExecution, Self::Finalized)
                | (Self::InExecution, Self::Cancelled)
        )
    }
}

/// Validate a requested ticket status change, returning a descriptive
/// error for anything the lifecycle does not allow.
pub fn validate_ticket_transition(from: &str, to: &str) -> Result<TicketStatus, CoreError> {
    let from = TicketStatus::from_str(from)?;
    let to = TicketStatus::from_str(to)?;

    if !from.can_transition_to(to) {
        return Err(CoreError::Validation(format!(
            "Invalid ticket transition: {} -> {}",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(to)
}

/// Inventory count document status with string conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocStatus {
    Draft,
    Closed,
    Cancelled,
}

impl DocStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => DOC_DRAFT,
            Self::Closed => DOC_CLOSED,
            Self::Cancelled => DOC_CANCELLED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            DOC_DRAFT => Ok(Self::Draft),
            DOC_CLOSED => Ok(Self::Closed),
            DOC_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown document status: '{other}'. Valid statuses: {}",
                VALID_DOC_STATUSES.join(", ")
            ))),
        }
    }
}

/// Validate a ticket priority value.
pub fn validate_priority(priority: &str) -> Result<(), CoreError> {
    if VALID_PRIORITIES.contains(&priority) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Unknown priority: '{priority}'. Valid priorities: {}",
            VALID_PRIORITIES.join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticket_status_round_trips_through_strings() {
        for s in VALID_TICKET_STATUSES {
            let parsed = TicketStatus::from_str(s).unwrap();
            assert_eq!(parsed.as_str(), *s);
        }
    }

    #[test]
    fn unknown_ticket_status_is_rejected() {
        let err = TicketStatus::from_str("archived").unwrap_err();
        assert!(err.to_string().contains("archived"));
    }

    #[test]
    fn lifecycle_allows_the_happy_path() {
        assert!(validate_ticket_transition(TICKET_PENDING, TICKET_IN_EXECUTION).is_ok());
        assert!(validate_ticket_transition(TICKET_IN_EXECUTION, TICKET_FINALIZED).is_ok());
    }

    #[test]
    fn lifecycle_allows_cancellation_of_open_work() {
        assert!(validate_ticket_transition(TICKET_PENDING, TICKET_CANCELLED).is_ok());
        assert!(validate_ticket_transition(TICKET_IN_EXECUTION, TICKET_CANCELLED).is_ok());
    }

    #[test]
    fn lifecycle_rejects_skipping_execution() {
        let err = validate_ticket_transition(TICKET_PENDING, TICKET_FINALIZED).unwrap_err();
        assert!(err.to_string().contains("Invalid ticket transition"));
    }

    #[test]
    fn terminal_statuses_cannot_move() {
        assert!(validate_ticket_transition(TICKET_FINALIZED, TICKET_PENDING).is_err());
        assert!(validate_ticket_transition(TICKET_CANCELLED, TICKET_IN_EXECUTION).is_err());
        assert!(validate_ticket_transition(TICKET_FINALIZED, TICKET_CANCELLED).is_err());
    }

    #[test]
    fn open_statuses_are_pending_and_in_execution() {
        assert!(TicketStatus::Pending.is_open());
        assert!(TicketStatus::InExecution.is_open());
        assert!(!TicketStatus::Finalized.is_open());
        assert!(!TicketStatus::Cancelled.is_open());
    }

    #[test]
    fn priority_validation() {
        assert!(validate_priority("high").is_ok());
        assert!(validate_priority("urgent").is_err());
    }

    #[test]
    fn doc_status_round_trips() {
        for s in VALID_DOC_STATUSES {
            assert_eq!(DocStatus::from_str(s).unwrap().as_str(), *s);
        }
        assert!(DocStatus::from_str("open").is_err());
    }
}
