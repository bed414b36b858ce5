use crate::models::BookingStatus;
use crate::BookingError;

/// Validates an administrative status change and returns the resulting status.
///
/// Pending → Confirmed → Cancelled, or Pending → Cancelled directly.
/// Re-applying the current status is a no-op; Cancelled is terminal.
pub fn transition(from: BookingStatus, to: BookingStatus) -> Result<BookingStatus, BookingError> {
    use BookingStatus::*;

    match (from, to) {
        (current, requested) if current == requested => Ok(current),
        (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled) => Ok(to),
        _ => Err(BookingError::InvalidTransition { from, to }),
    }
}
