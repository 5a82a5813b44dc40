use serde::Deserialize;

use crate::entity::BookingStatus;

/// Query-time classification of bookings. A view filter, never persisted.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BookingState {
    #[default]
    All,
    Past,
    Current,
    Future,
    Waiting,
    Rejected,
}

/// Row filter of one state bucket, relative to "now" bound at query time.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum BookingFilter {
    Any,
    Status(BookingStatus),
    EndsBeforeNow,
    CoversNow,
    StartsAfterNow,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StartOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct BookingSelection {
    pub filter: BookingFilter,
    pub order: StartOrder,
}

impl BookingState {
    /// Maps each state to its storage query shape. ALL sorts ascending while
    /// every other bucket sorts descending; callers must not "fix" this.
    pub const fn selection(self) -> BookingSelection {
        match self {
            BookingState::All => BookingSelection {
                filter: BookingFilter::Any,
                order: StartOrder::Asc,
            },
            BookingState::Waiting => BookingSelection {
                filter: BookingFilter::Status(BookingStatus::Waiting),
                order: StartOrder::Desc,
            },
            BookingState::Rejected => BookingSelection {
                filter: BookingFilter::Status(BookingStatus::Rejected),
                order: StartOrder::Desc,
            },
            BookingState::Past => BookingSelection {
                filter: BookingFilter::EndsBeforeNow,
                order: StartOrder::Desc,
            },
            BookingState::Current => BookingSelection {
                filter: BookingFilter::CoversNow,
                order: StartOrder::Desc,
            },
            BookingState::Future => BookingSelection {
                filter: BookingFilter::StartsAfterNow,
                order: StartOrder::Desc,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::{BookingFilter, BookingState, StartOrder};
    use crate::entity::BookingStatus;

    #[test]
    fn all_is_the_only_ascending_bucket() {
        assert_eq!(BookingState::All.selection().order, StartOrder::Asc);
        for state in [
            BookingState::Past,
            BookingState::Current,
            BookingState::Future,
            BookingState::Waiting,
            BookingState::Rejected,
        ] {
            assert_eq!(state.selection().order, StartOrder::Desc);
        }
    }

    #[test]
    fn buckets_map_to_their_filters() {
        assert_eq!(BookingState::All.selection().filter, BookingFilter::Any);
        assert_eq!(
            BookingState::Waiting.selection().filter,
            BookingFilter::Status(BookingStatus::Waiting)
        );
        assert_eq!(
            BookingState::Rejected.selection().filter,
            BookingFilter::Status(BookingStatus::Rejected)
        );
        assert_eq!(
            BookingState::Past.selection().filter,
            BookingFilter::EndsBeforeNow
        );
        assert_eq!(
            BookingState::Current.selection().filter,
            BookingFilter::CoversNow
        );
        assert_eq!(
            BookingState::Future.selection().filter,
            BookingFilter::StartsAfterNow
        );
    }

    #[test]
    fn default_state_is_all() {
        assert_eq!(BookingState::default(), BookingState::All);
    }
}
