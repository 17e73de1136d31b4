//! Two-slot history that suppresses consecutive duplicate readings.

use crate::error::{Result, WatchError};
use crate::reading::Reading;

/// The last two *distinct* readings of one measurement stream.
///
/// Slot 0 is the oldest, slot 1 the newest. A reading equal to the newest
/// slot is discarded; anything else shifts the newest into the oldest slot.
/// Only immediate repeats collapse, so `A, B, A` leaves `(B, A)`.
///
/// Equality uses [`f64::total_cmp`]: repeated `NaN`s count as duplicates and
/// `0.0` / `-0.0` do not.
#[derive(Debug, Clone)]
pub struct DedupHistory<R> {
    slots: [Option<R>; 2],
}

impl<R> Default for DedupHistory<R> {
    fn default() -> Self {
        Self { slots: [None, None] }
    }
}

impl<R: Reading> DedupHistory<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `reading`. Returns `false` when it duplicated the newest slot.
    pub fn add(&mut self, reading: R) -> bool {
        if let Some(newest) = &self.slots[1] {
            if newest.value().total_cmp(&reading.value()).is_eq() {
                return false;
            }
        }
        self.slots.swap(0, 1);
        self.slots[1] = Some(reading);
        true
    }

    /// Both slot values, oldest first. Unset slots are `None`.
    #[must_use]
    pub fn elements(&self) -> [Option<f64>; 2] {
        [
            self.slots[0].as_ref().map(Reading::value),
            self.slots[1].as_ref().map(Reading::value),
        ]
    }

    /// Both slot values, oldest first.
    ///
    /// # Errors
    /// [`WatchError::EmptyHistory`] until two distinct readings were added.
    pub fn try_elements(&self) -> Result<(f64, f64)> {
        match self.elements() {
            [Some(oldest), Some(newest)] => Ok((oldest, newest)),
            _ => Err(WatchError::EmptyHistory),
        }
    }

    pub fn newest(&self) -> Option<&R> {
        self.slots[1].as_ref()
    }

    pub fn oldest(&self) -> Option<&R> {
        self.slots[0].as_ref()
    }

    /// Number of populated slots (0, 1 or 2).
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots[1].is_none()
    }
}
