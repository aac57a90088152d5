//! Strongest-signal selection

use crate::bearing::Reading;
use crate::config::NodeId;
use crate::store::ReadingStore;

/// Entry with the greatest amplitude
///
/// Equal amplitudes are resolved in favour of the node whose label sorts
/// first (byte order), so the winner never depends on arrival order.
pub fn select_entry(store: &ReadingStore) -> Option<(&NodeId, &Reading)> {
    store.iter().fold(None, |best, candidate| match best {
        None => Some(candidate),
        Some(current) => {
            let (id, reading) = candidate;
            let (best_id, best_reading) = current;
            let louder = reading.amplitude_db() > best_reading.amplitude_db();
            let tied = reading.amplitude_db() == best_reading.amplitude_db();
            if louder || (tied && id.as_str() < best_id.as_str()) {
                Some(candidate)
            } else {
                Some(current)
            }
        }
    })
}

/// Bearing of the strongest reading, `None` while the store is empty
pub fn select(store: &ReadingStore) -> Option<f32> {
    select_entry(store).map(|(_, reading)| reading.bearing_deg())
}
