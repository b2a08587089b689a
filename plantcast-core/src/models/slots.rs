//! Fixed half-hour time-slot labels.
//!
//! Table rows and chart x-values are aligned to this exact list. The last
//! slot carries seconds ("24:00:00"), matching the API's end-of-day label.

/// Number of time slots in a forecast day.
pub const SLOT_COUNT: usize = 48;

/// Ordered time-slot labels, "00:30" through "23:30" then "24:00:00".
pub const TIME_SLOTS: [&str; SLOT_COUNT] = [
    "00:30", "01:00", "01:30", "02:00", "02:30", "03:00", "03:30", "04:00", "04:30", "05:00",
    "05:30", "06:00", "06:30", "07:00", "07:30", "08:00", "08:30", "09:00", "09:30", "10:00",
    "10:30", "11:00", "11:30", "12:00", "12:30", "13:00", "13:30", "14:00", "14:30", "15:00",
    "15:30", "16:00", "16:30", "17:00", "17:30", "18:00", "18:30", "19:00", "19:30", "20:00",
    "20:30", "21:00", "21:30", "22:00", "22:30", "23:00", "23:30", "24:00:00",
];

/// Returns the slot index for a label reported by the API.
///
/// Exact matches win. Otherwise `HH:MM:SS` labels with zero seconds are
/// matched against `HH:MM`, and `24:00` is accepted for the final slot.
pub fn slot_index(label: &str) -> Option<usize> {
    let label = label.trim();
    if let Some(idx) = TIME_SLOTS.iter().position(|slot| *slot == label) {
        return Some(idx);
    }

    let short = label.strip_suffix(":00").filter(|s| s.len() == 5).unwrap_or(label);
    if short == "24:00" {
        return Some(SLOT_COUNT - 1);
    }
    TIME_SLOTS.iter().position(|slot| *slot == short)
}
