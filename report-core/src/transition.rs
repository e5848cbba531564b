use crate::model::Reading;

/// Temperature swing (degrees) that must be strictly exceeded for a change of
/// weather group to count as a major transition.
pub const MAJOR_TEMPERATURE_DELTA: f64 = 3.0;

/// Count adjacent readings where the weather group changes and the
/// temperature moves by more than [`MAJOR_TEMPERATURE_DELTA`].
///
/// Readings must be in chronological order for a single day.
pub fn count_major_transitions(readings: &[Reading]) -> usize {
    readings
        .windows(2)
        .filter(|pair| is_major(&pair[0], &pair[1]))
        .count()
}

fn is_major(prev: &Reading, curr: &Reading) -> bool {
    prev.category != curr.category
        && (curr.temperature - prev.temperature).abs() > MAJOR_TEMPERATURE_DELTA
}
