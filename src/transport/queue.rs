//! Queue position arithmetic for the advance and step-back policies.
//!
//! These are pure functions of the queue length, the current position and
//! the shuffle/repeat flags so the controller can stay a thin state holder.

use rand::Rng;

use crate::library::Track;

use super::types::RepeatMode;

/// Position of the track with `id` in `queue`.
pub(crate) fn position_of(queue: &[Track], id: &str) -> Option<usize> {
    queue.iter().position(|t| t.id == id)
}

/// Where `next` goes, or `None` when playback should stop.
///
/// Shuffle picks uniformly among every other entry; with a single entry it
/// falls through to the sequential rules.
pub(crate) fn next_position<R: Rng>(
    len: usize,
    current: Option<usize>,
    shuffle: bool,
    repeat: RepeatMode,
    rng: &mut R,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let Some(cur) = current else {
        return Some(if shuffle { rng.gen_range(0..len) } else { 0 });
    };

    if shuffle && len > 1 {
        // Draw from len-1 slots and skip over the current one.
        let pick = rng.gen_range(0..len - 1);
        return Some(if pick >= cur { pick + 1 } else { pick });
    }

    if cur + 1 < len {
        Some(cur + 1)
    } else if repeat == RepeatMode::All {
        Some(0)
    } else {
        None
    }
}

/// Where `previous` goes when it does not restart, or `None` at the head of
/// the queue without wrap-around.
pub(crate) fn previous_position(
    len: usize,
    current: Option<usize>,
    repeat: RepeatMode,
) -> Option<usize> {
    if len == 0 {
        return None;
    }

    match current {
        None => Some(0),
        Some(0) if repeat == RepeatMode::All => Some(len - 1),
        Some(0) => None,
        Some(cur) => Some(cur - 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn sequential_next_advances_then_stops_or_wraps() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(next_position(3, Some(0), false, RepeatMode::Off, &mut rng), Some(1));
        assert_eq!(next_position(3, Some(2), false, RepeatMode::Off, &mut rng), None);
        assert_eq!(next_position(3, Some(2), false, RepeatMode::One, &mut rng), None);
        assert_eq!(next_position(3, Some(2), false, RepeatMode::All, &mut rng), Some(0));
        assert_eq!(next_position(0, Some(0), false, RepeatMode::All, &mut rng), None);
    }

    #[test]
    fn shuffled_next_never_repeats_current_and_covers_the_rest() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let p = next_position(5, Some(2), true, RepeatMode::Off, &mut rng).unwrap();
            assert_ne!(p, 2);
            seen[p] = true;
        }
        assert_eq!(seen, [true, true, false, true, true]);
    }

    #[test]
    fn shuffled_next_with_one_entry_uses_sequential_rules() {
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(next_position(1, Some(0), true, RepeatMode::Off, &mut rng), None);
        assert_eq!(next_position(1, Some(0), true, RepeatMode::All, &mut rng), Some(0));
    }

    #[test]
    fn previous_wraps_only_with_repeat_all() {
        assert_eq!(previous_position(3, Some(2), RepeatMode::Off), Some(1));
        assert_eq!(previous_position(3, Some(0), RepeatMode::Off), None);
        assert_eq!(previous_position(3, Some(0), RepeatMode::One), None);
        assert_eq!(previous_position(3, Some(0), RepeatMode::All), Some(2));
        assert_eq!(previous_position(0, Some(0), RepeatMode::All), None);
    }
}
