//! Search candidates and their ordering.

use std::cmp::Ordering;

use markov_entropy_core::Objective;

/// One candidate sequence and its score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCandidate {
    pub output: Vec<u8>,
    pub entropy: f64,
}

impl SearchCandidate {
    pub fn new(output: Vec<u8>, entropy: f64) -> Self {
        Self { output, entropy }
    }

    /// Output with non-printable bytes dropped, for display.
    pub fn printable(&self) -> String {
        String::from_utf8_lossy(&self.output)
            .chars()
            .filter(|c| !c.is_control() && *c != char::REPLACEMENT_CHARACTER)
            .collect()
    }
}

/// Order two candidates best-first under `objective`.
///
/// Scores compare with `total_cmp`; equal scores fall back to the output
/// bytes so ranking never depends on scheduling.
pub fn compare(objective: Objective, a: &SearchCandidate, b: &SearchCandidate) -> Ordering {
    let by_score = match objective {
        Objective::Minimize => a.entropy.total_cmp(&b.entropy),
        Objective::Maximize => b.entropy.total_cmp(&a.entropy),
    };
    by_score.then_with(|| a.output.cmp(&b.output))
}

/// Sort best-first.
pub fn rank(candidates: &mut [SearchCandidate], objective: Objective) {
    candidates.sort_by(|a, b| compare(objective, a, b));
}

/// The better of `current` and `next`.
pub fn better(
    objective: Objective,
    current: Option<SearchCandidate>,
    next: SearchCandidate,
) -> SearchCandidate {
    match current {
        Some(current) if compare(objective, &current, &next) != Ordering::Greater => current,
        _ => next,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(byte: u8, entropy: f64) -> SearchCandidate {
        SearchCandidate::new(vec![byte], entropy)
    }

    #[test]
    fn test_rank_minimize_and_maximize() {
        let mut list = vec![candidate(1, 3.0), candidate(2, 1.0), candidate(3, 2.0)];
        rank(&mut list, Objective::Minimize);
        assert_eq!(list[0].output, vec![2]);

        rank(&mut list, Objective::Maximize);
        assert_eq!(list[0].output, vec![1]);
    }

    #[test]
    fn test_ties_break_on_bytes() {
        let mut list = vec![candidate(9, 1.0), candidate(4, 1.0)];
        rank(&mut list, Objective::Minimize);
        assert_eq!(list[0].output, vec![4]);
        rank(&mut list, Objective::Maximize);
        assert_eq!(list[0].output, vec![4]);
    }

    #[test]
    fn test_better_keeps_incumbent_on_tie() {
        let a = candidate(1, 1.0);
        let b = candidate(1, 1.0);
        assert_eq!(better(Objective::Minimize, Some(a.clone()), b), a);
        assert_eq!(better(Objective::Minimize, None, a.clone()), a);
        assert_eq!(
            better(Objective::Maximize, Some(candidate(1, 1.0)), candidate(2, 5.0)).entropy,
            5.0
        );
    }

    #[test]
    fn test_printable_strips_controls() {
        let c = SearchCandidate::new(vec![0, 0, b'h', b'i', b'\n'], 0.0);
        assert_eq!(c.printable(), "hi");
    }
}
