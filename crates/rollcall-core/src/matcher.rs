//! Identity matching against the reference set.

use crate::reference::ReferenceSet;
use crate::types::Embedding;
use std::fmt;

/// Maximum Euclidean distance at which two embeddings count as the same person.
///
/// Embeddings are L2-normalized, so this corresponds to a cosine similarity
/// of roughly 0.40.
pub const MATCH_TOLERANCE: f32 = 1.10;

/// Outcome of matching one detected face.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identity {
    Known(String),
    Unknown,
}

impl Identity {
    /// The matched name, or `None` for [`Identity::Unknown`].
    pub fn name(&self) -> Option<&str> {
        match self {
            Identity::Known(name) => Some(name),
            Identity::Unknown => None,
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Known(name) => f.write_str(name),
            Identity::Unknown => f.write_str("Unknown"),
        }
    }
}

/// Strategy for naming a probe embedding from a reference set.
pub trait Matcher {
    fn identify(&self, probe: &Embedding, references: &ReferenceSet) -> Identity;
}

/// Distance from `probe` to every reference embedding, in reference order.
pub fn face_distances(references: &[Embedding], probe: &Embedding) -> Vec<f32> {
    references.iter().map(|r| r.euclidean_distance(probe)).collect()
}

/// Per-reference accept flag: `distance <= tolerance`.
pub fn compare_faces(references: &[Embedding], probe: &Embedding, tolerance: f32) -> Vec<bool> {
    face_distances(references, probe)
        .into_iter()
        .map(|d| d <= tolerance)
        .collect()
}

/// Index of the smallest distance; the first one wins on ties.
fn argmin(distances: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &d) in distances.iter().enumerate() {
        if best.map_or(true, |(_, b)| d < b) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

/// Nearest-neighbour matcher with the fixed [`MATCH_TOLERANCE`].
///
/// The globally nearest reference is accepted only if it also passes the
/// tolerance; no fallback to the next-nearest candidate.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestMatcher;

impl Matcher for NearestMatcher {
    fn identify(&self, probe: &Embedding, references: &ReferenceSet) -> Identity {
        let distances = face_distances(references.embeddings(), probe);
        let matches: Vec<bool> = distances.iter().map(|&d| d <= MATCH_TOLERANCE).collect();

        let Some(best) = argmin(&distances) else {
            return Identity::Unknown;
        };

        tracing::debug!(
            candidate = %references.names()[best],
            distance = distances[best],
            accepted = matches[best],
            "nearest reference"
        );

        if matches[best] {
            Identity::Known(references.names()[best].clone())
        } else {
            Identity::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emb(values: &[f32]) -> Embedding {
        Embedding::from_values(values.to_vec())
    }

    fn reference_set(entries: &[(&str, &[f32])]) -> ReferenceSet {
        let mut set = ReferenceSet::default();
        for (name, values) in entries {
            set.insert(name.to_string(), emb(values));
        }
        set
    }

    #[test]
    fn test_exact_reference_is_its_own_match() {
        let set = reference_set(&[("alice", &[1.0, 0.0, 0.0]), ("bob", &[0.0, 1.0, 0.0])]);
        let probe = emb(&[0.0, 1.0, 0.0]);
        assert_eq!(face_distances(set.embeddings(), &probe)[1], 0.0);
        assert_eq!(NearestMatcher.identify(&probe, &set), Identity::Known("bob".into()));
    }

    #[test]
    fn test_empty_reference_set_is_unknown() {
        let set = ReferenceSet::default();
        assert_eq!(NearestMatcher.identify(&emb(&[1.0, 0.0]), &set), Identity::Unknown);
        assert_eq!(NearestMatcher.identify(&emb(&[]), &set), Identity::Unknown);
    }

    #[test]
    fn test_nearest_outside_tolerance_is_unknown() {
        // Distance 2.0 from the only reference.
        let set = reference_set(&[("alice", &[1.0, 0.0])]);
        assert_eq!(NearestMatcher.identify(&emb(&[-1.0, 0.0]), &set), Identity::Unknown);
    }

    #[test]
    fn test_picks_globally_nearest_when_several_pass() {
        let set = reference_set(&[
            ("far", &[0.6, 0.8]),
            ("near", &[0.95, 0.3122]),
            ("other", &[0.0, -1.0]),
        ]);
        let probe = emb(&[1.0, 0.0]);
        let flags = compare_faces(set.embeddings(), &probe, MATCH_TOLERANCE);
        assert_eq!(flags, vec![true, true, false]);
        assert_eq!(NearestMatcher.identify(&probe, &set), Identity::Known("near".into()));
    }

    #[test]
    fn test_argmin_first_wins_on_tie() {
        assert_eq!(argmin(&[0.5, 0.2, 0.2]), Some(1));
        assert_eq!(argmin(&[]), None);
    }

    #[test]
    fn test_identity_display() {
        assert_eq!(Identity::Known("carol".into()).to_string(), "carol");
        assert_eq!(Identity::Unknown.to_string(), "Unknown");
        assert_eq!(Identity::Unknown.name(), None);
    }
}
