use std::collections::HashSet;

use super::records::SpotId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Duplicate,
}

/// Spot identifiers already imported during one run.
///
/// Owned by whoever drives the run and handed to the import by `&mut`. Shards imported in
/// parallel each need their own set.
#[derive(Debug, Default)]
pub struct SeenIds(HashSet<SpotId>);

impl SeenIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `id` as seen, or reports it as a repeat of an earlier record.
    pub fn admit(&mut self, id: SpotId) -> Admission {
        if self.0.insert(id) {
            Admission::Accepted
        } else {
            Admission::Duplicate
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_occurrence_is_a_duplicate() {
        let mut seen = SeenIds::new();
        assert_eq!(seen.admit(SpotId(42)), Admission::Accepted);
        assert_eq!(seen.admit(SpotId(7)), Admission::Accepted);
        assert_eq!(seen.admit(SpotId(42)), Admission::Duplicate);
        assert_eq!(seen.admit(SpotId(42)), Admission::Duplicate);
        assert_eq!(seen.admit(SpotId(7)), Admission::Duplicate);
        assert_eq!(seen.admit(SpotId(8)), Admission::Accepted);
    }
}
