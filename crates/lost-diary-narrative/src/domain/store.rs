//! The segment store: an immutable, validated story graph.

use std::collections::HashMap;

use lost_diary_core::error::StoryError;

use super::segment::Segment;

/// All segments of a story, keyed by id and kept in authoring order.
#[derive(Debug, Clone)]
pub struct SegmentStore {
    segments: Vec<Segment>,
    index: HashMap<String, usize>,
}

impl SegmentStore {
    /// Builds a store from a literal segment table.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidGraph` if an id is duplicated, an edge
    /// points at an unknown id, a segment has both a default successor and
    /// choices, or an input segment has no default successor.
    pub fn new(segments: Vec<Segment>) -> Result<Self, StoryError> {
        let mut index = HashMap::with_capacity(segments.len());
        for (position, segment) in segments.iter().enumerate() {
            if index.insert(segment.id.clone(), position).is_some() {
                return Err(StoryError::InvalidGraph(format!(
                    "duplicate segment id {}",
                    segment.id
                )));
            }
        }

        for segment in &segments {
            if segment.next_id.is_some() && segment.has_choices() {
                return Err(StoryError::InvalidGraph(format!(
                    "segment {} has both a default successor and choices",
                    segment.id
                )));
            }
            if segment.input_request.is_some() && segment.next_id.is_none() {
                return Err(StoryError::InvalidGraph(format!(
                    "input segment {} has no default successor",
                    segment.id
                )));
            }
            if let Some(target) = segment.successors().find(|id| !index.contains_key(*id)) {
                return Err(StoryError::InvalidGraph(format!(
                    "segment {} points at unknown segment {target}",
                    segment.id
                )));
            }
        }

        Ok(Self { segments, index })
    }

    /// Looks up a segment.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::SegmentNotFound` if no segment has this id.
    pub fn get(&self, id: &str) -> Result<&Segment, StoryError> {
        self.index
            .get(id)
            .map(|position| &self.segments[*position])
            .ok_or_else(|| StoryError::SegmentNotFound(id.to_owned()))
    }

    /// Returns `true` if a segment has this id.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All segments in authoring order.
    #[must_use]
    pub fn all(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` if the store holds no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments whose id or static text contains `term`, ignoring case.
    /// An empty term matches everything.
    #[must_use]
    pub fn search(&self, term: &str) -> Vec<&Segment> {
        let needle = term.to_lowercase();
        self.segments
            .iter()
            .filter(|segment| {
                segment.id.to_lowercase().contains(&needle)
                    || segment
                        .static_text()
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_graph() -> Vec<Segment> {
        vec![
            Segment::literal("a", "Hello? Is anyone there?").next("b"),
            Segment::literal("b", "Pick one").choices(&[("left", "c"), ("right", "a")]),
            Segment::literal("c", "Who are you?")
                .input("Type your name...", "userName")
                .next("a"),
        ]
    }

    #[test]
    fn test_get_returns_segment_by_id() {
        let store = SegmentStore::new(small_graph()).unwrap();

        let segment = store.get("b").unwrap();

        assert_eq!(segment.id, "b");
        assert_eq!(segment.choices.len(), 2);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_get_unknown_id_returns_not_found() {
        let store = SegmentStore::new(small_graph()).unwrap();

        let result = store.get("missing");

        match result {
            Err(StoryError::SegmentNotFound(id)) => assert_eq!(id, "missing"),
            other => panic!("expected SegmentNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_all_preserves_authoring_order() {
        let store = SegmentStore::new(small_graph()).unwrap();

        let ids: Vec<&str> = store.all().iter().map(|s| s.id.as_str()).collect();

        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let segments = vec![
            Segment::literal("a", "one").next("a"),
            Segment::literal("a", "two").next("a"),
        ];

        let result = SegmentStore::new(segments);

        assert!(matches!(result, Err(StoryError::InvalidGraph(_))));
    }

    #[test]
    fn test_new_rejects_dangling_choice_edge() {
        let segments = vec![Segment::literal("a", "one").choices(&[("go", "nowhere")])];

        let result = SegmentStore::new(segments);

        match result {
            Err(StoryError::InvalidGraph(message)) => assert!(message.contains("nowhere")),
            other => panic!("expected InvalidGraph, got {other:?}"),
        }
    }

    #[test]
    fn test_new_rejects_default_and_choices_together() {
        let segments = vec![
            Segment::literal("a", "one")
                .next("a")
                .choices(&[("stay", "a")]),
        ];

        assert!(matches!(
            SegmentStore::new(segments),
            Err(StoryError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_new_rejects_input_without_successor() {
        let segments = vec![Segment::literal("a", "name?").input("Type...", "userName")];

        assert!(matches!(
            SegmentStore::new(segments),
            Err(StoryError::InvalidGraph(_))
        ));
    }

    #[test]
    fn test_search_matches_id_and_text_case_insensitively() {
        let store = SegmentStore::new(small_graph()).unwrap();

        let by_text: Vec<&str> = store.search("WHO").iter().map(|s| s.id.as_str()).collect();
        let by_id: Vec<&str> = store.search("b").iter().map(|s| s.id.as_str()).collect();

        assert_eq!(by_text, vec!["c"]);
        assert_eq!(by_id, vec!["b"]);
        assert_eq!(store.search("").len(), 3);
    }
}
