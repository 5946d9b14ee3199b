//! Story segments, the nodes of the story graph.

use super::resolver::{ContentError, ResolveContext};

/// Marker shown in place of a preview for computed content.
pub const DYNAMIC_PREVIEW: &str = "[Function: Dynamic Content]";

/// Number of characters kept by [`Segment::preview`].
const PREVIEW_CHARS: usize = 100;

/// A content function: pure, deterministic given its context.
pub type ContentFn = fn(&ResolveContext<'_>) -> Result<String, ContentError>;

/// The body of a segment.
#[derive(Debug, Clone)]
pub enum SegmentContent {
    /// Fixed text shown verbatim.
    Literal(String),
    /// Text computed from the reader's responses, device and dates.
    Computed(ContentFn),
    /// Fixed text followed by a bulleted list and an optional footer.
    List {
        /// Lead-in text.
        text: String,
        /// Bullet items, in display order.
        items: Vec<String>,
        /// Trailing line below the list.
        footer: Option<String>,
    },
}

/// A branch option offered by a segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Button label.
    pub label: String,
    /// Segment the choice leads to.
    pub next_id: String,
}

/// Free-text capture required before a segment can be left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    /// Placeholder shown in the input field.
    pub prompt: String,
    /// Key the answer is stored under.
    pub response_key: String,
}

/// A node in the story graph.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Unique segment id.
    pub id: String,
    /// What the segment displays.
    pub content: SegmentContent,
    /// Default successor.
    pub next_id: Option<String>,
    /// Branch options; empty when the segment does not branch.
    pub choices: Vec<Choice>,
    /// Input the reader must give before advancing.
    pub input_request: Option<InputRequest>,
    /// Label of the advance control, if not the default.
    pub advance_label: Option<String>,
}

impl Segment {
    fn with_content(id: &str, content: SegmentContent) -> Self {
        Self {
            id: id.to_owned(),
            content,
            next_id: None,
            choices: Vec::new(),
            input_request: None,
            advance_label: None,
        }
    }

    /// A segment showing fixed text.
    #[must_use]
    pub fn literal(id: &str, text: &str) -> Self {
        Self::with_content(id, SegmentContent::Literal(text.to_owned()))
    }

    /// A segment whose text is computed at resolution time.
    #[must_use]
    pub fn computed(id: &str, content: ContentFn) -> Self {
        Self::with_content(id, SegmentContent::Computed(content))
    }

    /// A segment showing text followed by bullet items.
    #[must_use]
    pub fn list(id: &str, text: &str, items: &[&str]) -> Self {
        Self::with_content(
            id,
            SegmentContent::List {
                text: text.to_owned(),
                items: items.iter().map(|item| (*item).to_owned()).collect(),
                footer: None,
            },
        )
    }

    /// Sets the default successor.
    #[must_use]
    pub fn next(mut self, next_id: &str) -> Self {
        self.next_id = Some(next_id.to_owned());
        self
    }

    /// Sets the branch options as `(label, next_id)` pairs.
    #[must_use]
    pub fn choices(mut self, choices: &[(&str, &str)]) -> Self {
        self.choices = choices
            .iter()
            .map(|(label, next_id)| Choice {
                label: (*label).to_owned(),
                next_id: (*next_id).to_owned(),
            })
            .collect();
        self
    }

    /// Requires the reader to answer before advancing.
    #[must_use]
    pub fn input(mut self, prompt: &str, response_key: &str) -> Self {
        self.input_request = Some(InputRequest {
            prompt: prompt.to_owned(),
            response_key: response_key.to_owned(),
        });
        self
    }

    /// Overrides the advance control label.
    #[must_use]
    pub fn advance_label(mut self, label: &str) -> Self {
        self.advance_label = Some(label.to_owned());
        self
    }

    /// Sets the footer of a list segment. Has no effect on other content.
    #[must_use]
    pub fn footer(mut self, footer: &str) -> Self {
        if let SegmentContent::List { footer: slot, .. } = &mut self.content {
            *slot = Some(footer.to_owned());
        }
        self
    }

    /// Returns `true` if the segment offers branch options.
    #[must_use]
    pub fn has_choices(&self) -> bool {
        !self.choices.is_empty()
    }

    /// Every segment id this segment can lead to.
    pub fn successors(&self) -> impl Iterator<Item = &str> {
        self.next_id
            .as_deref()
            .into_iter()
            .chain(self.choices.iter().map(|choice| choice.next_id.as_str()))
    }

    /// Static text, if the content is not computed.
    #[must_use]
    pub fn static_text(&self) -> Option<&str> {
        match &self.content {
            SegmentContent::Literal(text) | SegmentContent::List { text, .. } => Some(text),
            SegmentContent::Computed(_) => None,
        }
    }

    /// Short description for authoring tools.
    #[must_use]
    pub fn preview(&self) -> String {
        let Some(text) = self.static_text() else {
            return DYNAMIC_PREVIEW.to_owned();
        };
        let mut preview: String = text.chars().take(PREVIEW_CHARS).collect();
        if text.chars().count() > PREVIEW_CHARS {
            preview.push_str("...");
        }
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successors_lists_default_and_choice_targets() {
        let linear = Segment::literal("a", "text").next("b");
        let branching = Segment::literal("c", "text").choices(&[("one", "d"), ("two", "e")]);

        assert_eq!(linear.successors().collect::<Vec<_>>(), vec!["b"]);
        assert_eq!(branching.successors().collect::<Vec<_>>(), vec!["d", "e"]);
        assert!(branching.has_choices());
        assert!(!linear.has_choices());
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "x".repeat(150);
        let segment = Segment::literal("long", &text);

        let preview = segment.preview();

        assert_eq!(preview.len(), 103);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_preview_keeps_short_text() {
        let segment = Segment::literal("short", "Hello? Is anyone there?");

        assert_eq!(segment.preview(), "Hello? Is anyone there?");
    }

    #[test]
    fn test_preview_marks_computed_content() {
        let segment = Segment::computed("dyn", |_| Ok("hi".to_owned()));

        assert_eq!(segment.preview(), DYNAMIC_PREVIEW);
    }

    #[test]
    fn test_footer_only_applies_to_list_content() {
        let list = Segment::list("l", "WHAT CAN YOU DO?", &["one"]).footer("Remember.");
        let literal = Segment::literal("t", "text").footer("ignored");

        match &list.content {
            SegmentContent::List { footer, items, .. } => {
                assert_eq!(footer.as_deref(), Some("Remember."));
                assert_eq!(items, &vec!["one".to_owned()]);
            }
            other => panic!("expected List, got {other:?}"),
        }
        assert!(matches!(literal.content, SegmentContent::Literal(_)));
    }
}
