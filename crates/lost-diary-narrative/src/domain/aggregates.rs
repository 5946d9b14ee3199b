//! Aggregate root for a reading session. This is the traversal engine.

use std::fmt;
use std::sync::Arc;

use lost_diary_core::clock::Clock;
use lost_diary_core::config::EngineConfig;
use lost_diary_core::error::StoryError;
use lost_diary_core::event::EventMetadata;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::dates::DerivedDates;
use super::device::DeviceInfo;
use super::events::{
    ResponseRecorded, SegmentEntered, SessionStarted, StoryEvent, StoryEventKind,
    TransitionCancelled, TransitionCompleted, TransitionStarted,
};
use super::resolver::{self, ResolveContext, ResolvedContent};
use super::responses::ResponseMap;
use super::segment::Segment;
use super::store::SegmentStore;
use super::transition::{
    Fade, FadeStep, FrameOutcome, Transition, TransitionPhase, TransitionToken,
};

/// Why a navigation request did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Ignored {
    /// A transition is in flight.
    Busy,
    /// The submitted text was empty or whitespace.
    EmptyInput,
    /// There is nothing to go back to.
    NoHistory,
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Navigation {
    /// A transition started; drive it with `on_frame`.
    Started(TransitionToken),
    /// The request was a no-op.
    Ignored(Ignored),
}

/// One reader's pass through the story graph.
///
/// Owns the current pointer, the answers given so far, the navigation
/// history and the in-flight transition. All mutation goes through the
/// methods below; failed calls leave the session untouched.
pub struct StorySession {
    /// Session identifier.
    pub id: Uuid,
    store: Arc<SegmentStore>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
    current_id: String,
    responses: ResponseMap,
    history: Vec<String>,
    input_buffer: String,
    device: DeviceInfo,
    dates: Option<DerivedDates>,
    transition: Option<Transition>,
    last_token: u64,
    /// Number of events recorded so far.
    version: i64,
    /// Events not yet handed to the host.
    uncommitted_events: Vec<StoryEvent>,
}

impl fmt::Debug for StorySession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorySession")
            .field("id", &self.id)
            .field("current_id", &self.current_id)
            .field("responses", &self.responses)
            .field("history", &self.history)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

impl StorySession {
    /// Starts a session at the configured entry segment.
    ///
    /// Derived dates are absent until [`Self::derive_dates`] or
    /// [`Self::set_dates`] is called; date-dependent text resolves to a
    /// loading placeholder in the meantime.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` if a fade step lies outside `(0, 1]`,
    /// or `StoryError::SegmentNotFound` if the entry segment is unknown.
    pub fn new(
        store: Arc<SegmentStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
        device: DeviceInfo,
    ) -> Result<Self, StoryError> {
        let entry = config.entry_segment.clone();
        Self::open(store, clock, config, device, &entry, ResponseMap::new(), false)
    }

    /// Starts a session at `start_segment` with answers already given.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Config` if a fade step lies outside `(0, 1]`,
    /// or `StoryError::SegmentNotFound` if `start_segment` is unknown.
    pub fn resume(
        store: Arc<SegmentStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
        device: DeviceInfo,
        start_segment: &str,
        responses: ResponseMap,
    ) -> Result<Self, StoryError> {
        Self::open(store, clock, config, device, start_segment, responses, true)
    }

    fn open(
        store: Arc<SegmentStore>,
        clock: Arc<dyn Clock>,
        config: EngineConfig,
        device: DeviceInfo,
        start_segment: &str,
        responses: ResponseMap,
        seeded: bool,
    ) -> Result<Self, StoryError> {
        config.fade.validate()?;
        store.get(start_segment)?;

        let mut session = Self {
            id: Uuid::new_v4(),
            store,
            clock,
            config,
            current_id: start_segment.to_owned(),
            responses,
            history: Vec::new(),
            input_buffer: String::new(),
            device,
            dates: None,
            transition: None,
            last_token: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        };
        session.record(StoryEventKind::SessionStarted(SessionStarted {
            segment_id: start_segment.to_owned(),
            seeded,
        }));
        info!(session_id = %session.id, segment_id = start_segment, seeded, "session started");
        Ok(session)
    }

    /// The current segment id.
    #[must_use]
    pub fn current_id(&self) -> &str {
        &self.current_id
    }

    /// The current segment.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::SegmentNotFound` if the pointer is dangling,
    /// which a validated store rules out.
    pub fn current_segment(&self) -> Result<&Segment, StoryError> {
        self.store.get(&self.current_id)
    }

    /// Answers given so far.
    #[must_use]
    pub fn responses(&self) -> &ResponseMap {
        &self.responses
    }

    /// Previously visited segment ids, oldest first.
    #[must_use]
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Returns `true` if `go_back` would start a transition.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty() && self.transition.is_none()
    }

    /// Whether navigation is currently accepted.
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        if self.transition.is_some() {
            TransitionPhase::Transitioning
        } else {
            TransitionPhase::Idle
        }
    }

    /// Opacity the current text should be drawn with.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.transition
            .as_ref()
            .map_or(1.0, |transition| transition.fade.opacity())
    }

    /// Token of the in-flight transition.
    #[must_use]
    pub fn active_token(&self) -> Option<TransitionToken> {
        self.transition.as_ref().map(|transition| transition.token)
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The segment graph.
    #[must_use]
    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    /// The reader's device.
    #[must_use]
    pub fn device(&self) -> &DeviceInfo {
        &self.device
    }

    /// Session dates, if derived.
    #[must_use]
    pub fn dates(&self) -> Option<&DerivedDates> {
        self.dates.as_ref()
    }

    /// Installs the session dates. Dates are fixed once set; later calls
    /// return `false` and change nothing.
    pub fn set_dates(&mut self, dates: DerivedDates) -> bool {
        if self.dates.is_some() {
            debug!(session_id = %self.id, "dates already derived, keeping the first set");
            return false;
        }
        debug!(session_id = %self.id, today = %dates.today(), "dates derived");
        self.dates = Some(dates);
        true
    }

    /// Derives the session dates from the session clock.
    pub fn derive_dates(&mut self) -> bool {
        let dates = DerivedDates::from_clock(self.clock.as_ref());
        self.set_dates(dates)
    }

    /// Text typed into the input field but not yet submitted.
    #[must_use]
    pub fn input_buffer(&self) -> &str {
        &self.input_buffer
    }

    /// Replaces the pending input text.
    pub fn set_input_buffer(&mut self, text: &str) {
        text.clone_into(&mut self.input_buffer);
    }

    /// Resolves the current segment.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::Content` if the segment's content function fails.
    pub fn resolve_current(&self) -> Result<ResolvedContent, StoryError> {
        self.resolve_segment(&self.current_id)
    }

    /// Resolves any segment against this session's context.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::SegmentNotFound` for an unknown id, or
    /// `StoryError::Content` if the content function fails.
    pub fn resolve_segment(&self, segment_id: &str) -> Result<ResolvedContent, StoryError> {
        let segment = self.store.get(segment_id)?;
        let context = ResolveContext {
            responses: &self.responses,
            device: &self.device,
            dates: self.dates.as_ref(),
            now: self.clock.now(),
        };
        resolver::resolve(segment, &context)
    }

    /// Moves forward to `target_id`, recording the current segment in the
    /// history.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::SegmentNotFound` if `target_id` is unknown.
    pub fn advance(&mut self, target_id: &str) -> Result<Navigation, StoryError> {
        if self.transition.is_some() {
            return Ok(self.ignore(Ignored::Busy));
        }
        self.store.get(target_id)?;

        self.history.push(self.current_id.clone());
        Ok(Navigation::Started(self.begin_transition(target_id)))
    }

    /// Follows the current segment's default successor.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InputRequired` on input segments and
    /// `StoryError::NoSuccessor` when the segment only branches.
    pub fn proceed(&mut self) -> Result<Navigation, StoryError> {
        if self.transition.is_some() {
            return Ok(self.ignore(Ignored::Busy));
        }
        let segment = self.store.get(&self.current_id)?;
        if segment.input_request.is_some() {
            return Err(StoryError::InputRequired(segment.id.clone()));
        }
        let target = segment
            .next_id
            .clone()
            .ok_or_else(|| StoryError::NoSuccessor(segment.id.clone()))?;
        self.advance(&target)
    }

    /// Takes the branch at `index`.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InvalidChoice` if the index is out of range or the
    /// segment has no choices.
    pub fn choose(&mut self, index: usize) -> Result<Navigation, StoryError> {
        if self.transition.is_some() {
            return Ok(self.ignore(Ignored::Busy));
        }
        let segment = self.store.get(&self.current_id)?;
        let target = segment
            .choices
            .get(index)
            .map(|choice| choice.next_id.clone())
            .ok_or_else(|| StoryError::InvalidChoice {
                segment_id: segment.id.clone(),
                index,
            })?;
        self.advance(&target)
    }

    /// Stores the reader's answer and moves to the default successor.
    ///
    /// Empty or whitespace-only text is ignored.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::InputNotRequested` if the current segment does not
    /// ask for input.
    pub fn submit_input(&mut self, text: &str) -> Result<Navigation, StoryError> {
        if self.transition.is_some() {
            return Ok(self.ignore(Ignored::Busy));
        }
        let segment = self.store.get(&self.current_id)?;
        let request = segment
            .input_request
            .as_ref()
            .ok_or_else(|| StoryError::InputNotRequested(segment.id.clone()))?;
        let target = segment
            .next_id
            .clone()
            .ok_or_else(|| StoryError::NoSuccessor(segment.id.clone()))?;
        if text.trim().is_empty() {
            return Ok(self.ignore(Ignored::EmptyInput));
        }
        let response_key = request.response_key.clone();
        self.store.get(&target)?;

        self.responses.record(&response_key, text);
        self.record(StoryEventKind::ResponseRecorded(ResponseRecorded {
            segment_id: self.current_id.clone(),
            response_key,
        }));
        self.input_buffer.clear();
        self.advance(&target)
    }

    /// Submits whatever is in the input buffer.
    ///
    /// # Errors
    ///
    /// See [`Self::submit_input`].
    pub fn submit_pending_input(&mut self) -> Result<Navigation, StoryError> {
        let text = self.input_buffer.clone();
        self.submit_input(&text)
    }

    /// Returns to the most recently visited segment. The segment being left
    /// is not pushed, and no answers are touched.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::SegmentNotFound` if the history names an unknown
    /// segment.
    pub fn go_back(&mut self) -> Result<Navigation, StoryError> {
        if self.transition.is_some() {
            return Ok(self.ignore(Ignored::Busy));
        }
        let Some(target) = self.history.last().cloned() else {
            return Ok(self.ignore(Ignored::NoHistory));
        };
        self.store.get(&target)?;

        self.history.pop();
        Ok(Navigation::Started(self.begin_transition(&target)))
    }

    /// Transitions to `target_id` regardless of any in-flight transition,
    /// which is cancelled. Used by authoring tools; history is left as is.
    ///
    /// # Errors
    ///
    /// Returns `StoryError::SegmentNotFound` if `target_id` is unknown.
    pub fn jump_to(&mut self, target_id: &str) -> Result<TransitionToken, StoryError> {
        self.store.get(target_id)?;
        Ok(self.begin_transition(target_id))
    }

    /// Advances the in-flight transition by one display frame.
    ///
    /// The pointer changes only when opacity reaches 0, and the session is
    /// idle again only when opacity is back at 1. Frames for any token other
    /// than the active one are ignored.
    pub fn on_frame(&mut self, token: TransitionToken) -> FrameOutcome {
        let timing = self.config.fade;
        let Some(transition) = self.transition.as_mut().filter(|t| t.token == token) else {
            debug!(session_id = %self.id, %token, "stale frame ignored");
            return FrameOutcome::Stale;
        };

        match transition.fade.step(&timing) {
            FadeStep::FadingOut(opacity) | FadeStep::FadingIn(opacity) => {
                FrameOutcome::Faded { opacity }
            }
            FadeStep::FadedOut => {
                let target = transition.target.clone();
                self.current_id.clone_from(&target);
                self.record(StoryEventKind::SegmentEntered(SegmentEntered {
                    segment_id: target.clone(),
                }));
                debug!(session_id = %self.id, segment_id = %target, "segment entered");
                FrameOutcome::Swapped { segment_id: target }
            }
            FadeStep::FadedIn => {
                self.transition = None;
                self.record(StoryEventKind::TransitionCompleted(TransitionCompleted {
                    segment_id: self.current_id.clone(),
                    token: token.get(),
                }));
                FrameOutcome::Completed {
                    segment_id: self.current_id.clone(),
                }
            }
        }
    }

    /// Runs the in-flight transition to completion.
    pub fn finish_transition(&mut self) {
        while let Some(token) = self.active_token() {
            self.on_frame(token);
        }
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn uncommitted_events(&self) -> &[StoryEvent] {
        &self.uncommitted_events
    }

    /// Hands recorded events to the caller.
    pub fn drain_events(&mut self) -> Vec<StoryEvent> {
        std::mem::take(&mut self.uncommitted_events)
    }

    fn ignore(&self, reason: Ignored) -> Navigation {
        debug!(session_id = %self.id, ?reason, segment_id = %self.current_id, "navigation ignored");
        Navigation::Ignored(reason)
    }

    fn begin_transition(&mut self, target_id: &str) -> TransitionToken {
        if let Some(previous) = self.transition.take() {
            info!(
                session_id = %self.id,
                token = %previous.token,
                to = %previous.target,
                "transition cancelled"
            );
            self.record(StoryEventKind::TransitionCancelled(TransitionCancelled {
                to_segment: previous.target,
                token: previous.token.get(),
            }));
        }

        self.last_token += 1;
        let token = TransitionToken(self.last_token);
        self.record(StoryEventKind::TransitionStarted(TransitionStarted {
            from_segment: self.current_id.clone(),
            to_segment: target_id.to_owned(),
            token: token.get(),
        }));
        info!(
            session_id = %self.id,
            from = %self.current_id,
            to = target_id,
            %token,
            "transition started"
        );

        self.transition = Some(Transition {
            token,
            target: target_id.to_owned(),
            fade: Fade::new(),
        });
        token
    }

    fn record(&mut self, kind: StoryEventKind) {
        self.version += 1;
        let event = StoryEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                session_id: self.id,
                sequence_number: self.version,
                occurred_at: self.clock.now(),
            },
            kind,
        };
        self.uncommitted_events.push(event);
    }
}
