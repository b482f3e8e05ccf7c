//! Practice session: the deck, the cursor, the scores and the active card's motion.
//!
//! The session is the only writer of the cursor and the score map. Gestures
//! feed [`CardMotion`]; committed outcomes come back from
//! [`CardMotion::tick`] and are applied in [`Session::tick`], which the render
//! loop calls once per frame.

use crate::gesture::{self, Classification, Dial, Direction, GestureConfig, PanEvent, PanTracker, Vec2};
use crate::models::{Card, Deck, Outcome, ScoreMap, Tally};
use crate::motion::{CardMotion, CardPhase, MotionEvent, Viewport};
use crate::store::{Store, StoreResult};
use std::time::Duration;
use tracing::{debug, info};
use tui_motion::MotionConfig;

pub struct Session {
    deck: Deck,
    scores: ScoreMap,
    cursor: usize,
    motion: CardMotion,
    tracker: PanTracker,
    gesture: GestureConfig,
    commit_feedback: bool,
}

impl Session {
    pub fn new(deck: Deck, scores: ScoreMap, gesture: GestureConfig, motion: MotionConfig) -> Self {
        Self {
            deck,
            scores,
            cursor: 0,
            motion: CardMotion::new(motion, Viewport::default()),
            tracker: PanTracker::new(gesture.clone()),
            gesture,
            commit_feedback: false,
        }
    }

    /// Read the deck and the scores. Both must load before the session exists.
    pub fn load(store: &Store, gesture: GestureConfig, motion: MotionConfig) -> StoreResult<Self> {
        let deck = store.load_deck()?;
        let scores = store.load_scores()?;
        info!(cards = deck.len(), scored = scores.len(), "session loaded");
        Ok(Self::new(deck, scores, gesture, motion))
    }

    // Accessors

    pub fn current_card(&self) -> Option<&Card> {
        self.deck.get(self.cursor)
    }

    /// Cards after the current one, nearest first.
    pub fn upcoming(&self, count: usize) -> impl Iterator<Item = &Card> {
        self.deck.iter().skip(self.cursor + 1).take(count)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn is_last_card(&self) -> bool {
        self.deck.last_index() == Some(self.cursor)
    }

    pub fn scores(&self) -> &ScoreMap {
        &self.scores
    }

    pub fn tally_for_cursor(&self) -> Tally {
        self.scores.get(self.cursor).copied().unwrap_or_default()
    }

    /// Totals per outcome across the whole deck.
    pub fn summary(&self) -> Tally {
        self.scores.summary()
    }

    pub fn motion(&self) -> &CardMotion {
        &self.motion
    }

    pub fn dial(&self) -> Dial {
        gesture::dial(self.motion.offset(), &self.gesture)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.motion.set_viewport(viewport);
    }

    /// Whether a swipe committed since the last call.
    pub fn take_commit_feedback(&mut self) -> bool {
        std::mem::take(&mut self.commit_feedback)
    }

    // Gestures

    pub fn press(&mut self, point: Vec2, at: Duration) {
        if self.is_empty() {
            return;
        }
        self.tracker.press(point, at);
    }

    pub fn drag(&mut self, point: Vec2, at: Duration) {
        if self.is_empty() {
            return;
        }
        match self.tracker.moved(point, at) {
            Some(PanEvent::Began(translation)) => {
                if self.motion.begin_drag() {
                    self.motion.drag_update(translation);
                } else {
                    self.tracker.cancel();
                }
            }
            Some(PanEvent::Moved(translation)) => self.motion.drag_update(translation),
            _ => {}
        }
    }

    /// Finish a press. Returns the classification when it ended a pan.
    pub fn release(&mut self, point: Vec2, at: Duration) -> Option<Classification> {
        if self.is_empty() {
            return None;
        }
        match self.tracker.release(point, at)? {
            PanEvent::Ended(end) => {
                // The card may have started from a non-zero offset when the
                // drag interrupted a spring-back; classify what is on screen.
                let end = gesture::PanEnd {
                    translation: self.motion.offset(),
                    ..end
                };
                Some(self.apply(gesture::classify(&end, &self.gesture)))
            }
            PanEvent::Tap => {
                self.toggle_flip();
                None
            }
            PanEvent::Began(_) | PanEvent::Moved(_) => None,
        }
    }

    /// Drop any press in progress. A card held mid-drag springs back.
    pub fn cancel_gesture(&mut self) {
        self.tracker.cancel();
        if self.motion.phase() == CardPhase::Dragging {
            self.motion.spring_back();
        }
    }

    /// Commit the card in `direction` without a drag.
    pub fn fling(&mut self, direction: Direction) -> Option<Classification> {
        if self.is_empty() || self.motion.is_exiting() {
            return None;
        }
        self.tracker.cancel();
        let end = direction.fling(&self.gesture);
        Some(self.apply(gesture::classify(&end, &self.gesture)))
    }

    pub fn toggle_flip(&mut self) {
        if self.is_empty() {
            return;
        }
        self.motion.toggle_flip();
    }

    fn apply(&mut self, classification: Classification) -> Classification {
        match classification {
            Classification::Commit(outcome) => {
                if self.motion.commit(outcome) {
                    debug!(cursor = self.cursor, %outcome, "swipe committed");
                    self.commit_feedback = true;
                }
            }
            Classification::Cancel => self.motion.spring_back(),
        }
        classification
    }

    // Frame

    /// Advance animations and apply a finished exit.
    ///
    /// Returns the outcome recorded this frame. The cursor and the in-memory
    /// scores move on even when saving the scores fails; the error is returned.
    pub fn tick(&mut self, dt: Duration, store: &Store) -> StoreResult<Option<Outcome>> {
        if self.is_empty() {
            return Ok(None);
        }
        match self.motion.tick(dt) {
            Some(MotionEvent::ExitCompleted(outcome)) => self.record(outcome, store).map(|()| Some(outcome)),
            Some(MotionEvent::Settled) => {
                debug!(cursor = self.cursor, "swipe cancelled");
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn record(&mut self, outcome: Outcome, store: &Store) -> StoreResult<()> {
        let index = self.cursor;
        let tally = self.scores.record(index, outcome);
        let saved = store.save_scores(&self.scores);

        self.cursor = (index + 1).min(self.deck.last_index().unwrap_or(0));
        self.motion.reset_for_next_card();
        info!(index, %outcome, total = tally.total(), cursor = self.cursor, "recorded outcome");
        saved
    }

    /// Forget every recorded outcome, in memory and on disk.
    pub fn clear_scores(&mut self, store: &Store) -> StoreResult<()> {
        store.clear_scores()?;
        self.scores = ScoreMap::new();
        info!("scores cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{StoreError, SCORES_KEY};

    const FRAME: Duration = Duration::from_millis(16);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn two_card_store() -> Store {
        let store = Store::in_memory().unwrap();
        let deck = Deck::new(vec![Card::new("2+2?", "4"), Card::new("3+3?", "6")]);
        store.save_deck(&deck).unwrap();
        store
    }

    fn session(store: &Store) -> Session {
        Session::load(store, GestureConfig::default(), MotionConfig::default()).unwrap()
    }

    /// Drag from the origin to `to` in ten even steps over 200ms.
    fn swipe(session: &mut Session, to: Vec2) -> Option<Classification> {
        let origin = Vec2::new(300.0, 300.0);
        session.press(origin, ms(0));
        for i in 1..=10u64 {
            let point = origin + to * (i as f32 / 10.0);
            session.drag(point, ms(i * 20));
        }
        session.release(origin + to, ms(220))
    }

    /// Tick frames until something is recorded, up to one second.
    fn settle(session: &mut Session, store: &Store) -> Option<Outcome> {
        for _ in 0..62 {
            if let Some(outcome) = session.tick(FRAME, store).unwrap() {
                return Some(outcome);
            }
        }
        None
    }

    #[test]
    fn test_two_card_scenario() {
        let store = two_card_store();
        let mut s = session(&store);
        assert_eq!(s.current_card().map(|c| c.question.as_str()), Some("2+2?"));

        assert_eq!(swipe(&mut s, Vec2::new(200.0, 0.0)), Some(Classification::Commit(Outcome::Easy)));
        // Nothing is recorded until the exit finishes.
        assert!(s.scores().is_empty());
        assert_eq!(s.cursor(), 0);

        assert_eq!(settle(&mut s, &store), Some(Outcome::Easy));
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.scores().get(0), Some(&Tally { again: 0, hard: 0, good: 0, easy: 1 }));
        assert!(s.is_last_card());

        assert_eq!(swipe(&mut s, Vec2::new(0.0, 200.0)), Some(Classification::Commit(Outcome::Hard)));
        assert_eq!(settle(&mut s, &store), Some(Outcome::Hard));
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.scores().get(1), Some(&Tally { again: 0, hard: 1, good: 0, easy: 0 }));
        assert_eq!(s.scores().get(0).map(|t| t.easy), Some(1));
    }

    #[test]
    fn test_save_failure_still_advances() {
        let store = two_card_store();
        let mut s = session(&store);
        store.execute_batch("DROP TABLE kv;").unwrap();

        assert_eq!(s.fling(Direction::Right), Some(Classification::Commit(Outcome::Easy)));
        let mut result = Ok(None);
        for _ in 0..62 {
            result = s.tick(FRAME, &store);
            if !matches!(result, Ok(None)) {
                break;
            }
        }

        assert!(matches!(result, Err(StoreError::Sqlite(_))));
        assert_eq!(s.cursor(), 1);
        assert_eq!(s.scores().get(0).map(|t| t.easy), Some(1));
    }

    #[test]
    fn test_cancel_changes_nothing() {
        let store = two_card_store();
        let mut s = session(&store);

        let origin = Vec2::new(300.0, 300.0);
        s.press(origin, ms(0));
        s.drag(origin + Vec2::new(-20.0, 0.0), ms(400));
        s.drag(origin + Vec2::new(-40.0, 0.0), ms(800));
        let result = s.release(origin + Vec2::new(-40.0, 0.0), ms(820));
        assert_eq!(result, Some(Classification::Cancel));

        assert_eq!(settle(&mut s, &store), None);
        assert_eq!(s.cursor(), 0);
        assert!(s.scores().is_empty());
        assert_eq!(store.get_item(SCORES_KEY).unwrap(), None);
        assert!(s.motion().offset().max_abs() < 0.05);
    }

    #[test]
    fn test_persisted_scores_match_memory() {
        let store = two_card_store();
        let mut s = session(&store);
        for direction in [Direction::Up, Direction::Left, Direction::Left, Direction::Right] {
            s.fling(direction);
            settle(&mut s, &store);
        }
        assert_eq!(s.scores().summary().total(), 4);
        assert_eq!(&store.load_scores().unwrap(), s.scores());

        let reloaded = session(&store);
        assert_eq!(reloaded.scores(), s.scores());
        assert_eq!(reloaded.cursor(), 0);
    }

    #[test]
    fn test_last_card_stays_displayed() {
        let store = two_card_store();
        let mut s = session(&store);
        s.fling(Direction::Right);
        settle(&mut s, &store);

        for _ in 0..3 {
            s.fling(Direction::Down);
            assert_eq!(settle(&mut s, &store), Some(Outcome::Hard));
            assert_eq!(s.cursor(), 1);
            assert_eq!(s.current_card().map(|c| c.answer.as_str()), Some("6"));
            // The card comes back on screen after each commit.
            assert_eq!(s.motion().offset(), Vec2::ZERO);
        }
        assert_eq!(s.tally_for_cursor().hard, 3);
    }

    #[test]
    fn test_one_commit_per_exit() {
        let store = two_card_store();
        let mut s = session(&store);
        assert!(s.fling(Direction::Right).is_some());
        assert_eq!(s.fling(Direction::Left), None);
        s.tick(FRAME, &store).unwrap();

        // Drags during the exit are ignored.
        assert_eq!(swipe(&mut s, Vec2::new(-200.0, 0.0)), None);

        assert_eq!(settle(&mut s, &store), Some(Outcome::Easy));
        assert_eq!(s.summary().total(), 1);
    }

    #[test]
    fn test_tap_flips() {
        let store = two_card_store();
        let mut s = session(&store);
        s.press(Vec2::new(100.0, 100.0), ms(0));
        assert_eq!(s.release(Vec2::new(102.0, 100.0), ms(80)), None);
        for _ in 0..60 {
            s.tick(FRAME, &store).unwrap();
        }
        assert!(s.motion().is_showing_answer());
        assert!(s.scores().is_empty());
    }

    #[test]
    fn test_empty_deck_ignores_gestures() {
        let store = Store::in_memory().unwrap();
        let mut s = session(&store);
        assert!(s.is_empty());
        assert_eq!(s.current_card(), None);
        assert_eq!(s.fling(Direction::Right), None);
        assert_eq!(swipe(&mut s, Vec2::new(200.0, 0.0)), None);
        assert_eq!(s.tick(FRAME, &store).unwrap(), None);
    }

    #[test]
    fn test_load_fails_on_malformed_scores() {
        let store = two_card_store();
        store.set_item(SCORES_KEY, "[oops").unwrap();
        assert!(Session::load(&store, GestureConfig::default(), MotionConfig::default()).is_err());
    }

    #[test]
    fn test_commit_feedback_once() {
        let store = two_card_store();
        let mut s = session(&store);
        assert!(!s.take_commit_feedback());
        s.fling(Direction::Up);
        assert!(s.take_commit_feedback());
        assert!(!s.take_commit_feedback());
    }

    #[test]
    fn test_clear_scores() {
        let store = two_card_store();
        let mut s = session(&store);
        s.fling(Direction::Up);
        settle(&mut s, &store);
        s.clear_scores(&store).unwrap();
        assert!(s.scores().is_empty());
        assert!(store.load_scores().unwrap().is_empty());
    }

    #[test]
    fn test_upcoming_cards() {
        let store = Store::in_memory().unwrap();
        let deck: Deck = (0..4).map(|i| Card::new(format!("q{i}"), format!("a{i}"))).collect();
        store.save_deck(&deck).unwrap();
        let s = session(&store);
        let upcoming: Vec<_> = s.upcoming(2).map(|c| c.question.as_str()).collect();
        assert_eq!(upcoming, vec!["q1", "q2"]);
    }

    #[test]
    fn test_disabled_motion_records_next_frame() {
        let store = two_card_store();
        let mut s = Session::load(&store, GestureConfig::default(), MotionConfig::disabled()).unwrap();
        s.fling(Direction::Left);
        assert_eq!(s.tick(FRAME, &store).unwrap(), Some(Outcome::Again));
        assert_eq!(s.cursor(), 1);
    }
}
