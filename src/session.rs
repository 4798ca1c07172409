//! Round engine: one countdown-timed session at a time, plus the score
//! history of every session that ran to completion.
//!
//! Time is always passed in as a monotonic millisecond reading (see
//! [`crate::clock`]), so the engine itself never touches a clock or timer.
//! The caller owns the repeating tick source and forwards each tick together
//! with the [`SessionToken`] it was created for.

use crate::clock::elapsed_secs;
use crate::settings::{self, ConfigError, RawSettings};
use crate::{check_answer, generate_question, DrillConfig, Question};
use log::{debug, info, warn};
use rand::Rng;

/// Identifies the tick source of one session. Ticks carrying any other
/// token are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No settings submitted yet.
    Idle,
    Running,
    /// The last session timed out.
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The token does not belong to the running session.
    Stale,
    Running { remaining_secs: u32 },
    Ended { final_score: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// Correct answer: input cleared, score incremented, new question drawn.
    Advanced { score: u32 },
    /// Not (yet) the answer.
    Pending,
    /// No session is running.
    Inactive,
}

/// Final scores of completed sessions, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreHistory(Vec<u32>);

impl ScoreHistory {
    pub fn push(&mut self, score: u32) {
        self.0.push(score);
    }

    pub fn scores(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `"Score History: <s1>\t<s2>\t..."`
    pub fn display_text(&self) -> String {
        let joined = self
            .0
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("\t");
        format!("Score History: {}", joined)
    }
}

/// State of the drill for the lifetime of the page.
pub struct DrillSession<R> {
    rng: R,
    config: Option<DrillConfig>,
    phase: Phase,
    token: SessionToken,
    started_at_ms: f64,
    question: Option<Question>,
    input: String,
    score: u32,
    remaining_secs: u32,
    history: ScoreHistory,
}

impl<R: Rng> DrillSession<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            config: None,
            phase: Phase::Idle,
            token: SessionToken(0),
            started_at_ms: 0.0,
            question: None,
            input: String::new(),
            score: 0,
            remaining_secs: 0,
            history: ScoreHistory::default(),
        }
    }

    /// Begin a new session. Any running session is abandoned without a
    /// history entry, and its token stops being live.
    pub fn start(&mut self, config: DrillConfig, now_ms: f64) -> SessionToken {
        if self.phase == Phase::Running {
            info!(
                "Abandoning running session {:?} with score {}",
                self.token, self.score
            );
        }

        self.token = SessionToken(self.token.0.wrapping_add(1));
        self.started_at_ms = now_ms;
        self.score = 0;
        self.input.clear();
        self.remaining_secs = config.time_limit_secs();
        self.question = Some(generate_question(&config, &mut self.rng));
        self.config = Some(config);
        self.phase = Phase::Running;

        info!(
            "Session {:?} started with a {}s time limit",
            self.token, self.remaining_secs
        );
        self.token
    }

    /// Resolve a settings submission and start a session with it. Used both
    /// for the settings form and the restart button. On a configuration
    /// error nothing changes, including a session that is still running.
    pub fn restart(
        &mut self,
        raw: &RawSettings,
        now_ms: f64,
    ) -> Result<SessionToken, ConfigError> {
        let config = settings::resolve(raw)?;
        Ok(self.start(config, now_ms))
    }

    /// Evaluate the answer field after every change to it.
    pub fn input_changed(&mut self, text: &str) -> InputOutcome {
        self.input.clear();
        self.input.push_str(text);

        if self.phase != Phase::Running {
            return InputOutcome::Inactive;
        }
        if !self.input_is_correct() {
            return InputOutcome::Pending;
        }

        self.input.clear();
        self.score += 1;
        if let Some(config) = &self.config {
            self.question = Some(generate_question(config, &mut self.rng));
        }
        debug!("Correct answer, score now {}", self.score);
        InputOutcome::Advanced { score: self.score }
    }

    /// Advance the countdown. The session ends once the remaining time
    /// reaches zero or below.
    pub fn tick(&mut self, token: SessionToken, now_ms: f64) -> TickOutcome {
        if !self.is_live(token) {
            warn!("Ignoring tick from stale session {:?}", token);
            return TickOutcome::Stale;
        }

        let limit = self.config.as_ref().map_or(0, |c| c.time_limit_secs());
        let elapsed = elapsed_secs(self.started_at_ms, now_ms);
        let remaining = i64::from(limit) - elapsed.min(i64::MAX as u64) as i64;
        self.remaining_secs = remaining.max(0) as u32;

        if remaining <= 0 {
            TickOutcome::Ended {
                final_score: self.end(),
            }
        } else {
            TickOutcome::Running {
                remaining_secs: self.remaining_secs,
            }
        }
    }

    fn end(&mut self) -> u32 {
        // A correct answer typed just before time ran out still counts.
        if self.input_is_correct() {
            self.input.clear();
            self.score += 1;
        }
        self.phase = Phase::Ended;
        self.history.push(self.score);
        info!(
            "Session {:?} ended with score {} ({} sessions played)",
            self.token,
            self.score,
            self.history.len()
        );
        self.score
    }

    fn input_is_correct(&self) -> bool {
        self.question
            .as_ref()
            .is_some_and(|q| check_answer(&self.input, q.answer))
    }

    /// True when `token` belongs to the running session.
    pub fn is_live(&self, token: SessionToken) -> bool {
        self.phase == Phase::Running && self.token == token
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the question and timer should be shown.
    pub fn is_visible(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn question(&self) -> Option<&Question> {
        self.question.as_ref()
    }

    pub fn answer_input(&self) -> &str {
        &self.input
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn history(&self) -> &ScoreHistory {
        &self.history
    }

    pub fn question_text(&self) -> String {
        self.question.map(|q| q.text()).unwrap_or_default()
    }

    pub fn timer_text(&self) -> String {
        format!("Time Left: {}", self.remaining_secs)
    }

    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn history_text(&self) -> String {
        self.history.display_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::tests::sample_settings;
    use crate::settings::{EnabledOperators, RangeFields};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const T0: f64 = 10_000.0;

    fn session() -> DrillSession<ChaCha8Rng> {
        DrillSession::new(ChaCha8Rng::seed_from_u64(42))
    }

    fn settings_with_limit(limit: &str) -> RawSettings {
        RawSettings {
            time_limit: limit.to_string(),
            ..sample_settings()
        }
    }

    fn answer(s: &DrillSession<ChaCha8Rng>) -> String {
        s.question().unwrap().answer.to_string()
    }

    #[test]
    fn test_idle_until_started() {
        let mut s = session();
        assert_eq!(s.phase(), Phase::Idle);
        assert!(!s.is_visible());
        assert_eq!(s.input_changed("4"), InputOutcome::Inactive);
        assert_eq!(s.score(), 0);
        assert_eq!(s.tick(SessionToken(0), T0), TickOutcome::Stale);
    }

    #[test]
    fn test_start_resets_round_state() {
        let mut s = session();
        s.restart(&settings_with_limit("5"), T0).unwrap();
        assert!(s.is_visible());
        assert_eq!(s.score_text(), "Score: 0");
        assert_eq!(s.timer_text(), "Time Left: 5");
        assert!(!s.question_text().is_empty());
    }

    #[test]
    fn test_correct_input_advances() {
        let mut s = session();
        s.restart(&settings_with_limit("60"), T0).unwrap();
        let first = *s.question().unwrap();

        assert_eq!(s.input_changed(&format!(" {}", first.answer)), InputOutcome::Pending);
        assert_eq!(s.input_changed(&format!("{}.0", first.answer)), InputOutcome::Pending);
        assert_eq!(s.score(), 0);

        assert_eq!(
            s.input_changed(&first.answer.to_string()),
            InputOutcome::Advanced { score: 1 }
        );
        assert_eq!(s.answer_input(), "");
        assert_eq!(s.score_text(), "Score: 1");
    }

    #[test]
    fn test_keystrokes_evaluate_each_prefix() {
        let mut s = session();
        s.restart(&settings_with_limit("60"), T0).unwrap();
        let target = answer(&s);

        let mut typed = String::new();
        let mut outcomes = Vec::new();
        for ch in target.chars() {
            typed.push(ch);
            outcomes.push(s.input_changed(&typed));
        }
        assert_eq!(outcomes.last(), Some(&InputOutcome::Advanced { score: 1 }));
        assert!(outcomes[..outcomes.len() - 1]
            .iter()
            .all(|o| *o == InputOutcome::Pending));
    }

    #[test]
    fn test_countdown_ends_at_limit() {
        let mut s = session();
        let token = s.restart(&settings_with_limit("5"), T0).unwrap();
        for _ in 0..2 {
            let a = answer(&s);
            s.input_changed(&a);
        }

        assert_eq!(
            s.tick(token, T0 + 1_000.0),
            TickOutcome::Running { remaining_secs: 4 }
        );
        assert_eq!(s.timer_text(), "Time Left: 4");
        assert_eq!(
            s.tick(token, T0 + 4_999.0),
            TickOutcome::Running { remaining_secs: 1 }
        );
        assert_eq!(
            s.tick(token, T0 + 5_000.0),
            TickOutcome::Ended { final_score: 2 }
        );
        assert_eq!(s.phase(), Phase::Ended);
        assert!(!s.is_visible());
        assert_eq!(s.remaining_secs(), 0);
        assert_eq!(s.history().scores(), [2]);

        // Further ticks from the finished session change nothing.
        assert_eq!(s.tick(token, T0 + 6_000.0), TickOutcome::Stale);
        assert_eq!(s.history().len(), 1);
    }

    #[test]
    fn test_late_tick_still_ends() {
        let mut s = session();
        let token = s.restart(&settings_with_limit("5"), T0).unwrap();
        // A suspended page can skip straight past zero.
        assert_eq!(
            s.tick(token, T0 + 9_300.0),
            TickOutcome::Ended { final_score: 0 }
        );
        assert_eq!(s.timer_text(), "Time Left: 0");
        assert_eq!(s.history().scores(), [0]);
    }

    #[test]
    fn test_end_credits_pending_correct_answer() {
        let mut s = session();
        let token = s.restart(&settings_with_limit("3"), T0).unwrap();
        let a = answer(&s);
        // The field already holds the answer when the final tick arrives.
        s.input = a;
        assert_eq!(s.tick(token, T0 + 3_000.0), TickOutcome::Ended { final_score: 1 });
        assert_eq!(s.history().scores(), [1]);
    }

    #[test]
    fn test_input_after_end_is_inactive() {
        let mut s = session();
        let token = s.restart(&settings_with_limit("1"), T0).unwrap();
        s.tick(token, T0 + 1_000.0);
        let a = answer(&s);
        assert_eq!(s.input_changed(&a), InputOutcome::Inactive);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn test_restart_cancels_previous_countdown() {
        let mut s = session();
        let first = s.restart(&settings_with_limit("5"), T0).unwrap();
        let a = answer(&s);
        s.input_changed(&a);
        assert_eq!(s.score(), 1);

        let second = s.restart(&settings_with_limit("5"), T0 + 2_000.0).unwrap();
        assert_ne!(first, second);
        assert!(!s.is_live(first));
        assert!(s.is_live(second));
        assert_eq!(s.score(), 0);

        // The abandoned countdown would have expired here.
        assert_eq!(s.tick(first, T0 + 5_000.0), TickOutcome::Stale);
        assert!(s.history().is_empty());
        assert_eq!(
            s.tick(second, T0 + 5_000.0),
            TickOutcome::Running { remaining_secs: 2 }
        );
        assert_eq!(
            s.tick(second, T0 + 7_000.0),
            TickOutcome::Ended { final_score: 0 }
        );
        assert_eq!(s.history().scores(), [0]);
    }

    #[test]
    fn test_history_accumulates() {
        let mut s = session();
        for (i, limit) in ["2", "3"].iter().enumerate() {
            let start = T0 + 10_000.0 * i as f64;
            let token = s.restart(&settings_with_limit(limit), start).unwrap();
            for _ in 0..i + 1 {
                let a = answer(&s);
                s.input_changed(&a);
            }
            s.tick(token, start + 60_000.0);
        }
        assert_eq!(s.history().scores(), [1, 2]);
        assert_eq!(s.history_text(), "Score History: 1\t2");
    }

    #[test]
    fn test_invalid_settings_leave_session_running() {
        let mut s = session();
        let token = s.restart(&settings_with_limit("30"), T0).unwrap();
        let bad = RawSettings {
            enabled: EnabledOperators::default(),
            ..sample_settings()
        };
        assert_eq!(
            s.restart(&bad, T0 + 1_000.0).unwrap_err(),
            ConfigError::NoOperatorSelected
        );
        assert!(s.is_live(token));
        assert_eq!(
            s.tick(token, T0 + 2_000.0),
            TickOutcome::Running { remaining_secs: 28 }
        );
    }

    #[test]
    fn test_invalid_settings_before_first_start() {
        let mut s = session();
        let bad = RawSettings {
            add: RangeFields {
                left_min: "9".into(),
                left_max: "1".into(),
                ..sample_settings().add
            },
            ..sample_settings()
        };
        assert!(matches!(
            s.restart(&bad, T0),
            Err(ConfigError::InvertedRange { .. })
        ));
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.question().is_none());
        assert_eq!(s.question_text(), "");
    }

    #[test]
    fn test_empty_history_text() {
        assert_eq!(ScoreHistory::default().display_text(), "Score History: ");
    }
}
