//! Concurrency-safe registry of in-progress assessments.
//!
//! Sessions live in a sharded lock table. A submit holds the exclusive entry
//! guard for its whole read-modify-write, so overlapping requests for one
//! session are serialized while distinct sessions proceed independently.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

use crate::bank::ItemBank;
use crate::engine::{AdaptiveEngine, EngineConfig};
use crate::error::AssessmentError;
use crate::model::{Difficulty, Question, QuestionId};
use crate::traits::{FitPrediction, FitPredictor};

/// Opaque session token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    fn generate() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = AssessmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(SessionId)
            .map_err(|_| AssessmentError::UnknownSession(s.to_string()))
    }
}

/// Configuration for the session store.
#[derive(Debug, Clone)]
pub struct SessionStoreConfig {
    /// Engine settings applied to every new session.
    pub engine: EngineConfig,
    /// Sessions idle for longer than this are expired. `None` keeps them forever.
    pub idle_ttl: Option<Duration>,
    /// Trust score used when a session is created without one.
    pub default_trust_score: f64,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            idle_ttl: Some(Duration::from_secs(30 * 60)),
            default_trust_score: 85.0,
        }
    }
}

/// A freshly created session and its first question.
#[derive(Debug, Clone)]
pub struct StartedSession {
    pub session_id: SessionId,
    pub question: Arc<Question>,
}

/// Result of a completed assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentResult {
    pub role: String,
    pub questions_asked: u32,
    pub raw_score: f64,
    pub prediction: FitPrediction,
}

/// What a submit produced.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The assessment continues with `question`.
    Next {
        question: Arc<Question>,
        raw_score: f64,
        questions_asked: u32,
    },
    /// The assessment finished and the session was discarded.
    Complete(AssessmentResult),
}

/// Read-only view of one session's progress.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub role: String,
    pub questions_asked: u32,
    pub administered: usize,
    pub raw_score: f64,
    pub current_difficulty: Difficulty,
}

struct SessionSlot {
    engine: AdaptiveEngine,
    raw_score: f64,
    trust_score: f64,
    last_active: Instant,
    finished: bool,
}

impl SessionSlot {
    fn is_expired(&self, now: Instant, ttl: Option<Duration>) -> bool {
        ttl.is_some_and(|ttl| now.saturating_duration_since(self.last_active) > ttl)
    }
}

/// Registry mapping session ids to their engines and running scores.
pub struct SessionStore {
    bank: Arc<ItemBank>,
    predictor: Arc<dyn FitPredictor>,
    config: SessionStoreConfig,
    sessions: DashMap<SessionId, SessionSlot>,
}

impl SessionStore {
    pub fn new(
        bank: Arc<ItemBank>,
        predictor: Arc<dyn FitPredictor>,
        config: SessionStoreConfig,
    ) -> Self {
        Self {
            bank,
            predictor,
            config,
            sessions: DashMap::new(),
        }
    }

    /// Start an assessment for `role` and register it under a new id.
    pub fn create(
        &self,
        role: &str,
        trust_score: Option<f64>,
    ) -> Result<StartedSession, AssessmentError> {
        let trust_score = trust_score.unwrap_or(self.config.default_trust_score);
        if !(0.0..=100.0).contains(&trust_score) {
            return Err(AssessmentError::InvalidRequest(format!(
                "trust_score must be within [0, 100], got {trust_score}"
            )));
        }

        let mut engine = AdaptiveEngine::new(Arc::clone(&self.bank), self.config.engine);
        let question = engine
            .start(role)?
            .ok_or_else(|| AssessmentError::NoQuestionsForRole(role.to_string()))?;

        let session_id = SessionId::generate();
        self.sessions.insert(
            session_id,
            SessionSlot {
                engine,
                raw_score: 0.0,
                trust_score,
                last_active: Instant::now(),
                finished: false,
            },
        );

        tracing::info!("started session {session_id} for role '{role}'");
        Ok(StartedSession {
            session_id,
            question,
        })
    }

    /// Record an answer for the session's outstanding question.
    ///
    /// On completion the fit predictor is invoked and the session removed.
    pub fn submit(
        &self,
        session_id: &SessionId,
        question_id: QuestionId,
        was_correct: bool,
    ) -> Result<SubmitOutcome, AssessmentError> {
        let now = Instant::now();
        let unknown = || AssessmentError::UnknownSession(session_id.to_string());

        let (role, questions_asked, raw_score, skill_score, trust_score) = {
            let mut guard = self.sessions.get_mut(session_id).ok_or_else(unknown)?;
            let slot = &mut *guard;

            if slot.finished {
                return Err(unknown());
            }
            if slot.is_expired(now, self.config.idle_ttl) {
                slot.finished = true;
                drop(guard);
                self.sessions.remove_if(session_id, |_, slot| slot.finished);
                tracing::info!("session {session_id} expired before submit");
                return Err(unknown());
            }

            let (next, raw_score) = slot
                .engine
                .submit(question_id, was_correct, slot.raw_score)
                .inspect_err(|e| {
                    if !e.is_client_error() {
                        tracing::error!("submit failed for session {session_id}: {e}");
                    }
                })?;
            slot.raw_score = raw_score;
            slot.last_active = now;

            tracing::debug!(
                "session {session_id}: q{question_id} correct={was_correct} raw={raw_score} difficulty={}",
                slot.engine.current_difficulty()
            );

            if let Some(question) = next {
                return Ok(SubmitOutcome::Next {
                    question,
                    raw_score,
                    questions_asked: slot.engine.questions_asked(),
                });
            }

            slot.finished = true;
            (
                slot.engine.role().to_string(),
                slot.engine.questions_asked(),
                raw_score,
                slot.engine.final_skill_score(raw_score),
                slot.trust_score,
            )
        };

        // The slot is removed before the predictor runs.
        self.sessions.remove_if(session_id, |_, slot| slot.finished);
        let result = AssessmentResult {
            role,
            questions_asked,
            raw_score,
            prediction: self.predictor.predict(skill_score, trust_score),
        };
        tracing::info!(
            "session {session_id} complete: raw={} skill={} fit={} ({})",
            result.raw_score,
            result.prediction.skill_score,
            result.prediction.job_fit_score,
            result.prediction.category_label()
        );
        Ok(SubmitOutcome::Complete(result))
    }

    /// Discard a session explicitly. Returns `false` if it did not exist.
    pub fn evict(&self, session_id: &SessionId) -> bool {
        let removed = self.sessions.remove(session_id).is_some();
        if removed {
            tracing::info!("session {session_id} abandoned");
        }
        removed
    }

    /// Drop every session idle for longer than the configured TTL.
    pub fn evict_expired(&self) -> usize {
        let now = Instant::now();
        let ttl = self.config.idle_ttl;
        let mut evicted = 0;
        self.sessions.retain(|_, slot| {
            let keep = !slot.finished && !slot.is_expired(now, ttl);
            if !keep {
                evicted += 1;
            }
            keep
        });
        if evicted > 0 {
            tracing::info!("evicted {evicted} expired session(s)");
        }
        evicted
    }

    /// Progress of a live session.
    pub fn snapshot(&self, session_id: &SessionId) -> Option<SessionSnapshot> {
        self.sessions
            .get(session_id)
            .filter(|slot| !slot.finished)
            .map(|slot| SessionSnapshot {
                role: slot.engine.role().to_string(),
                questions_asked: slot.engine.questions_asked(),
                administered: slot.engine.administered().len(),
                raw_score: slot.raw_score,
                current_difficulty: slot.engine.current_difficulty(),
            })
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn bank(&self) -> &Arc<ItemBank> {
        &self.bank
    }

    pub fn config(&self) -> &SessionStoreConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::test_support::bank;
    use crate::traits::{FitCategory, ScoringSource};
    use std::sync::Barrier;

    struct FixedWeights;

    impl FitPredictor for FixedWeights {
        fn source(&self) -> ScoringSource {
            ScoringSource::Simulation
        }

        fn job_fit_score(&self, skill: f64, trust: f64) -> f64 {
            (skill / 100.0 * 0.65 + trust / 100.0 * 0.35) * 100.0
        }
    }

    fn store_with(per_tier: u64, config: SessionStoreConfig) -> SessionStore {
        SessionStore::new(
            Arc::new(bank(&["Backend", "Frontend"], per_tier)),
            Arc::new(FixedWeights),
            config,
        )
    }

    fn store(per_tier: u64) -> SessionStore {
        store_with(per_tier, SessionStoreConfig::default())
    }

    #[test]
    fn create_registers_a_session() {
        let store = store(3);
        let started = store.create("Backend", None).unwrap();
        assert_eq!(started.question.role, "Backend");
        assert_eq!(store.len(), 1);
        let snapshot = store.snapshot(&started.session_id).unwrap();
        assert_eq!(snapshot.questions_asked, 0);
        assert_eq!(snapshot.raw_score, 0.0);
    }

    #[test]
    fn create_for_unknown_role_fails() {
        let store = store(3);
        let err = store.create("Astronaut", None).unwrap_err();
        assert!(matches!(err, AssessmentError::NoQuestionsForRole(role) if role == "Astronaut"));
        assert!(store.is_empty());
    }

    #[test]
    fn create_rejects_out_of_range_trust() {
        let store = store(3);
        assert!(matches!(
            store.create("Backend", Some(140.0)),
            Err(AssessmentError::InvalidRequest(_))
        ));
        assert!(matches!(
            store.create("Backend", Some(f64::NAN)),
            Err(AssessmentError::InvalidRequest(_))
        ));
    }

    #[test]
    fn full_run_completes_and_discards_the_session() {
        let store = store(5);
        let started = store.create("Frontend", Some(85.0)).unwrap();
        let id = started.session_id;
        let mut question = started.question;
        let mut submits = 0;

        let result = loop {
            submits += 1;
            match store.submit(&id, question.id, true).unwrap() {
                SubmitOutcome::Next {
                    question: next,
                    questions_asked,
                    ..
                } => {
                    assert_eq!(questions_asked, submits);
                    assert_eq!(store.snapshot(&id).unwrap().administered, submits as usize);
                    question = next;
                }
                SubmitOutcome::Complete(result) => break result,
            }
        };

        assert_eq!(submits, 10);
        assert_eq!(result.questions_asked, 10);
        assert_eq!(result.role, "Frontend");
        assert!(result.prediction.skill_score > 90.0);
        assert_eq!(result.prediction.category, FitCategory::Excellent);
        assert!(store.snapshot(&id).is_none());
        assert!(matches!(
            store.submit(&id, question.id, true),
            Err(AssessmentError::UnknownSession(_))
        ));
    }

    #[test]
    fn raw_score_is_monotone_across_submits() {
        let store = store(5);
        let started = store.create("Backend", None).unwrap();
        let mut question = started.question;
        let mut previous = 0.0;
        for i in 0..9 {
            let expected_gain = if i % 2 == 0 { 2.0 * f64::from(question.difficulty.level()) } else { 0.0 };
            match store.submit(&started.session_id, question.id, i % 2 == 0).unwrap() {
                SubmitOutcome::Next {
                    question: next,
                    raw_score,
                    ..
                } => {
                    assert_eq!(raw_score - previous, expected_gain);
                    previous = raw_score;
                    question = next;
                }
                SubmitOutcome::Complete(_) => panic!("completed early"),
            }
        }
    }

    #[test]
    fn unknown_session_is_rejected() {
        let store = store(1);
        let id: SessionId = "3f2b8c1e-0000-4000-8000-000000000000".parse().unwrap();
        assert!(matches!(
            store.submit(&id, QuestionId(0), true),
            Err(AssessmentError::UnknownSession(_))
        ));
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }

    #[test]
    fn wrong_question_leaves_session_untouched() {
        let store = store(3);
        let started = store.create("Backend", None).unwrap();
        let wrong = QuestionId(started.question.id.0 + 1000);
        assert!(matches!(
            store.submit(&started.session_id, wrong, true),
            Err(AssessmentError::QuestionMismatch { .. })
        ));
        let snapshot = store.snapshot(&started.session_id).unwrap();
        assert_eq!(snapshot.questions_asked, 0);
        assert_eq!(snapshot.raw_score, 0.0);
    }

    #[test]
    fn concurrent_duplicate_submits_apply_once() {
        let store = store(5);
        let started = store.create("Backend", None).unwrap();
        let threads = 8;
        let barrier = Barrier::new(threads);

        let outcomes: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..threads)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        store.submit(&started.session_id, started.question.id, true)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let accepted = outcomes.iter().filter(|o| o.is_ok()).count();
        assert_eq!(accepted, 1);
        assert!(outcomes
            .iter()
            .filter_map(|o| o.as_ref().err())
            .all(|e| matches!(e, AssessmentError::QuestionMismatch { .. })));
        let snapshot = store.snapshot(&started.session_id).unwrap();
        assert_eq!(snapshot.questions_asked, 1);
        assert_eq!(snapshot.administered, 1);
    }

    #[test]
    fn concurrent_duplicate_final_submit_completes_once() {
        let config = SessionStoreConfig {
            engine: EngineConfig { max_questions: 1 },
            ..Default::default()
        };
        let store = store_with(2, config);
        let started = store.create("Backend", None).unwrap();
        let barrier = Barrier::new(2);

        let outcomes: Vec<_> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..2)
                .map(|_| {
                    scope.spawn(|| {
                        barrier.wait();
                        store.submit(&started.session_id, started.question.id, true)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let completed = outcomes
            .iter()
            .filter(|o| matches!(o, Ok(SubmitOutcome::Complete(_))))
            .count();
        assert_eq!(completed, 1);
        assert!(outcomes
            .iter()
            .any(|o| matches!(o, Err(AssessmentError::UnknownSession(_)))));
        assert!(store.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn distinct_sessions_are_independent() {
        let store = Arc::new(store(6));
        let tasks = (0..16).map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                let role = if i % 2 == 0 { "Backend" } else { "Frontend" };
                let started = store.create(role, None).unwrap();
                let mut question = started.question;
                let mut answered = 0;
                loop {
                    answered += 1;
                    match store.submit(&started.session_id, question.id, i % 3 == 0).unwrap() {
                        SubmitOutcome::Next { question: next, .. } => question = next,
                        SubmitOutcome::Complete(result) => {
                            assert_eq!(result.role, role);
                            return answered;
                        }
                    }
                }
            })
        });

        let answered = futures::future::join_all(tasks).await;
        assert!(answered.into_iter().all(|n| n.unwrap() == 10));
        assert!(store.is_empty());
    }

    #[test]
    fn evict_removes_a_session() {
        let store = store(2);
        let started = store.create("Backend", None).unwrap();
        assert!(store.evict(&started.session_id));
        assert!(!store.evict(&started.session_id));
        assert!(matches!(
            store.submit(&started.session_id, started.question.id, true),
            Err(AssessmentError::UnknownSession(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn idle_sessions_expire() {
        let config = SessionStoreConfig {
            idle_ttl: Some(Duration::from_secs(60)),
            ..Default::default()
        };
        let store = store_with(3, config);
        let stale = store.create("Backend", None).unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;
        let fresh = store.create("Frontend", None).unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;
        assert_eq!(store.evict_expired(), 1);
        assert!(store.snapshot(&stale.session_id).is_none());
        assert!(store.snapshot(&fresh.session_id).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn expired_session_is_unknown_on_submit() {
        let config = SessionStoreConfig {
            idle_ttl: Some(Duration::from_secs(10)),
            ..Default::default()
        };
        let store = store_with(3, config);
        let started = store.create("Backend", None).unwrap();
        tokio::time::advance(Duration::from_secs(11)).await;
        assert!(matches!(
            store.submit(&started.session_id, started.question.id, true),
            Err(AssessmentError::UnknownSession(_))
        ));
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn activity_refreshes_the_idle_clock() {
        let config = SessionStoreConfig {
            idle_ttl: Some(Duration::from_secs(10)),
            ..Default::default()
        };
        let store = store_with(3, config);
        let started = store.create("Backend", None).unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        store
            .submit(&started.session_id, started.question.id, false)
            .unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(store.evict_expired(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn no_ttl_never_expires() {
        let config = SessionStoreConfig {
            idle_ttl: None,
            ..Default::default()
        };
        let store = store_with(1, config);
        store.create("Backend", None).unwrap();
        assert_eq!(store.evict_expired(), 0);
    }
}
