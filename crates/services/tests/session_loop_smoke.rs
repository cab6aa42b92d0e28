use std::sync::Arc;

use shapes_core::AttributeCatalog;
use shapes_core::model::{AnswerOutcome, Encouragement, GameSettings};
use shapes_core::time::{fixed_clock, fixed_now};
use services::{GameEvent, GameLoopService, RecordingNotifier, SessionError, TickOutcome};

fn loop_service(settings: GameSettings) -> (GameLoopService, Arc<RecordingNotifier>) {
    let notifier = Arc::new(RecordingNotifier::new());
    let service = GameLoopService::new(
        fixed_clock(),
        settings,
        Arc::new(AttributeCatalog::reference()),
    )
    .with_seed(Some(7))
    .with_notifier(notifier.clone());
    (service, notifier)
}

#[tokio::test]
async fn perfect_session_scores_every_bonus() {
    let (loop_svc, notifier) = loop_service(GameSettings::default());
    let mut session = loop_svc.start_session().unwrap();

    while !session.is_finished() {
        let answer = session
            .current_question()
            .unwrap()
            .correct_answer()
            .to_string();
        let result = loop_svc.answer_current(&mut session, &answer).unwrap();
        assert!(!result.resolution.is_ignored());
    }

    // Every answer lands with the full 15 seconds left: 40 + 5 * (k - 1).
    let summary = session.summary().unwrap();
    assert_eq!(summary.score(), 1750);
    assert_eq!(summary.correct(), 20);
    assert_eq!(summary.incorrect(), 0);
    assert_eq!(summary.accuracy(), 100);
    assert_eq!(summary.best_streak(), 20);
    assert_eq!(summary.encouragement(), Encouragement::Superstar);
    assert_eq!(summary.started_at(), fixed_now());

    let events = notifier.events();
    assert_eq!(events.first(), Some(&GameEvent::SessionStart));
    assert_eq!(events.last(), Some(&GameEvent::SessionEnd));
    assert_eq!(notifier.count(GameEvent::Correct), 20);
}

#[tokio::test]
async fn mixed_session_counts_each_outcome() {
    let (loop_svc, _) = loop_service(GameSettings::new(6, 15).unwrap());
    let mut session = loop_svc.start_session().unwrap();

    let mut step = 0;
    while !session.is_finished() {
        let question = session.current_question().unwrap();
        match step % 3 {
            0 => {
                let answer = question.correct_answer().to_string();
                loop_svc.answer_current(&mut session, &answer).unwrap();
            }
            1 => {
                let wrong = question
                    .options()
                    .iter()
                    .find(|o| !question.is_correct(o))
                    .cloned()
                    .unwrap();
                loop_svc.answer_current(&mut session, &wrong).unwrap();
            }
            _ => {
                loop_svc.expire_current(&mut session).unwrap();
            }
        }
        step += 1;
    }

    let summary = session.summary().unwrap();
    assert_eq!(summary.correct(), 2);
    assert_eq!(summary.incorrect(), 4);
    assert_eq!(summary.timed_out(), 2);
    assert_eq!(summary.accuracy(), 33);
    assert_eq!(summary.best_streak(), 1);
    assert_eq!(summary.score(), 80);

    let outcomes: Vec<_> = session.results().iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            AnswerOutcome::Correct,
            AnswerOutcome::Incorrect,
            AnswerOutcome::TimedOut,
            AnswerOutcome::Correct,
            AnswerOutcome::Incorrect,
            AnswerOutcome::TimedOut,
        ]
    );
}

#[tokio::test]
async fn answering_twice_changes_nothing() {
    let (loop_svc, _) = loop_service(GameSettings::new(3, 15).unwrap());
    let mut session = loop_svc.start_session().unwrap();
    let answer = session
        .current_question()
        .unwrap()
        .correct_answer()
        .to_string();

    let first = session.submit_answer(&answer);
    let second = session.submit_answer(&answer);
    assert!(first.feedback().is_some());
    assert!(second.is_ignored());
    assert_eq!(session.score(), 40);
    assert_eq!(session.results().len(), 1);
}

#[tokio::test]
async fn finished_session_rejects_advance() {
    let (loop_svc, _) = loop_service(GameSettings::new(1, 15).unwrap());
    let mut session = loop_svc.start_session().unwrap();
    let result = loop_svc.expire_current(&mut session).unwrap();
    assert!(result.is_complete);

    assert!(matches!(session.advance(), Err(SessionError::Finished)));
    assert!(session.submit_answer("anything").is_ignored());
    assert!(session.current_question().is_none());
}

#[tokio::test]
async fn timeout_through_ticks_advances() {
    let (loop_svc, notifier) = loop_service(GameSettings::new(2, 3).unwrap());
    let mut session = loop_svc.start_session().unwrap();
    let token = session.token();

    assert_eq!(
        loop_svc.handle_tick(&mut session, token).unwrap(),
        TickOutcome::Warning { remaining: 2 }
    );
    assert_eq!(
        loop_svc.handle_tick(&mut session, token).unwrap(),
        TickOutcome::Running { remaining: 1 }
    );
    let outcome = loop_svc.handle_tick(&mut session, token).unwrap();
    assert!(matches!(outcome, TickOutcome::TimedOut(_)));

    assert_eq!(session.question_index(), 2);
    assert_ne!(session.token(), token);
    assert_eq!(
        loop_svc.handle_tick(&mut session, token).unwrap(),
        TickOutcome::Ignored
    );
    assert_eq!(session.remaining_secs(), 3);
    assert_eq!(notifier.count(GameEvent::Timeout), 1);
}

#[tokio::test]
async fn summary_serializes_to_json() {
    let (loop_svc, _) = loop_service(GameSettings::new(2, 15).unwrap());
    let mut session = loop_svc.start_session().unwrap();
    while !session.is_finished() {
        let answer = session
            .current_question()
            .unwrap()
            .correct_answer()
            .to_string();
        loop_svc.answer_current(&mut session, &answer).unwrap();
    }

    let json = serde_json::to_value(session.summary().unwrap()).unwrap();
    assert_eq!(json["total_questions"], 2);
    assert_eq!(json["correct"], 2);
    assert_eq!(json["score"], 85);
    assert_eq!(json["accuracy"], 100);
}

#[test]
fn event_tags_are_snake_case() {
    let json = serde_json::to_value(GameEvent::TimerWarning { remaining: 5 }).unwrap();
    assert_eq!(json["event"], "timer_warning");
    assert_eq!(json["remaining"], 5);
}
