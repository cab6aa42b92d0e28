//! Terminal game loops: interactive play and an unattended demo.

use std::error::Error;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use services::{AnswerFeedback, GameLoopService, GameSession, TickOutcome, spawn_ticker};
use shapes_core::AttributeCatalog;
use shapes_core::model::SessionSummary;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::render;

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Chance that the simulated player lets the timer run out.
const DEMO_TIMEOUT_RATE: f64 = 0.1;
/// Chance that the simulated player picks a wrong option.
const DEMO_MISTAKE_RATE: f64 = 0.15;

/// Play one session against stdin. Returns `None` if the player quits early.
///
/// # Errors
///
/// Returns session or stdin errors.
pub async fn interactive(
    loop_svc: &GameLoopService,
    catalog: &AttributeCatalog,
) -> Result<Option<SessionSummary>, Box<dyn Error>> {
    let mut session = loop_svc.start_session()?;
    let total = session.settings().total_questions();
    let timer_secs = session.settings().timer_secs();
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Answer with the option number or its name. Type q to quit.");

    while let Some(question) = session.current_question() {
        print!(
            "{}",
            render::question(catalog, question, session.question_index(), total, timer_secs)
        );
        let options = question.options().to_vec();
        let ticker = spawn_ticker(session.token(), TICK_PERIOD, tick_tx.clone());

        loop {
            tokio::select! {
                Some(token) = tick_rx.recv() => match session.tick(token) {
                    TickOutcome::Warning { remaining } => println!("  {remaining} seconds left!"),
                    TickOutcome::TimedOut(feedback) => {
                        println!("{}", render::feedback(&feedback));
                        break;
                    }
                    TickOutcome::Running { .. } | TickOutcome::Ignored => {}
                },
                line = lines.next_line() => {
                    let Some(text) = line? else {
                        debug!("stdin closed");
                        return Ok(None);
                    };
                    if text.trim().eq_ignore_ascii_case("q") {
                        info!(session = %session.id(), "player quit");
                        return Ok(None);
                    }
                    match render::parse_choice(&text, &options) {
                        Some(answer) => {
                            if let Some(feedback) = session.submit_answer(&answer).feedback() {
                                println!("{}", render::feedback(feedback));
                                break;
                            }
                        }
                        None => println!("  Pick 1-{}.", options.len()),
                    }
                }
            }
        }

        ticker.cancel();
        debug!(token = %ticker.token(), "ticker cancelled");
        session.advance()?;
    }

    Ok(session.summary().cloned())
}

/// Let a simulated player run a whole session, printing as it goes.
///
/// # Errors
///
/// Returns session errors.
pub fn demo(
    loop_svc: &GameLoopService,
    catalog: &AttributeCatalog,
    rng: &mut StdRng,
) -> Result<Option<SessionSummary>, Box<dyn Error>> {
    let mut session = loop_svc.start_session()?;
    while !session.is_finished() {
        let result = demo_turn(loop_svc, catalog, &mut session, rng)?;
        if let Some(feedback) = result {
            println!("{}", render::feedback(&feedback));
        }
    }
    Ok(session.summary().cloned())
}

fn demo_turn(
    loop_svc: &GameLoopService,
    catalog: &AttributeCatalog,
    session: &mut GameSession,
    rng: &mut StdRng,
) -> Result<Option<AnswerFeedback>, Box<dyn Error>> {
    let Some(question) = session.current_question() else {
        return Ok(None);
    };
    let settings = session.settings();
    print!(
        "{}",
        render::question(
            catalog,
            question,
            session.question_index(),
            settings.total_questions(),
            settings.timer_secs()
        )
    );

    let roll: f64 = rng.random();
    let pick = if roll < DEMO_TIMEOUT_RATE {
        None
    } else if roll < DEMO_TIMEOUT_RATE + DEMO_MISTAKE_RATE {
        question
            .options()
            .iter()
            .find(|option| !question.is_correct(option))
            .cloned()
    } else {
        Some(question.correct_answer().to_string())
    };

    let result = match pick {
        Some(answer) => {
            println!("  picks: {answer}");
            loop_svc.answer_current(session, &answer)?
        }
        None => {
            println!("  ...");
            loop_svc.expire_current(session)?
        }
    };
    Ok(result.resolution.feedback().cloned())
}
