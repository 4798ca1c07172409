//! Main module for the Mental Math drill using Yew.
//! Wires the settings form, the game display and the countdown interval to
//! the session engine.

use gloo_timers::callback::{Interval, Timeout};
use mental_math::{
    clock,
    session::{DrillSession, InputOutcome, Phase, SessionToken, TickOutcome},
    settings::{RangeFields, RawSettings},
    Operator,
};
use rand::rngs::ThreadRng;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys::HtmlInputElement;
use yew::prelude::*;

mod components;
mod config;
mod hooks;

use components::{GameDisplay, OperatorToggle, RangeInputs, ScoreHistoryLine};
use config::*;
use hooks::{use_text_field, TextField};

// ──────────────────────────────────────────────────────────────────────────────
// Type aliases for better readability
type SharedSession = Rc<RefCell<DrillSession<ThreadRng>>>;
/// The countdown interval together with the session it ticks for.
type CountdownSlot = Rc<RefCell<Option<(SessionToken, Interval)>>>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

/// Replace the countdown with a fresh interval ticking for `token`.
///
/// Dropping the previous `Interval` clears it, so at most one tick source is
/// ever alive.
fn start_countdown(
    session: SharedSession,
    slot: CountdownSlot,
    token: SessionToken,
    rerender: Callback<()>,
) {
    let slot_for_tick = slot.clone();
    let interval = Interval::new(TICK_INTERVAL_MS, move || {
        let outcome = session.borrow_mut().tick(token, clock::now_ms());
        match outcome {
            TickOutcome::Running { .. } => rerender.emit(()),
            TickOutcome::Ended { final_score } => {
                log::info!("Time is up, final score {}", final_score);
                // An interval cannot be dropped from inside its own callback.
                let slot = slot_for_tick.clone();
                Timeout::new(0, move || clear_countdown(&slot, token)).forget();
                rerender.emit(());
            }
            TickOutcome::Stale => {}
        }
    });

    // Dropped outside the borrow so the old interval's cleanup never
    // overlaps with the slot being held.
    let previous = slot.borrow_mut().replace((token, interval));
    drop(previous);
}

/// Drop the countdown if it still belongs to `token`.
fn clear_countdown(slot: &CountdownSlot, token: SessionToken) {
    let mut slot = slot.borrow_mut();
    if matches!(&*slot, Some((current, _)) if *current == token) {
        slot.take();
    }
}

fn range_fields(
    left_min: &TextField,
    left_max: &TextField,
    right_min: &TextField,
    right_max: &TextField,
) -> RangeFields {
    RangeFields {
        left_min: left_min.value.clone(),
        left_max: left_max.value.clone(),
        right_min: right_min.value.clone(),
        right_max: right_max.value.clone(),
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring state, effects, and UI elements.
#[function_component(Main)]
fn main_component() -> Html {
    let session: SharedSession = use_mut_ref(|| DrillSession::new(rand::rng()));
    let countdown: CountdownSlot = use_mut_ref(|| None::<(SessionToken, Interval)>);
    let trigger = use_force_update();
    let answer_ref = use_node_ref();

    let enabled = use_state(|| DEFAULT_ENABLED);
    let error_message = use_state(|| None::<String>);

    // Text states for the settings fields
    let add_left_min = use_text_field(DEFAULT_ADD_LEFT.0.to_string());
    let add_left_max = use_text_field(DEFAULT_ADD_LEFT.1.to_string());
    let add_right_min = use_text_field(DEFAULT_ADD_RIGHT.0.to_string());
    let add_right_max = use_text_field(DEFAULT_ADD_RIGHT.1.to_string());
    let mul_left_min = use_text_field(DEFAULT_MUL_LEFT.0.to_string());
    let mul_left_max = use_text_field(DEFAULT_MUL_LEFT.1.to_string());
    let mul_right_min = use_text_field(DEFAULT_MUL_RIGHT.0.to_string());
    let mul_right_max = use_text_field(DEFAULT_MUL_RIGHT.1.to_string());
    let time_limit = use_text_field(DEFAULT_TIME_LIMIT_SECS.to_string());

    let rerender = {
        let trigger = trigger.clone();
        Callback::from(move |_: ()| trigger.force_update())
    };

    let settings = RawSettings {
        enabled: *enabled,
        add: range_fields(&add_left_min, &add_left_max, &add_right_min, &add_right_max),
        mul: range_fields(&mul_left_min, &mul_left_max, &mul_right_min, &mul_right_max),
        time_limit: time_limit.value.clone(),
    };

    let on_toggle = {
        let enabled = enabled.clone();
        Callback::from(move |(op, checked): (Operator, bool)| {
            let mut next = *enabled;
            next.set(op, checked);
            enabled.set(next);
        })
    };

    // Settings submission and the restart button both re-read the form.
    let start_session = {
        let session = session.clone();
        let countdown = countdown.clone();
        let error_message = error_message.clone();
        let rerender = rerender.clone();
        let answer_ref = answer_ref.clone();
        Callback::from(move |_: ()| {
            let result = session.borrow_mut().restart(&settings, clock::now_ms());
            match result {
                Ok(token) => {
                    error_message.set(None);
                    start_countdown(session.clone(), countdown.clone(), token, rerender.clone());
                    // Focus once the game block has been un-hidden.
                    let answer_ref = answer_ref.clone();
                    Timeout::new(0, move || {
                        if let Some(input) = answer_ref.cast::<HtmlInputElement>() {
                            let _ = input.focus();
                        }
                    })
                    .forget();
                }
                Err(err) => error_message.set(Some(err.to_string())),
            }
            rerender.emit(());
        })
    };

    let onsubmit = {
        let start_session = start_session.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            start_session.emit(());
        })
    };
    let onrestart = start_session.reform(|_: MouseEvent| ());

    // Every change to the answer field is checked, not only on submit.
    let on_answer_input = {
        let session = session.clone();
        let rerender = rerender.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let outcome = session.borrow_mut().input_changed(&input.value());
            if let InputOutcome::Advanced { .. } = outcome {
                input.set_value("");
            }
            rerender.emit(());
        })
    };

    // Snapshot for rendering
    let (started, visible, question, timer, score, answer, history_text, history_empty) = {
        let s = session.borrow();
        (
            s.phase() != Phase::Idle,
            s.is_visible(),
            s.question_text(),
            s.timer_text(),
            s.score_text(),
            s.answer_input().to_string(),
            s.history_text(),
            s.history().is_empty(),
        )
    };

    html! {
        <div class="container">
            <h1>{ "Mental Math" }</h1>

            <form id="settings" class="settings" {onsubmit}>
                <div class="operator-toggles">
                    { for Operator::ALL.iter().map(|&op| html! {
                        <OperatorToggle
                            operator={op}
                            checked={enabled.is_enabled(op)}
                            ontoggle={on_toggle.clone()}
                        />
                    }) }
                </div>

                <RangeInputs
                    operator={Operator::Add}
                    left_min={add_left_min.clone()}
                    left_max={add_left_max.clone()}
                    right_min={add_right_min.clone()}
                    right_max={add_right_max.clone()}
                    note={AttrValue::from("Subtraction uses these ranges in reverse.")}
                />
                <RangeInputs
                    operator={Operator::Mul}
                    left_min={mul_left_min.clone()}
                    left_max={mul_left_max.clone()}
                    right_min={mul_right_min.clone()}
                    right_max={mul_right_max.clone()}
                    note={AttrValue::from("Division uses these ranges in reverse.")}
                />

                <div class="form-group">
                    <label for="timeLimit">{ "Time Limit (seconds):" }</label>
                    <input type="text"
                        id="timeLimit"
                        name="timeLimit"
                        value={time_limit.value.clone()}
                        oninput={time_limit.oninput.clone()}
                    />
                </div>

                if let Some(err) = &*error_message {
                    <div class="input-error">{ err }</div>
                }

                <button type="submit" class="btn-primary">{ "Start" }</button>
            </form>

            if started {
                <GameDisplay
                    {visible}
                    {question}
                    {timer}
                    {score}
                    {answer}
                    oninput={on_answer_input}
                    answer_ref={answer_ref.clone()}
                    {onrestart}
                />
            }

            <ScoreHistoryLine text={history_text} is_empty={history_empty} />
        </div>
    }
}

/// Entry point: installs the panic hook and renders the app.
fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<Main>::new().render();
}
