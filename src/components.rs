//! Pure Yew view components for the drill UI.
//!
//! Stateless: everything is rendered from props, and all state lives in the
//! `Main` component and the engine it owns.

use crate::hooks::TextField;
use mental_math::Operator;
use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Checkbox enabling one operator.
#[derive(Properties, PartialEq)]
pub struct OperatorToggleProps {
    pub operator: Operator,
    pub checked: bool,
    pub ontoggle: Callback<(Operator, bool)>,
}

#[function_component(OperatorToggle)]
pub fn operator_toggle(props: &OperatorToggleProps) -> Html {
    let operator = props.operator;
    let onchange = {
        let ontoggle = props.ontoggle.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            ontoggle.emit((operator, input.checked()));
        })
    };

    html! {
        <label class="operator-toggle">
            <input type="checkbox"
                name={operator.id()}
                checked={props.checked}
                {onchange}
            />
            { format!("{} ({})", operator.label(), operator.symbol()) }
        </label>
    }
}

fn range_input(name: String, field: &TextField) -> Html {
    html! {
        <input type="number"
            class="range-input"
            {name}
            value={field.value.clone()}
            oninput={field.oninput.clone()}
        />
    }
}

/// The four range fields of a configurable operator family, laid out as
/// `(min to max) op (min to max)`.
#[derive(Properties, PartialEq)]
pub struct RangeInputsProps {
    pub operator: Operator,
    pub left_min: TextField,
    pub left_max: TextField,
    pub right_min: TextField,
    pub right_max: TextField,
    /// Explains which other operator shares these ranges.
    #[prop_or_default]
    pub note: Option<AttrValue>,
}

#[function_component(RangeInputs)]
pub fn range_inputs(props: &RangeInputsProps) -> Html {
    let id = props.operator.id();

    html! {
        <fieldset class="range-group">
            <legend>{ props.operator.label() }</legend>
            <div class="range-row">
                { "(" }
                { range_input(format!("l{}min", id), &props.left_min) }
                { " to " }
                { range_input(format!("l{}max", id), &props.left_max) }
                { format!(") {} (", props.operator.symbol()) }
                { range_input(format!("r{}min", id), &props.right_min) }
                { " to " }
                { range_input(format!("r{}max", id), &props.right_max) }
                { ")" }
            </div>
            if let Some(note) = &props.note {
                <p class="range-note">{ note.to_string() }</p>
            }
        </fieldset>
    }
}

/// Question, answer field, timer and score of the running session.
#[derive(Properties, PartialEq)]
pub struct GameDisplayProps {
    pub visible: bool,
    pub question: String,
    pub timer: String,
    pub score: String,
    pub answer: String,
    pub oninput: Callback<InputEvent>,
    pub answer_ref: NodeRef,
    pub onrestart: Callback<MouseEvent>,
}

#[function_component(GameDisplay)]
pub fn game_display(props: &GameDisplayProps) -> Html {
    html! {
        <div class="game-display">
            <div id="timer" class="timer" hidden={!props.visible}>{ props.timer.clone() }</div>
            <div id="game" class="game" hidden={!props.visible}>
                <div id="question" class="question">{ props.question.clone() }</div>
                <input type="text"
                    id="answer"
                    inputmode="numeric"
                    autocomplete="off"
                    value={props.answer.clone()}
                    oninput={props.oninput.clone()}
                    ref={props.answer_ref.clone()}
                />
            </div>
            <div id="score" class="score">{ props.score.clone() }</div>
            <button class="btn-secondary" onclick={props.onrestart.clone()}>{ "Restart" }</button>
        </div>
    }
}

/// Final scores of completed sessions.
#[derive(Properties, PartialEq)]
pub struct ScoreHistoryProps {
    pub text: String,
    pub is_empty: bool,
}

#[function_component(ScoreHistoryLine)]
pub fn score_history_line(props: &ScoreHistoryProps) -> Html {
    if props.is_empty {
        return html! {};
    }
    html! {
        <div id="scoreHistory" class="score-history">{ props.text.clone() }</div>
    }
}
