use web_sys::HtmlInputElement;
use yew::prelude::*;

/// Raw text of one settings field and the handler that keeps it current.
#[derive(Clone, PartialEq)]
pub struct TextField {
    pub value: String,
    pub oninput: Callback<InputEvent>,
}

/// Custom hook holding the text of a form field. Parsing happens only when
/// the form is submitted, so the field keeps exactly what the user typed.
#[hook]
pub fn use_text_field(initial: String) -> TextField {
    let text = use_state(move || initial);

    let oninput = {
        let text = text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            text.set(input.value());
        })
    };

    TextField {
        value: (*text).clone(),
        oninput,
    }
}
