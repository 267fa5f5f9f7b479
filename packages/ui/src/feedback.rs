//! Floating promoter/detractor feedback widget.

use dioxus::prelude::*;
use store::{FeedbackForm, Rating};

use crate::icons::{FaCircleCheck, FaFaceFrown, FaFaceSmile, FaPaperPlane, FaSpinner};
use crate::Icon;

#[component]
pub fn FeedbackWidget() -> Element {
    let mut form = use_signal(FeedbackForm::new);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let Some(draft) = form.write().begin_submit() else {
            return;
        };
        spawn(async move {
            let outcome = api::submit_feedback(draft.rating, draft.comment)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to submit feedback: {}", e);
                    "Failed to submit feedback. Please try again.".to_string()
                });
            form.write().finish(outcome);
        });
    };

    let current = form();

    if current.is_submitted() {
        return rsx! {
            div {
                class: "feedback feedback--done",
                Icon { icon: FaCircleCheck, width: 24, height: 24 }
                div {
                    p { class: "feedback__title", "Thanks for your feedback!" }
                    p { class: "feedback__subtitle", "We appreciate your help." }
                }
            }
        };
    }

    let choice_class = |rating: Rating| {
        if current.rating() == Some(rating) {
            format!("feedback__choice feedback__choice--{} selected", rating.as_str())
        } else {
            format!("feedback__choice feedback__choice--{}", rating.as_str())
        }
    };

    rsx! {
        div {
            class: "feedback",
            h3 { class: "feedback__title", "How's your experience?" }

            div {
                class: "feedback__choices",
                button {
                    class: choice_class(Rating::Promoter),
                    disabled: current.is_submitting(),
                    onclick: move |_| form.write().choose(Rating::Promoter),
                    Icon { icon: FaFaceSmile, width: 28, height: 28 }
                    span { "Promoter" }
                }
                button {
                    class: choice_class(Rating::Detractor),
                    disabled: current.is_submitting(),
                    onclick: move |_| form.write().choose(Rating::Detractor),
                    Icon { icon: FaFaceFrown, width: 28, height: 28 }
                    span { "Detractor" }
                }
            }

            if current.shows_comment() {
                form {
                    onsubmit: handle_submit,
                    textarea {
                        rows: 3,
                        placeholder: "Any suggestions for us?",
                        value: current.comment().to_string(),
                        disabled: current.is_submitting(),
                        oninput: move |evt| form.write().set_comment(evt.value()),
                    }
                    if let Some(error) = current.error() {
                        p { class: "feedback__error", "{error}" }
                    }
                    button {
                        r#type: "submit",
                        class: "primary",
                        disabled: current.is_submitting(),
                        if current.is_submitting() {
                            Icon { icon: FaSpinner, width: 16, height: 16, class: "spin" }
                        } else {
                            Icon { icon: FaPaperPlane, width: 14, height: 14 }
                            "Submit Feedback"
                        }
                    }
                }
            }
        }
    }
}
