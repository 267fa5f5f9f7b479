//! State of the feedback widget.
//!
//! The widget is a two-step form: pick one of the two ratings, optionally type a
//! comment, submit. While a submission is in flight the form refuses a second one.
//! A failed submission returns to editing with an error; submitting again creates a
//! new entry rather than retrying the old one.

use crate::models::Rating;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FeedbackPhase {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

/// What the client sends; the server adds email and timestamp.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub rating: Rating,
    pub comment: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedbackForm {
    rating: Option<Rating>,
    comment: String,
    phase: FeedbackPhase,
    error: Option<String>,
}

impl FeedbackForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn phase(&self) -> FeedbackPhase {
        self.phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The comment box and submit button appear once a rating is chosen.
    pub fn shows_comment(&self) -> bool {
        self.rating.is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FeedbackPhase::Submitting
    }

    pub fn is_submitted(&self) -> bool {
        self.phase == FeedbackPhase::Submitted
    }

    pub fn choose(&mut self, rating: Rating) {
        if self.phase == FeedbackPhase::Editing {
            self.rating = Some(rating);
        }
    }

    pub fn set_comment(&mut self, comment: String) {
        if self.phase == FeedbackPhase::Editing {
            self.comment = comment;
        }
    }

    /// Lock the form and hand out what should be written, or `None` when there is
    /// nothing to submit (no rating yet, already in flight, already done).
    pub fn begin_submit(&mut self) -> Option<FeedbackDraft> {
        if self.phase != FeedbackPhase::Editing {
            return None;
        }
        let rating = self.rating?;
        self.phase = FeedbackPhase::Submitting;
        self.error = None;
        Some(FeedbackDraft {
            rating,
            comment: self.comment.clone(),
        })
    }

    /// Record the outcome of the submission started by [`begin_submit`](Self::begin_submit).
    pub fn finish(&mut self, outcome: Result<(), String>) {
        if self.phase != FeedbackPhase::Submitting {
            return;
        }
        match outcome {
            Ok(()) => self.phase = FeedbackPhase::Submitted,
            Err(message) => {
                self.phase = FeedbackPhase::Editing;
                self.error = Some(message);
            }
        }
    }
}
