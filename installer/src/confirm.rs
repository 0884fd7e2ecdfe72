//! Yes/no confirmation prompts.
//!
//! [`confirm`] asks until it gets an answer whose first character is `y` or
//! `n` (case-insensitive). What a "no" means is decided by the
//! [`Confirmation`]: either the run carries on, or the caller is told to
//! stop. The gate itself never exits the process.

use crate::console::Console;
use std::io;

/// A parsed yes/no answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// The first character was `y` or `Y`.
    Yes,
    /// The first character was `n` or `N`.
    No,
}

/// Parse a raw answer by its first non-blank character.
///
/// Returns `None` when the input is blank or starts with anything other
/// than `y`/`n`, in which case the question is asked again.
///
/// # Examples
///
/// ```
/// use nether_portal::confirm::{Answer, parse_answer};
///
/// assert_eq!(parse_answer("Yes please"), Some(Answer::Yes));
/// assert_eq!(parse_answer("nope"), Some(Answer::No));
/// assert_eq!(parse_answer("maybe"), None);
/// assert_eq!(parse_answer(""), None);
/// ```
#[must_use]
pub fn parse_answer(input: &str) -> Option<Answer> {
    match input.trim_start().chars().next()?.to_ascii_lowercase() {
        'y' => Some(Answer::Yes),
        'n' => Some(Answer::No),
        _ => None,
    }
}

/// A yes/no question and what each answer means.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// The question, shown with a `[y/n]` hint.
    pub question: String,
    /// Printed after a yes.
    pub on_accept: String,
    /// Printed after a non-fatal no (skipped when empty), or used as the
    /// reason for stopping after a fatal one.
    pub on_decline: String,
    /// Whether a no ends the run.
    pub fatal_on_decline: bool,
}

impl Confirmation {
    /// A question where "no" lets the run continue.
    #[must_use]
    pub fn optional(
        question: impl Into<String>,
        on_accept: impl Into<String>,
        on_decline: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            on_accept: on_accept.into(),
            on_decline: on_decline.into(),
            fatal_on_decline: false,
        }
    }

    /// A question where "no" ends the run with `reason`.
    #[must_use]
    pub fn required(
        question: impl Into<String>,
        on_accept: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            fatal_on_decline: true,
            ..Self::optional(question, on_accept, reason)
        }
    }
}

/// The result of asking a [`Confirmation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationOutcome {
    /// The user said yes.
    Accepted,
    /// The user said no and the run continues.
    DeclinedContinue,
    /// The user said no to a required step; the caller must stop.
    DeclinedFatal {
        /// Why the run is stopping.
        reason: String,
    },
}

impl ConfirmationOutcome {
    /// Return whether the user said yes.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// Ask `confirmation` until a yes or no is given.
///
/// A closed input stream counts as "no", so an unattended run cannot loop
/// forever on a missing answer.
///
/// # Errors
///
/// Returns any I/O error from the console.
pub fn confirm(
    console: &mut dyn Console,
    confirmation: &Confirmation,
) -> io::Result<ConfirmationOutcome> {
    let prompt = format!("{} [y/n]\n>>> ", confirmation.question);
    let answer = loop {
        let Some(line) = console.ask(&prompt)? else {
            log::debug!("input closed while asking: {}", confirmation.question);
            break Answer::No;
        };
        if let Some(answer) = parse_answer(&line) {
            break answer;
        }
        log::trace!("re-asking after unrecognised answer {line:?}");
    };

    match answer {
        Answer::Yes => {
            console.say(&confirmation.on_accept);
            Ok(ConfirmationOutcome::Accepted)
        }
        Answer::No if confirmation.fatal_on_decline => Ok(ConfirmationOutcome::DeclinedFatal {
            reason: confirmation.on_decline.clone(),
        }),
        Answer::No => {
            if !confirmation.on_decline.is_empty() {
                console.say(&format!("{}.", confirmation.on_decline));
            }
            Ok(ConfirmationOutcome::DeclinedContinue)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ScriptedConsole;
    use rstest::rstest;

    #[rstest]
    #[case::lower_y("y", Some(Answer::Yes))]
    #[case::upper_y("Y", Some(Answer::Yes))]
    #[case::yes("yes", Some(Answer::Yes))]
    #[case::padded_yes("  Yes", Some(Answer::Yes))]
    #[case::lower_n("n", Some(Answer::No))]
    #[case::no("no", Some(Answer::No))]
    #[case::upper_no("NO", Some(Answer::No))]
    #[case::maybe("maybe", None)]
    #[case::empty("", None)]
    #[case::blank("   ", None)]
    #[case::digit("1", None)]
    fn parse_answer_uses_first_character(#[case] input: &str, #[case] expected: Option<Answer>) {
        assert_eq!(parse_answer(input), expected);
    }

    fn optional() -> Confirmation {
        Confirmation::optional("Remove it?", "Removing.", "Kept")
    }

    #[test]
    fn yes_prints_accept_message() {
        let mut console = ScriptedConsole::new(["yes"]);
        let outcome = confirm(&mut console, &optional()).expect("confirm");
        assert_eq!(outcome, ConfirmationOutcome::Accepted);
        assert_eq!(console.lines(), ["Removing."]);
    }

    #[test]
    fn invalid_answers_re_prompt_until_valid() {
        let mut console = ScriptedConsole::new(["maybe", "", "?", "Y"]);
        let outcome = confirm(&mut console, &optional()).expect("confirm");
        assert!(outcome.is_accepted());
        assert_eq!(console.prompts().len(), 4);
        assert!(console.prompts().iter().all(|p| p == "Remove it? [y/n]\n>>> "));
    }

    #[test]
    fn optional_no_continues_and_prints_decline_message() {
        let mut console = ScriptedConsole::new(["n"]);
        let outcome = confirm(&mut console, &optional()).expect("confirm");
        assert_eq!(outcome, ConfirmationOutcome::DeclinedContinue);
        assert_eq!(console.lines(), ["Kept."]);
    }

    #[test]
    fn optional_no_with_empty_message_prints_nothing() {
        let mut console = ScriptedConsole::new(["no"]);
        let confirmation = Confirmation::optional("Set url?", "Input the url:", "");
        let outcome = confirm(&mut console, &confirmation).expect("confirm");
        assert_eq!(outcome, ConfirmationOutcome::DeclinedContinue);
        assert!(console.lines().is_empty());
    }

    #[test]
    fn required_no_returns_fatal_reason_without_printing() {
        let mut console = ScriptedConsole::new(["N"]);
        let confirmation =
            Confirmation::required("Download again?", "Downloading.", "incomplete file \"a\"");
        let outcome = confirm(&mut console, &confirmation).expect("confirm");
        assert_eq!(
            outcome,
            ConfirmationOutcome::DeclinedFatal {
                reason: "incomplete file \"a\"".to_owned()
            }
        );
        assert!(console.lines().is_empty());
    }

    #[rstest]
    #[case::optional(false)]
    #[case::required(true)]
    fn closed_input_counts_as_no(#[case] fatal: bool) {
        let mut console = ScriptedConsole::new(Vec::<&str>::new());
        let confirmation = Confirmation {
            fatal_on_decline: fatal,
            ..optional()
        };
        let outcome = confirm(&mut console, &confirmation).expect("confirm");
        assert!(!outcome.is_accepted());
        assert_eq!(
            matches!(outcome, ConfirmationOutcome::DeclinedFatal { .. }),
            fatal
        );
    }
}
