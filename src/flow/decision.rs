//! Flow Decisions
//!
//! After a step controller has handled a request, [`decide`] reconciles the
//! HTTP method, the button the user pressed, the controller's status code and
//! the controller's own reported outcome into a single navigation verdict.
//!
//! | Method | Outcome   | Action      | Verdict             |
//! |--------|-----------|-------------|---------------------|
//! | GET    | current   | any         | redirect next       |
//! | GET    | other     | any         | show result         |
//! | other  | any       | any         | show result         |
//! | POST   | success   | next        | redirect next       |
//! | POST   | success   | save_exit   | redirect exit       |
//! | POST   | success   | previous    | redirect previous   |
//! | POST   | success   | none        | show result         |
//! | POST   | reshow    | next        | show result         |
//! | POST   | reshow    | previous    | redirect previous   |
//! | POST   | reshow    | save_exit   | redirect exit       |
//! | POST   | parent    | any         | redirect parent     |
//! | POST   | other     | other       | show result         |
//!
//! Going back always succeeds: a POST with `previous` leaves the stage even
//! when the form did not validate.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

/// HTTP method of the step request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    /// Any other verb, kept by name for logging
    Other(String),
}

impl From<&str> for Method {
    fn from(method: &str) -> Self {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            other => Method::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
            Method::Post => f.write_str("POST"),
            Method::Other(name) => f.write_str(name),
        }
    }
}

/// Navigation button pressed by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserAction {
    Previous,
    Next,
    SaveExit,
}

impl UserAction {
    /// Reads the form's `action` field. Unrecognised values count as no
    /// button at all.
    pub fn from_form(value: Option<&str>) -> Option<Self> {
        match value?.trim() {
            "previous" => Some(UserAction::Previous),
            "next" => Some(UserAction::Next),
            "save_exit" => Some(UserAction::SaveExit),
            _ => None,
        }
    }
}

/// Status code produced by the step controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u16);

impl StatusCode {
    pub const OK: StatusCode = StatusCode(200);
    pub const SEE_OTHER: StatusCode = StatusCode(303);
    pub const BAD_REQUEST: StatusCode = StatusCode(400);

    pub fn is_ok(self) -> bool {
        self == Self::OK
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the step controller says should happen next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ControllerOutcome {
    /// Handled successfully; ready to move on
    #[serde(rename = "stage_success")]
    Success,
    /// Show this stage again (validation failed, or an "add another" action)
    #[serde(rename = "stage_reshow")]
    Reshow,
    /// Send the user to whichever stage the workflow considers current
    #[serde(rename = "stage_current")]
    Current,
    /// A sub-form finished; return to the stage that owns it
    #[serde(rename = "stage_parent")]
    Parent,
}

/// Routing outcome for a step request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    ShowResult,
    RedirectNext,
    RedirectPrevious,
    RedirectExit,
    RedirectParent,
}

/// Decides where a handled step request goes.
///
/// Total: combinations not covered by a rule show the controller's result.
pub fn decide(
    method: &Method,
    action: Option<UserAction>,
    code: StatusCode,
    outcome: Option<ControllerOutcome>,
) -> Verdict {
    let verdict = match method {
        Method::Get if outcome == Some(ControllerOutcome::Current) => Verdict::RedirectNext,
        // Successful page, reshow request or error page: all rendered as-is
        Method::Get => Verdict::ShowResult,
        Method::Other(_) => Verdict::ShowResult,
        Method::Post => decide_post(action, outcome),
    };

    debug!(
        "method: {} action: {:?}, code: {}, controller outcome: {:?} -> {:?}",
        method, action, code, outcome, verdict
    );
    verdict
}

fn decide_post(action: Option<UserAction>, outcome: Option<ControllerOutcome>) -> Verdict {
    use ControllerOutcome::*;
    use UserAction::*;

    match (outcome, action) {
        (Some(Success), Some(Next)) => Verdict::RedirectNext,
        (Some(Success), Some(SaveExit)) => Verdict::RedirectExit,
        (Some(Success), Some(Previous)) => Verdict::RedirectPrevious,
        // Sub-actions such as "add another category" stay on the stage
        (Some(Success), None) => Verdict::ShowResult,

        (Some(Reshow), Some(Next)) => Verdict::ShowResult,
        // Edits are abandoned rather than trapping the user on the stage
        (Some(Reshow), Some(Previous)) => Verdict::RedirectPrevious,
        (Some(Reshow), Some(SaveExit)) => Verdict::RedirectExit,

        (Some(Parent), _) => Verdict::RedirectParent,

        _ => Verdict::ShowResult,
    }
}
