//! Setup prompt recognition
//!
//! Maps whatever the session reports (a matched pattern, end of stream, a
//! timeout, or the same two conditions raised as errors) onto one signal
//! type, and each signal onto the next step of the prompt loop.

use super::session::{ExpectOutcome, SessionError};
use regex_lite::Regex;

pub const MACHINE_NAME_PROMPT: &str = r"What would you like to call this machine\?";
pub const ACCESS_TOKEN_PROMPT: &str = r"Please enter the access token:";
/// Matches the marker together with the rest of its line.
pub const ERROR_MARKER: &str = r"Error:[^\r\n]*";

const MACHINE_NAME_INDEX: usize = 0;
const ACCESS_TOKEN_INDEX: usize = 1;

/// Compiled prompt patterns, in signal order
pub struct PromptPatterns {
    patterns: Vec<Regex>,
}

impl PromptPatterns {
    pub fn new() -> Result<Self, regex_lite::Error> {
        let patterns = [MACHINE_NAME_PROMPT, ACCESS_TOKEN_PROMPT, ERROR_MARKER]
            .into_iter()
            .map(Regex::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn as_slice(&self) -> &[Regex] {
        &self.patterns
    }
}

/// Something the server did while being set up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSignal {
    MachineName,
    AccessToken,
    ServerError(String),
    Eof,
    Timeout,
}

/// Why the prompt loop stopped without failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    TokenRequested,
    StreamClosed,
    NoMorePrompts,
}

/// What the prompt loop does next
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStep {
    AnswerMachineName,
    Finish(FinishReason),
    Fail(String),
}

impl PromptSignal {
    /// Classify a wait result
    ///
    /// End of stream and timeouts become signals whether they were returned or
    /// raised; any other session error is passed through.
    pub fn classify(result: Result<ExpectOutcome, SessionError>) -> Result<Self, SessionError> {
        match result {
            Ok(ExpectOutcome::Matched { index, text }) => Ok(match index {
                MACHINE_NAME_INDEX => Self::MachineName,
                ACCESS_TOKEN_INDEX => Self::AccessToken,
                _ => Self::ServerError(text),
            }),
            Ok(ExpectOutcome::Eof) | Err(SessionError::Eof) => Ok(Self::Eof),
            Ok(ExpectOutcome::Timeout) | Err(SessionError::Timeout) => Ok(Self::Timeout),
            Err(e) => Err(e),
        }
    }

    pub fn step(&self) -> LoopStep {
        match self {
            Self::MachineName => LoopStep::AnswerMachineName,
            // Token auth is not used on pods; leave the prompt unanswered.
            Self::AccessToken => LoopStep::Finish(FinishReason::TokenRequested),
            Self::ServerError(text) => LoopStep::Fail(text.clone()),
            Self::Eof => LoopStep::Finish(FinishReason::StreamClosed),
            Self::Timeout => LoopStep::Finish(FinishReason::NoMorePrompts),
        }
    }
}
