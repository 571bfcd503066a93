/*!
 * Severity Policy
 * Default handled state per mode and the post-publish decision
 *
 * | Mode      | Before publish                     | After publish                         |
 * |-----------|------------------------------------|---------------------------------------|
 * | Hard      | unset (true if caller suppressed)  | propagate unless handled or suppressed |
 * | Soft      | true (false if caller raised)      | propagate only if unhandled           |
 * | Framework | false (true if caller suppressed)  | propagate only if unhandled           |
 * | Advisory  | unset (true if caller suppressed)  | never propagate, emit if unhandled    |
 */

use super::types::{RaiseRequest, ThrowMode};

/// Final action taken by a raising operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Return the record to the caller
    Continue,
    /// Hand the underlying error back to the caller
    Propagate,
    /// Write the rendered record to the diagnostic sink, then continue
    Emit,
}

impl Verdict {
    pub fn is_propagate(&self) -> bool {
        matches!(self, Verdict::Propagate)
    }
}

/// Handled state a record starts with, before any subscriber runs
pub fn default_handled(mode: ThrowMode, request: RaiseRequest) -> Option<bool> {
    match mode {
        ThrowMode::Hard | ThrowMode::Advisory => request.is_suppress().then_some(true),
        ThrowMode::Soft => Some(!request.is_raise()),
        ThrowMode::Framework => Some(request.is_suppress()),
    }
}

/// Decide the outcome once publish has returned
///
/// An explicit suppress request is authoritative for `Hard`: a subscriber
/// marking the record unhandled does not override it.
pub fn verdict(mode: ThrowMode, request: RaiseRequest, handled: Option<bool>) -> Verdict {
    let handled = handled.unwrap_or(false);
    match mode {
        ThrowMode::Hard => {
            if handled || request.is_suppress() {
                Verdict::Continue
            } else {
                Verdict::Propagate
            }
        }
        ThrowMode::Soft | ThrowMode::Framework => {
            if handled {
                Verdict::Continue
            } else {
                Verdict::Propagate
            }
        }
        ThrowMode::Advisory => {
            if handled {
                Verdict::Continue
            } else {
                Verdict::Emit
            }
        }
    }
}
