/*!
 * Signal Types
 * Throw modes, call-site requests and the per-raise signal record
 */

use crate::core::types::Caller;
use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error;
use std::fmt;
use std::ops::Deref;

/// Underlying error as seen by subscribers
pub type DynError = dyn Error + Send + Sync + 'static;

/// Severity class of a raise, fixed by the raising operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ThrowMode {
    /// Caller-fatal unless suppressed at the call site or handled by a subscriber
    Hard = 0,
    /// Recoverable by default, escalated only by a subscriber or the caller
    Soft = 1,
    /// Self-diagnosed internal inconsistency, fatal by default
    Framework = 2,
    /// Informational, never interrupts control flow
    Advisory = 3,
}

impl ThrowMode {
    pub const ALL: [ThrowMode; 4] = [
        ThrowMode::Hard,
        ThrowMode::Soft,
        ThrowMode::Framework,
        ThrowMode::Advisory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThrowMode::Hard => "Hard",
            ThrowMode::Soft => "Soft",
            ThrowMode::Framework => "Framework",
            ThrowMode::Advisory => "Advisory",
        }
    }

    /// Whether this mode can ever propagate the underlying error
    pub fn can_propagate(&self) -> bool {
        !matches!(self, ThrowMode::Advisory)
    }
}

impl fmt::Display for ThrowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit raise/suppress request made at the call site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RaiseRequest {
    #[default]
    Unspecified,
    Raise,
    Suppress,
}

impl RaiseRequest {
    /// `Some(true)` asks to raise, `Some(false)` asks to suppress
    pub fn from_flag(raise: Option<bool>) -> Self {
        match raise {
            None => RaiseRequest::Unspecified,
            Some(true) => RaiseRequest::Raise,
            Some(false) => RaiseRequest::Suppress,
        }
    }

    pub fn is_raise(&self) -> bool {
        matches!(self, RaiseRequest::Raise)
    }

    pub fn is_suppress(&self) -> bool {
        matches!(self, RaiseRequest::Suppress)
    }
}

/// Owned description of one raised condition
///
/// Everything except the handled state is fixed at construction. Records
/// outlive the publish window: they are returned by the raising operation,
/// appended to ledgers and serialized for inspection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrowRecord {
    mode: ThrowMode,
    request: RaiseRequest,
    identifier: String,
    message: String,
    kind: String,
    error_text: String,
    inner: Option<String>,
    caller: Caller,
    backtrace: Option<String>,
    handled: Option<bool>,
}

/// Inputs for building a record; resolved by the raising operation
pub(crate) struct RecordParts<'a> {
    pub mode: ThrowMode,
    pub request: RaiseRequest,
    pub kind: &'a str,
    pub identifier: Option<String>,
    pub message: String,
    pub caller: Caller,
    pub capture_backtrace: bool,
    pub handled: Option<bool>,
}

impl ThrowRecord {
    pub(crate) fn new(parts: RecordParts<'_>, error: &DynError) -> Self {
        let backtrace = if parts.capture_backtrace {
            let trace = Backtrace::capture();
            match trace.status() {
                BacktraceStatus::Captured => Some(trace.to_string()),
                _ => None,
            }
        } else {
            None
        };

        let identifier = parts
            .identifier
            .unwrap_or_else(|| parts.caller.member().to_string());

        Self {
            mode: parts.mode,
            request: parts.request,
            identifier,
            message: parts.message,
            kind: parts.kind.to_string(),
            error_text: error.to_string(),
            inner: error.source().map(|source| source.to_string()),
            caller: parts.caller,
            backtrace,
            handled: parts.handled,
        }
    }

    pub fn mode(&self) -> ThrowMode {
        self.mode
    }

    pub fn request(&self) -> RaiseRequest {
        self.request
    }

    /// Text-searchable correlation key, the caller's name unless given
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Short type name of the underlying error
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Display text of the underlying error
    pub fn error_text(&self) -> &str {
        &self.error_text
    }

    /// Display text of the underlying error's source, if any
    pub fn inner(&self) -> Option<&str> {
        self.inner.as_deref()
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn backtrace(&self) -> Option<&str> {
        self.backtrace.as_deref()
    }

    /// Raw handled state; `None` means no one has decided yet
    pub fn handled_state(&self) -> Option<bool> {
        self.handled
    }

    /// Handled state with "unset" read as `false`
    pub fn is_handled(&self) -> bool {
        self.handled.unwrap_or(false)
    }

    pub(crate) fn set_handled(&mut self, handled: bool) {
        self.handled = Some(handled);
    }
}

/// A record in flight, as handed to subscribers during publish
///
/// Subscribers read the record through `Deref` and may flip the handled
/// state; nothing else is mutable.
pub struct ThrowSignal<'e> {
    record: ThrowRecord,
    error: &'e DynError,
}

impl<'e> ThrowSignal<'e> {
    pub(crate) fn new(record: ThrowRecord, error: &'e DynError) -> Self {
        Self { record, error }
    }

    /// The underlying error instance
    pub fn error(&self) -> &'e DynError {
        self.error
    }

    /// Downcast the underlying error to a concrete kind
    pub fn error_as<E: Error + 'static>(&self) -> Option<&'e E> {
        let error: &'e DynError = self.error;
        error.downcast_ref::<E>()
    }

    /// Mark handled (`true`) to suppress, or unhandled (`false`) to escalate
    pub fn set_handled(&mut self, handled: bool) {
        self.record.set_handled(handled);
    }

    pub fn record(&self) -> &ThrowRecord {
        &self.record
    }

    pub(crate) fn into_record(self) -> ThrowRecord {
        self.record
    }
}

impl Deref for ThrowSignal<'_> {
    type Target = ThrowRecord;

    fn deref(&self) -> &ThrowRecord {
        &self.record
    }
}

impl fmt::Debug for ThrowSignal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrowSignal")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}
