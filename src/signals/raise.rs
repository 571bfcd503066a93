/*!
 * Raising Operations
 * Build a signal, publish it, then continue, propagate or emit
 *
 * Every raise goes through the same sequence on the calling thread:
 * construct the record with the mode's default handled state, publish it
 * once, re-read the handled state and apply the severity policy.
 */

use super::bus::{Sender, ThrowBus};
use super::policy::{self, Verdict};
use super::types::{RaiseRequest, RecordParts, ThrowMode, ThrowRecord, ThrowSignal};
use crate::core::errors::GenericError;
use crate::core::types::{short_type_name, Caller};
use std::any::Any;
use std::error::Error;
use std::ops::Deref;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Per-raise arguments: caller identity, optional text, optional request
///
/// Usually built with [`throw_args!`](crate::throw_args), which captures the
/// enclosing function automatically.
#[derive(Debug, Clone)]
pub struct ThrowArgs {
    caller: Caller,
    identifier: Option<String>,
    message: Option<String>,
    request: RaiseRequest,
}

impl ThrowArgs {
    pub fn new(caller: Caller) -> Self {
        Self {
            caller,
            identifier: None,
            message: None,
            request: RaiseRequest::Unspecified,
        }
    }

    pub fn identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Ask for the error to be raised
    pub fn raise(self) -> Self {
        self.request(RaiseRequest::Raise)
    }

    /// Ask for the error to be suppressed
    pub fn suppress(self) -> Self {
        self.request(RaiseRequest::Suppress)
    }

    pub fn request(mut self, request: RaiseRequest) -> Self {
        self.request = request;
        self
    }

    pub fn caller(&self) -> &Caller {
        &self.caller
    }

    pub fn requested(&self) -> RaiseRequest {
        self.request
    }

    /// Explicit message, else explicit identifier
    fn stated_message(&self) -> Option<String> {
        self.message.clone().or_else(|| self.identifier.clone())
    }
}

impl From<Caller> for ThrowArgs {
    fn from(caller: Caller) -> Self {
        Self::new(caller)
    }
}

/// Build [`ThrowArgs`] for the enclosing function
///
/// - `throw_args!()`: identifier is the caller's name, message falls back
/// - `throw_args!(message)`: one free-text argument is the message
/// - `throw_args!(identifier, message)`: two arguments are identifier then message
#[macro_export]
macro_rules! throw_args {
    () => {
        $crate::signals::ThrowArgs::new($crate::caller!())
    };
    ($message:expr $(,)?) => {
        $crate::signals::ThrowArgs::new($crate::caller!()).message($message)
    };
    ($identifier:expr, $message:expr $(,)?) => {
        $crate::signals::ThrowArgs::new($crate::caller!())
            .identifier($identifier)
            .message($message)
    };
}

/// A raise that did not interrupt the caller
#[derive(Debug)]
pub struct Thrown<E> {
    record: ThrowRecord,
    error: E,
}

impl<E> Thrown<E> {
    pub fn record(&self) -> &ThrowRecord {
        &self.record
    }

    pub fn error(&self) -> &E {
        &self.error
    }

    pub fn into_error(self) -> E {
        self.error
    }

    pub fn into_parts(self) -> (ThrowRecord, E) {
        (self.record, self.error)
    }
}

impl<E> Deref for Thrown<E> {
    type Target = ThrowRecord;

    fn deref(&self) -> &ThrowRecord {
        &self.record
    }
}

/// Raising operations available on every sender
///
/// `throw_*` builds a new error from the resolved message with `make`;
/// `rethrow_*` wraps an error the caller already has. Faulting modes return
/// `Err` with the original error when the policy says to propagate, so `?`
/// interrupts the caller.
pub trait Throw: Any + Sized {
    fn throw_hard<E, F>(&self, bus: &ThrowBus, make: F, args: ThrowArgs) -> Result<Thrown<E>, E>
    where
        E: Error + Send + Sync + From<GenericError> + 'static,
        F: FnOnce(&str) -> E,
    {
        raise_new(bus, self, ThrowMode::Hard, make, args)
    }

    fn rethrow_hard<E>(&self, bus: &ThrowBus, error: E, args: ThrowArgs) -> Result<Thrown<E>, E>
    where
        E: Error + Send + Sync + 'static,
    {
        raise_existing(bus, self, ThrowMode::Hard, error, args)
    }

    fn throw_soft<E, F>(&self, bus: &ThrowBus, make: F, args: ThrowArgs) -> Result<Thrown<E>, E>
    where
        E: Error + Send + Sync + From<GenericError> + 'static,
        F: FnOnce(&str) -> E,
    {
        raise_new(bus, self, ThrowMode::Soft, make, args)
    }

    fn rethrow_soft<E>(&self, bus: &ThrowBus, error: E, args: ThrowArgs) -> Result<Thrown<E>, E>
    where
        E: Error + Send + Sync + 'static,
    {
        raise_existing(bus, self, ThrowMode::Soft, error, args)
    }

    fn throw_framework<E, F>(
        &self,
        bus: &ThrowBus,
        make: F,
        args: ThrowArgs,
    ) -> Result<Thrown<E>, E>
    where
        E: Error + Send + Sync + From<GenericError> + 'static,
        F: FnOnce(&str) -> E,
    {
        raise_new(bus, self, ThrowMode::Framework, make, args)
    }

    fn rethrow_framework<E>(
        &self,
        bus: &ThrowBus,
        error: E,
        args: ThrowArgs,
    ) -> Result<Thrown<E>, E>
    where
        E: Error + Send + Sync + 'static,
    {
        raise_existing(bus, self, ThrowMode::Framework, error, args)
    }

    /// Advisory raise; never interrupts, unhandled advisories go to the sink
    fn throw_advisory<E, F>(&self, bus: &ThrowBus, make: F, args: ThrowArgs) -> Thrown<E>
    where
        E: Error + Send + Sync + From<GenericError> + 'static,
        F: FnOnce(&str) -> E,
    {
        let kind = short_type_name::<E>();
        let message = args.stated_message().unwrap_or_else(|| kind.to_string());
        let error = construct(make, &message);
        let (_, record) = dispatch(bus, self, ThrowMode::Advisory, &error, kind, message, args);
        Thrown { record, error }
    }

    fn rethrow_advisory<E>(&self, bus: &ThrowBus, error: E, args: ThrowArgs) -> Thrown<E>
    where
        E: Error + Send + Sync + 'static,
    {
        let kind = short_type_name::<E>();
        let message = existing_message(&args, &error, kind);
        let (_, record) = dispatch(bus, self, ThrowMode::Advisory, &error, kind, message, args);
        Thrown { record, error }
    }
}

impl<T: Any> Throw for T {}

fn raise_new<S, E, F>(
    bus: &ThrowBus,
    sender: &S,
    mode: ThrowMode,
    make: F,
    args: ThrowArgs,
) -> Result<Thrown<E>, E>
where
    S: Any,
    E: Error + Send + Sync + From<GenericError> + 'static,
    F: FnOnce(&str) -> E,
{
    let kind = short_type_name::<E>();
    let message = args.stated_message().unwrap_or_else(|| kind.to_string());
    let error = construct(make, &message);
    settle(bus, sender, mode, error, kind, message, args)
}

fn raise_existing<S, E>(
    bus: &ThrowBus,
    sender: &S,
    mode: ThrowMode,
    error: E,
    args: ThrowArgs,
) -> Result<Thrown<E>, E>
where
    S: Any,
    E: Error + Send + Sync + 'static,
{
    let kind = short_type_name::<E>();
    let message = existing_message(&args, &error, kind);
    settle(bus, sender, mode, error, kind, message, args)
}

/// Existing errors fall back to their own display text, then the kind name
fn existing_message<E: Error>(args: &ThrowArgs, error: &E, kind: &str) -> String {
    args.stated_message().unwrap_or_else(|| {
        let text = error.to_string();
        if text.is_empty() {
            kind.to_string()
        } else {
            text
        }
    })
}

/// Run a caller-supplied constructor; a panic yields a `GenericError` instead
fn construct<E, F>(make: F, message: &str) -> E
where
    E: From<GenericError>,
    F: FnOnce(&str) -> E,
{
    match panic::catch_unwind(AssertUnwindSafe(|| make(message))) {
        Ok(error) => error,
        Err(_) => {
            let kind = short_type_name::<E>();
            warn!(kind, "Error constructor panicked, falling back to GenericError");
            E::from(GenericError::new(kind, message))
        }
    }
}

fn settle<S, E>(
    bus: &ThrowBus,
    sender: &S,
    mode: ThrowMode,
    error: E,
    kind: &str,
    message: String,
    args: ThrowArgs,
) -> Result<Thrown<E>, E>
where
    S: Any,
    E: Error + Send + Sync + 'static,
{
    let (verdict, record) = dispatch(bus, sender, mode, &error, kind, message, args);
    if verdict.is_propagate() {
        debug!(
            mode = %record.mode(),
            identifier = record.identifier(),
            kind = record.kind(),
            caller = %record.caller(),
            "Propagating throw signal"
        );
        Err(error)
    } else {
        Ok(Thrown { record, error })
    }
}

/// Publish once and decide; advisories are emitted here
fn dispatch<S, E>(
    bus: &ThrowBus,
    sender: &S,
    mode: ThrowMode,
    error: &E,
    kind: &str,
    message: String,
    args: ThrowArgs,
) -> (Verdict, ThrowRecord)
where
    S: Any,
    E: Error + Send + Sync + 'static,
{
    let ThrowArgs {
        caller,
        identifier,
        request,
        ..
    } = args;

    let record = ThrowRecord::new(
        RecordParts {
            mode,
            request,
            kind,
            identifier,
            message,
            caller,
            capture_backtrace: bus.config().capture_backtrace,
            handled: policy::default_handled(mode, request),
        },
        error,
    );

    let mut signal = ThrowSignal::new(record, error);
    bus.publish(&Sender::new(sender), &mut signal);
    let record = signal.into_record();

    let verdict = policy::verdict(mode, request, record.handled_state());
    bus.count_verdict(verdict);
    if verdict == Verdict::Emit {
        bus.emit(&record);
    }

    (verdict, record)
}
