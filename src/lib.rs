/*!
 * AI-OS Throw Library
 * Severity-aware raise/suppress signalling over an observable bus
 */

pub mod core;
pub mod monitoring;
pub mod signals;

// Re-exports
pub use crate::core::{Caller, ConfigError, GenericError, ThrowConfig, ThrowResult};
pub use monitoring::init_tracing;
pub use signals::{
    Accumulates, DiagnosticSink, MemorySink, RaiseRequest, Sender, Subscription, Throw, ThrowArgs,
    ThrowBus, ThrowFields, ThrowLog, ThrowMode, ThrowRecord, ThrowSignal, ThrowStatus, Thrown,
    TracingSink,
};
