/*!
 * Signals Module
 * Severity-aware throw signals routed through an observable bus
 */

mod bus;
pub mod format;
mod ledger;
pub mod policy;
mod raise;
pub mod sink;
pub mod types;

// Re-export public API
pub use bus::{BusStats, HandlerFn, Sender, Subscription, ThrowBus, ThrowBusBuilder};
pub use format::{ThrowFields, FIELD_SEPARATOR};
pub use ledger::{Accumulates, ThrowLog, ThrowStatus};
pub use policy::Verdict;
pub use raise::{Throw, ThrowArgs, Thrown};
pub use sink::{DiagnosticSink, MemorySink, TracingSink};
pub use types::{DynError, RaiseRequest, ThrowMode, ThrowRecord, ThrowSignal};
