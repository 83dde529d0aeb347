//! Per-domain state containers.
//!
//! Each container exclusively owns one result cell. Containers never write
//! into each other; the [`Dashboard`](crate::Dashboard) reacts to selection
//! changes by re-invoking loads.

mod constituents;
mod history;
mod instrument;
mod selection;
mod summary;

pub use constituents::{filter_constituents, ConstituentsState, FilteredConstituents};
pub use history::HistoryState;
pub use instrument::{InstrumentEndpoint, InstrumentState};
pub use selection::SelectionState;
pub use summary::SummaryState;
