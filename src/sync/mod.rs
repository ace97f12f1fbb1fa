pub mod coalescer;
pub mod coordinator;
pub mod options;

pub use coalescer::Coalescer;
pub use coordinator::{Coordinator, Outcome, RequestId};
pub use options::OptionsCache;
