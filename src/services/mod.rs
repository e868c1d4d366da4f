pub mod page;
pub mod pattern_client;
pub mod poller;
pub mod renderer;

pub use pattern_client::{FetchError, PatternClient};
pub use poller::{fetch_cycle, CycleOutcome, PatternState, Poller};
