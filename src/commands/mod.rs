pub mod dashboard;

pub use dashboard::{create_router, AppState};
