pub mod dashboard;
pub mod pattern;
pub mod settings;

pub use dashboard::*;
pub use pattern::*;
pub use settings::*;
