pub mod headless;
pub mod human;

pub use headless::{HeadlessConfig, HeadlessMode, RunSummary};
pub use human::HumanMode;
