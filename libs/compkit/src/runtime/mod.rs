mod build;
mod lifecycle;
mod manager;
mod runner;

pub use manager::Manager;
pub use runner::CATEGORY_RUNNER;
