pub mod compose;
pub mod controller;
pub mod render;
pub mod view;

pub use controller::{App, Completion, Job, Outcome, Request};
