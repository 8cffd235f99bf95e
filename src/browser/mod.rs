pub mod service;

pub use service::{navigate_and_settle, BrowserService};
