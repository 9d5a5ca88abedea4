//! ErdCanvas Application
//!
//! Headless shell around the core engine: loads a palette and config,
//! replays a gesture script and reports the resulting scene.

mod cli;
mod session;

pub use cli::{AppConfig, run};
pub use session::{AppError, Session, Step, parse_script};
