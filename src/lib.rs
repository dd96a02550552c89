// Typing-session core plus the event plumbing the terminal front-end runs on.
pub mod app_dirs;
pub mod clock;
pub mod config;
pub mod corpus;
pub mod error;
pub mod logging;
pub mod report;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod timer;

pub use corpus::{Corpus, Difficulty, TextSource};
pub use error::{Error, Result};
pub use session::{Phase, Session, SessionConfig};
