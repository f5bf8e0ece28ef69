pub mod cli;
pub mod config;
pub mod digest;
pub mod error;
pub mod exec;
pub mod job;
pub mod logging;
pub mod pipeline;
pub mod preview;
pub mod retry;
pub mod run;
pub mod source;
pub mod volume;
