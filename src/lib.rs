#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod formats;
pub mod github;
pub mod literal;
pub mod logging;
pub mod splice;
pub mod sync;
pub mod target;
