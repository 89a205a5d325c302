//! Orbit library exports for testing

use clap::ValueEnum;

pub mod backend;
pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

#[derive(Clone, Debug, Default, ValueEnum)]
pub enum BackendKind {
    #[default]
    Horizon,
    Local,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Horizon => "horizon",
            BackendKind::Local => "local",
        }
    }
}
