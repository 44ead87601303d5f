mod context;
mod globals;
mod manifest;
mod program;
mod session;
mod uniform;
mod value;

pub mod backend;

#[cfg(test)]
mod mock;

pub use context::*;
pub use globals::Globals;
pub use manifest::*;
pub use program::*;
pub use session::Session;
pub use uniform::*;
pub use value::*;

pub use glam;

use serde_derive::{Deserialize, Serialize};

/// How uniform tables and programs handle two ambiguous cases.
///
/// `Legacy` keeps the first deduced type of a uniform when it is set again and
/// keeps going after a failed link. `Strict` deduces the type on every `set`
/// and treats a failed link like a failed compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    #[default]
    Legacy,
    Strict,
}

pub mod log {
    /// Installs `env_logger`, defaulting to warnings when `RUST_LOG` is unset.
    ///
    /// Calling this more than once is harmless.
    pub fn init() {
        let env = env_logger::Env::default().default_filter_or("warn");
        let _ = env_logger::Builder::from_env(env).try_init();
    }
}
