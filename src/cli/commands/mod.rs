//! Phase command implementations

mod run;
mod save;

pub use run::run;
pub use save::save;
