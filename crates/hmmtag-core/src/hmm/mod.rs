pub mod config;
pub mod model;
pub mod smoothing;

pub use config::HmmConfig;
pub use model::Hmm;
pub use smoothing::{AddK, Matrix, Smoother};
