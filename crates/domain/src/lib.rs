#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod block;
mod display;
mod error;
mod exercise;
mod name;
mod service;
mod template;
mod training;
mod variant;
mod workout_session;

pub use block::*;
pub use display::*;
pub use error::*;
pub use exercise::*;
pub use name::*;
pub use service::*;
pub use template::*;
pub use training::*;
pub use variant::*;
pub use workout_session::*;
