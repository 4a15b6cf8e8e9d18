//! Plan ingestion
//!
//! Turns free-text goals into a validated [`Plan`](crate::domain::Plan):
//! prompt → completion call → fence stripping → decode → normalisation.
//! Each step is a separate module so it can be tested on its own.

mod decode;
mod error;
mod fence;
mod generator;
mod normalize;

pub use decode::decode_plan;
pub use error::{ErrorKind, PlanError};
pub use fence::strip_code_fence;
pub use generator::{MAX_TOKENS, PlanGenerator, TEMPERATURE};
pub use normalize::normalize;
