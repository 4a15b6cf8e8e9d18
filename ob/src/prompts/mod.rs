//! Prompt Template System
//!
//! Renders the `.pmt` (prompt template) that asks the model for a plan.
//! Templates are compiled into the binary and use Handlebars syntax for
//! variable substitution.

pub mod embedded;
mod renderer;

pub use renderer::{PlanPromptContext, PromptRenderer};
