//! Sitcom Simulator Script Model
//!
//! Defines the data contracts shared by every pipeline stage:
//! - **Character:** a name bound to a provider voice
//! - **Clip:** one timeline unit (dialogue line, title card, still image)
//! - **Script:** characters + clips in play order + metadata, stored as TOML
//!
//! Values are immutable in practice: stages return updated copies built with
//! the `with_*` constructors rather than editing in place.

pub mod character;
pub mod clip;
pub mod script;

pub use character::*;
pub use clip::*;
pub use script::*;
