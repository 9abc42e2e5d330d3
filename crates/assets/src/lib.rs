//! Sitcom Simulator Asset Acquisition
//!
//! Turns asset references in a script into local files inside the run's
//! work directory:
//! - [`AssetFetcher`]: plain HTTP download of a URL
//! - [`ImageResolver`]: clip images (existing path, URL, or debug stand-in)
//! - [`resolve_music`]: background music track
//!
//! Image and music failures degrade the output instead of aborting it.

pub mod fetch;
pub mod images;
pub mod music;

pub use fetch::{url_extension, AssetFetcher};
pub use images::{ImageCallback, ImageEngine, ImageResolver};
pub use music::resolve_music;
