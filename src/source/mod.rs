//! Film (source image) handling
//!
//! The camera always has exactly one current film: the user-loaded local
//! file if there is one, otherwise the default remote image. References are
//! handed out as `Arc<ImageRef>` so a print can keep the film it was shot on
//! even after the user loads another one.

pub mod fetch;
pub mod image_source;

pub use fetch::{FilmFetcher, HttpFilmFetcher};
pub use image_source::{ImageRef, ImageSource};
