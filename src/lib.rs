//! Brighten, resize and watermark a directory of photos.
//!
//! Every photo is brightened in HSV space, fitted to a fixed canvas (756x756
//! by default) and blended with a semi-transparent watermark whose alpha
//! channel acts as an inverse mask. The watermark is loaded once and shared by
//! every file in the batch.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use photo_watermark::{ProcessOptions, WatermarkEngine, DEFAULT_WATERMARK_PATH};
//!
//! let engine = WatermarkEngine::new(Path::new(DEFAULT_WATERMARK_PATH), ProcessOptions::default())
//!     .expect("failed to load watermark");
//! let photo = image::open("shoe.png").unwrap().to_rgb8();
//! let marked = engine.apply(&photo).unwrap();
//! marked.save("0-shoe.png").unwrap();
//! ```
//!
//! # Building blocks
//!
//! The two pixel transforms are usable on their own:
//!
//! ```
//! use image::{Rgb, RgbImage, Rgba, RgbaImage};
//! use photo_watermark::{blending, brightness};
//!
//! let base = RgbImage::from_pixel(4, 4, Rgb([237, 237, 237]));
//! let base = brightness::adjust_brightness(&base, 18);
//! let overlay = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 255, 128]));
//! let out = blending::composite(&base, &overlay).unwrap();
//! assert_eq!(*out.get_pixel(0, 0), Rgb([127, 127, 254]));
//! ```

#![deny(missing_docs)]

pub mod blending;
pub mod brightness;
mod engine;
pub mod error;
pub mod resize;

pub use brightness::DEFAULT_BRIGHTNESS_DELTA;
pub use engine::{
    discover_images, indexed_output_path, is_supported_image, save_image, ProcessOptions,
    ProcessResult, WatermarkEngine, DEFAULT_CANVAS_SIZE, DEFAULT_WATERMARK_PATH, JPEG_QUALITY,
};
pub use error::{Error, Result};
pub use resize::ResampleFilter;
