//! Batch watermarking engine.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage, RgbaImage};
use log::{debug, info, warn};

use crate::blending;
use crate::brightness::{self, DEFAULT_BRIGHTNESS_DELTA};
use crate::error::{Error, Result};
use crate::resize::{self, ResampleFilter};

/// Default edge length of the square output canvas.
pub const DEFAULT_CANVAS_SIZE: u32 = 756;

/// Default location of the watermark asset, relative to the working directory.
pub const DEFAULT_WATERMARK_PATH: &str = "./watermark/DP-Watermark.png";

/// JPEG quality used when writing `.jpg`/`.jpeg` outputs.
pub const JPEG_QUALITY: u8 = 95;

/// Extensions picked up by [`discover_images`], in discovery order.
const SUPPORTED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Options controlling the per-image pipeline.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Value-channel increase applied before resizing.
    pub brightness: u8,
    /// Output canvas width in pixels.
    pub canvas_width: u32,
    /// Output canvas height in pixels.
    pub canvas_height: u32,
    /// Filter used to fit the photo and the watermark onto the canvas.
    pub filter: ResampleFilter,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS_DELTA,
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            filter: ResampleFilter::default(),
        }
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the source file.
    pub path: PathBuf,
    /// Path the watermarked image was written to, if any.
    pub output: Option<PathBuf>,
    /// Position of the file in the batch, when processed as part of one.
    pub index: Option<usize>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    fn failed(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            output: None,
            index: None,
            success: false,
            message,
        }
    }
}

/// The watermarking engine holding the canvas-sized watermark.
///
/// Create once and reuse for every image in a batch. The watermark is decoded
/// and resized at construction and never modified afterwards.
pub struct WatermarkEngine {
    watermark: RgbaImage,
    opts: ProcessOptions,
}

impl WatermarkEngine {
    /// Load the watermark asset from `path` and prepare it for `opts`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WatermarkLoad`] if the file cannot be decoded,
    /// [`Error::WatermarkMissingAlpha`] if it has no alpha channel, and
    /// [`Error::InvalidCanvas`] if the canvas has a zero dimension.
    pub fn new(path: &Path, opts: ProcessOptions) -> Result<Self> {
        let decoded = image::open(path).map_err(|source| Error::WatermarkLoad {
            path: path.to_path_buf(),
            source,
        })?;
        if !decoded.color().has_alpha() {
            return Err(Error::WatermarkMissingAlpha(path.to_path_buf()));
        }
        debug!(
            "loaded watermark {} ({}x{}, {:?})",
            path.display(),
            decoded.width(),
            decoded.height(),
            decoded.color()
        );
        Self::from_image(&decoded.to_rgba8(), opts)
    }

    /// Build an engine from an in-memory watermark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCanvas`] if the canvas has a zero dimension and
    /// [`Error::Resize`] if the watermark cannot be resampled.
    pub fn from_image(watermark: &RgbaImage, opts: ProcessOptions) -> Result<Self> {
        if opts.canvas_width == 0 || opts.canvas_height == 0 {
            return Err(Error::InvalidCanvas {
                width: opts.canvas_width,
                height: opts.canvas_height,
            });
        }

        let watermark = resize::resize(
            watermark,
            opts.canvas_width,
            opts.canvas_height,
            opts.filter,
        )?;
        Ok(Self { watermark, opts })
    }

    /// The watermark, already resized to the canvas.
    #[must_use]
    pub fn watermark(&self) -> &RgbaImage {
        &self.watermark
    }

    /// The options this engine was built with.
    #[must_use]
    pub fn options(&self) -> &ProcessOptions {
        &self.opts
    }

    /// Brighten `base`, fit it to the canvas and composite the watermark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Resize`] if resampling fails and
    /// [`Error::DimensionMismatch`] if the resized photo does not match the
    /// watermark.
    pub fn apply(&self, base: &RgbImage) -> Result<RgbImage> {
        let brighter = brightness::adjust_brightness(base, self.opts.brightness);
        let fitted = resize::resize(
            &brighter,
            self.opts.canvas_width,
            self.opts.canvas_height,
            self.opts.filter,
        )?;
        blending::composite(&fitted, &self.watermark)
    }

    fn try_process_file(&self, input: &Path, output: &Path) -> Result<()> {
        info!("Loading: {}", input.display());
        let decoded = image::open(input).map_err(|source| Error::Decode {
            path: input.to_path_buf(),
            source,
        })?;

        let watermarked = self.apply(&decoded.to_rgb8())?;

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        info!("Adding wm: {}", output.display());
        save_image(&watermarked, output)
    }

    /// Process a single image file: load, brighten, resize, watermark, save.
    ///
    /// Returns a [`ProcessResult`] describing success or failure; errors are
    /// reported in the result rather than propagated.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path) -> ProcessResult {
        match self.try_process_file(input, output) {
            Ok(()) => ProcessResult {
                path: input.to_path_buf(),
                output: Some(output.to_path_buf()),
                index: None,
                success: true,
                message: "Watermark added".to_string(),
            },
            Err(e) => {
                warn!("{}: {e}", input.display());
                ProcessResult::failed(input, e.to_string())
            }
        }
    }

    /// Process all supported images in a directory.
    ///
    /// Files are numbered from 0 in discovery order and written as
    /// `<index>-<name>` into `output_dir`, or next to the originals when no
    /// output directory is given. A failing file does not stop the batch.
    /// When writing in place, a file whose output name matches another input
    /// (e.g. `a.png` at index 1 next to `1-a.png`) is reported as failed
    /// instead of overwriting that input.
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
    ) -> Vec<ProcessResult> {
        let files = match discover_images(input_dir) {
            Ok(files) => files,
            Err(e) => {
                return vec![ProcessResult::failed(
                    input_dir,
                    format!("Failed to read directory: {e}"),
                )];
            }
        };

        let output_dir = output_dir.unwrap_or(input_dir);
        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![ProcessResult::failed(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        debug!("found {} image(s) in {}", files.len(), input_dir.display());

        // Writing in place must not overwrite a file another job still has to read.
        let in_place = output_dir == input_dir
            || matches!(
                (input_dir.canonicalize(), output_dir.canonicalize()),
                (Ok(a), Ok(b)) if a == b
            );
        let is_batch_input = |output: &Path| {
            in_place
                && files
                    .iter()
                    .any(|f| f.file_name().is_some() && f.file_name() == output.file_name())
        };

        let run = |(index, input): (usize, &PathBuf)| {
            let output = indexed_output_path(output_dir, index, input);
            let mut result = if is_batch_input(&output) {
                warn!("{}: output would overwrite a batch input", output.display());
                ProcessResult::failed(
                    input,
                    format!(
                        "Output {} is also an input of this batch; use a separate output directory",
                        output.display()
                    ),
                )
            } else {
                self.process_file(input, &output)
            };
            result.index = Some(index);
            result
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            files.par_iter().enumerate().map(run).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            files.iter().enumerate().map(run).collect()
        }
    }
}

/// Check if a file has a supported image extension.
///
/// Matching is case-sensitive: `photo.png` is accepted, `photo.PNG` is not.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

/// List the images in `dir` in processing order.
///
/// Files ending in `.png` come first, then `.jpg`, then `.jpeg`; within each
/// group files are sorted by name. Symlinks are followed, and hidden files
/// (names starting with `.`) are skipped.
///
/// # Errors
///
/// Returns [`Error::Io`] if the directory cannot be read.
pub fn discover_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut candidates = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(OsStr::to_str)
            .is_some_and(|name| name.starts_with('.'));
        if !hidden && is_supported_image(&path) && path.is_file() {
            candidates.push(path);
        }
    }
    candidates.sort();

    let mut files = Vec::with_capacity(candidates.len());
    for ext in SUPPORTED_EXTENSIONS {
        files.extend(
            candidates
                .iter()
                .filter(|p| p.extension() == Some(OsStr::new(ext)))
                .cloned(),
        );
    }
    Ok(files)
}

/// Build the output path for the `index`-th file of a batch.
///
/// Example: index `3` and `"shoes/red.png"` become `"<dir>/3-red.png"`.
#[must_use]
pub fn indexed_output_path(dir: &Path, index: usize, input: &Path) -> PathBuf {
    let name = input.file_name().unwrap_or_default().to_string_lossy();
    dir.join(format!("{index}-{name}"))
}

/// Save an RGB image, choosing the encoder from the file extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for extensions other than PNG and
/// JPEG, and [`Error::Encode`] or [`Error::Io`] if writing fails.
pub fn save_image(img: &RgbImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;
    let encode_err = |source: image::ImageError| Error::Encode {
        path: path.to_path_buf(),
        source,
    };

    match format {
        ImageFormat::Jpeg => {
            let file = std::io::BufWriter::new(std::fs::File::create(path)?);
            let mut encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(file, JPEG_QUALITY);
            encoder.encode_image(img).map_err(encode_err)?;
        }
        ImageFormat::Png => {
            img.save_with_format(path, ImageFormat::Png)
                .map_err(encode_err)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}
