// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Frame file I/O for the host client
//!
//! Frames on the wire are square 8-bit grayscale images of `side * side`
//! bytes. Files may be headerless dumps (`.raw`/`.bin`, or `.hex` text) of a
//! square source image, or any format the `image` crate decodes. Sources that
//! do not match the wire size are centre-cropped or centre-padded with black.

use std::fs;
use std::path::{Path, PathBuf};

use image::GrayImage;
use thiserror::Error;
use tracing::debug;

/// Extensions picked up by [`list_frames`]
pub const SUPPORTED_EXTENSIONS: &[&str] = &[
    "raw", "bin", "hex", "png", "jpg", "jpeg", "bmp", "tif", "tiff",
];

/// Result type for frame file operations
pub type FrameIoResult<T> = Result<T, FrameIoError>;

/// Frame file errors
#[derive(Debug, Error)]
pub enum FrameIoError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid hex dump {}: {source}", path.display())]
    Hex {
        path: PathBuf,
        #[source]
        source: hex::FromHexError,
    },

    #[error("{} holds {actual} bytes, expected {expected}", path.display())]
    SizeMismatch {
        path: PathBuf,
        actual: usize,
        expected: usize,
    },
}

/// How a frame file is encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// Headerless 8-bit pixels
    Raw,
    /// Headerless 8-bit pixels as hex text (whitespace ignored)
    Hex,
    /// Anything the `image` crate decodes
    Image,
}

impl FrameFormat {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("raw") | Some("bin") => Self::Raw,
            Some("hex") => Self::Hex,
            _ => Self::Image,
        }
    }
}

/// Load one frame, fitted to `side * side`
///
/// # Arguments
/// * `side` - Wire frame side
/// * `source_side` - Side of headerless sources (defaults to `side`)
pub fn load_frame(path: &Path, side: usize, source_side: Option<usize>) -> FrameIoResult<Vec<u8>> {
    let (pixels, width, height) = match FrameFormat::from_path(path) {
        FrameFormat::Raw => {
            let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
            headerless(path, bytes, source_side.unwrap_or(side))?
        }
        FrameFormat::Hex => {
            let text = fs::read_to_string(path).map_err(|source| io_error(path, source))?;
            let digits: String = text.chars().filter(|c| !c.is_whitespace()).collect();
            let bytes = hex::decode(digits).map_err(|source| FrameIoError::Hex {
                path: path.to_path_buf(),
                source,
            })?;
            headerless(path, bytes, source_side.unwrap_or(side))?
        }
        FrameFormat::Image => {
            let gray = image::open(path)
                .map_err(|source| FrameIoError::Image {
                    path: path.to_path_buf(),
                    source,
                })?
                .to_luma8();
            let (width, height) = (gray.width() as usize, gray.height() as usize);
            (gray.into_raw(), width, height)
        }
    };

    if (width, height) != (side, side) {
        debug!(
            "[FRAME-IO] fitting {} from {}x{} to {}x{}",
            path.display(),
            width,
            height,
            side,
            side
        );
    }
    Ok(center_fit(&pixels, width, height, side))
}

fn headerless(path: &Path, bytes: Vec<u8>, side: usize) -> FrameIoResult<(Vec<u8>, usize, usize)> {
    let expected = side * side;
    if bytes.len() != expected {
        return Err(FrameIoError::SizeMismatch {
            path: path.to_path_buf(),
            actual: bytes.len(),
            expected,
        });
    }
    Ok((bytes, side, side))
}

/// Centre `width x height` pixels on a black `side x side` canvas
///
/// Each axis is cropped when the source is larger and padded when smaller.
/// Odd margins put the extra pixel on the right/bottom. `pixels` must hold
/// `width * height` bytes.
pub fn center_fit(pixels: &[u8], width: usize, height: usize, side: usize) -> Vec<u8> {
    debug_assert_eq!(pixels.len(), width * height);

    let (src_x, dst_x, copy_w) = fit_axis(width, side);
    let (src_y, dst_y, copy_h) = fit_axis(height, side);

    let mut out = vec![0u8; side * side];
    for row in 0..copy_h {
        let src = (src_y + row) * width + src_x;
        let dst = (dst_y + row) * side + dst_x;
        out[dst..dst + copy_w].copy_from_slice(&pixels[src..src + copy_w]);
    }
    out
}

/// (source offset, destination offset, span) along one axis
fn fit_axis(source: usize, side: usize) -> (usize, usize, usize) {
    if source >= side {
        ((source - side) / 2, 0, side)
    } else {
        (0, (side - source) / 2, source)
    }
}

/// Write a frame as raw bytes or, for image extensions, an 8-bit grayscale image
pub fn save_frame(path: &Path, frame: &[u8], side: usize) -> FrameIoResult<()> {
    let expected = side * side;
    if frame.len() != expected {
        return Err(FrameIoError::SizeMismatch {
            path: path.to_path_buf(),
            actual: frame.len(),
            expected,
        });
    }

    match FrameFormat::from_path(path) {
        FrameFormat::Raw => fs::write(path, frame).map_err(|source| io_error(path, source)),
        FrameFormat::Hex => {
            fs::write(path, hex::encode(frame)).map_err(|source| io_error(path, source))
        }
        FrameFormat::Image => {
            let image = GrayImage::from_raw(side as u32, side as u32, frame.to_vec())
                .ok_or_else(|| FrameIoError::SizeMismatch {
                    path: path.to_path_buf(),
                    actual: frame.len(),
                    expected,
                })?;
            image.save(path).map_err(|source| FrameIoError::Image {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Frame files in `dir`, sorted by file name
pub fn list_frames(dir: &Path) -> FrameIoResult<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| io_error(dir, source))?;

    let mut frames = Vec::new();
    for entry in entries {
        let path = entry.map_err(|source| io_error(dir, source))?.path();
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| SUPPORTED_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && supported {
            frames.push(path);
        }
    }

    frames.sort();
    Ok(frames)
}

fn io_error(path: &Path, source: std::io::Error) -> FrameIoError {
    FrameIoError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_crop_matches_strided_window() {
        // 6x6 ramp cropped to 4x4 keeps rows/cols 1..5
        let pixels: Vec<u8> = (0..36).collect();
        let out = center_fit(&pixels, 6, 6, 4);
        assert_eq!(&out[..4], &[7, 8, 9, 10]);
        assert_eq!(&out[12..], &[25, 26, 27, 28]);
    }

    #[test]
    fn test_center_pad_puts_odd_margin_last() {
        // 1x1 white dot on a 4x4 canvas lands at (1, 1)
        let out = center_fit(&[255], 1, 1, 4);
        assert_eq!(out.iter().filter(|&&p| p == 255).count(), 1);
        assert_eq!(out[4 + 1], 255);
    }

    #[test]
    fn test_mixed_axes() {
        // Wide strip: cropped horizontally, padded vertically
        let pixels = vec![9u8; 8 * 2];
        let out = center_fit(&pixels, 8, 2, 4);
        let rows: Vec<&[u8]> = out.chunks(4).collect();
        assert_eq!(rows[0], &[0, 0, 0, 0]);
        assert_eq!(rows[1], &[9, 9, 9, 9]);
        assert_eq!(rows[2], &[9, 9, 9, 9]);
        assert_eq!(rows[3], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(FrameFormat::from_path(Path::new("a/Door_001.RAW")), FrameFormat::Raw);
        assert_eq!(FrameFormat::from_path(Path::new("f.hex")), FrameFormat::Hex);
        assert_eq!(FrameFormat::from_path(Path::new("f.png")), FrameFormat::Image);
    }
}
