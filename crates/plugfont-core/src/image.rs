//! Pixel buffers that text gets drawn into
//!
//! Images are 32-bit premultiplied-alpha, rows tightly packed. Two byte
//! orders are supported; [`ImageDataFormat::native`] is the one hosts
//! create by default.

use crate::error::{FontError, Result};
use crate::types::{Color, Rect, Size};

/// Largest edge we agree to allocate
pub const MAX_IMAGE_DIMENSION: i32 = 16384;

/// Byte order of a pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageDataFormat {
    Bgra8Premul,
    Rgba8Premul,
}

impl ImageDataFormat {
    /// Preferred format for this host
    pub const fn native() -> Self {
        ImageDataFormat::Bgra8Premul
    }

    /// Byte offsets of the red, green, blue and alpha channels
    const fn channel_offsets(self) -> [usize; 4] {
        match self {
            ImageDataFormat::Bgra8Premul => [2, 1, 0, 3],
            ImageDataFormat::Rgba8Premul => [0, 1, 2, 3],
        }
    }
}

/// Description of an image without its pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageDataDesc {
    pub format: ImageDataFormat,
    pub size: Size,
    /// Bytes per row
    pub stride: i32,
}

/// A premultiplied 32-bit pixel buffer
#[derive(Debug, Clone)]
pub struct ImageData {
    format: ImageDataFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageData {
    /// Allocate a zeroed (fully transparent) image
    pub fn new(format: ImageDataFormat, size: Size) -> Result<Self> {
        if size.width <= 0
            || size.height <= 0
            || size.width > MAX_IMAGE_DIMENSION
            || size.height > MAX_IMAGE_DIMENSION
        {
            return Err(FontError::InvalidImage(format!(
                "unsupported size {}x{}",
                size.width, size.height
            )));
        }
        let width = size.width as u32;
        let height = size.height as u32;
        Ok(Self {
            format,
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        })
    }

    /// Allocate an image filled with one straight-alpha colour
    pub fn filled(format: ImageDataFormat, size: Size, color: Color) -> Result<Self> {
        let mut image = Self::new(format, size)?;
        image.fill(color);
        Ok(image)
    }

    pub fn format(&self) -> ImageDataFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.width as usize * 4
    }

    pub fn describe(&self) -> ImageDataDesc {
        ImageDataDesc {
            format: self.format,
            size: Size::new(self.width as i32, self.height as i32),
            stride: self.stride() as i32,
        }
    }

    /// The whole image as a rectangle
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn fill(&mut self, color: Color) {
        let px = self.premultiplied_bytes(color);
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Premultiplied pixel at (x, y) as RGBA, regardless of storage order
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let [r, g, b, a] = self.format.channel_offsets();
        Some([
            self.data[idx + r],
            self.data[idx + g],
            self.data[idx + b],
            self.data[idx + a],
        ])
    }

    /// Un-premultiplied RGBA copy of the whole image, row-major
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let [ro, go, bo, ao] = self.format.channel_offsets();
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = px[ao] as u32;
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let unpremul = |c: u8| ((c as u32 * 255 + a / 2) / a).min(255) as u8;
            out.extend_from_slice(&[unpremul(px[ro]), unpremul(px[go]), unpremul(px[bo]), a as u8]);
        }
        out
    }

    /// Source-over blend of `color` with the same coverage on every channel
    pub fn blend_coverage(&mut self, x: u32, y: u32, color: Color, coverage: u8) {
        self.blend_subpixel_coverage(x, y, color, [coverage; 3]);
    }

    /// Source-over blend with separate red/green/blue coverage
    ///
    /// Alpha takes the strongest channel's coverage, which keeps opaque
    /// targets opaque.
    pub fn blend_subpixel_coverage(&mut self, x: u32, y: u32, color: Color, coverage: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let max_cov = coverage[0].max(coverage[1]).max(coverage[2]);
        if max_cov == 0 || color.a == 0 {
            return;
        }

        let idx = self.index(x, y);
        let [ro, go, bo, ao] = self.format.channel_offsets();
        let fa = color.a as u32;

        let channels = [
            (ro, color.r, coverage[0]),
            (go, color.g, coverage[1]),
            (bo, color.b, coverage[2]),
        ];
        for (offset, value, cov) in channels {
            let src_a = cov as u32 * fa / 255;
            let src = value as u32 * src_a / 255;
            let dst = self.data[idx + offset] as u32;
            self.data[idx + offset] = (src + dst * (255 - src_a) / 255).min(255) as u8;
        }

        let src_a = max_cov as u32 * fa / 255;
        let dst_a = self.data[idx + ao] as u32;
        self.data[idx + ao] = (src_a + dst_a * (255 - src_a) / 255).min(255) as u8;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    fn premultiplied_bytes(&self, color: Color) -> [u8; 4] {
        let a = color.a as u32;
        let premul = |c: u8| (c as u32 * a / 255) as u8;
        let mut px = [0u8; 4];
        let [ro, go, bo, ao] = self.format.channel_offsets();
        px[ro] = premul(color.r);
        px[go] = premul(color.g);
        px[bo] = premul(color.b);
        px[ao] = color.a;
        px
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_degenerate_sizes() {
        assert!(ImageData::new(ImageDataFormat::native(), Size::new(0, 10)).is_err());
        assert!(ImageData::new(ImageDataFormat::native(), Size::new(10, -1)).is_err());
        assert!(ImageData::new(
            ImageDataFormat::native(),
            Size::new(MAX_IMAGE_DIMENSION + 1, 1)
        )
        .is_err());
    }

    #[test]
    fn new_image_is_transparent() {
        let image = ImageData::new(ImageDataFormat::Rgba8Premul, Size::new(3, 2)).unwrap();
        assert_eq!(image.data().len(), 3 * 2 * 4);
        assert!(image.data().iter().all(|&b| b == 0));
        assert_eq!(image.stride(), 12);
    }

    #[test]
    fn pixel_reads_through_byte_order() {
        let red = Color::rgba(255, 0, 0, 255);
        let bgra = ImageData::filled(ImageDataFormat::Bgra8Premul, Size::new(1, 1), red).unwrap();
        let rgba = ImageData::filled(ImageDataFormat::Rgba8Premul, Size::new(1, 1), red).unwrap();
        assert_eq!(bgra.data(), &[0, 0, 255, 255]);
        assert_eq!(rgba.data(), &[255, 0, 0, 255]);
        assert_eq!(bgra.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(rgba.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(rgba.pixel(1, 0), None);
    }

    #[test]
    fn full_coverage_replaces_pixel() {
        let white = Color::white();
        let mut image =
            ImageData::filled(ImageDataFormat::Rgba8Premul, Size::new(1, 1), white).unwrap();
        image.blend_coverage(0, 0, Color::black(), 255);
        assert_eq!(image.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn zero_coverage_leaves_pixel_alone() {
        let white = Color::white();
        let mut image =
            ImageData::filled(ImageDataFormat::Rgba8Premul, Size::new(1, 1), white).unwrap();
        image.blend_coverage(0, 0, Color::black(), 0);
        assert_eq!(image.pixel(0, 0), Some([255, 255, 255, 255]));
    }

    #[test]
    fn subpixel_blend_keeps_opaque_target_opaque() {
        let white = Color::white();
        let mut image =
            ImageData::filled(ImageDataFormat::Bgra8Premul, Size::new(1, 1), white).unwrap();
        image.blend_subpixel_coverage(0, 0, Color::black(), [255, 128, 0]);
        let [r, g, b, a] = image.pixel(0, 0).unwrap();
        assert_eq!(a, 255);
        assert_eq!(r, 0);
        assert!(g > 100 && g < 160);
        assert_eq!(b, 255);
    }

    #[test]
    fn straight_rgba_unpremultiplies() {
        let mut image = ImageData::new(ImageDataFormat::Rgba8Premul, Size::new(1, 1)).unwrap();
        image.data_mut().copy_from_slice(&[64, 0, 0, 128]);
        assert_eq!(image.to_straight_rgba(), vec![128, 0, 0, 128]);
    }
}
