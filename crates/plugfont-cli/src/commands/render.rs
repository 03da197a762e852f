//! Render command implementation
//!
//! Sizes an image to the measured run plus margin, draws the run on its
//! baseline and writes straight-alpha RGBA PNG.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use anyhow::{bail, Context, Result};
use plugfont::{Color, FontHost, ImageData, ImageDataFormat, Point, Size};

use super::{create_font, CLI_MODULE};
use crate::cli::RenderArgs;

pub fn run(host: &FontHost, args: &RenderArgs) -> Result<()> {
    let foreground = parse_color(&args.foreground)?;
    let background = parse_color(&args.background)?;

    let font = create_font(host, &args.font)?;
    let (_, metrics) = host.try_describe(font)?;
    let run = args.text.run();
    let width = host.try_measure_text(font, &run)?;

    let margin = i32::try_from(args.margin).unwrap_or(i32::MAX);
    let size = Size::new(
        width.max(1).saturating_add(margin.saturating_mul(2)),
        metrics.height.saturating_add(margin.saturating_mul(2)),
    );
    let image = host.create_image_data(CLI_MODULE, ImageDataFormat::Rgba8Premul, size, true);
    if image.is_null() {
        bail!("Cannot allocate a {}x{} image", size.width, size.height);
    }
    host.with_image_data(image, |data| data.fill(background))?;

    let opaque = background.a == 255;
    let origin = Point::new(margin, margin.saturating_add(metrics.ascent));
    host.try_draw_text_at(font, image, &run, &origin, foreground.to_argb(), None, opaque)?;
    log::info!(
        "Drew {:?} into {}x{} (opaque: {})",
        args.text.text,
        size.width,
        size.height,
        opaque
    );

    host.with_image_data(image, |data| write_png(&args.output, data))??;
    eprintln!(
        "Rendered {}x{} to {}",
        size.width,
        size.height,
        args.output.display()
    );
    Ok(())
}

fn write_png(path: &Path, image: &ImageData) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.to_straight_rgba())?;
    writer.finish()?;
    Ok(())
}

/// `RRGGBB` or `RRGGBBAA`, with or without a leading `#`
fn parse_color(color_str: &str) -> Result<Color> {
    let hex = color_str.trim_start_matches('#');
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        bail!("Color must be in RRGGBB or RRGGBBAA format: {}", color_str);
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .with_context(|| format!("Invalid color format: {}", color_str))
    };
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("FF8000").unwrap(), Color::rgba(255, 128, 0, 255));
        assert_eq!(parse_color("#00000080").unwrap(), Color::rgba(0, 0, 0, 128));
        assert!(parse_color("F00").is_err());
        assert!(parse_color("GG0000").is_err());
    }
}
