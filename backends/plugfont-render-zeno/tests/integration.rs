//! Integration tests for the Zeno rasterizer

use std::sync::Arc;

use plugfont_core::{
    traits::{FontRef, GlyphPlacement, Rasterizer, Shaper},
    types::{AntialiasMode, Color, DrawParams, Rect, Size},
    ImageData, ImageDataFormat, ShapingParams,
};
use plugfont_fontdb::Face;
use plugfont_render_zeno::ZenoRasterizer;
use plugfont_shape_hr::HarfrustShaper;

const WIDTH: i32 = 120;
const HEIGHT: i32 = 40;

fn noto() -> Arc<dyn FontRef> {
    Arc::new(Face::from_data(Arc::new(ttf_noto_sans::REGULAR.to_vec()), 0).unwrap())
}

fn placements(text: &str, font: &Arc<dyn FontRef>, x: f32, baseline: f32) -> Vec<GlyphPlacement> {
    let params = ShapingParams {
        size: 24.0,
        ..Default::default()
    };
    HarfrustShaper::new()
        .shape(text, font.clone(), &params)
        .unwrap()
        .glyphs
        .iter()
        .map(|g| GlyphPlacement {
            id: g.id,
            x: x + g.x,
            y: baseline - g.y,
        })
        .collect()
}

fn params(antialias: AntialiasMode) -> DrawParams {
    DrawParams {
        size: 24.0,
        color: Color::black(),
        antialias,
        clip: Rect::new(0, 0, WIDTH, HEIGHT),
        synthetic_bold: false,
        synthetic_oblique: false,
    }
}

fn blank() -> ImageData {
    ImageData::new(ImageDataFormat::Rgba8Premul, Size::new(WIDTH, HEIGHT)).unwrap()
}

fn inked_pixels(image: &ImageData) -> usize {
    let mut count = 0;
    for y in 0..image.height() {
        for x in 0..image.width() {
            if image.pixel(x, y).is_some_and(|p| p[3] > 0) {
                count += 1;
            }
        }
    }
    count
}

#[test]
fn test_draws_ink_around_baseline() {
    let font = noto();
    let mut image = blank();
    ZenoRasterizer::new()
        .draw(
            &placements("Hi", &font, 4.0, 30.0),
            font,
            &params(AntialiasMode::Grayscale),
            &mut image,
        )
        .unwrap();

    assert!(inked_pixels(&image) > 20);
    // Nothing below the baseline for "Hi" beyond antialiasing slop
    for y in 32..HEIGHT as u32 {
        for x in 0..WIDTH as u32 {
            assert_eq!(image.pixel(x, y).unwrap()[3], 0, "ink at {x},{y}");
        }
    }
}

#[test]
fn test_empty_glyph_list_is_ok() {
    let mut image = blank();
    ZenoRasterizer::new()
        .draw(&[], noto(), &params(AntialiasMode::Grayscale), &mut image)
        .unwrap();
    assert_eq!(inked_pixels(&image), 0);
}

#[test]
fn test_clip_limits_drawing() {
    let font = noto();
    let mut image = blank();
    let mut clipped = params(AntialiasMode::Grayscale);
    clipped.clip = Rect::new(0, 0, 10, HEIGHT);
    ZenoRasterizer::new()
        .draw(&placements("MMMM", &font, 0.0, 30.0), font, &clipped, &mut image)
        .unwrap();

    assert!(inked_pixels(&image) > 0);
    for y in 0..HEIGHT as u32 {
        for x in 10..WIDTH as u32 {
            assert_eq!(image.pixel(x, y).unwrap()[3], 0);
        }
    }
}

#[test]
fn test_clip_outside_image_draws_nothing() {
    let font = noto();
    let mut image = blank();
    let mut clipped = params(AntialiasMode::Grayscale);
    clipped.clip = Rect::new(500, 500, 10, 10);
    ZenoRasterizer::new()
        .draw(&placements("Hi", &font, 4.0, 30.0), font, &clipped, &mut image)
        .unwrap();
    assert_eq!(inked_pixels(&image), 0);
}

#[test]
fn test_no_antialias_gives_binary_coverage() {
    let font = noto();
    let mut image = blank();
    ZenoRasterizer::new()
        .draw(&placements("Os", &font, 4.0, 30.0), font, &params(AntialiasMode::None), &mut image)
        .unwrap();

    assert!(inked_pixels(&image) > 0);
    for y in 0..image.height() {
        for x in 0..image.width() {
            let alpha = image.pixel(x, y).unwrap()[3];
            assert!(alpha == 0 || alpha == 255, "partial alpha {alpha} at {x},{y}");
        }
    }
}

#[test]
fn test_subpixel_on_opaque_target_stays_opaque() {
    let font = noto();
    let mut image =
        ImageData::filled(ImageDataFormat::Bgra8Premul, Size::new(WIDTH, HEIGHT), Color::white())
            .unwrap();
    ZenoRasterizer::new()
        .draw(
            &placements("Os", &font, 4.0, 30.0),
            font,
            &params(AntialiasMode::Subpixel),
            &mut image,
        )
        .unwrap();

    let mut darkened = 0;
    for y in 0..image.height() {
        for x in 0..image.width() {
            let [r, g, b, a] = image.pixel(x, y).unwrap();
            assert_eq!(a, 255);
            if r < 255 || g < 255 || b < 255 {
                darkened += 1;
            }
        }
    }
    assert!(darkened > 0);
}

#[test]
fn test_synthetic_bold_adds_ink() {
    let font = noto();
    let rasterizer = ZenoRasterizer::new();
    let glyphs = placements("llll", &font, 4.0, 30.0);

    let mut regular = blank();
    rasterizer
        .draw(&glyphs, font.clone(), &params(AntialiasMode::Grayscale), &mut regular)
        .unwrap();

    let mut bold = blank();
    let mut bold_params = params(AntialiasMode::Grayscale);
    bold_params.synthetic_bold = true;
    rasterizer.draw(&glyphs, font, &bold_params, &mut bold).unwrap();

    assert!(inked_pixels(&bold) > inked_pixels(&regular));
}

#[test]
fn test_outlines_are_cached_and_cleared() {
    let font = noto();
    let rasterizer = ZenoRasterizer::new();
    let glyphs = placements("abab", &font, 0.0, 30.0);
    rasterizer
        .draw(&glyphs, font, &params(AntialiasMode::Grayscale), &mut blank())
        .unwrap();
    assert_eq!(rasterizer.cached_outlines(), 2);
    rasterizer.clear_cache();
    assert_eq!(rasterizer.cached_outlines(), 0);
}

#[test]
fn test_unknown_glyphs_fail_when_nothing_drawn() {
    let font = noto();
    let glyphs = [GlyphPlacement {
        id: 60_000,
        x: 0.0,
        y: 30.0,
    }];
    let result =
        ZenoRasterizer::new().draw(&glyphs, font, &params(AntialiasMode::Grayscale), &mut blank());
    assert!(result.is_err());
}

#[test]
fn test_huge_glyph_is_only_rasterized_inside_clip() {
    let font = noto();
    let id = placements("l", &font, 0.0, 0.0)[0].id;
    let mut huge = params(AntialiasMode::Grayscale);
    huge.size = 60_000.0;

    // Stem centred on the image, the glyph tens of thousands of pixels tall
    let mut image = blank();
    let covering = [GlyphPlacement {
        id,
        x: -7_680.0,
        y: 1_000.0,
    }];
    ZenoRasterizer::new()
        .draw(&covering, font.clone(), &huge, &mut image)
        .unwrap();
    assert!(inked_pixels(&image) > 0);

    let mut image = blank();
    let missing = [GlyphPlacement {
        id,
        x: 1_000_000.0,
        y: 1_000_000.0,
    }];
    ZenoRasterizer::new().draw(&missing, font, &huge, &mut image).unwrap();
    assert_eq!(inked_pixels(&image), 0);
}

#[test]
fn test_size_above_limit_is_rejected() {
    let font = noto();
    let mut too_big = params(AntialiasMode::Grayscale);
    too_big.size = 70_000.0;
    let result = ZenoRasterizer::new().draw(
        &placements("Hi", &font, 4.0, 30.0),
        font,
        &too_big,
        &mut blank(),
    );
    assert!(result.is_err());
}
