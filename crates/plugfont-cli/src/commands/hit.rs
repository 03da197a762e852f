//! Offset queries in both directions
//!
//! With `--x` the nearest caret index is printed, with `--index` the pixel
//! offset of that character. Without either, every caret position is listed.

use anyhow::Result;
use plugfont::FontHost;

use super::create_font;
use crate::cli::HitArgs;

pub fn run(host: &FontHost, args: &HitArgs) -> Result<()> {
    let font = create_font(host, &args.font)?;
    let run = args.text.run();

    match (args.x, args.index) {
        (Some(x), _) => {
            println!("{}", host.try_character_offset_for_pixel(font, &run, x)?);
        },
        (None, Some(index)) => {
            println!("{}", host.try_pixel_offset_for_character(font, &run, index)?);
        },
        (None, None) => {
            let count = args.text.text.chars().count() as u32;
            for index in 0..=count {
                let x = host.try_pixel_offset_for_character(font, &run, index)?;
                println!("{}\t{}", index, x);
            }
        },
    }
    Ok(())
}
