//! Describe command implementation
//!
//! Prints what `create` actually picked and the metrics at that size.

use anyhow::Result;
use plugfont::FontHost;

use super::create_font;
use crate::cli::DescribeArgs;

pub fn run(host: &FontHost, args: &DescribeArgs) -> Result<()> {
    let font = create_font(host, &args.font)?;
    let (desc, metrics) = host.try_describe(font)?;

    println!("face:               {}", desc.face.as_str().unwrap_or("?"));
    println!("family:             {}", desc.family.as_str());
    println!("size:               {}", desc.size);
    println!("weight:             {}", desc.weight.to_css());
    println!("italic:             {}", desc.italic);
    println!("small caps:         {}", desc.small_caps);
    println!("letter spacing:     {}", desc.letter_spacing);
    println!("word spacing:       {}", desc.word_spacing);
    println!("ascent:             {}", metrics.ascent);
    println!("descent:            {}", metrics.descent);
    println!("height:             {}", metrics.height);
    println!("line spacing:       {}", metrics.line_spacing);
    println!("x-height:           {}", metrics.x_height);
    println!("average char width: {}", metrics.average_char_width);
    Ok(())
}
