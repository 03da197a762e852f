use anyhow::Result;
use plugfont::FontHost;

use super::create_font;
use crate::cli::MeasureArgs;

pub fn run(host: &FontHost, args: &MeasureArgs) -> Result<()> {
    let font = create_font(host, &args.font)?;
    let width = host.try_measure_text(font, &args.text.run())?;
    println!("{}", width);
    Ok(())
}
