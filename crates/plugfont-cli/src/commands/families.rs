//! List installed families

use anyhow::Result;
use plugfont::FontHost;

pub fn run(host: &FontHost) -> Result<()> {
    let families = host.family_names();
    if families.is_empty() {
        eprintln!("No fonts installed");
    }
    for family in families {
        println!("{}", family);
    }
    Ok(())
}
