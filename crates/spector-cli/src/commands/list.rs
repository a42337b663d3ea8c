//! List command implementation.

use anyhow::Result;
use spector::Spector;

/// Run the list command
pub fn run(spector: &Spector) -> Result<()> {
    let signatures = spector.signatures();

    println!(
        "{:<16} {:<8} {:<48} {:>6} {:>6}",
        "NAME", "EXT", "MIME", "BLOCKS", "BYTES"
    );
    for signature in signatures {
        println!(
            "{:<16} {:<8} {:<48} {:>6} {:>6}",
            signature.name(),
            signature.extension(),
            signature.mime(),
            signature.blocks().len(),
            signature.total_block_size()
        );
    }
    println!();
    println!(
        "{} signatures from {} providers",
        signatures.len(),
        spector.provider_names().len()
    );

    Ok(())
}
