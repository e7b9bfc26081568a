// Thresholds command handler
use anyhow::Result;

use crate::commands::OutputContext;
use crate::store::DashboardStore;

/// Print the reference bands. These are display values only; the
/// classifier uses its own fixed cut-offs.
pub fn handle_thresholds_command(store: &DashboardStore, output: &OutputContext) -> Result<()> {
    let rendered = output.render(store.thresholds())?;
    println!("{}", rendered);
    if !output.json {
        println!("Reference values only; quality tiers use fixed classification cut-offs.");
    }
    Ok(())
}
