//! Suppliers command - list the registered supplier layouts.

use clap::Args;
use console::style;

use invoicer_core::registry;

/// Arguments for the suppliers command.
#[derive(Args)]
pub struct SuppliersArgs {
    /// Print the list as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(args: SuppliersArgs) -> anyhow::Result<()> {
    let registry = registry();

    if args.json {
        let names: Vec<_> = registry.suppliers().collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    println!("{}", style("Supported suppliers:").bold());
    for supplier in registry.suppliers() {
        let source = registry
            .get(supplier)
            .map(|descriptor| format!("{:?}", descriptor.text_source))
            .unwrap_or_default();
        println!("  {} {}", supplier, style(format!("({})", source.to_lowercase())).dim());
    }

    Ok(())
}
