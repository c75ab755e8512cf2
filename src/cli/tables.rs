//! The `tables` command: inspect the built-in reference tables.

use clap::Subcommand;

use crate::tables::ReferenceTables;

#[derive(Subcommand, Debug, Clone)]
pub enum TablesCommand {
    /// Materials catalog with unit prices
    Materials,
    /// Code minimums by climate zone
    Codes,
    /// Labor rates by trade
    Labor,
    /// Permit fee schedule by building type
    Permits,
}

pub fn run(command: TablesCommand) -> anyhow::Result<()> {
    let tables = ReferenceTables::builtin()?;

    match command {
        TablesCommand::Materials => {
            println!("{:<24} {:>10} {:>8}  name", "key", "price", "unit");
            for (key, entry) in tables.materials.sorted() {
                println!(
                    "{:<24} {:>10} {:>8}  {}",
                    key,
                    entry.unit_price,
                    entry.unit.to_string(),
                    entry.name
                );
            }
        }
        TablesCommand::Codes => {
            println!(
                "{:<5} {:>10} {:>8} {:>10}  name",
                "zone", "ceiling R", "wall R", "BTU/sqft"
            );
            for (zone, req) in tables.codes.sorted() {
                println!(
                    "{:<5} {:>10} {:>8} {:>10}  {}",
                    zone, req.ceiling_r, req.wall_r, req.hvac_btu_per_sqft, req.name
                );
            }
        }
        TablesCommand::Labor => {
            println!("{:<16} {:>8} {:>12}  basis", "trade", "rate", "hrs/unit");
            for (trade, rate) in tables.labor.sorted() {
                println!(
                    "{:<16} {:>8} {:>12}  {}",
                    trade, rate.hourly_rate, rate.hours_per_unit, rate.basis
                );
            }
        }
        TablesCommand::Permits => {
            println!("{:<16} {:>10} {:>10}", "building type", "base", "per sqft");
            for (key, fee) in tables.permits.sorted() {
                println!("{:<16} {:>10} {:>10}", key, fee.base_fee, fee.per_sqft);
            }
        }
    }

    Ok(())
}
