use anyhow::Context;
use foldercopy::{AuditLog, Config};
use tracing::Level;

fn main() -> anyhow::Result<()> {
    foldercopy::logging::init_tracing(Level::WARN);

    // Unusable config files fall back to defaults inside `load`; only a
    // missing base directory gets here as an error.
    let config = Config::load().context("Failed to resolve configuration")?;
    let audit = AuditLog::beside_program().context("Failed to open audit log")?;

    // A failed copy is reported on stdout and still exits 0.
    foldercopy::commands::run::run(&config, &audit).context("Failed to write audit log")?;

    Ok(())
}
