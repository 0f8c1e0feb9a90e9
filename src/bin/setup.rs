use anyhow::Result;
use tutr_reg::create_default_manager;

pub fn main() -> Result<()> {
    let mut manager = create_default_manager()?;

    manager.run_migrations()?;
    println!("Database schema is up to date.");

    Ok(())
}
