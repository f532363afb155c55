use finstat_core::batch::BatchResult;
use finstat_core::error::FinstatError;

pub fn print(result: &BatchResult) -> Result<(), FinstatError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
