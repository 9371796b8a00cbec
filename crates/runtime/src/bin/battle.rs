//! Headless battle runner.
//!
//! Usage: `battle [scenario] [data_dir]`. Without a data directory the
//! built-in content is used. Prints the result as JSON on stdout.

use battle_content::ContentFactory;
use runtime::{Runtime, RuntimeConfig, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("info");

    let mut args = std::env::args().skip(1);
    let name = args.next().unwrap_or_else(|| "skirmish".to_string());
    let builder = match args.next() {
        Some(dir) => Runtime::builder().scenario(&ContentFactory::new(dir), &name)?,
        None => Runtime::builder().preset(&name)?,
    };

    let runtime = builder.config(RuntimeConfig::headless()).build()?;
    let result = runtime.join().await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
