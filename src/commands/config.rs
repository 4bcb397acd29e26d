use anyhow::Result;
use clap::Parser;

use super::ConfigArgs;

#[derive(Parser, Debug)]
pub struct ConfigCommand {
    #[command(flatten)]
    pub config: ConfigArgs,
}

pub async fn execute(cmd: ConfigCommand) -> Result<()> {
    let config = cmd.config.resolve()?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
