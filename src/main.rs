mod command;
mod settings;

use crate::command::{Command, usage_text};
use crate::settings::Settings;
use log::debug;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match Command::parse(&args) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("{msg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    };

    match command {
        Command::Help => {
            println!("{}", usage_text());
            return Ok(());
        }
        Command::Version => {
            println!("ifpa {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    better_panic::install();
    sensible_env_logger::init!();

    let settings = Settings::load()?;
    let api = settings.client();
    debug!("using IFPA API at {}", api.base_url());

    let output = command.run(&api).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
