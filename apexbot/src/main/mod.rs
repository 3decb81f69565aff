use flexi_logger::Logger;
use std::io::{self, BufRead};

use apexbot::prelude::*;

mod bot;
mod config;
mod context;
mod message;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?.start()?;

    let config = config::load()?;
    let bot = bot::Apexbot::new(&config);

    for (name, conf) in config.module {
        if let Err(e) = bot.load_module(&name, conf) {
            error!("{} failed: {:#}", name, e);
        }
    }

    info!("reading commands from stdin");
    for line in io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        bot.handle(line);
    }

    Ok(())
}
