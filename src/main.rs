//! Cashier CLI
//!
//! Loads a stock file, plays a till script against it and prints one
//! transcript line per command.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- stock.csv script.csv
//! cargo run -- stock.csv < script.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity
//! - `CASHIER_PROMO_CODE`, `CASHIER_PROMO_RATE`, `CASHIER_PROMO_STACKABLE`:
//!   promotion redeemable at the till

use checkout_engine::{
    EngineError, InMemoryOrders, InMemoryStock, LocalServiceFactory, PromotionConfig, Result,
    Session,
};
use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;
use std::sync::Arc;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(EngineError::MissingArgument);
    }

    let promotion = PromotionConfig::from_env()?;
    let stock = InMemoryStock::from_csv(BufReader::new(File::open(&args[1])?))?;
    let orders = Arc::new(InMemoryOrders::new());
    let factory = LocalServiceFactory::new(Arc::new(stock), Arc::clone(&orders));

    let mut session = Session::new(&factory, promotion)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    match args.get(2) {
        Some(path) => session.process_csv(BufReader::new(File::open(path)?), &mut handle)?,
        None => session.process_csv(io::stdin().lock(), &mut handle)?,
    }

    let committed = orders.orders()?.len();
    writeln!(handle, "Orders committed: {}", committed)?;
    info!("{} command(s) run", session.commands_run());

    Ok(())
}
