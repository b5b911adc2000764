//! Scripted till session.
//!
//! Plays a command CSV against one cashier engine and one restock client that
//! share the same stock service, writing a line of transcript per command.

use crate::engine::{CashierEngine, Update};
use crate::error::Result;
use crate::factory::ServiceFactory;
use crate::order::OrderProcessor;
use crate::promotion::PromotionConfig;
use crate::restock::RestockClient;
use crate::script::{Command, CommandRecord};
use crate::stock::StockReadWriter;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::{Read, Write};

/// A till and a back-office client driven from one script.
pub struct Session<S, O> {
    engine: CashierEngine<S, O>,
    restock: RestockClient<S>,
    commands_run: usize,
}

impl<S, O> Session<S, O>
where
    S: StockReadWriter,
    O: OrderProcessor,
{
    /// Builds a session, obtaining each service handle from `factory`.
    pub fn new<F>(factory: &F, promotion: PromotionConfig) -> Result<Self>
    where
        F: ServiceFactory<Stock = S, Orders = O>,
    {
        let engine = CashierEngine::from_factory(factory, promotion)?;
        let restock = RestockClient::new(factory.make_stock_read_writer()?);
        Ok(Session {
            engine,
            restock,
            commands_run: 0,
        })
    }

    /// The till driven by this session.
    pub fn engine(&self) -> &CashierEngine<S, O> {
        &self.engine
    }

    /// Number of commands executed so far.
    pub fn commands_run(&self) -> usize {
        self.commands_run
    }

    /// Runs commands from a CSV reader, writing the transcript to `out`.
    ///
    /// Invalid records are logged at warn level and skipped.
    pub fn process_csv<R: Read, W: Write>(&mut self, reader: R, mut out: W) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        writeln!(out, "{}", self.engine.welcome().message)?;

        for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    if let Some(command) = record.parse() {
                        self.run(&command, row_num, &mut out)?;
                    } else {
                        warn!("Row {}: Failed to parse command record", row_num);
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Executes one command and writes `<command>: <message>`.
    ///
    /// An undo with nothing to undo writes nothing.
    pub fn run<W: Write>(&mut self, command: &Command, row: usize, out: &mut W) -> Result<()> {
        let update = match command {
            Command::Check(pn) => Some(self.engine.check(pn)),
            Command::Buy => Some(self.engine.buy()),
            Command::Finalize => Some(self.engine.finalize()),
            Command::Undo => self.engine.undo(),
            Command::Promotion(code) => Some(self.engine.apply_promotion(code)),
            Command::Tip(amount) => Some(self.engine.apply_tip(*amount)),
            Command::Query(pn) => Some(self.back_office(self.restock.query(pn))),
            Command::Restock {
                product_num,
                quantity,
            } => Some(self.back_office(self.restock.restock(product_num, quantity))),
            Command::Clear => Some(self.back_office(self.restock.clear())),
        };

        self.commands_run += 1;
        match update {
            Some(update) => {
                debug!("Row {}: {} -> {}", row, command, update.message);
                writeln!(out, "{}: {}", command, update.message)?;
            }
            None => debug!("Row {}: {} had nothing to do", row, command),
        }
        Ok(())
    }

    /// Wraps a back-office status line; the till's basket is unaffected.
    fn back_office(&self, message: String) -> Update {
        Update {
            message,
            basket: self.engine.basket().cloned(),
        }
    }
}
