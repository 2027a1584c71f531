#![allow(dead_code)]

use sextant::{Catalog, Connection, Error, Flavor, Result, Row, Value};

use std::collections::VecDeque;

/// Connection recording every statement it receives and answering queries
/// from a queue of canned results.
#[derive(Debug)]
pub struct Recorder {
    flavor: Flavor,
    pub log: Vec<(String, Vec<Value>)>,
    pub results: VecDeque<Vec<Row>>,
    pub catalog: Catalog,

    /// Statements answered with a driver error
    pub failing: Vec<&'static str>,
}

impl Recorder {
    pub fn new(flavor: Flavor) -> Recorder {
        Recorder {
            flavor,
            log: vec![],
            results: VecDeque::new(),
            catalog: Catalog::new(),
            failing: vec![],
        }
    }

    /// Queues the rows returned by the next non-transaction statement.
    pub fn respond(&mut self, rows: Vec<Row>) {
        self.results.push_back(rows);
    }

    pub fn statements(&self) -> Vec<&str> {
        self.log.iter().map(|(sql, _)| sql.as_str()).collect()
    }
}

impl Connection for Recorder {
    fn flavor(&self) -> Flavor {
        self.flavor
    }

    fn execute(&mut self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        self.log.push((sql.to_string(), args.to_vec()));

        if self.failing.iter().any(|failing| *failing == sql) {
            return Err(Error::driver(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("cannot run `{sql}`"),
            )));
        }

        if matches!(sql, "BEGIN" | "COMMIT" | "ROLLBACK") {
            return Ok(vec![]);
        }
        Ok(self.results.pop_front().unwrap_or_default())
    }

    fn catalog(&mut self) -> Result<Catalog> {
        Ok(self.catalog.clone())
    }
}
