#![allow(dead_code)]

use chrono::{NaiveDate, NaiveDateTime};
use std::path::PathBuf;
use tempfile::TempDir;
use tradelens::domain::ledger::Ledger;
use tradelens::domain::trade::{Side, Trade};

pub const HEADER: &str = "entry_time,exit_time,side,entry_price,exit_price,size,pnl";

/// A small trade log spanning three days and two sides, rows not in time order.
pub const SAMPLE_LOG: &str = "entry_time,exit_time,side,entry_price,exit_price,size,pnl\n\
    2024-01-02 09:00:00,2024-01-02 09:45:00,long,100.0,103.0,1,3.0\n\
    2024-01-01 10:00:00,2024-01-01 10:30:00,long,100.0,110.0,1,10.0\n\
    2024-01-01 14:00:00,2024-01-01 15:00:00,short,110.0,114.0,1,-4.0\n\
    2024-01-03 09:00:00,2024-01-03 12:00:00,short,105.0,107.0,1,-2.0\n\
    2024-01-03 13:00:00,2024-01-03 13:10:00,long,104.0,105.0,1,1.0\n";

pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_trade(entry: &str, exit: &str, side: &str, pnl: f64) -> Trade {
    Trade {
        entry_time: at(entry),
        exit_time: at(exit),
        side: Side::new(side),
        entry_price: 100.0,
        exit_price: 100.0 + pnl,
        size: 1.0,
        pnl,
    }
}

pub fn make_ledger(trades: Vec<Trade>) -> Ledger {
    Ledger::from_trades(trades).unwrap()
}

pub fn sides(labels: &[&str]) -> Vec<Side> {
    labels.iter().map(Side::new).collect()
}

/// Writes `content` to `name` inside a fresh temp dir. Keep the dir alive
/// for as long as the file is needed.
pub fn write_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}
