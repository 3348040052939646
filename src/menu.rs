//! Interactive text menu.
//!
//! The menu is generic over its input and output so it can be driven by a
//! terminal or by scripted input in tests.

use anyhow::Result;
use std::io::{BufRead, Write};
use tracing::debug;

use crate::analyzers::aggregate::SeriesTable;
use crate::chart::{DEFAULT_BAR_WIDTH, Metric, render_bar_chart, render_occupancy_relation};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[1;1H";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Price,
    Rating,
    Occupancy,
    Exit,
}

impl Choice {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Choice::Price),
            "2" => Some(Choice::Rating),
            "3" => Some(Choice::Occupancy),
            "0" => Some(Choice::Exit),
            _ => None,
        }
    }
}

pub struct Menu<'a> {
    city: &'a str,
    table: &'a SeriesTable,
    bar_width: usize,
}

impl<'a> Menu<'a> {
    pub fn new(city: &'a str, table: &'a SeriesTable) -> Self {
        Self {
            city,
            table,
            bar_width: DEFAULT_BAR_WIDTH,
        }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width;
        self
    }

    /// Runs until the user picks `0` or input ends.
    pub fn run<R: BufRead, W: Write>(&self, input: &mut R, out: &mut W) -> Result<()> {
        loop {
            write!(out, "{CLEAR_SCREEN}")?;
            self.print_options(out)?;
            write!(out, "Select which graphic you would like to see: ")?;
            out.flush()?;

            let Some(line) = read_line(input)? else {
                writeln!(out)?;
                return Ok(());
            };

            let choice = Choice::parse(&line);
            debug!(input = %line.trim(), ?choice, "Menu selection");

            let chart = match choice {
                Some(Choice::Exit) => return Ok(()),
                Some(Choice::Price) => render_bar_chart(
                    self.table,
                    Metric::Price,
                    "Price by Room Type by Neighbourhood",
                    self.bar_width,
                ),
                Some(Choice::Rating) => render_bar_chart(
                    self.table,
                    Metric::Rating,
                    "Rating by Room Type by Neighbourhood",
                    self.bar_width,
                ),
                Some(Choice::Occupancy) => render_occupancy_relation(self.table, self.bar_width),
                None => {
                    write!(out, "{CLEAR_SCREEN}")?;
                    writeln!(out, "The selected option is not valid. Please select a valid option.")?;
                    writeln!(out)?;
                    if !pause(input, out)? {
                        return Ok(());
                    }
                    continue;
                }
            };

            write!(out, "{CLEAR_SCREEN}")?;
            writeln!(out, "{chart}")?;
            if !pause(input, out)? {
                return Ok(());
            }
        }
    }

    fn print_options<W: Write>(&self, out: &mut W) -> Result<()> {
        let title = format!("Data Analysis for {}", self.city);
        writeln!(out, "{title}")?;
        writeln!(out, "{}", "-".repeat(title.chars().count()))?;
        writeln!(out, "1) Price by Room Type by Neighbourhood")?;
        writeln!(out, "2) Rating by Room Type by Neighbourhood")?;
        writeln!(out, "3) Occupancy by Room Type by Neighbourhood")?;
        writeln!(out, "   and its relation with Price and Rating")?;
        writeln!(out, "0) Exit")?;
        Ok(())
    }
}

/// Reads one line; `None` at end of input.
fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    let bytes = input.read_line(&mut line)?;
    if bytes == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// Waits for Enter. Returns `false` if input ended instead.
fn pause<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "Press \"Enter\" to continue...")?;
    out.flush()?;
    Ok(read_line(input)?.is_some())
}
