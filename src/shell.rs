//! Interactive menu loop
//!
//! Reads a menu token, then whatever arguments that choice needs, runs one
//! query or a dump, and prints the result. An unknown token or end of input
//! ends the session; errors propagate and end it too.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::debug;

use crate::query;
use crate::storage;
use crate::types::{College, RankTable};

const MENU: &str = "Select an option
1. Search by name
2. Search by state
3. Search by city
4. Get a certain score
5. Get by score within ranges
6. Get by FICE code
7. Get by ID
8. Get all colleges in a certain rank
9. Dump data to JSON
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Name,
    State,
    City,
    Score,
    ScoreRange,
    Fice,
    Id,
    Rank,
    Dump,
}

impl MenuChoice {
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim() {
            "1" => Some(Self::Name),
            "2" => Some(Self::State),
            "3" => Some(Self::City),
            "4" => Some(Self::Score),
            "5" => Some(Self::ScoreRange),
            "6" => Some(Self::Fice),
            "7" => Some(Self::Id),
            "8" => Some(Self::Rank),
            "9" => Some(Self::Dump),
            _ => None,
        }
    }
}

pub struct Shell<R, W> {
    input: R,
    output: W,
    dump_path: PathBuf,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, dump_path: PathBuf) -> Self {
        Self {
            input,
            output,
            dump_path,
        }
    }

    /// Run until the user picks something off the menu (or input ends)
    pub fn run(&mut self, table: &RankTable) -> Result<()> {
        loop {
            write!(self.output, "{}", MENU)?;
            self.output.flush()?;

            let Some(token) = self.read_line()? else {
                break;
            };
            let Some(choice) = MenuChoice::parse(&token) else {
                debug!(token = %token.trim(), "leaving shell");
                break;
            };

            self.dispatch(choice, table)?;
            writeln!(self.output, "\n")?;
        }
        Ok(())
    }

    fn dispatch(&mut self, choice: MenuChoice, table: &RankTable) -> Result<()> {
        match choice {
            MenuChoice::Name => {
                let name = self.prompt("Enter the name to search: ")?;
                self.print_single(query::by_name(table, &name))
            }
            MenuChoice::State => {
                let state = self.prompt("Enter the state to search: ")?;
                self.print_json(&query::by_state(table, &state))
            }
            MenuChoice::City => {
                let city = self.prompt("Enter the city to search: ")?;
                self.print_json(&query::by_city(table, &city))
            }
            MenuChoice::Score => {
                let score = self.prompt_score("Enter score to match (1 decimal): ")?;
                self.print_json(&query::by_score(table, score))
            }
            MenuChoice::ScoreRange => {
                let min = self.prompt_score("Enter the minimum score (1 decimal): ")?;
                let max = self.prompt_score("Enter the maximum score (1 decimal): ")?;
                let hits = query::by_score_range(table, min, max)?;
                self.print_json(&hits)
            }
            MenuChoice::Fice => {
                let fice = self.prompt("Enter the FICE code: ")?;
                self.print_single(query::by_fice(table, &fice))
            }
            MenuChoice::Id => {
                let id = self.prompt("Enter the college ID: ")?;
                self.print_single(query::by_id(table, &id))
            }
            MenuChoice::Rank => {
                let rank = self.prompt("Enter the rank: ")?;
                for college in query::by_rank(table, &rank) {
                    writeln!(self.output, "{}", college.name)?;
                }
                Ok(())
            }
            MenuChoice::Dump => {
                let key = storage::dump(table, &self.dump_path, None)
                    .with_context(|| format!("Failed to dump data to {:?}", self.dump_path))?;
                writeln!(
                    self.output,
                    "dumped JSON data to {} under {}",
                    self.dump_path.display(),
                    key
                )?;
                Ok(())
            }
        }
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read from input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        match self.read_line()? {
            Some(line) => Ok(line),
            None => bail!("input ended while waiting for: {}", text.trim()),
        }
    }

    fn prompt_score(&mut self, text: &str) -> Result<f64> {
        let raw = self.prompt(text)?;
        raw.trim()
            .parse::<f64>()
            .with_context(|| format!("Not a score: {:?}", raw))
    }

    fn print_single(&mut self, college: Option<&College>) -> Result<()> {
        match college {
            Some(college) => self.print_json(college),
            None => {
                writeln!(self.output, "{{}}")?;
                Ok(())
            }
        }
    }

    fn print_json<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(self.output, "{}", json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), Some(MenuChoice::Name));
        assert_eq!(MenuChoice::parse(" 9 "), Some(MenuChoice::Dump));
        assert_eq!(MenuChoice::parse("10"), None);
        assert_eq!(MenuChoice::parse("q"), None);
        assert_eq!(MenuChoice::parse(""), None);
    }
}
