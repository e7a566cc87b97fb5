use crate::error::{EntryError, ParseError};
use crate::models::spend::{NewSpend, SpendBuilder};
use crate::operations::date::{RawDate, parse_date_parts, resolve_date};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::{self, BufRead, Write};
use std::str::FromStr;
use tracing::debug;

/// Typing this at any text prompt abandons the entry.
pub const CANCEL_SENTINEL: &str = "cancel";

/// Line-based question and answer channel used by the entry workflow.
pub trait Prompt {
    /// Shows `question` and returns the trimmed answer.
    fn ask(&mut self, question: &str) -> Result<String, EntryError>;

    fn say(&mut self, message: &str);
}

pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, question: &str) -> Result<String, EntryError> {
        print!("{}", question);
        io::stdout().flush()?;
        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Err(EntryError::Input(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            )));
        }
        Ok(input.trim().to_string())
    }

    fn say(&mut self, message: &str) {
        println!("{}", message);
    }
}

/// Walks the user through one spending entry.
///
/// Cost and date integers each get one retry. Any other failure, or the
/// cancel sentinel, ends the attempt without producing a record.
pub fn create_spend<P: Prompt>(
    prompt: &mut P,
    today: NaiveDate,
) -> Result<NewSpend, EntryError> {
    prompt.say(&format!(
        "If at any time you would like to cancel the data entry,\nplease enter '{}' when prompted for text",
        CANCEL_SENTINEL
    ));

    let cost = read_cost(prompt)?;
    let industry = read_text(
        prompt,
        "Which type of industry is this? e.g. transport, restaurant, pub ",
    )?;
    let business = read_text(prompt, "Where did you purchase your item e.g., Sainsbury's ")?;
    let items = read_text(prompt, "Which items did you buy? ")?;
    let note = read_text(
        prompt,
        "Any extra information you'd like to give surrounding this purchase? ",
    )?;
    let date = read_date(prompt, today)?;

    let spend = SpendBuilder::new()
        .date(date)
        .industry(&industry)
        .business(&business)
        .items(&items)
        .cost(cost)
        .note(&note)
        .build()?;

    debug!(?spend, "Entry complete");
    Ok(spend)
}

fn read_text<P: Prompt>(prompt: &mut P, question: &str) -> Result<String, EntryError> {
    let answer = prompt.ask(question)?.to_lowercase();
    if answer == CANCEL_SENTINEL {
        return Err(EntryError::Cancelled);
    }
    Ok(answer)
}

fn read_cost<P: Prompt>(prompt: &mut P) -> Result<Decimal, EntryError> {
    let first = prompt.ask("How much did you spend? £")?;
    if let Ok(cost) = parse_cost(&first) {
        return Ok(cost);
    }
    let second = prompt.ask("That was not a number, try again: ")?;
    Ok(parse_cost(&second)?)
}

fn parse_cost(raw: &str) -> Result<Decimal, ParseError> {
    let trimmed = raw.trim().trim_start_matches('£');
    Decimal::from_str(trimmed)
        .map(|cost| cost.round_dp(2))
        .map_err(|_| ParseError::InvalidCost(raw.to_string()))
}

fn read_date<P: Prompt>(prompt: &mut P, today: NaiveDate) -> Result<NaiveDate, EntryError> {
    let was_today = prompt.ask("Was this purchase made today? Please enter 'yes' or 'no' ")?;
    if was_today.eq_ignore_ascii_case("yes") {
        return Ok(resolve_date(today, true, None)?);
    }

    prompt.say("Please provide the date of the purchase (in number format): ");
    let mut answers = DateAnswers::ask(prompt)?;
    if let Err(err) = parse_date_parts(answers.as_raw()) {
        debug!(%err, "Retrying date entry");
        prompt.say("Please provide integer values only, try again");
        answers = DateAnswers::ask(prompt)?;
    }
    // A second non-integer answer, or a date missing from the calendar, fails here.
    Ok(resolve_date(today, false, Some(answers.as_raw()))?)
}

struct DateAnswers {
    year: String,
    month: String,
    day: String,
}

impl DateAnswers {
    fn ask<P: Prompt>(prompt: &mut P) -> Result<Self, EntryError> {
        Ok(Self {
            year: prompt.ask("Year: ")?,
            month: prompt.ask("Month (provided in number format): ")?,
            day: prompt.ask("Day (enter the day of the month): ")?,
        })
    }

    fn as_raw(&self) -> RawDate<'_> {
        RawDate {
            year: &self.year,
            month: &self.month,
            day: &self.day,
        }
    }
}
