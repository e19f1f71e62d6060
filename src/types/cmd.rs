use anyhow::Context;
use std::convert::TryFrom;
use std::fmt;
use std::fmt::Display;
use std::ops::RangeInclusive;

use crate::types::request::Direction;

/// A line of operator input.
///
/// ```text
/// n3f12      3 elevators serving 12 floors
/// e2f2,4-6   elevator 2 (1-based): floor buttons 2, 4, 5 and 6
/// f3u        hallway call on floor 3 going up (d for down)
/// m2         retire elevator 2
/// status
/// quit
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Initialize { elevators: u32, floors: u32 },
    Press {
        elevator: u32,
        floors: Vec<RangeInclusive<u32>>,
    },
    Call { floor: u32, direction: Direction },
    Retire(u32),
    Status,
    Quit,
}

impl Command {
    /// Highest floor the command touches, without expanding ranges.
    pub fn highest_floor(&self) -> Option<u32> {
        match self {
            Command::Press { floors, .. } => floors.iter().map(|range| *range.end()).max(),
            Command::Call { floor, .. } => Some(*floor),
            _ => None,
        }
    }
}

fn leading_number(input: &str) -> anyhow::Result<(u32, &str)> {
    let end = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, rest) = input.split_at(end);
    let number = digits
        .parse::<u32>()
        .with_context(|| format!("expected a number at '{input}'"))?;
    Ok((number, rest))
}

fn parse_floor_list(list: &str) -> anyhow::Result<Vec<RangeInclusive<u32>>> {
    let mut floors = Vec::new();
    for item in list.split(',') {
        let (start, end) = match item.split_once('-') {
            Some((start, end)) => (start, end),
            None => (item, item),
        };
        let start = start
            .parse::<u32>()
            .with_context(|| format!("failed to parse '{start}' as a floor"))?;
        let end = end
            .parse::<u32>()
            .with_context(|| format!("failed to parse '{end}' as a floor"))?;
        floors.push(start.min(end)..=start.max(end));
    }
    Ok(floors)
}

impl TryFrom<&str> for Command {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> anyhow::Result<Self> {
        let value = value.trim();
        match value {
            "status" => return Ok(Command::Status),
            "quit" => return Ok(Command::Quit),
            _ => {}
        }

        let Some(token) = value.chars().next() else {
            anyhow::bail!("empty command");
        };
        let rest = &value[token.len_utf8()..];

        match token {
            'n' => {
                let (elevators, rest) = leading_number(rest)?;
                let rest = rest.strip_prefix('f').context("expected 'f' after elevator count")?;
                let (floors, rest) = leading_number(rest)?;
                if !rest.is_empty() {
                    anyhow::bail!("trailing input '{rest}'");
                }
                Ok(Command::Initialize { elevators, floors })
            }
            'e' => {
                let (elevator, rest) = leading_number(rest)?;
                let list = rest.strip_prefix('f').context("expected 'f' after elevator number")?;
                Ok(Command::Press {
                    elevator,
                    floors: parse_floor_list(list)?,
                })
            }
            'f' => {
                let (floor, rest) = leading_number(rest)?;
                let direction = match rest {
                    "u" => Direction::Up,
                    "d" => Direction::Down,
                    other => anyhow::bail!("expected 'u' or 'd', got '{other}'"),
                };
                Ok(Command::Call { floor, direction })
            }
            'm' => {
                let (elevator, rest) = leading_number(rest)?;
                if !rest.is_empty() {
                    anyhow::bail!("trailing input '{rest}'");
                }
                Ok(Command::Retire(elevator))
            }
            other => anyhow::bail!("unknown command token: {other}"),
        }
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Initialize { elevators, floors } => write!(f, "n{elevators}f{floors}"),
            Command::Press { elevator, floors } => {
                let list: Vec<String> = floors
                    .iter()
                    .map(|range| {
                        if range.start() == range.end() {
                            range.start().to_string()
                        } else {
                            format!("{}-{}", range.start(), range.end())
                        }
                    })
                    .collect();
                write!(f, "e{elevator}f{}", list.join(","))
            }
            Command::Call { floor, direction } => match direction {
                Direction::Up => write!(f, "f{floor}u"),
                Direction::Down => write!(f, "f{floor}d"),
            },
            Command::Retire(elevator) => write!(f, "m{elevator}"),
            Command::Status => write!(f, "status"),
            Command::Quit => write!(f, "quit"),
        }
    }
}
