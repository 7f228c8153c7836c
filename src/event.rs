use std::fmt;

use crate::error::{GameError, Result};

/// A player command, parsed from chat-style input such as `/move 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Hunt,
    Battle,
    /// Zero-based index into the trainer's move list.
    Move(usize),
    Catch,
    EvYield,
    MyPokemon,
    MyStats,
}

impl Command {
    /// Commands are case-insensitive; move numbers are 1-based.
    pub fn parse(input: &str) -> Result<Command> {
        let mut parts = input.split_whitespace();
        let head = parts.next().unwrap_or_default().to_lowercase();

        match head.as_str() {
            "/hunt" => Ok(Command::Hunt),
            "/battle" => Ok(Command::Battle),
            "/catch" => Ok(Command::Catch),
            "/evyield" => Ok(Command::EvYield),
            "/mypokemon" => Ok(Command::MyPokemon),
            "/mystats" => Ok(Command::MyStats),
            "/move" => {
                let number = parts
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|&n| n >= 1)
                    .ok_or_else(|| GameError::InvalidArgument("Invalid move number!".to_string()))?;
                Ok(Command::Move(number - 1))
            }
            _ => Err(GameError::UnknownCommand(input.trim().to_string())),
        }
    }

    /// Whether the input names `/move`, whatever its argument.
    pub fn is_move(input: &str) -> bool {
        input
            .split_whitespace()
            .next()
            .is_some_and(|head| head.eq_ignore_ascii_case("/move"))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Hunt => write!(f, "/hunt"),
            Command::Battle => write!(f, "/battle"),
            Command::Move(index) => write!(f, "/move {}", index + 1),
            Command::Catch => write!(f, "/catch"),
            Command::EvYield => write!(f, "/evyield"),
            Command::MyPokemon => write!(f, "/mypokemon"),
            Command::MyStats => write!(f, "/mystats"),
        }
    }
}
