//! Motion commands and their one-character wire codes.

use std::fmt;
use std::str::FromStr;

/// A discrete motion command.
///
/// Declaration order is significant: majority-vote ties resolve to the
/// variant with the lowest index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Forward,
    Backward,
    Left,
    Right,
    Stop,
}

impl Command {
    pub const ALL: [Command; 5] = [
        Command::Forward,
        Command::Backward,
        Command::Left,
        Command::Right,
        Command::Stop,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Wire code sent to the vehicle.
    #[inline]
    pub const fn code(self) -> char {
        match self {
            Command::Forward => 'f',
            Command::Backward => 'b',
            Command::Left => 'l',
            Command::Right => 'r',
            Command::Stop => 's',
        }
    }

    /// Human-readable label for overlays and logs.
    pub const fn label(self) -> &'static str {
        match self {
            Command::Forward => "Forward",
            Command::Backward => "Backward",
            Command::Left => "Left",
            Command::Right => "Right",
            Command::Stop => "Stop",
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code() == code.to_ascii_lowercase())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Parses a wire code (`f`) or a label (`forward`, case-insensitive).
impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let mut chars = t.chars();
        if let (Some(c), None) = (chars.next(), chars.next())
            && let Some(cmd) = Self::from_code(c)
        {
            return Ok(cmd);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(t))
            .ok_or_else(|| format!("unknown command {t:?} (expected one of f, b, l, r, s)"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_code() {
        for c in Command::ALL {
            assert_eq!(Command::from_code(c.code()), Some(c));
        }
        assert_eq!(Command::from_code('x'), None);
    }

    #[test]
    fn indices_follow_declaration_order() {
        let idx: Vec<usize> = Command::ALL.iter().map(|c| c.index()).collect();
        assert_eq!(idx, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn parses_codes_and_labels() {
        assert_eq!("f".parse::<Command>(), Ok(Command::Forward));
        assert_eq!("R".parse::<Command>(), Ok(Command::Right));
        assert_eq!("backward".parse::<Command>(), Ok(Command::Backward));
        assert_eq!(" Stop ".parse::<Command>(), Ok(Command::Stop));
        assert!("jump".parse::<Command>().is_err());
    }
}
