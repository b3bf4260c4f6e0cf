use std::fmt;

/// A code-point with its weight. Merge nodes carry no code-point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    code_point: Option<char>,
    freq: u64,
}

impl Symbol {
    pub fn new(code_point: char, freq: u64) -> Self {
        Self {
            code_point: Some(code_point),
            freq,
        }
    }

    pub(crate) fn internal(freq: u64) -> Self {
        Self {
            code_point: None,
            freq,
        }
    }

    pub fn code_point(&self) -> Option<char> {
        self.code_point
    }

    pub fn freq(&self) -> u64 {
        self.freq
    }

    pub fn is_internal(&self) -> bool {
        self.code_point.is_none()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code_point {
            Some(c) => write!(f, "'{}' ({})", c.escape_default(), self.freq),
            None => write!(f, "* ({})", self.freq),
        }
    }
}
