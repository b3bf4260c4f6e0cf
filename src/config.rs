use crate::error::{Error, Result};

/// Code given to the only symbol of a one-symbol alphabet, whose leaf is
/// also the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SingleSymbolCode {
    /// Path length zero
    #[default]
    Empty,
    /// A lone `0`
    SingleBit,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Cap on live nodes in the Huffman tree (2n - 1 for n symbols).
    pub node_limit: Option<usize>,
    pub single_symbol: SingleSymbolCode,
}

impl Config {
    /// Pulls `--single-bit` and `--node-limit=N` out of `args` and returns
    /// the positional arguments that are left.
    pub fn from_args<I>(args: I) -> Result<(Self, Vec<String>)>
    where
        I: IntoIterator<Item = String>,
    {
        let mut config = Config::default();
        let mut positional = Vec::new();

        for arg in args {
            if arg == "--single-bit" {
                config.single_symbol = SingleSymbolCode::SingleBit;
            } else if let Some(value) = arg.strip_prefix("--node-limit=") {
                let limit = value.parse::<usize>().map_err(|e| {
                    Error::invalid_argument(format!("--node-limit={value}: {e}"))
                })?;
                config.node_limit = Some(limit);
            } else if arg.starts_with("--") {
                return Err(Error::invalid_argument(format!("unknown flag {arg}")));
            } else {
                positional.push(arg);
            }
        }

        Ok((config, positional))
    }
}
