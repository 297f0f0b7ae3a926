//! A line-oriented command language for driving an interval map
//!
//! ```text
//! # comments and blank lines are skipped
//! new a
//! assign 3 5 b
//! lookup 4
//! print
//! expect [-inf:a][3:b][5:a]
//! ```

use std::{fmt, num::ParseIntError, str::FromStr};

use tracing::{debug, trace};

use crate::CompressedIntervalMap;

/// The map type scripts operate on
pub type ScriptMap = CompressedIntervalMap<i64, String>;

#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    #[error("Unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{cmd} takes {expected} argument(s), got {got}")]
    Arity {
        cmd: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("Invalid key {0:?}")]
    BadKey(String, #[source] ParseIntError),
    #[error("Expected {expected}, got {actual}")]
    Mismatch { expected: String, actual: String },
}

#[derive(Debug, thiserror::Error)]
#[error("Error on line {line}: {kind}")]
pub struct Error {
    pub line: usize,
    #[source]
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    New(String),
    Assign(i64, i64, String),
    Lookup(i64),
    Print,
    Expect(String),
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New(v) => write!(f, "new {v}"),
            Self::Assign(b, e, v) => write!(f, "assign {b} {e} {v}"),
            Self::Lookup(k) => write!(f, "lookup {k}"),
            Self::Print => f.write_str("print"),
            Self::Expect(r) => write!(f, "expect {r}"),
        }
    }
}

fn parse_key(s: &str) -> Result<i64, ErrorKind> {
    s.parse().map_err(|e| ErrorKind::BadKey(s.into(), e))
}

fn arity<'a, const N: usize>(
    cmd: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], ErrorKind> {
    <[&str; N]>::try_from(args).map_err(|_| ErrorKind::Arity {
        cmd,
        expected: N,
        got: args.len(),
    })
}

impl FromStr for Command {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut toks = s.split_whitespace();
        let cmd = toks.next().unwrap_or_default();
        let args: Vec<_> = toks.collect();

        Ok(match cmd {
            "new" => {
                let [v] = arity::<1>("new", &args)?;
                Self::New(v.into())
            },
            "assign" => {
                let [b, e, v] = arity::<3>("assign", &args)?;
                Self::Assign(parse_key(b)?, parse_key(e)?, v.into())
            },
            "lookup" => {
                let [k] = arity::<1>("lookup", &args)?;
                Self::Lookup(parse_key(k)?)
            },
            "print" => {
                let [] = arity::<0>("print", &args)?;
                Self::Print
            },
            "expect" => {
                let [r] = arity::<1>("expect", &args)?;
                Self::Expect(r.into())
            },
            c => return Err(ErrorKind::UnknownCommand(c.into())),
        })
    }
}

/// Parse a script into its commands, tagged with 1-based line numbers
///
/// # Errors
/// Returns the first line that fails to parse.
pub fn parse(src: &str) -> Result<Vec<(usize, Command)>, Error> {
    src.lines()
        .enumerate()
        .filter_map(|(i, l)| {
            let l = l.split_once('#').map_or(l, |(l, _)| l).trim();
            (!l.is_empty()).then_some((i + 1, l))
        })
        .map(|(line, l)| {
            l.parse::<Command>()
                .map(|c| (line, c))
                .map_err(|kind| Error { line, kind })
        })
        .collect()
}

/// Execution state for a script
#[derive(Debug, Clone)]
pub struct Interpreter {
    map: ScriptMap,
}

impl Interpreter {
    #[must_use]
    pub fn new(base: String) -> Self {
        Self {
            map: ScriptMap::new(base),
        }
    }

    #[inline]
    #[must_use]
    pub fn map(&self) -> &ScriptMap { &self.map }

    /// Run one command, returning the line it emits, if any
    ///
    /// # Errors
    /// Fails if an `expect` command does not match the current map.
    pub fn exec(&mut self, cmd: Command) -> Result<Option<String>, ErrorKind> {
        trace!(%cmd, "Executing");

        Ok(match cmd {
            Command::New(base) => {
                self.map = ScriptMap::new(base);
                None
            },
            Command::Assign(begin, end, val) => {
                self.map.assign(begin, end, val);
                debug!(breakpoints = self.map.len(), "Assigned {begin}..{end}");
                None
            },
            Command::Lookup(key) => Some(self.map.lookup(&key).clone()),
            Command::Print => Some(self.map.to_string()),
            Command::Expect(expected) => {
                let actual = self.map.to_string();
                if actual != expected {
                    return Err(ErrorKind::Mismatch { expected, actual });
                }
                None
            },
        })
    }

    /// Parse and run a whole script, collecting emitted lines alongside the
    /// command that produced them
    ///
    /// # Errors
    /// Stops at the first line that fails to parse or execute.
    pub fn run(&mut self, src: &str) -> Result<Vec<(Command, String)>, Error> {
        let mut out = vec![];

        for (line, cmd) in parse(src)? {
            if let Some(s) = self.exec(cmd.clone()).map_err(|kind| Error { line, kind })? {
                out.push((cmd, s));
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const WALKTHROUGH: &str = include_str!("../scripts/walkthrough.txt");

    #[test]
    fn walkthrough_script() {
        let mut interp = Interpreter::new("a".into());
        let out = interp.run(WALKTHROUGH).unwrap();

        assert!(interp.map().is_empty());
        assert_eq!(
            out.into_iter().map(|(_, s)| s).collect::<Vec<_>>(),
            ["b", "a", "[-inf:a][0:b][10:c][30:a]"]
        );
    }

    #[test]
    fn parse_commands() {
        assert_eq!(
            parse("  assign -3 5 xy # trailing\n\n# only a comment\nprint\nlookup 7").unwrap(),
            [
                (1, Command::Assign(-3, 5, "xy".into())),
                (4, Command::Print),
                (5, Command::Lookup(7)),
            ]
        );
    }

    #[test]
    fn parse_errors() {
        let err = parse("print\nfrobnicate 1").unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(err.kind, ErrorKind::UnknownCommand(ref c) if c == "frobnicate"));

        let err = parse("assign 1 2").unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Arity {
            cmd: "assign",
            expected: 3,
            got: 2
        }));

        let err = parse("\n\nlookup twelve").unwrap_err();
        assert_eq!(err.line, 3);
        assert!(matches!(err.kind, ErrorKind::BadKey(ref k, _) if k == "twelve"));
    }

    #[test]
    fn expect_mismatch() {
        let mut interp = Interpreter::new("a".into());
        let err = interp
            .run("assign 3 5 b\nexpect [-inf:a][3:b][5:a]\nexpect [-inf:a]")
            .unwrap_err();

        assert_eq!(err.line, 3);
        match err.kind {
            ErrorKind::Mismatch { expected, actual } => {
                assert_eq!(expected, "[-inf:a]");
                assert_eq!(actual, "[-inf:a][3:b][5:a]");
            },
            k => panic!("unexpected error {k:?}"),
        }
    }

    #[test]
    fn new_resets_map() {
        let mut interp = Interpreter::new("a".into());
        let out = interp.run("assign 0 4 b\nnew z\nprint\nlookup 2").unwrap();

        assert_eq!(out, [
            (Command::Print, "[-inf:z]".to_owned()),
            (Command::Lookup(2), "z".to_owned()),
        ]);
    }

    #[test]
    fn command_display_roundtrips() {
        for cmd in [
            Command::New("q".into()),
            Command::Assign(-1, 9, "v".into()),
            Command::Lookup(0),
            Command::Print,
            Command::Expect("[-inf:a]".into()),
        ] {
            assert_eq!(cmd.to_string().parse::<Command>().unwrap(), cmd);
        }
    }
}
