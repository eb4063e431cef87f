use tracing::{debug, warn};

/// One catalog object as published: a name line followed by the two element lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TleRecord {
    pub name: String,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    pub fn new(name: impl Into<String>, line1: impl Into<String>, line2: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line1: line1.into(),
            line2: line2.into(),
        }
    }
}

enum Expect {
    Name,
    Line1 { name: String },
    Line2 { name: String, line1: String },
}

fn is_line1(line: &str) -> bool {
    line.starts_with("1 ")
}

fn is_line2(line: &str) -> bool {
    line.starts_with("2 ")
}

/// Splits a three-line element catalog into records.
///
/// Blank lines are ignored wherever they occur. A record that breaks off early is
/// dropped and parsing resynchronises on the next name line, so one damaged entry
/// costs only itself.
pub fn parse_catalog(text: &str) -> Vec<TleRecord> {
    let mut records = Vec::new();
    let mut dropped = 0usize;
    let mut state = Expect::Name;

    for raw in text.lines() {
        let line = raw.trim_end();
        if line.trim().is_empty() {
            continue;
        }

        state = match state {
            Expect::Name if is_line1(line) || is_line2(line) => {
                debug!(line, "element line without a name");
                dropped += 1;
                Expect::Name
            }
            Expect::Name => Expect::Line1 {
                name: line.trim().to_string(),
            },
            Expect::Line1 { name } if is_line1(line) => Expect::Line2 {
                name,
                line1: line.to_string(),
            },
            Expect::Line1 { name } => {
                debug!(%name, "record broke off before line 1");
                dropped += 1;
                resync(line, &mut dropped)
            }
            Expect::Line2 { name, line1 } if is_line2(line) => {
                records.push(TleRecord::new(name, line1, line));
                Expect::Name
            }
            Expect::Line2 { name, .. } => {
                debug!(%name, "record broke off before line 2");
                dropped += 1;
                resync(line, &mut dropped)
            }
        };
    }

    if let Expect::Line1 { name } | Expect::Line2 { name, .. } = state {
        debug!(%name, "catalog ended inside a record");
        dropped += 1;
    }
    if dropped > 0 {
        warn!(dropped, parsed = records.len(), "dropped malformed catalog entries");
    }
    records
}

/// Restarts parsing at a line that did not fit the current record.
fn resync(line: &str, dropped: &mut usize) -> Expect {
    if is_line1(line) || is_line2(line) {
        *dropped += 1;
        Expect::Name
    } else {
        Expect::Line1 {
            name: line.trim().to_string(),
        }
    }
}
