use std::fs;
use std::path::Path;

use crate::error::{Result, SchedulerError};
use crate::scheduler::job::JobSpec;

/// Parse a commands file into job specs.
///
/// One job per line: the first token is the job id, an optional second
/// token that parses as an integer is the requested slot count (default 1),
/// and the remainder is the command text. A slot count is only recognized
/// when a command follows it. Everything after a `#` is a comment; blank
/// lines are skipped.
pub fn load_commands_file(path: &Path) -> Result<Vec<JobSpec>> {
    let text = fs::read_to_string(path)?;
    parse_commands(&text)
}

pub fn parse_commands(text: &str) -> Result<Vec<JobSpec>> {
    let mut specs = Vec::new();
    for (lineno, raw) in text.lines().enumerate() {
        let line = match raw.find('#') {
            Some(pos) => &raw[..pos],
            None => raw,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (id, rest) = line.split_once(char::is_whitespace).ok_or_else(|| {
            SchedulerError::MalformedSpec {
                line: lineno + 1,
                reason: "expected an id followed by a command".to_string(),
            }
        })?;
        let rest = rest.trim_start();

        let (requested_slots, command) = match rest.split_once(char::is_whitespace) {
            Some((first, tail)) if first.chars().all(|c| c.is_ascii_digit()) => {
                let slots: u32 =
                    first
                        .parse()
                        .map_err(|_| SchedulerError::MalformedSpec {
                            line: lineno + 1,
                            reason: format!("invalid slot count {first:?}"),
                        })?;
                if slots == 0 {
                    return Err(SchedulerError::InvalidSlotCount { id: id.to_string() });
                }
                (slots, tail.trim_start())
            }
            _ => (1, rest),
        };

        if command.is_empty() {
            return Err(SchedulerError::MalformedSpec {
                line: lineno + 1,
                reason: "missing command".to_string(),
            });
        }

        specs.push(JobSpec {
            id: id.to_string(),
            command: command.to_string(),
            requested_slots,
        });
    }
    Ok(specs)
}
