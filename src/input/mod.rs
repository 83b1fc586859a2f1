//! Console command grammar.
//!
//! One function, [`parse_command`], turns a line of user text into an
//! [`AlarmRecord`] ready for the request queue. The grammar is
//! case-sensitive:
//!
//! ```text
//! Start_Alarm(<id>): Group(<gid>) <interval> <time> <message>
//! Change_Alarm(<id>): Group(<gid>) <time> <message>
//! Cancel_Alarm(<id>)
//! Suspend_Alarm(<id>)
//! Reactivate_Alarm(<id>)
//! View_Alarms
//! ```
//!
//! All integer fields must be strictly positive; messages are trimmed and
//! clamped to the configured byte limit on a character boundary. `quit` and
//! `exit` are not commands; the input loop handles them before parsing.

use crate::alarms::{AlarmRecord, RequestKind};
use crate::error::ParseError;

/// Parses one console line into a request record.
///
/// Returns [`ParseError::InvalidParameters`] when the shape matches but an
/// integer field is not strictly positive, and
/// [`ParseError::UnrecognizedFormat`] for everything else.
pub fn parse_command(line: &str, message_limit: usize) -> Result<AlarmRecord, ParseError> {
    let line = line.trim();

    if line == "View_Alarms" {
        return Ok(AlarmRecord::view());
    }

    if let Some((id, rest)) = paren_arg(line, "Start_Alarm") {
        let rest = expect_group_header(rest)?;
        let (gid, rest) = paren_arg(rest, "Group").ok_or(ParseError::UnrecognizedFormat)?;
        let (interval, rest) = take_int(rest)?;
        let (time, rest) = take_int(rest)?;
        let alarm_id = positive_u32(id)?;
        let group_id = positive_u32(gid)?;
        if interval <= 0 || time <= 0 {
            return Err(ParseError::InvalidParameters);
        }
        let message = clamp_message(rest, message_limit);
        return Ok(AlarmRecord::start(alarm_id, group_id, interval, time, message));
    }

    if let Some((id, rest)) = paren_arg(line, "Change_Alarm") {
        let rest = expect_group_header(rest)?;
        let (gid, rest) = paren_arg(rest, "Group").ok_or(ParseError::UnrecognizedFormat)?;
        let (time, rest) = take_int(rest)?;
        let alarm_id = positive_u32(id)?;
        let group_id = positive_u32(gid)?;
        if time <= 0 {
            return Err(ParseError::InvalidParameters);
        }
        let message = clamp_message(rest, message_limit);
        return Ok(AlarmRecord::change(alarm_id, group_id, time, message));
    }

    for (keyword, kind) in [
        ("Cancel_Alarm", RequestKind::Cancel),
        ("Suspend_Alarm", RequestKind::Suspend),
        ("Reactivate_Alarm", RequestKind::Reactivate),
    ] {
        if let Some((id, rest)) = paren_arg(line, keyword) {
            if !rest.trim().is_empty() {
                return Err(ParseError::UnrecognizedFormat);
            }
            return Ok(AlarmRecord::control(kind, positive_u32(id)?));
        }
    }

    Err(ParseError::UnrecognizedFormat)
}

/// Splits `Keyword(<arg>)<rest>`, returning the raw argument and the rest.
fn paren_arg<'a>(input: &'a str, keyword: &str) -> Option<(&'a str, &'a str)> {
    let rest = input.strip_prefix(keyword)?.strip_prefix('(')?;
    let close = rest.find(')')?;
    Some((&rest[..close], &rest[close + 1..]))
}

/// Consumes the `: ` between the id and the Group clause.
fn expect_group_header(rest: &str) -> Result<&str, ParseError> {
    rest.strip_prefix(':')
        .map(str::trim_start)
        .ok_or(ParseError::UnrecognizedFormat)
}

/// Takes the next whitespace-delimited token as a signed integer.
fn take_int(rest: &str) -> Result<(i64, &str), ParseError> {
    let rest = rest.trim_start();
    let end = rest
        .find(char::is_whitespace)
        .unwrap_or(rest.len());
    let (token, rest) = rest.split_at(end);
    let value = token
        .parse::<i64>()
        .map_err(|_| ParseError::UnrecognizedFormat)?;
    Ok((value, rest))
}

/// Parses a strictly positive id field.
fn positive_u32(token: &str) -> Result<u32, ParseError> {
    let value = token
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseError::UnrecognizedFormat)?;
    if value <= 0 || value > i64::from(u32::MAX) {
        return Err(ParseError::InvalidParameters);
    }
    Ok(value as u32)
}

/// Trims and clamps a message to `limit` bytes on a char boundary.
fn clamp_message(rest: &str, limit: usize) -> String {
    let msg = rest.trim();
    if msg.len() <= limit {
        return msg.to_string();
    }
    let mut end = limit;
    while !msg.is_char_boundary(end) {
        end -= 1;
    }
    msg[..end].to_string()
}
