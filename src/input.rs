use std::str::FromStr;

use thiserror::Error;

use crate::venue::Venue;
use crate::Client;

/// Problems found while reading a schedule. Line numbers start at 1.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    /// A header line is missing.
    #[error("line {line}: missing {what}")]
    Missing {
        /// Line that was expected.
        line: usize,
        /// What that line should have held.
        what: &'static str,
    },

    /// A number could not be parsed.
    #[error("line {line}: invalid {what} {value:?}")]
    Number {
        /// Offending line.
        line: usize,
        /// Name of the field.
        what: &'static str,
        /// Text that failed to parse.
        value: String,
    },

    /// A client line does not have exactly four fields.
    #[error("line {line}: expected 4 comma-separated fields, found {found}")]
    Fields {
        /// Offending line.
        line: usize,
        /// Number of fields present.
        found: usize,
    },
}

/// A parsed schedule: the hall and the clients visiting it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    /// The hall being booked.
    pub venue: Venue,
    /// Clients in input order.
    pub clients: Vec<Client>,
}

fn number<T: FromStr>(text: &str, line: usize, what: &'static str) -> Result<T, InputError> {
    text.trim().parse().map_err(|_| InputError::Number {
        line,
        what,
        value: text.trim().to_string(),
    })
}

/// Parse a schedule.
///
/// The first line names the hall, the second gives the number of clients,
/// each following line reads `name,arrival_ms,service_ms,requested_seat`.
pub fn parse(text: &str) -> Result<Schedule, InputError> {
    let mut lines = text.lines().map(|l| l.trim_end_matches('\r'));

    let name = lines
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(InputError::Missing { line: 1, what: "theater name" })?;
    let count: usize = match lines.next() {
        Some(count) => number(count, 2, "client count")?,
        None => return Err(InputError::Missing { line: 2, what: "client count" }),
    };

    // the count is untrusted, never reserve more than the text can hold
    let mut clients = Vec::with_capacity(count.min(text.lines().count()));
    for i in 0..count {
        let line = i + 3;
        let text = lines.next().ok_or(InputError::Missing { line, what: "client" })?;
        let fields: Vec<&str> = text.split(',').collect();
        if fields.len() != 4 {
            return Err(InputError::Fields { line, found: fields.len() });
        }
        clients.push(Client::new(
            fields[0].trim(),
            number(fields[1], line, "arrival time")?,
            number(fields[2], line, "service time")?,
            number(fields[3], line, "seat")?,
        ));
    }

    Ok(Schedule {
        venue: Venue::from_name(name),
        clients,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn full_schedule() {
        let schedule = parse("OdaTiyatrosu\n2\nClient1,0,50,5\nClient2, 10 ,50,5\n\n").unwrap();
        assert_eq!(schedule.venue, Venue::with_capacity("OdaTiyatrosu", 60));
        assert_eq!(
            schedule.clients,
            vec![Client::new("Client1", 0, 50, 5), Client::new("Client2", 10, 50, 5)]
        );
        assert_eq!(schedule.clients[1].arrival, Duration::from_millis(10));
    }

    #[test]
    fn windows_line_endings() {
        let schedule = parse("UskudarStudyoSahne\r\n1\r\nClient1,1,2,3\r\n").unwrap();
        assert_eq!(schedule.venue.capacity, 80);
        assert_eq!(schedule.clients[0].requested_seat, 3);
    }

    #[test]
    fn unknown_hall_gets_default_capacity() {
        let schedule = parse("Somewhere\n0\n").unwrap();
        assert_eq!(schedule.venue.capacity, 200);
        assert!(schedule.clients.is_empty());
    }

    #[test]
    fn out_of_range_seat_is_kept() {
        let schedule = parse("OdaTiyatrosu\n1\nClient1,0,0,-3\n").unwrap();
        assert_eq!(schedule.clients[0].requested_seat, -3);
    }

    #[test]
    fn errors() {
        assert_eq!(parse(""), Err(InputError::Missing { line: 1, what: "theater name" }));
        assert_eq!(parse("Hall"), Err(InputError::Missing { line: 2, what: "client count" }));
        assert_eq!(
            parse("Hall\ntwo\n"),
            Err(InputError::Number { line: 2, what: "client count", value: "two".to_string() })
        );
        assert_eq!(
            parse("Hall\n2\nClient1,0,0,1\n"),
            Err(InputError::Missing { line: 4, what: "client" })
        );
        assert_eq!(
            parse("Hall\n18446744073709551615\nc,0,0,1\n"),
            Err(InputError::Missing { line: 4, what: "client" })
        );
        assert_eq!(
            parse("Hall\n1000000000\n"),
            Err(InputError::Missing { line: 3, what: "client" })
        );
        assert_eq!(parse("Hall\n1\nClient1,0,0\n"), Err(InputError::Fields { line: 3, found: 3 }));
        assert_eq!(
            parse("Hall\n1\nClient1,0,soon,1\n"),
            Err(InputError::Number { line: 3, what: "service time", value: "soon".to_string() })
        );
    }

    #[test]
    fn error_messages() {
        let err = parse("Hall\n1\nClient1,x,0,1\n").unwrap_err();
        assert_eq!(err.to_string(), "line 3: invalid arrival time \"x\"");
    }
}
