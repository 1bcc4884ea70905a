/*!
Box office rendezvous.

A theater box office is staffed by exactly three tellers and visited by any number of clients,
each of them wanting a particular seat. Serving a client goes like this:

  1. the client waits out its arrival delay, then steps to the front of the queue
  2. once at least one teller is idle, the client wakes the idle teller with the highest priority (A, then B, then C)
  3. the woken teller picks up the client's record, reserves the requested seat or, failing that, the lowest free one
  4. both sides spend the client's service time, then the teller signs a line in the journal and goes idle again

Exactly one teller is woken per client, and a teller never looks at the queue before it has been woken.
The seat map, the front desk and the journal are guarded by independent locks,
and no lock is held across a sleep.

Tellers are never told to go home: after the last client they stay parked,
and are reclaimed when the process exits.
*/
#![warn(missing_docs)]

#[cfg(feature = "logging")]
#[macro_use]
extern crate log;

#[cfg(not(feature = "logging"))]
macro_rules! trace { ($($arg:tt)*) => {} }
#[cfg(not(feature = "logging"))]
macro_rules! debug { ($($arg:tt)*) => {} }
#[cfg(not(feature = "logging"))]
macro_rules! warn { ($($arg:tt)*) => {} }

mod error;
mod input;
mod journal;
mod office;
mod raw;
mod teller;
mod venue;

use std::fmt;
use std::time::Duration;

pub use error::{Error, Result};
pub use input::{parse, InputError, Schedule};
pub use journal::Reservation;
pub use office::{BoxOffice, Config};
pub use venue::{SeatMap, Venue};


/// Number of tellers working the box office.
pub const TELLERS: usize = 3;

/// Identity of a teller. The ordering is the wake-up priority: `A` goes first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TellerId {
    /// Highest priority.
    A,
    /// Woken only when `A` is busy.
    B,
    /// Woken only when both `A` and `B` are busy.
    C,
}

impl TellerId {
    /// All tellers, in the order a client looks for an idle one.
    pub const PRIORITY: [TellerId; TELLERS] = [TellerId::A, TellerId::B, TellerId::C];

    /// Position of this teller in the availability registry.
    pub fn index(self) -> usize {
        self as usize
    }

    fn thread_name(self) -> &'static str {
        match self {
            TellerId::A => "teller-a",
            TellerId::B => "teller-b",
            TellerId::C => "teller-c",
        }
    }
}

impl fmt::Display for TellerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let letter = match *self {
            TellerId::A => 'A',
            TellerId::B => 'B',
            TellerId::C => 'C',
        };
        write!(f, "Teller {}", letter)
    }
}

/// A client visiting the box office.
///
/// The record is handed over to a teller by value; the client thread keeps no
/// link to it afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Client {
    /// Name printed in the journal.
    pub name: String,
    /// Delay between the common arrival instant and stepping to the front of the queue.
    pub arrival: Duration,
    /// Time it takes to serve this client.
    pub service: Duration,
    /// Seat the client asks for. Anything outside `1..=capacity` is never granted directly.
    pub requested_seat: i32,
}

impl Client {
    /// Create a client record, with delays given in milliseconds.
    pub fn new(name: &str, arrival_ms: u64, service_ms: u64, requested_seat: i32) -> Client {
        Client {
            name: name.to_string(),
            arrival: Duration::from_millis(arrival_ms),
            service: Duration::from_millis(service_ms),
            requested_seat,
        }
    }
}
