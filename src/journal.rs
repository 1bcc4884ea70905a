use std::fmt;
use std::io::{self, Write};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use crate::TellerId;

/// The outcome of serving one client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reservation {
    /// Name of the client.
    pub client: String,
    /// Seat the client asked for.
    pub requested_seat: i32,
    /// Seat the client got, `None` if the hall was full.
    pub given_seat: Option<u32>,
    /// Teller who signed the reservation.
    pub teller: TellerId,
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} requests seat {}, ", self.client, self.requested_seat)?;
        match self.given_seat {
            Some(seat) => write!(f, "reserves seat {}.", seat)?,
            None => write!(f, "reserves None.")?,
        }
        write!(f, " Signed by {}.", self.teller)
    }
}

struct Pages {
    out: Box<dyn Write + Send>,
    served: Vec<Reservation>,
}

/// Shared output of the box office. One line is written at a time.
pub struct Journal {
    pages: Mutex<Pages>,
    signed: Condvar,
}

impl Journal {
    /// Create a journal writing into `out`.
    pub fn new<W: Write + Send + 'static>(out: W) -> Journal {
        Journal {
            pages: Mutex::new(Pages {
                out: Box::new(out),
                served: Vec::new(),
            }),
            signed: Condvar::new(),
        }
    }

    fn pages(&self) -> MutexGuard<Pages> {
        self.pages.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write a free-form line.
    pub fn line(&self, text: &str) -> io::Result<()> {
        writeln!(self.pages().out, "{}", text)
    }

    /// Announce a teller reporting for work.
    pub fn arrived(&self, teller: TellerId) {
        if let Err(e) = self.line(&format!("{} has arrived.", teller)) {
            warn!("Failed to announce {}: {}", teller, e);
        }
    }

    /// Sign a reservation. A failed write is logged, the reservation is recorded anyway.
    pub fn sign(&self, reservation: Reservation) {
        let mut pages = self.pages();
        if let Err(e) = writeln!(pages.out, "{}", reservation) {
            warn!("Failed to write reservation of {}: {}", reservation.client, e);
        }
        pages.served.push(reservation);
        self.signed.notify_all();
    }

    /// Block until at least `count` reservations are signed, or `timeout` elapses.
    ///
    /// Returns whether the count was reached.
    pub fn wait_for(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pages = self.pages();
        while pages.served.len() < count {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            pages = self
                .signed
                .wait_timeout(pages, deadline - now)
                .map(|(guard, _)| guard)
                .unwrap_or_else(|e| e.into_inner().0);
        }
        true
    }

    /// All reservations signed so far, in signing order.
    pub fn reservations(&self) -> Vec<Reservation> {
        self.pages().served.clone()
    }

    /// Flush the destination.
    pub fn flush(&self) -> io::Result<()> {
        self.pages().out.flush()
    }
}
