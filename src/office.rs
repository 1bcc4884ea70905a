use std::io::Write;
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Barrier};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::journal::{Journal, Reservation};
use crate::raw::Handoff;
use crate::teller::{self, Counter};
use crate::venue::{SeatMap, Venue};
use crate::{Client, TellerId, TELLERS};

/// Timing knobs of the box office.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Pause between starting consecutive tellers, so their arrivals are journaled in order.
    pub teller_stagger: Duration,
    /// How long to wait, once every client left, for tellers still finishing up.
    pub grace: Duration,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            teller_stagger: Duration::from_millis(100),
            grace: Duration::from_millis(100),
        }
    }
}

impl Config {
    /// Set the pause between teller starts.
    pub fn with_teller_stagger(self, teller_stagger: Duration) -> Config {
        Config {
            teller_stagger,
            ..self
        }
    }

    /// Set the grace period at closing time.
    pub fn with_grace(self, grace: Duration) -> Config {
        Config { grace, ..self }
    }
}

/// An open box office: tellers are at their desks and waiting for clients.
pub struct BoxOffice {
    counter: Counter,
    config: Config,
}

impl BoxOffice {
    /// Open the office for `venue`, journaling into `out`.
    ///
    /// Returns once all tellers have arrived.
    pub fn open<W: Write + Send + 'static>(venue: &Venue, config: Config, out: W) -> Result<BoxOffice> {
        let counter = Counter {
            handoff: Arc::new(Handoff::new()),
            seats: Arc::new(SeatMap::new(venue.capacity)),
            journal: Arc::new(Journal::new(out)),
        };
        counter.journal.line("Welcome to the Sync-Ticket!")?;
        debug!("Opening {} with {} seats", venue.name, venue.capacity);

        let ready = Arc::new(Barrier::new(1 + TELLERS));
        for (i, &id) in TellerId::PRIORITY.iter().enumerate() {
            if i != 0 && !config.teller_stagger.is_zero() {
                thread::sleep(config.teller_stagger);
            }
            let counter = counter.clone();
            let ready = ready.clone();
            // detached: tellers are never joined
            thread::Builder::new()
                .name(id.thread_name().to_string())
                .spawn(move || teller::work(id, counter, ready))?;
        }
        ready.wait();
        counter.handoff.await_idle(TELLERS);
        trace!("All tellers are ready");

        Ok(BoxOffice { counter, config })
    }

    /// The hall's seats.
    pub fn seats(&self) -> &SeatMap {
        &self.counter.seats
    }

    /// Let `clients` in, wait until they have all been served, then close the office.
    ///
    /// Returns the reservations in the order they were signed.
    pub fn run(self, clients: Vec<Client>) -> Result<Vec<Reservation>> {
        let visits = self.admit(clients)?;
        let expected = visits.len();
        let outcome = join_visits(visits);
        self.close(expected, outcome)
    }

    /// Spawn one thread per client. Nobody moves until every thread is up.
    fn admit(&self, clients: Vec<Client>) -> Result<Vec<(String, JoinHandle<bool>)>> {
        let mut visits = Vec::with_capacity(clients.len());
        let mut gates = Vec::with_capacity(clients.len());
        for client in clients {
            let handoff = self.counter.handoff.clone();
            let (gate, entrance) = mpsc::channel();
            let name = client.name.clone();
            // on failure `gates` is dropped and the clients already spawned leave
            let handle = thread::Builder::new()
                .name(format!("client-{}", client.name))
                .spawn(move || visit(client, &handoff, entrance))?;
            gates.push(gate);
            visits.push((name, handle));
        }

        let arrival = Arc::new(Barrier::new(visits.len()));
        for gate in gates {
            // a receiver only disappears with its thread, which cannot exit before this
            let _ = gate.send(arrival.clone());
        }
        Ok(visits)
    }

    fn close(&self, expected: usize, outcome: Result<()>) -> Result<Vec<Reservation>> {
        let journal = &self.counter.journal;
        if let Err(e) = outcome {
            journal.flush()?;
            return Err(e);
        }
        if !journal.wait_for(expected, self.config.grace) {
            warn!(
                "Closing with {} of {} reservations signed",
                journal.reservations().len(),
                expected
            );
        }
        journal.line("All clients received service.")?;
        journal.flush()?;
        Ok(journal.reservations())
    }
}

fn join_visits(visits: Vec<(String, JoinHandle<bool>)>) -> Result<()> {
    let mut outcome = Ok(());
    for (name, handle) in visits {
        if handle.join().is_err() && outcome.is_ok() {
            outcome = Err(Error::ClientPanicked(name));
        }
    }
    outcome
}

/// Returns whether the client made it to a teller.
fn visit(client: Client, handoff: &Handoff, entrance: Receiver<Arc<Barrier>>) -> bool {
    let arrival = match entrance.recv() {
        Ok(arrival) => arrival,
        Err(_) => {
            debug!("{} left, the doors never opened", client.name);
            return false;
        }
    };
    arrival.wait();
    thread::sleep(client.arrival);
    let service = client.service;
    let name = client.name.clone();
    let teller = handoff.dispatch(client);
    debug!("{} is served by {}", name, teller);
    thread::sleep(service);
    true
}
