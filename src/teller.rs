use std::sync::{Arc, Barrier};
use std::thread;

use crate::journal::{Journal, Reservation};
use crate::raw::Handoff;
use crate::venue::SeatMap;
use crate::TellerId;

/// Everything a teller shares with the rest of the office.
#[derive(Clone)]
pub struct Counter {
    pub handoff: Arc<Handoff>,
    pub seats: Arc<SeatMap>,
    pub journal: Arc<Journal>,
}

/// Body of a teller thread. Never returns: once the clients run out the teller stays parked.
pub fn work(id: TellerId, counter: Counter, ready: Arc<Barrier>) {
    counter.journal.arrived(id);
    ready.wait();
    trace!("{} passed the startup barrier", id);

    loop {
        let client = counter.handoff.park(id);
        let given_seat = counter.seats.reserve(client.requested_seat);
        debug!("{} gave {:?} to {} (asked for {})", id, given_seat, client.name, client.requested_seat);
        thread::sleep(client.service);
        counter.journal.sign(Reservation {
            client: client.name,
            requested_seat: client.requested_seat,
            given_seat,
            teller: id,
        });
    }
}
