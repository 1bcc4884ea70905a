use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

use crate::{Client, TellerId, TELLERS};

struct Desk {
    // head of the queue, written by the client at the front
    slot: Option<Client>,
    idle: [bool; TELLERS],
    // always equals the number of `true` flags in `idle`
    idle_count: usize,
    mailbox: [Option<Client>; TELLERS],
}

/// The front desk where clients meet idle tellers.
pub struct Handoff {
    front: Mutex<()>,
    desk: Mutex<Desk>,
    vacancy: Condvar,
    wake: [Condvar; TELLERS],
}

fn recover<T>(result: Result<T, PoisonError<T>>) -> T {
    result.unwrap_or_else(PoisonError::into_inner)
}

impl Handoff {
    pub fn new() -> Handoff {
        Handoff {
            front: Mutex::new(()),
            desk: Mutex::new(Desk {
                slot: None,
                idle: [false; TELLERS],
                idle_count: 0,
                mailbox: [None, None, None],
            }),
            vacancy: Condvar::new(),
            wake: [Condvar::new(), Condvar::new(), Condvar::new()],
        }
    }

    fn desk(&self) -> MutexGuard<Desk> {
        recover(self.desk.lock())
    }

    /// Declare `teller` idle and block until a client is handed over to it.
    pub fn park(&self, teller: TellerId) -> Client {
        let i = teller.index();
        let mut desk = self.desk();
        desk.idle[i] = true;
        desk.idle_count += 1;
        self.vacancy.notify_all();
        debug!("{} is idle ({} idle)", teller, desk.idle_count);
        // the mailbox is only ever filled together with the notification,
        // so an empty one means a spurious wake-up
        loop {
            if let Some(client) = desk.mailbox[i].take() {
                return client;
            }
            desk = recover(self.wake[i].wait(desk));
        }
    }

    /// Block until at least `count` tellers are idle.
    pub fn await_idle(&self, count: usize) {
        let mut desk = self.desk();
        while desk.idle_count < count {
            desk = recover(self.vacancy.wait(desk));
        }
    }

    /// Put `client` at the head of the queue and wake the first idle teller.
    ///
    /// Blocks while all tellers are busy. Returns the teller that got the client.
    pub fn dispatch(&self, client: Client) -> TellerId {
        // holding the front keeps the slot ours until a teller owns the record
        let _front = recover(self.front.lock());
        let mut desk = self.desk();
        desk.slot = Some(client);
        while desk.idle_count == 0 {
            desk = recover(self.vacancy.wait(desk));
        }
        desk.idle_count -= 1;

        let teller = TellerId::PRIORITY
            .iter()
            .cloned()
            .find(|t| desk.idle[t.index()])
            .unwrap_or(TellerId::C);
        let i = teller.index();
        desk.idle[i] = false;
        let record = desk.slot.take();
        desk.mailbox[i] = record;
        self.wake[i].notify_one();
        teller
    }

    #[cfg(test)]
    fn idle(&self) -> [bool; TELLERS] {
        self.desk().idle
    }

    #[cfg(test)]
    fn idle_count(&self) -> usize {
        self.desk().idle_count
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    fn wait_idle(handoff: &Handoff, expected: [bool; TELLERS]) {
        for _ in 0..500 {
            if handoff.idle() == expected {
                return;
            }
            thread::sleep(Duration::from_millis(2));
        }
        panic!("tellers never reached {:?}, have {:?}", expected, handoff.idle());
    }

    // flags and count are read under one lock so the pair is consistent
    fn assert_idle_count_matches(handoff: &Handoff) {
        let desk = handoff.desk();
        let flagged = desk.idle.iter().filter(|&&idle| idle).count();
        assert_eq!(desk.idle_count, flagged, "flags {:?}", desk.idle);
    }

    fn spawn_parked(handoff: &Arc<Handoff>, teller: TellerId) -> thread::JoinHandle<Client> {
        let handoff = handoff.clone();
        thread::spawn(move || handoff.park(teller))
    }

    #[test]
    fn lowest_idle_teller_wins() {
        let handoff = Arc::new(Handoff::new());
        assert_eq!(handoff.idle_count(), 0);
        let c = spawn_parked(&handoff, TellerId::C);
        let b = spawn_parked(&handoff, TellerId::B);
        wait_idle(&handoff, [false, true, true]);
        assert_eq!(handoff.idle_count(), 2);
        assert_idle_count_matches(&handoff);

        assert_eq!(handoff.dispatch(Client::new("first", 0, 0, 1)), TellerId::B);
        assert_idle_count_matches(&handoff);
        assert_eq!(b.join().unwrap().name, "first");
        assert_eq!(handoff.idle(), [false, false, true]);
        assert_eq!(handoff.idle_count(), 1);

        let a = spawn_parked(&handoff, TellerId::A);
        wait_idle(&handoff, [true, false, true]);
        assert_idle_count_matches(&handoff);
        assert_eq!(handoff.dispatch(Client::new("second", 0, 0, 2)), TellerId::A);
        assert_idle_count_matches(&handoff);
        assert_eq!(a.join().unwrap().name, "second");

        assert_eq!(handoff.dispatch(Client::new("third", 0, 0, 3)), TellerId::C);
        assert_idle_count_matches(&handoff);
        assert_eq!(c.join().unwrap().name, "third");
        assert_eq!(handoff.idle(), [false; TELLERS]);
        assert_eq!(handoff.idle_count(), 0);
    }

    #[test]
    fn await_idle_counts_parked_tellers() {
        let handoff = Arc::new(Handoff::new());
        handoff.await_idle(0);
        let _a = spawn_parked(&handoff, TellerId::A);
        let _b = spawn_parked(&handoff, TellerId::B);
        handoff.await_idle(2);
        assert_eq!(handoff.idle(), [true, true, false]);
    }

    #[test]
    fn client_waits_for_a_teller() {
        let handoff = Arc::new(Handoff::new());
        let client = {
            let handoff = handoff.clone();
            thread::spawn(move || handoff.dispatch(Client::new("early", 0, 0, 1)))
        };
        thread::sleep(Duration::from_millis(20));
        assert!(!client.is_finished());

        let teller = spawn_parked(&handoff, TellerId::C);
        assert_eq!(client.join().unwrap(), TellerId::C);
        assert_eq!(teller.join().unwrap().name, "early");
    }

    #[test]
    fn every_record_reaches_one_teller() {
        let handoff = Arc::new(Handoff::new());
        let served = Arc::new(Mutex::new(Vec::new()));
        for &teller in TellerId::PRIORITY.iter() {
            let handoff = handoff.clone();
            let served = served.clone();
            thread::spawn(move || loop {
                let client = handoff.park(teller);
                assert_idle_count_matches(&handoff);
                served.lock().unwrap().push((client.name, teller));
            });
        }

        let clients: Vec<_> = (0..30)
            .map(|i| {
                let handoff = handoff.clone();
                thread::spawn(move || {
                    let teller = handoff.dispatch(Client::new(&format!("c{}", i), 0, 0, i));
                    assert_idle_count_matches(&handoff);
                    teller
                })
            })
            .collect();
        let dispatched: Vec<_> = clients.into_iter().map(|c| c.join().unwrap()).collect();

        wait_idle(&handoff, [true; TELLERS]);
        assert_eq!(handoff.idle_count(), TELLERS);
        let served = served.lock().unwrap();
        assert_eq!(served.len(), 30);
        let mut names: Vec<_> = served.iter().map(|s| s.0.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 30);
        assert_eq!(dispatched.len(), 30);
    }
}
