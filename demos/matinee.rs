extern crate box_office;
extern crate env_logger;

use std::io;
use std::time::Duration;

use box_office::{BoxOffice, Client, Config, Venue};

fn main() {
    env_logger::init();

    let venue = Venue::with_capacity("Matinee", 4);
    let config = Config::default().with_grace(Duration::from_secs(1));
    let office = BoxOffice::open(&venue, config, io::stdout()).unwrap();

    let clients = vec![
        Client::new("Ayse", 0, 300, 2),
        Client::new("Berk", 0, 300, 2),
        Client::new("Cem", 50, 100, 0),
        Client::new("Deniz", 100, 100, 4),
        Client::new("Ece", 400, 50, 4),
        Client::new("Fatma", 500, 50, 1),
    ];
    let reservations = office.run(clients).unwrap();
    let seated = reservations.iter().filter(|r| r.given_seat.is_some()).count();
    println!("{} of {} clients got a seat", seated, reservations.len());
}
