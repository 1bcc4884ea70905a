use std::sync::{Mutex, MutexGuard, PoisonError};

/// A theater hall and its number of seats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Venue {
    /// Name of the hall.
    pub name: String,
    /// Number of real seats, numbered from 1.
    pub capacity: usize,
}

impl Venue {
    /// Look up a hall by name. Unknown halls get the default capacity of 200.
    pub fn from_name(name: &str) -> Venue {
        let capacity = match name {
            "OdaTiyatrosu" => 60,
            "UskudarStudyoSahne" => 80,
            _ => 200,
        };
        Venue::with_capacity(name, capacity)
    }

    /// A hall with an explicit number of seats.
    pub fn with_capacity(name: &str, capacity: usize) -> Venue {
        Venue {
            name: name.to_string(),
            capacity,
        }
    }
}

/// Occupancy of the hall. Seats are taken once and never released.
pub struct SeatMap {
    // index 0 is a sentinel and never taken
    cells: Mutex<Vec<bool>>,
}

impl SeatMap {
    /// Create an empty hall with `capacity` seats.
    pub fn new(capacity: usize) -> SeatMap {
        SeatMap {
            cells: Mutex::new(vec![false; capacity + 1]),
        }
    }

    fn cells(&self) -> MutexGuard<Vec<bool>> {
        self.cells.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of real seats.
    pub fn capacity(&self) -> usize {
        self.cells().len() - 1
    }

    /// Reserve a seat for a client asking for `requested`.
    ///
    /// The requested seat is granted if it exists and is free, otherwise the
    /// lowest free seat is taken. Returns `None` when the hall is full.
    pub fn reserve(&self, requested: i32) -> Option<u32> {
        let mut cells = self.cells();
        let direct = usize::try_from(requested)
            .ok()
            .filter(|&seat| seat >= 1 && cells.get(seat) == Some(&false));
        let seat = match direct {
            Some(seat) => seat,
            None => cells.iter().skip(1).position(|&taken| !taken)? + 1,
        };
        if let Some(cell) = cells.get_mut(seat) {
            *cell = true;
        }
        u32::try_from(seat).ok()
    }

    /// Whether `seat` has been reserved. Seats outside the hall are never taken.
    pub fn is_taken(&self, seat: u32) -> bool {
        match seat as usize {
            0 => false,
            i => self.cells().get(i).copied().unwrap_or(false),
        }
    }

    /// Number of reserved seats.
    pub fn occupied(&self) -> usize {
        self.cells().iter().skip(1).filter(|&&taken| taken).count()
    }
}
