//! Display names handed to peers when they connect.

use rand::seq::IndexedRandom;

const FIRST_NAMES: [&str; 16] = [
    "Alice", "Bohdan", "Carmen", "Dmytro", "Elena", "Felix", "Greta", "Hugo",
    "Iryna", "Jonas", "Kateryna", "Leo", "Maria", "Nazar", "Olga", "Pavel",
];

const LAST_NAMES: [&str; 16] = [
    "Adams", "Bondar", "Castro", "Doroshenko", "Evans", "Fischer", "Garcia", "Hoffman",
    "Ivanenko", "Johnson", "Kovalenko", "Lopez", "Melnyk", "Novak", "Olsen", "Petrenko",
];

/// Random "First Last" name
pub fn random_full_name() -> String {
    let mut rng = rand::rng();
    let first = FIRST_NAMES.choose(&mut rng).copied().unwrap_or_default();
    let last = LAST_NAMES.choose(&mut rng).copied().unwrap_or_default();
    format!("{first} {last}")
}
