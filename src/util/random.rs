use crate::core::types::State;

pub trait FromRandom {
    fn from_random() -> Self;
}

impl FromRandom for State {
    fn from_random() -> Self {
        State(random_string(32))
    }
}

/// Alphanumeric string drawn from the operating system RNG.
fn random_string(size: usize) -> String {
    use rand::Rng;

    rand::rngs::OsRng
        .sample_iter(rand::distributions::Alphanumeric)
        .take(size)
        .map(char::from)
        .collect()
}
