use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

/// A seeded generator makes the whole battle reproducible.
pub fn zrng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub fn shuffle_vec<T>(mut vec: Vec<T>, rng: &mut StdRng) -> Vec<T> {
    vec.shuffle(rng);
    vec
}

pub fn clamp_min<T: PartialOrd>(value: T, min: T) -> T {
    if value < min {
        min
    } else {
        value
    }
}
