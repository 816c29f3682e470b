/// Number of answer options every question carries
pub const OPTION_COUNT: usize = 5;

/// Maps display slots to canonical option indices: `permutation[slot] = canonical`
pub type Permutation = [usize; OPTION_COUNT];

/// Builds the presentation key for a question shown at a given session slot
pub fn presentation_key(question_id: &str, presentation_index: usize) -> String {
    format!("{}#{}", question_id, presentation_index)
}

/// Returns the display order of the five options for a presentation key.
///
/// The result must stay stable across releases: answers are re-checked by
/// recomputing the permutation from the key, never by storing it.
pub fn permute(key: &str) -> Permutation {
    let mut order = [0, 1, 2, 3, 4];
    seeded_shuffle(&mut order, key);
    order
}

/// Fisher-Yates shuffle driven by a generator seeded from `key`.
///
/// Walks from the last position down to 1 and swaps each position with a
/// uniformly chosen earlier-or-equal position.
pub fn seeded_shuffle<T>(items: &mut [T], key: &str) {
    let mut rng = Mulberry32::new(fingerprint(key));
    for i in (1..items.len()).rev() {
        let j = (rng.next_f64() * (i + 1) as f64).floor() as usize;
        items.swap(i, j);
    }
}

/// 32-bit string fingerprint (xmur3 variant) over UTF-16 code units.
///
/// Not cryptographic. Collisions are fine, reproducibility is not negotiable.
pub fn fingerprint(key: &str) -> u32 {
    let units: Vec<u16> = key.encode_utf16().collect();

    let mut h: u32 = 1_779_033_703 ^ units.len() as u32;
    for unit in units {
        h = (h ^ u32::from(unit)).wrapping_mul(3_432_918_353);
        h = h.rotate_left(13);
    }

    h = (h ^ (h >> 16)).wrapping_mul(2_246_822_507);
    h = (h ^ (h >> 13)).wrapping_mul(3_266_489_909);
    h ^ (h >> 16)
}

/// Counter-based 32-bit generator (mulberry32)
#[derive(Debug, Clone)]
pub struct Mulberry32 {
    state: u32,
}

impl Mulberry32 {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    /// Next value in [0, 1)
    pub fn next_f64(&mut self) -> f64 {
        f64::from(self.next_u32()) / 4_294_967_296.0
    }
}
