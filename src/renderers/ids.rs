//! Per-conversion identity, seed and z-order generator.
//!
//! One `SceneIds` is created for each synthesis and dropped afterwards, so
//! conversions never share counters. The same seed yields the same ids.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz_-";
const ID_LEN: usize = 21;

pub struct SceneIds {
    rng: StdRng,
    issued: HashSet<String>,
    next_index: usize,
}

impl SceneIds {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            issued: HashSet::new(),
            next_index: 0,
        }
    }

    /// A fresh element id, unique within this generator.
    pub fn id(&mut self) -> String {
        loop {
            let id: String = (0..ID_LEN)
                .map(|_| char::from(ID_ALPHABET[self.rng.random_range(0..ID_ALPHABET.len())]))
                .collect();
            if self.issued.insert(id.clone()) {
                return id;
            }
        }
    }

    /// Rendering seed / version nonce.
    pub fn seed(&mut self) -> u32 {
        self.rng.random_range(1..=i32::MAX as u32)
    }

    /// Next z-order token. Tokens compare in issue order.
    pub fn index(&mut self) -> String {
        let token = format!("a{:08}", self.next_index);
        self.next_index += 1;
        token
    }
}
