use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use std::cell::RefCell;

use crate::value::{Array, Object, Value};

const KEY_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";

/// Fractional, tiny and huge numbers whose JSON form uses exponents.
const FLOAT_SAMPLES: &[f64] = &[0.5, -2.25, 0.1, 1e-7, -3.5e-12, 1e15, 1e21, 1.5e300];

/// Generates random plain values for tests.
///
/// Uses the xoshiro256** PRNG for reproducible sequences when seeded.
///
/// # Examples
///
/// ```
/// use deep_observe_util::fuzzer::Fuzzer;
///
/// let fuzzer = Fuzzer::new(Some([7; 32]));
/// let n = fuzzer.random_int(1, 10);
/// assert!((1..=10).contains(&n));
///
/// let value = fuzzer.random_value(3);
/// assert!(value.is_container());
/// ```
pub struct Fuzzer {
    /// The seed used to initialize the PRNG.
    pub seed: [u8; 32],
    rng: RefCell<Xoshiro256StarStar>,
}

impl Fuzzer {
    /// Create a new fuzzer with an optional seed, falling back to `OsRng`.
    pub fn new(seed: Option<[u8; 32]>) -> Self {
        let seed = seed.unwrap_or_else(|| {
            let mut bytes = [0u8; 32];
            OsRng.fill_bytes(&mut bytes);
            bytes
        });
        Self {
            seed,
            rng: RefCell::new(Xoshiro256StarStar::from_seed(seed)),
        }
    }

    /// Random integer in `[min, max]`.
    pub fn random_int(&self, min: i64, max: i64) -> i64 {
        self.rng.borrow_mut().gen_range(min..=max)
    }

    pub fn random_bool(&self, probability: f64) -> bool {
        self.rng.borrow_mut().gen_bool(probability)
    }

    /// Pick a random element from a non-empty slice.
    pub fn pick<'a, T>(&self, elements: &'a [T]) -> &'a T {
        let idx = self.rng.borrow_mut().gen_range(0..elements.len());
        &elements[idx]
    }

    /// Random string of `len` characters drawn from `chars`.
    pub fn random_string(&self, len: usize, chars: &str) -> String {
        let chars: Vec<char> = chars.chars().collect();
        let mut rng = self.rng.borrow_mut();
        (0..len)
            .map(|_| chars[rng.gen_range(0..chars.len())])
            .collect()
    }

    /// Random object key, short enough to collide now and then.
    pub fn random_key(&self) -> String {
        let len = self.random_int(1, 3) as usize;
        self.random_string(len, KEY_CHARS)
    }

    /// Random scalar: null, boolean, number or short string.
    pub fn random_scalar(&self) -> Value {
        match self.random_int(0, 4) {
            0 => Value::Null,
            1 => Value::Bool(self.random_bool(0.5)),
            2 => Value::Number(self.random_int(-100, 100) as f64),
            3 => Value::Number(*self.pick(FLOAT_SAMPLES)),
            _ => {
                let len = self.random_int(0, 6) as usize;
                Value::String(self.random_string(len, KEY_CHARS))
            }
        }
    }

    /// Random acyclic container tree at most `depth` levels deep.
    pub fn random_value(&self, depth: usize) -> Value {
        if self.random_bool(0.5) {
            Value::Object(self.random_object(depth))
        } else {
            let arr = Array::new();
            for _ in 0..self.random_int(0, 4) {
                arr.push(self.random_member(depth));
            }
            Value::Array(arr)
        }
    }

    /// Random object tree at most `depth` levels deep.
    pub fn random_object(&self, depth: usize) -> Object {
        let obj = Object::new();
        for _ in 0..self.random_int(0, 4) {
            obj.insert(self.random_key(), self.random_member(depth));
        }
        obj
    }

    fn random_member(&self, depth: usize) -> Value {
        if depth > 1 && self.random_bool(0.3) {
            self.random_value(depth - 1)
        } else {
            self.random_scalar()
        }
    }
}
