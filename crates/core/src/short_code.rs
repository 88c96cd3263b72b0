//! Short codes for shareable recipe links.
//!
//! A short code is a reversible, URL-safe encoding of a recipe id, salted
//! with a deployment secret so that codes do not reveal sequential ids at a
//! glance. The scheme follows the Hashids construction: a salt-driven
//! shuffle of a 62-character alphabet, a per-code "lottery" character that
//! re-shuffles the alphabet before the id is written in that base, and guard
//! / padding characters to reach a minimum length.
//!
//! Encoding is a pure function of `(id, salt, min_length)`. It is not
//! cryptographically secure and must not be used for authorization.

use crate::types::DbId;

/// Default minimum length of generated codes.
pub const DEFAULT_MIN_LENGTH: usize = 5;

/// Longest code that fits the `recipes.short_code` column. Codes are
/// `min_length` characters long unless the id itself needs more, and a
/// `u64` never needs more than 13.
pub const MAX_CODE_LENGTH: usize = 32;

/// Full URL-safe alphabet before separators and guards are carved out.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ1234567890";

/// Characters reserved as separators between numbers in multi-value codes.
///
/// Only single ids are ever encoded, but the characters stay out of the
/// working alphabet so decoded codes keep the same shape.
const SEPARATORS: &[u8] = b"cfhistuCFHISTU";

/// One guard character per this many alphabet characters.
const GUARD_RATIO: usize = 12;

/// Salted encoder/decoder for recipe short codes.
///
/// Build one at startup from configuration and share it (it is immutable).
#[derive(Debug, Clone)]
pub struct ShortCodeCodec {
    salt: Vec<u8>,
    alphabet: Vec<u8>,
    separators: Vec<u8>,
    guards: Vec<u8>,
    min_length: usize,
}

impl ShortCodeCodec {
    pub fn new(salt: &str, min_length: usize) -> Self {
        let salt = salt.as_bytes().to_vec();

        let mut alphabet: Vec<u8> = ALPHABET
            .iter()
            .copied()
            .filter(|c| !SEPARATORS.contains(c))
            .collect();
        let mut separators = SEPARATORS.to_vec();

        consistent_shuffle(&mut separators, &salt);
        consistent_shuffle(&mut alphabet, &salt);

        let guard_count = alphabet.len().div_ceil(GUARD_RATIO);
        let guards: Vec<u8> = alphabet.drain(..guard_count).collect();

        Self {
            salt,
            alphabet,
            separators,
            guards,
            min_length,
        }
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    /// Encode `id` into its short code.
    pub fn encode(&self, id: u64) -> String {
        let mut alphabet = self.alphabet.clone();
        let seed = (id % 100) as usize;

        let lottery = alphabet[seed % alphabet.len()];
        let mut code = vec![lottery];

        let key = self.shuffle_key(lottery, &alphabet);
        consistent_shuffle(&mut alphabet, &key);
        code.extend(to_base(id, &alphabet));

        if code.len() < self.min_length {
            let index = (seed + usize::from(code[0])) % self.guards.len();
            code.insert(0, self.guards[index]);

            if code.len() < self.min_length {
                let index = (seed + usize::from(code[2])) % self.guards.len();
                code.push(self.guards[index]);
            }
        }

        let half = alphabet.len() / 2;
        while code.len() < self.min_length {
            let key = alphabet.clone();
            consistent_shuffle(&mut alphabet, &key);

            let mut padded = Vec::with_capacity(alphabet.len() + code.len());
            padded.extend_from_slice(&alphabet[half..]);
            padded.extend_from_slice(&code);
            padded.extend_from_slice(&alphabet[..half]);

            let excess = padded.len().saturating_sub(self.min_length);
            if excess > 0 {
                let start = excess / 2;
                padded = padded[start..start + self.min_length].to_vec();
            }
            code = padded;
        }

        code.into_iter().map(char::from).collect()
    }

    /// Encode a database id. Returns `None` for negative ids.
    pub fn encode_db_id(&self, id: DbId) -> Option<String> {
        u64::try_from(id).ok().map(|id| self.encode(id))
    }

    /// Decode a short code back into the id it was generated from.
    ///
    /// Returns `None` for anything [`encode`](Self::encode) could not have
    /// produced with this salt and minimum length: foreign characters,
    /// overflowing values, or non-canonical spellings.
    pub fn decode(&self, code: &str) -> Option<u64> {
        if code.is_empty() || !code.is_ascii() {
            return None;
        }

        let parts: Vec<&[u8]> = code
            .as_bytes()
            .split(|c| self.guards.contains(c))
            .collect();
        let core = match parts.len() {
            2 | 3 => parts[1],
            _ => parts[0],
        };

        let (&lottery, digits) = core.split_first()?;
        if digits.is_empty() || digits.iter().any(|c| self.separators.contains(c)) {
            return None;
        }

        let mut alphabet = self.alphabet.clone();
        let key = self.shuffle_key(lottery, &alphabet);
        consistent_shuffle(&mut alphabet, &key);

        let id = from_base(digits, &alphabet)?;
        (self.encode(id) == code).then_some(id)
    }

    /// Decode into a database id. Returns `None` if the value does not fit.
    pub fn decode_db_id(&self, code: &str) -> Option<DbId> {
        self.decode(code).and_then(|id| DbId::try_from(id).ok())
    }

    /// `lottery + salt + alphabet`, truncated to the alphabet length.
    fn shuffle_key(&self, lottery: u8, alphabet: &[u8]) -> Vec<u8> {
        let mut key = Vec::with_capacity(1 + self.salt.len() + alphabet.len());
        key.push(lottery);
        key.extend_from_slice(&self.salt);
        key.extend_from_slice(alphabet);
        key.truncate(alphabet.len());
        key
    }
}

/// Deterministic Fisher-Yates-style shuffle driven by `key`.
fn consistent_shuffle(values: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }

    let mut v = 0usize;
    let mut p = 0usize;
    for i in (1..values.len()).rev() {
        v %= key.len();
        let n = usize::from(key[v]);
        p += n;
        let j = (n + v + p) % i;
        values.swap(i, j);
        v += 1;
    }
}

fn to_base(mut value: u64, alphabet: &[u8]) -> Vec<u8> {
    let base = alphabet.len() as u64;
    let mut digits = Vec::new();
    loop {
        digits.push(alphabet[(value % base) as usize]);
        value /= base;
        if value == 0 {
            break;
        }
    }
    digits.reverse();
    digits
}

fn from_base(digits: &[u8], alphabet: &[u8]) -> Option<u64> {
    let base = alphabet.len() as u64;
    digits.iter().try_fold(0u64, |acc, digit| {
        let position = alphabet.iter().position(|c| c == digit)? as u64;
        acc.checked_mul(base)?.checked_add(position)
    })
}
