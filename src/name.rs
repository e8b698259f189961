// Remote subdirectory names.
// - Every run uploads into one fresh directory named `{time}-{random}`.
// - The time part is whole seconds since the Unix epoch so listings sort
//   roughly by upload time; the random part keeps two runs in the same
//   second apart.
// - Time and randomness come in through the `Clock` and
//   `SecureRandomSource` traits so tests can pin both.

use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Crockford-style base32 digits, lowercase, without `i`, `l`, `o`, `u`.
pub const ALPHABET: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

/// Bits of entropy in the random suffix. 25 bits fill exactly five digits.
pub const RANDOM_BITS: u32 = 25;

const RANDOM_WIDTH: usize = 5;

/// Encode `value` in base32 using [`ALPHABET`], most significant digit first.
///
/// Zero encodes to the empty string; there is no leading `0` digit.
pub fn encode(mut value: u64) -> String {
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 32) as usize]);
        value /= 32;
    }
    digits.reverse();
    // Every byte comes from the ASCII alphabet.
    digits.into_iter().map(char::from).collect()
}

/// Source of the current time in whole seconds since the Unix epoch.
pub trait Clock {
    fn unix_seconds(&self) -> u64;
}

/// Cryptographically secure source of random bits.
pub trait SecureRandomSource {
    /// Return a uniformly random value below `2^bits` (`bits <= 32`).
    fn random_bits(&mut self, bits: u32) -> u32;
}

/// Wall clock. Times before the epoch read as zero.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn unix_seconds(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0)
    }
}

/// Operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl SecureRandomSource for OsRandom {
    fn random_bits(&mut self, bits: u32) -> u32 {
        top_bits(OsRng.next_u32(), bits)
    }
}

fn top_bits(value: u32, bits: u32) -> u32 {
    match bits {
        0 => 0,
        32.. => value,
        _ => value >> (32 - bits),
    }
}

/// The directory shared by every file uploaded in one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSession {
    subdirectory: String,
}

impl RemoteSession {
    pub fn new(subdirectory: impl Into<String>) -> Self {
        Self {
            subdirectory: subdirectory.into(),
        }
    }

    pub fn subdirectory(&self) -> &str {
        &self.subdirectory
    }
}

impl fmt::Display for RemoteSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.subdirectory)
    }
}

/// Builds `{timestamp}-{random}` directory names.
pub struct NameGenerator<C, R> {
    clock: C,
    random: R,
}

impl NameGenerator<SystemClock, OsRandom> {
    /// Generator backed by the wall clock and the OS random source.
    pub fn system() -> Self {
        Self::new(SystemClock, OsRandom)
    }
}

impl<C: Clock, R: SecureRandomSource> NameGenerator<C, R> {
    pub fn new(clock: C, random: R) -> Self {
        Self { clock, random }
    }

    /// Produce a new name such as `1jq5c8x-0k3zm`.
    pub fn generate(&mut self) -> String {
        let timestamp = encode(self.clock.unix_seconds());
        let random = encode(u64::from(self.random.random_bits(RANDOM_BITS)));
        format!("{timestamp}-{random:0>width$}", width = RANDOM_WIDTH)
    }

    /// Produce the session for one run.
    pub fn session(&mut self) -> RemoteSession {
        RemoteSession::new(self.generate())
    }
}
