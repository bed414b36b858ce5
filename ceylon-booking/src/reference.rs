use chrono::{DateTime, Utc};
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 5;

/// Generates a human-readable booking reference:
/// `{PREFIX}{base36 millis}{5 random base36 chars}`, all uppercase.
///
/// Collisions are not ruled out here; storage holds a unique index on the
/// reference column.
pub fn generate_reference(prefix: &str) -> String {
    generate_reference_at(prefix, Utc::now(), &mut rand::thread_rng())
}

pub fn generate_reference_at<R: Rng + ?Sized>(prefix: &str, at: DateTime<Utc>, rng: &mut R) -> String {
    let millis = at.timestamp_millis().max(0) as u64;
    let mut reference = prefix.to_uppercase();
    reference.push_str(&to_base36(millis));
    for _ in 0..SUFFIX_LEN {
        reference.push(BASE36[rng.gen_range(0..BASE36.len())] as char);
    }
    reference
}

pub fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}

/// True when `reference` has the given prefix followed only by uppercase
/// base36 characters.
pub fn is_valid_reference(reference: &str, prefix: &str) -> bool {
    match reference.strip_prefix(prefix) {
        Some(rest) => rest.len() > SUFFIX_LEN && rest.bytes().all(|b| BASE36.contains(&b)),
        None => false,
    }
}
