//! Award identifier derivation.

/// Prefix of every derived award identifier.
pub const AWARD_ID_PREFIX: &str = "W91";

/// Number of hash characters embedded in an identifier.
const HASH_CHARS: usize = 10;

/// Derive the full award identifier for a source short id.
///
/// The identifier is `W91-<first 10 uppercase hex chars of MD5(short_id)>-<short_id>`.
/// It is stable across runs and is the ledger's deduplication key.
pub fn award_id(short_id: &str) -> String {
    let digest = format!("{:x}", md5::compute(short_id.as_bytes())).to_uppercase();
    format!("{}-{}-{}", AWARD_ID_PREFIX, &digest[..HASH_CHARS], short_id)
}
