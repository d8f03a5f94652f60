use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

use super::error::SaveError;
use super::SAVE_VERSION;
use crate::league::{LeagueState, Phase, RetirementNotice};
use crate::models::{Player, Season, SeasonArchive};

/// Everything needed to resume a league. A pure value copy: loading a
/// snapshot reconstructs the engine without re-deriving anything.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LeagueSave {
    /// Save format version for migration.
    pub version: u32,

    /// Save timestamp (unix milliseconds).
    pub timestamp: u64,

    /// The active player registry, exactly ten players.
    pub players: Vec<Player>,

    pub current_season: Season,

    /// Completed seasons with their full match lists, oldest first.
    pub seasons: Vec<Season>,

    /// Append-only season archive, oldest first.
    pub archives: Vec<SeasonArchive>,

    pub retired_players: Vec<Player>,

    /// Unacknowledged retirement notices, if the league was saved during
    /// the transition pause.
    pub pending_retirements: Vec<RetirementNotice>,

    pub phase: Phase,

    /// Deterministic RNG state: base seed plus commands consumed.
    pub base_seed: u64,
    pub rng_draws: u64,
}

impl LeagueSave {
    pub fn from_state(state: &LeagueState) -> Self {
        let parts = state.snapshot_parts();
        Self {
            version: SAVE_VERSION,
            timestamp: current_timestamp(),
            players: parts.players.to_vec(),
            current_season: parts.current_season.clone(),
            seasons: parts.seasons.to_vec(),
            archives: parts.archives.to_vec(),
            retired_players: parts.retired_players.to_vec(),
            pending_retirements: parts.pending_retirements.to_vec(),
            phase: parts.phase,
            base_seed: parts.base_seed,
            rng_draws: parts.rng_draws,
        }
    }

    pub fn into_state(self) -> LeagueState {
        LeagueState::from_snapshot(
            self.players,
            self.current_season,
            self.seasons,
            self.archives,
            self.retired_players,
            self.pending_retirements,
            self.phase,
            self.base_seed,
            self.rng_draws,
        )
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        // A league can never legitimately grow past a handful of entities.
        if self.players.len() > 100 || self.retired_players.len() > 10_000 {
            return Err(SaveError::Corrupted);
        }

        let mut ids = std::collections::HashSet::new();
        for player in self.players.iter().chain(&self.retired_players) {
            if !ids.insert(player.id) {
                return Err(SaveError::Corrupted);
            }
        }

        Ok(())
    }
}

/// Serialize, compress and checksum a snapshot.
pub fn serialize_and_compress(save: &LeagueSave) -> Result<Vec<u8>, SaveError> {
    save.validate()?;

    // 1. MessagePack with field names for migration tolerance.
    let msgpack = to_vec_named(save).map_err(SaveError::Serialization)?;

    // 2. LZ4 with the size prepended for easy decompression.
    let compressed = compress_prepend_size(&msgpack);

    // 3. SHA-256 checksum appended.
    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Verify, decompress and deserialize a snapshot.
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<LeagueSave, SaveError> {
    // Minimum: LZ4 size header plus checksum.
    if bytes.len() < 4 + 32 {
        return Err(SaveError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated = hasher.finalize();
    if &calculated[..] != checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;
    let save: LeagueSave = from_slice(&msgpack).map_err(SaveError::Deserialization)?;

    if save.version > SAVE_VERSION {
        return Err(SaveError::VersionMismatch { found: save.version, expected: SAVE_VERSION });
    }

    save.validate()?;
    Ok(save)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        let state = LeagueState::new(404);
        let save = LeagueSave::from_state(&state);

        let bytes = serialize_and_compress(&save).unwrap();
        let restored = decompress_and_deserialize(&bytes).unwrap();

        assert_eq!(save.version, restored.version);
        assert_eq!(save.base_seed, restored.base_seed);
        assert_eq!(save.players.len(), restored.players.len());
        assert_eq!(restored.into_state(), state);
    }

    #[test]
    fn test_checksum_validation() {
        let state = LeagueState::new(405);
        let mut bytes = serialize_and_compress(&LeagueSave::from_state(&state)).unwrap();

        if let Some(last) = bytes.last_mut() {
            *last = last.wrapping_add(1);
        }

        let result = decompress_and_deserialize(&bytes);
        assert!(matches!(result, Err(SaveError::ChecksumMismatch)));
    }

    #[test]
    fn test_truncated_payload_is_corrupted() {
        let result = decompress_and_deserialize(&[0u8; 10]);
        assert!(matches!(result, Err(SaveError::Corrupted)));
    }

    #[test]
    fn test_duplicate_player_ids_fail_validation() {
        let state = LeagueState::new(406);
        let mut save = LeagueSave::from_state(&state);
        save.players.push(save.players[0].clone());

        assert!(matches!(save.validate(), Err(SaveError::Corrupted)));
    }

    #[test]
    fn test_future_version_rejected() {
        let state = LeagueState::new(407);
        let mut save = LeagueSave::from_state(&state);
        save.version = SAVE_VERSION + 1;

        // Skip validate-on-write by serializing manually.
        let msgpack = to_vec_named(&save).unwrap();
        let compressed = compress_prepend_size(&msgpack);
        let mut hasher = Sha256::new();
        hasher.update(&compressed);
        let checksum = hasher.finalize();
        let mut bytes = compressed;
        bytes.extend_from_slice(&checksum);

        let result = decompress_and_deserialize(&bytes);
        assert!(matches!(result, Err(SaveError::VersionMismatch { .. })));
    }
}
