use std::fs::{remove_file, rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, LeagueSave};
use crate::league::LeagueState;

pub struct SaveManager;

impl SaveManager {
    /// Snapshot the league and write it atomically.
    pub fn save_state(path: &Path, state: &LeagueState) -> Result<(), SaveError> {
        let save = LeagueSave::from_state(state);
        Self::save_to_path(path, &save)
    }

    /// Load a snapshot and reconstruct the league from it.
    pub fn load_state(path: &Path) -> Result<LeagueState, SaveError> {
        let save = Self::load_from_path(path)?;
        Ok(save.into_state())
    }

    /// Resume from a snapshot, or fall back to first-time initialization
    /// when the snapshot is absent or unreadable. Only unrecoverable
    /// errors propagate.
    pub fn load_or_new(path: &Path, base_seed: u64) -> Result<LeagueState, SaveError> {
        match Self::load_state(path) {
            Ok(state) => {
                log::info!("league resumed from {:?}", path);
                Ok(state)
            }
            Err(err) if err.is_recoverable() => {
                log::warn!("no usable snapshot at {:?} ({}), starting fresh", path, err);
                Ok(LeagueState::new(base_seed))
            }
            Err(err) => Err(err),
        }
    }

    /// Conventional autosave location under a host-chosen directory.
    pub fn auto_save_path(dir: &Path) -> PathBuf {
        dir.join("league_auto_save.dat")
    }

    pub fn delete(path: &Path) -> Result<(), SaveError> {
        if path.exists() {
            remove_file(path)?;
            log::info!("deleted snapshot {:?}", path);
        }
        Ok(())
    }

    pub fn save_to_path(path: &Path, save: &LeagueSave) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(save)?;

        // Atomic save: write to temp file, then rename.
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;

            // sync_all ensures data reaches disk (portable fsync).
            file.sync_all()?;
        }
        rename(&temp_path, path)?;

        log::debug!("saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<LeagueSave, SaveError> {
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let save = decompress_and_deserialize(&data)?;
        log::debug!("loaded {} bytes from {:?}", data.len(), path);
        Ok(save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("league.dat");

        let state = LeagueState::new(2001);
        SaveManager::save_state(&save_path, &state).unwrap();

        let restored = SaveManager::load_state(&save_path).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_roundtrip_mid_season_resumes_exactly() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("mid_season.dat");

        let mut state = LeagueState::new(2002);
        for _ in 0..7 {
            state.simulate_next_match().unwrap();
        }
        SaveManager::save_state(&save_path, &state).unwrap();

        let mut restored = SaveManager::load_state(&save_path).unwrap();
        assert_eq!(restored, state);

        // The restored league replays the same future as the original.
        let a = state.simulate_next_match().unwrap();
        let b = restored.simulate_next_match().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_roundtrip_preserves_season_history() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("history.dat");

        let mut state = LeagueState::new(2005);
        while state.current_season().remaining_matches() > 0 {
            state.simulate_next_match().unwrap();
        }
        state.end_season().unwrap();
        state.acknowledge_retirements().unwrap();

        SaveManager::save_state(&save_path, &state).unwrap();
        let restored = SaveManager::load_state(&save_path).unwrap();

        assert_eq!(restored.completed_seasons().len(), 1);
        let season = &restored.completed_seasons()[0];
        assert_eq!(season.number, 1);
        assert_eq!(season.matches.len(), 44);
        assert!(season.matches.iter().all(|m| m.completed));
        assert_eq!(restored.completed_seasons(), state.completed_seasons());
    }

    #[test]
    fn test_atomic_save_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("atomic.dat");

        let state = LeagueState::new(2003);
        SaveManager::save_state(&save_path, &state).unwrap();

        assert!(save_path.exists());
        assert!(!save_path.with_extension("tmp").exists());
    }

    #[test]
    fn test_load_or_new_falls_back_on_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("missing.dat");

        let state = SaveManager::load_or_new(&save_path, 99).unwrap();
        assert_eq!(state.current_season().number, 1);
        assert_eq!(state.players().len(), 10);
    }

    #[test]
    fn test_load_or_new_falls_back_on_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("corrupt.dat");
        std::fs::write(&save_path, b"definitely not a snapshot").unwrap();

        let state = SaveManager::load_or_new(&save_path, 7).unwrap();
        assert_eq!(state.current_season().number, 1);
    }

    #[test]
    fn test_delete_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("gone.dat");

        SaveManager::delete(&save_path).unwrap();

        let state = LeagueState::new(2004);
        SaveManager::save_state(&save_path, &state).unwrap();
        SaveManager::delete(&save_path).unwrap();
        assert!(!save_path.exists());
    }
}
