//! Storage initialization
//!
//! First-run setup: directories, default settings and empty data files.

use crate::config::paths::PaycyclePaths;
use crate::config::settings::Settings;
use crate::error::PaycycleError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
///
/// Existing settings and data files are left untouched. Returns `true` when
/// this call created the settings file.
pub fn initialize_storage(paths: &PaycyclePaths) -> Result<bool, PaycycleError> {
    paths.ensure_directories()?;

    let created = !paths.is_initialized();
    if created {
        Settings::default().save(paths)?;
    }

    for (file, key) in [
        (paths.income_sources_file(), "income_sources"),
        (paths.periods_file(), "periods"),
        (paths.bills_file(), "bills"),
        (paths.assignments_file(), "assignments"),
    ] {
        if !file.exists() {
            write_json_atomic(&file, &serde_json::json!({ key: [] }))?;
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;
    use tempfile::TempDir;

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaycyclePaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(initialize_storage(&paths).unwrap());

        assert!(paths.is_initialized());
        assert!(paths.bills_file().exists());
        assert!(paths.periods_file().exists());

        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        assert_eq!(storage.bills.count().unwrap(), 0);
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PaycyclePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.planning_horizon_days = 14;
        settings.save(&paths).unwrap();
        std::fs::create_dir_all(paths.data_dir()).unwrap();
        std::fs::write(paths.bills_file(), r#"{"bills": []}"#).unwrap();

        assert!(!initialize_storage(&paths).unwrap());

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.planning_horizon_days, 14);
    }
}
