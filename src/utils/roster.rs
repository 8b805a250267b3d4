use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use crate::store::Store;
use crate::utils::import::{ImportOutcome, import_roster};

/// Installs an import's employees and histories; returns the employee count.
pub fn apply_import(store: &Store, outcome: ImportOutcome) -> usize {
    let count = outcome.employees.len();
    let (employees, histories): (Vec<_>, Vec<_>) = outcome
        .employees
        .into_iter()
        .map(|imported| {
            let id = imported.employee.id.clone();
            (imported.employee, (id, imported.history))
        })
        .unzip();
    store.replace_roster(employees, histories);
    count
}

/// Startup roster load, same parsing rules as the HR import endpoint.
pub fn load_seed(store: &Store, path: &Path, history_year: i32) -> Result<usize> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("seed path has no file name: {}", path.display()))?;
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;

    let outcome = import_roster(file_name, &content, history_year)
        .map_err(|e| anyhow!("seed file {} rejected: {}", path.display(), e))?;
    for skipped in &outcome.skipped {
        warn!("Seed {}: {}", file_name, skipped);
    }

    let count = apply_import(store, outcome);
    info!("Loaded {} employees from {}", count, path.display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn seed_file_populates_store() {
        let path = std::env::temp_dir().join(format!("roster-{}.csv", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "Employee No,Employee Name,January Annual").unwrap();
        writeln!(file, "BAYN00001,First Person,2").unwrap();
        writeln!(file, "BAYN00002,Second Person,").unwrap();
        drop(file);

        let store = Store::default();
        assert_eq!(load_seed(&store, &path, 2025).unwrap(), 2);
        assert_eq!(store.employee_count(), 2);
        assert_eq!(store.history("BAYN00001", 2025).total_availed(), 2.0);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_seed_file_is_an_error() {
        let store = Store::default();
        assert!(load_seed(&store, Path::new("/nonexistent/roster.csv"), 2025).is_err());
        assert_eq!(store.employee_count(), 0);
    }
}
