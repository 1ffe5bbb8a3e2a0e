use crate::config::{Config, CorruptPolicy};
use crate::db::{Expense, ExpenseFile};
use crate::error::GastosError;
use crate::service::aggregation::{self, MonthlySummary};
use crate::types::api::ExpenseInput;
use tracing::{debug, info};

/// CRUD over the expense file.
///
/// Every call reloads the whole file; mutating calls rewrite it. Nothing
/// here guards against concurrent callers, see `ExpensesActor`.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    file: ExpenseFile,
    policy: CorruptPolicy,
}

impl ExpenseRepository {
    pub fn new(file: ExpenseFile, policy: CorruptPolicy) -> Self {
        Self { file, policy }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(ExpenseFile::new(cfg.store_path()), cfg.on_corrupt)
    }

    pub fn file(&self) -> &ExpenseFile {
        &self.file
    }

    fn load(&self) -> Result<Vec<Expense>, GastosError> {
        match self.policy {
            CorruptPolicy::Empty => Ok(self.file.load()),
            CorruptPolicy::Fail => self.file.try_load(),
        }
    }

    pub fn list_all(&self) -> Result<Vec<Expense>, GastosError> {
        self.load()
    }

    pub fn find(&self, id: u64) -> Result<Expense, GastosError> {
        self.load()?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or(GastosError::NotFound(id))
    }

    pub fn next_id(&self) -> Result<u64, GastosError> {
        next_id_of(&self.load()?)
    }

    pub fn add(&self, input: ExpenseInput) -> Result<Expense, GastosError> {
        let draft = input.validate()?;
        let mut expenses = self.load()?;
        let expense = draft.into_expense(next_id_of(&expenses)?);

        expenses.push(expense.clone());
        self.file.save(&expenses)?;
        info!(id = expense.id, fecha = %expense.date, monto = expense.amount, "expense added");
        Ok(expense)
    }

    /// Replace every field of the first record with `id`. An unknown id is
    /// `NotFound` whatever the input holds.
    pub fn update(&self, id: u64, input: ExpenseInput) -> Result<Expense, GastosError> {
        let mut expenses = self.load()?;
        let Some(slot) = expenses.iter_mut().find(|e| e.id == id) else {
            debug!(id, "update for unknown expense");
            return Err(GastosError::NotFound(id));
        };
        *slot = input.validate()?.into_expense(id);
        let updated = slot.clone();

        self.file.save(&expenses)?;
        info!(id, fecha = %updated.date, monto = updated.amount, "expense updated");
        Ok(updated)
    }

    /// Remove every record with `id`. Absent ids are not an error.
    pub fn delete(&self, id: u64) -> Result<(), GastosError> {
        let mut expenses = self.load()?;
        let before = expenses.len();
        expenses.retain(|e| e.id != id);

        self.file.save(&expenses)?;
        info!(id, removed = before - expenses.len(), "expense delete");
        Ok(())
    }

    pub fn monthly(&self, year: i32, month: u32) -> Result<Vec<Expense>, GastosError> {
        Ok(aggregation::monthly(&self.load()?, year, month))
    }

    pub fn summary(&self) -> Result<Vec<MonthlySummary>, GastosError> {
        Ok(aggregation::summary(&self.load()?))
    }
}

fn next_id_of(expenses: &[Expense]) -> Result<u64, GastosError> {
    match expenses.iter().map(|e| e.id).max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(GastosError::IdSpaceExhausted(max)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    struct TempStore {
        dir: PathBuf,
    }

    impl TempStore {
        fn new(tag: &str) -> Self {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("system time before UNIX_EPOCH")
                .as_nanos();
            let mut dir = std::env::temp_dir();
            dir.push(format!("gastos-repo-{tag}-{}-{}", std::process::id(), nanos));
            Self { dir }
        }

        fn repo(&self, policy: CorruptPolicy) -> ExpenseRepository {
            ExpenseRepository::new(ExpenseFile::new(self.dir.join("gastos.csv")), policy)
        }
    }

    impl Drop for TempStore {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.dir);
        }
    }

    fn input(fecha: &str, monto: f64) -> ExpenseInput {
        ExpenseInput {
            fecha: Some(fecha.to_string()),
            descripcion: Some("Almuerzo".to_string()),
            categoria: Some("Comida".to_string()),
            monto: Some(json!(monto)),
        }
    }

    fn seeded(id: u64) -> Expense {
        Expense {
            id,
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: "seed".to_string(),
            category: "seed".to_string(),
            amount: 1.0,
        }
    }

    #[test]
    fn next_id_starts_at_one_and_follows_max() {
        let tmp = TempStore::new("next-id");
        let repo = tmp.repo(CorruptPolicy::Empty);
        assert_eq!(repo.next_id().unwrap(), 1);

        repo.file().save(&[seeded(1), seeded(3)]).unwrap();
        assert_eq!(repo.next_id().unwrap(), 4);
    }

    #[test]
    fn add_appends_one_record_with_greater_id() {
        let tmp = TempStore::new("add");
        let repo = tmp.repo(CorruptPolicy::Empty);
        repo.file().save(&[seeded(5), seeded(2)]).unwrap();

        let before = repo.list_all().unwrap();
        let created = repo.add(input("2024-03-15", 42.5)).unwrap();
        let after = repo.list_all().unwrap();

        assert_eq!(after.len(), before.len() + 1);
        assert!(before.iter().all(|e| e.id < created.id));
        assert_eq!(after.last(), Some(&created));
        assert_eq!((created.year(), created.month()), (2024, 3));
    }

    #[test]
    fn add_rejects_invalid_input_without_writing() {
        let tmp = TempStore::new("add-invalid");
        let repo = tmp.repo(CorruptPolicy::Empty);
        let err = repo.add(input("15-03-2024", 1.0)).unwrap_err();
        assert!(matches!(err, GastosError::Validation(_)));
        assert!(!repo.file().path().exists());
    }

    #[test]
    fn update_replaces_fields_and_rederives_month() {
        let tmp = TempStore::new("update");
        let repo = tmp.repo(CorruptPolicy::Empty);
        let created = repo.add(input("2024-01-10", 10.0)).unwrap();

        let mut change = input("2023-11-02", -3.0);
        change.descripcion = Some("Reembolso".to_string());
        let updated = repo.update(created.id, change).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!((updated.year(), updated.month()), (2023, 11));
        assert_eq!(repo.find(created.id).unwrap(), updated);
        assert_eq!(repo.list_all().unwrap().len(), 1);
    }

    #[test]
    fn update_unknown_id_leaves_store_untouched() {
        let tmp = TempStore::new("update-missing");
        let repo = tmp.repo(CorruptPolicy::Empty);
        repo.add(input("2024-01-10", 10.0)).unwrap();
        let before = fs::read(repo.file().path()).unwrap();

        let err = repo.update(99, input("2024-02-02", 1.0)).unwrap_err();
        assert!(matches!(err, GastosError::NotFound(99)));
        assert_eq!(fs::read(repo.file().path()).unwrap(), before);
    }

    #[test]
    fn update_unknown_id_with_invalid_input_is_not_found() {
        let tmp = TempStore::new("update-missing-invalid");
        let repo = tmp.repo(CorruptPolicy::Empty);

        let err = repo.update(42, input("not-a-date", 1.0)).unwrap_err();
        assert!(matches!(err, GastosError::NotFound(42)));
        assert!(!repo.file().path().exists());
    }

    #[test]
    fn update_known_id_with_invalid_input_is_rejected() {
        let tmp = TempStore::new("update-invalid");
        let repo = tmp.repo(CorruptPolicy::Empty);
        let created = repo.add(input("2024-01-10", 10.0)).unwrap();

        let err = repo.update(created.id, input("10/01/2024", 1.0)).unwrap_err();
        assert!(matches!(err, GastosError::Validation(_)));
        assert_eq!(repo.find(created.id).unwrap(), created);
    }

    #[test]
    fn add_after_max_id_fails_without_writing() {
        let tmp = TempStore::new("max-id");
        let repo = tmp.repo(CorruptPolicy::Empty);
        repo.file().save(&[seeded(u64::MAX)]).unwrap();
        let before = fs::read(repo.file().path()).unwrap();

        assert!(matches!(
            repo.next_id(),
            Err(GastosError::IdSpaceExhausted(u64::MAX))
        ));
        assert!(matches!(
            repo.add(input("2024-01-10", 1.0)),
            Err(GastosError::IdSpaceExhausted(_))
        ));
        assert_eq!(fs::read(repo.file().path()).unwrap(), before);
    }

    #[test]
    fn delete_is_idempotent() {
        let tmp = TempStore::new("delete");
        let repo = tmp.repo(CorruptPolicy::Empty);
        let a = repo.add(input("2024-01-10", 10.0)).unwrap();
        let b = repo.add(input("2024-01-11", 11.0)).unwrap();

        repo.delete(a.id).unwrap();
        let once = repo.list_all().unwrap();
        repo.delete(a.id).unwrap();
        let twice = repo.list_all().unwrap();

        assert_eq!(once, vec![b]);
        assert_eq!(once, twice);
    }

    #[test]
    fn ids_are_not_reused_below_the_max() {
        let tmp = TempStore::new("reuse");
        let repo = tmp.repo(CorruptPolicy::Empty);
        let a = repo.add(input("2024-01-10", 1.0)).unwrap();
        let b = repo.add(input("2024-01-10", 1.0)).unwrap();
        repo.delete(a.id).unwrap();
        assert_eq!(repo.add(input("2024-01-10", 1.0)).unwrap().id, b.id + 1);
    }

    #[test]
    fn queries_read_through_the_file() {
        let tmp = TempStore::new("queries");
        let repo = tmp.repo(CorruptPolicy::Empty);
        repo.add(input("2024-01-15", 10.0)).unwrap();
        repo.add(input("2024-02-01", 7.0)).unwrap();
        repo.add(input("2024-01-20", 5.0)).unwrap();

        let january: Vec<u64> = repo.monthly(2024, 1).unwrap().iter().map(|e| e.id).collect();
        assert_eq!(january, vec![1, 3]);

        let summary = repo.summary().unwrap();
        assert_eq!(summary[0].total, 15.0);
        assert_eq!(summary[0].count, 2);
        assert_eq!(summary[1].month, 2);
    }

    #[test]
    fn corrupt_policy_controls_load_failures() {
        let tmp = TempStore::new("corrupt");
        fs::create_dir_all(&tmp.dir).unwrap();
        let path = tmp.dir.join("gastos.csv");
        fs::write(&path, "id,fecha\nnot-a-number,never\n").unwrap();

        let strict = tmp.repo(CorruptPolicy::Fail);
        assert!(matches!(
            strict.list_all(),
            Err(GastosError::CorruptStore { .. })
        ));
        assert!(strict.add(input("2024-01-01", 1.0)).is_err());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "id,fecha\nnot-a-number,never\n"
        );

        let lenient = tmp.repo(CorruptPolicy::Empty);
        assert!(lenient.list_all().unwrap().is_empty());
        assert_eq!(lenient.add(input("2024-01-01", 1.0)).unwrap().id, 1);
    }
}
