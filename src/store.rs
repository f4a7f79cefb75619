use chrono::Utc;

use crate::db::storage::KeyValueStorage;
use crate::error::Result;
use crate::models::expense::{Expense, ExpenseDraft};

pub const STORAGE_KEY: &str = "expenses";

/// Reads the persisted expense list. Any failure yields an empty history.
pub fn load_expenses<S: KeyValueStorage>(storage: &S) -> Vec<Expense> {
    let raw = match storage.get_item(STORAGE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::error!("failed to read \"{STORAGE_KEY}\" from storage: {e}");
            return Vec::new();
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::error!("failed to parse stored expenses as JSON: {e}");
            return Vec::new();
        }
    };

    let serde_json::Value::Array(items) = value else {
        tracing::warn!("stored expenses are not a list, starting empty");
        return Vec::new();
    };

    // One unreadable record must not take the rest of the history with it.
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(expense) => Some(expense),
            Err(e) => {
                tracing::warn!("skipping stored expense #{index}: {e}");
                None
            }
        })
        .collect()
}

/// The in-memory expense list, mirrored to storage after every change.
#[derive(Debug)]
pub struct ExpenseStore<S: KeyValueStorage> {
    storage: S,
    expenses: Vec<Expense>,
}

impl<S: KeyValueStorage> ExpenseStore<S> {
    pub fn load(storage: S) -> Self {
        let expenses = load_expenses(&storage);
        tracing::info!("loaded {} expenses", expenses.len());
        Self { storage, expenses }
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Appends a record built from `draft`, stamped with the current time.
    /// Returns the new id, or `None` if the draft was incomplete.
    pub fn add(&mut self, draft: &ExpenseDraft) -> Result<Option<i64>> {
        self.add_at(draft, Utc::now().timestamp_millis())
    }

    pub fn add_at(&mut self, draft: &ExpenseDraft, timestamp_millis: i64) -> Result<Option<i64>> {
        let id = self.next_id(timestamp_millis);
        let Some(expense) = draft.to_expense(id) else {
            return Ok(None);
        };

        self.expenses.push(expense);
        tracing::debug!(id, category = %draft.category, "expense added");

        self.persist()?;
        Ok(Some(id))
    }

    /// Removes the record with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: i64) -> Result<bool> {
        let before = self.expenses.len();
        self.expenses.retain(|e| e.id != id);
        if self.expenses.len() == before {
            return Ok(false);
        }

        tracing::debug!(id, "expense deleted");
        self.persist()?;
        Ok(true)
    }

    pub fn persist(&mut self) -> Result<()> {
        let payload = serde_json::to_string(&self.expenses)?;
        self.storage.set_item(STORAGE_KEY, &payload)
    }

    // Two adds within the same millisecond would otherwise collide.
    fn next_id(&self, timestamp_millis: i64) -> i64 {
        let max = match self.expenses.iter().map(|e| e.id).max() {
            Some(max) if max >= timestamp_millis => max,
            _ => return timestamp_millis,
        };
        if let Some(id) = max.checked_add(1) {
            return id;
        }

        // Ids already reach i64::MAX: walk down from the clock to a free one.
        let mut id = timestamp_millis;
        while self.expenses.iter().any(|e| e.id == id) {
            id -= 1;
        }
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::DbConnection;
    use crate::models::category::CategoryFilter;
    use crate::view::{filter_expenses, total};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn draft(date: &str, category: &str, amount: Option<i64>) -> ExpenseDraft {
        ExpenseDraft {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(),
            category: category.to_string(),
            amount: amount.map(Decimal::from),
            memo: String::new(),
        }
    }

    fn empty_store() -> ExpenseStore<DbConnection> {
        ExpenseStore::load(DbConnection::in_memory().unwrap())
    }

    fn store_with(raw: &str) -> ExpenseStore<DbConnection> {
        let mut db = DbConnection::in_memory().unwrap();
        db.set_item(STORAGE_KEY, raw).unwrap();
        ExpenseStore::load(db)
    }

    #[test]
    fn load_without_stored_value_is_empty() {
        assert!(empty_store().expenses().is_empty());
    }

    #[test]
    fn load_of_invalid_json_is_empty() {
        assert!(store_with("not json").expenses().is_empty());
    }

    #[test]
    fn load_of_non_list_is_empty() {
        assert!(store_with(r#"{"id": 1}"#).expenses().is_empty());
        assert!(store_with("42").expenses().is_empty());
    }

    #[test]
    fn load_of_malformed_records_is_empty() {
        assert!(store_with(r#"[{"id": "x"}]"#).expenses().is_empty());
    }

    #[test]
    fn load_skips_only_unreadable_records() {
        let store = store_with(
            r#"[
                {"id": 1, "date": "2024-01-01", "category": "food", "amount": 500, "memo": ""},
                {"id": 2, "date": "2024-01-02", "category": "rent", "amount": null, "memo": ""},
                {"id": 3, "date": "2024-01-03", "category": "transit", "amount": 300, "memo": ""}
            ]"#,
        );

        let ids: Vec<_> = store.expenses().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn add_appends_record_matching_draft() {
        let mut store = empty_store();
        let mut input = draft("2024-01-01", "food", Some(500));
        input.memo = "groceries".to_string();

        let id = store.add_at(&input, 1_000).unwrap();

        assert_eq!(id, Some(1_000));
        assert_eq!(store.expenses().len(), 1);
        let added = &store.expenses()[0];
        assert_eq!(added.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(added.category, "food");
        assert_eq!(added.amount, Decimal::from(500));
        assert_eq!(added.memo, "groceries");
    }

    #[test]
    fn add_rejects_incomplete_drafts() {
        let mut store = empty_store();

        assert_eq!(store.add_at(&draft("", "food", Some(1)), 1).unwrap(), None);
        assert_eq!(store.add_at(&draft("2024-01-01", "", Some(1)), 2).unwrap(), None);
        assert_eq!(store.add_at(&draft("2024-01-01", "food", None), 3).unwrap(), None);
        assert!(store.expenses().is_empty());
        assert_eq!(store.storage().get_item(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn ids_stay_unique_within_the_same_instant() {
        let mut store = empty_store();
        let a = store.add_at(&draft("2024-01-01", "food", Some(1)), 5_000).unwrap();
        let b = store.add_at(&draft("2024-01-01", "food", Some(1)), 5_000).unwrap();
        let c = store.add(&draft("2024-01-01", "food", Some(1))).unwrap();

        assert_eq!(a, Some(5_000));
        assert_eq!(b, Some(5_001));
        assert!(c.unwrap() > 5_001);
    }

    #[test]
    fn add_preserves_insertion_order() {
        let mut store = empty_store();
        store.add_at(&draft("2024-03-01", "rent", Some(1)), 30).unwrap();
        store.add_at(&draft("2024-01-01", "food", Some(1)), 10).unwrap();

        let categories: Vec<_> = store.expenses().iter().map(|e| e.category.as_str()).collect();
        assert_eq!(categories, vec!["rent", "food"]);
    }

    #[test]
    fn delete_removes_only_the_matching_record() {
        let mut store = empty_store();
        store.add_at(&draft("2024-01-01", "food", Some(1)), 10).unwrap();
        store.add_at(&draft("2024-01-02", "food", Some(2)), 20).unwrap();
        store.add_at(&draft("2024-01-03", "food", Some(3)), 30).unwrap();

        assert!(store.delete(20).unwrap());

        let ids: Vec<_> = store.expenses().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 30]);
    }

    #[test]
    fn delete_of_unknown_id_is_a_no_op() {
        let mut store = empty_store();
        store.add_at(&draft("2024-01-01", "food", Some(1)), 10).unwrap();

        assert!(!store.delete(99).unwrap());
        assert_eq!(store.expenses().len(), 1);
    }

    #[test]
    fn every_change_is_persisted_and_reloads_equal() {
        let mut store = empty_store();
        let mut input = draft("2024-01-01", "food", None);
        input.amount = Some(Decimal::from_str("1234.56").unwrap());
        input.memo = "market".to_string();
        store.add_at(&input, 10).unwrap();
        store.add_at(&draft("2024-01-02", "transit", Some(300)), 20).unwrap();

        let reloaded = load_expenses(store.storage());
        assert_eq!(reloaded, store.expenses());

        store.delete(10).unwrap();
        let reloaded = load_expenses(store.storage());
        assert_eq!(reloaded, store.expenses());
    }

    #[test]
    fn large_amounts_survive_a_reload() {
        let mut store = empty_store();
        let mut input = draft("2024-01-01", "rent", None);
        input.amount = Some(Decimal::from_str("12345678901234567.89").unwrap());
        store.add_at(&input, 10).unwrap();
        store.add_at(&draft("2024-01-02", "food", Some(500)), 20).unwrap();
        input.amount = Some(Decimal::MAX);
        store.add_at(&input, 30).unwrap();

        let raw = store.storage().get_item(STORAGE_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""amount":500,"#));
        assert!(raw.contains("79228162514264337593543950335"));

        let reloaded = load_expenses(store.storage());
        assert_eq!(reloaded.len(), 3);
        assert_eq!(reloaded, store.expenses());
    }

    #[test]
    fn id_at_the_top_of_the_range_does_not_overflow() {
        let store_json = format!(
            r#"[{{"id": {}, "date": "2024-01-01", "category": "food", "amount": 1, "memo": ""}}]"#,
            i64::MAX
        );
        let mut store = store_with(&store_json);
        store.add_at(&draft("2024-01-02", "food", Some(1)), i64::MAX).unwrap();
        store.add_at(&draft("2024-01-03", "food", Some(1)), i64::MAX).unwrap();

        let ids: Vec<_> = store.expenses().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![i64::MAX, i64::MAX - 1, i64::MAX - 2]);
    }

    #[test]
    fn reopened_database_restores_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.db");

        let expected = {
            let mut store = ExpenseStore::load(DbConnection::new(&path).unwrap());
            store.add_at(&draft("2024-01-01", "food", Some(500)), 10).unwrap();
            store.expenses().to_vec()
        };

        let store = ExpenseStore::load(DbConnection::new(&path).unwrap());
        assert_eq!(store.expenses(), expected.as_slice());
    }

    #[test]
    fn food_and_transit_example() {
        let mut store = empty_store();
        store.add_at(&draft("2024-01-01", "food", Some(500)), 10).unwrap();
        store.add_at(&draft("2024-01-02", "transit", Some(300)), 20).unwrap();

        assert_eq!(store.expenses().len(), 2);
        assert_eq!(total(store.expenses()), Some(Decimal::from(800)));

        let visible = filter_expenses(store.expenses(), &CategoryFilter::Only("food".to_string()));
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 10);
        assert_eq!(total(visible), Some(Decimal::from(500)));
    }
}
