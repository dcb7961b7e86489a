use std::cmp::Ordering;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, Mutex};

use chrono::DateTime;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::models::{Client, Employee, PostType, ScheduledPost, Task, TaskType};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TableName {
    Tasks,
    Clients,
    Employees,
    TaskTypes,
    Posts,
    PostTypes,
}

impl TableName {
    pub const ALL: [TableName; 6] = [
        TableName::Tasks,
        TableName::Clients,
        TableName::Employees,
        TableName::TaskTypes,
        TableName::Posts,
        TableName::PostTypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TableName::Tasks => "tasks",
            TableName::Clients => "clients",
            TableName::Employees => "employees",
            TableName::TaskTypes => "task_types",
            TableName::Posts => "posts",
            TableName::PostTypes => "post_types",
        }
    }

    fn file_name(&self) -> String {
        format!("{}.json", self.as_str())
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row type stored in one table.
pub trait Record: Serialize + DeserializeOwned + Clone {
    const TABLE: TableName;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
}

macro_rules! impl_record {
    ($ty:ty, $table:expr) => {
        impl Record for $ty {
            const TABLE: TableName = $table;

            fn id(&self) -> u64 {
                self.id
            }

            fn set_id(&mut self, id: u64) {
                self.id = id;
            }
        }
    };
}

impl_record!(Task, TableName::Tasks);
impl_record!(Client, TableName::Clients);
impl_record!(Employee, TableName::Employees);
impl_record!(TaskType, TableName::TaskTypes);
impl_record!(ScheduledPost, TableName::Posts);
impl_record!(PostType, TableName::PostTypes);

/// A column condition, compared on the row's serialized JSON form.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Eq(String, Value),
    Gte(String, Value),
    Lte(String, Value),
    In(String, Vec<Value>),
}

impl Filter {
    fn matches(&self, row: &Value) -> bool {
        match self {
            Filter::Eq(col, v) => column(row, col) == v,
            Filter::Gte(col, v) => matches!(
                compare_values(column(row, col), v),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            Filter::Lte(col, v) => matches!(
                compare_values(column(row, col), v),
                Some(Ordering::Less | Ordering::Equal)
            ),
            Filter::In(col, vs) => {
                let cell = column(row, col);
                vs.iter().any(|v| v == cell)
            }
        }
    }
}

/// Row selection: all filters must hold; rows come back sorted if asked.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order_by: Option<(String, bool)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, col: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(col.to_string(), value.into()));
        self
    }

    pub fn gte(mut self, col: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(col.to_string(), value.into()));
        self
    }

    pub fn lte(mut self, col: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte(col.to_string(), value.into()));
        self
    }

    pub fn is_in<V: Into<Value>>(mut self, col: &str, values: impl IntoIterator<Item = V>) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.filters.push(Filter::In(col.to_string(), values));
        self
    }

    /// Sorts by `col`; rows where it is null always come last.
    pub fn order_by(mut self, col: &str, ascending: bool) -> Self {
        self.order_by = Some((col.to_string(), ascending));
        self
    }

    pub fn matches(&self, row: &Value) -> bool {
        self.filters.iter().all(|f| f.matches(row))
    }
}

static NULL: Value = Value::Null;

fn column<'a>(row: &'a Value, col: &str) -> &'a Value {
    row.get(col).unwrap_or(&NULL)
}

fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            // Timestamps omit zero fractional seconds, so compare them as instants.
            match (DateTime::parse_from_rfc3339(x), DateTime::parse_from_rfc3339(y)) {
                (Ok(x), Ok(y)) => Some(x.cmp(&y)),
                _ => Some(x.cmp(y)),
            }
        }
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// Emitted to a table's subscribers after every successful mutation.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeEvent {
    pub table: TableName,
    pub kind: ChangeKind,
    pub id: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Arc<dyn Fn(&ChangeEvent) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    table: TableName,
    callback: Callback,
}

/// Table store backed by one JSON file per table in a data directory.
pub struct Store {
    dir: PathBuf,
    subscriptions: Mutex<Vec<Subscription>>,
    next_subscription: AtomicU64,
}

impl Store {
    /// Opens (and creates if needed) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Store> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        tracing::debug!(dir = %dir.display(), "store opened");
        Ok(Store {
            dir,
            subscriptions: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, table: TableName) -> PathBuf {
        self.dir.join(table.file_name())
    }

    /// Loads every row of a table. A missing file is an empty table.
    fn load<R: Record>(&self) -> Result<Vec<R>> {
        let path = self.path(R::TABLE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut f = OpenOptions::new().read(true).open(&path)?;
        let mut s = String::new();
        f.read_to_string(&mut s)?;
        if s.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&s)?)
    }

    /// Overwrites a table with `rows`.
    fn save<R: Record>(&self, rows: &[R]) -> Result<()> {
        let path = self.path(R::TABLE);
        let s = serde_json::to_string_pretty(rows)?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)?;
        f.write_all(s.as_bytes())?;
        Ok(())
    }

    pub fn all<R: Record>(&self) -> Result<Vec<R>> {
        self.load()
    }

    pub fn select<R: Record>(&self, query: &Query) -> Result<Vec<R>> {
        let mut rows = Vec::new();
        for row in self.load::<R>()? {
            let json = serde_json::to_value(&row)?;
            if query.matches(&json) {
                rows.push((json, row));
            }
        }

        if let Some((col, ascending)) = &query.order_by {
            rows.sort_by(|(a, _), (b, _)| {
                let (a, b) = (column(a, col), column(b, col));
                match (a.is_null(), b.is_null()) {
                    (true, true) => Ordering::Equal,
                    (true, false) => Ordering::Greater,
                    (false, true) => Ordering::Less,
                    (false, false) => {
                        let ord = compare_values(a, b).unwrap_or(Ordering::Equal);
                        if *ascending { ord } else { ord.reverse() }
                    }
                }
            });
        }

        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    pub fn get<R: Record>(&self, id: u64) -> Result<R> {
        self.load::<R>()?
            .into_iter()
            .find(|r| r.id() == id)
            .ok_or(Error::NotFound { table: R::TABLE, id })
    }

    /// Inserts a row under the next free id and returns it.
    pub fn insert<R: Record>(&self, row: R) -> Result<R> {
        let mut inserted = self.insert_many(vec![row])?;
        inserted.pop().ok_or_else(|| Error::Invalid("insert produced no row".into()))
    }

    /// Inserts rows in one write, assigning consecutive ids.
    pub fn insert_many<R: Record>(&self, new_rows: Vec<R>) -> Result<Vec<R>> {
        let mut rows = self.load::<R>()?;
        let mut next_id = rows.iter().map(|r| r.id()).max().unwrap_or(0) + 1;
        let mut inserted = Vec::with_capacity(new_rows.len());
        for mut row in new_rows {
            row.set_id(next_id);
            next_id += 1;
            inserted.push(row.clone());
            rows.push(row);
        }
        self.save(&rows)?;
        tracing::info!(table = %R::TABLE, count = inserted.len(), "rows inserted");

        for row in &inserted {
            self.notify(ChangeEvent { table: R::TABLE, kind: ChangeKind::Insert, id: row.id() });
        }
        Ok(inserted)
    }

    /// Replaces the row with the same id.
    pub fn update<R: Record>(&self, row: &R) -> Result<R> {
        let mut rows = self.load::<R>()?;
        let slot = rows
            .iter_mut()
            .find(|r| r.id() == row.id())
            .ok_or(Error::NotFound { table: R::TABLE, id: row.id() })?;
        *slot = row.clone();
        self.save(&rows)?;
        tracing::info!(table = %R::TABLE, id = row.id(), "row updated");

        self.notify(ChangeEvent { table: R::TABLE, kind: ChangeKind::Update, id: row.id() });
        Ok(row.clone())
    }

    /// Loads a row, applies `edit` and writes it back.
    pub fn modify<R: Record>(&self, id: u64, edit: impl FnOnce(&mut R)) -> Result<R> {
        let mut row = self.get::<R>(id)?;
        edit(&mut row);
        row.set_id(id);
        self.update(&row)
    }

    pub fn delete<R: Record>(&self, id: u64) -> Result<()> {
        let mut rows = self.load::<R>()?;
        let len_before = rows.len();
        rows.retain(|r| r.id() != id);
        if rows.len() == len_before {
            return Err(Error::NotFound { table: R::TABLE, id });
        }
        self.save(&rows)?;
        tracing::info!(table = %R::TABLE, id, "row deleted");

        self.notify(ChangeEvent { table: R::TABLE, kind: ChangeKind::Delete, id });
        Ok(())
    }

    /// Calls `callback` after every insert, update or delete on `table`.
    pub fn subscribe(
        &self,
        table: TableName,
        callback: impl Fn(&ChangeEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, AtomicOrdering::Relaxed));
        self.subscriptions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Subscription { id, table, callback: Arc::new(callback) });
        tracing::debug!(%table, "subscribed");
        id
    }

    /// Returns false if the subscription was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.subscriptions.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let len_before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != len_before
    }

    fn notify(&self, event: ChangeEvent) {
        // Callbacks run without the lock held so they may subscribe or unsubscribe.
        let callbacks: Vec<Callback> = self
            .subscriptions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|s| s.table == event.table)
            .map(|s| Arc::clone(&s.callback))
            .collect();
        tracing::debug!(table = %event.table, id = event.id, listeners = callbacks.len(), "change event");
        for callback in callbacks {
            callback(&event);
        }
    }

    /// Deletes every table file in the data directory.
    pub fn reset(&self) -> Result<()> {
        for table in TableName::ALL {
            let path = self.path(table);
            if path.exists() {
                fs::remove_file(path)?;
            }
        }
        tracing::warn!(dir = %self.dir.display(), "all tables deleted");
        Ok(())
    }
}
