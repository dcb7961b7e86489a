use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::Result;
use crate::models::{Client, Employee, Task, TaskType};
use crate::storage::Store;

/// Id-to-row lookups used to show and search by related names.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    pub clients: HashMap<u64, Client>,
    pub employees: HashMap<u64, Employee>,
    pub task_types: HashMap<u64, TaskType>,
}

impl Directory {
    pub fn new(clients: Vec<Client>, employees: Vec<Employee>, task_types: Vec<TaskType>) -> Self {
        Directory {
            clients: clients.into_iter().map(|c| (c.id, c)).collect(),
            employees: employees.into_iter().map(|e| (e.id, e)).collect(),
            task_types: task_types.into_iter().map(|t| (t.id, t)).collect(),
        }
    }

    pub fn load(store: &Store) -> Result<Self> {
        Ok(Self::new(store.all()?, store.all()?, store.all()?))
    }

    pub fn client_name(&self, id: Option<u64>) -> Option<&str> {
        id.and_then(|id| self.clients.get(&id)).map(|c| c.name.as_str())
    }

    pub fn employee_name(&self, id: Option<u64>) -> Option<&str> {
        id.and_then(|id| self.employees.get(&id)).map(|e| e.name.as_str())
    }

    pub fn task_type(&self, id: Option<u64>) -> Option<&TaskType> {
        id.and_then(|id| self.task_types.get(&id))
    }
}

/// Shortcut date filters on a task's due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickPeriod {
    Today,
    Tomorrow,
    /// Monday to Sunday of the current week.
    Week,
}

impl QuickPeriod {
    pub fn contains(self, date: NaiveDate, today: NaiveDate) -> bool {
        match self {
            QuickPeriod::Today => date == today,
            QuickPeriod::Tomorrow => Some(date) == today.succ_opt(),
            QuickPeriod::Week => {
                let (start, end) = week_bounds(today);
                start <= date && date <= end
            }
        }
    }
}

impl FromStr for QuickPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" | "hoje" => Ok(QuickPeriod::Today),
            "tomorrow" | "amanha" | "amanhã" => Ok(QuickPeriod::Tomorrow),
            "week" | "semana" => Ok(QuickPeriod::Week),
            other => Err(format!("unknown period '{}' (today, tomorrow, week)", other)),
        }
    }
}

/// Monday and Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = date - Duration::days(date.weekday().num_days_from_monday() as i64);
    (start, start + Duration::days(6))
}

/// Combined task filter. Empty id sets do not filter.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub search: Option<String>,
    /// Takes precedence over `date_from`/`date_to` when set.
    pub period: Option<QuickPeriod>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub clients: Vec<u64>,
    pub task_types: Vec<u64>,
    pub employees: Vec<u64>,
    pub hide_completed: bool,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, dir: &Directory, today: NaiveDate) -> bool {
        if self.hide_completed && task.completed {
            return false;
        }

        if let Some(search) = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let needle = search.to_lowercase();
            let hit = |s: Option<&str>| s.is_some_and(|s| s.to_lowercase().contains(&needle));
            let matched = hit(Some(task.description.as_str()))
                || hit(dir.client_name(task.client_id))
                || hit(dir.employee_name(task.employee_id))
                || hit(task.location.as_deref());
            if !matched {
                return false;
            }
        }

        if let Some(period) = self.period {
            if !period.contains(task.due_date, today) {
                return false;
            }
        } else {
            if self.date_from.is_some_and(|from| task.due_date < from) {
                return false;
            }
            if self.date_to.is_some_and(|to| task.due_date > to) {
                return false;
            }
        }

        if !in_set(&self.clients, task.client_id)
            || !in_set(&self.task_types, task.task_type_id)
            || !in_set(&self.employees, task.employee_id)
        {
            return false;
        }
        true
    }

    /// Filters then orders by deadline.
    pub fn apply(&self, tasks: &[Task], dir: &Directory, today: NaiveDate) -> Vec<Task> {
        let mut out: Vec<Task> = tasks.iter().filter(|t| self.matches(t, dir, today)).cloned().collect();
        sort_by_deadline(&mut out);
        out
    }

    /// Number of active filter groups, as shown next to the filter toggle.
    pub fn active_count(&self) -> usize {
        usize::from(self.period.is_some())
            + usize::from(self.date_from.is_some() || self.date_to.is_some())
            + self.clients.len()
            + self.task_types.len()
            + self.employees.len()
    }
}

fn in_set(set: &[u64], id: Option<u64>) -> bool {
    set.is_empty() || id.is_some_and(|id| set.contains(&id))
}

/// Tasks with a deadline first (soonest first), then the rest by due date.
pub fn sort_by_deadline(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| match (a.deadline, b.deadline) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.due_date.cmp(&b.due_date),
    });
}
