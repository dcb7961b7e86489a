use std::collections::BTreeMap;

use chrono::NaiveDate;
use ratatui::widgets::TableState;

use crate::calendar;

use crate::commands::{cmd_task_add, cmd_task_edit, cmd_task_remove, cmd_task_toggle, NewTask, TaskEdit};
use crate::error::Result;
use crate::filters::{week_bounds, Directory, QuickPeriod, TaskFilter};
use crate::locale::Locale;
use crate::models::{ScheduledPost, Task};
use crate::session::{DeadlineView, Session};

use super::Mode;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
}

#[derive(Clone, Copy, PartialEq)]
pub enum InputField {
    None,
    Description,
    Date,
    Deadline,
    Search,
}

/// One table row: a task with everything derived for display.
pub struct TaskItem {
    pub task: Task,
    pub view: DeadlineView,
    pub client: Option<String>,
    pub staff: Option<String>,
    pub kind: Option<(String, String)>,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub description: String,
    pub date: String,
    pub step: usize, // 0: Description, 1: Date, 2: Deadline
}

pub struct App {
    pub mode: Mode,
    pub items: Vec<TaskItem>,
    /// Everything in the current week for the TV strip, completed included.
    pub week: Vec<TaskItem>,
    pub week_posts: BTreeMap<NaiveDate, Vec<ScheduledPost>>,
    pub state: TableState,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    pub add_state: AddState,
    pub filter: TaskFilter,
    pub today: NaiveDate,
    pub locale: Locale,
    pub status: Option<String>,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(session: &Session, mode: Mode) -> Result<App> {
        let mut app = App {
            mode,
            items: Vec::new(),
            week: Vec::new(),
            week_posts: BTreeMap::new(),
            state: TableState::default(),
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            filter: TaskFilter { hide_completed: true, ..TaskFilter::default() },
            today: session.today(),
            locale: session.config.locale,
            status: None,
        };
        app.reload(session)?;
        Ok(app)
    }

    /// Refetches every task and recomputes urgency at the current instant.
    pub fn reload(&mut self, session: &Session) -> Result<()> {
        self.today = session.today();
        let dir = Directory::load(&session.store)?;
        let tasks: Vec<Task> = session.store.all()?;

        let item = |task: &Task| TaskItem {
            view: session.deadline_view(task),
            client: dir.client_name(task.client_id).map(str::to_string),
            staff: dir.employee_name(task.employee_id).map(str::to_string),
            kind: dir.task_type(task.task_type_id).map(|k| (k.name.clone(), k.color.clone())),
            task: task.clone(),
        };

        self.items = self.filter.apply(&tasks, &dir, self.today).iter().map(item).collect();

        let week = TaskFilter { period: Some(QuickPeriod::Week), ..TaskFilter::default() };
        self.week = week.apply(&tasks, &dir, self.today).iter().map(item).collect();

        let (start, end) = week_bounds(self.today);
        let posts: Vec<ScheduledPost> = session.store.all()?;
        self.week_posts = calendar::posts_by_day(&posts, session.zone());
        self.week_posts.retain(|day, _| start <= *day && *day <= end);

        if self.items.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.items.len() {
                self.state.select(Some(self.items.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
        tracing::debug!(tasks = self.items.len(), "dashboard refetched");
        Ok(())
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn selected(&self) -> Option<&TaskItem> {
        self.state.selected().and_then(|i| self.items.get(i))
    }

    fn report(&mut self, session: &Session, outcome: Result<()>) {
        match outcome.and_then(|_| self.reload(session)) {
            Ok(()) => self.status = None,
            Err(e) => {
                tracing::warn!(error = %e, "dashboard action failed");
                self.status = Some(e.to_string());
            }
        }
    }

    /// Toggles completion of the selected task.
    pub fn toggle_selected(&mut self, session: &Session) {
        if let Some(id) = self.selected().map(|i| i.task.id) {
            let outcome = cmd_task_toggle(session, id, true).map(drop);
            self.report(session, outcome);
        }
    }

    pub fn delete_selected(&mut self, session: &Session) {
        if let Some(id) = self.selected().map(|i| i.task.id) {
            let outcome = cmd_task_remove(session, id, true);
            self.report(session, outcome);
        }
    }

    /// Toggles the visibility of completed tasks.
    pub fn toggle_completed(&mut self, session: &Session) {
        self.filter.hide_completed = !self.filter.hide_completed;
        self.report(session, Ok(()));
    }

    /// Cycles the quick period: all, today, tomorrow, this week.
    pub fn cycle_period(&mut self, session: &Session) {
        self.filter.period = match self.filter.period {
            None => Some(QuickPeriod::Today),
            Some(QuickPeriod::Today) => Some(QuickPeriod::Tomorrow),
            Some(QuickPeriod::Tomorrow) => Some(QuickPeriod::Week),
            Some(QuickPeriod::Week) => None,
        };
        self.report(session, Ok(()));
    }

    pub fn clear_filters(&mut self, session: &Session) {
        self.filter = TaskFilter { hide_completed: self.filter.hide_completed, ..TaskFilter::default() };
        self.report(session, Ok(()));
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Starts editing `field`, of the selected task unless it is the search box.
    pub fn start_edit(&mut self, field: InputField) {
        if field == InputField::Search {
            self.input_buffer = self.filter.search.clone().unwrap_or_default();
        } else {
            let Some(item) = self.selected() else { return };
            let (id, buffer) = match field {
                InputField::Description => (item.task.id, item.task.description.clone()),
                InputField::Date => (item.task.id, item.task.due_date.to_string()),
                InputField::Deadline => (item.task.id, item.task.deadline.map(|d| d.to_rfc3339()).unwrap_or_default()),
                _ => (item.task.id, String::new()),
            };
            self.target_id = Some(id);
            self.input_buffer = buffer;
        }
        self.input_mode = InputMode::Editing;
        self.input_field = field;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self, session: &Session) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(session),
            InputMode::Editing => self.handle_editing_input(session),
            InputMode::Normal => {}
        }
    }

    fn handle_adding_input(&mut self, session: &Session) {
        let value = self.input_buffer.trim().to_string();
        match self.add_state.step {
            0 => {
                if !value.is_empty() {
                    self.add_state.description = value;
                    self.add_state.step += 1;
                    self.input_buffer.clear();
                }
            }
            1 => {
                self.add_state.date = if value.is_empty() {
                    self.today.to_string()
                } else {
                    value
                };
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            _ => {
                let args = NewTask {
                    description: std::mem::take(&mut self.add_state.description),
                    date: std::mem::take(&mut self.add_state.date),
                    deadline: Some(value).filter(|v| !v.is_empty()),
                    ..NewTask::default()
                };
                let outcome = cmd_task_add(session, args, true).map(drop);
                self.cancel_input();
                self.report(session, outcome);
            }
        }
    }

    fn handle_editing_input(&mut self, session: &Session) {
        let value = self.input_buffer.trim().to_string();
        let field = self.input_field;
        let target = self.target_id.take();
        self.cancel_input();

        if field == InputField::Search {
            self.filter.search = Some(value).filter(|v| !v.is_empty());
            self.report(session, Ok(()));
            return;
        }
        let Some(id) = target else { return };
        let mut edit = TaskEdit::default();
        match field {
            InputField::Description => edit.description = Some(value),
            InputField::Date => edit.date = Some(value),
            InputField::Deadline if value.is_empty() => edit.clear_deadline = true,
            InputField::Deadline => edit.deadline = Some(value),
            InputField::Search | InputField::None => return,
        }
        let outcome = cmd_task_edit(session, id, edit, true).map(drop);
        self.report(session, outcome);
    }
}
