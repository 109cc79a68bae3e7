use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::InProgress, Status::Done];

    pub fn index(self) -> usize {
        match self {
            Status::Todo => 0,
            Status::InProgress => 1,
            Status::Done => 2,
        }
    }

    /// Maps any index onto the cycle, so `from_index(3)` is `Todo` again.
    pub fn from_index(index: usize) -> Status {
        Status::ALL[index % Status::ALL.len()]
    }

    pub fn next(self) -> Status {
        Status::from_index(self.index() + 1)
    }

    pub fn prev(self) -> Status {
        Status::from_index(self.index() + Status::ALL.len() - 1)
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    status: Status,
    title: String,
    description: String,
}

impl Task {
    pub fn new(status: Status, title: impl Into<String>, description: impl Into<String>) -> Self {
        Task {
            status,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Todo -> InProgress -> Done -> Todo.
    pub fn advance_status(&mut self) {
        self.status = self.status.next();
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BoardError {
    #[error("index {index} out of range for column of length {len}")]
    OutOfRange { index: usize, len: usize },
}

/// One kanban lane. The column does not check that appended tasks carry its
/// status; the board's move logic keeps that invariant.
#[derive(Debug, Clone)]
pub struct Column {
    title: String,
    items: Vec<Task>,
    cursor: usize,
}

impl Column {
    pub fn new(status: Status) -> Self {
        Column {
            title: status.label().to_string(),
            items: Vec::new(),
            cursor: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        if self.items.is_empty() {
            None
        } else {
            Some(self.cursor)
        }
    }

    pub fn selected(&self) -> Option<&Task> {
        self.selected_index().and_then(|idx| self.items.get(idx))
    }

    pub fn select_next(&mut self) {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Task, BoardError> {
        if index >= self.items.len() {
            return Err(BoardError::OutOfRange {
                index,
                len: self.items.len(),
            });
        }
        let task = self.items.remove(index);
        self.cursor = self.cursor.min(self.items.len().saturating_sub(1));
        Ok(task)
    }

    pub fn append(&mut self, task: Task) {
        self.items.push(task);
    }

    pub fn set_items(&mut self, items: Vec<Task>) {
        self.items = items;
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_cycles_forward_and_back() {
        assert_eq!(Status::Todo.next(), Status::InProgress);
        assert_eq!(Status::Done.next(), Status::Todo);
        assert_eq!(Status::Todo.prev(), Status::Done);
        assert_eq!(Status::InProgress.prev(), Status::Todo);
        assert_eq!(Status::from_index(4), Status::InProgress);
    }

    #[test]
    fn advance_status_three_times_returns_to_todo() {
        let mut task = Task::new(Status::Todo, "get milk", "from the store");
        task.advance_status();
        assert_eq!(task.status(), Status::InProgress);
        task.advance_status();
        assert_eq!(task.status(), Status::Done);
        task.advance_status();
        assert_eq!(task.status(), Status::Todo);
        assert_eq!(task.title(), "get milk");
        assert_eq!(task.description(), "from the store");
    }

    #[test]
    fn empty_column_has_no_selection() {
        let mut column = Column::new(Status::Done);
        assert_eq!(column.title(), "Done");
        assert_eq!(column.selected_index(), None);
        assert_eq!(
            column.remove_at(0),
            Err(BoardError::OutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn remove_at_rejects_index_past_end() {
        let mut column = Column::new(Status::Todo);
        column.append(Task::new(Status::Todo, "a", ""));
        let err = column.remove_at(1).unwrap_err();
        assert_eq!(err, BoardError::OutOfRange { index: 1, len: 1 });
        assert_eq!(err.to_string(), "index 1 out of range for column of length 1");
        assert_eq!(column.len(), 1);
    }

    #[test]
    fn cursor_is_clamped_after_removing_last_item() {
        let mut column = Column::new(Status::Todo);
        column.set_items(vec![
            Task::new(Status::Todo, "a", ""),
            Task::new(Status::Todo, "b", ""),
        ]);
        column.select_next();
        column.select_next();
        assert_eq!(column.selected_index(), Some(1));

        let removed = column.remove_at(1).unwrap();
        assert_eq!(removed.title(), "b");
        assert_eq!(column.selected_index(), Some(0));

        column.remove_at(0).unwrap();
        assert!(column.is_empty());
        assert_eq!(column.selected(), None);
    }

    #[test]
    fn append_keeps_insertion_order_and_accepts_any_status() {
        let mut column = Column::new(Status::InProgress);
        column.append(Task::new(Status::InProgress, "first", ""));
        column.append(Task::new(Status::Done, "second", ""));
        let titles: Vec<&str> = column.items().iter().map(Task::title).collect();
        assert_eq!(titles, ["first", "second"]);
        column.select_prev();
        assert_eq!(column.selected().map(Task::title), Some("first"));
    }
}
