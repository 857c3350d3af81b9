use chrono::{DateTime, Local};

use crate::dates;
use crate::models::{Tag, Todo};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToDoCategory {
    All,
    Active,
    Today,
    Completed,
}

impl ToDoCategory {
    pub fn all() -> [ToDoCategory; 4] {
        [
            ToDoCategory::All,
            ToDoCategory::Active,
            ToDoCategory::Today,
            ToDoCategory::Completed,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            ToDoCategory::All => "All",
            ToDoCategory::Active => "Active",
            ToDoCategory::Today => "Today",
            ToDoCategory::Completed => "Completed",
        }
    }
}

/// Decide whether a todo shows up under the selected category and tag
/// filter.
///
/// Exactly one category applies at a time: All shows everything, Active
/// shows incomplete todos due after end-of-today, Today shows todos due
/// within today, Completed shows completed ones. Selected tags then refine
/// the result: any one matching tag keeps the todo visible (OR, not AND);
/// an empty selection leaves the category result as is.
pub fn is_visible(
    todo: &Todo,
    category: ToDoCategory,
    selected_tags: &[Tag],
    now: DateTime<Local>,
) -> bool {
    let shown = match category {
        ToDoCategory::All => true,
        ToDoCategory::Active => todo.due_date > dates::end_of_day(now) && !todo.is_complete,
        ToDoCategory::Today => dates::is_within_today(todo.due_date, now),
        ToDoCategory::Completed => todo.is_complete,
    };

    if !shown || selected_tags.is_empty() {
        return shown;
    }

    selected_tags.iter().any(|tag| todo.tags.contains(tag))
}
