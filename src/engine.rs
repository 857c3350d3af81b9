use chrono::{DateTime, Local};

use crate::dates;
use crate::models::{Award, Todo};
use crate::rules::Rules;

/// Apply the ledger effect of a completion toggle. Call after the todo's
/// `is_complete` flag has been flipped.
///
/// Overdue todos (due before the start of today) can be toggled freely but
/// never move the balance. Otherwise toggling to complete credits the full
/// difficulty reward and toggling back debits the same amount, even when
/// some checklist items stay complete. Partial checklist credit only feeds
/// the daily ratio, never the ledger.
pub fn toggle_award(balance: &mut Award, todo: &Todo, now: DateTime<Local>, rules: &Rules) {
    if dates::is_overdue(todo.due_date, now) {
        return;
    }
    let reward = rules.reward_of(todo.difficulty);
    if todo.is_complete {
        balance.add(reward);
    } else {
        balance.minus(reward);
    }
}

/// Coins a todo counts for in today's completion ratio.
///
/// Overdue todos count 0 no matter their state. A completed todo counts the
/// full reward. An incomplete todo with a checklist earns one integer share
/// of `reward / checklist length` per completed item; the remainder of a
/// non-divisible split is dropped.
pub fn fraction_coins_earned(todo: &Todo, now: DateTime<Local>, rules: &Rules) -> i64 {
    if dates::is_overdue(todo.due_date, now) {
        return 0;
    }

    let reward = rules.reward_of(todo.difficulty).coin;
    if todo.is_complete {
        reward
    } else if !todo.checklist.is_empty() {
        let share = reward / todo.checklist.len() as i64;
        share * todo.completed_checklist() as i64
    } else {
        0
    }
}

/// Fraction of today's scheduled coins already earned, in `[0, 1]`.
///
/// Only todos due within today's calendar day participate. An empty day
/// yields 0.0 rather than a division error.
pub fn daily_completion_ratio(todos: &[Todo], now: DateTime<Local>, rules: &Rules) -> f64 {
    let mut total = 0i64;
    let mut completed = 0i64;

    for todo in todos {
        if dates::is_within_today(todo.due_date, now) {
            total += rules.reward_of(todo.difficulty).coin;
            completed += fraction_coins_earned(todo, now, rules);
        }
    }

    if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64
    }
}
