use chrono::{DateTime, Duration, Local, NaiveDate};
use regex::Regex;

use crate::dates;
use crate::models::{DifficultyLevel, Tag, Todo};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum DueSpec {
    Today,
    Tomorrow,
    InDays(i64),
    On(NaiveDate),
}

impl DueSpec {
    /// Resolve to a concrete due date, always the end of the chosen day.
    pub fn resolve(self, now: DateTime<Local>) -> DateTime<Local> {
        match self {
            DueSpec::Today => dates::end_of_day(now),
            DueSpec::Tomorrow => dates::end_of_day(now + Duration::days(1)),
            DueSpec::InDays(days) => dates::end_of_day(now + Duration::days(days)),
            DueSpec::On(date) => date
                .and_hms_opt(12, 0, 0)
                .and_then(|naive| naive.and_local_timezone(Local).single())
                .map(dates::end_of_day)
                .unwrap_or_else(|| dates::end_of_day(now)),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ParsedTodo {
    pub title: String,
    pub difficulty: DifficultyLevel,
    pub tags: Vec<Tag>,
    pub due: Option<DueSpec>,
    pub notes: Option<String>,
}

/// Parse the quick-add/edit input line into a todo's fields.
///
/// `!easy`, `!medium` and `!hard` set the difficulty (the first one wins,
/// default is easy). `#work`, `#school`, `#health` and `#chores` add tags,
/// duplicates collapsed. `@today`, `@tomorrow`, `@+N` (N days out) and
/// `@YYYY-MM-DD` set the due date; a matched token that is not a valid
/// calendar date is dropped. Everything after the first ` -- ` becomes the
/// notes. Recognized tokens are stripped from the title and whitespace is
/// normalized; anything else stays in the title verbatim.
pub fn parse_todo_input(input: &str) -> ParsedTodo {
    let (head, notes) = match input.split_once(" -- ") {
        Some((head, rest)) => {
            let rest = rest.trim();
            (head, (!rest.is_empty()).then(|| rest.to_string()))
        }
        None => (input, None),
    };

    let difficulty_re = Regex::new(r"!(easy|medium|hard)\b\s*").unwrap();
    let tag_re = Regex::new(r"#(work|school|health|chores)\b\s*").unwrap();
    let due_re = Regex::new(r"@(today|tomorrow|\+\d+|\d{4}-\d{2}-\d{2})\b\s*").unwrap();

    let mut difficulty = None;

    // Difficulty
    for caps in difficulty_re.captures_iter(head) {
        if difficulty.is_some() {
            break;
        }
        difficulty = match caps.get(1).map(|m| m.as_str()) {
            Some("easy") => Some(DifficultyLevel::Easy),
            Some("medium") => Some(DifficultyLevel::Medium),
            Some("hard") => Some(DifficultyLevel::Hard),
            _ => None,
        };
    }

    // Tags
    let mut tags = Vec::new();
    for caps in tag_re.captures_iter(head) {
        let tag = match caps.get(1).map(|m| m.as_str()) {
            Some("work") => Some(Tag::Work),
            Some("school") => Some(Tag::School),
            Some("health") => Some(Tag::Health),
            Some("chores") => Some(Tag::Chores),
            _ => None,
        };
        if let Some(tag) = tag {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    // Due date
    let mut due = None;
    for caps in due_re.captures_iter(head) {
        if due.is_some() {
            break;
        }
        due = match caps.get(1).map(|m| m.as_str()) {
            Some("today") => Some(DueSpec::Today),
            Some("tomorrow") => Some(DueSpec::Tomorrow),
            Some(token) if token.starts_with('+') => {
                token[1..].parse::<i64>().ok().map(DueSpec::InDays)
            }
            Some(token) => NaiveDate::parse_from_str(token, "%Y-%m-%d")
                .ok()
                .map(DueSpec::On),
            None => None,
        };
    }

    let title = difficulty_re.replace_all(head, "").to_string();
    let title = tag_re.replace_all(&title, "").to_string();
    let title = due_re.replace_all(&title, "").to_string();

    let title = Regex::new(r"\s+")
        .unwrap()
        .replace_all(&title, " ")
        .trim()
        .to_string();

    ParsedTodo {
        title,
        difficulty: difficulty.unwrap_or(DifficultyLevel::Easy),
        tags,
        due,
        notes,
    }
}

/// Rebuild the input line for an existing todo, the inverse of
/// `parse_todo_input`. Used to pre-fill the edit popup.
pub fn render_todo_input(todo: &Todo) -> String {
    let mut out = todo.title.clone();
    out.push_str(&format!(" !{}", todo.difficulty.label()));
    for tag in &todo.tags {
        out.push_str(&format!(" #{}", tag.label()));
    }
    out.push_str(&format!(" @{}", todo.due_date.format("%Y-%m-%d")));
    if !todo.notes.is_empty() {
        out.push_str(&format!(" -- {}", todo.notes));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_with_difficulty_in_middle() {
        let input = "Write !hard project report";
        let expected = ParsedTodo {
            title: "Write project report".to_string(),
            difficulty: DifficultyLevel::Hard,
            tags: vec![],
            due: None,
            notes: None,
        };
        let result = parse_todo_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_defaults_to_easy_without_difficulty() {
        let input = "Water the plants";
        let expected = ParsedTodo {
            title: "Water the plants".to_string(),
            difficulty: DifficultyLevel::Easy,
            tags: vec![],
            due: None,
            notes: None,
        };
        let result = parse_todo_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_tags_and_extra_spaces() {
        let input = "Morning run #health    #chores ";
        let expected = ParsedTodo {
            title: "Morning run".to_string(),
            difficulty: DifficultyLevel::Easy,
            tags: vec![Tag::Health, Tag::Chores],
            due: None,
            notes: None,
        };
        let result = parse_todo_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_multiple_difficulties_keeps_first() {
        let input = "!medium Study for finals !hard #school";
        let expected = ParsedTodo {
            title: "Study for finals".to_string(),
            difficulty: DifficultyLevel::Medium,
            tags: vec![Tag::School],
            due: None,
            notes: None,
        };
        let result = parse_todo_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_collapses_duplicate_tags() {
        let input = "Inbox zero #work #work";
        let expected = ParsedTodo {
            title: "Inbox zero".to_string(),
            difficulty: DifficultyLevel::Easy,
            tags: vec![Tag::Work],
            due: None,
            notes: None,
        };
        let result = parse_todo_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_leaves_unknown_tokens_in_title() {
        let input = "Ship release !urgent #launch";
        let expected = ParsedTodo {
            title: "Ship release !urgent #launch".to_string(),
            difficulty: DifficultyLevel::Easy,
            tags: vec![],
            due: None,
            notes: None,
        };
        let result = parse_todo_input(input);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_with_relative_due_tokens() {
        assert_eq!(
            parse_todo_input("Pack bags @tomorrow").due,
            Some(DueSpec::Tomorrow)
        );
        assert_eq!(
            parse_todo_input("Plan trip @+3 !hard").due,
            Some(DueSpec::InDays(3))
        );
        assert_eq!(parse_todo_input("Dentist @today").due, Some(DueSpec::Today));
    }

    #[test]
    fn test_parse_with_absolute_due_date() {
        let result = parse_todo_input("File taxes @2023-04-15 #chores");
        let expected = ParsedTodo {
            title: "File taxes".to_string(),
            difficulty: DifficultyLevel::Easy,
            tags: vec![Tag::Chores],
            due: Some(DueSpec::On(
                NaiveDate::from_ymd_opt(2023, 4, 15).unwrap(),
            )),
            notes: None,
        };
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_drops_invalid_calendar_date() {
        let result = parse_todo_input("Ghost deadline @2023-02-31");
        assert_eq!(result.title, "Ghost deadline");
        assert_eq!(result.due, None);
    }

    #[test]
    fn test_parse_splits_notes_on_separator() {
        let result = parse_todo_input("Call plumber !medium -- ask about the #quote");
        assert_eq!(result.title, "Call plumber");
        assert_eq!(result.difficulty, DifficultyLevel::Medium);
        assert_eq!(result.notes.as_deref(), Some("ask about the #quote"));
        // tokens after the separator stay in the notes
        assert_eq!(result.tags, vec![]);
    }

    #[test]
    fn test_due_spec_resolves_to_end_of_day() {
        let now = Local.with_ymd_and_hms(2023, 1, 26, 13, 35, 0).unwrap();
        assert_eq!(DueSpec::Today.resolve(now), crate::dates::end_of_day(now));
        assert_eq!(
            DueSpec::InDays(3).resolve(now),
            Local.with_ymd_and_hms(2023, 1, 29, 23, 59, 59).unwrap()
        );
        assert_eq!(
            DueSpec::On(NaiveDate::from_ymd_opt(2023, 4, 15).unwrap()).resolve(now),
            Local.with_ymd_and_hms(2023, 4, 15, 23, 59, 59).unwrap()
        );
    }

    #[test]
    fn test_render_then_parse_round_trips_a_todo() {
        let now = Local.with_ymd_and_hms(2023, 1, 26, 13, 35, 0).unwrap();
        let mut todo = Todo::empty(now);
        todo.title = "Unit5 MVP".to_string();
        todo.difficulty = DifficultyLevel::Hard;
        todo.tags = vec![Tag::School, Tag::Chores];
        todo.notes = "gamified todos".to_string();

        let result = parse_todo_input(&render_todo_input(&todo));
        assert_eq!(result.title, todo.title);
        assert_eq!(result.difficulty, todo.difficulty);
        assert_eq!(result.tags, todo.tags);
        assert_eq!(result.notes.as_deref(), Some("gamified todos"));
        assert_eq!(
            result.due.map(|due| due.resolve(now)),
            Some(todo.due_date)
        );
    }
}
