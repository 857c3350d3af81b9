use chrono::{DateTime, Duration, Local};
use serde::{Deserialize, Serialize};

use crate::dates;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyLevel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub fn label(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "easy",
            DifficultyLevel::Medium => "medium",
            DifficultyLevel::Hard => "hard",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Work,
    School,
    Health,
    Chores,
}

impl Tag {
    pub fn all() -> [Tag; 4] {
        [Tag::Work, Tag::School, Tag::Health, Tag::Chores]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tag::Work => "work",
            Tag::School => "school",
            Tag::Health => "health",
            Tag::Chores => "chores",
        }
    }
}

// Checklist item struct
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub title: String,
    pub difficulty: DifficultyLevel,
    pub is_complete: bool,
}

impl ChecklistItem {
    pub fn new(title: &str, difficulty: DifficultyLevel, is_complete: bool) -> ChecklistItem {
        ChecklistItem {
            title: title.to_string(),
            difficulty,
            is_complete,
        }
    }
}

// Todo struct: a single entry in the user's list. `is_complete` and the
// per-item checklist state are set independently, there is no roll-up.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Todo {
    pub title: String,
    pub difficulty: DifficultyLevel,
    pub notes: String,
    pub tags: Vec<Tag>,
    pub is_complete: bool,
    pub due_date: DateTime<Local>,
    pub reminder: DateTime<Local>,
    pub checklist: Vec<ChecklistItem>,
}

impl Todo {
    /// An empty todo due at the end of today, used when adding a new entry.
    pub fn empty(now: DateTime<Local>) -> Todo {
        Todo {
            title: String::new(),
            difficulty: DifficultyLevel::Easy,
            notes: String::new(),
            tags: Vec::new(),
            is_complete: false,
            due_date: dates::end_of_day(now),
            reminder: dates::end_of_day(now),
            checklist: Vec::new(),
        }
    }

    pub fn completed_checklist(&self) -> usize {
        self.checklist.iter().filter(|item| item.is_complete).count()
    }

    pub fn due_date_string(&self) -> String {
        self.due_date.format("%b/%d/%Y").to_string()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarPartType {
    Head,
    Body,
    Bottom,
}

impl AvatarPartType {
    pub fn all() -> [AvatarPartType; 3] {
        [
            AvatarPartType::Head,
            AvatarPartType::Body,
            AvatarPartType::Bottom,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            AvatarPartType::Head => "head",
            AvatarPartType::Body => "body",
            AvatarPartType::Bottom => "bottom",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvatarCategory {
    Basic,
    Animal,
    Castle,
}

impl AvatarCategory {
    pub fn label(&self) -> &'static str {
        match self {
            AvatarCategory::Basic => "basic",
            AvatarCategory::Animal => "animal",
            AvatarCategory::Castle => "castle",
        }
    }
}

/// One purchasable avatar-part variant. Used as the key into the pricing
/// rules, so equality and hashing cover all three fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AvatarPart {
    pub part: AvatarPartType,
    pub category: AvatarCategory,
    pub index: u8,
}

impl AvatarPart {
    pub fn new(part: AvatarPartType, category: AvatarCategory, index: u8) -> AvatarPart {
        AvatarPart {
            part,
            category,
            index,
        }
    }
}

/// An avatar is exactly three parts in fixed head/body/bottom order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Avatar {
    pub parts: [AvatarPart; 3],
}

impl Avatar {
    pub fn sample() -> Avatar {
        Avatar {
            parts: [
                AvatarPart::new(AvatarPartType::Head, AvatarCategory::Basic, 1),
                AvatarPart::new(AvatarPartType::Body, AvatarCategory::Basic, 1),
                AvatarPart::new(AvatarPartType::Bottom, AvatarCategory::Basic, 1),
            ],
        }
    }
}

/// Coins, as both a price and a balance delta. Subtraction is unchecked and
/// the balance is allowed to go negative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub coin: i64,
}

impl Award {
    pub fn new(coin: i64) -> Award {
        Award { coin }
    }

    pub fn add(&mut self, award: Award) {
        self.coin += award.coin;
    }

    pub fn minus(&mut self, award: Award) {
        self.coin -= award.coin;
    }
}

// User struct: the whole object graph that gets persisted as one record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub avatar: Avatar,
    pub award: Award,
    pub todo_list: Vec<Todo>,
}

impl User {
    /// The fixed starter user, also substituted when the saved record is
    /// missing or fails to decode.
    pub fn sample(now: DateTime<Local>) -> User {
        User {
            name: "Adams".to_string(),
            avatar: Avatar::sample(),
            award: Award::new(10),
            todo_list: vec![
                Todo {
                    title: "Unit5 MVP".to_string(),
                    difficulty: DifficultyLevel::Hard,
                    notes: "gamified todos".to_string(),
                    tags: vec![Tag::School, Tag::Chores],
                    is_complete: false,
                    due_date: now + Duration::days(2),
                    reminder: now + Duration::days(2),
                    checklist: vec![
                        ChecklistItem::new("Step1", DifficultyLevel::Medium, true),
                        ChecklistItem::new("Step2", DifficultyLevel::Medium, false),
                    ],
                },
                Todo {
                    title: "Unit6 MVP".to_string(),
                    difficulty: DifficultyLevel::Hard,
                    notes: "gamified todos".to_string(),
                    tags: vec![Tag::School],
                    is_complete: false,
                    due_date: now + Duration::days(6),
                    reminder: now + Duration::days(6),
                    checklist: vec![
                        ChecklistItem::new("Step1", DifficultyLevel::Medium, false),
                        ChecklistItem::new("Step2", DifficultyLevel::Medium, false),
                    ],
                },
                Todo {
                    title: "Unit7 MVP".to_string(),
                    difficulty: DifficultyLevel::Hard,
                    notes: "Voiceover".to_string(),
                    tags: vec![Tag::School, Tag::Chores],
                    is_complete: false,
                    due_date: now + Duration::days(7),
                    reminder: now + Duration::days(7),
                    checklist: vec![
                        ChecklistItem::new("Step1", DifficultyLevel::Medium, false),
                        ChecklistItem::new("Step2", DifficultyLevel::Medium, false),
                    ],
                },
                Todo {
                    title: "Unit8 MVP".to_string(),
                    difficulty: DifficultyLevel::Hard,
                    notes: "gamified todos".to_string(),
                    tags: vec![],
                    is_complete: false,
                    due_date: now + Duration::days(10),
                    reminder: now + Duration::days(10),
                    checklist: vec![
                        ChecklistItem::new("Step1", DifficultyLevel::Medium, false),
                        ChecklistItem::new("Step2", DifficultyLevel::Medium, false),
                    ],
                },
                Todo {
                    title: "Unit9 MVP".to_string(),
                    difficulty: DifficultyLevel::Hard,
                    notes: "gamified todos".to_string(),
                    tags: vec![],
                    is_complete: false,
                    due_date: now + Duration::days(10),
                    reminder: now + Duration::days(10),
                    checklist: vec![],
                },
            ],
        }
    }

    /// Sort the todo list by due date, earliest first.
    pub fn sort_by_due_date(&mut self) {
        self.todo_list.sort_by_key(|todo| todo.due_date);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_user_round_trips_through_json() {
        let now = Local.with_ymd_and_hms(2023, 1, 26, 13, 35, 0).unwrap();
        let user = User::sample(now);
        let encoded = serde_json::to_string(&user).unwrap();
        let decoded: User = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded.name, user.name);
        assert_eq!(decoded.award, user.award);
        assert_eq!(decoded.avatar, user.avatar);
        assert_eq!(decoded.todo_list.len(), user.todo_list.len());
        assert_eq!(decoded.todo_list[0].due_date, user.todo_list[0].due_date);
        assert_eq!(decoded.todo_list[0].tags, user.todo_list[0].tags);
        assert_eq!(
            decoded.todo_list[0].checklist.len(),
            user.todo_list[0].checklist.len()
        );
    }

    #[test]
    fn test_completed_checklist_counts_only_complete_items() {
        let now = Local.with_ymd_and_hms(2023, 1, 26, 13, 35, 0).unwrap();
        let user = User::sample(now);
        assert_eq!(user.todo_list[0].completed_checklist(), 1);
        assert_eq!(user.todo_list[1].completed_checklist(), 0);
        assert_eq!(user.todo_list[4].completed_checklist(), 0);
    }

    #[test]
    fn test_sort_by_due_date_orders_earliest_first() {
        let now = Local.with_ymd_and_hms(2023, 1, 26, 13, 35, 0).unwrap();
        let mut user = User::sample(now);
        user.todo_list.reverse();
        user.sort_by_due_date();
        assert_eq!(user.todo_list[0].title, "Unit5 MVP");
        assert_eq!(user.todo_list[1].title, "Unit6 MVP");
    }
}
