use crate::avatar::{apply_selection, confirm_purchase, is_affordable};
use crate::engine;
use crate::filter::{is_visible, ToDoCategory};
use crate::models::{AvatarCategory, AvatarPart, AvatarPartType, Tag, Todo, User};
use crate::parser::{parse_todo_input, render_todo_input};
use crate::rules::Rules;
use crate::store::Store;
use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::widgets::ListState;

pub struct App {
    pub user: User,
    pub rules: Rules,
    pub store: Store,
    pub tab: Tab,
    pub state: ListState,
    pub input_mode: InputMode,
    pub new_todo_input: String,
    pub editing_index: Option<usize>,
    pub selected_category: ToDoCategory,
    pub selected_tags: Vec<Tag>,
    pub filter_cursor: usize,
    pub shop_part: AvatarPartType,
    pub shop_category: AvatarCategory,
    pub shop_index: u8,
    pub pending_purchase: Option<AvatarPart>,
}

#[derive(PartialEq)]
pub enum Tab {
    Todos,
    Shop,
}

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Filter,
    Confirm,
}

// Rows in the filter popup: four categories then four tags.
pub const FILTER_ROWS: usize = 8;

impl App {
    pub fn new(user: User, rules: Rules, store: Store) -> App {
        let mut state = ListState::default();
        if !user.todo_list.is_empty() {
            state.select(Some(0));
        } else {
            state.select(None);
        }
        App {
            user,
            rules,
            store,
            tab: Tab::Todos,
            state,
            input_mode: InputMode::Normal,
            new_todo_input: String::new(),
            editing_index: None,
            selected_category: ToDoCategory::All,
            selected_tags: Vec::new(),
            filter_cursor: 0,
            shop_part: AvatarPartType::Head,
            shop_category: AvatarCategory::Basic,
            shop_index: 1,
            pending_purchase: None,
        }
    }

    /// Indices into `user.todo_list` that pass the current filter, in list
    /// order. The list selection points into this view.
    pub fn visible_indices(&self, now: DateTime<Local>) -> Vec<usize> {
        self.user
            .todo_list
            .iter()
            .enumerate()
            .filter(|(_, todo)| {
                is_visible(todo, self.selected_category, &self.selected_tags, now)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// The todo-list index behind the current selection, if any.
    pub fn selected_todo(&self, now: DateTime<Local>) -> Option<usize> {
        let visible = self.visible_indices(now);
        self.state.selected().and_then(|i| visible.get(i).copied())
    }

    pub fn completion_ratio(&self, now: DateTime<Local>) -> f64 {
        engine::daily_completion_ratio(&self.user.todo_list, now, &self.rules)
    }

    fn next(&mut self, now: DateTime<Local>) {
        let len = self.visible_indices(now).len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn previous(&mut self, now: DateTime<Local>) {
        let len = self.visible_indices(now).len();
        if len == 0 {
            self.state.select(None);
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    fn clamp_selection(&mut self, now: DateTime<Local>) {
        let len = self.visible_indices(now).len();
        match self.state.selected() {
            _ if len == 0 => self.state.select(None),
            Some(i) if i >= len => self.state.select(Some(len - 1)),
            None => self.state.select(Some(0)),
            _ => {}
        }
    }

    /// Flip the selected todo's completion and apply the ledger effect.
    /// Overdue todos still flip, they just never move the balance.
    pub fn toggle_selected_todo(&mut self, now: DateTime<Local>) {
        let Some(idx) = self.selected_todo(now) else {
            return;
        };
        let user = &mut self.user;
        if let Some(todo) = user.todo_list.get_mut(idx) {
            todo.is_complete = !todo.is_complete;
        }
        engine::toggle_award(&mut user.award, &user.todo_list[idx], now, &self.rules);
        self.store.save(&self.user);
        self.clamp_selection(now);
    }

    /// Flip one checklist item of the selected todo. No ledger effect, the
    /// partial credit only shows up in the daily ratio.
    pub fn toggle_checklist_item(&mut self, item: usize, now: DateTime<Local>) {
        let Some(idx) = self.selected_todo(now) else {
            return;
        };
        if let Some(entry) = self.user.todo_list[idx].checklist.get_mut(item) {
            entry.is_complete = !entry.is_complete;
            self.store.save(&self.user);
        }
    }

    /// Remove the selected todo. Deleting does not touch the balance.
    pub fn delete_selected_todo(&mut self, now: DateTime<Local>) {
        let Some(idx) = self.selected_todo(now) else {
            return;
        };
        self.user.todo_list.remove(idx);
        self.store.save(&self.user);
        self.clamp_selection(now);
    }

    /// Open the input popup pre-filled with the selected todo, so title,
    /// difficulty, tags, due date and notes can all be reworked in place.
    pub fn edit_selected_todo(&mut self, now: DateTime<Local>) {
        let Some(idx) = self.selected_todo(now) else {
            return;
        };
        self.new_todo_input = render_todo_input(&self.user.todo_list[idx]);
        self.editing_index = Some(idx);
        self.input_mode = InputMode::Editing;
    }

    /// Apply the input line: update the todo being edited, or append a new
    /// one due at the end of today unless an `@` token says otherwise.
    /// Completion state and checklist survive an edit untouched.
    pub fn submit_todo_input(&mut self, now: DateTime<Local>) {
        let parsed = parse_todo_input(&self.new_todo_input);
        if parsed.title.is_empty() {
            return;
        }
        match self.editing_index.take() {
            Some(idx) if idx < self.user.todo_list.len() => {
                let todo = &mut self.user.todo_list[idx];
                todo.title = parsed.title;
                todo.difficulty = parsed.difficulty;
                todo.tags = parsed.tags;
                todo.notes = parsed.notes.unwrap_or_default();
                if let Some(due) = parsed.due {
                    todo.due_date = due.resolve(now);
                }
            }
            _ => {
                let mut todo = Todo::empty(now);
                todo.title = parsed.title;
                todo.difficulty = parsed.difficulty;
                todo.tags = parsed.tags;
                todo.notes = parsed.notes.unwrap_or_default();
                if let Some(due) = parsed.due {
                    todo.due_date = due.resolve(now);
                    todo.reminder = todo.due_date;
                }
                self.user.todo_list.push(todo);
            }
        }
        self.store.save(&self.user);
        self.new_todo_input.clear();
        self.clamp_selection(now);
    }

    pub fn sort_todos(&mut self, now: DateTime<Local>) {
        self.user.sort_by_due_date();
        self.store.save(&self.user);
        self.clamp_selection(now);
    }

    fn toggle_filter_row(&mut self, now: DateTime<Local>) {
        if self.filter_cursor < 4 {
            self.selected_category = ToDoCategory::all()[self.filter_cursor];
        } else {
            let tag = Tag::all()[self.filter_cursor - 4];
            if let Some(pos) = self.selected_tags.iter().position(|t| *t == tag) {
                self.selected_tags.remove(pos);
            } else {
                self.selected_tags.push(tag);
            }
        }
        self.clamp_selection(now);
    }

    fn reset_filter(&mut self, now: DateTime<Local>) {
        self.selected_category = ToDoCategory::All;
        self.selected_tags.clear();
        self.clamp_selection(now);
    }

    /// The part variant currently under the shop cursor.
    pub fn shop_selection(&self) -> AvatarPart {
        AvatarPart::new(self.shop_part, self.shop_category, self.shop_index)
    }

    fn move_shop_cursor(&mut self, delta: i16) {
        let moved = self.shop_index as i16 + delta;
        if (1..=12).contains(&moved) {
            self.shop_index = moved as u8;
        }
    }

    fn cycle_shop_part(&mut self) {
        self.shop_part = match self.shop_part {
            AvatarPartType::Head => AvatarPartType::Body,
            AvatarPartType::Body => AvatarPartType::Bottom,
            AvatarPartType::Bottom => AvatarPartType::Head,
        };
    }

    fn cycle_shop_category(&mut self) {
        self.shop_category = match self.shop_category {
            AvatarCategory::Basic => AvatarCategory::Animal,
            AvatarCategory::Animal => AvatarCategory::Castle,
            AvatarCategory::Castle => AvatarCategory::Basic,
        };
    }

    /// Open the confirmation popup, but only for parts the user can afford.
    /// The unconditional debit sits behind this gate.
    fn request_purchase(&mut self) {
        let part = self.shop_selection();
        if is_affordable(&part, &self.rules, self.user.award) {
            self.pending_purchase = Some(part);
            self.input_mode = InputMode::Confirm;
        }
    }

    fn confirm_pending_purchase(&mut self) {
        if let Some(part) = self.pending_purchase.take() {
            let new_avatar =
                apply_selection(&self.user.avatar, part.part, part.category, part.index);
            let price = self.rules.price_of(&part);
            confirm_purchase(&mut self.user, new_avatar, price);
            self.store.save(&self.user);
        }
        self.input_mode = InputMode::Normal;
    }

    /// Handle one key event. Returns true when the app should quit.
    pub fn handle_input(&mut self, key: KeyEvent, now: DateTime<Local>) -> bool {
        // Windows terminals report key releases too; acting on them would
        // run every handler twice per press.
        if key.kind == KeyEventKind::Release {
            return false;
        }
        match self.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return true,
                KeyCode::Tab => {
                    self.tab = match self.tab {
                        Tab::Todos => Tab::Shop,
                        Tab::Shop => Tab::Todos,
                    };
                }
                _ => match self.tab {
                    Tab::Todos => self.handle_todos_key(key.code, now),
                    Tab::Shop => self.handle_shop_key(key.code),
                },
            },

            InputMode::Editing => match key.code {
                KeyCode::Enter => {
                    self.submit_todo_input(now);
                    self.input_mode = InputMode::Normal;
                }
                KeyCode::Char(c) => {
                    self.new_todo_input.push(c);
                }
                KeyCode::Backspace => {
                    self.new_todo_input.pop();
                }
                KeyCode::Esc => {
                    self.new_todo_input.clear();
                    self.editing_index = None;
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },

            InputMode::Filter => match key.code {
                KeyCode::Char('j') | KeyCode::Down => {
                    self.filter_cursor = (self.filter_cursor + 1) % FILTER_ROWS;
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.filter_cursor = (self.filter_cursor + FILTER_ROWS - 1) % FILTER_ROWS;
                }
                KeyCode::Char(' ') | KeyCode::Enter => self.toggle_filter_row(now),
                KeyCode::Char('r') => self.reset_filter(now),
                KeyCode::Esc | KeyCode::Char('f') => {
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },

            InputMode::Confirm => match key.code {
                KeyCode::Char('y') | KeyCode::Enter => self.confirm_pending_purchase(),
                KeyCode::Char('n') | KeyCode::Esc => {
                    self.pending_purchase = None;
                    self.input_mode = InputMode::Normal;
                }
                _ => {}
            },
        }
        false
    }

    fn handle_todos_key(&mut self, code: KeyCode, now: DateTime<Local>) {
        match code {
            KeyCode::Char('j') | KeyCode::Down => self.next(now),
            KeyCode::Char('k') | KeyCode::Up => self.previous(now),
            KeyCode::Char(' ') => self.toggle_selected_todo(now),
            KeyCode::Char('d') => self.delete_selected_todo(now),
            KeyCode::Char('s') => self.sort_todos(now),
            KeyCode::Char('a') => {
                self.new_todo_input.clear();
                self.editing_index = None;
                self.input_mode = InputMode::Editing;
            }
            KeyCode::Char('e') => self.edit_selected_todo(now),
            KeyCode::Char('f') => {
                self.filter_cursor = 0;
                self.input_mode = InputMode::Filter;
            }
            KeyCode::Char(c) if c.is_ascii_digit() && c != '0' => {
                let item = c as usize - '1' as usize;
                self.toggle_checklist_item(item, now);
            }
            _ => {}
        }
    }

    fn handle_shop_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('l') | KeyCode::Right => self.move_shop_cursor(1),
            KeyCode::Char('h') | KeyCode::Left => self.move_shop_cursor(-1),
            KeyCode::Char('j') | KeyCode::Down => self.move_shop_cursor(4),
            KeyCode::Char('k') | KeyCode::Up => self.move_shop_cursor(-4),
            KeyCode::Char('b') => self.cycle_shop_part(),
            KeyCode::Char('c') => self.cycle_shop_category(),
            KeyCode::Enter => self.request_purchase(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Award;
    use chrono::{Duration, TimeZone};
    use crossterm::event::{KeyEventState, KeyModifiers};
    use tempfile::TempDir;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2023, 1, 26, 13, 35, 0).unwrap()
    }

    fn app() -> (App, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("user.json"));
        (App::new(User::sample(now()), Rules::new(), store), dir)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_toggle_selected_todo_credits_and_reverses() {
        let (mut subject, _dir) = app();
        subject.state.select(Some(0));
        subject.toggle_selected_todo(now());
        // sample user starts with 10 coins, first todo is hard (+5)
        assert_eq!(subject.user.award.coin, 15);
        assert!(subject.user.todo_list[0].is_complete);

        subject.toggle_selected_todo(now());
        assert_eq!(subject.user.award.coin, 10);
        assert!(!subject.user.todo_list[0].is_complete);
    }

    #[test]
    fn test_selection_follows_filter_view() {
        let (mut subject, _dir) = app();
        subject.user.todo_list[0].is_complete = true;
        subject.selected_category = ToDoCategory::Completed;
        subject.state.select(Some(0));
        assert_eq!(subject.selected_todo(now()), Some(0));
        assert_eq!(subject.visible_indices(now()).len(), 1);
    }

    #[test]
    fn test_delete_clamps_selection() {
        let (mut subject, _dir) = app();
        let last = subject.user.todo_list.len() - 1;
        subject.state.select(Some(last));
        subject.delete_selected_todo(now());
        assert_eq!(subject.user.todo_list.len(), last);
        assert_eq!(subject.state.selected(), Some(last - 1));
    }

    #[test]
    fn test_checklist_toggle_leaves_balance_alone() {
        let (mut subject, _dir) = app();
        subject.state.select(Some(0));
        subject.toggle_checklist_item(1, now());
        assert_eq!(subject.user.award.coin, 10);
        assert!(subject.user.todo_list[0].checklist[1].is_complete);
    }

    #[test]
    fn test_quick_add_appends_parsed_todo() {
        let (mut subject, _dir) = app();
        subject.new_todo_input = "Pay rent !medium #chores".to_string();
        subject.submit_todo_input(now());
        let added = subject.user.todo_list.last().unwrap();
        assert_eq!(added.title, "Pay rent");
        assert_eq!(added.difficulty, crate::models::DifficultyLevel::Medium);
        assert_eq!(added.tags, vec![Tag::Chores]);
        assert_eq!(added.due_date, crate::dates::end_of_day(now()));
    }

    #[test]
    fn test_unaffordable_part_never_opens_confirmation() {
        let (mut subject, _dir) = app();
        subject.user.award = Award::new(0);
        subject.shop_category = AvatarCategory::Castle;
        subject.request_purchase();
        assert!(subject.pending_purchase.is_none());
        assert!(subject.input_mode == InputMode::Normal);
    }

    #[test]
    fn test_confirmed_purchase_swaps_part_and_debits() {
        let (mut subject, _dir) = app();
        subject.shop_part = AvatarPartType::Body;
        subject.shop_index = 3;
        subject.request_purchase();
        assert!(subject.pending_purchase.is_some());
        subject.confirm_pending_purchase();
        assert_eq!(subject.user.award.coin, 5);
        assert_eq!(
            subject.user.avatar.parts[1],
            AvatarPart::new(AvatarPartType::Body, AvatarCategory::Basic, 3)
        );
    }

    #[test]
    fn test_release_key_event_is_ignored() {
        let (mut subject, _dir) = app();
        subject.state.select(Some(0));
        let release = KeyEvent {
            code: KeyCode::Char(' '),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        subject.handle_input(release, now());
        assert_eq!(subject.user.award.coin, 10);
        assert!(!subject.user.todo_list[0].is_complete);

        subject.handle_input(press(KeyCode::Char(' ')), now());
        assert_eq!(subject.user.award.coin, 15);
        assert!(subject.user.todo_list[0].is_complete);
    }

    #[test]
    fn test_edit_key_prefills_input_line() {
        let (mut subject, _dir) = app();
        subject.state.select(Some(0));
        subject.handle_input(press(KeyCode::Char('e')), now());
        assert!(subject.input_mode == InputMode::Editing);
        assert_eq!(subject.editing_index, Some(0));
        assert_eq!(
            subject.new_todo_input,
            render_todo_input(&subject.user.todo_list[0])
        );
    }

    #[test]
    fn test_edit_rewrites_fields_but_keeps_progress() {
        let (mut subject, _dir) = app();
        let before = subject.user.todo_list.len();
        subject.user.todo_list[0].checklist[1].is_complete = true;
        subject.editing_index = Some(0);
        subject.new_todo_input =
            "Walk the dog !easy #health @2023-02-15 -- bring treats".to_string();
        subject.submit_todo_input(now());

        let todo = &subject.user.todo_list[0];
        assert_eq!(todo.title, "Walk the dog");
        assert_eq!(todo.difficulty, crate::models::DifficultyLevel::Easy);
        assert_eq!(todo.tags, vec![Tag::Health]);
        assert_eq!(todo.notes, "bring treats");
        assert_eq!(
            todo.due_date,
            Local.with_ymd_and_hms(2023, 2, 15, 23, 59, 59).unwrap()
        );
        assert!(todo.checklist[1].is_complete);
        assert!(!todo.is_complete);
        assert_eq!(subject.user.todo_list.len(), before);
        assert_eq!(subject.editing_index, None);
    }

    #[test]
    fn test_quick_add_with_relative_due_lands_in_active() {
        let (mut subject, _dir) = app();
        subject.new_todo_input = "File taxes !hard @+3".to_string();
        subject.submit_todo_input(now());
        let added = subject.user.todo_list.last().unwrap();
        assert_eq!(
            added.due_date,
            crate::dates::end_of_day(now() + Duration::days(3))
        );
        assert!(is_visible(added, ToDoCategory::Active, &[], now()));
    }

    #[test]
    fn test_overdue_sample_day_ratio_counts_only_today() {
        let (mut subject, _dir) = app();
        subject.user.todo_list[0].due_date = now();
        subject.user.todo_list[0].is_complete = true;
        // one hard todo due today and done, the rest due later
        let result = subject.completion_ratio(now());
        assert!((result - 1.0).abs() < 1e-9);
    }
}
