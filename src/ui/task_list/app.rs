use std::io;
use std::time::Duration;

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;

use crate::error::Result;
use crate::storage::SlotBackend;
use crate::store::TaskStore;
use crate::task::{Filter, TaskId};

use super::controller::{Controller, Gesture, Outcome};
use super::model;
use super::surface::{BufferSurface, Surface};
use super::view;

pub const DEFAULT_POLL_MS: u64 = 120;

/// Terminal session settings
#[derive(Debug, Clone, Copy)]
pub struct UiOptions {
    pub mouse: bool,
    pub poll_ms: u64,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            mouse: true,
            poll_ms: DEFAULT_POLL_MS,
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) enum StatusKind {
    Error,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Input,
    List,
}

/// Screen regions recorded by the last draw, used for mouse hit-testing
#[derive(Debug, Default, Clone)]
pub(crate) struct HitAreas {
    pub(crate) input: Rect,
    pub(crate) tabs: Vec<(Filter, Rect)>,
    pub(crate) clear: Option<Rect>,
    /// Painted rows only
    pub(crate) list: Rect,
    /// Row position of the first painted row
    pub(crate) list_start: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowPart {
    Checkbox,
    Text,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Hit {
    Row(usize, RowPart),
    Tab(Filter),
    Clear,
    Input,
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pointer {
    Idle,
    Pressed(Hit),
    Dragging,
}

pub struct AppState<S> {
    pub(crate) controller: Controller<S>,
    pub(crate) surface: BufferSurface,
    pub(crate) cursor: Option<usize>,
    pub(crate) focus: Focus,
    pub(crate) show_help: bool,
    pub(crate) hits: HitAreas,
    status_message: Option<String>,
    info_message: Option<String>,
    pointer: Pointer,
}

impl<S: SlotBackend> AppState<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        let controller = Controller::new(store);
        let mut surface = BufferSurface::new();
        controller.refresh(&mut surface);
        let cursor = model::select_by_id(surface.rows(), None, 0);
        let focus = if surface.rows().is_empty() {
            Focus::Input
        } else {
            Focus::List
        };
        let status_message = controller.store().load_failed().then(|| {
            format!(
                "could not read task list '{}'; changes will not be saved",
                controller.store().slot()
            )
        });
        Self {
            controller,
            surface,
            cursor,
            focus,
            show_help: false,
            hits: HitAreas::default(),
            status_message,
            info_message: None,
            pointer: Pointer::Idle,
        }
    }

    pub(crate) fn status_line(&self) -> Option<(String, StatusKind)> {
        if let Some(message) = self.status_message.as_ref() {
            return Some((message.clone(), StatusKind::Error));
        }
        if let Some(info) = self.info_message.as_ref() {
            return Some((info.clone(), StatusKind::Info));
        }
        None
    }

    pub(crate) fn footer_hint(&self) -> String {
        if self.focus == Focus::Input {
            return "type task  enter add  tab/esc list".to_string();
        }
        if self.controller.drag_source().is_some() {
            return "j/k choose spot  m/enter drop  esc cancel".to_string();
        }
        "j/k move  space toggle  d delete  m move  f filter  C clear  i new  ? help  q quit"
            .to_string()
    }

    fn set_error(&mut self, message: String) {
        self.status_message = Some(message);
        self.info_message = None;
    }

    fn set_info(&mut self, message: String) {
        self.info_message = Some(message);
        self.status_message = None;
    }

    fn cursor_id(&self) -> Option<TaskId> {
        self.cursor
            .and_then(|pos| self.surface.row_at(pos))
            .map(|row| row.id)
    }

    /// Run a gesture and keep the cursor on `follow` (or near where it was)
    fn apply_following(&mut self, gesture: Gesture, follow: Option<TaskId>) -> Outcome {
        let fallback = self.cursor.unwrap_or(0);
        let outcome = match self.controller.handle(gesture, &mut self.surface) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, ?gesture, "gesture failed");
                self.controller.refresh(&mut self.surface);
                self.set_error(err.to_string());
                Outcome::Ignored
            }
        };
        self.cursor = model::select_by_id(self.surface.rows(), follow, fallback);
        outcome
    }

    fn apply(&mut self, gesture: Gesture) -> Outcome {
        let follow = self.cursor_id();
        self.apply_following(gesture, follow)
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.surface.rows().len();
        if len == 0 {
            self.cursor = None;
            return;
        }
        let current = self.cursor.unwrap_or(0) as isize;
        let next = (current + delta).clamp(0, len as isize - 1) as usize;
        self.cursor = Some(next);
        if let Some(id) = self.cursor_id() {
            if self.controller.drag_source().is_some() {
                self.apply(Gesture::DragOver(id));
            }
        }
    }

    fn start_drag(&mut self, id: TaskId) {
        self.apply(Gesture::DragStart(id));
        self.set_info("moving task".to_string());
    }

    /// Drop the dragged row on `target` and release the drag slot
    fn finish_drag(&mut self, target: Option<TaskId>) {
        let source = self.controller.drag_source();
        if let Some(target) = target {
            self.apply_following(Gesture::Drop(target), source);
        }
        self.apply(Gesture::DragEnd);
        self.info_message = None;
    }

    fn cancel_drag(&mut self) {
        self.apply(Gesture::DragEnd);
        self.info_message = None;
    }

    fn hit_test(&self, column: u16, row: u16) -> Hit {
        if contains(self.hits.input, column, row) {
            return Hit::Input;
        }
        if let Some((filter, _)) = self
            .hits
            .tabs
            .iter()
            .find(|(_, rect)| contains(*rect, column, row))
        {
            return Hit::Tab(*filter);
        }
        if self.hits.clear.is_some_and(|rect| contains(rect, column, row)) {
            return Hit::Clear;
        }
        let list = self.hits.list;
        if contains(list, column, row) {
            let pos = self.hits.list_start + (row - list.y) as usize;
            let offset = column - list.x;
            let delete_width = view::DELETE_LABEL.len() as u16;
            let part = if offset < view::CHECKBOX_WIDTH {
                RowPart::Checkbox
            } else if offset >= list.width.saturating_sub(delete_width) {
                RowPart::Delete
            } else {
                RowPart::Text
            };
            return Hit::Row(pos, part);
        }
        Hit::Nothing
    }

    fn row_id(&self, pos: usize) -> Option<TaskId> {
        self.surface.row_at(pos).map(|row| row.id)
    }

    fn click(&mut self, hit: Hit) {
        match hit {
            Hit::Input => self.focus = Focus::Input,
            Hit::Tab(filter) => {
                self.apply(Gesture::SelectFilter(filter));
            }
            Hit::Clear => {
                self.apply(Gesture::ClearCompleted);
            }
            Hit::Row(pos, part) => {
                let Some(id) = self.row_id(pos) else {
                    return;
                };
                self.focus = Focus::List;
                self.cursor = Some(pos);
                match part {
                    RowPart::Checkbox => {
                        self.apply(Gesture::Toggle(id));
                    }
                    RowPart::Delete => {
                        self.apply(Gesture::Delete(id));
                    }
                    RowPart::Text => {}
                }
            }
            Hit::Nothing => {}
        }
    }
}

fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

pub fn run<S: SlotBackend>(store: TaskStore<S>, options: UiOptions) -> Result<()> {
    tracing::debug!(slot = store.slot(), tasks = store.len(), "starting task list ui");
    let mut app = AppState::new(store);
    run_terminal(&mut app, options)
}

fn run_terminal<S: SlotBackend>(app: &mut AppState<S>, options: UiOptions) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if options.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app, options);

    disable_raw_mode()?;
    if options.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<S: SlotBackend>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<S>,
    options: UiOptions,
) -> Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| view::draw(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(options.poll_ms))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Mouse(mouse) if options.mouse => {
                    handle_mouse(app, mouse);
                    dirty = true;
                }
                Event::Resize(_, _) => {
                    dirty = true;
                }
                _ => {}
            }
        }
    }
    Ok(())
}

/// Returns `true` when the UI should exit
pub(crate) fn handle_key<S: SlotBackend>(app: &mut AppState<S>, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match app.focus {
        Focus::Input => {
            handle_input_key(app, key);
            false
        }
        Focus::List => handle_list_key(app, key),
    }
}

fn handle_input_key<S: SlotBackend>(app: &mut AppState<S>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            app.status_message = None;
            let before = app.controller.store().len();
            app.apply(Gesture::Submit);
            if app.controller.store().len() > before {
                // Follow the new task, which is always appended last
                let last = app.controller.store().snapshot().last().map(|task| task.id);
                if let Some(pos) = last.and_then(|id| app.surface.row_position(id)) {
                    app.cursor = Some(pos);
                }
            }
        }
        KeyCode::Esc | KeyCode::Tab => app.focus = Focus::List,
        KeyCode::Backspace => app.surface.pop_input(),
        KeyCode::Char(ch)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            app.surface.push_input(ch)
        }
        _ => {}
    }
}

fn handle_list_key<S: SlotBackend>(app: &mut AppState<S>, key: KeyEvent) -> bool {
    if app.controller.drag_source().is_some() {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
            KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
            KeyCode::Char('m') | KeyCode::Enter => {
                let target = app.cursor_id();
                app.finish_drag(target);
            }
            KeyCode::Esc => app.cancel_drag(),
            KeyCode::Char('q') => return true,
            _ => {}
        }
        return false;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('j') | KeyCode::Down => app.move_cursor(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_cursor(-1),
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.cursor_id() {
                app.apply(Gesture::Toggle(id));
            }
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if let Some(id) = app.cursor_id() {
                app.apply(Gesture::Delete(id));
            }
        }
        KeyCode::Char('C') => {
            app.apply(Gesture::ClearCompleted);
        }
        KeyCode::Char('1') => {
            app.apply(Gesture::SelectFilter(Filter::All));
        }
        KeyCode::Char('2') => {
            app.apply(Gesture::SelectFilter(Filter::Active));
        }
        KeyCode::Char('3') => {
            app.apply(Gesture::SelectFilter(Filter::Completed));
        }
        KeyCode::Char('f') => {
            let next = app.controller.filter().cycle();
            app.apply(Gesture::SelectFilter(next));
        }
        KeyCode::Char('m') => {
            if let Some(id) = app.cursor_id() {
                app.start_drag(id);
            }
        }
        KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Tab => app.focus = Focus::Input,
        KeyCode::Char('?') => app.show_help = !app.show_help,
        _ => {}
    }
    false
}

pub(crate) fn handle_mouse<S: SlotBackend>(app: &mut AppState<S>, mouse: MouseEvent) {
    let hit = app.hit_test(mouse.column, mouse.row);
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            app.pointer = Pointer::Pressed(hit);
        }
        MouseEventKind::Drag(MouseButton::Left) => match app.pointer {
            Pointer::Pressed(Hit::Row(pos, _)) => {
                if let Some(id) = app.row_id(pos) {
                    app.focus = Focus::List;
                    app.cursor = Some(pos);
                    app.start_drag(id);
                    app.pointer = Pointer::Dragging;
                }
            }
            Pointer::Dragging => {
                if let Hit::Row(pos, _) = hit {
                    if let Some(id) = app.row_id(pos) {
                        app.cursor = Some(pos);
                        app.apply(Gesture::DragOver(id));
                    }
                }
            }
            _ => {}
        },
        MouseEventKind::Up(MouseButton::Left) => {
            match app.pointer {
                Pointer::Dragging => {
                    let target = match hit {
                        Hit::Row(pos, _) => app.row_id(pos),
                        _ => None,
                    };
                    app.finish_drag(target);
                }
                Pointer::Pressed(pressed) if pressed == hit => app.click(hit),
                _ => {}
            }
            app.pointer = Pointer::Idle;
        }
        MouseEventKind::ScrollDown => app.move_cursor(1),
        MouseEventKind::ScrollUp => app.move_cursor(-1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemSlots, DEFAULT_SLOT};
    use crossterm::event::{KeyEventKind, KeyEventState};
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app_with<'a>(slots: &'a MemSlots, items: &[(&str, bool)]) -> AppState<&'a MemSlots> {
        let mut store = TaskStore::open(slots, DEFAULT_SLOT);
        for (text, completed) in items {
            let id = store.add(text).unwrap().expect("id");
            if *completed {
                store.toggle(id).unwrap();
            }
        }
        AppState::new(store)
    }

    fn texts<S: SlotBackend>(app: &AppState<S>) -> Vec<String> {
        app.surface.rows().iter().map(|row| row.text.clone()).collect()
    }

    fn draw<S: SlotBackend>(app: &mut AppState<S>) {
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        terminal.draw(|frame| view::draw(frame, app)).unwrap();
    }

    fn type_text<S: SlotBackend>(app: &mut AppState<S>, text: &str) {
        for ch in text.chars() {
            handle_key(app, key(KeyCode::Char(ch)));
        }
    }

    #[test]
    fn empty_list_starts_in_input() {
        let slots = MemSlots::new();
        let app = app_with(&slots, &[]);
        assert_eq!(app.focus, Focus::Input);
        assert_eq!(app.cursor, None);
        assert_eq!(app.surface.count(), "0 tasks left");
    }

    #[test]
    fn typing_and_enter_adds_task() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[]);
        type_text(&mut app, "Buy milk");
        assert!(!handle_key(&mut app, key(KeyCode::Enter)));

        assert_eq!(texts(&app), vec!["Buy milk"]);
        assert_eq!(app.surface.input(), "");
        assert_eq!(app.cursor, Some(0));
        assert_eq!(app.surface.count(), "1 task left");
    }

    #[test]
    fn q_types_in_input_but_quits_in_list() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[]);
        assert!(!handle_key(&mut app, key(KeyCode::Char('q'))));
        assert_eq!(app.surface.input(), "q");

        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.focus, Focus::List);
        assert!(handle_key(&mut app, key(KeyCode::Char('q'))));
    }

    #[test]
    fn ctrl_c_always_quits() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[]);
        let event = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        };
        assert!(handle_key(&mut app, event));
    }

    #[test]
    fn list_keys_toggle_delete_and_filter() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[("A", false), ("B", false), ("C", false)]);
        assert_eq!(app.focus, Focus::List);

        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Char(' ')));
        assert!(app.surface.rows()[1].completed);
        assert_eq!(app.surface.count(), "2 tasks left");

        handle_key(&mut app, key(KeyCode::Char('2')));
        assert_eq!(texts(&app), vec!["A", "C"]);
        handle_key(&mut app, key(KeyCode::Char('f')));
        assert_eq!(app.surface.active_filter(), Filter::Completed);
        assert_eq!(texts(&app), vec!["B"]);

        handle_key(&mut app, key(KeyCode::Char('C')));
        assert!(texts(&app).is_empty());
        handle_key(&mut app, key(KeyCode::Char('1')));
        assert_eq!(texts(&app), vec!["A", "C"]);

        app.cursor = Some(0);
        handle_key(&mut app, key(KeyCode::Char('d')));
        assert_eq!(texts(&app), vec!["C"]);
        assert_eq!(app.cursor, Some(0));
    }

    #[test]
    fn keyboard_drag_moves_task() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[("A", false), ("B", false), ("C", false)]);

        handle_key(&mut app, key(KeyCode::Char('m')));
        let source = app.controller.drag_source().expect("dragging");
        assert!(app.surface.is_dimmed(source));

        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Down));
        handle_key(&mut app, key(KeyCode::Enter));

        assert_eq!(texts(&app), vec!["B", "C", "A"]);
        assert_eq!(app.controller.drag_source(), None);
        assert!(!app.surface.is_dimmed(source));
        assert_eq!(app.cursor, Some(2));
    }

    #[test]
    fn escape_cancels_keyboard_drag() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[("A", false), ("B", false)]);
        handle_key(&mut app, key(KeyCode::Char('m')));
        handle_key(&mut app, key(KeyCode::Down));
        assert!(!handle_key(&mut app, key(KeyCode::Esc)));

        assert_eq!(app.controller.drag_source(), None);
        assert_eq!(texts(&app), vec!["A", "B"]);
    }

    #[test]
    fn click_on_checkbox_and_delete_control() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[("A", false), ("B", false)]);
        draw(&mut app);

        let list = app.hits.list;
        assert_eq!(list.height, 2);
        let (x, y) = (list.x + 1, list.y);
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), x, y));
        assert!(app.surface.rows()[0].completed);

        let (x, y) = (list.x + list.width - 1, list.y + 1);
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), x, y));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), x, y));
        assert_eq!(texts(&app), vec!["A"]);
    }

    #[test]
    fn click_on_filter_tab_and_clear() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[("A", true), ("B", false)]);
        draw(&mut app);

        let (_, tab) = app.hits.tabs[2];
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), tab.x, tab.y));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), tab.x, tab.y));
        assert_eq!(app.surface.active_filter(), Filter::Completed);
        assert_eq!(texts(&app), vec!["A"]);

        let clear = app.hits.clear.expect("clear control");
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), clear.x, clear.y));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), clear.x, clear.y));
        assert!(texts(&app).is_empty());
        assert_eq!(app.controller.store().len(), 1);
    }

    #[test]
    fn mouse_drag_moves_task() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[("A", false), ("B", false), ("C", false)]);
        draw(&mut app);

        let list = app.hits.list;
        let x = list.x + 6;
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), x, list.y + 2));
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), x, list.y + 1));
        assert!(app.controller.drag_source().is_some());
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), x, list.y));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), x, list.y));

        assert_eq!(texts(&app), vec!["C", "A", "B"]);
        assert_eq!(app.controller.drag_source(), None);
        assert_eq!(app.cursor, Some(0));
    }

    #[test]
    fn mouse_drag_released_outside_rows_only_ends_drag() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[("A", false), ("B", false)]);
        draw(&mut app);

        let list = app.hits.list;
        let x = list.x + 6;
        handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), x, list.y));
        handle_mouse(&mut app, mouse(MouseEventKind::Drag(MouseButton::Left), x, list.y + 1));
        handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 0, 0));

        assert_eq!(texts(&app), vec!["A", "B"]);
        assert_eq!(app.controller.drag_source(), None);
    }

    #[test]
    fn write_failure_is_reported_in_status() {
        let slots = MemSlots::new();
        let mut app = app_with(&slots, &[("A", false)]);
        slots.set_simulate_write_error(true);

        handle_key(&mut app, key(KeyCode::Char(' ')));
        let (message, _) = app.status_line().expect("status");
        assert!(!message.is_empty());
        assert!(!app.surface.rows()[0].completed);
    }

    #[test]
    fn unreadable_list_warns_at_startup() {
        let slots = MemSlots::with_value(DEFAULT_SLOT, r#"[{"id":1,"text":"A","completed":false}]"#);
        slots.set_simulate_read_error(true);
        let app = AppState::new(TaskStore::open(&slots, DEFAULT_SLOT));

        let (message, _) = app.status_line().expect("status");
        assert!(message.contains("will not be saved"));
        assert!(app.surface.rows().is_empty());
    }
}
