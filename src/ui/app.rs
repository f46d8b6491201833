use std::rc::Rc;

use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap};
use ratatui::Frame;
use tracing::error;

use crate::controllers::{FormController, ListController, RecordRow, EMPTY_PLACEHOLDER};
use crate::db::RecordStore;
use crate::models::{gender_label, BiodataField, BiodataRecord, Draft};

use super::forms::{build_field_block, gender_choice, picker, ConfirmDelete, FieldEntry};
use super::helpers::{centered_rect, first_visible_card, single_line};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height of the tab bar.
const TABS_HEIGHT: u16 = 3;
/// Borders plus the five summary rows of a read-only card.
const READ_ONLY_CARD_HEIGHT: u16 = 7;

/// Top-level tabs, mirroring the create and list/manage screens.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Screen {
    Form,
    List,
}

/// Modal state layered above the current screen.
enum Mode {
    Normal,
    ConfirmDelete(ConfirmDelete),
}

/// Footer message shown after a successful action.
struct StatusMessage {
    text: String,
}

/// Central application state shared across the TUI. The controllers own all
/// biodata state; this struct only adds focus, selection and messages.
pub struct App {
    form: FormController,
    list: ListController,
    screen: Screen,
    mode: Mode,
    form_focus: BiodataField,
    draft_focus: BiodataField,
    selected: usize,
    status: Option<StatusMessage>,
}

impl App {
    /// Build both controllers over the one shared store, starting on the form.
    pub fn new(store: Rc<RecordStore>) -> Self {
        Self::with_controllers(
            FormController::new(Rc::clone(&store)),
            ListController::new(store),
        )
    }

    pub fn with_controllers(form: FormController, list: ListController) -> Self {
        Self {
            form,
            list,
            screen: Screen::Form,
            mode: Mode::Normal,
            form_focus: BiodataField::Name,
            draft_focus: BiodataField::Name,
            selected: 0,
            status: None,
        }
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Mode::ConfirmDelete(confirm) = &self.mode {
            let confirm = confirm.clone();
            self.handle_confirm_delete(code, confirm);
            return false;
        }

        match code {
            KeyCode::F(1) => {
                self.open_form();
                return false;
            }
            KeyCode::F(2) => {
                self.open_list();
                return false;
            }
            _ => {}
        }

        match self.screen {
            Screen::Form => {
                self.handle_form_key(code);
                false
            }
            Screen::List if self.list.editing_id().is_some() => {
                self.handle_draft_key(code);
                false
            }
            Screen::List => self.handle_list_key(code),
        }
    }

    /// `Ctrl+S`: submit the form or save the open draft.
    pub(crate) fn handle_ctrl_s(&mut self) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        match self.screen {
            Screen::Form => self.submit_form(),
            Screen::List => self.save_draft(),
        }
    }

    pub(crate) fn screen(&self) -> Screen {
        self.screen
    }

    fn open_form(&mut self) {
        self.clear_status();
        self.screen = Screen::Form;
    }

    /// Switching to the list is a focus event, so it always re-reads the table.
    fn open_list(&mut self) {
        self.clear_status();
        self.screen = Screen::List;
        self.refresh_list();
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        let focus = self.form_focus;
        match code {
            KeyCode::Tab | KeyCode::Down => self.form_focus = focus.cycle(1),
            KeyCode::BackTab | KeyCode::Up => self.form_focus = focus.cycle(-1),
            KeyCode::Esc => self.clear_status(),
            _ => match focus {
                BiodataField::Gender => match code {
                    KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => self.form.cycle_gender(),
                    KeyCode::Enter => self.form_focus = focus.cycle(1),
                    _ => {}
                },
                BiodataField::Religion => match code {
                    KeyCode::Left => self.form.cycle_religion(-1),
                    KeyCode::Right => self.form.cycle_religion(1),
                    KeyCode::Enter => self.form_focus = focus.cycle(1),
                    _ => {}
                },
                BiodataField::BirthDate => match code {
                    KeyCode::Left => self.form.shift_birth_date(-1),
                    KeyCode::Right => self.form.shift_birth_date(1),
                    KeyCode::PageUp => self.form.shift_birth_months(-1),
                    KeyCode::PageDown => self.form.shift_birth_months(1),
                    KeyCode::Enter => self.form_focus = focus.cycle(1),
                    _ => {}
                },
                BiodataField::Name | BiodataField::BirthPlace | BiodataField::Address => {
                    let mut value = self.form.value(focus);
                    if edit_text(&mut value, focus, code) {
                        // Text fields accept any value.
                        let _ = self.form.set_field(focus, value);
                    } else if code == KeyCode::Enter {
                        self.form_focus = focus.cycle(1);
                    }
                }
            },
        }
    }

    fn handle_list_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.clear_status();
                self.refresh_list();
            }
            KeyCode::Char('e') | KeyCode::Char('E') | KeyCode::Enter => {
                if let Some(record) = self.current_record() {
                    let id = record.id;
                    self.clear_status();
                    if self.list.begin_edit(id) {
                        self.draft_focus = BiodataField::Name;
                    }
                }
            }
            KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Delete => {
                if let Some(record) = self.current_record() {
                    let confirm = ConfirmDelete::from(record);
                    self.clear_status();
                    self.mode = Mode::ConfirmDelete(confirm);
                }
            }
            _ => {}
        }
        false
    }

    fn handle_draft_key(&mut self, code: KeyCode) {
        let focus = self.draft_focus;
        match code {
            KeyCode::Esc => {
                self.list.cancel_edit();
                self.set_status("Edit cancelled.");
            }
            KeyCode::Tab | KeyCode::Down => self.draft_focus = focus.cycle(1),
            KeyCode::BackTab | KeyCode::Up => self.draft_focus = focus.cycle(-1),
            _ => {
                let edited = self
                    .list
                    .draft_field_mut(focus)
                    .map(|value| edit_text(value, focus, code))
                    .unwrap_or(false);
                if !edited && code == KeyCode::Enter {
                    self.draft_focus = focus.cycle(1);
                }
            }
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.mode = Mode::Normal;
                self.set_status("Deletion cancelled.");
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.mode = Mode::Normal;
                match self.list.delete(confirm.id) {
                    Ok(()) => {
                        self.clamp_selection();
                        self.set_status(format!("Deleted {}.", display_name(&confirm.name)));
                    }
                    Err(err) => error!(id = confirm.id, error = %err, "failed to delete biodata"),
                }
            }
            _ => {}
        }
    }

    fn submit_form(&mut self) {
        match self.form.submit() {
            Ok(_) => {
                self.form_focus = BiodataField::Name;
                self.set_status("Biodata saved.");
            }
            Err(err) => error!(error = %err, "failed to save biodata"),
        }
    }

    fn save_draft(&mut self) {
        match self.list.save_edit() {
            Ok(true) => {
                self.clamp_selection();
                self.set_status("Biodata updated.");
            }
            Ok(false) => {}
            Err(err) => error!(error = %err, "failed to update biodata"),
        }
    }

    fn refresh_list(&mut self) {
        if let Err(err) = self.list.activate() {
            error!(error = %err, "failed to load biodata");
        }
        self.clamp_selection();
    }

    fn current_record(&self) -> Option<&BiodataRecord> {
        self.list.records().get(self.selected)
    }

    fn move_selection(&mut self, offset: isize) {
        let len = self.list.records().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + offset).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.list.records().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn set_status<S: Into<String>>(&mut self, text: S) {
        self.status = Some(StatusMessage { text: text.into() });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT.min(area.height)),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.screen {
            Screen::Form => self.draw_form(frame, chunks[1]),
            Screen::List => self.draw_list(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        if let Mode::ConfirmDelete(confirm) = &self.mode {
            self.draw_confirm_delete(frame, area, confirm);
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let selected = match self.screen {
            Screen::Form => 0,
            Screen::List => 1,
        };
        let tabs = Tabs::new(vec!["F1 Form", "F2 List"])
            .select(selected)
            .block(Block::default().borders(Borders::ALL).title("Biodata"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title("Biodata Form");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let focus = self.form_focus;
        let entries: Vec<FieldEntry> = BiodataField::ALL
            .iter()
            .map(|&field| {
                let active = field == focus;
                let (display, typed) = match field {
                    BiodataField::Gender => (gender_choice(&self.form.value(field)), false),
                    BiodataField::Religion => (picker(&self.form.value(field), active), false),
                    BiodataField::BirthDate => {
                        let date = self.form.birth_date().format("%a %b %d %Y").to_string();
                        (picker(&date, active), false)
                    }
                    _ => (self.form.value(field), true),
                };
                FieldEntry {
                    field,
                    display,
                    typed,
                }
            })
            .collect();

        let fields = build_field_block(&entries, focus);
        let paragraph = Paragraph::new(fields.lines);
        frame.render_widget(paragraph, inner);

        if let Some((x, y)) = fields.cursor {
            if y < inner.height && x < inner.width {
                frame.set_cursor_position((inner.x + x, inner.y + y));
            }
        }
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        if self.list.is_empty() {
            let message = Paragraph::new(EMPTY_PLACEHOLDER)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Biodata List"));
            frame.render_widget(message, area);
            return;
        }

        let rows: Vec<RecordRow<'_>> = self.list.rows().collect();
        let heights: Vec<u16> = rows.iter().map(|row| self.card_height(row)).collect();
        let start = first_visible_card(&heights, self.selected, area.height);

        let mut y = area.y;
        let bottom = area.y + area.height;
        for (idx, row) in rows.iter().enumerate().skip(start) {
            if y >= bottom {
                break;
            }
            let height = heights[idx].min(bottom - y);
            let card_area = Rect {
                x: area.x,
                y,
                width: area.width,
                height,
            };
            let selected = idx == self.selected;
            match row {
                RecordRow::ReadOnly(record) => self.draw_record_card(frame, card_area, record, selected),
                RecordRow::Editing { record, draft } => {
                    self.draw_draft_card(frame, card_area, record, draft)
                }
            }
            y += height;
        }
    }

    fn card_height(&self, row: &RecordRow<'_>) -> u16 {
        match row {
            RecordRow::ReadOnly(_) => READ_ONLY_CARD_HEIGHT,
            RecordRow::Editing { draft, .. } => {
                let rows: usize = BiodataField::ALL
                    .iter()
                    .map(|field| draft.get(*field).split('\n').count())
                    .sum();
                (rows + 2) as u16
            }
        }
    }

    fn draw_record_card(&self, frame: &mut Frame, area: Rect, record: &BiodataRecord, selected: bool) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" #{} ", record.id));
        let mut paragraph_style = Style::default();
        if selected {
            block = block.style(Style::default().fg(Color::Yellow));
            paragraph_style = Style::default().fg(Color::Yellow);
        }

        let label_style = Style::default().add_modifier(Modifier::BOLD);
        let name = if selected {
            format!("> {}", record.name)
        } else {
            record.name.clone()
        };
        let lines = vec![
            Line::from(vec![Span::styled("Name: ", label_style), Span::raw(name)]),
            Line::from(vec![
                Span::styled("Gender: ", label_style),
                Span::raw(gender_label(&record.gender).to_string()),
            ]),
            Line::from(vec![
                Span::styled("Born: ", label_style),
                Span::raw(format!("{}, {}", record.birth_place, record.birth_date)),
            ]),
            Line::from(vec![
                Span::styled("Religion: ", label_style),
                Span::raw(record.religion.clone()),
            ]),
            Line::from(vec![
                Span::styled("Address: ", label_style),
                Span::raw(single_line(&record.address)),
            ]),
        ];

        let paragraph = Paragraph::new(lines)
            .block(block)
            .style(paragraph_style);
        frame.render_widget(paragraph, area);
    }

    fn draw_draft_card(&self, frame: &mut Frame, area: Rect, record: &BiodataRecord, draft: &Draft) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" Editing #{} ", record.id))
            .border_style(Style::default().fg(Color::Yellow));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let entries: Vec<FieldEntry> = BiodataField::ALL
            .iter()
            .map(|&field| FieldEntry {
                field,
                display: draft.get(field).to_string(),
                typed: true,
            })
            .collect();
        let fields = build_field_block(&entries, self.draft_focus);
        frame.render_widget(Paragraph::new(fields.lines), inner);

        if let Some((x, y)) = fields.cursor {
            if y < inner.height && x < inner.width {
                frame.set_cursor_position((inner.x + x, inner.y + y));
            }
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(
                status.text.clone(),
                Style::default().fg(Color::Green),
            )])
        } else {
            Line::from("")
        };

        let paragraph = Paragraph::new(vec![status_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hint = |key: &'static str, text: &'static str| {
            [Span::styled(key, key_style), Span::raw(text)]
        };
        let spans: Vec<Span<'static>> = match (self.screen, self.list.editing_id()) {
            (Screen::Form, _) => [
                hint("[Tab/↑↓]", " Field   "),
                hint("[←→]", " Pick   "),
                hint("[PgUp/PgDn]", " Month   "),
                hint("[Ctrl+S]", " Save   "),
                hint("[F2]", " List   "),
                hint("[Ctrl+Q]", " Quit"),
            ]
            .concat(),
            (Screen::List, Some(_)) => [
                hint("[Tab/↑↓]", " Field   "),
                hint("[Ctrl+S]", " Save   "),
                hint("[Esc]", " Cancel"),
            ]
            .concat(),
            (Screen::List, None) => [
                hint("[↑↓]", " Select   "),
                hint("[E]", " Edit   "),
                hint("[D]", " Delete   "),
                hint("[R]", " Refresh   "),
                hint("[F1]", " Form   "),
                hint("[Q]", " Quit"),
            ]
            .concat(),
        };
        Line::from(spans)
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!(
                "Delete biodata #{} ({})?",
                confirm.id,
                display_name(&confirm.name)
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

/// Apply a text-editing key to `value`. `Enter` only edits multi-line fields.
/// Returns whether the value changed.
fn edit_text(value: &mut String, field: BiodataField, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(ch) if !ch.is_control() => {
            value.push(ch);
            true
        }
        KeyCode::Backspace => value.pop().is_some(),
        KeyCode::Enter if field.is_multiline() => {
            value.push('\n');
            true
        }
        _ => false,
    }
}

fn display_name(name: &str) -> &str {
    if name.trim().is_empty() {
        "unnamed"
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BiodataFields;
    use chrono::NaiveDate;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn app() -> (Rc<RecordStore>, App) {
        let store = Rc::new(RecordStore::open_in_memory().unwrap());
        let app = App::with_controllers(
            FormController::with_clock(Rc::clone(&store), today),
            ListController::new(Rc::clone(&store)),
        );
        (store, app)
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn form_keys_fill_and_submit_a_record() {
        let (store, mut app) = app();
        type_text(&mut app, "Ana");
        app.handle_key(KeyCode::Enter);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Bandung");
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Tab);
        type_text(&mut app, "Jl. A");
        app.handle_key(KeyCode::Enter);
        type_text(&mut app, "RT 1");

        app.handle_ctrl_s();

        let saved = store.list_all().unwrap();
        assert_eq!(
            saved[0].fields(),
            BiodataFields {
                name: "Ana".into(),
                gender: "P".into(),
                birth_place: "Bandung".into(),
                birth_date: "2024-03-14".into(),
                religion: "Kristen".into(),
                address: "Jl. A\nRT 1".into(),
            }
        );
        assert!(render(&app).contains("Biodata saved."));
    }

    #[test]
    fn list_tab_shows_placeholder_then_new_rows_after_focus() {
        let (_store, mut app) = app();
        app.handle_key(KeyCode::F(2));
        assert_eq!(app.screen(), Screen::List);
        assert!(render(&app).contains(EMPTY_PLACEHOLDER));

        app.handle_key(KeyCode::F(1));
        type_text(&mut app, "Budi");
        app.handle_ctrl_s();

        app.handle_key(KeyCode::F(2));
        let screen = render(&app);
        assert!(screen.contains("Budi"));
        assert!(screen.contains("Laki-laki"));
    }

    #[test]
    fn list_edit_and_delete_flow() {
        let (store, mut app) = app();
        app.handle_ctrl_s();
        app.handle_key(KeyCode::F(2));

        app.handle_key(KeyCode::Char('e'));
        assert!(render(&app).contains("Editing #1"));
        type_text(&mut app, "Citra");
        app.handle_ctrl_s();
        assert_eq!(store.list_all().unwrap()[0].name, "Citra");
        assert!(render(&app).contains("Biodata updated."));

        app.handle_key(KeyCode::Char('d'));
        assert!(render(&app).contains("Delete biodata #1 (Citra)?"));
        app.handle_key(KeyCode::Char('n'));
        assert_eq!(store.list_all().unwrap().len(), 1);

        app.handle_key(KeyCode::Char('d'));
        app.handle_key(KeyCode::Char('y'));
        assert!(store.list_all().unwrap().is_empty());
        assert!(render(&app).contains(EMPTY_PLACEHOLDER));
    }

    #[test]
    fn escape_discards_the_draft() {
        let (store, mut app) = app();
        app.handle_ctrl_s();
        app.handle_key(KeyCode::F(2));
        app.handle_key(KeyCode::Char('e'));
        type_text(&mut app, "zzz");
        assert!(!app.handle_key(KeyCode::Esc));

        assert_eq!(store.list_all().unwrap()[0].name, "");
        assert!(app.handle_key(KeyCode::Char('q')));
    }

    #[test]
    fn failed_submit_keeps_form_and_shows_no_message() {
        let (store, mut app) = app();
        type_text(&mut app, "Ana");
        store
            .connection()
            .execute_batch("DROP TABLE biodata")
            .unwrap();

        app.handle_ctrl_s();

        let screen = render(&app);
        assert!(screen.contains("Ana"));
        assert!(!screen.contains("Biodata saved."));
    }
}
