use std::mem;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::db::Storage;
use crate::drag::DragTracker;
use crate::models::Song;
use crate::session::Session;
use crate::store::{Direction as MoveDirection, PendingDelete};
use crate::theme::Palette;
use crate::view::{Overlay, Screen};

use super::helpers::{centered_rect, lyric_lines, overlay_layout, surface_error};
use super::picker::{FilePicker, PickerAction, PickerEntry};
use super::screens::{PlaylistScreen, ScrollState};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE: isize = 5;

/// Fine-grained modes layered over the current screen.
enum Mode {
    Normal,
    ConfirmDelete(PendingDelete),
    Importing(FilePicker),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App<S: Storage> {
    session: Session<S>,
    playlist: PlaylistScreen,
    detail_scroll: ScrollState,
    overlay_scroll: ScrollState,
    drag: DragTracker,
    viewport: Rect,
    import_dir: PathBuf,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl<S: Storage> App<S> {
    pub fn new(session: Session<S>, import_dir: PathBuf) -> Self {
        let viewport = Rect::new(0, 0, 80, 24);
        Self {
            session,
            playlist: PlaylistScreen::default(),
            detail_scroll: ScrollState::default(),
            overlay_scroll: ScrollState::default(),
            drag: DragTracker::new(viewport),
            viewport,
            import_dir,
            mode: Mode::Normal,
            status: None,
        }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Track the terminal size so the overlay stays on screen.
    pub fn resize(&mut self, viewport: Rect) {
        self.viewport = viewport;
        self.drag.set_viewport(viewport);
    }

    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::ConfirmDelete(pending) => self.handle_confirm_delete(code, pending),
            Mode::Importing(picker) => self.handle_import(code, picker),
        };

        Ok(exit)
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Char('t') | KeyCode::Char('T') => {
                self.toggle_theme();
                return Ok(Mode::Normal);
            }
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.toggle_overlay();
                return Ok(Mode::Normal);
            }
            KeyCode::Char('n') | KeyCode::Char('N') => {
                self.step_song(true);
                return Ok(Mode::Normal);
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                self.step_song(false);
                return Ok(Mode::Normal);
            }
            KeyCode::Char(']') => {
                self.scroll_overlay(1);
                return Ok(Mode::Normal);
            }
            KeyCode::Char('[') => {
                self.scroll_overlay(-1);
                return Ok(Mode::Normal);
            }
            _ => {}
        }

        match self.session.view().screen() {
            Screen::List => self.handle_list_key(code, exit),
            Screen::Detail => {
                self.handle_detail_key(code);
                Ok(Mode::Normal)
            }
        }
    }

    fn handle_list_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        let len = self.session.songs().len();
        match code {
            KeyCode::Esc => {
                *exit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => self.playlist.move_selection(-1, len),
            KeyCode::Down | KeyCode::Char('j') => self.playlist.move_selection(1, len),
            KeyCode::PageUp => self.playlist.move_selection(-PAGE, len),
            KeyCode::PageDown => self.playlist.move_selection(PAGE, len),
            KeyCode::Home => self.playlist.select_first(),
            KeyCode::End => self.playlist.select_last(len),
            KeyCode::Enter => {
                if let Some(id) = self.cursor_song_id() {
                    self.clear_status();
                    self.session.select_song(&id);
                    self.detail_scroll.reset();
                } else {
                    self.set_status("No song selected.", StatusKind::Error);
                }
            }
            KeyCode::Char('K') => self.move_song(MoveDirection::Up),
            KeyCode::Char('J') => self.move_song(MoveDirection::Down),
            KeyCode::Char('-') | KeyCode::Delete => {
                let pending = self
                    .cursor_song_id()
                    .and_then(|id| self.session.request_delete(&id));
                if let Some(pending) = pending {
                    self.clear_status();
                    return Ok(Mode::ConfirmDelete(pending));
                }
                self.set_status("No song selected to delete.", StatusKind::Error);
            }
            KeyCode::Char('i') | KeyCode::Char('I') => match FilePicker::open(&self.import_dir) {
                Ok(picker) => {
                    self.clear_status();
                    return Ok(Mode::Importing(picker));
                }
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if self.session.resume() {
                    self.clear_status();
                } else {
                    self.set_status("Nothing to resume.", StatusKind::Error);
                }
            }
            _ => {}
        }
        Ok(Mode::Normal)
    }

    fn handle_detail_key(&mut self, code: KeyCode) {
        let max = self.detail_scroll_max();
        match code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left => {
                self.session.go_back();
                self.sync_cursor();
                self.clear_status();
            }
            KeyCode::Up | KeyCode::Char('k') => self.detail_scroll.scroll_by(-1, max),
            KeyCode::Down | KeyCode::Char('j') => self.detail_scroll.scroll_by(1, max),
            KeyCode::PageUp => self.detail_scroll.scroll_by(-(PAGE as i32) * 2, max),
            KeyCode::PageDown => self.detail_scroll.scroll_by(PAGE as i32 * 2, max),
            KeyCode::Home => self.detail_scroll.reset(),
            _ => {}
        }
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, pending: PendingDelete) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Mode::Normal
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                let title = pending.title().to_string();
                match self.session.delete(pending) {
                    Ok(_) => self.set_status(format!("Deleted '{title}'."), StatusKind::Info),
                    Err(err) => self.set_status(
                        format!("Deleted '{title}', but saving failed: {}", surface_error(&err)),
                        StatusKind::Error,
                    ),
                }
                self.playlist
                    .ensure_in_bounds(self.session.songs().len());
                Mode::Normal
            }
            _ => Mode::ConfirmDelete(pending),
        }
    }

    fn handle_import(&mut self, code: KeyCode, mut picker: FilePicker) -> Mode {
        match code {
            KeyCode::Esc => {
                self.set_status("Import cancelled.", StatusKind::Info);
                return Mode::Normal;
            }
            KeyCode::Up => picker.move_selection(-1),
            KeyCode::Down => picker.move_selection(1),
            KeyCode::PageUp => picker.move_selection(-PAGE),
            KeyCode::PageDown => picker.move_selection(PAGE),
            KeyCode::Home => picker.select_first(),
            KeyCode::End => picker.select_last(),
            KeyCode::Char(' ') => {
                picker.toggle_current();
            }
            KeyCode::Backspace | KeyCode::Left => {
                if let Err(err) = picker.go_up() {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
            }
            KeyCode::Enter => match picker.activate() {
                Ok(PickerAction::Stay) => {}
                Ok(PickerAction::Import(paths)) => {
                    self.import_dir = picker.dir.clone();
                    let summary = self.session.import_files(&paths);
                    let kind = if summary.is_clean() {
                        StatusKind::Info
                    } else {
                        StatusKind::Error
                    };
                    self.set_status(summary.message(), kind);
                    return Mode::Normal;
                }
                Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            },
            _ => {}
        }
        Mode::Importing(picker)
    }

    /// Route a mouse event. Moves and releases always reach the drag tracker so
    /// a drag keeps following the pointer after it leaves the handle.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let pointer = Position::new(event.column, event.row);
        match event.kind {
            MouseEventKind::Drag(MouseButton::Left) => {
                self.drag.on_pointer_move(pointer);
            }
            MouseEventKind::Up(_) => self.drag.end_drag(),
            MouseEventKind::Down(MouseButton::Left) => {
                if !matches!(self.mode, Mode::Normal) || !self.overlay_visible() {
                    return;
                }
                let layout = overlay_layout(self.drag.panel());
                if layout.close.contains(pointer) {
                    self.session.close_overlay();
                } else if layout.prev.contains(pointer) {
                    self.step_song(false);
                } else if layout.next.contains(pointer) {
                    self.step_song(true);
                } else if self.drag.begin_drag(pointer) {
                    debug!("overlay drag started at {pointer:?}");
                }
            }
            MouseEventKind::ScrollDown => self.scroll_at(pointer, 1),
            MouseEventKind::ScrollUp => self.scroll_at(pointer, -1),
            _ => {}
        }
    }

    fn scroll_at(&mut self, pointer: Position, delta: i32) {
        if !matches!(self.mode, Mode::Normal) {
            return;
        }
        if self.overlay_visible() && self.drag.panel().contains(pointer) {
            self.scroll_overlay(delta);
        } else if self.session.view().screen() == Screen::Detail {
            let max = self.detail_scroll_max();
            self.detail_scroll.scroll_by(delta, max);
        } else {
            let len = self.session.songs().len();
            self.playlist.move_selection(delta as isize, len);
        }
    }

    fn scroll_overlay(&mut self, delta: i32) {
        if self.overlay_visible() {
            let max = self.overlay_scroll_max();
            self.overlay_scroll.scroll_by(delta, max);
        }
    }

    fn toggle_overlay(&mut self) {
        let before = self.session.view().overlay();
        let after = self.session.toggle_overlay();
        match (before, after) {
            (Overlay::Closed, Overlay::Open) => {
                self.drag = DragTracker::new(self.viewport);
                self.overlay_scroll.reset();
                self.clear_status();
            }
            (Overlay::Closed, Overlay::Closed) => {
                self.set_status("Open a song before floating its lyrics.", StatusKind::Error);
            }
            _ => {}
        }
    }

    fn step_song(&mut self, forward: bool) {
        let moved = if forward {
            self.session.next()
        } else {
            self.session.prev()
        };
        if moved {
            self.detail_scroll.reset();
            self.overlay_scroll.reset();
            self.sync_cursor();
        }
    }

    fn move_song(&mut self, direction: MoveDirection) {
        let index = self.playlist.selected;
        let len = self.session.songs().len();
        let result = self.session.reorder(index, direction);

        if matches!(result, Ok(true) | Err(_)) {
            let offset = match direction {
                MoveDirection::Up => -1,
                MoveDirection::Down => 1,
            };
            self.playlist.move_selection(offset, len);
        }
        if let Err(err) = result {
            self.set_status(
                format!("Moved, but saving failed: {}", surface_error(&err)),
                StatusKind::Error,
            );
        }
    }

    fn toggle_theme(&mut self) {
        match self.session.toggle_theme() {
            Ok(theme) => self.set_status(format!("Switched to {theme} theme."), StatusKind::Info),
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let palette = self.session.theme().palette();
        let area = frame.area();
        frame.render_widget(Block::default().style(palette.base), area);

        let footer_height = FOOTER_HEIGHT.min(area.height);
        let (content_area, footer_area) = split_footer(area);

        match self.session.view().screen() {
            Screen::List => self.draw_playlist(frame, content_area, &palette),
            Screen::Detail => match self.session.active_song() {
                Some(song) => self.draw_detail(frame, content_area, song, &palette),
                None => self.draw_missing_song(frame, content_area, &palette),
            },
        }

        if area.height >= footer_height {
            self.draw_footer(frame, footer_area, &palette);
        }

        if self.overlay_visible() {
            if let Some(song) = self.session.active_song() {
                self.draw_overlay(frame, area, song, &palette);
            }
        }

        match &self.mode {
            Mode::ConfirmDelete(pending) => self.draw_confirm_delete(frame, area, pending),
            Mode::Importing(picker) => self.draw_picker(frame, area, picker, &palette),
            Mode::Normal => {}
        }
    }

    fn draw_playlist(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let songs = self.session.songs();
        let active_index = self.session.view().active_index(songs);
        let active_song = active_index.map(|index| &songs[index]);
        let header_height = if active_song.is_some() { 5 } else { 4 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(header_height), Constraint::Min(1)])
            .split(area);

        let plural = if songs.len() == 1 { "" } else { "s" };
        let mut header = vec![
            Line::from(vec![
                Span::styled("My Playlist", palette.accent),
                Span::styled(
                    format!("   {} theme", self.session.theme()),
                    palette.muted,
                ),
            ]),
            Line::from(Span::styled(
                format!("{} song{plural} loaded", songs.len()),
                palette.muted,
            )),
        ];
        if let Some(song) = active_song {
            header.push(Line::from(vec![
                Span::styled("● ", palette.highlight),
                Span::raw("Now Playing: "),
                Span::styled(
                    song.song_info.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw("   "),
                Span::styled("[r] Resume", palette.key),
            ]));
        }
        let header = Paragraph::new(header)
            .alignment(Alignment::Left)
            .block(Block::default().borders(Borders::ALL).title("Lyrical Float"));
        frame.render_widget(header, chunks[0]);

        if songs.is_empty() {
            let message = Paragraph::new(vec![
                Line::from("No songs yet."),
                Line::from(Span::styled(
                    "Press [i] to import a JSON file to get started.",
                    palette.muted,
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(message, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = songs
            .iter()
            .enumerate()
            .map(|(index, song)| {
                let marker = if Some(index) == active_index { "♪ " } else { "" };
                let mut meta = song.song_info.artist.clone();
                if let Some(genre) = song.song_info.genre.as_deref() {
                    meta.push_str(" • ");
                    meta.push_str(genre);
                }
                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("{:>2}. ", index + 1), palette.muted),
                        Span::styled(marker, palette.accent),
                        Span::styled(
                            song.song_info.title.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]),
                    Line::from(Span::styled(format!("    {meta}"), palette.muted)),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Songs"))
            .highlight_style(palette.highlight)
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(self.playlist.selected));
        frame.render_stateful_widget(list, chunks[1], &mut list_state);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, song: &Song, palette: &Palette) {
        let (header_area, body_area) = detail_areas(area);

        let mut subtitle = song.song_info.artist.clone();
        if let Some(genre) = song.song_info.genre.as_deref() {
            subtitle.push_str(" • ");
            subtitle.push_str(genre);
        }
        let header = Paragraph::new(vec![
            Line::from(Span::styled(song.song_info.title.clone(), palette.accent)),
            Line::from(Span::styled(subtitle, palette.muted)),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Lyrics"));
        frame.render_widget(header, header_area);

        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(body_area);
        frame.render_widget(block, body_area);
        let body = detail_body(song, palette).scroll((self.detail_scroll.offset, 0));
        frame.render_widget(body, inner);
    }

    fn draw_missing_song(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let message = Paragraph::new(vec![
            Line::from("Song not found."),
            Line::from(Span::styled("Press Esc to go back.", palette.muted)),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(message, area);
    }

    fn draw_overlay(&self, frame: &mut Frame, area: Rect, song: &Song, palette: &Palette) {
        let panel = self.drag.panel().intersection(area);
        if panel.width < 8 || panel.height < 4 {
            return;
        }
        frame.render_widget(Clear, panel);

        let handle_style = if self.drag.is_dragging() {
            palette.highlight
        } else {
            palette.muted
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(handle_style)
            .style(palette.base)
            .title_top(Line::from(Span::styled(" ≡ Drag ", handle_style)))
            .title_top(Line::from(Span::styled("[x]", palette.key)).right_aligned());
        frame.render_widget(block, panel);

        let layout = overlay_layout(panel);
        let content = overlay_body(song, palette).scroll((self.overlay_scroll.offset, 0));
        frame.render_widget(content, layout.content);

        let button_style = |enabled: bool| if enabled { palette.key } else { palette.muted };
        frame.render_widget(
            Paragraph::new(Span::styled("Overlay Mode", palette.muted)).alignment(Alignment::Center),
            layout.controls,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(" ◀ ", button_style(self.session.has_prev()))),
            layout.prev,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(" ▶ ", button_style(self.session.has_next()))),
            layout.next,
        );
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions(palette);

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self, palette: &Palette) -> Line<'static> {
        let hints: &[(&str, &str)] = match (&self.mode, self.session.view().screen()) {
            (Mode::ConfirmDelete(_), _) => &[("[y]", "Delete"), ("[n]", "Cancel")],
            (Mode::Importing(_), _) => &[
                ("[↑↓]", "Navigate"),
                ("[Space]", "Toggle"),
                ("[Enter]", "Open/Import"),
                ("[Backspace]", "Up"),
                ("[Esc]", "Cancel"),
            ],
            (Mode::Normal, Screen::List) => &[
                ("[↑↓]", "Select"),
                ("[Enter]", "Open"),
                ("[K/J]", "Move"),
                ("[-]", "Delete"),
                ("[i]", "Import"),
                ("[r]", "Resume"),
                ("[f]", "Float"),
                ("[t]", "Theme"),
                ("[q]", "Quit"),
            ],
            (Mode::Normal, Screen::Detail) => &[
                ("[↑↓]", "Scroll"),
                ("[n/p]", "Next/Prev"),
                ("[f]", "Float"),
                ("[t]", "Theme"),
                ("[Esc]", "Back"),
                ("[q]", "Quit"),
            ],
        };

        let mut spans = Vec::with_capacity(hints.len() * 2);
        for (idx, (key, label)) in hints.iter().enumerate() {
            let separator = if idx + 1 == hints.len() { "" } else { "   " };
            spans.push(Span::styled(key.to_string(), palette.key));
            spans.push(Span::raw(format!(" {label}{separator}")));
        }
        Line::from(spans)
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, pending: &PendingDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Delete Song").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Delete '{}'?", pending.title())),
            Line::from("It will be removed from the playlist."),
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

    fn draw_picker(&self, frame: &mut Frame, area: Rect, picker: &FilePicker, palette: &Palette) {
        let popup_area = centered_rect(70, 60, area);
        frame.render_widget(Clear, popup_area);

        let title = if picker.checked_count() > 0 {
            format!("Import JSON • {} ({} checked)", picker.dir.display(), picker.checked_count())
        } else {
            format!("Import JSON • {}", picker.dir.display())
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .style(palette.base);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let has_files = picker
            .entries
            .iter()
            .any(|entry| matches!(entry, PickerEntry::File(_)));

        let mut items: Vec<ListItem> = picker
            .entries
            .iter()
            .enumerate()
            .map(|(index, entry)| match entry {
                PickerEntry::Parent => ListItem::new(".."),
                PickerEntry::Directory(name) => ListItem::new(format!("{name}/")),
                PickerEntry::File(name) => {
                    let checkbox = if picker.is_checked(index) { "[x]" } else { "[ ]" };
                    ListItem::new(format!("{checkbox} {name}"))
                }
            })
            .collect();
        if !has_files {
            items.push(ListItem::new(Span::styled(
                "No .json files in this directory.",
                palette.muted,
            )));
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::NONE))
            .highlight_style(palette.highlight)
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(Some(picker.selected));
        frame.render_stateful_widget(list, inner, &mut list_state);
    }

    fn overlay_visible(&self) -> bool {
        self.session.view().overlay() == Overlay::Open && self.session.active_song().is_some()
    }

    /// Largest detail offset that still fills the body, measured on the
    /// wrapped text at the current terminal width.
    fn detail_scroll_max(&self) -> usize {
        let Some(song) = self.session.active_song() else {
            return 0;
        };
        let (content_area, _) = split_footer(self.viewport);
        let (_, body_area) = detail_areas(content_area);
        let inner = Block::default().borders(Borders::ALL).inner(body_area);
        let palette = self.session.theme().palette();
        wrapped_overflow(&detail_body(song, &palette), inner)
    }

    fn overlay_scroll_max(&self) -> usize {
        let Some(song) = self.session.active_song() else {
            return 0;
        };
        let panel = self.drag.panel().intersection(self.viewport);
        let content = overlay_layout(panel).content;
        let palette = self.session.theme().palette();
        wrapped_overflow(&overlay_body(song, &palette), content)
    }

    fn cursor_song_id(&self) -> Option<String> {
        self.session
            .songs()
            .get(self.playlist.selected)
            .map(|song| song.id.clone())
    }

    /// Put the list cursor on the active song.
    fn sync_cursor(&mut self) {
        if let Some(index) = self.session.view().active_index(self.session.songs()) {
            self.playlist.selected = index;
        }
    }

    fn set_status<S2: Into<String>>(&mut self, text: S2, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }
}

/// Split the screen into the content area and the footer.
fn split_footer(area: Rect) -> (Rect, Rect) {
    let footer_height = FOOTER_HEIGHT.min(area.height);
    if area.height > footer_height {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(footer_height)])
            .split(area);
        (chunks[0], chunks[1])
    } else {
        (area, area)
    }
}

/// Header and lyrics body of the detail screen.
fn detail_areas(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(1)])
        .split(area);
    (chunks[0], chunks[1])
}

fn detail_body(song: &Song, palette: &Palette) -> Paragraph<'static> {
    let mut lines = lyric_lines(song, palette);
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("End of Lyrics", palette.muted)).centered());
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

fn overlay_body(song: &Song, palette: &Palette) -> Paragraph<'static> {
    let mut lines = vec![
        Line::from(Span::styled(
            song.song_info.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(Span::styled(song.song_info.artist.clone(), palette.muted)).centered(),
        Line::from(""),
    ];
    lines.extend(lyric_lines(song, palette));
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

/// Rows of `paragraph` that do not fit in `area` once wrapped to its width.
fn wrapped_overflow(paragraph: &Paragraph, area: Rect) -> usize {
    if area.width == 0 {
        return 0;
    }
    paragraph
        .line_count(area.width)
        .saturating_sub(area.height as usize)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;
    use crate::db::MemoryStorage;
    use crate::models::ImportedSong;

    fn app_with(titles: &[&str], import_dir: PathBuf) -> App<MemoryStorage> {
        let mut session = Session::load(MemoryStorage::new().with_item("lyrical_songs", "[]"));
        let items: Vec<ImportedSong> = titles
            .iter()
            .map(|title| {
                serde_json::from_value(serde_json::json!({
                    "song_info": {"title": title, "artist": "X"},
                    "lyrics": [{"section": "Verse 1", "lines": [{"en": "la", "ko": "라"}]}]
                }))
                .unwrap()
            })
            .collect();
        session.import_songs(items).unwrap();
        let mut app = App::new(session, import_dir);
        app.resize(Rect::new(0, 0, 100, 40));
        app
    }

    fn press(app: &mut App<MemoryStorage>, codes: &[KeyCode]) {
        for code in codes {
            app.handle_key(*code).unwrap();
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

    fn titles(app: &App<MemoryStorage>) -> Vec<String> {
        app.session()
            .songs()
            .iter()
            .map(|song| song.song_info.title.clone())
            .collect()
    }

    fn render(app: &App<MemoryStorage>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 40)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn enter_opens_detail_and_escape_returns() {
        let mut app = app_with(&["P", "Q"], PathBuf::from("."));
        press(&mut app, &[KeyCode::Down, KeyCode::Enter]);
        assert_eq!(app.session().view().screen(), Screen::Detail);
        assert_eq!(app.session().active_song().unwrap().song_info.title, "Q");

        press(&mut app, &[KeyCode::Esc]);
        assert_eq!(app.session().view().screen(), Screen::List);
        assert!(render(&app).contains("Now Playing: Q"));

        press(&mut app, &[KeyCode::Char('r')]);
        assert_eq!(app.session().view().screen(), Screen::Detail);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = app_with(&["P", "Q"], PathBuf::from("."));
        press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('n')]);
        assert_eq!(titles(&app), ["P", "Q"]);

        press(&mut app, &[KeyCode::Char('-'), KeyCode::Char('x')]);
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        assert!(render(&app).contains("Delete 'P - X'?"));

        press(&mut app, &[KeyCode::Char('y')]);
        assert_eq!(titles(&app), ["Q"]);
    }

    #[test]
    fn deleting_the_floating_song_closes_everything() {
        let mut app = app_with(&["P", "Q", "R"], PathBuf::from("."));
        press(&mut app, &[KeyCode::Down, KeyCode::Enter, KeyCode::Char('f')]);
        assert_eq!(app.session().view().overlay(), Overlay::Open);

        press(&mut app, &[KeyCode::Esc, KeyCode::Char('-'), KeyCode::Char('y')]);
        let view = app.session().view();
        assert_eq!(view.selection(), None);
        assert_eq!(view.screen(), Screen::List);
        assert_eq!(view.overlay(), Overlay::Closed);
        assert_eq!(titles(&app), ["P", "R"]);
    }

    #[test]
    fn shift_k_moves_song_and_cursor() {
        let mut app = app_with(&["P", "Q", "R"], PathBuf::from("."));
        press(&mut app, &[KeyCode::Down, KeyCode::Char('K')]);
        assert_eq!(titles(&app), ["Q", "P", "R"]);
        assert_eq!(app.playlist.selected, 0);

        press(&mut app, &[KeyCode::Char('K')]);
        assert_eq!(titles(&app), ["Q", "P", "R"]);

        press(&mut app, &[KeyCode::End, KeyCode::Char('J')]);
        assert_eq!(titles(&app), ["Q", "P", "R"]);
    }

    #[test]
    fn float_without_selection_reports_error() {
        let mut app = app_with(&["P"], PathBuf::from("."));
        press(&mut app, &[KeyCode::Char('f')]);
        assert_eq!(app.session().view().overlay(), Overlay::Closed);
        assert_eq!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Error));
    }

    #[test]
    fn overlay_follows_mouse_drag_and_closes() {
        let mut app = app_with(&["P", "Q"], PathBuf::from("."));
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('f')]);
        assert!(render(&app).contains("Overlay Mode"));

        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 5, 3));
        assert!(app.drag.is_dragging());
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 10));
        app.handle_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 30, 12));
        app.handle_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 30, 12));
        assert!(!app.drag.is_dragging());
        assert_eq!(app.drag.position(), Position::new(27, 12));

        let next = overlay_layout(app.drag.panel()).next;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), next.x + 1, next.y));
        assert_eq!(app.session().active_song().unwrap().song_info.title, "Q");

        let close = overlay_layout(app.drag.panel()).close;
        app.handle_mouse(mouse(MouseEventKind::Down(MouseButton::Left), close.x, close.y));
        assert_eq!(app.session().view().overlay(), Overlay::Closed);

        press(&mut app, &[KeyCode::Char('f')]);
        assert_eq!(app.drag.position(), crate::drag::DEFAULT_POSITION);
    }

    #[test]
    fn import_picker_appends_songs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("songs.json"),
            r#"[{"song_info":{"title":"A","artist":"X"},"lyrics":[]},
                {"song_info":{"title":"B","artist":"Y"},"lyrics":[]}]"#,
        )
        .unwrap();
        fs::write(dir.path().join("broken.json"), "{oops").unwrap();

        let mut app = app_with(&["P"], dir.path().to_path_buf());
        press(&mut app, &[KeyCode::Char('i')]);
        assert!(matches!(app.mode, Mode::Importing(_)));

        // entries: .., broken.json, songs.json
        press(
            &mut app,
            &[
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Down,
                KeyCode::Char(' '),
                KeyCode::Enter,
            ],
        );
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(titles(&app), ["P", "A", "B"]);

        let status = app.status.as_ref().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert!(status.text.contains("broken.json"));
        assert!(status.text.starts_with("Imported 2 songs."));
    }

    #[test]
    fn theme_toggle_updates_header() {
        let mut app = app_with(&["P"], PathBuf::from("."));
        let before = app.session().theme();
        press(&mut app, &[KeyCode::Char('t')]);
        assert_eq!(app.session().theme(), before.toggled());
        assert!(render(&app).contains(&format!("{} theme", before.toggled())));
    }

    fn app_with_long_song() -> App<MemoryStorage> {
        let mut lines: Vec<serde_json::Value> = (0..30)
            .map(|_| serde_json::json!({"en": "la ".repeat(66), "ko": "라"}))
            .collect();
        lines.push(serde_json::json!({"en": "ENDMARK", "ko": "끝"}));
        let song = serde_json::from_value(serde_json::json!({
            "song_info": {"title": "Long", "artist": "X"},
            "lyrics": [{"section": "Verse 1", "lines": lines}]
        }))
        .unwrap();

        let mut session = Session::load(MemoryStorage::new().with_item("lyrical_songs", "[]"));
        session.import_songs(vec![song]).unwrap();
        let mut app = App::new(session, PathBuf::from("."));
        app.resize(Rect::new(0, 0, 100, 40));
        app
    }

    #[test]
    fn detail_scroll_reaches_end_of_wrapped_lyrics() {
        let mut app = app_with_long_song();
        press(&mut app, &[KeyCode::Enter]);
        assert!(!render(&app).contains("End of Lyrics"));

        for _ in 0..500 {
            press(&mut app, &[KeyCode::PageDown]);
        }
        let screen = render(&app);
        assert!(screen.contains("ENDMARK"));
        assert!(screen.contains("End of Lyrics"));
    }

    #[test]
    fn overlay_scroll_reaches_end_of_wrapped_lyrics() {
        let mut app = app_with_long_song();
        press(&mut app, &[KeyCode::Enter, KeyCode::Char('f')]);
        assert!(!render(&app).contains("ENDMARK"));

        for _ in 0..500 {
            press(&mut app, &[KeyCode::Char(']')]);
        }
        assert!(render(&app).contains("ENDMARK"));

        let max = app.overlay_scroll.offset;
        press(&mut app, &[KeyCode::Char(']')]);
        assert_eq!(app.overlay_scroll.offset, max);
    }
}
