// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use churnboard_app::{
    AppCommand, AppState, ChartDataset, ChurnForm, Customer, CustomerDirectory, FormField,
    Palette, PredictionRequest, PredictionResponse, Rgb, chart_dataset, format_percent,
    gauge_color, gauge_value,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

const CURSOR_MARK: &str = "▸";

#[derive(Debug, Clone, PartialEq)]
pub enum DirectoryEvent {
    Loaded(Vec<Customer>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PredictionEvent {
    Ready {
        request_id: u64,
        response: Box<PredictionResponse>,
    },
    Failed {
        request_id: u64,
        error: String,
    },
}

impl PredictionEvent {
    const fn request_id(&self) -> u64 {
        match self {
            Self::Ready { request_id, .. } | Self::Failed { request_id, .. } => *request_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
    Directory(DirectoryEvent),
    Prediction(PredictionEvent),
}

/// The outside world as the view sees it: two remote operations, plus spawn
/// variants that post completion events back over the internal channel. The
/// defaults run inline; the real runtime overrides them with worker threads
/// so the event loop never blocks on the network.
pub trait AppRuntime {
    fn fetch_customers(&mut self) -> Result<Vec<Customer>>;
    fn submit_prediction(&mut self, request: &PredictionRequest) -> Result<PredictionResponse>;

    fn spawn_directory_load(&mut self, tx: Sender<InternalEvent>) -> Result<()> {
        let event = match self.fetch_customers() {
            Ok(customers) => InternalEvent::Directory(DirectoryEvent::Loaded(customers)),
            Err(error) => InternalEvent::Directory(DirectoryEvent::Failed(format!("{error:#}"))),
        };
        tx.send(event)
            .map_err(|_| anyhow::anyhow!("directory event channel closed"))?;
        Ok(())
    }

    fn spawn_prediction(
        &mut self,
        request_id: u64,
        request: &PredictionRequest,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let event = match self.submit_prediction(request) {
            Ok(response) => InternalEvent::Prediction(PredictionEvent::Ready {
                request_id,
                response: Box::new(response),
            }),
            Err(error) => InternalEvent::Prediction(PredictionEvent::Failed {
                request_id,
                error: format!("{error:#}"),
            }),
        };
        tx.send(event)
            .map_err(|_| anyhow::anyhow!("prediction event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct SelectorUiState {
    visible: bool,
    cursor: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    directory: CustomerDirectory,
    form: ChurnForm,
    /// 0 is the customer picker row; fields follow in `FormField::ALL` order.
    field_cursor: usize,
    selector: SelectorUiState,
    response: Option<PredictionResponse>,
    in_flight: Option<u64>,
    next_request_id: u64,
    results_scroll: u16,
    status_token: u64,
}

const FORM_ROWS: usize = FormField::ALL.len() + 1;

fn field_at(cursor: usize) -> Option<FormField> {
    if cursor == 0 {
        None
    } else {
        FormField::ALL.get(cursor - 1).copied()
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = runtime.spawn_directory_load(internal_tx.clone()) {
        tracing::warn!("customer directory load did not start: {error:#}");
        state.dispatch(AppCommand::SetStatus(format!(
            "customer load failed: {error}"
        )));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
            InternalEvent::Directory(event) => {
                handle_directory_event(state, view_data, tx, event);
            }
            InternalEvent::Prediction(event) => {
                handle_prediction_event(state, view_data, tx, event);
            }
        }
    }
}

fn handle_directory_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: DirectoryEvent,
) {
    match event {
        DirectoryEvent::Loaded(customers) => {
            view_data.directory = CustomerDirectory::from_fetched(customers);
            view_data.selector.cursor = 0;
            let message = format!("customers loaded ({})", view_data.directory.len());
            emit_status(state, view_data, tx, message);
        }
        DirectoryEvent::Failed(error) => {
            // The directory stays empty; manual entry still works.
            tracing::warn!("customer directory load failed: {error}");
            emit_status(state, view_data, tx, format!("customer load failed: {error}"));
        }
    }
}

fn handle_prediction_event(
    state: &mut AppState,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: PredictionEvent,
) {
    let Some(current) = view_data.in_flight else {
        tracing::debug!(
            request_id = event.request_id(),
            "dropping prediction event with nothing in flight"
        );
        return;
    };
    if event.request_id() != current {
        tracing::debug!(
            request_id = event.request_id(),
            current,
            "discarding superseded prediction response"
        );
        return;
    }

    match event {
        PredictionEvent::Ready { response, .. } => {
            view_data.response = Some(*response);
            view_data.results_scroll = 0;
            view_data.in_flight = None;
            emit_status(state, view_data, tx, "prediction ready");
        }
        PredictionEvent::Failed { error, .. } => {
            // A prior result, if any, stays on screen.
            view_data.in_flight = None;
            tracing::warn!("prediction failed: {error}");
            emit_status(state, view_data, tx, format!("prediction failed: {error}"));
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if key.code == KeyCode::Char('t') && key.modifiers.contains(KeyModifiers::CONTROL) {
        state.dispatch(AppCommand::ToggleMode);
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
        return false;
    }

    if view_data.selector.visible {
        handle_selector_key(state, view_data, internal_tx, key);
        return false;
    }

    match key.code {
        KeyCode::Up => move_field_cursor(view_data, -1),
        KeyCode::Down | KeyCode::Tab => move_field_cursor(view_data, 1),
        KeyCode::Left => cycle_choice(view_data, -1),
        KeyCode::Right => cycle_choice(view_data, 1),
        KeyCode::PageUp => {
            view_data.results_scroll = view_data.results_scroll.saturating_sub(4);
        }
        KeyCode::PageDown => {
            view_data.results_scroll = view_data.results_scroll.saturating_add(4);
        }
        KeyCode::Enter => {
            if view_data.field_cursor == 0 {
                open_selector(state, view_data, internal_tx);
            } else {
                submit_form(state, runtime, view_data, internal_tx);
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = field_at(view_data.field_cursor) {
                view_data.form.value_mut(field).pop();
            }
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            if let Some(field) = field_at(view_data.field_cursor) {
                view_data.form.value_mut(field).push(ch);
            }
        }
        _ => {}
    }
    false
}

fn move_field_cursor(view_data: &mut ViewData, delta: isize) {
    let len = FORM_ROWS as isize;
    let next = (view_data.field_cursor as isize + delta).rem_euclid(len);
    view_data.field_cursor = next as usize;
}

fn cycle_choice(view_data: &mut ViewData, delta: isize) {
    let Some(field) = field_at(view_data.field_cursor) else {
        return;
    };
    let choices = field.choices();
    if choices.is_empty() {
        return;
    }

    let current = view_data.form.value(field);
    let position = choices
        .iter()
        .position(|choice| *choice == current)
        .map(|index| index as isize)
        .unwrap_or(-delta.signum());
    let len = choices.len() as isize;
    let next = (position + delta).rem_euclid(len) as usize;
    *view_data.form.value_mut(field) = choices[next].to_owned();
}

fn open_selector(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if view_data.directory.is_empty() {
        emit_status(
            state,
            view_data,
            internal_tx,
            "no customers loaded -- enter the id and surname by hand",
        );
        return;
    }
    view_data.selector.visible = true;
    view_data.selector.cursor = view_data
        .selector
        .cursor
        .min(view_data.directory.len().saturating_sub(1));
}

fn handle_selector_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc => {
            view_data.selector.visible = false;
        }
        KeyCode::Up => {
            view_data.selector.cursor = view_data.selector.cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            view_data.selector.cursor = view_data
                .selector
                .cursor
                .saturating_add(1)
                .min(view_data.directory.len().saturating_sub(1));
        }
        KeyCode::Enter => {
            if let Some(customer) = view_data.directory.get(view_data.selector.cursor) {
                let customer = customer.clone();
                view_data.form.apply_customer(&customer);
                view_data.selector.visible = false;
                let label = CustomerDirectory::label(&customer);
                emit_status(state, view_data, internal_tx, format!("customer {label}"));
            } else {
                view_data.selector.visible = false;
            }
        }
        _ => {}
    }
}

fn next_request_id(view_data: &mut ViewData) -> u64 {
    view_data.next_request_id = view_data.next_request_id.saturating_add(1);
    if view_data.next_request_id == 0 {
        view_data.next_request_id = 1;
    }
    view_data.next_request_id
}

fn submit_form<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let request = match view_data.form.build() {
        Ok(request) => request,
        Err(error) => {
            emit_status(state, view_data, internal_tx, error.to_string());
            return;
        }
    };

    // A new submission supersedes any in-flight one; the older response is
    // discarded on arrival by the request-id check.
    let request_id = next_request_id(view_data);
    view_data.in_flight = Some(request_id);
    emit_status(state, view_data, internal_tx, "predicting...");

    if let Err(error) = runtime.spawn_prediction(request_id, &request, internal_tx.clone()) {
        view_data.in_flight = None;
        emit_status(state, view_data, internal_tx, format!("prediction failed: {error}"));
    }
}

const fn color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.0, rgb.1, rgb.2)
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let palette = state.mode.palette();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    render_header(frame, layout[0], state, palette);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(layout[1]);
    render_form(frame, body[0], view_data, palette);
    render_results(frame, body[1], state, view_data, palette);

    let status = status_text(state, view_data);
    let status_widget = Paragraph::new(status)
        .style(Style::default().fg(color(palette.axis)))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[2]);

    if view_data.selector.visible {
        render_selector_overlay(frame, view_data, palette);
    }
}

fn render_header(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    palette: &Palette,
) {
    let title_line = Line::from(vec![
        Span::styled(
            "churn prediction",
            Style::default()
                .fg(color(palette.text))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  [{}]", state.mode.label()),
            Style::default().fg(color(palette.axis)),
        ),
    ]);
    let header = Paragraph::new(title_line).block(
        Block::default()
            .title("churnboard")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.grid))),
    );
    frame.render_widget(header, area);
}

fn render_form(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    view_data: &ViewData,
    palette: &Palette,
) {
    let base = Style::default().fg(color(palette.text));
    let selected = base.add_modifier(Modifier::REVERSED);

    let mut lines = Vec::with_capacity(FORM_ROWS);
    let picker_label = match view_data.directory.lookup(&format!(
        "{} - {}",
        view_data.form.customer_id, view_data.form.surname
    )) {
        Some(customer) => CustomerDirectory::label(customer),
        None if view_data.directory.is_empty() => "(directory unavailable)".to_owned(),
        None => "(none selected)".to_owned(),
    };
    lines.push(form_line(
        "select customer",
        &picker_label,
        view_data.field_cursor == 0,
        base,
        selected,
    ));
    for (index, field) in FormField::ALL.iter().enumerate() {
        lines.push(form_line(
            field.label(),
            view_data.form.value(*field),
            view_data.field_cursor == index + 1,
            base,
            selected,
        ));
    }

    let form = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .title("customer details")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color(palette.grid))),
    );
    frame.render_widget(form, area);
}

fn form_line(
    label: &str,
    value: &str,
    is_cursor: bool,
    base: Style,
    selected: Style,
) -> Line<'static> {
    let mark = if is_cursor { CURSOR_MARK } else { " " };
    let style = if is_cursor { selected } else { base };
    Line::from(Span::styled(format!("{mark} {label:<18} {value}"), style))
}

fn render_results(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
    palette: &Palette,
) {
    let Some(response) = &view_data.response else {
        let message = if view_data.in_flight.is_some() {
            "waiting for the prediction service..."
        } else {
            "no prediction yet -- fill in the form and press enter"
        };
        let placeholder = Paragraph::new(message)
            .style(Style::default().fg(color(palette.axis)))
            .block(
                Block::default()
                    .title("prediction results")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color(palette.grid))),
            );
        frame.render_widget(placeholder, area);
        return;
    };

    let dataset = chart_dataset(response, state.mode);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(dataset.labels.len() as u16 + 2),
            Constraint::Min(4),
            Constraint::Min(6),
        ])
        .split(area);

    render_probability_gauge(frame, rows[0], state, response, palette);
    render_model_bars(frame, rows[1], &dataset, palette);

    let explanation = Paragraph::new(response.explanation.clone())
        .style(Style::default().fg(color(palette.text)))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("explanation")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(palette.grid))),
        );
    frame.render_widget(explanation, rows[2]);

    let email = Paragraph::new(email_text(&response.email, palette))
        .wrap(Wrap { trim: false })
        .scroll((view_data.results_scroll, 0))
        .block(
            Block::default()
                .title("personalized email")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(palette.grid))),
        );
    frame.render_widget(email, rows[3]);
}

fn render_probability_gauge(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    response: &PredictionResponse,
    palette: &Palette,
) {
    let value = gauge_value(response);
    let verdict = match response.prediction {
        Some(1) => " -- likely to churn",
        Some(0) => " -- likely to stay",
        _ => "",
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .title("churn probability")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(palette.grid))),
        )
        .gauge_style(Style::default().fg(color(gauge_color(value, state.mode))))
        .ratio((value / 100.0).clamp(0.0, 1.0))
        .label(Span::styled(
            format!("{}{}", format_percent(value), verdict),
            Style::default().fg(color(palette.text)),
        ));
    frame.render_widget(gauge, area);
}

fn render_model_bars(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    dataset: &ChartDataset,
    palette: &Palette,
) {
    let block = Block::default()
        .title("model breakdown")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color(dataset.style.border)));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let constraints: Vec<Constraint> = dataset
        .labels
        .iter()
        .map(|_| Constraint::Length(1))
        .collect();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (index, (label, value)) in dataset.labels.iter().zip(&dataset.values).enumerate() {
        let Some(row) = rows.get(index) else {
            break;
        };
        let bar = Gauge::default()
            .gauge_style(Style::default().fg(color(dataset.style.fill)))
            .style(Style::default().fg(color(palette.axis)))
            .ratio((value / 100.0).clamp(0.0, 1.0))
            .label(Span::styled(
                format!("{label} {}", format_percent(*value)),
                Style::default().fg(color(palette.text)),
            ));
        frame.render_widget(bar, *row);
    }
}

/// Render the response email as rich text. The service is a trusted
/// collaborator; the only markup interpreted is `<b>`/`</b>`, everything
/// else passes through literally.
fn email_text(email: &str, palette: &Palette) -> Text<'static> {
    let base = Style::default().fg(color(palette.text));
    let bold = base.add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    let mut emphasized = false;
    for raw_line in email.lines() {
        let mut spans = Vec::new();
        let mut rest = raw_line;
        loop {
            let tag = if emphasized { "</b>" } else { "<b>" };
            let style = if emphasized { bold } else { base };
            match rest.find(tag) {
                Some(index) => {
                    if index > 0 {
                        spans.push(Span::styled(rest[..index].to_owned(), style));
                    }
                    rest = &rest[index + tag.len()..];
                    emphasized = !emphasized;
                }
                None => {
                    if !rest.is_empty() {
                        spans.push(Span::styled(rest.to_owned(), style));
                    }
                    break;
                }
            }
        }
        lines.push(Line::from(spans));
    }
    Text::from(lines)
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if let Some(status) = &state.status_line {
        return status.clone();
    }
    if view_data.in_flight.is_some() {
        return "predicting...".to_owned();
    }
    "enter: select/predict | arrows: move + cycle | ctrl-t: theme | ctrl-q: quit".to_owned()
}

fn render_selector_overlay(
    frame: &mut ratatui::Frame<'_>,
    view_data: &ViewData,
    palette: &Palette,
) {
    let area = centered_rect(56, 62, frame.area());
    frame.render_widget(Clear, area);
    let text = selector_overlay_text(view_data, area.height as usize);
    let overlay = Paragraph::new(text)
        .style(Style::default().fg(color(palette.text)))
        .block(
            Block::default()
                .title("select customer")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color(palette.grid))),
        );
    frame.render_widget(overlay, area);
}

fn selector_overlay_text(view_data: &ViewData, height: usize) -> String {
    let rows = height.saturating_sub(2).max(1);
    let cursor = view_data.selector.cursor;
    let start = cursor.saturating_sub(rows.saturating_sub(1));

    let mut lines = Vec::with_capacity(rows);
    for (index, customer) in view_data
        .directory
        .customers()
        .iter()
        .enumerate()
        .skip(start)
        .take(rows)
    {
        let mark = if index == cursor { CURSOR_MARK } else { " " };
        lines.push(format!("{mark} {}", CustomerDirectory::label(customer)));
    }
    lines.join("\n")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
