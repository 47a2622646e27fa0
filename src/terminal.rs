// SPDX-License-Identifier: GPL-3.0-only

//! Terminal front end
//!
//! Renders the capture session with Unicode half-block characters for double
//! vertical resolution. Commands returned by the app model run on a tokio
//! runtime; acquisition results come back over a channel and are fed into
//! `update()` on the UI thread.

use crate::app::{
    CaptureApp, Command, Control, Message, Presentation, SessionView, ToastAction,
};
use crate::backends::camera::{CameraFrame, MediaProvider, MediaStream};
use crate::config::Config;
use crate::constants::timing;
use crate::errors::AppResult;
use crate::fl;
use crate::pipelines::photo::CapturedFrame;
use crate::submission::{HttpUploader, Uploader};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{info, warn};
use uuid::Uuid;

type Backend = CrosstermBackend<io::Stdout>;

/// Run the terminal front end until the user quits
pub fn run<P: MediaProvider>(provider: P, config: &Config) -> AppResult<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let uploader: Arc<dyn Uploader> = Arc::new(HttpUploader::from_config(config)?);
    let mut app = CaptureApp::new(Arc::new(provider), uploader, config);

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, &runtime, &mut app);

    // Release the camera before the terminal comes back
    let _ = app.update(Message::Shutdown);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// What a key press means in the current view
enum Input<S> {
    Quit,
    Send(Message<S>),
}

fn run_app<P: MediaProvider>(
    terminal: &mut Terminal<Backend>,
    runtime: &tokio::runtime::Runtime,
    app: &mut CaptureApp<P>,
) -> AppResult<()> {
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let mut review = ReviewImage::default();

    let command = app.update(Message::Start);
    spawn_command(runtime, command, &sender);

    loop {
        while let Ok(message) = receiver.try_recv() {
            let command = app.update(message);
            spawn_command(runtime, command, &sender);
        }
        let _ = app.update(Message::Tick(Instant::now()));

        let preview = app
            .session()
            .stream()
            .and_then(|stream| stream.current_frame());
        let view = app.view();
        review.sync(view.review);

        terminal.draw(|f| draw(f, &view, preview.as_ref(), review.frame.as_ref()))?;

        if !event::poll(timing::UI_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let ctrl_c = key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL);
        let input = if ctrl_c {
            Some(Input::Quit)
        } else {
            map_key(key.code, &view)
        };

        match input {
            Some(Input::Quit) => break,
            Some(Input::Send(message)) => {
                let command = app.update(message);
                spawn_command(runtime, command, &sender);
            }
            None => {}
        }
    }

    info!("Terminal front end exiting");
    Ok(())
}

fn spawn_command<S: Send + 'static>(
    runtime: &tokio::runtime::Runtime,
    command: Command<S>,
    sender: &mpsc::UnboundedSender<Message<S>>,
) {
    match command {
        Command::None => {}
        Command::Acquire(request) => {
            let sender = sender.clone();
            runtime.spawn(async move {
                let (ticket, result) = request.resolve().await;
                // The UI may already be gone; a dropped stream stops itself
                let _ = sender.send(Message::CameraAcquired(ticket, result));
            });
        }
        Command::Upload(upload) => {
            runtime.spawn(upload);
        }
    }
}

/// Translate a key into a message allowed by the current view
fn map_key<S>(code: KeyCode, view: &SessionView<'_>) -> Option<Input<S>> {
    if code == KeyCode::Char('q') {
        return Some(Input::Quit);
    }

    let take_still = view.has_control(Control::TakeStill);

    // A capture while reviewing replaces the still in the open dialog
    if view.review.is_some() {
        let message = match code {
            KeyCode::Char('d') => Message::Discard,
            KeyCode::Char('s') => Message::Submit,
            KeyCode::Char('w') => Message::SaveStill,
            KeyCode::Char(' ') | KeyCode::Char('p') if take_still => Message::TakeStill,
            _ => return None,
        };
        return Some(Input::Send(message));
    }

    let message = match code {
        KeyCode::Char('o') if view.has_control(Control::OpenCamera) => Message::OpenCamera,
        KeyCode::Char(' ') | KeyCode::Char('p') if take_still => Message::TakeStill,
        KeyCode::Char('f') if view.has_control(Control::EnterFullScreen) => {
            Message::EnterFullScreen
        }
        KeyCode::Char('f') if view.preview == Some(Presentation::FullScreen) => {
            Message::ExitFullScreen
        }
        KeyCode::Char('r') if view.has_control(Control::Review) => Message::Inspect(view.pending?),
        KeyCode::Esc | KeyCode::Char('c') if view.has_control(Control::Close) => Message::Close,
        KeyCode::Char('i') => match view.toast.and_then(|toast| toast.action) {
            Some(ToastAction::Inspect(id)) => Message::Inspect(id),
            None => return None,
        },
        KeyCode::Char('x') => Message::DismissToast(view.toast?.id),
        _ => return None,
    };
    Some(Input::Send(message))
}

fn control_key(control: Control) -> &'static str {
    match control {
        Control::OpenCamera => "o",
        Control::TakeStill => "space",
        Control::EnterFullScreen => "f",
        Control::Close => "esc",
        Control::Review => "r",
    }
}

fn draw(
    f: &mut Frame,
    view: &SessionView<'_>,
    preview: Option<&CameraFrame>,
    review: Option<&CameraFrame>,
) {
    let area = f.area();

    match view.preview {
        Some(Presentation::FullScreen) => {
            let [body, footer] =
                Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
            f.render_widget(FrameWidget { frame: preview }, body);
            f.render_widget(StatusBar::new(&controls_text(view)), footer);
        }
        _ => {
            let [header, body, footer] = Layout::vertical([
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(area);

            let mut header_text = view.title.clone();
            if let Some(status) = &view.status {
                header_text.push_str(" | ");
                header_text.push_str(&status.text());
            }
            f.render_widget(StatusBar::new(&header_text), header);

            if view.preview.is_some() {
                let inline = centered(body, 70, 80);
                let block = Block::default().borders(Borders::ALL);
                let inner = block.inner(inline);
                f.render_widget(block, inline);
                f.render_widget(FrameWidget { frame: preview }, inner);
            } else {
                let message = match &view.status {
                    Some(status) => status.text(),
                    None => fl!("camera-closed"),
                };
                f.render_widget(Paragraph::new(message).centered(), centered(body, 80, 10));
            }

            f.render_widget(StatusBar::new(&controls_text(view)), footer);
        }
    }

    if let Some(toast) = view.toast {
        let mut text = toast.message.text();
        if toast.action.is_some() {
            text.push_str(&format!("  [i] {}", fl!("inspect")));
        }
        text.push_str(&format!("  [x] {}", fl!("dismiss")));

        let width = (text.chars().count() as u16 + 4).min(area.width);
        let toast_area = Rect {
            x: area.x + area.width.saturating_sub(width),
            y: area.y + area.height.saturating_sub(4),
            width,
            height: 3.min(area.height),
        };
        f.render_widget(Clear, toast_area);
        f.render_widget(
            Paragraph::new(text).block(Block::default().borders(Borders::ALL)),
            toast_area,
        );
    }

    if view.review.is_some() {
        let popup = centered(area, 60, 70);
        let block = Block::default()
            .borders(Borders::ALL)
            .title(fl!("review-title"))
            .title_bottom(format!(
                " [d] {}  [s] {}  [w] {}  [q] {} ",
                fl!("discard"),
                fl!("submit"),
                fl!("save"),
                fl!("quit")
            ));
        let inner = block.inner(popup);
        f.render_widget(Clear, popup);
        f.render_widget(block, popup);
        f.render_widget(FrameWidget { frame: review }, inner);
    }
}

fn controls_text(view: &SessionView<'_>) -> String {
    let mut parts: Vec<String> = view
        .controls
        .iter()
        .map(|control| format!("[{}] {}", control_key(*control), control.label()))
        .collect();
    if view.preview == Some(Presentation::FullScreen) {
        parts.push(format!("[f] {}", fl!("exit-full-screen")));
    }
    parts.push(format!("[q] {}", fl!("quit")));
    parts.join(" | ")
}

fn centered(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let scale = |length: u16, percent: u16| {
        (u32::from(length) * u32::from(percent.min(100)) / 100) as u16
    };
    let width = scale(area.width, percent_x);
    let height = scale(area.height, percent_y).max(1).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Decoded copy of the still under review, refreshed when the still changes
#[derive(Default)]
struct ReviewImage {
    id: Option<Uuid>,
    frame: Option<CameraFrame>,
}

impl ReviewImage {
    fn sync(&mut self, still: Option<&CapturedFrame>) {
        let wanted = still.map(|still| still.id);
        if wanted == self.id {
            return;
        }
        self.id = wanted;
        self.frame = still.and_then(|still| match image::load_from_memory(&still.png) {
            Ok(image) => Some(CameraFrame::from_image(image.to_rgba8())),
            Err(e) => {
                warn!(error = %e, "Failed to decode still for review");
                None
            }
        });
    }
}

/// Widget that renders a camera frame using half-block characters
struct FrameWidget<'a> {
    frame: Option<&'a CameraFrame>,
}

impl Widget for FrameWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(frame) = self.frame.filter(|frame| frame.width > 0 && frame.height > 0) else {
            let msg = "Waiting for camera...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        // Each cell shows two vertical pixels
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            let w = term_height * frame_aspect;
            (w as u16, (term_height / 2.0) as u16)
        } else {
            let h = term_width / frame_aspect;
            (term_width as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;
        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let src_x = (tx as f64 * x_scale) as u32;
                let top = (ty as f64 * 2.0 * y_scale) as u32;
                let bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let Some(cell) = buf.cell_mut((x_offset + tx, y_offset + ty)) else {
                    continue;
                };
                let (r, g, b) = frame.rgb_at(src_x, top);
                let (br, bg, bb) = frame.rgb_at(src_x, bottom);
                cell.set_char('▀');
                cell.set_fg(Color::Rgb(r, g, b));
                cell.set_bg(Color::Rgb(br, bg, bb));
            }
        }
    }
}

/// One-line bar
struct StatusBar<'a> {
    message: &'a str,
}

impl<'a> StatusBar<'a> {
    fn new(message: &'a str) -> Self {
        Self { message }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(Color::White).bg(Color::DarkGray);
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }
        buf.set_stringn(area.x, area.y, self.message, area.width as usize, style);
    }
}
