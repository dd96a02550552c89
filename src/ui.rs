pub mod notification;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use notification::Notification;
use typemaster::{
    clock::Clock,
    report::{EndReason, Report},
    scoring::{AccuracyBand, CharClass},
    session::Phase,
    timer::Ticker,
    TextSource,
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const LOW_TIME_SECS: u32 = 10;

impl<C: Clock, T: Ticker> Widget for &App<C, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // header
                Constraint::Length(1), // padding
                Constraint::Length(1), // live stats
                Constraint::Length(1), // progress
                Constraint::Length(1), // padding
                Constraint::Min(1),    // reference text
                Constraint::Length(1), // legend
            ])
            .split(area);

        render_header(self, chunks[0], buf);
        render_stats(self, chunks[2], buf);
        render_progress(self, chunks[3], buf);
        render_prompt(self, chunks[5], buf);
        render_legend(self, chunks[6], buf);

        if let Some(report) = self.dashboard.report.as_ref() {
            if self.session.phase() == Phase::Ended {
                render_results(report, chunks[5], buf);
            }
        }

        if let Some(notification) = self.dashboard.notification.as_ref() {
            render_notification(notification, area, buf);
        }
    }
}

fn render_header<C: Clock, T: Ticker>(app: &App<C, T>, area: Rect, buf: &mut Buffer) {
    let source = match &app.session.config().source {
        TextSource::Custom(_) => "custom text".to_string(),
        TextSource::Corpus => format!("difficulty: {}", app.session.difficulty()),
    };

    Paragraph::new(Line::from(vec![
        Span::styled("typemaster", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(source, Style::default().fg(Color::Cyan)),
    ]))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_stats<C: Clock, T: Ticker>(app: &App<C, T>, area: Rect, buf: &mut Buffer) {
    let snapshot = app.snapshot();
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let label = Style::default().add_modifier(Modifier::DIM);

    let time_style = if app.session.is_active() && snapshot.time_remaining <= LOW_TIME_SECS {
        bold.fg(Color::Red)
    } else {
        bold
    };

    let accuracy_style = if snapshot.score.total == 0 {
        bold
    } else {
        match AccuracyBand::of(snapshot.metrics.accuracy) {
            AccuracyBand::Good => bold.fg(Color::Green),
            AccuracyBand::Fair => bold.fg(Color::Yellow),
            AccuracyBand::Poor => bold.fg(Color::Red),
        }
    };

    Paragraph::new(Line::from(vec![
        Span::styled("time ", label),
        Span::styled(snapshot.time_remaining.to_string(), time_style),
        Span::styled("   wpm ", label),
        Span::styled(snapshot.metrics.wpm.to_string(), bold),
        Span::styled("   cpm ", label),
        Span::styled(snapshot.metrics.cpm.to_string(), bold),
        Span::styled("   acc ", label),
        Span::styled(format!("{}%", snapshot.metrics.accuracy), accuracy_style),
    ]))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_progress<C: Clock, T: Ticker>(app: &App<C, T>, area: Rect, buf: &mut Buffer) {
    let progress = app.snapshot().progress_percent.clamp(0.0, 100.0);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Magenta))
        .ratio(progress / 100.0)
        .label(format!("{progress:.0}%"))
        .render(area, buf);
}

fn render_prompt<C: Clock, T: Ticker>(app: &App<C, T>, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let green_bold_style = bold_style.fg(Color::Green);
    let red_bold_style = bold_style.fg(Color::Red);
    let dim_bold_style = bold_style.add_modifier(Modifier::DIM);
    let cursor_style = bold_style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);

    let spans = app
        .session
        .highlights()
        .into_iter()
        .map(|(c, class)| match class {
            CharClass::Correct => Span::styled(c.to_string(), green_bold_style),
            CharClass::Incorrect => Span::styled(
                match c {
                    ' ' => "·".to_owned(),
                    c => c.to_string(),
                },
                red_bold_style,
            ),
            CharClass::Cursor if app.session.phase() != Phase::Ended => {
                Span::styled(c.to_string(), cursor_style)
            }
            CharClass::Cursor | CharClass::Untyped => Span::styled(c.to_string(), dim_bold_style),
        })
        .collect::<Vec<Span>>();

    // a prompt that fits on one line is centered, longer ones read better left aligned
    let fits_one_line = app.session.reference().width() <= area.width as usize;

    Paragraph::new(Line::from(spans))
        .alignment(if fits_one_line {
            Alignment::Center
        } else {
            Alignment::Left
        })
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_legend<C: Clock, T: Ticker>(app: &App<C, T>, area: Rect, buf: &mut Buffer) {
    let legend = match app.session.phase() {
        Phase::Idle => "type or (enter) to start / (tab) difficulty / (esc) new text / (ctrl+c) quit",
        Phase::Active => "(esc) reset / (ctrl+c) quit",
        Phase::Ended => "(r)etry / (tab) difficulty / (q)uit",
    };

    Paragraph::new(Span::styled(
        legend,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(area, buf);
}

fn render_results(report: &Report, area: Rect, buf: &mut Buffer) {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let title = match report.reason {
        EndReason::Completed => "Test completed",
        EndReason::TimeUp => "Time's up!",
    };

    let lines = vec![
        Line::from(Span::styled(title, bold.fg(Color::Cyan))),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} wpm   {} cpm   {}% acc   {} errors",
                report.wpm(),
                report.cpm(),
                report.accuracy(),
                report.errors()
            ),
            bold,
        )),
        Line::from(format!("{:.1}s", report.elapsed.as_secs_f64())),
    ];

    let panel = centered_rect(area, 52, lines.len() as u16 + 2);
    Clear.render(panel, buf);
    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" results "))
        .alignment(Alignment::Center)
        .render(panel, buf);
}

fn render_notification(notification: &Notification, area: Rect, buf: &mut Buffer) {
    let width = (notification.message.width() as u16 + 4).min(area.width);
    let height = 3.min(area.height);
    let rect = Rect::new(area.x + area.width - width, area.y, width, height);

    Clear.render(rect, buf);
    Paragraph::new(notification.message.as_str())
        .style(
            Style::default()
                .fg(notification.kind.color())
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .render(rect, buf);
}

/// A `width` x `height` rect centered in `area`, shrunk to fit
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
