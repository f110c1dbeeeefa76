use crate::app::{App, ControlFocus, View};
use crate::model::{self, LineEntry, Summary};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{BarChart, Block, Borders, Paragraph, Tabs, Wrap};

/// Draws the whole frame from scratch. Nothing is retained between frames;
/// every pane is a pure function of the current `App` state.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(1),
        Constraint::Length(3),
    ])
    .split(f.area());

    render_tab_bar(f, app, chunks[0]);
    match app.view {
        View::Status => render_status_view(f, app, chunks[1]),
        View::Production => render_production_view(f, app, chunks[1]),
        View::Control => render_control_view(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
}

fn render_tab_bar(f: &mut Frame, app: &App, area: Rect) {
    let titles = [View::Status, View::Production, View::Control].map(View::title);
    let selected = match app.view {
        View::Status => 0,
        View::Production => 1,
        View::Control => 2,
    };
    let tabs = Tabs::new(titles.to_vec())
        .select(selected)
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("linewatch")
                .title_style(Style::default().fg(Color::Blue).bold()),
        );
    f.render_widget(tabs, area);
}

fn render_status_view(f: &mut Frame, app: &App, area: Rect) {
    render_line_grid(f, app, area, "Line Status (r = refresh)");
}

fn render_production_view(f: &mut Frame, app: &App, area: Rect) {
    let columns =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);
    render_line_grid(f, app, columns[0], "Line Status");

    let right =
        Layout::vertical([Constraint::Length(6), Constraint::Min(1)]).split(columns[1]);
    render_summary_cards(f, app, right[0]);
    render_production_chart(f, app, right[1]);
}

fn render_control_view(f: &mut Frame, app: &App, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(6), Constraint::Min(1)]).split(area);
    render_summary_cards(f, app, rows[0]);

    let panes = Layout::horizontal([
        Constraint::Percentage(40),
        Constraint::Percentage(30),
        Constraint::Percentage(30),
    ])
    .split(rows[1]);
    render_line_toggles(f, app, panes[0]);
    render_target_editor(f, app, panes[1]);
    render_calculator(f, app, panes[2]);
}

/// Status entries two per row, sorted by coordinate; an odd count leaves
/// the last cell blank.
fn render_line_grid(f: &mut Frame, app: &App, area: Rect, title: &str) {
    let entries = app.line_entries();
    let mut lines = Vec::<Line>::new();

    if entries.is_empty() {
        lines.push(Line::from(Span::styled(
            "No line data yet.",
            Style::default().fg(Color::Gray).italic(),
        )));
    }

    for (left, right) in model::group_rows(&entries) {
        let mut spans = vec![line_cell(left)];
        if let Some(right) = right {
            spans.push(Span::raw("   "));
            spans.push(line_cell(right));
        }
        lines.push(Line::from(spans));
    }

    let para = Paragraph::new(Text::from(lines)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(Style::default().fg(Color::Blue)),
    );
    f.render_widget(para, area);
}

fn line_cell(entry: &LineEntry) -> Span<'static> {
    let (word, color) = if entry.running {
        ("RUN ", Color::Green)
    } else {
        ("STOP", Color::Red)
    };
    Span::styled(
        format!("{:<8} {:>5}  {}", entry.material, entry.coord, word),
        Style::default().fg(color),
    )
}

fn render_summary_cards(f: &mut Frame, app: &App, area: Rect) {
    let Some(summary) = app.status.as_ref().map(|s| &s.summary) else {
        let para = Paragraph::new("No summary yet.")
            .block(Block::default().borders(Borders::ALL).title("Summary"));
        f.render_widget(para, area);
        return;
    };

    let cards = summary_cards(summary);
    let cells = Layout::horizontal([Constraint::Percentage(25); 4]).split(area);
    for ((title, value, color), cell) in cards.into_iter().zip(cells.iter()) {
        let para = Paragraph::new(Text::from(vec![
            Line::from(""),
            Line::from(Span::styled(value, Style::default().fg(color).bold())),
        ]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(para, *cell);
    }
}

/// Card titles, formatted values and threshold colors: efficiency under 80%
/// and any unresolved error show red.
fn summary_cards(summary: &Summary) -> [(&'static str, String, Color); 4] {
    [
        (
            "Produced Today",
            format!("{} pcs", summary.total_produced_today),
            Color::Green,
        ),
        (
            "Daily Target",
            format!("{} pcs", summary.daily_target),
            Color::White,
        ),
        (
            "Efficiency",
            format!("{:.1} %", summary.current_efficiency),
            if summary.efficiency_low() {
                Color::Red
            } else {
                Color::Green
            },
        ),
        (
            "Unresolved Errors",
            format!("{}", summary.unresolved_errors),
            if summary.unresolved_errors > 0 {
                Color::Red
            } else {
                Color::Green
            },
        ),
    ]
}

fn render_production_chart(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Today's Target Progress")
        .border_style(Style::default().fg(Color::Blue));

    let Some(summary) = app.status.as_ref().map(|s| &s.summary) else {
        f.render_widget(Paragraph::new("No data yet.").block(block), area);
        return;
    };

    let data = [
        ("Produced", summary.total_produced_today),
        ("Target", summary.daily_target),
    ];
    let chart = BarChart::default()
        .block(block)
        .bar_width(10)
        .bar_gap(4)
        .bar_style(Style::default().fg(Color::Green))
        .value_style(Style::default().fg(Color::Black).bg(Color::Green))
        .data(&data);
    f.render_widget(chart, area);
}

fn render_line_toggles(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == ControlFocus::Lines;
    let entries = app.line_entries();
    let mut lines = Vec::<Line>::new();

    for (i, entry) in entries.iter().enumerate() {
        let marker = if entry.running { "[on] " } else { "[off]" };
        let style = if focused && i == app.selected_line {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else if entry.running {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker} {:<8} {}", entry.material, entry.coord),
            style,
        )));
    }

    let para = Paragraph::new(Text::from(lines)).block(pane_block("Line Toggles (Space)", focused));
    f.render_widget(para, area);
}

fn render_target_editor(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == ControlFocus::Targets;
    let materials = app.target_materials();
    let mut lines = Vec::<Line>::new();

    for (i, material) in materials.iter().enumerate() {
        let selected = i == app.selected_target;
        let style = if focused && selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::White)
        };
        let text = match (&app.target_input, selected) {
            (Some(input), true) => format!("{material}: {input}_"),
            _ => {
                let target = app
                    .status
                    .as_ref()
                    .and_then(|s| s.material_targets.get(material))
                    .copied()
                    .unwrap_or(0);
                format!("{material}: {target}")
            }
        };
        lines.push(Line::from(Span::styled(text, style)));
    }

    let para =
        Paragraph::new(Text::from(lines)).block(pane_block("Targets (Enter = edit)", focused));
    f.render_widget(para, area);
}

fn render_calculator(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focus == ControlFocus::Calculator;
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            app.calculator.display().to_string(),
            Style::default().fg(Color::Yellow).bold(),
        ))
        .alignment(Alignment::Right),
        Line::from(""),
        Line::from(Span::styled(
            "digits + - * /  Enter = evaluate  Backspace = clear",
            Style::default().fg(Color::Gray),
        )),
    ];
    let para = Paragraph::new(Text::from(lines))
        .wrap(Wrap { trim: false })
        .block(pane_block("Calculator", focused));
    f.render_widget(para, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = Vec::new();
    if let Some(notice) = app.last_notice() {
        let style = match notice.kind {
            "error" => Style::default().fg(Color::Red).bold(),
            "info" => Style::default().fg(Color::Green),
            _ => Style::default().fg(Color::Gray).italic(),
        };
        spans.push(Span::styled(notice.text.clone(), style));
    }
    if let Some(at) = app.fetched_at {
        spans.push(Span::styled(
            format!("   updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::Gray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Tab = view, arrows = focus, q = quit"),
    );
    f.render_widget(para, area);
}

fn pane_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Blue)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title.to_string())
        .border_style(border)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poller::AppEvent;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tokio::sync::mpsc;

    fn app_with_status() -> App {
        let (tx_cmd, _rx_cmd) = mpsc::unbounded_channel();
        let (tx_evt, rx_evt) = mpsc::unbounded_channel();
        let mut app = App::new(tx_cmd, rx_evt);
        let status = serde_json::from_value(serde_json::json!({
            "manufact_lines": {
                "paper": {"1-1": true, "3-1": true, "4-2": false},
            },
            "summary": {
                "total_produced_today": 1250,
                "daily_target": 1700,
                "current_efficiency": 83.3,
                "unresolved_errors": 2
            },
            "material_targets": {"paper": 1000}
        }))
        .unwrap();
        tx_evt.send(AppEvent::Status(status)).unwrap();
        // Drain synchronously; try_recv needs no runtime.
        futures_drain(&mut app);
        app
    }

    fn futures_drain(app: &mut App) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(app.poll_async());
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_status_view_shows_sorted_grid() {
        let app = app_with_status();
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("1-1"));
        assert!(text.contains("RUN"));
        assert!(text.contains("STOP"));
    }

    #[test]
    fn test_control_view_shows_all_panes() {
        let mut app = app_with_status();
        app.view = View::Control;
        let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Line Toggles"));
        assert!(text.contains("Targets"));
        assert!(text.contains("Calculator"));
        assert!(text.contains("paper: 1000"));
    }

    #[test]
    fn test_render_before_first_poll_does_not_panic() {
        let (tx_cmd, _rx_cmd) = mpsc::unbounded_channel();
        let (_tx_evt, rx_evt) = mpsc::unbounded_channel();
        let mut app = App::new(tx_cmd, rx_evt);
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();

        for view in [View::Status, View::Production, View::Control] {
            app.view = view;
            terminal.draw(|f| render(f, &app)).unwrap();
        }
    }
}
