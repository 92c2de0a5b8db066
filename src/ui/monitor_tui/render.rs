use ratatui::{
    prelude::*,
    symbols,
    widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table},
};

use super::app::MonitorApp;
use super::event_handler::InputMode;
use super::widgets::{colored_gauge, Theme};
use crate::core::process_monitor::{ControlBackend, ProcSource, QueryField, SortMode};
use crate::ui::formatters::{format_cpu_time, format_memory_mb, format_percent};

/// Main render function
pub fn render_ui<S: ProcSource, B: ControlBackend>(frame: &mut Frame, app: &MonitorApp<S, B>) {
    let area = frame.area();
    let theme = Theme::for_mode(app.theme);

    frame.render_widget(Block::default().style(theme.base()), area);

    let constraints = if app.show_chart {
        vec![
            Constraint::Length(3),      // Totals
            Constraint::Percentage(35), // History chart
            Constraint::Min(5),         // Processes
            Constraint::Length(2),      // Footer
        ]
    } else {
        vec![
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_header(frame, chunks[0], app, &theme);
    if app.show_chart {
        render_history_chart(frame, chunks[1], app, &theme);
        render_processes_section(frame, chunks[2], app, &theme);
        render_footer(frame, chunks[3], app, &theme);
    } else {
        render_processes_section(frame, chunks[1], app, &theme);
        render_footer(frame, chunks[2], app, &theme);
    }

    if app.show_help {
        render_help_overlay(frame, area, &theme);
    }
}

/// System-wide utilization gauges and the per-process sums
fn render_header<S: ProcSource, B: ControlBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &MonitorApp<S, B>,
    theme: &Theme,
) {
    let totals = app
        .monitor
        .latest()
        .map(|sample| sample.totals.clone())
        .unwrap_or_default();

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .split(area);

    let cpu_label = format!("CPU {}", format_percent(totals.cpu_utilization_percent));
    let cpu_gauge = colored_gauge(totals.cpu_utilization_percent, &cpu_label, theme)
        .block(Block::default().borders(Borders::ALL).title(" CPU "));
    frame.render_widget(cpu_gauge, columns[0]);

    let mem_label = format!("MEM {}", format_percent(totals.memory_utilization_percent));
    let mem_gauge = colored_gauge(totals.memory_utilization_percent, &mem_label, theme)
        .block(Block::default().borders(Borders::ALL).title(" Memory "));
    frame.render_widget(mem_gauge, columns[1]);

    let summary = format!(
        "{} procs │ Σcpu {} │ Σrss {}",
        totals.process_count,
        format_cpu_time(totals.sum_process_cpu_seconds),
        format_memory_mb(totals.sum_process_memory_mb),
    );
    let para = Paragraph::new(summary)
        .style(theme.base())
        .block(Block::default().borders(Borders::ALL).title(" Totals "));
    frame.render_widget(para, columns[2]);
}

fn render_history_chart<S: ProcSource, B: ControlBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &MonitorApp<S, B>,
    theme: &Theme,
) {
    let recorder = app.monitor.recorder();
    let cpu_points = recorder.cpu_points();
    let mem_points = recorder.memory_points();

    let x_start = cpu_points.first().map(|p| p.0).unwrap_or(0.0);
    let x_end = cpu_points
        .last()
        .map(|p| p.0)
        .unwrap_or(0.0)
        .max(x_start + recorder.interval_secs() as f64);

    let datasets = vec![
        Dataset::default()
            .name("CPU %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.cpu_line))
            .data(&cpu_points),
        Dataset::default()
            .name("Memory %")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(theme.memory_line))
            .data(&mem_points),
    ];

    let chart = Chart::new(datasets)
        .style(theme.base())
        .block(
            Block::default()
                .title(" History [g:hide] ")
                .borders(Borders::ALL),
        )
        .x_axis(
            Axis::default()
                .title("seconds")
                .style(Style::default().fg(theme.muted))
                .bounds([x_start, x_end])
                .labels(vec![format!("{:.0}", x_start), format!("{:.0}", x_end)]),
        )
        .y_axis(
            Axis::default()
                .title("%")
                .style(Style::default().fg(theme.muted))
                .bounds([0.0, 100.0])
                .labels(vec!["0", "50", "100"]),
        );

    frame.render_widget(chart, area);
}

fn render_processes_section<S: ProcSource, B: ControlBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &MonitorApp<S, B>,
    theme: &Theme,
) {
    let sort_str = match app.sort_mode {
        SortMode::ByCpu => "CPU",
        SortMode::ByMemory => "Memory",
    };

    let mut title = format!(" Processes ({}) sorted by {} ", app.rows.len(), sort_str);
    if !app.criteria.query.is_empty() || app.input_mode == InputMode::Query {
        title.push_str(&format!("│ {}: {} ", app.criteria.field, app.criteria.query));
    }
    if app.criteria.min_cpu_seconds > 0.0 || app.criteria.min_memory_mb > 0.0 {
        title.push_str(&format!(
            "│ ≥{:.0}s ≥{:.0}MB ",
            app.criteria.min_cpu_seconds, app.criteria.min_memory_mb
        ));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let header = Row::new(vec![
        Cell::from("PID").style(bold),
        Cell::from("Name").style(bold),
        Cell::from("CPU time").style(bold),
        Cell::from("Memory").style(bold),
    ])
    .height(1);

    // Keep the selected row on screen
    let visible = inner.height.saturating_sub(1) as usize;
    let offset = (app.selected_process_index + 1).saturating_sub(visible);

    let rows: Vec<Row> = app
        .rows
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(i, proc)| {
            let style = if i == app.selected_process_index {
                theme.selected()
            } else {
                theme.base()
            };

            Row::new(vec![
                Cell::from(proc.pid.to_string()),
                Cell::from(proc.name.clone()),
                Cell::from(format_cpu_time(proc.cpu_seconds)),
                Cell::from(format_memory_mb(proc.memory_mb)),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(45),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(header);

    frame.render_widget(table, inner);
}

fn render_footer<S: ProcSource, B: ControlBackend>(
    frame: &mut Frame,
    area: Rect,
    app: &MonitorApp<S, B>,
    theme: &Theme,
) {
    let keys = match app.input_mode {
        InputMode::Query => {
            let field = match app.criteria.field {
                QueryField::Name => "name",
                QueryField::Pid => "PID",
            };
            format!(" Filter by {}: {}_  (Enter: keep │ Esc: clear)", field, app.criteria.query)
        }
        InputMode::ConfirmKill(pid) => format!(" Kill PID {}? y: confirm │ any key: cancel", pid),
        InputMode::Normal => format!(
            " q: Quit │ ?: Help │ /: Filter │ s: Sort │ x: Kill │ [ ]: Nice {} │ p: Apply │ g: Chart",
            app.pending_nice
        ),
    };

    let status = app
        .notification
        .clone()
        .or_else(|| app.monitor.last_error().map(|e| format!("Sampling failed: {}", e)))
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(keys, Style::default().fg(theme.muted))),
        Line::from(Span::styled(status, Style::default().fg(theme.accent))),
    ];
    frame.render_widget(Paragraph::new(lines).style(theme.base()), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let help_text = r#"
    LPM Process Monitor - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    q / Esc     Quit the application
    ?           Toggle this help screen
    s           Toggle sort (CPU time / Memory)
    d           Toggle light / dark theme
    g           Toggle history chart
    /           Edit filter text
    f           Filter by name / PID
    c / C       Raise / lower CPU time threshold
    m / M       Raise / lower memory threshold
    ↑ / ↓       Select process
    x           Kill selected process (confirm with y)
    [ / ]       Lower / raise pending nice value
    p           Apply nice value to selected process
    z / r       Suspend / resume selected process
    "#;

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.accent))
        .style(theme.base());

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    let popup_area = centered_rect(60, 70, area);
    frame.render_widget(ratatui::widgets::Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
