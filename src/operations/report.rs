use crate::db::store::SpendStore;
use crate::error::ReportError;
use crate::models::report::ReportViews;
use crate::operations::aggregate::{aggregate, current_month_window};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::{Alignment, Color, Constraint, Direction, Layout, Modifier, Rect, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, Paragraph},
};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::io;
use tracing::info;

const MAX_BAR_VALUE: u64 = u32::MAX as u64;

/// Loads every record, aggregates it relative to `now` and draws the report
/// until the user presses `q` or `Esc`.
pub fn run_report(store: &SpendStore, now: NaiveDateTime) -> Result<ReportViews, ReportError> {
    let records = store.read_all()?;
    let views = aggregate(&records, now);
    if views.is_empty() {
        info!("No spending records stored yet");
    }
    info!(records = records.len(), "Rendering analysis report");

    let title = format!("Spending analysis, {}", now.format("%B %Y"));
    render_report(&title, &views, now.date())?;
    Ok(views)
}

fn render_report(title: &str, views: &ReportViews, today: NaiveDate) -> io::Result<()> {
    let mut stdout = io::stdout();
    enter_report_screen(&mut stdout)?;

    let (month_start, next_month_start) = current_month_window(today);
    let days_in_month = (next_month_start - month_start).num_days().max(1) as u32;

    let result = (|| -> io::Result<()> {
        let backend = ratatui::backend::CrosstermBackend::new(stdout);
        let mut terminal = ratatui::Terminal::new(backend)?;

        loop {
            terminal.draw(|frame| {
                let rows = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Ratio(1, 3),
                        Constraint::Ratio(1, 3),
                        Constraint::Ratio(1, 3),
                    ])
                    .split(frame.area());

                let header = Paragraph::new(Line::from(vec![Span::styled(
                    format!("{}  (press q to exit)", title),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                )]))
                .alignment(Alignment::Center);
                frame.render_widget(header, rows[0]);

                let panels: Vec<Rect> = rows[1..]
                    .iter()
                    .flat_map(|row| {
                        Layout::default()
                            .direction(Direction::Horizontal)
                            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                            .split(*row)
                            .to_vec()
                    })
                    .collect();

                render_cost_bars(
                    frame,
                    panels[0],
                    "This Month's Spend by Business",
                    &views.current_month_business_totals,
                    Color::Blue,
                );
                render_cost_bars(
                    frame,
                    panels[1],
                    "Spend by Industry",
                    &views.current_month_industry_totals,
                    Color::Yellow,
                );
                render_cost_bars(
                    frame,
                    panels[2],
                    "Spend by Item",
                    &views.current_month_item_totals,
                    Color::Magenta,
                );
                render_daily_scatter(frame, panels[3], views, days_in_month);
                render_monthly_line(frame, panels[4], views);
                render_transaction_counts(frame, panels[5], views);
            })?;

            if event::poll(std::time::Duration::from_millis(250))? {
                match event::read()? {
                    Event::Key(key) if key.code == KeyCode::Char('q') => break,
                    Event::Key(key) if key.code == KeyCode::Esc => break,
                    Event::Resize(_, _) => continue,
                    _ => {}
                }
            }
        }

        Ok(())
    })();

    disable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, LeaveAlternateScreen)?;

    result
}

/// Switches to raw mode and the alternate screen. Raw mode is switched back
/// off if the screen cannot be entered.
fn enter_report_screen<W: io::Write>(out: &mut W) -> io::Result<()> {
    enable_raw_mode()?;
    if let Err(err) = execute!(out, EnterAlternateScreen) {
        disable_raw_mode()?;
        return Err(err);
    }
    Ok(())
}

fn render_cost_bars(
    frame: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    totals: &[(String, Decimal)],
    color: Color,
) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    if totals.is_empty() {
        render_empty(frame, area, block);
        return;
    }

    let bars: Vec<Bar> = totals
        .iter()
        .map(|(label, cost)| {
            Bar::default()
                .value(to_pence(*cost))
                .text_value(format!("{:.2}", cost))
                .label(Line::from(label.clone()))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_width(area.width, bars.len()))
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(Color::Black).bg(color))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_transaction_counts(frame: &mut ratatui::Frame, area: Rect, views: &ReportViews) {
    let block = Block::default()
        .title("Transactions by Business")
        .borders(Borders::ALL);
    if views.business_frequency.is_empty() {
        render_empty(frame, area, block);
        return;
    }

    let bars: Vec<Bar> = views
        .business_frequency
        .iter()
        .map(|(business, count)| {
            Bar::default()
                .value(*count as u64)
                .label(Line::from(business.clone()))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .bar_width(bar_width(area.width, bars.len()))
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::LightMagenta))
        .data(BarGroup::default().bars(&bars));
    frame.render_widget(chart, area);
}

fn render_daily_scatter(
    frame: &mut ratatui::Frame,
    area: Rect,
    views: &ReportViews,
    days_in_month: u32,
) {
    let block = Block::default().title("Spend by Day").borders(Borders::ALL);
    if views.current_month_daily_totals.is_empty() {
        render_empty(frame, area, block);
        return;
    }

    let points = daily_points(&views.current_month_daily_totals);
    let y_max = y_upper_bound(&points);
    let mid = days_in_month.div_ceil(2);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Dot)
        .graph_type(GraphType::Scatter)
        .style(Style::default().fg(Color::LightBlue))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .title("day")
                .bounds([1.0, f64::from(days_in_month)])
                .labels(vec!["1".to_string(), mid.to_string(), days_in_month.to_string()]),
        )
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec!["0".to_string(), format!("{:.2}", y_max)]),
        );
    frame.render_widget(chart, area);
}

fn render_monthly_line(frame: &mut ratatui::Frame, area: Rect, views: &ReportViews) {
    let block = Block::default().title("Spend by Month").borders(Borders::ALL);
    if views.monthly_totals.is_empty() {
        render_empty(frame, area, block);
        return;
    }

    let points = monthly_points(&views.monthly_totals);
    let y_max = y_upper_bound(&points);
    let x_max = (points.len().saturating_sub(1)).max(1) as f64;

    // No dashed lines in a terminal; a dimmed braille line stands in for one.
    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::DIM))
        .data(&points);

    let month_labels: Vec<String> = views
        .monthly_totals
        .iter()
        .map(|(month, _)| month.chars().take(3).collect())
        .collect();

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(Axis::default().bounds([0.0, x_max]).labels(month_labels))
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec!["0".to_string(), format!("{:.2}", y_max)]),
        );
    frame.render_widget(chart, area);
}

fn render_empty(frame: &mut ratatui::Frame, area: Rect, block: Block) {
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let empty = Paragraph::new("No data").alignment(Alignment::Center);
    frame.render_widget(empty, inner);
}

/// Bar value in pence. Capped at `MAX_BAR_VALUE` because ratatui scales bar
/// heights with plain `u64` multiplication.
fn to_pence(cost: Decimal) -> u64 {
    if cost <= Decimal::ZERO {
        return 0;
    }
    cost.checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|pence| pence.round().to_u64())
        .unwrap_or(MAX_BAR_VALUE)
        .min(MAX_BAR_VALUE)
}

fn bar_width(area_width: u16, bar_count: usize) -> u16 {
    if bar_count == 0 {
        return 1;
    }
    let usable = area_width.saturating_sub(2) as usize;
    let per_bar = usable / bar_count;
    per_bar.saturating_sub(1).clamp(1, 12) as u16
}

fn daily_points(totals: &[(NaiveDate, Decimal)]) -> Vec<(f64, f64)> {
    totals
        .iter()
        .map(|(date, cost)| (f64::from(date.day()), cost.to_f64().unwrap_or(0.0)))
        .collect()
}

fn monthly_points(totals: &[(String, Decimal)]) -> Vec<(f64, f64)> {
    totals
        .iter()
        .enumerate()
        .map(|(idx, (_, cost))| (idx as f64, cost.to_f64().unwrap_or(0.0)))
        .collect()
}

/// Top of the y axis, leaving a little headroom above the largest value.
fn y_upper_bound(points: &[(f64, f64)]) -> f64 {
    let max = points.iter().map(|(_, y)| *y).fold(0.0_f64, f64::max);
    if max <= 0.0 { 1.0 } else { max * 1.1 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_to_pence() {
        assert_eq!(to_pence(Decimal::from_str("3.70").unwrap()), 370);
        assert_eq!(to_pence(Decimal::ZERO), 0);
        assert_eq!(to_pence(Decimal::from_str("-2.00").unwrap()), 0);
    }

    #[test]
    fn test_to_pence_caps_huge_costs() {
        assert_eq!(to_pence(Decimal::MAX), MAX_BAR_VALUE);
        assert_eq!(to_pence(Decimal::from_str("50000000.00").unwrap()), MAX_BAR_VALUE);
        assert_eq!(to_pence(Decimal::from_str("42949672.95").unwrap()), MAX_BAR_VALUE);
        assert_eq!(to_pence(Decimal::from_str("1000000.00").unwrap()), 100_000_000);
    }

    struct ClosedTerminal;

    impl io::Write for ClosedTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"))
        }
    }

    #[test]
    fn test_failed_screen_switch_leaves_raw_mode_off() {
        let result = enter_report_screen(&mut ClosedTerminal);

        assert!(result.is_err());
        assert!(!crossterm::terminal::is_raw_mode_enabled().unwrap_or(false));
    }

    #[test]
    fn test_bar_width_shrinks_with_more_bars() {
        assert_eq!(bar_width(42, 2), 12);
        assert_eq!(bar_width(42, 10), 3);
        assert_eq!(bar_width(10, 50), 1);
        assert_eq!(bar_width(42, 0), 1);
    }

    #[test]
    fn test_daily_points_use_day_of_month() {
        let totals = vec![
            (NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(), Decimal::new(250, 2)),
            (NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(), Decimal::new(125, 2)),
        ];
        assert_eq!(daily_points(&totals), vec![(1.0, 2.5), (15.0, 1.25)]);
    }

    #[test]
    fn test_monthly_points_follow_view_order() {
        let totals = vec![
            ("April".to_string(), Decimal::new(300, 2)),
            ("March".to_string(), Decimal::new(375, 2)),
        ];
        assert_eq!(monthly_points(&totals), vec![(0.0, 3.0), (1.0, 3.75)]);
    }

    #[test]
    fn test_y_upper_bound() {
        assert_eq!(y_upper_bound(&[]), 1.0);
        assert_eq!(y_upper_bound(&[(0.0, 0.0)]), 1.0);
        assert!((y_upper_bound(&[(0.0, 10.0), (1.0, 5.0)]) - 11.0).abs() < 1e-9);
    }
}
