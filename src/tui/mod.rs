//! Ratatui-based terminal UI.
//!
//! Four pages mirror the original dashboard: Overview (metric tiles + latest
//! table), Trends (historical chart), Forecasts (trend line + 2025-2027
//! points), and Projection (account ownership against the 60% national
//! target).
//!
//! The dataset is loaded once at startup and held immutably; every key press
//! triggers a full recompute of the visible page from that table. A failed
//! forecast renders as an advisory inside the page body and never exits the
//! UI.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Terminal,
};

use crate::app::pipeline::{self, IndicatorView};
use crate::data::store::Dataset;
use crate::domain::{Indicator, QueryConfig, NATIONAL_TARGET_PCT, TARGET_YEARS};
use crate::error::AppError;

mod plotters_chart;

use plotters_chart::TrendChart;

/// Start the TUI.
pub fn run(config: QueryConfig) -> Result<(), AppError> {
    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| AppError::new(4, format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config)?;
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, AppError> {
        enable_raw_mode().map_err(|e| AppError::new(4, format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(AppError::new(4, format!("Failed to enter alternate screen: {e}")));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Overview,
    Trends,
    Forecasts,
    Projection,
}

impl Page {
    const ALL: [Page; 4] = [Page::Overview, Page::Trends, Page::Forecasts, Page::Projection];

    fn title(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Trends => "Trends",
            Page::Forecasts => "Forecasts",
            Page::Projection => "Projection",
        }
    }

    fn index(self) -> usize {
        Page::ALL.iter().position(|&p| p == self).unwrap_or(0)
    }

    fn next(self) -> Page {
        Page::ALL[(self.index() + 1) % Page::ALL.len()]
    }

    fn prev(self) -> Page {
        Page::ALL[(self.index() + Page::ALL.len() - 1) % Page::ALL.len()]
    }
}

struct App {
    data_path: PathBuf,
    /// Loaded once; immutable for the rest of the process.
    dataset: Dataset,
    page: Page,
    indicator_idx: usize,
    status: String,
}

impl App {
    fn new(config: QueryConfig) -> Result<Self, AppError> {
        let dataset = Dataset::load(&config)?;
        let stats = dataset.stats();
        let status = format!(
            "Loaded {} observations ({} rows dropped) from '{}'.",
            stats.n_observations,
            stats.rows_dropped,
            config.data_path.display(),
        );
        Ok(Self {
            data_path: config.data_path,
            dataset,
            page: Page::Overview,
            indicator_idx: 0,
            status,
        })
    }

    fn indicator(&self) -> Indicator {
        Indicator::ALL[self.indicator_idx]
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), AppError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| AppError::new(4, format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| AppError::new(4, format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read().map_err(|e| AppError::new(4, format!("Event read error: {e}")))? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Tab => self.page = self.page.next(),
            KeyCode::BackTab => self.page = self.page.prev(),
            KeyCode::Char('1') => self.page = Page::Overview,
            KeyCode::Char('2') => self.page = Page::Trends,
            KeyCode::Char('3') => self.page = Page::Forecasts,
            KeyCode::Char('4') => self.page = Page::Projection,
            KeyCode::Right => {
                self.indicator_idx = (self.indicator_idx + 1) % Indicator::ALL.len();
                self.status = format!("indicator: {}", self.indicator().label());
            }
            KeyCode::Left => {
                self.indicator_idx =
                    (self.indicator_idx + Indicator::ALL.len() - 1) % Indicator::ALL.len();
                self.status = format!("indicator: {}", self.indicator().label());
            }
            KeyCode::Char('d') => self.download_series(),
            _ => {}
        }
        false
    }

    /// Re-export the current indicator's filtered series next to the cwd,
    /// the TUI counterpart of the dashboard's download button.
    ///
    /// Export failures become status text: one interaction's failure must not
    /// take down the session or touch the loaded table.
    fn download_series(&mut self) {
        let indicator = self.indicator();
        let series = self.dataset.series(indicator);
        let path = PathBuf::from(format!("{}_trend.csv", indicator.code()));

        match crate::io::export::write_series_csv(&path, &series) {
            Ok(()) => {
                self.status = format!("Exported series to '{}'.", path.display());
            }
            Err(err) => {
                self.status = format!("Export failed: {err}");
            }
        }
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_tabs(frame, chunks[1]);
        self.draw_body(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let stats = self.dataset.stats();
        let years = match stats.year_range {
            Some((lo, hi)) => format!("{lo}-{hi}"),
            None => "-".to_string(),
        };

        let line = Line::from(vec![
            Span::styled("fid", Style::default().fg(Color::Cyan)),
            Span::raw(" — financial-inclusion trends"),
            Span::styled(
                format!(
                    "  |  {} obs | years {} | {}",
                    stats.n_observations,
                    years,
                    self.data_path.display(),
                ),
                Style::default().fg(Color::Gray),
            ),
        ]);

        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_tabs(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let titles: Vec<Line> = Page::ALL
            .iter()
            .enumerate()
            .map(|(i, p)| Line::from(format!("{} {}", i + 1, p.title())))
            .collect();

        let tabs = Tabs::new(titles)
            .select(self.page.index())
            .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
        frame.render_widget(tabs, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        // Recomputed on every draw: only the table itself is cached.
        match self.page {
            Page::Overview => self.draw_overview(frame, area),
            Page::Trends => {
                let view = pipeline::view(&self.dataset, self.indicator());
                self.draw_trend_page(frame, area, &view, false, None);
            }
            Page::Forecasts => {
                let view = pipeline::view(&self.dataset, self.indicator());
                self.draw_trend_page(frame, area, &view, true, None);
            }
            Page::Projection => {
                let view = pipeline::view(&self.dataset, Indicator::AccountOwnership);
                self.draw_trend_page(frame, area, &view, true, Some(NATIONAL_TARGET_PCT));
            }
        }
    }

    fn draw_overview(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let views = pipeline::view_all(&self.dataset);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        // Metric tiles, one per indicator.
        let tile_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(chunks[0]);

        for (view, tile) in views.iter().zip(tile_areas.iter()) {
            let (value, year) = match &view.latest {
                Some(obs) => (format!("{:.1} %", obs.value), format!("({})", obs.year)),
                None => ("N/A".to_string(), String::new()),
            };
            let text = Text::from(vec![
                Line::from(Span::styled(
                    value,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(year, Style::default().fg(Color::Gray))),
            ]);
            let p = Paragraph::new(text).block(
                Block::default()
                    .title(view.indicator.label())
                    .borders(Borders::ALL),
            );
            frame.render_widget(p, *tile);
        }

        // Latest-observations table (plain text, same renderer as the CLI).
        let body = crate::report::format_latest_table(&views);
        let p = Paragraph::new(body).block(
            Block::default()
                .title("Latest Observations")
                .borders(Borders::ALL),
        );
        frame.render_widget(p, chunks[1]);
    }

    fn draw_trend_page(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        view: &IndicatorView,
        with_forecast: bool,
        target: Option<f64>,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(9)])
            .split(area);

        self.draw_chart(frame, chunks[0], view, with_forecast, target);

        let text = if target.is_some() {
            crate::report::format_projection(view)
        } else if with_forecast {
            crate::report::format_forecast(view)
        } else {
            crate::report::format_series_table(view)
        };
        let p = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, chunks[1]);
    }

    fn draw_chart(
        &self,
        frame: &mut ratatui::Frame<'_>,
        area: Rect,
        view: &IndicatorView,
        with_forecast: bool,
        target: Option<f64>,
    ) {
        let block = Block::default()
            .title(view.indicator.label())
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if view.series.is_empty() {
            let msg = Paragraph::new("No observations for this indicator.")
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(msg, inner);
            return;
        }

        let forecast = if with_forecast {
            match &view.forecast {
                Ok(f) => Some(f),
                Err(err) => {
                    // Advisory in place of the chart overlay; history still draws.
                    let msg = Paragraph::new(crate::report::advisory(err))
                        .style(Style::default().fg(Color::Yellow));
                    let hint = Rect {
                        x: inner.x,
                        y: inner.y,
                        width: inner.width,
                        height: 1,
                    };
                    frame.render_widget(msg, hint);
                    None
                }
            }
        } else {
            None
        };

        let (history, trend, markers, x_bounds, y_bounds) = chart_series(view, forecast, target);

        let widget = TrendChart {
            history: &history,
            trend: &trend,
            forecast: &markers,
            target,
            x_bounds,
            y_bounds,
            x_label: "year",
            y_label: "% of adults".to_string(),
            fmt_x: fmt_axis_year,
            fmt_y: fmt_axis_pct,
        };
        frame.render_widget(widget, inner);
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "Tab/1-4 page  ←/→ indicator  d download csv  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Build chart series for Plotters.
#[allow(clippy::type_complexity)]
fn chart_series(
    view: &IndicatorView,
    forecast: Option<&crate::domain::Forecast>,
    target: Option<f64>,
) -> (
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
    Vec<(f64, f64)>,
    [f64; 2],
    [f64; 2],
) {
    let history: Vec<(f64, f64)> = view
        .series
        .points
        .iter()
        .map(|p| (p.year as f64, p.value))
        .collect();

    let mut x0 = history.iter().map(|&(x, _)| x).fold(f64::INFINITY, f64::min);
    let mut x1 = history.iter().map(|&(x, _)| x).fold(f64::NEG_INFINITY, f64::max);
    if forecast.is_some() {
        x1 = x1.max(*TARGET_YEARS.last().unwrap_or(&2027) as f64);
    }
    if !x0.is_finite() || !x1.is_finite() || x1 <= x0 {
        x0 = 2010.0;
        x1 = 2027.0;
    }
    let x_bounds = [x0, x1];

    let mut trend = Vec::new();
    let mut markers = Vec::new();
    if let Some(f) = forecast {
        let n = 100usize;
        trend.reserve(n);
        for i in 0..n {
            let u = i as f64 / (n as f64 - 1.0);
            let x = x0 + u * (x1 - x0);
            trend.push((x, f.line.slope * x + f.line.intercept));
        }
        markers = f.points.iter().map(|p| (p.year as f64, p.value)).collect();
    }

    let (mut y_min, mut y_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for &(_, y) in history.iter().chain(trend.iter()).chain(markers.iter()) {
        y_min = y_min.min(y);
        y_max = y_max.max(y);
    }
    if let Some(level) = target {
        y_min = y_min.min(level);
        y_max = y_max.max(level);
    }

    if !y_min.is_finite() || !y_max.is_finite() || y_max <= y_min {
        y_min = 0.0;
        y_max = 1.0;
    }

    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    let y_bounds = [y_min - pad, y_max + pad];

    (history, trend, markers, x_bounds, y_bounds)
}

fn fmt_axis_year(v: f64) -> String {
    format!("{v:.0}")
}

fn fmt_axis_pct(v: f64) -> String {
    format!("{v:.1}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Observation;

    fn obs(indicator: Indicator, year: i32, value: f64) -> Observation {
        Observation {
            indicator,
            year,
            value,
        }
    }

    #[test]
    fn pages_cycle_in_order() {
        let mut page = Page::Overview;
        for expected in [Page::Trends, Page::Forecasts, Page::Projection, Page::Overview] {
            page = page.next();
            assert_eq!(page, expected);
        }
        assert_eq!(Page::Overview.prev(), Page::Projection);
    }

    #[test]
    fn chart_series_extends_x_to_forecast_horizon() {
        let ds = Dataset::from_observations(vec![
            obs(Indicator::AccountOwnership, 2014, 22.0),
            obs(Indicator::AccountOwnership, 2017, 35.0),
            obs(Indicator::AccountOwnership, 2021, 46.0),
        ]);
        let view = pipeline::view(&ds, Indicator::AccountOwnership);
        let forecast = view.forecast.clone().unwrap();

        let (history, trend, markers, x_bounds, y_bounds) =
            chart_series(&view, Some(&forecast), Some(NATIONAL_TARGET_PCT));

        assert_eq!(history.len(), 3);
        assert!(!trend.is_empty());
        assert_eq!(markers.len(), TARGET_YEARS.len());
        assert!((x_bounds[1] - 2027.0).abs() < 1e-9);
        // Target level is inside the padded y-range.
        assert!(y_bounds[0] < NATIONAL_TARGET_PCT && NATIONAL_TARGET_PCT < y_bounds[1]);
    }

    #[test]
    fn chart_series_without_forecast_has_no_trend_overlay() {
        let ds = Dataset::from_observations(vec![
            obs(Indicator::MobileMoney, 2017, 5.5),
            obs(Indicator::MobileMoney, 2021, 9.7),
        ]);
        let view = pipeline::view(&ds, Indicator::MobileMoney);

        let (history, trend, markers, x_bounds, _) = chart_series(&view, None, None);
        assert_eq!(history.len(), 2);
        assert!(trend.is_empty());
        assert!(markers.is_empty());
        assert!((x_bounds[1] - 2021.0).abs() < 1e-9);
    }
}
