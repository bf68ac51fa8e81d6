//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observed points: `o`
//! - fitted trend line: `-`
//! - forecast points: `x`
//! - optional target level: a `=` rule

use crate::domain::{Forecast, TimeSeries};

/// Render a series plus (optionally) its fitted trend, forecast points, and
/// a horizontal target level.
pub fn render_trend_plot(
    series: &TimeSeries,
    forecast: Option<&Forecast>,
    target: Option<f64>,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let Some((x_min, x_max)) = x_range(series, forecast) else {
        return "(no data to plot)\n".to_string();
    };
    let (y_min, y_max) = pad_range(y_range(series, forecast, target));

    let mut grid = vec![vec![' '; width]; height];

    // Draw the target rule first, then the trend, so data can overlay both.
    if let Some(level) = target {
        if level >= y_min && level <= y_max {
            let row = map_y(level, y_min, y_max, height);
            for cell in &mut grid[row] {
                *cell = '=';
            }
        }
    }

    if let Some(f) = forecast {
        for col in 0..width {
            let u = col as f64 / (width as f64 - 1.0);
            let year = x_min + u * (x_max - x_min);
            let value = f.line.slope * year + f.line.intercept;
            if value >= y_min && value <= y_max {
                let row = map_y(value, y_min, y_max, height);
                grid[row][col] = '-';
            }
        }

        for p in &f.points {
            let col = map_x(p.year as f64, x_min, x_max, width);
            let row = map_y(p.value.clamp(y_min, y_max), y_min, y_max, height);
            grid[row][col] = 'x';
        }
    }

    for p in &series.points {
        let col = map_x(p.year as f64, x_min, x_max, width);
        let row = map_y(p.value.clamp(y_min, y_max), y_min, y_max, height);
        grid[row][col] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: years=[{x_min:.0}, {x_max:.0}] | value=[{y_min:.1}, {y_max:.1}]%\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out.push_str("o observed  - trend  x forecast");
    if target.is_some() {
        out.push_str("  = target");
    }
    out.push('\n');

    out
}

fn x_range(series: &TimeSeries, forecast: Option<&Forecast>) -> Option<(f64, f64)> {
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    for p in &series.points {
        min_x = min_x.min(p.year as f64);
        max_x = max_x.max(p.year as f64);
    }
    if let Some(f) = forecast {
        for p in &f.points {
            min_x = min_x.min(p.year as f64);
            max_x = max_x.max(p.year as f64);
        }
    }
    if min_x.is_finite() && max_x.is_finite() && max_x > min_x {
        Some((min_x, max_x))
    } else {
        None
    }
}

fn y_range(series: &TimeSeries, forecast: Option<&Forecast>, target: Option<f64>) -> (f64, f64) {
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in &series.points {
        min_y = min_y.min(p.value);
        max_y = max_y.max(p.value);
    }
    if let Some(f) = forecast {
        for p in &f.points {
            min_y = min_y.min(p.value);
            max_y = max_y.max(p.value);
        }
    }
    if let Some(level) = target {
        min_y = min_y.min(level);
        max_y = max_y.max(level);
    }
    if !min_y.is_finite() || !max_y.is_finite() || max_y <= min_y {
        (0.0, 1.0)
    } else {
        (min_y, max_y)
    }
}

fn pad_range((y_min, y_max): (f64, f64)) -> (f64, f64) {
    let pad = ((y_max - y_min).abs() * 0.05).max(1e-12);
    (y_min - pad, y_max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    ((width as f64 - 1.0) * u).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // Row 0 is the top of the plot.
    (height - 1) - ((height as f64 - 1.0) * u).round() as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Indicator, SeriesPoint, TARGET_YEARS};
    use crate::trend::project;

    fn demo_series() -> TimeSeries {
        TimeSeries {
            indicator: Indicator::AccountOwnership,
            points: vec![
                SeriesPoint { year: 2014, value: 22.0 },
                SeriesPoint { year: 2017, value: 35.0 },
                SeriesPoint { year: 2021, value: 46.0 },
            ],
        }
    }

    #[test]
    fn plots_observed_points_and_forecast_markers() {
        let series = demo_series();
        let forecast = project(&series, &TARGET_YEARS).unwrap();

        let text = render_trend_plot(&series, Some(&forecast), Some(60.0), 60, 15);
        assert!(text.contains('o'));
        assert!(text.contains('x'));
        assert!(text.contains('='));
        // Header + grid rows + legend.
        assert_eq!(text.lines().count(), 15 + 2);
    }

    #[test]
    fn output_is_deterministic() {
        let series = demo_series();
        let forecast = project(&series, &TARGET_YEARS).unwrap();

        let a = render_trend_plot(&series, Some(&forecast), None, 60, 15);
        let b = render_trend_plot(&series, Some(&forecast), None, 60, 15);
        assert_eq!(a, b);
    }

    #[test]
    fn empty_input_renders_placeholder() {
        let series = TimeSeries {
            indicator: Indicator::MobileMoney,
            points: Vec::new(),
        };
        let text = render_trend_plot(&series, None, None, 60, 15);
        assert_eq!(text, "(no data to plot)\n");
    }
}
