//! Plotters-powered price chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `Chart` widget?
//! - nicer axis + mesh rendering
//! - custom tick label formatting (dates on x, currency on y)
//! - area fill under the line
//!
//! We render Plotters output into the Ratatui buffer using `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::{LineChart, MAX_X_TICKS};

/// Draws one prepared `LineChart`; all series data and bounds come from it.
pub struct PriceChartWidget<'a> {
    pub chart: &'a LineChart,
}

impl<'a> Widget for PriceChartWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let chart = self.chart;
        let [x0, x1] = chart.x_bounds();
        let [y0, y1] = chart.y_bounds;

        if !(x0.is_finite() && x1.is_finite() && y0.is_finite() && y1.is_finite()) || x1 <= x0 || y1 <= y0 {
            return;
        }

        let (r, g, b) = chart.palette.line;
        let line_color = RGBColor(r, g, b);
        let fill_alpha = chart.palette.fill_alpha();
        let points = chart.series_points();
        let cursor = chart
            .cursor()
            .and_then(|i| chart.values.get(i).map(|&v| (i as f64, v)));
        let x_ticks = chart.tick_indices(MAX_X_TICKS).len().max(2);

        let widget = widget_fn(move |root| {
            let mut ctx = ChartBuilder::on(&root)
                .margin(1)
                // Currency labels need more room than plain numbers.
                .set_label_area_size(LabelAreaPosition::Left, 12)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x0..x1, y0..y1)?;

            ctx.configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(x_ticks)
                .y_labels(5)
                .x_label_formatter(&|v| chart.axis_label(*v))
                .y_label_formatter(&|v| chart.format_value(*v))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            ctx.draw_series(
                AreaSeries::new(points.iter().copied(), y0, line_color.mix(fill_alpha * 0.4))
                    .border_style(line_color),
            )?;

            // Pixel, not Circle: the backend maps circle radii to canvas units
            // and draws huge circles.
            if let Some(at) = cursor {
                ctx.draw_series(std::iter::once(Pixel::new(at, WHITE)))?;
            }

            Ok(())
        });

        widget.render(area, buf);
    }
}
