use std::{ops::Range, path::Path};

use common::config::PlotStyle;
use eyre::Result;
use plotters::{
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use tracing::debug;

const TITLE_FONT_SIZE: u32 = 30;
const AXIS_LABEL_FONT_SIZE: u32 = 22;
const TICK_LABEL_FONT_SIZE: u32 = 18;
const LEGEND_FONT_SIZE: u32 = 18;

/// Viridis samples, one per schedule
pub const SERIES_COLORS: &[RGBColor] = &[
    RGBColor(68, 1, 84),
    RGBColor(59, 82, 139),
    RGBColor(33, 145, 140),
    RGBColor(94, 201, 98),
    RGBColor(253, 231, 37),
    RGBColor(72, 40, 120),
    RGBColor(49, 104, 142),
    RGBColor(53, 183, 121),
];

pub fn series_color(idx: usize) -> RGBColor {
    SERIES_COLORS[idx % SERIES_COLORS.len()]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Triangle,
    /// Hollow circle
    Ring,
}

/// Single annotated point drawn on top of the lines
#[derive(Debug, Clone)]
pub struct Marker {
    pub label: String,
    pub x: u32,
    pub y: f64,
    pub shape: MarkerShape,
    pub color: RGBColor,
}

/// Horizontal line spanning the whole x axis
#[derive(Debug, Clone)]
pub struct ReferenceLine {
    pub label: String,
    pub y: f64,
    pub color: RGBColor,
}

#[derive(Debug, Clone)]
pub struct LineSeriesSpec {
    pub label: String,
    pub points: Vec<(u32, f64)>,
}

/// Line chart with thread counts on the x axis
#[derive(Debug, Clone)]
pub struct ThreadChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    /// Thread counts that get a tick label
    pub ticks: Vec<u32>,
    pub series: Vec<LineSeriesSpec>,
    pub markers: Vec<Marker>,
    pub reference: Option<ReferenceLine>,
}

#[derive(Debug, Clone)]
pub struct BarSeriesSpec {
    pub label: String,
    /// One slot per category, `None` leaves a gap
    pub values: Vec<Option<f64>>,
}

/// Grouped bar chart, one group per category and one bar per series
#[derive(Debug, Clone)]
pub struct BarChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub categories: Vec<String>,
    pub series: Vec<BarSeriesSpec>,
    pub reference: Option<ReferenceLine>,
}

impl ThreadChart {
    fn y_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.1))
            .chain(self.markers.iter().map(|m| m.y))
            .chain(self.reference.iter().map(|r| r.y))
    }

    pub fn x_range(&self) -> Range<u32> {
        let max = self
            .ticks
            .iter()
            .copied()
            .chain(self.markers.iter().map(|m| m.x))
            .max()
            .unwrap_or(1);
        0..max + 1
    }

    pub fn y_range(&self) -> Range<f64> {
        padded_range(self.y_values(), false)
    }
}

impl BarChart {
    pub fn y_range(&self) -> Range<f64> {
        let values = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().flatten().copied())
            .chain(self.reference.iter().map(|r| r.y));
        padded_range(values, true)
    }
}

/// Value range of the finite inputs with 10% headroom on both ends
///
/// With `from_zero` the range always starts at zero, as bars need.
pub fn padded_range(values: impl Iterator<Item = f64>, from_zero: bool) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if min > max {
        return 0.0..1.0;
    }
    let min = if from_zero { min.min(0.0) } else { min };
    let span = if max > min { max - min } else { max.abs().max(1.0) };
    let pad = span * 0.1;
    let low = if from_zero {
        min
    } else if min >= 0.0 {
        (min - pad).max(0.0)
    } else {
        min - pad
    };
    low..max + pad
}

pub fn render_thread_chart(filepath: &Path, style: &PlotStyle, chart: &ThreadChart) -> Result<()> {
    debug!("Rendering {}", filepath.display());
    let font = style.font_family.as_str();
    let root = BitMapBackend::new(filepath, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let x_range = chart.x_range();
    let x_end = x_range.end;
    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (font, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_range, chart.y_range())?;

    let x_label = |x: &u32| {
        if chart.ticks.contains(x) {
            x.to_string()
        } else {
            String::new()
        }
    };
    ctx.configure_mesh()
        .x_labels(x_end as usize + 1)
        .x_label_formatter(&x_label)
        .y_label_formatter(&|y| format!("{y:.1}"))
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .label_style((font, TICK_LABEL_FONT_SIZE))
        .axis_desc_style((font, AXIS_LABEL_FONT_SIZE))
        .draw()?;

    for (idx, series) in chart.series.iter().enumerate() {
        let color = series_color(idx);
        ctx.draw_series(LineSeries::new(
            series.points.iter().copied(),
            color.stroke_width(3),
        ))?
        .label(series.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
        ctx.draw_series(
            series
                .points
                .iter()
                .map(|&point| Circle::new(point, 6, color.filled())),
        )?;
    }

    if let Some(reference) = &chart.reference {
        let color = reference.color;
        ctx.draw_series(LineSeries::new(
            vec![(0, reference.y), (x_end, reference.y)],
            color.stroke_width(2),
        ))?
        .label(reference.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    for marker in &chart.markers {
        let color = marker.color;
        let point = (marker.x, marker.y);
        match marker.shape {
            MarkerShape::Triangle => {
                ctx.draw_series(std::iter::once(TriangleMarker::new(point, 14, color.filled())))?
                    .label(marker.label.as_str())
                    .legend(move |(x, y)| TriangleMarker::new((x + 10, y), 7, color.filled()));
            }
            MarkerShape::Ring => {
                ctx.draw_series(std::iter::once(Circle::new(point, 12, color.stroke_width(2))))?
                    .label(marker.label.as_str())
                    .legend(move |(x, y)| Circle::new((x + 10, y), 6, color.stroke_width(2)));
            }
        }
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((font, LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

pub fn render_bar_chart(filepath: &Path, style: &PlotStyle, chart: &BarChart) -> Result<()> {
    debug!("Rendering {}", filepath.display());
    let font = style.font_family.as_str();
    let root = BitMapBackend::new(filepath, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let num_categories = chart.categories.len();
    let num_series = chart.series.len().max(1);
    let x_min = -0.5;
    let x_max = num_categories as f64 - 0.5;
    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, (font, TITLE_FONT_SIZE))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min..x_max, chart.y_range())?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_labels(num_categories)
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| format!("{y:.1}"))
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .label_style((font, TICK_LABEL_FONT_SIZE))
        .axis_desc_style((font, AXIS_LABEL_FONT_SIZE))
        .draw()?;

    // category names sit centered under each group
    let label_style = TextStyle::from((font, TICK_LABEL_FONT_SIZE).into_font())
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (idx, category) in chart.categories.iter().enumerate() {
        let (px, py) = ctx.plotting_area().map_coordinate(&(idx as f64, 0.0));
        root.draw(&Text::new(category.as_str(), (px, py + 8), label_style.clone()))?;
    }

    let group_width = 0.8;
    let bar_width = group_width / num_series as f64;
    for (series_idx, series) in chart.series.iter().enumerate() {
        let color = series_color(series_idx);
        let offset = (series_idx as f64 - (num_series as f64 - 1.0) / 2.0) * bar_width;
        let bars = series
            .values
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| value.map(|v| (idx, v)))
            .map(move |(idx, value)| {
                let center = idx as f64 + offset;
                Rectangle::new(
                    [
                        (center - bar_width / 2.0 + 0.01, 0.0),
                        (center + bar_width / 2.0 - 0.01, value),
                    ],
                    color.filled(),
                )
            });
        ctx.draw_series(bars)?
            .label(series.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 20, y + 6)], color.filled()));
    }

    if let Some(reference) = &chart.reference {
        let color = reference.color;
        ctx.draw_series(LineSeries::new(
            vec![(x_min, reference.y), (x_max, reference.y)],
            color.stroke_width(3),
        ))?
        .label(reference.label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(3)));
    }

    ctx.configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((font, LEGEND_FONT_SIZE))
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_ignores_non_finite() {
        let range = padded_range([100.0, f64::INFINITY, 200.0, f64::NAN].into_iter(), false);
        assert!(range.start <= 100.0 && range.start >= 0.0);
        assert!(range.end > 200.0 && range.end < 220.1);
    }

    #[test]
    fn bar_range_starts_at_zero() {
        let range = padded_range([50.0, 80.0].into_iter(), true);
        assert_eq!(range.start, 0.0);
        assert!((range.end - 88.0).abs() < 1e-9);
    }

    #[test]
    fn empty_range_falls_back_to_unit() {
        assert_eq!(padded_range(std::iter::empty(), false), 0.0..1.0);
    }

    #[test]
    fn thread_chart_x_range_covers_ticks_and_markers() {
        let chart = ThreadChart {
            title: String::new(),
            x_desc: String::new(),
            y_desc: String::new(),
            ticks: vec![2, 4, 8],
            series: Vec::new(),
            markers: vec![Marker {
                label: "baseline".into(),
                x: 1,
                y: 10.0,
                shape: MarkerShape::Triangle,
                color: RED,
            }],
            reference: None,
        };
        assert_eq!(chart.x_range(), 0..9);
        let range = chart.y_range();
        assert!(range.start < 10.0 && range.end > 10.0);
    }
}
