// Chart rendering.
//
// Each call opens its own SVG drawing surface, writes exactly one file and
// leaves the summary untouched. An empty summary is refused before any file
// is created.
use crate::error::AppError;
use crate::types::Summary;
use crate::util::slugify;
use plotters::prelude::*;
use std::error::Error;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::{Path, PathBuf};
use tracing::info;

const CANVAS: (u32, u32) = (1024, 640);
const MAX_BARS: usize = 10;
const FONT: &str = "sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererKind {
    Bar,
    Pie,
    Line,
}

impl RendererKind {
    pub const ALL: [RendererKind; 3] = [RendererKind::Bar, RendererKind::Pie, RendererKind::Line];

    pub fn from_choice(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(RendererKind::Bar),
            "2" => Some(RendererKind::Pie),
            "3" => Some(RendererKind::Line),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RendererKind::Bar => "Bar chart",
            RendererKind::Pie => "Pie chart",
            RendererKind::Line => "Line chart (best for daily counts)",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RendererKind::Bar => "bar",
            RendererKind::Pie => "pie",
            RendererKind::Line => "line",
        }
    }

    /// `Top 10 Complaint Types` + bar -> `top_10_complaint_types_bar.svg`.
    pub fn file_name(self, title: &str) -> String {
        format!("{}_{}.svg", slugify(title), self.name())
    }

    /// Draw `summary` into `out_dir` and return the written path.
    ///
    /// Fails with `EmptySummary` when there is nothing to plot; no file is
    /// written in that case. Drawing or IO failures become `WriteError`.
    pub fn render(self, summary: &Summary, title: &str, out_dir: &Path) -> Result<PathBuf, AppError> {
        if summary.is_empty() || summary.total() == 0 {
            return Err(AppError::EmptySummary(title.to_string()));
        }
        let path = out_dir.join(self.file_name(title));
        let drawn = match self {
            RendererKind::Bar => draw_bar(summary, title, &path),
            RendererKind::Pie => draw_pie(summary, title, &path),
            RendererKind::Line => draw_line(summary, title, &path),
        };
        drawn.map_err(|e| AppError::write(path.clone(), e))?;
        info!("Rendered {} chart to {}", self.name(), path.display());
        Ok(path)
    }
}

// Leave some room above the tallest bar / point.
fn headroom(top: u64) -> u64 {
    top + top / 10 + 1
}

fn draw_bar(summary: &Summary, title: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    let entries = &summary.entries()[..summary.len().min(MAX_BARS)];
    let top = entries.iter().map(|(_, c)| *c).max().unwrap_or(0);

    let root = SVGBackend::new(path, CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 28).into_font())
        .margin(20)
        .x_label_area_size(80)
        .y_label_area_size(60)
        .build_cartesian_2d((0..entries.len()).into_segmented(), 0u64..headroom(top))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(entries.len())
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => entries.get(*i).map(|(k, _)| k.clone()).unwrap_or_default(),
            _ => String::new(),
        })
        .y_desc("Count")
        .draw()?;

    chart.draw_series(entries.iter().enumerate().map(|(i, (_, count))| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), *count)],
            BLUE.mix(0.7).filled(),
        );
        bar.set_margin(0, 0, 6, 6);
        bar
    }))?;

    root.present()?;
    Ok(())
}

fn draw_pie(summary: &Summary, title: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(path, CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let area = root.titled(title, (FONT, 28).into_font())?;

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = f64::from(w.min(h)) * 0.35;
    let total = summary.total() as f64;

    // Slices run clockwise from twelve o'clock.
    let mut start = -FRAC_PI_2;
    for (i, (key, count)) in summary.entries().iter().enumerate() {
        let share = *count as f64 / total;
        let sweep = share * TAU;
        let color = Palette99::pick(i).mix(0.9);
        area.draw(&Polygon::new(wedge(center, radius, start, sweep), color.filled()))?;

        let label = format!("{} ({:.1}%)", key, share * 100.0);
        let anchor = polar(center, radius * 1.12, start + sweep / 2.0);
        area.draw(&Text::new(label, anchor, (FONT, 14).into_font()))?;
        start += sweep;
    }

    root.present()?;
    Ok(())
}

fn draw_line(summary: &Summary, title: &str, path: &Path) -> Result<(), Box<dyn Error>> {
    let entries = summary.entries();
    let last = (entries.len() as i32 - 1).max(1);
    let top = entries.iter().map(|(_, c)| *c).max().unwrap_or(0);

    let root = SVGBackend::new(path, CANVAS).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 28).into_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0i32..last, 0u64..headroom(top))?;

    // Mesh lines stay on for the grid.
    chart
        .configure_mesh()
        .x_labels(entries.len().min(12))
        .x_label_formatter(&|x| {
            usize::try_from(*x)
                .ok()
                .and_then(|i| entries.get(i))
                .map(|(k, _)| k.clone())
                .unwrap_or_default()
        })
        .y_desc("Count")
        .draw()?;

    let points: Vec<(i32, u64)> = entries
        .iter()
        .enumerate()
        .map(|(i, (_, c))| (i as i32, *c))
        .collect();
    chart.draw_series(LineSeries::new(points.iter().copied(), &RED))?;
    chart.draw_series(points.iter().map(|p| Circle::new(*p, 4, RED.filled())))?;

    root.present()?;
    Ok(())
}

fn polar(center: (i32, i32), r: f64, angle: f64) -> (i32, i32) {
    (
        center.0 + (r * angle.cos()).round() as i32,
        center.1 + (r * angle.sin()).round() as i32,
    )
}

/// Polygon approximating one pie slice, roughly one vertex per two degrees.
fn wedge(center: (i32, i32), r: f64, start: f64, sweep: f64) -> Vec<(i32, i32)> {
    let steps = ((sweep / TAU) * 180.0).ceil().max(1.0) as usize;
    let mut points = Vec::with_capacity(steps + 2);
    points.push(center);
    for s in 0..=steps {
        points.push(polar(center, r, start + sweep * s as f64 / steps as f64));
    }
    points
}
