use crate::models::{DailyCount, TagCount};
use chrono::Datelike;
use std::fmt::Write;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 260.0;
const PADDING_X: f64 = 44.0;
const PADDING_Y: f64 = 34.0;
const TOP: f64 = 24.0;
const MAX_LABELLED_TICKS: u64 = 10;

pub const TICK_STEP: u64 = 1;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub day: u32,
    pub count: u64,
}

/// Daily record counts of one month, drawn as a bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyChart {
    pub year: i32,
    pub month: u32,
    pub bars: Vec<Bar>,
}

impl MonthlyChart {
    pub fn from_counts(year: i32, month: u32, counts: &[DailyCount]) -> Self {
        let bars = counts
            .iter()
            .map(|point| Bar {
                day: point.date.day(),
                count: point.count,
            })
            .collect();
        Self { year, month, bars }
    }

    pub fn labels(&self) -> Vec<String> {
        self.bars.iter().map(|bar| bar.day.to_string()).collect()
    }

    pub fn values(&self) -> Vec<u64> {
        self.bars.iter().map(|bar| bar.count).collect()
    }

    /// The y axis always starts at zero.
    pub fn y_min(&self) -> u64 {
        0
    }

    pub fn y_max(&self) -> u64 {
        self.bars.iter().map(|bar| bar.count).max().unwrap_or(0).max(1)
    }

    /// Tick values from zero in steps of one. Labels are thinned for tall axes.
    pub fn ticks(&self) -> Vec<u64> {
        let max = self.y_max();
        let every = max.div_ceil(MAX_LABELLED_TICKS).max(TICK_STEP);
        (self.y_min()..=max).step_by(every as usize).collect()
    }

    pub fn render_svg(&self) -> String {
        if self.bars.is_empty() {
            return format!(
                r#"<svg id="monthly-chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="Monthly records"><text class="chart-label" x="50%" y="50%" text-anchor="middle">No records this month</text></svg>"#
            );
        }

        let max = self.y_max() as f64;
        let plot_height = HEIGHT - TOP - PADDING_Y;
        let slot = (WIDTH - PADDING_X * 2.0) / self.bars.len() as f64;
        let bar_width = (slot * 0.7).max(1.0);
        let y = |value: f64| HEIGHT - PADDING_Y - value / max * plot_height;

        let mut svg = format!(
            r#"<svg id="monthly-chart" viewBox="0 0 {WIDTH} {HEIGHT}" role="img" aria-label="Monthly records">"#
        );
        for tick in self.ticks() {
            let y_pos = y(tick as f64);
            let _ = write!(
                svg,
                r#"<line class="chart-grid" x1="{PADDING_X}" y1="{y_pos:.2}" x2="{x2}" y2="{y_pos:.2}" /><text class="chart-label" x="{lx}" y="{ly:.2}" text-anchor="end">{tick}</text>"#,
                x2 = WIDTH - PADDING_X,
                lx = PADDING_X - 10.0,
                ly = y_pos + 4.0,
            );
        }
        for (index, (day, count)) in self.labels().iter().zip(self.values()).enumerate() {
            let x = PADDING_X + index as f64 * slot + (slot - bar_width) / 2.0;
            let top = y(count as f64);
            let _ = write!(
                svg,
                r#"<rect class="chart-bar" x="{x:.2}" y="{top:.2}" width="{bar_width:.2}" height="{h:.2}"><title>{day}: {count}</title></rect><text class="chart-label" x="{cx:.2}" y="{ly:.2}" text-anchor="middle">{day}</text>"#,
                h = HEIGHT - PADDING_Y - top,
                cx = x + bar_width / 2.0,
                ly = HEIGHT - PADDING_Y + 18.0,
            );
        }
        svg.push_str("</svg>");
        svg
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TagWeight {
    pub tag: String,
    pub count: u64,
    pub weight: f64,
}

impl TagWeight {
    pub fn percent(&self) -> f64 {
        self.weight * 100.0
    }
}

/// Weight of each tag relative to the most frequent one.
pub fn tag_weights(tags: &[TagCount]) -> Vec<TagWeight> {
    let max = tags.iter().map(|tag| tag.count).max().unwrap_or(0);
    tags.iter()
        .map(|tag| TagWeight {
            tag: tag.tag.clone(),
            count: tag.count,
            weight: if max == 0 {
                0.0
            } else {
                tag.count as f64 / max as f64
            },
        })
        .collect()
}
