//! Rolling three-axis buffer and the geometry of the live line chart.
//!
//! Nothing here touches a canvas. [`Chart::frame`] produces a [`ChartFrame`]
//! of plain line segments and text anchors that the Android view replays.

use crate::config::ChartConfig;
use crate::sensors::GyroSample;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

pub const GRID_COLOR: u32 = 0xFFCC_CCCC;
pub const LABEL_COLOR: u32 = 0xFF00_0000;
pub const LABEL_TEXT_SIZE: f32 = 24.0;
/// Label anchor offset from the left edge of the plot area
const LABEL_OFFSET_X: f32 = 45.0;
const LABEL_OFFSET_Y: f32 = 10.0;
/// Floats per line record in [`ChartFrame::to_draw_commands`]
pub const DRAW_COMMAND_STRIDE: usize = 5;
/// Ints per record in [`paint_table`]
pub const PAINT_RECORD_STRIDE: usize = 3;
/// Paint-table code of the label paint, after the line style codes
pub const LABEL_PAINT_CODE: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

/// Fixed-capacity FIFO of samples, one sequence per axis
#[derive(Debug, Clone)]
pub struct RollingBuffer {
    capacity: usize,
    x: VecDeque<f32>,
    y: VecDeque<f32>,
    z: VecDeque<f32>,
}

impl RollingBuffer {
    pub fn new(capacity: usize) -> Self {
        // One extra slot: push happens before eviction
        Self {
            capacity,
            x: VecDeque::with_capacity(capacity + 1),
            y: VecDeque::with_capacity(capacity + 1),
            z: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append one point per axis, evicting the oldest once over capacity
    pub fn push(&mut self, x: f32, y: f32, z: f32) {
        for (queue, value) in [(&mut self.x, x), (&mut self.y, y), (&mut self.z, z)] {
            queue.push_back(value);
            if queue.len() > self.capacity {
                queue.pop_front();
            }
        }
    }

    pub fn push_sample(&mut self, sample: &GyroSample) {
        self.push(sample.x, sample.y, sample.z);
    }

    pub fn axis(&self, axis: Axis) -> &VecDeque<f32> {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.z.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Paint used for a line; the Java view keeps one `Paint` per style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Grid,
    Series(Axis),
}

impl LineStyle {
    pub const ALL: [LineStyle; 4] = [
        LineStyle::Grid,
        LineStyle::Series(Axis::X),
        LineStyle::Series(Axis::Y),
        LineStyle::Series(Axis::Z),
    ];

    pub fn color(&self) -> u32 {
        match self {
            LineStyle::Grid => GRID_COLOR,
            LineStyle::Series(Axis::X) => 0xFF00_00FF,
            LineStyle::Series(Axis::Y) => 0xFFFF_0000,
            LineStyle::Series(Axis::Z) => 0xFF00_FF00,
        }
    }

    pub fn stroke_width(&self) -> f32 {
        match self {
            LineStyle::Grid => 1.0,
            LineStyle::Series(_) => 4.0,
        }
    }

    /// Stable numeric code for the flat draw-command array
    pub fn code(&self) -> u8 {
        match self {
            LineStyle::Grid => 0,
            LineStyle::Series(Axis::X) => 1,
            LineStyle::Series(Axis::Y) => 2,
            LineStyle::Series(Axis::Z) => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub style: LineStyle,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
    pub color: u32,
    pub text_size: f32,
}

/// Maps chart values and slot indices to view pixels
#[derive(Debug, Clone)]
pub struct ChartGeometry<'a> {
    config: &'a ChartConfig,
    width: f32,
    height: f32,
}

impl<'a> ChartGeometry<'a> {
    pub fn new(width: f32, height: f32, config: &'a ChartConfig) -> Self {
        Self {
            config,
            width,
            height,
        }
    }

    pub fn graph_width(&self) -> f32 {
        self.width - 2.0 * self.config.padding
    }

    pub fn graph_height(&self) -> f32 {
        self.height - 2.0 * self.config.padding
    }

    /// Vertical pixel for a value. Out-of-range values are not clamped.
    pub fn value_to_y(&self, value: f32) -> f32 {
        let span = self.config.axis_max - self.config.axis_min;
        self.config.padding + self.graph_height() * (1.0 - (value - self.config.axis_min) / span)
    }

    /// Horizontal pixel for a buffer slot, always spaced for a full buffer
    pub fn index_to_x(&self, index: usize) -> f32 {
        let spacing = self.graph_width() / (self.config.max_points - 1) as f32;
        self.config.padding + index as f32 * spacing
    }

    /// Values at which horizontal gridlines are drawn, `axis_min..=axis_max`
    pub fn grid_values(&self) -> Vec<f32> {
        let span = self.config.axis_max - self.config.axis_min;
        // Tolerance keeps the top line when span/step is not exact in binary
        let count = (span / self.config.step + 1e-4).floor() as usize + 1;
        (0..count)
            .map(|k| self.config.axis_min + k as f32 * self.config.step)
            .collect()
    }

    /// Gridlines and their value labels
    pub fn grid(&self) -> (Vec<Line>, Vec<Label>) {
        let padding = self.config.padding;
        let mut lines = Vec::new();
        let mut labels = Vec::new();

        for value in self.grid_values() {
            let y = self.value_to_y(value);
            lines.push(Line {
                style: LineStyle::Grid,
                start: Point { x: padding, y },
                end: Point {
                    x: self.width - padding,
                    y,
                },
            });
            labels.push(Label {
                text: format_axis_label(value),
                anchor: Point {
                    x: padding - LABEL_OFFSET_X,
                    y: y + LABEL_OFFSET_Y,
                },
                color: LABEL_COLOR,
                text_size: LABEL_TEXT_SIZE,
            });
        }

        let steps = self.config.vertical_steps;
        for i in 0..=steps {
            let x = padding + i as f32 * (self.graph_width() / steps as f32);
            lines.push(Line {
                style: LineStyle::Grid,
                start: Point { x, y: padding },
                end: Point {
                    x,
                    y: self.height - padding,
                },
            });
        }

        (lines, labels)
    }

    /// Connected segments for one axis; fewer than two points draw nothing
    pub fn series(&self, axis: Axis, values: &VecDeque<f32>) -> Vec<Line> {
        let visible = values.len().min(self.config.max_points);
        let style = LineStyle::Series(axis);
        values
            .iter()
            .take(visible)
            .zip(values.iter().skip(1).take(visible.saturating_sub(1)))
            .enumerate()
            .map(|(i, (&prev, &next))| Line {
                style,
                start: Point {
                    x: self.index_to_x(i),
                    y: self.value_to_y(prev),
                },
                end: Point {
                    x: self.index_to_x(i + 1),
                    y: self.value_to_y(next),
                },
            })
            .collect()
    }
}

/// Paints as `[code, argb, size]` records: one per line style (stroke width),
/// then the label paint (text size). Colors keep their bit pattern as `int`.
pub fn paint_table() -> Vec<i32> {
    let mut out = Vec::with_capacity((LineStyle::ALL.len() + 1) * PAINT_RECORD_STRIDE);
    for style in LineStyle::ALL {
        out.extend_from_slice(&[
            style.code() as i32,
            style.color() as i32,
            style.stroke_width() as i32,
        ]);
    }
    out.extend_from_slice(&[
        LABEL_PAINT_CODE,
        LABEL_COLOR as i32,
        LABEL_TEXT_SIZE as i32,
    ]);
    out
}

/// `%.1f` with half-up rounding, matching the platform formatter
pub fn format_axis_label(value: f32) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    // Avoid "-0.0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{:.1}", rounded)
}

/// One rendered chart: grid first, then the x, y, z series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub lines: Vec<Line>,
    pub labels: Vec<Label>,
}

impl ChartFrame {
    /// Flatten lines as `[style, x0, y0, x1, y1]` records
    pub fn to_draw_commands(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.lines.len() * DRAW_COMMAND_STRIDE);
        for line in &self.lines {
            out.extend_from_slice(&[
                line.style.code() as f32,
                line.start.x,
                line.start.y,
                line.end.x,
                line.end.y,
            ]);
        }
        out
    }

    pub fn series_lines(&self, axis: Axis) -> impl Iterator<Item = &Line> {
        self.lines
            .iter()
            .filter(move |line| line.style == LineStyle::Series(axis))
    }
}

/// Live chart state: the rolling buffer and its geometry settings
#[derive(Debug, Clone)]
pub struct Chart {
    config: ChartConfig,
    buffer: RollingBuffer,
}

impl Chart {
    pub fn new(config: ChartConfig) -> Self {
        let buffer = RollingBuffer::new(config.max_points);
        Self { config, buffer }
    }

    pub fn add_sample(&mut self, sample: &GyroSample) {
        self.buffer.push_sample(sample);
    }

    pub fn buffer(&self) -> &RollingBuffer {
        &self.buffer
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn frame(&self, width: f32, height: f32) -> ChartFrame {
        let geometry = ChartGeometry::new(width, height, &self.config);
        let (mut lines, labels) = geometry.grid();
        for axis in Axis::ALL {
            lines.extend(geometry.series(axis, self.buffer.axis(axis)));
        }
        ChartFrame { lines, labels }
    }

    /// Axis labels only; they depend on the view size, not the samples
    pub fn labels(&self, width: f32, height: f32) -> Vec<Label> {
        ChartGeometry::new(width, height, &self.config).grid().1
    }
}
