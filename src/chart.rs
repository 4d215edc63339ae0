//! Chart dispatch: turns a chart request over a filtered view into
//! renderer-neutral chart data.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use thiserror::Error;

use crate::config;
use crate::data::aggregate::{bin_edges, count_into};
use crate::data::model::{CellValue, Column, MovieRecord};

// ---------------------------------------------------------------------------
// Request & validation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Bar,
    Scatter,
    Histogram,
    Box,
    Pie,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::Box,
        ChartKind::Pie,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Histogram => "Histogram",
            ChartKind::Box => "Box Plot",
            ChartKind::Pie => "Pie Chart",
        }
    }

    /// Whether the y selector is used by this kind.
    pub fn uses_y(self) -> bool {
        !matches!(self, ChartKind::Histogram)
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("X-axis"),
            Axis::Y => f.write_str("Y-axis"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("{kind} needs an {axis} column; select one before creating the chart")]
    MissingAxis { kind: ChartKind, axis: Axis },

    #[error("{kind} cannot use '{column}' on the {axis}: the column is not numeric")]
    NonNumeric {
        kind: ChartKind,
        axis: Axis,
        column: Column,
    },
}

/// Chart kind plus column selectors, as chosen in the side panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartRequest {
    pub kind: ChartKind,
    pub x: Option<Column>,
    pub y: Option<Column>,
    pub color: Option<Column>,
}

impl ChartRequest {
    /// Check that the selected columns fit the chart kind.
    pub fn validate(&self) -> Result<(), ChartError> {
        let kind = self.kind;
        let x = self.x.ok_or(ChartError::MissingAxis { kind, axis: Axis::X })?;
        if kind == ChartKind::Scatter && !x.is_numeric() {
            return Err(ChartError::NonNumeric {
                kind,
                axis: Axis::X,
                column: x,
            });
        }
        if kind.uses_y() {
            let y = self.y.ok_or(ChartError::MissingAxis { kind, axis: Axis::Y })?;
            if !y.is_numeric() {
                return Err(ChartError::NonNumeric {
                    kind,
                    axis: Axis::Y,
                    column: y,
                });
            }
        }
        Ok(())
    }

    fn title(&self, x: Column) -> String {
        let y = self.y.unwrap_or(x);
        match self.kind {
            ChartKind::Scatter => format!("{y} vs {x}"),
            ChartKind::Histogram => format!("{y} distribution"),
            ChartKind::Bar | ChartKind::Box | ChartKind::Pie => format!("{y} by {x}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Chart output
// ---------------------------------------------------------------------------

/// A named run of values, one per category / point.
#[derive(Debug, Clone, PartialEq)]
pub struct Series<T> {
    pub name: String,
    pub values: Vec<T>,
}

/// Five-number summary drawn as one box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: f64,
    /// Share of the pie total, 0..=1.
    pub fraction: f64,
    /// Colour group: the color column's value, or the label without one.
    pub group: String,
}

/// How text is placed on pie slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceText {
    pub inside: bool,
    pub show_percent: bool,
    pub show_label: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    /// Stacked bars; every series has one value per category.
    Bars {
        categories: Vec<String>,
        series: Vec<Series<f64>>,
    },
    Points {
        series: Vec<Series<[f64; 2]>>,
    },
    /// Shared bin edges, one count per bin and series.
    Histogram {
        edges: Vec<(f64, f64)>,
        series: Vec<Series<usize>>,
    },
    /// One optional box per category and series.
    Boxes {
        categories: Vec<String>,
        series: Vec<Series<Option<BoxStats>>>,
    },
    Pie {
        slices: Vec<PieSlice>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub data: ChartData,
    /// Slice text requested for pie charts.
    pub slice_text: Option<SliceText>,
}

impl Chart {
    /// True when there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        match &self.data {
            ChartData::Bars { categories, .. } | ChartData::Boxes { categories, .. } => categories.is_empty(),
            ChartData::Points { series } => series.iter().all(|s| s.values.is_empty()),
            ChartData::Histogram { edges, .. } => edges.is_empty(),
            ChartData::Pie { slices } => slices.is_empty(),
        }
    }

    /// Names that need a colour, in drawing order.
    pub fn color_keys(&self) -> Vec<String> {
        match &self.data {
            ChartData::Bars { series, .. } => series.iter().map(|s| s.name.clone()).collect(),
            ChartData::Points { series } => series.iter().map(|s| s.name.clone()).collect(),
            ChartData::Histogram { series, .. } => series.iter().map(|s| s.name.clone()).collect(),
            ChartData::Boxes { series, .. } => series.iter().map(|s| s.name.clone()).collect(),
            ChartData::Pie { slices } => {
                let mut groups: Vec<String> = Vec::new();
                for slice in slices {
                    if !groups.contains(&slice.group) {
                        groups.push(slice.group.clone());
                    }
                }
                groups
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Build the chart described by `request` from `records`.
///
/// An empty `records` slice is not an error; the returned chart is empty.
pub fn create_chart(records: &[&MovieRecord], request: &ChartRequest) -> Result<Chart, ChartError> {
    request.validate()?;
    // validate() guarantees x, and y for every kind that uses it.
    let x = request.x.ok_or(ChartError::MissingAxis {
        kind: request.kind,
        axis: Axis::X,
    })?;
    let y = request.y.filter(|_| request.kind.uses_y());
    let y_or_x = y.unwrap_or(x);

    let data = match request.kind {
        ChartKind::Bar => bars(records, x, Some(y_or_x), request.color),
        ChartKind::Scatter => points(records, x, y_or_x, request.color),
        ChartKind::Histogram if x.is_numeric() => numeric_histogram(records, x, request.color),
        ChartKind::Histogram => bars(records, x, None, request.color),
        ChartKind::Box => boxes(records, x, y_or_x, request.color),
        ChartKind::Pie => pie(records, x, y_or_x, request.color),
    };

    let y_label = match request.kind {
        ChartKind::Histogram => "Frequency".to_string(),
        _ => y_or_x.to_string(),
    };
    let slice_text = (request.kind == ChartKind::Pie).then_some(SliceText {
        inside: true,
        show_percent: true,
        show_label: true,
    });

    log::debug!("Created {} over {} records", request.kind, records.len());
    Ok(Chart {
        kind: request.kind,
        title: request.title(x),
        x_label: x.to_string(),
        y_label,
        data,
        slice_text,
    })
}

// -- category bookkeeping --

/// Category labels in first-appearance order, or sorted for numeric columns.
struct Categories {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Categories {
    fn collect(records: &[&MovieRecord], column: Column) -> Self {
        let mut keys: Vec<CellValue> = Vec::new();
        for record in records {
            for key in column.categories(record) {
                if !keys.contains(&key) {
                    keys.push(key);
                }
            }
        }
        if column.is_numeric() {
            keys.sort();
        }

        let mut labels: Vec<String> = Vec::with_capacity(keys.len());
        let mut index = HashMap::with_capacity(keys.len());
        for key in keys {
            let label = key.to_string();
            if !index.contains_key(&label) {
                index.insert(label.clone(), labels.len());
                labels.push(label);
            }
        }
        Categories { labels, index }
    }

    fn position(&self, key: &CellValue) -> Option<usize> {
        self.index.get(&key.to_string()).copied()
    }
}

/// Series names from the color column in first-appearance order; a single
/// series named `fallback` without one.
fn series_names(records: &[&MovieRecord], color: Option<Column>, fallback: &str) -> Vec<String> {
    match color {
        None => vec![fallback.to_string()],
        Some(column) => {
            let mut names: Vec<String> = Vec::new();
            for record in records {
                for key in column.categories(record) {
                    let name = key.to_string();
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
            }
            names
        }
    }
}

/// Series a record belongs to (several for a genre color column).
fn series_of(record: &MovieRecord, color: Option<Column>, fallback: &str) -> Vec<String> {
    match color {
        None => vec![fallback.to_string()],
        Some(column) => column.categories(record).iter().map(|k| k.to_string()).collect(),
    }
}

fn position_of(names: &[String], name: &str) -> Option<usize> {
    names.iter().position(|n| n == name)
}

// -- per-kind builders --

/// Sum of `y` (or row count without `y`) per x category and series.
fn bars(records: &[&MovieRecord], x: Column, y: Option<Column>, color: Option<Column>) -> ChartData {
    let (categories, series) = sum_by_category(records, x, y, color);
    ChartData::Bars { categories, series }
}

fn sum_by_category(
    records: &[&MovieRecord],
    x: Column,
    y: Option<Column>,
    color: Option<Column>,
) -> (Vec<String>, Vec<Series<f64>>) {
    let categories = Categories::collect(records, x);
    let fallback = y.map_or_else(|| "count".to_string(), |c| c.to_string());
    let names = series_names(records, color, &fallback);

    let mut series: Vec<Series<f64>> = names
        .iter()
        .map(|name| Series {
            name: name.clone(),
            values: vec![0.0; categories.labels.len()],
        })
        .collect();

    for record in records {
        let amount = match y {
            Some(column) => column.number(record).unwrap_or(0.0),
            None => 1.0,
        };
        for name in series_of(record, color, &fallback) {
            let Some(s) = position_of(&names, &name) else { continue };
            for key in x.categories(record) {
                if let Some(c) = categories.position(&key) {
                    series[s].values[c] += amount;
                }
            }
        }
    }

    (categories.labels, series)
}

fn points(records: &[&MovieRecord], x: Column, y: Column, color: Option<Column>) -> ChartData {
    let fallback = y.to_string();
    let names = series_names(records, color, &fallback);
    let mut series: Vec<Series<[f64; 2]>> = names
        .iter()
        .map(|name| Series {
            name: name.clone(),
            values: Vec::new(),
        })
        .collect();

    for record in records {
        let (Some(px), Some(py)) = (x.number(record), y.number(record)) else {
            continue;
        };
        for name in series_of(record, color, &fallback) {
            if let Some(s) = position_of(&names, &name) {
                series[s].values.push([px, py]);
            }
        }
    }
    ChartData::Points { series }
}

fn numeric_histogram(records: &[&MovieRecord], x: Column, color: Option<Column>) -> ChartData {
    let all: Vec<f64> = records.iter().filter_map(|r| x.number(r)).collect();
    let Some(edges) = bin_edges(&all, config::HISTOGRAM_BINS) else {
        return ChartData::Histogram {
            edges: Vec::new(),
            series: Vec::new(),
        };
    };

    let fallback = x.to_string();
    let names = series_names(records, color, &fallback);
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for record in records {
        let Some(v) = x.number(record) else { continue };
        for name in series_of(record, color, &fallback) {
            if let Some(s) = position_of(&names, &name) {
                values[s].push(v);
            }
        }
    }

    let series = names
        .into_iter()
        .zip(values)
        .map(|(name, vs)| Series {
            name,
            values: count_into(&edges, &vs),
        })
        .collect();
    ChartData::Histogram { edges, series }
}

fn boxes(records: &[&MovieRecord], x: Column, y: Column, color: Option<Column>) -> ChartData {
    let categories = Categories::collect(records, x);
    let fallback = y.to_string();
    let names = series_names(records, color, &fallback);

    // (series, category) -> samples
    let mut samples: BTreeMap<(usize, usize), Vec<f64>> = BTreeMap::new();
    for record in records {
        let Some(v) = y.number(record) else { continue };
        for name in series_of(record, color, &fallback) {
            let Some(s) = position_of(&names, &name) else { continue };
            for key in x.categories(record) {
                if let Some(c) = categories.position(&key) {
                    samples.entry((s, c)).or_default().push(v);
                }
            }
        }
    }

    let series = names
        .into_iter()
        .enumerate()
        .map(|(s, name)| Series {
            name,
            values: (0..categories.labels.len())
                .map(|c| samples.remove(&(s, c)).and_then(|mut vs| box_stats(&mut vs)))
                .collect(),
        })
        .collect();

    ChartData::Boxes {
        categories: categories.labels,
        series,
    }
}

/// Slices sum `values` per name. With a color column each slice takes the
/// color value of the first record carrying its name.
fn pie(records: &[&MovieRecord], names: Column, values: Column, color: Option<Column>) -> ChartData {
    let (categories, series) = sum_by_category(records, names, Some(values), None);
    let sums = series.into_iter().next().map(|s| s.values).unwrap_or_default();
    let total: f64 = sums.iter().sum();

    let mut groups: HashMap<String, String> = HashMap::new();
    if let Some(column) = color {
        for record in records {
            let group = column
                .categories(record)
                .first()
                .map(ToString::to_string)
                .unwrap_or_default();
            for key in names.categories(record) {
                groups.entry(key.to_string()).or_insert_with(|| group.clone());
            }
        }
    }

    let slices = categories
        .into_iter()
        .zip(sums)
        .map(|(label, value)| PieSlice {
            group: groups.remove(&label).unwrap_or_else(|| label.clone()),
            label,
            value,
            fraction: if total > 0.0 { value / total } else { 0.0 },
        })
        .collect();
    ChartData::Pie { slices }
}

/// Quartiles by linear interpolation; whiskers at the most extreme samples
/// within 1.5 IQR of the box.
pub fn box_stats(samples: &mut [f64]) -> Option<BoxStats> {
    if samples.is_empty() {
        return None;
    }
    samples.sort_by(f64::total_cmp);
    let q1 = quantile(samples, 0.25);
    let median = quantile(samples, 0.5);
    let q3 = quantile(samples, 0.75);
    let fence = 1.5 * (q3 - q1);
    let lower_whisker = samples.iter().copied().find(|&v| v >= q1 - fence).unwrap_or(q1);
    let upper_whisker = samples.iter().rev().copied().find(|&v| v <= q3 + fence).unwrap_or(q3);
    Some(BoxStats {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
    })
}

/// `q`-quantile of sorted, non-empty `sorted`.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
