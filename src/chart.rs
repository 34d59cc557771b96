//! Declarative heatmap specification: axes, color scale, text overlay. The
//! specification is renderer-agnostic; see [`crate::render`] for the backends
//! that consume it.

use serde::Serialize;
use serde_json::{json, Value};

use crate::stats::TeamSeasonStat;

pub const TITLE: &str =
    "Average Difference Between Expected Away Goals and Actual Away Goals";
pub const WIDTH: u32 = 1150;
pub const HEIGHT: u32 = 300;

/// A positional (grid) encoding on a nominal axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Axis {
    pub field: &'static str,
    pub title: &'static str,
    pub label_angle: i16,
}

/// Data-derived fill color: a diverging scheme spanning the value extent,
/// with the neutral band at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScale {
    pub field: &'static str,
    pub scheme: &'static str,
    pub legend_title: &'static str,
}

/// The colored-grid layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RectLayer {
    pub x: Axis,
    pub y: Axis,
    pub color: ColorScale,
}

/// The value-annotation layer. Its color is fixed, never data-derived, which
/// is what keeps the annotations legible on every cell background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayer {
    pub field: &'static str,
    pub format: &'static str,
    pub font_weight: &'static str,
    pub color: &'static str,
}

/// One populated grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub team: String,
    pub season: i32,
    pub avg_goal_diff: f64,
}

/// The composite chart: grid layer and text overlay sharing the same axes,
/// plus fixed metadata. Any stats table, including an empty one, produces a
/// valid specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub title: &'static str,
    pub width: u32,
    pub height: u32,
    pub cells: Vec<Cell>,
    pub rect: RectLayer,
    pub text: TextLayer,
}
impl Heatmap {
    /// Teams on the x axis, in cell order, deduplicated.
    pub fn teams(&self) -> Vec<&str> {
        let mut teams: Vec<&str> = vec![];
        for cell in &self.cells {
            if !teams.contains(&cell.team.as_str()) {
                teams.push(&cell.team);
            }
        }
        teams
    }

    /// Seasons on the y axis, ascending, deduplicated.
    pub fn seasons(&self) -> Vec<i32> {
        let mut seasons: Vec<i32> = vec![];
        for cell in &self.cells {
            if !seasons.contains(&cell.season) {
                seasons.push(cell.season);
            }
        }
        seasons.sort_unstable();
        seasons
    }

    /// The Vega-Lite form of the specification; this is what the original
    /// analyst tooling consumed, and what the `json`/`html` output formats
    /// serialize.
    pub fn to_vega_lite(&self) -> Value {
        let x = json!({
            "field": self.rect.x.field,
            "type": "nominal",
            "title": self.rect.x.title,
            "axis": { "labelAngle": self.rect.x.label_angle }
        });
        let y = json!({
            "field": self.rect.y.field,
            "type": "nominal",
            "title": self.rect.y.title,
            "axis": { "labelAngle": self.rect.y.label_angle }
        });
        json!({
            "$schema": "https://vega.github.io/schema/vega-lite/v5.json",
            "title": self.title,
            "width": self.width,
            "height": self.height,
            "data": { "values": self.cells },
            "layer": [
                {
                    "mark": "rect",
                    "encoding": {
                        "x": x.clone(),
                        "y": y.clone(),
                        "color": {
                            "field": self.rect.color.field,
                            "type": "quantitative",
                            "scale": { "scheme": self.rect.color.scheme },
                            "legend": { "title": self.rect.color.legend_title }
                        }
                    }
                },
                {
                    "mark": { "type": "text", "fontWeight": self.text.font_weight },
                    "encoding": {
                        "x": x,
                        "y": y,
                        "text": { "field": self.text.field, "format": self.text.format },
                        "color": { "value": self.text.color }
                    }
                }
            ]
        })
    }
}

/// Maps the aggregated stats onto the fixed heatmap encoding.
pub fn heatmap(stats: &[TeamSeasonStat]) -> Heatmap {
    let cells = stats
        .iter()
        .map(|stat| Cell {
            team: stat.team.clone(),
            season: stat.season,
            avg_goal_diff: stat.avg_goal_diff,
        })
        .collect();
    let x = Axis {
        field: "team",
        title: "Team",
        label_angle: 0,
    };
    let y = Axis {
        field: "season",
        title: "Year",
        label_angle: 0,
    };
    Heatmap {
        title: TITLE,
        width: WIDTH,
        height: HEIGHT,
        cells,
        rect: RectLayer {
            x: x.clone(),
            y,
            color: ColorScale {
                field: "avg_goal_diff",
                scheme: "redyellowgreen",
                legend_title: "Avg Goal Difference",
            },
        },
        text: TextLayer {
            field: "avg_goal_diff",
            format: ".2f",
            font_weight: "bold",
            color: "black",
        },
    }
}
