//! Rendering of a [`Heatmap`](crate::chart::Heatmap) specification to disk.
//! The destination extension selects the backend: raster (`png`) and vector
//! (`svg`) go through plotters, while `json` and `html` serialize the
//! Vega-Lite form of the specification.

use std::fs;
use std::path::Path;

use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, TextStyle};
use thiserror::Error;

use crate::chart::Heatmap;

// ColorBrewer RdYlGn anchors.
const LOW: RGBColor = RGBColor(165, 0, 38);
const MID: RGBColor = RGBColor(255, 255, 191);
const HIGH: RGBColor = RGBColor(0, 104, 55);

const TITLE_FONT_SIZE: f64 = 18.0;
const LABEL_FONT_SIZE: f64 = 13.0;
const MARGIN: i32 = 10;
const TITLE_GUTTER: i32 = 30;
const LEFT_GUTTER: i32 = 50;
const BOTTOM_GUTTER: i32 = 30;
const LEGEND_GUTTER: i32 = 130;
const LEGEND_BAR_WIDTH: i32 = 18;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(
        "cannot determine an output format from '{path}': supported \
         extensions are png, svg, json and html"
    )]
    UnknownFormat { path: String },

    #[error("cannot render '{path}': {message}")]
    Backend { path: String, message: String },

    #[error("cannot write '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Png,
    Svg,
    Json,
    Html,
}
impl Format {
    pub fn from_path(path: &Path) -> Result<Self, RenderError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .map(str::to_lowercase);
        match extension.as_deref() {
            Some("png") => Ok(Format::Png),
            Some("svg") => Ok(Format::Svg),
            Some("json") => Ok(Format::Json),
            Some("html") => Ok(Format::Html),
            _ => Err(RenderError::UnknownFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Writes the rendered heatmap to `path`, in the format implied by its
/// extension.
pub fn save(heatmap: &Heatmap, path: &Path) -> Result<(), RenderError> {
    match Format::from_path(path)? {
        Format::Png => {
            let root =
                BitMapBackend::new(path, (heatmap.width, heatmap.height)).into_drawing_area();
            draw(&root, heatmap).map_err(|err| backend_error(path, err))
        }
        Format::Svg => {
            let root = SVGBackend::new(path, (heatmap.width, heatmap.height)).into_drawing_area();
            draw(&root, heatmap).map_err(|err| backend_error(path, err))
        }
        Format::Json => {
            let spec = serde_json::to_string_pretty(&heatmap.to_vega_lite())
                .map_err(|err| backend_error(path, err))?;
            write_file(path, &spec)
        }
        Format::Html => write_file(path, &embed_page(heatmap)),
    }
}

fn write_file(path: &Path, content: &str) -> Result<(), RenderError> {
    fs::write(path, content).map_err(|source| RenderError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn backend_error<E: std::error::Error>(path: &Path, err: E) -> RenderError {
    RenderError::Backend {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

/// A self-contained vega-embed page, equivalent to what the original analyst
/// tooling emitted for `.html` destinations.
fn embed_page(heatmap: &Heatmap) -> String {
    let spec = heatmap.to_vega_lite();
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
  <script src="https://cdn.jsdelivr.net/npm/vega@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-lite@5"></script>
  <script src="https://cdn.jsdelivr.net/npm/vega-embed@6"></script>
</head>
<body>
  <div id="vis"></div>
  <script>vegaEmbed("#vis", {spec});</script>
</body>
</html>
"##
    )
}

fn lerp(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let channel = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(
        channel(from.0, to.0),
        channel(from.1, to.1),
        channel(from.2, to.2),
    )
}

/// Diverging RdYlGn fill for a differential. The domain is symmetric about
/// zero so the neutral yellow always lands on zero, regardless of how skewed
/// the value extent is.
fn diverging(value: f64, extent: f64) -> RGBColor {
    if extent <= 0.0 {
        return MID;
    }
    let t = (value / extent).clamp(-1.0, 1.0);
    if t < 0.0 {
        lerp(MID, LOW, -t)
    } else {
        lerp(MID, HIGH, t)
    }
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    heatmap: &Heatmap,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE)?;
    let (width, height) = root.dim_in_pixel();

    // title placed manually rather than through DrawingArea::titled, which
    // measures the font and fails on systems without one
    let title_style = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        TITLE_FONT_SIZE,
        FontStyle::Normal,
    ))
    .color(&BLACK)
    .pos(Pos::new(HPos::Center, VPos::Top));
    root.draw(&Text::new(
        String::from(heatmap.title),
        (width as i32 / 2, MARGIN),
        title_style,
    ))?;

    let teams = heatmap.teams();
    let seasons = heatmap.seasons();
    if teams.is_empty() || seasons.is_empty() {
        return root.present();
    }

    let plot_x0 = MARGIN + LEFT_GUTTER;
    let plot_y0 = MARGIN + TITLE_GUTTER;
    let plot_w = width as i32 - plot_x0 - MARGIN - LEGEND_GUTTER;
    let plot_h = height as i32 - plot_y0 - MARGIN - BOTTOM_GUTTER;
    let cell_w = plot_w as f64 / teams.len() as f64;
    let cell_h = plot_h as f64 / seasons.len() as f64;

    let extent = heatmap
        .cells
        .iter()
        .map(|cell| cell.avg_goal_diff.abs())
        .fold(0.0, f64::max);

    let label_style = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        LABEL_FONT_SIZE,
        FontStyle::Normal,
    ))
    .color(&BLACK);
    let value_style = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        LABEL_FONT_SIZE,
        FontStyle::Bold,
    ))
    .color(&BLACK)
    .pos(Pos::new(HPos::Center, VPos::Center));

    for cell in &heatmap.cells {
        // teams() and seasons() are derived from the cells, so both lookups
        // always succeed
        let (Some(col), Some(row)) = (
            teams.iter().position(|team| *team == cell.team),
            seasons.iter().position(|season| *season == cell.season),
        ) else {
            continue;
        };
        let x0 = plot_x0 + (col as f64 * cell_w) as i32;
        let y0 = plot_y0 + (row as f64 * cell_h) as i32;
        let x1 = plot_x0 + ((col + 1) as f64 * cell_w) as i32;
        let y1 = plot_y0 + ((row + 1) as f64 * cell_h) as i32;
        root.draw(&Rectangle::new(
            [(x0, y0), (x1, y1)],
            diverging(cell.avg_goal_diff, extent).filled(),
        ))?;
        root.draw(&Text::new(
            format!("{:.2}", cell.avg_goal_diff),
            ((x0 + x1) / 2, (y0 + y1) / 2),
            value_style.clone(),
        ))?;
    }

    // axis labels: team names below each column, unrotated; seasons beside
    // each row
    for (col, team) in teams.iter().enumerate() {
        let x = plot_x0 + ((col as f64 + 0.5) * cell_w) as i32;
        root.draw(&Text::new(
            String::from(*team),
            (x, plot_y0 + plot_h + 6),
            label_style.pos(Pos::new(HPos::Center, VPos::Top)),
        ))?;
    }
    for (row, season) in seasons.iter().enumerate() {
        let y = plot_y0 + ((row as f64 + 0.5) * cell_h) as i32;
        root.draw(&Text::new(
            season.to_string(),
            (plot_x0 - 6, y),
            label_style.pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
    }

    draw_legend(root, heatmap, extent, &label_style)?;
    root.present()
}

fn draw_legend<DB>(
    root: &DrawingArea<DB, Shift>,
    heatmap: &Heatmap,
    extent: f64,
    label_style: &TextStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>>
where
    DB: DrawingBackend,
{
    let (width, height) = root.dim_in_pixel();
    let bar_x0 = width as i32 - MARGIN - LEGEND_GUTTER + 10;
    let bar_y0 = MARGIN + 20;
    let bar_h = height as i32 - bar_y0 - MARGIN - BOTTOM_GUTTER;

    root.draw(&Text::new(
        String::from(heatmap.rect.color.legend_title),
        (bar_x0, MARGIN + 4),
        label_style.pos(Pos::new(HPos::Left, VPos::Top)),
    ))?;

    // positive values at the top of the bar
    for step in 0..bar_h {
        let value = extent * (1.0 - 2.0 * step as f64 / bar_h as f64);
        root.draw(&Rectangle::new(
            [
                (bar_x0, bar_y0 + step),
                (bar_x0 + LEGEND_BAR_WIDTH, bar_y0 + step + 1),
            ],
            diverging(value, extent).filled(),
        ))?;
    }

    let ticks = [
        (extent, bar_y0),
        (0.0, bar_y0 + bar_h / 2),
        (-extent, bar_y0 + bar_h),
    ];
    for (value, y) in ticks {
        root.draw(&Text::new(
            format!("{value:.2}"),
            (bar_x0 + LEGEND_BAR_WIDTH + 6, y),
            label_style.pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }
    Ok(())
}
