//! Batch pipeline for charting away-side over/under-performance against an
//! expected goals (xG) model. Ingests one CSV of match results per season,
//! keeps only teams that played away in every season, averages the difference
//! between actual and expected away goals per (season, team), and renders the
//! result as an annotated heatmap.

pub mod chart;
pub mod data;
pub mod print;
pub mod render;
pub mod stats;
