mod config; // brings `config.rs` in as `crate::config`

use anyhow::Context;
use elevation_map_msg::{
    ElevationMap, GridMap, col_count, is_row_major, pack_color, pack_color_normalized, row_count,
    unpack_color,
};
use nalgebra::Vector2;
use tracing::{info, warn};
use tracing_subscriber::{self, EnvFilter};

use crate::config::{DEFAULT_CONFIG_PATH, Queries};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let settings = config::load_config(&path)
        .with_context(|| format!("Failed to load configuration from {path}"))?;
    let alignment = settings.alignment().context("Invalid alignment in configuration")?;

    let msg = settings.map.to_message();
    let layout = &msg.elevation.layout;
    info!(
        row_major = is_row_major(layout),
        rows = ?row_count(layout),
        cols = ?col_count(layout),
        "Elevation layout"
    );

    let grid = msg.grid_map().context("Failed to build grid map from message")?;
    info!(%alignment, "Grid map ready:\n{}", grid);

    run_queries(&msg, &grid, &settings.queries, &alignment);
    Ok(())
}

fn run_queries(
    msg: &ElevationMap,
    grid: &GridMap,
    queries: &Queries,
    alignment: &elevation_map_msg::Alignment,
) {
    for &[x, y] in &queries.indices {
        let index = Vector2::new(x, y);
        match grid.index_to_position(index, alignment) {
            Some(position) => info!(
                x,
                y,
                offset = ?grid.flatten_index(index),
                "Index -> position ({:.3}, {:.3})",
                position.x,
                position.y
            ),
            None => warn!(x, y, "Index outside buffer"),
        }
    }

    for &[px, py] in &queries.positions {
        let position = Vector2::new(px, py);
        match grid.position_to_index(&position, alignment) {
            Some(index) => {
                let cell = msg.cell_value(grid, index);
                info!(
                    px,
                    py,
                    valid = msg.is_valid_at(grid, index),
                    cell = ?cell,
                    "Position -> index ({}, {})",
                    index.x,
                    index.y
                );
            }
            None => warn!(px, py, "Position outside map"),
        }
    }

    for &value in &queries.colors {
        let rgb = pack_color(value);
        let normalized = pack_color_normalized(value);
        info!(
            round_trip = unpack_color(&rgb) == value,
            "Color 0x{:06x} -> ({}, {}, {}) / ({:.3}, {:.3}, {:.3})",
            value,
            rgb.x,
            rgb.y,
            rgb.z,
            normalized.x,
            normalized.y,
            normalized.z
        );
    }
}
