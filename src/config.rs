use config::{Config, ConfigError, File, FileFormat};
use elevation_map_msg::{
    Alignment, ElevationMap, Float32MultiArray, GridLayout, MsgError, StorageIndex,
    UInt32MultiArray,
};
use nalgebra::{Matrix2, Vector2};
use serde::Deserialize;
use tracing::{error, info};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Map description and conversion queries read from a TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub map: MapSettings,
    /// Buffer-order to map-frame matrix, row by row. Defaults to `-I`.
    #[serde(default)]
    pub alignment: Option<[[i32; 2]; 2]>,
    #[serde(default)]
    pub queries: Queries,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapSettings {
    pub length_x: f64,
    pub length_y: f64,
    pub resolution: f64,
    #[serde(default)]
    pub position: [f64; 2],
    pub rows: u32,
    pub cols: u32,
    /// Label written into the first dimension descriptor.
    #[serde(default = "default_layout_label")]
    pub layout_label: String,
    #[serde(default)]
    pub data_offset: u32,
    /// (outer, inner) circular buffer start.
    #[serde(default)]
    pub start_index: [i32; 2],
    #[serde(default)]
    pub fill_elevation: f32,
    #[serde(default)]
    pub fill_variance: f32,
    #[serde(default)]
    pub fill_color: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Queries {
    #[serde(default)]
    pub indices: Vec<[i32; 2]>,
    #[serde(default)]
    pub positions: Vec<[f64; 2]>,
    #[serde(default)]
    pub colors: Vec<u32>,
}

fn default_layout_label() -> String {
    StorageIndex::Row.label().to_string()
}

impl Settings {
    pub fn alignment(&self) -> Result<Alignment, MsgError> {
        match self.alignment {
            Some([[a, b], [c, d]]) => Alignment::new(Matrix2::new(a, b, c, d)),
            None => Ok(Alignment::default()),
        }
    }
}

impl MapSettings {
    /// Builds a dense message with every cell set to the fill values.
    pub fn to_message(&self) -> ElevationMap {
        let (rows, cols) = (self.rows, self.cols);
        // Anything other than a column label is laid out row-major
        let grid = match StorageIndex::from_label(&self.layout_label) {
            Some(StorageIndex::Column) => GridLayout::column_major(rows, cols),
            _ => GridLayout::row_major(rows, cols),
        };
        let mut layout = GridLayout {
            data_offset: self.data_offset,
            ..grid
        }
        .to_multi_array();
        layout.dim[0].label.clone_from(&self.layout_label);
        let len = self.data_offset as usize + rows as usize * cols as usize;

        ElevationMap {
            length_in_x: self.length_x,
            length_in_y: self.length_y,
            resolution: self.resolution,
            position: Vector2::new(self.position[0], self.position[1]),
            outer_start_index: self.start_index[0],
            inner_start_index: self.start_index[1],
            elevation: Float32MultiArray {
                layout: layout.clone(),
                data: vec![self.fill_elevation; len],
            },
            variance: Float32MultiArray {
                layout: layout.clone(),
                data: vec![self.fill_variance; len],
            },
            color: UInt32MultiArray {
                layout,
                data: vec![self.fill_color; len],
            },
        }
    }
}

pub fn load_config(path: &str) -> Result<Settings, ConfigError> {
    info!("Attempting to load configuration from {}", path);

    let settings = Config::builder()
        .add_source(File::new(path, FileFormat::Toml).required(true))
        .build()
        .and_then(|config| config.try_deserialize::<Settings>());

    match settings {
        Ok(settings) => {
            info!("Successfully loaded configuration: {:?}", settings);
            Ok(settings)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
