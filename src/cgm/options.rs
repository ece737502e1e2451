//! Metafile header options.
//!
//! Everything the writer emits before the picture body comes from
//! [`MetafileOptions`]. The defaults reproduce the header whiteboards have
//! always exchanged, and the whole set can be kept in a YAML file.

use serde::{Deserialize, Serialize};

use super::constants::{colour_mode, width_mode};
use crate::common::error::{Error, Result};

/// Header and picture descriptor settings for a metafile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetafileOptions {
    /// BegMF name
    pub metafile_name: String,
    /// MFDesc text
    pub description: String,
    /// BegPic name
    pub picture_name: String,
    /// VDCExt as (x1, y1, x2, y2)
    pub vdc_extent: [i16; 4],
    /// ColrMode value
    pub colour_mode: i16,
    /// EdgeWidthMode value, omitted when `None`
    pub edge_width_mode: Option<i16>,
    /// LineWidthMode value, omitted when `None`
    pub line_width_mode: Option<i16>,
    /// Whether to emit the NITF-CGM FontList
    pub font_list: bool,
    /// Whether to emit MFElemList
    pub element_list: bool,
}

impl Default for MetafileOptions {
    fn default() -> Self {
        Self {
            metafile_name: "Whiteboard CGM".to_string(),
            description: "NITF/CGM-APP-2.0.  Generated by CgmTool V. 1.0".to_string(),
            picture_name: "Whiteboard Glyphs".to_string(),
            vdc_extent: [0, 480, 640, 0],
            colour_mode: colour_mode::DIRECT,
            edge_width_mode: Some(width_mode::ABSOLUTE),
            line_width_mode: Some(width_mode::ABSOLUTE),
            font_list: false,
            element_list: false,
        }
    }
}

impl MetafileOptions {
    /// Parse options from YAML. Missing keys keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| Error::Yaml(format!("Failed to parse metafile options: {}", e)))
    }

    /// Serialize options to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| Error::Yaml(format!("Failed to serialize metafile options: {}", e)))
    }

    /// Read options from a YAML file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }
}
