/*
 * Copyright © 2025, United States Government, as represented by the Administrator of 
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License"); 
 * you may not use this file except in compliance with the License. You may obtain a copy 
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

use thiserror::Error;

pub type Result<T> = std::result::Result<T, OdinFiremapError>;

#[derive(Error,Debug)]
pub enum OdinFiremapError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("CSV error {0}")]
    CsvError( #[from] csv::Error),

    #[error("serde error {0}")]
    SerdeError( #[from] serde_json::Error),

    #[error("config parse error {0}")]
    ConfigParseError( String ),

    #[error("invalid config {0}")]
    ConfigError( String ),

    #[error("malformed input {0}")]
    MalformedInput( String ),

    #[error("missing mandatory columns: {}", .0.join(", "))]
    MissingColumns( Vec<String> ),

    #[error("GeoJSON error {0}")]
    GeoJsonError( String ),

    #[error("operation failed {0}")]
    OpFailed( String ),
}

impl From<ron::error::SpannedError> for OdinFiremapError {
    fn from (e: ron::error::SpannedError)->Self {
        OdinFiremapError::ConfigParseError( e.to_string())
    }
}

impl From<geojson::Error> for OdinFiremapError {
    fn from (e: geojson::Error)->Self {
        OdinFiremapError::GeoJsonError( e.to_string())
    }
}

macro_rules! config_error {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinFiremapError::ConfigError( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use config_error;

macro_rules! malformed_input {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinFiremapError::MalformedInput( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use malformed_input;

macro_rules! op_failed {
    ($fmt:literal $(, $arg:expr )* ) => {
        $crate::errors::OdinFiremapError::OpFailed( format!( $fmt $(, $arg)* ))
    };
}
pub (crate) use op_failed;
