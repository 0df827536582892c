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

#![allow(unused)]

//! batch processing of satellite fire detections into display ready fire map features.
//! The pipeline is
//!
//!   raw table → [`schema::normalize`] → [`clean::clean`] → [`regions::assign_regions`] → [`aggregate::aggregate`] 
//!             → [`sampling::sample_by_period`] → [`render::derive_features`]
//!
//! with [`summary::summarize_regions`] branching off the cleaned records. [`pipeline::run_pipeline`] runs all stages

pub mod errors;
pub mod config;
pub mod period;
pub mod schema;
pub mod clean;
pub mod regions;
pub mod aggregate;
pub mod sampling;
pub mod render;
pub mod summary;
pub mod output;
pub mod pipeline;

pub use errors::{OdinFiremapError, Result};
pub use config::{FiremapConfig, load_config};
pub use clean::{CleanRecord, CleaningReport, BatchStats, CleanOutcome};
pub use aggregate::Aggregate;
pub use render::RenderFeature;
pub use summary::RegionSummary;
pub use pipeline::{PipelineOutput, run_pipeline};
