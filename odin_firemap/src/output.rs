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

//! GeoJSON export of render features

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};

use crate::errors::{Result, op_failed};
use crate::render::RenderFeature;

/// a GeoJSON point feature with all non-positional feature attributes as properties
pub fn to_feature (f: &RenderFeature)->Result<Feature> {
    let mut properties: JsonObject = match serde_json::to_value(f)? {
        serde_json::Value::Object(map) => map,
        _ => return Err( op_failed!("render feature does not serialize into an object"))
    };
    properties.remove("latitude");
    properties.remove("longitude");

    Ok( Feature {
        bbox: None,
        geometry: Some( Geometry::new( Value::Point( vec![f.longitude, f.latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None
    })
}

pub fn to_feature_collection (features: &[RenderFeature])->Result<FeatureCollection> {
    let features = features.iter().map( to_feature).collect::<Result<Vec<Feature>>>()?;
    Ok( FeatureCollection { bbox: None, features, foreign_members: None } )
}
