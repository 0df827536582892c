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

use anyhow::Result;
use odin_firemap::OdinFiremapError;
use odin_firemap::schema::{CanonicalField, ColumnMapping, RawTable, normalize};

const FIRMS_CSV: &str = "\
LATITUDE,Longitude,brightness,scan,track,acq_date,acq_time,satellite,instrument,confidence,version,bright_t31,frp,daynight,type
37.5,-120.2,320.5,1.1,1.0,2023-07-15,0142,Terra,MODIS,77,6.1NRT,290.1,12.3,D,0
38.1,-121.7,305.0,1.0,1.0,2023-07-16,2135,Aqua,MODIS,55,6.1NRT,288.0,,N,0
";

#[test]
fn test_csv_normalize()->Result<()> {
    let table = RawTable::from_csv_reader( FIRMS_CSV.as_bytes())?;
    assert_eq!( table.len(), 2);

    let canonical = normalize( &table, &ColumnMapping::default())?;
    println!("columns: {:?}", canonical.columns);

    assert_eq!( canonical.len(), 2);
    assert_eq!( canonical.columns[0], "latitude");
    assert_eq!( canonical.columns[1], "longitude");
    assert!( canonical.columns.contains( &"fire_radiative_power".to_string()));
    assert!( canonical.columns.contains( &"type".to_string())); // unknown column is passed through

    let r = &canonical.records[0];
    assert_eq!( r.latitude.as_deref(), Some("37.5"));
    assert_eq!( r.get(CanonicalField::Time), Some("0142"));
    assert_eq!( r.get(CanonicalField::BrightnessT31), Some("290.1"));
    assert_eq!( r.extra.get("type").map(|s| s.as_str()), Some("0"));

    let r = &canonical.records[1];
    assert!( r.fire_radiative_power.is_none()); // empty cell
    Ok(())
}

#[test]
fn test_first_duplicate_wins()->Result<()> {
    let table = RawTable::from_strs( 
        &["lat", "Latitude", "lon", "brightness", "scan", "track", "date"],
        &[ &["40.0", "41.0", "-100.0", "310", "1", "1", "2023-01-01"] ]
    )?;
    let canonical = normalize( &table, &ColumnMapping::default())?;

    assert_eq!( canonical.columns[0], "latitude");
    assert_eq!( canonical.columns[1], "Latitude");
    assert_eq!( canonical.records[0].latitude.as_deref(), Some("40.0"));
    assert_eq!( canonical.records[0].extra.get("Latitude").map(|s| s.as_str()), Some("41.0"));
    Ok(())
}

#[test]
fn test_missing_columns() {
    let table = RawTable::from_strs( &["latitude", "longitude", "scan"], &[ &["40.0", "-100.0", "1.0"] ]).unwrap();
    match normalize( &table, &ColumnMapping::default()) {
        Err(OdinFiremapError::MissingColumns(missing)) => {
            println!("missing: {:?}", missing);
            assert_eq!( missing, vec!["brightness".to_string(), "track".to_string(), "date".to_string()]);
        }
        other => panic!("expected missing columns error, got {:?}", other)
    }
}

#[test]
fn test_custom_alias()->Result<()> {
    let mapping = ColumnMapping::default().with_alias( "Bright_TI4_K", CanonicalField::Brightness);
    assert_eq!( mapping.resolve("bright_ti4_k"), Some(CanonicalField::Brightness));
    assert_eq!( mapping.resolve(" LAT "), Some(CanonicalField::Latitude));
    assert_eq!( mapping.resolve("foo"), None);
    Ok(())
}

#[test]
fn test_ragged_rows() {
    let csv = "latitude,longitude\n1.0,2.0\n3.0\n";
    let res = RawTable::from_csv_reader( csv.as_bytes());
    assert!( matches!( res, Err(OdinFiremapError::MalformedInput(_))));

    let mut table = RawTable::new( vec!["a".to_string(), "b".to_string()]);
    assert!( table.push( vec!["1".to_string()]).is_err());

    let other = RawTable::new( vec!["a".to_string()]);
    assert!( table.append( other).is_err());
}
