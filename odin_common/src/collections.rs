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

use std::collections::HashMap;
use std::hash::Hash;

/// the most frequent item of a sequence. Ties are resolved in favor of the item that was seen first
pub fn most_frequent<T,I> (items: I)->Option<T> where T: Eq + Hash + Clone, I: IntoIterator<Item=T> {
    let mut counts: HashMap<T,(usize,usize)> = HashMap::new(); // item -> (count, first position)
    for (i,it) in items.into_iter().enumerate() {
        counts.entry(it).or_insert((0,i)).0 += 1;
    }

    counts.into_iter()
        .max_by( |(_,(c1,p1)), (_,(c2,p2))| c1.cmp(c2).then( p2.cmp(p1)))
        .map( |(it,_)| it)
}
