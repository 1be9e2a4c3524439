// Participation of the directors' organizations, from headcounts supplied by the caller.

use std::collections::HashMap;

use crate::aggregate::round2;

/// The number of people in each director's organization, per release.
///
/// The survey exports do not carry this information: it is provided separately.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct HeadcountTable {
    headcounts: HashMap<(String, String), u64>,
}

impl HeadcountTable {
    pub fn new() -> HeadcountTable {
        HeadcountTable::default()
    }

    pub fn insert(&mut self, release: &str, director: &str, headcount: u64) {
        self.headcounts
            .insert((release.to_string(), director.to_string()), headcount);
    }

    pub fn get(&self, release: &str, director: &str) -> Option<u64> {
        self.headcounts
            .get(&(release.to_string(), director.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.headcounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headcounts.is_empty()
    }

    /// The participation of a director's organization in a release, in percent.
    pub fn participation(&self, release: &str, director: &str, responses: u64) -> Option<f64> {
        self.get(release, director)
            .and_then(|hc| participation_rate(responses, hc))
    }
}

/// `100 * responses / headcount`, rounded to two decimals.
///
/// None when the headcount is zero.
pub fn participation_rate(responses: u64, headcount: u64) -> Option<f64> {
    if headcount == 0 {
        None
    } else {
        Some(round2(100.0 * responses as f64 / headcount as f64))
    }
}
