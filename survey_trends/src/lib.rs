/*!
Follows the answers of a recurring survey over its releases.

Survey exports rarely keep the exact same questions from one release to the next: line breaks
appear, clarifications get appended, questions get reworded. This crate finds, in every release,
the column standing for a question, then computes the distribution of the answers.

```
use survey_trends::builder::Builder;
use survey_trends::*;

let releases = Builder::new()
    .release("August 2024", vec![
        RowRecord::from_pairs([("Q1", "Yes")]),
        RowRecord::from_pairs([("Q1", "No")]),
        RowRecord::from_pairs([("Q1", "Yes")]),
    ])
    .release("September 2024", vec![RowRecord::from_pairs([("Q1\r\n", "Yes")])])
    .build();

let series = compute_trends(&releases, "Q1", &TrendOptions::default());
let aug = series.get("August 2024").unwrap();
assert_eq!(aug.response_count(), 3);
assert_eq!(series.get("September 2024").unwrap().response_count(), 1);
```

See the [manual] for the matching rules.
*/

mod aggregate;
mod catalogue;
mod chronology;
mod config;
mod normalize;
mod participation;
mod resolver;
mod trends;

pub mod builder;
pub mod manual;

pub use crate::aggregate::{
    aggregate, aggregate_filtered, percentage, round2, AnswerHistogram, Distribution,
};
pub use crate::catalogue::{question_catalogue, CatalogueEntry};
pub use crate::chronology::{month_number, order, sort_releases, DEFAULT_YEAR, UNKNOWN_MONTH};
pub use crate::config::*;
pub use crate::normalize::normalize;
pub use crate::participation::{participation_rate, HeadcountTable};
pub use crate::resolver::{resolve, resolve_director_column, token_overlap};
pub use crate::trends::{
    compute_director_trends, compute_trends, compute_trends_filtered, compute_trends_where,
    director_breakdown, list_directors, respondents_by_director, DirectorSlice,
};
