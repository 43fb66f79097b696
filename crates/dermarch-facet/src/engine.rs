//! Single-pass histogram engine over image records.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use dermarch_model::{ImageRecord, MetadataValue};
use serde::{Deserialize, Serialize};

use crate::catalog::{FacetKind, FacetSpec};

/// Which datasets the viewer may see. Records from other datasets are
/// excluded before any counting happens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DatasetVisibility {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl DatasetVisibility {
    pub fn only<I, S>(datasets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Only(datasets.into_iter().map(Into::into).collect())
    }

    pub fn allows(&self, record: &ImageRecord) -> bool {
        match self {
            Self::All => true,
            Self::Only(datasets) => datasets.contains(&record.dataset),
        }
    }
}

/// One bin of a facet's distribution. Interval bins carry their bounds;
/// value bins carry only the label. A null label is the bin for records
/// without a usable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetBin {
    pub label: MetadataValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high_bound: Option<f64>,
    pub count: u64,
}

impl FacetBin {
    fn value(label: MetadataValue, count: u64) -> Self {
        Self {
            label,
            low_bound: None,
            high_bound: None,
            count,
        }
    }

    fn interval(low: f64, high: f64, count: u64) -> Self {
        Self {
            label: MetadataValue::Text(format!("[{low} - {high})")),
            low_bound: Some(low),
            high_bound: Some(high),
            count,
        }
    }
}

/// Distribution summary for one filtered pass over a record collection.
///
/// `count` is the number of records that passed visibility and criteria.
/// It is present even when zero records passed, and every configured
/// facet keys an entry, possibly with no bins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetHistogram {
    pub count: u64,
    pub facets: BTreeMap<String, Vec<FacetBin>>,
}

/// Sort key for value bins: by value, with the null bin last. Numeric
/// labels order numerically whether stored as integer or float, so equal
/// numbers merge into one bin.
struct LabelKey(MetadataValue);

impl LabelKey {
    fn rank(&self) -> u8 {
        match self.0 {
            MetadataValue::Flag(_) => 0,
            MetadataValue::Integer(_) | MetadataValue::Float(_) => 1,
            MetadataValue::Text(_) => 2,
            MetadataValue::Missing => 3,
        }
    }
}

impl Ord for LabelKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank()).then_with(|| match (&self.0, &other.0) {
            (MetadataValue::Flag(a), MetadataValue::Flag(b)) => a.cmp(b),
            (MetadataValue::Text(a), MetadataValue::Text(b)) => a.cmp(b),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                _ => Ordering::Equal,
            },
        })
    }
}

impl PartialOrd for LabelKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for LabelKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for LabelKey {}

enum Tally {
    Categorical(BTreeMap<LabelKey, u64>),
    Tag {
        tags: BTreeMap<String, u64>,
        untagged: u64,
    },
    Ordinal {
        boundaries: &'static [f64],
        bins: Vec<u64>,
        default: u64,
    },
}

impl Tally {
    fn new(kind: FacetKind) -> Self {
        match kind {
            FacetKind::Categorical => Self::Categorical(BTreeMap::new()),
            FacetKind::Tag => Self::Tag {
                tags: BTreeMap::new(),
                untagged: 0,
            },
            FacetKind::Ordinal { boundaries } => Self::Ordinal {
                boundaries,
                bins: vec![0; boundaries.len().saturating_sub(1)],
                default: 0,
            },
        }
    }

    fn add(&mut self, spec: &FacetSpec, record: &ImageRecord) {
        match self {
            Self::Categorical(values) => {
                let label = LabelKey(spec.resolve(record));
                *values.entry(label).or_insert(0) += 1;
            }
            Self::Tag { tags, untagged } => {
                if record.tags.is_empty() {
                    *untagged += 1;
                } else {
                    for tag in &record.tags {
                        *tags.entry(tag.clone()).or_insert(0) += 1;
                    }
                }
            }
            Self::Ordinal {
                boundaries,
                bins,
                default,
            } => {
                let slot = spec
                    .resolve(record)
                    .as_f64()
                    .and_then(|value| interval_index(boundaries, value));
                match slot {
                    Some(index) => bins[index] += 1,
                    None => *default += 1,
                }
            }
        }
    }

    /// Emits only bins something landed in, value bins sorted with null
    /// last, interval bins in boundary order with the default bin last.
    fn into_bins(self) -> Vec<FacetBin> {
        match self {
            Self::Categorical(values) => values
                .into_iter()
                .map(|(label, count)| FacetBin::value(label.0, count))
                .collect(),
            Self::Tag { tags, untagged } => {
                let mut bins: Vec<FacetBin> = tags
                    .into_iter()
                    .map(|(tag, count)| FacetBin::value(MetadataValue::Text(tag), count))
                    .collect();
                if untagged > 0 {
                    bins.push(FacetBin::value(MetadataValue::Missing, untagged));
                }
                bins
            }
            Self::Ordinal {
                boundaries,
                bins,
                default,
            } => {
                let mut out: Vec<FacetBin> = bins
                    .into_iter()
                    .enumerate()
                    .filter(|(_, count)| *count > 0)
                    .map(|(index, count)| {
                        FacetBin::interval(boundaries[index], boundaries[index + 1], count)
                    })
                    .collect();
                if default > 0 {
                    out.push(FacetBin::value(MetadataValue::Missing, default));
                }
                out
            }
        }
    }
}

fn interval_index(boundaries: &[f64], value: f64) -> Option<usize> {
    boundaries
        .windows(2)
        .position(|pair| pair[0] <= value && value < pair[1])
}

/// Builds the faceted histogram in one traversal of `records`.
///
/// A record is counted iff the viewer may see its dataset and it matches
/// `criteria`. The result keys every facet in `facets` even when nothing
/// was counted.
pub fn histogram<'a, I, F>(
    records: I,
    visibility: &DatasetVisibility,
    mut criteria: F,
    facets: &[FacetSpec],
) -> FacetHistogram
where
    I: IntoIterator<Item = &'a ImageRecord>,
    F: FnMut(&ImageRecord) -> bool,
{
    let mut count = 0u64;
    let mut tallies: Vec<Tally> = facets.iter().map(|spec| Tally::new(spec.kind)).collect();

    for record in records {
        if !visibility.allows(record) || !criteria(record) {
            continue;
        }
        count += 1;
        for (spec, tally) in facets.iter().zip(tallies.iter_mut()) {
            tally.add(spec, record);
        }
    }

    let facets = facets
        .iter()
        .zip(tallies)
        .map(|(spec, tally)| (spec.field.to_string(), tally.into_bins()))
        .collect();

    FacetHistogram { count, facets }
}
