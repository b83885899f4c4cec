use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

#[cfg(feature = "parallel-mapping")]
use rayon::prelude::*;

use crate::core::date_helper::DateHelper;
use crate::core::template::Template;
use crate::core::types::{Bucket, Timestamp};
use crate::error::{HeatmapError, HeatmapResult};

/// Raw samples attached to one subdomain bucket before aggregation.
pub type SampleList = SmallVec<[f64; 4]>;

/// How multiple raw samples landing in the same subdomain bucket combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationPolicy {
    /// Sum every usable sample.
    #[default]
    Sum,
    /// Keep only the most recently pushed usable sample.
    LastWriteWins,
    /// Treat more than one usable sample as a hard error.
    ErrorOnCollision,
}

/// Sparse dataset: domain-timestamp -> subdomain-timestamp -> sample list.
///
/// Borrowed read-only while a collection is filled; the engine never mutates
/// or retains it.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    samples: HashMap<Timestamp, HashMap<Timestamp, SampleList>>,
}

impl DataSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Groups raw `(timestamp, value)` samples into dataset form by
    /// normalizing each timestamp with both templates' `extract_unit`.
    pub fn group_samples<I>(
        samples: I,
        domain: &dyn Template,
        subdomain: &dyn Template,
    ) -> HeatmapResult<Self>
    where
        I: IntoIterator<Item = (Timestamp, f64)>,
    {
        let mut data = Self::new();
        for (ts, value) in samples {
            let domain_t = domain.extract_unit(ts)?;
            let subdomain_t = subdomain.extract_unit(ts)?;
            data.push(domain_t, subdomain_t, value);
        }
        Ok(data)
    }

    pub fn push(&mut self, domain_t: Timestamp, subdomain_t: Timestamp, value: f64) {
        self.samples
            .entry(domain_t)
            .or_default()
            .entry(subdomain_t)
            .or_default()
            .push(value);
    }

    #[must_use]
    pub fn samples(&self, domain_t: Timestamp, subdomain_t: Timestamp) -> Option<&[f64]> {
        self.samples
            .get(&domain_t)
            .and_then(|subdomains| subdomains.get(&subdomain_t))
            .map(SampleList::as_slice)
    }

    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.samples
            .values()
            .flat_map(HashMap::values)
            .map(SampleList::len)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn domain(&self, domain_t: Timestamp) -> Option<&HashMap<Timestamp, SampleList>> {
        self.samples.get(&domain_t)
    }
}

/// One subdomain cell of the joined grid: bucket position plus the aggregated
/// value, or the configured default when no usable sample exists.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubDomainCell {
    pub t: Timestamp,
    pub x: u32,
    pub y: u32,
    pub v: Option<f64>,
}

impl SubDomainCell {
    fn from_bucket(bucket: Bucket) -> Self {
        Self {
            t: bucket.t,
            x: bucket.x,
            y: bucket.y,
            v: None,
        }
    }
}

/// The enumerable grid consumed by the rendering layer: domain-start
/// timestamps mapped to chronologically ordered subdomain cells.
///
/// Insertion order is chronological and load-bearing; collections are
/// rebuilt whenever the window or dataset changes and owned by the caller.
#[derive(Debug, Clone, Default)]
pub struct DomainCollection {
    domains: IndexMap<Timestamp, Vec<SubDomainCell>>,
}

impl DomainCollection {
    /// Enumerates every domain bucket over the window and every subdomain
    /// bucket over each domain's full span, unfilled.
    ///
    /// A subdomain whose `t` falls outside the window but whose parent domain
    /// intersects it is still emitted; partial boundary domains are fully
    /// enumerated, not clipped. An empty or inverted window produces an empty
    /// collection.
    pub fn build(
        helper: &DateHelper,
        domain: &dyn Template,
        subdomain: &dyn Template,
        start: Timestamp,
        end: Timestamp,
    ) -> HeatmapResult<Self> {
        if end < start {
            return Ok(Self::default());
        }

        let mut spans = Vec::new();
        for bucket in domain.mapping(start, end)? {
            let domain_end = helper.next_start(domain.unit(), bucket.t)? - 1;
            spans.push((bucket.t, domain_end));
        }

        let cells = map_spans(subdomain, &spans)?;
        Ok(Self {
            domains: spans
                .iter()
                .map(|&(domain_t, _)| domain_t)
                .zip(cells)
                .collect(),
        })
    }

    /// Joins the dataset into the grid: each cell's `t` is normalized with
    /// the subdomain template's `extract_unit` and looked up, non-finite
    /// samples are skipped, and the surviving samples aggregate by `policy`
    /// with `default_value` as the fallback.
    ///
    /// Returns the number of skipped non-finite samples.
    pub fn fill(
        &mut self,
        data: &DataSet,
        subdomain: &dyn Template,
        policy: AggregationPolicy,
        default_value: Option<f64>,
    ) -> HeatmapResult<usize> {
        let mut skipped = 0usize;

        for (domain_t, cells) in &mut self.domains {
            let domain_samples = data.domain(*domain_t);

            for cell in cells.iter_mut() {
                let key = subdomain.extract_unit(cell.t)?;
                cell.v = match domain_samples.and_then(|subdomains| subdomains.get(&key)) {
                    Some(samples) => {
                        let usable: SampleList =
                            samples.iter().copied().filter(|v| v.is_finite()).collect();
                        skipped += samples.len() - usable.len();
                        aggregate(&usable, policy, *domain_t, key)?.or(default_value)
                    }
                    None => default_value,
                };
            }
        }

        Ok(skipped)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = Timestamp> + '_ {
        self.domains.keys().copied()
    }

    #[must_use]
    pub fn get(&self, domain_t: Timestamp) -> Option<&[SubDomainCell]> {
        self.domains.get(&domain_t).map(Vec::as_slice)
    }

    /// Domain at chronological position `index`.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<(Timestamp, &[SubDomainCell])> {
        self.domains
            .get_index(index)
            .map(|(domain_t, cells)| (*domain_t, cells.as_slice()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Timestamp, &[SubDomainCell])> {
        self.domains
            .iter()
            .map(|(domain_t, cells)| (*domain_t, cells.as_slice()))
    }
}

#[cfg(feature = "parallel-mapping")]
fn map_spans(
    subdomain: &dyn Template,
    spans: &[(Timestamp, Timestamp)],
) -> HeatmapResult<Vec<Vec<SubDomainCell>>> {
    spans
        .par_iter()
        .map(|&(start, end)| subdomain_cells(subdomain, start, end))
        .collect()
}

#[cfg(not(feature = "parallel-mapping"))]
fn map_spans(
    subdomain: &dyn Template,
    spans: &[(Timestamp, Timestamp)],
) -> HeatmapResult<Vec<Vec<SubDomainCell>>> {
    spans
        .iter()
        .map(|&(start, end)| subdomain_cells(subdomain, start, end))
        .collect()
}

fn subdomain_cells(
    subdomain: &dyn Template,
    start: Timestamp,
    end: Timestamp,
) -> HeatmapResult<Vec<SubDomainCell>> {
    Ok(subdomain
        .mapping(start, end)?
        .into_iter()
        .map(SubDomainCell::from_bucket)
        .collect())
}

fn aggregate(
    usable: &[f64],
    policy: AggregationPolicy,
    domain_t: Timestamp,
    subdomain_t: Timestamp,
) -> HeatmapResult<Option<f64>> {
    match policy {
        AggregationPolicy::Sum => Ok(if usable.is_empty() {
            None
        } else {
            Some(usable.iter().sum())
        }),
        AggregationPolicy::LastWriteWins => Ok(usable.last().copied()),
        AggregationPolicy::ErrorOnCollision => match usable {
            [] => Ok(None),
            [only] => Ok(Some(*only)),
            _ => Err(HeatmapError::SampleCollision {
                domain: domain_t,
                subdomain: subdomain_t,
            }),
        },
    }
}
