use icu_collator::{Collator, CollatorOptions};
use indexmap::IndexSet;

use super::types::{Build, Job};
use crate::error::{BuildLensError, Result};

/// Derives the pipeline step list from a set of builds.
///
/// Jobs from every build are deduplicated on full equality, jobs without a
/// usable name are dropped, and the remaining names are deduplicated again
/// and sorted with root-locale collation. Lowercase sorts before uppercase
/// and unaccented before accented, matching `localeCompare`.
pub fn normalize_steps(builds: &[Build]) -> Result<Vec<String>> {
    let collator = Collator::try_new(&Default::default(), CollatorOptions::new())
        .map_err(|e| BuildLensError::Collation(e.to_string()))?;

    let unique_jobs: IndexSet<&Job> = builds.iter().flat_map(|build| &build.jobs).collect();

    let step_names: IndexSet<&str> = unique_jobs
        .into_iter()
        .filter_map(Job::step_name)
        .collect();

    let mut steps: Vec<String> = step_names.into_iter().map(ToString::to_string).collect();

    // Collation can tie on canonically equivalent strings; fall back to code points.
    steps.sort_by(|a, b| collator.compare(a, b).then_with(|| a.cmp(b)));

    Ok(steps)
}
