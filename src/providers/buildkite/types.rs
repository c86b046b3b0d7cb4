use chrono::{DateTime, Utc};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::{BuildLensError, Result};

/// A single Buildkite build.
///
/// Only `id` is required and must be a string. Every other field may be
/// omitted or malformed; a value of the wrong shape reads as `None`. Fields
/// not listed here are ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Build {
    /// Build UUID
    pub id: String,
    /// Build number within the pipeline
    #[serde(default, deserialize_with = "lenient")]
    pub number: Option<u64>,
    /// Final or current state (e.g., "passed", "failed", "running")
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub web_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub commit: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub branch: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub finished_at: Option<DateTime<Utc>>,
    /// Jobs of this build; absent, `null` or non-array means none
    #[serde(default, deserialize_with = "lenient_jobs")]
    pub jobs: Vec<Job>,
}

/// A job within a Buildkite build.
///
/// Equality and hashing cover every field, which is what step
/// deduplication keys on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    /// Job kind (e.g., "script", "waiter", "manual", "trigger")
    #[serde(rename = "type", default, deserialize_with = "lenient")]
    pub kind: Option<String>,
    /// Step label; waiter jobs carry none
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub web_url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Returns the job name if it can act as a pipeline step.
    pub fn step_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value)
        .map_err(|e| debug!("Ignoring malformed build field: {e}"))
        .ok())
}

/// Keeps every job entry that is an object; other entries are skipped.
fn lenient_jobs<'de, D>(deserializer: D) -> std::result::Result<Vec<Job>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        other => {
            debug!("Ignoring non-array jobs field: {other}");
            return Ok(Vec::new());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| {
            serde_json::from_value(entry)
                .map_err(|e| debug!("Skipping malformed job entry: {e}"))
                .ok()
        })
        .collect())
}

/// Converts merged raw page records into typed builds.
///
/// The whole batch fails on the first record that is not an object with a
/// string `id`, so a build is never silently dropped from the step inventory.
pub fn deserialize_builds(records: Vec<Value>) -> Result<Vec<Build>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record)
                .map_err(|source| BuildLensError::InvalidBuild { index, source })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod deserialize_builds {
        use super::*;

        #[test]
        fn parses_builds_with_nested_jobs() {
            let records = vec![json!({
                "id": "0189-build",
                "number": 42,
                "state": "passed",
                "created_at": "2024-03-01T10:00:00.000Z",
                "jobs": [
                    {"id": "j1", "type": "script", "name": ":rust: test", "state": "passed"},
                    {"id": "j2", "type": "waiter"}
                ]
            })];

            let builds = deserialize_builds(records).unwrap();

            assert_eq!(builds.len(), 1);
            assert_eq!(builds[0].id, "0189-build");
            assert_eq!(builds[0].number, Some(42));
            assert_eq!(builds[0].jobs.len(), 2);
            assert_eq!(builds[0].jobs[0].name.as_deref(), Some(":rust: test"));
            assert_eq!(builds[0].jobs[0].kind.as_deref(), Some("script"));
            assert_eq!(builds[0].jobs[1].name, None);
        }

        #[test]
        fn ignores_unknown_fields() {
            let records = vec![json!({
                "id": "b1",
                "message": "Bump deps",
                "creator": {"name": "someone"},
                "jobs": [{"name": "lint", "agent": {"hostname": "ci-1"}}]
            })];

            let builds = deserialize_builds(records).unwrap();
            assert_eq!(builds[0].jobs[0].name.as_deref(), Some("lint"));
        }

        #[test]
        fn treats_missing_and_null_jobs_as_empty() {
            let records = vec![json!({"id": "b1"}), json!({"id": "b2", "jobs": null})];

            let builds = deserialize_builds(records).unwrap();
            assert!(builds.iter().all(|build| build.jobs.is_empty()));
        }

        #[test]
        fn fails_whole_batch_on_missing_id() {
            let records = vec![
                json!({"id": "b1", "jobs": []}),
                json!({"number": 7, "jobs": [{"name": "deploy"}]}),
            ];

            let err = deserialize_builds(records).unwrap_err();
            assert!(
                matches!(err, BuildLensError::InvalidBuild { index: 1, .. }),
                "Expected InvalidBuild at index 1, got {err:?}"
            );
        }

        #[test]
        fn tolerates_malformed_optional_fields() {
            let records = vec![json!({
                "id": "b1",
                "number": "42",
                "state": 3,
                "created_at": "yesterday",
                "finished_at": "2024-03-01T10:05:00Z",
                "jobs": [
                    {"name": "deploy", "started_at": "not a time", "type": ["script"]},
                    {"name": 17},
                    "waiter"
                ]
            })];

            let builds = deserialize_builds(records).unwrap();

            assert_eq!(builds.len(), 1);
            assert_eq!(builds[0].number, None);
            assert_eq!(builds[0].state, None);
            assert_eq!(builds[0].created_at, None);
            assert!(builds[0].finished_at.is_some());
            assert_eq!(builds[0].jobs.len(), 2);
            assert_eq!(builds[0].jobs[0].step_name(), Some("deploy"));
            assert_eq!(builds[0].jobs[0].started_at, None);
            assert_eq!(builds[0].jobs[0].kind, None);
            assert_eq!(builds[0].jobs[1].name, None);
        }

        #[test]
        fn treats_non_array_jobs_as_empty() {
            let records = vec![json!({"id": "b1", "jobs": {"name": "deploy"}})];

            let builds = deserialize_builds(records).unwrap();
            assert!(builds[0].jobs.is_empty());
        }

        #[test]
        fn fails_whole_batch_on_non_string_id() {
            let records = vec![json!({"id": "b1"}), json!({"id": 42, "state": "passed"})];

            let err = deserialize_builds(records).unwrap_err();
            assert!(matches!(err, BuildLensError::InvalidBuild { index: 1, .. }));
        }

        #[test]
        fn returns_empty_for_no_records() {
            assert!(deserialize_builds(Vec::new()).unwrap().is_empty());
        }
    }

    mod step_name {
        use super::*;

        fn job(name: Option<&str>) -> Job {
            Job {
                id: None,
                kind: None,
                name: name.map(ToString::to_string),
                state: None,
                web_url: None,
                started_at: None,
                finished_at: None,
            }
        }

        #[test]
        fn returns_non_empty_name() {
            assert_eq!(job(Some("deploy")).step_name(), Some("deploy"));
        }

        #[test]
        fn rejects_empty_and_missing_names() {
            assert_eq!(job(Some("")).step_name(), None);
            assert_eq!(job(None).step_name(), None);
        }
    }
}
