use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

/// Accumulates one outcome per file of a batch. Failures are counted in
/// full, but only the first `max_reported_errors` are kept for the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub success_count: usize,
    pub error_count: usize,
    pub errors: Vec<FileError>,
    #[serde(skip)]
    max_reported_errors: usize,
}

impl BatchReport {
    pub fn new(max_reported_errors: usize) -> Self {
        Self {
            success_count: 0,
            error_count: 0,
            errors: Vec::new(),
            max_reported_errors,
        }
    }

    pub fn record<T>(&mut self, file: &str, outcome: anyhow::Result<T>) -> Option<T> {
        match outcome {
            Ok(value) => {
                self.success_count += 1;
                Some(value)
            }
            Err(e) => {
                tracing::warn!("Batch action failed for {file}: {e:#}");
                self.error_count += 1;
                if self.errors.len() < self.max_reported_errors {
                    self.errors.push(FileError {
                        file: file.to_string(),
                        error: format!("{e:#}"),
                    });
                }
                None
            }
        }
    }

    pub fn processed(&self) -> usize {
        self.success_count + self.error_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_counts_every_failure_but_caps_list() {
        let mut report = BatchReport::new(2);
        report.record::<()>("a", Ok(()));
        for name in ["b", "c", "d"] {
            assert!(report.record::<()>(name, Err(anyhow!("boom"))).is_none());
        }

        assert_eq!(report.success_count, 1);
        assert_eq!(report.error_count, 3);
        assert_eq!(report.processed(), 4);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].file, "b");
        assert_eq!(report.errors[0].error, "boom");
    }

    #[test]
    fn test_record_returns_value() {
        let mut report = BatchReport::new(10);
        assert_eq!(report.record("a", Ok(3)), Some(3));
    }

    #[test]
    fn test_serialized_shape() {
        let mut report = BatchReport::new(10);
        report.record::<()>("x", Err(anyhow!("nope")));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["successCount"], 0);
        assert_eq!(value["errorCount"], 1);
        assert_eq!(value["errors"][0]["file"], "x");
        assert!(value.get("maxReportedErrors").is_none());
    }
}
