use core::fmt;
use std::sync::Arc;

/// Opaque identifier for a single unit of work, usually a file name or path.
///
/// Cloning is cheap: the identifier is shared, never copied.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Job(Arc<str>);

impl Job {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Builds `count` sequentially numbered jobs named
    /// `{prefix}{index:03}.{extension}`, with `index` starting at 1.
    ///
    /// An empty extension drops the trailing dot.
    pub fn numbered(prefix: &str, extension: &str, count: usize) -> Vec<Self> {
        (1..=count)
            .map(|index| {
                if extension.is_empty() {
                    Self::new(format!("{prefix}{index:03}"))
                } else {
                    Self::new(format!("{prefix}{index:03}.{extension}"))
                }
            })
            .collect()
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Job {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Job {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_jobs_are_zero_padded_and_one_based() {
        let jobs = Job::numbered("file_", "txt", 3);
        let names: Vec<_> = jobs.iter().map(Job::as_str).collect();
        assert_eq!(names, ["file_001.txt", "file_002.txt", "file_003.txt"]);
    }

    #[test]
    fn numbered_jobs_past_padding_width() {
        let jobs = Job::numbered("f", "", 1000);
        assert_eq!(jobs.len(), 1000);
        assert_eq!(jobs[998].as_str(), "f999");
        assert_eq!(jobs[999].as_str(), "f1000");
    }

    #[test]
    fn zero_jobs() {
        assert!(Job::numbered("file_", "txt", 0).is_empty());
    }

    #[test]
    fn display_matches_identifier() {
        let job = Job::from("reports/2024.csv");
        assert_eq!(job.to_string(), "reports/2024.csv");
        assert_eq!(job, Job::from(String::from("reports/2024.csv")));
    }
}
