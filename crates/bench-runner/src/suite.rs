use crate::config::SuiteDomainConfig;
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DOMAIN_FILE_NAME: &str = "domain.hddl";
const PROBLEM_EXTENSION: &str = "hddl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkProblem {
    pub domain: String,
    pub domain_file: PathBuf,
    pub problem_file: PathBuf,
}

impl BenchmarkProblem {
    pub fn problem_name(&self) -> String {
        let file = self
            .problem_file
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.problem_file.to_string_lossy().to_string());
        format!("{}/{}", self.domain, file)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BenchmarkSuite {
    pub problems: Vec<BenchmarkProblem>,
}

impl BenchmarkSuite {
    /// Every directory directly under `root` that holds a `domain.hddl` is a
    /// domain; its other `.hddl` files are the problems, in name order.
    pub fn discover(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(anyhow!(
                "benchmark root is not a directory: {}",
                root.display()
            ));
        }
        let domain_dirs: Vec<PathBuf> = WalkDir::new(root)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.into_path())
            .filter(|p| p.join(DOMAIN_FILE_NAME).is_file())
            .collect();

        let mut problems = Vec::new();
        for dir in domain_dirs {
            let domain = dir
                .file_name()
                .map(|s| s.to_string_lossy().to_string())
                .ok_or_else(|| anyhow!("domain directory without a name: {}", dir.display()))?;
            let domain_file = dir.join(DOMAIN_FILE_NAME);
            for entry in WalkDir::new(&dir)
                .min_depth(1)
                .max_depth(1)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if !entry.file_type().is_file()
                    || path.file_name().and_then(|s| s.to_str()) == Some(DOMAIN_FILE_NAME)
                    || path.extension().and_then(|s| s.to_str()) != Some(PROBLEM_EXTENSION)
                {
                    continue;
                }
                problems.push(BenchmarkProblem {
                    domain: domain.clone(),
                    domain_file: domain_file.clone(),
                    problem_file: path.to_path_buf(),
                });
            }
        }
        Ok(Self { problems })
    }

    pub fn from_entries(root: &Path, entries: &[SuiteDomainConfig]) -> Self {
        let mut problems = Vec::new();
        for entry in entries {
            let dir = root.join(&entry.domain);
            let domain_file = dir.join(
                entry
                    .domain_file
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DOMAIN_FILE_NAME)),
            );
            for problem in &entry.problems {
                problems.push(BenchmarkProblem {
                    domain: entry.domain.clone(),
                    domain_file: domain_file.clone(),
                    problem_file: dir.join(problem),
                });
            }
        }
        Self { problems }
    }

    pub fn retain_domains(&mut self, domains: &[String]) {
        if domains.is_empty() {
            return;
        }
        self.problems
            .retain(|p| domains.iter().any(|d| d.eq_ignore_ascii_case(&p.domain)));
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bench_core::ensure_dir;
    use chrono::Utc;
    use std::fs;

    fn scratch(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "bench_suite_{}_{}_{}",
            tag,
            std::process::id(),
            Utc::now().timestamp_micros()
        ))
    }

    #[test]
    fn discover_finds_domains_and_sorted_problems() {
        let root = scratch("discover");
        for (domain, files) in [
            ("Rover", vec!["domain.hddl", "p02.hddl", "p01.hddl", "notes.txt"]),
            ("Barman", vec!["domain.hddl", "pfile01.hddl"]),
            ("Scratch", vec!["p01.hddl"]),
        ] {
            let dir = root.join(domain);
            ensure_dir(&dir).expect("dir");
            for f in files {
                fs::write(dir.join(f), "(define)").expect("file");
            }
        }

        let suite = BenchmarkSuite::discover(&root).expect("discover");
        let names: Vec<String> = suite.problems.iter().map(|p| p.problem_name()).collect();
        assert_eq!(
            names,
            vec!["Barman/pfile01.hddl", "Rover/p01.hddl", "Rover/p02.hddl"]
        );
        assert_eq!(
            suite.problems[1].domain_file,
            root.join("Rover").join(DOMAIN_FILE_NAME)
        );
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn discover_rejects_missing_root() {
        assert!(BenchmarkSuite::discover(&scratch("missing")).is_err());
    }

    #[test]
    fn explicit_entries_keep_order_and_filter_by_domain() {
        let entries = vec![
            SuiteDomainConfig {
                domain: "Rover".to_string(),
                domain_file: None,
                problems: vec![PathBuf::from("p03.hddl"), PathBuf::from("p01.hddl")],
            },
            SuiteDomainConfig {
                domain: "Childsnack".to_string(),
                domain_file: Some(PathBuf::from("domain-alt.hddl")),
                problems: vec![PathBuf::from("p25.hddl")],
            },
        ];
        let root = Path::new("/bench");
        let mut suite = BenchmarkSuite::from_entries(root, &entries);
        assert_eq!(suite.len(), 3);
        assert_eq!(suite.problems[0].problem_name(), "Rover/p03.hddl");
        assert_eq!(
            suite.problems[2].domain_file,
            PathBuf::from("/bench/Childsnack/domain-alt.hddl")
        );

        suite.retain_domains(&["childsnack".to_string()]);
        assert_eq!(suite.len(), 1);
        assert_eq!(suite.problems[0].domain, "Childsnack");
    }
}
