//! Exact versus estimated distinct counting of client addresses.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use tabled::settings::{Settings, Style};
use tabled::{Table, Tabled};
use tracing::info;

use crate::cardinality::{Cardinality, HyperLogLog};
use crate::error::ConfigError;
use crate::logs::extract_ip;

/// Lines between two progress events.
pub const PROGRESS_INTERVAL: usize = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Lines read.
    pub lines: usize,
    /// Lines without a valid address.
    pub skipped: usize,
    /// Distinct addresses reported by the counter.
    pub distinct: usize,
}

/// Feeds the address of every line into `counter`.
pub fn count_distinct<S, C>(lines: &[S], counter: &mut C) -> Tally
where
    S: AsRef<str>,
    C: Cardinality<str> + ?Sized,
{
    let total = lines.len();
    let mut tally = Tally::default();
    for line in lines {
        tally.lines += 1;
        match extract_ip(line.as_ref()) {
            Some(ip) => counter.insert(&ip),
            None => tally.skipped += 1,
        }
        if tally.lines % PROGRESS_INTERVAL == 0 {
            info!(processed = tally.lines, total, "counting addresses");
        }
    }
    tally.distinct = counter.count();
    info!(
        lines = tally.lines,
        skipped = tally.skipped,
        distinct = tally.distinct,
        "processing complete"
    );
    tally
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub tally: Tally,
    pub elapsed: Duration,
}

fn measure<S, C>(lines: &[S], mut counter: C) -> Measurement
where
    S: AsRef<str>,
    C: Cardinality<str>,
{
    let start = Instant::now();
    let tally = count_distinct(lines, &mut counter);
    Measurement {
        tally,
        elapsed: start.elapsed(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub exact: Measurement,
    pub estimated: Measurement,
}

#[derive(Tabled)]
struct Row {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Exact count")]
    exact: String,
    #[tabled(rename = "HyperLogLog")]
    estimated: String,
}

impl Comparison {
    /// `|estimated - exact| / exact`, or 0 when nothing was counted.
    pub fn relative_error(&self) -> f64 {
        let exact = self.exact.tally.distinct as f64;
        if exact == 0. {
            return 0.;
        }
        (self.estimated.tally.distinct as f64 - exact).abs() / exact
    }

    pub fn table(&self) -> String {
        let rows = vec![
            Row {
                metric: "Unique elements",
                exact: format!("{:.1}", self.exact.tally.distinct as f64),
                estimated: format!("{:.1}", self.estimated.tally.distinct as f64),
            },
            Row {
                metric: "Elapsed (s)",
                exact: format!("{:.2}", self.exact.elapsed.as_secs_f64()),
                estimated: format!("{:.2}", self.estimated.elapsed.as_secs_f64()),
            },
        ];
        let table_config = Settings::default().with(Style::markdown());
        Table::new(rows).with(table_config).to_string()
    }
}

/// Counts distinct addresses in `lines` exactly and with a
/// `HyperLogLog` of the given precision.
pub fn compare<S: AsRef<str>>(lines: &[S], precision: u8) -> Result<Comparison, ConfigError> {
    let hll = HyperLogLog::new(precision)?;
    let footprint = hll.memory_footprint();

    info!("starting exact counting");
    let exact = measure(lines, HashSet::<String>::new());
    info!("starting hyperloglog counting");
    let estimated = measure(lines, hll);

    let comparison = Comparison { exact, estimated };
    info!(
        precision,
        footprint,
        relative_error = comparison.relative_error(),
        "comparison finished"
    );
    Ok(comparison)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access_log(distinct: usize, repeats: usize) -> Vec<String> {
        let mut lines = Vec::new();
        for round in 0..repeats {
            for i in 0..distinct {
                let ip = format!("10.{}.{}.{}", i / 65536, (i / 256) % 256, i % 256);
                if round % 2 == 0 {
                    lines.push(format!(r#"{{"remote_addr": "{ip}", "status": 200}}"#));
                } else {
                    lines.push(format!(r#"{ip} - - "GET / HTTP/1.1" 200"#));
                }
            }
        }
        lines.push("malformed line".to_owned());
        lines
    }

    #[test]
    fn test_count_distinct_exact() {
        let lines = access_log(100, 3);
        let mut set = HashSet::<String>::new();

        let tally = count_distinct(&lines, &mut set);

        assert_eq!(
            tally,
            Tally {
                lines: 301,
                skipped: 1,
                distinct: 100
            }
        );
    }

    #[test]
    fn test_count_distinct_empty() {
        let lines: Vec<String> = Vec::new();
        let mut hll = HyperLogLog::new(10).unwrap();
        assert_eq!(count_distinct(&lines, &mut hll), Tally::default());
    }

    #[test]
    fn test_compare() {
        let lines = access_log(5_000, 2);
        let comparison = compare(&lines, 14).unwrap();

        assert_eq!(comparison.exact.tally.distinct, 5_000);
        assert_eq!(comparison.exact.tally.lines, comparison.estimated.tally.lines);
        assert!(
            comparison.relative_error() < 0.05,
            "relative error {}",
            comparison.relative_error()
        );
    }

    #[test]
    fn test_compare_rejects_precision() {
        let lines = access_log(1, 1);
        assert!(compare(&lines, 2).is_err());
    }

    #[test]
    fn test_table() {
        let comparison = Comparison {
            exact: Measurement {
                tally: Tally {
                    lines: 10,
                    skipped: 0,
                    distinct: 7,
                },
                elapsed: Duration::from_millis(1500),
            },
            estimated: Measurement {
                tally: Tally {
                    lines: 10,
                    skipped: 0,
                    distinct: 8,
                },
                elapsed: Duration::from_millis(250),
            },
        };

        let table = comparison.table();
        assert!(table.contains("Unique elements"));
        assert!(table.contains("7.0"));
        assert!(table.contains("8.0"));
        assert!(table.contains("1.50"));
        assert!(table.contains("0.25"));
        assert!((comparison.relative_error() - 1. / 7.).abs() < 1e-12);
    }
}
