//! Scenario execution engine.

use std::time::Instant;

use crate::error::HarnessError;
use crate::scenarios::{SCENARIOS, Scenario, ScenarioReport, find};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome};

/// Totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

impl Summary {
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Skip => {}
            Outcome::Fail | Outcome::Error => self.failed += 1,
        }
    }
}

/// Runs scenarios and logs one entry per scenario.
pub struct ScenarioRunner {
    /// Name of the run, used as the trace id prefix.
    pub campaign: String,
    filter: Option<String>,
}

impl ScenarioRunner {
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            filter: None,
        }
    }

    /// Restricts the run to a single scenario.
    #[must_use]
    pub fn only(mut self, name: impl Into<String>) -> Self {
        self.filter = Some(name.into());
        self
    }

    fn selected(&self) -> Result<Vec<&'static Scenario>, HarnessError> {
        match &self.filter {
            None => Ok(SCENARIOS.iter().collect()),
            Some(name) => find(name)
                .map(|s| vec![s])
                .ok_or_else(|| HarnessError::UnknownScenario(name.clone())),
        }
    }

    /// Runs the selected scenarios in table order.
    ///
    /// # Errors
    ///
    /// [`HarnessError::UnknownScenario`] for a filter naming no scenario, or
    /// an I/O error from the log sink.
    pub fn run(
        &self,
        log: &mut LogEmitter,
    ) -> Result<(Summary, Vec<ScenarioReport>), HarnessError> {
        let selected = self.selected()?;
        log.emit_entry(
            LogEntry::new("", LogLevel::Info, "run_start")
                .with_details(serde_json::json!({ "campaign": self.campaign, "scenarios": selected.len() })),
        )?;

        let mut summary = Summary::default();
        let mut reports = Vec::with_capacity(selected.len());
        for scenario in selected {
            let started = Instant::now();
            let report = scenario.run();
            let latency = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
            summary.record(report.outcome);
            log.emit_entry(scenario_entry(&report, latency))?;
            reports.push(report);
        }

        log.emit_entry(
            LogEntry::new("", LogLevel::Info, "run_end").with_details(serde_json::json!({
                "total": summary.total,
                "passed": summary.passed,
                "failed": summary.failed,
            })),
        )?;
        log.flush()?;
        Ok((summary, reports))
    }
}

fn scenario_entry(report: &ScenarioReport, latency_ns: u64) -> LogEntry {
    let level = match report.outcome {
        Outcome::Pass | Outcome::Skip => LogLevel::Info,
        Outcome::Fail | Outcome::Error => LogLevel::Error,
    };
    let mut entry = LogEntry::new("", level, "scenario_result")
        .with_scenario(report.name)
        .with_outcome(report.outcome)
        .with_latency_ns(latency_ns)
        .with_details(serde_json::json!({ "transcript": report.transcript }));
    if let Some(code) = report.code {
        entry = entry.with_code(code);
    }
    entry
}
