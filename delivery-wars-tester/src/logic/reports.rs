use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::{GameplayStrategy, RunRecord};

/// Per-policy rollup of run records.
#[derive(Debug, Clone, Serialize)]
pub struct PolicySummary {
    pub policy: GameplayStrategy,
    pub runs: usize,
    pub passed: usize,
    pub mean_final_cash: f64,
    pub mean_fleet_size: f64,
    pub on_time_rate: f64,
    pub ticket_rate: f64,
    pub breakdown_rate: f64,
    pub insolvent_run_pct: f64,
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole <= 0.0 { 0.0 } else { part / whole }
}

#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn summarize(records: &[RunRecord]) -> Vec<PolicySummary> {
    GameplayStrategy::ALL
        .into_iter()
        .filter_map(|policy| {
            let runs: Vec<&RunRecord> = records
                .iter()
                .filter(|r| r.policy == Some(policy))
                .collect();
            if runs.is_empty() {
                return None;
            }
            let count = runs.len() as f64;
            let deliveries: f64 = runs.iter().map(|r| f64::from(r.deliveries)).sum();
            Some(PolicySummary {
                policy,
                runs: runs.len(),
                passed: runs.iter().filter(|r| r.passed()).count(),
                mean_final_cash: runs.iter().map(|r| r.final_cash as f64).sum::<f64>() / count,
                mean_fleet_size: runs.iter().map(|r| r.fleet_size as f64).sum::<f64>() / count,
                on_time_rate: ratio(
                    runs.iter().map(|r| f64::from(r.on_time)).sum(),
                    deliveries,
                ),
                ticket_rate: ratio(runs.iter().map(|r| f64::from(r.tickets)).sum(), deliveries),
                breakdown_rate: ratio(
                    runs.iter().map(|r| f64::from(r.breakdowns)).sum(),
                    deliveries,
                ),
                insolvent_run_pct: runs.iter().filter(|r| r.final_cash < 0).count() as f64
                    / count,
            })
        })
        .collect()
}

pub fn generate_console_report(
    out: &mut dyn Write,
    records: &[RunRecord],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Delivery Wars Run Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "============================".cyan())?;

    let total = records.len();
    let passed = records.iter().filter(|r| r.passed()).count();
    writeln!(out, "Total runs: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for record in records {
        let status = if record.passed() {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        let label = record.policy.map_or("Unknown", GameplayStrategy::label);
        writeln!(out, "{status} {} seed {}", label.bold(), record.seed)?;
        writeln!(
            out,
            "   Day {} • Cash {} • CARMA {} • Heat {} • Fleet {}",
            record.days_played + 1,
            delivery_wars_game::fmt_money(record.final_cash),
            record.final_carma,
            record.final_heat,
            record.fleet_size
        )?;
        writeln!(
            out,
            "   Deliveries {} (on time {}, tickets {}, breakdowns {}) • Refusals {}",
            record.deliveries, record.on_time, record.tickets, record.breakdowns, record.refusals
        )?;
        if !record.violations.is_empty() {
            writeln!(out, "   Violations:")?;
            for violation in &record.violations {
                writeln!(out, "     • {}", violation.red())?;
            }
        }
    }

    let summaries = summarize(records);
    if !summaries.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "🚚 Policy Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "=================".yellow())?;
        for summary in &summaries {
            writeln!(
                out,
                "{:10} runs {:3} • mean cash {:>9.0} • on-time {:5.1}% • tickets {:5.1}% • insolvent {:5.1}%",
                summary.policy.label(),
                summary.runs,
                summary.mean_final_cash,
                summary.on_time_rate * 100.0,
                summary.ticket_rate * 100.0,
                summary.insolvent_run_pct * 100.0
            )?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    runs: &'a [RunRecord],
    policies: Vec<PolicySummary>,
}

pub fn generate_json_report(out: &mut dyn Write, records: &[RunRecord]) -> Result<()> {
    let report = JsonReport {
        passed: records.iter().all(RunRecord::passed),
        runs: records,
        policies: summarize(records),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, records: &[RunRecord]) -> Result<()> {
    writeln!(out, "# Delivery Wars Run Results\n")?;

    let total = records.len();
    let passed = records.iter().filter(|r| r.passed()).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total runs**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}\n", total - passed)?;

    writeln!(out, "## Runs\n")?;
    writeln!(
        out,
        "| Policy | Seed | Cash | CARMA | Heat | Fleet | Deliveries | On time | Tickets | Status |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|---|---|---|")?;
    for record in records {
        writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            record.policy.map_or("Unknown", GameplayStrategy::label),
            record.seed,
            delivery_wars_game::fmt_money(record.final_cash),
            record.final_carma,
            record.final_heat,
            record.fleet_size,
            record.deliveries,
            record.on_time,
            record.tickets,
            if record.passed() { "✅" } else { "❌" }
        )?;
    }

    let failing: Vec<&RunRecord> = records.iter().filter(|r| !r.passed()).collect();
    if !failing.is_empty() {
        writeln!(out, "\n## Violations\n")?;
        for record in failing {
            let label = record.policy.map_or("Unknown", GameplayStrategy::label);
            writeln!(out, "### {label} seed {}\n", record.seed)?;
            for violation in &record.violations {
                writeln!(out, "- {violation}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(policy: GameplayStrategy, cash: i64, violations: Vec<String>) -> RunRecord {
        RunRecord {
            policy: Some(policy),
            seed: 9,
            days_played: 10,
            final_cash: cash,
            deliveries: 4,
            on_time: 3,
            tickets: 1,
            fleet_size: 1,
            violations,
            ..RunRecord::default()
        }
    }

    #[test]
    fn summary_groups_by_policy() {
        let records = vec![
            record(GameplayStrategy::Hustler, 1_000, Vec::new()),
            record(GameplayStrategy::Hustler, -200, Vec::new()),
            record(GameplayStrategy::Karmic, 500, Vec::new()),
        ];
        let summaries = summarize(&records);
        assert_eq!(summaries.len(), 2);
        let hustler = &summaries[0];
        assert_eq!(hustler.policy, GameplayStrategy::Hustler);
        assert_eq!(hustler.runs, 2);
        assert!((hustler.mean_final_cash - 400.0).abs() < 1e-9);
        assert!((hustler.on_time_rate - 0.75).abs() < 1e-9);
        assert!((hustler.insolvent_run_pct - 0.5).abs() < 1e-9);
    }

    #[test]
    fn markdown_lists_violations() {
        let records = vec![record(
            GameplayStrategy::Wildcard,
            10,
            vec!["heat 30 outside 0..=25".to_string()],
        )];
        let mut buf = Vec::new();
        generate_markdown_report(&mut buf, &records).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("# Delivery Wars Run Results"));
        assert!(text.contains("| Wildcard | 9 | $10 |"));
        assert!(text.contains("- heat 30 outside 0..=25"));
    }

    #[test]
    fn json_report_carries_pass_flag() {
        let records = vec![record(GameplayStrategy::Cautious, 10, Vec::new())];
        let mut buf = Vec::new();
        generate_json_report(&mut buf, &records).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["passed"], serde_json::Value::Bool(true));
        assert_eq!(value["runs"][0]["policy"], "cautious");
        assert_eq!(value["policies"][0]["runs"], 1);
    }
}
