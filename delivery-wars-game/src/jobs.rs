//! Job generation and the offered batch.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    JOB_BASE_PAY_MAX, JOB_BASE_PAY_MIN, JOB_BATCH_SIZE, JOB_DEADLINE_MAX, JOB_DEADLINE_MIN,
    JOB_DISTANCE_MAX, JOB_DISTANCE_MIN, JOB_ENFORCE_CAP, JOB_ENFORCE_MAX, JOB_ENFORCE_MIN,
    JOB_HEAT_ENFORCE_FACTOR, JOB_NIGHT_ENFORCE_RELIEF, JOB_PER_MILE_MAX, JOB_PER_MILE_MIN,
    JOB_PRIORITY_BONUS, JOB_SUGARTOWN_ENFORCE_BONUS,
};
use crate::rolls::Rolls;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JobKind {
    WarehouseRun,
    SugartownPriority,
    MedicalDrop,
    HighValueGift,
    NightLoop,
    DowntownBundle,
}

impl JobKind {
    pub const ALL: [Self; 6] = [
        Self::WarehouseRun,
        Self::SugartownPriority,
        Self::MedicalDrop,
        Self::HighValueGift,
        Self::NightLoop,
        Self::DowntownBundle,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::WarehouseRun => "Warehouse Run (Steppe)",
            Self::SugartownPriority => "Sugartown Priority",
            Self::MedicalDrop => "Medical Drop (Cold Chain)",
            Self::HighValueGift => "High-Value Gift (Human Tag)",
            Self::NightLoop => "Night Loop (Low Visibility)",
            Self::DowntownBundle => "Downtown Bundle",
        }
    }

    /// Gift and medical cargo pay a flat premium.
    #[must_use]
    pub const fn is_priority(self) -> bool {
        matches!(self, Self::MedicalDrop | Self::HighValueGift)
    }

    #[must_use]
    pub const fn zone(self) -> Zone {
        match self {
            Self::SugartownPriority => Zone::Sugartown,
            _ => Zone::Houston,
        }
    }

    /// Category shift applied to the baseline enforcement risk.
    #[must_use]
    pub const fn enforce_adjustment(self) -> i32 {
        match self {
            Self::SugartownPriority => JOB_SUGARTOWN_ENFORCE_BONUS,
            Self::NightLoop => -JOB_NIGHT_ENFORCE_RELIEF,
            _ => 0,
        }
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    Houston,
    Sugartown,
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Houston => f.write_str("Houston"),
            Self::Sugartown => f.write_str("Sugartown"),
        }
    }
}

/// Opaque job token, unique within a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub kind: JobKind,
    pub zone: Zone,
    /// Route length in miles.
    pub distance: u32,
    /// Delivery window in minutes. Flavor only; resolution ignores it.
    pub deadline: u32,
    pub base_pay: i64,
    /// Baseline enforcement risk percentage.
    pub enforce: i32,
}

impl Job {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.label()
    }
}

/// Draw one job. `serial` keeps ids unique; `heat` raises enforcement risk.
///
/// Draw order: kind, distance, deadline, base pay, per-mile rate,
/// enforcement baseline, id token.
pub fn generate_job<R: Rolls + ?Sized>(heat: i32, serial: u64, rolls: &mut R) -> Job {
    let kind = JobKind::ALL[rolls.index(JobKind::ALL.len())];
    let distance = rolls.int_between(JOB_DISTANCE_MIN, JOB_DISTANCE_MAX);
    let deadline = rolls.int_between(JOB_DEADLINE_MIN, JOB_DEADLINE_MAX);
    let base = rolls.int_between(JOB_BASE_PAY_MIN, JOB_BASE_PAY_MAX);
    let per_mile = rolls.int_between(JOB_PER_MILE_MIN, JOB_PER_MILE_MAX);
    let mut base_pay = i64::from(base) + i64::from(distance) * i64::from(per_mile);
    if kind.is_priority() {
        base_pay += JOB_PRIORITY_BONUS;
    }

    let baseline = rolls.int_between(JOB_ENFORCE_MIN, JOB_ENFORCE_MAX) + kind.enforce_adjustment();
    let enforce = (baseline + heat * JOB_HEAT_ENFORCE_FACTOR).clamp(0, JOB_ENFORCE_CAP);
    let token = rolls.token();

    Job {
        id: JobId(format!("{token:08x}-{serial}")),
        kind,
        zone: kind.zone(),
        distance: u32::try_from(distance).unwrap_or_default(),
        deadline: u32::try_from(deadline).unwrap_or_default(),
        base_pay,
        enforce,
    }
}

/// The batch of jobs currently on offer. Always holds exactly three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobBoard {
    jobs: [Job; JOB_BATCH_SIZE],
    issued: u64,
}

impl JobBoard {
    /// Fresh board with a full batch.
    pub fn generate<R: Rolls + ?Sized>(heat: i32, rolls: &mut R) -> Self {
        let mut issued = 0;
        let jobs = Self::draw_batch(heat, &mut issued, rolls);
        Self { jobs, issued }
    }

    /// Replace the whole batch.
    pub fn refresh<R: Rolls + ?Sized>(&mut self, heat: i32, rolls: &mut R) {
        self.jobs = Self::draw_batch(heat, &mut self.issued, rolls);
    }

    fn draw_batch<R: Rolls + ?Sized>(
        heat: i32,
        issued: &mut u64,
        rolls: &mut R,
    ) -> [Job; JOB_BATCH_SIZE] {
        std::array::from_fn(|_| {
            *issued += 1;
            generate_job(heat, *issued, rolls)
        })
    }

    #[must_use]
    pub const fn jobs(&self) -> &[Job; JOB_BATCH_SIZE] {
        &self.jobs
    }

    #[must_use]
    pub fn find(&self, id: &JobId) -> Option<&Job> {
        self.jobs.iter().find(|job| &job.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    /// Total jobs ever drawn for this board.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.issued
    }
}
