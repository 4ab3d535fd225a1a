pub const POINTS_PER_MERGED_PR: u32 = 10;

/// Score together with the merged pull request count it was derived from.
///
/// Both values are always produced together so that
/// `score == merged_pr_count * POINTS_PER_MERGED_PR` holds for every snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreSnapshot {
    score: u32,
    merged_pr_count: u32,
}

impl ScoreSnapshot {
    pub fn from_merged_prs(merged_pr_count: u64) -> Self {
        let merged_pr_count = u32::try_from(merged_pr_count).unwrap_or(u32::MAX);
        // Scores are persisted as signed 32-bit integers.
        let merged_pr_count = merged_pr_count.min(i32::MAX as u32 / POINTS_PER_MERGED_PR);
        Self {
            score: merged_pr_count * POINTS_PER_MERGED_PR,
            merged_pr_count,
        }
    }

    /// Rebuilds a snapshot from persisted columns, rejecting pairs that drifted apart.
    pub fn from_stored(score: i64, merged_pr_count: i64) -> Option<Self> {
        let merged_pr_count = u32::try_from(merged_pr_count).ok()?;
        let score = u32::try_from(score).ok()?;
        if merged_pr_count.checked_mul(POINTS_PER_MERGED_PR)? != score {
            return None;
        }
        Some(Self {
            score,
            merged_pr_count,
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn merged_pr_count(&self) -> u32 {
        self.merged_pr_count
    }
}

/// Outcome of asking GitHub how many merged pull requests a user authored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrLookup {
    Found(u64),
    Unavailable(String),
}

impl PrLookup {
    pub fn snapshot(&self) -> Option<ScoreSnapshot> {
        match self {
            PrLookup::Found(count) => Some(ScoreSnapshot::from_merged_prs(*count)),
            PrLookup::Unavailable(_) => None,
        }
    }

    /// Collapses the lookup to a plain score, treating an unavailable lookup as zero.
    pub fn score(&self) -> u32 {
        self.snapshot().map(|s| s.score()).unwrap_or_default()
    }

    pub fn is_available(&self) -> bool {
        matches!(self, PrLookup::Found(_))
    }
}
