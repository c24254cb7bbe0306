/// Outcome of one score increase.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ScoreChange {
    pub old: u32,
    pub new: u32,
    /// Level thresholds crossed by this change, ascending.
    pub thresholds: Vec<u32>,
}

impl ScoreChange {
    #[must_use]
    pub fn delta(&self) -> u32 {
        self.new - self.old
    }
}

/// Score accumulation and level bookkeeping for one session.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Progression {
    score: u32,
    points_per_level: u32,
    double_active: bool,
}

impl Progression {
    #[must_use]
    pub fn new(points_per_level: u32) -> Self {
        Self {
            score: 0,
            points_per_level: points_per_level.max(1),
            double_active: false,
        }
    }

    /// Starts a session from an existing score, e.g. to replay a scenario.
    #[must_use]
    pub fn with_score(score: u32, points_per_level: u32) -> Self {
        Self {
            score,
            ..Self::new(points_per_level)
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Current level, starting at 1 and rising with every threshold.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.score / self.points_per_level + 1
    }

    #[must_use]
    pub fn is_double_active(&self) -> bool {
        self.double_active
    }

    pub fn set_double_active(&mut self, active: bool) {
        self.double_active = active;
    }

    /// Scores one food item: 2 points while the double modifier runs, else 1.
    pub fn on_food_eaten(&mut self) -> ScoreChange {
        let points = if self.double_active { 2 } else { 1 };
        self.add(points)
    }

    /// Scores a defeated AI snake: one point per segment.
    pub fn on_ai_defeated(&mut self, ai_length: usize) -> ScoreChange {
        self.add(u32::try_from(ai_length).unwrap_or(u32::MAX))
    }

    fn add(&mut self, points: u32) -> ScoreChange {
        let old = self.score;
        self.score = old.saturating_add(points);

        ScoreChange {
            old,
            new: self.score,
            thresholds: levels_crossed(old, self.score, self.points_per_level).collect(),
        }
    }
}

/// Every multiple of `step` in `(old, new]`, ascending.
pub fn levels_crossed(old: u32, new: u32, step: u32) -> impl Iterator<Item = u32> {
    let step = step.max(1);
    let first = (old / step + 1).saturating_mul(step);

    std::iter::successors(Some(first), move |threshold| threshold.checked_add(step))
        .take_while(move |threshold| *threshold <= new)
}
