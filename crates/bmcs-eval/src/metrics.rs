/// Confusion counts for a binary decision.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BinaryConfusion {
    pub true_positive: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_negative: usize,
}

impl BinaryConfusion {
    pub fn push(&mut self, actual: bool, predicted: bool) {
        match (actual, predicted) {
            (true, true)   => self.true_positive += 1,
            (false, true)  => self.false_positive += 1,
            (true, false)  => self.false_negative += 1,
            (false, false) => self.true_negative += 1,
        }
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        let mut confusion = Self::default();
        for (actual, predicted) in pairs {
            confusion.push(actual, predicted);
        }
        confusion
    }

    /// 0.0 when nothing was predicted positive.
    #[must_use]
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    /// 0.0 when there are no actual positives.
    #[must_use]
    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
