//! Compensated running sum for sliding windows.

/// Neumaier-compensated sum.
///
/// A window can hold terms many orders of magnitude apart (a 1e16 gap next to a
/// one-tick move). Plain `+=`/`-=` drops the small term, and it stays lost after the
/// large one leaves the window. The compensation term keeps it.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct RollingSum {
    sum: f64,
    compensation: f64,
}

impl RollingSum {
    pub(crate) fn add(&mut self, x: f64) {
        let t = self.sum + x;
        if self.sum.abs() >= x.abs() {
            self.compensation += (self.sum - t) + x;
        } else {
            self.compensation += (x - t) + self.sum;
        }
        self.sum = t;
    }

    pub(crate) fn sub(&mut self, x: f64) {
        self.add(-x);
    }

    pub(crate) fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}
