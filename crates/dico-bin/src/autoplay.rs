use dico_chart::Chart;

/// Precomputed tap times that play a chart perfectly, shifted by a fixed
/// accuracy offset.
#[derive(Debug, Clone)]
pub struct Autoplay {
    times: Vec<f64>,
    next: usize,
}

impl Autoplay {
    pub fn new(chart: &Chart, offset: f64) -> Self {
        let offset = if offset.is_finite() { offset } else { 0.0 };
        let times = chart.notes().iter().map(|n| n.t + offset).collect();
        Self { times, next: 0 }
    }

    /// Number of taps whose time is at or before `song_time`; they are
    /// consumed.
    pub fn due(&mut self, song_time: f64) -> usize {
        let start = self.next;
        while self.times.get(self.next).is_some_and(|&t| t <= song_time) {
            self.next += 1;
        }
        self.next - start
    }

    pub fn remaining(&self) -> usize {
        self.times.len() - self.next
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}
