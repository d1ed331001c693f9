//! Scales mapping data values to pixel positions
//!
//! These follow the D3 conventions the browser UI uses, so a layout
//! computed here lines up with what the UI would compute itself:
//!
//! - [`LinearScale`]: continuous numeric domain, with "nice" tick steps
//! - [`BandScale`]: one evenly padded band per category
//! - [`TimeScale`]: calendar dates, ticked once per year

use chrono::{Datelike, NaiveDate};

/// A tick mark: pixel position plus its text
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Tick {
    pub position: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub fn apply(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let span = d1 - d0;
        // A collapsed domain maps everything to the middle of the range
        let t = if span != 0.0 { (value - d0) / span } else { 0.5 };
        r0 + t * (r1 - r0)
    }

    /// Roughly `count` ticks at 1, 2 or 5 times a power of ten
    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let (mut start, mut stop) = self.domain;
        if stop < start {
            std::mem::swap(&mut start, &mut stop);
        }
        if start == stop || count == 0 {
            return vec![Tick { position: self.apply(start), label: format_tick(start, 1.0) }];
        }

        let step = tick_step(start, stop, count as f64);
        // Sub-unit steps work through the inverse to keep 0.1-style steps exact
        let inverse = if step < 1.0 { Some((1.0 / step).round()) } else { None };
        let (first, last) = match inverse {
            Some(inv) => ((start * inv).ceil() as i64, (stop * inv).floor() as i64),
            None => ((start / step).ceil() as i64, (stop / step).floor() as i64),
        };

        (first..=last)
            .map(|i| {
                let value = match inverse {
                    Some(inv) => i as f64 / inv,
                    None => i as f64 * step,
                };
                Tick { position: self.apply(value), label: format_tick(value, step) }
            })
            .collect()
    }
}

fn tick_step(start: f64, stop: f64, count: f64) -> f64 {
    let raw = (stop - start) / count;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    if error >= 50f64.sqrt() {
        power * 10.0
    } else if error >= 10f64.sqrt() {
        power * 5.0
    } else if error >= 2f64.sqrt() {
        power * 2.0
    } else {
        power
    }
}

fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{}", value.round() as i64)
    } else {
        let decimals = (-step.log10()).ceil().max(0.0) as usize;
        format!("{:.*}", decimals, value)
    }
}

/// Evenly spaced bands with inner and outer padding, centred in the range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    count: usize,
    start: f64,
    step: f64,
    bandwidth: f64,
    reversed: bool,
}

impl BandScale {
    /// `range` may run high to low; the first band then sits at the high end
    pub fn new(count: usize, range: (f64, f64), padding_inner: f64, padding_outer: f64) -> Self {
        let (r0, r1) = range;
        let reversed = r1 < r0;
        let (lo, hi) = if reversed { (r1, r0) } else { (r0, r1) };

        let n = count as f64;
        let step = (hi - lo) / (n - padding_inner + padding_outer * 2.0).max(1.0);
        let start = lo + (hi - lo - step * (n - padding_inner)) * 0.5;

        Self { count, start, step, bandwidth: step * (1.0 - padding_inner), reversed }
    }

    /// Leading edge (lowest pixel) of band `index`
    pub fn position(&self, index: usize) -> Option<f64> {
        if index >= self.count {
            return None;
        }
        let slot = if self.reversed { self.count - 1 - index } else { index };
        Some(self.start + self.step * slot as f64)
    }

    pub fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    pub fn step(&self) -> f64 {
        self.step
    }
}

/// Calendar dates mapped linearly by day number
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    pub domain: (NaiveDate, NaiveDate),
    linear: LinearScale,
}

impl TimeScale {
    pub fn new(domain: (NaiveDate, NaiveDate), range: (f64, f64)) -> Self {
        let days = |d: NaiveDate| d.num_days_from_ce() as f64;
        Self { domain, linear: LinearScale::new((days(domain.0), days(domain.1)), range) }
    }

    /// Smallest domain covering all `dates`
    pub fn extent<I: IntoIterator<Item = NaiveDate>>(dates: I) -> Option<(NaiveDate, NaiveDate)> {
        dates.into_iter().fold(None, |acc, d| match acc {
            None => Some((d, d)),
            Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
        })
    }

    pub fn apply(&self, date: NaiveDate) -> f64 {
        self.linear.apply(date.num_days_from_ce() as f64)
    }

    /// One tick per 1 January inside the domain, labelled with the year
    pub fn year_ticks(&self) -> Vec<Tick> {
        let (start, end) = self.domain;
        (start.year()..=end.year())
            .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
            .filter(|jan1| *jan1 >= start && *jan1 <= end)
            .map(|jan1| Tick { position: self.apply(jan1), label: jan1.format("%Y").to_string() })
            .collect()
    }
}
