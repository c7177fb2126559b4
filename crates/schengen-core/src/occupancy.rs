//! Day-occupancy index.
//!
//! Days are addressed by their offset from the index origin, so the hot
//! per-day loop works on plain integers. A prefix-sum table answers "how
//! many occupied days in `[a, b]`" in constant time, which keeps the full
//! 180-day breakdown linear in the number of days evaluated.

use chrono::NaiveDate;

use crate::dates::day_offset;
use crate::types::{DateRange, Trip};

pub(crate) struct OccupancyIndex<'a> {
    span: DateRange,
    occupants: Vec<Vec<&'a str>>,
    // prefix[i] = occupied days in [origin, origin + i)
    prefix: Vec<u32>,
}

impl<'a> OccupancyIndex<'a> {
    /// Marks every day of `span` covered by at least one trip.
    ///
    /// Trips sharing a day are all recorded, but the day counts once.
    pub(crate) fn build<I>(trips: I, span: DateRange) -> Self
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        let len = span.len_days().max(0) as usize;
        let mut occupants: Vec<Vec<&'a str>> = vec![Vec::new(); len];

        for trip in trips {
            let Some(shared) = trip.range().intersection(&span) else {
                continue;
            };
            let from = day_offset(span.start, shared.start) as usize;
            let to = day_offset(span.start, shared.end) as usize;
            for slot in &mut occupants[from..=to] {
                slot.push(trip.id.as_str());
            }
        }

        let mut prefix = Vec::with_capacity(len + 1);
        prefix.push(0);
        let mut running = 0u32;
        for slot in &occupants {
            if !slot.is_empty() {
                running += 1;
            }
            prefix.push(running);
        }

        OccupancyIndex {
            span,
            occupants,
            prefix,
        }
    }

    fn slot(&self, date: NaiveDate) -> Option<usize> {
        if !self.span.contains(date) {
            return None;
        }
        Some(day_offset(self.span.start, date) as usize)
    }

    pub(crate) fn occupants(&self, date: NaiveDate) -> &[&'a str] {
        match self.slot(date) {
            Some(i) => &self.occupants[i],
            None => &[],
        }
    }

    pub(crate) fn is_occupied(&self, date: NaiveDate) -> bool {
        !self.occupants(date).is_empty()
    }

    /// Occupied days in `range`, clipped to the indexed span.
    pub(crate) fn count(&self, range: DateRange) -> u32 {
        match range.intersection(&self.span) {
            Some(shared) => {
                let lo = day_offset(self.span.start, shared.start) as usize;
                let hi = day_offset(self.span.start, shared.end) as usize;
                self.prefix[hi + 1] - self.prefix[lo]
            }
            None => 0,
        }
    }

    /// Earliest occupied day inside `range`.
    pub(crate) fn first_occupied(&self, range: DateRange) -> Option<NaiveDate> {
        let shared = range.intersection(&self.span)?;
        shared.days().find(|day| self.is_occupied(*day))
    }
}
