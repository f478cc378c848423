use chrono::NaiveDate;

use crate::core::primitives::months_before;

/// Returns the samples whose date falls inside an inclusive window.
///
/// `dated` extracts the sample date so score snapshots and plain time series
/// share one filter.
#[must_use]
pub fn samples_in_date_window<T, F>(samples: &[T], start: NaiveDate, end: NaiveDate, dated: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> NaiveDate,
{
    let (min_d, max_d) = if start <= end {
        (start, end)
    } else {
        (end, start)
    };

    samples
        .iter()
        .filter(|sample| {
            let date = dated(sample);
            date >= min_d && date <= max_d
        })
        .cloned()
        .collect()
}

/// Keeps the samples dated no earlier than `months` before the newest sample.
#[must_use]
pub fn trailing_months<T, F>(samples: &[T], months: u32, dated: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> NaiveDate,
{
    let Some(last) = samples.last() else {
        return Vec::new();
    };
    let end = dated(last);
    samples_in_date_window(samples, months_before(end, months), end, dated)
}

/// Thins a series to at most roughly `max_points` samples.
///
/// Keeps every `ceil(len / max_points)`-th sample plus the final sample so the
/// newest value is always present. Returns the kept source indices.
#[must_use]
pub fn downsample_indices(len: usize, max_points: usize) -> Vec<usize> {
    if len <= max_points || max_points == 0 {
        return (0..len).collect();
    }
    let step = len.div_ceil(max_points);
    (0..len)
        .filter(|index| index % step == 0 || *index == len - 1)
        .collect()
}
