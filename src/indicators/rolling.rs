// =============================================================================
// Rolling-window and exponential-smoothing primitives
// =============================================================================
//
// Every indicator in this crate is built from these transforms.  They all take
// an index-aligned column and return a column of the same length, with `None`
// marking positions that have no defined value:
//
//   simple_moving_average  mean of the last `window` values
//   rolling_sum            sum  of the last `window` values
//   rolling_std            sample standard deviation (n - 1) of the window
//   exponential_moving_average
//                          alpha = 2 / (span + 1), seeded by the first value
//
// Rolling windows are undefined for `i < window - 1` and whenever any value in
// the window is undefined, so warm-up compounds naturally when transforms are
// chained.
// =============================================================================

/// An index-aligned indicator column; `None` is the undefined marker.
pub type Column = Vec<Option<f64>>;

/// Lift raw prices into a fully defined column.
pub fn defined(values: &[f64]) -> Column {
    values.iter().copied().map(Some).collect()
}

/// First difference `x[i] - x[i-1]`, undefined at index 0.
pub fn diff(values: &[f64]) -> Column {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(None);
    out.extend(values.windows(2).map(|w| Some(w[1] - w[0])));
    out
}

/// Apply `f` to every complete, fully defined window ending at each index.
///
/// A result that overflows to ±∞ or NaN is reported as undefined.
fn rolling(
    series: &[Option<f64>],
    window: usize,
    f: impl Fn(&[Option<f64>]) -> f64,
) -> Column {
    let mut out = vec![None; series.len()];
    if window == 0 || series.len() < window {
        return out;
    }

    for (start, w) in series.windows(window).enumerate() {
        if w.iter().all(Option::is_some) {
            let value = f(w);
            out[start + window - 1] = value.is_finite().then_some(value);
        }
    }
    out
}

/// The shared value of a window whose entries are all identical.
fn flat_value(w: &[Option<f64>]) -> Option<f64> {
    let first = w.first().copied().flatten()?;
    w.iter().all(|v| *v == Some(first)).then_some(first)
}

fn mean(w: &[Option<f64>]) -> f64 {
    w.iter().flatten().sum::<f64>() / w.len() as f64
}

/// Simple moving average over `window` values.
///
/// A window of identical values averages to exactly that value.
pub fn simple_moving_average(series: &[Option<f64>], window: usize) -> Column {
    rolling(series, window, |w| flat_value(w).unwrap_or_else(|| mean(w)))
}

/// Rolling sum over `window` values.
pub fn rolling_sum(series: &[Option<f64>], window: usize) -> Column {
    rolling(series, window, |w| w.iter().flatten().sum::<f64>())
}

/// Sample standard deviation over `window` values.
///
/// A window of fewer than two values has no sample deviation, so `window < 2`
/// yields an all-undefined column.  A window of identical values has a
/// deviation of exactly 0.0.
pub fn rolling_std(series: &[Option<f64>], window: usize) -> Column {
    if window < 2 {
        return vec![None; series.len()];
    }
    rolling(series, window, |w| {
        if flat_value(w).is_some() {
            return 0.0;
        }
        let m = mean(w);
        let ss = w.iter().flatten().map(|x| (x - m).powi(2)).sum::<f64>();
        (ss / (w.len() as f64 - 1.0)).sqrt()
    })
}

/// Exponential moving average with smoothing factor `2 / (span + 1)`.
///
/// The recursion is seeded with the first defined value itself, so a fully
/// defined input yields a fully defined output from index 0.  Leading
/// undefined values stay undefined; an undefined value after the seed is
/// reported as undefined and leaves the running average untouched.
///
/// `span == 0` yields an all-undefined column.
pub fn exponential_moving_average(series: &[Option<f64>], span: usize) -> Column {
    if span == 0 {
        return vec![None; series.len()];
    }
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut prev: Option<f64> = None;
    series
        .iter()
        .map(|value| {
            let x = (*value)?;
            let ema = match prev {
                None => x,
                Some(p) => alpha * x + (1.0 - alpha) * p,
            };
            prev = Some(ema);
            Some(ema)
        })
        .collect()
}

/// Index of the first defined value, if any.
pub fn first_defined(series: &[Option<f64>]) -> Option<usize> {
    series.iter().position(Option::is_some)
}
