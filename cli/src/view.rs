//! Auto-ranging of the main plot, the way a plot widget frames new data.

use iquip_plots::{MainPlot, PlotKind, Rect, ViewBox};

/// View box showing all of the active viewer's data in a scene of `size`
pub fn fit(plot: &MainPlot, kind: PlotKind, size: (f64, f64)) -> Option<ViewBox> {
    let view = match kind {
        PlotKind::Curve => {
            let curve = plot.curve();
            let (x, width) = range(curve.x())?;
            let (y, height) = range(curve.y())?;
            Rect::new(x, y, width, height)
        }
        PlotKind::Image => plot.image().rect(),
    };
    let (width, height) = size;
    Some(ViewBox {
        scene: Rect::new(0.0, 0.0, width, height),
        view,
        invert_y: true,
    })
}

/// Lowest finite value and the span up to the highest; a flat range spans one
/// unit centred on its value
fn range(values: &[f64]) -> Option<(f64, f64)> {
    let finite = values.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        Some((min, max)) => Some((min.min(v), max.max(v))),
        None => Some((v, v)),
    })?;
    if max > min {
        Some((min, max - min))
    } else {
        Some((min - 0.5, 1.0))
    }
}
