//! Per-page progress markers

/// How one marker should be drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerState {
    /// Before the active page
    Passed,
    /// The active page; `fill` is the live progress ratio
    Active { fill: f32 },
    /// The active page when it is also the last one
    Done,
    /// After the active page
    Upcoming,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub index: usize,
    pub state: MarkerState,
}

/// Build one marker per page. An empty deck has no markers.
pub fn markers(active: Option<usize>, len: usize, progress: f32) -> Vec<Marker> {
    let Some(active) = active.map(|index| index.min(len.saturating_sub(1))) else {
        return Vec::new();
    };
    let fill = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };

    (0..len)
        .map(|index| {
            let state = if index < active {
                MarkerState::Passed
            } else if index > active {
                MarkerState::Upcoming
            } else if index + 1 == len {
                MarkerState::Done
            } else {
                MarkerState::Active { fill }
            };
            Marker { index, state }
        })
        .collect()
}
