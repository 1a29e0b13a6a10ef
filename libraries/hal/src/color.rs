/// Color sensing interfaces
///
/// The two color sensor channels raise a data-ready line each time they finish
/// an integration. The lines are exposed as edge sources polled on every
/// scheduling tick instead of being read inside the localization logic.

/// Edge seen on a digital line since the last poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Rising,
    Falling,
}

/// Capability yielding edge events, polled once per scheduling tick
pub trait EdgeSource {
    /// Return the edge observed since the previous poll, if any
    fn poll_edge(&mut self) -> Option<Edge>;
}

/// External nearest-neighbor color classifier
///
/// Treated as opaque: it reads both sensor channels and maps their polar
/// features to a color id in `0..NUMBER_OF_COLORS`, or to the sentinel
/// `NUMBER_OF_COLORS` when no reliable classification is possible.
pub trait ColorClassifier {
    fn classify(&mut self) -> u8;
}
