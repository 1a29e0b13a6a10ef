use hal::{ColorClassifier, Edge, EdgeSource};

/// Feeds the filter with a color once both sensor channels have new data
///
/// Each channel signals data ready with a falling edge on its interrupt
/// line. The classifier only runs after both lines fired since the last
/// classification.
pub struct ColorIntake<L, R, C> {
    left: L,
    right: R,
    classifier: C,
    left_ready: bool,
    right_ready: bool,
}

impl<L: EdgeSource, R: EdgeSource, C: ColorClassifier> ColorIntake<L, R, C> {
    pub fn new(left: L, right: R, classifier: C) -> Self {
        Self {
            left,
            right,
            classifier,
            left_ready: false,
            right_ready: false,
        }
    }

    /// Poll both lines; classify if both channels are ready
    pub fn poll(&mut self) -> Option<u8> {
        if self.left.poll_edge() == Some(Edge::Falling) {
            self.left_ready = true;
        }
        if self.right.poll_edge() == Some(Edge::Falling) {
            self.right_ready = true;
        }
        if !(self.left_ready && self.right_ready) {
            return None;
        }

        self.left_ready = false;
        self.right_ready = false;
        Some(self.classifier.classify())
    }

    pub fn classifier_mut(&mut self) -> &mut C {
        &mut self.classifier
    }
}
