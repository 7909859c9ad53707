use crate::response::ResponseBuffer;

/// Sliding window over the three most recent scale responses.
///
/// Slot roles follow push order: the oldest surviving buffer is "previous",
/// the middle one is "center" (the candidate scale) and the newest is
/// "next". A push once the window is full evicts the previous slot; the
/// rotation moves ownership between slots without reallocating buffers.
#[derive(Debug, Default)]
pub struct ScaleWindow {
    slots: [Option<ResponseBuffer>; 3],
}

/// Borrowed view of a full window, handed to the extrema scan.
#[derive(Clone, Copy)]
pub struct ReadyWindow<'a> {
    pub previous: &'a ResponseBuffer,
    pub center: &'a ResponseBuffer,
    pub next: &'a ResponseBuffer,
}

impl ScaleWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the newest response, evicting the oldest once full.
    pub fn push(&mut self, buffer: ResponseBuffer) {
        self.slots[0] = self.slots[1].take();
        self.slots[1] = self.slots[2].take();
        self.slots[2] = Some(buffer);
    }

    pub fn is_ready(&self) -> bool {
        self.slots[0].is_some()
    }

    /// Returns the three slots once the window holds three scales.
    pub fn triple(&self) -> Option<ReadyWindow<'_>> {
        match &self.slots {
            [Some(previous), Some(center), Some(next)] => Some(ReadyWindow {
                previous,
                center,
                next,
            }),
            _ => None,
        }
    }
}
