/// Visual seam between the recognizer and the host UI toolkit.
///
/// One implementation per list row. `track` is called continuously during a
/// horizontal drag and must apply the translation without animation so the
/// row follows the finger; `release` restores the eased transition and
/// animates the row back to its rest position.
pub trait RowSurface {
    fn track(&mut self, dx_px: i32);
    fn release(&mut self);
}

/// Surface that renders nothing, for embeddings that only want callbacks.
pub struct NullSurface;

impl RowSurface for NullSurface {
    fn track(&mut self, _dx_px: i32) {}

    fn release(&mut self) {}
}
