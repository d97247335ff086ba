use uuid::Uuid;

/// Vertical hit-testing of timeline rows.
pub trait RowLookup {
    /// Row whose band contains screen-space `y`.
    fn row_at(&self, y: f32) -> Option<Uuid>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub id: Uuid,
    pub top: f32,
    pub bottom: f32,
}

/// Row bands as last laid out by the canvas. Rebuilt every frame.
#[derive(Debug, Clone, Default)]
pub struct RowRegistry {
    rows: Vec<RowBounds>,
}

impl RowRegistry {
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Record a row band. Re-registering an id replaces its bounds.
    pub fn register(&mut self, id: Uuid, top: f32, bottom: f32) {
        let (top, bottom) = if top <= bottom { (top, bottom) } else { (bottom, top) };
        match self.rows.iter_mut().find(|r| r.id == id) {
            Some(row) => {
                row.top = top;
                row.bottom = bottom;
            }
            None => self.rows.push(RowBounds { id, top, bottom }),
        }
    }
}

impl RowLookup for RowRegistry {
    fn row_at(&self, y: f32) -> Option<Uuid> {
        self.rows
            .iter()
            .find(|r| r.top <= y && y <= r.bottom)
            .map(|r| r.id)
    }
}
