use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use super::defaults::{EpicDefaults, PaletteDefaults};
use super::{Epic, EpicPatch, Sprint};
use crate::error::{Result, TimelineError};

/// A mutation routed from the timeline to the epic store.
#[derive(Debug, Clone, PartialEq)]
pub enum EpicCommand {
    Create { sprint_id: Uuid, name: String },
    Update { epic_id: Uuid, patch: EpicPatch },
    Delete { epic_id: Uuid },
}

/// Owner of the authoritative epic collection.
pub trait EpicStore {
    fn create_epic(&mut self, sprint_id: Uuid, name: &str) -> Result<Uuid>;
    fn update_epic(&mut self, epic_id: Uuid, patch: &EpicPatch) -> Result<()>;
    fn delete_epic(&mut self, epic_id: Uuid) -> Result<()>;

    fn apply(&mut self, command: EpicCommand) -> Result<()> {
        match command {
            EpicCommand::Create { sprint_id, name } => self.create_epic(sprint_id, &name).map(|_| ()),
            EpicCommand::Update { epic_id, patch } => self.update_epic(epic_id, &patch),
            EpicCommand::Delete { epic_id } => self.delete_epic(epic_id),
        }
    }
}

/// In-memory epic store: an ordered list of sprints.
#[derive(Debug)]
pub struct Board {
    pub sprints: Vec<Sprint>,
    defaults: Box<dyn EpicDefaults>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(Box::new(PaletteDefaults::default()))
    }
}

impl Board {
    pub fn new(defaults: Box<dyn EpicDefaults>) -> Self {
        Self {
            sprints: Vec::new(),
            defaults,
        }
    }

    pub fn add_sprint(&mut self, sprint: Sprint) -> Uuid {
        let id = sprint.id;
        self.sprints.push(sprint);
        id
    }

    pub fn epic(&self, id: Uuid) -> Option<&Epic> {
        self.sprints.iter().find_map(|s| s.epic(id))
    }

    /// All epics, in sprint order.
    pub fn epics(&self) -> impl Iterator<Item = &Epic> {
        self.sprints.iter().flat_map(|s| s.epics.iter())
    }

    pub fn epic_count(&self) -> usize {
        self.sprints.iter().map(|s| s.epics.len()).sum()
    }

    pub fn sprint_of(&self, epic_id: Uuid) -> Option<&Sprint> {
        self.sprints.iter().find(|s| s.epic(epic_id).is_some())
    }

    /// Create an epic that is already placed, using the defaults strategy
    /// for its color and date range.
    pub fn create_placed_epic(
        &mut self,
        sprint_id: Uuid,
        name: &str,
        anchor: NaiveDate,
    ) -> Result<Uuid> {
        let (start, end) = self.defaults.initial_range(anchor);
        let color = self.defaults.color();
        let sprint = self
            .sprints
            .iter_mut()
            .find(|s| s.id == sprint_id)
            .ok_or(TimelineError::UnknownSprint(sprint_id))?;
        let epic = Epic::placed(name, start, end, color);
        let id = epic.id;
        sprint.epics.push(epic);
        debug!(%id, %start, %end, "created placed epic");
        Ok(id)
    }
}

impl EpicStore for Board {
    fn create_epic(&mut self, sprint_id: Uuid, name: &str) -> Result<Uuid> {
        let sprint = self
            .sprints
            .iter_mut()
            .find(|s| s.id == sprint_id)
            .ok_or(TimelineError::UnknownSprint(sprint_id))?;
        let epic = Epic::new(name, self.defaults.color());
        let id = epic.id;
        sprint.epics.push(epic);
        debug!(%id, %sprint_id, "created unplaced epic");
        Ok(id)
    }

    fn update_epic(&mut self, epic_id: Uuid, patch: &EpicPatch) -> Result<()> {
        let epic = self
            .sprints
            .iter_mut()
            .find_map(|s| s.epic_mut(epic_id))
            .ok_or(TimelineError::UnknownEpic(epic_id))?;
        epic.apply(patch)
    }

    fn delete_epic(&mut self, epic_id: Uuid) -> Result<()> {
        for sprint in &mut self.sprints {
            if let Some(pos) = sprint.epics.iter().position(|e| e.id == epic_id) {
                sprint.epics.remove(pos);
                debug!(%epic_id, "deleted epic");
                return Ok(());
            }
        }
        Err(TimelineError::UnknownEpic(epic_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn board_with_sprint() -> (Board, Uuid) {
        let mut board = Board::default();
        let id = board.add_sprint(Sprint::new("Sprint 1", d(2024, 3, 1), d(2024, 3, 14)));
        (board, id)
    }

    #[test]
    fn create_appends_unplaced_epic() {
        let (mut board, sprint_id) = board_with_sprint();
        let a = board.create_epic(sprint_id, "First").unwrap();
        let b = board.create_epic(sprint_id, "").unwrap();
        let names: Vec<_> = board.epics().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["First", ""]);
        assert!(!board.epic(a).unwrap().is_placed);
        assert_ne!(board.epic(a).unwrap().color, board.epic(b).unwrap().color);
    }

    #[test]
    fn create_in_unknown_sprint_fails() {
        let (mut board, _) = board_with_sprint();
        let missing = Uuid::new_v4();
        assert!(matches!(
            board.create_epic(missing, "x"),
            Err(TimelineError::UnknownSprint(id)) if id == missing
        ));
        assert_eq!(board.epic_count(), 0);
    }

    #[test]
    fn update_and_delete_route_by_epic_id() {
        let (mut board, sprint_id) = board_with_sprint();
        let id = board.create_placed_epic(sprint_id, "Placed", d(2024, 3, 1)).unwrap();
        assert_eq!(board.epic(id).unwrap().dates(), Some((d(2024, 3, 1), d(2024, 3, 15))));

        board
            .apply(EpicCommand::Update {
                epic_id: id,
                patch: EpicPatch::dates(d(2024, 4, 1), d(2024, 4, 10)),
            })
            .unwrap();
        assert_eq!(board.epic(id).unwrap().dates(), Some((d(2024, 4, 1), d(2024, 4, 10))));
        assert_eq!(board.sprint_of(id).unwrap().id, sprint_id);

        board.apply(EpicCommand::Delete { epic_id: id }).unwrap();
        assert!(board.epic(id).is_none());
    }

    #[test]
    fn missing_epic_is_a_no_op_error() {
        let (mut board, sprint_id) = board_with_sprint();
        board.create_epic(sprint_id, "Keep").unwrap();
        let missing = Uuid::new_v4();
        assert!(board.update_epic(missing, &EpicPatch::renamed("x")).is_err());
        assert!(board.delete_epic(missing).is_err());
        assert_eq!(board.epic_count(), 1);
    }
}
