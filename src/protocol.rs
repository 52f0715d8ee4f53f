use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::base::Point;
use crate::entity::{EntityId, Explorer, MinionState, Slasher, SpawningMinion, Wanderer};
use crate::game::{Action, Effects, MatchRules, Snapshot, Yell};
use crate::grid::{Cell, Grid};

//////////////////////////////////////////////////////////////////////////////

// Errors

// Malformed judge input is an expected runtime failure, not a corrupted
// model: it gets a typed error and ends the run cleanly.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("i/o failure talking to the judge")]
    Io(#[from] io::Error),
    #[error("unexpected end of input")]
    Eof,
    #[error("malformed line {0:?}")]
    Malformed(String),
    #[error("unrecognized cell {0:?}")]
    UnknownCell(char),
    #[error("unrecognized entity type {0:?}")]
    UnknownEntityType(String),
    #[error("unrecognized state {0} for {1}")]
    UnknownState(i32, &'static str),
    #[error("snapshot contains no explorer")]
    MissingSelf,
}

//////////////////////////////////////////////////////////////////////////////

// Judge

// Line-oriented framing with the judge: the match header once, then one
// snapshot in and one action line out per tick. Generic over the streams
// so tests can drive it from strings.
pub struct Judge<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Judge<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    // Parsing

    pub fn read_match(&mut self) -> Result<(Grid, MatchRules), ProtocolError> {
        let width = self.expect_int()?;
        let height = self.expect_int()?;

        let mut data = Vec::with_capacity((width * height) as usize);
        for _ in 0..height {
            let row = self.expect_line()?;
            if row.chars().count() != width as usize {
                return Err(ProtocolError::Malformed(row));
            }
            for ch in row.chars() {
                data.push(parse_cell(ch)?);
            }
        }
        let grid = Grid::new(Point(width, height), data);

        let line = self.expect_line()?;
        let fields = parse_ints(&line, 4)?;
        let rules = MatchRules {
            sanity_loss_lonely: fields[0],
            sanity_loss_group: fields[1],
            wanderer_spawn_time: fields[2],
            wanderer_life_time: fields[3],
        };
        Ok((grid, rules))
    }

    // One full tick of entity rows. None once the judge closes the feed.
    pub fn read_snapshot(&mut self) -> Result<Option<Snapshot>, ProtocolError> {
        let Some(line) = self.next_line()? else { return Ok(None); };
        let count = parse_ints(&line, 1)?[0];

        let mut explorers: Vec<Explorer> = vec![];
        let mut wanderers: Vec<Wanderer> = vec![];
        let mut slashers: Vec<Slasher> = vec![];
        let mut spawnings: Vec<SpawningMinion> = vec![];
        let mut effects = Effects::default();

        for _ in 0..count {
            let line = self.expect_line()?;
            let mut tokens = line.split_whitespace();
            let kind = tokens.next().ok_or_else(|| ProtocolError::Malformed(line.clone()))?;

            let mut fields = [0; 6];
            for field in fields.iter_mut() {
                let token = tokens.next().ok_or_else(|| ProtocolError::Malformed(line.clone()))?;
                *field = token.parse::<i32>()
                              .map_err(|_| ProtocolError::Malformed(line.clone()))?;
            }
            let [id, x, y, param0, param1, param2] = fields;
            let (id, pos) = (EntityId(id), Point(x, y));

            match kind {
                "EXPLORER" => {
                    explorers.push(Explorer {
                        id, pos, sanity: param0, plans: param1, lights: param2,
                    });
                }
                "WANDERER" => match parse_state(param1, "WANDERER")? {
                    MinionState::Spawning => spawnings.push(SpawningMinion {
                        id, pos, state: MinionState::Spawning,
                        target: EntityId(param2), spawn_time: param0,
                    }),
                    MinionState::Wandering => wanderers.push(Wanderer {
                        id, pos, state: MinionState::Wandering,
                        target: EntityId(param2), recall_time: param0,
                    }),
                    _ => return Err(ProtocolError::UnknownState(param1, "WANDERER")),
                },
                "SLASHER" => match parse_state(param1, "SLASHER")? {
                    MinionState::Spawning => spawnings.push(SpawningMinion {
                        id, pos, state: MinionState::Spawning,
                        target: EntityId(param2), spawn_time: param0,
                    }),
                    state => slashers.push(Slasher {
                        id, pos, state,
                        target: EntityId(param2), change_state_time: param0,
                    }),
                },
                "EFFECT_PLAN" => effects.plans.push(EntityId(param1)),
                "EFFECT_LIGHT" => effects.lights.push(EntityId(param1)),
                "EFFECT_YELL" => effects.yells.push(Yell {
                    by: EntityId(param1), on: EntityId(param2),
                }),
                "EFFECT_SHELTER" => {}
                _ => return Err(ProtocolError::UnknownEntityType(kind.into())),
            }
        }

        if explorers.is_empty() { return Err(ProtocolError::MissingSelf); }

        // The judge lists our own explorer first.
        let me = explorers.remove(0);
        Ok(Some(Snapshot {
            me,
            allies: explorers,
            wanderers,
            slashers,
            spawnings,
            effects,
        }))
    }

    // Emission

    pub fn send(&mut self, action: &Action) -> Result<(), ProtocolError> {
        match action {
            Action::Move { target: Point(x, y), note } => {
                writeln!(self.output, "MOVE {} {} {}", x, y, note)?;
            }
            Action::Wait => writeln!(self.output, "WAIT holding still")?,
            Action::Plan => writeln!(self.output, "PLAN thinking it through")?,
            Action::Light => writeln!(self.output, "LIGHT burning it back")?,
            Action::Yell => writeln!(self.output, "YELL get moving")?,
        }
        self.output.flush()?;
        Ok(())
    }

    // Lower-level helpers

    fn next_line(&mut self) -> Result<Option<String>, ProtocolError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 { return Ok(None); }
        while line.ends_with('\n') || line.ends_with('\r') { line.pop(); }
        Ok(Some(line))
    }

    fn expect_line(&mut self) -> Result<String, ProtocolError> {
        self.next_line()?.ok_or(ProtocolError::Eof)
    }

    fn expect_int(&mut self) -> Result<i32, ProtocolError> {
        let line = self.expect_line()?;
        Ok(parse_ints(&line, 1)?[0])
    }
}

fn parse_cell(ch: char) -> Result<Cell, ProtocolError> {
    match ch {
        '#' => Ok(Cell::Wall),
        'w' => Ok(Cell::Spawn),
        'U' => Ok(Cell::Shelter),
        '.' => Ok(Cell::Empty),
        _ => Err(ProtocolError::UnknownCell(ch)),
    }
}

fn parse_state(raw: i32, kind: &'static str) -> Result<MinionState, ProtocolError> {
    match raw {
        0 => Ok(MinionState::Spawning),
        1 => Ok(MinionState::Wandering),
        2 => Ok(MinionState::Stalking),
        3 => Ok(MinionState::Rushing),
        4 => Ok(MinionState::Stunned),
        _ => Err(ProtocolError::UnknownState(raw, kind)),
    }
}

fn parse_ints(line: &str, n: usize) -> Result<Vec<i32>, ProtocolError> {
    let fields: Result<Vec<i32>, _> = line.split_whitespace()
                                          .map(|token| token.parse::<i32>())
                                          .collect();
    match fields {
        Ok(fields) if fields.len() == n => Ok(fields),
        _ => Err(ProtocolError::Malformed(line.into())),
    }
}

//////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn judge(input: &str) -> Judge<Cursor<Vec<u8>>, Vec<u8>> {
        Judge::new(Cursor::new(input.as_bytes().to_vec()), vec![])
    }

    const HEADER: &str = "5\n2\n#w.U.\n.....\n3 1 3 40\n";

    #[test]
    fn test_read_match_header() {
        let mut judge = judge(HEADER);
        let (grid, rules) = judge.read_match().unwrap();

        assert_eq!(grid.size(), Point(5, 2));
        assert_eq!(grid.get(Point(0, 0)), Cell::Wall);
        assert_eq!(grid.get(Point(1, 0)), Cell::Spawn);
        assert_eq!(grid.get(Point(3, 0)), Cell::Shelter);
        assert_eq!(grid.get(Point(4, 1)), Cell::Empty);

        assert_eq!(rules.sanity_loss_lonely, 3);
        assert_eq!(rules.wanderer_life_time, 40);
    }

    #[test]
    fn test_read_snapshot_classifies_entities() {
        let input = "\
8
EXPLORER 0 1 1 220 2 3
EXPLORER 1 2 1 180 1 0
WANDERER 10 3 1 12 1 0
WANDERER 11 4 1 5 0 -1
SLASHER 12 1 0 8 3 0
SLASHER 13 2 0 6 0 -1
EFFECT_YELL 20 0 0 2 0 1
EFFECT_SHELTER 21 3 0 5 0 -1
";
        let mut judge = judge(input);
        let snapshot = judge.read_snapshot().unwrap().unwrap();

        assert_eq!(snapshot.me.id, EntityId(0));
        assert_eq!(snapshot.me.pos, Point(1, 1));
        assert_eq!(snapshot.me.sanity, 220);
        assert_eq!((snapshot.me.plans, snapshot.me.lights), (2, 3));
        assert_eq!(snapshot.allies.len(), 1);
        assert_eq!(snapshot.allies[0].id, EntityId(1));

        // A spawning row lands in the spawning set whatever its feed kind.
        assert_eq!(snapshot.wanderers.len(), 1);
        assert_eq!(snapshot.wanderers[0].id, EntityId(10));
        assert_eq!(snapshot.slashers.len(), 1);
        assert_eq!(snapshot.slashers[0].state, MinionState::Rushing);
        let spawning_ids: Vec<_> = snapshot.spawnings.iter().map(|s| s.id).collect();
        assert_eq!(spawning_ids, vec![EntityId(11), EntityId(13)]);

        assert_eq!(snapshot.effects.yells.len(), 1);
        assert_eq!(snapshot.effects.yells[0].by, EntityId(0));
        assert_eq!(snapshot.effects.yells[0].on, EntityId(1));
    }

    #[test]
    fn test_read_snapshot_at_eof_ends_the_match() {
        let mut judge = judge("");
        assert!(judge.read_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_snapshot_without_explorer_is_an_error() {
        let mut judge = judge("1\nWANDERER 10 3 1 12 1 0\n");
        assert!(matches!(judge.read_snapshot(), Err(ProtocolError::MissingSelf)));
    }

    #[test]
    fn test_unknown_entity_type_is_an_error() {
        let mut judge = judge("1\nGHOST 1 0 0 0 0 0\n");
        assert!(matches!(judge.read_snapshot(),
                         Err(ProtocolError::UnknownEntityType(_))));
    }

    #[test]
    fn test_unknown_cell_is_an_error() {
        let mut judge = judge("1\n1\nX\n");
        assert!(matches!(judge.read_match(), Err(ProtocolError::UnknownCell('X'))));
    }

    #[test]
    fn test_wanderer_in_stalking_state_is_an_error() {
        let mut judge = judge("1\nWANDERER 10 3 1 12 2 0\n");
        assert!(matches!(judge.read_snapshot(),
                         Err(ProtocolError::UnknownState(2, "WANDERER"))));
    }

    #[test]
    fn test_truncated_snapshot_is_an_error() {
        let mut judge = judge("2\nEXPLORER 0 1 1 220 2 3\n");
        assert!(matches!(judge.read_snapshot(), Err(ProtocolError::Eof)));
    }

    #[test]
    fn test_full_tick_against_a_scripted_judge() {
        use crate::game::State;

        let input = "\
5
5
.....
.....
.....
.....
.....
3 1 3 40
2
EXPLORER 0 2 2 200 0 0
WANDERER 9 2 0 40 1 0
";
        let mut judge = judge(input);
        let (grid, rules) = judge.read_match().unwrap();
        let mut state = State::new(grid, rules);

        let snapshot = judge.read_snapshot().unwrap().unwrap();
        let action = state.tick(&snapshot);
        judge.send(&action).unwrap();

        // The wanderer two cells up is frightening; the far corner wins the
        // mean-distance score in row-major order.
        let output = String::from_utf8(judge.output.clone()).unwrap();
        assert_eq!(output, "MOVE 0 4 backing off\n");
        assert!(judge.read_snapshot().unwrap().is_none());
    }

    #[test]
    fn test_send_renders_protocol_lines() {
        let mut judge = judge("");
        judge.send(&Action::Move { target: Point(3, 4), note: "backing off" }).unwrap();
        judge.send(&Action::Wait).unwrap();
        judge.send(&Action::Plan).unwrap();
        judge.send(&Action::Light).unwrap();
        judge.send(&Action::Yell).unwrap();

        let output = String::from_utf8(judge.output).unwrap();
        assert_eq!(output, "\
MOVE 3 4 backing off
WAIT holding still
PLAN thinking it through
LIGHT burning it back
YELL get moving
");
    }
}
