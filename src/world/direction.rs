use crate::{pos, Pos};

/// Slot of a neighbor link. The order fixes iteration, not the rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Direction {
    pub const COUNT: usize = 8;

    pub const ALL: [Direction; Self::COUNT] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
        Direction::TopLeft,
        Direction::TopRight,
        Direction::BottomLeft,
        Direction::BottomRight,
    ];

    pub fn offset(self) -> Pos {
        match self {
            Direction::Right => pos!(1, 0),
            Direction::Down => pos!(0, 1),
            Direction::Left => pos!(-1, 0),
            Direction::Up => pos!(0, -1),
            Direction::TopLeft => pos!(-1, -1),
            Direction::TopRight => pos!(1, -1),
            Direction::BottomLeft => pos!(-1, 1),
            Direction::BottomRight => pos!(1, 1),
        }
    }
}

#[test]
fn test_offsets_cover_the_ring() {
    let mut offsets: Vec<_> = Direction::ALL.iter().map(|d| d.offset()).collect();
    offsets.sort_by_key(|p| (p.y, p.x));
    offsets.dedup();
    assert_eq!(offsets.len(), 8);
    assert!(!offsets.contains(&pos!(0, 0)));
    assert!(offsets.iter().all(|p| p.x.abs() <= 1 && p.y.abs() <= 1));
}

#[test]
fn test_slots_follow_declaration_order() {
    for (slot, direction) in Direction::ALL.iter().enumerate() {
        assert_eq!(*direction as usize, slot);
    }
}
