use crate::game::{Board, Kinematics};
use crate::rules::Rules;

/// Whether moving one tick with `kin` forces a crash on `board`.
///
/// Every cell passed during the tick is checked, not only the landing cell.
/// On a hole tick (see [`Rules::is_hole_tick`]) the cells strictly between
/// the first and the last one are gaps and are not checked for occupancy;
/// leaving the board is a crash regardless.
pub fn will_crash(kin: &Kinematics, board: &Board, rules: &Rules) -> bool {
    let (dx, dy) = kin.direction.delta();
    let holes = rules.is_hole_tick(kin.speed, kin.step_counter);
    let (mut x, mut y) = (kin.x, kin.y);

    for s in 0..kin.speed {
        let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
            return true;
        };
        (x, y) = (nx, ny);
        if !board.in_bounds(x, y) {
            return true;
        }
        if holes && s != 0 && s != kin.speed - 1 {
            continue;
        }
        if board.is_occupied(x, y) {
            return true;
        }
    }

    false
}
