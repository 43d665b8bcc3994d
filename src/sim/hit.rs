//! Shot resolution against live targets
//!
//! Nearest target wins: the closest unhit target is selected first, and the
//! shot only counts if that distance is strictly inside its hit radius.
//! Equal distances resolve to the lowest target id.

use glam::Vec2;

use super::state::Target;

/// Index and distance of the closest unhit target to `at`
pub fn nearest_live_target(targets: &[Target], at: Vec2) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, target) in targets.iter().enumerate() {
        if target.hit {
            continue;
        }
        let dist = target.pos.distance(at);
        best = match best {
            Some((bi, bd)) if dist > bd || (dist == bd && target.id > targets[bi].id) => {
                Some((bi, bd))
            }
            _ => Some((i, dist)),
        };
    }
    best
}

/// Index of the target a shot at `at` hits, if any
pub fn resolve_hit(targets: &[Target], at: Vec2) -> Option<usize> {
    let (index, dist) = nearest_live_target(targets, at)?;
    (dist < targets[index].hit_radius()).then_some(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TargetKind;

    fn target(id: u32, x: f32, y: f32) -> Target {
        Target {
            id,
            pos: Vec2::new(x, y),
            size: 60.0,
            kind: TargetKind::Static,
            hit: false,
            points: 100,
            speed: 0.0,
            heading: 0.0,
        }
    }

    #[test]
    fn test_direct_hit() {
        let targets = vec![target(1, 50.0, 50.0)];
        assert_eq!(resolve_hit(&targets, Vec2::new(50.0, 50.0)), Some(0));
    }

    #[test]
    fn test_radius_is_strict() {
        let targets = vec![target(1, 50.0, 50.0)];
        // radius is 7.5: exactly on the edge misses
        assert_eq!(resolve_hit(&targets, Vec2::new(57.5, 50.0)), None);
        assert_eq!(resolve_hit(&targets, Vec2::new(57.4, 50.0)), Some(0));
    }

    #[test]
    fn test_nearest_wins_over_first() {
        // Both within radius; the second is closer
        let targets = vec![target(1, 50.0, 50.0), target(2, 54.0, 50.0)];
        assert_eq!(resolve_hit(&targets, Vec2::new(53.0, 50.0)), Some(1));
    }

    #[test]
    fn test_tie_goes_to_lowest_id() {
        let targets = vec![target(5, 48.0, 50.0), target(2, 52.0, 50.0)];
        let (i, _) = nearest_live_target(&targets, Vec2::new(50.0, 50.0)).unwrap();
        assert_eq!(targets[i].id, 2);
    }

    #[test]
    fn test_hit_targets_are_skipped() {
        let mut targets = vec![target(1, 50.0, 50.0), target(2, 55.0, 50.0)];
        targets[0].hit = true;
        assert_eq!(resolve_hit(&targets, Vec2::new(50.0, 50.0)), Some(1));
        targets[1].hit = true;
        assert_eq!(nearest_live_target(&targets, Vec2::new(50.0, 50.0)), None);
    }

    #[test]
    fn test_nearest_outside_radius_misses() {
        let targets = vec![target(1, 10.0, 10.0)];
        assert_eq!(resolve_hit(&targets, Vec2::new(90.0, 90.0)), None);
    }
}
