/// One table column: a share of the available width and a floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnSpec {
    pub title: &'static str,
    pub weight: f64,
    pub min: u16,
}

pub const EMAIL_COLUMNS: [ColumnSpec; 4] = [
    ColumnSpec { title: "From", weight: 0.25, min: 20 },
    ColumnSpec { title: "To", weight: 0.25, min: 20 },
    ColumnSpec { title: "Subject", weight: 0.35, min: 30 },
    ColumnSpec { title: "Date", weight: 0.15, min: 16 },
];

/// `max(min, round(weight * available))` per column; when the total
/// overshoots, every width is scaled by `available / total`, floored and
/// kept at one column or more.
pub fn column_widths(available: u16, columns: &[ColumnSpec]) -> Vec<u16> {
    let avail = f64::from(available);
    let mut widths: Vec<u16> = columns
        .iter()
        .map(|c| c.min.max((c.weight * avail).round() as u16))
        .collect();

    let total: u32 = widths.iter().map(|&w| u32::from(w)).sum();
    if total > u32::from(available) {
        let scale = avail / f64::from(total);
        for w in &mut widths {
            *w = ((f64::from(*w) * scale).floor() as u16).max(1);
        }
    }
    widths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(ws: &[u16]) -> u32 {
        ws.iter().map(|&w| u32::from(w)).sum()
    }

    #[test]
    fn wide_screen_uses_weights() {
        let ws = column_widths(200, &EMAIL_COLUMNS);
        assert_eq!(ws, [50, 50, 70, 30]);
    }

    #[test]
    fn minimums_hold_when_they_fit() {
        let ws = column_widths(120, &EMAIL_COLUMNS);
        assert_eq!(ws, [30, 30, 42, 18]);
        // 0.15 * 100 = 15 < 16, then the total of 101 is scaled back down
        let ws = column_widths(100, &EMAIL_COLUMNS);
        assert!(sum(&ws) <= 100, "{ws:?}");
        assert_eq!(ws, [24, 24, 34, 15]);
    }

    #[test]
    fn never_exceeds_the_budget() {
        for available in 4..=400u16 {
            let ws = column_widths(available, &EMAIL_COLUMNS);
            assert!(sum(&ws) <= u32::from(available), "{available}: {ws:?}");
            assert!(ws.iter().all(|&w| w >= 1));
        }
    }

    #[test]
    fn tiny_budget_floors_at_one() {
        assert_eq!(column_widths(0, &EMAIL_COLUMNS), [1, 1, 1, 1]);
    }

    #[test]
    fn idempotent_for_a_fixed_size() {
        assert_eq!(
            column_widths(87, &EMAIL_COLUMNS),
            column_widths(87, &EMAIL_COLUMNS)
        );
    }
}
