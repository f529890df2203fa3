//! Reindexing onto a uniform, gap-free time grid.

use std::collections::HashMap;

use chrono::NaiveDateTime;

/// For every grid position, the source row holding that timestamp (first
/// occurrence wins), or `None` where the grid has no matching observation.
pub(crate) fn reindex_positions(
    index: &[NaiveDateTime],
    grid: &[NaiveDateTime],
) -> Vec<Option<usize>> {
    let mut by_ts: HashMap<NaiveDateTime, usize> = HashMap::with_capacity(index.len());
    for (row, &ts) in index.iter().enumerate() {
        by_ts.entry(ts).or_insert(row);
    }
    grid.iter().map(|ts| by_ts.get(ts).copied()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn missing_grid_slots_map_to_none() {
        let index = [day(1), day(2), day(4)];
        let grid = [day(1), day(2), day(3), day(4)];
        assert_eq!(
            reindex_positions(&index, &grid),
            vec![Some(0), Some(1), None, Some(2)]
        );
    }
}
