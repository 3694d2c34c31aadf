use crate::types::replay::{Medal, RankingEntry};

/// Orders finishers by duration, fastest first, and hands out medals to the
/// top three. A single finisher has nobody to compare against, so fewer than
/// two entries yield an empty ranking.
pub fn build_ranking(finishers: Vec<(String, String, i64)>) -> Vec<RankingEntry> {
    if finishers.len() < 2 {
        return Vec::new();
    }

    let mut entries: Vec<RankingEntry> = finishers
        .into_iter()
        .map(|(name, color, duration_ms)| RankingEntry {
            name,
            color,
            duration_ms,
            medal: None,
        })
        .collect();
    entries.sort_by_key(|e| e.duration_ms);

    for (entry, medal) in entries.iter_mut().zip([Medal::Gold, Medal::Silver, Medal::Bronze]) {
        entry.medal = Some(medal);
    }
    entries
}
