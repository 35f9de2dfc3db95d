use crate::stats::VideoStat;

/// The `n` most-viewed videos, highest first.
///
/// The sort is stable: equal view counts keep the order they were fetched in.
pub fn top_n(stats: &[VideoStat], n: usize) -> Vec<VideoStat> {
    let mut ranked = stats.to_vec();
    ranked.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(id: &str, views: u64) -> VideoStat {
        VideoStat {
            title: format!("Title {}", id),
            view_count: views,
            video_id: id.to_string(),
        }
    }

    fn ids(stats: &[VideoStat]) -> Vec<&str> {
        stats.iter().map(|s| s.video_id.as_str()).collect()
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let stats: Vec<VideoStat> = (0..25)
            .map(|i| stat(&format!("V{}", i), (i * 7 % 25) as u64))
            .collect();

        let top = top_n(&stats, 10);

        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].view_count >= w[1].view_count));
        assert_eq!(top[0].view_count, 24);
    }

    #[test]
    fn fewer_than_n_returns_all_ranked() {
        let stats = vec![stat("a", 1), stat("b", 30), stat("c", 2)];

        assert_eq!(ids(&top_n(&stats, 10)), vec!["b", "c", "a"]);
        assert!(top_n(&[], 10).is_empty());
        assert!(top_n(&stats, 0).is_empty());
    }

    #[test]
    fn ties_keep_fetch_order() {
        let stats = vec![stat("A", 1000), stat("B", 5000), stat("C", 5000), stat("D", 1000)];

        assert_eq!(ids(&top_n(&stats, 10)), vec!["B", "C", "A", "D"]);
    }

    #[test]
    fn input_is_not_mutated() {
        let stats = vec![stat("a", 1), stat("b", 2)];
        let before = stats.clone();

        let _ = top_n(&stats, 1);

        assert_eq!(stats, before);
    }
}
