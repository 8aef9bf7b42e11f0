//! Ranking and winner selection

use curata_arxiv::Candidate;

/// Sort scored candidates by score descending and keep the first `top_n`.
///
/// The sort is stable, so candidates with equal scores keep their original
/// feed order — selection is deterministic under ties. Runs on whatever
/// subset enrichment managed to score before an interrupt.
pub fn select_winners(mut scored: Vec<Candidate>, top_n: usize) -> Vec<Candidate> {
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    scored.truncate(top_n);
    scored
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn candidate(id: &str, score: f64) -> Candidate {
        Candidate {
            arxiv_id: id.to_string(),
            title: format!("Paper {id}"),
            abstract_text: String::new(),
            authors: vec![],
            published: NaiveDate::from_ymd_opt(2024, 1, 22).unwrap(),
            page_url: String::new(),
            pdf_url: String::new(),
            tags: vec![],
            score,
        }
    }

    fn ids(winners: &[Candidate]) -> Vec<&str> {
        winners.iter().map(|c| c.arxiv_id.as_str()).collect()
    }

    #[test]
    fn sorts_by_score_descending() {
        let winners = select_winners(
            vec![candidate("a", 1.0), candidate("b", 3.0), candidate("c", 2.0)],
            10,
        );
        assert_eq!(ids(&winners), vec!["b", "c", "a"]);
    }

    #[test]
    fn ties_preserve_feed_order() {
        let winners = select_winners(
            vec![
                candidate("first", 0.0),
                candidate("second", 0.0),
                candidate("top", 5.0),
                candidate("third", 0.0),
            ],
            10,
        );
        assert_eq!(ids(&winners), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn selection_size_is_min_of_n_and_available() {
        let pool = vec![candidate("a", 1.0), candidate("b", 2.0)];
        assert_eq!(select_winners(pool.clone(), 20).len(), 2);
        assert_eq!(select_winners(pool, 1).len(), 1);
        assert!(select_winners(vec![], 20).is_empty());
    }

    #[test]
    fn zero_top_n_selects_nothing() {
        assert!(select_winners(vec![candidate("a", 9.0)], 0).is_empty());
    }
}
