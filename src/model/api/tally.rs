use serde::{Deserialize, Serialize};

use crate::model::{common::Post, db::candidate::Candidate, mongodb::Id};

/// One candidate's standing within a post tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateTally {
    pub candidate_id: Id,
    pub user_id: Id,
    pub votes_count: u64,
    /// Share of the post's total votes, 0 when nobody has voted yet.
    pub percentage: f64,
}

/// The aggregated result for one post of one election.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTally {
    pub post: Post,
    pub post_label: String,
    pub total_votes: u64,
    /// Candidates in descending vote order.
    pub candidates: Vec<CandidateTally>,
    /// The current front-runner; absent until at least one vote is cast.
    pub leading_candidate_id: Option<Id>,
}

impl PostTally {
    /// Compute the tally for one post from the candidates standing for it.
    ///
    /// Only approved candidates count. Ordering is votes descending, with
    /// ties broken by registration time ascending so the result is stable
    /// regardless of fetch order.
    pub fn compute(post: Post, candidates: &[Candidate]) -> Self {
        let mut standing: Vec<&Candidate> = candidates
            .iter()
            .filter(|candidate| candidate.is_approved && candidate.post == post)
            .collect();
        standing.sort_by(|a, b| {
            b.votes_count
                .cmp(&a.votes_count)
                .then(a.created_at.cmp(&b.created_at))
        });

        let total_votes: u64 = standing.iter().map(|candidate| candidate.votes_count).sum();

        let tallies = standing
            .iter()
            .map(|candidate| CandidateTally {
                candidate_id: candidate.id,
                user_id: candidate.user_id,
                votes_count: candidate.votes_count,
                percentage: if total_votes == 0 {
                    0.0
                } else {
                    candidate.votes_count as f64 / total_votes as f64 * 100.0
                },
            })
            .collect::<Vec<_>>();

        let leading_candidate_id = (total_votes > 0)
            .then(|| tallies.first().map(|tally| tally.candidate_id))
            .flatten();

        Self {
            post,
            post_label: post.label().to_string(),
            total_votes,
            candidates: tallies,
            leading_candidate_id,
        }
    }

    /// Compute tallies for every post at once (admin results view).
    pub fn compute_all(candidates: &[Candidate]) -> Vec<Self> {
        Post::ALL
            .into_iter()
            .map(|post| Self::compute(post, candidates))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::mongodb::Id;

    #[test]
    fn orders_by_votes_and_reports_percentages() {
        let election_id = Id::new();
        let trailing = Candidate::example_approved(election_id, Post::Provost, 3);
        let leading = Candidate::example_approved(election_id, Post::Provost, 7);
        let candidates = vec![trailing.clone(), leading.clone()];

        let tally = PostTally::compute(Post::Provost, &candidates);

        assert_eq!(tally.total_votes, 10);
        assert_eq!(tally.candidates.len(), 2);
        assert_eq!(tally.candidates[0].candidate_id, leading.id);
        assert_eq!(tally.candidates[1].candidate_id, trailing.id);
        assert!((tally.candidates[0].percentage - 70.0).abs() < f64::EPSILON);
        assert!((tally.candidates[1].percentage - 30.0).abs() < f64::EPSILON);
        assert_eq!(tally.leading_candidate_id, Some(leading.id));
    }

    #[test]
    fn percentages_sum_to_one_hundred() {
        let election_id = Id::new();
        let candidates = vec![
            Candidate::example_approved(election_id, Post::Clo, 1),
            Candidate::example_approved(election_id, Post::Clo, 2),
            Candidate::example_approved(election_id, Post::Clo, 4),
        ];

        let tally = PostTally::compute(Post::Clo, &candidates);
        let sum: f64 = tally.candidates.iter().map(|c| c.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_votes_means_zero_percentages_and_no_leader() {
        let election_id = Id::new();
        let candidates = vec![
            Candidate::example_approved(election_id, Post::Provost, 0),
            Candidate::example_approved(election_id, Post::Provost, 0),
        ];

        let tally = PostTally::compute(Post::Provost, &candidates);

        assert_eq!(tally.total_votes, 0);
        assert!(tally.candidates.iter().all(|c| c.percentage == 0.0));
        assert_eq!(tally.leading_candidate_id, None);
    }

    #[test]
    fn unapproved_candidates_are_invisible() {
        let election_id = Id::new();
        let pending = Candidate::example_pending(election_id, Post::Provost);
        let approved = Candidate::example_approved(election_id, Post::Provost, 5);
        let candidates = vec![pending.clone(), approved.clone()];

        let tally = PostTally::compute(Post::Provost, &candidates);

        assert_eq!(tally.candidates.len(), 1);
        assert_eq!(tally.candidates[0].candidate_id, approved.id);
        assert!(tally
            .candidates
            .iter()
            .all(|c| c.candidate_id != pending.id));
    }

    #[test]
    fn other_posts_do_not_leak_into_the_tally() {
        let election_id = Id::new();
        let candidates = vec![
            Candidate::example_approved(election_id, Post::Provost, 5),
            Candidate::example_approved(election_id, Post::CdsPresident, 9),
        ];

        let tally = PostTally::compute(Post::Provost, &candidates);
        assert_eq!(tally.total_votes, 5);
        assert_eq!(tally.candidates.len(), 1);
    }

    #[test]
    fn ties_break_by_registration_time() {
        let election_id = Id::new();
        let first = Candidate::example_approved(election_id, Post::Provost, 4);
        let mut second = Candidate::example_approved(election_id, Post::Provost, 4);
        second.candidate.created_at = first.created_at + chrono::Duration::seconds(60);

        let tally = PostTally::compute(Post::Provost, &[second.clone(), first.clone()]);
        assert_eq!(tally.candidates[0].candidate_id, first.id);
        assert_eq!(tally.candidates[1].candidate_id, second.id);
    }

    #[test]
    fn compute_all_covers_every_post() {
        let tallies = PostTally::compute_all(&[]);
        assert_eq!(tallies.len(), Post::ALL.len());
        assert!(tallies.iter().all(|t| t.total_votes == 0));
    }
}
