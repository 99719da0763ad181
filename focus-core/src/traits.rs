//! Trait definitions for Focus.
//!
//! These are the seams between the sync scheduler and the platform clients.

use crate::models::SolvedSlugSet;

/// Something that can answer "which problems has this user solved".
///
/// Implementations never fail: partial failures degrade to a smaller set,
/// and total failure is an empty set. A background sync treats "nothing
/// new" as a normal steady state.
pub trait SolvedSlugSource: Send + Sync {
    /// Fetches the solved slugs for `username`, asking for at most `limit`.
    fn fetch_solved_slugs(
        &self,
        username: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = SolvedSlugSet> + Send;
}

impl<T: SolvedSlugSource> SolvedSlugSource for std::sync::Arc<T> {
    fn fetch_solved_slugs(
        &self,
        username: &str,
        limit: usize,
    ) -> impl std::future::Future<Output = SolvedSlugSet> + Send {
        (**self).fetch_solved_slugs(username, limit)
    }
}
