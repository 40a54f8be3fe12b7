use super::{RepositoryError, Result as RepoResult};

pub fn find_mut<T, P>(v: &mut [T], preficate: P) -> RepoResult<&mut T>
where
    T: ::core::fmt::Debug,
    P: FnMut(&&mut T) -> bool,
{
    let mut res = v.iter_mut().filter(preficate).collect::<Vec<_>>();

    tracing::trace!("found - {:?}", res);

    match res.len() {
        0 => Err(RepositoryError::NotFound),
        1 => Ok(res.remove(0)),
        i => Err(RepositoryError::NoUnique { matched: i as u32 }),
    }
}

pub fn find_ref<T, P>(v: &[T], preficate: P) -> RepoResult<&T>
where
    T: ::core::fmt::Debug,
    P: FnMut(&&T) -> bool,
{
    let mut res = v.iter().filter(preficate).collect::<Vec<_>>();

    tracing::trace!("found - {:?}", res);

    match res.len() {
        0 => Err(RepositoryError::NotFound),
        1 => Ok(res.remove(0)),
        i => Err(RepositoryError::NoUnique { matched: i as u32 }),
    }
}

pub fn remove_one<T, P>(v: &mut Vec<T>, mut preficate: P) -> RepoResult<T>
where
    T: ::core::fmt::Debug,
    P: FnMut(&T) -> bool,
{
    let indexes = v
        .iter()
        .enumerate()
        .filter_map(|(i, t)| preficate(t).then(|| i))
        .collect::<Vec<_>>();

    tracing::trace!("found at - {:?}", indexes);

    match indexes.len() {
        0 => Err(RepositoryError::NotFound),
        1 => Ok(v.remove(indexes[0])),
        i => Err(RepositoryError::NoUnique { matched: i as u32 }),
    }
}

/// Sums up count, upvotes and views of the items matched by an author.
pub fn sum_stats<I>(items: I) -> super::AuthorStats
where I: Iterator<Item = (usize, u64)> {
    items.fold(super::AuthorStats::default(), |mut acc, (upvotes, views)| {
        acc.count += 1;
        acc.upvotes += upvotes as u64;
        acc.views += views;
        acc
    })
}
