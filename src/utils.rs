pub(crate) trait LetChain {
    fn let_<F, R>(self, f: F) -> R
    where
        Self: Sized,
        F: FnOnce(Self) -> R;
}
impl<T> LetChain for T {
    #[inline]
    fn let_<F, R>(self, f: F) -> R
    where
        Self: Sized,
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

pub(crate) trait AlsoChain {
    fn also_<F, R>(self, f: F) -> Self
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> R;
}
impl<T> AlsoChain for T {
    #[inline]
    fn also_<F, R>(mut self, f: F) -> Self
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> R,
    {
        f(&mut self);
        self
    }
}

/// Whether items remain after the page that skipped `skip` and returned
/// `returned` out of `total`.
#[inline]
pub(crate) fn has_next(total: u64, skip: u64, returned: usize) -> bool {
    total > skip + returned as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains() {
        let v = 2.let_(|n| n * 3).also_(|n| *n += 1);
        assert_eq!(v, 7);
    }

    #[test]
    fn next_page_exists_only_with_leftovers() {
        assert!(has_next(21, 0, 20));
        assert!(!has_next(20, 0, 20));
        assert!(!has_next(25, 20, 5));
        assert!(!has_next(0, 0, 0));
    }
}
