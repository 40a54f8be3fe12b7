use anyhow::anyhow;
use mongodb::error::{ErrorKind, Result as MongoResult, WriteFailure};

use super::{RepositoryError, Result as RepoResult};

pub fn convert_repo_err<T, E>(result: Result<T, E>) -> RepoResult<T>
where E: Sync + Send + ::std::error::Error + 'static {
    result.map_err(|e| RepositoryError::Internal(anyhow!(e)))
}

/// `Ok(false)` on duplicate key (code 11000).
pub fn try_unique_check<T>(result: MongoResult<T>) -> RepoResult<bool> {
    let e = match result {
        Ok(_) => return Ok(true),
        Err(e) => e,
    };

    match *e.kind {
        ErrorKind::Write(WriteFailure::WriteError(ref we)) if we.code == 11000 => Ok(false),
        _ => Err(RepositoryError::Internal(anyhow!(e))),
    }
}

pub fn convert_404_or<T>(option: Option<T>) -> RepoResult<T> {
    match option {
        Some(t) => Ok(t),
        None => Err(RepositoryError::NotFound),
    }
}

pub fn convert_regex_err<T>(result: Result<T, regex::Error>) -> RepoResult<T> {
    result.map_err(|e| RepositoryError::Internal(anyhow!(e)))
}

pub fn to_bool<N>(number: N) -> bool
where N: ::core::convert::TryInto<i8> + ::core::fmt::Debug + Clone {
    match ::core::convert::TryInto::<i8>::try_into(number.clone()) {
        Ok(0) => false,
        Ok(1) => true,
        _ => unreachable!("expected 0 or 1, found: {:?}", number),
    }
}
